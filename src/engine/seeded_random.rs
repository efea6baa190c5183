// ==========================================
// 销售预测与生产计划 - 确定性伪随机数发生器
// ==========================================
// 职责: 基于正弦散列的可复现随机序列（演示数据专用）
// 红线: 非密码学随机,禁止用于任何安全用途
// ==========================================

/// 销量生成器的初始种子
pub const SALES_SEED: i64 = 42;

/// 促销生成器的初始种子
pub const PROMO_SEED: i64 = 1337;

/// 确定性伪随机数发生器
///
/// 每次调用返回 `fract(sin(seed) * 10000)`，随后种子自增。
/// 不同用途各自持有实例,序列互不干扰。
#[derive(Debug, Clone)]
pub struct SeededRandom {
    seed: i64,
}

impl SeededRandom {
    pub fn new(seed: i64) -> Self {
        Self { seed }
    }

    /// 当前种子（下一次调用将使用的值）
    pub fn seed(&self) -> i64 {
        self.seed
    }

    /// 返回 [0, 1) 区间的下一个值
    pub fn next_f64(&mut self) -> f64 {
        let x = (self.seed as f64).sin() * 10000.0;
        self.seed += 1;
        x - x.floor()
    }

    /// 返回 [0, len) 区间的下标
    pub fn next_index(&mut self, len: usize) -> usize {
        let idx = (self.next_f64() * len as f64).floor() as usize;
        // 浮点误差兜底
        idx.min(len.saturating_sub(1))
    }

    /// 以概率 p 返回 true
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = SeededRandom::new(SALES_SEED);
        let mut b = SeededRandom::new(SALES_SEED);
        for _ in 0..100 {
            assert_eq!(a.next_f64().to_bits(), b.next_f64().to_bits());
        }
    }

    #[test]
    fn test_values_in_unit_interval() {
        let mut rng = SeededRandom::new(PROMO_SEED);
        for _ in 0..1000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v), "value out of range: {}", v);
        }
    }

    #[test]
    fn test_matches_sine_hash() {
        let mut rng = SeededRandom::new(1);
        let expected = {
            let x = 1.0_f64.sin() * 10000.0;
            x - x.floor()
        };
        assert_eq!(rng.next_f64(), expected);
        assert_eq!(rng.seed(), 2);
    }

    #[test]
    fn test_independent_instances() {
        let mut sales = SeededRandom::new(SALES_SEED);
        let mut promo = SeededRandom::new(PROMO_SEED);
        sales.next_f64();
        sales.next_f64();
        // 促销序列不受销量序列消耗影响
        let mut fresh = SeededRandom::new(PROMO_SEED);
        assert_eq!(promo.next_f64(), fresh.next_f64());
    }

    #[test]
    fn test_next_index_bounds() {
        let mut rng = SeededRandom::new(7);
        for _ in 0..500 {
            assert!(rng.next_index(4) < 4);
        }
    }
}
