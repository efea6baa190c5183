// ==========================================
// 销售预测与生产计划 - 月度促销生成器
// ==========================================
// 职责: 生成稀疏的演示促销日历
// 窗口: 锚定月偏移 [-24, +6)
// ==========================================

use crate::domain::sales::PromoMonthly;
use crate::domain::types::{Flavor, PackSize, PromoType};
use crate::domain::year_month::YearMonth;
use crate::engine::seeded_random::{SeededRandom, PROMO_SEED};
use tracing::debug;

/// 每月抽样次数
pub const DRAWS_PER_MONTH: usize = 6;

/// 单次抽样产生促销的概率
pub const PROMO_PROBABILITY: f64 = 0.3;

const WINDOW_START: i32 = -24;
const WINDOW_END: i32 = 6;

// ==========================================
// PromoGenerator - 促销生成器
// ==========================================
pub struct PromoGenerator {
    rng: SeededRandom,
}

impl PromoGenerator {
    pub fn new() -> Self {
        Self::with_seed(PROMO_SEED)
    }

    pub fn with_seed(seed: i64) -> Self {
        Self {
            rng: SeededRandom::new(seed),
        }
    }

    /// 生成促销记录
    ///
    /// 口味与规格每次独立抽取,同月同品可能重复。
    pub fn generate(&mut self, anchor: YearMonth) -> Vec<PromoMonthly> {
        let mut records = Vec::new();

        for offset in WINDOW_START..WINDOW_END {
            let year_month = anchor.add_months(offset);

            for _ in 0..DRAWS_PER_MONTH {
                if !self.rng.chance(PROMO_PROBABILITY) {
                    continue;
                }

                let flavor = Flavor::ALL[self.rng.next_index(Flavor::ALL.len())];
                let size = PackSize::ALL[self.rng.next_index(PackSize::ALL.len())];
                let promo_days = 5 + (self.rng.next_f64() * 20.0).floor() as u32;
                let discount_pct = 10 + (self.rng.next_f64() * 30.0).floor() as u32;
                let promo_type = PromoType::ALL[self.rng.next_index(PromoType::ALL.len())];

                records.push(PromoMonthly {
                    year_month,
                    flavor,
                    size,
                    promo_flag: true,
                    promo_days,
                    discount_pct,
                    promo_type,
                });
            }
        }

        debug!(anchor = %anchor, count = records.len(), "促销日历生成完成");
        records
    }
}

impl Default for PromoGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor() -> YearMonth {
        YearMonth::new(2025, 6).unwrap()
    }

    #[test]
    fn test_field_ranges() {
        let promos = PromoGenerator::new().generate(anchor());
        assert!(!promos.is_empty());
        for p in &promos {
            assert!(p.promo_flag);
            assert!((5..=24).contains(&p.promo_days), "promo_days={}", p.promo_days);
            assert!((10..=39).contains(&p.discount_pct), "discount={}", p.discount_pct);
        }
    }

    #[test]
    fn test_window_bounds() {
        let a = anchor();
        let promos = PromoGenerator::new().generate(a);
        for p in &promos {
            let offset = a.months_until(&p.year_month);
            assert!((-24..6).contains(&offset), "offset={}", offset);
        }
    }

    #[test]
    fn test_sparse() {
        // 30 个月 × 6 次抽样 = 180 次,期望约 54 条
        let promos = PromoGenerator::new().generate(anchor());
        assert!(promos.len() < 30 * DRAWS_PER_MONTH);
    }
}
