// ==========================================
// 销售预测与生产计划 - 月度销量生成器
// ==========================================
// 职责: 生成锚定月之前 24 个月的演示销量序列
// 输入: 锚定月（当前月）
// 输出: 6 口味 × 3 规格 × 24 月 = 432 条 SalesMonthly
// ==========================================

use crate::domain::sales::SalesMonthly;
use crate::domain::types::{Channel, Flavor, PackSize};
use crate::domain::year_month::YearMonth;
use crate::engine::seeded_random::{SeededRandom, SALES_SEED};
use std::f64::consts::PI;
use tracing::debug;

/// 回溯窗口（月）
pub const HISTORY_MONTHS: i32 = 24;

// ==========================================
// SalesGenerator - 销量生成器
// ==========================================
pub struct SalesGenerator {
    rng: SeededRandom,
}

impl SalesGenerator {
    pub fn new() -> Self {
        Self::with_seed(SALES_SEED)
    }

    pub fn with_seed(seed: i64) -> Self {
        Self {
            rng: SeededRandom::new(seed),
        }
    }

    /// 生成销量序列
    ///
    /// 遍历顺序: 月份偏移 [-24, 0) → 口味 → 规格
    ///
    /// 每条记录消耗 3 个随机数: 基数、噪声、渠道
    /// - base = 5000 + r * 10000
    /// - seasonality = 1 + 0.3 * sin(offset / 12 * 2π)
    /// - noise = 0.8 + r * 0.4
    pub fn generate(&mut self, anchor: YearMonth) -> Vec<SalesMonthly> {
        let capacity = (HISTORY_MONTHS as usize) * Flavor::ALL.len() * PackSize::ALL.len();
        let mut records = Vec::with_capacity(capacity);

        for offset in -HISTORY_MONTHS..0 {
            let year_month = anchor.add_months(offset);
            let seasonality = 1.0 + 0.3 * (offset as f64 / 12.0 * 2.0 * PI).sin();

            for flavor in Flavor::ALL {
                for size in PackSize::ALL {
                    let base = 5000.0 + self.rng.next_f64() * 10000.0;
                    let noise = 0.8 + self.rng.next_f64() * 0.4;
                    let sales_qty = (base * seasonality * noise).round() as i64;
                    let channel = Channel::ALL[self.rng.next_index(Channel::ALL.len())];

                    records.push(SalesMonthly {
                        year_month,
                        flavor,
                        size,
                        sales_qty,
                        channel,
                    });
                }
            }
        }

        debug!(
            anchor = %anchor,
            count = records.len(),
            "销量序列生成完成"
        );
        records
    }
}

impl Default for SalesGenerator {
    fn default() -> Self {
        Self::new()
    }
}
