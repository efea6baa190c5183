// ==========================================
// 销售预测与生产计划 - 基线预测器
// ==========================================
// 职责: 近 3 月均值 × 正弦季节系数,向后滚动 N 个月
// 输入: 销量序列 + 预测期数
// 输出: ForecastData（scenario_forecast 为空）
// 红线: 空历史显式报错,不产出 NaN
// ==========================================

use crate::domain::forecast::ForecastData;
use crate::domain::sales::SalesMonthly;
use crate::domain::types::{Flavor, PackSize};
use crate::domain::year_month::YearMonth;
use crate::engine::error::{EngineError, EngineResult};
use std::collections::BTreeMap;
use std::f64::consts::PI;
use tracing::{instrument, warn};

/// 默认预测期数（月）
pub const DEFAULT_HORIZON: u32 = 6;

/// 预测期数上限（月）
pub const MAX_HORIZON: u32 = 36;

/// 均值窗口（月）
pub const TRAILING_WINDOW: usize = 3;

// ==========================================
// BaselineForecaster - 基线预测器
// ==========================================
pub struct BaselineForecaster {
    horizon: u32,
}

impl BaselineForecaster {
    /// 创建预测器
    ///
    /// # 参数
    /// - horizon: 预测期数,范围 [1, 36]
    pub fn new(horizon: u32) -> EngineResult<Self> {
        validate_horizon(horizon)?;
        Ok(Self { horizon })
    }

    pub fn horizon(&self) -> u32 {
        self.horizon
    }

    /// 对全部口味×规格组合做基线预测
    ///
    /// 无历史的组合跳过并记录告警日志。
    /// 输出顺序: 口味 → 规格 → 月份
    #[instrument(skip(self, sales), fields(horizon = self.horizon, records = sales.len(), anchor = %anchor))]
    pub fn forecast(&self, sales: &[SalesMonthly], anchor: YearMonth) -> EngineResult<Vec<ForecastData>> {
        let mut forecasts = Vec::new();

        for flavor in Flavor::ALL {
            for size in PackSize::ALL {
                match self.forecast_pair(sales, flavor, size, anchor) {
                    Ok(mut pair) => forecasts.append(&mut pair),
                    Err(EngineError::EmptyHistory { .. }) => {
                        warn!(%flavor, %size, "无历史销量,跳过基线预测");
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        Ok(forecasts)
    }

    /// 单个口味×规格组合的基线预测
    ///
    /// 1. 按月合计,取最近 3 个月（不足 3 个月取全部）
    /// 2. 算术平均
    /// 3. 第 i 期（i ∈ [1, horizon]）: round(mean × (1 + 0.2 × sin(i/12 × 2π)))
    ///
    /// 预测月份 = 锚定月 + (i - 1),各组合共用同一预测起点
    pub fn forecast_pair(
        &self,
        sales: &[SalesMonthly],
        flavor: Flavor,
        size: PackSize,
        anchor: YearMonth,
    ) -> EngineResult<Vec<ForecastData>> {
        // 同月多渠道记录先按月合计
        let mut by_month: BTreeMap<YearMonth, i64> = BTreeMap::new();
        for s in sales.iter().filter(|s| s.is_pair(flavor, size)) {
            let total = by_month.entry(s.year_month).or_insert(0);
            *total = total
                .checked_add(s.sales_qty)
                .ok_or_else(|| overflow(flavor, size, s.year_month))?;
        }

        let Some(&last_month) = by_month.keys().next_back() else {
            return Err(EngineError::EmptyHistory { flavor, size });
        };

        let recent: Vec<i64> = by_month.values().rev().take(TRAILING_WINDOW).copied().collect();
        let sum = recent
            .iter()
            .try_fold(0i64, |acc, q| acc.checked_add(*q))
            .ok_or_else(|| overflow(flavor, size, last_month))?;
        let mean = sum as f64 / recent.len() as f64;

        let forecasts = (1..=self.horizon)
            .map(|i| {
                let forecast_qty = (mean * seasonality(i)).round() as i64;
                ForecastData {
                    year_month: anchor.add_months(i as i32 - 1),
                    flavor,
                    size,
                    forecast_qty,
                    baseline_forecast: forecast_qty,
                    scenario_forecast: None,
                }
            })
            .collect();

        Ok(forecasts)
    }
}

fn overflow(flavor: Flavor, size: PackSize, month: YearMonth) -> EngineError {
    EngineError::InconsistentData(format!("销量合计溢出: {} {} {}", flavor, size, month))
}

impl Default for BaselineForecaster {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
        }
    }
}

/// 第 i 期的季节系数
pub fn seasonality(i: u32) -> f64 {
    1.0 + 0.2 * (i as f64 / 12.0 * 2.0 * PI).sin()
}

/// 校验预测期数
pub fn validate_horizon(horizon: u32) -> EngineResult<()> {
    if horizon == 0 || horizon > MAX_HORIZON {
        return Err(EngineError::invalid(
            "horizon",
            horizon,
            "预测期数必须在 [1, 36] 范围内",
        ));
    }
    Ok(())
}
