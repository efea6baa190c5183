// ==========================================
// 销售预测与生产计划 - 生产计划器
// ==========================================
// 红线: 设置产能上限时,建议量不得超过上限
// ==========================================
// 职责: 预测 → 建议生产量
// 规则: 安全库存 → MOQ 向上取整 → 产能截断
// ==========================================

use crate::domain::forecast::{ForecastData, ProductionPlan};
use crate::engine::error::{EngineError, EngineResult};
use tracing::{info, instrument};

/// 默认安全库存百分比
pub const DEFAULT_SAFETY_STOCK_PCT: f64 = 15.0;

// ==========================================
// ProductionPlanner - 生产计划器
// ==========================================
#[derive(Debug, Clone)]
pub struct ProductionPlanner {
    safety_stock_pct: f64,
    capacity: Option<i64>,
    moq: Option<i64>,
}

impl ProductionPlanner {
    /// 创建生产计划器
    ///
    /// # 参数
    /// - safety_stock_pct: 安全库存百分比（≥ 0）
    /// - capacity: 单月单品产能上限（> 0）
    /// - moq: 最小起订量（> 0）
    pub fn new(safety_stock_pct: f64, capacity: Option<i64>, moq: Option<i64>) -> EngineResult<Self> {
        if !safety_stock_pct.is_finite() || safety_stock_pct < 0.0 {
            return Err(EngineError::invalid(
                "safety_stock_pct",
                safety_stock_pct,
                "安全库存百分比必须为非负有限值",
            ));
        }
        if let Some(cap) = capacity {
            if cap <= 0 {
                return Err(EngineError::invalid("capacity", cap, "产能上限必须大于 0"));
            }
        }
        if let Some(m) = moq {
            if m <= 0 {
                return Err(EngineError::invalid("moq", m, "最小起订量必须大于 0"));
            }
        }

        Ok(Self {
            safety_stock_pct,
            capacity,
            moq,
        })
    }

    /// 生成生产计划（与预测一一对应）
    #[instrument(skip(self, forecasts), fields(count = forecasts.len()))]
    pub fn plan(&self, forecasts: &[ForecastData]) -> EngineResult<Vec<ProductionPlan>> {
        let plans = forecasts
            .iter()
            .map(|f| self.plan_one(f))
            .collect::<EngineResult<Vec<ProductionPlan>>>()?;

        let violations = plans.iter().filter(|p| p.capacity_violation_flag).count();
        if violations > 0 {
            info!(violations, capacity = ?self.capacity, "部分建议量被产能截断");
        }
        Ok(plans)
    }

    /// 单条预测的生产计划
    ///
    /// MOQ 取整溢出 i64 时返回 InvalidParameter
    pub fn plan_one(&self, forecast: &ForecastData) -> EngineResult<ProductionPlan> {
        let mut qty = self.buffered_qty(forecast.planning_qty());

        if let Some(moq) = self.moq {
            qty = round_up_to_moq(qty, moq).ok_or_else(|| {
                EngineError::invalid("moq", moq, "按最小起订量取整后建议量溢出")
            })?;
        }

        let mut capacity_violation_flag = false;
        let mut note = None;
        if let Some(cap) = self.capacity {
            if qty > cap {
                note = Some(format!("需求 {} 超出产能上限 {}，已截断", qty, cap));
                qty = cap;
                capacity_violation_flag = true;
            }
        }

        Ok(ProductionPlan {
            year_month: forecast.year_month,
            flavor: forecast.flavor,
            size: forecast.size,
            baseline_forecast: forecast.baseline_forecast,
            scenario_forecast: forecast.scenario_forecast,
            buffer_pct: self.safety_stock_pct,
            recommended_qty: qty,
            max_qty: self.capacity,
            capacity_violation_flag,
            note,
        })
    }

    /// round(qty × (1 + ss/100))
    fn buffered_qty(&self, qty: i64) -> i64 {
        (qty as f64 * (1.0 + self.safety_stock_pct / 100.0)).round() as i64
    }
}

impl Default for ProductionPlanner {
    fn default() -> Self {
        Self {
            safety_stock_pct: DEFAULT_SAFETY_STOCK_PCT,
            capacity: None,
            moq: None,
        }
    }
}

/// 向上取整到 MOQ 的整数倍: ceil(qty / moq) × moq
///
/// 结果超出 i64 范围时返回 None
pub fn round_up_to_moq(qty: i64, moq: i64) -> Option<i64> {
    if qty <= 0 {
        return Some(0);
    }
    let blocks = qty / moq + i64::from(qty % moq != 0);
    blocks.checked_mul(moq)
}
