// ==========================================
// 销售预测与生产计划 - 情景调整器
// ==========================================
// 职责: 在基线预测上施加统一百分比增减
// 红线: 降幅不得超过 -100%（不产出负数需求）
// ==========================================

use crate::domain::forecast::ForecastData;
use crate::engine::error::{EngineError, EngineResult};
use tracing::debug;

// ==========================================
// ScenarioAdjuster - 情景调整器
// ==========================================
pub struct ScenarioAdjuster {
    uplift_pct: f64,
}

impl ScenarioAdjuster {
    /// 创建情景调整器
    ///
    /// # 参数
    /// - uplift_pct: 增减百分比（如 10.0 表示 +10%）,须为有限值且 ≥ -100
    pub fn new(uplift_pct: f64) -> EngineResult<Self> {
        validate_uplift(uplift_pct)?;
        Ok(Self { uplift_pct })
    }

    pub fn uplift_pct(&self) -> f64 {
        self.uplift_pct
    }

    /// 单值调整: round(qty × (1 + uplift/100))
    pub fn adjust_qty(&self, forecast_qty: i64) -> i64 {
        (forecast_qty as f64 * (1.0 + self.uplift_pct / 100.0)).round() as i64
    }

    /// 批量调整,写入 scenario_forecast
    pub fn apply(&self, forecasts: &[ForecastData]) -> Vec<ForecastData> {
        debug!(uplift_pct = self.uplift_pct, count = forecasts.len(), "应用情景调整");
        forecasts
            .iter()
            .map(|f| ForecastData {
                scenario_forecast: Some(self.adjust_qty(f.forecast_qty)),
                ..f.clone()
            })
            .collect()
    }
}

/// 校验增减百分比
pub fn validate_uplift(uplift_pct: f64) -> EngineResult<()> {
    if !uplift_pct.is_finite() {
        return Err(EngineError::invalid("uplift_pct", uplift_pct, "必须为有限数值"));
    }
    if uplift_pct < -100.0 {
        return Err(EngineError::invalid(
            "uplift_pct",
            uplift_pct,
            "降幅不得超过 -100%",
        ));
    }
    Ok(())
}
