// ==========================================
// 销售预测与生产计划 - 计划参数
// ==========================================
// 职责: 预测/情景/生产/告警参数的集合与校验
// 存储: 由 ConfigManager 从 config_kv 表装配
// ==========================================

use crate::engine::alert_engine::AlertThresholds;
use crate::engine::baseline::{validate_horizon, DEFAULT_HORIZON};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::production::DEFAULT_SAFETY_STOCK_PCT;
use crate::engine::scenario::validate_uplift;
use crate::domain::year_month::YearMonth;
use serde::{Deserialize, Serialize};

// ==========================================
// PlanningConfig - 计划参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningConfig {
    pub anchor_month: YearMonth,            // 锚定月（当前月）
    pub horizon: u32,                       // 预测期数
    pub safety_stock_pct: f64,              // 安全库存百分比
    pub scenario_uplift_pct: Option<f64>,   // 情景增减百分比（空 = 不做情景调整）
    pub capacity_limit: Option<i64>,        // 单月单品产能上限
    pub moq: Option<i64>,                   // 最小起订量
    pub alert_thresholds: AlertThresholds,  // 告警阈值
}

impl PlanningConfig {
    /// 以指定锚定月创建默认参数
    pub fn with_anchor(anchor_month: YearMonth) -> Self {
        Self {
            anchor_month,
            horizon: DEFAULT_HORIZON,
            safety_stock_pct: DEFAULT_SAFETY_STOCK_PCT,
            scenario_uplift_pct: None,
            capacity_limit: None,
            moq: None,
            alert_thresholds: AlertThresholds::default(),
        }
    }

    /// 校验全部参数
    pub fn validate(&self) -> EngineResult<()> {
        validate_horizon(self.horizon)?;

        if !self.safety_stock_pct.is_finite() || self.safety_stock_pct < 0.0 {
            return Err(EngineError::invalid(
                "safety_stock_pct",
                self.safety_stock_pct,
                "安全库存百分比必须为非负有限值",
            ));
        }
        if let Some(uplift) = self.scenario_uplift_pct {
            validate_uplift(uplift)?;
        }
        if let Some(cap) = self.capacity_limit {
            if cap <= 0 {
                return Err(EngineError::invalid("capacity_limit", cap, "产能上限必须大于 0"));
            }
        }
        if let Some(moq) = self.moq {
            if moq <= 0 {
                return Err(EngineError::invalid("moq", moq, "最小起订量必须大于 0"));
            }
        }

        let t = &self.alert_thresholds;
        if !t.spike_ratio.is_finite() || t.spike_ratio <= 0.0 {
            return Err(EngineError::invalid("spike_ratio", t.spike_ratio, "激增倍数必须大于 0"));
        }

        Ok(())
    }
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self::with_anchor(YearMonth::current())
    }
}
