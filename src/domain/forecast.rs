// ==========================================
// 销售预测与生产计划 - 预测/生产计划领域模型
// ==========================================

use crate::domain::types::{Flavor, PackSize};
use crate::domain::year_month::YearMonth;
use serde::{Deserialize, Serialize};

// ==========================================
// ForecastData - 月度预测
// ==========================================
// 由基线预测器产出,情景调整器补充 scenario_forecast
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastData {
    pub year_month: YearMonth,
    pub flavor: Flavor,
    pub size: PackSize,
    pub forecast_qty: i64,              // 预测量
    pub baseline_forecast: i64,         // 基线预测
    pub scenario_forecast: Option<i64>, // 情景预测（未做情景调整时为空）
}

impl ForecastData {
    /// 生产计划采用的需求口径: 有情景预测时取情景,否则取基线
    pub fn planning_qty(&self) -> i64 {
        self.scenario_forecast.unwrap_or(self.forecast_qty)
    }
}

// ==========================================
// ProductionPlan - 生产计划
// ==========================================
// 与 ForecastData 一一对应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionPlan {
    pub year_month: YearMonth,
    pub flavor: Flavor,
    pub size: PackSize,
    pub baseline_forecast: i64,
    pub scenario_forecast: Option<i64>,
    pub buffer_pct: f64,                // 安全库存百分比
    pub recommended_qty: i64,           // 建议生产量
    pub max_qty: Option<i64>,           // 产能上限
    pub capacity_violation_flag: bool,  // 是否被产能截断
    pub note: Option<String>,           // 说明（产能截断原因）
}
