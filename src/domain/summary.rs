// ==========================================
// 销售预测与生产计划 - 全局汇总
// ==========================================

use crate::domain::types::RiskBadge;
use serde::{Deserialize, Serialize};

// ==========================================
// GlobalSummary - 驾驶舱头部指标
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalSummary {
    pub last_month_actual: i64,      // 上月实际销量合计
    pub next_month_forecast: i64,    // 下月预测合计
    pub recommended_production: i64, // 下月建议生产合计
    pub risk_badge: RiskBadge,       // 风险徽章
    pub volatility: f64,             // 波动代理值（取模启发式,非统计量）
}
