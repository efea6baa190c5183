// ==========================================
// 分析服务客户端 - 响应 DTO
// ==========================================
// 规则: 每个响应在边界处 validate(),不合法数据不进入业务层
// 月份字段统一为 "YYYY-MM"
// ==========================================

use crate::api::analytics::error::{AnalyticsError, AnalyticsResult};
use crate::domain::year_month::YearMonth;
use serde::{Deserialize, Serialize};

fn ensure_finite(endpoint: &str, field: &str, value: f64) -> AnalyticsResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(AnalyticsError::invalid_response(
            endpoint,
            format!("{} 不是有限数值: {}", field, value),
        ))
    }
}

fn ensure_month(endpoint: &str, month: &str) -> AnalyticsResult<YearMonth> {
    // 仅接受 YYYY-MM
    let well_formed = month.len() == 7 && month.as_bytes().get(4) == Some(&b'-');
    if !well_formed {
        return Err(AnalyticsError::invalid_response(
            endpoint,
            format!("月份格式应为 YYYY-MM: {}", month),
        ));
    }
    month
        .parse::<YearMonth>()
        .map_err(|e| AnalyticsError::invalid_response(endpoint, e))
}

fn ensure_non_empty(endpoint: &str, field: &str, value: &str) -> AnalyticsResult<()> {
    if value.trim().is_empty() {
        return Err(AnalyticsError::invalid_response(endpoint, format!("{} 为空", field)));
    }
    Ok(())
}

// ==========================================
// 共享结构
// ==========================================

/// 头部 KPI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSet {
    pub total_sales: f64,
    pub forecast_next_month: f64,
    #[serde(default)]
    pub growth_pct: Option<f64>,
    /// 预测准确度（WAPE,百分比）
    #[serde(default)]
    pub wape: Option<f64>,
}

impl KpiSet {
    fn validate(&self, endpoint: &str) -> AnalyticsResult<()> {
        ensure_finite(endpoint, "total_sales", self.total_sales)?;
        ensure_finite(endpoint, "forecast_next_month", self.forecast_next_month)?;
        if let Some(g) = self.growth_pct {
            ensure_finite(endpoint, "growth_pct", g)?;
        }
        if let Some(w) = self.wape {
            ensure_finite(endpoint, "wape", w)?;
            if w < 0.0 {
                return Err(AnalyticsError::invalid_response(endpoint, format!("wape 为负: {}", w)));
            }
        }
        Ok(())
    }
}

/// 月度时间序列点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPoint {
    pub month: String,
    #[serde(default)]
    pub actual: Option<f64>,
    #[serde(default)]
    pub forecast: Option<f64>,
}

/// 分组/排名条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownItem {
    pub key: String,
    pub value: f64,
    #[serde(default)]
    pub share_pct: Option<f64>,
}

fn validate_series(endpoint: &str, series: &[MonthlyPoint]) -> AnalyticsResult<()> {
    let mut previous: Option<YearMonth> = None;
    for point in series {
        let month = ensure_month(endpoint, &point.month)?;
        if previous.is_some_and(|p| p >= month) {
            return Err(AnalyticsError::invalid_response(
                endpoint,
                format!("时间序列未按月份递增: {}", point.month),
            ));
        }
        previous = Some(month);
        for (field, value) in [("actual", point.actual), ("forecast", point.forecast)] {
            if let Some(v) = value {
                ensure_finite(endpoint, field, v)?;
            }
        }
    }
    Ok(())
}

fn validate_breakdown(endpoint: &str, items: &[BreakdownItem]) -> AnalyticsResult<()> {
    for item in items {
        ensure_non_empty(endpoint, "key", &item.key)?;
        ensure_finite(endpoint, "value", item.value)?;
        if let Some(s) = item.share_pct {
            ensure_finite(endpoint, "share_pct", s)?;
        }
    }
    Ok(())
}

// ==========================================
// /dashboard/summary
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummaryResponse {
    pub kpis: KpiSet,
    #[serde(default)]
    pub monthly: Vec<MonthlyPoint>,
    #[serde(default)]
    pub top_products: Vec<BreakdownItem>,
}

impl DashboardSummaryResponse {
    pub const ENDPOINT: &'static str = "/dashboard/summary";

    pub fn validate(&self) -> AnalyticsResult<()> {
        self.kpis.validate(Self::ENDPOINT)?;
        validate_series(Self::ENDPOINT, &self.monthly)?;
        validate_breakdown(Self::ENDPOINT, &self.top_products)
    }
}

// ==========================================
// /analytics/summary
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSummaryResponse {
    pub kpis: KpiSet,
    #[serde(default)]
    pub monthly: Vec<MonthlyPoint>,
    #[serde(default)]
    pub by_flavor: Vec<BreakdownItem>,
    #[serde(default)]
    pub by_size: Vec<BreakdownItem>,
    #[serde(default)]
    pub by_customer: Vec<BreakdownItem>,
}

impl AnalyticsSummaryResponse {
    pub const ENDPOINT: &'static str = "/analytics/summary";

    pub fn validate(&self) -> AnalyticsResult<()> {
        self.kpis.validate(Self::ENDPOINT)?;
        validate_series(Self::ENDPOINT, &self.monthly)?;
        validate_breakdown(Self::ENDPOINT, &self.by_flavor)?;
        validate_breakdown(Self::ENDPOINT, &self.by_size)?;
        validate_breakdown(Self::ENDPOINT, &self.by_customer)
    }
}

// ==========================================
// /analytics/deep-dive
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeepDiveResponse {
    pub dimension: String,
    #[serde(default)]
    pub rows: Vec<BreakdownItem>,
    #[serde(default)]
    pub monthly: Vec<MonthlyPoint>,
}

impl DeepDiveResponse {
    pub const ENDPOINT: &'static str = "/analytics/deep-dive";

    pub fn validate(&self) -> AnalyticsResult<()> {
        ensure_non_empty(Self::ENDPOINT, "dimension", &self.dimension)?;
        validate_breakdown(Self::ENDPOINT, &self.rows)?;
        validate_series(Self::ENDPOINT, &self.monthly)
    }
}

// ==========================================
// /scoring/upload
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringUploadResponse {
    pub run_id: String,
    #[serde(default)]
    pub rows_received: u64,
}

impl ScoringUploadResponse {
    pub const ENDPOINT: &'static str = "/scoring/upload";

    pub fn validate(&self) -> AnalyticsResult<()> {
        ensure_non_empty(Self::ENDPOINT, "run_id", &self.run_id)
    }
}

// ==========================================
// /scoring/run/{id}
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRow {
    pub month: String,
    pub flavor: String,
    pub size: String,
    pub forecast: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringRunResponse {
    pub run_id: String,
    pub status: ScoringStatus,
    #[serde(default)]
    pub wape: Option<f64>,
    #[serde(default)]
    pub results: Vec<ScoredRow>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ScoringRunResponse {
    pub const ENDPOINT: &'static str = "/scoring/run";

    pub fn is_finished(&self) -> bool {
        matches!(self.status, ScoringStatus::Completed | ScoringStatus::Failed)
    }

    pub fn validate(&self) -> AnalyticsResult<()> {
        ensure_non_empty(Self::ENDPOINT, "run_id", &self.run_id)?;
        if let Some(w) = self.wape {
            ensure_finite(Self::ENDPOINT, "wape", w)?;
        }
        for row in &self.results {
            ensure_month(Self::ENDPOINT, &row.month)?;
            ensure_non_empty(Self::ENDPOINT, "flavor", &row.flavor)?;
            ensure_non_empty(Self::ENDPOINT, "size", &row.size)?;
            ensure_finite(Self::ENDPOINT, "forecast", row.forecast)?;
        }
        Ok(())
    }
}
