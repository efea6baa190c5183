// ==========================================
// 销售预测与生产计划 - 外部分析服务客户端
// ==========================================
// 端点: /dashboard/summary, /analytics/summary, /analytics/deep-dive,
//       /scoring/upload, /scoring/run/{id}
// ==========================================

pub mod client;
pub mod dto;
pub mod error;
pub mod query;
pub mod source;

pub use client::AnalyticsClient;
pub use dto::{
    AnalyticsSummaryResponse, BreakdownItem, DashboardSummaryResponse, DeepDiveResponse, KpiSet,
    MonthlyPoint, ScoredRow, ScoringRunResponse, ScoringStatus, ScoringUploadResponse,
};
pub use error::{AnalyticsError, AnalyticsResult};
pub use query::AnalyticsQuery;
pub use source::AnalyticsSource;
