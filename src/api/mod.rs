// ==========================================
// 销售预测与生产计划 - API 层
// ==========================================
// 职责: 面向调用方的查询/操作接口,统一错误类型
// ==========================================

pub mod analytics;
pub mod dashboard_api;
pub mod error;
pub mod filter;
pub mod filter_sync;
pub mod planning_api;

// 重导出
pub use dashboard_api::{DashboardApi, FlavorBreakdown, MonthlySeriesPoint, SizeBreakdown};
pub use error::{ApiError, ApiResult};
pub use filter::{FilterOptions, PlanningFilter};
pub use filter_sync::{FetchState, FilterSync};
pub use planning_api::{ImportedSnapshot, PlanningApi};
