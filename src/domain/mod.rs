// ==========================================
// 销售预测与生产计划 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod alert;
pub mod forecast;
pub mod import;
pub mod sales;
pub mod summary;
pub mod types;
pub mod year_month;

// 重导出核心类型
pub use alert::Alert;
pub use forecast::{ForecastData, ProductionPlan};
pub use import::{DqLevel, DqReport, DqSummary, DqViolation, RawSalesRecord, SalesImportResult};
pub use sales::{PromoMonthly, SalesMonthly};
pub use summary::GlobalSummary;
pub use types::{AlertType, Channel, Flavor, PackSize, PromoType, RiskBadge, Severity};
pub use year_month::YearMonth;
