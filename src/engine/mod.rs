// ==========================================
// 销售预测与生产计划 - 引擎层
// ==========================================
// 职责: 演示数据生成与计划推导,纯同步、确定性
// 红线: Engine 不做 I/O, 非法参数显式报错
// ==========================================

pub mod alert_engine;
pub mod baseline;
pub mod error;
pub mod production;
pub mod promo_generator;
pub mod sales_generator;
pub mod scenario;
pub mod seeded_random;
pub mod snapshot;
pub mod summary;

// 重导出核心引擎
pub use alert_engine::{AlertEngine, AlertThresholds};
pub use baseline::BaselineForecaster;
pub use error::{EngineError, EngineResult};
pub use production::ProductionPlanner;
pub use promo_generator::PromoGenerator;
pub use sales_generator::SalesGenerator;
pub use scenario::ScenarioAdjuster;
pub use seeded_random::SeededRandom;
pub use snapshot::PlanningSnapshot;
pub use summary::SummaryAggregator;
