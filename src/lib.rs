// ==========================================
// 销售预测与生产计划 - 核心库
// ==========================================
// 技术栈: Rust + SQLite + reqwest
// 系统定位: 决策支持（预测与建议,人工最终决定）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 数据生成与计划推导
pub mod engine;

// 配置层 - 计划参数
pub mod config;

// 导入层 - 外部销量文件
pub mod importer;

// 数据仓储层 - 运行记录
pub mod repository;

// API 层 - 查询接口与外部分析服务
pub mod api;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{AlertType, Channel, Flavor, PackSize, PromoType, RiskBadge, Severity};

// 领域实体
pub use domain::{
    Alert, ForecastData, GlobalSummary, ProductionPlan, PromoMonthly, SalesMonthly, YearMonth,
};

// 引擎
pub use engine::{
    AlertEngine, BaselineForecaster, EngineError, PlanningSnapshot, ProductionPlanner,
    PromoGenerator, SalesGenerator, ScenarioAdjuster, SeededRandom, SummaryAggregator,
};

// 配置
pub use config::{ConfigManager, PlanningConfig, PlanningConfigReader};

// API
pub use api::{ApiError, DashboardApi, PlanningApi, PlanningFilter};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "销售预测与生产计划";
