// ==========================================
// 销售预测与生产计划 - 配置层
// ==========================================
// 职责: 计划参数装配与持久化
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod planning_config;
pub mod planning_config_reader;

// 重导出核心配置
pub use config_manager::{config_keys, ConfigManager};
pub use planning_config::PlanningConfig;
pub use planning_config_reader::PlanningConfigReader;
