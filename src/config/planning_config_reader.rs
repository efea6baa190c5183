// ==========================================
// 销售预测与生产计划 - 计划参数读取 Trait
// ==========================================
// 职责: 定义计划流水线所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::planning_config::PlanningConfig;
use crate::domain::year_month::YearMonth;
use crate::engine::alert_engine::AlertThresholds;
use async_trait::async_trait;
use std::error::Error;

// ==========================================
// PlanningConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait PlanningConfigReader: Send + Sync {
    /// 锚定月；未配置时为当前本地月
    async fn get_anchor_month(&self) -> Result<YearMonth, Box<dyn Error + Send + Sync>>;

    /// 预测期数（默认 6）
    async fn get_forecast_horizon(&self) -> Result<u32, Box<dyn Error + Send + Sync>>;

    /// 安全库存百分比（默认 15）
    async fn get_safety_stock_pct(&self) -> Result<f64, Box<dyn Error + Send + Sync>>;

    /// 情景增减百分比（未配置 = 不做情景调整）
    async fn get_scenario_uplift_pct(&self) -> Result<Option<f64>, Box<dyn Error + Send + Sync>>;

    /// 单月单品产能上限（未配置 = 不限）
    async fn get_capacity_limit(&self) -> Result<Option<i64>, Box<dyn Error + Send + Sync>>;

    /// 最小起订量（未配置 = 不取整）
    async fn get_moq(&self) -> Result<Option<i64>, Box<dyn Error + Send + Sync>>;

    /// 告警阈值
    async fn get_alert_thresholds(&self) -> Result<AlertThresholds, Box<dyn Error + Send + Sync>>;

    /// 装配并校验完整的计划参数
    async fn load_planning_config(&self) -> Result<PlanningConfig, Box<dyn Error + Send + Sync>> {
        let config = PlanningConfig {
            anchor_month: self.get_anchor_month().await?,
            horizon: self.get_forecast_horizon().await?,
            safety_stock_pct: self.get_safety_stock_pct().await?,
            scenario_uplift_pct: self.get_scenario_uplift_pct().await?,
            capacity_limit: self.get_capacity_limit().await?,
            moq: self.get_moq().await?,
            alert_thresholds: self.get_alert_thresholds().await?,
        };
        config.validate()?;
        Ok(config)
    }
}
