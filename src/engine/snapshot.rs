// ==========================================
// 销售预测与生产计划 - 计划快照编排
// ==========================================
// 职责: 串联 生成 → 预测 → 情景 → 生产 → 告警 → 汇总
// 输出: 不可变的 PlanningSnapshot,由组合根构建一次后按引用共享
// ==========================================

use crate::config::planning_config::PlanningConfig;
use crate::domain::alert::Alert;
use crate::domain::forecast::{ForecastData, ProductionPlan};
use crate::domain::sales::{PromoMonthly, SalesMonthly, MAX_SALES_QTY};
use crate::domain::summary::GlobalSummary;
use crate::domain::year_month::YearMonth;
use crate::engine::alert_engine::AlertEngine;
use crate::engine::baseline::BaselineForecaster;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::production::ProductionPlanner;
use crate::engine::promo_generator::PromoGenerator;
use crate::engine::sales_generator::SalesGenerator;
use crate::engine::scenario::ScenarioAdjuster;
use crate::engine::summary::SummaryAggregator;
use serde::Serialize;
use tracing::{info, instrument};

// ==========================================
// PlanningSnapshot - 计划快照
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct PlanningSnapshot {
    config: PlanningConfig,
    sales: Vec<SalesMonthly>,
    promos: Vec<PromoMonthly>,
    forecasts: Vec<ForecastData>,
    production_plans: Vec<ProductionPlan>,
    alerts: Vec<Alert>,
    summary: GlobalSummary,
}

impl PlanningSnapshot {
    /// 以演示数据构建快照（确定性种子）
    pub fn build(config: &PlanningConfig) -> EngineResult<Self> {
        let sales = SalesGenerator::new().generate(config.anchor_month);
        let promos = PromoGenerator::new().generate(config.anchor_month);
        Self::from_series(config, sales, promos)
    }

    /// 以外部销量/促销（如导入文件）构建快照
    #[instrument(skip_all, fields(anchor = %config.anchor_month, sales = sales.len(), promos = promos.len()))]
    pub fn from_series(
        config: &PlanningConfig,
        sales: Vec<SalesMonthly>,
        promos: Vec<PromoMonthly>,
    ) -> EngineResult<Self> {
        config.validate()?;

        check_sales(&sales)?;

        // 1. 基线预测
        let baseline = BaselineForecaster::new(config.horizon)?.forecast(&sales, config.anchor_month)?;

        // 2. 情景调整（可选）
        let forecasts = match config.scenario_uplift_pct {
            Some(uplift) => ScenarioAdjuster::new(uplift)?.apply(&baseline),
            None => baseline,
        };

        // 3. 生产计划
        let planner =
            ProductionPlanner::new(config.safety_stock_pct, config.capacity_limit, config.moq)?;
        let production_plans = planner.plan(&forecasts)?;

        // 4. 告警
        let alerts = AlertEngine::new(config.alert_thresholds.clone())
            .generate(&sales, &forecasts, &promos);

        // 5. 汇总
        let summary = SummaryAggregator::new().summarize(
            &sales,
            &forecasts,
            &production_plans,
            config.anchor_month,
        );

        info!(
            forecasts = forecasts.len(),
            plans = production_plans.len(),
            alerts = alerts.len(),
            risk_badge = %summary.risk_badge,
            "计划快照构建完成"
        );

        Ok(Self {
            config: config.clone(),
            sales,
            promos,
            forecasts,
            production_plans,
            alerts,
            summary,
        })
    }

    pub fn config(&self) -> &PlanningConfig {
        &self.config
    }

    pub fn anchor_month(&self) -> YearMonth {
        self.config.anchor_month
    }

    pub fn sales(&self) -> &[SalesMonthly] {
        &self.sales
    }

    pub fn promos(&self) -> &[PromoMonthly] {
        &self.promos
    }

    pub fn forecasts(&self) -> &[ForecastData] {
        &self.forecasts
    }

    pub fn production_plans(&self) -> &[ProductionPlan] {
        &self.production_plans
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn summary(&self) -> &GlobalSummary {
        &self.summary
    }

    /// 最近实际月
    pub fn latest_actual_month(&self) -> Option<YearMonth> {
        self.sales.iter().map(|s| s.year_month).max()
    }
}

/// 销量须在 [0, MAX_SALES_QTY] 内,且全量合计不溢出 i64
fn check_sales(sales: &[SalesMonthly]) -> EngineResult<()> {
    let mut total: i64 = 0;
    for s in sales {
        if !(0..=MAX_SALES_QTY).contains(&s.sales_qty) {
            return Err(EngineError::InconsistentData(format!(
                "销量超出范围 [0, {}]: {} {} {} = {}",
                MAX_SALES_QTY, s.year_month, s.flavor, s.size, s.sales_qty
            )));
        }
        total = total.checked_add(s.sales_qty).ok_or_else(|| {
            EngineError::InconsistentData(format!("销量合计溢出: {} 条记录", sales.len()))
        })?;
    }
    Ok(())
}
