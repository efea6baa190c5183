// ==========================================
// 销售预测与生产计划 - 驾驶舱 API
// ==========================================
// 职责: 基于不可变 PlanningSnapshot 的聚合查询
// 架构: 组合根构建一次快照,DashboardApi 按 Arc 共享只读访问
// ==========================================

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::api::filter::{promo_keys, FilterOptions, PlanningFilter};
use crate::domain::alert::Alert;
use crate::domain::forecast::{ForecastData, ProductionPlan};
use crate::domain::sales::SalesMonthly;
use crate::domain::summary::GlobalSummary;
use crate::domain::types::{Flavor, PackSize, Severity};
use crate::domain::year_month::YearMonth;
use crate::engine::snapshot::PlanningSnapshot;

// ==========================================
// 响应结构
// ==========================================

/// 月度序列点（实际月只有 actual,预测月只有 forecast）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySeriesPoint {
    pub year_month: YearMonth,
    pub actual: Option<i64>,
    pub forecast: Option<i64>,
}

/// 按口味汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlavorBreakdown {
    pub flavor: Flavor,
    pub actual_qty: i64,
    pub forecast_qty: i64,
    pub share_pct: f64, // 实际销量占比
}

/// 口味下钻到规格
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeBreakdown {
    pub size: PackSize,
    pub actual_qty: i64,
    pub forecast_qty: i64,
    pub recommended_qty: i64,
}

// ==========================================
// DashboardApi - 驾驶舱 API
// ==========================================
pub struct DashboardApi {
    snapshot: Arc<PlanningSnapshot>,
}

impl DashboardApi {
    pub fn new(snapshot: Arc<PlanningSnapshot>) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &PlanningSnapshot {
        &self.snapshot
    }

    /// 头部 KPI
    pub fn summary(&self) -> GlobalSummary {
        self.snapshot.summary().clone()
    }

    // ==========================================
    // 过滤辅助
    // ==========================================

    fn filtered_sales<'a>(&'a self, filter: &'a PlanningFilter) -> impl Iterator<Item = &'a SalesMonthly> + 'a {
        let promos = filter
            .promo_only
            .then(|| promo_keys(self.snapshot.promos()));
        self.snapshot.sales().iter().filter(move |s| {
            filter.matches_pair(s.flavor, s.size)
                && filter.matches_month(s.year_month)
                && filter.matches_channel(s.channel)
                && promos
                    .as_ref()
                    .map_or(true, |keys| keys.contains(&(s.year_month, s.flavor, s.size)))
        })
    }

    fn filtered_forecasts<'a>(&'a self, filter: &'a PlanningFilter) -> impl Iterator<Item = &'a ForecastData> + 'a {
        let promos = filter
            .promo_only
            .then(|| promo_keys(self.snapshot.promos()));
        self.snapshot.forecasts().iter().filter(move |f| {
            filter.matches_pair(f.flavor, f.size)
                && filter.matches_month(f.year_month)
                && promos
                    .as_ref()
                    .map_or(true, |keys| keys.contains(&(f.year_month, f.flavor, f.size)))
        })
    }

    // ==========================================
    // 查询接口
    // ==========================================

    /// 月度实际/预测合计（按月份升序）
    pub fn monthly_series(&self, filter: &PlanningFilter) -> ApiResult<Vec<MonthlySeriesPoint>> {
        filter.validate()?;

        let mut actual: BTreeMap<YearMonth, i64> = BTreeMap::new();
        for s in self.filtered_sales(filter) {
            add_to(actual.entry(s.year_month).or_insert(0), s.sales_qty);
        }

        let mut forecast: BTreeMap<YearMonth, i64> = BTreeMap::new();
        for f in self.filtered_forecasts(filter) {
            add_to(forecast.entry(f.year_month).or_insert(0), f.planning_qty());
        }

        let months: std::collections::BTreeSet<YearMonth> =
            actual.keys().chain(forecast.keys()).copied().collect();

        Ok(months
            .into_iter()
            .map(|m| MonthlySeriesPoint {
                year_month: m,
                actual: actual.get(&m).copied(),
                forecast: forecast.get(&m).copied(),
            })
            .collect())
    }

    /// 按口味汇总（按实际销量降序）
    pub fn breakdown_by_flavor(&self, filter: &PlanningFilter) -> ApiResult<Vec<FlavorBreakdown>> {
        filter.validate()?;

        let mut totals: BTreeMap<Flavor, (i64, i64)> = BTreeMap::new();
        for s in self.filtered_sales(filter) {
            add_to(&mut totals.entry(s.flavor).or_insert((0, 0)).0, s.sales_qty);
        }
        for f in self.filtered_forecasts(filter) {
            add_to(&mut totals.entry(f.flavor).or_insert((0, 0)).1, f.planning_qty());
        }

        let grand_actual = totals.values().map(|(a, _)| *a as f64).sum::<f64>();
        let mut rows: Vec<FlavorBreakdown> = totals
            .into_iter()
            .map(|(flavor, (actual_qty, forecast_qty))| FlavorBreakdown {
                flavor,
                actual_qty,
                forecast_qty,
                share_pct: if grand_actual > 0.0 {
                    actual_qty as f64 / grand_actual * 100.0
                } else {
                    0.0
                },
            })
            .collect();

        // 稳定排序: 同量时保持口味目录顺序
        rows.sort_by(|a, b| b.actual_qty.cmp(&a.actual_qty));
        Ok(rows)
    }

    /// 口味下钻到规格
    pub fn drill_down(&self, flavor: Flavor, filter: &PlanningFilter) -> ApiResult<Vec<SizeBreakdown>> {
        if filter.flavor.is_some_and(|f| f != flavor) {
            return Err(ApiError::InvalidInput(format!(
                "下钻口味 {} 与过滤口味不一致",
                flavor
            )));
        }
        let scoped = PlanningFilter {
            flavor: Some(flavor),
            ..filter.clone()
        };
        scoped.validate()?;

        let mut totals: BTreeMap<PackSize, SizeBreakdown> = PackSize::ALL
            .iter()
            .filter(|s| scoped.size.map_or(true, |x| x == **s))
            .map(|s| {
                (
                    *s,
                    SizeBreakdown {
                        size: *s,
                        actual_qty: 0,
                        forecast_qty: 0,
                        recommended_qty: 0,
                    },
                )
            })
            .collect();

        for s in self.filtered_sales(&scoped) {
            if let Some(row) = totals.get_mut(&s.size) {
                add_to(&mut row.actual_qty, s.sales_qty);
            }
        }
        for f in self.filtered_forecasts(&scoped) {
            if let Some(row) = totals.get_mut(&f.size) {
                add_to(&mut row.forecast_qty, f.planning_qty());
            }
        }
        for p in self.filter_plans(&scoped) {
            if let Some(row) = totals.get_mut(&p.size) {
                add_to(&mut row.recommended_qty, p.recommended_qty);
            }
        }

        Ok(totals.into_values().collect())
    }

    /// 告警列表（可按最低严重度过滤）,按严重度降序、编号升序
    ///
    /// 告警月份取告警日期所在月；渠道不适用于告警
    pub fn list_alerts(
        &self,
        filter: &PlanningFilter,
        min_severity: Option<Severity>,
    ) -> ApiResult<Vec<Alert>> {
        filter.validate()?;

        let promos = filter
            .promo_only
            .then(|| promo_keys(self.snapshot.promos()));
        let mut alerts: Vec<Alert> = self
            .snapshot
            .alerts()
            .iter()
            .filter(|a| {
                let month = YearMonth::from_date(a.date);
                filter.matches_pair(a.flavor, a.size)
                    && filter.matches_month(month)
                    && promos
                        .as_ref()
                        .map_or(true, |keys| keys.contains(&(month, a.flavor, a.size)))
            })
            .filter(|a| min_severity.map_or(true, |min| a.severity >= min))
            .cloned()
            .collect();

        alerts.sort_by(|a, b| b.severity.cmp(&a.severity).then_with(|| a.id.cmp(&b.id)));
        Ok(alerts)
    }

    fn filter_plans<'a>(&'a self, filter: &'a PlanningFilter) -> impl Iterator<Item = &'a ProductionPlan> + 'a {
        let promos: Option<HashSet<_>> = filter
            .promo_only
            .then(|| promo_keys(self.snapshot.promos()));
        self.snapshot.production_plans().iter().filter(move |p| {
            filter.matches_pair(p.flavor, p.size)
                && filter.matches_month(p.year_month)
                && promos
                    .as_ref()
                    .map_or(true, |keys| keys.contains(&(p.year_month, p.flavor, p.size)))
        })
    }

    /// 生产计划明细
    pub fn production_plan(&self, filter: &PlanningFilter) -> ApiResult<Vec<ProductionPlan>> {
        filter.validate()?;
        Ok(self.filter_plans(filter).cloned().collect())
    }

    /// 级联过滤选项
    pub fn filter_options(&self, filter: &PlanningFilter) -> ApiResult<FilterOptions> {
        filter.validate()?;
        Ok(FilterOptions::cascade(&self.snapshot, filter))
    }
}

fn add_to(total: &mut i64, qty: i64) {
    *total = total.saturating_add(qty);
}
