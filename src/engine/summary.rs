// ==========================================
// 销售预测与生产计划 - 汇总聚合器
// ==========================================
// 职责: 驾驶舱头部 KPI
// 输入: 销量 + 预测 + 生产计划
// 输出: GlobalSummary
// ==========================================
// 注意: volatility = (上月实际 / 近12月月均) mod 0.3
//       该值为取模启发式,不是变异系数,仅用于徽章分档
// ==========================================

use crate::domain::forecast::{ForecastData, ProductionPlan};
use crate::domain::sales::SalesMonthly;
use crate::domain::summary::GlobalSummary;
use crate::domain::types::RiskBadge;
use crate::domain::year_month::YearMonth;
use std::collections::BTreeMap;
use tracing::debug;

/// 月均窗口（月）
pub const TRAILING_AVERAGE_MONTHS: usize = 12;

const VOLATILITY_MODULUS: f64 = 0.3;
const LOW_THRESHOLD: f64 = 0.1;
const MED_THRESHOLD: f64 = 0.2;

// ==========================================
// SummaryAggregator - 汇总聚合器
// ==========================================
pub struct SummaryAggregator;

impl SummaryAggregator {
    pub fn new() -> Self {
        Self
    }

    /// 汇总 KPI
    ///
    /// - last_month_actual: 最近实际月销量合计
    /// - next_month_forecast: 锚定月预测合计
    /// - recommended_production: 锚定月建议生产合计
    /// - risk_badge: 波动代理值分档（< 0.1 Low, < 0.2 Med, 其余 High）
    ///
    /// 合计超出 i64 时饱和
    pub fn summarize(
        &self,
        sales: &[SalesMonthly],
        forecasts: &[ForecastData],
        plans: &[ProductionPlan],
        anchor: YearMonth,
    ) -> GlobalSummary {
        let monthly_totals = monthly_totals(sales);

        let last_month_actual = monthly_totals.values().next_back().copied().unwrap_or(0);

        let next_month_forecast = sum_for_month(forecasts, anchor, |f| f.year_month, |f| f.forecast_qty);
        let recommended_production =
            sum_for_month(plans, anchor, |p| p.year_month, |p| p.recommended_qty);

        let volatility = volatility(last_month_actual, &monthly_totals);
        let risk_badge = badge_for(volatility);

        debug!(
            last_month_actual,
            next_month_forecast,
            recommended_production,
            volatility,
            %risk_badge,
            "KPI 汇总完成"
        );

        GlobalSummary {
            last_month_actual,
            next_month_forecast,
            recommended_production,
            risk_badge,
            volatility,
        }
    }
}

impl Default for SummaryAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// 按月合计销量（按月份升序,饱和加法）
pub fn monthly_totals(sales: &[SalesMonthly]) -> BTreeMap<YearMonth, i64> {
    let mut totals = BTreeMap::new();
    for s in sales {
        let total: &mut i64 = totals.entry(s.year_month).or_insert(0);
        *total = total.saturating_add(s.sales_qty);
    }
    totals
}

/// 波动代理值: (上月实际 / 近 12 个月月均) mod 0.3
///
/// 无销量或月均为 0 时返回 0
pub fn volatility(last_month_actual: i64, monthly_totals: &BTreeMap<YearMonth, i64>) -> f64 {
    let trailing: Vec<i64> = monthly_totals
        .values()
        .rev()
        .take(TRAILING_AVERAGE_MONTHS)
        .copied()
        .collect();
    if trailing.is_empty() {
        return 0.0;
    }

    let average = trailing.iter().map(|q| *q as f64).sum::<f64>() / trailing.len() as f64;
    if average <= 0.0 {
        return 0.0;
    }

    (last_month_actual as f64 / average) % VOLATILITY_MODULUS
}

/// 波动代理值分档
pub fn badge_for(volatility: f64) -> RiskBadge {
    if volatility < LOW_THRESHOLD {
        RiskBadge::Low
    } else if volatility < MED_THRESHOLD {
        RiskBadge::Med
    } else {
        RiskBadge::High
    }
}

fn sum_for_month<T>(
    items: &[T],
    month: YearMonth,
    month_of: impl Fn(&T) -> YearMonth,
    qty_of: impl Fn(&T) -> i64,
) -> i64 {
    items
        .iter()
        .filter(|i| month_of(*i) == month)
        .map(qty_of)
        .fold(0i64, i64::saturating_add)
}
