// ==========================================
// 销售预测与生产计划 - 告警引擎
// ==========================================
// 职责: 两条独立规则,互不共享状态
//   1. 需求激增: 最近实际月 actual > forecast × 1.3（严格大于）
//   2. 促销冲突: promo_days > 20 且 discount_pct > 20
// 红线: 所有告警必须输出可读原因与建议动作
// ==========================================

use crate::domain::alert::Alert;
use crate::domain::forecast::ForecastData;
use crate::domain::sales::{PromoMonthly, SalesMonthly};
use crate::domain::types::{AlertType, Flavor, PackSize, Severity};
use crate::i18n;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, instrument};

// ==========================================
// AlertThresholds - 告警阈值
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertThresholds {
    pub spike_ratio: f64,             // 激增倍数（默认 1.3）
    pub promo_days_threshold: u32,    // 促销天数阈值（默认 20）
    pub promo_discount_threshold: u32, // 折扣阈值（默认 20）
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            spike_ratio: 1.3,
            promo_days_threshold: 20,
            promo_discount_threshold: 20,
        }
    }
}

const SPIKE_ACTIONS: [&str; 3] = [
    "alert.demand_spike.action_review_forecast",
    "alert.demand_spike.action_raise_safety_stock",
    "alert.demand_spike.action_check_capacity",
];

const PROMO_ACTIONS: [&str; 2] = [
    "alert.promo_conflict.action_align_calendar",
    "alert.promo_conflict.action_limit_discount",
];

// ==========================================
// AlertEngine - 告警引擎
// ==========================================
pub struct AlertEngine {
    thresholds: AlertThresholds,
}

impl AlertEngine {
    pub fn new(thresholds: AlertThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &AlertThresholds {
        &self.thresholds
    }

    /// 生成全部告警（先需求激增,后促销冲突）,ID 顺序编号
    #[instrument(skip_all, fields(sales = sales.len(), forecasts = forecasts.len(), promos = promos.len()))]
    pub fn generate(
        &self,
        sales: &[SalesMonthly],
        forecasts: &[ForecastData],
        promos: &[PromoMonthly],
    ) -> Vec<Alert> {
        let mut alerts = self.demand_spike_alerts(sales, forecasts);
        alerts.extend(self.promo_conflict_alerts(promos));

        for (idx, alert) in alerts.iter_mut().enumerate() {
            alert.id = format!("ALT-{:04}", idx + 1);
        }

        debug!(count = alerts.len(), "告警生成完成");
        alerts
    }

    /// 需求激增告警
    ///
    /// 仅看最近实际月；每个口味×规格取该组合最早的预测月作为对照。
    /// 同一组合在最近月有多条记录（多渠道导入）时合计实际量。
    pub fn demand_spike_alerts(
        &self,
        sales: &[SalesMonthly],
        forecasts: &[ForecastData],
    ) -> Vec<Alert> {
        let Some(latest) = sales.iter().map(|s| s.year_month).max() else {
            return Vec::new();
        };

        let mut actual_by_pair: HashMap<(Flavor, PackSize), i64> = HashMap::new();
        for s in sales.iter().filter(|s| s.year_month == latest) {
            *actual_by_pair.entry((s.flavor, s.size)).or_insert(0) += s.sales_qty;
        }

        let mut first_forecast: HashMap<(Flavor, PackSize), &ForecastData> = HashMap::new();
        for f in forecasts {
            first_forecast
                .entry((f.flavor, f.size))
                .and_modify(|cur| {
                    if f.year_month < cur.year_month {
                        *cur = f;
                    }
                })
                .or_insert(f);
        }

        let mut alerts = Vec::new();
        for flavor in Flavor::ALL {
            for size in PackSize::ALL {
                let (Some(&actual), Some(forecast)) = (
                    actual_by_pair.get(&(flavor, size)),
                    first_forecast.get(&(flavor, size)),
                ) else {
                    continue;
                };

                let forecast_qty = forecast.forecast_qty;
                if !self.is_demand_spike(actual, forecast_qty) {
                    continue;
                }

                let pct = (actual as f64 / forecast_qty as f64 - 1.0) * 100.0;
                let message = i18n::t_with_args(
                    "alert.demand_spike.message",
                    &[
                        ("flavor", flavor.as_str()),
                        ("size", &size.to_string()),
                        ("month", &latest.to_string()),
                        ("pct", &format!("{:.1}", pct)),
                    ],
                );

                alerts.push(Alert {
                    id: String::new(),
                    date: latest.first_day(),
                    flavor,
                    size,
                    alert_type: AlertType::DemandSpike,
                    severity: Severity::High,
                    message,
                    recommended_action: i18n::t_all(&SPIKE_ACTIONS),
                });
            }
        }

        alerts
    }

    /// 促销冲突告警（逐条促销记录判定）
    pub fn promo_conflict_alerts(&self, promos: &[PromoMonthly]) -> Vec<Alert> {
        promos
            .iter()
            .filter(|p| self.is_promo_conflict(p.promo_days, p.discount_pct))
            .map(|p| Alert {
                id: String::new(),
                date: p.year_month.first_day(),
                flavor: p.flavor,
                size: p.size,
                alert_type: AlertType::PromoConflict,
                severity: Severity::Med,
                message: i18n::t_with_args(
                    "alert.promo_conflict.message",
                    &[
                        ("flavor", p.flavor.as_str()),
                        ("size", &p.size.to_string()),
                        ("month", &p.year_month.to_string()),
                        ("days", &p.promo_days.to_string()),
                        ("discount", &p.discount_pct.to_string()),
                    ],
                ),
                recommended_action: i18n::t_all(&PROMO_ACTIONS),
            })
            .collect()
    }

    /// actual > forecast × ratio（严格大于）
    pub fn is_demand_spike(&self, actual: i64, forecast: i64) -> bool {
        actual as f64 > forecast as f64 * self.thresholds.spike_ratio
    }

    /// promo_days > 阈值 且 discount_pct > 阈值
    pub fn is_promo_conflict(&self, promo_days: u32, discount_pct: u32) -> bool {
        promo_days > self.thresholds.promo_days_threshold
            && discount_pct > self.thresholds.promo_discount_threshold
    }
}

impl Default for AlertEngine {
    fn default() -> Self {
        Self::new(AlertThresholds::default())
    }
}
