// ==========================================
// 销售预测与生产计划 - 驾驶舱过滤条件
// ==========================================
// 职责: 过滤条件定义 + 级联选项（口味 → 规格 → 渠道）
// 说明: 渠道仅作用于实际销量；预测与计划不区分渠道
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::sales::PromoMonthly;
use crate::domain::types::{Channel, Flavor, PackSize};
use crate::domain::year_month::YearMonth;
use crate::engine::snapshot::PlanningSnapshot;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

// ==========================================
// PlanningFilter - 过滤条件
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanningFilter {
    pub flavor: Option<Flavor>,
    pub size: Option<PackSize>,
    pub channel: Option<Channel>,
    pub from: Option<YearMonth>,
    pub to: Option<YearMonth>,
    /// 仅保留有促销的 (月份, 口味, 规格)
    #[serde(default)]
    pub promo_only: bool,
}

impl PlanningFilter {
    pub fn validate(&self) -> ApiResult<()> {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                return Err(ApiError::InvalidInput(format!(
                    "起始月 {} 晚于结束月 {}",
                    from, to
                )));
            }
        }
        Ok(())
    }

    pub fn matches_pair(&self, flavor: Flavor, size: PackSize) -> bool {
        self.flavor.map_or(true, |f| f == flavor) && self.size.map_or(true, |s| s == size)
    }

    pub fn matches_month(&self, month: YearMonth) -> bool {
        self.from.map_or(true, |from| month >= from) && self.to.map_or(true, |to| month <= to)
    }

    pub fn matches_channel(&self, channel: Channel) -> bool {
        self.channel.map_or(true, |c| c == channel)
    }
}

/// 有促销的 (月份, 口味, 规格) 集合
pub(crate) fn promo_keys(promos: &[PromoMonthly]) -> HashSet<(YearMonth, Flavor, PackSize)> {
    promos
        .iter()
        .filter(|p| p.promo_flag)
        .map(|p| (p.year_month, p.flavor, p.size))
        .collect()
}

// ==========================================
// FilterOptions - 级联选项
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub flavors: Vec<Flavor>,
    pub sizes: Vec<PackSize>,
    pub channels: Vec<Channel>,
    pub months: Vec<YearMonth>,
}

impl FilterOptions {
    /// 根据已选条件计算下一级可选项
    ///
    /// - flavors: 全部出现过的口味
    /// - sizes: 已选口味下出现过的规格
    /// - channels: 已选口味+规格下出现过的渠道
    /// - months: 实际月与预测月并集
    pub fn cascade(snapshot: &PlanningSnapshot, filter: &PlanningFilter) -> Self {
        let sales = snapshot.sales();

        let flavors: BTreeSet<Flavor> = sales.iter().map(|s| s.flavor).collect();

        let sizes: BTreeSet<PackSize> = sales
            .iter()
            .filter(|s| filter.flavor.map_or(true, |f| f == s.flavor))
            .map(|s| s.size)
            .collect();

        let channels: BTreeSet<Channel> = sales
            .iter()
            .filter(|s| filter.matches_pair(s.flavor, s.size))
            .map(|s| s.channel)
            .collect();

        let months: BTreeSet<YearMonth> = sales
            .iter()
            .map(|s| s.year_month)
            .chain(snapshot.forecasts().iter().map(|f| f.year_month))
            .collect();

        Self {
            flavors: flavors.into_iter().collect(),
            sizes: sizes.into_iter().collect(),
            channels: channels.into_iter().collect(),
            months: months.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::planning_config::PlanningConfig;
    use crate::domain::sales::SalesMonthly;

    fn sale(flavor: Flavor, size: PackSize, channel: Channel) -> SalesMonthly {
        SalesMonthly {
            year_month: YearMonth::new(2025, 1).unwrap(),
            flavor,
            size,
            sales_qty: 10,
            channel,
        }
    }

    #[test]
    fn test_cascade_narrows_by_selection() {
        let config = PlanningConfig::with_anchor(YearMonth::new(2025, 2).unwrap());
        let sales = vec![
            sale(Flavor::Mango, PackSize::Ml200, Channel::ECommerce),
            sale(Flavor::Mango, PackSize::Ml400, Channel::ModernTrade),
            sale(Flavor::Coffee, PackSize::Ml1000, Channel::FoodService),
        ];
        let snapshot = PlanningSnapshot::from_series(&config, sales, vec![]).unwrap();

        let all = FilterOptions::cascade(&snapshot, &PlanningFilter::default());
        assert_eq!(all.flavors, vec![Flavor::Mango, Flavor::Coffee]);
        assert_eq!(all.sizes.len(), 3);

        let mango = PlanningFilter {
            flavor: Some(Flavor::Mango),
            ..Default::default()
        };
        let opts = FilterOptions::cascade(&snapshot, &mango);
        assert_eq!(opts.sizes, vec![PackSize::Ml200, PackSize::Ml400]);
        assert_eq!(opts.channels, vec![Channel::ModernTrade, Channel::ECommerce]);

        let mango_200 = PlanningFilter {
            size: Some(PackSize::Ml200),
            ..mango
        };
        let opts = FilterOptions::cascade(&snapshot, &mango_200);
        assert_eq!(opts.channels, vec![Channel::ECommerce]);
        assert_eq!(opts.months.first(), YearMonth::new(2025, 1).as_ref());
    }

    #[test]
    fn test_reversed_range_invalid() {
        let filter = PlanningFilter {
            from: YearMonth::new(2025, 5),
            to: YearMonth::new(2025, 1),
            ..Default::default()
        };
        assert!(matches!(filter.validate(), Err(ApiError::InvalidInput(_))));
    }
}
