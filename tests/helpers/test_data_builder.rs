// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

#![allow(dead_code)]

use sales_planning::{Channel, Flavor, PackSize, PromoMonthly, PromoType, SalesMonthly, YearMonth};

// ==========================================
// SalesMonthly 构建器
// ==========================================

pub struct SalesBuilder {
    year_month: YearMonth,
    flavor: Flavor,
    size: PackSize,
    sales_qty: i64,
    channel: Channel,
}

impl SalesBuilder {
    pub fn new(year_month: &str) -> Self {
        Self {
            year_month: year_month.parse().expect("invalid year_month"),
            flavor: Flavor::Original,
            size: PackSize::Ml200,
            sales_qty: 1000,
            channel: Channel::ModernTrade,
        }
    }

    pub fn flavor(mut self, flavor: Flavor) -> Self {
        self.flavor = flavor;
        self
    }

    pub fn size(mut self, size: PackSize) -> Self {
        self.size = size;
        self
    }

    pub fn qty(mut self, qty: i64) -> Self {
        self.sales_qty = qty;
        self
    }

    pub fn channel(mut self, channel: Channel) -> Self {
        self.channel = channel;
        self
    }

    pub fn build(self) -> SalesMonthly {
        SalesMonthly {
            year_month: self.year_month,
            flavor: self.flavor,
            size: self.size,
            sales_qty: self.sales_qty,
            channel: self.channel,
        }
    }
}

/// 连续月份的销量序列（同一口味×规格）
pub fn monthly_series(start: &str, qtys: &[i64], flavor: Flavor, size: PackSize) -> Vec<SalesMonthly> {
    let start: YearMonth = start.parse().expect("invalid start month");
    qtys.iter()
        .enumerate()
        .map(|(i, qty)| SalesMonthly {
            year_month: start.add_months(i as i32),
            flavor,
            size,
            sales_qty: *qty,
            channel: Channel::ModernTrade,
        })
        .collect()
}

// ==========================================
// PromoMonthly 构建器
// ==========================================

pub struct PromoBuilder {
    year_month: YearMonth,
    flavor: Flavor,
    size: PackSize,
    promo_days: u32,
    discount_pct: u32,
    promo_type: PromoType,
}

impl PromoBuilder {
    pub fn new(year_month: &str) -> Self {
        Self {
            year_month: year_month.parse().expect("invalid year_month"),
            flavor: Flavor::Original,
            size: PackSize::Ml200,
            promo_days: 10,
            discount_pct: 15,
            promo_type: PromoType::PriceOff,
        }
    }

    pub fn flavor(mut self, flavor: Flavor) -> Self {
        self.flavor = flavor;
        self
    }

    pub fn size(mut self, size: PackSize) -> Self {
        self.size = size;
        self
    }

    pub fn days(mut self, days: u32) -> Self {
        self.promo_days = days;
        self
    }

    pub fn discount(mut self, pct: u32) -> Self {
        self.discount_pct = pct;
        self
    }

    pub fn build(self) -> PromoMonthly {
        PromoMonthly {
            year_month: self.year_month,
            flavor: self.flavor,
            size: self.size,
            promo_flag: true,
            promo_days: self.promo_days,
            discount_pct: self.discount_pct,
            promo_type: self.promo_type,
        }
    }
}
