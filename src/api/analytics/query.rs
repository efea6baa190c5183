// ==========================================
// 分析服务客户端 - 查询参数
// ==========================================
// 序列化为 query string: date_from / date_to / product / flavor / size / customer / promotion
// ==========================================

use crate::api::analytics::error::{AnalyticsError, AnalyticsResult};
use crate::domain::types::{Flavor, PackSize};
use crate::domain::year_month::YearMonth;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsQuery {
    pub date_from: Option<YearMonth>,
    pub date_to: Option<YearMonth>,
    pub product: Option<String>,
    pub flavor: Option<Flavor>,
    pub size: Option<PackSize>,
    pub customer: Option<String>,
    pub promotion: Option<bool>,
}

impl AnalyticsQuery {
    /// 时间区间必须有序
    pub fn validate(&self) -> AnalyticsResult<()> {
        if let (Some(from), Some(to)) = (self.date_from, self.date_to) {
            if from > to {
                return Err(AnalyticsError::InvalidQuery(format!(
                    "date_from {} 晚于 date_to {}",
                    from, to
                )));
            }
        }
        Ok(())
    }

    /// 未设置的参数不出现在 query string 中
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(from) = self.date_from {
            pairs.push(("date_from", from.to_string()));
        }
        if let Some(to) = self.date_to {
            pairs.push(("date_to", to.to_string()));
        }
        if let Some(product) = self.product.as_deref().filter(|p| !p.trim().is_empty()) {
            pairs.push(("product", product.trim().to_string()));
        }
        if let Some(flavor) = self.flavor {
            pairs.push(("flavor", flavor.as_str().to_string()));
        }
        if let Some(size) = self.size {
            pairs.push(("size", size.to_string()));
        }
        if let Some(customer) = self.customer.as_deref().filter(|c| !c.trim().is_empty()) {
            pairs.push(("customer", customer.trim().to_string()));
        }
        if let Some(promotion) = self.promotion {
            pairs.push(("promotion", promotion.to_string()));
        }
        pairs
    }
}
