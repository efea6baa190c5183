// ==========================================
// 销售预测与生产计划 - 销售/促销领域模型
// ==========================================
// 职责: 月度销量与月度促销记录
// 红线: 实体创建后只读,不提供更新路径
// ==========================================

use crate::domain::types::{Channel, Flavor, PackSize, PromoType};
use crate::domain::year_month::YearMonth;
use serde::{Deserialize, Serialize};

/// 单条销量记录上限（导入校验与快照编排共用）
pub const MAX_SALES_QTY: i64 = 1_000_000_000_000;

// ==========================================
// SalesMonthly - 月度销量
// ==========================================
// 键: (year_month, flavor, size)；channel 不参与主键
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesMonthly {
    pub year_month: YearMonth, // 月份
    pub flavor: Flavor,        // 口味
    pub size: PackSize,        // 规格
    pub sales_qty: i64,        // 销量（非负）
    pub channel: Channel,      // 渠道
}

impl SalesMonthly {
    /// 是否属于指定口味+规格
    pub fn is_pair(&self, flavor: Flavor, size: PackSize) -> bool {
        self.flavor == flavor && self.size == size
    }
}

// ==========================================
// PromoMonthly - 月度促销
// ==========================================
// 稀疏记录；同一 (月份, 口味, 规格) 允许出现多条
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoMonthly {
    pub year_month: YearMonth,
    pub flavor: Flavor,
    pub size: PackSize,
    pub promo_flag: bool,      // 恒为 true
    pub promo_days: u32,       // 促销天数 5-24
    pub discount_pct: u32,     // 折扣百分比 10-39
    pub promo_type: PromoType, // 促销类型
}
