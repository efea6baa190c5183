// ==========================================
// 销售预测与生产计划 - 告警领域模型
// ==========================================

use crate::domain::types::{AlertType, Flavor, PackSize, Severity};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// Alert - 计划告警
// ==========================================
// 用途: 驾驶舱告警列表,只读
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,                      // 告警ID（ALT-0001 顺序编号）
    pub date: NaiveDate,                 // 告警对应月份的首日
    pub flavor: Flavor,
    pub size: PackSize,
    pub alert_type: AlertType,
    pub severity: Severity,
    pub message: String,                 // 可读说明（已本地化）
    pub recommended_action: Vec<String>, // 建议动作（已本地化）
}
