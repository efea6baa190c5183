// ==========================================
// 销售预测与生产计划 - 导入领域模型
// ==========================================
// 职责: 销量文件导入的中间记录、DQ 报告与导入结果
// ==========================================

use crate::domain::sales::SalesMonthly;
use serde::{Deserialize, Serialize};

// ==========================================
// RawSalesRecord - 字段映射后的原始记录
// ==========================================
// 所有字段保留文本形态,类型校验交给 DqValidator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSalesRecord {
    pub row_number: usize,          // 原始文件行号（数据行从 1 开始）
    pub year_month: Option<String>, // 月份
    pub flavor: Option<String>,     // 口味
    pub size: Option<String>,       // 规格
    pub sales_qty: Option<String>,  // 销量
    pub channel: Option<String>,    // 渠道
}

// ==========================================
// DqLevel - 数据质量级别
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DqLevel {
    Error,   // 错误（该行不导入）
    Warning, // 警告（允许导入）
}

// ==========================================
// DqViolation - 数据质量违规记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DqViolation {
    pub row_number: usize, // 原始文件行号
    pub level: DqLevel,    // 违规级别
    pub field: String,     // 违规字段
    pub message: String,   // 违规描述
}

// ==========================================
// DqSummary - 数据质量汇总
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DqSummary {
    pub total_rows: usize, // 总行数
    pub success: usize,    // 成功导入
    pub blocked: usize,    // 阻断行数（含 ERROR）
    pub warning: usize,    // 警告条数
}

// ==========================================
// DqReport - 数据质量报告
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DqReport {
    pub batch_id: String,
    pub summary: DqSummary,
    pub violations: Vec<DqViolation>,
}

impl DqReport {
    pub fn has_errors(&self) -> bool {
        self.violations.iter().any(|v| v.level == DqLevel::Error)
    }
}

// ==========================================
// SalesImportResult - 导入结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesImportResult {
    pub batch_id: String,
    pub file_name: String,
    pub records: Vec<SalesMonthly>, // 通过校验的记录
    pub dq_report: DqReport,
    pub summary: DqSummary,
    pub elapsed_ms: u64, // 导入耗时
}
