// ==========================================
// 销售预测与生产计划 - 数据质量校验器实现
// ==========================================
// 职责: 字段合法性校验 + 批次内重复检测 + DQ 报告生成
// 规则: ERROR 级违规的行不导入；WARNING 仅记录
// ==========================================

use crate::domain::import::{DqLevel, DqReport, DqSummary, DqViolation, RawSalesRecord};
use crate::domain::sales::{SalesMonthly, MAX_SALES_QTY};
use crate::domain::types::{Channel, Flavor, PackSize};
use crate::domain::year_month::YearMonth;
use crate::importer::sales_importer_trait::DqValidator as DqValidatorTrait;
use std::collections::HashMap;
use std::str::FromStr;

pub struct DqValidator {
    default_channel: Channel, // 渠道缺省时的取值
}

impl DqValidator {
    pub fn new(default_channel: Channel) -> Self {
        Self { default_channel }
    }

    fn violation(row: usize, level: DqLevel, field: &str, message: String) -> DqViolation {
        DqViolation {
            row_number: row,
            level,
            field: field.to_string(),
            message,
        }
    }

    /// 必填字段解析
    fn parse_required<T: FromStr<Err = String>>(
        value: &Option<String>,
        row: usize,
        field: &str,
        violations: &mut Vec<DqViolation>,
    ) -> Option<T> {
        match value {
            None => {
                violations.push(Self::violation(row, DqLevel::Error, field, "字段缺失".to_string()));
                None
            }
            Some(raw) => match raw.parse::<T>() {
                Ok(v) => Some(v),
                Err(e) => {
                    violations.push(Self::violation(row, DqLevel::Error, field, e));
                    None
                }
            },
        }
    }

    /// 销量解析（兼容 Excel 数值单元格的 "1200.0"）
    fn parse_qty(raw: &str) -> Option<i64> {
        if let Ok(v) = raw.parse::<i64>() {
            return Some(v);
        }
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && v.fract() == 0.0)
            .map(|v| v as i64)
    }

    /// 生成 DQ 报告
    pub fn generate_dq_report(
        &self,
        batch_id: String,
        total_rows: usize,
        success: usize,
        violations: Vec<DqViolation>,
    ) -> DqReport {
        let warning = violations
            .iter()
            .filter(|v| v.level == DqLevel::Warning)
            .count();

        DqReport {
            batch_id,
            summary: DqSummary {
                total_rows,
                success,
                blocked: total_rows.saturating_sub(success),
                warning,
            },
            violations,
        }
    }
}

impl Default for DqValidator {
    fn default() -> Self {
        Self::new(Channel::ModernTrade)
    }
}

impl DqValidatorTrait for DqValidator {
    fn validate_record(&self, record: &RawSalesRecord) -> (Option<SalesMonthly>, Vec<DqViolation>) {
        let row = record.row_number;
        let mut violations = Vec::new();

        let year_month =
            Self::parse_required::<YearMonth>(&record.year_month, row, "year_month", &mut violations);
        let flavor = Self::parse_required::<Flavor>(&record.flavor, row, "flavor", &mut violations);
        let size = Self::parse_required::<PackSize>(&record.size, row, "size", &mut violations);

        let sales_qty = match record.sales_qty.as_deref() {
            None => {
                violations.push(Self::violation(row, DqLevel::Error, "sales_qty", "字段缺失".to_string()));
                None
            }
            Some(raw) => match Self::parse_qty(raw) {
                None => {
                    violations.push(Self::violation(
                        row,
                        DqLevel::Error,
                        "sales_qty",
                        format!("无法解析为整数: {}", raw),
                    ));
                    None
                }
                Some(v) if v < 0 => {
                    violations.push(Self::violation(
                        row,
                        DqLevel::Error,
                        "sales_qty",
                        format!("销量为负数: {}", v),
                    ));
                    None
                }
                Some(v) if v > MAX_SALES_QTY => {
                    violations.push(Self::violation(
                        row,
                        DqLevel::Error,
                        "sales_qty",
                        format!("销量超出上限 {}: {}", MAX_SALES_QTY, v),
                    ));
                    None
                }
                Some(v) => Some(v),
            },
        };

        let channel = match record.channel.as_deref() {
            None => {
                violations.push(Self::violation(
                    row,
                    DqLevel::Warning,
                    "channel",
                    format!("渠道缺失,按 {} 处理", self.default_channel),
                ));
                Some(self.default_channel)
            }
            Some(raw) => match raw.parse::<Channel>() {
                Ok(c) => Some(c),
                Err(e) => {
                    violations.push(Self::violation(row, DqLevel::Error, "channel", e));
                    None
                }
            },
        };

        let record = match (year_month, flavor, size, sales_qty, channel) {
            (Some(year_month), Some(flavor), Some(size), Some(sales_qty), Some(channel)) => {
                Some(SalesMonthly {
                    year_month,
                    flavor,
                    size,
                    sales_qty,
                    channel,
                })
            }
            _ => None,
        };

        (record, violations)
    }

    fn validate_duplicates(&self, records: &[(usize, SalesMonthly)]) -> Vec<DqViolation> {
        let mut first_seen: HashMap<(YearMonth, Flavor, PackSize, Channel), usize> = HashMap::new();
        let mut violations = Vec::new();

        for (row, r) in records {
            let key = (r.year_month, r.flavor, r.size, r.channel);
            if let Some(first_row) = first_seen.get(&key) {
                violations.push(Self::violation(
                    *row,
                    DqLevel::Warning,
                    "year_month,flavor,size,channel",
                    format!("与第 {} 行重复,销量将合并计算", first_row),
                ));
            } else {
                first_seen.insert(key, *row);
            }
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(row: usize, ym: &str, flavor: &str, size: &str, qty: &str, channel: Option<&str>) -> RawSalesRecord {
        RawSalesRecord {
            row_number: row,
            year_month: Some(ym.to_string()),
            flavor: Some(flavor.to_string()),
            size: Some(size.to_string()),
            sales_qty: Some(qty.to_string()),
            channel: channel.map(|c| c.to_string()),
        }
    }

    #[test]
    fn test_valid_row_converts() {
        let (record, violations) =
            DqValidator::default().validate_record(&raw(1, "2025-01", "芒果", "400ml", "1200.0", Some("电商")));
        assert!(violations.is_empty());
        let record = record.unwrap();
        assert_eq!(record.flavor, Flavor::Mango);
        assert_eq!(record.size, PackSize::Ml400);
        assert_eq!(record.sales_qty, 1200);
        assert_eq!(record.channel, Channel::ECommerce);
    }

    #[test]
    fn test_negative_qty_is_error() {
        let (record, violations) =
            DqValidator::default().validate_record(&raw(2, "2025-01", "MANGO", "200", "-5", Some("MT")));
        assert!(record.is_none());
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].level, DqLevel::Error);
        assert_eq!(violations[0].field, "sales_qty");
    }

    #[test]
    fn test_qty_above_limit_is_error() {
        let validator = DqValidator::default();
        let max = MAX_SALES_QTY.to_string();
        let (record, violations) = validator.validate_record(&raw(5, "2025-01", "MANGO", "200", &max, Some("MT")));
        assert!(record.is_some());
        assert!(violations.is_empty());

        let huge = i64::MAX.to_string();
        let (record, violations) = validator.validate_record(&raw(6, "2025-01", "MANGO", "200", &huge, Some("MT")));
        assert!(record.is_none());
        assert_eq!(violations[0].level, DqLevel::Error);
        assert_eq!(violations[0].field, "sales_qty");
        assert_eq!(violations[0].row_number, 6);
    }

    #[test]
    fn test_missing_channel_is_warning_with_default() {
        let (record, violations) =
            DqValidator::new(Channel::FoodService).validate_record(&raw(3, "2025-01", "MANGO", "200", "7", None));
        assert_eq!(record.unwrap().channel, Channel::FoodService);
        assert_eq!(violations[0].level, DqLevel::Warning);
    }

    #[test]
    fn test_multiple_field_errors_are_all_reported() {
        let mut r = raw(4, "2025-13", "BANANA", "300", "abc", Some("MT"));
        r.flavor = Some("BANANA".to_string());
        let (record, violations) = DqValidator::default().validate_record(&r);
        assert!(record.is_none());
        assert_eq!(violations.len(), 4);
    }

    #[test]
    fn test_duplicates_flagged_after_first() {
        let validator = DqValidator::default();
        let (a, _) = validator.validate_record(&raw(1, "2025-01", "MANGO", "200", "1", Some("MT")));
        let (b, _) = validator.validate_record(&raw(2, "2025-01", "MANGO", "200", "2", Some("MT")));
        let (c, _) = validator.validate_record(&raw(3, "2025-01", "MANGO", "200", "3", Some("GT")));
        let records = vec![(1, a.unwrap()), (2, b.unwrap()), (3, c.unwrap())];

        let violations = validator.validate_duplicates(&records);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].row_number, 2);
        assert_eq!(violations[0].level, DqLevel::Warning);
    }

    #[test]
    fn test_report_counts() {
        let validator = DqValidator::default();
        let violations = vec![
            DqValidator::violation(1, DqLevel::Error, "size", "x".to_string()),
            DqValidator::violation(2, DqLevel::Warning, "channel", "y".to_string()),
        ];
        let report = validator.generate_dq_report("B1".to_string(), 5, 4, violations);
        assert_eq!(report.summary.blocked, 1);
        assert_eq!(report.summary.warning, 1);
        assert!(report.has_errors());
    }
}
