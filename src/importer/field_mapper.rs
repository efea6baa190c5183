// ==========================================
// 销售预测与生产计划 - 字段映射器实现
// ==========================================
// 职责: 源列名 → 标准字段（支持中英文别名）
// ==========================================

use crate::domain::import::RawSalesRecord;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::sales_importer_trait::FieldMapper as FieldMapperTrait;
use std::collections::HashMap;

/// 标准字段 → 可接受的列名
const COLUMN_ALIASES: [(&str, &[&str]); 5] = [
    ("year_month", &["year_month", "月份", "month"]),
    ("flavor", &["flavor", "口味"]),
    ("size", &["size", "规格", "pack_size"]),
    ("sales_qty", &["sales_qty", "销量", "qty"]),
    ("channel", &["channel", "渠道"]),
];

/// 缺失时导入整体失败的字段（channel 可缺省）
const REQUIRED_COLUMNS: [&str; 4] = ["year_month", "flavor", "size", "sales_qty"];

pub struct FieldMapper;

impl FieldMapperTrait for FieldMapper {
    fn map_to_raw_sales(&self, row: &HashMap<String, String>, row_number: usize) -> RawSalesRecord {
        RawSalesRecord {
            row_number,
            year_month: self.get_string(row, "year_month"),
            flavor: self.get_string(row, "flavor"),
            size: self.get_string(row, "size"),
            sales_qty: self.get_string(row, "sales_qty"),
            channel: self.get_string(row, "channel"),
        }
    }
}

impl FieldMapper {
    fn aliases(key: &str) -> &'static [&'static str] {
        COLUMN_ALIASES
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, a)| *a)
            .unwrap_or(&[])
    }

    fn matches_alias(header: &str, alias: &str) -> bool {
        header.trim().eq_ignore_ascii_case(alias)
    }

    /// 提取字符串字段（返回 Option）,尝试所有别名
    fn get_string(&self, row: &HashMap<String, String>, key: &str) -> Option<String> {
        for alias in Self::aliases(key) {
            let hit = row
                .iter()
                .find(|(header, _)| Self::matches_alias(header, alias))
                .map(|(_, v)| v.trim());
            if let Some(v) = hit {
                if !v.is_empty() {
                    return Some(v.to_string());
                }
            }
        }
        None
    }

    /// 校验表头是否包含所有必需列
    pub fn check_headers<'a, I>(&self, headers: I) -> ImportResult<()>
    where
        I: IntoIterator<Item = &'a String> + Clone,
    {
        for key in REQUIRED_COLUMNS {
            let found = headers
                .clone()
                .into_iter()
                .any(|h| Self::aliases(key).iter().any(|a| Self::matches_alias(h, a)));
            if !found {
                return Err(ImportError::MissingColumn(key.to_string()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_maps_chinese_headers() {
        let r = row(&[("月份", "2025-03"), ("口味", "抹茶"), ("规格", "200"), ("销量", "88"), ("渠道", "餐饮")]);
        let raw = FieldMapper.map_to_raw_sales(&r, 3);
        assert_eq!(raw.row_number, 3);
        assert_eq!(raw.year_month.as_deref(), Some("2025-03"));
        assert_eq!(raw.flavor.as_deref(), Some("抹茶"));
        assert_eq!(raw.channel.as_deref(), Some("餐饮"));
    }

    #[test]
    fn test_header_match_is_case_insensitive() {
        let r = row(&[("Year_Month", "2025-03"), ("SALES_QTY", "5")]);
        let raw = FieldMapper.map_to_raw_sales(&r, 1);
        assert_eq!(raw.year_month.as_deref(), Some("2025-03"));
        assert_eq!(raw.sales_qty.as_deref(), Some("5"));
        assert_eq!(raw.flavor, None);
    }

    #[test]
    fn test_blank_value_is_none() {
        let r = row(&[("flavor", "  ")]);
        assert_eq!(FieldMapper.map_to_raw_sales(&r, 1).flavor, None);
    }

    #[test]
    fn test_check_headers_reports_missing_column() {
        let headers = vec!["月份".to_string(), "口味".to_string(), "规格".to_string()];
        let err = FieldMapper.check_headers(&headers).unwrap_err();
        assert!(matches!(err, ImportError::MissingColumn(ref c) if c == "sales_qty"));

        let ok = vec![
            "year_month".to_string(),
            "flavor".to_string(),
            "size".to_string(),
            "销量".to_string(),
        ];
        assert!(FieldMapper.check_headers(&ok).is_ok());
    }
}
