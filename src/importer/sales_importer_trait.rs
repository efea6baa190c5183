// ==========================================
// 销售预测与生产计划 - 销量导入 Trait
// ==========================================
// 职责: 定义销量导入接口（不包含实现）
// 管道: 文件解析 → 字段映射 → DQ 校验
// ==========================================

use crate::domain::import::{DqViolation, RawSalesRecord, SalesImportResult};
use crate::domain::sales::SalesMonthly;
use crate::importer::error::ImportResult;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;

// ==========================================
// SalesImporter Trait
// ==========================================
// 实现者: SalesImporterImpl
#[async_trait]
pub trait SalesImporter: Send + Sync {
    /// 导入单个销量文件（.csv / .xlsx / .xls）
    ///
    /// # 返回
    /// - Ok(SalesImportResult): 批次 ID、通过校验的记录、DQ 报告
    /// - Err: 文件不存在、格式不支持、缺少必需列
    async fn import_file<P: AsRef<Path> + Send>(&self, file_path: P)
        -> ImportResult<SalesImportResult>;

    /// 批量导入多个文件（并发执行）
    ///
    /// 每个文件的导入相互独立,单个失败不影响其他文件
    async fn batch_import<P: AsRef<Path> + Send + Sync>(
        &self,
        file_paths: Vec<P>,
    ) -> Vec<Result<SalesImportResult, String>>;
}

// ==========================================
// ParsedRow - 解析后的单行
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRow {
    pub row_number: usize,              // 源文件数据行号（表头后第 1 行为 1,空行也计数）
    pub values: HashMap<String, String>, // 列名 → 值
}

// ==========================================
// FileParser Trait
// ==========================================
pub trait FileParser: Send + Sync {
    /// 解析文件为原始行记录,跳过全空行但保留源文件行号
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<ParsedRow>>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
pub trait FieldMapper: Send + Sync {
    /// 将原始行记录映射为 RawSalesRecord（按列名别名取值）
    fn map_to_raw_sales(&self, row: &HashMap<String, String>, row_number: usize) -> RawSalesRecord;
}

// ==========================================
// DqValidator Trait
// ==========================================
pub trait DqValidator: Send + Sync {
    /// 校验单行并转换；存在 ERROR 级违规时返回 None
    fn validate_record(&self, record: &RawSalesRecord) -> (Option<SalesMonthly>, Vec<DqViolation>);

    /// 校验批次内主键重复 (月份, 口味, 规格, 渠道)
    fn validate_duplicates(&self, records: &[(usize, SalesMonthly)]) -> Vec<DqViolation>;
}
