// ==========================================
// 销售预测与生产计划 - 导入层
// ==========================================
// 职责: 外部销量文件导入（CSV / Excel）
// 输出: 通过校验的 SalesMonthly + DQ 报告
// ==========================================

pub mod dq_validator;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod sales_importer_impl;
pub mod sales_importer_trait;

// 重导出核心类型
pub use dq_validator::DqValidator as DqValidatorImpl;
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper as FieldMapperImpl;
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use sales_importer_impl::SalesImporterImpl;

// 重导出 Trait 接口
pub use sales_importer_trait::{DqValidator, FieldMapper, FileParser, ParsedRow, SalesImporter};
