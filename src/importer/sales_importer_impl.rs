// ==========================================
// 销售预测与生产计划 - 销量导入器实现
// ==========================================
// 流程: 解析 → 表头校验 → 字段映射 → DQ 校验 → 重复检测 → 报告
// 红线: 导入不落库,结果交由调用方构建计划快照
// ==========================================

use crate::domain::import::SalesImportResult;
use crate::domain::types::Channel;
use crate::i18n;
use crate::importer::dq_validator::DqValidator;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::sales_importer_trait::{
    DqValidator as _, FieldMapper as _, FileParser, SalesImporter,
};
use async_trait::async_trait;
use futures::future::join_all;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// SalesImporterImpl
// ==========================================
pub struct SalesImporterImpl {
    file_parser: UniversalFileParser,
    field_mapper: FieldMapper,
    dq_validator: DqValidator,
}

impl SalesImporterImpl {
    pub fn new(default_channel: Channel) -> Self {
        Self {
            file_parser: UniversalFileParser,
            field_mapper: FieldMapper,
            dq_validator: DqValidator::new(default_channel),
        }
    }
}

impl Default for SalesImporterImpl {
    fn default() -> Self {
        Self {
            file_parser: UniversalFileParser,
            field_mapper: FieldMapper,
            dq_validator: DqValidator::default(),
        }
    }
}

#[async_trait]
impl SalesImporter for SalesImporterImpl {
    #[instrument(skip(self, file_path), fields(batch_id))]
    async fn import_file<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> ImportResult<SalesImportResult> {
        let start_time = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("batch_id", batch_id.as_str());

        let path = file_path.as_ref();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        info!(file = %file_name, "开始导入销量数据");

        // === 步骤 1: 解析文件 ===
        let raw_rows = self.file_parser.parse_to_raw_records(path).map_err(|e| {
            error!(error = %e, "文件解析失败");
            e
        })?;
        let total_rows = raw_rows.len();
        debug!(total_rows, "文件解析完成");

        // === 步骤 2: 表头校验 ===
        if let Some(first) = raw_rows.first() {
            self.field_mapper.check_headers(first.values.keys())?;
        }

        // === 步骤 3: 字段映射 + DQ 校验 ===
        let mut accepted = Vec::with_capacity(total_rows);
        let mut violations = Vec::new();
        for row in &raw_rows {
            let raw = self.field_mapper.map_to_raw_sales(&row.values, row.row_number);
            let (record, row_violations) = self.dq_validator.validate_record(&raw);
            violations.extend(row_violations);
            if let Some(record) = record {
                accepted.push((row.row_number, record));
            }
        }

        // === 步骤 4: 重复检测 ===
        violations.extend(self.dq_validator.validate_duplicates(&accepted));
        violations.sort_by_key(|v| v.row_number);

        let success = accepted.len();
        let dq_report =
            self.dq_validator
                .generate_dq_report(batch_id.clone(), total_rows, success, violations);
        let summary = dq_report.summary.clone();

        if summary.blocked > 0 {
            warn!(blocked = summary.blocked, "部分行未通过数据质量校验");
        }
        let success_str = summary.success.to_string();
        let blocked_str = summary.blocked.to_string();
        info!(
            "{}",
            i18n::t_with_args(
                "import.completed",
                &[("success", success_str.as_str()), ("blocked", blocked_str.as_str())],
            )
        );

        Ok(SalesImportResult {
            batch_id,
            file_name,
            records: accepted.into_iter().map(|(_, r)| r).collect(),
            dq_report,
            summary,
            elapsed_ms: start_time.elapsed().as_millis() as u64,
        })
    }

    async fn batch_import<P: AsRef<Path> + Send + Sync>(
        &self,
        file_paths: Vec<P>,
    ) -> Vec<Result<SalesImportResult, String>> {
        info!(count = file_paths.len(), "开始批量导入文件");

        let import_tasks = file_paths.into_iter().map(|path| {
            let path_str = path.as_ref().display().to_string();
            async move {
                match self.import_file(path).await {
                    Ok(result) => Ok(result),
                    Err(e) => {
                        error!(file = %path_str, error = %e, "文件导入失败");
                        Err(failure_message(&path_str, &e))
                    }
                }
            }
        });

        let results = join_all(import_tasks).await;

        info!(
            total = results.len(),
            success = results.iter().filter(|r| r.is_ok()).count(),
            failed = results.iter().filter(|r| r.is_err()).count(),
            "批量导入完成"
        );

        results
    }
}

/// 批量导入的单文件失败消息（按当前语言）
fn failure_message(path: &str, err: &ImportError) -> String {
    match err {
        ImportError::FileNotFound(p) => i18n::t_with_args("import.file_not_found", &[("path", p.as_str())]),
        ImportError::UnsupportedFormat(ext) => {
            i18n::t_with_args("import.unsupported_format", &[("ext", ext.as_str())])
        }
        other => format!("{} ({}): {}", i18n::t("common.failed"), path, other),
    }
}
