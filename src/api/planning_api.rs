// ==========================================
// 销售预测与生产计划 - 计划 API
// ==========================================
// 职责: 组合根入口,读取配置、构建快照、导入销量、保存/查询运行记录
// 架构: API 层 → Config / Engine / Importer / Repository
// ==========================================

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use tracing::{info, instrument, warn};

use crate::api::analytics::client::AnalyticsClient;
use crate::api::error::{ApiError, ApiResult};
use crate::config::config_manager::{config_keys, ConfigManager};
use crate::config::planning_config::PlanningConfig;
use crate::config::planning_config_reader::PlanningConfigReader;
use crate::domain::forecast::ProductionPlan;
use crate::domain::import::SalesImportResult;
use crate::engine::snapshot::PlanningSnapshot;
use crate::importer::sales_importer_impl::SalesImporterImpl;
use crate::importer::sales_importer_trait::SalesImporter;
use crate::repository::plan_run_repo::{PlanRunEntity, PlanRunRepository};

/// 文件导入构建快照的结果
#[derive(Debug)]
pub struct ImportedSnapshot {
    pub snapshot: PlanningSnapshot,
    pub imports: Vec<Result<SalesImportResult, String>>,
}

// ==========================================
// PlanningApi - 计划 API
// ==========================================
pub struct PlanningApi {
    config: Arc<ConfigManager>,
    run_repo: PlanRunRepository,
    importer: SalesImporterImpl,
}

fn config_error(e: Box<dyn std::error::Error + Send + Sync>) -> ApiError {
    ApiError::ConfigError(e.to_string())
}

impl PlanningApi {
    /// 基于共享连接创建（schema 由 ConfigManager 确保）
    pub fn new(conn: Arc<Mutex<Connection>>) -> ApiResult<Self> {
        let config = ConfigManager::from_connection(conn.clone()).map_err(config_error)?;
        Ok(Self {
            config: Arc::new(config),
            run_repo: PlanRunRepository::new(conn),
            importer: SalesImporterImpl::default(),
        })
    }

    pub fn config_manager(&self) -> Arc<ConfigManager> {
        self.config.clone()
    }

    /// 以配置的服务地址创建分析服务客户端
    pub fn analytics_client(&self) -> ApiResult<AnalyticsClient> {
        let base_url = self.config.get_analytics_base_url().map_err(config_error)?;
        Ok(AnalyticsClient::new(&base_url)?)
    }

    /// 读取并校验计划参数
    pub async fn load_config(&self) -> ApiResult<PlanningConfig> {
        self.config.load_planning_config().await.map_err(config_error)
    }

    /// 以演示数据构建快照
    #[instrument(skip(self))]
    pub async fn build_snapshot(&self) -> ApiResult<PlanningSnapshot> {
        let config = self.load_config().await?;
        Ok(PlanningSnapshot::build(&config)?)
    }

    /// 以导入文件构建快照
    ///
    /// 未显式配置锚定月时,锚定月取导入数据最近月的下一月
    #[instrument(skip(self, paths), fields(files = paths.len()))]
    pub async fn build_snapshot_from_files(&self, paths: Vec<PathBuf>) -> ApiResult<ImportedSnapshot> {
        if paths.is_empty() {
            return Err(ApiError::InvalidInput("未指定导入文件".to_string()));
        }

        let imports = self.importer.batch_import(paths).await;
        let sales: Vec<_> = imports
            .iter()
            .filter_map(|r| r.as_ref().ok())
            .flat_map(|r| r.records.iter().cloned())
            .collect();

        let Some(latest) = sales.iter().map(|s| s.year_month).max() else {
            return Err(ApiError::InvalidInput("导入文件中没有有效销量记录".to_string()));
        };

        let mut config = self.load_config().await?;
        let anchor_configured = self
            .config
            .get_global_config_value(config_keys::ANCHOR_MONTH)
            .map_err(config_error)?
            .is_some();
        if !anchor_configured {
            config.anchor_month = latest.add_months(1);
        }
        if config.anchor_month <= latest {
            warn!(
                anchor = %config.anchor_month,
                latest = %latest,
                "锚定月不晚于最近实际月,预测将与实际月重叠"
            );
        }

        info!(records = sales.len(), anchor = %config.anchor_month, "导入数据构建快照");
        let snapshot = PlanningSnapshot::from_series(&config, sales, Vec::new())?;
        Ok(ImportedSnapshot { snapshot, imports })
    }

    /// 保存运行记录（附带当前配置快照）
    pub fn save_run(&self, snapshot: &PlanningSnapshot) -> ApiResult<String> {
        let config_json = self.config.get_config_snapshot().map_err(config_error)?;
        Ok(self.run_repo.save_run(snapshot, &config_json)?)
    }

    pub fn list_runs(&self, limit: usize) -> ApiResult<Vec<PlanRunEntity>> {
        if limit == 0 {
            return Err(ApiError::InvalidInput("limit 必须大于 0".to_string()));
        }
        Ok(self.run_repo.list_runs(limit)?)
    }

    /// 运行记录及其生产计划明细
    pub fn get_run(&self, run_id: &str) -> ApiResult<(PlanRunEntity, Vec<ProductionPlan>)> {
        let run = self
            .run_repo
            .find_run(run_id)?
            .ok_or_else(|| ApiError::NotFound(format!("计划运行(id={})不存在", run_id)))?;
        let items = self.run_repo.list_items(run_id)?;
        Ok((run, items))
    }

    pub fn delete_run(&self, run_id: &str) -> ApiResult<()> {
        if !self.run_repo.delete_run(run_id)? {
            return Err(ApiError::NotFound(format!("计划运行(id={})不存在", run_id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> PlanningApi {
        let conn = Connection::open_in_memory().unwrap();
        PlanningApi::new(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[tokio::test]
    async fn test_build_and_save_run() {
        let api = api();
        api.config_manager()
            .set_global_config_value(config_keys::ANCHOR_MONTH, "2025-06")
            .unwrap();

        let snapshot = api.build_snapshot().await.unwrap();
        let run_id = api.save_run(&snapshot).unwrap();

        let (run, items) = api.get_run(&run_id).unwrap();
        assert!(run.config_snapshot_json.contains("2025-06"));
        assert_eq!(items.len(), snapshot.production_plans().len());

        api.delete_run(&run_id).unwrap();
        assert!(matches!(api.get_run(&run_id), Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_invalid_config_surfaces_as_config_error() {
        let api = api();
        api.config_manager()
            .set_global_config_value(config_keys::FORECAST_HORIZON, "0")
            .unwrap();
        assert!(matches!(api.build_snapshot().await, Err(ApiError::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_no_files_rejected() {
        assert!(matches!(
            api().build_snapshot_from_files(vec![]).await,
            Err(ApiError::InvalidInput(_))
        ));
    }
}
