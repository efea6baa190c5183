// ==========================================
// 分析服务客户端 - 数据源 Trait
// ==========================================
// 实现者: AnalyticsClient（HTTP）；测试中可替换为内存实现
// ==========================================

use crate::api::analytics::dto::{
    AnalyticsSummaryResponse, DashboardSummaryResponse, DeepDiveResponse, ScoringRunResponse,
    ScoringUploadResponse,
};
use crate::api::analytics::error::AnalyticsResult;
use crate::api::analytics::query::AnalyticsQuery;
use async_trait::async_trait;
use std::path::Path;

#[async_trait]
pub trait AnalyticsSource: Send + Sync {
    /// 驾驶舱汇总（KPI + 月度序列 + 排名）
    async fn dashboard_summary(&self, query: &AnalyticsQuery)
        -> AnalyticsResult<DashboardSummaryResponse>;

    /// 分析页汇总（KPI + 按口味/规格/客户分组）
    async fn analytics_summary(&self, query: &AnalyticsQuery)
        -> AnalyticsResult<AnalyticsSummaryResponse>;

    /// 按维度下钻
    async fn deep_dive(&self, query: &AnalyticsQuery, dimension: &str)
        -> AnalyticsResult<DeepDiveResponse>;

    /// 上传待评分的销量文件
    async fn upload_scoring_file(&self, file_path: &Path) -> AnalyticsResult<ScoringUploadResponse>;

    /// 查询评分运行状态
    async fn scoring_run(&self, run_id: &str) -> AnalyticsResult<ScoringRunResponse>;
}
