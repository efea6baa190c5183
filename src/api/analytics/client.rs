// ==========================================
// 分析服务客户端 - HTTP 实现
// ==========================================
// 工具: reqwest（JSON + multipart）
// 规则: 非 2xx 返回 Status 错误；所有响应经 validate() 后返回
// ==========================================

use crate::api::analytics::dto::{
    AnalyticsSummaryResponse, DashboardSummaryResponse, DeepDiveResponse, ScoringRunResponse,
    ScoringUploadResponse,
};
use crate::api::analytics::error::{AnalyticsError, AnalyticsResult};
use crate::api::analytics::query::AnalyticsQuery;
use crate::api::analytics::source::AnalyticsSource;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// 默认请求超时
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub struct AnalyticsClient {
    client: reqwest::Client,
    base_url: String,
}

impl AnalyticsClient {
    pub fn new(base_url: &str) -> AnalyticsResult<Self> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> AnalyticsResult<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(AnalyticsError::InvalidQuery("分析服务地址为空".to_string()));
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 检查状态码并解析 JSON
    async fn read_json<T: DeserializeOwned>(
        &self,
        url: &str,
        response: reqwest::Response,
    ) -> AnalyticsResult<T> {
        let status = response.status();
        debug!(status = %status, url, "分析服务响应");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalyticsError::Status {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }

        Ok(response.json::<T>().await?)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        pairs: &[(&'static str, String)],
    ) -> AnalyticsResult<T> {
        let url = self.url(path);
        let response = self
            .client
            .get(&url)
            .query(pairs)
            .header("Accept", "application/json")
            .send()
            .await?;
        self.read_json(&url, response).await
    }
}

#[async_trait]
impl AnalyticsSource for AnalyticsClient {
    #[instrument(skip(self))]
    async fn dashboard_summary(
        &self,
        query: &AnalyticsQuery,
    ) -> AnalyticsResult<DashboardSummaryResponse> {
        query.validate()?;
        let resp: DashboardSummaryResponse = self
            .get_json(DashboardSummaryResponse::ENDPOINT, &query.to_query_pairs())
            .await?;
        resp.validate()?;
        Ok(resp)
    }

    #[instrument(skip(self))]
    async fn analytics_summary(
        &self,
        query: &AnalyticsQuery,
    ) -> AnalyticsResult<AnalyticsSummaryResponse> {
        query.validate()?;
        let resp: AnalyticsSummaryResponse = self
            .get_json(AnalyticsSummaryResponse::ENDPOINT, &query.to_query_pairs())
            .await?;
        resp.validate()?;
        Ok(resp)
    }

    #[instrument(skip(self))]
    async fn deep_dive(
        &self,
        query: &AnalyticsQuery,
        dimension: &str,
    ) -> AnalyticsResult<DeepDiveResponse> {
        query.validate()?;
        if dimension.trim().is_empty() {
            return Err(AnalyticsError::InvalidQuery("下钻维度为空".to_string()));
        }
        let mut pairs = query.to_query_pairs();
        pairs.push(("dimension", dimension.trim().to_string()));

        let resp: DeepDiveResponse = self.get_json(DeepDiveResponse::ENDPOINT, &pairs).await?;
        resp.validate()?;
        Ok(resp)
    }

    #[instrument(skip(self))]
    async fn upload_scoring_file(&self, file_path: &Path) -> AnalyticsResult<ScoringUploadResponse> {
        let bytes = tokio::fs::read(file_path).await?;
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload.csv".to_string());
        info!(file = %file_name, size = bytes.len(), "上传评分文件");

        let part = Part::bytes(bytes).file_name(file_name);
        let form = Form::new().part("file", part);

        let url = self.url(ScoringUploadResponse::ENDPOINT);
        let response = self.client.post(&url).multipart(form).send().await?;
        let resp: ScoringUploadResponse = self.read_json(&url, response).await?;
        resp.validate()?;
        Ok(resp)
    }

    #[instrument(skip(self))]
    async fn scoring_run(&self, run_id: &str) -> AnalyticsResult<ScoringRunResponse> {
        let run_id = run_id.trim();
        if run_id.is_empty() {
            return Err(AnalyticsError::InvalidQuery("run_id 为空".to_string()));
        }
        let path = format!("{}/{}", ScoringRunResponse::ENDPOINT, run_id);
        let resp: ScoringRunResponse = self.get_json(&path, &[]).await?;
        resp.validate()?;
        Ok(resp)
    }
}
