// ==========================================
// 销售预测与生产计划 - 过滤条件变更同步
// ==========================================
// 职责: 监听过滤条件,防抖后拉取驾驶舱汇总,发布最新状态
// 规则:
// - 防抖窗口内的新变更会重新计时
// - 请求期间条件再次变化时丢弃该请求结果
// - 过滤条件发送端关闭后任务结束
// ==========================================

use crate::api::analytics::dto::DashboardSummaryResponse;
use crate::api::analytics::query::AnalyticsQuery;
use crate::api::analytics::source::AnalyticsSource;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

/// 默认防抖时长
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

// ==========================================
// FetchState - 拉取状态
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState {
    Idle,
    Loading { query: AnalyticsQuery },
    Ready {
        query: AnalyticsQuery,
        data: Arc<DashboardSummaryResponse>,
    },
    Failed { query: AnalyticsQuery, message: String },
}

impl FetchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading { .. })
    }
}

// ==========================================
// FilterSync - 防抖拉取任务
// ==========================================
pub struct FilterSync {
    source: Arc<dyn AnalyticsSource>,
    debounce: Duration,
}

impl FilterSync {
    pub fn new(source: Arc<dyn AnalyticsSource>) -> Self {
        Self {
            source,
            debounce: DEFAULT_DEBOUNCE,
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// 启动后台任务
    ///
    /// 初始过滤条件同样会在防抖后拉取一次
    pub fn spawn(
        self,
        filter_rx: watch::Receiver<AnalyticsQuery>,
    ) -> (watch::Receiver<FetchState>, JoinHandle<()>) {
        let (state_tx, state_rx) = watch::channel(FetchState::Idle);
        let handle = tokio::spawn(self.run(filter_rx, state_tx));
        (state_rx, handle)
    }

    async fn run(
        self,
        mut filter_rx: watch::Receiver<AnalyticsQuery>,
        state_tx: watch::Sender<FetchState>,
    ) {
        let mut pending = true;

        loop {
            if !pending && filter_rx.changed().await.is_err() {
                break;
            }
            pending = false;

            // 防抖: 窗口内的新变更重新计时
            let sleep = tokio::time::sleep(self.debounce);
            tokio::pin!(sleep);
            loop {
                tokio::select! {
                    _ = &mut sleep => break,
                    changed = filter_rx.changed() => {
                        if changed.is_err() {
                            debug!("过滤条件发送端已关闭,同步任务结束");
                            return;
                        }
                        sleep.as_mut().reset(Instant::now() + self.debounce);
                    }
                }
            }

            let query = filter_rx.borrow_and_update().clone();
            state_tx.send_replace(FetchState::Loading {
                query: query.clone(),
            });

            tokio::select! {
                result = self.source.dashboard_summary(&query) => {
                    let state = match result {
                        Ok(data) => FetchState::Ready { query: query.clone(), data: Arc::new(data) },
                        Err(e) => {
                            warn!(error = %e, "驾驶舱汇总拉取失败");
                            FetchState::Failed { query: query.clone(), message: e.to_string() }
                        }
                    };
                    state_tx.send_replace(state);
                }
                changed = filter_rx.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    debug!("过滤条件已变化,丢弃过期请求");
                    pending = true;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::analytics::dto::{
        AnalyticsSummaryResponse, DeepDiveResponse, KpiSet, ScoringRunResponse,
        ScoringUploadResponse,
    };
    use crate::api::analytics::error::{AnalyticsError, AnalyticsResult};
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::Mutex;

    /// 记录请求并按 promotion 标志返回不同 KPI
    struct RecordingSource {
        calls: Mutex<Vec<AnalyticsQuery>>,
        latency: Duration,
    }

    impl RecordingSource {
        fn new(latency: Duration) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                latency,
            })
        }

        fn calls(&self) -> Vec<AnalyticsQuery> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AnalyticsSource for RecordingSource {
        async fn dashboard_summary(
            &self,
            query: &AnalyticsQuery,
        ) -> AnalyticsResult<DashboardSummaryResponse> {
            self.calls.lock().unwrap().push(query.clone());
            tokio::time::sleep(self.latency).await;
            if query.customer.as_deref() == Some("boom") {
                return Err(AnalyticsError::InvalidQuery("boom".to_string()));
            }
            Ok(DashboardSummaryResponse {
                kpis: KpiSet {
                    total_sales: if query.promotion == Some(true) { 1.0 } else { 0.0 },
                    forecast_next_month: 0.0,
                    growth_pct: None,
                    wape: None,
                },
                monthly: vec![],
                top_products: vec![],
            })
        }

        async fn analytics_summary(&self, _: &AnalyticsQuery) -> AnalyticsResult<AnalyticsSummaryResponse> {
            Err(AnalyticsError::InvalidQuery("unused".to_string()))
        }

        async fn deep_dive(&self, _: &AnalyticsQuery, _: &str) -> AnalyticsResult<DeepDiveResponse> {
            Err(AnalyticsError::InvalidQuery("unused".to_string()))
        }

        async fn upload_scoring_file(&self, _: &Path) -> AnalyticsResult<ScoringUploadResponse> {
            Err(AnalyticsError::InvalidQuery("unused".to_string()))
        }

        async fn scoring_run(&self, _: &str) -> AnalyticsResult<ScoringRunResponse> {
            Err(AnalyticsError::InvalidQuery("unused".to_string()))
        }
    }

    fn promo(flag: bool) -> AnalyticsQuery {
        AnalyticsQuery {
            promotion: Some(flag),
            ..Default::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_filter_fetched_after_debounce() {
        let source = RecordingSource::new(Duration::from_millis(10));
        let (_filter_tx, filter_rx) = watch::channel(promo(false));
        let (state_rx, _handle) = FilterSync::new(source.clone()).spawn(filter_rx);

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert!(source.calls().is_empty());

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(source.calls(), vec![promo(false)]);
        assert!(matches!(*state_rx.borrow(), FetchState::Ready { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_changes_collapse_into_one_fetch() {
        let source = RecordingSource::new(Duration::from_millis(10));
        let (filter_tx, filter_rx) = watch::channel(promo(false));
        let (state_rx, _handle) = FilterSync::new(source.clone()).spawn(filter_rx);

        for i in 0..5 {
            tokio::time::sleep(Duration::from_millis(100)).await;
            filter_tx.send_replace(promo(i % 2 == 0));
        }
        tokio::time::sleep(Duration::from_millis(400)).await;

        // 最后一次发送的是 promo(true)
        assert_eq!(source.calls(), vec![promo(true)]);
        match &*state_rx.borrow() {
            FetchState::Ready { query, data } => {
                assert_eq!(query, &promo(true));
                assert_eq!(data.kpis.total_sales, 1.0);
            }
            other => panic!("unexpected state: {:?}", other),
        };
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_discarded() {
        let source = RecordingSource::new(Duration::from_millis(500));
        let (filter_tx, filter_rx) = watch::channel(promo(false));
        let (state_rx, _handle) = FilterSync::new(source.clone()).spawn(filter_rx);

        // 第一次请求进行中时切换条件
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(state_rx.borrow().is_loading());
        filter_tx.send_replace(promo(true));

        tokio::time::sleep(Duration::from_millis(1_000)).await;
        assert_eq!(source.calls(), vec![promo(false), promo(true)]);
        match &*state_rx.borrow() {
            FetchState::Ready { query, .. } => assert_eq!(query, &promo(true)),
            other => panic!("unexpected state: {:?}", other),
        };
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_published() {
        let source = RecordingSource::new(Duration::from_millis(1));
        let query = AnalyticsQuery {
            customer: Some("boom".to_string()),
            ..Default::default()
        };
        let (_filter_tx, filter_rx) = watch::channel(query);
        let (state_rx, _handle) = FilterSync::new(source).spawn(filter_rx);

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(matches!(*state_rx.borrow(), FetchState::Failed { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_task_ends_when_sender_dropped() {
        let source = RecordingSource::new(Duration::from_millis(1));
        let (filter_tx, filter_rx) = watch::channel(promo(false));
        let (_state_rx, handle) = FilterSync::new(source)
            .with_debounce(Duration::from_millis(50))
            .spawn(filter_rx);

        tokio::time::sleep(Duration::from_millis(100)).await;
        drop(filter_tx);
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
