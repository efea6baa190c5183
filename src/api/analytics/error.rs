// ==========================================
// 分析服务客户端 - 错误类型
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("网络请求失败: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} 请求 {url} 失败: {body}")]
    Status { status: u16, url: String, body: String },

    #[error("响应数据不合法 ({endpoint}): {message}")]
    InvalidResponse { endpoint: String, message: String },

    #[error("查询参数不合法: {0}")]
    InvalidQuery(String),

    #[error("文件读取失败: {0}")]
    Io(#[from] std::io::Error),
}

impl AnalyticsError {
    pub fn invalid_response(endpoint: &str, message: impl Into<String>) -> Self {
        AnalyticsError::InvalidResponse {
            endpoint: endpoint.to_string(),
            message: message.into(),
        }
    }
}

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
