use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    // 凭证无效, 整个运行终止
    #[error("authentication rejected by the api (status {status})")]
    Auth { status: u16 },

    // 配额耗尽, 由客户端内部等待后重试, 正常情况下不会向外冒出
    #[error("rate limit exhausted, quota resets at epoch {reset}")]
    RateLimited { reset: i64 },

    #[error("resource not found: {resource}")]
    NotFound { resource: String },

    #[error("unexpected status {status} for {resource}: {message}")]
    Status {
        status: u16,
        resource: String,
        message: String,
    },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("malformed response body: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl ApiError {
    /// 单条记录可降级处理的错误; 其余属系统性故障
    pub fn is_per_record(&self) -> bool {
        matches!(
            self,
            ApiError::NotFound { .. } | ApiError::Status { .. } | ApiError::Malformed(_)
        )
    }
}
