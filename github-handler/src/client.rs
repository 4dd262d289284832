use std::time::Duration;

use chrono::Utc;
use model::github::{ContentEntry, GitHubErrorResponse, SearchResponse};
use tracing::{debug, warn};

use crate::error::ApiError;

const USER_AGENT: &str = "repo-study/0.1";
const ACCEPT_GITHUB_JSON: &str = "application/vnd.github+json";

// 搜索请求参数; page 预留给翻页, 当前一页即覆盖全量
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub language: String,
    pub sort: String,
    pub order: String,
    pub per_page: u32,
    pub page: u32,
}

impl SearchQuery {
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("q", format!("language:{}", self.language)),
            ("sort", self.sort.clone()),
            ("order", self.order.clone()),
            ("per_page", self.per_page.to_string()),
            ("page", self.page.to_string()),
        ]
    }
}

// 搜索结果: body 为原始响应体, 原样落盘; response 为解析后的结构
pub struct SearchPayload {
    pub body: String,
    pub response: SearchResponse,
}

pub struct GithubClient {
    client: reqwest::Client,
    api_base: String,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(api_base: impl Into<String>, token: Option<String>) -> Result<Self, ApiError> {
        if token.is_none() {
            warn!("GITHUB_TOKEN not set, running unauthenticated with a lower rate limit");
        }
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            api_base: api_base.into(),
            token,
        })
    }

    /// 从环境变量读取令牌; 缺失不致命
    pub fn from_env(api_base: impl Into<String>) -> Result<Self, ApiError> {
        let token = std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty());
        Self::new(api_base, token)
    }

    pub async fn search_repositories(&self, query: &SearchQuery) -> Result<SearchPayload, ApiError> {
        let url = format!("{}/search/repositories", self.api_base);
        let body = self.get_with_rate_limit(&url, &query.to_params()).await?;
        let response: SearchResponse = serde_json::from_str(&body)?;
        Ok(SearchPayload { body, response })
    }

    /// 列出仓库根目录 (非递归)
    pub async fn list_root_contents(&self, full_name: &str) -> Result<Vec<ContentEntry>, ApiError> {
        let url = format!("{}/repos/{}/contents/", self.api_base, full_name);
        let body = self.get_with_rate_limit(&url, &[]).await?;
        let entries: Vec<ContentEntry> = serde_json::from_str(&body)?;
        Ok(entries)
    }

    // 命中限流时阻塞到配额重置时刻, 然后重发同一请求
    async fn get_with_rate_limit(
        &self,
        url: &str,
        params: &[(&'static str, String)],
    ) -> Result<String, ApiError> {
        loop {
            match self.get_once(url, params).await {
                Err(ApiError::RateLimited { reset }) => {
                    let wait = wait_until_reset(reset, Utc::now().timestamp());
                    warn!(
                        url,
                        reset,
                        wait_secs = wait.as_secs(),
                        "rate limit exhausted, sleeping until quota reset"
                    );
                    tokio::time::sleep(wait).await;
                }
                other => return other,
            }
        }
    }

    async fn get_once(
        &self,
        url: &str,
        params: &[(&'static str, String)],
    ) -> Result<String, ApiError> {
        let mut request = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, ACCEPT_GITHUB_JSON)
            .query(params);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ApiError::Auth {
                status: status.as_u16(),
            });
        }
        if let Some(reset) = rate_limit_reset(&response) {
            return Err(ApiError::RateLimited { reset });
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound {
                resource: url.to_owned(),
            });
        }
        if !status.is_success() {
            // 错误体里通常带一句 message, 带上方便排查
            let message = response
                .text()
                .await
                .ok()
                .and_then(|body| serde_json::from_str::<GitHubErrorResponse>(&body).ok())
                .map(|e| e.message)
                .unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                resource: url.to_owned(),
                message,
            });
        }

        debug!(url, %status, "request ok");
        Ok(response.text().await?)
    }
}

// 配额耗尽的判定: 403/429 且 x-ratelimit-remaining 为 0
// 头缺失或不可解析时不按限流处理, 走普通状态码错误
fn rate_limit_reset(response: &reqwest::Response) -> Option<i64> {
    let status = response.status();
    if status != reqwest::StatusCode::FORBIDDEN && status != reqwest::StatusCode::TOO_MANY_REQUESTS {
        return None;
    }
    if header_value(response, "x-ratelimit-remaining")? != "0" {
        return None;
    }
    header_value(response, "x-ratelimit-reset")?.parse().ok()
}

fn header_value<'a>(response: &'a reqwest::Response, name: &str) -> Option<&'a str> {
    response.headers().get(name)?.to_str().ok()
}

/// 等待时长, 额外加一秒, 保证不早于重置时刻重发
pub fn wait_until_reset(reset_epoch: i64, now_epoch: i64) -> Duration {
    let secs = (reset_epoch - now_epoch).max(0) as u64;
    Duration::from_secs(secs + 1)
}
