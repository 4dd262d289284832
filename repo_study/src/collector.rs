use anyhow::Context;
use github_handler::{GithubClient, SearchQuery};
use storage::StudyStore;
use tracing::info;

use crate::config::StudyContext;

/// 采集阶段: 一次搜索请求, 原始响应体原样落盘
pub async fn run(ctx: &StudyContext, client: &GithubClient, store: &StudyStore) -> anyhow::Result<()> {
    let query = SearchQuery {
        language: ctx.search.language.clone(),
        sort: ctx.search.sort.clone(),
        order: ctx.search.order.clone(),
        per_page: ctx.search.per_page,
        page: 1,
    };

    let payload = client
        .search_repositories(&query)
        .await
        .context("repository search failed")?;

    info!(
        total = payload.response.total_count,
        fetched = payload.response.items.len(),
        language = %ctx.search.language,
        "search page fetched"
    );

    store.write_raw_snapshot(&payload.body)?;
    Ok(())
}
