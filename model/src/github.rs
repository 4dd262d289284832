use serde::{Deserialize, Serialize};

// 仓库搜索接口的完整返回, 原样落盘作为后续阶段的数据源
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SearchResponse {
    pub total_count: i64,
    pub incomplete_results: bool,
    pub items: Vec<RawRepository>,
}

// 单个仓库的原始元数据, 抓取后不再修改
// 数值型字段缺失时保留缺失, 不做填补
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RawRepository {
    pub full_name: String,
    pub html_url: String,
    pub stargazers_count: Option<i64>,
    pub forks_count: Option<i64>,
    pub watchers_count: Option<i64>,
    pub open_issues_count: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
    pub language: Option<String>,
}

// 仓库根目录的一个条目
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ContentEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub entry_type: String,
}

impl ContentEntry {
    pub fn is_file(&self) -> bool {
        self.entry_type == "file"
    }

    pub fn is_dir(&self) -> bool {
        self.entry_type == "dir"
    }
}

#[derive(Debug, Deserialize)]
pub struct GitHubErrorResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub documentation_url: String,
}
