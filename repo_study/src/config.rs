use anyhow::Context;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

/// 搜索请求配置
#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    pub language: String,
    pub sort: String,
    pub order: String,
    pub per_page: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GithubConfig {
    pub api_base: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub raw_path: String,
    pub cleaned_path: String,
    pub final_path: String,
}

/// 研究流水线上下文结构体
#[derive(Debug, Deserialize, Clone)]
pub struct StudyContext {
    pub search: SearchConfig,
    pub github: GithubConfig,
    pub storage: StorageConfig,
}

impl StudyContext {
    pub fn load_config(config_path: &str) -> anyhow::Result<Self> {
        Config::builder()
            .add_source(
                File::with_name(config_path)
                    .format(FileFormat::Toml)
                    .required(true),
            )
            .add_source(
                Environment::with_prefix("STUDY")
                    .try_parsing(true)
                    .separator("_"),
            )
            .build()
            .with_context(|| anyhow::anyhow!("Failed to load config"))?
            .try_deserialize()
            .with_context(|| anyhow::anyhow!("Failed to deserialize config"))
    }
}
