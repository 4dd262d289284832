mod pass;

use std::collections::HashMap;
use std::sync::Arc;

use github_handler::{ApiError, GithubClient};
use model::github::ContentEntry;
use model::record::{QualityIndicators, QualityRecord};
use storage::StudyStore;
use tracing::{error, info};

use pass::{AnyIndicatorPass, CiPass, LicensePass, ReadmePass, TestsPass};

pub struct IndicatorManager {
    passes: Vec<Arc<dyn AnyIndicatorPass>>,
}

impl IndicatorManager {
    pub fn new() -> Self {
        Self { passes: Vec::new() }
    }

    // 默认的四个指标 Pass
    pub fn add_default_passes(&mut self) {
        self.add_pass(Arc::new(ReadmePass));
        self.add_pass(Arc::new(LicensePass));
        self.add_pass(Arc::new(TestsPass));
        self.add_pass(Arc::new(CiPass));
    }

    pub fn add_pass(&mut self, pass: Arc<dyn AnyIndicatorPass>) {
        self.passes.push(pass);
    }

    pub fn apply(&self, entries: &[ContentEntry]) -> QualityIndicators {
        let flags: HashMap<&str, bool> = self
            .passes
            .iter()
            .map(|pass| (pass.name(), pass.detect(entries)))
            .collect();

        QualityIndicators {
            has_readme: flags.get("has_readme").copied().unwrap_or(false),
            has_license: flags.get("has_license").copied().unwrap_or(false),
            has_tests: flags.get("has_tests").copied().unwrap_or(false),
            has_ci: flags.get("has_ci").copied().unwrap_or(false),
        }
    }
}

/// 提取阶段: 每个仓库一次根目录列表请求
/// 单仓库查询失败降级为全 false, 不中断整批; 系统性故障向上传播
pub async fn run(client: &GithubClient, store: &StudyStore) -> anyhow::Result<()> {
    let cleaned = store.read_cleaned()?;
    let mut manager = IndicatorManager::new();
    manager.add_default_passes();

    let mut records = Vec::with_capacity(cleaned.len());
    for repo in cleaned {
        let indicators = match client.list_root_contents(&repo.full_name).await {
            Ok(entries) => {
                if entries.is_empty() {
                    info!(repo = %repo.full_name, "root listing is empty, all indicators false");
                }
                manager.apply(&entries)
            }
            Err(err) if err.is_per_record() => {
                error!(repo = %repo.full_name, %err, "contents lookup failed, defaulting indicators to false");
                QualityIndicators::default()
            }
            Err(err) => return Err(err.into()),
        };

        let record = QualityRecord::from_parts(repo, indicators);
        info!(
            repo = %record.full_name,
            score = record.quality_score,
            has_readme = record.has_readme,
            has_license = record.has_license,
            has_tests = record.has_tests,
            has_ci = record.has_ci,
            "quality indicators extracted"
        );
        records.push(record);
    }

    store.write_final(&records)?;
    Ok(())
}
