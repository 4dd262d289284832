use model::github::ContentEntry;

use super::AnyIndicatorPass;

// 精确匹配 .github 目录, 不做子串处理
pub struct CiPass;

impl AnyIndicatorPass for CiPass {
    fn detect(&self, entries: &[ContentEntry]) -> bool {
        entries.iter().any(|e| e.is_dir() && e.name == ".github")
    }

    fn name(&self) -> &'static str {
        "has_ci"
    }
}
