use model::github::ContentEntry;

use super::AnyIndicatorPass;

// 只认目录; 根目录下名为 tests.py 之类的文件不算
pub struct TestsPass;

impl AnyIndicatorPass for TestsPass {
    fn detect(&self, entries: &[ContentEntry]) -> bool {
        entries
            .iter()
            .any(|e| e.is_dir() && e.name.to_lowercase().contains("test"))
    }

    fn name(&self) -> &'static str {
        "has_tests"
    }
}
