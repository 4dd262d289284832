use model::github::ContentEntry;

use super::AnyIndicatorPass;

pub struct ReadmePass;

impl AnyIndicatorPass for ReadmePass {
    fn detect(&self, entries: &[ContentEntry]) -> bool {
        entries
            .iter()
            .any(|e| e.is_file() && e.name.to_lowercase().contains("readme"))
    }

    fn name(&self) -> &'static str {
        "has_readme"
    }
}
