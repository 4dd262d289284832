use model::github::ContentEntry;

use super::AnyIndicatorPass;

pub struct LicensePass;

impl AnyIndicatorPass for LicensePass {
    fn detect(&self, entries: &[ContentEntry]) -> bool {
        entries
            .iter()
            .any(|e| e.is_file() && e.name.to_lowercase().contains("license"))
    }

    fn name(&self) -> &'static str {
        "has_license"
    }
}
