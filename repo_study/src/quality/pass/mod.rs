mod ci;
mod license;
mod readme;
mod tests_dir;

pub use ci::CiPass;
pub use license::LicensePass;
pub use readme::ReadmePass;
pub use tests_dir::TestsPass;

use model::github::ContentEntry;

// 指标 Pass: 对根目录列表做一次判定
// 判定规则刻意保持浅层 (仅根目录, 子串匹配), 下游统计依赖这一口径
pub trait AnyIndicatorPass: Send + Sync {
    fn detect(&self, entries: &[ContentEntry]) -> bool;
    fn name(&self) -> &'static str;
}
