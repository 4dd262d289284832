use std::fmt::Write as _;

use model::record::QualityRecord;
use tracing::info;

use crate::stats::{five_number_summary, mean, pearson, std_dev, FiveNumberSummary};

pub const INDICATORS: [&str; 4] = ["has_readme", "has_license", "has_tests", "has_ci"];

fn indicator_value(record: &QualityRecord, indicator: &str) -> bool {
    match indicator {
        "has_readme" => record.has_readme,
        "has_license" => record.has_license,
        "has_tests" => record.has_tests,
        "has_ci" => record.has_ci,
        other => panic!("unknown indicator {other}"),
    }
}

// 单个分组 (指标为 0 或 1) 上的星数统计
#[derive(Debug, Clone, PartialEq)]
pub struct GroupStats {
    pub count: usize,
    pub mean_stars: Option<f64>,
    pub std_dev_stars: Option<f64>,
    pub summary: Option<FiveNumberSummary>,
}

impl GroupStats {
    fn from_values(values: &[f64]) -> Self {
        Self {
            count: values.len(),
            mean_stars: mean(values),
            std_dev_stars: std_dev(values),
            summary: five_number_summary(values),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IndicatorGroupStats {
    pub indicator: &'static str,
    pub with: GroupStats,
    pub without: GroupStats,
}

// 每个得分档位上的散点汇总 (quality_score vs stars)
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreLevelStats {
    pub score: u8,
    pub count: usize,
    pub mean_stars: Option<f64>,
}

/// 星数缺失的记录不参与统计, 只计数上报
pub fn starred(records: &[QualityRecord]) -> Vec<&QualityRecord> {
    records.iter().filter(|r| r.stars.is_some()).collect()
}

pub fn indicator_stats(records: &[QualityRecord]) -> Vec<IndicatorGroupStats> {
    let usable = starred(records);
    INDICATORS
        .iter()
        .map(|&indicator| {
            let (with, without): (Vec<&QualityRecord>, Vec<&QualityRecord>) = usable
                .iter()
                .copied()
                .partition(|r| indicator_value(r, indicator));
            let with_stars: Vec<f64> = with.iter().map(|r| r.stars.unwrap() as f64).collect();
            let without_stars: Vec<f64> = without.iter().map(|r| r.stars.unwrap() as f64).collect();
            IndicatorGroupStats {
                indicator,
                with: GroupStats::from_values(&with_stars),
                without: GroupStats::from_values(&without_stars),
            }
        })
        .collect()
}

pub fn score_star_correlation(records: &[QualityRecord]) -> Option<f64> {
    let usable = starred(records);
    let scores: Vec<f64> = usable.iter().map(|r| r.quality_score as f64).collect();
    let stars: Vec<f64> = usable.iter().map(|r| r.stars.unwrap() as f64).collect();
    pearson(&scores, &stars)
}

pub fn score_level_stats(records: &[QualityRecord]) -> Vec<ScoreLevelStats> {
    let usable = starred(records);
    (0u8..=4)
        .map(|score| {
            let stars: Vec<f64> = usable
                .iter()
                .filter(|r| r.quality_score == score)
                .map(|r| r.stars.unwrap() as f64)
                .collect();
            ScoreLevelStats {
                score,
                count: stars.len(),
                mean_stars: mean(&stars),
            }
        })
        .collect()
}

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.1}"),
        None => "-".to_owned(),
    }
}

fn fmt_summary(summary: &Option<FiveNumberSummary>) -> String {
    match summary {
        Some(s) => format!(
            "min {:.0} | q1 {:.0} | median {:.0} | q3 {:.0} | max {:.0}",
            s.min, s.q1, s.median, s.q3, s.max
        ),
        None => "no data".to_owned(),
    }
}

/// 终端报告; 不向数据集回写任何数值
pub fn render(records: &[QualityRecord]) -> String {
    let usable = starred(records);
    let excluded = records.len() - usable.len();
    info!(
        total = records.len(),
        usable = usable.len(),
        excluded,
        "analyzing final dataset"
    );

    let mut out = String::new();
    writeln!(out, "== repository quality vs popularity ==").unwrap();
    writeln!(
        out,
        "records: {} ({} without star counts, excluded from statistics)",
        records.len(),
        excluded
    )
    .unwrap();

    writeln!(out, "\n-- stars grouped by indicator (mean / std dev / n) --").unwrap();
    for group in indicator_stats(records) {
        writeln!(
            out,
            "{:12}  with: {} / {} (n={})   without: {} / {} (n={})",
            group.indicator,
            fmt_opt(group.with.mean_stars),
            fmt_opt(group.with.std_dev_stars),
            group.with.count,
            fmt_opt(group.without.mean_stars),
            fmt_opt(group.without.std_dev_stars),
            group.without.count,
        )
        .unwrap();
        writeln!(out, "{:12}    with: {}", "", fmt_summary(&group.with.summary)).unwrap();
        writeln!(
            out,
            "{:12} without: {}",
            "",
            fmt_summary(&group.without.summary)
        )
        .unwrap();
    }

    writeln!(out, "\n-- quality score vs stars --").unwrap();
    match score_star_correlation(records) {
        Some(r) => writeln!(out, "pearson r = {r:.4}").unwrap(),
        None => writeln!(out, "pearson r undefined (insufficient variance or data)").unwrap(),
    }
    for level in score_level_stats(records) {
        writeln!(
            out,
            "score {}: n={}, mean stars {}",
            level.score,
            level.count,
            fmt_opt(level.mean_stars)
        )
        .unwrap();
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::record::{CleanedRepository, QualityIndicators, QualityRecord};

    fn record(full_name: &str, stars: Option<i64>, indicators: QualityIndicators) -> QualityRecord {
        QualityRecord::from_parts(
            CleanedRepository {
                full_name: full_name.to_owned(),
                html_url: format!("https://github.com/{full_name}"),
                stars,
                forks: Some(1),
                watchers: stars,
                open_issues: Some(0),
                language: "Python".to_owned(),
                created_at: "2020-01-01T00:00:00Z".to_owned(),
                updated_at: "2024-01-01T00:00:00Z".to_owned(),
                age_days: 1600,
                recency_days: 100,
                age_human: "4 years 4 months".to_owned(),
                recency_human: "3 months".to_owned(),
            },
            indicators,
        )
    }

    fn all_true() -> QualityIndicators {
        QualityIndicators {
            has_readme: true,
            has_license: true,
            has_tests: true,
            has_ci: true,
        }
    }

    #[test]
    fn indicator_stats_partition_by_flag() {
        let records = vec![
            record("a/1", Some(100), all_true()),
            record("a/2", Some(200), all_true()),
            record(
                "a/3",
                Some(10),
                QualityIndicators {
                    has_readme: true,
                    ..Default::default()
                },
            ),
        ];
        let stats = indicator_stats(&records);
        let tests_group = stats.iter().find(|g| g.indicator == "has_tests").unwrap();
        assert_eq!(tests_group.with.count, 2);
        assert_eq!(tests_group.with.mean_stars, Some(150.0));
        assert_eq!(tests_group.without.count, 1);
        assert_eq!(tests_group.without.mean_stars, Some(10.0));
        // 单样本分组没有标准差
        assert_eq!(tests_group.without.std_dev_stars, None);

        let readme_group = stats.iter().find(|g| g.indicator == "has_readme").unwrap();
        assert_eq!(readme_group.without.count, 0);
        assert_eq!(readme_group.without.mean_stars, None);
    }

    #[test]
    fn records_without_stars_are_excluded_from_groups() {
        let records = vec![
            record("a/1", Some(100), all_true()),
            record("a/2", None, all_true()),
        ];
        let stats = indicator_stats(&records);
        assert_eq!(stats[0].with.count, 1);
        assert_eq!(starred(&records).len(), 1);
    }

    #[test]
    fn correlation_positive_when_score_tracks_stars() {
        let records = vec![
            record("a/0", Some(10), QualityIndicators::default()),
            record(
                "a/1",
                Some(100),
                QualityIndicators {
                    has_readme: true,
                    ..Default::default()
                },
            ),
            record(
                "a/2",
                Some(500),
                QualityIndicators {
                    has_readme: true,
                    has_license: true,
                    ..Default::default()
                },
            ),
            record("a/4", Some(2000), all_true()),
        ];
        let r = score_star_correlation(&records).unwrap();
        assert!(r > 0.8, "expected strong positive correlation, got {r}");
    }

    #[test]
    fn correlation_undefined_when_all_scores_equal() {
        let records = vec![
            record("a/1", Some(10), all_true()),
            record("a/2", Some(20), all_true()),
        ];
        assert_eq!(score_star_correlation(&records), None);
    }

    #[test]
    fn score_levels_cover_zero_through_four() {
        let records = vec![
            record("a/0", Some(10), QualityIndicators::default()),
            record("a/4", Some(100), all_true()),
            record("b/4", Some(300), all_true()),
        ];
        let levels = score_level_stats(&records);
        assert_eq!(levels.len(), 5);
        assert_eq!(levels[0].count, 1);
        assert_eq!(levels[4].count, 2);
        assert_eq!(levels[4].mean_stars, Some(200.0));
        assert_eq!(levels[2].count, 0);
        assert_eq!(levels[2].mean_stars, None);
    }

    #[test]
    fn render_mentions_exclusions_and_correlation() {
        let records = vec![
            record("a/0", Some(10), QualityIndicators::default()),
            record("a/4", Some(100), all_true()),
            record("a/na", None, all_true()),
        ];
        let text = render(&records);
        assert!(text.contains("1 without star counts"));
        assert!(text.contains("pearson r ="));
        assert!(text.contains("has_ci"));
    }
}
