use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::github::RawRepository;

// language 缺失时的占位值
pub const UNKNOWN_LANGUAGE: &str = "Unknown";

#[derive(Debug, Error)]
pub enum CleanError {
    #[error("malformed timestamp `{value}` in field `{field}`: {source}")]
    MalformedTimestamp {
        field: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

// 清洗后的仓库记录, 与原始记录一一对应
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CleanedRepository {
    pub full_name: String,
    pub html_url: String,
    pub stars: Option<i64>,
    pub forks: Option<i64>,
    pub watchers: Option<i64>,
    pub open_issues: Option<i64>,
    pub language: String,
    pub created_at: String,
    pub updated_at: String,
    pub age_days: i64,
    pub recency_days: i64,
    pub age_human: String,
    pub recency_human: String,
}

impl CleanedRepository {
    /// 由原始记录派生, `now` 由调用方一次性取定
    pub fn from_raw(raw: &RawRepository, now: DateTime<Utc>) -> Result<Self, CleanError> {
        let created = parse_timestamp("created_at", &raw.created_at)?;
        let updated = parse_timestamp("updated_at", &raw.updated_at)?;
        let age_days = (now - created).num_days();
        let recency_days = (now - updated).num_days();

        Ok(Self {
            full_name: raw.full_name.clone(),
            html_url: raw.html_url.clone(),
            stars: raw.stargazers_count,
            forks: raw.forks_count,
            watchers: raw.watchers_count,
            open_issues: raw.open_issues_count,
            language: raw
                .language
                .clone()
                .unwrap_or_else(|| UNKNOWN_LANGUAGE.to_owned()),
            created_at: raw.created_at.clone(),
            updated_at: raw.updated_at.clone(),
            age_days,
            recency_days,
            age_human: format_days(age_days),
            recency_human: format_days(recency_days),
        })
    }
}

fn parse_timestamp(field: &'static str, value: &str) -> Result<DateTime<Utc>, CleanError> {
    value
        .parse::<DateTime<Utc>>()
        .map_err(|source| CleanError::MalformedTimestamp {
            field,
            value: value.to_owned(),
            source,
        })
}

/// 将天数渲染为可读文本, 如 "3 years 2 months"
pub fn format_days(days: i64) -> String {
    if days < 0 {
        return format!("{days} days");
    }
    let years = days / 365;
    let months = (days % 365) / 30;
    match (years, months) {
        (0, 0) => format!("{} {}", days, unit(days, "day")),
        (0, m) => format!("{} {}", m, unit(m, "month")),
        (y, 0) => format!("{} {}", y, unit(y, "year")),
        (y, m) => format!("{} {} {} {}", y, unit(y, "year"), m, unit(m, "month")),
    }
}

fn unit(n: i64, singular: &str) -> String {
    if n == 1 {
        singular.to_owned()
    } else {
        format!("{singular}s")
    }
}

// 四个质量指标, 由根目录列表判定
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QualityIndicators {
    pub has_readme: bool,
    pub has_license: bool,
    pub has_tests: bool,
    pub has_ci: bool,
}

impl QualityIndicators {
    /// 综合质量分 = 四个指标之和
    pub fn score(&self) -> u8 {
        self.has_readme as u8 + self.has_license as u8 + self.has_tests as u8 + self.has_ci as u8
    }
}

// 最终记录: 清洗字段 + 指标 + 综合分
// quality_score 只在构造时计算, 不单独改写
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct QualityRecord {
    pub full_name: String,
    pub html_url: String,
    pub stars: Option<i64>,
    pub forks: Option<i64>,
    pub watchers: Option<i64>,
    pub open_issues: Option<i64>,
    pub language: String,
    pub created_at: String,
    pub updated_at: String,
    pub age_days: i64,
    pub recency_days: i64,
    pub age_human: String,
    pub recency_human: String,
    pub has_readme: bool,
    pub has_license: bool,
    pub has_tests: bool,
    pub has_ci: bool,
    pub quality_score: u8,
}

impl QualityRecord {
    pub fn from_parts(repo: CleanedRepository, indicators: QualityIndicators) -> Self {
        Self {
            full_name: repo.full_name,
            html_url: repo.html_url,
            stars: repo.stars,
            forks: repo.forks,
            watchers: repo.watchers,
            open_issues: repo.open_issues,
            language: repo.language,
            created_at: repo.created_at,
            updated_at: repo.updated_at,
            age_days: repo.age_days,
            recency_days: repo.recency_days,
            age_human: repo.age_human,
            recency_human: repo.recency_human,
            has_readme: indicators.has_readme,
            has_license: indicators.has_license,
            has_tests: indicators.has_tests,
            has_ci: indicators.has_ci,
            quality_score: indicators.score(),
        }
    }
}
