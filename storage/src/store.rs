use std::fs;
use std::path::{Path, PathBuf};

use model::github::SearchResponse;
use model::record::{CleanedRepository, QualityRecord};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use crate::error::StorageError;

// 三个阶段产物的落盘位置
// 每个文件只由一个阶段写入, 由下一个阶段读取
#[derive(Debug, Clone)]
pub struct StudyStore {
    raw_path: PathBuf,
    cleaned_path: PathBuf,
    final_path: PathBuf,
}

impl StudyStore {
    pub fn new(
        raw_path: impl Into<PathBuf>,
        cleaned_path: impl Into<PathBuf>,
        final_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            raw_path: raw_path.into(),
            cleaned_path: cleaned_path.into(),
            final_path: final_path.into(),
        }
    }

    /// 原始响应体原样写入, 一次写成
    pub fn write_raw_snapshot(&self, body: &str) -> Result<(), StorageError> {
        ensure_parent(&self.raw_path)?;
        fs::write(&self.raw_path, body)?;
        info!(path = %self.raw_path.display(), bytes = body.len(), "raw snapshot written");
        Ok(())
    }

    pub fn read_raw_snapshot(&self) -> Result<SearchResponse, StorageError> {
        let body = fs::read_to_string(&self.raw_path)?;
        Ok(serde_json::from_str(&body)?)
    }

    pub fn write_cleaned(&self, records: &[CleanedRepository]) -> Result<(), StorageError> {
        write_csv(&self.cleaned_path, records)
    }

    pub fn read_cleaned(&self) -> Result<Vec<CleanedRepository>, StorageError> {
        read_csv(&self.cleaned_path)
    }

    pub fn write_final(&self, records: &[QualityRecord]) -> Result<(), StorageError> {
        write_csv(&self.final_path, records)
    }

    pub fn read_final(&self) -> Result<Vec<QualityRecord>, StorageError> {
        read_csv(&self.final_path)
    }
}

fn write_csv<T: Serialize>(path: &Path, records: &[T]) -> Result<(), StorageError> {
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    info!(path = %path.display(), rows = records.len(), "tabular dataset written");
    Ok(())
}

fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StorageError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}

fn ensure_parent(path: &Path) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::record::{QualityIndicators, QualityRecord};

    fn store_in(dir: &Path) -> StudyStore {
        StudyStore::new(
            dir.join("data/raw_search.json"),
            dir.join("data/cleaned.csv"),
            dir.join("data/quality.csv"),
        )
    }

    fn cleaned(full_name: &str, stars: Option<i64>) -> CleanedRepository {
        CleanedRepository {
            full_name: full_name.to_owned(),
            html_url: format!("https://github.com/{full_name}"),
            stars,
            forks: Some(10),
            watchers: stars,
            open_issues: Some(3),
            language: "Python".to_owned(),
            created_at: "2020-01-01T00:00:00Z".to_owned(),
            updated_at: "2024-01-01T00:00:00Z".to_owned(),
            age_days: 1600,
            recency_days: 100,
            age_human: "4 years 4 months".to_owned(),
            recency_human: "3 months".to_owned(),
        }
    }

    #[test]
    fn raw_snapshot_is_stored_verbatim_and_readable() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        let body = r#"{
            "total_count": 1,
            "incomplete_results": false,
            "items": [{
                "full_name": "a/b",
                "html_url": "https://github.com/a/b",
                "stargazers_count": 7,
                "created_at": "2020-01-01T00:00:00Z",
                "updated_at": "2020-06-01T00:00:00Z",
                "language": "Python",
                "an_extra_field_we_do_not_model": true
            }]
        }"#;
        store.write_raw_snapshot(body).unwrap();

        let on_disk = fs::read_to_string(dir.path().join("data/raw_search.json")).unwrap();
        assert_eq!(on_disk, body);

        let parsed = store.read_raw_snapshot().unwrap();
        assert_eq!(parsed.items.len(), 1);
        assert_eq!(parsed.items[0].full_name, "a/b");
    }

    #[test]
    fn cleaned_round_trip_preserves_absent_counters() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        let records = vec![cleaned("a/b", Some(42)), cleaned("c/d", None)];
        store.write_cleaned(&records).unwrap();

        let back = store.read_cleaned().unwrap();
        assert_eq!(back, records);
        assert_eq!(back[1].stars, None);
    }

    #[test]
    fn final_round_trip_keeps_indicators_and_score() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        let records = vec![
            QualityRecord::from_parts(
                cleaned("a/b", Some(42)),
                QualityIndicators {
                    has_readme: true,
                    has_license: true,
                    has_tests: false,
                    has_ci: true,
                },
            ),
            QualityRecord::from_parts(cleaned("c/d", None), QualityIndicators::default()),
        ];
        store.write_final(&records).unwrap();

        let back = store.read_final().unwrap();
        assert_eq!(back, records);
        assert_eq!(back[0].quality_score, 3);
        assert_eq!(back[1].quality_score, 0);
    }
}
