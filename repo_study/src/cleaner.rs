use chrono::{DateTime, Utc};
use model::github::SearchResponse;
use model::record::CleanedRepository;
use storage::StudyStore;
use tracing::{info, warn};

/// 清洗阶段: 逐条派生, 顺序保持; 时间戳损坏的记录跳过, 不中断整批
pub fn run(store: &StudyStore) -> anyhow::Result<()> {
    let snapshot = store.read_raw_snapshot()?;
    let cleaned = clean_batch(&snapshot, Utc::now());
    info!(
        input = snapshot.items.len(),
        output = cleaned.len(),
        "cleaning finished"
    );
    store.write_cleaned(&cleaned)?;
    Ok(())
}

pub fn clean_batch(snapshot: &SearchResponse, now: DateTime<Utc>) -> Vec<CleanedRepository> {
    let mut cleaned = Vec::with_capacity(snapshot.items.len());
    for raw in &snapshot.items {
        match CleanedRepository::from_raw(raw, now) {
            Ok(record) => {
                // age >= recency >= 0 不成立时属数据质量缺陷, 记录保留
                if record.recency_days < 0 || record.age_days < record.recency_days {
                    warn!(
                        repo = %record.full_name,
                        age_days = record.age_days,
                        recency_days = record.recency_days,
                        "age/recency ordering violated"
                    );
                }
                cleaned.push(record);
            }
            Err(err) => {
                warn!(repo = %raw.full_name, %err, "skipping record with malformed timestamp");
            }
        }
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use model::github::RawRepository;

    fn raw(full_name: &str, created_at: &str, updated_at: &str) -> RawRepository {
        RawRepository {
            full_name: full_name.to_owned(),
            html_url: format!("https://github.com/{full_name}"),
            stargazers_count: Some(5),
            forks_count: Some(2),
            watchers_count: Some(5),
            open_issues_count: Some(1),
            created_at: created_at.to_owned(),
            updated_at: updated_at.to_owned(),
            language: Some("Python".to_owned()),
        }
    }

    fn snapshot(items: Vec<RawRepository>) -> SearchResponse {
        SearchResponse {
            total_count: items.len() as i64,
            incomplete_results: false,
            items,
        }
    }

    #[test]
    fn order_and_length_preserved_for_well_formed_input() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let input = snapshot(vec![
            raw("a/1", "2020-01-01T00:00:00Z", "2024-01-01T00:00:00Z"),
            raw("a/2", "2021-01-01T00:00:00Z", "2023-01-01T00:00:00Z"),
        ]);
        let cleaned = clean_batch(&input, now);
        assert_eq!(cleaned.len(), 2);
        assert_eq!(cleaned[0].full_name, "a/1");
        assert_eq!(cleaned[1].full_name, "a/2");
    }

    #[test]
    fn malformed_timestamp_skips_only_that_record() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let input = snapshot(vec![
            raw("a/1", "2020-01-01T00:00:00Z", "2024-01-01T00:00:00Z"),
            raw("a/bad", "garbage", "2024-01-01T00:00:00Z"),
            raw("a/3", "2021-01-01T00:00:00Z", "2023-01-01T00:00:00Z"),
        ]);
        let cleaned = clean_batch(&input, now);
        assert_eq!(cleaned.len(), 2);
        assert!(cleaned.iter().all(|r| r.full_name != "a/bad"));
    }
}
