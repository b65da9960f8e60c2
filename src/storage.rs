use crate::errors::AppError;
use crate::models::{ActivityRecord, AppData, AttendanceRecord, Employee};
use crate::summary::Snapshot;
use futures::future::join_all;
use std::{future::Future, path::Path, path::PathBuf, sync::Arc};
use tokio::{fs, sync::Mutex};
use tracing::{error, warn};

/// Where the roster and the record streams come from.
///
/// Each fetch is independent; callers must not assume any ordering between
/// them.
pub trait RecordSource: Sync {
    fn fetch_roster(&self) -> impl Future<Output = Result<Vec<Employee>, AppError>> + Send;

    fn fetch_attendance(
        &self,
    ) -> impl Future<Output = Result<Vec<AttendanceRecord>, AppError>> + Send;

    fn fetch_activity(
        &self,
        feed: &str,
    ) -> impl Future<Output = Result<Vec<ActivityRecord>, AppError>> + Send;
}

/// Fetches every source concurrently. A source that fails contributes no
/// records instead of failing the whole snapshot.
pub async fn fetch_snapshot<S: RecordSource>(source: &S, feeds: &[String]) -> Snapshot {
    let activity = join_all(feeds.iter().map(|feed| async move {
        let records = or_empty(feed, source.fetch_activity(feed).await);
        (feed.clone(), records)
    }));

    let (roster, attendance, activity) =
        tokio::join!(source.fetch_roster(), source.fetch_attendance(), activity);

    Snapshot {
        roster: or_empty("roster", roster),
        attendance: or_empty("attendance", attendance),
        feeds: activity.into_iter().collect(),
    }
}

fn or_empty<T>(source: &str, fetched: Result<Vec<T>, AppError>) -> Vec<T> {
    fetched.unwrap_or_else(|err| {
        warn!(source, error = %err, "fetch failed, treating source as empty");
        Vec::new()
    })
}

/// The JSON-file record store. The document is loaded once and every write
/// persists the whole thing.
#[derive(Clone)]
pub struct JsonStore {
    pub path: PathBuf,
    pub data: Arc<Mutex<AppData>>,
}

impl JsonStore {
    pub fn new(path: PathBuf, data: AppData) -> Self {
        Self {
            path,
            data: Arc::new(Mutex::new(data)),
        }
    }
}

impl RecordSource for JsonStore {
    async fn fetch_roster(&self) -> Result<Vec<Employee>, AppError> {
        Ok(self.data.lock().await.employees.clone())
    }

    async fn fetch_attendance(&self) -> Result<Vec<AttendanceRecord>, AppError> {
        Ok(self.data.lock().await.attendance.values().cloned().collect())
    }

    async fn fetch_activity(&self, feed: &str) -> Result<Vec<ActivityRecord>, AppError> {
        let data = self.data.lock().await;
        Ok(data
            .feeds
            .get(feed)
            .map(|records| records.values().cloned().collect())
            .unwrap_or_default())
    }
}

pub async fn load_data(path: &Path) -> AppData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!("failed to parse data file: {err}");
                AppData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => AppData::default(),
        Err(err) => {
            error!("failed to read data file: {err}");
            AppData::default()
        }
    }
}

pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data)?;
    fs::write(path, payload).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DateLike;
    use std::collections::BTreeMap;

    struct FlakySource {
        fail_roster: bool,
        fail_feed: &'static str,
    }

    impl RecordSource for FlakySource {
        async fn fetch_roster(&self) -> Result<Vec<Employee>, AppError> {
            if self.fail_roster {
                return Err(AppError::not_found("roster unavailable"));
            }
            Ok(vec![Employee {
                id: "e1".into(),
                name: "Asha".into(),
                ..Employee::default()
            }])
        }

        async fn fetch_attendance(&self) -> Result<Vec<AttendanceRecord>, AppError> {
            Ok(vec![AttendanceRecord {
                employee_id: Some("e1".into()),
                date: Some(DateLike::Text("01-03-2024".into())),
                status: Some("Present".into()),
                ..AttendanceRecord::default()
            }])
        }

        async fn fetch_activity(&self, feed: &str) -> Result<Vec<ActivityRecord>, AppError> {
            if feed == self.fail_feed {
                return Err(AppError::not_found(format!("{feed} unavailable")));
            }
            Ok(vec![ActivityRecord {
                name: Some("Asha".into()),
                date: Some(DateLike::Text("01-03-2024".into())),
                status: Some("yes".into()),
                ..ActivityRecord::default()
            }])
        }
    }

    fn feeds() -> Vec<String> {
        vec!["clickup".into(), "trackabi".into()]
    }

    #[tokio::test]
    async fn failed_feed_becomes_empty() {
        let source = FlakySource {
            fail_roster: false,
            fail_feed: "trackabi",
        };

        let snapshot = fetch_snapshot(&source, &feeds()).await;
        assert_eq!(snapshot.roster.len(), 1);
        assert_eq!(snapshot.attendance.len(), 1);
        assert_eq!(snapshot.feeds["clickup"].len(), 1);
        assert!(snapshot.feeds["trackabi"].is_empty());
    }

    #[tokio::test]
    async fn failed_roster_becomes_empty() {
        let source = FlakySource {
            fail_roster: true,
            fail_feed: "",
        };

        let snapshot = fetch_snapshot(&source, &feeds()).await;
        assert!(snapshot.roster.is_empty());
        assert_eq!(snapshot.feeds.len(), 2);
    }

    #[tokio::test]
    async fn json_store_serves_missing_feeds_as_empty() {
        let mut data = AppData::default();
        data.feeds.insert(
            "clickup".into(),
            BTreeMap::from([(
                "e1_01-03-2024".to_string(),
                ActivityRecord {
                    name: Some("Asha".into()),
                    ..ActivityRecord::default()
                },
            )]),
        );
        let store = JsonStore::new(PathBuf::from("unused.json"), data);

        assert_eq!(store.fetch_activity("clickup").await.unwrap().len(), 1);
        assert!(store.fetch_activity("workdone").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn load_tolerates_missing_and_corrupt_files() {
        let mut path = std::env::temp_dir();
        path.push(format!("attendance_board_storage_{}.json", std::process::id()));

        let _ = fs::remove_file(&path).await;
        assert!(load_data(&path).await.employees.is_empty());

        fs::write(&path, b"{ not json").await.unwrap();
        assert!(load_data(&path).await.employees.is_empty());

        let mut data = AppData::default();
        data.employees.push(Employee {
            id: "e1".into(),
            name: "Asha".into(),
            ..Employee::default()
        });
        persist_data(&path, &data).await.unwrap();
        assert_eq!(load_data(&path).await.employees, data.employees);

        let _ = fs::remove_file(&path).await;
    }
}
