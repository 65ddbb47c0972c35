use super::records::EventRecord;
use crate::warn;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use strum_macros::Display;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

#[derive(Debug, Display)]
pub enum RecorderError {
    Io(std::io::Error),
    Serialize(serde_json::Error),
}

impl std::error::Error for RecorderError {}

impl From<std::io::Error> for RecorderError {
    fn from(value: std::io::Error) -> Self { RecorderError::Io(value) }
}

impl From<serde_json::Error> for RecorderError {
    fn from(value: serde_json::Error) -> Self { RecorderError::Serialize(value) }
}

/// Where the records of an [`EventLog`] go.
enum LogTarget {
    File(PathBuf),
    /// One file per local date inside the directory, picked per operation.
    Daily(PathBuf),
}

/// Append-only, line-delimited JSON log.
///
/// Prior lines are never modified. [`update_by_key`](EventLog::update_by_key)
/// rewrites the file but only ever adds the patched copy at the end.
pub struct EventLog {
    target: LogTarget,
    write_lock: Mutex<()>,
}

impl EventLog {
    /// Offset of the mission's local time zone (UTC+9), used for file names.
    const LOCAL_OFFSET_SECS: i32 = 9 * 3600;
    const FILE_SUFFIX: &'static str = "los-flight.log";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { target: LogTarget::File(path.into()), write_lock: Mutex::new(()) }
    }

    /// Log of the given local date inside `dir`, e.g. `2024-07-01-los-flight.log`.
    pub fn for_date(dir: &Path, date: NaiveDate) -> Self { Self::new(Self::dated_path(dir, date)) }

    /// Log that follows the local date: every operation resolves the file of
    /// the day it runs on, so a process running past midnight rolls over.
    pub fn daily(dir: impl Into<PathBuf>) -> Self {
        Self { target: LogTarget::Daily(dir.into()), write_lock: Mutex::new(()) }
    }

    fn dated_path(dir: &Path, date: NaiveDate) -> PathBuf {
        dir.join(format!("{}-{}", date.format("%Y-%m-%d"), Self::FILE_SUFFIX))
    }

    /// The date of `now` at UTC+9.
    pub fn local_date(now: DateTime<Utc>) -> NaiveDate {
        FixedOffset::east_opt(Self::LOCAL_OFFSET_SECS)
            .map_or_else(|| now.date_naive(), |offset| now.with_timezone(&offset).date_naive())
    }

    /// The file an operation running at `now` uses.
    pub fn path_at(&self, now: DateTime<Utc>) -> PathBuf {
        match &self.target {
            LogTarget::File(path) => path.clone(),
            LogTarget::Daily(dir) => Self::dated_path(dir, Self::local_date(now)),
        }
    }

    pub fn path(&self) -> PathBuf { self.path_at(Utc::now()) }

    async fn open_append(path: &Path) -> Result<tokio::fs::File, RecorderError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(tokio::fs::OpenOptions::new().create(true).append(true).open(path).await?)
    }

    /// Writes `record` as one JSON line.
    pub async fn append<T: serde::Serialize + ?Sized>(&self, record: &T) -> Result<(), RecorderError> {
        self.append_all(std::slice::from_ref(&record)).await
    }

    /// Writes all records in order with a single write.
    pub async fn append_all<T: serde::Serialize>(&self, records: &[T]) -> Result<(), RecorderError> {
        if records.is_empty() {
            return Ok(());
        }
        let mut buffer = Vec::new();
        for record in records {
            serde_json::to_writer(&mut buffer, record)?;
            buffer.push(b'\n');
        }
        let _guard = self.write_lock.lock().await;
        let mut file = Self::open_append(&self.path()).await?;
        file.write_all(&buffer).await?;
        file.flush().await?;
        Ok(())
    }

    async fn read_lines(path: &Path) -> Result<Vec<String>, RecorderError> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Ok(content
                .lines()
                .filter(|l| !l.trim().is_empty())
                .map(str::to_string)
                .collect()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// All records in file order. A missing file reads as empty; malformed
    /// lines are skipped.
    pub async fn read_all(&self) -> Result<Vec<Value>, RecorderError> {
        let path = self.path();
        let lines = Self::read_lines(&path).await?;
        Ok(lines
            .iter()
            .enumerate()
            .filter_map(|(idx, line)| match serde_json::from_str::<Value>(line) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!("Skipping malformed line {} of {}: {e}", idx + 1, path.display());
                    None
                }
            })
            .collect())
    }

    /// Records that carry `key`, in file order.
    pub async fn read_filtered(&self, key: &str) -> Result<Vec<Value>, RecorderError> {
        let mut records = self.read_all().await?;
        records.retain(|r| r.get(key).is_some());
        Ok(records)
    }

    /// Event records decoded into their typed form.
    pub async fn read_events(&self) -> Result<Vec<EventRecord>, RecorderError> {
        Ok(self
            .read_filtered("event")
            .await?
            .into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect())
    }

    /// The last `n` records.
    pub async fn tail(&self, n: usize) -> Result<Vec<Value>, RecorderError> {
        let mut records = self.read_all().await?;
        let skip = records.len().saturating_sub(n);
        Ok(records.split_off(skip))
    }

    /// Copies the first record with `record[key] == value`, applies `patch`
    /// to the copy and appends it as the new last record. Earlier lines stay
    /// byte-identical. Returns whether a record matched.
    pub async fn update_by_key(
        &self,
        key: &str,
        value: &Value,
        patch: &Map<String, Value>,
    ) -> Result<bool, RecorderError> {
        let _guard = self.write_lock.lock().await;
        let path = self.path();
        let lines = Self::read_lines(&path).await?;
        let matched = lines
            .iter()
            .filter_map(|l| serde_json::from_str::<Value>(l).ok())
            .find(|r| r.get(key) == Some(value));
        let Some(Value::Object(mut record)) = matched else {
            return Ok(false);
        };
        for (k, v) in patch {
            record.insert(k.clone(), v.clone());
        }

        let mut content = lines.join("\n");
        content.push('\n');
        content.push_str(&serde_json::to_string(&record)?);
        content.push('\n');

        let tmp = path.with_extension("log.tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(true)
    }
}
