use super::{EventLevel, EventLog, EventRecord, FlightSample};
use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::{Map, json};

fn sample(lrt: Option<i64>) -> FlightSample {
    let mut sample = FlightSample::bare(Utc.with_ymd_and_hms(2024, 7, 1, 3, 0, 0).unwrap(), lrt);
    sample.altitude = 1234.5;
    sample
}

#[test]
fn test_file_name_uses_local_date() {
    let dir = std::path::Path::new("/tmp/flights");
    let log = EventLog::for_date(dir, NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
    assert_eq!(log.path(), dir.join("2024-07-01-los-flight.log"));

    // 20:00 UTC is already the next day at UTC+9.
    let late = Utc.with_ymd_and_hms(2024, 7, 1, 20, 0, 0).unwrap();
    assert_eq!(EventLog::local_date(late), NaiveDate::from_ymd_opt(2024, 7, 2).unwrap());
    assert_eq!(log.path_at(late), dir.join("2024-07-01-los-flight.log"));
}

#[test]
fn test_daily_log_rolls_over_at_local_midnight() {
    let dir = std::path::Path::new("/tmp/flights");
    let log = EventLog::daily(dir);
    let before = Utc.with_ymd_and_hms(2024, 7, 1, 14, 59, 59).unwrap();
    let after = Utc.with_ymd_and_hms(2024, 7, 1, 15, 0, 0).unwrap();
    assert_eq!(log.path_at(before), dir.join("2024-07-01-los-flight.log"));
    assert_eq!(log.path_at(after), dir.join("2024-07-02-los-flight.log"));
}

#[tokio::test]
async fn test_daily_log_creates_dated_file() {
    let dir = tempfile::tempdir().unwrap();
    let log = EventLog::daily(dir.path());
    log.append(&sample(Some(1))).await.unwrap();
    let files: Vec<_> = std::fs::read_dir(dir.path()).unwrap().map(|e| e.unwrap().path()).collect();
    assert_eq!(files.len(), 1);
    assert!(files[0].to_string_lossy().ends_with("-los-flight.log"));
}

#[tokio::test]
async fn test_missing_file_reads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let log = EventLog::new(dir.path().join("absent.log"));
    assert!(log.read_all().await.unwrap().is_empty());
    assert!(log.tail(10).await.unwrap().is_empty());
    assert!(!log.update_by_key("event", &json!("x"), &Map::new()).await.unwrap());
}

#[tokio::test]
async fn test_events_and_samples_are_filtered_apart() {
    let dir = tempfile::tempdir().unwrap();
    let log = EventLog::new(dir.path().join("nested").join("flight.log"));
    let records = vec![
        EventRecord::new("Lift off", EventLevel::Important, sample(Some(1))),
        EventRecord::new("Main engine Ignition", EventLevel::Important, sample(Some(1))),
    ];
    log.append_all(&records).await.unwrap();
    log.append(&sample(Some(1))).await.unwrap();
    log.append(&sample(Some(2))).await.unwrap();

    assert_eq!(log.read_all().await.unwrap().len(), 4);
    assert_eq!(log.read_events().await.unwrap(), records);
    assert_eq!(log.read_filtered("event_level").await.unwrap().len(), 2);
    let tail = log.tail(2).await.unwrap();
    assert_eq!(tail.len(), 2);
    assert_eq!(tail[1]["launch_relative_time"], json!(2));
    assert!(tail.iter().all(|r| r.get("event").is_none()));
}

#[tokio::test]
async fn test_malformed_lines_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flight.log");
    tokio::fs::write(&path, "{\"event\":\"ok\"}\nnot json\n\n{\"altitude\":1.0}\n").await.unwrap();
    let log = EventLog::new(&path);
    let records = log.read_all().await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(log.read_filtered("altitude").await.unwrap(), vec![json!({"altitude": 1.0})]);
}

#[tokio::test]
async fn test_update_by_key_appends_patched_copy() {
    let dir = tempfile::tempdir().unwrap();
    let log = EventLog::new(dir.path().join("flight.log"));
    log.append(&EventRecord::new("Lift off", EventLevel::Important, sample(None))).await.unwrap();
    log.append(&sample(None)).await.unwrap();
    let before = tokio::fs::read_to_string(log.path()).await.unwrap();

    let mut patch = Map::new();
    patch.insert("launch_relative_time".to_string(), json!(0));
    assert!(log.update_by_key("event", &json!("Lift off"), &patch).await.unwrap());

    let after = tokio::fs::read_to_string(log.path()).await.unwrap();
    assert!(after.starts_with(&before));
    let records = log.read_all().await.unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["launch_relative_time"], json!(null));
    assert_eq!(records[2]["event"], json!("Lift off"));
    assert_eq!(records[2]["launch_relative_time"], json!(0));

    assert!(!log.update_by_key("event", &json!("Orbit"), &patch).await.unwrap());
    assert_eq!(log.read_all().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_concurrent_appends_keep_whole_lines() {
    let dir = tempfile::tempdir().unwrap();
    let log = std::sync::Arc::new(EventLog::new(dir.path().join("flight.log")));
    let writers: Vec<_> = (0..8)
        .map(|i| {
            let log = std::sync::Arc::clone(&log);
            tokio::spawn(async move {
                for _ in 0..10 {
                    log.append(&sample(Some(i))).await.unwrap();
                }
            })
        })
        .collect();
    for writer in writers {
        writer.await.unwrap();
    }
    assert_eq!(log.read_all().await.unwrap().len(), 80);
}

#[tokio::test]
async fn test_interleaved_events_read_back_in_order() {
    use rand::Rng;
    let dir = tempfile::tempdir().unwrap();
    let log = EventLog::new(dir.path().join("flight.log"));
    let mut rng = rand::rng();
    let count = rng.random_range(5..40);
    for idx in 0..count {
        if rng.random_bool(0.5) {
            log.append(&sample(Some(idx))).await.unwrap();
        }
        log.append(&EventRecord::new(format!("event {idx}"), EventLevel::Normal, sample(Some(idx))))
            .await
            .unwrap();
    }
    let events = log.read_filtered("event").await.unwrap();
    assert_eq!(events.len(), usize::try_from(count).unwrap());
    for (idx, event) in events.iter().enumerate() {
        assert_eq!(event["event"], json!(format!("event {idx}")));
    }
}
