//! Integration tests for the file-backed completion ledger

use reelsync_core::domain::newtypes::GroupPrefix;
use reelsync_core::ports::ledger::CompletionLedger;
use reelsync_ledger::FileLedger;

fn prefix(s: &str) -> GroupPrefix {
    GroupPrefix::new(s).unwrap()
}

#[tokio::test]
async fn test_open_missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = FileLedger::open(dir.path().join("ledger.json")).await.unwrap();

    assert_eq!(ledger.count().await, 0);
    assert!(!ledger.is_complete(&prefix("showA/")).await);
}

#[tokio::test]
async fn test_mark_complete_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.json");

    let ledger = FileLedger::open(&path).await.unwrap();
    ledger.mark_complete(&prefix("showA/")).await.unwrap();
    assert!(ledger.is_complete(&prefix("showA/")).await);
    drop(ledger);

    let reopened = FileLedger::open(&path).await.unwrap();
    assert!(reopened.is_complete(&prefix("showA/")).await);
    assert!(!reopened.is_complete(&prefix("showB/")).await);
    assert_eq!(reopened.count().await, 1);
}

#[tokio::test]
async fn test_clear_removes_entry_durably() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.json");

    let ledger = FileLedger::open(&path).await.unwrap();
    ledger.mark_complete(&prefix("showA/")).await.unwrap();
    ledger.mark_complete(&prefix("showB/")).await.unwrap();
    ledger.clear(&prefix("showA/")).await.unwrap();
    drop(ledger);

    let reopened = FileLedger::open(&path).await.unwrap();
    assert!(!reopened.is_complete(&prefix("showA/")).await);
    assert!(reopened.is_complete(&prefix("showB/")).await);
}

#[tokio::test]
async fn test_document_is_prefix_to_true_map() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.json");

    let ledger = FileLedger::open(&path).await.unwrap();
    ledger.mark_complete(&prefix("showA/")).await.unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(doc["showA/"], serde_json::Value::Bool(true));
}

#[tokio::test]
async fn test_corrupt_document_degrades_to_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.json");
    std::fs::write(&path, "not json {").unwrap();

    let ledger = FileLedger::open(&path).await.unwrap();
    assert_eq!(ledger.count().await, 0);

    // The ledger stays usable after the degraded open
    ledger.mark_complete(&prefix("showA/")).await.unwrap();
    assert!(ledger.is_complete(&prefix("showA/")).await);
}

#[tokio::test]
async fn test_mark_complete_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("deep").join("ledger.json");

    let ledger = FileLedger::open(&path).await.unwrap();
    ledger.mark_complete(&prefix("showA/")).await.unwrap();
    assert!(path.exists());
}
