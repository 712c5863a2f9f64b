use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;
use shellguard_protocol::{ExecutionStatus, RiskLevel};
use tempfile::TempDir;

use crate::history::{DEFAULT_QUERY_LIMIT, HistoryQuery, HistoryStore, NewHistoryRecord};

fn temp_store() -> (TempDir, HistoryStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = HistoryStore::open(dir.path().join("history.db")).unwrap();
    (dir, store)
}

fn sample(user_input: &str, command: &str) -> NewHistoryRecord {
    NewHistoryRecord::new(user_input, command, ExecutionStatus::Success, RiskLevel::Low)
}

#[test]
fn test_append_and_get_round_trip() {
    let (_dir, store) = temp_store();
    let record = NewHistoryRecord::new(
        "show running processes",
        "Get-Process | Sort-Object CPU",
        ExecutionStatus::Success,
        RiskLevel::Low,
    )
    .with_output("calc  1.25\nnotepad  0.50");

    let id = store.append(&record).unwrap();
    let stored = store.get(id).unwrap().unwrap();

    assert_eq!(stored.id, id);
    assert_eq!(stored.user_input, "show running processes");
    assert_eq!(stored.command, "Get-Process | Sort-Object CPU");
    assert_eq!(stored.status, ExecutionStatus::Success);
    assert_eq!(stored.output.as_deref(), Some("calc  1.25\nnotepad  0.50"));
    assert_eq!(stored.risk_level, RiskLevel::Low);
}

#[test]
fn test_append_redacts_secrets() {
    let (_dir, store) = temp_store();
    let id = store
        .append(&sample(
            "connect to the share",
            "Connect-Share -Path X: -Password hunter2",
        ))
        .unwrap();

    let stored = store.get(id).unwrap().unwrap();
    assert_eq!(stored.command, "Connect-Share -Path X: -Password ***");
}

#[test]
fn test_query_returns_newest_first() {
    let (_dir, store) = temp_store();
    let first = store.append(&sample("one", "Get-Date")).unwrap();
    let second = store.append(&sample("two", "Get-Date")).unwrap();
    let third = store.append(&sample("three", "Get-Date")).unwrap();

    let records = store.query(&HistoryQuery::new()).unwrap();
    let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![third, second, first]);
}

#[test]
fn test_keyword_matches_input_or_command() {
    let (_dir, store) = temp_store();
    store
        .append(&sample("check the firewall", "Get-NetFirewallRule"))
        .unwrap();
    store
        .append(&sample("list services", "Get-Service -Name Firewall*"))
        .unwrap();
    store.append(&sample("what time is it", "Get-Date")).unwrap();

    let records = store
        .query(&HistoryQuery::new().with_keyword("firewall"))
        .unwrap();
    assert_eq!(records.len(), 2);
}

#[test]
fn test_date_bounds() {
    let (_dir, store) = temp_store();
    store.append(&sample("one", "Get-Date")).unwrap();
    store.append(&sample("two", "Get-Date")).unwrap();

    let past = Utc::now() - Duration::hours(1);
    let future = Utc::now() + Duration::hours(1);

    let from_past = store.query(&HistoryQuery::new().with_from(past)).unwrap();
    assert_eq!(from_past.len(), 2);

    let from_future = store.query(&HistoryQuery::new().with_from(future)).unwrap();
    assert!(from_future.is_empty());

    let to_past = store.query(&HistoryQuery::new().with_to(past)).unwrap();
    assert!(to_past.is_empty());
}

#[test]
fn test_filters_are_conjunctive() {
    let (_dir, store) = temp_store();
    store.append(&sample("clean temp files", "Remove-Item $env:TEMP\\*")).unwrap();
    store.append(&sample("show temp files", "Get-ChildItem $env:TEMP")).unwrap();

    let future = Utc::now() + Duration::hours(1);
    let none = store
        .query(&HistoryQuery::new().with_keyword("temp").with_from(future))
        .unwrap();
    assert!(none.is_empty());

    let past = Utc::now() - Duration::hours(1);
    let both = store
        .query(&HistoryQuery::new().with_keyword("temp").with_from(past))
        .unwrap();
    assert_eq!(both.len(), 2);
}

#[test]
fn test_limit_applies() {
    let (_dir, store) = temp_store();
    for i in 0..5 {
        store.append(&sample(&format!("request {i}"), "Get-Date")).unwrap();
    }

    let records = store.query(&HistoryQuery::new().with_limit(2)).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].user_input, "request 4");
    assert_eq!(records[1].user_input, "request 3");
}

#[test]
fn test_default_limit_applies() {
    let (_dir, store) = temp_store();
    for i in 0..(DEFAULT_QUERY_LIMIT + 10) {
        store.append(&sample(&format!("request {i}"), "Get-Date")).unwrap();
    }

    let records = store.query(&HistoryQuery::new()).unwrap();
    assert_eq!(records.len(), DEFAULT_QUERY_LIMIT);
}

#[test]
fn test_delete() {
    let (_dir, store) = temp_store();
    let id = store.append(&sample("one", "Get-Date")).unwrap();

    assert!(store.delete(id).unwrap());
    assert!(store.get(id).unwrap().is_none());
    assert!(!store.delete(id).unwrap());
}

#[test]
fn test_clear() {
    let (_dir, store) = temp_store();
    for _ in 0..3 {
        store.append(&sample("one", "Get-Date")).unwrap();
    }

    assert_eq!(store.clear().unwrap(), 3);
    assert!(store.query(&HistoryQuery::new()).unwrap().is_empty());
}

#[test]
fn test_delete_older_than_respects_cutoff() {
    let (_dir, store) = temp_store();
    store.append(&sample("one", "Get-Date")).unwrap();
    store.append(&sample("two", "Get-Date")).unwrap();

    let past = Utc::now() - Duration::hours(1);
    assert_eq!(store.delete_older_than(past).unwrap(), 0);

    let future = Utc::now() + Duration::hours(1);
    assert_eq!(store.delete_older_than(future).unwrap(), 2);
    assert!(store.query(&HistoryQuery::new()).unwrap().is_empty());
}

#[test]
fn test_export_json_shape() {
    let (_dir, store) = temp_store();
    store
        .append(&sample("what time is it", "Get-Date").with_output("Saturday 10:00"))
        .unwrap();
    store.append(&sample("list files", "Get-ChildItem")).unwrap();

    let json = store.export_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let entries = value.as_array().unwrap();
    assert_eq!(entries.len(), 2);

    // Newest first, so the output-less record leads and omits the field.
    assert_eq!(entries[0]["command"], "Get-ChildItem");
    assert!(entries[0].get("output").is_none());
    assert_eq!(entries[1]["output"], "Saturday 10:00");
    assert_eq!(entries[1]["status"], "success");
    assert_eq!(entries[1]["risk_level"], "low");
}
