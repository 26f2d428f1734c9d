mod helpers;

use axum::http::StatusCode;
use carelog::residents::{dedup, overview, query, store};
use chrono::{Duration, TimeZone, Utc};
use helpers::{get, test_app, test_config, test_db};

#[test]
fn query_window_and_ordering() {
    let mut conn = test_db();
    let now = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();

    store::log_observation_at(&mut conn, "Ruth", "ten days ago", now - Duration::days(10)).unwrap();
    store::log_observation_at(&mut conn, "Ruth", "two days ago", now - Duration::days(2)).unwrap();
    store::log_observation_at(&mut conn, "Ruth", "an hour ago", now - Duration::hours(1)).unwrap();
    store::log_observation_at(&mut conn, "Walter", "other resident", now).unwrap();

    let rows = query::query_observations_at(&conn, "Ruth", 7, now).unwrap();
    let notes: Vec<&str> = rows.iter().map(|r| r.note.as_str()).collect();
    assert_eq!(notes, vec!["an hour ago", "two days ago"]);
    assert!(rows.iter().all(|r| r.resident_name == "Ruth"));

    let wide = query::query_observations_at(&conn, "Ruth", 30, now).unwrap();
    assert_eq!(wide.len(), 3);
}

#[test]
fn same_timestamp_orders_by_id_descending() {
    let mut conn = test_db();
    let at = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();
    let first = store::log_observation_at(&mut conn, "Ruth", "first", at).unwrap();
    let second = store::log_observation_at(&mut conn, "Ruth", "second", at).unwrap();

    let rows = query::query_observations_at(&conn, "Ruth", 1, at).unwrap();
    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![second, first]);
}

#[test]
fn residents_are_created_once() {
    let mut conn = test_db();
    store::log_observation(&mut conn, "Ruth", "a").unwrap();
    store::log_observation(&mut conn, "Ruth", "b").unwrap();

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM residents", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn duplicate_guard_is_scoped_to_window_and_resident() {
    let mut conn = test_db();
    let now = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();
    store::log_observation_at(&mut conn, "Ruth", "Took meds", now - Duration::minutes(5)).unwrap();

    assert!(dedup::is_recent_duplicate_at(&conn, "Ruth", "Took meds", 10, now).unwrap());
    assert!(!dedup::is_recent_duplicate_at(&conn, "Ruth", "Took meds", 3, now).unwrap());
    assert!(!dedup::is_recent_duplicate_at(&conn, "Walter", "Took meds", 10, now).unwrap());
    assert!(!dedup::is_recent_duplicate_at(&conn, "Ruth", "took meds", 10, now).unwrap());
}

#[test]
fn overview_limit_caps_each_resident() {
    let mut conn = test_db();
    for note in ["a", "b", "c"] {
        store::log_observation(&mut conn, "Zed", note).unwrap();
    }
    store::log_observation(&mut conn, "Ada", "only").unwrap();

    let all = overview::list_residents_with_observations(&conn, None).unwrap();
    let names: Vec<&str> = all.iter().map(|r| r.resident.name.as_str()).collect();
    assert_eq!(names, vec!["Ada", "Zed"]);
    assert_eq!(all[1].observations.len(), 3);

    let capped = overview::list_residents_with_observations(&conn, Some(2)).unwrap();
    assert_eq!(capped[1].observations.len(), 2);
    assert_eq!(capped[0].observations.len(), 1);
}

#[tokio::test]
async fn overview_endpoint() {
    let (app, db) = test_app(test_config());
    {
        let mut conn = db.lock().unwrap();
        store::log_observation(&mut conn, "Ruth", "Read the paper").unwrap();
        store::log_observation(&mut conn, "Ruth", "Called family").unwrap();
    }

    let resp = get(&app, "/api/residents?limit=1").await;
    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert_eq!(body[0]["name"], "Ruth");
    assert_eq!(body[0]["observations"].as_array().unwrap().len(), 1);

    let health = get(&app, "/health").await;
    assert_eq!(health.json()["ok"], true);
}

#[tokio::test]
async fn overview_json_is_flat() {
    let (app, db) = test_app(test_config());
    {
        let mut conn = db.lock().unwrap();
        store::log_observation(&mut conn, "Ada", "Sang at breakfast").unwrap();
    }

    let body = get(&app, "/api/residents").await.json();
    let keys: Vec<&String> = body[0].as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["id", "name", "observations"]);
}
