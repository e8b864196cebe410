#![expect(clippy::unwrap_used)]

use std::sync::Arc;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tracker_backend_client::{ApiClient, TripUpdate};
use tracker_core::sync::{REFRESH_FALLBACK, normalize_error, refetch_plan};
use tracker_core::{BULK_REFRESH, DashboardState, MutationKind, Ranges, Synchronizer};

fn today() -> NaiveDate {
    "2026-03-01".parse().unwrap()
}

fn ranges() -> Ranges {
    Ranges::for_today(today(), 90, 25)
}

async fn synchronizer(server: &MockServer, home: &TempDir) -> Synchronizer {
    let base = Url::parse(&server.uri()).unwrap();
    let client = ApiClient::new(base, home.path().to_path_buf()).unwrap();
    Synchronizer::new(Arc::new(client))
}

async fn mount_read(server: &MockServer, route: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_full_read_set(server: &MockServer) {
    mount_read(server, "/api/summary", serde_json::json!({"today": "2026-03-01"})).await;
    mount_read(
        server,
        "/api/review/weekly",
        serde_json::json!({"week_start": "2026-03-01", "week_end": "2026-03-07"}),
    )
    .await;
    mount_read(server, "/api/checkins", serde_json::json!([])).await;
    mount_read(
        server,
        "/api/fitness/metrics",
        serde_json::json!({"metrics": [], "photos": [], "latest": {}}),
    )
    .await;
    mount_read(
        server,
        "/api/mortgage/summary",
        serde_json::json!({
            "mortgage_start_principal": 330000.0,
            "mortgage_target_principal": 299999.0,
            "principal_paid_extra_ytd": 0.0,
            "principal_paid_extra_month": 0.0,
            "progress": {"target_delta": 30001.0, "paid_extra_ytd": 0.0}
        }),
    )
    .await;
    mount_read(server, "/api/mortgage/events", serde_json::json!([])).await;
    mount_read(
        server,
        "/api/relationship/trip",
        serde_json::json!({"id": "default"}),
    )
    .await;
    mount_read(server, "/api/relationship/trip/history", serde_json::json!([])).await;
    mount_read(server, "/api/relationship/gifts", serde_json::json!([])).await;
    mount_read(
        server,
        "/api/settings",
        serde_json::json!({
            "id": "default",
            "weekly_review_day": "Sun",
            "weekly_review_hour_local": 9,
            "monthly_gift_day": 1,
            "email_enabled": false
        }),
    )
    .await;
}

#[tokio::test]
async fn add_weight_refetch_is_minimal_and_exact() {
    let server = MockServer::start().await;
    let home = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/api/fitness/weight"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "m1", "day": "2026-03-01", "kind": "weight", "value": 169.0, "created_at": ""
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/fitness/metrics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "metrics": [
                {"id": "m1", "day": "2026-03-01", "kind": "weight", "value": 169.0, "created_at": ""}
            ],
            "photos": [],
            "latest": {"weight_lbs": 169.0}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/summary"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"today": "2026-03-01", "current_wakeup_streak": 1})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let sync = synchronizer(&server, &home).await;
    let mut state = DashboardState::new(today(), ranges());

    sync.client().add_weight(today(), 169.0).await.unwrap();

    let plan = refetch_plan(MutationKind::AddWeight);
    state.begin(plan);
    let outcomes = sync.fetch(plan, &ranges(), today()).await.unwrap();
    state.apply(outcomes);

    // Exactly three requests total: the mutation plus the two planned reads.
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);

    let row = &state.derived.fitness_series[0];
    assert_eq!(row.day, "2026-03-01");
    assert_eq!(row.weight, Some(169.0));
    assert_eq!(row.waist, None);
}

#[tokio::test]
async fn bulk_refresh_failure_is_all_or_nothing() {
    let server = MockServer::start().await;
    let home = TempDir::new().unwrap();
    mount_full_read_set(&server).await;

    let sync = synchronizer(&server, &home).await;
    let mut state = DashboardState::new(today(), ranges());

    state.begin(BULK_REFRESH);
    let outcomes = sync.fetch(BULK_REFRESH, &ranges(), today()).await.unwrap();
    state.apply(outcomes);
    assert_eq!(state.summary.data().map(|s| s.today.as_str()), Some("2026-03-01"));
    let derived_before = state.derived.clone();

    // Second refresh: summary now fails; no partial overwrite may happen.
    // Mount the failing mock first so it outranks the full read set.
    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/api/summary"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(serde_json::json!({"detail": "db down"})),
        )
        .mount(&server)
        .await;
    mount_full_read_set(&server).await;

    state.begin(BULK_REFRESH);
    let err = sync.fetch(BULK_REFRESH, &ranges(), today()).await.unwrap_err();
    state.fail(BULK_REFRESH, normalize_error(REFRESH_FALLBACK, &err));

    assert_eq!(state.error.as_deref(), Some("db down"));
    assert_eq!(state.derived, derived_before);
    assert_eq!(state.summary.data().map(|s| s.today.as_str()), Some("2026-03-01"));
    assert!(state.summary.is_failed());
}

#[tokio::test]
async fn trip_save_refetches_trip_history_roundtrip() {
    let server = MockServer::start().await;
    let home = TempDir::new().unwrap();

    let saved = TripUpdate {
        start_date: "2026-06-12".to_string(),
        end_date: "2026-06-14".to_string(),
        dates: String::new(),
        adults_only: true,
        lodging_booked: true,
        childcare_confirmed: false,
        notes: "anniversary weekend".to_string(),
    };

    let trip_body = serde_json::json!({
        "id": "default",
        "start_date": "2026-06-12",
        "end_date": "2026-06-14",
        "dates": "",
        "adults_only": true,
        "lodging_booked": true,
        "childcare_confirmed": false,
        "notes": "anniversary weekend",
        "updated_at": "2026-03-01T12:00:00"
    });

    Mock::given(method("PUT"))
        .and(path("/api/relationship/trip"))
        .respond_with(ResponseTemplate::new(200).set_body_json(trip_body.clone()))
        .expect(1)
        .mount(&server)
        .await;
    mount_read(&server, "/api/relationship/trip", trip_body.clone()).await;
    mount_read(
        &server,
        "/api/relationship/trip/history",
        serde_json::json!([{
            "id": "h1",
            "trip_id": "default",
            "created_at": "2026-03-01T12:00:00",
            "snapshot": trip_body
        }]),
    )
    .await;
    mount_read(&server, "/api/summary", serde_json::json!({"today": "2026-03-01"})).await;

    let sync = synchronizer(&server, &home).await;
    let mut state = DashboardState::new(today(), ranges());

    sync.client().update_trip(&saved).await.unwrap();
    let plan = refetch_plan(MutationKind::SaveTrip);
    state.begin(plan);
    let outcomes = sync.fetch(plan, &ranges(), today()).await.unwrap();
    state.apply(outcomes);

    let history = state.trip_history.data().unwrap();
    let newest = &history[0].snapshot;
    assert_eq!(newest.start_date, saved.start_date);
    assert_eq!(newest.end_date, saved.end_date);
    assert_eq!(newest.lodging_booked, saved.lodging_booked);
    assert_eq!(newest.notes, saved.notes);
}

#[tokio::test]
async fn range_change_applies_on_next_explicit_refresh() {
    let server = MockServer::start().await;
    let home = TempDir::new().unwrap();
    mount_full_read_set(&server).await;

    let sync = synchronizer(&server, &home).await;
    let mut current = ranges();

    sync.fetch(&[tracker_core::ReadEndpoint::FitnessMetrics], &current, today())
        .await
        .unwrap();

    // Narrow the range; nothing is fetched until the explicit refresh below.
    current.fitness.start = "2026-02-01".parse().unwrap();
    sync.fetch(&[tracker_core::ReadEndpoint::FitnessMetrics], &current, today())
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    let starts: Vec<String> = requests
        .iter()
        .map(|r| {
            r.url
                .query_pairs()
                .find(|(k, _)| k == "start")
                .map(|(_, v)| v.into_owned())
                .unwrap()
        })
        .collect();
    assert_eq!(starts, vec!["2025-12-02".to_string(), "2026-02-01".to_string()]);
}
