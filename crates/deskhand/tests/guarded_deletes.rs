use chrono::{TimeZone, Utc};
use deskhand::{Desk, DeskBuilder};
use deskhand_provider::{Candidate, ResourceId, ResourceKind, extra_keys};
use deskhand_test_provider::TestStoreProvider;
use serde_json::json;

fn desk_over(store: &TestStoreProvider) -> Desk {
    DeskBuilder::with_provider(store.clone()).build()
}

fn event_on(id: &str, name: &str, start: &str) -> Candidate {
    let mut candidate = Candidate::new(
        ResourceId::new(id),
        name,
        Utc.with_ymd_and_hms(2024, 2, 20, 12, 0, 0).unwrap(),
    );
    candidate
        .extra
        .insert(extra_keys::START_TIME.to_owned(), json!(start));
    candidate
}

fn seeded_day() -> TestStoreProvider {
    let store = TestStoreProvider::default();
    store.add(
        ResourceKind::Event,
        event_on("e1", "Standup", "2024-03-01T09:00:00Z"),
    );
    store.add(
        ResourceKind::Event,
        event_on("e2", "Lunch", "2024-03-01T12:00:00Z"),
    );
    store.add(
        ResourceKind::Event,
        event_on("e3", "Review", "2024-03-01T15:00:00Z"),
    );
    store
}

#[tokio::test]
async fn test_delete_without_confirmation_is_refused() {
    let store = seeded_day();
    let desk = desk_over(&store);

    let result = desk
        .call("delete_resource", json!({ "kind": "event", "id": "e1" }))
        .await;
    assert_eq!(result["status"], "error");
    assert_eq!(result["kind"], "confirmation_required");
    assert!(
        result["message"].as_str().unwrap().contains("confirm=true")
    );
    assert_eq!(store.delete_attempts(), 0);

    // An explicit false is just as refused.
    let result = desk
        .call(
            "delete_resource",
            json!({ "kind": "event", "id": "e1", "confirm": false }),
        )
        .await;
    assert_eq!(result["kind"], "confirmation_required");
    assert_eq!(store.delete_attempts(), 0);
}

#[tokio::test]
async fn test_confirmed_delete_goes_through() {
    let store = seeded_day();
    let desk = desk_over(&store);

    let result = desk
        .call(
            "delete_resource",
            json!({ "kind": "event", "id": "e1", "confirm": true }),
        )
        .await;
    assert_eq!(result["status"], "success");
    assert!(
        result["message"]
            .as_str()
            .unwrap()
            .contains("deleted successfully")
    );
    assert_eq!(store.deleted_ids(), vec![ResourceId::new("e1")]);
}

#[tokio::test]
async fn test_bulk_delete_reports_per_item_counts() {
    let store = seeded_day();
    store.fail_deletes_of(ResourceId::new("e2"));
    let desk = desk_over(&store);

    let result = desk
        .call(
            "delete_events_matching",
            json!({ "date": "2024-03-01", "confirm": true }),
        )
        .await;
    assert_eq!(result["status"], "success");
    assert_eq!(result["deleted"], 2);
    assert_eq!(result["failed"], 1);
    assert_eq!(result["failures"][0]["id"], "e2");
    assert_eq!(store.delete_attempts(), 3);
}

#[tokio::test]
async fn test_unconfirmed_bulk_delete_stays_local() {
    let store = seeded_day();
    let desk = desk_over(&store);

    let result = desk
        .call(
            "delete_events_matching",
            json!({ "date": "2024-03-01" }),
        )
        .await;
    assert_eq!(result["status"], "error");
    assert_eq!(result["kind"], "confirmation_required");
    assert_eq!(store.search_requests(), 0);
    assert_eq!(store.delete_attempts(), 0);
}

#[tokio::test]
async fn test_bulk_delete_narrowed_by_name() {
    let store = seeded_day();
    let desk = desk_over(&store);

    let result = desk
        .call(
            "delete_events_matching",
            json!({
                "date": "2024-03-01",
                "name_contains": "lunch",
                "confirm": true,
            }),
        )
        .await;
    assert_eq!(result["deleted"], 1);
    assert_eq!(result["deleted_ids"][0], "e2");
}

#[tokio::test]
async fn test_recurring_series_needs_explicit_scope() {
    let store = TestStoreProvider::default();
    let mut master = event_on("s1", "Standup", "2024-03-01T09:00:00Z");
    master
        .extra
        .insert(extra_keys::SERIES_ID.to_owned(), json!("s1"));
    store.add(ResourceKind::Event, master);
    let mut instance = event_on("s1_0301", "Standup", "2024-03-01T09:00:00Z");
    instance
        .extra
        .insert(extra_keys::SERIES_ID.to_owned(), json!("s1"));
    store.add(ResourceKind::Event, instance);
    let desk = desk_over(&store);

    let result = desk
        .call(
            "delete_events_matching",
            json!({ "date": "2024-03-01", "confirm": true }),
        )
        .await;
    assert_eq!(result["deleted"], 1);
    assert_eq!(result["deleted_ids"][0], "s1_0301");
    assert_eq!(result["skipped_series_ids"][0], "s1");
    assert!(
        result["message"].as_str().unwrap().contains("scope=series")
    );
}
