use chrono::{DateTime, TimeZone, Utc};
use deskhand::{Desk, DeskBuilder};
use deskhand_provider::{Candidate, ErrorKind, ResourceId, ResourceKind};
use deskhand_test_provider::TestStoreProvider;
use serde_json::json;

fn desk_over(store: &TestStoreProvider) -> Desk {
    DeskBuilder::with_provider(store.clone()).build()
}

fn day(month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, month, day, 8, 0, 0).unwrap()
}

fn doc(id: &str, name: &str, modified: DateTime<Utc>) -> Candidate {
    Candidate::new(ResourceId::new(id), name, modified)
}

#[tokio::test]
async fn test_meeting_notes_disambiguation_flow() {
    let store = TestStoreProvider::default();
    store.add(ResourceKind::Document, doc("old", "Meeting Notes", day(1, 5)));
    store.add(ResourceKind::Document, doc("new", "Meeting Notes", day(1, 10)));
    let desk = desk_over(&store);

    let result = desk
        .call(
            "resolve_reference",
            json!({ "kind": "document", "reference": "Meeting Notes" }),
        )
        .await;
    assert_eq!(result["status"], "success");
    assert_eq!(result["resolution"], "ambiguous");
    // Most recently modified first.
    assert_eq!(result["candidates"][0]["id"], "new");
    assert_eq!(result["candidates"][1]["id"], "old");
    let message = result["message"].as_str().unwrap();
    assert!(message.contains("1. Meeting Notes (modified 2024-01-10)"));
    assert!(message.contains("2. Meeting Notes (modified 2024-01-05)"));

    // "2" picks the 2024-01-05 document.
    let result = desk
        .call("pick_candidate", json!({ "choice": "2" }))
        .await;
    assert_eq!(result["status"], "success");
    assert_eq!(result["outcome"], "resolved");
    assert_eq!(result["id"], "old");

    // The pick cached the id under the candidate's own display name, so
    // resolving it again is served without any remote traffic.
    let requests_before = store.search_requests();
    let result = desk
        .call(
            "resolve_reference",
            json!({ "kind": "document", "reference": "meeting notes" }),
        )
        .await;
    assert_eq!(result["resolution"], "cached");
    assert_eq!(result["id"], "old");
    assert_eq!(store.search_requests(), requests_before);
}

#[tokio::test]
async fn test_unique_resolution_is_cached() {
    let store = TestStoreProvider::default();
    store.add(ResourceKind::Document, doc("d1", "Roadmap", day(1, 3)));
    let desk = desk_over(&store);

    let result = desk
        .call(
            "resolve_reference",
            json!({ "kind": "document", "reference": "Roadmap" }),
        )
        .await;
    assert_eq!(result["resolution"], "unique");
    assert_eq!(result["id"], "d1");

    let requests_before = store.search_requests();
    let result = desk
        .call(
            "resolve_reference",
            json!({ "kind": "document", "reference": "  ROADMAP " }),
        )
        .await;
    assert_eq!(result["resolution"], "cached");
    assert_eq!(store.search_requests(), requests_before);
}

#[tokio::test]
async fn test_nothing_matches() {
    let store = TestStoreProvider::default();
    let desk = desk_over(&store);

    let result = desk
        .call(
            "resolve_reference",
            json!({ "kind": "document", "reference": "Quarterly Report" }),
        )
        .await;
    assert_eq!(result["status"], "success");
    assert_eq!(result["resolution"], "not_found");

    // Nothing is pending, so a pick has nothing to work on and says so.
    let result = desk
        .call("pick_candidate", json!({ "choice": "1" }))
        .await;
    assert_eq!(result["status"], "success");
    assert_eq!(result["outcome"], "no_pending_disambiguation");
}

#[tokio::test]
async fn test_miss_keeps_candidates_offered() {
    let store = TestStoreProvider::default();
    store.add(ResourceKind::Document, doc("a", "Meeting Notes", day(1, 5)));
    store.add(ResourceKind::Document, doc("b", "Meeting Notes", day(1, 10)));
    let desk = desk_over(&store);

    desk.call(
        "resolve_reference",
        json!({ "kind": "document", "reference": "Meeting Notes" }),
    )
    .await;

    let result = desk
        .call("pick_candidate", json!({ "choice": "99" }))
        .await;
    assert_eq!(result["outcome"], "no_match");

    // Re-prompting still works.
    let result = desk
        .call("pick_candidate", json!({ "choice": "use 1" }))
        .await;
    assert_eq!(result["outcome"], "resolved");
    assert_eq!(result["id"], "b");
}

#[tokio::test]
async fn test_unknown_operation_and_bad_arguments() {
    let desk = desk_over(&TestStoreProvider::default());

    let result = desk.call("summon_resource", json!({})).await;
    assert_eq!(result["status"], "error");
    assert_eq!(result["kind"], "invalid_input");
    assert_eq!(result["retryable"], false);

    let result = desk
        .call(
            "resolve_reference",
            json!({ "kind": "spreadsheet", "reference": "x" }),
        )
        .await;
    assert_eq!(result["status"], "error");
    assert_eq!(result["kind"], "invalid_input");
}

#[tokio::test]
async fn test_provider_failures_surface_as_retryable_errors() {
    let store = TestStoreProvider::default();
    store.fail_searches(ErrorKind::RateLimited);
    let desk = desk_over(&store);

    let result = desk
        .call(
            "resolve_reference",
            json!({ "kind": "document", "reference": "Roadmap" }),
        )
        .await;
    assert_eq!(result["status"], "error");
    assert_eq!(result["kind"], "rate_limited");
    assert_eq!(result["retryable"], true);
}

#[tokio::test]
async fn test_create_event_then_list_that_day() {
    let store = TestStoreProvider::default();
    let desk = desk_over(&store);

    let result = desk
        .call(
            "create_event",
            json!({
                "summary": "Design review",
                "start_time": "2024-03-01 09:00",
                "end_time": "2024-03-01 10:00",
            }),
        )
        .await;
    assert_eq!(result["status"], "success");
    assert_eq!(result["message"], "Event created successfully");
    assert!(result["event_id"].as_str().is_some());
    assert!(!result["event_link"].as_str().unwrap().is_empty());
    // A conference link is attached by default.
    assert!(!result["meet_link"].as_str().unwrap().is_empty());

    let result = desk
        .call("list_events", json!({ "start_date": "2024-03-01" }))
        .await;
    assert_eq!(result["count"], 1);
    assert_eq!(result["items"][0]["summary"], "Design review");
}

#[tokio::test]
async fn test_create_event_rejects_unparsable_times() {
    let desk = desk_over(&TestStoreProvider::default());

    let result = desk
        .call(
            "create_event",
            json!({
                "summary": "Vague plans",
                "start_time": "sometime soon",
                "end_time": "later",
            }),
        )
        .await;
    assert_eq!(result["status"], "error");
    assert_eq!(result["kind"], "invalid_input");
}

#[tokio::test]
async fn test_list_messages_per_mailbox() {
    let store = TestStoreProvider::default();
    store.add_in_collection(
        ResourceKind::Email,
        "inbox",
        doc("m1", "Weekly digest", day(1, 8)),
    );
    store.add_in_collection(
        ResourceKind::Email,
        "inbox",
        doc("m2", "Invoice", day(1, 9)),
    );
    store.add_in_collection(
        ResourceKind::Email,
        "drafts",
        doc("m3", "Unsent reply", day(1, 7)),
    );
    let desk = desk_over(&store);

    let result = desk.call("list_messages", json!({})).await;
    assert_eq!(result["mailbox"], "inbox");
    assert_eq!(result["count"], 2);
    // Newest first.
    assert_eq!(result["items"][0]["subject"], "Invoice");

    let result = desk
        .call("list_messages", json!({ "mailbox": "drafts" }))
        .await;
    assert_eq!(result["count"], 1);

    let result = desk
        .call("list_messages", json!({ "mailbox": "spam" }))
        .await;
    assert_eq!(result["status"], "error");
    assert_eq!(result["kind"], "invalid_input");
}

#[tokio::test]
async fn test_read_resource_round() {
    let store = TestStoreProvider::default();
    store.add(ResourceKind::File, doc("f1", "budget.xlsx", day(1, 4)));
    let desk = desk_over(&store);

    let result = desk
        .call("read_resource", json!({ "kind": "file", "id": "f1" }))
        .await;
    assert_eq!(result["status"], "success");
    assert_eq!(result["name"], "budget.xlsx");

    let result = desk
        .call("read_resource", json!({ "kind": "file", "id": "f404" }))
        .await;
    assert_eq!(result["status"], "error");
    assert_eq!(result["kind"], "not_found");
    assert_eq!(result["retryable"], false);
}
