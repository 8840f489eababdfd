use crate::common::TestHarness;
use crate::common::builders::*;
use crate::common::mocks::MockApi;
use marquee::api::ContentPick;
use marquee::cache::{CacheKey, QueryCache};
use marquee::events::EventType;
use marquee::models::*;
use marquee::services::core::{MoveDirection, MutationOutcome, ReorderOutcome};
use serde_json::json;
use tokio::sync::RwLock;

fn listing_of(items: &[(&str, &str)]) -> Vec<ContentAssociation> {
    items
        .iter()
        .enumerate()
        .map(|(i, (assoc_id, content_id))| {
            association(assoc_id, i as u32, movie(content_id, content_id))
        })
        .collect()
}

#[tokio::test]
async fn test_hero_add_to_empty_section_issues_single_add() {
    let item = movie("m1", "Dune");
    let api = MockApi::new()
        .with_catalog(vec![item.clone()], vec![])
        .with_section_content("s1", vec![]);
    let harness = TestHarness::new(api);

    let outcome = harness
        .content
        .add_content(&hero_section("s1"), ContentPick::from_item(&item))
        .await;

    assert_eq!(outcome, MutationOutcome::Applied);
    assert_eq!(harness.api.calls_named("remove_content_from_section"), 0);
    assert_eq!(harness.api.calls_named("add_content_to_section"), 1);
}

#[tokio::test]
async fn test_hero_swap_removes_before_adding() {
    let old = movie("m1", "Dune");
    let new = movie("m2", "Arrival");
    let api = MockApi::new()
        .with_catalog(vec![old.clone(), new.clone()], vec![])
        .with_section_content("s1", vec![association("a1", 0, old)]);
    let harness = TestHarness::new(api);

    let outcome = harness
        .content
        .add_content(&hero_section("s1"), ContentPick::from_item(&new))
        .await;

    assert_eq!(outcome, MutationOutcome::Applied);
    let log = harness.api.call_log();
    let remove_at = log
        .iter()
        .position(|c| c.starts_with("remove_content_from_section:"))
        .expect("remove was issued");
    let add_at = log
        .iter()
        .position(|c| c.starts_with("add_content_to_section:"))
        .expect("add was issued");
    assert!(remove_at < add_at, "remove must complete before the add");

    // the hero ends up holding exactly the new item
    let listing = harness.api.section_content.lock().unwrap();
    let listing = listing.get("s1").unwrap();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].content.id.as_str(), "m2");
}

#[tokio::test]
async fn test_hero_swap_aborts_when_remove_fails() {
    let old = movie("m1", "Dune");
    let new = movie("m2", "Arrival");
    let api = MockApi::new()
        .with_catalog(vec![old.clone(), new.clone()], vec![])
        .with_section_content("s1", vec![association("a1", 0, old)]);
    api.fail_method("remove_content_from_section");
    let harness = TestHarness::new(api);
    let mut sub = harness.subscribe();

    let outcome = harness
        .content
        .add_content(&hero_section("s1"), ContentPick::from_item(&new))
        .await;

    assert_eq!(outcome, MutationOutcome::Failed);
    assert_eq!(harness.api.calls_named("add_content_to_section"), 0);

    // the old association is still in place
    let listing = harness.api.section_content.lock().unwrap();
    assert_eq!(listing.get("s1").unwrap()[0].id.as_str(), "a1");
    drop(listing);

    let event = sub.try_recv().unwrap().expect("failure event published");
    assert_eq!(event.event_type, EventType::ContentAddFailed);
}

#[tokio::test]
async fn test_carousel_add_never_removes() {
    let third = movie("m3", "Solaris");
    let api = MockApi::new()
        .with_catalog(
            vec![movie("m1", "Dune"), movie("m2", "Arrival"), third.clone()],
            vec![],
        )
        .with_section_content("s2", listing_of(&[("a1", "m1"), ("a2", "m2")]));
    let harness = TestHarness::new(api);

    let outcome = harness
        .content
        .add_content(&carousel_section("s2"), ContentPick::from_item(&third))
        .await;

    assert_eq!(outcome, MutationOutcome::Applied);
    assert_eq!(harness.api.calls_named("remove_content_from_section"), 0);
    assert_eq!(
        harness
            .api
            .section_content
            .lock()
            .unwrap()
            .get("s2")
            .unwrap()
            .len(),
        3
    );
}

#[tokio::test]
async fn test_add_invalidates_listing_and_composed_views() {
    let item = movie("m1", "Dune");
    let api = MockApi::new().with_catalog(vec![item.clone()], vec![]);
    let harness = TestHarness::new(api);
    let mut sub = harness.subscribe();

    harness
        .cache
        .put_value(CacheKey::SectionContent(SectionId::new("s2")), json!([]))
        .await;
    harness
        .cache
        .put_value(CacheKey::PageData(PageId::new("p1")), json!({}))
        .await;
    harness
        .cache
        .put_value(CacheKey::PageData(PageId::new("p2")), json!({}))
        .await;

    let outcome = harness
        .content
        .add_content(&carousel_section("s2"), ContentPick::from_item(&item))
        .await;

    assert_eq!(outcome, MutationOutcome::Applied);
    assert!(
        harness
            .cache
            .get_value(&CacheKey::SectionContent(SectionId::new("s2")))
            .await
            .is_none()
    );
    // every composed page view is dropped, whichever page hosts the section
    assert!(
        harness
            .cache
            .get_value(&CacheKey::PageData(PageId::new("p1")))
            .await
            .is_none()
    );
    assert!(
        harness
            .cache
            .get_value(&CacheKey::PageData(PageId::new("p2")))
            .await
            .is_none()
    );

    let event = sub.try_recv().unwrap().expect("success event published");
    assert_eq!(event.event_type, EventType::ContentAdded);
}

#[tokio::test]
async fn test_remove_content_failure_keeps_listing_and_notifies() {
    let api = MockApi::new().with_section_content("s1", listing_of(&[("a1", "m1")]));
    api.fail_method("remove_content_from_section");
    let harness = TestHarness::new(api);
    let mut sub = harness.subscribe();

    let outcome = harness
        .content
        .remove_content(&SectionId::new("s1"), &AssociationId::new("a1"))
        .await;

    assert_eq!(outcome, MutationOutcome::Failed);
    assert_eq!(
        harness
            .api
            .section_content
            .lock()
            .unwrap()
            .get("s1")
            .unwrap()
            .len(),
        1
    );
    let event = sub.try_recv().unwrap().unwrap();
    assert_eq!(event.event_type, EventType::ContentRemoveFailed);
}

#[tokio::test]
async fn test_content_reorder_commit_sends_association_order() {
    let api = MockApi::new()
        .with_section_content("s1", listing_of(&[("a1", "m1"), ("a2", "m2"), ("a3", "m3")]));
    let harness = TestHarness::new(api);
    let visible = RwLock::new(listing_of(&[("a1", "m1"), ("a2", "m2"), ("a3", "m3")]));

    let outcome = harness
        .content
        .reorder_content(&SectionId::new("s1"), &visible, 0, 2)
        .await;

    assert_eq!(outcome, ReorderOutcome::Committed);
    let ids: Vec<String> = visible
        .read()
        .await
        .iter()
        .map(|a| a.id.to_string())
        .collect();
    assert_eq!(ids, vec!["a2", "a3", "a1"]);
    assert!(
        harness
            .api
            .call_log()
            .contains(&"reorder_section_content:s1:a2,a3,a1".to_string())
    );
}

#[tokio::test]
async fn test_content_reorder_rollback_restores_visible_order() {
    let api = MockApi::new();
    api.fail_method("reorder_section_content");
    let harness = TestHarness::new(api);
    let mut sub = harness.subscribe();
    let visible = RwLock::new(listing_of(&[("a1", "m1"), ("a2", "m2"), ("a3", "m3")]));

    let outcome = harness
        .content
        .reorder_content(&SectionId::new("s1"), &visible, 2, 0)
        .await;

    assert_eq!(outcome, ReorderOutcome::RolledBack);
    let ids: Vec<String> = visible
        .read()
        .await
        .iter()
        .map(|a| a.id.to_string())
        .collect();
    assert_eq!(ids, vec!["a1", "a2", "a3"]);
    let event = sub.try_recv().unwrap().unwrap();
    assert_eq!(event.event_type, EventType::ContentOrderRejected);
}

#[tokio::test]
async fn test_move_up_at_top_issues_no_network_call() {
    let api = MockApi::new();
    let harness = TestHarness::new(api);
    let visible = RwLock::new(listing_of(&[("a1", "m1"), ("a2", "m2")]));

    let outcome = harness
        .content
        .move_content(&SectionId::new("s1"), &visible, 0, MoveDirection::Up)
        .await;

    assert_eq!(outcome, ReorderOutcome::NoOp);
    assert_eq!(harness.api.calls_named("reorder_section_content"), 0);

    let outcome = harness
        .content
        .move_content(&SectionId::new("s1"), &visible, 1, MoveDirection::Down)
        .await;
    assert_eq!(outcome, ReorderOutcome::NoOp);
    assert_eq!(harness.api.calls_named("reorder_section_content"), 0);
}

#[tokio::test]
async fn test_section_content_is_served_from_cache() {
    let api = MockApi::new().with_section_content("s1", listing_of(&[("a1", "m1")]));
    let harness = TestHarness::new(api);

    let first = harness
        .content
        .section_content(&SectionId::new("s1"))
        .await
        .unwrap();
    let second = harness
        .content
        .section_content(&SectionId::new("s1"))
        .await
        .unwrap();

    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
    assert_eq!(harness.api.calls_named("fetch_section_content"), 1);
}

#[tokio::test]
async fn test_catalog_merges_movies_and_series() {
    let api = MockApi::new().with_catalog(
        vec![movie("m1", "Dune")],
        vec![series("t1", "Foundation")],
    );
    let harness = TestHarness::new(api);

    let catalog = harness.content.catalog().await.unwrap();
    assert_eq!(catalog.len(), 2);
    assert!(catalog.iter().any(|i| i.kind == ContentKind::Movie));
    assert!(catalog.iter().any(|i| i.kind == ContentKind::Series));
}
