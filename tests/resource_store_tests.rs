//! Integration tests for the generic ResourceStore lifecycle

mod support;

use civic::core::error::TransportError;
use civic::core::service::Method;
use civic::prelude::*;
use serde_json::json;
use std::sync::Arc;
use support::*;

fn store(access: &Arc<ScriptedAccess>) -> Arc<ResourceStore<Note>> {
    let access: Arc<dyn DataAccess> = access.clone();
    Arc::new(ResourceStore::new(access).with_filters(Filters::new().with("page", 1).with("pageSize", 10)))
}

fn ids(store: &ResourceStore<Note>) -> Vec<RecordId> {
    store.items().iter().map(|n| n.id.clone()).collect()
}

#[tokio::test]
async fn test_list_sends_persisted_filters_with_overrides() {
    let access = ScriptedAccess::new();
    access.reply(Ok(note_page(&[1, 2], 12)));
    let store = store(&access);

    let page = store.list(Filters::new().with("page", 2)).await.unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(store.total(), 12);
    assert_eq!(ids(&store), vec![RecordId::from(1), RecordId::from(2)]);

    let calls = access.calls();
    assert_eq!(calls[0].0, Method::Get);
    assert_eq!(calls[0].1, "/notes");
    let query = calls[0].2.query.clone().unwrap();
    assert_eq!(query.get("page"), Some(&json!(2)));
    assert_eq!(query.get("pageSize"), Some(&json!(10)));
    // overrides are per call
    assert_eq!(store.filters().get("page"), Some(&json!(1)));
}

#[tokio::test]
async fn test_create_prepends_and_counts() {
    let access = ScriptedAccess::new();
    access.reply(Ok(note_page(&[1, 2], 2)));
    access.reply(Ok(json!({"data": {"id": 3, "title": "fresh"}})));
    let store = store(&access);
    store.list(Filters::new()).await.unwrap();

    let created = store.create(json!({"title": "fresh"})).await.unwrap();

    assert_eq!(created.title, "fresh");
    assert_eq!(store.items()[0], created);
    assert_eq!(store.total(), 3);
    assert!(!store.is_loading());
    assert_eq!(store.error(), None);
}

#[tokio::test]
async fn test_remove_clears_matching_current() {
    let access = ScriptedAccess::new();
    access.reply(Ok(note_page(&[1, 2, 3], 3)));
    access.reply(Ok(json!({"id": 2, "title": "note 2"})));
    access.reply(Ok(json!(null)));
    let store = store(&access);
    store.list(Filters::new()).await.unwrap();
    store.get_by_id(&RecordId::from(2)).await.unwrap();
    assert!(store.current().is_some());

    store.remove(&RecordId::from(2)).await.unwrap();

    assert_eq!(ids(&store), vec![RecordId::from(1), RecordId::from(3)]);
    assert_eq!(store.total(), 2);
    assert_eq!(store.current(), None);
    assert_eq!(access.calls()[2].1, "/notes/2");
}

#[tokio::test]
async fn test_update_replaces_item_and_current() {
    let access = ScriptedAccess::new();
    access.reply(Ok(note_page(&[1, 2], 2)));
    access.reply(Ok(json!({"id": 1, "title": "note 1"})));
    access.reply(Ok(json!({"id": 1, "title": "renamed"})));
    let store = store(&access);
    store.list(Filters::new()).await.unwrap();
    store.get_by_id(&RecordId::from(1)).await.unwrap();

    store.update(&RecordId::from(1), json!({"title": "renamed"})).await.unwrap();

    assert_eq!(store.items()[0].title, "renamed");
    assert_eq!(store.current().unwrap().title, "renamed");
    assert_eq!(store.total(), 2);
}

#[tokio::test]
async fn test_failed_list_keeps_items_and_records_message() {
    let access = ScriptedAccess::new();
    access.reply(Ok(note_page(&[1], 1)));
    access.reply(Err(TransportError::network("network down")));
    let store = store(&access);
    store.list(Filters::new()).await.unwrap();
    let before = store.items();

    let err = store.list(Filters::new()).await.unwrap_err();

    assert_eq!(err.message(), "network down");
    assert!(!store.is_loading());
    assert_eq!(store.error(), Some("network down".to_string()));
    assert_eq!(store.items(), before);
}

#[tokio::test]
async fn test_success_clears_previous_error() {
    let access = ScriptedAccess::new();
    access.reply(Err(TransportError::from_status(500)));
    access.reply(Ok(note_page(&[1], 1)));
    let store = store(&access);

    assert!(store.list(Filters::new()).await.is_err());
    assert_eq!(store.error(), Some("Internal server error".to_string()));

    store.list(Filters::new()).await.unwrap();
    assert_eq!(store.error(), None);
}

#[tokio::test]
async fn test_clear_error_is_idempotent() {
    let access = ScriptedAccess::new();
    access.reply(Err(TransportError::network("network down")));
    let store = store(&access);
    let _ = store.list(Filters::new()).await;

    store.clear_error();
    assert_eq!(store.error(), None);
    store.clear_error();
    assert_eq!(store.error(), None);
}

#[tokio::test]
async fn test_get_missing_record_is_not_found() {
    let access = ScriptedAccess::new();
    access.reply(Ok(json!(null)));
    let store = store(&access);

    let err = store.get_by_id(&RecordId::from(9)).await.unwrap_err();

    assert_eq!(err.error_code(), "RESOURCE_NOT_FOUND");
    assert_eq!(store.error(), Some("note with id '9' not found".to_string()));
}

#[tokio::test]
async fn test_set_filters_merges_and_reloads() {
    let access = ScriptedAccess::new();
    access.reply(Ok(note_page(&[4], 1)));
    let store = store(&access);

    store
        .set_filters(Filters::new().with("keyword", "tea"))
        .await
        .unwrap();

    assert_eq!(store.filters().get("keyword"), Some(&json!("tea")));
    assert_eq!(store.filters().get("pageSize"), Some(&json!(10)));
    let query = access.calls()[0].2.query.clone().unwrap();
    assert_eq!(query.get("keyword"), Some(&json!("tea")));
}

#[tokio::test]
async fn test_loading_stays_raised_until_last_operation_settles() {
    let access = ScriptedAccess::new();
    let release_list = access.gated_reply(Ok(note_page(&[1], 1)));
    let release_create = access.gated_reply(Ok(json!({"id": 2, "title": "two"})));
    let store = store(&access);
    assert!(!store.is_loading());

    let list = tokio::spawn({
        let store = store.clone();
        async move { store.list(Filters::new()).await }
    });
    access.wait_for_calls(1).await;
    let create = tokio::spawn({
        let store = store.clone();
        async move { store.create(json!({"title": "two"})).await }
    });
    access.wait_for_calls(2).await;
    assert!(store.is_loading());

    release_list.send(()).unwrap();
    list.await.unwrap().unwrap();
    assert!(store.is_loading());

    release_create.send(()).unwrap();
    create.await.unwrap().unwrap();
    assert!(!store.is_loading());
}

#[tokio::test]
async fn test_stale_list_response_is_returned_but_not_written() {
    let access = ScriptedAccess::new();
    let release_old = access.gated_reply(Ok(note_page(&[1, 2], 2)));
    let release_new = access.gated_reply(Ok(note_page(&[7], 1)));
    let store = store(&access);

    let older = tokio::spawn({
        let store = store.clone();
        async move { store.list(Filters::new().with("keyword", "old")).await }
    });
    access.wait_for_calls(1).await;
    let newer = tokio::spawn({
        let store = store.clone();
        async move { store.list(Filters::new().with("keyword", "new")).await }
    });
    access.wait_for_calls(2).await;

    release_new.send(()).unwrap();
    newer.await.unwrap().unwrap();
    release_old.send(()).unwrap();
    let stale = older.await.unwrap().unwrap();

    assert_eq!(stale.items.len(), 2);
    assert_eq!(ids(&store), vec![RecordId::from(7)]);
    assert_eq!(store.total(), 1);
    assert!(!store.is_loading());
}

#[tokio::test]
async fn test_stale_list_failure_does_not_overwrite_error() {
    let access = ScriptedAccess::new();
    let release_old = access.gated_reply(Err(TransportError::network("network down")));
    access.reply(Ok(note_page(&[7], 1)));
    let store = store(&access);

    let older = tokio::spawn({
        let store = store.clone();
        async move { store.list(Filters::new()).await }
    });
    access.wait_for_calls(1).await;
    store.list(Filters::new()).await.unwrap();

    release_old.send(()).unwrap();
    assert!(older.await.unwrap().is_err());
    assert_eq!(store.error(), None);
    assert_eq!(ids(&store), vec![RecordId::from(7)]);
}

#[tokio::test]
async fn test_duplicate_ids_keep_first_occurrence() {
    let access = ScriptedAccess::new();
    access.reply(Ok(json!({
        "data": [
            {"id": 1, "title": "first"},
            {"id": 1, "title": "second"},
            {"id": 2, "title": "other"}
        ],
        "total": 3
    })));
    let store = store(&access);

    store.list(Filters::new()).await.unwrap();

    let items = store.items();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].title, "first");
}
