//! Generic resource store
//!
//! A [`ResourceStore`] mirrors one server collection: the current page of
//! records, the server total, one detail record, a loading flag, the last
//! error and the persisted list filters. All I/O goes through the injected
//! [`DataAccess`]; state changes only after a confirmed success.

use crate::core::entity::Resource;
use crate::core::error::{CivicError, Result, StoreError};
use crate::core::query::{Filters, Page};
use crate::core::service::DataAccess;
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashSet;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Read-only view of a store's state
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceState<E> {
    /// Records in server order, unique by identifier
    pub items: Vec<E>,

    /// Server-reported total count
    pub total: usize,

    /// Detail record
    pub current: Option<E>,

    /// `true` while an operation on this store is in flight
    pub loading: bool,

    /// Message of the last failure
    pub error: Option<String>,

    /// Filters merged into every list request
    pub filters: Filters,
}

impl<E> Default for ResourceState<E> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            current: None,
            loading: false,
            error: None,
            filters: Filters::new(),
        }
    }
}

struct Slot<E> {
    state: ResourceState<E>,
    in_flight: usize,
    latest_list: u64,
}

/// Keeps `loading` raised for as long as it lives
struct LoadingGuard<'a, E> {
    slot: &'a Mutex<Slot<E>>,
}

impl<'a, E> LoadingGuard<'a, E> {
    fn enter(slot: &'a Mutex<Slot<E>>) -> Self {
        let mut guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
        guard.in_flight += 1;
        guard.state.loading = true;
        Self { slot }
    }
}

impl<E> Drop for LoadingGuard<'_, E> {
    fn drop(&mut self) {
        let mut guard = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        guard.in_flight = guard.in_flight.saturating_sub(1);
        guard.state.loading = guard.in_flight > 0;
    }
}

/// State container plus CRUD operations for one resource type
///
/// # Example
///
/// ```rust,ignore
/// let movies: ResourceStore<Movie> = ResourceStore::new(access.clone());
/// movies.list(Filters::new().with("page", 2)).await?;
/// let created = movies.create(json!({"title": "Spirited Away"})).await?;
/// assert_eq!(movies.items()[0].id(), created.id());
/// ```
pub struct ResourceStore<E: Resource> {
    path: String,
    access: Arc<dyn DataAccess>,
    slot: Mutex<Slot<E>>,
}

impl<E: Resource> ResourceStore<E> {
    /// Store using the resource's default collection path
    pub fn new(access: Arc<dyn DataAccess>) -> Self {
        Self::with_path(access, E::collection_path())
    }

    /// Store bound to an explicit collection path
    pub fn with_path(access: Arc<dyn DataAccess>, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            access,
            slot: Mutex::new(Slot {
                state: ResourceState::default(),
                in_flight: 0,
                latest_list: 0,
            }),
        }
    }

    /// Seed the persisted filters
    pub fn with_filters(self, filters: Filters) -> Self {
        self.lock().state.filters = filters;
        self
    }

    fn lock(&self) -> MutexGuard<'_, Slot<E>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // === Reads ===

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Path of one record in this store's collection
    pub fn item_path(&self, id: &E::Id) -> String {
        E::item_path(&self.path, id)
    }

    /// Path of an action endpoint on one record, or on the collection when
    /// `id` is `None`
    pub fn action_path(&self, id: Option<&E::Id>, action: &str) -> String {
        match id {
            Some(id) => format!("{}/{}", self.item_path(id), action),
            None => format!("{}/{}", self.path.trim_end_matches('/'), action),
        }
    }

    /// A copy of the whole state
    pub fn snapshot(&self) -> ResourceState<E> {
        self.lock().state.clone()
    }

    pub fn items(&self) -> Vec<E> {
        self.lock().state.items.clone()
    }

    pub fn total(&self) -> usize {
        self.lock().state.total
    }

    pub fn current(&self) -> Option<E> {
        self.lock().state.current.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().state.loading
    }

    pub fn error(&self) -> Option<String> {
        self.lock().state.error.clone()
    }

    pub fn filters(&self) -> Filters {
        self.lock().state.filters.clone()
    }

    /// Find a listed record by identifier
    pub fn find(&self, id: &E::Id) -> Option<E> {
        self.lock()
            .state
            .items
            .iter()
            .find(|item| &item.id() == id)
            .cloned()
    }

    /// Records of the current page matching `predicate`
    pub fn filter_items(&self, predicate: impl Fn(&E) -> bool) -> Vec<E> {
        self.lock()
            .state
            .items
            .iter()
            .filter(|item| predicate(item))
            .cloned()
            .collect()
    }

    // === Operations ===

    /// Fetch a page using the persisted filters plus `overrides`
    ///
    /// On success replaces `items`/`total` and clears `error`. When a newer
    /// `list` was issued before this one settled, the response is returned
    /// to the caller but not written into state.
    pub async fn list(&self, overrides: Filters) -> Result<Page<E>> {
        let path = self.path.clone();
        self.list_at(&path, overrides).await
    }

    /// [`list`](Self::list) against an explicit collection path
    pub async fn list_at(&self, path: &str, overrides: Filters) -> Result<Page<E>> {
        let (token, query) = {
            let mut slot = self.lock();
            slot.latest_list += 1;
            (slot.latest_list, slot.state.filters.merged_with(&overrides))
        };

        let _loading = LoadingGuard::enter(&self.slot);
        tracing::debug!(resource = E::resource_name(), path, token, "list started");

        let outcome = async {
            let response = self.access.get(path, query.into_inner()).await?;
            Ok::<_, CivicError>(Page::<E>::from_response(E::resource_name(), response)?)
        }
        .await;

        let mut slot = self.lock();
        let fresh = slot.latest_list == token;

        match outcome {
            Ok(page) => {
                if fresh {
                    let state = &mut slot.state;
                    state.items = unique_by_id(page.items.clone());
                    state.total = page.total;
                    state.error = None;
                    sync_current(state);
                } else {
                    tracing::debug!(
                        resource = E::resource_name(),
                        token,
                        "Discarding stale list response"
                    );
                }
                Ok(page)
            }
            Err(error) => {
                tracing::warn!(
                    resource = E::resource_name(),
                    operation = "list",
                    error = %error,
                    "Store operation failed"
                );
                if fresh {
                    slot.state.error = Some(error.message());
                }
                Err(error)
            }
        }
    }

    /// Fetch one record into `current`
    ///
    /// A same-id entry in `items` is replaced in place. An empty response is
    /// a [`StoreError::NotFound`].
    pub async fn get_by_id(&self, id: &E::Id) -> Result<E> {
        let path = self.item_path(id);
        self.fetch_at(&path, id).await
    }

    /// [`get_by_id`](Self::get_by_id) against an explicit record path
    pub async fn fetch_at(&self, path: &str, id: &E::Id) -> Result<E> {
        self.track("get", async {
            let response = self.access.get(path, IndexMap::new()).await?;
            let record = decode_record::<E>(response)?.ok_or_else(|| StoreError::NotFound {
                resource: E::resource_name().to_string(),
                id: id.to_string(),
            })?;

            let mut slot = self.lock();
            replace_in_items(&mut slot.state.items, &record);
            slot.state.current = Some(record.clone());
            Ok(record)
        })
        .await
    }

    /// Create a record; it is prepended to `items` and `total` grows by one
    pub async fn create(&self, data: Value) -> Result<E> {
        let path = self.path.clone();
        self.create_at(&path, data).await
    }

    /// [`create`](Self::create) against an explicit collection path
    pub async fn create_at(&self, path: &str, data: Value) -> Result<E> {
        self.track("create", async {
            let response = self.access.post(path, data).await?;
            let record = require_record::<E>(response)?;
            self.upsert_front(record.clone());
            Ok(record)
        })
        .await
    }

    /// Update a record in place; `current` follows when it has the same id
    pub async fn update(&self, id: &E::Id, data: Value) -> Result<E> {
        let path = self.item_path(id);
        self.update_at(&path, data).await
    }

    /// [`update`](Self::update) against an explicit record path
    pub async fn update_at(&self, path: &str, data: Value) -> Result<E> {
        self.track("update", async {
            let response = self.access.put(path, data).await?;
            let record = require_record::<E>(response)?;
            self.replace_item(record.clone());
            Ok(record)
        })
        .await
    }

    /// Delete a record; it leaves `items`, `total` shrinks by one and a
    /// matching `current` is cleared
    pub async fn remove(&self, id: &E::Id) -> Result<()> {
        let path = self.item_path(id);
        self.remove_at(&path, id).await
    }

    /// [`remove`](Self::remove) against an explicit record path
    pub async fn remove_at(&self, path: &str, id: &E::Id) -> Result<()> {
        self.track("remove", async {
            self.access.delete(path).await?;
            self.remove_item(id);
            Ok(())
        })
        .await
    }

    /// Merge `partial` into the persisted filters, then reload the list
    pub async fn set_filters(&self, partial: Filters) -> Result<Page<E>> {
        self.lock().state.filters.merge(&partial);
        self.list(Filters::new()).await
    }

    /// Forget the last error
    pub fn clear_error(&self) {
        self.lock().state.error = None;
    }

    // === Building blocks for entity-specific operations ===

    /// The collaborator every request goes through
    pub fn access(&self) -> &Arc<dyn DataAccess> {
        &self.access
    }

    /// Run `future` with the store's lifecycle: `loading` raised until it
    /// settles, failures recorded in `error` and returned
    pub async fn track<T, Fut>(&self, operation: &'static str, future: Fut) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        let _loading = LoadingGuard::enter(&self.slot);
        tracing::debug!(resource = E::resource_name(), operation, "Store operation started");
        self.record(operation, future.await)
    }

    /// Like [`track`](Self::track) but leaves `loading` alone
    pub async fn untracked<T, Fut>(&self, operation: &'static str, future: Fut) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        tracing::debug!(resource = E::resource_name(), operation, "Store query started");
        self.record(operation, future.await)
    }

    /// Record a failure without touching `loading`
    pub fn record<T>(&self, operation: &'static str, outcome: Result<T>) -> Result<T> {
        if let Err(error) = &outcome {
            tracing::warn!(
                resource = E::resource_name(),
                operation,
                error = %error,
                "Store operation failed"
            );
            self.lock().state.error = Some(error.message());
        }
        outcome
    }

    /// Insert at the front; an existing same-id entry is moved there and the
    /// total only grows for new records
    pub(crate) fn upsert_front(&self, record: E) {
        let mut slot = self.lock();
        let state = &mut slot.state;
        let id = record.id();
        let before = state.items.len();
        state.items.retain(|item| item.id() != id);
        if state.items.len() == before {
            state.total += 1;
        }
        if state.current.as_ref().is_some_and(|c| c.id() == id) {
            state.current = Some(record.clone());
        }
        state.items.insert(0, record);
    }

    /// Replace the same-id entry in place and a matching `current`
    pub(crate) fn replace_item(&self, record: E) {
        let mut slot = self.lock();
        let state = &mut slot.state;
        replace_in_items(&mut state.items, &record);
        if state.current.as_ref().is_some_and(|c| c.id() == record.id()) {
            state.current = Some(record);
        }
    }

    /// Apply `change` to the same-id entry and to a matching `current`
    pub(crate) fn modify_item(&self, id: &E::Id, change: impl Fn(&mut E)) {
        let mut slot = self.lock();
        let state = &mut slot.state;
        if let Some(item) = state.items.iter_mut().find(|item| &item.id() == id) {
            change(item);
        }
        if let Some(current) = state.current.as_mut().filter(|c| &c.id() == id) {
            change(current);
        }
    }

    pub(crate) fn remove_item(&self, id: &E::Id) {
        let mut slot = self.lock();
        let state = &mut slot.state;
        state.items.retain(|item| &item.id() != id);
        state.total = state.total.saturating_sub(1);
        if state.current.as_ref().is_some_and(|c| &c.id() == id) {
            state.current = None;
        }
    }
}

fn unique_by_id<E: Resource>(items: Vec<E>) -> Vec<E> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.id()))
        .collect()
}

fn replace_in_items<E: Resource>(items: &mut [E], record: &E) {
    let id = record.id();
    if let Some(slot) = items.iter_mut().find(|item| item.id() == id) {
        *slot = record.clone();
    }
}

fn sync_current<E: Resource>(state: &mut ResourceState<E>) {
    let Some(id) = state.current.as_ref().map(Resource::id) else {
        return;
    };
    if let Some(item) = state.items.iter().find(|item| item.id() == id) {
        state.current = Some(item.clone());
    }
}

/// Read a record from a bare body or a `{data: record}` envelope
pub(crate) fn decode_record<E: Resource>(response: Value) -> Result<Option<E>, StoreError> {
    if response.is_null() {
        return Ok(None);
    }

    let direct = match serde_json::from_value::<E>(response.clone()) {
        Ok(record) => return Ok(Some(record)),
        Err(e) => e,
    };

    match response {
        Value::Object(mut body) if body.contains_key("data") => {
            match body.remove("data").unwrap_or(Value::Null) {
                Value::Null => Ok(None),
                inner => serde_json::from_value::<E>(inner)
                    .map(Some)
                    .map_err(|e| unexpected::<E>(e.to_string())),
            }
        }
        _ => Err(unexpected::<E>(direct.to_string())),
    }
}

/// [`decode_record`] where an empty body is itself an error
pub(crate) fn require_record<E: Resource>(response: Value) -> Result<E, StoreError> {
    decode_record::<E>(response)?.ok_or_else(|| unexpected::<E>("empty response".to_string()))
}

fn unexpected<E: Resource>(message: String) -> StoreError {
    StoreError::UnexpectedResponse {
        resource: E::resource_name().to_string(),
        message,
    }
}
