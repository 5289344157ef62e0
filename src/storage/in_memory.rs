//! In-memory implementation of DataAccess for testing and development
//!
//! Collections are JSON records keyed by their collection path. Requests
//! against a registered collection behave like a small REST server:
//! list, read, create, update and delete. Action endpoints (`/bookings/1/cancel`
//! and the like) are answered by route handlers registered per method and path.

use crate::core::error::TransportError;
use crate::core::field::{as_number, as_text, is_absent};
use crate::core::service::{DataAccess, Method, RequestOptions};
use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::{Map, Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// Answers one action endpoint
pub type RouteHandler =
    Arc<dyn Fn(&RequestOptions) -> Result<Value, TransportError> + Send + Sync>;

/// One request as the backend received it
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub options: RequestOptions,
}

struct Collection {
    id_field: String,
    records: IndexMap<String, Value>,
}

#[derive(Default)]
struct BackendState {
    collections: HashMap<String, Collection>,
    routes: HashMap<(Method, String), RouteHandler>,
    failures: VecDeque<TransportError>,
    calls: Vec<RecordedCall>,
}

/// In-memory data access
///
/// Cloning shares the underlying state. Uses RwLock for thread-safe access.
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    state: Arc<RwLock<BackendState>>,
}

impl InMemoryBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    // setup and inspection keep working after a panicking test thread
    fn read_state(&self) -> RwLockReadGuard<'_, BackendState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, BackendState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a collection whose records are identified by `id_field`
    pub fn with_collection(self, path: &str, id_field: &str) -> Self {
        self.write_state()
            .collections
            .entry(normalize(path))
            .or_insert_with(|| Collection {
                id_field: id_field.to_string(),
                records: IndexMap::new(),
            });
        self
    }

    /// Add records to a registered collection
    ///
    /// Records without an identifier get a fresh UUID.
    pub fn seed(&self, path: &str, records: impl IntoIterator<Item = Value>) {
        let mut state = self.write_state();
        if let Some(collection) = state.collections.get_mut(&normalize(path)) {
            for record in records {
                collection.insert(record);
            }
        }
    }

    /// Answer `method path` with `handler` instead of the collection logic
    pub fn route<F>(&self, method: Method, path: &str, handler: F)
    where
        F: Fn(&RequestOptions) -> Result<Value, TransportError> + Send + Sync + 'static,
    {
        self.write_state()
            .routes
            .insert((method, normalize(path)), Arc::new(handler));
    }

    /// Fail the next request with `error`; queued failures are used in order
    pub fn fail_next(&self, error: TransportError) {
        self.write_state().failures.push_back(error);
    }

    /// Every request received so far
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.read_state().calls.clone()
    }

    /// Current records of a collection, in insertion order
    pub fn records(&self, path: &str) -> Vec<Value> {
        self.read_state()
            .collections
            .get(&normalize(path))
            .map(|c| c.records.values().cloned().collect())
            .unwrap_or_default()
    }

    /// One record of a collection
    pub fn record(&self, path: &str, id: &str) -> Option<Value> {
        self.read_state()
            .collections
            .get(&normalize(path))
            .and_then(|c| c.records.get(id).cloned())
    }
}

impl Collection {
    fn insert(&mut self, mut record: Value) -> Value {
        let key = match record.get(&self.id_field).and_then(as_text) {
            Some(key) if !key.is_empty() => key,
            _ => {
                let key = Uuid::new_v4().to_string();
                if let Value::Object(fields) = &mut record {
                    fields.insert(self.id_field.clone(), Value::String(key.clone()));
                }
                key
            }
        };
        self.records.insert(key, record.clone());
        record
    }

    fn list(&self, query: Option<&IndexMap<String, Value>>) -> Value {
        let empty = IndexMap::new();
        let query = query.unwrap_or(&empty);

        let matching: Vec<&Value> = self
            .records
            .values()
            .filter(|record| {
                query
                    .iter()
                    .filter(|(key, _)| key.as_str() != "page" && key.as_str() != "pageSize")
                    .filter(|(_, wanted)| !is_absent(Some(*wanted)))
                    .all(|(key, wanted)| record.get(key).and_then(as_text) == as_text(wanted))
            })
            .collect();
        let total = matching.len();

        let page_size = query
            .get("pageSize")
            .and_then(as_number)
            .map(|n| n as usize)
            .filter(|n| *n > 0);
        let data: Vec<Value> = match page_size {
            Some(size) => {
                let page = query
                    .get("page")
                    .and_then(as_number)
                    .map(|n| n as usize)
                    .unwrap_or(1)
                    .max(1);
                matching
                    .into_iter()
                    .skip((page - 1).saturating_mul(size))
                    .take(size)
                    .cloned()
                    .collect()
            }
            None => matching.into_iter().cloned().collect(),
        };

        json!({ "data": data, "total": total })
    }
}

fn normalize(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

fn not_found() -> TransportError {
    TransportError::from_status(404)
}

fn merge(target: &mut Value, patch: Value, id_field: &str) {
    if let (Value::Object(fields), Value::Object(changes)) = (target, patch) {
        for (key, value) in changes {
            if key != id_field {
                fields.insert(key, value);
            }
        }
    }
}

impl BackendState {
    fn handle(&mut self, method: Method, path: &str, options: RequestOptions) -> Result<Value, TransportError> {
        if let Some(collection) = self.collections.get_mut(path) {
            return match method {
                Method::Get => Ok(collection.list(options.query.as_ref())),
                Method::Post => match options.body {
                    Some(body @ Value::Object(_)) => Ok(collection.insert(body)),
                    _ => Err(TransportError::from_status(400)),
                },
                _ => Err(TransportError::from_status(405)),
            };
        }

        let (parent, id) = path.rsplit_once('/').ok_or_else(not_found)?;
        let collection = self.collections.get_mut(parent).ok_or_else(not_found)?;
        match method {
            Method::Get => collection.records.get(id).cloned().ok_or_else(not_found),
            Method::Put | Method::Patch => {
                let id_field = collection.id_field.clone();
                let record = collection.records.get_mut(id).ok_or_else(not_found)?;
                merge(record, options.body.unwrap_or(Value::Object(Map::new())), &id_field);
                Ok(record.clone())
            }
            Method::Delete => collection
                .records
                .shift_remove(id)
                .map(|_| Value::Null)
                .ok_or_else(not_found),
            Method::Post => Err(TransportError::from_status(405)),
        }
    }
}

#[async_trait]
impl DataAccess for InMemoryBackend {
    async fn call(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Value, TransportError> {
        let path = normalize(path);

        let route = {
            let mut state = self
                .state
                .write()
                .map_err(|e| TransportError::network(format!("Failed to acquire write lock: {}", e)))?;

            state.calls.push(RecordedCall {
                method,
                path: path.clone(),
                options: options.clone(),
            });

            if let Some(error) = state.failures.pop_front() {
                tracing::debug!(%method, path = %path, "Injected failure");
                return Err(error);
            }

            match state.routes.get(&(method, path.clone())) {
                Some(handler) => Arc::clone(handler),
                None => return state.handle(method, &path, options),
            }
        };

        // Handlers run outside the lock so they may call back into the backend
        route(&options)
    }
}
