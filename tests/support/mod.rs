//! Shared test harness for store testing
//!
//! Provides `Note`, a minimal resource, and `ScriptedAccess`, a `DataAccess`
//! that answers calls from a queue of scripted replies. A reply can be gated
//! on a oneshot channel so a test decides when each request settles.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! mod support;
//! use support::*;
//! ```

#![allow(dead_code)]

use async_trait::async_trait;
use civic::core::error::TransportError;
use civic::core::service::{DataAccess, Method, RequestOptions};
use civic::prelude::RecordId;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

civic::impl_resource!(
    /// A test record with a numeric id and a title
    Note,
    "note",
    "/notes",
    id: RecordId,
    {
        title: String,
    }
);

/// `{ data, total }` page of notes with the given ids
pub fn note_page(ids: &[i64], total: usize) -> Value {
    let data: Vec<Value> = ids
        .iter()
        .map(|id| json!({"id": id, "title": format!("note {}", id)}))
        .collect();
    json!({ "data": data, "total": total })
}

struct Reply {
    gate: Option<oneshot::Receiver<()>>,
    outcome: Result<Value, TransportError>,
}

/// Answers calls in order from scripted replies; unscripted calls get `{}`
#[derive(Default)]
pub struct ScriptedAccess {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<(Method, String, RequestOptions)>>,
}

impl ScriptedAccess {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a reply that settles immediately
    pub fn reply(&self, outcome: Result<Value, TransportError>) {
        self.replies.lock().unwrap().push_back(Reply {
            gate: None,
            outcome,
        });
    }

    /// Queue a reply that settles once the returned sender fires
    pub fn gated_reply(&self, outcome: Result<Value, TransportError>) -> oneshot::Sender<()> {
        let (release, gate) = oneshot::channel();
        self.replies.lock().unwrap().push_back(Reply {
            gate: Some(gate),
            outcome,
        });
        release
    }

    pub fn calls(&self) -> Vec<(Method, String, RequestOptions)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Yield until at least `n` calls arrived
    pub async fn wait_for_calls(&self, n: usize) {
        while self.call_count() < n {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl DataAccess for ScriptedAccess {
    async fn call(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Value, TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push((method, path.to_string(), options));

        let reply = self.replies.lock().unwrap().pop_front();
        let Some(reply) = reply else {
            return Ok(json!({}));
        };
        if let Some(gate) = reply.gate {
            let _ = gate.await;
        }
        reply.outcome
    }
}
