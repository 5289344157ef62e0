//! Data-access collaborator trait
//!
//! Stores never perform I/O themselves. Every request goes through a
//! [`DataAccess`] implementation injected at composition time, so the same
//! store code runs against HTTP, an in-memory backend or a scripted test double.

use crate::core::error::TransportError;
use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;

/// HTTP method of a data-access call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query string and body of a call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    /// Query parameters, in insertion order
    pub query: Option<IndexMap<String, Value>>,

    /// JSON body
    pub body: Option<Value>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: IndexMap<String, Value>) -> Self {
        self.query = Some(query);
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// The external collaborator performing the actual request
///
/// On success it returns the parsed response body: a bare record, or
/// `{ data, total? }` for list endpoints. On failure it returns a
/// [`TransportError`] whose message is fit for display.
#[async_trait]
pub trait DataAccess: Send + Sync {
    /// Perform one request
    async fn call(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Value, TransportError>;

    /// GET with a query string
    async fn get(&self, path: &str, query: IndexMap<String, Value>) -> Result<Value, TransportError> {
        self.call(Method::Get, path, RequestOptions::new().with_query(query))
            .await
    }

    /// POST with a JSON body
    async fn post(&self, path: &str, body: Value) -> Result<Value, TransportError> {
        self.call(Method::Post, path, RequestOptions::new().with_body(body))
            .await
    }

    /// PUT with a JSON body
    async fn put(&self, path: &str, body: Value) -> Result<Value, TransportError> {
        self.call(Method::Put, path, RequestOptions::new().with_body(body))
            .await
    }

    /// DELETE without a body
    async fn delete(&self, path: &str) -> Result<Value, TransportError> {
        self.call(Method::Delete, path, RequestOptions::new()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    struct Recorder {
        calls: Mutex<Vec<(Method, String, RequestOptions)>>,
    }

    #[async_trait]
    impl DataAccess for Recorder {
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
            Ok(json!({}))
        }
    }

    #[tokio::test]
    async fn test_convenience_methods_delegate_to_call() {
        let recorder = Recorder {
            calls: Mutex::new(Vec::new()),
        };

        recorder.post("/movies", json!({"title": "Up"})).await.unwrap();
        recorder.delete("/movies/1").await.unwrap();

        let calls = recorder.calls.lock().unwrap();
        assert_eq!(calls[0].0, Method::Post);
        assert_eq!(calls[0].2.body, Some(json!({"title": "Up"})));
        assert_eq!(calls[1].0, Method::Delete);
        assert_eq!(calls[1].1, "/movies/1");
        assert_eq!(calls[1].2, RequestOptions::new());
    }

    #[test]
    fn test_method_display() {
        assert_eq!(Method::Patch.to_string(), "PATCH");
    }
}
