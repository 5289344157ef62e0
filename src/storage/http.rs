//! HTTP implementation of DataAccess backed by reqwest

use crate::config::ApiConfig;
use crate::core::auth::{ACCESS_TOKEN_KEY, TokenStore};
use crate::core::error::TransportError;
use crate::core::query::Filters;
use crate::core::service::{DataAccess, Method, RequestOptions};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::sync::Arc;

/// Response header carrying a refreshed access token
pub const NEW_TOKEN_HEADER: &str = "new-token";

/// Envelope code meaning success
const SUCCESS_CODE: i64 = 200;

/// Data access over HTTP
///
/// Sends JSON, authenticates with the bearer token found in the
/// [`TokenStore`] and maps every failure into a [`TransportError`].
pub struct HttpDataAccess {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
}

impl HttpDataAccess {
    /// Build a client for the versioned API root of `api`
    pub fn new(api: &ApiConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(api.timeout())
            .build()
            .map_err(|e| TransportError::network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: api.url(),
            tokens,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn to_reqwest(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn send_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::network("Network connection failed, please check your network settings")
    }
}

/// Reject `{code, message}` envelopes whose code is not success
fn check_envelope(body: &Value) -> Result<(), TransportError> {
    match body.get("code").and_then(Value::as_i64) {
        Some(code) if code != SUCCESS_CODE && code != 0 => Err(TransportError::Api {
            code,
            message: body
                .get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .unwrap_or("Request failed")
                .to_string(),
        }),
        _ => Ok(()),
    }
}

#[async_trait]
impl DataAccess for HttpDataAccess {
    async fn call(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Value, TransportError> {
        let url = self.url(path);
        tracing::debug!(%method, url = %url, "Sending request");

        let mut request = self.client.request(to_reqwest(method), &url);
        if let Some(query) = options.query {
            request = request.query(&Filters::from(query).to_query_pairs());
        }
        if let Some(body) = options.body {
            request = request.json(&body);
        }
        if let Some(token) = self.tokens.access_token() {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(url = %url, error = %e, "Request failed");
            send_error(e)
        })?;

        if let Some(token) = response
            .headers()
            .get(NEW_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
        {
            self.tokens.set(ACCESS_TOKEN_KEY, token.to_string());
        }

        let status = response.status();
        if !status.is_success() {
            if status == StatusCode::UNAUTHORIZED {
                self.tokens.clear_session();
            }
            tracing::warn!(url = %url, status = status.as_u16(), "Request rejected");
            return Err(TransportError::from_status(status.as_u16()));
        }

        let text = response.text().await.map_err(send_error)?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        let body: Value = serde_json::from_str(&text).map_err(|e| TransportError::Decode {
            message: e.to_string(),
        })?;

        if let Err(error) = check_envelope(&body) {
            if matches!(error, TransportError::Api { code: 401, .. }) {
                self.tokens.clear_session();
            }
            tracing::warn!(url = %url, error = %error, "API returned an error");
            return Err(error);
        }
        Ok(body)
    }
}
