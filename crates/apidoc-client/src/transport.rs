//! Request plumbing shared by the resource clients.
//!
//! Reads go through [`crate::retry::retry_send`]; mutations are sent once.
//! Every request carries the `locale` query parameter; authentication and
//! version headers are installed on the underlying `reqwest::Client`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApifoxApiError;

/// Longest raw error body surfaced to callers.
const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Debug, Clone)]
pub(crate) struct Transport {
    http: reqwest::Client,
    /// `{base}/v1/projects/{project}` without a trailing slash.
    project_root: String,
    locale: String,
}

impl Transport {
    pub(crate) fn new(http: reqwest::Client, project_root: String, locale: String) -> Self {
        Self {
            http,
            project_root,
            locale,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.project_root, path)
    }

    /// GET with retry, returning the unwrapped JSON body.
    pub(crate) async fn get_value(
        &self,
        endpoint: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Value, ApifoxApiError> {
        let url = self.url(path);
        tracing::debug!(endpoint, %url, "Apifox read");

        let resp = crate::retry::retry_send(|| {
            self.http
                .get(&url)
                .query(&[("locale", self.locale.as_str())])
                .query(query)
                .send()
        })
        .await
        .map_err(|e| ApifoxApiError::Http {
            endpoint: endpoint.into(),
            source: e,
        })?;

        read_body(endpoint, resp).await
    }

    /// GET with retry, deserializing the body into `T`.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApifoxApiError> {
        let value = self.get_value(endpoint, path, query).await?;
        serde_json::from_value(value).map_err(|e| ApifoxApiError::Deserialization {
            endpoint: endpoint.into(),
            source: e,
        })
    }

    /// Send a mutation once. `body` is serialized as JSON when present.
    pub(crate) async fn send<B: Serialize + ?Sized>(
        &self,
        method: reqwest::Method,
        endpoint: &str,
        path: &str,
        body: Option<&B>,
    ) -> Result<Value, ApifoxApiError> {
        let url = self.url(path);
        tracing::debug!(endpoint, %url, "Apifox write");

        let mut req = self
            .http
            .request(method, &url)
            .query(&[("locale", self.locale.as_str())]);
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await.map_err(|e| ApifoxApiError::Http {
            endpoint: endpoint.into(),
            source: e,
        })?;

        read_body(endpoint, resp).await
    }
}

/// Check the status and decode the body. Empty 2xx bodies decode to `null`.
async fn read_body(endpoint: &str, resp: reqwest::Response) -> Result<Value, ApifoxApiError> {
    let status = resp.status();
    let text = resp.text().await.map_err(|e| ApifoxApiError::Http {
        endpoint: endpoint.into(),
        source: e,
    })?;

    if !status.is_success() {
        return Err(ApifoxApiError::ApiError {
            endpoint: endpoint.into(),
            status: status.as_u16(),
            body: error_message(&text),
        });
    }

    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    let value: Value = serde_json::from_str(&text).map_err(|e| ApifoxApiError::Deserialization {
        endpoint: endpoint.into(),
        source: e,
    })?;
    Ok(unwrap_envelope(value))
}

/// Pull the human-readable message out of an error body.
fn error_message(text: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(text) {
        for key in ["message", "errorMessage", "error"] {
            if let Some(Value::String(msg)) = map.get(key) {
                if !msg.is_empty() {
                    return msg.clone();
                }
            }
        }
    }
    text.chars().take(MAX_ERROR_BODY_CHARS).collect()
}

/// `{"success": true, "data": X}` → `X`. Other bodies pass through.
fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("success") && map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}
