use crate::config::ServiceSettings;
use crate::error::ApiError;
use crate::observability::outgoing_headers;
use crate::session::{AuthSnapshot, SessionStore};
use crate::utils::{IdempotencyKey, IDEMPOTENCY_KEY_HEADER};
use reqwest::{Client, RequestBuilder};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// HTTP client for one backend. Holds no credential of its own: the bearer is
/// read from the shared [`SessionStore`] as each request is built.
pub struct ApiClient {
    client: Client,
    settings: ServiceSettings,
    service: &'static str,
    session: Arc<SessionStore>,
}

impl ApiClient {
    pub fn new(
        service: &'static str,
        settings: ServiceSettings,
        session: Arc<SessionStore>,
    ) -> Self {
        Self {
            client: Client::new(),
            settings,
            service,
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.settings.url
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}{}{}",
            self.settings.url.trim_end_matches('/'),
            self.settings.api_prefix,
            path
        )
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let request = self.client.get(self.url(path)).query(query);
        self.send(request, None, true).await
    }

    pub async fn post<B, T>(
        &self,
        path: &str,
        body: &B,
        key: Option<&IdempotencyKey>,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.client.post(self.url(path)).json(body);
        self.send(request, key, true).await
    }

    /// POST without a body, e.g. `/payouts/{id}/confirm`.
    pub async fn post_empty<T: DeserializeOwned>(
        &self,
        path: &str,
        key: Option<&IdempotencyKey>,
    ) -> Result<T, ApiError> {
        let request = self.client.post(self.url(path));
        self.send(request, key, true).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.client.put(self.url(path)).json(body);
        self.send(request, None, true).await
    }

    /// POST outside the API prefix and without a bearer. A rejection here is a
    /// failed sign-in, not an expired session.
    pub async fn post_anonymous<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.settings.url.trim_end_matches('/'), path);
        let request = self.client.post(url).json(body);
        self.send(request, None, false).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        mut request: RequestBuilder,
        key: Option<&IdempotencyKey>,
        authenticated: bool,
    ) -> Result<T, ApiError> {
        let auth = if authenticated {
            Some(self.session.authorization())
        } else {
            None
        };

        if let Some(bearer) = auth.as_ref().and_then(|a| a.bearer.as_ref()) {
            request = request.bearer_auth(bearer.expose_secret());
        }
        if let Some(key) = key {
            request = request.header(IDEMPOTENCY_KEY_HEADER, key.as_str());
        }
        let (headers, request_id) = outgoing_headers();
        let request = request.headers(headers).build()?;

        let method = request.method().clone();
        let url = request.url().clone();
        tracing::debug!(
            service = self.service,
            %method,
            %url,
            request_id = %request_id,
            idempotency_key = key.map(|k| k.as_str()),
            "Sending request"
        );

        let response = self.client.execute(request).await.map_err(|e| {
            tracing::error!(
                service = self.service,
                "Failed to send {} request to {}: {}",
                method,
                url,
                e
            );
            ApiError::Network(e.to_string())
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            tracing::error!(service = self.service, "Failed to read response from {}: {}", url, e);
            ApiError::Network(e.to_string())
        })?;

        tracing::debug!(
            service = self.service,
            %method,
            %url,
            status = status.as_u16(),
            "Received response"
        );

        if !status.is_success() {
            let err = ApiError::from_status(status, backend_message(&body));
            if err.is_authorization_denied() {
                tracing::warn!(
                    service = self.service,
                    %url,
                    status = status.as_u16(),
                    "Credential rejected"
                );
                self.on_authorization_denied(auth);
            } else {
                tracing::warn!(
                    service = self.service,
                    %method,
                    %url,
                    error = %err,
                    "Request failed"
                );
            }
            return Err(err);
        }

        // Some endpoints answer 200 with no body; let `()`/`Option` targets accept it.
        let body: &[u8] = if body.is_empty() { b"null" } else { &body };
        serde_json::from_slice(body).map_err(|e| {
            tracing::error!(service = self.service, %url, "Unexpected response body: {}", e);
            ApiError::Decode(e.to_string())
        })
    }

    fn on_authorization_denied(&self, auth: Option<AuthSnapshot>) {
        // Only a request that actually carried a credential may expire it.
        if let Some(AuthSnapshot {
            bearer: Some(_),
            epoch,
        }) = auth
        {
            self.session.expire(epoch);
        }
    }
}

/// `message`, else `error`, from a JSON error body.
fn backend_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    ["message", "error"]
        .iter()
        .filter_map(|field| value.get(*field).and_then(|v| v.as_str()))
        .map(str::trim)
        .find(|m| !m.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_message_prefers_message_over_error() {
        assert_eq!(
            backend_message(br#"{"message":"Wallet frozen","error":"Bad Request"}"#).as_deref(),
            Some("Wallet frozen")
        );
        assert_eq!(
            backend_message(br#"{"error":"Forbidden"}"#).as_deref(),
            Some("Forbidden")
        );
        assert_eq!(
            backend_message(br#"{"message":"  ","error":"Conflict"}"#).as_deref(),
            Some("Conflict")
        );
        assert_eq!(backend_message(b"<html>502</html>"), None);
        assert_eq!(backend_message(b""), None);
    }

    #[test]
    fn urls_join_base_prefix_and_path() {
        let client = ApiClient::new(
            "ledger",
            ServiceSettings::new("http://localhost:8080/"),
            Arc::new(SessionStore::in_memory()),
        );
        assert_eq!(
            client.url("/users/me"),
            "http://localhost:8080/api/v1/users/me"
        );
    }
}
