//! Low-level HTTP access to the hosted backend's query API
//!
//! One thin wrapper around `reqwest` with the backend's header discipline
//! (`apikey` plus a bearer token) and the error-payload decode shared by
//! every operation. The per-entity methods live in [`crate::gateway`].

use std::sync::{Arc, RwLock};

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use shared::error::ErrorPayload;

use crate::config::BackendConfig;
use crate::error::{ClientError, ClientResult};

/// HTTP client for the query API
#[derive(Debug, Clone)]
pub struct RestClient {
    client: Client,
    config: Arc<BackendConfig>,
    token: Arc<RwLock<Option<String>>>,
}

impl RestClient {
    pub fn new(config: Arc<BackendConfig>) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            config,
            token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Raw reqwest client, for the storage endpoints.
    pub(crate) fn inner(&self) -> &Client {
        &self.client
    }

    /// Replace the session token (after the shell completes a sign-in).
    pub fn set_token(&self, token: Option<String>) {
        *self.token.write().expect("token lock poisoned") = token;
    }

    /// Current bearer token: the session token when present, otherwise the
    /// public API key.
    pub fn bearer(&self) -> String {
        self.token
            .read()
            .expect("token lock poisoned")
            .clone()
            .unwrap_or_else(|| self.config.api_key.clone())
    }

    pub(crate) fn apply_headers(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("apikey", &self.config.api_key)
            .header(reqwest::header::AUTHORIZATION, format!("Bearer {}", self.bearer()))
    }

    /// Rows matching a query. `query` is the backend's filter syntax,
    /// e.g. `[("select", "*"), ("order", "name.asc")]`.
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, &str)],
    ) -> ClientResult<Vec<T>> {
        let req = self
            .apply_headers(self.client.get(self.config.rest_url(table)))
            .query(query);
        let response = req.send().await?;
        Self::handle_response(response).await
    }

    /// Exactly one row; the backend rejects the request when the filter
    /// matches zero or several.
    pub async fn select_single<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, &str)],
    ) -> ClientResult<T> {
        let req = self
            .apply_headers(self.client.get(self.config.rest_url(table)))
            .query(query)
            .header(reqwest::header::ACCEPT, "application/vnd.pgrst.object+json");
        let response = req.send().await?;
        Self::handle_response(response).await
    }

    /// Insert a row, returning nothing.
    pub async fn insert<B: Serialize + Sync>(&self, table: &str, body: &B) -> ClientResult<()> {
        let req = self
            .apply_headers(self.client.post(self.config.rest_url(table)))
            .header("Prefer", "return=minimal")
            .json(body);
        let response = req.send().await?;
        Self::expect_success(response).await
    }

    /// Insert a row and return its stored representation.
    pub async fn insert_returning<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        table: &str,
        body: &B,
    ) -> ClientResult<T> {
        let req = self
            .apply_headers(self.client.post(self.config.rest_url(table)))
            .header("Prefer", "return=representation")
            .header(reqwest::header::ACCEPT, "application/vnd.pgrst.object+json")
            .json(body);
        let response = req.send().await?;
        Self::handle_response(response).await
    }

    /// Patch the row with the given id.
    pub async fn update<B: Serialize + Sync>(
        &self,
        table: &str,
        id: &str,
        body: &B,
    ) -> ClientResult<()> {
        let req = self
            .apply_headers(self.client.patch(self.config.rest_url(table)))
            .query(&[("id", format!("eq.{id}"))])
            .json(body);
        let response = req.send().await?;
        Self::expect_success(response).await
    }

    /// Delete the row with the given id.
    pub async fn delete(&self, table: &str, id: &str) -> ClientResult<()> {
        let req = self
            .apply_headers(self.client.delete(self.config.rest_url(table)))
            .query(&[("id", format!("eq.{id}"))]);
        let response = req.send().await?;
        Self::expect_success(response).await
    }

    async fn handle_response<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(Self::decode_error(status, response.text().await?));
        }
        Ok(response.json().await?)
    }

    async fn expect_success(response: Response) -> ClientResult<()> {
        let status = response.status();
        if !status.is_success() {
            return Err(Self::decode_error(status, response.text().await?));
        }
        Ok(())
    }

    fn decode_error(status: StatusCode, body: String) -> ClientError {
        // The query API reports failures as a JSON payload with a
        // machine-readable code; keep the code so callers can pick a
        // specific user-facing message.
        if let Ok(payload) = serde_json::from_str::<ErrorPayload>(&body) {
            if !payload.code.is_empty() || !payload.message.is_empty() {
                return ClientError::Api(payload);
            }
        }
        match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
            _ => ClientError::InvalidResponse(format!("{status}: {body}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_prefers_machine_readable_payload() {
        let err = RestClient::decode_error(
            StatusCode::CONFLICT,
            r#"{"code":"23505","message":"duplicate key"}"#.into(),
        );
        match err {
            ClientError::Api(payload) => assert_eq!(payload.code, "23505"),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn decode_error_falls_back_on_status() {
        let err = RestClient::decode_error(StatusCode::UNAUTHORIZED, "token expired".into());
        assert!(matches!(err, ClientError::Unauthorized));

        let err = RestClient::decode_error(StatusCode::BAD_GATEWAY, "upstream".into());
        assert!(matches!(err, ClientError::InvalidResponse(_)));
    }
}
