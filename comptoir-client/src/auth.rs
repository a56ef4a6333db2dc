//! Auth session operations
//!
//! The hosted auth service owns sign-in and token issuance; the dashboard
//! only consumes a session token handed over by the shell and exposes
//! sign-out.

use crate::error::{ClientError, ClientResult};
use crate::gateway::ComptoirClient;

impl ComptoirClient {
    /// Install the session token obtained by the shell's sign-in flow.
    pub fn set_session(&self, access_token: impl Into<String>) {
        self.rest().set_token(Some(access_token.into()));
    }

    /// Current bearer for authenticated calls: the session token when one
    /// is installed, the public API key otherwise.
    pub async fn session_token(&self) -> ClientResult<String> {
        let bearer = self.rest().bearer();
        if bearer.is_empty() {
            return Err(ClientError::Unauthorized);
        }
        Ok(bearer)
    }

    /// Revoke the session with the auth service and forget the token.
    /// The local token is cleared even when the remote call fails.
    pub async fn sign_out(&self) -> ClientResult<()> {
        let token = self.rest().bearer();
        let result = self
            .rest()
            .inner()
            .post(self.config().auth_url("logout"))
            .header("apikey", &self.config().api_key)
            .header(reqwest::header::AUTHORIZATION, format!("Bearer {token}"))
            .send()
            .await;
        self.rest().set_token(None);

        let response = result?;
        if !response.status().is_success() && response.status() != reqwest::StatusCode::UNAUTHORIZED
        {
            return Err(ClientError::InvalidResponse(format!(
                "logout failed: {}",
                response.status()
            )));
        }
        Ok(())
    }
}
