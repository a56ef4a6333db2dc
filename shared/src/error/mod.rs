//! Unified error system for the Comptoir dashboard
//!
//! The hosted backend reports failures as a JSON payload carrying a
//! SQLSTATE-style machine-readable code. [`SqlState`] classifies the codes
//! the dashboard reacts to, [`ErrorPayload`] mirrors the remote body, and
//! the user-facing message selection lives on both so views never match on
//! raw code strings.

mod codes;

pub use codes::SqlState;

use serde::{Deserialize, Serialize};

/// Error body returned by the hosted backend's query API.
///
/// `code` is a SQLSTATE string for constraint violations (e.g. `23505`);
/// storage and auth endpoints reuse the shape with service-specific codes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorPayload {
    /// Classify the embedded code.
    pub fn sql_state(&self) -> SqlState {
        SqlState::from_code(&self.code)
    }

    /// Operator-facing message for this failure.
    ///
    /// Recognized constraint codes get a specific message; anything else
    /// falls back to the generic one.
    pub fn user_message(&self) -> &'static str {
        self.sql_state().user_message()
    }
}

impl std::fmt::Display for ErrorPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.code.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "[{}] {}", self.code, self.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_decodes_backend_body() {
        let body = r#"{"code":"23505","message":"duplicate key value violates unique constraint \"products_sku_key\"","details":"Key (sku)=(PRF-001) already exists.","hint":null}"#;
        let payload: ErrorPayload = serde_json::from_str(body).unwrap();
        assert_eq!(payload.sql_state(), SqlState::UniqueViolation);
        assert!(payload.user_message().contains("SKU"));
    }

    #[test]
    fn unknown_code_falls_back_to_generic_message() {
        let payload = ErrorPayload {
            code: "XX000".into(),
            message: "internal".into(),
            details: None,
            hint: None,
        };
        assert_eq!(payload.sql_state(), SqlState::Other);
        assert_eq!(payload.user_message(), SqlState::Other.user_message());
    }
}
