//! Client error types

use shared::error::{ErrorPayload, SqlState};
use shared::notice::Notice;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (transport level)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote service returned an error payload
    #[error("API error: {0}")]
    Api(ErrorPayload),

    /// Local validation failure; no remote call was issued
    #[error("Validation error: {0}")]
    Validation(String),

    /// A stock decrement would take the level below zero
    #[error("stock cannot go below zero")]
    StockFloor,

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// The configured storage bucket does not exist
    #[error("storage bucket '{0}' not found")]
    BucketMissing(String),

    /// Storage rejected the operation (missing policy, 403/500)
    #[error("storage permission denied")]
    StoragePermission,

    /// Realtime feed failure
    #[error("Realtime error: {0}")]
    Realtime(String),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// Remote constraint classification, when one applies.
    pub fn sql_state(&self) -> Option<SqlState> {
        match self {
            Self::Api(payload) => Some(payload.sql_state()),
            Self::StockFloor => Some(SqlState::CheckViolation),
            _ => None,
        }
    }

    /// Operator-facing message for the transient notification.
    pub fn user_message(&self, bucket: &str) -> String {
        match self {
            Self::Api(payload) => payload.user_message().to_string(),
            Self::StockFloor => SqlState::CheckViolation.user_message().to_string(),
            Self::Validation(msg) => msg.clone(),
            Self::BucketMissing(_) => {
                format!("Erreur config : le bucket '{bucket}' n'existe pas.")
            }
            Self::StoragePermission => {
                "Erreur de permission (403/500). Vérifiez les policies du bucket de stockage."
                    .to_string()
            }
            Self::Unauthorized => "Session expirée, veuillez vous reconnecter.".to_string(),
            _ => SqlState::Other.user_message().to_string(),
        }
    }

    /// Error notice ready for the shell's toast mechanism.
    pub fn notice(&self, bucket: &str) -> Notice {
        Notice::error(self.user_message(bucket))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(code: &str) -> ClientError {
        ClientError::Api(ErrorPayload {
            code: code.into(),
            message: "constraint violated".into(),
            details: None,
            hint: None,
        })
    }

    #[test]
    fn duplicate_sku_code_selects_specific_message() {
        let err = api_error("23505");
        assert_eq!(err.sql_state(), Some(SqlState::UniqueViolation));
        assert_eq!(err.user_message("b"), "Ce SKU existe déjà !");
    }

    #[test]
    fn check_violation_and_local_floor_share_one_message() {
        let remote = api_error("23514");
        let local = ClientError::StockFloor;
        assert_eq!(remote.user_message("b"), local.user_message("b"));
    }

    #[test]
    fn unknown_code_gets_generic_message() {
        let err = api_error("P0001");
        assert_eq!(err.user_message("b"), SqlState::Other.user_message());
    }

    #[test]
    fn missing_bucket_names_the_configured_bucket() {
        let err = ClientError::BucketMissing("boutique-images".into());
        assert!(err.user_message("boutique-images").contains("boutique-images"));
    }
}
