//! Supplier Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{self, Keyed, RowId};

/// Supplier entity
///
/// Only the name is required; contact fields are free-form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    #[serde(deserialize_with = "types::row_id")]
    pub id: RowId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// Tax identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tva: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adresse: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ville: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_postal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Keyed for Supplier {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Create supplier payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupplierCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tva: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adresse: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ville: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_postal: Option<String>,
}

impl SupplierCreate {
    /// Turn blank contact fields into `None` so the remote store records
    /// NULL instead of empty strings.
    pub fn normalized(mut self) -> Self {
        fn clean(field: &mut Option<String>) {
            if field.as_deref().is_some_and(|v| v.trim().is_empty()) {
                *field = None;
            }
        }
        clean(&mut self.contact_email);
        clean(&mut self.phone_number);
        clean(&mut self.tva);
        clean(&mut self.adresse);
        clean(&mut self.ville);
        clean(&mut self.code_postal);
        self
    }
}

/// Joined supplier columns on purchase history rows (`suppliers(name)`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierRef {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_drops_blank_contact_fields() {
        let payload = SupplierCreate {
            name: "Grasse Aromes".into(),
            contact_email: Some("".into()),
            phone_number: Some("  ".into()),
            tva: Some("FR12345678901".into()),
            ..SupplierCreate::default()
        }
        .normalized();

        assert!(payload.contact_email.is_none());
        assert!(payload.phone_number.is_none());
        assert_eq!(payload.tva.as_deref(), Some("FR12345678901"));

        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(json, r#"{"name":"Grasse Aromes","tva":"FR12345678901"}"#);
    }
}
