//! SQLSTATE codes surfaced by the hosted backend
//!
//! Only the constraint classes the dashboard reacts to are named; every
//! other code maps to [`SqlState::Other`] and the generic message.

use serde::{Deserialize, Serialize};

/// Machine-readable constraint classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SqlState {
    /// `23502` — a required column was null
    NotNullViolation,
    /// `23503` — referenced row does not exist
    ForeignKeyViolation,
    /// `23505` — unique constraint (duplicate SKU)
    UniqueViolation,
    /// `23514` — check constraint (stock below zero)
    CheckViolation,
    /// Any unrecognized code
    Other,
}

impl SqlState {
    pub fn from_code(code: &str) -> Self {
        match code {
            "23502" => Self::NotNullViolation,
            "23503" => Self::ForeignKeyViolation,
            "23505" => Self::UniqueViolation,
            "23514" => Self::CheckViolation,
            _ => Self::Other,
        }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotNullViolation => "23502",
            Self::ForeignKeyViolation => "23503",
            Self::UniqueViolation => "23505",
            Self::CheckViolation => "23514",
            Self::Other => "",
        }
    }

    /// Operator-facing message, in the dashboard's display language.
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::NotNullViolation => "Champ obligatoire manquant.",
            Self::ForeignKeyViolation => "Référence invalide : l'élément lié n'existe plus.",
            Self::UniqueViolation => "Ce SKU existe déjà !",
            Self::CheckViolation => "Opération impossible : le stock ne peut pas être négatif.",
            Self::Other => "Erreur lors de l'opération.",
        }
    }
}

impl std::fmt::Display for SqlState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
