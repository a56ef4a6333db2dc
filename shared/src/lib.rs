//! Shared types for the Comptoir dashboard
//!
//! Domain models, the unified error-code system, realtime change-feed
//! types, and the pure reporting functions. Everything here is I/O free;
//! the `comptoir-client` crate owns all network access.

pub mod error;
pub mod models;
pub mod notice;
pub mod realtime;
pub mod report;
pub mod types;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{ErrorPayload, SqlState};
pub use notice::{Notice, Severity};
pub use realtime::{ChangeEvent, ChangeKind};
pub use types::{Keyed, RowId};
