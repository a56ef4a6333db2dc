//! Data models
//!
//! Decoded row types for the hosted backend's collections, plus the
//! Create/Update payload structs the gateway submits. Update payloads are
//! all-`Option` and skip `None` on serialization so a PATCH only touches
//! the provided columns. All row ids are canonicalized to `String` at
//! decode time.

pub mod catalog;
pub mod movement;
pub mod product;
pub mod purchase;
pub mod sale;
pub mod supplier;

// Re-exports
pub use catalog::*;
pub use movement::*;
pub use product::*;
pub use purchase::*;
pub use sale::*;
pub use supplier::*;
