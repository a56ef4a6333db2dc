//! Comptoir Client - gateway to the hosted backend
//!
//! Wraps every remote operation of the inventory dashboard: the query API
//! (products, suppliers, purchases, sales, movements, storefront catalog),
//! object storage, auth session, the client-side image preprocessing, plus
//! the local reactive store and the realtime synchronizer that keeps the
//! product collection in step with the remote change feed.

pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod image;
pub mod realtime;
pub mod storage;
pub mod store;

pub use config::BackendConfig;
pub use error::{ClientError, ClientResult};
pub use gateway::ComptoirClient;
pub use realtime::{ChannelTransport, RealtimeTransport, Synchronizer, WsTransport};
pub use storage::UploadProgress;
pub use store::{Collection, StoreHandle, Subscription};

// Re-export shared types for convenience
pub use shared::models;
pub use shared::report;
pub use shared::{ChangeEvent, ChangeKind, ErrorPayload, Notice, Severity, SqlState};
