//! Remote data gateway
//!
//! One [`ComptoirClient`] per session. Each operation performs exactly one
//! round trip against the query API (uploads add the token fetch first).
//! Operations that touch the shared collections update the reactive store
//! on success; purchases, sales and catalog entries stay view-local.

mod catalog;
mod products;
mod purchases;
mod sales;
mod suppliers;

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::BackendConfig;
use crate::error::ClientResult;
use crate::http::RestClient;
use crate::realtime::{Synchronizer, WsTransport};
use crate::store::StoreHandle;

/// Gateway to the hosted backend plus the session's reactive store.
#[derive(Debug, Clone)]
pub struct ComptoirClient {
    rest: RestClient,
    config: Arc<BackendConfig>,
    store: Arc<StoreHandle>,
}

impl ComptoirClient {
    pub fn new(config: BackendConfig) -> ClientResult<Self> {
        let config = Arc::new(config);
        Ok(Self {
            rest: RestClient::new(config.clone())?,
            config,
            store: StoreHandle::new(),
        })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// The session's shared reactive store.
    pub fn store(&self) -> &Arc<StoreHandle> {
        &self.store
    }

    pub(crate) fn rest(&self) -> &RestClient {
        &self.rest
    }

    /// Connect the realtime feed and keep the product collection in sync
    /// until the token is cancelled. Call once per session, and only from
    /// a full client context — a server-side pre-render pass has no feed
    /// transport to connect to.
    pub async fn start_realtime(&self, cancel: CancellationToken) -> ClientResult<JoinHandle<()>> {
        let transport = WsTransport::connect(&self.config).await?;
        Ok(Synchronizer::spawn(self.store.clone(), transport, cancel))
    }
}
