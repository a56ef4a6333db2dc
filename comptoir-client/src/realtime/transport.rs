//! Transport abstraction for the realtime change feed

use async_trait::async_trait;
use tokio::sync::mpsc;

use shared::realtime::ChangeEvent;

use crate::error::ClientResult;

/// Source of decoded row-change events.
///
/// `next_event` suspends until a change arrives; `Ok(None)` means the feed
/// ended and will not deliver again. Implementations own their reconnect
/// policy.
#[async_trait]
pub trait RealtimeTransport: Send {
    async fn next_event(&mut self) -> ClientResult<Option<ChangeEvent>>;
    async fn close(&mut self) -> ClientResult<()>;
}

/// In-memory transport fed through a channel. Used by tests and by any
/// shell that already has its own feed plumbing.
#[derive(Debug)]
pub struct ChannelTransport {
    rx: mpsc::UnboundedReceiver<ChangeEvent>,
}

impl ChannelTransport {
    /// Build a sender/transport pair.
    pub fn pair() -> (mpsc::UnboundedSender<ChangeEvent>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self { rx })
    }
}

#[async_trait]
impl RealtimeTransport for ChannelTransport {
    async fn next_event(&mut self) -> ClientResult<Option<ChangeEvent>> {
        Ok(self.rx.recv().await)
    }

    async fn close(&mut self) -> ClientResult<()> {
        self.rx.close();
        Ok(())
    }
}
