//! Websocket transport for the hosted backend's realtime feed
//!
//! Speaks the backend's channel protocol: a join frame binding to
//! row-level changes on `public.products`, a periodic heartbeat, and
//! `postgres_changes` frames decoded into [`ChangeEvent`]. On a dropped
//! connection the transport resubscribes by itself.

use std::time::Duration;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use shared::realtime::{ChangeEvent, ChangeKind};

use super::{PRODUCTS_TABLE, SCHEMA};
use crate::config::BackendConfig;
use crate::error::{ClientError, ClientResult};
use crate::realtime::RealtimeTransport;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Channel protocol frame.
#[derive(Debug, Serialize, Deserialize)]
struct Frame {
    topic: String,
    event: String,
    payload: Value,
    #[serde(rename = "ref")]
    reference: Option<String>,
}

/// Row-change body inside a `postgres_changes` frame.
#[derive(Debug, Deserialize)]
struct ChangeData {
    #[serde(rename = "type")]
    kind: ChangeKind,
    schema: String,
    table: String,
    #[serde(default)]
    record: Option<Value>,
    #[serde(default)]
    old_record: Option<Value>,
}

/// Websocket-backed realtime transport.
pub struct WsTransport {
    url: String,
    socket: WsStream,
    heartbeat: tokio::time::Interval,
    reconnect_delay: Duration,
    msg_ref: u64,
}

impl WsTransport {
    /// Connect to the feed and join the products channel.
    pub async fn connect(config: &BackendConfig) -> ClientResult<Self> {
        let url = config.realtime_url()?;
        let socket = Self::open(&url).await?;
        let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
        heartbeat.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        let mut transport = Self {
            url,
            socket,
            heartbeat,
            reconnect_delay: RECONNECT_DELAY,
            msg_ref: 0,
        };
        transport.join().await?;
        Ok(transport)
    }

    async fn open(url: &str) -> ClientResult<WsStream> {
        let (socket, _) = connect_async(url)
            .await
            .map_err(|e| ClientError::Realtime(format!("connect failed: {e}")))?;
        Ok(socket)
    }

    fn next_ref(&mut self) -> String {
        self.msg_ref += 1;
        self.msg_ref.to_string()
    }

    fn topic() -> String {
        format!("realtime:{SCHEMA}:{PRODUCTS_TABLE}")
    }

    fn join_frame(reference: String) -> Frame {
        Frame {
            topic: Self::topic(),
            event: "phx_join".into(),
            payload: json!({
                "config": {
                    "postgres_changes": [
                        {"event": "*", "schema": SCHEMA, "table": PRODUCTS_TABLE}
                    ]
                }
            }),
            reference: Some(reference),
        }
    }

    fn heartbeat_frame(reference: String) -> Frame {
        Frame {
            topic: "phoenix".into(),
            event: "heartbeat".into(),
            payload: json!({}),
            reference: Some(reference),
        }
    }

    async fn send_frame(&mut self, frame: Frame) -> ClientResult<()> {
        let text = serde_json::to_string(&frame)?;
        self.socket
            .send(Message::Text(text))
            .await
            .map_err(|e| ClientError::Realtime(format!("send failed: {e}")))
    }

    async fn join(&mut self) -> ClientResult<()> {
        let reference = self.next_ref();
        self.send_frame(Self::join_frame(reference)).await?;
        tracing::info!(topic = %Self::topic(), "realtime channel joined");
        Ok(())
    }

    /// Reopen the socket and resubscribe, retrying until it sticks.
    async fn resubscribe(&mut self) -> ClientResult<()> {
        loop {
            tokio::time::sleep(self.reconnect_delay).await;
            match Self::open(&self.url).await {
                Ok(socket) => {
                    self.socket = socket;
                    match self.join().await {
                        Ok(()) => return Ok(()),
                        Err(e) => tracing::warn!(error = %e, "realtime rejoin failed"),
                    }
                }
                Err(e) => tracing::warn!(error = %e, "realtime reconnect failed"),
            }
        }
    }
}

#[async_trait]
impl RealtimeTransport for WsTransport {
    async fn next_event(&mut self) -> ClientResult<Option<ChangeEvent>> {
        loop {
            tokio::select! {
                _ = self.heartbeat.tick() => {
                    let reference = self.next_ref();
                    if let Err(e) = self.send_frame(Self::heartbeat_frame(reference)).await {
                        tracing::warn!(error = %e, "realtime heartbeat failed, resubscribing");
                        self.resubscribe().await?;
                    }
                }
                msg = self.socket.next() => match msg {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(event) = decode_change(&text) {
                            return Ok(Some(event));
                        }
                        // phx_reply, presence and system frames carry no row change
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if let Err(e) = self.socket.send(Message::Pong(data)).await {
                            tracing::warn!(error = %e, "realtime pong failed, resubscribing");
                            self.resubscribe().await?;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::warn!("realtime connection lost, resubscribing");
                        self.resubscribe().await?;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "realtime read error, resubscribing");
                        self.resubscribe().await?;
                    }
                }
            }
        }
    }

    async fn close(&mut self) -> ClientResult<()> {
        self.socket
            .send(Message::Close(None))
            .await
            .map_err(|e| ClientError::Realtime(format!("close failed: {e}")))
    }
}

/// Decode a wire frame into a change event, `None` for any frame that is
/// not a row change on the joined channel.
fn decode_change(text: &str) -> Option<ChangeEvent> {
    let frame: Frame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::warn!(error = %e, "undecodable realtime frame");
            return None;
        }
    };
    if frame.event != "postgres_changes" {
        return None;
    }
    let data: ChangeData = match serde_json::from_value(frame.payload.get("data")?.clone()) {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!(error = %e, "undecodable change payload");
            return None;
        }
    };
    Some(ChangeEvent {
        kind: data.kind,
        schema: data.schema,
        table: data.table,
        old: data.old_record,
        new: data.record,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_frame_binds_to_product_changes() {
        let frame = WsTransport::join_frame("1".into());
        let text = serde_json::to_string(&frame).unwrap();
        assert!(text.contains(r#""topic":"realtime:public:products""#));
        assert!(text.contains(r#""event":"phx_join""#));
        assert!(text.contains(r#""table":"products""#));
    }

    #[test]
    fn change_frame_decodes_to_event() {
        let text = r#"{
            "topic": "realtime:public:products",
            "event": "postgres_changes",
            "payload": {
                "ids": [1],
                "data": {
                    "type": "UPDATE",
                    "schema": "public",
                    "table": "products",
                    "record": {"id": "p2", "name": "Rose"},
                    "old_record": {"id": "p2"}
                }
            },
            "ref": null
        }"#;
        let event = decode_change(text).expect("row change frame");
        assert_eq!(event.kind, ChangeKind::Update);
        assert!(event.is_for("public", "products"));
        assert_eq!(event.old_id().as_deref(), Some("p2"));
    }

    #[tokio::test]
    async fn dropped_connection_mid_session_resubscribes_and_keeps_events_flowing() {
        use tokio::net::TcpListener;
        use tokio_tungstenite::accept_async;

        let change_frame = serde_json::json!({
            "topic": "realtime:public:products",
            "event": "postgres_changes",
            "payload": {
                "data": {
                    "type": "UPDATE",
                    "schema": "public",
                    "table": "products",
                    "record": {"id": "p2", "name": "Rose"},
                    "old_record": {"id": "p2"}
                }
            },
            "ref": null
        })
        .to_string();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            // First connection: accept the join, then drop the socket so
            // the client's next heartbeat send (or read) hits a dead peer.
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(stream).await.unwrap();
            let _ = ws.next().await;
            drop(ws);

            // Second connection: accept the rejoin, then push a row change.
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(stream).await.unwrap();
            let _ = ws.next().await;
            ws.send(Message::Text(change_frame)).await.unwrap();
            while let Some(Ok(msg)) = ws.next().await {
                if matches!(msg, Message::Close(_)) {
                    break;
                }
            }
        });

        let url = format!("ws://{addr}");
        let socket = WsTransport::open(&url).await.unwrap();
        let mut heartbeat = tokio::time::interval(Duration::from_millis(5));
        heartbeat.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        let mut transport = WsTransport {
            url,
            socket,
            heartbeat,
            reconnect_delay: Duration::from_millis(10),
            msg_ref: 0,
        };
        transport.join().await.unwrap();

        let event = transport
            .next_event()
            .await
            .unwrap()
            .expect("row change after resubscribe");
        assert_eq!(event.kind, ChangeKind::Update);
        assert_eq!(event.old_id().as_deref(), Some("p2"));

        transport.close().await.ok();
        server.await.unwrap();
    }

    #[test]
    fn reply_and_system_frames_are_skipped() {
        let reply = r#"{"topic":"realtime:public:products","event":"phx_reply","payload":{"status":"ok"},"ref":"1"}"#;
        assert!(decode_change(reply).is_none());
        assert!(decode_change("not json").is_none());
    }
}
