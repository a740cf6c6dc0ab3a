//! Websocket client for the market page's live channel.

use std::sync::{Arc, Mutex, PoisonError};

use futures::{SinkExt, StreamExt};
use shared::{
    channel::{ChannelError, LiveChannel},
    protocol::{ClientRequest, ServerMessage},
};
use tokio::{
    sync::{broadcast, mpsc},
    task::JoinHandle,
};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};
use url::Url;

pub mod error;

pub use error::ClientError;

#[derive(Debug, Clone)]
pub enum ClientEvent {
    Server(ServerMessage),
    Error(String),
    Disconnected,
}

pub struct LiveClient {
    url: Url,
    outbound: Mutex<Option<mpsc::UnboundedSender<String>>>,
    writer: tokio::sync::Mutex<Option<JoinHandle<()>>>,
    events: broadcast::Sender<ClientEvent>,
}

/// Accepts `ws(s)://` urls as-is and maps `http(s)://` page urls onto the
/// matching websocket scheme.
pub fn live_url(raw: &str) -> Result<Url, ClientError> {
    let mut url = Url::parse(raw).map_err(|source| ClientError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;
    let scheme = match url.scheme() {
        "ws" | "wss" => return Ok(url),
        "http" => "ws",
        "https" => "wss",
        other => return Err(ClientError::UnsupportedScheme(other.to_string())),
    };
    url.set_scheme(scheme)
        .map_err(|()| ClientError::UnsupportedScheme(url.scheme().to_string()))?;
    Ok(url)
}

impl LiveClient {
    /// Opens the live channel and starts the reader and writer tasks. The
    /// returned receiver is subscribed before the reader starts, so no early
    /// server message is missed.
    pub async fn connect(
        server_url: &str,
    ) -> Result<(Arc<Self>, broadcast::Receiver<ClientEvent>), ClientError> {
        let url = live_url(server_url)?;
        let (ws_stream, _) =
            connect_async(url.as_str())
                .await
                .map_err(|source| ClientError::Connect {
                    url: url.to_string(),
                    source,
                })?;
        info!(url = %url, "live channel connected");
        let (mut ws_writer, mut ws_reader) = ws_stream.split();

        let (events, receiver) = broadcast::channel(1024);
        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<String>();

        let writer_events = events.clone();
        let writer = tokio::spawn(async move {
            while let Some(text) = outbound_rx.recv().await {
                if let Err(err) = ws_writer.send(Message::Text(text)).await {
                    let _ = writer_events.send(ClientEvent::Error(format!(
                        "websocket send failed: {err}"
                    )));
                    break;
                }
            }
            let _ = ws_writer.close().await;
        });

        let reader_events = events.clone();
        tokio::spawn(async move {
            while let Some(msg) = ws_reader.next().await {
                match msg {
                    Ok(Message::Text(text)) => match ServerMessage::from_json(&text) {
                        Ok(message) => {
                            debug!(event = ?message.event, "live message received");
                            let _ = reader_events.send(ClientEvent::Server(message));
                        }
                        Err(err) => {
                            let _ = reader_events
                                .send(ClientEvent::Error(format!("invalid server event: {err}")));
                        }
                    },
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(err) => {
                        let _ = reader_events.send(ClientEvent::Error(format!(
                            "websocket receive failed: {err}"
                        )));
                        break;
                    }
                }
            }
            info!("live channel closed");
            let _ = reader_events.send(ClientEvent::Disconnected);
        });

        let client = Arc::new(Self {
            url,
            outbound: Mutex::new(Some(outbound_tx)),
            writer: tokio::sync::Mutex::new(Some(writer)),
            events,
        });
        Ok((client, receiver))
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    pub fn is_open(&self) -> bool {
        self.outbound
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|tx| !tx.is_closed())
    }

    /// Flushes queued requests and closes the websocket. Later sends fail
    /// with [`ChannelError::Closed`].
    pub async fn close(&self) {
        self.outbound
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(writer) = self.writer.lock().await.take() {
            if let Err(err) = writer.await {
                warn!(error = %err, "live channel writer task failed");
            }
        }
    }
}

impl LiveChannel for LiveClient {
    fn send(&self, request: ClientRequest) -> Result<(), ChannelError> {
        let text = serde_json::to_string(&request)?;
        let guard = self
            .outbound
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let tx = guard.as_ref().ok_or(ChannelError::Closed)?;
        tx.send(text).map_err(|_| ChannelError::Closed)?;
        debug!(func = request.name(), "live request queued");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
