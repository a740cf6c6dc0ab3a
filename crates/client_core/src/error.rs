use thiserror::Error;
use tokio_tungstenite::tungstenite;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid live channel url '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("live channel url must use ws:// or wss://, got '{0}'")]
    UnsupportedScheme(String),
    #[error("failed to connect websocket: {url}: {source}")]
    Connect {
        url: String,
        source: tungstenite::Error,
    },
}
