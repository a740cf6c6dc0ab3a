//! Outbound side of the live-update channel.

use std::{cell::RefCell, sync::Arc};

use thiserror::Error;

use crate::protocol::ClientRequest;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("live channel is closed")]
    Closed,
    #[error("live channel queue is full")]
    Full,
    #[error("failed to encode live message: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Fire-and-forget sender for live messages. Replies arrive separately as
/// [`crate::protocol::ServerMessage`]s.
pub trait LiveChannel {
    fn send(&self, request: ClientRequest) -> Result<(), ChannelError>;
}

impl<T: LiveChannel + ?Sized> LiveChannel for Arc<T> {
    fn send(&self, request: ClientRequest) -> Result<(), ChannelError> {
        (**self).send(request)
    }
}

impl<T: LiveChannel + ?Sized> LiveChannel for &T {
    fn send(&self, request: ClientRequest) -> Result<(), ChannelError> {
        (**self).send(request)
    }
}

/// Buffers requests in memory until they are drained.
#[derive(Debug, Default)]
pub struct Outbox {
    queued: RefCell<Vec<ClientRequest>>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<ClientRequest> {
        self.queued.take()
    }

    pub fn len(&self) -> usize {
        self.queued.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queued.borrow().is_empty()
    }
}

impl LiveChannel for Outbox {
    fn send(&self, request: ClientRequest) -> Result<(), ChannelError> {
        self.queued.borrow_mut().push(request);
        Ok(())
    }
}
