//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};
use shared::{
    channel::{ChannelError, LiveChannel},
    protocol::ClientRequest,
};

use crate::backend_bridge::commands::BackendCommand;

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) {
    let cmd_name = cmd.name();

    match cmd_tx.try_send(cmd) {
        Ok(()) => tracing::debug!(command = cmd_name, "queued ui->backend command"),
        Err(TrySendError::Full(_)) => {
            *status = "UI command queue is full; please retry".to_string();
        }
        Err(TrySendError::Disconnected(_)) => {
            *status =
                "Backend command processor disconnected (possible startup/runtime failure)"
                    .to_string();
        }
    }
}

/// Live channel as seen from the UI thread: requests are queued for the
/// backend worker, which owns the websocket.
#[derive(Clone)]
pub struct CommandQueueChannel {
    cmd_tx: Sender<BackendCommand>,
}

impl CommandQueueChannel {
    pub fn new(cmd_tx: Sender<BackendCommand>) -> Self {
        Self { cmd_tx }
    }
}

impl LiveChannel for CommandQueueChannel {
    fn send(&self, request: ClientRequest) -> Result<(), ChannelError> {
        let func = request.name();
        match self.cmd_tx.try_send(BackendCommand::Send { request }) {
            Ok(()) => {
                tracing::debug!(func, "queued live request");
                Ok(())
            }
            Err(TrySendError::Full(_)) => Err(ChannelError::Full),
            Err(TrySendError::Disconnected(_)) => Err(ChannelError::Closed),
        }
    }
}
