//! Backend commands queued from UI to backend worker.

use shared::protocol::ClientRequest;

pub enum BackendCommand {
    Connect { server_url: String },
    Send { request: ClientRequest },
    Disconnect,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Connect { .. } => "connect",
            BackendCommand::Send { request } => request.name(),
            BackendCommand::Disconnect => "disconnect",
        }
    }
}
