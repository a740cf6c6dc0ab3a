//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{ClientEvent, LiveClient};
use crossbeam_channel::{Receiver, Sender};
use shared::{channel::LiveChannel, protocol::ClientRequest};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let mut client: Option<Arc<LiveClient>> = None;
            let mut event_task: Option<tokio::task::JoinHandle<()>> = None;

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::Connect { server_url } => {
                        if let Some(task) = event_task.take() {
                            task.abort();
                        }
                        if let Some(previous) = client.take() {
                            previous.close().await;
                        }

                        let (connected, mut events) = match LiveClient::connect(&server_url).await
                        {
                            Ok(connected) => connected,
                            Err(err) => {
                                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                                    UiErrorContext::Connect,
                                    err.to_string(),
                                )));
                                continue;
                            }
                        };

                        let ui_tx_clone = ui_tx.clone();
                        event_task = Some(tokio::spawn(async move {
                            while let Ok(event) = events.recv().await {
                                let evt = match event {
                                    ClientEvent::Server(message) => UiEvent::Server(message),
                                    ClientEvent::Error(err) => UiEvent::Error(
                                        UiError::from_message(UiErrorContext::General, err),
                                    ),
                                    ClientEvent::Disconnected => UiEvent::Disconnected,
                                };
                                if ui_tx_clone.send(evt).is_err() {
                                    break;
                                }
                            }
                        }));

                        let _ = ui_tx.try_send(UiEvent::Connected {
                            url: connected.url().to_string(),
                        });
                        client = Some(connected);
                    }
                    BackendCommand::Send { request } => {
                        let Some(active) = client.as_ref() else {
                            report_send_failure(&ui_tx, request, "live channel is not connected");
                            continue;
                        };
                        if let Err(err) = active.send(request.clone()) {
                            report_send_failure(&ui_tx, request, err.to_string());
                        }
                    }
                    BackendCommand::Disconnect => {
                        if let Some(active) = client.take() {
                            active.close().await;
                        }
                    }
                }
            }

            if let Some(active) = client.take() {
                active.close().await;
            }
        });
    });
}

/// Hands an unsent request back to the UI so it can undo what it assumed.
fn report_send_failure(
    ui_tx: &Sender<UiEvent>,
    request: ClientRequest,
    message: impl Into<String>,
) {
    tracing::warn!(request = request.name(), "request was not sent");
    let error = UiError::from_message(UiErrorContext::SubmitOrder, message);
    let _ = ui_tx.send(UiEvent::SendFailed { request, error });
}
