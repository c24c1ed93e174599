//! Runtime bridge between UI command queue and the task controller.

use std::{sync::Arc, thread};

use client_core::{ControllerEvent, TaskController, UnreachableTaskApi};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use tokio::sync::broadcast::error::RecvError;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

pub fn launch(api_url: String, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                let _ = ui_tx.try_send(UiEvent::BackendUnavailable(format!(
                    "Backend worker failed to start: {err}"
                )));
                return;
            }
        };

        runtime.block_on(async move {
            let controller = match TaskController::connect(&api_url) {
                Ok(controller) => controller,
                Err(err) => {
                    tracing::error!(api_url = %api_url, "unusable task api url: {err:#}");
                    let _ = ui_tx.try_send(UiEvent::Info(format!(
                        "Task API URL '{api_url}' is not usable; requests will fail"
                    )));
                    TaskController::new(Arc::new(UnreachableTaskApi::new(err.to_string())))
                }
            };

            let mut events = controller.subscribe();
            let forward_tx = ui_tx.clone();
            tokio::spawn(async move {
                loop {
                    match events.recv().await {
                        Ok(ControllerEvent::StateChanged(state)) => {
                            forward_ui_event(&forward_tx, UiEvent::StateChanged(state));
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "ui forwarder lagged behind controller events");
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
            });

            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));
            tokio::spawn({
                let controller = controller.clone();
                async move { controller.initialize().await }
            });

            while let Ok(cmd) = cmd_rx.recv() {
                tracing::debug!(command = cmd.name(), "backend command received");
                if cmd.is_remote() {
                    let controller = controller.clone();
                    tokio::spawn(async move { run_command(&controller, cmd).await });
                } else {
                    run_command(&controller, cmd).await;
                }
            }
            tracing::info!("ui command queue closed; backend worker exiting");
        });
    });
}

async fn run_command(controller: &TaskController, cmd: BackendCommand) {
    match cmd {
        BackendCommand::Initialize => controller.initialize().await,
        BackendCommand::Submit { draft } => {
            let outcome = controller.submit(draft).await;
            tracing::debug!(?outcome, "submit finished");
        }
        BackendCommand::Toggle { task_id } => {
            let outcome = controller.toggle(&task_id).await;
            tracing::debug!(?outcome, task_id = %task_id, "toggle finished");
        }
        BackendCommand::Delete {
            task_id,
            confirmation,
        } => {
            let outcome = controller.delete(&task_id, confirmation).await;
            tracing::debug!(?outcome, task_id = %task_id, "delete finished");
        }
        BackendCommand::BeginEdit { task } => controller.begin_edit(&task).await,
        BackendCommand::CancelEdit => controller.cancel_edit().await,
        BackendCommand::UpdateDraft { draft } => controller.update_draft(draft).await,
        BackendCommand::DismissError => controller.dismiss_error().await,
    }
}

fn forward_ui_event(ui_tx: &Sender<UiEvent>, event: UiEvent) {
    match ui_tx.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(_)) => {
            tracing::warn!("ui event queue is full; dropping state snapshot");
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::debug!("ui event queue closed");
        }
    }
}
