//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread, time::Duration};

use client_core::{config::Settings, RatingClient, SubmitOutcome, SurveyEvent, SurveySession};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, error, info, warn};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

const RESYNC_RETRY: Duration = Duration::from_millis(25);

pub fn launch(settings: Settings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::BackendUnavailable(format!(
                    "failed to build backend runtime: {err}"
                )));
                error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(run_backend(settings, cmd_rx, ui_tx));
    });
}

async fn run_backend(settings: Settings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    let client = RatingClient::new(settings.endpoint);
    info!(endpoint = %client.endpoint(), "survey backend starting");
    let session = SurveySession::new(client, settings.confirmation_window);

    tokio::spawn(forward_session_events(
        Arc::clone(&session),
        session.subscribe_events(),
        ui_tx.clone(),
    ));
    spawn_refresh(&session);

    while let Ok(cmd) = cmd_rx.recv() {
        debug!(command = cmd.name(), "backend received command");
        match cmd {
            BackendCommand::SelectRating(rating) => session.select_rating(rating).await,
            BackendCommand::SubmitRating => {
                let session = Arc::clone(&session);
                tokio::spawn(async move {
                    match session.submit().await {
                        SubmitOutcome::Submitted(rating) => {
                            debug!(rating = rating.value(), "submission accepted")
                        }
                        SubmitOutcome::Failed(err) => {
                            debug!(error = %err, "submission failed; selection kept for retry")
                        }
                        SubmitOutcome::NothingSelected | SubmitOutcome::AlreadyInFlight => {}
                    }
                });
            }
            BackendCommand::RefreshAggregate => spawn_refresh(&session),
        }
    }

    info!("ui command channel closed; survey backend stopping");
}

fn spawn_refresh(session: &Arc<SurveySession>) {
    let session = Arc::clone(session);
    tokio::spawn(async move {
        let _ = session.refresh_aggregate().await;
    });
}

async fn forward_session_events(
    session: Arc<SurveySession>,
    mut events: broadcast::Receiver<SurveyEvent>,
    ui_tx: Sender<UiEvent>,
) {
    loop {
        let event = match events.recv().await {
            Ok(event) => UiEvent::Session(event),
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "ui event forwarder lagged; resending full snapshot");
                UiEvent::Snapshot(session.snapshot().await)
            }
            Err(RecvError::Closed) => break,
        };

        match ui_tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!("ui event queue is full; resending full snapshot once it drains");
                if !resync_when_drained(&session, &ui_tx).await {
                    break;
                }
            }
            Err(TrySendError::Disconnected(_)) => break,
        }
    }
}

/// Waits for room in the UI queue and sends the current snapshot.
/// Returns false once the UI side is gone.
async fn resync_when_drained(session: &SurveySession, ui_tx: &Sender<UiEvent>) -> bool {
    loop {
        match ui_tx.try_send(UiEvent::Snapshot(session.snapshot().await)) {
            Ok(()) => return true,
            Err(TrySendError::Full(_)) => tokio::time::sleep(RESYNC_RETRY).await,
            Err(TrySendError::Disconnected(_)) => return false,
        }
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
