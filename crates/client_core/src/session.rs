//! Session-scoped survey state and the submit/refresh workflow.

use std::{
    sync::{Arc, Weak},
    time::Duration,
};

use shared::domain::{Aggregate, Rating, SubmissionState};
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{error::SurveyError, RatingClient};

#[derive(Debug, Clone, PartialEq)]
pub enum SurveyEvent {
    SelectionChanged(Option<Rating>),
    AggregateUpdated(Aggregate),
    SubmissionChanged(SubmissionState),
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SessionSnapshot {
    pub selection: Option<Rating>,
    pub aggregate: Aggregate,
    pub submission: SubmissionState,
}

impl SessionSnapshot {
    pub fn can_submit(&self) -> bool {
        self.selection.is_some() && !self.submission.is_in_flight()
    }
}

#[derive(Debug)]
pub enum SubmitOutcome {
    Submitted(Rating),
    Failed(SurveyError),
    NothingSelected,
    AlreadyInFlight,
}

impl SubmitOutcome {
    /// True when a POST was actually issued.
    pub fn was_attempted(&self) -> bool {
        matches!(self, Self::Submitted(_) | Self::Failed(_))
    }
}

#[derive(Default)]
struct SessionState {
    selection: Option<Rating>,
    aggregate: Aggregate,
    submission: SubmissionState,
    dismiss_task: Option<JoinHandle<()>>,
}

impl SessionState {
    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            selection: self.selection,
            aggregate: self.aggregate,
            submission: self.submission,
        }
    }
}

pub struct SurveySession {
    client: RatingClient,
    confirmation_window: Duration,
    inner: Mutex<SessionState>,
    events: broadcast::Sender<SurveyEvent>,
}

impl SurveySession {
    pub fn new(client: RatingClient, confirmation_window: Duration) -> Arc<Self> {
        let (events, _) = broadcast::channel(64);
        Arc::new(Self {
            client,
            confirmation_window,
            inner: Mutex::new(SessionState::default()),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SurveyEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.inner.lock().await.snapshot()
    }

    pub async fn select_rating(&self, rating: Rating) {
        self.set_selection(Some(rating)).await;
    }

    pub async fn clear_selection(&self) {
        self.set_selection(None).await;
    }

    async fn set_selection(&self, selection: Option<Rating>) {
        let changed = {
            let mut guard = self.inner.lock().await;
            let changed = guard.selection != selection;
            guard.selection = selection;
            changed
        };
        if changed {
            self.emit(SurveyEvent::SelectionChanged(selection));
        }
    }

    /// Fetches the aggregate and replaces the displayed value.
    ///
    /// On failure the previous aggregate stays in place; the error is logged
    /// and handed back to the caller, who is free to ignore it.
    pub async fn refresh_aggregate(&self) -> Result<Aggregate, SurveyError> {
        match self.client.fetch_aggregate().await {
            Ok(aggregate) => {
                self.inner.lock().await.aggregate = aggregate;
                self.emit(SurveyEvent::AggregateUpdated(aggregate));
                Ok(aggregate)
            }
            Err(err) => {
                warn!(error = %err, "aggregate refresh failed; keeping previous value");
                Err(err)
            }
        }
    }

    /// Submits the pending selection.
    ///
    /// Without a selection, or with another submission still in flight, this
    /// returns immediately and sends nothing.
    pub async fn submit(self: &Arc<Self>) -> SubmitOutcome {
        let rating = {
            let mut guard = self.inner.lock().await;
            let Some(rating) = guard.selection else {
                debug!("submit ignored: no rating selected");
                return SubmitOutcome::NothingSelected;
            };
            if guard.submission.is_in_flight() {
                debug!("submit ignored: a submission is already in flight");
                return SubmitOutcome::AlreadyInFlight;
            }
            if let Some(task) = guard.dismiss_task.take() {
                task.abort();
            }
            guard.submission = SubmissionState::InFlight;
            rating
        };
        self.emit(SurveyEvent::SubmissionChanged(SubmissionState::InFlight));

        match self.client.submit_rating(rating).await {
            Ok(()) => {
                info!(rating = rating.value(), "rating submitted");
                self.complete_submission(rating).await;
                self.spawn_refresh();
                SubmitOutcome::Submitted(rating)
            }
            Err(err) => {
                warn!(error = %err, rating = rating.value(), "rating submission failed");
                self.inner.lock().await.submission = SubmissionState::Idle;
                self.emit(SurveyEvent::SubmissionChanged(SubmissionState::Idle));
                SubmitOutcome::Failed(err)
            }
        }
    }

    async fn complete_submission(self: &Arc<Self>, rating: Rating) {
        let completed = SubmissionState::JustCompleted { rating };
        let cleared = {
            let mut guard = self.inner.lock().await;
            guard.submission = completed;
            if let Some(previous) = guard.dismiss_task.replace(self.schedule_dismissal()) {
                previous.abort();
            }
            guard.selection.take().is_some()
        };
        self.emit(SurveyEvent::SubmissionChanged(completed));
        if cleared {
            self.emit(SurveyEvent::SelectionChanged(None));
        }
    }

    fn schedule_dismissal(self: &Arc<Self>) -> JoinHandle<()> {
        let session: Weak<Self> = Arc::downgrade(self);
        let window = self.confirmation_window;
        tokio::spawn(async move {
            tokio::time::sleep(window).await;
            let Some(session) = session.upgrade() else {
                return;
            };
            let dismissed = {
                let mut guard = session.inner.lock().await;
                guard.dismiss_task = None;
                if matches!(guard.submission, SubmissionState::JustCompleted { .. }) {
                    guard.submission = SubmissionState::Idle;
                    true
                } else {
                    false
                }
            };
            if dismissed {
                session.emit(SurveyEvent::SubmissionChanged(SubmissionState::Idle));
            }
        })
    }

    fn spawn_refresh(self: &Arc<Self>) {
        let session = Arc::clone(self);
        tokio::spawn(async move {
            let _ = session.refresh_aggregate().await;
        });
    }

    fn emit(&self, event: SurveyEvent) {
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
