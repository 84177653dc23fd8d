//! Folds backend events into the state the UI renders from.

use client_core::{SessionSnapshot, SurveyEvent};
use shared::domain::Rating;

use crate::controller::events::UiEvent;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurveyView {
    pub session: SessionSnapshot,
    /// Star under the pointer; only the UI knows about it.
    pub hover: Option<Rating>,
    pub status: String,
}

impl SurveyView {
    pub fn apply(&mut self, event: UiEvent) {
        match event {
            UiEvent::Session(SurveyEvent::SelectionChanged(selection)) => {
                self.session.selection = selection;
            }
            UiEvent::Session(SurveyEvent::AggregateUpdated(aggregate)) => {
                self.session.aggregate = aggregate;
            }
            UiEvent::Session(SurveyEvent::SubmissionChanged(submission)) => {
                self.session.submission = submission;
            }
            UiEvent::Snapshot(snapshot) => {
                self.session = snapshot;
            }
            UiEvent::BackendUnavailable(reason) => {
                self.status = format!("Survey backend unavailable: {reason}");
            }
        }
    }

    pub fn star_lit(&self, star: Rating) -> bool {
        self.hover
            .or(self.session.selection)
            .is_some_and(|highlighted| highlighted >= star)
    }

    pub fn submit_enabled(&self) -> bool {
        self.session.can_submit()
    }

    pub fn submit_label(&self) -> &'static str {
        self.session.submission.submit_label()
    }

    pub fn confirmation(&self) -> Option<Rating> {
        self.session.submission.confirmed_rating()
    }
}
