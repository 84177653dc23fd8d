//! Backend-to-UI events.

use client_core::{SessionSnapshot, SurveyEvent};

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Session(SurveyEvent),
    /// Full state, sent when incremental events were lost.
    Snapshot(SessionSnapshot),
    BackendUnavailable(String),
}
