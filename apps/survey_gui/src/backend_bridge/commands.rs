//! Backend commands queued from UI to backend worker.

use shared::domain::Rating;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendCommand {
    SelectRating(Rating),
    SubmitRating,
    RefreshAggregate,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SelectRating(_) => "select_rating",
            Self::SubmitRating => "submit_rating",
            Self::RefreshAggregate => "refresh_aggregate",
        }
    }
}
