use serde::{Deserialize, Serialize};

use crate::domain::Rating;

/// Body of `POST <endpoint>`; serializes to `{"rating":<1-5>}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRatingRequest {
    pub rating: Rating,
}

impl From<Rating> for SubmitRatingRequest {
    fn from(rating: Rating) -> Self {
        Self { rating }
    }
}
