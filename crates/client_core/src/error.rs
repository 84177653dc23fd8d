use thiserror::Error;

#[derive(Debug, Error)]
pub enum SurveyError {
    #[error("aggregate fetch failed: {0}")]
    Fetch(#[source] reqwest::Error),
    #[error("aggregate response is not valid JSON: {0}")]
    MalformedAggregate(#[source] serde_json::Error),
    #[error("rating submission failed: {0}")]
    Submit(#[source] reqwest::Error),
}

impl SurveyError {
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, Self::Fetch(_) | Self::MalformedAggregate(_))
    }

    pub fn is_submit_failure(&self) -> bool {
        matches!(self, Self::Submit(_))
    }
}
