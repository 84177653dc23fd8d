use reqwest::Client;
use shared::{domain::Aggregate, domain::Rating, protocol::SubmitRatingRequest};
use tracing::debug;
use url::Url;

pub mod config;
pub mod error;
mod session;

pub use error::SurveyError;
pub use session::{SessionSnapshot, SubmitOutcome, SurveyEvent, SurveySession};

/// HTTP access to the rating endpoint. One URL serves both reads and writes.
#[derive(Debug, Clone)]
pub struct RatingClient {
    http: Client,
    endpoint: Url,
}

impl RatingClient {
    pub fn new(endpoint: Url) -> Self {
        Self {
            http: Client::new(),
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Reads the current aggregate. Any JSON body counts, whatever the status.
    pub async fn fetch_aggregate(&self) -> Result<Aggregate, SurveyError> {
        let body = self
            .http
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(SurveyError::Fetch)?
            .bytes()
            .await
            .map_err(SurveyError::Fetch)?;

        let value: serde_json::Value =
            serde_json::from_slice(&body).map_err(SurveyError::MalformedAggregate)?;
        let aggregate = Aggregate::from_json(&value);
        debug!(
            endpoint = %self.endpoint,
            mean = aggregate.mean(),
            count = aggregate.count(),
            "fetched aggregate"
        );
        Ok(aggregate)
    }

    /// Posts `{"rating": n}`. Only transport errors fail; the response
    /// status and body are not inspected.
    pub async fn submit_rating(&self, rating: Rating) -> Result<(), SurveyError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&SubmitRatingRequest::from(rating))
            .send()
            .await
            .map_err(SurveyError::Submit)?;
        debug!(status = %response.status(), rating = rating.value(), "rating posted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
