use serde::{Deserialize, Serialize};

use crate::error::InvalidRating;

/// Highest rating a user can give, also the ceiling of the aggregate mean.
pub const MAX_RATING: u8 = 5;
pub const MIN_RATING: u8 = 1;

/// A whole-star rating in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const ALL: [Rating; 5] = [Rating(1), Rating(2), Rating(3), Rating(4), Rating(5)];

    pub fn new(value: u8) -> Result<Self, InvalidRating> {
        if (MIN_RATING..=MAX_RATING).contains(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidRating::new(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn confirmation_label(self) -> String {
        format!("You rated {}-star", self.0)
    }
}

impl TryFrom<u8> for Rating {
    type Error = InvalidRating;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Server-computed mean rating and vote count.
///
/// Always replaced wholesale; the client never adjusts it locally.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aggregate {
    mean: f64,
    count: u64,
}

impl Aggregate {
    /// Builds an aggregate, falling back to `0.00` for a mean outside `0..=5`.
    pub fn new(mean: f64, count: u64) -> Self {
        Self {
            mean: sanitize_mean(mean).unwrap_or_default(),
            count,
        }
    }

    /// Reads `rating` and `count` out of a decoded response body.
    ///
    /// Each field falls back to its default on its own, so a bad `rating`
    /// does not discard a good `count`.
    pub fn from_json(body: &serde_json::Value) -> Self {
        let mean = body
            .get("rating")
            .and_then(serde_json::Value::as_f64)
            .and_then(sanitize_mean)
            .unwrap_or_default();
        let count = body
            .get("count")
            .and_then(serde_json::Value::as_u64)
            .unwrap_or_default();
        Self { mean, count }
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Mean with two fraction digits, rounded once from the raw value.
    pub fn mean_label(&self) -> String {
        format!("{:.2}", self.mean)
    }

    pub fn score_line(&self) -> String {
        format!("{} / {MAX_RATING}.00", self.mean_label())
    }

    pub fn votes_line(&self) -> String {
        format!("Based on {} student votes", self.count)
    }

    /// Whether summary star `position` (1-based) is drawn filled.
    ///
    /// Compares against the displayed label so the stars never disagree
    /// with the number next to them.
    pub fn star_filled(&self, position: u8) -> bool {
        let shown: f64 = self.mean_label().parse().unwrap_or_default();
        shown >= f64::from(position)
    }
}

fn sanitize_mean(mean: f64) -> Option<f64> {
    (mean.is_finite() && (0.0..=f64::from(MAX_RATING)).contains(&mean)).then_some(mean)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    InFlight,
    /// Confirmation is visible for the rating that was just accepted.
    JustCompleted { rating: Rating },
}

impl SubmissionState {
    pub fn is_in_flight(self) -> bool {
        matches!(self, Self::InFlight)
    }

    pub fn confirmed_rating(self) -> Option<Rating> {
        match self {
            Self::JustCompleted { rating } => Some(rating),
            Self::Idle | Self::InFlight => None,
        }
    }

    pub fn submit_label(self) -> &'static str {
        if self.is_in_flight() {
            "Submitting..."
        } else {
            "Submit rating"
        }
    }
}
