use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("rating {value} is outside 1..=5")]
pub struct InvalidRating {
    pub value: i64,
}

impl InvalidRating {
    pub fn new(value: impl Into<i64>) -> Self {
        Self {
            value: value.into(),
        }
    }
}
