//! Product review

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Result, SummaryError};

/// A single product review
///
/// Immutable once stored; the review store owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: u64,
    pub author: String,
    pub content: String,
    /// Star rating, 1 through 5
    pub rating: u8,
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub const MIN_RATING: u8 = 1;
    pub const MAX_RATING: u8 = 5;

    /// Create a review, rejecting ratings outside 1..=5
    pub fn new(
        id: u64,
        author: impl Into<String>,
        content: impl Into<String>,
        rating: u8,
        created_at: DateTime<Utc>,
    ) -> Result<Self> {
        let review = Self {
            id,
            author: author.into(),
            content: content.into(),
            rating,
            created_at,
        };
        review.validate()?;
        Ok(review)
    }

    /// Check invariants on a review that did not come through `new`
    /// (e.g. one decoded from storage)
    pub fn validate(&self) -> Result<()> {
        if !(Self::MIN_RATING..=Self::MAX_RATING).contains(&self.rating) {
            return Err(SummaryError::InvalidReview(format!(
                "rating {} for review {} is outside {}..={}",
                self.rating,
                self.id,
                Self::MIN_RATING,
                Self::MAX_RATING
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_rating_bounds() {
        assert!(Review::new(1, "ann", "great", 1, at(0)).is_ok());
        assert!(Review::new(2, "bob", "fine", 5, at(0)).is_ok());

        let err = Review::new(3, "cy", "meh", 0, at(0)).unwrap_err();
        assert!(matches!(err, SummaryError::InvalidReview(_)));
        assert!(Review::new(4, "di", "wow", 6, at(0)).is_err());
    }

    #[test]
    fn test_json_shape() {
        let review = Review::new(9, "ann", "solid", 4, at(1_700_000_000)).unwrap();
        let json = serde_json::to_value(&review).unwrap();

        assert_eq!(json["author"], "ann");
        assert_eq!(json["rating"], 4);
        assert_eq!(json["createdAt"], "2023-11-14T22:13:20Z");
    }
}
