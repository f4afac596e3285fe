//! Summary result type

/// Outcome of a get-or-compute summary request
///
/// Every variant except `NoReviews` carries the persisted summary; the
/// variant records how this caller obtained it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryResult {
    /// Already persisted in the review store
    Cached(String),
    /// This caller led the computation and persisted the value
    Generated(String),
    /// This caller waited on a computation led by another caller
    Joined(String),
    /// The product has no reviews, so there is nothing to summarize
    NoReviews,
}

impl SummaryResult {
    /// Check if served from the store without generation
    pub fn is_cached(&self) -> bool {
        matches!(self, SummaryResult::Cached(_))
    }

    /// Check if this caller ran the generation
    pub fn is_generated(&self) -> bool {
        matches!(self, SummaryResult::Generated(_))
    }

    /// Check if this caller joined another caller's computation
    pub fn is_joined(&self) -> bool {
        matches!(self, SummaryResult::Joined(_))
    }

    /// Check if the summary is absent
    pub fn is_absent(&self) -> bool {
        matches!(self, SummaryResult::NoReviews)
    }

    /// Borrow the summary text, if any
    pub fn summary(&self) -> Option<&str> {
        match self {
            SummaryResult::Cached(s) | SummaryResult::Generated(s) | SummaryResult::Joined(s) => {
                Some(s)
            }
            SummaryResult::NoReviews => None,
        }
    }

    /// Extract the summary text, consuming the result
    pub fn into_summary(self) -> Option<String> {
        match self {
            SummaryResult::Cached(s) | SummaryResult::Generated(s) | SummaryResult::Joined(s) => {
                Some(s)
            }
            SummaryResult::NoReviews => None,
        }
    }

    /// Re-label a leader's outcome as seen by a waiter
    pub fn joined(self) -> Self {
        match self {
            SummaryResult::Generated(s) => SummaryResult::Joined(s),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cached() {
        let result = SummaryResult::Cached("good".into());
        assert!(result.is_cached());
        assert!(!result.is_absent());
        assert_eq!(result.summary(), Some("good"));
    }

    #[test]
    fn test_no_reviews() {
        let result = SummaryResult::NoReviews;
        assert!(result.is_absent());
        assert_eq!(result.summary(), None);
        assert_eq!(result.into_summary(), None);
    }

    #[test]
    fn test_joined_relabel() {
        let joined = SummaryResult::Generated("x".into()).joined();
        assert!(joined.is_joined());
        assert_eq!(joined.into_summary().as_deref(), Some("x"));

        // Only a leader's fresh value is re-labelled
        assert!(SummaryResult::Cached("x".into()).joined().is_cached());
        assert!(SummaryResult::NoReviews.joined().is_absent());
    }
}
