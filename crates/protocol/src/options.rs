use crate::error::{ProtocolError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MATCH_COUNT: usize = 12;
pub const DEFAULT_MATCH_THRESHOLD: f32 = 0.0;

/// Limits applied to a single retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetrieveOptions {
    /// Maximum number of semantic hits.
    pub match_count: usize,
    /// Minimum cosine similarity for a semantic hit, in `[-1, 1]`.
    pub match_threshold: f32,
    /// Fail the query when an explicit `[name]` reference cannot be resolved.
    pub strict: bool,
}

impl Default for RetrieveOptions {
    fn default() -> Self {
        Self {
            match_count: DEFAULT_MATCH_COUNT,
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            strict: false,
        }
    }
}

impl RetrieveOptions {
    #[must_use]
    pub const fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    #[must_use]
    pub const fn match_count(mut self, count: usize) -> Self {
        self.match_count = count;
        self
    }

    #[must_use]
    pub const fn match_threshold(mut self, threshold: f32) -> Self {
        self.match_threshold = threshold;
        self
    }

    /// Rejects a threshold that is not a finite number in `[-1, 1]`.
    pub fn validate(&self) -> Result<()> {
        if !self.match_threshold.is_finite() || !(-1.0..=1.0).contains(&self.match_threshold) {
            return Err(ProtocolError::InvalidOptions(format!(
                "match_threshold must be within [-1, 1], got {}",
                self.match_threshold
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let opts: RetrieveOptions = serde_json::from_str(r#"{"strict": true}"#).unwrap();
        assert_eq!(opts.match_count, DEFAULT_MATCH_COUNT);
        assert!(opts.match_threshold.abs() < f32::EPSILON);
        assert!(opts.strict);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = serde_json::from_str::<RetrieveOptions>(r#"{"limit": 3}"#);
        assert!(err.is_err());
    }

    #[test]
    fn threshold_must_be_a_cosine() {
        assert!(RetrieveOptions::default().validate().is_ok());
        assert!(RetrieveOptions::default().match_threshold(-1.0).validate().is_ok());
        assert!(RetrieveOptions::default().match_threshold(1.0).validate().is_ok());
        assert!(RetrieveOptions::default().match_threshold(1.5).validate().is_err());
        assert!(RetrieveOptions::default().match_threshold(-2.0).validate().is_err());
        assert!(RetrieveOptions::default()
            .match_threshold(f32::NAN)
            .validate()
            .is_err());
    }
}
