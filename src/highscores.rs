//! Best timed-score record
//!
//! The simulation never touches storage. A persistence collaborator reads the
//! stored value before a match (`MatchConfig::prior_high_score`) and writes it
//! back when a `HighScoreCandidate` event reports a record.

use serde::{Deserialize, Serialize};

/// Best player score achieved in a timed-score match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HighScore {
    pub best: u32,
}

impl HighScore {
    /// Storage key the browser build persists the best score under
    pub const STORAGE_KEY: &'static str = "pongHighScore";

    pub fn new(best: u32) -> Self {
        Self { best }
    }

    /// Check if a score beats the current record
    pub fn qualifies(&self, score: u32) -> bool {
        score > self.best
    }

    /// Record `score` if it qualifies. Returns true on a new record.
    pub fn submit(&mut self, score: u32) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        log::info!("New high score: {} (was {})", score, self.best);
        self.best = score;
        true
    }

    /// Parse a stored value; anything unreadable counts as no record
    pub fn from_storage_value(value: &str) -> Self {
        Self::new(value.trim().parse().unwrap_or(0))
    }

    pub fn to_storage_value(&self) -> String {
        self.best.to_string()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_strictly_higher_scores_qualify() {
        let mut record = HighScore::new(5);
        assert!(!record.qualifies(5));
        assert!(!record.submit(4));
        assert_eq!(record.best, 5);
        assert!(record.submit(6));
        assert_eq!(record.best, 6);
    }

    #[test]
    fn test_zero_never_a_record() {
        let mut record = HighScore::default();
        assert!(!record.submit(0));
        assert!(record.submit(1));
    }

    #[test]
    fn test_storage_value() {
        assert_eq!(HighScore::from_storage_value(" 17\n").best, 17);
        assert_eq!(HighScore::from_storage_value("garbage").best, 0);
        assert_eq!(HighScore::from_storage_value("").best, 0);
        assert_eq!(HighScore::new(9).to_storage_value(), "9");
    }

    #[test]
    fn test_json() {
        let json = HighScore::new(21).to_json().unwrap();
        assert_eq!(json, r#"{"best":21}"#);
        assert_eq!(HighScore::from_json(&json).unwrap(), HighScore::new(21));
        assert!(HighScore::from_json("[1]").is_err());
    }
}
