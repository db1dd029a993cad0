//! Single-shot deferred actions driven by simulation time
//!
//! Round resets, match-end banners and the sacrifice timeout all wait a fixed
//! delay before acting. They count down with the frame `dt` so pausing the
//! simulation also freezes them, and dropping the task cancels it.

use serde::{Deserialize, Serialize};

/// An action that fires once after `remaining` seconds of simulation time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scheduled<A> {
    remaining: f32,
    action: A,
}

impl<A: Copy> Scheduled<A> {
    pub fn new(delay: f32, action: A) -> Self {
        Self {
            remaining: delay.max(0.0),
            action,
        }
    }

    /// Seconds left before the action fires
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn action(&self) -> A {
        self.action
    }

    /// Count down by `dt`. Returns the action once the delay has elapsed.
    pub fn advance(&mut self, dt: f32) -> Option<A> {
        self.remaining = (self.remaining - dt).max(0.0);
        (self.remaining <= 0.0).then_some(self.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_after_delay() {
        let mut task = Scheduled::new(0.9, 7u8);
        assert_eq!(task.advance(0.5), None);
        assert!((task.remaining() - 0.4).abs() < 1e-6);
        assert_eq!(task.advance(0.5), Some(7));
        assert_eq!(task.remaining(), 0.0);
    }

    #[test]
    fn test_zero_delay_fires_on_first_advance() {
        let mut task = Scheduled::new(-1.0, 'x');
        assert_eq!(task.remaining(), 0.0);
        assert_eq!(task.advance(0.0), Some('x'));
    }
}
