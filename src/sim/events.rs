//! Discrete events emitted by the simulation for audio, particles and banners

use serde::{Deserialize, Serialize};

use super::rules::{Outcome, SacrificeChoice};
use super::state::Side;

/// Something the presentation layer may want to react to.
///
/// Events accumulate during `update` and are drained by the presentation
/// layer between frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Ball bounced off the top or bottom wall
    WallHit,
    /// Ball bounced off a paddle; `power` marks a boosted return
    PaddleHit { side: Side, power: bool },
    /// Ball bounced off one of the side's blocks
    BlockHit { side: Side },
    /// A ball left the court; the winner takes the point
    PointScored { winner: Side },
    /// A side lost a life (survival)
    LifeLost { side: Side },
    /// The player may trade blocks or paddle length instead of a life
    SacrificeOffered { options: Vec<SacrificeChoice> },
    /// The player's sacrifice choice (or the timeout default) was applied
    SacrificeMade { choice: SacrificeChoice },
    /// New ball(s) served
    RoundServed { balls: usize },
    /// Terminal outcome, from the player's point of view
    MatchEnded { outcome: Outcome },
    /// Timed-score result for the persistence collaborator
    HighScoreCandidate { score: u32, is_record: bool },
}
