//! Match state machine
//!
//! Owns lives, scores, the countdown, the scoring lock, the sacrifice
//! mechanic and the deferred round/match transitions. Everything that differs
//! between survival and timed-score matches lives in this module; the driver
//! only reports ball exits and advances time.

use serde::{Deserialize, Serialize};

use super::events::GameEvent;
use super::schedule::Scheduled;
use super::state::Side;
use crate::consts::*;
use crate::highscores::HighScore;

/// Match mode with its mode-specific parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Mode {
    /// First side to run out of lives loses
    Survival { lives: u8 },
    /// Highest score when the countdown (seconds) expires wins
    TimedScore { duration: f32 },
}

/// Match result from the human player's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
    Draw,
}

/// What the player gives up after losing a point in survival
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SacrificeChoice {
    /// Remove both player-side blocks for the rest of the match
    Blocks,
    /// Halve the player's paddle height for the rest of the match
    Paddle,
    /// Accept losing a life
    Life,
}

/// Lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Phase {
    /// Configured but not started (or reset back to setup)
    Idle,
    /// Normal play
    Rallying,
    /// A ball has exited; scoring is locked until the round is reset
    PointResolving { winner: Side },
    /// Terminal
    MatchOver { outcome: Outcome },
}

/// Deferred transitions owned by the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Deferred {
    /// Sacrifice offer expired without a choice
    AcceptLifeLoss,
    /// Unlock scoring and serve a new round
    ServeRound,
    /// Show the final result
    EndMatch,
}

/// Rally and speed statistics for the HUD
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    /// Seconds since the current round was served
    pub current_rally: f32,
    /// Longest rally this match (seconds)
    pub longest_rally: f32,
    /// Fastest ball speed recorded this match (rounded, pixels/s)
    pub fastest_ball: f32,
    /// Fastest ball currently in play (pixels/s)
    pub top_speed: f32,
}

impl Telemetry {
    pub fn start_rally(&mut self) {
        self.current_rally = 0.0;
    }

    /// Fold one frame into the statistics
    pub fn record_frame(&mut self, dt: f32, speeds: impl Iterator<Item = f32>) {
        self.current_rally += dt;
        if self.current_rally > self.longest_rally {
            self.longest_rally = self.current_rally;
        }
        self.top_speed = speeds.fold(0.0, f32::max);
        if self.top_speed > self.fastest_ball {
            self.fastest_ball = self.top_speed.round();
        }
    }
}

/// Complete match bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    pub mode: Mode,
    pub phase: Phase,
    /// Lives (survival)
    pub lives_player: u8,
    pub lives_cpu: u8,
    /// Points (timed-score)
    pub score_player: u32,
    pub score_cpu: u32,
    /// Countdown in seconds (timed-score)
    pub time_left: f32,
    /// Set from the moment a ball exits until the point is fully resolved
    pub scoring_locked: bool,
    pub sacrificed_blocks: bool,
    pub sacrificed_paddle: bool,
    /// Options currently on offer to the player
    pub sacrifice_offer: Option<Vec<SacrificeChoice>>,
    pub high_score: HighScore,
    pub telemetry: Telemetry,
    pending: Option<Scheduled<Deferred>>,
}

impl MatchState {
    /// Match waiting for `start`
    pub fn idle(mode: Mode, prior_high_score: u32) -> Self {
        let (lives, time_left) = match mode {
            Mode::Survival { lives } => (lives, 0.0),
            Mode::TimedScore { duration } => (0, duration),
        };
        Self {
            mode,
            phase: Phase::Idle,
            lives_player: lives,
            lives_cpu: lives,
            score_player: 0,
            score_cpu: 0,
            time_left,
            scoring_locked: false,
            sacrificed_blocks: false,
            sacrificed_paddle: false,
            sacrifice_offer: None,
            high_score: HighScore::new(prior_high_score),
            telemetry: Telemetry::default(),
            pending: None,
        }
    }

    /// Fresh match, already rallying
    pub fn start(mode: Mode, prior_high_score: u32) -> Self {
        let mut state = Self::idle(mode, prior_high_score);
        state.phase = Phase::Rallying;
        state
    }

    /// Rallying or resolving a point
    pub fn is_live(&self) -> bool {
        matches!(self.phase, Phase::Rallying | Phase::PointResolving { .. })
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::MatchOver { .. })
    }

    /// The deferred transition currently waiting, if any
    pub fn pending(&self) -> Option<&Scheduled<Deferred>> {
        self.pending.as_ref()
    }

    /// Seconds before an open sacrifice offer defaults to losing a life
    pub fn sacrifice_time_left(&self) -> Option<f32> {
        self.sacrifice_offer.as_ref()?;
        self.pending
            .filter(|t| t.action() == Deferred::AcceptLifeLoss)
            .map(|t| t.remaining())
    }

    /// A ball crossed `conceding`'s boundary.
    ///
    /// Returns false (and changes nothing) when scoring is already locked or
    /// the match is not live.
    pub fn on_exit(&mut self, conceding: Side, events: &mut Vec<GameEvent>) -> bool {
        if self.scoring_locked || !self.is_live() {
            return false;
        }
        self.scoring_locked = true;
        let winner = conceding.opposite();
        self.phase = Phase::PointResolving { winner };
        events.push(GameEvent::PointScored { winner });
        log::debug!("Point to {}", winner.as_str());

        match self.mode {
            Mode::TimedScore { .. } => {
                match winner {
                    Side::Player => self.score_player += 1,
                    Side::Cpu => self.score_cpu += 1,
                }
                self.schedule(ROUND_RESET_DELAY, Deferred::ServeRound);
            }
            Mode::Survival { .. } => match winner {
                Side::Player => self.commit_loss(Side::Cpu, SacrificeChoice::Life, events),
                Side::Cpu => {
                    if self.can_offer_sacrifice() {
                        self.offer_sacrifice(events);
                    } else {
                        self.commit_loss(Side::Player, SacrificeChoice::Life, events);
                    }
                }
            },
        }
        true
    }

    fn can_offer_sacrifice(&self) -> bool {
        self.lives_player > 1 && (!self.sacrificed_blocks || !self.sacrificed_paddle)
    }

    fn offer_sacrifice(&mut self, events: &mut Vec<GameEvent>) {
        let mut options = Vec::with_capacity(3);
        if !self.sacrificed_blocks {
            options.push(SacrificeChoice::Blocks);
        }
        if !self.sacrificed_paddle {
            options.push(SacrificeChoice::Paddle);
        }
        options.push(SacrificeChoice::Life);

        events.push(GameEvent::SacrificeOffered {
            options: options.clone(),
        });
        self.sacrifice_offer = Some(options);
        self.schedule(SACRIFICE_TIMEOUT, Deferred::AcceptLifeLoss);
    }

    /// Resolve an open sacrifice offer. Cancels the timeout.
    ///
    /// Returns false if no offer is open or `choice` is not among its options.
    pub fn choose_sacrifice(&mut self, choice: SacrificeChoice, events: &mut Vec<GameEvent>) -> bool {
        let available = self
            .sacrifice_offer
            .as_ref()
            .is_some_and(|options| options.contains(&choice));
        if !available {
            log::warn!("Sacrifice {:?} not available", choice);
            return false;
        }
        self.pending = None;
        self.sacrifice_offer = None;
        log::info!("Player sacrificed {:?}", choice);
        events.push(GameEvent::SacrificeMade { choice });
        self.commit_loss(Side::Player, choice, events);
        true
    }

    fn commit_loss(&mut self, side: Side, choice: SacrificeChoice, events: &mut Vec<GameEvent>) {
        match (side, choice) {
            (Side::Cpu, _) => {
                self.lives_cpu = self.lives_cpu.saturating_sub(1);
                events.push(GameEvent::LifeLost { side });
            }
            (Side::Player, SacrificeChoice::Life) => {
                self.lives_player = self.lives_player.saturating_sub(1);
                events.push(GameEvent::LifeLost { side });
            }
            (Side::Player, SacrificeChoice::Blocks) => self.sacrificed_blocks = true,
            (Side::Player, SacrificeChoice::Paddle) => self.sacrificed_paddle = true,
        }

        if self.lives_player == 0 || self.lives_cpu == 0 {
            self.schedule(MATCH_END_DELAY, Deferred::EndMatch);
        } else {
            self.schedule(ROUND_RESET_DELAY, Deferred::ServeRound);
        }
    }

    fn schedule(&mut self, delay: f32, action: Deferred) {
        self.pending = Some(Scheduled::new(delay, action));
    }

    /// Advance the countdown and deferred transitions by `dt`.
    ///
    /// Returns true when a new round must be served.
    pub fn advance(&mut self, dt: f32, events: &mut Vec<GameEvent>) -> bool {
        if !self.is_live() {
            return false;
        }

        if let Mode::TimedScore { .. } = self.mode {
            self.time_left = (self.time_left - dt).max(0.0);
            if self.time_left <= 0.0 {
                let outcome = self.timed_outcome();
                self.finish(outcome, events);
                return false;
            }
        }

        let Some(action) = self.pending.as_mut().and_then(|t| t.advance(dt)) else {
            return false;
        };
        self.pending = None;
        log::debug!("Deferred {:?} fired", action);

        match action {
            Deferred::AcceptLifeLoss => {
                self.sacrifice_offer = None;
                events.push(GameEvent::SacrificeMade {
                    choice: SacrificeChoice::Life,
                });
                self.commit_loss(Side::Player, SacrificeChoice::Life, events);
                false
            }
            Deferred::ServeRound => {
                self.scoring_locked = false;
                self.phase = Phase::Rallying;
                true
            }
            Deferred::EndMatch => {
                let outcome = self.survival_outcome();
                self.finish(outcome, events);
                false
            }
        }
    }

    fn survival_outcome(&self) -> Outcome {
        if self.lives_player > 0 {
            Outcome::Win
        } else {
            Outcome::Loss
        }
    }

    fn timed_outcome(&self) -> Outcome {
        match self.score_player.cmp(&self.score_cpu) {
            std::cmp::Ordering::Greater => Outcome::Win,
            std::cmp::Ordering::Less => Outcome::Loss,
            std::cmp::Ordering::Equal => Outcome::Draw,
        }
    }

    fn finish(&mut self, outcome: Outcome, events: &mut Vec<GameEvent>) {
        self.pending = None;
        self.sacrifice_offer = None;
        self.scoring_locked = false;
        self.phase = Phase::MatchOver { outcome };
        events.push(GameEvent::MatchEnded { outcome });

        match self.mode {
            Mode::TimedScore { .. } => {
                let score = self.score_player;
                let is_record = outcome == Outcome::Win && self.high_score.submit(score);
                events.push(GameEvent::HighScoreCandidate { score, is_record });
                log::info!(
                    "Match over: {:?} ({} - {}){}",
                    outcome,
                    self.score_player,
                    self.score_cpu,
                    if is_record { ", new high score" } else { "" }
                );
            }
            Mode::Survival { .. } => {
                log::info!(
                    "Match over: {:?} (lives {} - {})",
                    outcome,
                    self.lives_player,
                    self.lives_cpu
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn survival(lives: u8) -> MatchState {
        MatchState::start(Mode::Survival { lives }, 0)
    }

    /// Advance until the pending task fires (or nothing is pending)
    fn flush(state: &mut MatchState, events: &mut Vec<GameEvent>) -> bool {
        let mut served = false;
        for _ in 0..1000 {
            if state.pending().is_none() {
                break;
            }
            served |= state.advance(0.05, events);
        }
        served
    }

    #[test]
    fn test_exit_locks_scoring_once() {
        let mut state = survival(3);
        let mut events = Vec::new();
        assert!(state.on_exit(Side::Cpu, &mut events));
        assert!(state.scoring_locked);
        assert!(!state.on_exit(Side::Cpu, &mut events));
        assert!(!state.on_exit(Side::Player, &mut events));

        let points = events
            .iter()
            .filter(|e| matches!(e, GameEvent::PointScored { .. }))
            .count();
        assert_eq!(points, 1);
        assert_eq!(state.lives_cpu, 2);
    }

    #[test]
    fn test_round_reset_unlocks_after_delay() {
        let mut state = survival(3);
        let mut events = Vec::new();
        state.on_exit(Side::Cpu, &mut events);

        assert!(!state.advance(0.5, &mut events));
        assert!(state.scoring_locked);
        assert!(state.advance(0.5, &mut events));
        assert!(!state.scoring_locked);
        assert_eq!(state.phase, Phase::Rallying);
    }

    #[test]
    fn test_player_loss_offers_sacrifice() {
        let mut state = survival(3);
        let mut events = Vec::new();
        state.on_exit(Side::Player, &mut events);

        assert_eq!(
            state.sacrifice_offer,
            Some(vec![
                SacrificeChoice::Blocks,
                SacrificeChoice::Paddle,
                SacrificeChoice::Life
            ])
        );
        assert_eq!(state.lives_player, 3);
        assert_eq!(state.sacrifice_time_left(), Some(SACRIFICE_TIMEOUT));
    }

    #[test]
    fn test_sacrifice_timeout_costs_a_life() {
        let mut state = survival(3);
        let mut events = Vec::new();
        state.on_exit(Side::Player, &mut events);

        // Still open just before the timeout
        assert!(!state.advance(3.4, &mut events));
        assert!(state.sacrifice_offer.is_some());

        state.advance(0.2, &mut events);
        assert!(state.sacrifice_offer.is_none());
        assert_eq!(state.lives_player, 2);
        assert!(events.contains(&GameEvent::SacrificeMade {
            choice: SacrificeChoice::Life
        }));
        assert!(state.scoring_locked);
        assert!(flush(&mut state, &mut events));
        assert!(!state.scoring_locked);
    }

    #[test]
    fn test_choice_cancels_timeout() {
        let mut state = survival(3);
        let mut events = Vec::new();
        state.on_exit(Side::Player, &mut events);

        assert!(state.choose_sacrifice(SacrificeChoice::Blocks, &mut events));
        assert!(state.sacrificed_blocks);
        assert_eq!(state.pending().map(|t| t.action()), Some(Deferred::ServeRound));

        // Well past the old timeout: no life is lost
        flush(&mut state, &mut events);
        state.advance(5.0, &mut events);
        assert_eq!(state.lives_player, 3);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::LifeLost { .. })));
    }

    #[test]
    fn test_unavailable_choice_rejected() {
        let mut state = survival(3);
        let mut events = Vec::new();
        // No offer open
        assert!(!state.choose_sacrifice(SacrificeChoice::Paddle, &mut events));

        state.on_exit(Side::Player, &mut events);
        assert!(state.choose_sacrifice(SacrificeChoice::Paddle, &mut events));
        flush(&mut state, &mut events);

        state.on_exit(Side::Player, &mut events);
        assert_eq!(
            state.sacrifice_offer,
            Some(vec![SacrificeChoice::Blocks, SacrificeChoice::Life])
        );
        assert!(!state.choose_sacrifice(SacrificeChoice::Paddle, &mut events));
        assert!(state.sacrifice_offer.is_some());
    }

    #[test]
    fn test_no_offer_once_both_sacrifices_used() {
        let mut state = survival(3);
        let mut events = Vec::new();
        for choice in [SacrificeChoice::Blocks, SacrificeChoice::Paddle] {
            state.on_exit(Side::Player, &mut events);
            assert!(state.choose_sacrifice(choice, &mut events));
            flush(&mut state, &mut events);
        }

        events.clear();
        state.on_exit(Side::Player, &mut events);
        assert!(state.sacrifice_offer.is_none());
        assert_eq!(state.lives_player, 2);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::SacrificeOffered { .. })));
    }

    #[test]
    fn test_no_offer_on_last_life() {
        let mut state = survival(1);
        let mut events = Vec::new();
        state.on_exit(Side::Player, &mut events);
        assert!(state.sacrifice_offer.is_none());
        assert_eq!(state.lives_player, 0);
        flush(&mut state, &mut events);
        assert_eq!(state.phase, Phase::MatchOver { outcome: Outcome::Loss });
    }

    #[test]
    fn test_cpu_elimination_is_a_win() {
        let mut state = survival(2);
        let mut events = Vec::new();
        for _ in 0..2 {
            state.on_exit(Side::Cpu, &mut events);
            flush(&mut state, &mut events);
        }
        assert_eq!(state.phase, Phase::MatchOver { outcome: Outcome::Win });
        assert!(events.contains(&GameEvent::MatchEnded {
            outcome: Outcome::Win
        }));
        // Terminal: nothing else happens
        assert!(!state.on_exit(Side::Player, &mut events));
        assert!(!state.advance(10.0, &mut events));
    }

    #[test]
    fn test_timed_scoring_and_draw() {
        let mut state = MatchState::start(Mode::TimedScore { duration: 10.0 }, 0);
        let mut events = Vec::new();
        state.on_exit(Side::Cpu, &mut events);
        flush(&mut state, &mut events);
        state.on_exit(Side::Player, &mut events);
        flush(&mut state, &mut events);
        assert_eq!((state.score_player, state.score_cpu), (1, 1));
        assert!(state.sacrifice_offer.is_none());

        while state.is_live() {
            state.advance(0.25, &mut events);
        }
        assert_eq!(state.phase, Phase::MatchOver { outcome: Outcome::Draw });
        assert!(events.contains(&GameEvent::HighScoreCandidate {
            score: 1,
            is_record: false
        }));
    }

    #[test]
    fn test_timed_expiry_cancels_pending_reset() {
        let mut state = MatchState::start(Mode::TimedScore { duration: 0.5 }, 3);
        let mut events = Vec::new();
        state.on_exit(Side::Cpu, &mut events);
        assert!(state.pending().is_some());

        assert!(!state.advance(0.6, &mut events));
        assert_eq!(state.phase, Phase::MatchOver { outcome: Outcome::Win });
        assert!(state.pending().is_none());
        assert!(!state.scoring_locked);
        // 1 point does not beat the prior best of 3
        assert!(events.contains(&GameEvent::HighScoreCandidate {
            score: 1,
            is_record: false
        }));
    }

    #[test]
    fn test_telemetry() {
        let mut t = Telemetry::default();
        t.record_frame(0.5, [100.0, 250.4].into_iter());
        t.record_frame(0.5, [120.0].into_iter());
        assert_eq!(t.current_rally, 1.0);
        assert_eq!(t.longest_rally, 1.0);
        assert_eq!(t.fastest_ball, 250.0);
        assert_eq!(t.top_speed, 120.0);

        t.start_rally();
        t.record_frame(0.25, std::iter::empty());
        assert_eq!(t.longest_rally, 1.0);
        assert_eq!(t.top_speed, 0.0);
    }
}
