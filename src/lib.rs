//! Optimus Pong - a block-guarded Pong duel against a CPU opponent
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (kinematics, collisions, match rules, CPU)
//! - `config`: Pre-match configuration with validated setters
//! - `highscores`: Best-score record for timed-score matches
//! - `audio`: Sound cue table derived from the simulation event feed

pub mod audio;
pub mod config;
pub mod highscores;
pub mod sim;

pub use config::{Difficulty, MatchConfig, ModeKind, Theme};
pub use highscores::HighScore;

/// Game configuration constants
pub mod consts {
    /// Court dimensions
    pub const COURT_WIDTH: f32 = 700.0;
    pub const COURT_HEIGHT: f32 = 400.0;

    /// Paddle defaults - each paddle is pinned flush to its side of the court
    pub const PADDLE_WIDTH: f32 = 10.0;
    pub const PADDLE_BASE_HEIGHT: f32 = 70.0;
    pub const PADDLE_HEIGHT_MULT: f32 = 1.5;
    /// Human paddle speed for held move intents (pixels/s)
    pub const PLAYER_PADDLE_SPEED: f32 = 320.0;

    /// Paddle vertical speed above which a player hit becomes a power hit
    pub const POWER_HIT_THRESHOLD: f32 = 300.0;
    pub const PLAYER_POWER_MULT: f32 = 1.4;
    /// CPU power hits are random and weaker
    pub const CPU_POWER_CHANCE: f64 = 0.08;
    pub const CPU_POWER_MULT: f32 = 1.15;
    /// Vertical velocity added per unit of normalized hit offset (times |vx|)
    pub const HIT_OFFSET_VY: f32 = 0.25;
    /// Spin added per unit of normalized hit offset
    pub const HIT_OFFSET_SPIN: f32 = 0.05;
    /// Gap left between a bounced ball and the surface it bounced off
    pub const SEPARATION: f32 = 0.5;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 7.0;
    /// Per-1/60s spin damping factor
    pub const SPIN_DAMPING: f32 = 0.9;
    /// Trail window for rendering (seconds)
    pub const TRAIL_WINDOW: f32 = 0.2;
    /// Random spread added to the serve speed (+/-)
    pub const SERVE_SPEED_JITTER: f32 = 15.0;
    /// Max serve vy as a fraction of base speed
    pub const SERVE_ANGLE_FACTOR: f32 = 0.2;
    /// Vertical spacing between multi-ball serves
    pub const MULTI_BALL_SPACING: f32 = 50.0;
    pub const MULTI_BALL_COUNT: usize = 3;

    /// Block defaults
    pub const BLOCK_WIDTH: f32 = 10.0;
    pub const BLOCK_HEIGHT: f32 = 50.0;
    /// Distance between a paddle face and its blocks
    pub const BLOCK_OFFSET: f32 = 80.0;
    /// Distance between a block and the nearest top/bottom wall
    pub const BLOCK_EDGE_GAP: f32 = 60.0;

    /// CPU tracking gain (multiplied by agility and dt)
    pub const CPU_TRACKING_GAIN: f32 = 6.0;

    /// Deferred action delays (seconds)
    pub const ROUND_RESET_DELAY: f32 = 0.9;
    pub const MATCH_END_DELAY: f32 = 1.1;
    pub const SACRIFICE_TIMEOUT: f32 = 3.5;

    /// Display name of the CPU opponent
    pub const CPU_NAME: &str = "Optimus";
}

/// Clamp a paddle top so the whole paddle stays inside the court
#[inline]
pub fn clamp_paddle_top(y: f32, height: f32, court_height: f32) -> f32 {
    y.clamp(0.0, (court_height - height).max(0.0))
}
