//! Pre-match configuration
//!
//! Built up by the setup screens and consumed once per match by
//! [`Simulation::start_match`](crate::sim::Simulation::start_match). Every
//! setter validates its input and falls back to a documented default.

use serde::{Deserialize, Serialize};

use crate::sim::Mode;

/// Default number of lives per side in survival matches
pub const DEFAULT_LIVES: u8 = 3;
/// Accepted lives range
pub const MIN_LIVES: u8 = 1;
pub const MAX_LIVES: u8 = 10;

/// Default timed-score match duration (seconds)
pub const DEFAULT_MATCH_DURATION: u32 = 60;
/// Accepted duration range (seconds)
pub const MIN_MATCH_DURATION: u32 = 10;
pub const MAX_MATCH_DURATION: u32 = 600;

pub const DEFAULT_PLAYER_NAME: &str = "Player";

/// Difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "medium" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Base serve speed (pixels/s)
    pub fn ball_base_speed(&self) -> f32 {
        match self {
            Difficulty::Easy => 180.0,
            Difficulty::Normal => 260.0,
            Difficulty::Hard => 340.0,
        }
    }

    /// CPU tracking agility in (0, 1]
    pub fn cpu_agility(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.45,
            Difficulty::Normal => 0.65,
            Difficulty::Hard => 0.9,
        }
    }
}

/// Which termination rule a match uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ModeKind {
    /// Lives-based elimination
    #[default]
    Survival,
    /// Fixed-duration score race
    TimedScore,
}

impl ModeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModeKind::Survival => "survival",
            ModeKind::TimedScore => "scores",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "survival" => Some(ModeKind::Survival),
            "scores" | "score" | "timed" | "timed-score" | "timedscore" => {
                Some(ModeKind::TimedScore)
            }
            _ => None,
        }
    }
}

/// Court colour themes (cosmetic, passed through to the presentation layer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Theme {
    #[default]
    Classic,
    Charcoal,
    Neon,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Classic => "classic",
            Theme::Charcoal => "charcoal",
            Theme::Neon => "neon",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "classic" => Some(Theme::Classic),
            "charcoal" => Some(Theme::Charcoal),
            "neon" => Some(Theme::Neon),
            _ => None,
        }
    }

    /// Court fill and canvas background colours
    pub fn background(&self) -> (&'static str, &'static str) {
        match self {
            Theme::Classic => ("#001f3f", "#071a2b"),
            Theme::Charcoal => ("#222222", "#0b0b0b"),
            Theme::Neon => ("#071827", "#001018"),
        }
    }
}

/// Match setup chosen before `start_match`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    pub player_name: String,
    pub difficulty: Difficulty,
    pub mode: ModeKind,
    /// Lives per side (survival only)
    pub lives: u8,
    /// Serve three balls per round instead of one
    pub multi_ball: bool,
    /// Match length in seconds (timed-score only)
    pub match_duration: u32,
    pub theme: Theme,
    /// Best timed-score result so far, supplied by the persistence collaborator
    #[serde(default)]
    pub prior_high_score: u32,
    /// RNG seed for serves and CPU power hits
    #[serde(default)]
    pub seed: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            player_name: DEFAULT_PLAYER_NAME.to_string(),
            difficulty: Difficulty::Normal,
            mode: ModeKind::Survival,
            lives: DEFAULT_LIVES,
            multi_ball: false,
            match_duration: DEFAULT_MATCH_DURATION,
            theme: Theme::Classic,
            prior_high_score: 0,
            seed: 0,
        }
    }
}

impl MatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_player_name(&mut self, name: &str) {
        let name = name.trim();
        self.player_name = if name.is_empty() {
            DEFAULT_PLAYER_NAME.to_string()
        } else {
            name.to_string()
        };
    }

    pub fn set_difficulty(&mut self, difficulty: &str) {
        self.difficulty = Difficulty::from_str(difficulty).unwrap_or_else(|| {
            log::warn!("Unknown difficulty {:?}, using normal", difficulty);
            Difficulty::Normal
        });
    }

    pub fn set_mode(&mut self, mode: &str) {
        self.mode = ModeKind::from_str(mode).unwrap_or_else(|| {
            log::warn!("Unknown mode {:?}, using survival", mode);
            ModeKind::Survival
        });
    }

    pub fn set_lives(&mut self, lives: u32) {
        self.lives = match u8::try_from(lives) {
            Ok(n) if (MIN_LIVES..=MAX_LIVES).contains(&n) => n,
            _ => {
                log::warn!("Lives {} out of range, using {}", lives, DEFAULT_LIVES);
                DEFAULT_LIVES
            }
        };
    }

    pub fn set_multi_ball(&mut self, enabled: bool) {
        self.multi_ball = enabled;
    }

    /// Parse a multi-ball flag as sent by a setup screen ("true"/"false")
    pub fn set_multi_ball_str(&mut self, enabled: &str) {
        self.multi_ball = match enabled.trim().to_lowercase().as_str() {
            "true" | "on" | "yes" | "1" => true,
            "false" | "off" | "no" | "0" => false,
            other => {
                log::warn!("Unknown multi-ball flag {:?}, using off", other);
                false
            }
        };
    }

    pub fn set_match_duration(&mut self, seconds: u32) {
        self.match_duration = if (MIN_MATCH_DURATION..=MAX_MATCH_DURATION).contains(&seconds) {
            seconds
        } else {
            log::warn!(
                "Match duration {}s out of range, using {}s",
                seconds,
                DEFAULT_MATCH_DURATION
            );
            DEFAULT_MATCH_DURATION
        };
    }

    pub fn set_theme(&mut self, theme: &str) {
        self.theme = Theme::from_str(theme).unwrap_or_else(|| {
            log::warn!("Unknown theme {:?}, using classic", theme);
            Theme::Classic
        });
    }

    pub fn set_prior_high_score(&mut self, score: u32) {
        self.prior_high_score = score;
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
    }

    /// Resolve the tagged match mode the rules engine runs with
    pub fn match_mode(&self) -> Mode {
        match self.mode {
            ModeKind::Survival => Mode::Survival { lives: self.lives },
            ModeKind::TimedScore => Mode::TimedScore {
                duration: self.match_duration as f32,
            },
        }
    }

    /// Serialize for the collaborator that remembers the last setup
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Restore a remembered setup; out-of-range values are re-validated
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut config: Self = serde_json::from_str(json)?;
        let name = config.player_name.clone();
        config.set_player_name(&name);
        config.set_lives(config.lives as u32);
        config.set_match_duration(config.match_duration);
        Ok(config)
    }
}
