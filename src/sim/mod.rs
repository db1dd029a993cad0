//! Pong simulation core
//!
//! All gameplay logic lives here. This module is pure and deterministic:
//! - Frame-driven: time only advances through `tick`/`update`
//! - Seeded RNG only
//! - Stable iteration order (balls by id, blocks by side then position)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod cpu;
pub mod events;
pub mod rect;
pub mod rules;
pub mod schedule;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use events::GameEvent;
pub use rect::Rect;
pub use rules::{Deferred, MatchState, Mode, Outcome, Phase, SacrificeChoice, Telemetry};
pub use schedule::Scheduled;
pub use snapshot::{BallView, BlockView, PaddleView, Snapshot};
pub use state::{
    Ball, Block, BounceRule, Court, MoveDirection, Paddle, Side, Simulation, TickInput,
    TrailPoint,
};
pub use tick::tick;
