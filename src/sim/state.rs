//! Simulation entities and the match-owning `Simulation`
//!
//! All state the driver mutates lives here. The presentation layer reads it
//! through [`Simulation::snapshot`] and changes it only through the intent
//! methods (move, pointer, pause, sacrifice choice, configuration).

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::events::GameEvent;
use super::rect::Rect;
use super::rules::{MatchState, Phase};
use crate::clamp_paddle_top;
use crate::config::MatchConfig;
use crate::consts::*;

/// Which end of the court an entity belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    /// Human, left edge
    Player,
    /// Optimus, right edge
    Cpu,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Player => Side::Cpu,
            Side::Cpu => Side::Player,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Player => "player",
            Side::Cpu => "cpu",
        }
    }
}

/// Fixed playfield
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Court {
    pub width: f32,
    pub height: f32,
}

impl Default for Court {
    fn default() -> Self {
        Self {
            width: COURT_WIDTH,
            height: COURT_HEIGHT,
        }
    }
}

/// Trail point for ball rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailPoint {
    pub pos: Vec2,
    /// Seconds since the point was recorded
    pub age: f32,
}

/// A ball entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Decaying vertical acceleration imparted by off-centre paddle hits
    pub spin: f32,
    pub radius: f32,
    /// Recent positions (newest first); rendering only
    #[serde(skip)]
    pub trail: Vec<TrailPoint>,
}

impl Ball {
    pub fn new(id: u32, pos: Vec2, vel: Vec2) -> Self {
        Self {
            id,
            pos,
            vel,
            spin: 0.0,
            radius: BALL_RADIUS,
            trail: Vec::new(),
        }
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Advance by `dt` seconds.
    ///
    /// Spin feeds vy first, then decays with a time-scaled factor so the
    /// curve does not depend on the frame rate, then position integrates.
    pub fn integrate(&mut self, dt: f32) {
        self.vel.y += self.spin * dt;
        self.spin *= SPIN_DAMPING.powf(dt * 60.0);
        self.pos += self.vel * dt;
    }

    /// Age the trail by `dt`, record the current position, drop stale points
    pub fn record_trail(&mut self, dt: f32) {
        for point in &mut self.trail {
            point.age += dt;
        }
        self.trail.retain(|p| p.age < TRAIL_WINDOW);
        self.trail.insert(
            0,
            TrailPoint {
                pos: self.pos,
                age: 0.0,
            },
        );
    }
}

/// A paddle pinned to one side of the court
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub side: Side,
    /// Top edge
    pub y: f32,
    /// Top edge at the start of the current frame (for paddle speed)
    pub prev_y: f32,
    pub height: f32,
    pub width: f32,
}

impl Paddle {
    pub fn base_height() -> f32 {
        PADDLE_BASE_HEIGHT * PADDLE_HEIGHT_MULT
    }

    /// Full-height paddle centred vertically
    pub fn new(side: Side, court: &Court) -> Self {
        let mut paddle = Self {
            side,
            y: 0.0,
            prev_y: 0.0,
            height: Self::base_height(),
            width: PADDLE_WIDTH,
        };
        paddle.recenter(court);
        paddle
    }

    /// Left edge
    pub fn x(&self, court: &Court) -> f32 {
        match self.side {
            Side::Player => 0.0,
            Side::Cpu => court.width - self.width,
        }
    }

    /// X of the face balls bounce off
    pub fn face_x(&self, court: &Court) -> f32 {
        match self.side {
            Side::Player => self.width,
            Side::Cpu => court.width - self.width,
        }
    }

    pub fn rect(&self, court: &Court) -> Rect {
        Rect::new(self.x(court), self.y, self.width, self.height)
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Vertical speed over the current frame (pixels/s)
    pub fn velocity(&self, dt: f32) -> f32 {
        if dt > 0.0 { (self.y - self.prev_y) / dt } else { 0.0 }
    }

    pub fn set_top(&mut self, y: f32, court: &Court) {
        self.y = clamp_paddle_top(y, self.height, court.height);
    }

    pub fn move_by(&mut self, dy: f32, court: &Court) {
        self.set_top(self.y + dy, court);
    }

    pub fn recenter(&mut self, court: &Court) {
        self.y = (court.height - self.height) / 2.0;
        self.prev_y = self.y;
    }
}

/// Direction a block accepts balls from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BounceRule {
    /// Reflect balls moving left (vx < 0); guards the player's goal
    VxNegative,
    /// Reflect balls moving right (vx > 0); guards the CPU's goal
    VxPositive,
}

impl BounceRule {
    pub fn accepts(&self, vx: f32) -> bool {
        match self {
            BounceRule::VxNegative => vx < 0.0,
            BounceRule::VxPositive => vx > 0.0,
        }
    }
}

/// A stationary one-way obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub side: Side,
    pub rect: Rect,
    pub bounce: BounceRule,
    pub active: bool,
}

impl Block {
    /// Two blocks per side, near the top and bottom walls
    pub fn standard_set(court: &Court) -> Vec<Block> {
        let player_x = PADDLE_WIDTH + BLOCK_OFFSET;
        let cpu_x = court.width - PADDLE_WIDTH - BLOCK_OFFSET - BLOCK_WIDTH;
        let top_y = BLOCK_EDGE_GAP;
        let bottom_y = court.height - BLOCK_EDGE_GAP - BLOCK_HEIGHT;

        let mut blocks = Vec::with_capacity(4);
        for y in [top_y, bottom_y] {
            blocks.push(Block {
                side: Side::Player,
                rect: Rect::new(player_x, y, BLOCK_WIDTH, BLOCK_HEIGHT),
                bounce: BounceRule::VxNegative,
                active: true,
            });
        }
        for y in [top_y, bottom_y] {
            blocks.push(Block {
                side: Side::Cpu,
                rect: Rect::new(cpu_x, y, BLOCK_WIDTH, BLOCK_HEIGHT),
                bounce: BounceRule::VxPositive,
                active: true,
            });
        }
        blocks
    }
}

/// Vertical direction for held move intents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveDirection {
    Up,
    Down,
}

/// Player input consumed by one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Up key held
    pub up: bool,
    /// Down key held
    pub down: bool,
    /// Absolute pointer y (paddle centre target); one-shot
    pub pointer_y: Option<f32>,
}

/// One match worth of simulation state
#[derive(Debug, Clone)]
pub struct Simulation {
    /// Setup for the current (or next) match; edit through `config_mut`
    pub(crate) config: MatchConfig,
    pub court: Court,
    pub player: Paddle,
    pub cpu: Paddle,
    /// Live balls (sorted by id)
    pub balls: Vec<Ball>,
    pub blocks: Vec<Block>,
    pub rules: MatchState,
    pub paused: bool,
    /// Held/queued player input
    pub input: TickInput,
    /// Pending events; grows until the caller drains it
    pub(crate) events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl Simulation {
    /// Create an idle simulation; call [`start_match`](Self::start_match) to play
    pub fn new(config: MatchConfig) -> Self {
        let court = Court::default();
        let rules = MatchState::idle(config.match_mode(), config.prior_high_score);
        let rng = Pcg32::seed_from_u64(config.seed);
        Self {
            player: Paddle::new(Side::Player, &court),
            cpu: Paddle::new(Side::Cpu, &court),
            balls: Vec::new(),
            blocks: Block::standard_set(&court),
            rules,
            paused: false,
            input: TickInput::default(),
            events: Vec::new(),
            rng,
            next_id: 1,
            court,
            config,
        }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Configuration is only editable between matches
    pub fn config_mut(&mut self) -> Option<&mut MatchConfig> {
        if self.rules.is_live() {
            log::warn!("Configuration is locked while a match is running");
            return None;
        }
        Some(&mut self.config)
    }

    pub fn phase(&self) -> Phase {
        self.rules.phase
    }

    pub fn is_running(&self) -> bool {
        self.rules.is_live()
    }

    /// Begin a fresh match from the current configuration
    pub fn start_match(&mut self) {
        self.rules = MatchState::start(self.config.match_mode(), self.config.prior_high_score);
        self.rng = Pcg32::seed_from_u64(self.config.seed);
        self.paused = false;
        self.input = TickInput::default();
        self.events.clear();
        self.restore_court();

        log::info!(
            "Match started: {:?}, {} difficulty, multi-ball {}, seed {}",
            self.rules.mode,
            self.config.difficulty.as_str(),
            self.config.multi_ball,
            self.config.seed
        );
        self.serve_round();
    }

    /// Abandon the match and return to setup
    pub fn reset(&mut self) {
        self.rules = MatchState::idle(self.config.match_mode(), self.config.prior_high_score);
        self.paused = false;
        self.input = TickInput::default();
        self.balls.clear();
        self.events.clear();
        self.restore_court();
        self.player.recenter(&self.court);
        self.cpu.recenter(&self.court);
    }

    /// Undo sacrifices: full-height paddles and every block active
    fn restore_court(&mut self) {
        self.player.height = Paddle::base_height();
        self.cpu.height = Paddle::base_height();
        for block in &mut self.blocks {
            block.active = true;
        }
    }

    /// Allocate a new entity ID
    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Re-centre paddles and serve fresh ball(s) from mid-court
    pub(crate) fn serve_round(&mut self) {
        self.player.recenter(&self.court);
        self.cpu.recenter(&self.court);
        self.balls.clear();

        let count = if self.config.multi_ball { MULTI_BALL_COUNT } else { 1 };
        let base = self.config.difficulty.ball_base_speed();
        let center = Vec2::new(self.court.width / 2.0, self.court.height / 2.0);

        for i in 0..count {
            let dir = if self.rng.random_bool(0.5) { -1.0 } else { 1.0 };
            let vx = dir
                * (base + self.rng.random_range(-SERVE_SPEED_JITTER..SERVE_SPEED_JITTER));
            let vy = self.rng.random_range(-1.0f32..1.0) * base * SERVE_ANGLE_FACTOR;
            let y_offset = if self.config.multi_ball {
                (i as f32 - 1.0) * MULTI_BALL_SPACING
            } else {
                0.0
            };
            let id = self.next_entity_id();
            self.balls
                .push(Ball::new(id, center + Vec2::new(0.0, y_offset), Vec2::new(vx, vy)));
        }

        self.rules.telemetry.start_rally();
        self.events.push(GameEvent::RoundServed { balls: count });
        log::debug!("Served {} ball(s)", count);
    }

    /// Hold or release a move key
    pub fn set_move_intent(&mut self, direction: MoveDirection, active: bool) {
        match direction {
            MoveDirection::Up => self.input.up = active,
            MoveDirection::Down => self.input.down = active,
        }
    }

    /// Queue an absolute pointer position for the next tick
    pub fn set_pointer_y(&mut self, y: f32) {
        if y.is_finite() {
            self.input.pointer_y = Some(y);
        }
    }

    /// Toggle pause. Ignored unless a match is live.
    pub fn toggle_pause(&mut self) -> bool {
        if !self.rules.is_live() {
            return false;
        }
        self.paused = !self.paused;
        log::info!("{}", if self.paused { "Paused" } else { "Resumed" });
        true
    }

    /// Take all events emitted since the last call.
    ///
    /// The simulation never discards events on its own, so a frame loop must
    /// drain them every frame.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
