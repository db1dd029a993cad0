//! Frame-driven simulation tick
//!
//! Advances one match by a variable `dt`. Ordering within a frame matters:
//! timers and deferred transitions first, then paddles, then ball physics,
//! then exit detection, then telemetry.

use rand::Rng;

use super::collision::{
    block_collision, bounce_off_paddle, conceding_side, paddle_contact, wall_collision,
};
use super::cpu;
use super::events::GameEvent;
use super::rules::{Phase, SacrificeChoice};
use super::state::{Ball, Side, Simulation, TickInput};
use crate::consts::*;

/// Advance the simulation by `dt` seconds.
///
/// Does nothing while paused, before the match starts, after it ends, or when
/// `dt` is not a positive finite number.
pub fn tick(state: &mut Simulation, input: &TickInput, dt: f32) {
    if state.paused || !state.rules.is_live() || !(dt.is_finite() && dt > 0.0) {
        return;
    }

    if state.rules.advance(dt, &mut state.events) {
        state.serve_round();
    }
    if !state.rules.is_live() {
        return;
    }

    move_player(state, input, dt);
    let agility = state.config.difficulty.cpu_agility();
    cpu::track(&mut state.cpu, &state.balls, agility, dt, &state.court);

    step_balls(state, dt);

    if let Some(conceding) = conceding_side(&state.balls, &state.court) {
        state.rules.on_exit(conceding, &mut state.events);
    }

    let rally_dt = if state.rules.phase == Phase::Rallying { dt } else { 0.0 };
    state
        .rules
        .telemetry
        .record_frame(rally_dt, state.balls.iter().map(Ball::speed));
}

/// Pointer wins over held keys; either way the paddle stays on court
fn move_player(state: &mut Simulation, input: &TickInput, dt: f32) {
    let court = state.court;
    let paddle = &mut state.player;
    paddle.prev_y = paddle.y;

    if let Some(target) = input.pointer_y {
        paddle.set_top(target - paddle.height / 2.0, &court);
        return;
    }

    let mut dy = 0.0;
    if input.up {
        dy -= PLAYER_PADDLE_SPEED * dt;
    }
    if input.down {
        dy += PLAYER_PADDLE_SPEED * dt;
    }
    paddle.move_by(dy, &court);
}

fn step_balls(state: &mut Simulation, dt: f32) {
    let court = state.court;
    let player_power = state.player.velocity(dt).abs() > POWER_HIT_THRESHOLD;

    for ball in &mut state.balls {
        ball.integrate(dt);
        if wall_collision(ball, &court) {
            state.events.push(GameEvent::WallHit);
        }

        for paddle in [&state.player, &state.cpu] {
            if !paddle_contact(ball, paddle, &court) {
                continue;
            }
            let (power, mult) = match paddle.side {
                Side::Player => (player_power, PLAYER_POWER_MULT),
                Side::Cpu => (state.rng.random_bool(CPU_POWER_CHANCE), CPU_POWER_MULT),
            };
            bounce_off_paddle(ball, paddle, &court, if power { mult } else { 1.0 });
            state.events.push(GameEvent::PaddleHit {
                side: paddle.side,
                power,
            });
        }

        for block in &state.blocks {
            if block_collision(ball, block) {
                state.events.push(GameEvent::BlockHit { side: block.side });
            }
        }

        ball.record_trail(dt);
    }
}

impl Simulation {
    /// Run one frame with the held/queued input, then drop the one-shot
    /// pointer target
    pub fn update(&mut self, dt: f32) {
        let input = self.input.clone();
        tick(self, &input, dt);
        self.input.pointer_y = None;
    }

    /// Answer an open sacrifice offer. Returns false if `choice` is not on
    /// offer.
    pub fn choose_sacrifice(&mut self, choice: SacrificeChoice) -> bool {
        if !self.rules.choose_sacrifice(choice, &mut self.events) {
            return false;
        }
        match choice {
            SacrificeChoice::Blocks => {
                for block in self.blocks.iter_mut().filter(|b| b.side == Side::Player) {
                    block.active = false;
                }
            }
            SacrificeChoice::Paddle => {
                let center = self.player.center_y();
                self.player.height /= 2.0;
                self.player.set_top(center - self.player.height / 2.0, &self.court);
                self.player.prev_y = self.player.y;
            }
            SacrificeChoice::Life => {}
        }
        true
    }
}
