//! Collision detection and response
//!
//! Everything is axis-aligned: the court walls, the two paddles and the four
//! one-way blocks. Each check reads the ball's *current* state, so when the
//! driver runs them in order (walls, paddles, blocks, exits) a later check
//! sees what an earlier one changed within the same frame.

use super::state::{Ball, Block, BounceRule, Court, Paddle, Side};
use crate::consts::*;

/// Bounce off the top or bottom wall.
///
/// The ball is clamped to touch the wall and vy is forced away from it.
pub fn wall_collision(ball: &mut Ball, court: &Court) -> bool {
    if ball.pos.y - ball.radius <= 0.0 {
        ball.pos.y = ball.radius;
        ball.vel.y = ball.vel.y.abs();
        true
    } else if ball.pos.y + ball.radius >= court.height {
        ball.pos.y = court.height - ball.radius;
        ball.vel.y = -ball.vel.y.abs();
        true
    } else {
        false
    }
}

/// Whether the ball is moving into `paddle` with its centre inside the
/// paddle's vertical extent and its leading edge at or past the face.
pub fn paddle_contact(ball: &Ball, paddle: &Paddle, court: &Court) -> bool {
    let face = paddle.face_x(court);
    let reached = match paddle.side {
        Side::Player => ball.vel.x < 0.0 && ball.pos.x - ball.radius <= face,
        Side::Cpu => ball.vel.x > 0.0 && ball.pos.x + ball.radius >= face,
    };
    reached && ball.pos.y > paddle.y && ball.pos.y < paddle.y + paddle.height
}

/// Return the ball off `paddle`.
///
/// `power` scales the outgoing horizontal speed. The normalized hit offset
/// (-1 at the top edge, +1 at the bottom edge) adds vy and spin, and the
/// ball is moved just clear of the face so it cannot re-collide.
/// Returns the hit offset.
pub fn bounce_off_paddle(ball: &mut Ball, paddle: &Paddle, court: &Court, power: f32) -> f32 {
    let outward = match paddle.side {
        Side::Player => 1.0,
        Side::Cpu => -1.0,
    };
    ball.vel.x = outward * ball.vel.x.abs() * power;

    let hit_offset = (ball.pos.y - paddle.center_y()) / (paddle.height / 2.0);
    ball.vel.y += hit_offset * ball.vel.x.abs() * HIT_OFFSET_VY;
    ball.spin += hit_offset * HIT_OFFSET_SPIN;

    ball.pos.x = paddle.face_x(court) + outward * (ball.radius + SEPARATION);
    hit_offset
}

/// Bounce off an active block whose rule accepts the ball's direction.
///
/// Blocks only reflect vx and push the ball out of their face; vy is kept.
pub fn block_collision(ball: &mut Ball, block: &Block) -> bool {
    if !block.active
        || !block.rect.overlaps_circle_bounds(ball.pos, ball.radius)
        || !block.bounce.accepts(ball.vel.x)
    {
        return false;
    }

    match block.bounce {
        BounceRule::VxNegative => {
            ball.vel.x = ball.vel.x.abs();
            ball.pos.x = block.rect.right() + ball.radius + SEPARATION;
        }
        BounceRule::VxPositive => {
            ball.vel.x = -ball.vel.x.abs();
            ball.pos.x = block.rect.left() - ball.radius - SEPARATION;
        }
    }
    true
}

/// Side whose goal line the ball has fully crossed, if any
pub fn exit_side(ball: &Ball, court: &Court) -> Option<Side> {
    if ball.pos.x + ball.radius < 0.0 {
        Some(Side::Player)
    } else if ball.pos.x - ball.radius > court.width {
        Some(Side::Cpu)
    } else {
        None
    }
}

/// First conceding side across all balls; the left goal is checked first
pub fn conceding_side(balls: &[Ball], court: &Court) -> Option<Side> {
    if balls
        .iter()
        .any(|b| exit_side(b, court) == Some(Side::Player))
    {
        Some(Side::Player)
    } else if balls.iter().any(|b| exit_side(b, court) == Some(Side::Cpu)) {
        Some(Side::Cpu)
    } else {
        None
    }
}
