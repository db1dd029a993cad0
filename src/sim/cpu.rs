//! Optimus, the CPU opponent
//!
//! Proportional tracking: the paddle centre closes a fraction of the gap to
//! the target each frame, scaled by the difficulty's agility. Lower agility
//! lags behind fast balls, which is what makes Optimus beatable.

use super::state::{Ball, Court, Paddle};
use crate::consts::CPU_TRACKING_GAIN;

/// The ball closest to the CPU's goal (largest x)
pub fn target_ball(balls: &[Ball]) -> Option<&Ball> {
    balls.iter().max_by(|a, b| {
        a.pos
            .x
            .partial_cmp(&b.pos.x)
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}

/// Move the CPU paddle toward the target ball, or back to mid-court when
/// there is nothing to track.
pub fn track(paddle: &mut Paddle, balls: &[Ball], agility: f32, dt: f32, court: &Court) {
    let target_y = target_ball(balls).map_or(court.height / 2.0, |b| b.pos.y);
    let dy = (target_y - paddle.center_y()) * agility * dt * CPU_TRACKING_GAIN;
    paddle.move_by(dy, court);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Side;
    use glam::Vec2;

    #[test]
    fn test_targets_ball_nearest_cpu() {
        let balls = vec![
            Ball::new(1, Vec2::new(200.0, 50.0), Vec2::X),
            Ball::new(2, Vec2::new(500.0, 300.0), Vec2::X),
            Ball::new(3, Vec2::new(350.0, 100.0), Vec2::X),
        ];
        assert_eq!(target_ball(&balls).map(|b| b.id), Some(2));
        assert!(target_ball(&[]).is_none());
    }

    #[test]
    fn test_tracking_moves_toward_ball() {
        let court = Court::default();
        let mut paddle = Paddle::new(Side::Cpu, &court);
        let balls = vec![Ball::new(1, Vec2::new(500.0, 300.0), Vec2::X)];

        track(&mut paddle, &balls, 0.65, 1.0 / 60.0, &court);
        // Gap of 100 closes by 100 * 0.65 * 6 / 60
        assert!((paddle.center_y() - 206.5).abs() < 1e-3);
    }

    #[test]
    fn test_higher_agility_tracks_faster() {
        let court = Court::default();
        let balls = vec![Ball::new(1, Vec2::new(500.0, 40.0), Vec2::X)];
        let mut slow = Paddle::new(Side::Cpu, &court);
        let mut fast = Paddle::new(Side::Cpu, &court);
        for _ in 0..10 {
            track(&mut slow, &balls, 0.45, 1.0 / 60.0, &court);
            track(&mut fast, &balls, 0.9, 1.0 / 60.0, &court);
        }
        assert!(fast.center_y() < slow.center_y());
    }

    #[test]
    fn test_idles_to_centre_and_stays_clamped() {
        let court = Court::default();
        let mut paddle = Paddle::new(Side::Cpu, &court);
        paddle.set_top(0.0, &court);
        for _ in 0..600 {
            track(&mut paddle, &[], 0.9, 1.0 / 60.0, &court);
        }
        assert!((paddle.center_y() - 200.0).abs() < 0.5);

        let balls = vec![Ball::new(1, Vec2::new(500.0, -500.0), Vec2::X)];
        for _ in 0..600 {
            track(&mut paddle, &balls, 0.9, 1.0 / 60.0, &court);
        }
        assert_eq!(paddle.y, 0.0);
    }
}
