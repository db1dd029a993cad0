//! Read-only view of a simulation for the presentation layer

use glam::Vec2;
use serde::Serialize;

use super::rules::{Phase, SacrificeChoice, Telemetry};
use super::state::{Court, Side, Simulation, TrailPoint};
use crate::config::Theme;
use crate::consts::CPU_NAME;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaddleView {
    pub side: Side,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BallView {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub trail: Vec<TrailPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockView {
    pub side: Side,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Everything needed to draw one frame and its HUD
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub court: Court,
    pub theme: Theme,
    /// Court fill and canvas colours for `theme`
    pub background: (&'static str, &'static str),
    pub player_name: String,
    pub cpu_name: &'static str,
    pub phase: Phase,
    pub paused: bool,
    pub paddles: [PaddleView; 2],
    pub balls: Vec<BallView>,
    /// Active blocks only
    pub blocks: Vec<BlockView>,
    pub lives_player: u8,
    pub lives_cpu: u8,
    pub score_player: u32,
    pub score_cpu: u32,
    pub time_left: f32,
    pub high_score: u32,
    pub scoring_locked: bool,
    pub sacrifice_offer: Option<Vec<SacrificeChoice>>,
    pub sacrifice_time_left: Option<f32>,
    pub telemetry: Telemetry,
}

impl Snapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Simulation {
    pub fn snapshot(&self) -> Snapshot {
        let paddle_view = |p: &super::state::Paddle| {
            let rect = p.rect(&self.court);
            PaddleView {
                side: p.side,
                x: rect.x,
                y: rect.y,
                width: rect.w,
                height: rect.h,
            }
        };

        Snapshot {
            court: self.court,
            theme: self.config.theme,
            background: self.config.theme.background(),
            player_name: self.config.player_name.clone(),
            cpu_name: CPU_NAME,
            phase: self.rules.phase,
            paused: self.paused,
            paddles: [paddle_view(&self.player), paddle_view(&self.cpu)],
            balls: self
                .balls
                .iter()
                .map(|b| BallView {
                    id: b.id,
                    pos: b.pos,
                    vel: b.vel,
                    radius: b.radius,
                    trail: b.trail.clone(),
                })
                .collect(),
            blocks: self
                .blocks
                .iter()
                .filter(|b| b.active)
                .map(|b| BlockView {
                    side: b.side,
                    x: b.rect.x,
                    y: b.rect.y,
                    width: b.rect.w,
                    height: b.rect.h,
                })
                .collect(),
            lives_player: self.rules.lives_player,
            lives_cpu: self.rules.lives_cpu,
            score_player: self.rules.score_player,
            score_cpu: self.rules.score_cpu,
            time_left: self.rules.time_left,
            high_score: self.rules.high_score.best,
            scoring_locked: self.rules.scoring_locked,
            sacrifice_offer: self.rules.sacrifice_offer.clone(),
            sacrifice_time_left: self.rules.sacrifice_time_left(),
            telemetry: self.rules.telemetry.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchConfig;

    #[test]
    fn test_snapshot_reflects_setup() {
        let mut config = MatchConfig::default();
        config.set_player_name("  Ada ");
        config.set_theme("neon");
        config.set_prior_high_score(12);
        let sim = Simulation::new(config);
        let snap = sim.snapshot();

        assert_eq!(snap.player_name, "Ada");
        assert_eq!(snap.cpu_name, "Optimus");
        assert_eq!(snap.theme, Theme::Neon);
        assert_eq!(snap.background, ("#071827", "#001018"));
        assert_eq!(snap.phase, Phase::Idle);
        assert_eq!(snap.high_score, 12);
        assert_eq!(snap.blocks.len(), 4);
        assert_eq!(snap.paddles[1].x, 690.0);
        assert!(snap.balls.is_empty());
    }

    #[test]
    fn test_snapshot_json() {
        let mut sim = Simulation::new(MatchConfig::default());
        sim.start_match();
        let json = sim.snapshot().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["cpu_name"], "Optimus");
        assert_eq!(value["lives_player"], 3);
        assert_eq!(value["balls"].as_array().map(|b| b.len()), Some(1));
        assert_eq!(value["phase"], "Rallying");
        assert_eq!(value["background"][0], "#001f3f");
    }
}
