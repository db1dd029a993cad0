//! Sound cues derived from the simulation event feed
//!
//! Procedurally generated tones, no external files needed. This module only
//! describes *what* to play; an audio backend schedules the oscillators.

use serde::{Deserialize, Serialize};

use crate::sim::{GameEvent, Outcome};

/// Starting gain of every generated tone
pub const TONE_GAIN: f32 = 0.1;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Ball hits paddle
    PaddleHit,
    /// Ball hits a wall or a block
    WallHit,
    /// A point was scored
    Score,
    /// Player won a survival match, or a timed match ended
    Victory,
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
}

impl Waveform {
    /// Web Audio `OscillatorType` name
    pub fn as_str(&self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Square => "square",
            Waveform::Sawtooth => "sawtooth",
        }
    }
}

/// One oscillator burst with an exponential decay envelope
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tone {
    /// Hz
    pub frequency: f32,
    /// Seconds
    pub duration: f32,
    pub waveform: Waveform,
    /// Seconds after the cue starts
    pub delay: f32,
    /// Envelope start; decays exponentially over `duration`
    pub gain: f32,
}

const fn tone(frequency: f32, duration: f32, waveform: Waveform, delay: f32) -> Tone {
    Tone {
        frequency,
        duration,
        waveform,
        delay,
        gain: TONE_GAIN,
    }
}

const PADDLE_HIT_TONES: [Tone; 1] = [tone(800.0, 0.1, Waveform::Square, 0.0)];
const WALL_HIT_TONES: [Tone; 1] = [tone(400.0, 0.15, Waveform::Sawtooth, 0.0)];
const SCORE_TONES: [Tone; 2] = [
    tone(600.0, 0.2, Waveform::Sine, 0.0),
    tone(800.0, 0.2, Waveform::Sine, 0.1),
];
// C5, E5, G5 arpeggio
const VICTORY_TONES: [Tone; 3] = [
    tone(523.0, 0.2, Waveform::Sine, 0.0),
    tone(659.0, 0.2, Waveform::Sine, 0.2),
    tone(784.0, 0.4, Waveform::Sine, 0.4),
];

impl SoundEffect {
    /// Sound cue for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::PaddleHit { .. } => Some(SoundEffect::PaddleHit),
            GameEvent::WallHit | GameEvent::BlockHit { .. } => Some(SoundEffect::WallHit),
            GameEvent::PointScored { .. } => Some(SoundEffect::Score),
            GameEvent::MatchEnded {
                outcome: Outcome::Win,
            }
            | GameEvent::HighScoreCandidate { .. } => Some(SoundEffect::Victory),
            _ => None,
        }
    }

    pub fn tones(&self) -> &'static [Tone] {
        match self {
            SoundEffect::PaddleHit => &PADDLE_HIT_TONES,
            SoundEffect::WallHit => &WALL_HIT_TONES,
            SoundEffect::Score => &SCORE_TONES,
            SoundEffect::Victory => &VICTORY_TONES,
        }
    }

    /// Seconds from the cue start until its last tone stops
    pub fn total_duration(&self) -> f32 {
        self.tones()
            .iter()
            .map(|t| t.delay + t.duration)
            .fold(0.0, f32::max)
    }
}

/// Cues for one frame's events, each effect at most once, in first-seen order
pub fn cues(events: &[GameEvent]) -> Vec<SoundEffect> {
    let mut effects = Vec::new();
    for effect in events.iter().filter_map(SoundEffect::for_event) {
        if !effects.contains(&effect) {
            effects.push(effect);
        }
    }
    effects
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Side;

    #[test]
    fn test_event_mapping() {
        assert_eq!(
            SoundEffect::for_event(&GameEvent::BlockHit { side: Side::Cpu }),
            Some(SoundEffect::WallHit)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::MatchEnded {
                outcome: Outcome::Loss
            }),
            None
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::RoundServed { balls: 1 }),
            None
        );
    }

    #[test]
    fn test_tone_table() {
        let hit = SoundEffect::PaddleHit.tones();
        assert_eq!(hit[0].frequency, 800.0);
        assert_eq!(hit[0].waveform.as_str(), "square");
        assert!(
            SoundEffect::Victory
                .tones()
                .iter()
                .all(|t| t.gain == TONE_GAIN)
        );

        let victory: Vec<f32> = SoundEffect::Victory
            .tones()
            .iter()
            .map(|t| t.frequency)
            .collect();
        assert_eq!(victory, vec![523.0, 659.0, 784.0]);
        assert!((SoundEffect::Victory.total_duration() - 0.8).abs() < 1e-6);
        assert!((SoundEffect::Score.total_duration() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_cues_deduplicate_per_frame() {
        let events = vec![
            GameEvent::WallHit,
            GameEvent::PaddleHit {
                side: Side::Player,
                power: false,
            },
            GameEvent::WallHit,
            GameEvent::MatchEnded {
                outcome: Outcome::Win,
            },
            GameEvent::HighScoreCandidate {
                score: 4,
                is_record: true,
            },
        ];
        assert_eq!(
            cues(&events),
            vec![
                SoundEffect::WallHit,
                SoundEffect::PaddleHit,
                SoundEffect::Victory
            ]
        );
    }
}
