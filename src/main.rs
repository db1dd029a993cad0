//! Optimus Pong headless demo
//!
//! Plays one match at 60 fps with the human paddle steered by a simple
//! tracker, logs the event feed and prints the final snapshot as JSON.
//!
//! Usage: `optimus-pong [mode] [difficulty]`, e.g. `optimus-pong timed hard`.
//! Set `RUST_LOG=debug` to see every point and serve.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use optimus_pong::MatchConfig;
    use optimus_pong::audio;
    use optimus_pong::sim::{GameEvent, Simulation};

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let mut config = MatchConfig::new();
    if let Some(mode) = args.next() {
        config.set_mode(&mode);
    }
    if let Some(difficulty) = args.next() {
        config.set_difficulty(&difficulty);
    }
    config.set_seed(std::time::UNIX_EPOCH.elapsed().map_or(0, |d| d.as_secs()));

    let mut sim = Simulation::new(config);
    sim.start_match();

    // Frame cap (15 minutes of play) on top of the match end conditions
    const FRAME_DT: f32 = 1.0 / 60.0;
    const MAX_FRAMES: u32 = 60 * 60 * 15;

    let mut frames = 0;
    while !sim.rules.is_over() && frames < MAX_FRAMES {
        // Follow the nearest incoming ball, a little late
        let incoming = sim
            .balls
            .iter()
            .filter(|b| b.vel.x < 0.0)
            .min_by(|a, b| a.pos.x.partial_cmp(&b.pos.x).unwrap_or(std::cmp::Ordering::Equal))
            .map(|b| b.pos.y);
        if let Some(target) = incoming {
            let center = sim.player.center_y();
            sim.set_pointer_y(center + (target - center) * 0.12);
        }

        sim.update(FRAME_DT);
        frames += 1;

        let events = sim.drain_events();
        for event in &events {
            match event {
                GameEvent::WallHit | GameEvent::BlockHit { .. } | GameEvent::PaddleHit { .. } => {
                    log::trace!("{:?}", event)
                }
                _ => log::info!("{:?}", event),
            }
        }
        for cue in audio::cues(&events) {
            log::trace!("cue {:?}", cue);
        }
        // Never answer the sacrifice; let it time out
    }

    log::info!(
        "Finished after {:.1}s of play ({:?})",
        frames as f32 * FRAME_DT,
        sim.phase()
    );
    match sim.snapshot().to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize snapshot: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser build drives `Simulation` from its own frame loop
}
