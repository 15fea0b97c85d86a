//! Headless demo: runs one scripted match and logs the outcome.
//!
//! Useful for eyeballing balance changes without a host:
//! `RUST_LOG=debug cargo run -- 12345`

use raid_sim::render::{NullRenderer, RenderAdapter};
use raid_sim::sim::{Outcome, RaidSim, TickInput};

const FRAME_MS: f32 = 16.0;

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xDEC0DE);
    log::info!("starting scripted match, seed {seed}");

    let mut sim = RaidSim::new(seed);
    let mut renderer = NullRenderer;
    let mut frame_index: u64 = 0;

    loop {
        let input = scripted_input(frame_index);
        let frame = sim.advance(&input, FRAME_MS);
        renderer.draw_frame(&frame);
        frame_index += 1;

        match frame.outcome {
            Outcome::None => {}
            Outcome::Victory => {
                log::info!(
                    "victory in {:.1}s with {:.0} health",
                    frame.elapsed_secs,
                    frame.player.health
                );
                break;
            }
            Outcome::Defeat => {
                log::info!("defeat after {:.1}s", frame.elapsed_secs);
                break;
            }
        }

        // A stuck match means a simulation bug; bail rather than spin
        if frame_index > 10_000 {
            log::error!("match never terminated");
            break;
        }
    }
}

/// A crude but deterministic pilot: circle the arena, swing often, shield
/// and ultimate whenever available.
fn scripted_input(frame: u64) -> TickInput {
    let phase = (frame / 120) % 4;
    TickInput {
        up: phase == 0,
        right: phase == 1,
        down: phase == 2,
        left: phase == 3,
        melee: frame % 45 == 0,
        shield: frame % 600 == 30,
        ultimate: frame % 90 == 0,
        ..Default::default()
    }
}
