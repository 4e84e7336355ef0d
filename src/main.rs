//! Map Jump entry point
//!
//! Headless driver: loads levels (a file or directory given as the first
//! argument, or the built-in fallback room), then runs the simulation at the
//! fixed timestep with a scripted input stream. A renderer would replace the
//! script with real input edges and draw between ticks.

use map_jump::consts::SIM_DT;
use map_jump::level::load_levels;
use map_jump::sim::{FrameInput, GameState, ShapeSet, TickEvent, tick};

fn main() {
    env_logger::init();
    log::info!("Map Jump (headless) starting...");

    let levels = match std::env::args().nth(1) {
        Some(path) => load_levels(&path),
        None => Vec::new(),
    };

    let shapes = ShapeSet::new();
    let mut state = GameState::new(&shapes, &levels);
    log::info!(
        "playing {} level(s), starting at cell {}",
        state.levels.len(),
        state.level().start
    );

    // Scripted run: hold right, jump twice a second, give up after a minute
    let max_frames = 60 * 60;
    let mut resets = 0u32;
    for frame in 0..max_frames {
        let input = FrameInput {
            x_dir: 1,
            jump: frame % 30 == 0,
            switch_color: false,
        };
        match tick(&mut state, &input, SIM_DT) {
            TickEvent::None => {}
            TickEvent::LevelReset => resets += 1,
            TickEvent::LevelAdvanced => {
                log::info!("level {} reached at frame {frame}", state.cur_level);
            }
            TickEvent::Completed => {
                log::info!("completed all levels at frame {frame} ({resets} resets)");
                return;
            }
        }
    }

    let player = &state.player;
    log::info!(
        "script ran out on level {} at cell {} ({resets} resets, pos {})",
        state.cur_level,
        player.cell(),
        player.view.offset
    );
}
