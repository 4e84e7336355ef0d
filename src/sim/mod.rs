//! The deterministic simulation core
//!
//! Everything here is pure state-in, state-out: [`tick::tick`] advances a
//! [`state::GameState`] by one frame given that frame's input. No clocks, no
//! I/O, so a run is reproducible from the level data and the input sequence.

pub mod collision;
pub mod polygon;
pub mod state;
pub mod tick;

pub use collision::{Contact, collide};
pub use polygon::{PolyView, Polygon, ShapeSet};
pub use state::{GameState, Player};
pub use tick::{FrameInput, TickEvent, tick};
