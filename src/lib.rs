//! Map Jump - a color-phase 2D platformer core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (SAT collision, contact resolution, player kinematics)
//! - `level`: Level schema, block geometry derivation, JSON level files
//!
//! The renderer, window/input plumbing, and the level editor are external
//! collaborators: they feed [`sim::FrameInput`] edges into [`sim::tick`] and
//! draw the resulting player pose and block list.

pub mod level;
pub mod sim;

use glam::{IVec2, Vec2};

/// Game tuning constants
pub mod consts {
    /// Side length of one grid cell in world units
    pub const BLOCK_SIZE: f32 = 64.0;
    /// Player hit-box side length
    pub const PLAYER_SIZE: f32 = 40.0;
    /// Default map extent in cells (fallback level)
    pub const MAP_WIDTH: i32 = 15;
    pub const MAP_HEIGHT: i32 = 9;

    /// Vertical acceleration, always applied (world is y-up)
    pub const GRAVITY: f32 = -1200.0;
    /// Horizontal acceleration when moving in the commanded direction
    pub const STARTING_ACCEL: f32 = 600.0;
    /// Horizontal acceleration when braking against current velocity
    pub const STOPPING_ACCEL: f32 = 1800.0;
    /// Both accelerations are divided by this while airborne
    pub const AIR_ACCEL_DIVISOR: f32 = 3.0;
    /// Horizontal speed clamp
    pub const MAX_X_VEL: f32 = 300.0;

    /// Upward velocity applied on a jump
    pub const JUMP_VELOCITY: f32 = 500.0;
    /// Horizontal velocity applied away from the wall on a wall jump
    pub const WALL_JUMP_VELOCITY: f32 = 300.0;
    /// Spin rate applied on a jump (full turn per second)
    pub const JUMP_SPIN_VEL: f32 = std::f32::consts::TAU;
    /// A buffered jump press stays valid this long
    pub const JUMP_BUFFER_SECS: f32 = 0.3;

    /// Tolerance for treating a near-exact edge touch as contact
    pub const CONTACT_EPSILON: f32 = 0.1;

    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
}

/// Rotate a vector counter-clockwise by `angle` radians
#[inline]
pub fn rotate_vec(v: Vec2, angle: f32) -> Vec2 {
    let (s, c) = angle.sin_cos();
    Vec2::new(c * v.x - s * v.y, s * v.x + c * v.y)
}

/// Grid cell containing a world-space point
#[inline]
pub fn world_to_cell(pos: Vec2) -> IVec2 {
    (pos / consts::BLOCK_SIZE).floor().as_ivec2()
}

/// World-space origin (lower-left corner) of a grid cell
#[inline]
pub fn cell_origin(cell: IVec2) -> Vec2 {
    cell.as_vec2() * consts::BLOCK_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_rotate_vec_quarter_turn() {
        let v = rotate_vec(Vec2::X, FRAC_PI_2);
        assert!((v - Vec2::Y).length() < 1e-6);
    }

    #[test]
    fn test_world_to_cell() {
        assert_eq!(world_to_cell(Vec2::new(0.0, 0.0)), IVec2::new(0, 0));
        assert_eq!(world_to_cell(Vec2::new(63.9, 64.0)), IVec2::new(0, 1));
        assert_eq!(world_to_cell(Vec2::new(-1.0, 130.0)), IVec2::new(-1, 2));
    }
}
