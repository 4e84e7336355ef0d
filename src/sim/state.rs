//! Player kinematic state and the orchestrating game state
//!
//! `Player` is mutated every frame by [`crate::sim::tick`]; it is never
//! destroyed, only reset in place on death or level change. `GameState` owns
//! the built levels and the reusable contact buffer the two resolver passes
//! share.

use glam::{IVec2, Vec2};

use super::collision::{Contact, collide};
use super::polygon::{PolyView, ShapeSet};
use crate::consts::{BLOCK_SIZE, GRAVITY, PLAYER_SIZE};
use crate::level::{BlockColor, Level, LevelData};
use crate::world_to_cell;

/// Mutable per-frame player state
#[derive(Debug, Clone)]
pub struct Player<'p> {
    /// Hit-box; `view.angle` stays 0, the jump spin lives in `angle`
    pub view: PolyView<'p>,
    pub vel: Vec2,
    pub accel: Vec2,
    /// Visual spin rate/angle (radians); does not affect collision
    pub angle_vel: f32,
    pub angle: f32,
    pub on_ground: bool,
    /// -1 touching a jump block on the left, 1 on the right, 0 otherwise
    pub on_wall: i8,
    /// braking from leftward motion
    pub stopping_left: bool,
    /// braking from rightward motion
    pub stopping_right: bool,
    /// net horizontal command for this frame; reset to 0 after each update
    pub x_dir: i8,
    /// a jump press is pending
    pub do_jump: bool,
    /// seconds since the pending jump press, advanced by dt
    pub jump_age: f32,
    /// phasing through the newly active color after a switch
    pub intangible: bool,
}

impl<'p> Player<'p> {
    pub fn new(shapes: &'p ShapeSet) -> Self {
        Self {
            view: PolyView::new(&shapes.square, Vec2::ZERO, Vec2::splat(PLAYER_SIZE), 0.0),
            vel: Vec2::ZERO,
            accel: Vec2::new(0.0, GRAVITY),
            angle_vel: 0.0,
            angle: 0.0,
            on_ground: false,
            on_wall: 0,
            stopping_left: false,
            stopping_right: false,
            x_dir: 0,
            do_jump: false,
            jump_age: f32::INFINITY,
            intangible: true,
        }
    }

    /// Current grid cell of the hit-box center
    pub fn cell(&self) -> IVec2 {
        world_to_cell(self.view.center())
    }

    /// Snap to a cell, centered, and clear all motion and flags
    fn respawn_at(&mut self, cell: IVec2) {
        self.view.offset = cell.as_vec2() * BLOCK_SIZE + (BLOCK_SIZE - PLAYER_SIZE) / 2.0;
        self.vel = Vec2::ZERO;
        self.accel = Vec2::new(0.0, GRAVITY);
        self.angle_vel = 0.0;
        self.angle = 0.0;
        self.on_ground = false;
        self.on_wall = 0;
        self.stopping_left = false;
        self.stopping_right = false;
        self.x_dir = 0;
        self.do_jump = false;
        self.jump_age = f32::INFINITY;
        self.intangible = true;
    }
}

/// The whole mutable game: built levels, current index, player, color phase
#[derive(Debug)]
pub struct GameState<'p> {
    pub levels: Vec<Level<'p>>,
    pub cur_level: usize,
    pub player: Player<'p>,
    /// Which phase color is currently solid
    pub is_blue: bool,
    /// Pass-1 output consumed by pass 2: (block index, contact)
    pub(crate) contacts: Vec<(usize, Contact)>,
}

impl<'p> GameState<'p> {
    /// Build all levels against the shared shapes; an empty list gets the
    /// fallback room so there is always something to play.
    pub fn new(shapes: &'p ShapeSet, data: &[LevelData]) -> Self {
        let levels: Vec<Level<'p>> = if data.is_empty() {
            vec![Level::build(&LevelData::fallback(), shapes)]
        } else {
            data.iter().map(|d| Level::build(d, shapes)).collect()
        };
        let max_blocks = levels.iter().map(|l| l.blocks.len()).max().unwrap_or(0);

        let mut state = Self {
            levels,
            cur_level: 0,
            player: Player::new(shapes),
            is_blue: true,
            contacts: Vec::with_capacity(max_blocks),
        };
        state.load_level(0);
        state
    }

    pub fn level(&self) -> &Level<'p> {
        &self.levels[self.cur_level]
    }

    /// Enter a level fresh: player at its start cell, its starting phase
    pub fn load_level(&mut self, index: usize) {
        self.cur_level = index;
        let level = &self.levels[index];
        self.is_blue = level.blue_starts;
        let start = level.start;
        self.player.respawn_at(start);
    }

    /// Death: snap back to the current level's start
    pub fn reset_level(&mut self) {
        let start = self.level().start;
        self.player.respawn_at(start);
        log::debug!("level {} reset", self.cur_level);
    }

    /// Toggle the active phase color. Any block of the newly active color
    /// already overlapping the hit-box makes the player intangible, so the
    /// switch can't eject or kill from inside.
    pub fn switch_colors(&mut self) {
        self.is_blue = !self.is_blue;
        let newly_active = BlockColor::active_phase(self.is_blue);
        let level = &self.levels[self.cur_level];
        for b in &level.blocks {
            if b.color == newly_active && collide(&self.player.view, &b.view).collides {
                self.player.intangible = true;
            }
        }
    }
}
