//! Per-frame update: kinematics and two-pass contact resolution
//!
//! One call advances the player by `dt`, resolves overlaps against the
//! current level, classifies contacts, and applies any buffered jump.
//! Deterministic: the result depends only on `(state, input, dt)`, and
//! blocks are processed in level order, which the MTV tie-break relies on.

use glam::Vec2;

use super::collision::{Contact, collide};
use super::state::{GameState, Player};
use crate::consts::{
    AIR_ACCEL_DIVISOR, CONTACT_EPSILON, JUMP_BUFFER_SECS, JUMP_SPIN_VEL, JUMP_VELOCITY, MAX_X_VEL,
    STARTING_ACCEL, STOPPING_ACCEL, WALL_JUMP_VELOCITY,
};
use crate::level::{Block, BlockColor, BlockKind, Level};

/// Input edges for a single frame.
///
/// Edge state lives with the caller; the core sees only this value, once,
/// per update.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    /// Net horizontal command: -1 left, 1 right, 0 none
    pub x_dir: i8,
    /// Jump was pressed this frame (buffered for 300 ms)
    pub jump: bool,
    /// Color switch was pressed this frame
    pub switch_color: bool,
}

/// What a frame resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    /// Alive, state updated
    None,
    /// Spike contact; player is back at the start cell
    LevelReset,
    /// Reached the end cell; next level is loaded
    LevelAdvanced,
    /// Standing on the end cell of the last level
    Completed,
}

/// Advance the game by one frame
pub fn tick(state: &mut GameState<'_>, input: &FrameInput, dt: f32) -> TickEvent {
    if input.switch_color {
        state.switch_colors();
    }
    if input.jump {
        state.player.do_jump = true;
        state.player.jump_age = 0.0;
    }
    state.player.x_dir = input.x_dir;

    integrate(&mut state.player, dt);

    // Pass 1: push the player out of every tangible overlap
    let died = {
        let GameState {
            levels,
            cur_level,
            player,
            is_blue,
            contacts,
        } = state;
        resolve_overlaps(player, &levels[*cur_level], *is_blue, contacts)
    };
    if died {
        state.reset_level();
        return TickEvent::LevelReset;
    }

    // Pass 2: classify the recorded contacts into ground/ceiling/wall
    {
        let GameState {
            levels,
            cur_level,
            player,
            contacts,
            ..
        } = state;
        classify_contacts(player, &levels[*cur_level], contacts);
    }

    let player = &mut state.player;

    // spin bookkeeping: snap upright once grounded, otherwise keep rolling
    // over in 90-degree steps (observed behavior, including negative angles)
    if player.angle.abs() >= std::f32::consts::FRAC_PI_2 {
        if player.on_ground {
            player.angle_vel = 0.0;
            player.angle = 0.0;
        } else {
            player.angle -= std::f32::consts::FRAC_PI_2;
        }
    }

    // buffered jump: honored only while the press is fresh and the player
    // has something to push off
    if player.do_jump
        && player.jump_age < JUMP_BUFFER_SECS
        && (player.on_ground || player.on_wall != 0)
    {
        player.vel.y = JUMP_VELOCITY;
        player.angle_vel = if player.vel.x > 0.0 {
            -JUMP_SPIN_VEL
        } else {
            JUMP_SPIN_VEL
        };
        player.do_jump = false;

        if !player.on_ground {
            // wall jump: kick away from the wall
            if player.on_wall > 0 {
                player.vel.x = -WALL_JUMP_VELOCITY;
                player.stopping_right = false;
            } else {
                player.vel.x = WALL_JUMP_VELOCITY;
                player.stopping_left = false;
            }
        }
    }
    player.jump_age += dt;

    if state.player.cell() == state.level().end {
        if state.cur_level + 1 < state.levels.len() {
            let next = state.cur_level + 1;
            state.load_level(next);
            log::info!("advanced to level {next}");
            return TickEvent::LevelAdvanced;
        }
        return TickEvent::Completed;
    }
    TickEvent::None
}

/// Acceleration selection and integration.
///
/// Horizontal control is acceleration-based: a commanded direction applies
/// `STARTING_ACCEL`, while no command (or a command against the current
/// velocity) applies the stronger `STOPPING_ACCEL` as a brake, tracked by
/// the stopping flags so the brake releases exactly at zero crossing.
fn integrate(player: &mut Player<'_>, dt: f32) {
    let mut stopping_accel = STOPPING_ACCEL;
    let mut starting_accel = STARTING_ACCEL;
    if !player.on_ground {
        stopping_accel /= AIR_ACCEL_DIVISOR;
        starting_accel /= AIR_ACCEL_DIVISOR;
    }

    if player.x_dir == 0 {
        if player.vel.x < 0.0 {
            player.stopping_left = true;
            player.accel.x = stopping_accel;
        } else if player.vel.x > 0.0 {
            player.stopping_right = true;
            player.accel.x = -stopping_accel;
        }
    } else if player.x_dir > 0 {
        if player.vel.x < 0.0 {
            // brake hard before reversing
            player.stopping_left = true;
            player.accel.x = stopping_accel;
        } else {
            player.accel.x = starting_accel;
        }
    } else if player.vel.x > 0.0 {
        player.stopping_right = true;
        player.accel.x = -stopping_accel;
    } else {
        player.accel.x = -starting_accel;
    }

    player.vel += player.accel * dt;

    // a finished brake clamps to exactly zero, otherwise it would oscillate
    if player.stopping_left && player.vel.x >= 0.0 {
        player.vel.x = 0.0;
        player.accel.x = 0.0;
        player.stopping_left = false;
    }
    if player.stopping_right && player.vel.x <= 0.0 {
        player.vel.x = 0.0;
        player.accel.x = 0.0;
        player.stopping_right = false;
    }

    if player.vel.x < -MAX_X_VEL {
        player.accel.x = 0.0;
        player.vel.x = -MAX_X_VEL;
    } else if player.vel.x > MAX_X_VEL {
        player.accel.x = 0.0;
        player.vel.x = MAX_X_VEL;
    }

    player.view.offset += player.vel * dt;
    player.angle += player.angle_vel * dt;
    player.x_dir = 0;
}

/// Whether pass 1 should test this block at all
fn tests_block(block: &Block<'_>, is_blue: bool, intangible: bool) -> bool {
    block.color.is_active(is_blue) || (intangible && block.color.is_phase())
}

/// A spike contact is survivable only on the flat base edge: the SAT normal
/// must be co-linear and same-signed with the base's outward normal, one
/// axis at a time.
fn touches_base(normal: Vec2, base: Vec2) -> bool {
    if base.x == 0.0 {
        normal.x.abs() < CONTACT_EPSILON && normal.y * base.y > 0.0
    } else {
        normal.y.abs() < CONTACT_EPSILON && normal.x * base.x > 0.0
    }
}

/// Pass 1. Pushes the player out of overlaps, records tangible contacts for
/// pass 2, maintains intangibility, and reports spike death (true = reset).
fn resolve_overlaps(
    player: &mut Player<'_>,
    level: &Level<'_>,
    is_blue: bool,
    contacts: &mut Vec<(usize, Contact)>,
) -> bool {
    contacts.clear();

    // stays true only if the whole frame passes without phase-colored contact
    let mut clear_intangible = true;

    for (i, block) in level.blocks.iter().enumerate() {
        if !tests_block(block, is_blue, player.intangible) {
            continue;
        }
        let c = collide(&player.view, &block.view);
        if !c.collides {
            continue;
        }

        if block.kind == BlockKind::Spike
            && (block.color == BlockColor::Neutral || !player.intangible)
            && !touches_base(c.normal, block.base_normal())
        {
            // hit the point side: death, frame processing stops here
            return true;
        }

        if block.color.is_phase() {
            clear_intangible = false;
        }

        if !player.intangible || block.color == BlockColor::Neutral {
            player.view.offset += c.mtv;
            contacts.push((i, c));
        }
    }

    if clear_intangible {
        player.intangible = false;
    }
    false
}

/// Pass 2. The MTV alone can't tell which face the player is resting on
/// after several pushes, so contacts are re-classified against bounding
/// extents with an epsilon for near-exact touches.
fn classify_contacts(player: &mut Player<'_>, level: &Level<'_>, contacts: &[(usize, Contact)]) {
    let was_on_ground = player.on_ground;
    player.on_ground = false;
    player.on_wall = 0;

    let (p_min, p_max) = player.view.aabb();

    for &(i, _) in contacts {
        let block = &level.blocks[i];
        let (b_min, b_max) = block.view.aabb();

        // overlapping horizontally: a floor or ceiling touch
        if p_max.x > b_min.x && b_max.x > p_min.x {
            if (p_min.y - b_max.y).abs() < CONTACT_EPSILON {
                player.on_ground = true;
                player.vel.y = 0.0;
            } else if (p_max.y - b_min.y).abs() < CONTACT_EPSILON {
                // ceiling bump: stop rising but stay airborne
                player.vel.y = 0.0;
            }
        }

        // overlapping vertically: a wall touch
        if p_max.y > b_min.y && b_max.y > p_min.y {
            if (p_min.x - b_max.x).abs() < CONTACT_EPSILON {
                player.vel.x = 0.0;
                if block.kind == BlockKind::Jump {
                    player.on_wall = -1;
                }
            } else if (p_max.x - b_min.x).abs() < CONTACT_EPSILON {
                player.vel.x = 0.0;
                if block.kind == BlockKind::Jump {
                    player.on_wall = 1;
                }
            }
        }
    }

    // landing restores the un-divided ground acceleration
    if !was_on_ground && player.on_ground {
        player.accel.x *= AIR_ACCEL_DIVISOR;
    }
}
