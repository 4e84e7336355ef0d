//! Level schema and block geometry
//!
//! A level file is a JSON document of [`BlockRecord`]s plus start/end cells
//! and the starting color phase. Loading derives each block's world-space
//! [`PolyView`] exactly once: the record's facing becomes a rotation about
//! the shape's corner origin plus a translation that keeps the rotated shape
//! aligned to its grid cell. Levels are immutable during gameplay; only the
//! (out-of-scope) editor writes them.

use std::fs;
use std::path::Path;

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cell_origin;
use crate::consts::{BLOCK_SIZE, MAP_HEIGHT, MAP_WIDTH};
use crate::sim::polygon::{PolyView, ShapeSet};

/// Block behavior tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// Plain solid block
    Normal,
    /// Solid block whose sides allow wall jumps
    Jump,
    /// Lethal except on its flat base edge
    Spike,
    /// Marks the level's start cell; never collides
    SpawnAnchor,
    /// Marks the level's end cell; never collides
    EndAnchor,
}

/// Color-phase tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockColor {
    Blue,
    Red,
    /// Solid in both phases
    Neutral,
    /// Anchors only; never solid
    NoColor,
}

impl BlockColor {
    /// Blue or red (the phase-switchable colors)
    #[inline]
    pub fn is_phase(self) -> bool {
        matches!(self, BlockColor::Blue | BlockColor::Red)
    }

    /// The phase color that is solid when `is_blue`
    #[inline]
    pub fn active_phase(is_blue: bool) -> Self {
        if is_blue { BlockColor::Blue } else { BlockColor::Red }
    }

    /// Whether a block of this color is solid in the given phase
    #[inline]
    pub fn is_active(self, is_blue: bool) -> bool {
        match self {
            BlockColor::Neutral => true,
            BlockColor::Blue => is_blue,
            BlockColor::Red => !is_blue,
            BlockColor::NoColor => false,
        }
    }
}

/// Which way a block faces; encoded in the derived view as a rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    #[default]
    Up,
    Right,
    Down,
    Left,
}

impl Facing {
    /// CCW rotation for this facing
    pub fn angle(self) -> f32 {
        use std::f32::consts::{FRAC_PI_2, PI};
        match self {
            Facing::Up => 0.0,
            Facing::Left => FRAC_PI_2,
            Facing::Down => PI,
            Facing::Right => 3.0 * FRAC_PI_2,
        }
    }

    /// Recover a facing from a view angle; anything non-cardinal is treated
    /// as `Up` (the documented fallback for malformed spike orientations).
    pub fn from_angle(angle: f32) -> Self {
        use std::f32::consts::{FRAC_PI_2, PI};
        if angle == FRAC_PI_2 {
            Facing::Left
        } else if angle == PI {
            Facing::Down
        } else if angle == 3.0 * FRAC_PI_2 {
            Facing::Right
        } else {
            Facing::Up
        }
    }

    /// Translation that keeps a corner-origin shape rotated by `angle()`
    /// inside its grid cell
    fn cell_align(self) -> Vec2 {
        match self {
            Facing::Up => Vec2::new(0.0, 0.0),
            Facing::Left => Vec2::new(BLOCK_SIZE, 0.0),
            Facing::Down => Vec2::new(BLOCK_SIZE, BLOCK_SIZE),
            Facing::Right => Vec2::new(0.0, BLOCK_SIZE),
        }
    }
}

/// One row of the level schema, as the file layer supplies it
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BlockRecord {
    pub grid: IVec2,
    pub kind: BlockKind,
    pub color: BlockColor,
    #[serde(default)]
    pub facing: Facing,
}

/// A level as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelData {
    pub blocks: Vec<BlockRecord>,
    pub start: IVec2,
    pub end: IVec2,
    pub blue_starts: bool,
}

impl LevelData {
    /// The default bordered room used when no levels can be loaded
    pub fn fallback() -> Self {
        let mut blocks = Vec::new();
        for x in 0..MAP_WIDTH {
            for y in [0, MAP_HEIGHT - 1] {
                blocks.push(BlockRecord {
                    grid: IVec2::new(x, y),
                    kind: BlockKind::Normal,
                    color: BlockColor::Neutral,
                    facing: Facing::Up,
                });
            }
        }
        for y in 1..MAP_HEIGHT - 1 {
            for x in [0, MAP_WIDTH - 1] {
                blocks.push(BlockRecord {
                    grid: IVec2::new(x, y),
                    kind: BlockKind::Normal,
                    color: BlockColor::Neutral,
                    facing: Facing::Up,
                });
            }
        }
        Self {
            blocks,
            start: IVec2::new(1, 1),
            end: IVec2::new(MAP_WIDTH - 2, 1),
            blue_starts: true,
        }
    }

    pub fn from_reader(reader: impl std::io::Read) -> Result<Self, LevelError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn to_writer(&self, writer: impl std::io::Write) -> Result<(), LevelError> {
        Ok(serde_json::to_writer_pretty(writer, self)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        Self::from_reader(fs::File::open(path)?)
    }
}

/// Level loading failure
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level file I/O: {0}")]
    Io(#[from] std::io::Error),
    #[error("level file parse: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A placed block with its derived world-space geometry
#[derive(Debug, Clone, Copy)]
pub struct Block<'p> {
    pub view: PolyView<'p>,
    pub kind: BlockKind,
    pub color: BlockColor,
}

impl<'p> Block<'p> {
    /// Derive the block's view from its record. Spikes use the triangle at
    /// half cell height; everything else fills the cell with the square.
    pub fn build(record: &BlockRecord, shapes: &'p ShapeSet) -> Self {
        let (poly, scale) = if record.kind == BlockKind::Spike {
            (&shapes.triangle, Vec2::new(BLOCK_SIZE, BLOCK_SIZE / 2.0))
        } else {
            (&shapes.square, Vec2::splat(BLOCK_SIZE))
        };

        let (color, facing) = match record.kind {
            // anchors are markers: no phase color, no rotation
            BlockKind::SpawnAnchor | BlockKind::EndAnchor => (BlockColor::NoColor, Facing::Up),
            _ => (record.color, record.facing),
        };

        let offset = cell_origin(record.grid) + facing.cell_align();
        Self {
            view: PolyView::new(poly, offset, scale, facing.angle()),
            kind: record.kind,
            color,
        }
    }

    /// Facing recovered from the view angle
    pub fn facing(&self) -> Facing {
        Facing::from_angle(self.view.angle)
    }

    /// Outward normal of a spike's flat base edge. The base is the side the
    /// spike is mounted on, so the normal points away from the tip's cell.
    pub fn base_normal(&self) -> Vec2 {
        match self.facing() {
            Facing::Up => Vec2::new(0.0, -1.0),
            Facing::Left => Vec2::new(1.0, 0.0),
            Facing::Down => Vec2::new(0.0, 1.0),
            Facing::Right => Vec2::new(-1.0, 0.0),
        }
    }
}

/// Immutable runtime level geometry
#[derive(Debug, Clone)]
pub struct Level<'p> {
    pub blocks: Vec<Block<'p>>,
    pub start: IVec2,
    pub end: IVec2,
    pub blue_starts: bool,
}

impl<'p> Level<'p> {
    /// Derive all block geometry. Records sitting on the start or end cell
    /// are dropped so the player never spawns or finishes inside a block.
    pub fn build(data: &LevelData, shapes: &'p ShapeSet) -> Self {
        let blocks = data
            .blocks
            .iter()
            .filter(|r| r.grid != data.start && r.grid != data.end)
            .map(|r| Block::build(r, shapes))
            .collect();
        Self {
            blocks,
            start: data.start,
            end: data.end,
            blue_starts: data.blue_starts,
        }
    }
}

/// Load levels from a single `.json` file or from a directory of files named
/// `<anything>_<n>.json`, ordered by `n`. Unreadable entries are logged and
/// skipped; an empty result falls back to the default room.
pub fn load_levels(path: impl AsRef<Path>) -> Vec<LevelData> {
    let path = path.as_ref();
    let mut levels = Vec::new();

    if path.is_file() {
        match LevelData::from_path(path) {
            Ok(level) => levels.push(level),
            Err(e) => log::warn!("couldn't read level {}: {}", path.display(), e),
        }
    } else if path.is_dir() {
        let mut indexed: Vec<(u32, LevelData)> = Vec::new();
        let entries = match fs::read_dir(path) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("couldn't scan level directory {}: {}", path.display(), e);
                return vec![LevelData::fallback()];
            }
        };
        for entry in entries.flatten() {
            let entry_path = entry.path();
            let Some(index) = level_index(&entry_path) else {
                continue;
            };
            match LevelData::from_path(&entry_path) {
                Ok(level) => indexed.push((index, level)),
                Err(e) => log::warn!("couldn't read level {}: {}", entry_path.display(), e),
            }
        }
        indexed.sort_by_key(|(i, _)| *i);
        levels.extend(indexed.into_iter().map(|(_, l)| l));
    }

    if levels.is_empty() {
        log::info!("no levels loaded from {}, using fallback", path.display());
        levels.push(LevelData::fallback());
    } else {
        log::info!("loaded {} level(s) from {}", levels.len(), path.display());
    }
    levels
}

/// Parse the `_<n>` ordering suffix of a level file name
fn level_index(path: &Path) -> Option<u32> {
    if path.extension()? != "json" {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    stem.rsplit_once('_')?.1.parse().ok()
}
