//! Level data model
//!
//! Everything a level is made of. The wire shape produced by serde here is the
//! one consumed by the sharing/transport layer:
//!
//! ```text
//! { id, name, description, difficulty,
//!   blocks: [{ id, x, y, z, color, kind }],
//!   goal: { type, targetPositions? | requiredPattern? | targetHeight? },
//!   author?, rating?, downloads?, createdAt? }
//! ```

use serde::{Deserialize, Serialize};

use crate::in_bounds;

/// A board cell on the (x, z) plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub z: i32,
}

impl Cell {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// True if the cell lies on the board
    #[inline]
    pub fn in_bounds(&self) -> bool {
        in_bounds(self.x, self.z)
    }
}

/// Block behavior tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// Player-movable; the only kind that counts for move/pattern goals
    #[default]
    Movable,
    /// Permanent obstacle
    Fixed,
    /// Reserved marker; legal but unused by the current goal types
    Goal,
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Movable => "movable",
            BlockKind::Fixed => "fixed",
            BlockKind::Goal => "goal",
        }
    }
}

/// A placed unit cube
///
/// Only `x`, `y`, `z` change over a block's lifetime; `id`, `color` and `kind`
/// are fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    pub x: i32,
    /// Stack layer (0 = ground)
    pub y: i32,
    pub z: i32,
    /// Display color; opaque to game logic
    pub color: String,
    #[serde(alias = "type")]
    pub kind: BlockKind,
}

impl Block {
    pub fn new(
        id: impl Into<String>,
        x: i32,
        y: i32,
        z: i32,
        color: impl Into<String>,
        kind: BlockKind,
    ) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            z,
            color: color.into(),
            kind,
        }
    }

    /// Ground-layer movable block
    pub fn movable(id: impl Into<String>, x: i32, z: i32, color: impl Into<String>) -> Self {
        Self::new(id, x, 0, z, color, BlockKind::Movable)
    }

    /// Ground-layer fixed obstacle
    pub fn fixed(id: impl Into<String>, x: i32, z: i32, color: impl Into<String>) -> Self {
        Self::new(id, x, 0, z, color, BlockKind::Fixed)
    }

    /// Column this block stands in
    #[inline]
    pub fn cell(&self) -> Cell {
        Cell::new(self.x, self.z)
    }

    #[inline]
    pub fn is_movable(&self) -> bool {
        self.kind == BlockKind::Movable
    }

    /// Same block at a new position
    pub fn moved_to(&self, x: i32, y: i32, z: i32) -> Self {
        Self {
            x,
            y,
            z,
            ..self.clone()
        }
    }
}

/// Level difficulty label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Capitalized label for display ("Easy")
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

fn default_target_height() -> u32 {
    1
}

/// Win condition of a level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LevelGoal {
    /// Movable blocks must cover exactly these cells
    MoveBlocks {
        #[serde(rename = "targetPositions", default)]
        target_positions: Vec<Cell>,
    },
    /// Canonical pattern string of the movable blocks must equal this
    PatternMatch {
        #[serde(rename = "requiredPattern", default)]
        required_pattern: String,
    },
    /// Some column must reach at least this height
    StackHeight {
        #[serde(rename = "targetHeight", default = "default_target_height")]
        target_height: u32,
    },
    /// Unrecognized goal tag; never satisfied
    #[serde(other)]
    Unknown,
}

impl Default for LevelGoal {
    fn default() -> Self {
        LevelGoal::MoveBlocks {
            target_positions: Vec::new(),
        }
    }
}

impl LevelGoal {
    /// Target cells of a `move_blocks` goal (empty for other goal types)
    pub fn target_positions(&self) -> &[Cell] {
        match self {
            LevelGoal::MoveBlocks { target_positions } => target_positions,
            _ => &[],
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            LevelGoal::MoveBlocks { .. } => "move_blocks",
            LevelGoal::PatternMatch { .. } => "pattern_match",
            LevelGoal::StackHeight { .. } => "stack_height",
            LevelGoal::Unknown => "unknown",
        }
    }
}

/// The authoring/sharing unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub blocks: Vec<Block>,
    pub goal: LevelGoal,

    // Provenance metadata; never consulted by goal evaluation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downloads: Option<u32>,
    /// Unix timestamp (ms) of the last local save
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<f64>,
}

impl Level {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        difficulty: Difficulty,
        blocks: Vec<Block>,
        goal: LevelGoal,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            difficulty,
            blocks,
            goal,
            author: None,
            rating: None,
            downloads: None,
            created_at: None,
        }
    }

    pub fn movable_blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(|b| b.is_movable())
    }

    pub fn block(&self, id: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    /// Top-most block standing in the given column
    pub fn top_block_at(&self, cell: Cell) -> Option<&Block> {
        self.blocks
            .iter()
            .filter(|b| b.cell() == cell)
            .max_by_key(|b| b.y)
    }

    /// Copy of this level with a different block set
    pub fn with_blocks(&self, blocks: Vec<Block>) -> Self {
        Self {
            blocks,
            ..self.clone()
        }
    }

    /// Copy of this level with a different goal
    pub fn with_goal(&self, goal: LevelGoal) -> Self {
        Self {
            goal,
            ..self.clone()
        }
    }

    /// True if no two blocks share an id
    pub fn has_unique_block_ids(&self) -> bool {
        let mut seen = std::collections::HashSet::new();
        self.blocks.iter().all(|b| seen.insert(b.id.as_str()))
    }
}
