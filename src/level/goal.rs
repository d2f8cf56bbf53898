//! Goal evaluation
//!
//! Pure functions deciding whether a block set satisfies a level goal. Safe to
//! call every frame: no allocation beyond small scratch maps, no logging.

use std::collections::HashMap;

use super::model::{Block, Cell, LevelGoal};
use crate::in_bounds;

/// Check if the blocks satisfy the goal
pub fn is_goal_satisfied(blocks: &[Block], goal: &LevelGoal) -> bool {
    match goal {
        LevelGoal::MoveBlocks { target_positions } => move_blocks_satisfied(blocks, target_positions),
        LevelGoal::PatternMatch { required_pattern } => pattern_string(blocks) == *required_pattern,
        LevelGoal::StackHeight { target_height } => max_stack_height(blocks) >= required_height(*target_height),
        LevelGoal::Unknown => false,
    }
}

/// Stack target actually enforced; an unset (zero) height means 1
fn required_height(target_height: u32) -> u32 {
    target_height.max(1)
}

/// Every target covered by a movable block, and exactly as many movable blocks
/// as targets. An empty target list is an unset goal, never satisfied.
fn move_blocks_satisfied(blocks: &[Block], targets: &[Cell]) -> bool {
    if targets.is_empty() {
        return false;
    }

    let movable: Vec<Cell> = blocks.iter().filter(|b| b.is_movable()).map(Block::cell).collect();
    if movable.len() != targets.len() {
        return false;
    }

    targets.iter().all(|target| movable.contains(target))
}

/// Canonical pattern string of the movable blocks
///
/// `"x,z,y"` triples sorted by x, then z, then y, joined with `;`.
pub fn pattern_string(blocks: &[Block]) -> String {
    let mut coords: Vec<(i32, i32, i32)> = blocks
        .iter()
        .filter(|b| b.is_movable())
        .map(|b| (b.x, b.z, b.y))
        .collect();
    coords.sort_unstable();

    coords
        .iter()
        .map(|(x, z, y)| format!("{},{},{}", x, z, y))
        .collect::<Vec<_>>()
        .join(";")
}

/// Height of each occupied column: the highest `y + 1` among all blocks in it
pub fn column_heights(blocks: &[Block]) -> HashMap<Cell, u32> {
    let mut heights: HashMap<Cell, u32> = HashMap::new();
    for block in blocks {
        let height = block.y.saturating_add(1).max(0) as u32;
        let entry = heights.entry(block.cell()).or_insert(0);
        *entry = (*entry).max(height);
    }
    heights
}

/// Tallest column on the board (0 when there are no blocks)
pub fn max_stack_height(blocks: &[Block]) -> u32 {
    column_heights(blocks).into_values().max().unwrap_or(0)
}

/// Advisory text nudging the player toward the goal
pub fn generate_hint(blocks: &[Block], goal: &LevelGoal) -> String {
    match goal {
        LevelGoal::MoveBlocks { target_positions } => {
            if let Some(target) = target_positions.first() {
                let unplaced = blocks
                    .iter()
                    .filter(|b| b.is_movable())
                    .find(|b| !target_positions.contains(&b.cell()));
                if let Some(block) = unplaced {
                    return format!(
                        "Try moving the block at ({}, {}) to the green area at ({}, {})",
                        block.x, block.z, target.x, target.z
                    );
                }
            }
            "Move all blocks to the green goal areas".to_string()
        }
        LevelGoal::PatternMatch { .. } => "Arrange the blocks to match the required pattern".to_string(),
        LevelGoal::StackHeight { target_height } => {
            format!("Stack blocks to reach a height of {}", required_height(*target_height))
        }
        LevelGoal::Unknown => "Complete the level objective".to_string(),
    }
}

/// Check if a block may move to (x, y, z)
///
/// The destination must be on the board and not held by any other block.
/// Height is unbounded.
pub fn is_valid_move(blocks: &[Block], block_id: &str, new_x: i32, new_z: i32, new_y: i32) -> bool {
    if !in_bounds(new_x, new_z) {
        return false;
    }

    !blocks
        .iter()
        .filter(|b| b.id != block_id)
        .any(|b| b.x == new_x && b.y == new_y && b.z == new_z)
}
