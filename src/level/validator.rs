//! Level design validation
//!
//! Advisory checks run before a level is shared. Issues never block editing.

use thiserror::Error;

use super::model::{Block, LevelGoal};

/// A design problem found in a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LevelIssue {
    #[error("Level needs at least one movable block")]
    NoMovableBlocks,
    #[error("Move blocks goal needs target positions")]
    NoTargetPositions,
    #[error("Number of target positions should match number of movable blocks")]
    TargetCountMismatch { targets: usize, movable: usize },
    #[error("Some blocks are outside the game board")]
    BlocksOutOfBounds,
}

/// Collect every design issue (empty = valid)
pub fn validate_level(blocks: &[Block], goal: &LevelGoal) -> Vec<LevelIssue> {
    let mut issues = Vec::new();

    let movable = blocks.iter().filter(|b| b.is_movable()).count();
    if movable == 0 {
        issues.push(LevelIssue::NoMovableBlocks);
    }

    if let LevelGoal::MoveBlocks { target_positions } = goal {
        if target_positions.is_empty() {
            issues.push(LevelIssue::NoTargetPositions);
        } else if target_positions.len() != movable {
            issues.push(LevelIssue::TargetCountMismatch {
                targets: target_positions.len(),
                movable,
            });
        }
    }

    // One aggregate issue, however many blocks are off the board
    if blocks.iter().any(|b| !b.cell().in_bounds()) {
        issues.push(LevelIssue::BlocksOutOfBounds);
    }

    issues
}

/// Human-readable messages for a list of issues
pub fn issue_messages(issues: &[LevelIssue]) -> Vec<String> {
    issues.iter().map(ToString::to_string).collect()
}
