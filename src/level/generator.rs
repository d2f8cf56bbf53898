//! Level generation and utilities
//!
//! Empty templates, the tutorial catalog, random levels, cloning and the
//! difficulty/statistics heuristics. All randomness comes from the caller's
//! RNG so generation is reproducible from a seed.

use std::collections::HashSet;

use rand::Rng;

use super::model::{Block, Cell, Difficulty, Level, LevelGoal};
use crate::consts::{BLOCK_PALETTE, BOARD_SIZE, OBSTACLE_COLOR};
use crate::fresh_id;

/// Generate an empty level template
pub fn empty_level(rng: &mut impl Rng) -> Level {
    Level::new(
        fresh_id("level", rng),
        "New Level",
        "A custom level waiting to be designed",
        Difficulty::Easy,
        Vec::new(),
        LevelGoal::default(),
    )
}

fn move_goal(cells: &[(i32, i32)]) -> LevelGoal {
    LevelGoal::MoveBlocks {
        target_positions: cells.iter().map(|&(x, z)| Cell::new(x, z)).collect(),
    }
}

/// Tutorial levels shown to new players
pub fn sample_levels() -> Vec<Level> {
    vec![
        Level::new(
            "tutorial-1",
            "First Steps",
            "Learn the basics - move the blue block to the goal",
            Difficulty::Easy,
            vec![Block::movable("block-1", 1, 1, "#3B82F6")],
            move_goal(&[(6, 6)]),
        ),
        Level::new(
            "tutorial-2",
            "Two Blocks",
            "Move both blocks to their matching goal areas",
            Difficulty::Easy,
            vec![
                Block::movable("block-1", 1, 1, "#3B82F6"),
                Block::movable("block-2", 2, 1, "#EF4444"),
            ],
            move_goal(&[(5, 5), (6, 5)]),
        ),
        Level::new(
            "tutorial-3",
            "Navigation Challenge",
            "Navigate around obstacles to reach the goal",
            Difficulty::Medium,
            vec![
                Block::movable("movable-1", 0, 0, "#3B82F6"),
                Block::fixed("obstacle-1", 3, 1, OBSTACLE_COLOR),
                Block::fixed("obstacle-2", 3, 2, OBSTACLE_COLOR),
                Block::fixed("obstacle-3", 3, 3, OBSTACLE_COLOR),
            ],
            move_goal(&[(7, 2)]),
        ),
        Level::new(
            "tutorial-4",
            "Color Coordination",
            "Place each colored block in its matching area",
            Difficulty::Medium,
            vec![
                Block::movable("red-block", 0, 0, "#EF4444"),
                Block::movable("blue-block", 1, 0, "#3B82F6"),
                Block::movable("green-block", 2, 0, "#10B981"),
            ],
            move_goal(&[(5, 3), (5, 4), (5, 5)]),
        ),
    ]
}

/// Inclusive block-count range for a random level
pub fn block_count_range(difficulty: Difficulty) -> (usize, usize) {
    match difficulty {
        Difficulty::Easy => (1, 3),
        Difficulty::Medium => (3, 6),
        Difficulty::Hard => (5, 10),
    }
}

/// Draw a random cell not present in any of the `taken` sets
fn random_free_cell(rng: &mut impl Rng, taken: &[&HashSet<Cell>]) -> Cell {
    loop {
        let cell = Cell::new(rng.random_range(0..BOARD_SIZE), rng.random_range(0..BOARD_SIZE));
        if !taken.iter().any(|set| set.contains(&cell)) {
            return cell;
        }
    }
}

/// Generate a random `move_blocks` level
///
/// Blocks sit at distinct ground cells; targets are distinct from each other
/// and from every block cell, one target per block.
pub fn random_level(difficulty: Difficulty, rng: &mut impl Rng) -> Level {
    let (min, max) = block_count_range(difficulty);
    let block_count = rng.random_range(min..=max);

    let mut block_cells = HashSet::with_capacity(block_count);
    let mut blocks = Vec::with_capacity(block_count);
    for i in 0..block_count {
        let cell = random_free_cell(rng, &[&block_cells]);
        block_cells.insert(cell);
        blocks.push(Block::movable(
            format!("block-{}", i),
            cell.x,
            cell.z,
            BLOCK_PALETTE[i % BLOCK_PALETTE.len()],
        ));
    }

    let mut target_cells = HashSet::with_capacity(block_count);
    let mut target_positions = Vec::with_capacity(block_count);
    for _ in 0..block_count {
        let cell = random_free_cell(rng, &[&block_cells, &target_cells]);
        target_cells.insert(cell);
        target_positions.push(cell);
    }

    log::debug!("Random {} level: {} blocks", difficulty.as_str(), block_count);

    Level::new(
        fresh_id("random", rng),
        format!("Random {} Level", difficulty.label()),
        format!(
            "A randomly generated {} level with {} blocks",
            difficulty.as_str(),
            block_count
        ),
        difficulty,
        blocks,
        LevelGoal::MoveBlocks { target_positions },
    )
}

/// Copy a level under a fresh identity
///
/// The level and every block get new ids; block ids keep the source id as a
/// prefix. Everything else is preserved. The name defaults to "Copy of ...".
pub fn clone_level(level: &Level, new_name: Option<&str>, rng: &mut impl Rng) -> Level {
    let suffix: u32 = rng.random();
    let blocks = level
        .blocks
        .iter()
        .map(|block| Block {
            id: format!("{}-clone-{:08x}", block.id, suffix),
            ..block.clone()
        })
        .collect();

    Level {
        id: fresh_id("clone", rng),
        name: new_name
            .map(str::to_string)
            .unwrap_or_else(|| format!("Copy of {}", level.name)),
        blocks,
        ..level.clone()
    }
}

/// Suggest a difficulty from movable-block and target counts
pub fn estimate_difficulty(level: &Level) -> Difficulty {
    let blocks = level.movable_blocks().count();
    let goals = level.goal.target_positions().len();

    if blocks <= 2 && goals <= 2 {
        Difficulty::Easy
    } else if blocks <= 5 && goals <= 5 {
        Difficulty::Medium
    } else {
        Difficulty::Hard
    }
}

/// Summary numbers shown alongside a level
#[derive(Debug, Clone, PartialEq)]
pub struct LevelStats {
    pub movable_blocks: usize,
    pub fixed_blocks: usize,
    pub goal_areas: usize,
    pub estimated_minutes: f64,
    /// "< 1 minute" or "~N minutes"
    pub estimated_time: String,
}

pub fn level_stats(level: &Level) -> LevelStats {
    let movable_blocks = level.movable_blocks().count();
    let fixed_blocks = level
        .blocks
        .iter()
        .filter(|b| b.kind == super::model::BlockKind::Fixed)
        .count();
    let goal_areas = level.goal.target_positions().len();

    let multiplier = match level.difficulty {
        Difficulty::Easy => 1.0,
        Difficulty::Medium => 1.5,
        Difficulty::Hard => 2.0,
    };
    let estimated_minutes = (movable_blocks as f64 * 0.5 + fixed_blocks as f64 * 0.2) * multiplier;

    let estimated_time = if estimated_minutes < 1.0 {
        "< 1 minute".to_string()
    } else {
        let minutes = estimated_minutes.ceil() as u32;
        format!("~{} minute{}", minutes, if minutes > 1 { "s" } else { "" })
    };

    LevelStats {
        movable_blocks,
        fixed_blocks,
        goal_areas,
        estimated_minutes,
        estimated_time,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::validator::validate_level;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_empty_level_template() {
        let mut rng = Pcg32::seed_from_u64(1);
        let level = empty_level(&mut rng);
        assert!(level.id.starts_with("level-"));
        assert_eq!(level.difficulty, Difficulty::Easy);
        assert!(level.blocks.is_empty());
        assert!(level.goal.target_positions().is_empty());
        assert_eq!(level.goal.type_name(), "move_blocks");
    }

    #[test]
    fn test_sample_levels_are_valid() {
        let levels = sample_levels();
        assert_eq!(levels.len(), 4);
        for level in &levels {
            assert!(
                validate_level(&level.blocks, &level.goal).is_empty(),
                "{} should validate",
                level.name
            );
            assert!(level.has_unique_block_ids());
        }
        assert_eq!(levels[0].difficulty, Difficulty::Easy);
        assert_eq!(levels[3].difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_random_level_shape_for_every_difficulty() {
        let mut rng = Pcg32::seed_from_u64(42);
        for difficulty in Difficulty::ALL {
            let (min, max) = block_count_range(difficulty);
            for _ in 0..50 {
                let level = random_level(difficulty, &mut rng);
                let n = level.blocks.len();
                assert!((min..=max).contains(&n));
                assert_eq!(level.goal.target_positions().len(), n);

                let cells: HashSet<Cell> = level.blocks.iter().map(Block::cell).collect();
                assert_eq!(cells.len(), n);
                let targets: HashSet<Cell> = level.goal.target_positions().iter().copied().collect();
                assert_eq!(targets.len(), n);
                assert!(cells.is_disjoint(&targets));
                assert!(level.blocks.iter().all(|b| b.is_movable() && b.y == 0));
                assert!(validate_level(&level.blocks, &level.goal).is_empty());
            }
        }
    }

    #[test]
    fn test_random_level_naming_and_palette() {
        let mut rng = Pcg32::seed_from_u64(3);
        let level = random_level(Difficulty::Hard, &mut rng);
        assert_eq!(level.name, "Random Hard Level");
        assert!(level.id.starts_with("random-"));
        assert_eq!(
            level.description,
            format!("A randomly generated hard level with {} blocks", level.blocks.len())
        );
        for (i, block) in level.blocks.iter().enumerate() {
            assert_eq!(block.color, BLOCK_PALETTE[i % 5]);
        }
    }

    #[test]
    fn test_random_level_is_seed_deterministic() {
        let a = random_level(Difficulty::Medium, &mut Pcg32::seed_from_u64(9));
        let b = random_level(Difficulty::Medium, &mut Pcg32::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_clone_level_fresh_identity() {
        let mut rng = Pcg32::seed_from_u64(5);
        let source = &sample_levels()[3];
        let copy = clone_level(source, None, &mut rng);

        assert_ne!(copy.id, source.id);
        assert_eq!(copy.name, "Copy of Color Coordination");
        assert_eq!(copy.goal, source.goal);
        assert_eq!(copy.blocks.len(), source.blocks.len());
        for (a, b) in source.blocks.iter().zip(&copy.blocks) {
            assert_ne!(a.id, b.id);
            assert!(b.id.starts_with(&format!("{}-clone-", a.id)));
            assert_eq!((a.x, a.y, a.z), (b.x, b.y, b.z));
            assert_eq!(a.color, b.color);
            assert_eq!(a.kind, b.kind);
        }
        assert!(copy.has_unique_block_ids());
    }

    #[test]
    fn test_clone_level_name_override() {
        let mut rng = Pcg32::seed_from_u64(5);
        let copy = clone_level(&sample_levels()[0], Some("Mine"), &mut rng);
        assert_eq!(copy.name, "Mine");
    }

    #[test]
    fn test_estimate_difficulty_thresholds() {
        let levels = sample_levels();
        assert_eq!(estimate_difficulty(&levels[1]), Difficulty::Easy);
        assert_eq!(estimate_difficulty(&levels[3]), Difficulty::Medium);

        let blocks: Vec<Block> = (0..6).map(|i| Block::movable(format!("b{}", i), i, 0, "#fff")).collect();
        let targets: Vec<(i32, i32)> = (0..6).map(|i| (i, 7)).collect();
        let mut hard = Level::new("h", "h", "", Difficulty::Easy, blocks, move_goal(&targets));
        assert_eq!(estimate_difficulty(&hard), Difficulty::Hard);

        // Target count alone can push a level up
        hard.blocks.truncate(2);
        assert_eq!(estimate_difficulty(&hard), Difficulty::Hard);
    }

    #[test]
    fn test_level_stats() {
        let levels = sample_levels();
        let stats = level_stats(&levels[2]);
        assert_eq!(stats.movable_blocks, 1);
        assert_eq!(stats.fixed_blocks, 3);
        assert_eq!(stats.goal_areas, 1);
        // (0.5 + 0.6) * 1.5 = 1.65 -> 2 minutes
        assert_eq!(stats.estimated_time, "~2 minutes");

        let stats = level_stats(&levels[0]);
        assert_eq!(stats.estimated_time, "< 1 minute");
    }

    #[test]
    fn test_level_stats_single_minute() {
        let level = Level::new(
            "l",
            "n",
            "",
            Difficulty::Easy,
            vec![Block::movable("a", 0, 0, "#fff"), Block::movable("b", 1, 0, "#fff")],
            LevelGoal::default(),
        );
        assert_eq!(level_stats(&level).estimated_time, "~1 minute");
    }
}
