//! Property tests for the level core
//!
//! Goal evaluation, generation and identity rules over arbitrary boards.

use std::collections::HashSet;

use creative_blocks::level::{
    Block, BlockKind, Cell, Difficulty, Level, LevelGoal, clone_level, export_level, import_level,
    is_goal_satisfied, is_valid_move, pattern_string, random_level, validate_level,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

fn kind_strategy() -> impl Strategy<Value = BlockKind> {
    prop_oneof![
        Just(BlockKind::Movable),
        Just(BlockKind::Fixed),
        Just(BlockKind::Goal)
    ]
}

/// Blocks with unique ids anywhere on the board, up to 4 layers high
fn blocks_strategy() -> impl Strategy<Value = Vec<Block>> {
    prop::collection::vec((0..8i32, 0..4i32, 0..8i32, kind_strategy()), 0..12).prop_map(|coords| {
        coords
            .into_iter()
            .enumerate()
            .map(|(i, (x, y, z, kind))| Block::new(format!("block-{}", i), x, y, z, "#3B82F6", kind))
            .collect()
    })
}

fn level_strategy() -> impl Strategy<Value = Level> {
    (
        blocks_strategy(),
        prop::collection::vec((0..8i32, 0..8i32), 0..6),
        prop::option::of("[a-zA-Z ]{1,12}"),
        prop::option::of(0u8..=10),
        prop::option::of(0u32..10_000),
    )
        .prop_map(|(blocks, targets, author, half_stars, downloads)| {
            let mut level = Level::new(
                "source-level",
                "Shared Level",
                "Made in the editor",
                Difficulty::Medium,
                blocks,
                LevelGoal::MoveBlocks {
                    target_positions: targets.into_iter().map(|(x, z)| Cell::new(x, z)).collect(),
                },
            );
            level.author = author;
            level.rating = half_stars.map(|h| h as f64 / 2.0);
            level.downloads = downloads;
            level.created_at = Some(1_700_000_000_000.0);
            level
        })
}

proptest! {
    /// Property: Pattern string doesn't depend on block order
    #[test]
    fn pattern_is_order_independent(blocks in blocks_strategy(), seed in any::<u64>()) {
        use rand::seq::SliceRandom;

        let mut shuffled = blocks.clone();
        shuffled.shuffle(&mut Pcg32::seed_from_u64(seed));
        prop_assert_eq!(pattern_string(&blocks), pattern_string(&shuffled));
    }

    /// Property: A board always matches its own pattern
    #[test]
    fn board_matches_own_pattern(blocks in blocks_strategy()) {
        let goal = LevelGoal::PatternMatch { required_pattern: pattern_string(&blocks) };
        prop_assert!(is_goal_satisfied(&blocks, &goal));
    }

    /// Property: move_blocks holds iff movable cells cover the targets with equal counts
    #[test]
    fn move_blocks_matches_set_semantics(
        blocks in blocks_strategy(),
        targets in prop::collection::hash_set((0..8i32, 0..8i32), 0..6),
    ) {
        let targets: Vec<Cell> = targets.into_iter().map(|(x, z)| Cell::new(x, z)).collect();
        let movable: Vec<Cell> = blocks.iter().filter(|b| b.is_movable()).map(Block::cell).collect();
        let movable_set: HashSet<Cell> = movable.iter().copied().collect();

        let expected = !targets.is_empty()
            && movable.len() == targets.len()
            && targets.iter().all(|t| movable_set.contains(t));

        let goal = LevelGoal::MoveBlocks { target_positions: targets };
        prop_assert_eq!(is_goal_satisfied(&blocks, &goal), expected);
    }

    /// Property: Moves off the board are always rejected
    #[test]
    fn off_board_moves_rejected(blocks in blocks_strategy(), x in -3..11i32, z in -3..11i32) {
        prop_assume!(!(0..8).contains(&x) || !(0..8).contains(&z));
        prop_assert!(!is_valid_move(&blocks, "block-0", x, z, 0));
    }

    /// Property: Hard random levels have 5-10 distinct blocks and disjoint targets
    #[test]
    fn hard_random_level_shape(seed in any::<u64>()) {
        let level = random_level(Difficulty::Hard, &mut Pcg32::seed_from_u64(seed));
        let n = level.blocks.len();
        prop_assert!((5..=10).contains(&n));

        let cells: HashSet<Cell> = level.blocks.iter().map(Block::cell).collect();
        let targets: HashSet<Cell> = level.goal.target_positions().iter().copied().collect();
        prop_assert_eq!(cells.len(), n);
        prop_assert_eq!(targets.len(), n);
        prop_assert!(cells.is_disjoint(&targets));
        prop_assert!(validate_level(&level.blocks, &level.goal).is_empty());
    }

    /// Property: Import after export changes only the id
    #[test]
    fn import_export_refreshes_only_id(level in level_strategy(), seed in any::<u64>()) {
        let text = export_level(&level).unwrap();
        let imported = import_level(&text, &mut Pcg32::seed_from_u64(seed)).unwrap();

        prop_assert_ne!(&imported.id, &level.id);
        prop_assert_eq!(Level { id: level.id.clone(), ..imported }, level);
    }

    /// Property: Clones never share level or block identity with the source
    #[test]
    fn clone_refreshes_all_ids(level in level_strategy(), seed in any::<u64>()) {
        let copy = clone_level(&level, None, &mut Pcg32::seed_from_u64(seed));

        prop_assert_ne!(&copy.id, &level.id);
        prop_assert_eq!(copy.blocks.len(), level.blocks.len());
        for (a, b) in level.blocks.iter().zip(&copy.blocks) {
            prop_assert_ne!(&a.id, &b.id);
            prop_assert_eq!((a.x, a.y, a.z), (b.x, b.y, b.z));
            prop_assert_eq!(&a.color, &b.color);
            prop_assert_eq!(a.kind, b.kind);
        }
    }

    /// Property: Arbitrary text never panics the importer
    #[test]
    fn arbitrary_text_doesnt_crash_import(text in ".{0,200}") {
        let _result = import_level(&text, &mut Pcg32::seed_from_u64(0));
        // No panic = success
    }
}
