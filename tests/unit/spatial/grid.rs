//! Tests for grid storage, initialization, swapping, clearing and the event journal

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tilematch::GameError;
    use tilematch::algorithm::matching::MatchDetector;
    use tilematch::spatial::{Grid, GridEvent, Position};

    fn layout() -> Grid {
        Grid::from_rows(&[[0, 1, 2], [3, 4, 0], [1, 2, 3]]).expect("valid layout")
    }

    // Tests a new grid is empty and uninitialized
    // Verified by marking new grids as initialized
    #[test]
    fn test_new_grid_is_empty() {
        let grid = Grid::new(4, 3);

        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 3);
        assert!(!grid.is_initialized());
        assert_eq!(grid.tile_count(), 0);
        assert_eq!(grid.holes().len(), 12);
    }

    // Tests initialization fills every cell with in-range types and unique handles
    // Verified by skipping the last row during the fill
    #[test]
    fn test_initialize_fills_every_cell() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut grid = Grid::new(6, 5);
        grid.initialize(4, &mut rng).expect("non-zero type count");

        assert!(grid.is_initialized());
        assert_eq!(grid.tile_count(), 30);
        assert!(grid.holes().is_empty());
        assert!(grid.tiles().all(|tile| tile.kind() < 4));
        assert!(grid.check_integrity());
    }

    // Tests identical seeds produce identical boards
    // Verified by seeding from entropy
    #[test]
    fn test_initialize_is_deterministic() {
        let mut first = Grid::new(8, 8);
        let mut second = Grid::new(8, 8);
        first
            .initialize(5, &mut StdRng::seed_from_u64(99))
            .expect("non-zero type count");
        second
            .initialize(5, &mut StdRng::seed_from_u64(99))
            .expect("non-zero type count");

        assert_eq!(first.kind_rows(), second.kind_rows());
    }

    // Tests zero tile types are rejected
    // Verified by removing the type count check
    #[test]
    fn test_initialize_rejects_zero_types() {
        let mut grid = Grid::new(3, 3);
        let result = grid.initialize(0, &mut StdRng::seed_from_u64(1));

        assert!(matches!(
            result,
            Err(GameError::InvalidParameter {
                parameter: "type_count",
                ..
            })
        ));
        assert!(!grid.is_initialized());
    }

    // Tests the match-free fill leaves no qualifying run across many seeds
    // Verified by ignoring tiles below the current cell
    #[test]
    fn test_initialize_without_matches() {
        let detector = MatchDetector::default();
        for seed in 0..20 {
            let mut grid = Grid::new(8, 8);
            grid.initialize_without_matches(3, 3, &mut StdRng::seed_from_u64(seed))
                .expect("non-zero type count");

            assert_eq!(grid.tile_count(), 64);
            assert!(!detector.has_matches(&grid).expect("initialized"), "seed {seed}");
        }
    }

    // Tests layouts map rows to y and columns to x
    // Verified by transposing the layout
    #[test]
    fn test_from_rows_orientation() {
        let grid = layout();

        assert!(grid.is_initialized());
        assert_eq!(grid.get(0, 0).map(|tile| tile.kind()), Some(0));
        assert_eq!(grid.get(2, 0).map(|tile| tile.kind()), Some(2));
        assert_eq!(grid.get(0, 1).map(|tile| tile.kind()), Some(3));
        assert_eq!(grid.get(1, 2).map(|tile| tile.kind()), Some(2));
        assert_eq!(
            grid.kind_rows(),
            vec![
                vec![Some(0), Some(1), Some(2)],
                vec![Some(3), Some(4), Some(0)],
                vec![Some(1), Some(2), Some(3)],
            ]
        );
    }

    // Tests empty and ragged layouts are rejected
    // Verified by padding short rows
    #[test]
    fn test_from_rows_rejects_bad_layouts() {
        let empty: [[usize; 0]; 0] = [];
        assert!(Grid::from_rows(&empty).is_err());

        let ragged: Vec<Vec<usize>> = vec![vec![0, 1, 2], vec![0, 1]];
        assert!(matches!(
            Grid::from_rows(&ragged),
            Err(GameError::InvalidParameter { parameter: "rows", .. })
        ));
    }

    // Tests out-of-bounds reads return nothing
    // Verified by clamping coordinates into the board
    #[test]
    fn test_bounds_checking() {
        let grid = layout();

        assert!(grid.is_valid_position(2, 2));
        assert!(!grid.is_valid_position(-1, 0));
        assert!(!grid.is_valid_position(3, 0));
        assert!(!grid.is_valid_position(0, 3));
        assert!(grid.get(-1, -1).is_none());
        assert!(grid.get(0, 3).is_none());
    }

    // Tests swapping exchanges cells and updates recorded positions together
    // Verified by leaving the tiles' positions unchanged
    #[test]
    fn test_swap_positions() {
        let mut grid = layout();
        let _ = grid.drain_events();
        let a = *grid.get(0, 0).expect("occupied");
        let b = *grid.get(1, 0).expect("occupied");

        assert!(grid.swap_positions(a.position(), b.position()));

        let moved_a = grid.find(a.id()).expect("still on the board");
        let moved_b = grid.find(b.id()).expect("still on the board");
        assert_eq!(moved_a.position(), Position::new(1, 0));
        assert_eq!(moved_b.position(), Position::new(0, 0));
        assert_eq!(grid.get(0, 0).map(|tile| tile.kind()), Some(1));
        assert!(grid.check_integrity());
        assert_eq!(
            grid.drain_events(),
            vec![
                GridEvent::TileMoved {
                    id: a.id(),
                    from: Position::new(0, 0),
                    to: Position::new(1, 0),
                },
                GridEvent::TileMoved {
                    id: b.id(),
                    from: Position::new(1, 0),
                    to: Position::new(0, 0),
                },
            ]
        );
    }

    // Tests swaps involving the same cell, empty cells or off-board cells are refused
    // Verified by swapping with a missing tile
    #[test]
    fn test_swap_refusals() {
        let mut grid = layout();
        let tile = *grid.get(1, 1).expect("occupied");
        let _ = grid.drain_events();

        assert!(!grid.swap_positions(Position::new(1, 1), Position::new(1, 1)));
        assert!(!grid.swap_positions(Position::new(2, 2), Position::new(3, 2)));
        assert!(!grid.swap(tile.id(), tile.id()));

        let _ = grid.clear([&tile]);
        let _ = grid.drain_events();
        assert!(!grid.swap_positions(Position::new(1, 1), Position::new(1, 2)));
        assert!(grid.drain_events().is_empty());
    }

    // Tests swapping by handle follows tiles that already moved
    // Verified by resolving handles against their original cells
    #[test]
    fn test_swap_by_handle() {
        let mut grid = layout();
        let a = grid.get(0, 0).expect("occupied").id();
        let b = grid.get(2, 2).expect("occupied").id();

        assert!(grid.swap(a, b));
        assert_eq!(grid.find(a).map(|tile| tile.position()), Some(Position::new(2, 2)));
        assert!(grid.swap(a, b));
        assert_eq!(grid.find(a).map(|tile| tile.position()), Some(Position::new(0, 0)));
    }

    // Tests clearing ignores snapshots whose cell now holds another tile
    // Verified by clearing by position alone
    #[test]
    fn test_clear_ignores_stale_snapshots() {
        let mut grid = layout();
        let stale = *grid.get(0, 0).expect("occupied");
        let neighbor = *grid.get(1, 0).expect("occupied");
        assert!(grid.swap_positions(stale.position(), neighbor.position()));

        assert_eq!(grid.clear([&stale]), 0);
        assert_eq!(grid.tile_count(), 9);

        let current = *grid.get(0, 0).expect("occupied");
        assert_eq!(grid.clear([&current, &current]), 1);
        assert_eq!(grid.holes(), vec![Position::new(0, 0)]);
    }

    // Tests spawning and moving only target empty cells
    // Verified by allowing spawns over existing tiles
    #[test]
    fn test_spawn_and_move() {
        let mut grid = layout();
        let top = *grid.get(0, 2).expect("occupied");
        assert!(grid.spawn(Position::new(0, 2), 4).is_none());

        let _ = grid.clear([&top]);
        assert!(!grid.move_tile(Position::new(0, 0), Position::new(0, 1)));
        assert!(grid.move_tile(Position::new(0, 1), Position::new(0, 2)));

        let spawned = grid.spawn(Position::new(0, 1), 4).expect("cell is empty");
        assert_eq!(grid.get(0, 1).map(|tile| tile.id()), Some(spawned));
        assert!(grid.spawn(Position::new(5, 5), 4).is_none());
        assert!(grid.check_integrity());
    }

    // Tests a single selection flag is tracked and journaled
    // Verified by journaling unchanged flags
    #[test]
    fn test_selection_flags() {
        let mut grid = layout();
        let id = grid.get(1, 1).expect("occupied").id();
        let _ = grid.drain_events();

        assert!(grid.set_selected(id, true));
        assert!(grid.set_selected(id, true));
        assert_eq!(grid.selected().map(|tile| tile.id()), Some(id));

        grid.clear_selection();
        assert!(grid.selected().is_none());
        assert_eq!(
            grid.drain_events(),
            vec![
                GridEvent::SelectionChanged { id, selected: true },
                GridEvent::SelectionChanged {
                    id,
                    selected: false
                },
            ]
        );
    }

    // Tests the text rendering puts the top row first and marks holes
    // Verified by rendering row 0 first
    #[test]
    fn test_display() {
        let mut grid = Grid::from_rows(&[[0, 1], [2, 11]]).expect("valid layout");
        let corner = *grid.get(0, 0).expect("occupied");
        let _ = grid.clear([&corner]);

        assert_eq!(grid.to_string(), "2b\n.1\n");
    }

    // Tests detached copies mirror the board but record nothing
    // Verified by cloning the journal into the copy
    #[test]
    fn test_detached_copy_records_nothing() {
        let mut grid = Grid::from_rows(&[[0, 1], [2, 3]]).expect("valid layout");
        assert_eq!(grid.drain_events().len(), 4);
        assert!(grid.swap_positions(Position::new(0, 0), Position::new(1, 0)));
        assert_eq!(grid.pending_events(), 2);

        let mut copy = grid.detached();
        assert!(grid.is_recording());
        assert!(!copy.is_recording());
        assert_eq!(copy.kind_rows(), grid.kind_rows());
        assert_eq!(copy.pending_events(), 0);

        assert!(copy.swap_positions(Position::new(0, 0), Position::new(0, 1)));
        let corner = *copy.get(1, 1).expect("occupied");
        assert_eq!(copy.clear([&corner]), 1);
        assert!(copy.drain_events().is_empty());
        assert_eq!(grid.pending_events(), 2);
    }
}
