use proptest::prelude::*;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use seabattle::{
    auto_place_fleet, fire, place, Board, CellState, Orientation, ShotOutcome, BB, BOARD_SIZE,
    CLASSIC_FLEET, STANDARD_FLEET, TOTAL_SHIP_CELLS,
};

fn hull(board: &Board, index: usize) -> BB {
    BB::from_iter(board.ships()[index].cells()).unwrap()
}

fn assert_apart(board: &Board) -> Result<(), TestCaseError> {
    for i in 0..board.ships().len() {
        for j in (i + 1)..board.ships().len() {
            let touching = hull(board, i).neighborhood() & hull(board, j);
            prop_assert!(touching.is_empty(), "ships {} and {} touch", i, j);
        }
    }
    Ok(())
}

/// Auto-placed standard board with a random volley of shots fired at it.
fn battered_board(seed: u64, shots: usize) -> Board {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut board = auto_place_fleet(&STANDARD_FLEET, &mut rng).unwrap();
    for _ in 0..shots {
        let r = rng.random_range(0..BOARD_SIZE);
        let c = rng.random_range(0..BOARD_SIZE);
        board = fire(&board, r, c).unwrap().board;
    }
    board
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn auto_placed_ships_never_touch(seed in any::<u64>()) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let board = auto_place_fleet(&STANDARD_FLEET, &mut rng).unwrap();
        prop_assert_eq!(board.ship_map().count_ones(), TOTAL_SHIP_CELLS);
        assert_apart(&board)?;
    }

    #[test]
    fn accepted_placements_never_touch(seed in any::<u64>()) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut board = Board::new();
        for _ in 0..200 {
            let entry = CLASSIC_FLEET.entries()[rng.random_range(0..CLASSIC_FLEET.entries().len())];
            let anchor = (rng.random_range(0..BOARD_SIZE), rng.random_range(0..BOARD_SIZE));
            let orientation = if rng.random() { Orientation::Horizontal } else { Orientation::Vertical };
            if let Ok((next, _)) = place(&board, &CLASSIC_FLEET, entry.class(), anchor, orientation) {
                board = next;
            }
        }
        prop_assert!(board.ships().len() <= CLASSIC_FLEET.ship_count());
        let cells: usize = board.ships().iter().map(|s| s.size()).sum();
        prop_assert_eq!(board.ship_map().count_ones(), cells);
        assert_apart(&board)?;
    }

    #[test]
    fn sunk_state_is_consistent(seed in any::<u64>(), shots in 0usize..150) {
        let board = battered_board(seed, shots);
        for ship in board.ships() {
            let all_sunk_cells = ship
                .cells()
                .all(|(r, c)| board.cell(r, c).unwrap().state() == CellState::Sunk);
            prop_assert_eq!(ship.is_sunk(), ship.hits() == ship.size());
            prop_assert_eq!(ship.is_sunk(), all_sunk_cells);
        }
        let struck = (0..BOARD_SIZE)
            .flat_map(|r| (0..BOARD_SIZE).map(move |c| (r, c)))
            .filter(|&(r, c)| matches!(board.cell(r, c).unwrap().state(), CellState::Hit | CellState::Sunk))
            .count();
        prop_assert_eq!(board.hits_landed(), struck);
        if board.all_ships_sunk() {
            prop_assert_eq!(board.ship_map() & !board.fired_map(), BB::new());
        }
    }

    #[test]
    fn refire_is_a_no_op(seed in any::<u64>(), shots in 0usize..80, row in 0..BOARD_SIZE, col in 0..BOARD_SIZE) {
        let board = battered_board(seed, shots);
        let first = fire(&board, row, col).unwrap();
        prop_assert_eq!(board.cell(row, col).unwrap().is_hit(), first.outcome == ShotOutcome::Repeat);
        let again = fire(&first.board, row, col).unwrap();
        prop_assert_eq!(again.outcome, ShotOutcome::Repeat);
        prop_assert!(again.ship.is_none());
        prop_assert_eq!(again.board, first.board);
    }
}
