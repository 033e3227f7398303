use seabattle::{
    fire, place, BitBoard, Board, CellState, FleetEntry, Fleet, Orientation, ShipClass,
    BOARD_SIZE, CLASSIC_FLEET,
};

const PAIR: Fleet = Fleet::new(&[
    FleetEntry::new(ShipClass::Destroyer, 2, 1),
    FleetEntry::new(ShipClass::Submarine, 1, 1),
]);

#[test]
fn test_new_board_is_empty() {
    let board = Board::new();
    assert!(board.ships().is_empty());
    for r in 0..BOARD_SIZE {
        for c in 0..BOARD_SIZE {
            let cell = board.cell(r, c).unwrap();
            assert_eq!(cell.state(), CellState::Empty);
            assert_eq!(cell.ship_id(), None);
            assert!(!cell.is_hit());
        }
    }
    assert!(board.ship_map().is_empty());
    assert!(board.fired_map().is_empty());
    assert!(!board.all_cells_exhausted());
}

#[test]
fn test_cell_out_of_bounds() {
    let board = Board::new();
    assert!(board.cell(BOARD_SIZE, 0).is_none());
    assert!(board.cell(0, BOARD_SIZE).is_none());
}

#[test]
fn test_ship_accessors_after_place() {
    let (board, id) = place(
        &Board::new(),
        &CLASSIC_FLEET,
        ShipClass::Cruiser,
        (3, 4),
        Orientation::Vertical,
    )
    .unwrap();
    let ship = board.ship(id).unwrap();
    assert_eq!(ship.class(), ShipClass::Cruiser);
    assert_eq!(ship.size(), 3);
    assert_eq!(ship.anchor(), (3, 4));
    assert_eq!(ship.cells().collect::<Vec<_>>(), vec![(3, 4), (4, 4), (5, 4)]);
    for (r, c) in ship.cells() {
        let cell = board.cell(r, c).unwrap();
        assert_eq!(cell.state(), CellState::Ship);
        assert_eq!(cell.ship_id(), Some(id));
    }
    assert_eq!(board.ship_map().count_ones(), 3);
}

#[test]
fn test_stats_track_hits_and_sinks() {
    let (board, _) = place(&Board::new(), &PAIR, ShipClass::Destroyer, (0, 0), Orientation::Horizontal).unwrap();
    let (board, _) = place(&board, &PAIR, ShipClass::Submarine, (5, 5), Orientation::Horizontal).unwrap();

    let board = fire(&board, 0, 0).unwrap().board;
    let board = fire(&board, 5, 5).unwrap().board;
    let stats = board.stats();
    assert_eq!(stats.total_ships, 2);
    assert_eq!(stats.sunk_ships, 1);
    assert_eq!(stats.remaining_ships, 1);
    assert_eq!(stats.total_hits, 2);
    assert_eq!(stats.total_cells, 3);
    assert_eq!(board.hits_landed(), 2);
    assert!(!board.all_ships_sunk());
}

#[test]
fn test_view_hides_ships_unless_revealed() {
    let (board, _) = place(&Board::new(), &PAIR, ShipClass::Submarine, (0, 0), Orientation::Horizontal).unwrap();
    let hidden = board.view(false).to_string();
    let revealed = board.view(true).to_string();
    assert_eq!(hidden.lines().count(), BOARD_SIZE + 1);
    assert!(!hidden.contains('■'));
    assert!(revealed.contains('■'));

    let sunk = fire(&board, 0, 0).unwrap().board;
    let shown = sunk.view(false).to_string();
    assert!(shown.contains('█'));
    assert_eq!(shown.matches('○').count(), 3);
}

#[test]
fn test_bitboard_neighborhood_clips_at_edges() {
    let corner = BitBoard::<u128, 10>::from_iter([(0, 0)]).unwrap();
    assert_eq!(corner.neighborhood().count_ones(), 4);

    let middle = BitBoard::<u128, 10>::from_iter([(5, 5)]).unwrap();
    assert_eq!(middle.neighborhood().count_ones(), 9);

    let bar = BitBoard::<u128, 10>::from_iter([(9, 3), (9, 4), (9, 5)]).unwrap();
    let ring = bar.neighborhood() & !bar;
    assert_eq!(ring.count_ones(), 7);
    assert!(!ring.contains(9, 4));
}
