use rand::rngs::SmallRng;
use rand::SeedableRng;
use seabattle::{
    auto_place_fleet, can_place, check_placement, is_placement_complete, place, remaining_quota,
    Board, FleetEntry, Fleet, FleetError, Orientation, PlacementError, ShipClass, BOARD_SIZE,
    CLASSIC_FLEET, MAX_PLACEMENT_ATTEMPTS, MAX_SHIPS, STANDARD_FLEET, TOTAL_SHIP_CELLS,
};

const DESTROYERS: Fleet = Fleet::new(&[FleetEntry::new(ShipClass::Destroyer, 2, 2)]);

/// More single-cell ships than a 10×10 grid can hold apart.
const CROWDED: Fleet = Fleet::new(&[FleetEntry::new(ShipClass::Submarine, 1, 26)]);

#[test]
fn test_out_of_bounds_horizontal() {
    let board = Board::new();
    assert!(!can_place(&board, 4, (5, 7), Orientation::Horizontal));
    assert_eq!(
        check_placement(&board, 4, (5, 7), Orientation::Horizontal),
        Err(PlacementError::OutOfBounds)
    );
    assert!(can_place(&board, 4, (5, 6), Orientation::Horizontal));
}

#[test]
fn test_out_of_bounds_vertical_and_anchor() {
    let board = Board::new();
    assert!(!can_place(&board, 3, (8, 0), Orientation::Vertical));
    assert!(can_place(&board, 3, (7, 0), Orientation::Vertical));
    assert!(!can_place(&board, 1, (BOARD_SIZE, 0), Orientation::Horizontal));
    assert!(!can_place(&board, 1, (0, BOARD_SIZE), Orientation::Vertical));
}

#[test]
fn test_far_off_anchor_or_huge_size_rejected() {
    let board = Board::new();
    assert!(!can_place(&board, 1, (0, usize::MAX), Orientation::Horizontal));
    assert!(!can_place(&board, 1, (usize::MAX, 0), Orientation::Vertical));
    assert!(!can_place(&board, usize::MAX, (3, 3), Orientation::Vertical));
    assert!(!can_place(&board, usize::MAX, (0, 0), Orientation::Horizontal));
    assert_eq!(
        check_placement(&board, usize::MAX, (usize::MAX, usize::MAX), Orientation::Horizontal),
        Err(PlacementError::OutOfBounds)
    );
    assert_eq!(
        place(&board, &CLASSIC_FLEET, ShipClass::Carrier, (usize::MAX, 0), Orientation::Vertical).unwrap_err(),
        PlacementError::OutOfBounds
    );
    assert!(board.ships().is_empty());
}

#[test]
fn test_overlap_and_touching_rejected() {
    let (board, _) = place(&Board::new(), &CLASSIC_FLEET, ShipClass::Battleship, (4, 2), Orientation::Horizontal).unwrap();

    assert_eq!(
        check_placement(&board, 3, (2, 3), Orientation::Vertical),
        Err(PlacementError::Overlaps)
    );
    // Side by side, one row down.
    assert_eq!(
        check_placement(&board, 2, (5, 2), Orientation::Horizontal),
        Err(PlacementError::TouchesShip)
    );
    // Diagonal corner contact.
    assert_eq!(
        check_placement(&board, 2, (5, 6), Orientation::Horizontal),
        Err(PlacementError::TouchesShip)
    );
    // End to end.
    assert_eq!(
        check_placement(&board, 2, (4, 6), Orientation::Horizontal),
        Err(PlacementError::TouchesShip)
    );
    // One empty cell of buffer is enough.
    assert!(can_place(&board, 2, (6, 2), Orientation::Horizontal));
    assert!(can_place(&board, 2, (4, 7), Orientation::Horizontal));
}

#[test]
fn test_place_leaves_input_untouched() {
    let empty = Board::new();
    let (board, id) = place(&empty, &CLASSIC_FLEET, ShipClass::Carrier, (0, 0), Orientation::Vertical).unwrap();
    assert!(empty.ships().is_empty());
    assert!(empty.ship_map().is_empty());
    assert_eq!(board.ships().len(), 1);
    assert_eq!(board.ship(id).unwrap().size(), 5);
}

#[test]
fn test_rejected_place_returns_error() {
    let (board, _) = place(&Board::new(), &CLASSIC_FLEET, ShipClass::Carrier, (0, 0), Orientation::Horizontal).unwrap();
    let err = place(&board, &CLASSIC_FLEET, ShipClass::Destroyer, (1, 1), Orientation::Horizontal).unwrap_err();
    assert_eq!(err, PlacementError::TouchesShip);
    assert_eq!(board.ships().len(), 1);
}

#[test]
fn test_fleet_quota_and_unknown_class() {
    let (board, _) = place(&Board::new(), &DESTROYERS, ShipClass::Destroyer, (0, 0), Orientation::Horizontal).unwrap();
    assert_eq!(remaining_quota(&board, &DESTROYERS, ShipClass::Destroyer), Ok(1));
    let (board, _) = place(&board, &DESTROYERS, ShipClass::Destroyer, (5, 5), Orientation::Vertical).unwrap();
    assert!(is_placement_complete(&board, &DESTROYERS));

    assert_eq!(
        place(&board, &DESTROYERS, ShipClass::Destroyer, (9, 0), Orientation::Horizontal).unwrap_err(),
        PlacementError::Fleet(FleetError::QuotaReached(ShipClass::Destroyer))
    );
    assert_eq!(
        place(&board, &DESTROYERS, ShipClass::Carrier, (9, 0), Orientation::Horizontal).unwrap_err(),
        PlacementError::Fleet(FleetError::UnknownShipType(ShipClass::Carrier))
    );
}

#[test]
fn test_auto_place_standard_fleet() {
    let mut rng = SmallRng::seed_from_u64(42);
    let board = auto_place_fleet(&STANDARD_FLEET, &mut rng).unwrap();
    assert_eq!(board.ships().len(), STANDARD_FLEET.ship_count());
    assert_eq!(board.ship_map().count_ones(), TOTAL_SHIP_CELLS);
    assert_eq!(TOTAL_SHIP_CELLS, 20);
    assert!(is_placement_complete(&board, &STANDARD_FLEET));
    for entry in STANDARD_FLEET.entries() {
        assert_eq!(remaining_quota(&board, &STANDARD_FLEET, entry.class()), Ok(0));
    }
}

#[test]
fn test_partial_fleet_is_incomplete() {
    let (board, _) = place(&Board::new(), &CLASSIC_FLEET, ShipClass::Carrier, (0, 0), Orientation::Horizontal).unwrap();
    assert!(!is_placement_complete(&board, &CLASSIC_FLEET));
    assert!(!is_placement_complete(&Board::new(), &STANDARD_FLEET));
}

#[test]
fn test_auto_place_exhausts_on_impossible_fleet() {
    let mut rng = SmallRng::seed_from_u64(7);
    let err = auto_place_fleet(&CROWDED, &mut rng).unwrap_err();
    assert_eq!(err.class, ShipClass::Submarine);
    assert_eq!(err.attempts, MAX_PLACEMENT_ATTEMPTS);
}

#[test]
fn test_fleet_validation() {
    const TOO_LONG: Fleet = Fleet::new(&[FleetEntry::new(ShipClass::Carrier, 11, 1)]);
    const TWICE: Fleet = Fleet::new(&[
        FleetEntry::new(ShipClass::Cruiser, 3, 1),
        FleetEntry::new(ShipClass::Cruiser, 2, 1),
    ]);
    const NOTHING: Fleet = Fleet::new(&[]);
    const ARMADA: Fleet = Fleet::new(&[FleetEntry::new(ShipClass::Submarine, 1, MAX_SHIPS + 1)]);

    assert_eq!(STANDARD_FLEET.validate(), Ok(()));
    assert_eq!(CLASSIC_FLEET.validate(), Ok(()));
    assert_eq!(CLASSIC_FLEET.total_cells(), 17);
    assert_eq!(
        TOO_LONG.validate(),
        Err(FleetError::InvalidSize {
            class: ShipClass::Carrier,
            size: 11
        })
    );
    assert_eq!(TWICE.validate(), Err(FleetError::DuplicateClass(ShipClass::Cruiser)));
    assert_eq!(NOTHING.validate(), Err(FleetError::Empty));
    assert_eq!(ARMADA.validate(), Err(FleetError::TooManyShips(MAX_SHIPS + 1)));
}
