//! Ship placement: validation, committing a ship, random fleet layout.

use log::{debug, error};
use rand::Rng;

use crate::board::{Board, BB};
use crate::common::{FleetError, PlacementError, PlacementExhausted};
use crate::config::{Coord, Fleet, BOARD_SIZE, MAX_PLACEMENT_ATTEMPTS};
use crate::ship::{Orientation, Ship, ShipClass, ShipId};

/// Checks a placement and reports why it is rejected. Never mutates.
pub fn check_placement(
    board: &Board,
    size: usize,
    anchor: Coord,
    orientation: Orientation,
) -> Result<(), PlacementError> {
    let (row, col) = anchor;
    if size == 0 || !Board::in_bounds(row, col) {
        return Err(PlacementError::OutOfBounds);
    }
    let room = match orientation {
        Orientation::Horizontal => BOARD_SIZE - col,
        Orientation::Vertical => BOARD_SIZE - row,
    };
    if size > room {
        return Err(PlacementError::OutOfBounds);
    }

    let target = BB::from_iter((0..size).map(|i| orientation.step(anchor, i)))
        .map_err(|_| PlacementError::OutOfBounds)?;
    let occupied = board.ship_map();
    if !(target & occupied).is_empty() {
        return Err(PlacementError::Overlaps);
    }
    for (r, c) in target.iter_set_bits() {
        if board.cell(r, c).map_or(true, |cell| cell.is_hit()) {
            return Err(PlacementError::Overlaps);
        }
    }
    if !(target.neighborhood() & occupied).is_empty() {
        return Err(PlacementError::TouchesShip);
    }
    Ok(())
}

/// True iff a `size`-long ship fits at `anchor`: in bounds, on empty
/// cells, and with no ship within one cell (diagonals included).
pub fn can_place(board: &Board, size: usize, anchor: Coord, orientation: Orientation) -> bool {
    check_placement(board, size, anchor, orientation).is_ok()
}

/// Ships of `class` still to be placed on `board`.
pub fn remaining_quota(board: &Board, fleet: &Fleet, class: ShipClass) -> Result<usize, FleetError> {
    let entry = fleet.entry(class).ok_or(FleetError::UnknownShipType(class))?;
    let placed = board.ships().iter().filter(|s| s.class() == class).count();
    Ok(entry.count().saturating_sub(placed))
}

/// Returns a copy of `board` with one more ship of `class`. The input is
/// left untouched so callers can keep it for undo.
pub fn place(
    board: &Board,
    fleet: &Fleet,
    class: ShipClass,
    anchor: Coord,
    orientation: Orientation,
) -> Result<(Board, ShipId), PlacementError> {
    let mut next = board.clone();
    let id = place_in(&mut next, fleet, class, anchor, orientation)?;
    Ok((next, id))
}

/// Mutating variant of [`place`]; the board is unchanged on error.
pub(crate) fn place_in(
    board: &mut Board,
    fleet: &Fleet,
    class: ShipClass,
    anchor: Coord,
    orientation: Orientation,
) -> Result<ShipId, PlacementError> {
    if remaining_quota(board, fleet, class)? == 0 {
        return Err(FleetError::QuotaReached(class).into());
    }
    let size = fleet
        .entry(class)
        .map(|e| e.size())
        .ok_or(FleetError::UnknownShipType(class))?;
    check_placement(board, size, anchor, orientation)?;

    let id = board
        .next_ship_id()
        .ok_or(FleetError::TooManyShips(board.ships().len() + 1))?;
    board.push_ship(Ship::new(id, class, size, anchor, orientation));
    Ok(id)
}

/// Lay out the whole fleet at random on a fresh board.
///
/// Each ship gets up to [`MAX_PLACEMENT_ATTEMPTS`] uniformly random
/// anchors and orientations; the first valid one is kept.
pub fn auto_place_fleet<R: Rng + ?Sized>(
    fleet: &Fleet,
    rng: &mut R,
) -> Result<Board, PlacementExhausted> {
    let mut board = Board::new();
    for entry in fleet.entries() {
        for _ in 0..entry.count() {
            let mut placed = false;
            for _ in 0..MAX_PLACEMENT_ATTEMPTS {
                let anchor = (
                    rng.random_range(0..BOARD_SIZE),
                    rng.random_range(0..BOARD_SIZE),
                );
                let orientation = if rng.random() {
                    Orientation::Horizontal
                } else {
                    Orientation::Vertical
                };
                if place_in(&mut board, fleet, entry.class(), anchor, orientation).is_ok() {
                    placed = true;
                    break;
                }
            }
            if !placed {
                let err = PlacementExhausted {
                    class: entry.class(),
                    attempts: MAX_PLACEMENT_ATTEMPTS,
                };
                error!("auto-placement failed: {}", err);
                return Err(err);
            }
        }
    }
    debug!("auto-placed {} ships", board.ships().len());
    Ok(board)
}

/// True once every ship in the fleet table is on the board.
pub fn is_placement_complete(board: &Board, fleet: &Fleet) -> bool {
    board.ships().len() == fleet.ship_count()
}
