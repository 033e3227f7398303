//! Shot resolution against a board.

use log::debug;

use crate::board::{Board, CellState, BB};
use crate::common::ShotError;
use crate::ship::Ship;

/// What a shot did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "lowercase"))]
pub enum ShotOutcome {
    Miss,
    /// Ship hit but still afloat.
    Hit,
    /// Ship hit and sunk.
    Sunk,
    /// The cell was already fired upon; nothing changed.
    Repeat,
}

impl ShotOutcome {
    #[inline]
    pub fn is_hit(self) -> bool {
        matches!(self, ShotOutcome::Hit | ShotOutcome::Sunk)
    }

    #[inline]
    pub fn is_sunk(self) -> bool {
        self == ShotOutcome::Sunk
    }
}

/// Result of [`fire`]: the outcome, the ship involved and the new board.
#[derive(Debug, Clone)]
pub struct Shot {
    pub outcome: ShotOutcome,
    /// Snapshot of the ship hit, after the hit was counted.
    pub ship: Option<Ship>,
    pub board: Board,
}

impl Shot {
    pub fn hit(&self) -> bool {
        self.outcome.is_hit()
    }

    pub fn sunk(&self) -> bool {
        self.outcome.is_sunk()
    }
}

/// Fire at (row, col), returning a fresh board; `board` itself is never
/// touched.
///
/// Firing at a cell that is already marked is a no-op answered with
/// [`ShotOutcome::Repeat`]. Sinking a ship paints its cells `Sunk` and
/// marks every untouched neighbour as a miss: ships never touch, so
/// those cells are known water.
pub fn fire(board: &Board, row: usize, col: usize) -> Result<Shot, ShotError> {
    let cell = *board
        .cell(row, col)
        .ok_or(ShotError::OutOfBounds { row, col })?;
    if cell.is_hit() {
        return Ok(Shot {
            outcome: ShotOutcome::Repeat,
            ship: None,
            board: board.clone(),
        });
    }

    let mut next = board.clone();
    let Some(id) = cell.ship_id() else {
        next.cell_mut((row, col)).mark(CellState::Miss);
        debug!("shot ({}, {}) missed", row, col);
        return Ok(Shot {
            outcome: ShotOutcome::Miss,
            ship: None,
            board: next,
        });
    };

    next.cell_mut((row, col)).mark(CellState::Hit);
    let ship = next.ship_mut(id).ok_or(ShotError::UnknownShip(id))?;
    if !ship.register_hit() {
        let ship = ship.clone();
        debug!("shot ({}, {}) hit {}", row, col, ship.id());
        return Ok(Shot {
            outcome: ShotOutcome::Hit,
            ship: Some(ship),
            board: next,
        });
    }

    let ship = ship.clone();
    let hull = BB::from_iter(ship.cells()).map_err(|_| ShotError::UnknownShip(id))?;
    for cell in hull.iter_set_bits() {
        next.cell_mut(cell).mark(CellState::Sunk);
    }
    for (r, c) in hull.neighborhood().iter_set_bits() {
        let neighbour = next.cell_mut((r, c));
        if !neighbour.is_hit() && neighbour.ship_id().is_none() {
            neighbour.mark(CellState::Miss);
        }
    }
    debug!("shot ({}, {}) sank {} ({})", row, col, ship.id(), ship.class());
    Ok(Shot {
        outcome: ShotOutcome::Sunk,
        ship: Some(ship),
        board: next,
    })
}
