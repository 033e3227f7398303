//! Board model: a 10×10 grid of cells plus the ships placed on it.
//!
//! The board carries no placement or firing rules of its own; those live
//! in [`placement`](crate::placement) and [`shot`](crate::shot). It only
//! exposes read access and the two end-of-game predicates.

use alloc::vec::Vec;
use core::fmt;

use crate::bitboard::BitBoard;
use crate::config::{Coord, BOARD_SIZE};
use crate::ship::{Ship, ShipId};

/// Mask over the grid.
pub type BB = BitBoard<u128, BOARD_SIZE>;

/// Visible state of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "lowercase"))]
pub enum CellState {
    #[default]
    Empty,
    Ship,
    Hit,
    Miss,
    Sunk,
}

/// One grid position.
///
/// `is_hit` is true whenever the state is `Hit`, `Miss` or `Sunk`, and
/// `ship_id` is set exactly for cells a ship occupies or occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    state: CellState,
    ship_id: Option<ShipId>,
    is_hit: bool,
}

impl Cell {
    pub fn state(&self) -> CellState {
        self.state
    }

    pub fn ship_id(&self) -> Option<ShipId> {
        self.ship_id
    }

    /// Has this cell been fired upon (or deduced as water)?
    pub fn is_hit(&self) -> bool {
        self.is_hit
    }

    pub(crate) fn occupy(&mut self, id: ShipId) {
        self.state = CellState::Ship;
        self.ship_id = Some(id);
        self.is_hit = false;
    }

    pub(crate) fn mark(&mut self, state: CellState) {
        self.state = state;
        self.is_hit = true;
    }
}

/// Counts reported by [`Board::stats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FleetStats {
    pub total_ships: usize,
    pub sunk_ships: usize,
    pub remaining_ships: usize,
    pub total_hits: usize,
    pub total_cells: usize,
}

/// Grid of cells plus the registry of ships on it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Board {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
    ships: Vec<Ship>,
}

impl Board {
    /// Create an empty board state (no ships placed).
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn in_bounds(row: usize, col: usize) -> bool {
        row < BOARD_SIZE && col < BOARD_SIZE
    }

    /// Cell at (row, col), or `None` outside the board.
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.cells.get(row).and_then(|r| r.get(col))
    }

    pub fn ship(&self, id: ShipId) -> Option<&Ship> {
        self.ships.iter().find(|s| s.id() == id)
    }

    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    /// Occupancy mask of all ships.
    pub fn ship_map(&self) -> BB {
        self.mask(|cell| cell.ship_id.is_some())
    }

    /// Mask of every cell fired upon or deduced as water.
    pub fn fired_map(&self) -> BB {
        self.mask(Cell::is_hit)
    }

    fn mask(&self, pred: impl Fn(&Cell) -> bool) -> BB {
        let mut bb = BB::new();
        for (r, row) in self.cells.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if pred(cell) {
                    let _ = bb.set(r, c);
                }
            }
        }
        bb
    }

    /// Returns `true` when every ship in the registry is sunk.
    pub fn all_ships_sunk(&self) -> bool {
        self.ships.iter().all(Ship::is_sunk)
    }

    /// Returns `true` when every cell has been fired upon.
    pub fn all_cells_exhausted(&self) -> bool {
        self.cells.iter().flatten().all(Cell::is_hit)
    }

    /// Sum of hits over all ships.
    pub fn hits_landed(&self) -> usize {
        self.ships.iter().map(Ship::hits).sum()
    }

    pub fn stats(&self) -> FleetStats {
        let total_ships = self.ships.len();
        let sunk_ships = self.ships.iter().filter(|s| s.is_sunk()).count();
        FleetStats {
            total_ships,
            sunk_ships,
            remaining_ships: total_ships - sunk_ships,
            total_hits: self.hits_landed(),
            total_cells: self.ships.iter().map(Ship::size).sum(),
        }
    }

    /// Text rendering; ships still afloat are only drawn when `reveal_ships`.
    pub fn view(&self, reveal_ships: bool) -> BoardView<'_> {
        BoardView {
            board: self,
            reveal_ships,
        }
    }

    pub(crate) fn cell_mut(&mut self, (row, col): Coord) -> &mut Cell {
        &mut self.cells[row][col]
    }

    pub(crate) fn ship_mut(&mut self, id: ShipId) -> Option<&mut Ship> {
        self.ships.iter_mut().find(|s| s.id() == id)
    }

    pub(crate) fn push_ship(&mut self, ship: Ship) {
        for cell in ship.cells() {
            self.cell_mut(cell).occupy(ship.id());
        }
        self.ships.push(ship);
    }

    /// Id for the next ship, `None` once every `u8` id is taken.
    pub(crate) fn next_ship_id(&self) -> Option<ShipId> {
        u8::try_from(self.ships.len()).ok().map(ShipId)
    }
}

/// Display adapter returned by [`Board::view`].
pub struct BoardView<'a> {
    board: &'a Board,
    reveal_ships: bool,
}

impl fmt::Display for BoardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  ")?;
        for c in 0..BOARD_SIZE {
            write!(f, " {}", c)?;
        }
        writeln!(f)?;
        for (r, row) in self.board.cells.iter().enumerate() {
            write!(f, "{} ", (b'A' + r as u8) as char)?;
            for cell in row.iter() {
                let glyph = match cell.state {
                    CellState::Empty => '·',
                    CellState::Ship if self.reveal_ships => '■',
                    CellState::Ship => '·',
                    CellState::Hit => '✕',
                    CellState::Miss => '○',
                    CellState::Sunk => '█',
                };
                write!(f, " {}", glyph)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
