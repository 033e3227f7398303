//! Ship classes, identifiers and placed ships.

use core::fmt;

use crate::config::Coord;

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "lowercase"))]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Cell reached by stepping `offset` cells from `anchor` along this axis.
    /// Saturates instead of wrapping, so far-off cells stay off the board.
    #[inline]
    pub fn step(self, anchor: Coord, offset: usize) -> Coord {
        match self {
            Orientation::Horizontal => (anchor.0, anchor.1.saturating_add(offset)),
            Orientation::Vertical => (anchor.0.saturating_add(offset), anchor.1),
        }
    }
}

/// Class of a vessel. Sizes come from the fleet table, not from the class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "lowercase"))]
pub enum ShipClass {
    Carrier,
    Battleship,
    Cruiser,
    Destroyer,
    Submarine,
}

impl ShipClass {
    pub fn name(self) -> &'static str {
        match self {
            ShipClass::Carrier => "carrier",
            ShipClass::Battleship => "battleship",
            ShipClass::Cruiser => "cruiser",
            ShipClass::Destroyer => "destroyer",
            ShipClass::Submarine => "submarine",
        }
    }
}

impl fmt::Display for ShipClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identifier of a ship, unique within one board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct ShipId(pub u8);

impl fmt::Display for ShipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ship_{}", self.0)
    }
}

/// A ship placed on the board.
///
/// Occupies `size` contiguous cells starting at `anchor` (its top-left
/// cell) along `orientation`. `sunk` is kept equal to `hits >= size`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Ship {
    id: ShipId,
    class: ShipClass,
    size: usize,
    orientation: Orientation,
    anchor: Coord,
    hits: usize,
    sunk: bool,
}

impl Ship {
    pub fn new(
        id: ShipId,
        class: ShipClass,
        size: usize,
        anchor: Coord,
        orientation: Orientation,
    ) -> Self {
        Ship {
            id,
            class,
            size,
            orientation,
            anchor,
            hits: 0,
            sunk: false,
        }
    }

    pub fn id(&self) -> ShipId {
        self.id
    }

    pub fn class(&self) -> ShipClass {
        self.class
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Top-left cell of the ship.
    pub fn anchor(&self) -> Coord {
        self.anchor
    }

    /// Number of distinct cells hit so far.
    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn is_sunk(&self) -> bool {
        self.sunk
    }

    /// Cells covered by the ship, from the anchor outwards.
    pub fn cells(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.size).map(move |i| self.orientation.step(self.anchor, i))
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.cells().any(|cell| cell == (row, col))
    }

    /// Count one more hit. Returns `true` when this hit sinks the ship.
    pub(crate) fn register_hit(&mut self) -> bool {
        if self.sunk {
            return false;
        }
        self.hits += 1;
        if self.hits >= self.size {
            self.sunk = true;
            return true;
        }
        false
    }
}
