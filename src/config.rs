//! Board dimensions and the fleet table.

use crate::common::FleetError;
use crate::ship::ShipClass;

pub const BOARD_SIZE: usize = 10;

/// Random anchors tried per ship before auto-placement gives up.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 1000;

/// Ships one board can register; ids are a `u8`.
pub const MAX_SHIPS: usize = u8::MAX as usize + 1;

/// A `(row, col)` grid position.
pub type Coord = (usize, usize);

/// One row of the fleet table: how many ships of a class, and how long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FleetEntry {
    class: ShipClass,
    size: usize,
    count: usize,
}

impl FleetEntry {
    pub const fn new(class: ShipClass, size: usize, count: usize) -> Self {
        Self { class, size, count }
    }

    pub fn class(&self) -> ShipClass {
        self.class
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of ships of this class that must be placed.
    pub fn count(&self) -> usize {
        self.count
    }
}

/// Fleet Configuration: the ships each side has to place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fleet {
    entries: &'static [FleetEntry],
}

impl Fleet {
    pub const fn new(entries: &'static [FleetEntry]) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &'static [FleetEntry] {
        self.entries
    }

    pub fn entry(&self, class: ShipClass) -> Option<&'static FleetEntry> {
        self.entries.iter().find(|e| e.class == class)
    }

    /// Total number of ships to place.
    pub const fn ship_count(&self) -> usize {
        let mut total = 0;
        let mut i = 0;
        while i < self.entries.len() {
            total += self.entries[i].count;
            i += 1;
        }
        total
    }

    /// Total number of cells occupied by a fully placed fleet.
    pub const fn total_cells(&self) -> usize {
        let mut total = 0;
        let mut i = 0;
        while i < self.entries.len() {
            total += self.entries[i].size * self.entries[i].count;
            i += 1;
        }
        total
    }

    /// Reject tables that cannot describe a playable fleet.
    pub fn validate(&self) -> Result<(), FleetError> {
        if self.entries.is_empty() || self.ship_count() == 0 {
            return Err(FleetError::Empty);
        }
        if self.ship_count() > MAX_SHIPS {
            return Err(FleetError::TooManyShips(self.ship_count()));
        }
        for (i, entry) in self.entries.iter().enumerate() {
            if entry.size == 0 || entry.size > BOARD_SIZE {
                return Err(FleetError::InvalidSize {
                    class: entry.class,
                    size: entry.size,
                });
            }
            if self.entries[..i].iter().any(|e| e.class == entry.class) {
                return Err(FleetError::DuplicateClass(entry.class));
            }
        }
        Ok(())
    }
}

impl Default for Fleet {
    fn default() -> Self {
        STANDARD_FLEET
    }
}

/// Eleven ships on twenty cells: one carrier, one battleship, two
/// cruisers, three destroyers and four single-cell submarines.
pub const STANDARD_FLEET: Fleet = Fleet::new(&[
    FleetEntry::new(ShipClass::Carrier, 5, 1),
    FleetEntry::new(ShipClass::Battleship, 4, 1),
    FleetEntry::new(ShipClass::Cruiser, 3, 2),
    FleetEntry::new(ShipClass::Destroyer, 2, 3),
    FleetEntry::new(ShipClass::Submarine, 1, 4),
]);

/// The five-ship, seventeen-cell fleet.
pub const CLASSIC_FLEET: Fleet = Fleet::new(&[
    FleetEntry::new(ShipClass::Carrier, 5, 1),
    FleetEntry::new(ShipClass::Battleship, 4, 1),
    FleetEntry::new(ShipClass::Cruiser, 3, 1),
    FleetEntry::new(ShipClass::Submarine, 3, 1),
    FleetEntry::new(ShipClass::Destroyer, 2, 1),
]);

/// Ship cells of a fully placed [`STANDARD_FLEET`].
pub const TOTAL_SHIP_CELLS: usize = STANDARD_FLEET.total_cells();
