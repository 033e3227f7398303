//! Error types shared by placement, shot resolution and the session.

use core::fmt;

use crate::game::Phase;
use crate::ship::{ShipClass, ShipId};

/// Invalid fleet table or a request that does not fit the fleet table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FleetError {
    /// Ship class is not part of the fleet.
    UnknownShipType(ShipClass),
    /// Every ship of this class is already on the board.
    QuotaReached(ShipClass),
    /// Ship size is zero or longer than the board.
    InvalidSize { class: ShipClass, size: usize },
    /// The same class is listed twice.
    DuplicateClass(ShipClass),
    /// The table places no ships at all.
    Empty,
    /// More ships than a board can give ids to.
    TooManyShips(usize),
}

impl fmt::Display for FleetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FleetError::UnknownShipType(class) => {
                write!(f, "Ship type {} is not in the fleet configuration", class)
            }
            FleetError::QuotaReached(class) => write!(f, "All ships of type {} are placed", class),
            FleetError::InvalidSize { class, size } => {
                write!(f, "Invalid size {} for ship type {}", size, class)
            }
            FleetError::DuplicateClass(class) => {
                write!(f, "Ship type {} is listed more than once", class)
            }
            FleetError::Empty => write!(f, "Fleet configuration contains no ships"),
            FleetError::TooManyShips(count) => {
                write!(f, "Fleet configuration lists {} ships, more than a board holds", count)
            }
        }
    }
}

/// Rejected placement attempt. The board is left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementError {
    /// Some ship cell falls outside the board.
    OutOfBounds,
    /// Some ship cell is already taken.
    Overlaps,
    /// Some ship cell touches another ship, diagonals included.
    TouchesShip,
    /// Ships can only be placed during the placement phase.
    WrongPhase(Phase),
    Fleet(FleetError),
}

impl From<FleetError> for PlacementError {
    fn from(err: FleetError) -> Self {
        PlacementError::Fleet(err)
    }
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementError::OutOfBounds => write!(f, "Ship placement is out of bounds"),
            PlacementError::Overlaps => write!(f, "Ship placement overlaps with another ship"),
            PlacementError::TouchesShip => write!(f, "Ship placement touches another ship"),
            PlacementError::WrongPhase(phase) => {
                write!(f, "Cannot place ships during the {} phase", phase)
            }
            PlacementError::Fleet(e) => write!(f, "Fleet error: {}", e),
        }
    }
}

/// Auto-placement ran out of attempts for a ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementExhausted {
    pub class: ShipClass,
    pub attempts: usize,
}

impl fmt::Display for PlacementExhausted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unable to place {} after {} attempts",
            self.class, self.attempts
        )
    }
}

/// Rejected shot. Session state is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotError {
    OutOfBounds { row: usize, col: usize },
    /// Shots are only accepted during battle.
    WrongPhase(Phase),
    /// It is the other side's turn.
    NotYourTurn,
    /// The cell was already fired upon or deduced as water.
    AlreadyFired { row: usize, col: usize },
    /// A cell refers to a ship missing from the registry.
    UnknownShip(ShipId),
}

impl fmt::Display for ShotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShotError::OutOfBounds { row, col } => {
                write!(f, "Shot at ({}, {}) is outside the board", row, col)
            }
            ShotError::WrongPhase(phase) => write!(f, "Cannot fire during the {} phase", phase),
            ShotError::NotYourTurn => write!(f, "It is not your turn"),
            ShotError::AlreadyFired { row, col } => {
                write!(f, "Cell ({}, {}) was already fired upon", row, col)
            }
            ShotError::UnknownShip(id) => write!(f, "Cell refers to unknown {}", id),
        }
    }
}

/// Failure while setting up a board for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupError {
    Fleet(FleetError),
    Exhausted(PlacementExhausted),
    WrongPhase(Phase),
}

impl From<FleetError> for SetupError {
    fn from(err: FleetError) -> Self {
        SetupError::Fleet(err)
    }
}

impl From<PlacementExhausted> for SetupError {
    fn from(err: PlacementExhausted) -> Self {
        SetupError::Exhausted(err)
    }
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::Fleet(e) => write!(f, "Fleet error: {}", e),
            SetupError::Exhausted(e) => write!(f, "{}", e),
            SetupError::WrongPhase(phase) => {
                write!(f, "Cannot set up a board during the {} phase", phase)
            }
        }
    }
}

/// Difficulty string that is not `easy`, `medium` or `hard`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDifficultyError;

impl fmt::Display for ParseDifficultyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "difficulty must be one of: easy, medium, hard")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FleetError {}
#[cfg(feature = "std")]
impl std::error::Error for PlacementError {}
#[cfg(feature = "std")]
impl std::error::Error for PlacementExhausted {}
#[cfg(feature = "std")]
impl std::error::Error for ShotError {}
#[cfg(feature = "std")]
impl std::error::Error for SetupError {}
#[cfg(feature = "std")]
impl std::error::Error for ParseDifficultyError {}
