#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod ai;
mod bitboard;
mod board;
mod common;
mod config;
#[cfg(feature = "std")]
pub mod driver;
mod game;
#[cfg(feature = "std")]
mod logging;
mod pattern;
pub mod placement;
#[cfg(feature = "std")]
pub mod settings;
mod ship;
pub mod shot;

pub use ai::*;
pub use bitboard::{BitBoard, BitBoardError, SetBits};
pub use board::*;
pub use common::*;
pub use config::*;
#[cfg(feature = "std")]
pub use driver::{DriverConfig, MatchDriver};
pub use game::*;
#[cfg(feature = "std")]
pub use logging::init_logging;
pub use pattern::*;
pub use placement::{auto_place_fleet, can_place, check_placement, is_placement_complete, place, remaining_quota};
#[cfg(feature = "std")]
pub use settings::{load_difficulty, MemorySettings, SettingsStore};
pub use ship::*;
pub use shot::{fire, Shot, ShotOutcome};
