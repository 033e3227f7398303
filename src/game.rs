//! One match between a human player and the computer.
//!
//! [`GameSession`] is the single writer of both boards. It drives the
//! phase machine `Placement -> Battle -> Finished`, alternates turns
//! (a hit keeps the turn, a miss passes it) and checks for the winner
//! after every shot. Computer turns are claimed with a [`TurnTicket`]:
//! a ticket captured before a pacing delay is refused once the session
//! has moved on, so deferred continuations can never touch a newer state.

use alloc::vec::Vec;
use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};

use log::{debug, error, info, warn};
use rand::Rng;

use crate::ai::{AiState, Difficulty};
use crate::board::Board;
use crate::common::{PlacementError, SetupError, ShotError};
use crate::config::{Coord, Fleet, STANDARD_FLEET};
use crate::placement;
use crate::ship::{Orientation, Ship, ShipClass, ShipId};
use crate::shot::{self, Shot, ShotOutcome};

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "lowercase"))]
pub enum Side {
    Player,
    Computer,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Computer,
            Side::Computer => Side::Player,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "lowercase"))]
pub enum Phase {
    Placement,
    Battle,
    Finished,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Placement => "placement",
            Phase::Battle => "battle",
            Phase::Finished => "finished",
        })
    }
}

/// Process-unique identity of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionId(u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Claim on one pending computer turn, valid only while nothing else has
/// happened in the session it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnTicket {
    session: SessionId,
    seq: u64,
}

impl TurnTicket {
    pub fn session(&self) -> SessionId {
        self.session
    }
}

/// Notifications for the UI layer, collected by the session and handed
/// out through [`GameSession::take_events`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum GameEvent {
    ShipPlaced {
        side: Side,
        ship: Ship,
    },
    ShotResolved {
        attacker: Side,
        coord: Coord,
        outcome: ShotOutcome,
        ship: Option<Ship>,
    },
    TurnPassed {
        to: Side,
    },
    PhaseChanged {
        from: Phase,
        to: Phase,
    },
    GameFinished {
        winner: Side,
    },
}

/// Outcome of one resolved shot as seen by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShotReport {
    pub attacker: Side,
    pub coord: Coord,
    pub outcome: ShotOutcome,
    pub ship: Option<Ship>,
    /// The attacker shoots again.
    pub keeps_turn: bool,
    pub winner: Option<Side>,
}

impl ShotReport {
    pub fn hit(&self) -> bool {
        self.outcome.is_hit()
    }

    pub fn sunk(&self) -> bool {
        self.outcome.is_sunk()
    }
}

#[derive(Debug, Clone)]
pub struct GameSession {
    id: SessionId,
    fleet: Fleet,
    difficulty: Difficulty,
    player_board: Board,
    computer_board: Board,
    phase: Phase,
    current_turn: Side,
    winner: Option<Side>,
    player_hits: usize,
    computer_hits: usize,
    ai: AiState,
    /// Bumped by every state change; stamps turn tickets.
    seq: u64,
    events: Vec<GameEvent>,
}

impl GameSession {
    /// New match with the standard fleet. The computer fleet is placed
    /// right away; the human places theirs during the placement phase.
    pub fn start<R: Rng + ?Sized>(difficulty: Difficulty, rng: &mut R) -> Result<Self, SetupError> {
        Self::with_fleet(difficulty, STANDARD_FLEET, rng)
    }

    pub fn with_fleet<R: Rng + ?Sized>(
        difficulty: Difficulty,
        fleet: Fleet,
        rng: &mut R,
    ) -> Result<Self, SetupError> {
        fleet.validate()?;
        let computer_board = placement::auto_place_fleet(&fleet, rng)?;
        let id = SessionId(NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed));
        info!("session {} started on {} difficulty", id, difficulty);
        Ok(Self {
            id,
            fleet,
            difficulty,
            player_board: Board::new(),
            computer_board,
            phase: Phase::Placement,
            current_turn: Side::Player,
            winner: None,
            player_hits: 0,
            computer_hits: 0,
            ai: AiState::new(difficulty),
            seq: 0,
            events: Vec::new(),
        })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_turn(&self) -> Side {
        self.current_turn
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn player_board(&self) -> &Board {
        &self.player_board
    }

    pub fn computer_board(&self) -> &Board {
        &self.computer_board
    }

    /// Hits landed by `side` on the opposing fleet.
    pub fn hits(&self, side: Side) -> usize {
        match side {
            Side::Player => self.player_hits,
            Side::Computer => self.computer_hits,
        }
    }

    pub fn ai(&self) -> &AiState {
        &self.ai
    }

    fn board(&self, side: Side) -> &Board {
        match side {
            Side::Player => &self.player_board,
            Side::Computer => &self.computer_board,
        }
    }

    /// Drain the notifications produced since the last call.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        core::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    fn set_phase(&mut self, to: Phase) {
        let from = self.phase;
        if from == to {
            return;
        }
        info!("session {}: {} -> {}", self.id, from, to);
        self.phase = to;
        self.seq += 1;
        self.emit(GameEvent::PhaseChanged { from, to });
    }

    /// Place one human ship. Battle begins once the fleet is complete.
    pub fn place_ship(
        &mut self,
        class: ShipClass,
        anchor: Coord,
        orientation: Orientation,
    ) -> Result<ShipId, PlacementError> {
        if self.phase != Phase::Placement {
            return Err(PlacementError::WrongPhase(self.phase));
        }
        let (board, id) = placement::place(&self.player_board, &self.fleet, class, anchor, orientation)?;
        self.player_board = board;
        self.seq += 1;
        if let Some(ship) = self.player_board.ship(id).cloned() {
            self.emit(GameEvent::ShipPlaced {
                side: Side::Player,
                ship,
            });
        }
        if placement::is_placement_complete(&self.player_board, &self.fleet) {
            self.set_phase(Phase::Battle);
        }
        Ok(id)
    }

    /// Replace the human board with a random complete fleet and start the
    /// battle.
    pub fn auto_place<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), SetupError> {
        if self.phase != Phase::Placement {
            return Err(SetupError::WrongPhase(self.phase));
        }
        self.player_board = placement::auto_place_fleet(&self.fleet, rng)?;
        self.seq += 1;
        for ship in self.player_board.ships().to_vec() {
            self.emit(GameEvent::ShipPlaced {
                side: Side::Player,
                ship,
            });
        }
        self.set_phase(Phase::Battle);
        Ok(())
    }

    /// Human shot at the computer board.
    pub fn fire_at(&mut self, row: usize, col: usize) -> Result<ShotReport, ShotError> {
        if self.phase != Phase::Battle {
            return Err(ShotError::WrongPhase(self.phase));
        }
        if self.current_turn != Side::Player {
            return Err(ShotError::NotYourTurn);
        }
        let shot = shot::fire(&self.computer_board, row, col)?;
        if shot.outcome == ShotOutcome::Repeat {
            return Err(ShotError::AlreadyFired { row, col });
        }
        Ok(self.apply_shot(Side::Player, (row, col), shot))
    }

    /// Ticket for the computer turn owed right now, if any.
    pub fn pending_computer_turn(&self) -> Option<TurnTicket> {
        (self.phase == Phase::Battle && self.current_turn == Side::Computer).then_some(TurnTicket {
            session: self.id,
            seq: self.seq,
        })
    }

    /// Whether `ticket` still refers to this session's current state.
    pub fn is_current(&self, ticket: TurnTicket) -> bool {
        ticket.session == self.id
            && ticket.seq == self.seq
            && self.phase == Phase::Battle
            && self.current_turn == Side::Computer
    }

    /// Play the computer turn claimed by `ticket`.
    ///
    /// Stale tickets are ignored and return `None`, as does a turn where
    /// the AI has nothing left to fire at.
    pub fn play_computer_turn<R: Rng + ?Sized>(
        &mut self,
        ticket: TurnTicket,
        rng: &mut R,
    ) -> Option<ShotReport> {
        if !self.is_current(ticket) {
            debug!("session {}: discarding stale computer turn {:?}", self.id, ticket);
            return None;
        }
        let Some((coord, shot)) = self.ai.take_turn(&self.player_board, rng) else {
            warn!("session {}: computer has no shot, passing the turn", self.id);
            self.pass_turn(Side::Player);
            return None;
        };
        Some(self.apply_shot(Side::Computer, coord, shot))
    }

    /// Play computer turns back to back until the human is up again or
    /// the match is over.
    pub fn run_computer_turns<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<ShotReport> {
        let mut reports = Vec::new();
        while let Some(ticket) = self.pending_computer_turn() {
            match self.play_computer_turn(ticket, rng) {
                Some(report) => reports.push(report),
                None => break,
            }
        }
        reports
    }

    fn pass_turn(&mut self, to: Side) {
        self.current_turn = to;
        self.seq += 1;
        self.emit(GameEvent::TurnPassed { to });
    }

    fn apply_shot(&mut self, attacker: Side, coord: Coord, shot: Shot) -> ShotReport {
        let defender = attacker.opponent();
        let Shot { outcome, ship, board } = shot;
        match defender {
            Side::Player => self.player_board = board,
            Side::Computer => self.computer_board = board,
        }
        self.seq += 1;
        if outcome.is_hit() {
            match attacker {
                Side::Player => self.player_hits += 1,
                Side::Computer => self.computer_hits += 1,
            }
        }
        self.emit(GameEvent::ShotResolved {
            attacker,
            coord,
            outcome,
            ship: ship.clone(),
        });

        let defending = self.board(defender);
        if defending.all_ships_sunk() {
            self.winner = Some(attacker);
            self.set_phase(Phase::Finished);
            self.emit(GameEvent::GameFinished { winner: attacker });
        } else if defending.all_cells_exhausted() {
            error!(
                "session {}: every {:?} cell is fired but ships remain afloat",
                self.id, defender
            );
        }

        let keeps_turn = self.phase == Phase::Battle && outcome.is_hit();
        if self.phase == Phase::Battle && !outcome.is_hit() {
            self.pass_turn(defender);
        }
        ShotReport {
            attacker,
            coord,
            outcome,
            ship,
            keeps_turn,
            winner: self.winner,
        }
    }
}
