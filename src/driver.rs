#![cfg(feature = "std")]
//! Async match driver with paced computer turns.
//!
//! The driver owns the current [`GameSession`] behind a mutex and is its
//! only writer. When the human misses, the computer's reply is spawned as
//! a delayed continuation; a hit keeps the computer shooting after
//! another delay. Starting a new match aborts the pending continuation,
//! and each continuation also re-checks the match generation and its
//! [`TurnTicket`] before touching the session.

use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use log::debug;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::ai::Difficulty;
use crate::config::{Coord, Fleet, STANDARD_FLEET};
use crate::game::{GameEvent, GameSession, SessionId, ShotReport, TurnTicket};
use crate::settings::{self, SettingsStore};
use crate::ship::{Orientation, ShipClass, ShipId};

#[derive(Debug, Clone, Default)]
pub struct DriverConfig {
    /// Fixed RNG seed for reproducible matches.
    pub seed: Option<u64>,
    /// Overrides the difficulty's thinking delay.
    pub turn_delay: Option<Duration>,
    /// Fleet for new matches; the standard fleet when unset.
    pub fleet: Option<Fleet>,
}

struct Shared {
    generation: u64,
    session: Option<GameSession>,
    rng: SmallRng,
}

pub struct MatchDriver {
    shared: Arc<Mutex<Shared>>,
    config: DriverConfig,
    events: UnboundedSender<GameEvent>,
    pending: Option<JoinHandle<()>>,
}

impl MatchDriver {
    /// Create a driver and the receiving end of its event stream.
    pub fn new(config: DriverConfig) -> (Self, UnboundedReceiver<GameEvent>) {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_rng(&mut rand::rng()),
        };
        let (events, rx) = mpsc::unbounded_channel();
        let driver = Self {
            shared: Arc::new(Mutex::new(Shared {
                generation: 0,
                session: None,
                rng,
            })),
            config,
            events,
            pending: None,
        };
        (driver, rx)
    }

    /// Replace the current match, if any, with a fresh one.
    pub async fn new_match(&mut self, difficulty: Difficulty) -> anyhow::Result<SessionId> {
        self.cancel_pending();
        let fleet = self.config.fleet.unwrap_or(STANDARD_FLEET);
        let mut shared = self.shared.lock().await;
        let session = GameSession::with_fleet(difficulty, fleet, &mut shared.rng)?;
        shared.generation += 1;
        let id = session.id();
        shared.session = Some(session);
        debug!("driver: match {} is generation {}", id, shared.generation);
        Ok(id)
    }

    /// Start a match on the difficulty found in `store`.
    pub async fn new_match_from_settings(
        &mut self,
        store: &dyn SettingsStore,
    ) -> anyhow::Result<SessionId> {
        let difficulty = settings::load_difficulty(store).await;
        self.new_match(difficulty).await
    }

    pub async fn place_ship(
        &mut self,
        class: ShipClass,
        anchor: Coord,
        orientation: Orientation,
    ) -> anyhow::Result<ShipId> {
        let mut shared = self.shared.lock().await;
        let session = active(&mut shared.session)?;
        let id = session.place_ship(class, anchor, orientation)?;
        forward(&self.events, session.take_events());
        Ok(id)
    }

    pub async fn auto_place(&mut self) -> anyhow::Result<()> {
        let mut shared = self.shared.lock().await;
        let Shared { session, rng, .. } = &mut *shared;
        let session = active(session)?;
        session.auto_place(rng)?;
        forward(&self.events, session.take_events());
        Ok(())
    }

    /// Human shot. A miss schedules the computer's reply.
    pub async fn fire(&mut self, row: usize, col: usize) -> anyhow::Result<ShotReport> {
        let (report, ticket, generation, delay) = {
            let mut shared = self.shared.lock().await;
            let generation = shared.generation;
            let session = active(&mut shared.session)?;
            let report = session.fire_at(row, col)?;
            forward(&self.events, session.take_events());
            let delay = self
                .config
                .turn_delay
                .unwrap_or_else(|| session.difficulty().thinking_delay());
            (report, session.pending_computer_turn(), generation, delay)
        };
        if let Some(ticket) = ticket {
            self.schedule(generation, ticket, delay);
        }
        Ok(report)
    }

    /// Copy of the current session.
    pub async fn snapshot(&self) -> Option<GameSession> {
        self.shared.lock().await.session.clone()
    }

    /// Number of matches started so far.
    pub async fn generation(&self) -> u64 {
        self.shared.lock().await.generation
    }

    /// Wait for the pending computer turns, if any, to finish.
    pub async fn settle(&mut self) {
        if let Some(handle) = self.pending.take() {
            let _ = handle.await;
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
            debug!("driver: cancelled pending computer turn");
        }
    }

    fn schedule(&mut self, generation: u64, ticket: TurnTicket, delay: Duration) {
        self.cancel_pending();
        let shared = Arc::clone(&self.shared);
        let events = self.events.clone();
        self.pending = Some(tokio::spawn(async move {
            let mut ticket = ticket;
            loop {
                tokio::time::sleep(delay).await;
                let mut guard = shared.lock().await;
                let state = &mut *guard;
                if state.generation != generation {
                    debug!("driver: dropping computer turn from generation {}", generation);
                    return;
                }
                let Some(session) = state.session.as_mut() else {
                    return;
                };
                if session.play_computer_turn(ticket, &mut state.rng).is_none() {
                    forward(&events, session.take_events());
                    return;
                }
                forward(&events, session.take_events());
                match session.pending_computer_turn() {
                    Some(next) => ticket = next,
                    None => return,
                }
            }
        }));
    }
}

impl Drop for MatchDriver {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

fn active(session: &mut Option<GameSession>) -> anyhow::Result<&mut GameSession> {
    session.as_mut().ok_or_else(|| anyhow!("no match in progress"))
}

fn forward(tx: &UnboundedSender<GameEvent>, events: Vec<GameEvent>) {
    for event in events {
        // The UI may have stopped listening; the match goes on regardless.
        let _ = tx.send(event);
    }
}
