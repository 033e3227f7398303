//! Computer opponent: hunt/target shot selection scaled by difficulty.
//!
//! All decision state lives in an explicitly owned [`AiState`]; the
//! session keeps one per match and hands it to every decision. The state
//! only learns what the resolver reports back, never the hidden layout.
//!
//! * **Hunting** picks an unresolved cell. Medium and hard prefer the
//!   `(row + col)` even checkerboard, since every ship of length two or
//!   more covers one of those cells. Hard also steers away from cells
//!   next to recent misses.
//! * **Targeting** chases a hit ship through the orthogonal neighbours
//!   of the last hit, narrowing to one axis once two hits line up.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;
use core::time::Duration;

use log::{debug, warn};
use rand::Rng;

use crate::board::{Board, BB};
use crate::common::ParseDifficultyError;
use crate::config::{Coord, BOARD_SIZE};
use crate::pattern::{PatternMemory, ShotRecord, HIT_RATE_WINDOW};
use crate::ship::Ship;
use crate::shot::{self, Shot, ShotOutcome};

/// Hunting candidates at or above this miss density are skipped on hard.
const MISS_DENSITY_CUTOFF: f64 = 0.5;
/// Chance that hard targeting takes its best-scored candidate.
const EXPLOIT_PROBABILITY: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "lowercase"))]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Probability that a hunting shot is drawn from the even checkerboard.
    pub fn parity_bias(self) -> f64 {
        match self {
            Difficulty::Easy => 0.0,
            Difficulty::Medium => 0.6,
            Difficulty::Hard => 0.8,
        }
    }

    /// Pause before a computer shot. Pacing only.
    pub fn thinking_delay(self) -> Duration {
        match self {
            Difficulty::Easy => Duration::from_millis(1500),
            Difficulty::Medium => Duration::from_millis(1000),
            Difficulty::Hard => Duration::from_millis(700),
        }
    }

    /// Nominal accuracy shown to players; not used by shot selection.
    pub fn base_accuracy(self) -> f64 {
        match self {
            Difficulty::Easy => 0.3,
            Difficulty::Medium => 0.6,
            Difficulty::Hard => 0.85,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s))
            .ok_or(ParseDifficultyError)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiMode {
    /// No live lead.
    Hunting,
    /// Chasing a located but unsunk ship.
    Targeting,
}

/// Axis along which the chased ship is believed to lie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetDirection {
    Horizontal,
    Vertical,
    Both,
}

/// Label derived from the recent hit rate on hard difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdaptiveStrategy {
    Aggressive,
    Defensive,
    #[default]
    Balanced,
}

impl AdaptiveStrategy {
    pub fn from_hit_rate(rate: f64) -> Self {
        if rate > 0.7 {
            AdaptiveStrategy::Aggressive
        } else if rate < 0.3 {
            AdaptiveStrategy::Defensive
        } else {
            AdaptiveStrategy::Balanced
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AiError {
    MissingLead,
    NoCandidates,
}

impl fmt::Display for AiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiError::MissingLead => write!(f, "targeting without a recorded hit"),
            AiError::NoCandidates => write!(f, "no unresolved cell left"),
        }
    }
}

/// Per-match state of the computer opponent against one board.
#[derive(Debug, Clone)]
pub struct AiState {
    difficulty: Difficulty,
    mode: AiMode,
    last_hit: Option<Coord>,
    direction: Option<TargetDirection>,
    /// Hits on the ship currently chased, oldest first.
    lead: Vec<Coord>,
    shots_fired: BB,
    hits: BB,
    /// Water deduced around sunk ships.
    known_water: BB,
    memory: PatternMemory,
    hit_streak: usize,
    miss_streak: usize,
    longest_hit_streak: usize,
    strategy: AdaptiveStrategy,
}

impl AiState {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            mode: AiMode::Hunting,
            last_hit: None,
            direction: None,
            lead: Vec::new(),
            shots_fired: BB::new(),
            hits: BB::new(),
            known_water: BB::new(),
            memory: PatternMemory::new(),
            hit_streak: 0,
            miss_streak: 0,
            longest_hit_streak: 0,
            strategy: AdaptiveStrategy::Balanced,
        }
    }

    /// Resume targeting from a known hit, e.g. when restoring a match.
    pub fn with_lead(mut self, hit: Coord, direction: TargetDirection) -> Self {
        let _ = self.shots_fired.set(hit.0, hit.1);
        let _ = self.hits.set(hit.0, hit.1);
        self.mode = AiMode::Targeting;
        self.last_hit = Some(hit);
        self.direction = Some(direction);
        self.lead = vec![hit];
        self
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn mode(&self) -> AiMode {
        self.mode
    }

    pub fn last_hit(&self) -> Option<Coord> {
        self.last_hit
    }

    pub fn target_direction(&self) -> Option<TargetDirection> {
        self.direction
    }

    pub fn strategy(&self) -> AdaptiveStrategy {
        self.strategy
    }

    pub fn hit_streak(&self) -> usize {
        self.hit_streak
    }

    pub fn miss_streak(&self) -> usize {
        self.miss_streak
    }

    pub fn longest_hit_streak(&self) -> usize {
        self.longest_hit_streak
    }

    pub fn memory(&self) -> &PatternMemory {
        &self.memory
    }

    /// Every cell this AI has fired upon.
    pub fn shots_fired(&self) -> BB {
        self.shots_fired
    }

    pub fn has_fired(&self, (row, col): Coord) -> bool {
        self.shots_fired.contains(row, col)
    }

    fn resolved(&self) -> BB {
        self.shots_fired | self.known_water
    }

    fn is_resolved(&self, (row, col): Coord) -> bool {
        self.resolved().contains(row, col)
    }

    /// Pick the next cell to fire at.
    ///
    /// Never returns a cell already fired upon. Selection problems fall
    /// back to the first open cell; `None` means every cell is fired.
    pub fn next_shot<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Coord> {
        match self.choose(rng) {
            Ok(cell) if !self.is_resolved(cell) => return Some(cell),
            Ok(cell) => warn!("ai chose resolved cell {:?}, falling back", cell),
            Err(err) => warn!("ai shot selection failed: {}, falling back", err),
        }
        self.fallback_cell()
    }

    fn fallback_cell(&self) -> Option<Coord> {
        (!self.resolved())
            .iter_set_bits()
            .next()
            .or_else(|| (!self.shots_fired).iter_set_bits().next())
    }

    fn choose<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Coord, AiError> {
        match self.mode {
            AiMode::Hunting => self.hunt(rng),
            AiMode::Targeting => self.target(rng),
        }
    }

    fn hunt<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Coord, AiError> {
        let mut pool: Vec<Coord> = (!self.resolved()).iter_set_bits().collect();
        if pool.is_empty() {
            return Err(AiError::NoCandidates);
        }

        let bias = self.difficulty.parity_bias();
        if bias > 0.0 && rng.random_bool(bias) {
            let even: Vec<Coord> = pool.iter().copied().filter(|&(r, c)| (r + c) % 2 == 0).collect();
            if !even.is_empty() {
                pool = even;
            }
        }
        if self.difficulty == Difficulty::Hard {
            let calm: Vec<Coord> = pool
                .iter()
                .copied()
                .filter(|&cell| self.memory.miss_density(cell) < MISS_DENSITY_CUTOFF)
                .collect();
            if !calm.is_empty() {
                pool = calm;
            }
        }
        Ok(pool[rng.random_range(0..pool.len())])
    }

    fn target<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Coord, AiError> {
        if self.last_hit.is_none() {
            self.reset_hunt();
            return Err(AiError::MissingLead);
        }
        let candidates = self.target_candidates();
        if candidates.is_empty() {
            debug!("ai: no targets left around {:?}, hunting", self.last_hit);
            self.reset_hunt();
            return self.hunt(rng);
        }
        if self.difficulty == Difficulty::Hard
            && candidates.len() > 1
            && rng.random_bool(EXPLOIT_PROBABILITY)
        {
            return Ok(self.best_scored(&candidates));
        }
        Ok(candidates[rng.random_range(0..candidates.len())])
    }

    /// Unresolved neighbours of the last hit along the current direction.
    ///
    /// When those are used up on a narrowed axis, the far end of the run
    /// of hits on the chased ship is tried before giving up.
    pub fn target_candidates(&self) -> Vec<Coord> {
        let Some(last) = self.last_hit else {
            return Vec::new();
        };
        let direction = self.direction.unwrap_or(TargetDirection::Both);
        let origins = core::iter::once(last).chain(self.lead.iter().rev().copied());
        for origin in origins {
            let open: Vec<Coord> = neighbours(origin, direction)
                .into_iter()
                .filter(|&cell| !self.is_resolved(cell))
                .collect();
            if !open.is_empty() {
                return open;
            }
        }
        Vec::new()
    }

    fn score(&self, (row, col): Coord) -> f64 {
        let mut score = 0.0;
        for (r, c) in neighbours((row, col), TargetDirection::Both) {
            if self.hits.contains(r, c) {
                score += 2.0;
            } else if self.is_resolved((r, c)) {
                score -= 1.0;
            }
        }
        if row == 0 || col == 0 || row == BOARD_SIZE - 1 || col == BOARD_SIZE - 1 {
            score -= 0.5;
        }
        score - self.memory.miss_density((row, col))
    }

    fn best_scored(&self, candidates: &[Coord]) -> Coord {
        let mut best = candidates[0];
        let mut best_score = self.score(best);
        for &cell in &candidates[1..] {
            let score = self.score(cell);
            if score > best_score {
                best = cell;
                best_score = score;
            }
        }
        best
    }

    /// Feed back the resolver's answer for a shot at `coord`.
    ///
    /// `ship` is the ship reported with a hit; on a sink its surroundings
    /// are remembered as water.
    pub fn observe(&mut self, coord: Coord, outcome: ShotOutcome, ship: Option<&Ship>) {
        let (row, col) = coord;
        if self.shots_fired.set(row, col).is_err() {
            warn!("ai: ignoring result for off-board cell {:?}", coord);
            return;
        }
        match outcome {
            ShotOutcome::Repeat => {
                warn!("ai: cell {:?} was already resolved", coord);
                return;
            }
            ShotOutcome::Miss => self.on_miss(),
            ShotOutcome::Hit => self.on_hit(coord),
            ShotOutcome::Sunk => self.on_sunk(coord, ship),
        }

        let hit = outcome.is_hit();
        self.memory.push(ShotRecord {
            coord,
            hit,
            sunk: outcome.is_sunk(),
        });
        if hit {
            self.hit_streak += 1;
            self.miss_streak = 0;
            self.longest_hit_streak = self.longest_hit_streak.max(self.hit_streak);
        } else {
            self.miss_streak += 1;
            self.hit_streak = 0;
        }
        if self.difficulty == Difficulty::Hard && self.memory.len() >= HIT_RATE_WINDOW {
            if let Some(rate) = self.memory.hit_rate(HIT_RATE_WINDOW) {
                self.strategy = AdaptiveStrategy::from_hit_rate(rate);
            }
        }
    }

    fn on_hit(&mut self, coord: Coord) {
        let _ = self.hits.set(coord.0, coord.1);
        match self.mode {
            AiMode::Hunting => {
                debug!("ai: hit at {:?}, targeting", coord);
                self.mode = AiMode::Targeting;
                self.last_hit = Some(coord);
                self.direction = Some(TargetDirection::Both);
                self.lead = vec![coord];
            }
            AiMode::Targeting => {
                if matches!(self.direction, None | Some(TargetDirection::Both)) {
                    if let Some(axis) = self.last_hit.and_then(|prev| axis_between(prev, coord)) {
                        debug!("ai: target lies {:?}", axis);
                        self.direction = Some(axis);
                    }
                }
                self.last_hit = Some(coord);
                self.lead.push(coord);
            }
        }
    }

    fn on_sunk(&mut self, coord: Coord, ship: Option<&Ship>) {
        let _ = self.hits.set(coord.0, coord.1);
        if let Some(hull) = ship.and_then(|s| BB::from_iter(s.cells()).ok()) {
            self.known_water |= hull.neighborhood() & !hull;
        }
        debug!("ai: sank ship at {:?}, hunting", coord);
        self.reset_hunt();
    }

    fn on_miss(&mut self) {
        if self.mode == AiMode::Targeting && self.direction == Some(TargetDirection::Both) {
            let (first, last) = match (self.lead.first(), self.lead.last()) {
                (Some(&first), Some(&last)) => (first, last),
                _ => return,
            };
            if let Some(axis) = axis_between(first, last) {
                self.direction = Some(axis);
            }
        }
    }

    fn reset_hunt(&mut self) {
        self.mode = AiMode::Hunting;
        self.last_hit = None;
        self.direction = None;
        self.lead.clear();
    }

    /// Choose a cell, fire at `board` and learn from the result.
    pub fn take_turn<R: Rng + ?Sized>(&mut self, board: &Board, rng: &mut R) -> Option<(Coord, Shot)> {
        let coord = self.next_shot(rng)?;
        match shot::fire(board, coord.0, coord.1) {
            Ok(shot) => {
                self.observe(coord, shot.outcome, shot.ship.as_ref());
                Some((coord, shot))
            }
            Err(err) => {
                warn!("ai shot at {:?} rejected: {}", coord, err);
                let _ = self.shots_fired.set(coord.0, coord.1);
                None
            }
        }
    }
}

/// In-bounds orthogonal neighbours along `direction`: up, down, left, right.
fn neighbours((row, col): Coord, direction: TargetDirection) -> Vec<Coord> {
    let vertical = [(row.wrapping_sub(1), col), (row + 1, col)];
    let horizontal = [(row, col.wrapping_sub(1)), (row, col + 1)];
    let cells: Vec<Coord> = match direction {
        TargetDirection::Horizontal => horizontal.to_vec(),
        TargetDirection::Vertical => vertical.to_vec(),
        TargetDirection::Both => vertical.into_iter().chain(horizontal).collect(),
    };
    cells
        .into_iter()
        .filter(|&(r, c)| Board::in_bounds(r, c))
        .collect()
}

fn axis_between(a: Coord, b: Coord) -> Option<TargetDirection> {
    if a.0 == b.0 && a.1 != b.1 {
        Some(TargetDirection::Horizontal)
    } else if a.1 == b.1 && a.0 != b.0 {
        Some(TargetDirection::Vertical)
    } else {
        None
    }
}
