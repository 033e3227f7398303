#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use seabattle::{
    auto_place_fleet, init_logging, AiState, Difficulty, DriverConfig, Fleet, GameEvent,
    MatchDriver, Phase, Side, CLASSIC_FLEET, STANDARD_FLEET,
};

#[cfg(feature = "std")]
use clap::{Parser, Subcommand};
#[cfg(feature = "std")]
use rand::rngs::SmallRng;
#[cfg(feature = "std")]
use rand::{Rng, SeedableRng};
#[cfg(feature = "std")]
use serde_json::json;
#[cfg(feature = "std")]
use tokio::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
#[cfg(feature = "std")]
enum Commands {
    /// Let the computer hunt down random fleets and report shot counts as JSON.
    Sim {
        #[arg(long, default_value = "medium")]
        difficulty: Difficulty,
        #[arg(long, default_value_t = 100)]
        games: usize,
        #[arg(long, help = "Fix RNG seed for reproducible runs (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, help = "Use the five-ship, seventeen-cell fleet")]
        classic: bool,
    },
    /// Watch a full match where a random-firing autopilot plays the human side.
    Play {
        #[arg(long, default_value = "medium")]
        difficulty: Difficulty,
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, help = "Pause before each computer shot; defaults to the difficulty's pace")]
        delay_ms: Option<u64>,
    },
}

#[cfg(feature = "std")]
fn make_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(s) => SmallRng::seed_from_u64(s),
        None => SmallRng::from_rng(&mut rand::rng()),
    }
}

#[cfg(feature = "std")]
fn simulate(difficulty: Difficulty, games: usize, seed: Option<u64>, fleet: Fleet) -> anyhow::Result<()> {
    let mut rng = make_rng(seed);
    let mut shots_per_game = Vec::with_capacity(games);
    for _ in 0..games {
        let mut board = auto_place_fleet(&fleet, &mut rng)?;
        let mut ai = AiState::new(difficulty);
        let mut shots = 0usize;
        while !board.all_ships_sunk() {
            let Some((_, shot)) = ai.take_turn(&board, &mut rng) else {
                anyhow::bail!("computer ran out of shots with ships afloat");
            };
            board = shot.board;
            shots += 1;
        }
        shots_per_game.push(shots);
    }

    let total: usize = shots_per_game.iter().sum();
    let result = json!({
        "difficulty": difficulty,
        "games": games,
        "fleet_cells": fleet.total_cells(),
        "average_shots": total as f64 / games.max(1) as f64,
        "min_shots": shots_per_game.iter().min(),
        "max_shots": shots_per_game.iter().max(),
    });
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

#[cfg(feature = "std")]
fn describe(event: &GameEvent) -> Option<String> {
    match event {
        GameEvent::ShotResolved {
            attacker,
            coord,
            outcome,
            ship,
        } => Some(match ship {
            Some(ship) => format!("{:?} fires at {:?}: {:?} ({})", attacker, coord, outcome, ship.class()),
            None => format!("{:?} fires at {:?}: {:?}", attacker, coord, outcome),
        }),
        GameEvent::PhaseChanged { from, to } => Some(format!("phase {} -> {}", from, to)),
        GameEvent::GameFinished { winner } => Some(format!("{:?} wins", winner)),
        GameEvent::ShipPlaced { .. } | GameEvent::TurnPassed { .. } => None,
    }
}

#[cfg(feature = "std")]
async fn play(difficulty: Difficulty, seed: Option<u64>, delay_ms: Option<u64>) -> anyhow::Result<()> {
    let config = DriverConfig {
        seed,
        turn_delay: delay_ms.map(Duration::from_millis),
        fleet: None,
    };
    let mut autopilot = make_rng(seed.map(|s| s.wrapping_add(1)));
    let (mut driver, mut events) = MatchDriver::new(config);
    driver.new_match(difficulty).await?;
    driver.auto_place().await?;

    loop {
        driver.settle().await;
        while let Ok(event) = events.try_recv() {
            if let Some(line) = describe(&event) {
                println!("{}", line);
            }
        }
        let session = driver
            .snapshot()
            .await
            .ok_or_else(|| anyhow::anyhow!("match vanished"))?;
        if session.phase() == Phase::Finished {
            println!("\nYour fleet:\n{}", session.player_board().view(true));
            println!("Computer fleet:\n{}", session.computer_board().view(true));
            return Ok(());
        }
        if session.current_turn() != Side::Player {
            anyhow::bail!("computer turn was never scheduled");
        }
        let open: Vec<(usize, usize)> = (!session.computer_board().fired_map())
            .iter_set_bits()
            .collect();
        if open.is_empty() {
            anyhow::bail!("no open cells left but the match is not over");
        }
        let (row, col) = open[autopilot.random_range(0..open.len())];
        driver.fire(row, col).await?;
    }
}

#[cfg(feature = "std")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Sim {
            difficulty,
            games,
            seed,
            classic,
        } => {
            let fleet = if classic { CLASSIC_FLEET } else { STANDARD_FLEET };
            simulate(difficulty, games, seed, fleet)?;
        }
        Commands::Play {
            difficulty,
            seed,
            delay_ms,
        } => {
            if let Some(s) = seed {
                println!("Using fixed seed: {} (game will be reproducible)", s);
            }
            play(difficulty, seed, delay_ms).await?;
        }
    }
    Ok(())
}
