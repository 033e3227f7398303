use std::time::Duration;

use seabattle::settings::DIFFICULTY_KEY;
use seabattle::{
    load_difficulty, Difficulty, DriverConfig, GameEvent, GameSession, MatchDriver,
    MemorySettings, Phase, SettingsStore, ShipClass, Orientation, ShotError, ShotOutcome, Side,
    BOARD_SIZE, CLASSIC_FLEET,
};

fn config(seed: u64) -> DriverConfig {
    DriverConfig {
        seed: Some(seed),
        turn_delay: None,
        fleet: Some(CLASSIC_FLEET),
    }
}

fn open_water(session: &GameSession) -> (usize, usize) {
    let board = session.computer_board();
    (0..BOARD_SIZE)
        .flat_map(|r| (0..BOARD_SIZE).map(move |c| (r, c)))
        .find(|&(r, c)| {
            let cell = board.cell(r, c).unwrap();
            !cell.is_hit() && cell.ship_id().is_none()
        })
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_computer_replies_after_delay() {
    let (mut driver, mut events) = MatchDriver::new(config(1));
    driver.new_match(Difficulty::Easy).await.unwrap();
    driver.auto_place().await.unwrap();

    let session = driver.snapshot().await.unwrap();
    assert_eq!(session.phase(), Phase::Battle);
    let (r, c) = open_water(&session);
    let report = driver.fire(r, c).await.unwrap();
    assert_eq!(report.outcome, ShotOutcome::Miss);

    // Nothing happens before the thinking delay runs out.
    let waiting = driver.snapshot().await.unwrap();
    assert_eq!(waiting.current_turn(), Side::Computer);
    assert!(waiting.player_board().fired_map().is_empty());

    driver.settle().await;
    let session = driver.snapshot().await.unwrap();
    assert!(!session.player_board().fired_map().is_empty());
    assert_eq!(session.phase(), Phase::Battle);
    assert_eq!(session.current_turn(), Side::Player);

    let mut computer_shots = 0;
    while let Ok(event) = events.try_recv() {
        if matches!(event, GameEvent::ShotResolved { attacker: Side::Computer, .. }) {
            computer_shots += 1;
        }
    }
    assert_eq!(computer_shots, session.ai().shots_fired().count_ones());
    assert!(computer_shots >= 1);
}

#[tokio::test(start_paused = true)]
async fn test_new_match_discards_pending_turn() {
    let (mut driver, _events) = MatchDriver::new(DriverConfig {
        turn_delay: Some(Duration::from_millis(250)),
        ..config(2)
    });
    let first = driver.new_match(Difficulty::Medium).await.unwrap();
    driver.auto_place().await.unwrap();
    let session = driver.snapshot().await.unwrap();
    let (r, c) = open_water(&session);
    driver.fire(r, c).await.unwrap();

    let second = driver.new_match(Difficulty::Hard).await.unwrap();
    assert_ne!(first, second);
    assert_eq!(driver.generation().await, 2);

    tokio::time::sleep(Duration::from_secs(5)).await;
    driver.settle().await;
    let session = driver.snapshot().await.unwrap();
    assert_eq!(session.id(), second);
    assert_eq!(session.phase(), Phase::Placement);
    assert_eq!(session.difficulty(), Difficulty::Hard);
    assert!(session.player_board().fired_map().is_empty());
    assert_eq!(session.ai().shots_fired().count_ones(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_session_errors_surface() {
    let (mut driver, _events) = MatchDriver::new(config(3));
    assert!(driver.fire(0, 0).await.is_err());
    assert!(driver.snapshot().await.is_none());

    driver.new_match(Difficulty::Easy).await.unwrap();
    let err = driver.fire(0, 0).await.unwrap_err();
    assert_eq!(
        err.downcast_ref::<ShotError>(),
        Some(&ShotError::WrongPhase(Phase::Placement))
    );
    driver
        .place_ship(ShipClass::Carrier, (0, 0), Orientation::Horizontal)
        .await
        .unwrap();
    assert!(driver
        .place_ship(ShipClass::Destroyer, (1, 1), Orientation::Vertical)
        .await
        .is_err());
}

#[tokio::test]
async fn test_difficulty_from_settings() {
    let store = MemorySettings::new();
    assert_eq!(load_difficulty(&store).await, Difficulty::Medium);

    store.set(DIFFICULTY_KEY, "hard").await.unwrap();
    let (mut driver, _events) = MatchDriver::new(config(4));
    driver.new_match_from_settings(&store).await.unwrap();
    assert_eq!(driver.snapshot().await.unwrap().difficulty(), Difficulty::Hard);

    store.set(DIFFICULTY_KEY, "insane").await.unwrap();
    assert_eq!(load_difficulty(&store).await, Difficulty::Medium);
}
