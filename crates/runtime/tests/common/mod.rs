#![allow(dead_code)]

use std::sync::{Arc, Once};

use hexline_content::ContentFactory;
use hexline_core::{Coord, GameState, Move};
use hexline_runtime::{GameRepository, GameSession, InMemoryGameRepo};

pub const SOLDIER: u32 = 1;

pub const HOME_BASE: Coord = Coord::new(-3, 0);
pub const MINES: Coord = Coord::ORIGIN;

static TRACING: Once = Once::new();

/// Routes runtime logs to the test harness; filter with `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn skirmish<R: GameRepository>(game_id: &str, seed: u64, repo: Arc<R>) -> GameSession<R> {
    init_tracing();
    GameSession::from_content(game_id, &ContentFactory::bundled(), "skirmish", seed, repo)
        .expect("bundled skirmish")
}

pub fn memory_skirmish(seed: u64) -> GameSession<InMemoryGameRepo> {
    skirmish("skirmish", seed, Arc::new(InMemoryGameRepo::new()))
}

/// Player 1's opening: walk the soldier onto the mines, start capturing,
/// recruit at home and pass.
pub fn opening() -> Vec<Move> {
    vec![
        Move::move_unit(Coord::new(-2, 0), MINES),
        Move::capture(MINES),
        Move::build(HOME_BASE, SOLDIER),
        Move::end_turn(),
    ]
}

/// Session over an arbitrary state with the bundled rules and settings.
pub fn session_from_state(state: GameState) -> GameSession<InMemoryGameRepo> {
    init_tracing();
    let factory = ContentFactory::bundled();
    GameSession::create(
        "custom",
        Arc::new(factory.load_rules().expect("rules")),
        Arc::new(factory.load_settings().expect("settings")),
        Arc::new(InMemoryGameRepo::new()),
        state,
    )
    .expect("fresh repository")
}
