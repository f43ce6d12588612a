//! Pong Arcade entry point
//!
//! The browser build is driven from JS through `platform::web::WebGame`.
//! Natively this runs a headless match with a scripted human paddle, which
//! is handy for watching the simulation through the log
//! (`RUST_LOG=info cargo run -- hard`).

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use pong_arcade::consts::{DEFAULT_SURFACE_HEIGHT, DEFAULT_SURFACE_WIDTH};
    use pong_arcade::platform::FrameRequest;
    use pong_arcade::sim::Surface;
    use pong_arcade::{FrameStatus, GameLoop, Input, Settings};

    /// Give up after ten simulated minutes
    const MAX_FRAMES: u32 = 60 * 60 * 10;

    env_logger::init();
    log::info!("Pong Arcade (native, headless) starting...");

    let settings = match std::env::var("PONG_SETTINGS") {
        Ok(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| Settings::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(settings) => settings,
            Err(err) => {
                log::error!("Failed to load settings from {path}: {err}");
                std::process::exit(1);
            }
        },
        Err(_) => Settings::default(),
    };

    let seed: u64 = rand::random();
    let surface = Surface::new(DEFAULT_SURFACE_WIDTH, DEFAULT_SURFACE_HEIGHT);
    let mut game = match GameLoop::new(settings, surface, seed) {
        Ok(game) => game,
        Err(err) => {
            log::error!("Invalid settings: {err}");
            std::process::exit(1);
        }
    };

    let mut frames = FrameRequest::new();
    game.boot();
    if let Some(id) = std::env::args().nth(1) {
        if !game.handle_input(Input::SetDifficulty(id.clone()), &mut frames) {
            log::warn!(
                "Unknown difficulty {id:?}, keeping {}",
                game.selected_difficulty().as_str()
            );
        }
    }
    game.handle_input(Input::Start, &mut frames);

    let interval = game.state().settings.frame_interval_ms();
    let mut now = 0.0;
    let mut frame = 0;
    while frames.take() && frame < MAX_FRAMES {
        // Scripted player: chase the ball with the paddle centre
        let state = game.state();
        let center = state.paddle_one.y + state.paddle_one.height / 2.0;
        let input = if state.ball.pos.y < center - state.paddle_one.speed {
            Input::MoveUp
        } else if state.ball.pos.y > center + state.paddle_one.speed {
            Input::MoveDown
        } else {
            Input::StopMove
        };
        game.handle_input(input, &mut frames);

        match game.on_frame(now, &mut frames) {
            Ok(FrameStatus::Ended(outcome)) => {
                let who = if outcome.player_won() { "Player" } else { "Computer" };
                log::info!(
                    "{who} wins {}:{} after {} ticks",
                    outcome.score.left,
                    outcome.score.right,
                    game.state().time_ticks
                );
            }
            Ok(_) => {}
            Err(err) => {
                log::error!("Simulation failed: {err}");
                std::process::exit(1);
            }
        }

        now += interval;
        frame += 1;
    }

    if game.state().outcome.is_none() {
        let score = game.state().score;
        log::info!("Stopped after {frame} frames at {}:{}", score.left, score.right);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::init, this is just to satisfy the compiler
}
