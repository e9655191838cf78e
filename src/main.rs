//! Gap Runner entry point
//!
//! Natively this runs a headless autopilot session, which is handy for
//! checking balance changes. The browser build drives `SessionController`
//! from its own frame loop.

#[cfg(not(target_arch = "wasm32"))]
use gap_runner::sim::{GameEvent, GameSession};
#[cfg(not(target_arch = "wasm32"))]
use gap_runner::{GameConfig, SessionController, Settings, persistence};

/// Longest autopilot run, in ticks
#[cfg(not(target_arch = "wasm32"))]
const MAX_TICKS: u64 = 36_000;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Gap Runner (native) starting...");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or_else(|| gap_runner::platform::now_ms() as u64);

    let config = match std::env::var("GAP_RUNNER_CONFIG") {
        Ok(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| GameConfig::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(config) => config,
            Err(e) => {
                log::error!("Ignoring config {}: {}", path, e);
                GameConfig::default()
            }
        },
        Err(_) => GameConfig::default(),
    };

    let settings = Settings::load(persistence::default_store().as_ref());
    let controller = SessionController::new(config, seed).map(|c| {
        c.with_settings(&settings)
            .with_store(persistence::default_store())
            .with_reporter(Box::new(persistence::LocalScoreReporter::new(
                persistence::default_store(),
            )))
    });
    let mut controller = match controller {
        Ok(controller) => controller,
        Err(e) => {
            log::error!("Invalid game config: {}", e);
            std::process::exit(1);
        }
    };

    controller.start();
    let mut ticks = 0;
    let mut pickups = 0;
    while !controller.is_over() && ticks < MAX_TICKS {
        if autopilot_wants_jump(controller.session(), controller.config()) {
            controller.jump();
        }
        controller.tick(1.0);
        ticks += 1;
        for event in controller.drain_events() {
            match event {
                GameEvent::PowerUpCollected { .. } => pickups += 1,
                GameEvent::WeatherChanged(weather) => log::info!("Weather: {}", weather.as_str()),
                GameEvent::TimeOfDayChanged(phase) => log::info!("Time of day: {}", phase.as_str()),
                _ => {}
            }
        }
    }

    let session = controller.session();
    println!("seed:     {}", seed);
    println!("ticks:    {}", ticks);
    println!("score:    {}", session.score.score);
    println!("combo:    {}", session.score.combo);
    println!("distance: {}", session.score.distance);
    println!("pickups:  {}", pickups);
    println!(
        "ended:    {}",
        controller
            .last_summary()
            .map(|s| format!("{:?}", s.cause))
            .unwrap_or_else(|| "still flying".to_string())
    );
    if let Some(best) = controller.high_score() {
        println!("best:     {}", best);
    }
    println!(
        "achievements: {}/{}",
        controller.achievements().unlocked_count(),
        controller.achievements().achievements().len()
    );
}

/// Jump when falling below the centre of the next gap
#[cfg(not(target_arch = "wasm32"))]
fn autopilot_wants_jump(session: &GameSession, config: &GameConfig) -> bool {
    let body = &session.body;
    let target = session
        .obstacles
        .obstacles
        .iter()
        .find(|o| o.right() >= body.pos.x)
        .map(|o| (o.gap_top + o.gap_bottom) / 2.0)
        .unwrap_or(config.field_height / 2.0);
    body.velocity >= 0.0 && body.center().y > target + config.player_size / 2.0
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host owns the frame loop
}
