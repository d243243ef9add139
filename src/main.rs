//! Lunar Rover headless runner
//!
//! Plays a scripted minute of the game without a renderer, logging the
//! events a UI would present, then prints the final snapshot as JSON.
//!
//! Usage: `lunar-rover [config.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use lunar_rover::SimulationConfig;
    use lunar_rover::consts::FRAME_MS;
    use lunar_rover::sim::{GameStatus, SimulationDriver};

    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => SimulationConfig::load(path),
        None => SimulationConfig::default(),
    };
    log::info!("Lunar Rover (headless) starting with {config:?}");

    let mut driver = SimulationDriver::new(config);

    // One simulated minute at the reference frame rate
    for frame in 0..3750u32 {
        driver.tick(script(frame), FRAME_MS);

        while let Some(event) = driver.dismiss_event() {
            log::info!("[frame {frame}] {}", event.message());
        }

        if matches!(driver.status(), GameStatus::GameOver | GameStatus::Celebrating) {
            log::info!("Run ended at frame {frame}: {:?}", driver.status());
            break;
        }
    }

    match driver.snapshot().to_json() {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Can't serialize snapshot: {e}"),
    }
}

/// Fixed demo input: creep forward, fire steadily, and drop the odd mine
#[cfg(not(target_arch = "wasm32"))]
fn script(frame: u32) -> &'static [lunar_rover::sim::Command] {
    use lunar_rover::sim::Command;

    match frame % 120 {
        0 => &[Command::MoveRight(true)],
        30 => &[Command::MoveRight(false), Command::Shoot],
        45 => &[Command::ShootUp],
        60 => &[Command::MoveLeft(true), Command::Shoot],
        90 => &[Command::MoveLeft(false), Command::DropMine],
        f if f % 10 == 5 => &[Command::Shoot],
        _ => &[],
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No headless runner on wasm
}
