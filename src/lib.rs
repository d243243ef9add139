//! Lunar Rover - simulation core of a side-scrolling moon buggy arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (terrain, entities, collisions, driver)
//! - `config`: Run configuration (seed, mode flags, frame clamp)
//!
//! Rendering, HUD, dialogs, audio and input mapping live outside this crate.
//! They consume [`sim::Snapshot`] and feed [`sim::Command`] values back in.

pub mod config;
pub mod sim;

pub use config::SimulationConfig;

/// Game configuration constants
///
/// Speeds and accelerations are expressed per reference frame of
/// [`consts::FRAME_MS`] milliseconds and scaled by `dt / FRAME_MS`.
pub mod consts {
    /// Reference frame length (ms) that per-frame constants are tuned against
    pub const FRAME_MS: f32 = 16.0;
    /// Largest elapsed time fed into a single tick
    pub const MAX_FRAME_MS: f32 = 100.0;

    /// Viewport dimensions
    pub const GAME_WIDTH: f32 = 800.0;
    pub const GAME_HEIGHT: f32 = 500.0;

    /// Ground band at the bottom of the viewport
    pub const GROUND_HEIGHT: f32 = 50.0;
    /// Flat ground surface (y grows downward)
    pub const GROUND_Y: f32 = GAME_HEIGHT - GROUND_HEIGHT;

    /// Player vehicle
    pub const PLAYER_WIDTH: f32 = 60.0;
    pub const PLAYER_HEIGHT: f32 = 30.0;
    pub const PLAYER_START_X: f32 = 200.0;
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const MAX_LIVES: u8 = 5;

    /// Jump tuning
    pub const GRAVITY: f32 = 0.6;
    pub const JUMP_FORCE: f32 = 15.0;

    /// Player projectiles
    pub const BULLET_SPEED: f32 = 10.0;
    pub const BULLET_SIZE: f32 = 5.0;

    /// Entities further than this past either edge are culled
    pub const OFFSCREEN_MARGIN: f32 = 50.0;
}

/// Fraction of a reference frame covered by `dt` milliseconds
#[inline]
pub fn frame_factor(dt: f32) -> f32 {
    dt / consts::FRAME_MS
}

/// Sign of `v` that is zero for zero (unlike `f32::signum`)
#[inline]
pub fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_factor() {
        assert_eq!(frame_factor(16.0), 1.0);
        assert_eq!(frame_factor(8.0), 0.5);
    }

    #[test]
    fn test_sign_zero() {
        assert_eq!(sign(0.0), 0.0);
        assert_eq!(sign(-3.0), -1.0);
        assert_eq!(sign(2.5), 1.0);
    }
}
