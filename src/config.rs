//! Run configuration
//!
//! Mode flags travel into every tick through this value instead of living
//! in ambient globals, so each mode can be exercised in isolation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_FRAME_MS, MAX_LIVES};

/// Seed used when none is configured
pub const DEFAULT_SEED: u64 = 0x4d4f_4f4e;

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed for the run's random source
    pub seed: u64,
    /// Suppress most player damage and clear obstacles on contact
    pub god_mode: bool,
    /// Suspend world updates while still publishing snapshots
    pub freeze: bool,
    /// Clamp for elapsed time between ticks (ms)
    pub max_frame_ms: f32,
    /// Lives at the start of a run
    pub starting_lives: u8,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            god_mode: false,
            freeze: false,
            max_frame_ms: MAX_FRAME_MS,
            starting_lives: 3,
        }
    }
}

impl SimulationConfig {
    /// Parse a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load from a JSON file, falling back to defaults when it can't be used
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Can't read config {}: {e}; using defaults", path.display());
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Invalid config {}: {e}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Clamp values that would otherwise break tick invariants
    pub fn sanitized(mut self) -> Self {
        self.starting_lives = self.starting_lives.clamp(1, MAX_LIVES);
        if !self.max_frame_ms.is_finite() || self.max_frame_ms <= 0.0 {
            self.max_frame_ms = MAX_FRAME_MS;
        }
        self
    }
}
