//! Transient explosion effects
//!
//! Explosions never collide. They are simulated only so the renderer can
//! read their size and lifecycle phase from the snapshot.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Starting diameter of every explosion
pub const EXPLOSION_START_SIZE: f32 = 5.0;
/// Growth rate (size units per ms)
const GROWTH_PER_MS: f32 = 1.0 / 5.0;
/// Lifetime in ms for the 0..1 phase scalar
const LIFETIME_MS: f32 = 1000.0;

/// Visual category, for the renderer only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplosionKind {
    Standard,
    Ground,
    Sky,
    Buggy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplosionStage {
    Growing,
    Fading,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    /// Centre
    pub pos: Vec2,
    pub size: f32,
    pub max_size: f32,
    /// Lifecycle 0..1
    pub phase: f32,
    pub stage: ExplosionStage,
    pub kind: ExplosionKind,
}

impl Explosion {
    pub fn new(pos: Vec2, max_size: f32, kind: ExplosionKind) -> Self {
        Self {
            pos,
            size: EXPLOSION_START_SIZE,
            max_size,
            phase: 0.0,
            stage: ExplosionStage::Growing,
            kind,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.phase = (self.phase + dt / LIFETIME_MS).min(1.0);
        if self.stage == ExplosionStage::Growing {
            self.size = (self.size + dt * GROWTH_PER_MS).min(self.max_size);
            if self.size >= self.max_size {
                self.stage = ExplosionStage::Fading;
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.phase >= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grow_then_fade() {
        let mut boom = Explosion::new(Vec2::new(10.0, 10.0), 30.0, ExplosionKind::Ground);
        boom.update(50.0);
        assert_eq!(boom.stage, ExplosionStage::Growing);
        assert_eq!(boom.size, 15.0);
        boom.update(100.0);
        assert_eq!(boom.stage, ExplosionStage::Fading);
        assert_eq!(boom.size, 30.0);
        assert!(!boom.is_finished());
    }

    #[test]
    fn test_finishes_after_lifetime() {
        let mut boom = Explosion::new(Vec2::ZERO, 80.0, ExplosionKind::Buggy);
        for _ in 0..62 {
            boom.update(16.0);
        }
        assert!(!boom.is_finished());
        boom.update(16.0);
        assert!(boom.is_finished());
    }
}
