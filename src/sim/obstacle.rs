//! Obstacles: rocks, ground mines and enemy projectiles
//!
//! Obstacles live in viewport space and scroll left with the ground.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::frame_factor;

/// Rock footprint
pub const ROCK_SIZE: Vec2 = Vec2::new(90.0, 80.0);
/// Bomb dropped by a UFO, before it lands
pub const BOMB_SIZE: Vec2 = Vec2::new(10.0, 20.0);
pub const BOMB_FALL_SPEED: f32 = 3.0;
/// Mine lying on the ground (landed bomb or buggy wreck)
pub const GROUND_MINE_SIZE: Vec2 = Vec2::new(25.0, 25.0);
/// Projectile fired by an enemy buggy
pub const ENEMY_BULLET_SIZE: Vec2 = Vec2::new(15.0, 5.0);
pub const ENEMY_BULLET_SPEED: f32 = 7.0;

/// Chance that a timed spawner roll produces a rock
const TIMED_ROCK_CHANCE: f64 = 0.1;

/// Obstacle variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Rock,
    /// Falling bomb or landed mine
    Mine,
    /// Enemy projectile
    Bullet,
}

/// An obstacle entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Velocity in px per reference frame
    pub vel: Vec2,
    pub destroyed: bool,
}

impl Obstacle {
    fn new(kind: ObstacleKind, pos: Vec2, size: Vec2, vel: Vec2) -> Self {
        Self {
            id: 0,
            kind,
            pos,
            size,
            vel,
            destroyed: false,
        }
    }

    /// Rock resting on the flat surface with its left edge at `x`
    pub fn rock(x: f32) -> Self {
        Self::new(
            ObstacleKind::Rock,
            Vec2::new(x, GROUND_Y - ROCK_SIZE.y),
            ROCK_SIZE,
            Vec2::ZERO,
        )
    }

    /// Falling bomb released at `pos`
    pub fn bomb(pos: Vec2) -> Self {
        Self::new(
            ObstacleKind::Mine,
            pos,
            BOMB_SIZE,
            Vec2::new(0.0, BOMB_FALL_SPEED),
        )
    }

    /// Mine lying on the ground with its left edge at `x`
    pub fn ground_mine(x: f32) -> Self {
        Self::new(
            ObstacleKind::Mine,
            Vec2::new(x, GROUND_Y - GROUND_MINE_SIZE.y),
            GROUND_MINE_SIZE,
            Vec2::ZERO,
        )
    }

    pub fn enemy_bullet(pos: Vec2) -> Self {
        Self::new(
            ObstacleKind::Bullet,
            pos,
            ENEMY_BULLET_SIZE,
            Vec2::new(ENEMY_BULLET_SPEED, 0.0),
        )
    }

    /// Bomb still in the air
    pub fn is_falling(&self) -> bool {
        self.kind == ObstacleKind::Mine && self.vel.y > 0.0
    }

    /// Advance by `dt` ms while the ground scrolls `scroll_delta` px
    pub fn update(&mut self, dt: f32, scroll_delta: f32) {
        let f = frame_factor(dt);
        self.pos.x -= scroll_delta;

        if self.is_falling() {
            self.pos.y += self.vel.y * f;
            if self.pos.y + self.size.y >= GROUND_Y {
                // Bomb landed
                self.size = GROUND_MINE_SIZE;
                self.pos.y = GROUND_Y - GROUND_MINE_SIZE.y;
                self.vel = Vec2::ZERO;
            }
        }

        if self.kind == ObstacleKind::Bullet {
            self.pos.x += self.vel.x * f;
            if self.pos.x > GAME_WIDTH || self.pos.x + self.size.x < 0.0 {
                self.destroyed = true;
            }
        }
    }

    /// Ready for removal at compaction
    pub fn is_expired(&self) -> bool {
        self.destroyed || self.pos.x + self.size.x < -OFFSCREEN_MARGIN
    }
}

/// Append-only handle for code that creates obstacles it doesn't own
pub trait ObstacleSink {
    fn push_obstacle(&mut self, obstacle: Obstacle);
}

impl ObstacleSink for Vec<Obstacle> {
    fn push_obstacle(&mut self, obstacle: Obstacle) {
        self.push(obstacle);
    }
}

/// Timed rock spawner paced by the level's obstacle interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSpawner {
    pub countdown_ms: f32,
}

impl ObstacleSpawner {
    pub fn new(interval_ms: f32) -> Self {
        Self {
            countdown_ms: interval_ms,
        }
    }

    /// Tick the countdown; each expiry may roll a rock in past the right edge
    pub fn update(
        &mut self,
        dt: f32,
        interval_ms: f32,
        rng: &mut impl Rng,
        sink: &mut impl ObstacleSink,
    ) {
        self.countdown_ms -= dt;
        if self.countdown_ms > 0.0 {
            return;
        }
        self.countdown_ms = interval_ms;
        if rng.random_bool(TIMED_ROCK_CHANCE) {
            sink.push_obstacle(Obstacle::rock(GAME_WIDTH + OFFSCREEN_MARGIN));
        }
    }
}
