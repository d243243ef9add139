//! Enemy behaviour: zigzagging UFOs and the pursuing buggy

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::obstacle::{Obstacle, ObstacleSink};
use crate::consts::*;
use crate::{frame_factor, sign};

pub const UFO_SIZE: Vec2 = Vec2::new(40.0, 20.0);
pub const BUGGY_SIZE: Vec2 = Vec2::new(60.0, 30.0);
const BUGGY_HEALTH: u32 = 4;

/// UFO drift relative to scroll speed
const UFO_DRIFT: f32 = 1.2;
/// Bombs only drop when this close to the player horizontally
const BOMB_RANGE: f32 = 300.0;

/// Buggy aims for a point this far behind the player
const BUGGY_TRAIL: f32 = 120.0;
const BUGGY_FAR: f32 = 300.0;
const BUGGY_MAX_STEP: f32 = 3.0;
const DASH_RANGE: f32 = 200.0;
const DASH_CHANCE: f64 = 0.005;
const DASH_SPEED: f32 = 4.0;
const DASH_DURATION_MS: f32 = 1000.0;

/// Enemy variant tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    UfoHigh,
    UfoMid,
    UfoLow,
    Buggy,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 4] = [
        EnemyKind::UfoHigh,
        EnemyKind::UfoMid,
        EnemyKind::UfoLow,
        EnemyKind::Buggy,
    ];

    /// Score for each bullet that lands
    pub fn hit_score(self) -> u64 {
        match self {
            EnemyKind::UfoHigh => 50,
            EnemyKind::UfoMid => 75,
            EnemyKind::UfoLow => 100,
            EnemyKind::Buggy => 150,
        }
    }

    /// First level this kind spawns on
    pub fn intro_level(self) -> u32 {
        match self {
            EnemyKind::UfoHigh => 2,
            EnemyKind::UfoMid => 3,
            EnemyKind::UfoLow => 5,
            EnemyKind::Buggy => 4,
        }
    }

    /// Base spawn interval (ms) at the intro level
    pub fn base_interval_ms(self) -> f32 {
        match self {
            EnemyKind::UfoHigh => 8000.0,
            EnemyKind::UfoMid => 12000.0,
            EnemyKind::UfoLow => 15000.0,
            EnemyKind::Buggy => 20000.0,
        }
    }

    /// Countdown before the first spawn of a run
    pub fn first_spawn_ms(self) -> f32 {
        match self {
            EnemyKind::UfoHigh => 3000.0,
            EnemyKind::UfoMid => 5000.0,
            EnemyKind::UfoLow => 7000.0,
            EnemyKind::Buggy => 10000.0,
        }
    }

    /// Interval shrink per level past the intro
    fn interval_ramp(self) -> f32 {
        match self {
            EnemyKind::Buggy => 0.15,
            _ => 0.1,
        }
    }

    /// Spawn interval at `level`, floored at a fifth of the base
    pub fn spawn_interval_ms(self, level: u32) -> f32 {
        let over = level.saturating_sub(self.intro_level()) as f32;
        let scale = (1.0 - over * self.interval_ramp()).max(0.2);
        self.base_interval_ms() * scale
    }

    fn ufo_params(self) -> Option<UfoParams> {
        let (altitude, health, amplitude, frequency) = match self {
            EnemyKind::UfoHigh => (80.0, 1, 40.0, 0.01),
            EnemyKind::UfoMid => (140.0, 2, 30.0, 0.015),
            EnemyKind::UfoLow => (200.0, 3, 20.0, 0.02),
            EnemyKind::Buggy => return None,
        };
        Some(UfoParams {
            altitude,
            health,
            amplitude,
            frequency,
        })
    }
}

struct UfoParams {
    altitude: f32,
    health: u32,
    amplitude: f32,
    frequency: f32,
}

/// Per-variant timers and movement state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Behavior {
    Ufo {
        kind: EnemyKind,
        base_y: f32,
        bomb_countdown_ms: f32,
    },
    Buggy {
        dash_cooldown_ms: f32,
        dash_remaining_ms: f32,
        shoot_countdown_ms: f32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub health: u32,
    pub behavior: Behavior,
    pub destroyed: bool,
}

impl Enemy {
    /// UFO entering at the right edge. Returns `None` for the buggy kind.
    pub fn ufo(kind: EnemyKind, rng: &mut impl Rng) -> Option<Self> {
        let params = kind.ufo_params()?;
        Some(Self {
            id: 0,
            pos: Vec2::new(GAME_WIDTH - 10.0, params.altitude),
            size: UFO_SIZE,
            health: params.health,
            behavior: Behavior::Ufo {
                kind,
                base_y: params.altitude,
                bomb_countdown_ms: rng.random_range(2000.0..4000.0),
            },
            destroyed: false,
        })
    }

    /// Buggy entering from behind on the left
    pub fn buggy(rng: &mut impl Rng) -> Self {
        Self {
            id: 0,
            pos: Vec2::new(-OFFSCREEN_MARGIN, GROUND_Y - BUGGY_SIZE.y),
            size: BUGGY_SIZE,
            health: BUGGY_HEALTH,
            behavior: Behavior::Buggy {
                dash_cooldown_ms: 0.0,
                dash_remaining_ms: 0.0,
                shoot_countdown_ms: rng.random_range(2000.0..3000.0),
            },
            destroyed: false,
        }
    }

    pub fn spawn(kind: EnemyKind, rng: &mut impl Rng) -> Self {
        match Self::ufo(kind, rng) {
            Some(ufo) => ufo,
            None => Self::buggy(rng),
        }
    }

    pub fn kind(&self) -> EnemyKind {
        match self.behavior {
            Behavior::Ufo { kind, .. } => kind,
            Behavior::Buggy { .. } => EnemyKind::Buggy,
        }
    }

    pub fn is_dashing(&self) -> bool {
        matches!(self.behavior, Behavior::Buggy { dash_remaining_ms, .. } if dash_remaining_ms > 0.0)
    }

    /// Run one tick of movement and weapon timers. Projectiles go to `sink`.
    pub fn update(
        &mut self,
        dt: f32,
        scroll_speed: f32,
        player_x: f32,
        rng: &mut impl Rng,
        sink: &mut impl ObstacleSink,
    ) {
        let f = frame_factor(dt);
        let kind = self.kind();
        match &mut self.behavior {
            Behavior::Ufo {
                base_y,
                bomb_countdown_ms,
                ..
            } => {
                let Some(params) = kind.ufo_params() else {
                    return;
                };
                self.pos.x -= scroll_speed * UFO_DRIFT * f;
                self.pos.y = *base_y + (self.pos.x * params.frequency).sin() * params.amplitude;

                *bomb_countdown_ms -= dt;
                if *bomb_countdown_ms <= 0.0 {
                    *bomb_countdown_ms = rng.random_range(2000.0..5000.0);
                    if (self.pos.x - player_x).abs() < BOMB_RANGE {
                        let drop_at = Vec2::new(self.pos.x, self.pos.y + 10.0);
                        sink.push_obstacle(Obstacle::bomb(drop_at));
                    }
                }
            }
            Behavior::Buggy {
                dash_cooldown_ms,
                dash_remaining_ms,
                shoot_countdown_ms,
            } => {
                let to_target = player_x - BUGGY_TRAIL - self.pos.x;
                let dist = to_target.abs();
                let factor = if dist > BUGGY_FAR { 0.08 } else { 0.05 };
                self.pos.x += sign(to_target) * (dist * factor).min(BUGGY_MAX_STEP) * f;

                *dash_cooldown_ms -= dt;
                if *dash_cooldown_ms <= 0.0 && dist < DASH_RANGE && rng.random_bool(DASH_CHANCE) {
                    *dash_remaining_ms = DASH_DURATION_MS;
                    *dash_cooldown_ms = rng.random_range(5000.0..10000.0);
                }
                if *dash_remaining_ms > 0.0 {
                    self.pos.x += DASH_SPEED * sign(to_target) * f;
                    *dash_remaining_ms = (*dash_remaining_ms - dt).max(0.0);
                }

                *shoot_countdown_ms -= dt;
                if *shoot_countdown_ms <= 0.0 {
                    *shoot_countdown_ms = rng.random_range(1200.0..2200.0);
                    sink.push_obstacle(Obstacle::enemy_bullet(Vec2::new(
                        self.pos.x + 30.0,
                        self.pos.y + 10.0,
                    )));
                }
            }
        }
    }

    /// Remove one point of health. Returns true when this hit was fatal.
    pub fn take_hit(&mut self) -> bool {
        self.health = self.health.saturating_sub(1);
        self.health == 0
    }

    /// Past either horizontal edge
    pub fn is_offscreen(&self) -> bool {
        self.pos.x < -OFFSCREEN_MARGIN || self.pos.x > GAME_WIDTH + OFFSCREEN_MARGIN
    }

    pub fn is_expired(&self) -> bool {
        self.destroyed || self.is_offscreen()
    }
}

/// Timed spawners, one countdown per enemy kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawner {
    /// Countdowns in `EnemyKind::ALL` order
    pub countdowns_ms: [f32; 4],
}

impl Default for EnemySpawner {
    fn default() -> Self {
        Self {
            countdowns_ms: EnemyKind::ALL.map(EnemyKind::first_spawn_ms),
        }
    }
}

impl EnemySpawner {
    /// Tick every countdown. Kinds introduced by `level` spawn on expiry.
    pub fn update(&mut self, dt: f32, level: u32, rng: &mut impl Rng, spawned: &mut Vec<Enemy>) {
        let countdowns = self.countdowns_ms.iter_mut();
        for (kind, countdown) in EnemyKind::ALL.into_iter().zip(countdowns) {
            *countdown -= dt;
            if level >= kind.intro_level() && *countdown <= 0.0 {
                *countdown = kind.spawn_interval_ms(level);
                spawned.push(Enemy::spawn(kind, rng));
            }
        }
    }
}
