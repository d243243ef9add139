//! Player vehicle: movement, jump phases and health
//!
//! The vehicle stays inside the left half of the viewport while the ground
//! scrolls under it. Jumps follow a scripted three-phase profile rather than
//! ballistic physics: a short thrust, a floaty hang, then a ramped descent.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::obstacle::ObstacleKind;
use super::terrain::{SegmentKind, TerrainStream};
use super::weapons::{Bullet, BulletDirection, PlayerMine, Weapons};
use crate::consts::*;
use crate::frame_factor;

pub const JUMP_DURATION_MS: f32 = 1000.0;
pub const JUMP_COOLDOWN_MS: f32 = 250.0;
/// End of the thrust phase as a fraction of the jump
const THRUST_END: f32 = 0.3;
/// End of the hang phase as a fraction of the jump
const HANG_END: f32 = 0.7;
/// Ground this far below the wheels starts a fall instead of a snap
pub const FALL_THRESHOLD: f32 = 20.0;
/// Auto-jump probes the ground this far ahead of the vehicle centre
pub const HAZARD_LOOKAHEAD: f32 = 80.0;
const HAZARD_THRESHOLD: f32 = 30.0;
const HAZARD_THRESHOLD_GOD: f32 = 15.0;

pub const MAX_ENERGY: f32 = 100.0;
pub const MAX_SHIELD: f32 = 100.0;
const ENERGY_REGEN: f32 = 0.2;
const SHIELD_REGEN: f32 = 0.05;
const SHIELD_ROCK_COST: f32 = 25.0;

pub const SPAWN_INVULNERABLE_MS: f32 = 2000.0;
const LIFE_LOST_INVULNERABLE_MS: f32 = 2000.0;
const SHIELD_INVULNERABLE_MS: f32 = 500.0;
const GOD_INVULNERABLE_MS: f32 = 1000.0;

/// Phase of an airborne vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JumpPhase {
    Thrust,
    Hang,
    Descent,
}

impl JumpPhase {
    /// Phase for a normalized jump time `t` in 0..1
    pub fn at(t: f32) -> Self {
        if t < THRUST_END {
            JumpPhase::Thrust
        } else if t < HANG_END {
            JumpPhase::Hang
        } else {
            JumpPhase::Descent
        }
    }
}

/// Vertical movement state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Motion {
    Grounded,
    Jumping {
        phase: JumpPhase,
        elapsed_ms: f32,
        /// Fall started over a crater; landing costs a life
        into_crater: bool,
    },
}

/// Ground contact worth reporting: a touchdown, or resting in a crater
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Landing {
    pub crater: bool,
}

/// Kind of damage applied through [`Player::hit`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitKind {
    Crater,
    Rock,
    Mine,
    Bullet,
    /// Ramming an enemy
    Impact,
}

impl From<ObstacleKind> for HitKind {
    fn from(kind: ObstacleKind) -> Self {
        match kind {
            ObstacleKind::Rock => HitKind::Rock,
            ObstacleKind::Mine => HitKind::Mine,
            ObstacleKind::Bullet => HitKind::Bullet,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Still invulnerable
    Ignored,
    ShieldAbsorbed,
    /// God mode took the hit
    Shrugged,
    LifeLost,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// px per reference frame
    pub vel: Vec2,
    pub lives: u8,
    pub shield: f32,
    pub energy: f32,
    pub invulnerable_ms: f32,
    pub motion: Motion,
    pub since_jump_ms: f32,
    pub weapons: Weapons,
    pub moving_left: bool,
    pub moving_right: bool,
}

impl Player {
    pub fn new(lives: u8) -> Self {
        Self {
            pos: Vec2::new(PLAYER_START_X, GROUND_Y - PLAYER_HEIGHT),
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            vel: Vec2::ZERO,
            lives: lives.min(MAX_LIVES),
            shield: MAX_SHIELD,
            energy: MAX_ENERGY,
            invulnerable_ms: SPAWN_INVULNERABLE_MS,
            motion: Motion::Grounded,
            since_jump_ms: JUMP_COOLDOWN_MS,
            weapons: Weapons::default(),
            moving_left: false,
            moving_right: false,
        }
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_ms > 0.0
    }

    pub fn is_grounded(&self) -> bool {
        matches!(self.motion, Motion::Grounded)
    }

    /// Start a jump if grounded and past the re-trigger cooldown
    pub fn jump(&mut self) -> bool {
        if !self.is_grounded() || self.since_jump_ms < JUMP_COOLDOWN_MS {
            return false;
        }
        self.motion = Motion::Jumping {
            phase: JumpPhase::Thrust,
            elapsed_ms: 0.0,
            into_crater: false,
        };
        self.vel.y = -JUMP_FORCE;
        self.since_jump_ms = 0.0;
        true
    }

    /// Surface the wheels rest on. God mode glides over craters.
    pub fn support_y(&self, terrain: &TerrainStream, god_mode: bool) -> f32 {
        let raw = terrain.ground_y_at_screen(self.center_x());
        if god_mode { raw.min(GROUND_Y) } else { raw }
    }

    fn over_crater(&self, terrain: &TerrainStream) -> bool {
        terrain
            .segment_at_screen(self.center_x())
            .is_some_and(|s| s.kind == SegmentKind::Crater)
    }

    /// Countdowns and resource regeneration. Runs before motion each tick.
    pub fn update_health(&mut self, dt: f32) {
        let f = frame_factor(dt);
        self.invulnerable_ms = (self.invulnerable_ms - dt).max(0.0);
        if self.energy < MAX_ENERGY {
            self.energy = (self.energy + ENERGY_REGEN * f).min(MAX_ENERGY);
        }
        // Shield only recharges from a full energy bank
        if self.energy >= MAX_ENERGY && self.shield < MAX_SHIELD {
            self.shield = (self.shield + SHIELD_REGEN * f).min(MAX_SHIELD);
        }
    }

    /// Apply damage of `kind`
    pub fn hit(&mut self, kind: HitKind, god_mode: bool) -> HitOutcome {
        if self.is_invulnerable() {
            return HitOutcome::Ignored;
        }
        match kind {
            HitKind::Crater => self.lose_life(),
            HitKind::Rock if self.shield > 0.0 => {
                self.shield = (self.shield - SHIELD_ROCK_COST).max(0.0);
                self.invulnerable_ms = SHIELD_INVULNERABLE_MS;
                HitOutcome::ShieldAbsorbed
            }
            _ if god_mode => {
                self.invulnerable_ms = GOD_INVULNERABLE_MS;
                HitOutcome::Shrugged
            }
            _ => self.lose_life(),
        }
    }

    fn lose_life(&mut self) -> HitOutcome {
        self.lives = self.lives.saturating_sub(1);
        self.invulnerable_ms = LIFE_LOST_INVULNERABLE_MS;
        HitOutcome::LifeLost
    }

    /// Grant a life, up to the cap
    pub fn gain_life(&mut self) {
        self.lives = (self.lives + 1).min(MAX_LIVES);
    }

    /// Horizontal steering, jump physics and ground following
    pub fn update_motion(
        &mut self,
        dt: f32,
        terrain: &TerrainStream,
        god_mode: bool,
    ) -> Option<Landing> {
        let f = frame_factor(dt);
        self.since_jump_ms += dt;

        let steer = (self.moving_right as i8 - self.moving_left as i8) as f32;
        self.vel.x = steer * PLAYER_SPEED;
        self.pos.x = (self.pos.x + self.vel.x * f).clamp(0.0, GAME_WIDTH / 2.0);

        let support = self.support_y(terrain, god_mode);
        let landing = match self.motion {
            Motion::Jumping {
                phase,
                elapsed_ms,
                into_crater,
            } => self.step_jump(dt, phase, elapsed_ms, into_crater, support, terrain, god_mode),
            Motion::Grounded => {
                self.follow_ground(support, terrain, god_mode);
                // A crater floor keeps hurting for as long as the wheels rest on it
                let in_crater = self.is_grounded() && !god_mode && self.over_crater(terrain);
                in_crater.then_some(Landing { crater: true })
            }
        };

        if self.is_grounded() {
            self.auto_jump(terrain, god_mode);
        }
        landing
    }

    #[allow(clippy::too_many_arguments)]
    fn step_jump(
        &mut self,
        dt: f32,
        previous: JumpPhase,
        elapsed_ms: f32,
        into_crater: bool,
        support: f32,
        terrain: &TerrainStream,
        god_mode: bool,
    ) -> Option<Landing> {
        let f = frame_factor(dt);
        let elapsed_ms = elapsed_ms + dt;
        let t = (elapsed_ms / JUMP_DURATION_MS).min(1.0);
        let phase = JumpPhase::at(t);

        match phase {
            JumpPhase::Thrust => {
                self.vel.y = -JUMP_FORCE * (1.0 - t / THRUST_END) * 0.9;
            }
            JumpPhase::Hang => {
                if previous != JumpPhase::Hang {
                    // Peak: kill most of the upward speed
                    self.vel.y = -0.3;
                }
                self.vel.y += GRAVITY * 0.15 * f;
            }
            JumpPhase::Descent => {
                let d = (t - HANG_END) / (1.0 - HANG_END);
                self.vel.y += GRAVITY * (0.4 + d * 0.8) * f;
            }
        }
        self.pos.y += self.vel.y * f;

        if self.pos.y >= support - self.size.y {
            self.pos.y = support - self.size.y;
            self.vel.y = 0.0;
            self.motion = Motion::Grounded;
            let crater = into_crater || (!god_mode && self.over_crater(terrain));
            return Some(Landing { crater });
        }

        self.motion = Motion::Jumping {
            phase,
            elapsed_ms,
            into_crater,
        };
        None
    }

    fn follow_ground(&mut self, support: f32, terrain: &TerrainStream, god_mode: bool) {
        if support - self.bottom() > FALL_THRESHOLD {
            // Drop in visibly; the hit lands with the wheels
            self.motion = Motion::Jumping {
                phase: JumpPhase::Descent,
                elapsed_ms: HANG_END * JUMP_DURATION_MS,
                into_crater: !god_mode && self.over_crater(terrain),
            };
            self.vel.y = 0.0;
            log::debug!("Crater fall at x={:.1}", self.pos.x);
        } else {
            self.pos.y = support - self.size.y;
            self.vel.y = 0.0;
        }
    }

    fn auto_jump(&mut self, terrain: &TerrainStream, god_mode: bool) {
        if self.since_jump_ms < JUMP_COOLDOWN_MS {
            return;
        }
        let here = terrain.ground_y_at_screen(self.center_x());
        let ahead = terrain.ground_y_at_screen(self.center_x() + HAZARD_LOOKAHEAD);
        let threshold = if god_mode {
            HAZARD_THRESHOLD_GOD
        } else {
            HAZARD_THRESHOLD
        };
        if ahead > here + threshold {
            self.jump();
        }
    }

    pub fn try_shoot(&mut self, live_bullets: usize, direction: BulletDirection) -> Option<Bullet> {
        self.weapons
            .try_shoot(&mut self.energy, live_bullets, self.pos, self.size, direction)
    }

    pub fn try_drop_mine(&mut self, live_mines: usize, ground_y: f32) -> Option<PlayerMine> {
        self.weapons
            .try_drop_mine(&mut self.energy, live_mines, self.pos.x, ground_y)
    }
}
