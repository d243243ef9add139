//! Player weapons: forward/upward shots and ground mines

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::effects::{Explosion, ExplosionKind};
use crate::consts::*;
use crate::frame_factor;

pub const SHOOT_COOLDOWN_MS: f32 = 20.0;
pub const MINE_COOLDOWN_MS: f32 = 1000.0;
pub const MAX_BULLETS: usize = 10;
pub const MAX_MINES: usize = 5;
pub const SHOOT_ENERGY_COST: f32 = 5.0;
pub const MINE_ENERGY_COST: f32 = 10.0;
/// How long the muzzle flash shows after a shot
pub const MUZZLE_FLASH_MS: f32 = 100.0;

pub const MINE_SIZE: Vec2 = Vec2::new(20.0, 20.0);
pub const MINE_ARM_MS: f32 = 1000.0;
/// Size of the blast a detonating mine leaves behind
const MINE_BLAST_SIZE: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletDirection {
    Forward,
    Upward,
}

/// A player projectile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    /// px per reference frame
    pub vel: Vec2,
    pub direction: BulletDirection,
    /// Hit something or left the viewport
    pub spent: bool,
}

impl Bullet {
    /// Bullet leaving a vehicle whose top-left is `origin`
    pub fn fired_from(origin: Vec2, vehicle: Vec2, direction: BulletDirection) -> Self {
        let (pos, vel) = match direction {
            BulletDirection::Forward => (
                Vec2::new(origin.x + vehicle.x, origin.y + vehicle.y / 3.0),
                Vec2::new(BULLET_SPEED, 0.0),
            ),
            BulletDirection::Upward => (
                Vec2::new(origin.x + vehicle.x / 2.0, origin.y - BULLET_SIZE),
                Vec2::new(0.0, -BULLET_SPEED),
            ),
        };
        Self {
            id: 0,
            pos,
            size: Vec2::splat(BULLET_SIZE),
            vel,
            direction,
            spent: false,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.pos += self.vel * frame_factor(dt);
        let outside = self.pos.x > GAME_WIDTH
            || self.pos.x < 0.0
            || self.pos.y < 0.0
            || self.pos.y > GAME_HEIGHT;
        if outside {
            self.spent = true;
        }
    }
}

/// A mine dropped by the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerMine {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    /// Counts down to zero, then the mine is live
    pub arm_timer_ms: f32,
    /// Set by collision resolution, consumed on the next update
    pub explode: bool,
    pub removed: bool,
}

impl PlayerMine {
    /// Mine resting on ground surface `ground_y` with its left edge at `x`
    pub fn new(x: f32, ground_y: f32) -> Self {
        Self {
            id: 0,
            pos: Vec2::new(x, ground_y - MINE_SIZE.y),
            size: MINE_SIZE,
            arm_timer_ms: MINE_ARM_MS,
            explode: false,
            removed: false,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.arm_timer_ms <= 0.0
    }

    /// Arm, scroll and detonate. Returns the blast when the mine goes off.
    pub fn update(&mut self, dt: f32, scroll_delta: f32) -> Option<Explosion> {
        if !self.is_active() {
            self.arm_timer_ms -= dt;
        }
        self.pos.x -= scroll_delta;

        if self.explode {
            self.removed = true;
            return Some(Explosion::new(
                self.pos + self.size / 2.0,
                MINE_BLAST_SIZE,
                ExplosionKind::Ground,
            ));
        }
        if self.pos.x < -OFFSCREEN_MARGIN {
            self.removed = true;
        }
        None
    }
}

/// Weapon cooldowns and muzzle flash timers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Weapons {
    pub shot_cooldown_ms: f32,
    pub mine_cooldown_ms: f32,
    pub forward_flash_ms: f32,
    pub upward_flash_ms: f32,
}

impl Weapons {
    pub fn update(&mut self, dt: f32) {
        for timer in [
            &mut self.shot_cooldown_ms,
            &mut self.mine_cooldown_ms,
            &mut self.forward_flash_ms,
            &mut self.upward_flash_ms,
        ] {
            *timer = (*timer - dt).max(0.0);
        }
    }

    /// Fire if the cooldown, bullet cap and energy allow it
    pub fn try_shoot(
        &mut self,
        energy: &mut f32,
        live_bullets: usize,
        origin: Vec2,
        vehicle: Vec2,
        direction: BulletDirection,
    ) -> Option<Bullet> {
        if self.shot_cooldown_ms > 0.0
            || live_bullets >= MAX_BULLETS
            || *energy < SHOOT_ENERGY_COST
        {
            return None;
        }
        *energy -= SHOOT_ENERGY_COST;
        self.shot_cooldown_ms = SHOOT_COOLDOWN_MS;
        match direction {
            BulletDirection::Forward => self.forward_flash_ms = MUZZLE_FLASH_MS,
            BulletDirection::Upward => self.upward_flash_ms = MUZZLE_FLASH_MS,
        }
        Some(Bullet::fired_from(origin, vehicle, direction))
    }

    /// Drop a mine if the cooldown, mine cap and energy allow it
    pub fn try_drop_mine(
        &mut self,
        energy: &mut f32,
        live_mines: usize,
        x: f32,
        ground_y: f32,
    ) -> Option<PlayerMine> {
        if self.mine_cooldown_ms > 0.0 || live_mines >= MAX_MINES || *energy < MINE_ENERGY_COST {
            return None;
        }
        *energy -= MINE_ENERGY_COST;
        self.mine_cooldown_ms = MINE_COOLDOWN_MS;
        Some(PlayerMine::new(x, ground_y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const VEHICLE: Vec2 = Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT);

    #[test]
    fn test_mine_arms_after_three_ticks() {
        let mut mine = PlayerMine::new(300.0, GROUND_Y);
        assert!(mine.update(400.0, 0.0).is_none());
        assert!(!mine.is_active());
        mine.update(400.0, 0.0);
        assert!(!mine.is_active());
        mine.update(400.0, 0.0);
        assert!(mine.is_active());
    }

    #[test]
    fn test_mine_detonates_once_flagged() {
        let mut mine = PlayerMine::new(300.0, GROUND_Y);
        mine.explode = true;
        let blast = mine.update(16.0, 3.0).unwrap();
        assert!(mine.removed);
        assert_eq!(blast.kind, ExplosionKind::Ground);
        assert_eq!(blast.pos, Vec2::new(307.0, GROUND_Y - 10.0));
    }

    #[test]
    fn test_shoot_gating() {
        let mut weapons = Weapons::default();
        let mut energy = 100.0;
        let origin = Vec2::new(200.0, 420.0);

        let bullet = weapons
            .try_shoot(&mut energy, 0, origin, VEHICLE, BulletDirection::Forward)
            .unwrap();
        assert_eq!(bullet.pos, Vec2::new(260.0, 430.0));
        assert_eq!(energy, 95.0);
        assert_eq!(weapons.forward_flash_ms, MUZZLE_FLASH_MS);

        // Cooldown still running
        let denied = weapons.try_shoot(&mut energy, 1, origin, VEHICLE, BulletDirection::Upward);
        assert!(denied.is_none());
        weapons.update(SHOOT_COOLDOWN_MS);

        // At capacity
        let full = weapons.try_shoot(
            &mut energy,
            MAX_BULLETS,
            origin,
            VEHICLE,
            BulletDirection::Forward,
        );
        assert!(full.is_none());
        assert_eq!(energy, 95.0);

        let up = weapons
            .try_shoot(&mut energy, 1, origin, VEHICLE, BulletDirection::Upward)
            .unwrap();
        assert_eq!(up.pos, Vec2::new(230.0, 415.0));
        assert!(up.vel.y < 0.0);
    }

    #[test]
    fn test_drop_mine_denied_without_energy() {
        let mut weapons = Weapons::default();
        let mut energy = 9.0;
        assert!(weapons.try_drop_mine(&mut energy, 0, 200.0, GROUND_Y).is_none());
        assert_eq!(energy, 9.0);
        assert_eq!(weapons.mine_cooldown_ms, 0.0);

        energy = 50.0;
        let mine = weapons.try_drop_mine(&mut energy, 0, 200.0, GROUND_Y).unwrap();
        assert_eq!(mine.pos.y, GROUND_Y - 20.0);
        assert_eq!(energy, 40.0);
        assert!(weapons.try_drop_mine(&mut energy, 1, 200.0, GROUND_Y).is_none());
    }

    #[test]
    fn test_bullet_spent_leaving_viewport() {
        let origin = Vec2::new(200.0, 20.0);
        let mut bullet = Bullet::fired_from(origin, VEHICLE, BulletDirection::Upward);
        bullet.update(16.0);
        assert!(!bullet.spent);
        bullet.update(16.0);
        bullet.update(16.0);
        assert!(bullet.spent);
    }

    proptest! {
        #[test]
        fn prop_mine_stays_active_once_armed(
            steps in prop::collection::vec(0.0f32..100.0, 1..100),
        ) {
            let mut mine = PlayerMine::new(400.0, GROUND_Y);
            let mut was_active = false;
            let mut elapsed = 0.0;
            for dt in steps {
                mine.update(dt, 0.0);
                elapsed += dt;
                if was_active {
                    prop_assert!(mine.is_active());
                }
                if elapsed >= MINE_ARM_MS + 0.1 {
                    prop_assert!(mine.is_active());
                }
                was_active = mine.is_active();
            }
        }
    }
}
