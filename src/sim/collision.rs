//! Collision detection and resolution
//!
//! Every entity is an axis-aligned box. Resolution runs a fixed, ordered list
//! of category passes; within a pass each entity takes part in at most one
//! collision (first match in iteration order wins) and anything already
//! destroyed or spent earlier in the tick is skipped.

use glam::Vec2;

use super::effects::{Explosion, ExplosionKind};
use super::enemy::{Enemy, EnemyKind};
use super::obstacle::{Obstacle, ObstacleKind, ObstacleSink};
use super::player::{HitKind, HitOutcome, Player};
use super::score::ScoreLedger;
use super::state::EntityRegistry;
use super::weapons::{Bullet, PlayerMine};

/// Points for shooting a rock
pub const ROCK_SCORE: u64 = 20;
/// Bonus on top of the hit score when an enemy goes down
pub const DESTROY_BONUS: u64 = 100;
/// Points for catching a buggy with a player mine
pub const MINE_KILL_SCORE: u64 = 200;
/// Offset from a destroyed buggy's left edge to the mine it leaves behind
const WRECK_MINE_OFFSET: f32 = 20.0;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Top-left corner
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size / 2.0
    }

    /// Strict overlap test; touching edges don't count
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max().x
            && self.max().x > other.min.x
            && self.min.y < other.max().y
            && self.max().y > other.min.y
    }
}

/// Anything with a collision box
pub trait Bounded {
    fn bounds(&self) -> Aabb;
}

macro_rules! impl_bounded {
    ($($ty:ty),*) => {
        $(impl Bounded for $ty {
            fn bounds(&self) -> Aabb {
                Aabb::new(self.pos, self.size)
            }
        })*
    };
}

impl_bounded!(Player, Enemy, Obstacle, Bullet, PlayerMine);

/// What happened during one resolution call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionReport {
    /// Damage applied to the player, if any
    pub player_hit: Option<HitOutcome>,
    pub rocks_destroyed: u32,
    pub enemies_destroyed: u32,
    /// Buggies caught by player mines
    pub mine_kills: u32,
    pub points: u64,
}

fn enemy_blast_kind(kind: EnemyKind) -> ExplosionKind {
    match kind {
        EnemyKind::Buggy => ExplosionKind::Buggy,
        _ => ExplosionKind::Sky,
    }
}

/// Run every collision pass for this tick
pub fn resolve_collisions(
    registry: &mut EntityRegistry,
    ledger: &mut ScoreLedger,
    god_mode: bool,
) -> CollisionReport {
    let mut report = CollisionReport::default();
    let mut blasts = Vec::new();
    let mut wreck_mines = Vec::new();

    let EntityRegistry {
        player,
        enemies,
        obstacles,
        player_bullets,
        player_mines,
        ..
    } = &mut *registry;

    // 1. Player x obstacle
    if !player.is_invulnerable() {
        let hit = obstacles
            .iter_mut()
            .find(|o| !o.destroyed && player.bounds().intersects(&o.bounds()));
        if let Some(obstacle) = hit {
            let center = obstacle.bounds().center();
            if god_mode {
                obstacle.destroyed = true;
                let kind = if obstacle.kind == ObstacleKind::Rock {
                    ExplosionKind::Ground
                } else {
                    ExplosionKind::Standard
                };
                blasts.push(Explosion::new(center, 30.0, kind));
            } else {
                if matches!(obstacle.kind, ObstacleKind::Mine | ObstacleKind::Bullet) {
                    obstacle.destroyed = true;
                    blasts.push(Explosion::new(center, 40.0, ExplosionKind::Standard));
                }
                report.player_hit = Some(player.hit(HitKind::from(obstacle.kind), god_mode));
            }
        }
    }

    // 2. Player x enemy
    if !player.is_invulnerable() {
        let rammed = enemies
            .iter_mut()
            .find(|e| !e.destroyed && player.bounds().intersects(&e.bounds()));
        if let Some(enemy) = rammed {
            enemy.destroyed = true;
            report.enemies_destroyed += 1;
            blasts.push(Explosion::new(
                enemy.bounds().center(),
                30.0,
                enemy_blast_kind(enemy.kind()),
            ));
            if !god_mode {
                report.player_hit = Some(player.hit(HitKind::Impact, god_mode));
            }
        }
    }

    // 3. Player x enemy bullet
    if !player.is_invulnerable() {
        let shot = obstacles.iter_mut().find(|o| {
            o.kind == ObstacleKind::Bullet
                && !o.destroyed
                && player.bounds().intersects(&o.bounds())
        });
        if let Some(bullet) = shot {
            bullet.destroyed = true;
            blasts.push(Explosion::new(
                bullet.bounds().center(),
                20.0,
                ExplosionKind::Standard,
            ));
            if !god_mode {
                report.player_hit = Some(player.hit(HitKind::Bullet, god_mode));
            }
        }
    }

    // 4. Player bullet x rock
    for bullet in player_bullets.iter_mut().filter(|b| !b.spent) {
        let rock = obstacles.iter_mut().find(|o| {
            o.kind == ObstacleKind::Rock
                && !o.destroyed
                && bullet.bounds().intersects(&o.bounds())
        });
        if let Some(rock) = rock {
            rock.destroyed = true;
            bullet.spent = true;
            report.rocks_destroyed += 1;
            report.points += ROCK_SCORE;
            blasts.push(Explosion::new(rock.bounds().center(), 30.0, ExplosionKind::Ground));
        }
    }

    // 5. Player bullet x enemy
    for bullet in player_bullets.iter_mut().filter(|b| !b.spent) {
        let target = enemies
            .iter_mut()
            .find(|e| !e.destroyed && bullet.bounds().intersects(&e.bounds()));
        let Some(enemy) = target else {
            continue;
        };
        bullet.spent = true;
        let kind = enemy.kind();
        report.points += kind.hit_score();
        blasts.push(Explosion::new(bullet.bounds().center(), 15.0, ExplosionKind::Standard));

        if enemy.take_hit() {
            enemy.destroyed = true;
            report.enemies_destroyed += 1;
            report.points += DESTROY_BONUS;
            blasts.push(Explosion::new(
                enemy.bounds().center(),
                60.0,
                enemy_blast_kind(kind),
            ));
            if kind == EnemyKind::Buggy {
                wreck_mines.push(Obstacle::ground_mine(enemy.pos.x + WRECK_MINE_OFFSET));
            }
        }
    }

    // 6. Armed player mine x buggy
    for mine in player_mines
        .iter_mut()
        .filter(|m| m.is_active() && !m.explode && !m.removed)
    {
        let victim = enemies.iter_mut().find(|e| {
            e.kind() == EnemyKind::Buggy
                && !e.destroyed
                && mine.bounds().intersects(&e.bounds())
        });
        if let Some(buggy) = victim {
            mine.explode = true;
            buggy.destroyed = true;
            report.enemies_destroyed += 1;
            report.mine_kills += 1;
            report.points += MINE_KILL_SCORE;
            blasts.push(Explosion::new(buggy.bounds().center(), 80.0, ExplosionKind::Buggy));
        }
    }

    ledger.add(report.points);
    registry.explosions.extend(blasts);
    for mine in wreck_mines {
        registry.push_obstacle(mine);
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::weapons::BulletDirection;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn registry() -> EntityRegistry {
        let mut registry = EntityRegistry::new(3);
        registry.player.invulnerable_ms = 0.0;
        registry
    }

    fn bullet_at(pos: Vec2) -> Bullet {
        let mut bullet = Bullet::fired_from(Vec2::ZERO, Vec2::ZERO, BulletDirection::Forward);
        bullet.pos = pos;
        bullet
    }

    fn buggy_at(x: f32) -> Enemy {
        let mut buggy = Enemy::buggy(&mut Pcg32::seed_from_u64(0));
        buggy.pos.x = x;
        buggy
    }

    #[test]
    fn test_aabb_edges_do_not_touch() {
        let a = Aabb::new(Vec2::ZERO, Vec2::splat(10.0));
        let b = Aabb::new(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        assert!(!a.intersects(&b));
        let c = Aabb::new(Vec2::new(9.9, 9.9), Vec2::splat(10.0));
        assert!(a.intersects(&c));
    }

    #[test]
    fn test_bullet_destroys_rock() {
        let mut registry = registry();
        let mut ledger = ScoreLedger::default();
        registry.push_obstacle(Obstacle::rock(100.0));
        registry.player_bullets.push(bullet_at(Vec2::new(150.0, GROUND_Y - 40.0)));

        let report = resolve_collisions(&mut registry, &mut ledger, false);
        assert!(registry.obstacles[0].destroyed);
        assert!(registry.player_bullets[0].spent);
        assert_eq!(report.rocks_destroyed, 1);
        assert_eq!(ledger.score(), 20);

        registry.compact();
        assert!(registry.player_bullets.is_empty());
        assert!(registry.obstacles.is_empty());
    }

    #[test]
    fn test_one_bullet_one_rock() {
        let mut registry = registry();
        let mut ledger = ScoreLedger::default();
        registry.push_obstacle(Obstacle::rock(100.0));
        registry.push_obstacle(Obstacle::rock(120.0));
        registry.player_bullets.push(bullet_at(Vec2::new(150.0, GROUND_Y - 40.0)));

        resolve_collisions(&mut registry, &mut ledger, false);
        assert!(registry.obstacles[0].destroyed);
        assert!(!registry.obstacles[1].destroyed);
        assert_eq!(ledger.score(), 20);
    }

    #[test]
    fn test_god_mode_clears_rock_without_damage() {
        let mut registry = registry();
        let mut ledger = ScoreLedger::default();
        let player = registry.player.clone();
        registry.push_obstacle(Obstacle::rock(player.pos.x + 10.0));

        let report = resolve_collisions(&mut registry, &mut ledger, true);
        assert!(registry.obstacles[0].destroyed);
        assert_eq!(report.player_hit, None);
        assert_eq!(registry.player.lives, player.lives);
        assert_eq!(registry.player.shield, player.shield);
        assert_eq!(registry.explosions[0].kind, ExplosionKind::Ground);
    }

    #[test]
    fn test_rock_hits_shield() {
        let mut registry = registry();
        let mut ledger = ScoreLedger::default();
        let x = registry.player.pos.x;
        registry.push_obstacle(Obstacle::rock(x + 10.0));

        let report = resolve_collisions(&mut registry, &mut ledger, false);
        assert_eq!(report.player_hit, Some(HitOutcome::ShieldAbsorbed));
        assert!(!registry.obstacles[0].destroyed);
        assert_eq!(registry.player.shield, 75.0);
    }

    #[test]
    fn test_single_player_hit_per_tick() {
        let mut registry = registry();
        let mut ledger = ScoreLedger::default();
        let pos = registry.player.pos;
        registry.push_obstacle(Obstacle::ground_mine(pos.x + 5.0));
        registry.push_obstacle(Obstacle::ground_mine(pos.x + 30.0));
        registry.push_obstacle(Obstacle::enemy_bullet(pos + Vec2::new(10.0, 10.0)));

        let report = resolve_collisions(&mut registry, &mut ledger, false);
        assert_eq!(report.player_hit, Some(HitOutcome::LifeLost));
        assert_eq!(registry.player.lives, 2);
        let destroyed: Vec<bool> = registry.obstacles.iter().map(|o| o.destroyed).collect();
        assert_eq!(destroyed, vec![true, false, false]);
    }

    #[test]
    fn test_invulnerable_player_passes_through() {
        let mut registry = registry();
        let mut ledger = ScoreLedger::default();
        registry.player.invulnerable_ms = 500.0;
        let x = registry.player.pos.x;
        registry.push_obstacle(Obstacle::ground_mine(x + 5.0));
        registry.push_enemy(buggy_at(x));

        let report = resolve_collisions(&mut registry, &mut ledger, false);
        assert_eq!(report.player_hit, None);
        assert!(!registry.obstacles[0].destroyed);
        assert!(!registry.enemies[0].destroyed);
    }

    #[test]
    fn test_ramming_enemy() {
        let mut registry = registry();
        let mut ledger = ScoreLedger::default();
        let x = registry.player.pos.x;
        registry.push_enemy(buggy_at(x + 20.0));

        let report = resolve_collisions(&mut registry, &mut ledger, false);
        assert!(registry.enemies[0].destroyed);
        assert_eq!(report.player_hit, Some(HitOutcome::LifeLost));
        assert_eq!(ledger.score(), 0);
    }

    #[test]
    fn test_bullet_kills_buggy_and_leaves_mine() {
        let mut registry = registry();
        let mut ledger = ScoreLedger::default();
        registry.player.pos.x = 0.0;
        registry.push_enemy(buggy_at(300.0));
        registry.enemies[0].health = 1;
        registry.player_bullets.push(bullet_at(Vec2::new(310.0, GROUND_Y - 20.0)));

        let report = resolve_collisions(&mut registry, &mut ledger, false);
        assert_eq!(report.enemies_destroyed, 1);
        assert_eq!(ledger.score(), 150 + DESTROY_BONUS);
        let mines: Vec<&Obstacle> = registry
            .obstacles
            .iter()
            .filter(|o| o.kind == ObstacleKind::Mine)
            .collect();
        assert_eq!(mines.len(), 1);
        assert_eq!(mines[0].pos, Vec2::new(320.0, GROUND_Y - 25.0));
    }

    #[test]
    fn test_bullet_damages_ufo() {
        let mut registry = registry();
        let mut ledger = ScoreLedger::default();
        let ufo = Enemy::ufo(EnemyKind::UfoLow, &mut Pcg32::seed_from_u64(1)).unwrap();
        let pos = ufo.pos;
        registry.push_enemy(ufo);
        registry.player_bullets.push(bullet_at(pos + Vec2::new(5.0, 5.0)));

        resolve_collisions(&mut registry, &mut ledger, false);
        assert_eq!(registry.enemies[0].health, 2);
        assert!(!registry.enemies[0].destroyed);
        assert_eq!(ledger.score(), 100);
    }

    #[test]
    fn test_only_armed_mines_catch_buggies() {
        let mut registry = registry();
        let mut ledger = ScoreLedger::default();
        registry.player.pos.x = 0.0;
        registry.push_enemy(buggy_at(500.0));
        registry.player_mines.push(PlayerMine::new(510.0, GROUND_Y));

        resolve_collisions(&mut registry, &mut ledger, false);
        assert!(!registry.enemies[0].destroyed);

        registry.player_mines[0].arm_timer_ms = 0.0;
        let report = resolve_collisions(&mut registry, &mut ledger, false);
        assert!(registry.enemies[0].destroyed);
        assert!(registry.player_mines[0].explode);
        assert_eq!(report.mine_kills, 1);
        assert_eq!(ledger.score(), MINE_KILL_SCORE);
    }

    fn arb_box() -> impl Strategy<Value = Aabb> {
        (-500.0f32..500.0, -500.0f32..500.0, 0.0f32..200.0, 0.0f32..200.0)
            .prop_map(|(x, y, w, h)| Aabb::new(Vec2::new(x, y), Vec2::new(w, h)))
    }

    proptest! {
        #[test]
        fn prop_intersection_symmetric(a in arb_box(), b in arb_box()) {
            prop_assert_eq!(a.intersects(&b), b.intersects(&a));
        }
    }
}
