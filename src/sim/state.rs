//! World state and the entity registry
//!
//! The registry exclusively owns every live entity collection. Other
//! subsystems only append to it through narrow handles such as
//! [`ObstacleSink`]. Removal is deferred: entities are flagged during the
//! tick and dropped in one [`EntityRegistry::compact`] pass at its end.

use std::collections::VecDeque;

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effects::Explosion;
use super::enemy::{Enemy, EnemySpawner};
use super::error::TickFault;
use super::levels::level_config;
use super::obstacle::{Obstacle, ObstacleSink, ObstacleSpawner};
use super::player::Player;
use super::score::ScoreLedger;
use super::terrain::TerrainStream;
use super::weapons::BulletDirection;
use super::weapons::{Bullet, PlayerMine};

/// Text shown when a crater claims a life
pub const CRATER_DEATH_TEXT: &str = "You drove full speed ahead into a crater. That was \
    unnecessarily dumb and even your sophisticated shields could not save you from your \
    own stupidity.";
/// Level banner lifetime
pub const LEVEL_BANNER_MS: f32 = 3000.0;
/// Crater message lifetime
pub const CRATER_MESSAGE_MS: f32 = 5000.0;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Running,
    /// Out of lives; waiting for restart
    GameOver,
    /// Milestone level reached; waiting for restart
    Celebrating,
}

/// Externally reported game state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Running,
    /// Freeze mode is on
    Paused,
    GameOver,
    Celebrating,
}

/// Something the UI collaborator should present and then dismiss
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PendingEvent {
    CraterDeathMessage,
    LevelComplete { level: u32, description: String },
    Level42Reached,
    /// A tick was aborted
    Diagnostic { message: String },
}

impl PendingEvent {
    /// Display text for the event
    pub fn message(&self) -> String {
        match self {
            PendingEvent::CraterDeathMessage => CRATER_DEATH_TEXT.to_string(),
            PendingEvent::LevelComplete { level, description } => {
                format!("Level {level}: {description}")
            }
            PendingEvent::Level42Reached => {
                "Level 42! The answer to life, the universe and everything.".to_string()
            }
            PendingEvent::Diagnostic { message } => message.clone(),
        }
    }

    /// Lifetime before the event clears itself, if it does
    pub fn auto_dismiss_ms(&self) -> Option<f32> {
        match self {
            PendingEvent::CraterDeathMessage => Some(CRATER_MESSAGE_MS),
            PendingEvent::LevelComplete { .. } => Some(LEVEL_BANNER_MS),
            PendingEvent::Level42Reached | PendingEvent::Diagnostic { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct QueuedEvent {
    event: PendingEvent,
    remaining_ms: Option<f32>,
}

/// FIFO of pending events. Only the front one is presented.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventQueue {
    queue: VecDeque<QueuedEvent>,
}

impl EventQueue {
    pub fn push(&mut self, event: PendingEvent) {
        let remaining_ms = event.auto_dismiss_ms();
        self.queue.push_back(QueuedEvent {
            event,
            remaining_ms,
        });
    }

    /// Queue a diagnostic unless it repeats the newest entry
    pub fn push_diagnostic(&mut self, message: String) {
        let event = PendingEvent::Diagnostic { message };
        if self.queue.back().is_some_and(|q| q.event == event) {
            return;
        }
        self.push(event);
    }

    pub fn front(&self) -> Option<&PendingEvent> {
        self.queue.front().map(|q| &q.event)
    }

    pub fn dismiss(&mut self) -> Option<PendingEvent> {
        self.queue.pop_front().map(|q| q.event)
    }

    /// Run the front event's auto-dismiss countdown
    pub fn update(&mut self, dt: f32) {
        let expired = match self.queue.front_mut() {
            Some(QueuedEvent {
                remaining_ms: Some(remaining),
                ..
            }) => {
                *remaining -= dt;
                *remaining <= 0.0
            }
            _ => false,
        };
        if expired {
            self.queue.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Owner of every live entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRegistry {
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub obstacles: Vec<Obstacle>,
    pub player_bullets: Vec<Bullet>,
    pub player_mines: Vec<PlayerMine>,
    pub explosions: Vec<Explosion>,
    next_id: u32,
}

impl EntityRegistry {
    pub fn new(lives: u8) -> Self {
        Self {
            player: Player::new(lives),
            enemies: Vec::new(),
            obstacles: Vec::new(),
            player_bullets: Vec::new(),
            player_mines: Vec::new(),
            explosions: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn push_enemy(&mut self, mut enemy: Enemy) -> u32 {
        enemy.id = self.next_entity_id();
        let id = enemy.id;
        self.enemies.push(enemy);
        id
    }

    pub fn live_bullets(&self) -> usize {
        self.player_bullets.iter().filter(|b| !b.spent).count()
    }

    pub fn live_mines(&self) -> usize {
        self.player_mines.iter().filter(|m| !m.removed).count()
    }

    /// Fire a player bullet. Returns false when the shot was denied.
    pub fn shoot(&mut self, direction: BulletDirection) -> bool {
        let live = self.live_bullets();
        let Some(mut bullet) = self.player.try_shoot(live, direction) else {
            return false;
        };
        bullet.id = self.next_entity_id();
        self.player_bullets.push(bullet);
        true
    }

    /// Drop a mine on the ground under the player. Returns false when denied.
    pub fn drop_mine(&mut self, terrain: &TerrainStream) -> bool {
        let live = self.live_mines();
        let ground_y = terrain.ground_y_at_screen(self.player.pos.x);
        let Some(mut mine) = self.player.try_drop_mine(live, ground_y) else {
            return false;
        };
        mine.id = self.next_entity_id();
        log::debug!("Mine #{} dropped at x={:.1}", mine.id, mine.pos.x);
        self.player_mines.push(mine);
        true
    }

    pub fn update_bullets(&mut self, dt: f32) {
        for bullet in self.player_bullets.iter_mut().filter(|b| !b.spent) {
            bullet.update(dt);
        }
    }

    pub fn update_obstacles(&mut self, dt: f32, scroll_delta: f32) {
        for obstacle in self.obstacles.iter_mut().filter(|o| !o.destroyed) {
            obstacle.update(dt, scroll_delta);
        }
    }

    /// Arm, scroll and detonate player mines
    pub fn update_mines(&mut self, dt: f32, scroll_delta: f32) {
        for mine in self.player_mines.iter_mut().filter(|m| !m.removed) {
            if let Some(blast) = mine.update(dt, scroll_delta) {
                self.explosions.push(blast);
            }
        }
    }

    /// Move enemies and collect the projectiles they release
    pub fn update_enemies(&mut self, dt: f32, scroll_speed: f32, rng: &mut impl Rng) {
        let player_x = self.player.pos.x;
        let mut released: Vec<Obstacle> = Vec::new();
        for enemy in self.enemies.iter_mut().filter(|e| !e.destroyed) {
            enemy.update(dt, scroll_speed, player_x, rng, &mut released);
        }
        for obstacle in released {
            self.push_obstacle(obstacle);
        }
    }

    pub fn update_explosions(&mut self, dt: f32) {
        for explosion in &mut self.explosions {
            explosion.update(dt);
        }
    }

    /// Drop everything flagged for removal this tick
    pub fn compact(&mut self) {
        self.enemies.retain(|e| !e.is_expired());
        self.obstacles.retain(|o| !o.is_expired());
        self.player_bullets.retain(|b| !b.spent);
        self.player_mines.retain(|m| !m.removed);
        self.explosions.retain(|e| !e.is_finished());
    }

    /// Every position must be finite before collisions run
    pub fn check_finite(&self) -> Result<(), TickFault> {
        let fault = |entity: &'static str, id: u32| TickFault::NonFinitePosition { entity, id };
        if !self.player.pos.is_finite() {
            return Err(fault("player", 0));
        }
        if let Some(e) = self.enemies.iter().find(|e| !e.pos.is_finite()) {
            return Err(fault("enemy", e.id));
        }
        if let Some(o) = self.obstacles.iter().find(|o| !o.pos.is_finite()) {
            return Err(fault("obstacle", o.id));
        }
        if let Some(b) = self.player_bullets.iter().find(|b| !b.pos.is_finite()) {
            return Err(fault("bullet", b.id));
        }
        if let Some(m) = self.player_mines.iter().find(|m| !m.pos.is_finite()) {
            return Err(fault("mine", m.id));
        }
        Ok(())
    }
}

impl ObstacleSink for EntityRegistry {
    fn push_obstacle(&mut self, mut obstacle: Obstacle) {
        obstacle.id = self.next_entity_id();
        self.obstacles.push(obstacle);
    }
}

/// Complete simulation state for one run
#[derive(Debug, Clone)]
pub struct World {
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub registry: EntityRegistry,
    pub terrain: TerrainStream,
    pub ledger: ScoreLedger,
    pub enemy_spawner: EnemySpawner,
    pub obstacle_spawner: ObstacleSpawner,
    pub events: EventQueue,
    /// Ticks that advanced the world
    pub tick_count: u64,
    /// Simulated time covered by those ticks (ms)
    pub elapsed_ms: f64,
}

impl World {
    pub fn new(seed: u64, lives: u8) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut registry = EntityRegistry::new(lives);
        let terrain = TerrainStream::new(&mut rng, &mut registry);
        let ledger = ScoreLedger::default();
        let interval = level_config(ledger.level()).obstacle_interval_ms;

        Self {
            seed,
            rng,
            phase: GamePhase::Running,
            registry,
            terrain,
            ledger,
            enemy_spawner: EnemySpawner::default(),
            obstacle_spawner: ObstacleSpawner::new(interval),
            events: EventQueue::default(),
            tick_count: 0,
            elapsed_ms: 0.0,
        }
    }

    #[inline]
    pub fn player(&self) -> &Player {
        &self.registry.player
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::effects::ExplosionKind;
    use crate::sim::terrain::{SegmentKind, TerrainSegment};
    use glam::Vec2;

    #[test]
    fn test_world_new_is_deterministic() {
        let a = World::new(1234, 3);
        let b = World::new(1234, 3);
        assert_eq!(a.registry, b.registry);
        assert_eq!(
            a.terrain.segments().collect::<Vec<_>>(),
            b.terrain.segments().collect::<Vec<_>>()
        );
        assert_eq!(a.phase, GamePhase::Running);
        assert_eq!(a.player().lives, 3);
    }

    #[test]
    fn test_entity_ids_unique() {
        let mut registry = EntityRegistry::new(3);
        registry.push_obstacle(Obstacle::rock(500.0));
        registry.push_obstacle(Obstacle::rock(700.0));
        assert!(registry.shoot(BulletDirection::Forward));
        let mut ids: Vec<u32> = registry.obstacles.iter().map(|o| o.id).collect();
        ids.push(registry.player_bullets[0].id);
        ids.dedup();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_shoot_respects_capacity() {
        let mut registry = EntityRegistry::new(3);
        for _ in 0..20 {
            registry.player.weapons.shot_cooldown_ms = 0.0;
            registry.player.energy = 100.0;
            registry.shoot(BulletDirection::Forward);
        }
        assert_eq!(registry.player_bullets.len(), 10);
    }

    #[test]
    fn test_drop_mine_sits_on_ground_under_player() {
        let terrain = TerrainStream::from_segments(
            [
                TerrainSegment::new(0.0, SegmentKind::Flat),
                TerrainSegment::new(150.0, SegmentKind::Crater),
            ],
            0.0,
        );
        let mut registry = EntityRegistry::new(3);
        assert!(registry.drop_mine(&terrain));
        // Left edge at x=200 is over the crater
        assert_eq!(registry.player_mines[0].pos.y, GROUND_Y + 55.0 - 20.0);
        assert!(!registry.drop_mine(&terrain));
        assert_eq!(registry.player.energy, 90.0);
    }

    #[test]
    fn test_compact_removes_flagged() {
        let mut registry = EntityRegistry::new(3);
        registry.push_obstacle(Obstacle::rock(500.0));
        registry.push_obstacle(Obstacle::rock(600.0));
        registry.obstacles[0].destroyed = true;
        registry
            .explosions
            .push(Explosion::new(Vec2::ZERO, 10.0, ExplosionKind::Standard));
        registry.explosions[0].phase = 1.0;
        registry.compact();
        assert_eq!(registry.obstacles.len(), 1);
        assert_eq!(registry.obstacles[0].id, 2);
        assert!(registry.explosions.is_empty());
    }

    #[test]
    fn test_check_finite_reports_entity() {
        let mut registry = EntityRegistry::new(3);
        registry.push_obstacle(Obstacle::rock(500.0));
        assert!(registry.check_finite().is_ok());
        registry.obstacles[0].pos.x = f32::NAN;
        assert_eq!(
            registry.check_finite(),
            Err(TickFault::NonFinitePosition {
                entity: "obstacle",
                id: 1
            })
        );
    }

    #[test]
    fn test_event_queue_auto_dismiss() {
        let mut events = EventQueue::default();
        events.push(PendingEvent::LevelComplete {
            level: 2,
            description: "High UFOs appear!".to_string(),
        });
        events.push(PendingEvent::Level42Reached);
        events.update(2999.0);
        assert!(matches!(events.front(), Some(PendingEvent::LevelComplete { .. })));
        events.update(1.0);
        assert_eq!(events.front(), Some(&PendingEvent::Level42Reached));
        events.update(1_000_000.0);
        assert_eq!(events.front(), Some(&PendingEvent::Level42Reached));
        assert_eq!(events.dismiss(), Some(PendingEvent::Level42Reached));
        assert!(events.is_empty());
    }

    #[test]
    fn test_duplicate_diagnostics_collapse() {
        let mut events = EventQueue::default();
        events.push_diagnostic("boom".to_string());
        events.push_diagnostic("boom".to_string());
        events.push_diagnostic("other".to_string());
        assert_eq!(events.len(), 2);
    }
}
