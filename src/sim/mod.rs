//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Elapsed time is clamped and all motion scales with it
//! - One seeded RNG per run, passed explicitly
//! - Stable iteration order (insertion order, which is entity ID order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod effects;
pub mod enemy;
pub mod error;
pub mod levels;
pub mod obstacle;
pub mod player;
pub mod score;
pub mod snapshot;
pub mod state;
pub mod terrain;
pub mod tick;
pub mod weapons;

pub use collision::{Aabb, Bounded, CollisionReport, resolve_collisions};
pub use effects::{Explosion, ExplosionKind};
pub use enemy::{Enemy, EnemyKind, EnemySpawner};
pub use error::TickFault;
pub use levels::{LevelConfig, MILESTONE_LEVEL, level_config};
pub use obstacle::{Obstacle, ObstacleKind, ObstacleSink, ObstacleSpawner};
pub use player::{HitKind, HitOutcome, JumpPhase, Motion, Player};
pub use score::ScoreLedger;
pub use snapshot::Snapshot;
pub use state::{EntityRegistry, EventQueue, GamePhase, GameStatus, PendingEvent, World};
pub use terrain::{SegmentKind, TerrainSegment, TerrainStream};
pub use tick::{Command, SimulationDriver, step};
pub use weapons::{Bullet, BulletDirection, PlayerMine, Weapons};
