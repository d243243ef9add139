//! Read-only view of the world for the renderer

use serde::Serialize;

use super::effects::{ExplosionKind, ExplosionStage};
use super::enemy::EnemyKind;
use super::obstacle::ObstacleKind;
use super::player::Motion;
use super::state::{GameStatus, PendingEvent, World};
use super::terrain::TerrainSegment;
use super::weapons::BulletDirection;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub lives: u8,
    pub shield: f32,
    pub energy: f32,
    pub invulnerable_ms: f32,
    pub airborne: bool,
    pub forward_flash: bool,
    pub upward_flash: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnemyView {
    pub id: u32,
    pub kind: EnemyKind,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub health: u32,
    pub dashing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObstacleView {
    pub id: u32,
    pub kind: ObstacleKind,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub falling: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulletView {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub direction: BulletDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MineView {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub arm_timer_ms: f32,
    pub active: bool,
    pub explode: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplosionView {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub max_size: f32,
    pub phase: f32,
    pub stage: ExplosionStage,
    pub kind: ExplosionKind,
}

/// Everything the renderer may read after a tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub player: PlayerView,
    pub enemies: Vec<EnemyView>,
    pub obstacles: Vec<ObstacleView>,
    pub player_bullets: Vec<BulletView>,
    pub player_mines: Vec<MineView>,
    pub explosions: Vec<ExplosionView>,
    /// World-space segments; subtract `scroll_offset` for screen x
    pub terrain_window: Vec<TerrainSegment>,
    pub scroll_offset: f32,
    pub score: u64,
    pub level: u32,
    pub level_progress: f32,
    pub section: char,
    pub game_state: GameStatus,
    pub god_mode: bool,
    pub pending_event: Option<PendingEvent>,
}

impl Snapshot {
    pub fn capture(world: &World, game_state: GameStatus, god_mode: bool) -> Self {
        let registry = &world.registry;
        let player = &registry.player;

        Self {
            tick: world.tick_count,
            player: PlayerView {
                x: player.pos.x,
                y: player.pos.y,
                w: player.size.x,
                h: player.size.y,
                lives: player.lives,
                shield: player.shield,
                energy: player.energy,
                invulnerable_ms: player.invulnerable_ms,
                airborne: matches!(player.motion, Motion::Jumping { .. }),
                forward_flash: player.weapons.forward_flash_ms > 0.0,
                upward_flash: player.weapons.upward_flash_ms > 0.0,
            },
            enemies: registry
                .enemies
                .iter()
                .map(|e| EnemyView {
                    id: e.id,
                    kind: e.kind(),
                    x: e.pos.x,
                    y: e.pos.y,
                    w: e.size.x,
                    h: e.size.y,
                    health: e.health,
                    dashing: e.is_dashing(),
                })
                .collect(),
            obstacles: registry
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    id: o.id,
                    kind: o.kind,
                    x: o.pos.x,
                    y: o.pos.y,
                    w: o.size.x,
                    h: o.size.y,
                    falling: o.is_falling(),
                })
                .collect(),
            player_bullets: registry
                .player_bullets
                .iter()
                .map(|b| BulletView {
                    id: b.id,
                    x: b.pos.x,
                    y: b.pos.y,
                    w: b.size.x,
                    h: b.size.y,
                    direction: b.direction,
                })
                .collect(),
            player_mines: registry
                .player_mines
                .iter()
                .map(|m| MineView {
                    id: m.id,
                    x: m.pos.x,
                    y: m.pos.y,
                    w: m.size.x,
                    h: m.size.y,
                    arm_timer_ms: m.arm_timer_ms.max(0.0),
                    active: m.is_active(),
                    explode: m.explode,
                })
                .collect(),
            explosions: registry
                .explosions
                .iter()
                .map(|e| ExplosionView {
                    x: e.pos.x,
                    y: e.pos.y,
                    size: e.size,
                    max_size: e.max_size,
                    phase: e.phase,
                    stage: e.stage,
                    kind: e.kind,
                })
                .collect(),
            terrain_window: world.terrain.segments().copied().collect(),
            scroll_offset: world.terrain.scroll_offset(),
            score: world.ledger.score(),
            level: world.ledger.level(),
            level_progress: world.ledger.level_progress(),
            section: world.ledger.section_label(),
            game_state,
            god_mode,
            pending_event: world.events.front().cloned(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
