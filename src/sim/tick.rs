//! Per-frame simulation driver
//!
//! One call to [`SimulationDriver::tick`] per display refresh. Input commands
//! are applied first, then the world advances through a fixed stage order:
//! player, projectiles and mines, terrain and spawners, enemies, collisions,
//! then game-over and level checks, and finally compaction.

use rand::Rng;

use super::collision::resolve_collisions;
use super::error::TickFault;
use super::levels::{MILESTONE_LEVEL, level_config};
use super::player::{HitKind, HitOutcome};
use super::snapshot::Snapshot;
use super::state::{GamePhase, GameStatus, PendingEvent, World};
use super::weapons::BulletDirection;
use crate::config::SimulationConfig;
use crate::frame_factor;

/// Abstract input commands, consumed at the start of a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft(bool),
    MoveRight(bool),
    Jump,
    Shoot,
    ShootUp,
    DropMine,
    ToggleGodMode,
    ToggleFreeze,
    Restart,
}

/// Clamp elapsed wall time into a safe tick length
pub fn clamp_elapsed(elapsed_ms: f32, max_frame_ms: f32) -> f32 {
    if elapsed_ms.is_nan() {
        0.0
    } else {
        elapsed_ms.clamp(0.0, max_frame_ms)
    }
}

/// Owns the world and the run configuration
#[derive(Debug, Clone)]
pub struct SimulationDriver {
    world: World,
    config: SimulationConfig,
}

impl SimulationDriver {
    pub fn new(config: SimulationConfig) -> Self {
        let config = config.sanitized();
        log::info!("New run, seed {}", config.seed);
        Self {
            world: World::new(config.seed, config.starting_lives),
            config,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn status(&self) -> GameStatus {
        match self.world.phase {
            GamePhase::Running if self.config.freeze => GameStatus::Paused,
            GamePhase::Running => GameStatus::Running,
            GamePhase::GameOver => GameStatus::GameOver,
            GamePhase::Celebrating => GameStatus::Celebrating,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.world, self.status(), self.config.god_mode)
    }

    pub fn pending_event(&self) -> Option<&PendingEvent> {
        self.world.events.front()
    }

    /// Acknowledge the event currently presented
    pub fn dismiss_event(&mut self) -> Option<PendingEvent> {
        self.world.events.dismiss()
    }

    /// Rebuild the world from a fresh seed drawn from the current run
    pub fn restart(&mut self) {
        let seed = self.world.rng.random::<u64>();
        self.config.freeze = false;
        self.world = World::new(seed, self.config.starting_lives);
        log::info!("Restarted, seed {seed}");
    }

    /// Apply `commands` and advance the world by `elapsed_ms`
    pub fn tick(&mut self, commands: &[Command], elapsed_ms: f32) {
        let dt = clamp_elapsed(elapsed_ms, self.config.max_frame_ms);

        for &command in commands {
            if command == Command::Restart {
                self.restart();
                return;
            }
            self.apply(command);
        }

        if self.status() != GameStatus::Running {
            return;
        }

        self.world.events.update(dt);
        if let Err(fault) = step(&mut self.world, &self.config, dt) {
            log::error!("Tick {} aborted: {fault}", self.world.tick_count);
            self.world.events.push_diagnostic(fault.to_string());
        }
        self.world.tick_count += 1;
        self.world.elapsed_ms += f64::from(dt);
    }

    fn apply(&mut self, command: Command) {
        let status = self.status();
        if command == Command::ToggleFreeze {
            if matches!(status, GameStatus::Running | GameStatus::Paused) {
                self.config.freeze = !self.config.freeze;
                log::info!("Freeze {}", if self.config.freeze { "on" } else { "off" });
            }
            return;
        }
        if status != GameStatus::Running {
            log::debug!("Ignoring {command:?} while {status:?}");
            return;
        }

        let world = &mut self.world;
        let player = &mut world.registry.player;
        match command {
            Command::MoveLeft(active) => player.moving_left = active,
            Command::MoveRight(active) => player.moving_right = active,
            Command::Jump => {
                player.jump();
            }
            Command::Shoot => {
                world.registry.shoot(BulletDirection::Forward);
            }
            Command::ShootUp => {
                world.registry.shoot(BulletDirection::Upward);
            }
            Command::DropMine => {
                world.registry.drop_mine(&world.terrain);
            }
            Command::ToggleGodMode => {
                self.config.god_mode = !self.config.god_mode;
                log::info!("God mode {}", if self.config.god_mode { "on" } else { "off" });
            }
            Command::ToggleFreeze | Command::Restart => {}
        }
    }
}

/// Advance a running world by `dt` ms
pub fn step(world: &mut World, config: &SimulationConfig, dt: f32) -> Result<(), TickFault> {
    let god_mode = config.god_mode;
    let level = world.ledger.level();
    let level_cfg = level_config(level);
    let scroll_delta = level_cfg.scroll_speed * frame_factor(dt);

    // Player
    let player = &mut world.registry.player;
    player.update_health(dt);
    player.weapons.update(dt);
    if let Some(landing) = player.update_motion(dt, &world.terrain, god_mode) {
        if landing.crater && player.hit(HitKind::Crater, god_mode) == HitOutcome::LifeLost {
            log::debug!("Crater took a life, {} left", player.lives);
            world.events.push(PendingEvent::CraterDeathMessage);
        }
    }

    // Projectiles, obstacles and player mines
    world.registry.update_bullets(dt);
    world.registry.update_obstacles(dt, scroll_delta);
    world.registry.update_mines(dt, scroll_delta);

    // Terrain and timed obstacles
    world.ledger.advance(scroll_delta);
    world
        .terrain
        .advance_window(scroll_delta, &mut world.rng, &mut world.registry)?;
    world.obstacle_spawner.update(
        dt,
        level_cfg.obstacle_interval_ms,
        &mut world.rng,
        &mut world.registry,
    );

    // Enemies
    world
        .registry
        .update_enemies(dt, level_cfg.scroll_speed, &mut world.rng);
    let mut spawned = Vec::new();
    world
        .enemy_spawner
        .update(dt, level, &mut world.rng, &mut spawned);
    for enemy in spawned {
        let kind = enemy.kind();
        let id = world.registry.push_enemy(enemy);
        log::debug!("Spawned {kind:?} #{id}");
    }
    world.registry.update_explosions(dt);

    // Collisions
    world.registry.check_finite()?;
    let report = resolve_collisions(&mut world.registry, &mut world.ledger, god_mode);
    if let Some(outcome) = report.player_hit {
        log::debug!("Player hit: {outcome:?}, {} lives left", world.registry.player.lives);
    }

    if world.registry.player.lives == 0 {
        world.phase = GamePhase::GameOver;
        log::info!("Game over, score {}", world.ledger.score());
    } else if world.ledger.is_level_complete() {
        let next = world.ledger.complete_level();
        if next == MILESTONE_LEVEL {
            world.phase = GamePhase::Celebrating;
            world.events.push(PendingEvent::Level42Reached);
            log::info!("Milestone level {next} reached");
        } else {
            world.registry.player.gain_life();
            world.events.push(PendingEvent::LevelComplete {
                level: next,
                description: level_config(next).description.to_string(),
            });
            log::info!("Level {next}");
        }
    }

    world.registry.compact();
    Ok(())
}
