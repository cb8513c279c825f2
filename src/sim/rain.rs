//! Rain controller: spawn timing, curse state machine, effect resolution
//!
//! Drives the whole scene once per frame. Tick order is load-bearing:
//! curse timer → spawns → registry flush+update → collection → per-item
//! effects → tracker purge → out-of-bounds purge. A drop can therefore never
//! be purged off the field in the same tick before it had its chance to be
//! collected.
//!
//! The controller owns all curse/probability state; the registry owns the
//! entities; the tracker owns eligibility bookkeeping. Nothing else mutates
//! any of it.

use std::rc::Rc;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{RainError, RainResult};
use crate::platform::{AudioOutput, Collector, Drawer, MusicHandle, SoundHandle, TextureHandle};
use crate::sim::collection::CollectionTracker;
use crate::sim::droplet::{DropKind, Droplet};
use crate::sim::movement::{FallStraight, MovementPolicy};
use crate::sim::registry::EntityRegistry;

/// Texture handles for the four drop variants, supplied by the asset system
#[derive(Debug, Clone, Copy)]
pub struct DropTextures {
    pub good: TextureHandle,
    pub bad: TextureHandle,
    pub cleanup: TextureHandle,
    pub curse: TextureHandle,
}

/// Curse effect state. `remaining` only exists while active and transitions
/// out exactly when it would reach zero or below.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CurseState {
    Inactive,
    Active { remaining: f32 },
}

impl CurseState {
    pub fn is_active(&self) -> bool {
        matches!(self, CurseState::Active { .. })
    }

    /// Remaining duration, 0 when inactive
    pub fn remaining(&self) -> f32 {
        match self {
            CurseState::Inactive => 0.0,
            CurseState::Active { remaining } => *remaining,
        }
    }
}

/// What the host loop should do after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    /// Collector ran out of lives
    GameOver,
}

/// Spawn/effect orchestrator for the falling-drop scene
pub struct Rain {
    registry: EntityRegistry,
    tracker: CollectionTracker,
    textures: DropTextures,
    sound: SoundHandle,
    music: MusicHandle,
    // One shared descent policy per variant; droplets borrow these
    good_fall: Rc<FallStraight>,
    bad_fall: Rc<FallStraight>,
    cleanup_fall: Rc<FallStraight>,
    curse_fall: Rc<FallStraight>,
    rng: Pcg32,
    since_normal: f32,
    since_special: f32,
    curse: CurseState,
    bad_probability: u32,
}

impl Rain {
    /// Build the controller around externally-owned asset handles. `seed`
    /// makes the spawn sequence reproducible.
    pub fn new(
        textures: DropTextures,
        sound: SoundHandle,
        music: MusicHandle,
        seed: u64,
    ) -> RainResult<Self> {
        Ok(Self {
            registry: EntityRegistry::new(),
            tracker: CollectionTracker::new(),
            textures,
            sound,
            music,
            good_fall: FallStraight::shared(DropKind::Good.fall_speed())?,
            bad_fall: FallStraight::shared(DropKind::Bad.fall_speed())?,
            cleanup_fall: FallStraight::shared(DropKind::Cleanup.fall_speed())?,
            curse_fall: FallStraight::shared(DropKind::Curse.fall_speed())?,
            rng: Pcg32::seed_from_u64(seed),
            since_normal: 0.0,
            since_special: 0.0,
            curse: CurseState::Inactive,
            bad_probability: BAD_PROBABILITY_NORMAL,
        })
    }

    /// Reset registries, spawn the first drop, start the music loop.
    /// Must run before the first `tick`.
    pub fn initialize(&mut self, audio: &mut dyn AudioOutput) -> RainResult<()> {
        self.registry.clear();
        self.tracker.reset();
        self.curse = CurseState::Inactive;
        self.bad_probability = BAD_PROBABILITY_NORMAL;
        self.since_normal = 0.0;
        self.since_special = 0.0;
        self.spawn_normal()?;
        audio.play_music(self.music, true);
        Ok(())
    }

    /// Advance the scene by `dt` seconds. Returns `GameOver` as soon as a bad
    /// drop drains the collector's last life; the remaining purge steps are
    /// skipped for that tick.
    pub fn tick(
        &mut self,
        dt: f32,
        collector: &mut dyn Collector,
        audio: &mut dyn AudioOutput,
    ) -> RainResult<TickOutcome> {
        let area = collector.area();
        if area.is_degenerate() {
            return Err(RainError::InvalidBounds {
                width: area.width,
                height: area.height,
            });
        }

        self.advance_curse(dt);

        self.since_normal += dt;
        if self.since_normal >= NORMAL_SPAWN_INTERVAL {
            let count = if self.curse.is_active() {
                CURSED_SPAWN_COUNT
            } else {
                1
            };
            for _ in 0..count {
                self.spawn_normal()?;
            }
            self.since_normal = 0.0;
        }

        self.since_special += dt;
        if self.since_special >= SPECIAL_SPAWN_INTERVAL {
            self.spawn_special()?;
            self.since_special = 0.0;
        }

        self.registry.tick(dt);

        let result = self.tracker.collect_in_area(&mut self.registry, area)?;
        for item in result.items() {
            match item.kind {
                DropKind::Bad => {
                    collector.apply_damage();
                    if collector.lives() == 0 {
                        log::info!("collector out of lives; game over");
                        return Ok(TickOutcome::GameOver);
                    }
                }
                DropKind::Good => {
                    collector.add_score(item.points);
                    audio.play_sound(self.sound);
                }
                DropKind::Cleanup => {
                    collector.add_score(item.points);
                    let cleared = self.registry.deactivate_kind(DropKind::Bad);
                    log::info!("cleanup caught; {cleared} bad drops deactivated");
                    audio.play_sound(self.sound);
                }
                DropKind::Curse => {
                    self.activate_curse(CURSE_DURATION);
                    audio.play_sound(self.sound);
                }
            }
        }

        self.tracker.purge_collected(&self.registry);
        self.registry
            .purge_out_of_bounds(0.0, FIELD_WIDTH, PURGE_MIN_Y, FIELD_HEIGHT);

        Ok(TickOutcome::Continue)
    }

    /// Draw all active drops
    pub fn render(&self, drawer: &mut dyn Drawer) {
        self.registry.render_all(drawer);
    }

    pub fn pause(&self, audio: &mut dyn AudioOutput) {
        audio.stop_music(self.music);
    }

    pub fn resume(&self, audio: &mut dyn AudioOutput) {
        audio.play_music(self.music, true);
    }

    /// Stop and release audio, dispose all entities, reset the tracker
    pub fn shutdown(&mut self, audio: &mut dyn AudioOutput) {
        audio.stop_music(self.music);
        audio.release_sound(self.sound);
        audio.release_music(self.music);
        self.registry.clear();
        self.tracker.reset();
    }

    fn advance_curse(&mut self, dt: f32) {
        if let CurseState::Active { remaining } = self.curse {
            let remaining = remaining - dt;
            if remaining <= 0.0 {
                self.curse = CurseState::Inactive;
                self.bad_probability = BAD_PROBABILITY_NORMAL;
                log::info!(
                    "curse expired; bad-drop probability back to {BAD_PROBABILITY_NORMAL}%"
                );
            } else {
                self.curse = CurseState::Active { remaining };
            }
        }
    }

    fn activate_curse(&mut self, duration: f32) {
        self.curse = CurseState::Active {
            remaining: duration,
        };
        self.bad_probability = BAD_PROBABILITY_CURSED;
        log::info!("curse activated for {duration}s; every spawn bad, at double rate");
    }

    /// Spawn one good-or-bad drop, weighted by the current probability
    fn spawn_normal(&mut self) -> RainResult<()> {
        let roll: u32 = self.rng.random_range(1..=100);
        let kind = if roll <= self.bad_probability {
            DropKind::Bad
        } else {
            DropKind::Good
        };
        self.spawn(kind)
    }

    /// Spawn one special drop (cleanup or curse), independent of curse state
    fn spawn_special(&mut self) -> RainResult<()> {
        let kind = if self.rng.random_range(1..=10u32) <= CLEANUP_CHANCE_IN_TEN {
            DropKind::Cleanup
        } else {
            DropKind::Curse
        };
        log::info!("special {} drop incoming", kind.as_str());
        self.spawn(kind)
    }

    /// Drop factory: build at a random x along the top edge and register with
    /// both the registry and the tracker in lockstep
    fn spawn(&mut self, kind: DropKind) -> RainResult<()> {
        let x = self.rng.random_range(0.0..=(FIELD_WIDTH - DROP_SIZE));
        self.spawn_at(kind, x)
    }

    fn spawn_at(&mut self, kind: DropKind, x: f32) -> RainResult<()> {
        let droplet = Droplet::new(kind, Vec2::new(x, FIELD_HEIGHT), Vec2::splat(DROP_SIZE))?
            .with_texture(self.texture_for(kind))
            .with_policy(self.policy_for(kind));
        let id = self.registry.enqueue_add(droplet);
        self.tracker.track(id);
        log::debug!("spawned {} drop {} at x={x:.1}", kind.as_str(), id.0);
        Ok(())
    }

    fn texture_for(&self, kind: DropKind) -> TextureHandle {
        match kind {
            DropKind::Good => self.textures.good,
            DropKind::Bad => self.textures.bad,
            DropKind::Cleanup => self.textures.cleanup,
            DropKind::Curse => self.textures.curse,
        }
    }

    fn policy_for(&self, kind: DropKind) -> Rc<dyn MovementPolicy> {
        match kind {
            DropKind::Good => self.good_fall.clone(),
            DropKind::Bad => self.bad_fall.clone(),
            DropKind::Cleanup => self.cleanup_fall.clone(),
            DropKind::Curse => self.curse_fall.clone(),
        }
    }

    // ===== Observability =====

    pub fn active_drops(&self) -> usize {
        self.registry.active_count()
    }

    pub fn curse_active(&self) -> bool {
        self.curse.is_active()
    }

    pub fn curse_remaining(&self) -> f32 {
        self.curse.remaining()
    }

    /// Current bad-drop spawn probability, percent
    pub fn bad_drop_probability(&self) -> u32 {
        self.bad_probability
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn tracker(&self) -> &CollectionTracker {
        &self.tracker
    }
}
