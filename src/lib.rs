//! Drop Catch - a falling-drop arcade simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, registries, spawn/curse orchestration)
//! - `platform`: Traits for the external collaborators (drawing, audio, collector)
//! - `error`: Precondition-violation error types
//!
//! The crate holds no rendering or audio backend. The host loop drives one
//! `Rain::tick` per frame with an external delta-time and supplies the
//! collector, drawer, and audio collaborators.

pub mod error;
pub mod platform;
pub mod sim;

pub use error::{RainError, RainResult};
pub use platform::{AudioOutput, Collector, Drawer, MusicHandle, SoundHandle, TextureHandle};
pub use sim::{Bounds, CollectionResult, DropKind, Droplet, EntityRegistry, Rain, TickOutcome};

/// Game configuration constants
pub mod consts {
    /// Play field dimensions (drops spawn at the top edge)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 480.0;

    /// Drop sprite size (square)
    pub const DROP_SIZE: f32 = 64.0;

    /// Fall speeds per variant (units/sec)
    pub const GOOD_FALL_SPEED: f32 = 300.0;
    pub const BAD_FALL_SPEED: f32 = 200.0;
    /// Cleanup drops fall slower so they are easier to catch
    pub const CLEANUP_FALL_SPEED: f32 = 150.0;
    pub const CURSE_FALL_SPEED: f32 = 250.0;

    /// Point values
    pub const GOOD_POINTS: u32 = 10;
    pub const CLEANUP_POINTS: u32 = 20;

    /// Seconds between normal (good/bad) spawns
    pub const NORMAL_SPAWN_INTERVAL: f32 = 0.2;
    /// Seconds between special (cleanup/curse) spawns
    pub const SPECIAL_SPAWN_INTERVAL: f32 = 10.0;

    /// Bad-drop spawn probability, percent
    pub const BAD_PROBABILITY_NORMAL: u32 = 60;
    pub const BAD_PROBABILITY_CURSED: u32 = 100;
    /// Special spawns: 6-in-10 cleanup, otherwise curse
    pub const CLEANUP_CHANCE_IN_TEN: u32 = 6;

    /// Curse effect duration (seconds)
    pub const CURSE_DURATION: f32 = 5.0;
    /// Normal spawns per timer fire while cursed
    pub const CURSED_SPAWN_COUNT: u32 = 2;

    /// Drops are purged once fully below this y
    pub const PURGE_MIN_Y: f32 = -DROP_SIZE;
}
