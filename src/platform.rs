//! Traits for the external collaborators
//!
//! The core never loads assets, draws pixels, or plays audio itself. It holds
//! opaque handles resolved by the host's asset system and talks to the host
//! through these traits. The host passes its drawer/audio/collector into the
//! simulation each frame; the core never owns their lifetimes.

use crate::sim::Bounds;
use serde::{Deserialize, Serialize};

/// Opaque texture reference owned by the external asset system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureHandle(pub u32);

/// Opaque one-shot sound reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SoundHandle(pub u32);

/// Opaque streaming/looping music reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MusicHandle(pub u32);

/// Drawing backend. `set_tint`/`clear_tint` bracket variant-specific visual
/// effects emitted by the render hooks; backends without tinting can ignore
/// them.
pub trait Drawer {
    fn draw(&mut self, texture: TextureHandle, bounds: Bounds);

    fn set_tint(&mut self, _rgba: [f32; 4]) {}

    fn clear_tint(&mut self) {}
}

/// Audio backend. Handles stay valid until `release_*`.
pub trait AudioOutput {
    fn play_sound(&mut self, sound: SoundHandle);

    fn play_music(&mut self, music: MusicHandle, looping: bool);

    fn stop_music(&mut self, music: MusicHandle);

    fn release_sound(&mut self, sound: SoundHandle);

    fn release_music(&mut self, music: MusicHandle);
}

/// The player-controlled collector. Score and life bookkeeping live on the
/// host side; the core only signals damage and awards.
pub trait Collector {
    /// Current capture area in field coordinates.
    fn area(&self) -> Bounds;

    /// A bad drop landed; remove one life.
    fn apply_damage(&mut self);

    fn add_score(&mut self, points: u32);

    fn lives(&self) -> u32;
}
