//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Externally-driven delta time, no wall clock
//! - Seeded RNG only
//! - Stable iteration order (registration order)
//! - No rendering or platform dependencies beyond the collaborator traits

pub mod bounds;
pub mod collection;
pub mod droplet;
pub mod movement;
pub mod rain;
pub mod registry;

pub use bounds::Bounds;
pub use collection::{CollectedItem, CollectionResult, CollectionTracker};
pub use droplet::{DropId, DropKind, Droplet};
pub use movement::{FallStraight, MovementPolicy};
pub use rain::{CurseState, DropTextures, Rain, TickOutcome};
pub use registry::EntityRegistry;
