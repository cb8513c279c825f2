//! Movement policies
//!
//! A policy computes a droplet's displacement for one tick. Policies are
//! stateless value objects shared between entities behind an `Rc`; an entity
//! without a policy simply stays put.

use std::rc::Rc;

use crate::error::{RainError, RainResult};
use crate::sim::droplet::Droplet;

/// Per-tick displacement capability attached to an entity
pub trait MovementPolicy: std::fmt::Debug {
    /// Mutate the droplet's position for `dt` seconds of simulated time
    fn apply(&self, droplet: &mut Droplet, dt: f32);
}

/// Constant-speed straight descent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallStraight {
    speed: f32,
}

impl FallStraight {
    pub fn new(speed: f32) -> RainResult<Self> {
        if speed < 0.0 {
            return Err(RainError::NegativeSpeed(speed));
        }
        Ok(Self { speed })
    }

    /// Shared handle ready to attach to entities
    pub fn shared(speed: f32) -> RainResult<Rc<Self>> {
        Ok(Rc::new(Self::new(speed)?))
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }
}

impl MovementPolicy for FallStraight {
    fn apply(&self, droplet: &mut Droplet, dt: f32) {
        droplet.set_y(droplet.y() - self.speed * dt);
    }
}
