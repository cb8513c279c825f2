//! Drop entities
//!
//! A `Droplet` is a positioned, bounded, activatable object. The four gameplay
//! variants (good, bad, cleanup, curse) share this one struct; everything that
//! differs between them hangs off the `DropKind` tag, so the controller's
//! effect dispatch is an exhaustive match instead of a runtime type check.
//!
//! Collection is a one-shot transition: `on_collect` fires at most once per
//! droplet, guarded by `is_collectable`. A second attempt after deactivation
//! (including mass-deactivation by a cleanup effect) is a silent no-op.

use std::rc::Rc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{RainError, RainResult};
use crate::platform::{Drawer, TextureHandle};
use crate::sim::bounds::Bounds;
use crate::sim::movement::{FallStraight, MovementPolicy};

/// Stable entity id, assigned by the registry at enqueue time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DropId(pub u32);

impl DropId {
    /// Id of a droplet not yet registered
    pub const UNASSIGNED: DropId = DropId(0);
}

/// Drop variant tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DropKind {
    /// Awards points when caught
    Good,
    /// Damages the collector when caught
    Bad,
    /// Bonus points; deactivates every active bad drop
    Cleanup,
    /// Activates the curse (all-bad spawns at double rate) for a fixed time
    Curse,
}

impl DropKind {
    /// Point value awarded on collection
    pub fn points(&self) -> u32 {
        match self {
            DropKind::Good => GOOD_POINTS,
            DropKind::Bad => 0,
            DropKind::Cleanup => CLEANUP_POINTS,
            DropKind::Curse => 0,
        }
    }

    /// Descent speed in units/sec
    pub fn fall_speed(&self) -> f32 {
        match self {
            DropKind::Good => GOOD_FALL_SPEED,
            DropKind::Bad => BAD_FALL_SPEED,
            DropKind::Cleanup => CLEANUP_FALL_SPEED,
            DropKind::Curse => CURSE_FALL_SPEED,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DropKind::Good => "good",
            DropKind::Bad => "bad",
            DropKind::Cleanup => "cleanup",
            DropKind::Curse => "curse",
        }
    }
}

/// A falling drop entity
#[derive(Debug, Clone)]
pub struct Droplet {
    id: DropId,
    kind: DropKind,
    pos: Vec2,
    size: Vec2,
    /// Kept in sync with pos/size by every mutator
    bounds: Bounds,
    /// Shared, owned by the external asset system
    texture: Option<TextureHandle>,
    /// Shared, not owned for its lifetime; absent means stationary
    policy: Option<Rc<dyn MovementPolicy>>,
    active: bool,
    collected: bool,
}

impl Droplet {
    /// Create an active droplet. Size must be strictly positive.
    pub fn new(kind: DropKind, pos: Vec2, size: Vec2) -> RainResult<Self> {
        if size.x <= 0.0 || size.y <= 0.0 {
            return Err(RainError::InvalidSize {
                width: size.x,
                height: size.y,
            });
        }
        Ok(Self {
            id: DropId::UNASSIGNED,
            kind,
            pos,
            size,
            bounds: Bounds::from_pos_size(pos, size),
            texture: None,
            policy: None,
            active: true,
            collected: false,
        })
    }

    pub fn with_texture(mut self, texture: TextureHandle) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn with_policy(mut self, policy: Rc<dyn MovementPolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn id(&self) -> DropId {
        self.id
    }

    pub(crate) fn assign_id(&mut self, id: DropId) {
        self.id = id;
    }

    pub fn kind(&self) -> DropKind {
        self.kind
    }

    pub fn x(&self) -> f32 {
        self.pos.x
    }

    pub fn y(&self) -> f32 {
        self.pos.y
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Current collision rectangle (a copy; mutate via the position setters)
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn set_x(&mut self, x: f32) {
        self.pos.x = x;
        self.sync_bounds();
    }

    pub fn set_y(&mut self, y: f32) {
        self.pos.y = y;
        self.sync_bounds();
    }

    pub fn set_position(&mut self, pos: Vec2) {
        self.pos = pos;
        self.sync_bounds();
    }

    /// Swap the movement policy of an already-spawned droplet.
    pub fn set_policy(&mut self, policy: Rc<dyn MovementPolicy>) {
        self.policy = Some(policy);
    }

    /// Retarget the droplet to a straight fall at `speed`. Rejects negative
    /// speeds and leaves the current policy untouched on error.
    pub fn set_fall_speed(&mut self, speed: f32) -> RainResult<()> {
        self.policy = Some(FallStraight::shared(speed)?);
        Ok(())
    }

    fn sync_bounds(&mut self) {
        self.bounds = Bounds::from_pos_size(self.pos, self.size);
    }

    /// Advance one tick: delegate displacement to the attached policy, then
    /// recompute bounds. No-op while inactive.
    pub fn update(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        if let Some(policy) = self.policy.clone() {
            policy.apply(self, dt);
        }
        self.sync_bounds();
    }

    /// Draw only when active with a texture attached. The before/after hooks
    /// let variants add visual effects without touching the draw itself.
    pub fn render(&self, drawer: &mut dyn Drawer) {
        let Some(texture) = self.texture else { return };
        if !self.active {
            return;
        }
        self.before_render(drawer);
        drawer.draw(texture, self.bounds);
        self.after_render(drawer);
    }

    fn before_render(&self, drawer: &mut dyn Drawer) {
        match self.kind {
            DropKind::Cleanup => drawer.set_tint([0.3, 0.9, 0.4, 1.0]),
            DropKind::Curse => drawer.set_tint([0.6, 0.2, 0.8, 1.0]),
            DropKind::Good | DropKind::Bad => {}
        }
    }

    fn after_render(&self, drawer: &mut dyn Drawer) {
        if matches!(self.kind, DropKind::Cleanup | DropKind::Curse) {
            drawer.clear_tint();
        }
    }

    /// Bounds overlap; false when either side is inactive
    pub fn collides_with(&self, other: &Droplet) -> bool {
        if !self.active || !other.active {
            return false;
        }
        self.bounds.overlaps(&other.bounds)
    }

    /// True once the droplet has fully left the given window
    pub fn is_out_of_bounds(&self, min_x: f32, max_x: f32, min_y: f32, max_y: f32) -> bool {
        self.pos.x + self.size.x < min_x
            || self.pos.x > max_x
            || self.pos.y + self.size.y < min_y
            || self.pos.y > max_y
    }

    /// Eligible for pickup: active and not yet collected
    pub fn is_collectable(&self) -> bool {
        self.active && !self.collected
    }

    /// One-shot collect transition; no-op if no longer collectable
    pub fn on_collect(&mut self) {
        if !self.is_collectable() {
            return;
        }
        self.collected = true;
        self.active = false;
        log::debug!(
            "{} drop {} collected (+{} points)",
            self.kind.as_str(),
            self.id.0,
            self.kind.points()
        );
    }

    pub fn points(&self) -> u32 {
        self.kind.points()
    }

    /// Release variant-owned resources: the shared policy reference is let go,
    /// the texture handle belongs to the asset system and stays untouched.
    pub fn dispose(&mut self) {
        self.policy = None;
        self.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drop_at(kind: DropKind, x: f32, y: f32) -> Droplet {
        Droplet::new(kind, Vec2::new(x, y), Vec2::splat(DROP_SIZE)).unwrap()
    }

    #[derive(Default)]
    struct RecordingDrawer {
        draws: Vec<(TextureHandle, Bounds)>,
        tints: u32,
        clears: u32,
    }

    impl Drawer for RecordingDrawer {
        fn draw(&mut self, texture: TextureHandle, bounds: Bounds) {
            self.draws.push((texture, bounds));
        }

        fn set_tint(&mut self, _rgba: [f32; 4]) {
            self.tints += 1;
        }

        fn clear_tint(&mut self) {
            self.clears += 1;
        }
    }

    #[test]
    fn test_non_positive_size_rejected() {
        let err = Droplet::new(DropKind::Good, Vec2::ZERO, Vec2::new(0.0, 64.0));
        assert_eq!(
            err.unwrap_err(),
            RainError::InvalidSize {
                width: 0.0,
                height: 64.0
            }
        );
        assert!(Droplet::new(DropKind::Good, Vec2::ZERO, Vec2::new(64.0, -1.0)).is_err());
    }

    #[test]
    fn test_update_without_policy_is_stationary() {
        let mut d = drop_at(DropKind::Good, 100.0, 480.0);
        d.update(1.0);
        assert_eq!(d.pos(), Vec2::new(100.0, 480.0));
    }

    #[test]
    fn test_update_falls_and_keeps_bounds_in_sync() {
        let mut d =
            drop_at(DropKind::Good, 100.0, 480.0).with_policy(FallStraight::shared(300.0).unwrap());
        d.update(0.5);
        assert_eq!(d.y(), 480.0 - 150.0);
        assert_eq!(d.bounds(), Bounds::new(100.0, 330.0, DROP_SIZE, DROP_SIZE));
    }

    #[test]
    fn test_set_fall_speed_retargets_descent() {
        let mut d =
            drop_at(DropKind::Good, 100.0, 480.0).with_policy(FallStraight::shared(300.0).unwrap());
        d.set_fall_speed(100.0).unwrap();
        d.update(0.5);
        assert_eq!(d.y(), 480.0 - 50.0);
    }

    #[test]
    fn test_set_fall_speed_rejects_negative_and_keeps_policy() {
        let mut d =
            drop_at(DropKind::Good, 100.0, 480.0).with_policy(FallStraight::shared(300.0).unwrap());
        assert_eq!(d.set_fall_speed(-1.0), Err(RainError::NegativeSpeed(-1.0)));
        d.update(0.5);
        assert_eq!(d.y(), 480.0 - 150.0);
    }

    #[test]
    fn test_update_inactive_is_noop() {
        let mut d =
            drop_at(DropKind::Bad, 100.0, 480.0).with_policy(FallStraight::shared(200.0).unwrap());
        d.set_active(false);
        d.update(1.0);
        assert_eq!(d.y(), 480.0);
    }

    #[test]
    fn test_setters_keep_bounds_consistent() {
        let mut d = drop_at(DropKind::Good, 0.0, 0.0);
        d.set_position(Vec2::new(10.0, 20.0));
        assert_eq!(d.bounds().pos(), Vec2::new(10.0, 20.0));
        d.set_x(5.0);
        assert_eq!(d.bounds().x, 5.0);
    }

    #[test]
    fn test_collect_is_one_shot() {
        let mut d = drop_at(DropKind::Good, 0.0, 0.0);
        assert!(d.is_collectable());
        d.on_collect();
        assert!(!d.is_collectable());
        assert!(!d.is_active());
        // Second attempt is a silent no-op
        d.on_collect();
        assert!(!d.is_collectable());
    }

    #[test]
    fn test_deactivated_drop_is_not_collectable() {
        let mut d = drop_at(DropKind::Bad, 0.0, 0.0);
        d.set_active(false);
        assert!(!d.is_collectable());
        d.on_collect();
        assert!(!d.is_collectable());
    }

    #[test]
    fn test_collides_with_requires_both_active() {
        let a = drop_at(DropKind::Good, 0.0, 0.0);
        let mut b = drop_at(DropKind::Bad, 32.0, 32.0);
        assert!(a.collides_with(&b));
        b.set_active(false);
        assert!(!a.collides_with(&b));
        assert!(!b.collides_with(&a));
    }

    #[test]
    fn test_out_of_bounds_below_field() {
        let mut d = drop_at(DropKind::Bad, 100.0, 480.0);
        assert!(!d.is_out_of_bounds(0.0, FIELD_WIDTH, PURGE_MIN_Y, FIELD_HEIGHT));

        // Straddling the purge line: top edge still at the line, not past it
        d.set_y(PURGE_MIN_Y - DROP_SIZE);
        assert!(!d.is_out_of_bounds(0.0, FIELD_WIDTH, PURGE_MIN_Y, FIELD_HEIGHT));

        // Fully below the line
        d.set_y(PURGE_MIN_Y - DROP_SIZE - 1.0);
        assert!(d.is_out_of_bounds(0.0, FIELD_WIDTH, PURGE_MIN_Y, FIELD_HEIGHT));
    }

    #[test]
    fn test_render_requires_active_and_texture() {
        let mut drawer = RecordingDrawer::default();

        // No texture: nothing drawn
        drop_at(DropKind::Good, 0.0, 0.0).render(&mut drawer);
        assert!(drawer.draws.is_empty());

        // Textured and active: one draw
        let d = drop_at(DropKind::Good, 0.0, 0.0).with_texture(TextureHandle(1));
        d.render(&mut drawer);
        assert_eq!(drawer.draws.len(), 1);

        // Inactive: nothing drawn
        let mut d = drop_at(DropKind::Good, 0.0, 0.0).with_texture(TextureHandle(1));
        d.set_active(false);
        d.render(&mut drawer);
        assert_eq!(drawer.draws.len(), 1);
    }

    #[test]
    fn test_special_drops_render_tinted() {
        let mut drawer = RecordingDrawer::default();
        drop_at(DropKind::Curse, 0.0, 0.0)
            .with_texture(TextureHandle(4))
            .render(&mut drawer);
        assert_eq!(drawer.tints, 1);
        assert_eq!(drawer.clears, 1);

        drop_at(DropKind::Good, 0.0, 0.0)
            .with_texture(TextureHandle(1))
            .render(&mut drawer);
        assert_eq!(drawer.tints, 1);
    }

    #[test]
    fn test_dispose_releases_policy_only() {
        let policy = FallStraight::shared(300.0).unwrap();
        let mut d = drop_at(DropKind::Good, 0.0, 0.0)
            .with_texture(TextureHandle(1))
            .with_policy(policy.clone());
        assert_eq!(Rc::strong_count(&policy), 2);
        d.dispose();
        assert_eq!(Rc::strong_count(&policy), 1);
    }
}
