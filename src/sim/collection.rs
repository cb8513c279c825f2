//! Collection detection
//!
//! The tracker holds non-owning ids of the collectable subset of the
//! registry's entities, added in lockstep with registration. Each tick it
//! tests the still-eligible ones against the collector's area, fires each
//! overlapping droplet's collect effect exactly once, and reports an
//! immutable snapshot of what was caught.
//!
//! Evaluation follows tracking (insertion) order. That decides which of
//! several simultaneously-overlapping items appear first in a result, but not
//! the total count or the side effects, since every drop's effect is
//! independent.

use serde::{Deserialize, Serialize};

use crate::error::{RainError, RainResult};
use crate::sim::bounds::Bounds;
use crate::sim::droplet::{DropId, DropKind};
use crate::sim::registry::EntityRegistry;

/// Snapshot of one collected droplet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectedItem {
    pub id: DropId,
    pub kind: DropKind,
    pub points: u32,
}

/// Immutable result of one collection pass. The item sequence is a copy;
/// callers can't reach tracker-internal state through it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionResult {
    items: Vec<CollectedItem>,
}

impl CollectionResult {
    fn new(items: Vec<CollectedItem>) -> Self {
        Self { items }
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn items(&self) -> &[CollectedItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Tracks collect-eligibility for the registry's droplets
#[derive(Debug, Default)]
pub struct CollectionTracker {
    tracked: Vec<DropId>,
}

impl CollectionTracker {
    pub fn new() -> Self {
        Self {
            tracked: Vec::new(),
        }
    }

    /// Start tracking a registered droplet
    pub fn track(&mut self, id: DropId) {
        self.tracked.push(id);
    }

    pub fn tracked_count(&self) -> usize {
        self.tracked.len()
    }

    pub fn is_tracking(&self, id: DropId) -> bool {
        self.tracked.contains(&id)
    }

    /// Collect every still-eligible tracked droplet whose bounds overlap
    /// `area`. Each hit fires `on_collect` exactly once; a droplet already
    /// collected or deactivated is skipped, which makes repeated calls with
    /// the same area idempotent per item.
    pub fn collect_in_area(
        &mut self,
        registry: &mut EntityRegistry,
        area: Bounds,
    ) -> RainResult<CollectionResult> {
        if area.is_degenerate() {
            return Err(RainError::InvalidBounds {
                width: area.width,
                height: area.height,
            });
        }

        let mut items = Vec::new();
        for &id in &self.tracked {
            let Some(droplet) = registry.get_mut(id) else {
                continue;
            };
            if droplet.is_collectable() && droplet.bounds().overlaps(&area) {
                droplet.on_collect();
                items.push(CollectedItem {
                    id,
                    kind: droplet.kind(),
                    points: droplet.points(),
                });
            }
        }
        Ok(CollectionResult::new(items))
    }

    /// Drop every tracked entry that is no longer collectable: collected,
    /// deactivated by an external effect, or gone from the registry. Returns
    /// how many entries were removed.
    pub fn purge_collected(&mut self, registry: &EntityRegistry) -> usize {
        let before = self.tracked.len();
        self.tracked
            .retain(|&id| registry.get(id).is_some_and(|d| d.is_collectable()));
        before - self.tracked.len()
    }

    /// Forget all tracked state
    pub fn reset(&mut self) {
        self.tracked.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::droplet::Droplet;
    use crate::sim::movement::FallStraight;
    use glam::Vec2;

    fn setup(drops: &[(DropKind, f32, f32)]) -> (EntityRegistry, CollectionTracker, Vec<DropId>) {
        let mut reg = EntityRegistry::new();
        let mut tracker = CollectionTracker::new();
        let mut ids = Vec::new();
        for &(kind, x, y) in drops {
            let d = Droplet::new(kind, Vec2::new(x, y), Vec2::splat(DROP_SIZE))
                .unwrap()
                .with_policy(FallStraight::shared(kind.fall_speed()).unwrap());
            let id = reg.enqueue_add(d);
            tracker.track(id);
            ids.push(id);
        }
        reg.tick(0.0);
        (reg, tracker, ids)
    }

    #[test]
    fn test_collect_overlapping_drop() {
        let (mut reg, mut tracker, ids) = setup(&[(DropKind::Good, 100.0, 50.0)]);
        // Collector area fully containing the drop
        let area = Bounds::new(80.0, 30.0, 120.0, 120.0);

        let result = tracker.collect_in_area(&mut reg, area).unwrap();
        assert_eq!(result.count(), 1);
        assert_eq!(result.items()[0].id, ids[0]);
        assert_eq!(result.items()[0].points, GOOD_POINTS);
        assert!(!reg.get(ids[0]).unwrap().is_collectable());
    }

    #[test]
    fn test_collect_is_idempotent_per_item() {
        let (mut reg, mut tracker, _) = setup(&[(DropKind::Good, 100.0, 50.0)]);
        let area = Bounds::new(80.0, 30.0, 120.0, 120.0);

        assert_eq!(tracker.collect_in_area(&mut reg, area).unwrap().count(), 1);
        // Same area again: the item is no longer eligible
        assert_eq!(tracker.collect_in_area(&mut reg, area).unwrap().count(), 0);
    }

    #[test]
    fn test_count_matches_items_len() {
        let (mut reg, mut tracker, _) = setup(&[
            (DropKind::Good, 0.0, 0.0),
            (DropKind::Bad, 32.0, 0.0),
            (DropKind::Good, 700.0, 400.0),
        ]);
        let area = Bounds::new(0.0, 0.0, 100.0, 64.0);

        let result = tracker.collect_in_area(&mut reg, area).unwrap();
        assert_eq!(result.count(), result.items().len());
        assert_eq!(result.count(), 2);
    }

    #[test]
    fn test_result_order_follows_tracking_order() {
        let (mut reg, mut tracker, ids) = setup(&[
            (DropKind::Bad, 0.0, 0.0),
            (DropKind::Good, 16.0, 0.0),
            (DropKind::Curse, 32.0, 0.0),
        ]);
        let area = Bounds::new(0.0, 0.0, 200.0, 64.0);

        let result = tracker.collect_in_area(&mut reg, area).unwrap();
        let got: Vec<_> = result.items().iter().map(|i| i.id).collect();
        assert_eq!(got, ids);
    }

    #[test]
    fn test_degenerate_area_is_a_precondition_error() {
        let (mut reg, mut tracker, _) = setup(&[(DropKind::Good, 0.0, 0.0)]);
        let err = tracker
            .collect_in_area(&mut reg, Bounds::new(0.0, 0.0, 0.0, 10.0))
            .unwrap_err();
        assert!(matches!(err, RainError::InvalidBounds { .. }));
    }

    #[test]
    fn test_purge_removes_collected_and_deactivated() {
        let (mut reg, mut tracker, ids) = setup(&[
            (DropKind::Good, 0.0, 0.0),
            (DropKind::Bad, 200.0, 0.0),
            (DropKind::Bad, 400.0, 0.0),
        ]);

        // Collect the first, externally deactivate the second
        let area = Bounds::new(0.0, 0.0, 64.0, 64.0);
        tracker.collect_in_area(&mut reg, area).unwrap();
        reg.get_mut(ids[1]).unwrap().set_active(false);

        assert_eq!(tracker.purge_collected(&reg), 2);
        assert_eq!(tracker.tracked_count(), 1);
        assert!(tracker.is_tracking(ids[2]));
    }

    #[test]
    fn test_purge_drops_ids_missing_from_registry() {
        let (mut reg, mut tracker, ids) = setup(&[(DropKind::Bad, 100.0, -200.0)]);
        reg.purge_out_of_bounds(0.0, FIELD_WIDTH, PURGE_MIN_Y, FIELD_HEIGHT);
        reg.tick(0.0);
        assert!(reg.get(ids[0]).is_none());

        assert_eq!(tracker.purge_collected(&reg), 1);
        assert!(!tracker.is_tracking(ids[0]));
    }

    #[test]
    fn test_reset() {
        let (_, mut tracker, _) = setup(&[(DropKind::Good, 0.0, 0.0)]);
        tracker.reset();
        assert_eq!(tracker.tracked_count(), 0);
    }
}
