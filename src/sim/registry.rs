//! Entity registry with deferred add/remove
//!
//! The registry exclusively owns every live droplet. Adds and removes are
//! buffered and flushed at exactly one point per tick, so nothing can mutate
//! the live set while it is being iterated for update, render, or queries.
//! Purge operations only enqueue; their effect lands at the next flush.
//!
//! Iteration is always in registration order, which keeps update, render, and
//! collection evaluation deterministic for a given spawn sequence.

use crate::platform::Drawer;
use crate::sim::bounds::Bounds;
use crate::sim::droplet::{DropId, DropKind, Droplet};

/// Owns the live entity set; all mutation flows through the pending queues
#[derive(Debug)]
pub struct EntityRegistry {
    droplets: Vec<Droplet>,
    pending_add: Vec<Droplet>,
    pending_remove: Vec<DropId>,
    next_id: u32,
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            droplets: Vec::new(),
            pending_add: Vec::new(),
            pending_remove: Vec::new(),
            next_id: 1,
        }
    }

    /// Queue a droplet for addition at the next flush. Assigns and returns
    /// its registry id.
    pub fn enqueue_add(&mut self, mut droplet: Droplet) -> DropId {
        let id = DropId(self.next_id);
        self.next_id += 1;
        droplet.assign_id(id);
        self.pending_add.push(droplet);
        id
    }

    /// Queue a droplet for removal. Unknown or already-removed ids are
    /// silently ignored.
    pub fn enqueue_remove(&mut self, id: DropId) {
        self.pending_remove.push(id);
    }

    /// Flush pending adds/removes, then update every active droplet in
    /// registration order. The flush is the single point per tick where the
    /// live set changes shape.
    pub fn tick(&mut self, dt: f32) {
        self.flush_pending();
        for droplet in &mut self.droplets {
            if droplet.is_active() {
                droplet.update(dt);
            }
        }
    }

    fn flush_pending(&mut self) {
        if !self.pending_add.is_empty() {
            self.droplets.append(&mut self.pending_add);
        }
        if !self.pending_remove.is_empty() {
            let remove = std::mem::take(&mut self.pending_remove);
            self.droplets.retain_mut(|d| {
                if remove.contains(&d.id()) {
                    d.dispose();
                    false
                } else {
                    true
                }
            });
        }
    }

    /// Draw every active droplet in registration order
    pub fn render_all(&self, drawer: &mut dyn Drawer) {
        for droplet in &self.droplets {
            if droplet.is_active() {
                droplet.render(drawer);
            }
        }
    }

    /// First active droplet overlapping `bounds`, in registration order.
    /// A degenerate query area matches nothing.
    pub fn find_first_overlap(&self, bounds: Bounds) -> Option<&Droplet> {
        if bounds.is_degenerate() {
            return None;
        }
        self.droplets
            .iter()
            .find(|d| d.is_active() && d.bounds().overlaps(&bounds))
    }

    /// All active droplets overlapping `bounds`, in registration order
    pub fn find_all_overlaps(&self, bounds: Bounds) -> Vec<&Droplet> {
        if bounds.is_degenerate() {
            return Vec::new();
        }
        self.droplets
            .iter()
            .filter(|d| d.is_active() && d.bounds().overlaps(&bounds))
            .collect()
    }

    /// Enqueue removal of every droplet outside the window; returns how many
    /// matched
    pub fn purge_out_of_bounds(&mut self, min_x: f32, max_x: f32, min_y: f32, max_y: f32) -> usize {
        let mut matched = 0;
        for droplet in &self.droplets {
            if droplet.is_out_of_bounds(min_x, max_x, min_y, max_y) {
                self.pending_remove.push(droplet.id());
                matched += 1;
            }
        }
        matched
    }

    /// Enqueue removal of every inactive droplet; returns how many matched
    pub fn purge_inactive(&mut self) -> usize {
        let mut matched = 0;
        for droplet in &self.droplets {
            if !droplet.is_active() {
                self.pending_remove.push(droplet.id());
                matched += 1;
            }
        }
        matched
    }

    pub fn get(&self, id: DropId) -> Option<&Droplet> {
        self.droplets.iter().find(|d| d.id() == id)
    }

    pub fn get_mut(&mut self, id: DropId) -> Option<&mut Droplet> {
        self.droplets.iter_mut().find(|d| d.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Droplet> {
        self.droplets.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Droplet> {
        self.droplets.iter_mut()
    }

    /// Deactivate every active droplet of the given kind; returns how many
    /// were hit. Used by the cleanup effect against bad drops.
    pub fn deactivate_kind(&mut self, kind: DropKind) -> usize {
        let mut count = 0;
        for droplet in &mut self.droplets {
            if droplet.kind() == kind && droplet.is_active() {
                droplet.set_active(false);
                count += 1;
            }
        }
        count
    }

    /// Defensive copy of the live set (pending entries excluded)
    pub fn snapshot(&self) -> Vec<Droplet> {
        self.droplets.clone()
    }

    pub fn active_count(&self) -> usize {
        self.droplets.iter().filter(|d| d.is_active()).count()
    }

    /// Total live droplets, active or not
    pub fn len(&self) -> usize {
        self.droplets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.droplets.is_empty()
    }

    /// Dispose every droplet and empty all internal sets
    pub fn clear(&mut self) {
        for droplet in &mut self.droplets {
            droplet.dispose();
        }
        self.droplets.clear();
        self.pending_add.clear();
        self.pending_remove.clear();
    }
}
