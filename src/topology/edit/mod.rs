//! Structural edit primitives.
//!
//! Four families, each keeping every down-link mirrored by its up-link:
//! - [`add`]: allocate a slot and link it to existing lower entities.
//! - [`replace`]: overwrite the down-links of an existing slot in place.
//! - [`link`]: attach or detach a single link.
//! - [`remove`]: tombstone a slot and clear the links around it.
//!
//! None of these cascade. Composite operations (object construction,
//! cascade delete, vertex deletion) live in [`crate::model`] and are plain
//! sequences of these primitives.

pub mod add;
pub mod link;
pub mod remove;
pub mod replace;

use super::store::{EntityStore, VertUp};

/// Which edge slot of a path vertex to touch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum VertSlot {
    Incoming,
    Outgoing,
}

impl EntityStore {
    /// Writes one edge slot of a vertex, collapsing an empty pair to `Free`.
    pub(crate) fn set_vert_slot(&mut self, vert: usize, slot: VertSlot, edge: Option<usize>) {
        let (mut incoming, mut outgoing) = match self.vert_up[vert] {
            VertUp::Edges { incoming, outgoing } => (incoming, outgoing),
            _ => (None, None),
        };
        match slot {
            VertSlot::Incoming => incoming = edge,
            VertSlot::Outgoing => outgoing = edge,
        }
        self.vert_up[vert] = if incoming.is_none() && outgoing.is_none() {
            VertUp::Free
        } else {
            VertUp::Edges { incoming, outgoing }
        };
    }

    /// Clears `slot` of `vert` only if it still points at `edge`.
    pub(crate) fn clear_vert_slot_if(&mut self, vert: usize, slot: VertSlot, edge: usize) {
        let current = match slot {
            VertSlot::Incoming => self.vert_up.get(vert).and_then(|u| u.incoming()),
            VertSlot::Outgoing => self.vert_up.get(vert).and_then(|u| u.outgoing()),
        };
        if current == Some(edge) {
            self.set_vert_slot(vert, slot, None);
        }
    }
}

/// Removes every occurrence of `value` from `list`.
#[inline]
pub(crate) fn remove_value(list: &mut Vec<usize>, value: usize) {
    list.retain(|&v| v != value);
}

/// Pushes `value` unless it is already present.
#[inline]
pub(crate) fn push_unique(list: &mut Vec<usize>, value: usize) {
    if !list.contains(&value) {
        list.push(value);
    }
}
