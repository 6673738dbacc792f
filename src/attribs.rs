//! Attribute collaborator interface.
//!
//! The kernel never stores attribute values itself. It reads position
//! coordinates when triangulating and tells the attribute store when an
//! entity is removed so the values keyed by that `(kind, index)` can be
//! dropped. The attribute store never initiates structural changes.

use crate::topology::kind::EntKind;
use hashbrown::HashMap;
use std::collections::BTreeMap;

/// What the kernel needs from an attribute store.
pub trait Attribs {
    /// Coordinates of a position, if set.
    fn posi_coords(&self, posi: usize) -> Option<[f64; 3]>;

    /// Set the coordinates of a position.
    fn set_posi_coords(&mut self, posi: usize, xyz: [f64; 3]);

    /// Drop every value stored for `(kind, index)`.
    fn delete_entity(&mut self, kind: EntKind, index: usize);
}

/// An attribute store that keeps nothing. Useful for pure topology work.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoAttribs;

impl Attribs for NoAttribs {
    fn posi_coords(&self, _posi: usize) -> Option<[f64; 3]> {
        None
    }

    fn set_posi_coords(&mut self, _posi: usize, _xyz: [f64; 3]) {}

    fn delete_entity(&mut self, _kind: EntKind, _index: usize) {}
}

/// In-memory attribute store: position coordinates plus named integer
/// labels on any entity.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttribTable {
    coords: HashMap<usize, [f64; 3]>,
    labels: HashMap<String, HashMap<(EntKind, usize), i32>>,
}

impl AttribTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns `value` for `(kind, index)` under label `name`.
    ///
    /// Returns the previous value, if any.
    pub fn set_label(&mut self, kind: EntKind, index: usize, name: &str, value: i32) -> Option<i32> {
        self.labels
            .entry(name.to_string())
            .or_default()
            .insert((kind, index), value)
    }

    pub fn get_label(&self, kind: EntKind, index: usize, name: &str) -> Option<i32> {
        self.labels
            .get(name)
            .and_then(|map| map.get(&(kind, index)).copied())
    }

    /// Entities of `kind` with label `name == value`, ascending.
    pub fn ents_with_label(&self, kind: EntKind, name: &str, value: i32) -> Vec<usize> {
        let mut out: Vec<usize> = self.labels.get(name).map_or_else(Vec::new, |map| {
            map.iter()
                .filter_map(|(&(k, i), &v)| (k == kind && v == value).then_some(i))
                .collect()
        });
        out.sort_unstable();
        out
    }

    /// Label names present, sorted.
    pub fn label_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.labels.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of positions with coordinates.
    pub fn num_coords(&self) -> usize {
        self.coords.len()
    }

    /// All coordinates ordered by position index.
    pub fn coords_sorted(&self) -> BTreeMap<usize, [f64; 3]> {
        self.coords.iter().map(|(&k, &v)| (k, v)).collect()
    }
}

impl Attribs for AttribTable {
    fn posi_coords(&self, posi: usize) -> Option<[f64; 3]> {
        self.coords.get(&posi).copied()
    }

    fn set_posi_coords(&mut self, posi: usize, xyz: [f64; 3]) {
        self.coords.insert(posi, xyz);
    }

    fn delete_entity(&mut self, kind: EntKind, index: usize) {
        if kind == EntKind::Posi {
            self.coords.remove(&index);
        }
        for map in self.labels.values_mut() {
            map.remove(&(kind, index));
        }
    }
}
