//! The document: one entity store plus its attribute store.
//!
//! Primitive edits go straight to the [`EntityStore`] (see
//! [`Model::store_mut`]). The composite operations live here because they
//! need both halves: building objects from positions ([`make`]), cascade
//! deletes and vertex deletion ([`delete`]), and shape edits that must
//! re-triangulate ([`shape`]).
//!
//! Composite operations are plain sequences of primitive edits. A failure
//! part way leaves the store in whatever state the completed primitives
//! produced.

pub mod delete;
pub mod make;
pub mod shape;

pub use delete::{CollContents, DelPosis};

use crate::attribs::{AttribTable, Attribs};
use crate::debug_invariants::DebugInvariants;
use crate::geometry::triangulate::triangulate_face;
use crate::kernel_error::KernelError;
use crate::topology::kind::EntKind;
use crate::topology::merge::Offsets;
use crate::topology::store::EntityStore;
use crate::topology::validation::check_store;

/// A topology document.
#[derive(Clone, Debug, Default)]
pub struct Model<A = AttribTable> {
    store: EntityStore,
    attribs: A,
}

impl<A: Attribs + Default> Model<A> {
    pub fn new() -> Self {
        Self::with_attribs(A::default())
    }
}

impl<A: Attribs> Model<A> {
    pub fn with_attribs(attribs: A) -> Self {
        Model {
            store: EntityStore::new(),
            attribs,
        }
    }

    /// Wraps an existing store, e.g. one rebuilt with
    /// [`EntityStore::from_data`].
    pub fn from_parts(store: EntityStore, attribs: A) -> Self {
        Model { store, attribs }
    }

    pub fn into_parts(self) -> (EntityStore, A) {
        (self.store, self.attribs)
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Direct access for primitive edits. Callers own the consequences,
    /// e.g. re-triangulating a face whose wires they changed.
    pub fn store_mut(&mut self) -> &mut EntityStore {
        &mut self.store
    }

    pub fn attribs(&self) -> &A {
        &self.attribs
    }

    pub fn attribs_mut(&mut self) -> &mut A {
        &mut self.attribs
    }

    /// Removes one entity through the primitive, notifying the attribute
    /// store. Returns the orphaned children.
    pub fn remove(&mut self, kind: EntKind, index: usize) -> Result<Vec<(EntKind, usize)>, KernelError> {
        self.store.remove(kind, index, &mut self.attribs)
    }

    /// Rebuilds the cached triangles of `face`.
    pub fn triangulate_face(&mut self, face: usize) -> Result<Vec<usize>, KernelError> {
        triangulate_face(&mut self.store, &mut self.attribs, face)
    }

    pub fn get_face_boundary(&self, face: usize) -> Option<usize> {
        self.store.face_boundary(face)
    }

    pub fn get_face_holes(&self, face: usize) -> Option<Vec<usize>> {
        self.store.face_holes(face)
    }

    /// Consistency report of the store; empty when everything holds.
    pub fn check(&self) -> Vec<String> {
        check_store(&self.store)
    }

    /// Appends `other` to this model. Position coordinates are copied to
    /// their shifted indices; other attribute values are not carried over.
    pub fn merge<B: Attribs>(&mut self, other: &Model<B>) -> Offsets {
        let off = self.store.merge(&other.store);
        for p in other.store.get_ents(EntKind::Posi) {
            if let Some(xyz) = other.attribs.posi_coords(p) {
                self.attribs.set_posi_coords(off.shift(EntKind::Posi, p), xyz);
            }
        }
        self.debug_check();
        off
    }

    #[inline]
    fn debug_check(&self) {
        self.store.debug_assert_invariants();
    }
}
