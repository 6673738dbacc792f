//! The entity store: down-link tables and their mirrored up-link tables.
//!
//! Every kind has one tombstoned [`Table`] holding its down-links and one
//! parallel up-link vector of the same length. Mutation happens only through
//! the edit primitives in [`crate::topology::edit`]; everything public here
//! is read-only and returns owned copies, so callers cannot corrupt the
//! mirrors by editing a returned value.

use super::arena::Table;
use super::kind::EntKind;
use crate::kernel_error::KernelError;
use serde::{Deserialize, Serialize};
use static_assertions::assert_impl_all;

/// Up-link of a vertex: owned by a point, or threaded into a path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VertUp {
    /// Not used by a point or an edge.
    #[default]
    Free,
    /// The vertex of a point object.
    Point(usize),
    /// A path vertex with its optional incoming and outgoing edges.
    Edges {
        incoming: Option<usize>,
        outgoing: Option<usize>,
    },
}

impl VertUp {
    pub fn incoming(self) -> Option<usize> {
        match self {
            VertUp::Edges { incoming, .. } => incoming,
            _ => None,
        }
    }

    pub fn outgoing(self) -> Option<usize> {
        match self {
            VertUp::Edges { outgoing, .. } => outgoing,
            _ => None,
        }
    }

    /// Present edges, incoming first.
    pub fn edges(self) -> Vec<usize> {
        match self {
            VertUp::Edges { incoming, outgoing } => {
                incoming.into_iter().chain(outgoing).collect()
            }
            _ => Vec::new(),
        }
    }
}

/// Owner of a wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WireOwner {
    Face(usize),
    Pline(usize),
}

/// Down-links of a face. `wires[0]` is the boundary, the rest are holes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceDown {
    pub wires: Vec<usize>,
    pub tris: Vec<usize>,
}

/// Down-links of a collection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollDown {
    pub points: Vec<usize>,
    pub plines: Vec<usize>,
    pub pgons: Vec<usize>,
}

impl CollDown {
    pub(crate) fn objs(&self, kind: EntKind) -> &[usize] {
        match kind {
            EntKind::Point => &self.points,
            EntKind::Pline => &self.plines,
            EntKind::Pgon => &self.pgons,
            _ => &[],
        }
    }

    pub(crate) fn objs_mut(&mut self, kind: EntKind) -> Option<&mut Vec<usize>> {
        match kind {
            EntKind::Point => Some(&mut self.points),
            EntKind::Pline => Some(&mut self.plines),
            EntKind::Pgon => Some(&mut self.pgons),
            _ => None,
        }
    }
}

/// Sparse, index-addressed storage for all ten entity kinds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntityStore {
    pub(crate) posis: Table<()>,
    pub(crate) verts: Table<usize>,
    pub(crate) edges: Table<[usize; 2]>,
    pub(crate) wires: Table<Vec<usize>>,
    pub(crate) tris: Table<[usize; 3]>,
    pub(crate) faces: Table<FaceDown>,
    pub(crate) points: Table<usize>,
    pub(crate) plines: Table<usize>,
    pub(crate) pgons: Table<usize>,
    pub(crate) colls: Table<CollDown>,

    pub(crate) posi_verts: Vec<Vec<usize>>,
    pub(crate) vert_up: Vec<VertUp>,
    pub(crate) vert_tris: Vec<Vec<usize>>,
    pub(crate) edge_wire: Vec<Option<usize>>,
    pub(crate) wire_owner: Vec<Option<WireOwner>>,
    pub(crate) tri_face: Vec<Option<usize>>,
    pub(crate) face_pgon: Vec<Option<usize>>,
    pub(crate) point_colls: Vec<Vec<usize>>,
    pub(crate) pline_colls: Vec<Vec<usize>>,
    pub(crate) pgon_colls: Vec<Vec<usize>>,
    pub(crate) coll_parent: Vec<Option<usize>>,
}

assert_impl_all!(EntityStore: Send, Sync, Clone);

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of allocated slots of `kind`, deleted ones included.
    ///
    /// This is also the index the next added entity of `kind` receives.
    pub fn count(&self, kind: EntKind) -> usize {
        match kind {
            EntKind::Posi => self.posis.len(),
            EntKind::Vert => self.verts.len(),
            EntKind::Edge => self.edges.len(),
            EntKind::Wire => self.wires.len(),
            EntKind::Tri => self.tris.len(),
            EntKind::Face => self.faces.len(),
            EntKind::Point => self.points.len(),
            EntKind::Pline => self.plines.len(),
            EntKind::Pgon => self.pgons.len(),
            EntKind::Coll => self.colls.len(),
        }
    }

    /// `true` if `index` is allocated and not deleted.
    pub fn exists(&self, kind: EntKind, index: usize) -> bool {
        match kind {
            EntKind::Posi => self.posis.is_live(index),
            EntKind::Vert => self.verts.is_live(index),
            EntKind::Edge => self.edges.is_live(index),
            EntKind::Wire => self.wires.is_live(index),
            EntKind::Tri => self.tris.is_live(index),
            EntKind::Face => self.faces.is_live(index),
            EntKind::Point => self.points.is_live(index),
            EntKind::Pline => self.plines.is_live(index),
            EntKind::Pgon => self.pgons.is_live(index),
            EntKind::Coll => self.colls.is_live(index),
        }
    }

    /// `true` if `index` was allocated and has since been removed.
    pub fn is_deleted(&self, kind: EntKind, index: usize) -> bool {
        index < self.count(kind) && !self.exists(kind, index)
    }

    /// Live indices of `kind`, ascending.
    pub fn get_ents(&self, kind: EntKind) -> Vec<usize> {
        match kind {
            EntKind::Posi => self.posis.live_indices().collect(),
            EntKind::Vert => self.verts.live_indices().collect(),
            EntKind::Edge => self.edges.live_indices().collect(),
            EntKind::Wire => self.wires.live_indices().collect(),
            EntKind::Tri => self.tris.live_indices().collect(),
            EntKind::Face => self.faces.live_indices().collect(),
            EntKind::Point => self.points.live_indices().collect(),
            EntKind::Pline => self.plines.live_indices().collect(),
            EntKind::Pgon => self.pgons.live_indices().collect(),
            EntKind::Coll => self.colls.live_indices().collect(),
        }
    }

    /// Number of live entities of `kind`.
    pub fn num_live(&self, kind: EntKind) -> usize {
        match kind {
            EntKind::Posi => self.posis.num_live(),
            EntKind::Vert => self.verts.num_live(),
            EntKind::Edge => self.edges.num_live(),
            EntKind::Wire => self.wires.num_live(),
            EntKind::Tri => self.tris.num_live(),
            EntKind::Face => self.faces.num_live(),
            EntKind::Point => self.points.num_live(),
            EntKind::Pline => self.plines.num_live(),
            EntKind::Pgon => self.pgons.num_live(),
            EntKind::Coll => self.colls.num_live(),
        }
    }

    /// `Ok(())` if the entity is live, `NotFound` otherwise.
    #[inline]
    pub fn require(&self, kind: EntKind, index: usize) -> Result<(), KernelError> {
        if self.exists(kind, index) {
            Ok(())
        } else {
            Err(KernelError::not_found(kind, index))
        }
    }

    // --- down-link snapshots ---

    pub fn vert_posi(&self, vert: usize) -> Option<usize> {
        self.verts.get(vert).copied()
    }

    pub fn edge_verts(&self, edge: usize) -> Option<[usize; 2]> {
        self.edges.get(edge).copied()
    }

    pub fn wire_edges(&self, wire: usize) -> Option<Vec<usize>> {
        self.wires.get(wire).cloned()
    }

    pub fn tri_verts(&self, tri: usize) -> Option<[usize; 3]> {
        self.tris.get(tri).copied()
    }

    pub fn face_wires(&self, face: usize) -> Option<Vec<usize>> {
        self.faces.get(face).map(|f| f.wires.clone())
    }

    pub fn face_tris(&self, face: usize) -> Option<Vec<usize>> {
        self.faces.get(face).map(|f| f.tris.clone())
    }

    pub fn point_vert(&self, point: usize) -> Option<usize> {
        self.points.get(point).copied()
    }

    pub fn pline_wire(&self, pline: usize) -> Option<usize> {
        self.plines.get(pline).copied()
    }

    pub fn pgon_face(&self, pgon: usize) -> Option<usize> {
        self.pgons.get(pgon).copied()
    }

    /// Objects of `kind` directly owned by `coll` (descendants excluded).
    pub fn coll_objs(&self, coll: usize, kind: EntKind) -> Option<Vec<usize>> {
        self.colls.get(coll).map(|c| c.objs(kind).to_vec())
    }

    pub fn coll_points(&self, coll: usize) -> Option<Vec<usize>> {
        self.coll_objs(coll, EntKind::Point)
    }

    pub fn coll_plines(&self, coll: usize) -> Option<Vec<usize>> {
        self.coll_objs(coll, EntKind::Pline)
    }

    pub fn coll_pgons(&self, coll: usize) -> Option<Vec<usize>> {
        self.coll_objs(coll, EntKind::Pgon)
    }

    // --- up-link snapshots ---

    /// Vertices using `posi`. Empty for a live but unused position.
    pub fn posi_verts(&self, posi: usize) -> Option<Vec<usize>> {
        self.posis.get(posi).map(|_| self.posi_verts[posi].clone())
    }

    pub fn vert_up(&self, vert: usize) -> Option<VertUp> {
        self.verts.get(vert).map(|_| self.vert_up[vert])
    }

    pub fn vert_tris(&self, vert: usize) -> Option<Vec<usize>> {
        self.verts.get(vert).map(|_| self.vert_tris[vert].clone())
    }

    pub fn edge_wire(&self, edge: usize) -> Option<usize> {
        self.edges.get(edge).and_then(|_| self.edge_wire[edge])
    }

    pub fn wire_owner(&self, wire: usize) -> Option<WireOwner> {
        self.wires.get(wire).and_then(|_| self.wire_owner[wire])
    }

    pub fn tri_face(&self, tri: usize) -> Option<usize> {
        self.tris.get(tri).and_then(|_| self.tri_face[tri])
    }

    pub fn face_pgon(&self, face: usize) -> Option<usize> {
        self.faces.get(face).and_then(|_| self.face_pgon[face])
    }

    /// Collections directly owning the object.
    pub fn obj_colls(&self, kind: EntKind, obj: usize) -> Option<Vec<usize>> {
        if !self.exists(kind, obj) {
            return None;
        }
        self.obj_colls_table(kind).map(|t| t[obj].clone())
    }

    pub fn coll_parent(&self, coll: usize) -> Option<usize> {
        self.colls.get(coll).and_then(|_| self.coll_parent[coll])
    }

    // --- wire shape ---

    /// `true` if the wire's first vertex has an incoming edge.
    pub fn wire_is_closed(&self, wire: usize) -> Option<bool> {
        let edges = self.wires.get(wire)?;
        let Some(&first) = edges.first() else {
            return Some(false);
        };
        let [start, _] = self.edges.get(first).copied()?;
        Some(self.vert_up.get(start).and_then(|u| u.incoming()).is_some())
    }

    /// Vertices of a wire in path order; a closed wire does not repeat its
    /// first vertex.
    pub fn wire_verts(&self, wire: usize) -> Option<Vec<usize>> {
        let edges = self.wires.get(wire)?;
        let mut out = Vec::with_capacity(edges.len() + 1);
        for &e in edges {
            if let Some([a, _]) = self.edges.get(e).copied() {
                out.push(a);
            }
        }
        if !self.wire_is_closed(wire)? {
            if let Some([_, b]) = edges.last().and_then(|&e| self.edges.get(e).copied()) {
                out.push(b);
            }
        }
        Some(out)
    }

    /// Boundary wire of a face.
    pub fn face_boundary(&self, face: usize) -> Option<usize> {
        self.faces.get(face).and_then(|f| f.wires.first().copied())
    }

    /// Hole wires of a face.
    pub fn face_holes(&self, face: usize) -> Option<Vec<usize>> {
        self.faces
            .get(face)
            .map(|f| f.wires.iter().skip(1).copied().collect())
    }

    pub(crate) fn obj_colls_table(&self, kind: EntKind) -> Option<&Vec<Vec<usize>>> {
        match kind {
            EntKind::Point => Some(&self.point_colls),
            EntKind::Pline => Some(&self.pline_colls),
            EntKind::Pgon => Some(&self.pgon_colls),
            _ => None,
        }
    }

    pub(crate) fn obj_colls_table_mut(&mut self, kind: EntKind) -> Option<&mut Vec<Vec<usize>>> {
        match kind {
            EntKind::Point => Some(&mut self.point_colls),
            EntKind::Pline => Some(&mut self.pline_colls),
            EntKind::Pgon => Some(&mut self.pgon_colls),
            _ => None,
        }
    }
}
