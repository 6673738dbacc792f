//! Link/unlink primitives: adjust a single link pair without touching the
//! rest of the entity. Used for incremental wire and face assembly and
//! during deletion cascades.

use super::{VertSlot, push_unique, remove_value};
use crate::kernel_error::KernelError;
use crate::topology::kind::EntKind;
use crate::topology::store::{EntityStore, WireOwner};

impl EntityStore {
    /// Records `edge` in the matching slot of `vert` (outgoing if the edge
    /// starts there, incoming if it ends there).
    pub fn link_vert_edge(&mut self, vert: usize, edge: usize) -> Result<(), KernelError> {
        self.require(EntKind::Vert, vert)?;
        let [start, end] = self
            .edges
            .get(edge)
            .copied()
            .ok_or_else(|| KernelError::not_found(EntKind::Edge, edge))?;
        let slot = if start == vert {
            VertSlot::Outgoing
        } else if end == vert {
            VertSlot::Incoming
        } else {
            return Err(KernelError::violation(format!(
                "edge {edge} does not touch vert {vert}"
            )));
        };
        self.check_vert_slot_free(vert, slot)?;
        self.set_vert_slot(vert, slot, Some(edge));
        Ok(())
    }

    /// Clears whichever slot of `vert` holds `edge`.
    pub fn unlink_vert_edge(&mut self, vert: usize, edge: usize) -> Result<(), KernelError> {
        self.require(EntKind::Vert, vert)?;
        self.clear_vert_slot_if(vert, VertSlot::Incoming, edge);
        self.clear_vert_slot_if(vert, VertSlot::Outgoing, edge);
        Ok(())
    }

    /// Inserts an unowned `edge` into `wire` at `at` (appends when `None`).
    ///
    /// Connectivity is not checked, so a wire can be assembled piecewise.
    pub fn link_wire_edge(&mut self, wire: usize, edge: usize, at: Option<usize>) -> Result<(), KernelError> {
        self.require(EntKind::Wire, wire)?;
        self.require(EntKind::Edge, edge)?;
        if let Some(w) = self.edge_wire[edge] {
            return Err(KernelError::violation(format!(
                "edge {edge} already belongs to wire {w}"
            )));
        }
        if let Some(edges) = self.wires.get_mut(wire) {
            let at = at.unwrap_or(edges.len()).min(edges.len());
            edges.insert(at, edge);
        }
        self.edge_wire[edge] = Some(wire);
        Ok(())
    }

    /// Detaches `edge` from `wire`.
    pub fn unlink_wire_edge(&mut self, wire: usize, edge: usize) -> Result<(), KernelError> {
        self.require(EntKind::Wire, wire)?;
        self.require(EntKind::Edge, edge)?;
        if let Some(edges) = self.wires.get_mut(wire) {
            remove_value(edges, edge);
        }
        if self.edge_wire[edge] == Some(wire) {
            self.edge_wire[edge] = None;
        }
        Ok(())
    }

    /// Appends a closed, unowned `wire` to `face` as a hole.
    pub fn link_face_wire(&mut self, face: usize, wire: usize) -> Result<(), KernelError> {
        self.require(EntKind::Face, face)?;
        self.check_face_wire(wire, Some(face))?;
        if let Some(f) = self.faces.get_mut(face) {
            push_unique(&mut f.wires, wire);
        }
        self.wire_owner[wire] = Some(WireOwner::Face(face));
        Ok(())
    }

    /// Detaches `wire` from `face`. Detaching the boundary promotes the
    /// first hole, so callers normally only detach holes.
    pub fn unlink_face_wire(&mut self, face: usize, wire: usize) -> Result<(), KernelError> {
        self.require(EntKind::Face, face)?;
        self.require(EntKind::Wire, wire)?;
        if let Some(f) = self.faces.get_mut(face) {
            remove_value(&mut f.wires, wire);
        }
        if self.wire_owner[wire] == Some(WireOwner::Face(face)) {
            self.wire_owner[wire] = None;
        }
        Ok(())
    }

    /// Attaches an unowned triangle to `face`.
    pub fn link_face_tri(&mut self, face: usize, tri: usize) -> Result<(), KernelError> {
        self.require(EntKind::Face, face)?;
        self.require(EntKind::Tri, tri)?;
        match self.tri_face[tri] {
            Some(f) if f != face => {
                return Err(KernelError::violation(format!(
                    "tri {tri} already belongs to face {f}"
                )));
            }
            _ => {}
        }
        if let Some(f) = self.faces.get_mut(face) {
            push_unique(&mut f.tris, tri);
        }
        self.tri_face[tri] = Some(face);
        Ok(())
    }

    /// Detaches a triangle from `face`.
    pub fn unlink_face_tri(&mut self, face: usize, tri: usize) -> Result<(), KernelError> {
        self.require(EntKind::Face, face)?;
        self.require(EntKind::Tri, tri)?;
        if let Some(f) = self.faces.get_mut(face) {
            remove_value(&mut f.tris, tri);
        }
        if self.tri_face[tri] == Some(face) {
            self.tri_face[tri] = None;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verts(s: &mut EntityStore, n: usize) -> Vec<usize> {
        (0..n)
            .map(|_| {
                let p = s.add_posi();
                s.add_vert(p).unwrap()
            })
            .collect()
    }

    #[test]
    fn unlink_then_relink_vert_edge() {
        let mut s = EntityStore::new();
        let v = verts(&mut s, 2);
        let e = s.add_edge(v[0], v[1]).unwrap();
        s.unlink_vert_edge(v[0], e).unwrap();
        assert_eq!(s.vert_up(v[0]).unwrap().outgoing(), None);
        s.link_vert_edge(v[0], e).unwrap();
        assert_eq!(s.vert_up(v[0]).unwrap().outgoing(), Some(e));
        let stranger = verts(&mut s, 1)[0];
        assert!(s.link_vert_edge(stranger, e).is_err());
    }

    #[test]
    fn wire_assembled_piecewise() {
        let mut s = EntityStore::new();
        let v = verts(&mut s, 3);
        let e0 = s.add_edge(v[0], v[1]).unwrap();
        let e1 = s.add_edge(v[1], v[2]).unwrap();
        let w = s.add_wire(&[e1]).unwrap();
        s.link_wire_edge(w, e0, Some(0)).unwrap();
        assert_eq!(s.wire_edges(w).unwrap(), vec![e0, e1]);
        assert_eq!(s.edge_wire(e0), Some(w));
        assert!(s.link_wire_edge(w, e0, None).is_err());
        s.unlink_wire_edge(w, e1).unwrap();
        assert_eq!(s.wire_edges(w).unwrap(), vec![e0]);
        assert_eq!(s.edge_wire(e1), None);
    }

    #[test]
    fn face_holes_and_tris() {
        let mut s = EntityStore::new();
        let outer = verts(&mut s, 3);
        let inner = verts(&mut s, 3);
        let eo = s.add_edge_chain(&outer, true).unwrap();
        let ei = s.add_edge_chain(&inner, true).unwrap();
        let wo = s.add_wire(&eo).unwrap();
        let wi = s.add_wire(&ei).unwrap();
        let f = s.add_face(&[wo]).unwrap();
        s.link_face_wire(f, wi).unwrap();
        assert_eq!(s.face_holes(f).unwrap(), vec![wi]);
        let t = s.add_tri([outer[0], outer[1], outer[2]]).unwrap();
        s.link_face_tri(f, t).unwrap();
        assert_eq!(s.tri_face(t), Some(f));
        s.unlink_face_tri(f, t).unwrap();
        assert!(s.face_tris(f).unwrap().is_empty());
        s.unlink_face_wire(f, wi).unwrap();
        assert!(s.face_holes(f).unwrap().is_empty());
        assert_eq!(s.wire_owner(wi), None);
    }
}
