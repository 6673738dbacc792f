//! Add primitives: allocate a new slot, write its down-link and mirror it
//! into the up-links of the referenced entities.

use super::VertSlot;
use crate::kernel_error::KernelError;
use itertools::Itertools;
use crate::topology::kind::EntKind;
use crate::topology::store::{CollDown, EntityStore, FaceDown, VertUp, WireOwner};

impl EntityStore {
    /// Adds an unused position.
    pub fn add_posi(&mut self) -> usize {
        let i = self.posis.push(());
        self.posi_verts.push(Vec::new());
        i
    }

    /// Adds a vertex on `posi`.
    pub fn add_vert(&mut self, posi: usize) -> Result<usize, KernelError> {
        self.require(EntKind::Posi, posi)?;
        let i = self.verts.push(posi);
        self.vert_up.push(VertUp::Free);
        self.vert_tris.push(Vec::new());
        self.posi_verts[posi].push(i);
        Ok(i)
    }

    /// Adds a directed edge `start -> end`.
    ///
    /// `start` must have a free outgoing slot and `end` a free incoming slot;
    /// neither may belong to a point.
    pub fn add_edge(&mut self, start: usize, end: usize) -> Result<usize, KernelError> {
        self.require(EntKind::Vert, start)?;
        self.require(EntKind::Vert, end)?;
        if start == end {
            return Err(KernelError::violation(format!(
                "edge cannot start and end at vert {start}"
            )));
        }
        self.check_vert_slot_free(start, VertSlot::Outgoing)?;
        self.check_vert_slot_free(end, VertSlot::Incoming)?;
        let e = self.edges.push([start, end]);
        self.edge_wire.push(None);
        self.set_vert_slot(start, VertSlot::Outgoing, Some(e));
        self.set_vert_slot(end, VertSlot::Incoming, Some(e));
        Ok(e)
    }

    /// Adds the edges of a path through `verts`: `n - 1` edges, or `n` when
    /// `closed` (the last edge returns to `verts[0]`).
    pub fn add_edge_chain(&mut self, verts: &[usize], closed: bool) -> Result<Vec<usize>, KernelError> {
        let min = if closed { 3 } else { 2 };
        if verts.len() < min {
            return Err(KernelError::violation(format!(
                "a {} path needs at least {min} verts, got {}",
                if closed { "closed" } else { "open" },
                verts.len()
            )));
        }
        let mut edges = Vec::with_capacity(verts.len());
        for pair in verts.windows(2) {
            edges.push(self.add_edge(pair[0], pair[1])?);
        }
        if closed {
            edges.push(self.add_edge(verts[verts.len() - 1], verts[0])?);
        }
        Ok(edges)
    }

    /// Adds a wire over `edges`, which must be unowned and connected end to
    /// start in the given order.
    pub fn add_wire(&mut self, edges: &[usize]) -> Result<usize, KernelError> {
        if edges.is_empty() {
            return Err(KernelError::violation("a wire needs at least one edge"));
        }
        for &e in edges {
            self.require(EntKind::Edge, e)?;
            if let Some(w) = self.edge_wire[e] {
                return Err(KernelError::violation(format!(
                    "edge {e} already belongs to wire {w}"
                )));
            }
        }
        for pair in edges.windows(2) {
            let [_, a_end] = self.edges.get(pair[0]).copied().unwrap_or_default();
            let [b_start, _] = self.edges.get(pair[1]).copied().unwrap_or_default();
            if a_end != b_start {
                return Err(KernelError::violation(format!(
                    "edges {} and {} are not connected",
                    pair[0], pair[1]
                )));
            }
        }
        let w = self.wires.push(edges.to_vec());
        self.wire_owner.push(None);
        for &e in edges {
            self.edge_wire[e] = Some(w);
        }
        Ok(w)
    }

    /// Adds a triangle over three live vertices.
    pub fn add_tri(&mut self, verts: [usize; 3]) -> Result<usize, KernelError> {
        for v in verts {
            self.require(EntKind::Vert, v)?;
        }
        let t = self.tris.push(verts);
        self.tri_face.push(None);
        for v in verts {
            super::push_unique(&mut self.vert_tris[v], t);
        }
        Ok(t)
    }

    /// Adds a face over `wires` (boundary first, then holes). Every wire must
    /// be closed and unowned. The face starts with no triangles.
    pub fn add_face(&mut self, wires: &[usize]) -> Result<usize, KernelError> {
        if wires.is_empty() {
            return Err(KernelError::violation("a face needs a boundary wire"));
        }
        check_distinct_wires(wires)?;
        for &w in wires {
            self.check_face_wire(w, None)?;
        }
        let f = self.faces.push(FaceDown {
            wires: wires.to_vec(),
            tris: Vec::new(),
        });
        self.face_pgon.push(None);
        for &w in wires {
            self.wire_owner[w] = Some(WireOwner::Face(f));
        }
        Ok(f)
    }

    /// Adds a point object on an unused vertex.
    pub fn add_point_ent(&mut self, vert: usize) -> Result<usize, KernelError> {
        self.require(EntKind::Vert, vert)?;
        if self.vert_up[vert] != VertUp::Free {
            return Err(KernelError::violation(format!("vert {vert} is already in use")));
        }
        let p = self.points.push(vert);
        self.point_colls.push(Vec::new());
        self.vert_up[vert] = VertUp::Point(p);
        Ok(p)
    }

    /// Adds a polyline object on an unowned wire.
    pub fn add_pline_ent(&mut self, wire: usize) -> Result<usize, KernelError> {
        self.require(EntKind::Wire, wire)?;
        if let Some(owner) = self.wire_owner[wire] {
            return Err(KernelError::violation(format!(
                "wire {wire} is already owned by {owner:?}"
            )));
        }
        let p = self.plines.push(wire);
        self.pline_colls.push(Vec::new());
        self.wire_owner[wire] = Some(WireOwner::Pline(p));
        Ok(p)
    }

    /// Adds a polygon object on an unowned face.
    pub fn add_pgon_ent(&mut self, face: usize) -> Result<usize, KernelError> {
        self.require(EntKind::Face, face)?;
        if let Some(pg) = self.face_pgon[face] {
            return Err(KernelError::violation(format!(
                "face {face} is already owned by pgon {pg}"
            )));
        }
        let p = self.pgons.push(face);
        self.pgon_colls.push(Vec::new());
        self.face_pgon[face] = Some(p);
        Ok(p)
    }

    /// Adds an empty root collection.
    pub fn add_coll(&mut self) -> usize {
        let c = self.colls.push(CollDown::default());
        self.coll_parent.push(None);
        c
    }

    pub(crate) fn check_vert_slot_free(&self, vert: usize, slot: VertSlot) -> Result<(), KernelError> {
        match (self.vert_up[vert], slot) {
            (VertUp::Point(p), _) => Err(KernelError::violation(format!(
                "vert {vert} belongs to point {p}"
            ))),
            (VertUp::Edges { outgoing: Some(e), .. }, VertSlot::Outgoing) => Err(
                KernelError::violation(format!("vert {vert} already has outgoing edge {e}")),
            ),
            (VertUp::Edges { incoming: Some(e), .. }, VertSlot::Incoming) => Err(
                KernelError::violation(format!("vert {vert} already has incoming edge {e}")),
            ),
            _ => Ok(()),
        }
    }

    /// A wire may join `face` if it is live, closed and owned by nobody (or
    /// already by `face`).
    pub(crate) fn check_face_wire(&self, wire: usize, face: Option<usize>) -> Result<(), KernelError> {
        self.require(EntKind::Wire, wire)?;
        match (self.wire_owner[wire], face) {
            (None, _) => {}
            (Some(WireOwner::Face(f)), Some(face)) if f == face => {}
            (Some(owner), _) => {
                return Err(KernelError::violation(format!(
                    "wire {wire} is already owned by {owner:?}"
                )));
            }
        }
        if self.wire_is_closed(wire) != Some(true) {
            return Err(KernelError::violation(format!(
                "face wires must be closed, wire {wire} is open"
            )));
        }
        Ok(())
    }
}

/// A face lists each of its wires once.
pub(crate) fn check_distinct_wires(wires: &[usize]) -> Result<(), KernelError> {
    match wires.iter().duplicates().next() {
        Some(w) => Err(KernelError::violation(format!(
            "wire {w} is listed more than once for one face"
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(s: &mut EntityStore, n: usize) -> (Vec<usize>, Vec<usize>) {
        let verts: Vec<usize> = (0..n)
            .map(|_| {
                let p = s.add_posi();
                s.add_vert(p).unwrap()
            })
            .collect();
        let edges = s.add_edge_chain(&verts, true).unwrap();
        (verts, edges)
    }

    #[test]
    fn edge_sets_vert_slots() {
        let mut s = EntityStore::new();
        let p = s.add_posi();
        let a = s.add_vert(p).unwrap();
        let b = s.add_vert(p).unwrap();
        let e = s.add_edge(a, b).unwrap();
        assert_eq!(s.vert_up(a).unwrap().outgoing(), Some(e));
        assert_eq!(s.vert_up(b).unwrap().incoming(), Some(e));
        assert_eq!(s.posi_verts(p).unwrap(), vec![a, b]);
        // slots are exclusive
        let c = s.add_vert(p).unwrap();
        assert!(matches!(
            s.add_edge(a, c),
            Err(KernelError::StructuralViolation(_))
        ));
        assert!(s.add_edge(a, a).is_err());
    }

    #[test]
    fn closed_chain_closes_wire() {
        let mut s = EntityStore::new();
        let (verts, edges) = ring(&mut s, 4);
        assert_eq!(edges.len(), 4);
        let w = s.add_wire(&edges).unwrap();
        assert_eq!(s.wire_is_closed(w), Some(true));
        assert_eq!(s.wire_verts(w).unwrap(), verts);
        for e in edges {
            assert_eq!(s.edge_wire(e), Some(w));
        }
    }

    #[test]
    fn open_chain_is_open() {
        let mut s = EntityStore::new();
        let verts: Vec<usize> = (0..3)
            .map(|_| {
                let p = s.add_posi();
                s.add_vert(p).unwrap()
            })
            .collect();
        let edges = s.add_edge_chain(&verts, false).unwrap();
        assert_eq!(edges.len(), 2);
        let w = s.add_wire(&edges).unwrap();
        assert_eq!(s.wire_is_closed(w), Some(false));
        assert_eq!(s.wire_verts(w).unwrap(), verts);
        assert!(s.add_face(&[w]).is_err());
        let pl = s.add_pline_ent(w).unwrap();
        assert_eq!(s.wire_owner(w), Some(WireOwner::Pline(pl)));
    }

    #[test]
    fn wire_rejects_disconnected_or_owned_edges() {
        let mut s = EntityStore::new();
        let (_, edges) = ring(&mut s, 3);
        assert!(s.add_wire(&[edges[0], edges[2]]).is_err());
        s.add_wire(&edges).unwrap();
        assert!(s.add_wire(&edges[..1]).is_err());
    }

    #[test]
    fn face_and_pgon_link_up() {
        let mut s = EntityStore::new();
        let (_, edges) = ring(&mut s, 3);
        let w = s.add_wire(&edges).unwrap();
        let f = s.add_face(&[w]).unwrap();
        assert_eq!(s.wire_owner(w), Some(WireOwner::Face(f)));
        let pg = s.add_pgon_ent(f).unwrap();
        assert_eq!(s.face_pgon(f), Some(pg));
        assert!(s.add_pgon_ent(f).is_err());
        assert!(s.add_face(&[w]).is_err());
    }

    #[test]
    fn face_rejects_repeated_wire() {
        let mut s = EntityStore::new();
        let (_, edges) = ring(&mut s, 3);
        let w = s.add_wire(&edges).unwrap();
        assert!(matches!(
            s.add_face(&[w, w]),
            Err(KernelError::StructuralViolation(_))
        ));
        assert_eq!(s.wire_owner(w), None);
        assert_eq!(s.count(EntKind::Face), 0);
    }

    #[test]
    fn point_claims_vert() {
        let mut s = EntityStore::new();
        let p = s.add_posi();
        let v = s.add_vert(p).unwrap();
        let pt = s.add_point_ent(v).unwrap();
        assert_eq!(s.vert_up(v), Some(VertUp::Point(pt)));
        assert!(s.add_point_ent(v).is_err());
        let w = s.add_vert(p).unwrap();
        assert!(s.add_edge(v, w).is_err());
    }

    #[test]
    fn add_requires_live_refs() {
        let mut s = EntityStore::new();
        assert_eq!(
            s.add_vert(0),
            Err(KernelError::NotFound {
                kind: EntKind::Posi,
                index: 0
            })
        );
        assert!(s.add_tri([0, 1, 2]).is_err());
        assert!(s.add_edge_chain(&[], false).is_err());
    }
}
