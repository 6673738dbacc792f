//! Insert/replace primitives: overwrite the down-links of an existing slot,
//! keeping its index, and move the affected up-links along.

use super::{VertSlot, push_unique, remove_value};
use crate::kernel_error::KernelError;
use crate::topology::kind::EntKind;
use crate::topology::store::{EntityStore, WireOwner};

impl EntityStore {
    /// Moves `vert` onto `posi`.
    pub fn replace_vert_posi(&mut self, vert: usize, posi: usize) -> Result<(), KernelError> {
        self.require(EntKind::Vert, vert)?;
        self.require(EntKind::Posi, posi)?;
        let old = self.verts.get(vert).copied().unwrap_or(posi);
        if old == posi {
            return Ok(());
        }
        if let Some(list) = self.posi_verts.get_mut(old) {
            remove_value(list, vert);
        }
        self.posi_verts[posi].push(vert);
        if let Some(p) = self.verts.get_mut(vert) {
            *p = posi;
        }
        Ok(())
    }

    /// Moves `verts[i]` onto `posis[i]` for every `i`.
    pub fn replace_posis(&mut self, verts: &[usize], posis: &[usize]) -> Result<(), KernelError> {
        if verts.len() != posis.len() {
            return Err(KernelError::violation(format!(
                "replace positions: {} verts but {} posis",
                verts.len(),
                posis.len()
            )));
        }
        for &v in verts {
            self.require(EntKind::Vert, v)?;
        }
        for &p in posis {
            self.require(EntKind::Posi, p)?;
        }
        for (&v, &p) in verts.iter().zip(posis) {
            self.replace_vert_posi(v, p)?;
        }
        Ok(())
    }

    /// Re-points `edge` to run `start -> end`.
    pub fn replace_edge_verts(&mut self, edge: usize, start: usize, end: usize) -> Result<(), KernelError> {
        self.require(EntKind::Edge, edge)?;
        self.require(EntKind::Vert, start)?;
        self.require(EntKind::Vert, end)?;
        if start == end {
            return Err(KernelError::violation(format!(
                "edge cannot start and end at vert {start}"
            )));
        }
        let [old_start, old_end] = self.edges.get(edge).copied().unwrap_or([start, end]);
        self.clear_vert_slot_if(old_start, VertSlot::Outgoing, edge);
        self.clear_vert_slot_if(old_end, VertSlot::Incoming, edge);
        let checked = self
            .check_vert_slot_free(start, VertSlot::Outgoing)
            .and_then(|_| self.check_vert_slot_free(end, VertSlot::Incoming));
        if let Err(e) = checked {
            // put the old links back before failing
            self.set_vert_slot(old_start, VertSlot::Outgoing, Some(edge));
            self.set_vert_slot(old_end, VertSlot::Incoming, Some(edge));
            return Err(e);
        }
        if let Some(ev) = self.edges.get_mut(edge) {
            *ev = [start, end];
        }
        self.set_vert_slot(start, VertSlot::Outgoing, Some(edge));
        self.set_vert_slot(end, VertSlot::Incoming, Some(edge));
        Ok(())
    }

    /// Replaces the edge list of `wire`. New edges must be live and either
    /// unowned or already in this wire.
    pub fn replace_wire_edges(&mut self, wire: usize, edges: &[usize]) -> Result<(), KernelError> {
        self.require(EntKind::Wire, wire)?;
        for &e in edges {
            self.require(EntKind::Edge, e)?;
            match self.edge_wire[e] {
                Some(w) if w != wire => {
                    return Err(KernelError::violation(format!(
                        "edge {e} already belongs to wire {w}"
                    )));
                }
                _ => {}
            }
        }
        let old = self.wires.get(wire).cloned().unwrap_or_default();
        for e in old {
            self.edge_wire[e] = None;
        }
        for &e in edges {
            self.edge_wire[e] = Some(wire);
        }
        if let Some(list) = self.wires.get_mut(wire) {
            *list = edges.to_vec();
        }
        Ok(())
    }

    /// Reverses `wire` in place: the edge order is reversed and every edge
    /// is flipped. Closedness is preserved and all indices are kept.
    pub fn reverse_wire_edges(&mut self, wire: usize) -> Result<(), KernelError> {
        self.require(EntKind::Wire, wire)?;
        let edges = self.wires.get(wire).cloned().unwrap_or_default();
        let ends: Vec<(usize, [usize; 2])> = edges
            .iter()
            .filter_map(|&e| self.edges.get(e).map(|&ev| (e, ev)))
            .collect();
        // free every slot first; flipped edges reuse each other's slots
        for &(e, [a, b]) in &ends {
            self.clear_vert_slot_if(a, VertSlot::Outgoing, e);
            self.clear_vert_slot_if(b, VertSlot::Incoming, e);
        }
        for &(e, [a, b]) in &ends {
            if let Some(ev) = self.edges.get_mut(e) {
                *ev = [b, a];
            }
            self.set_vert_slot(b, VertSlot::Outgoing, Some(e));
            self.set_vert_slot(a, VertSlot::Incoming, Some(e));
        }
        if let Some(list) = self.wires.get_mut(wire) {
            list.reverse();
        }
        Ok(())
    }

    /// Replaces the wires of `face` (boundary first). Triangles are left
    /// alone; re-triangulate afterwards.
    pub fn replace_face_wires(&mut self, face: usize, wires: &[usize]) -> Result<(), KernelError> {
        self.require(EntKind::Face, face)?;
        if wires.is_empty() {
            return Err(KernelError::violation("a face needs a boundary wire"));
        }
        super::add::check_distinct_wires(wires)?;
        for &w in wires {
            self.check_face_wire(w, Some(face))?;
        }
        let old = self.faces.get(face).map(|f| f.wires.clone()).unwrap_or_default();
        for w in old {
            self.wire_owner[w] = None;
        }
        for &w in wires {
            self.wire_owner[w] = Some(WireOwner::Face(face));
        }
        if let Some(f) = self.faces.get_mut(face) {
            f.wires = wires.to_vec();
        }
        Ok(())
    }

    /// Replaces the triangle list of `face`. Old triangles become unowned
    /// but stay alive.
    pub fn replace_face_tris(&mut self, face: usize, tris: &[usize]) -> Result<(), KernelError> {
        self.require(EntKind::Face, face)?;
        for &t in tris {
            self.require(EntKind::Tri, t)?;
            match self.tri_face[t] {
                Some(f) if f != face => {
                    return Err(KernelError::violation(format!(
                        "tri {t} already belongs to face {f}"
                    )));
                }
                _ => {}
            }
        }
        let old = self.faces.get(face).map(|f| f.tris.clone()).unwrap_or_default();
        for t in old {
            self.tri_face[t] = None;
        }
        let mut list = Vec::with_capacity(tris.len());
        for &t in tris {
            push_unique(&mut list, t);
            self.tri_face[t] = Some(face);
        }
        if let Some(f) = self.faces.get_mut(face) {
            f.tris = list;
        }
        Ok(())
    }
}
