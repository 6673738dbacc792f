//! Remove primitive: tombstone one slot.
//!
//! Removing clears the entity's down-links together with the mirrored
//! up-links of its children, detaches it from any parent that holds it in a
//! list (wire edges, face wires and triangles, collection members, parent
//! collection), notifies the attribute store, and finally sets the
//! tombstone. Parents that hold it in a single-valued link (a vertex's
//! position, a point's vertex, a polyline's wire, a polygon's face) are the
//! caller's responsibility.
//!
//! Nothing cascades: the orphaned children are returned so the caller can
//! decide whether to remove them as well.

use super::{VertSlot, remove_value};
use crate::attribs::Attribs;
use crate::kernel_error::KernelError;
use crate::topology::kind::{Ent, EntKind};
use crate::topology::store::{EntityStore, VertUp, WireOwner};

impl EntityStore {
    /// Removes `(kind, index)` and returns the children it left orphaned.
    ///
    /// Removing an already-removed slot is a no-op returning no children.
    /// An index that was never allocated is `NotFound`.
    pub fn remove<A: Attribs + ?Sized>(
        &mut self,
        kind: EntKind,
        index: usize,
        attribs: &mut A,
    ) -> Result<Vec<Ent>, KernelError> {
        if index >= self.count(kind) {
            return Err(KernelError::not_found(kind, index));
        }
        if !self.exists(kind, index) {
            return Ok(Vec::new());
        }
        let orphans = match kind {
            EntKind::Posi => self.remove_posi(index),
            EntKind::Vert => self.remove_vert(index),
            EntKind::Edge => self.remove_edge(index),
            EntKind::Wire => self.remove_wire(index),
            EntKind::Tri => self.remove_tri(index),
            EntKind::Face => self.remove_face(index),
            EntKind::Point => self.remove_point(index),
            EntKind::Pline => self.remove_pline(index),
            EntKind::Pgon => self.remove_pgon(index),
            EntKind::Coll => self.remove_coll(index),
        };
        attribs.delete_entity(kind, index);
        log::trace!("removed {kind} {index}, {} orphans", orphans.len());
        Ok(orphans)
    }

    fn remove_posi(&mut self, posi: usize) -> Vec<Ent> {
        self.posi_verts[posi].clear();
        self.posis.kill(posi);
        Vec::new()
    }

    fn remove_vert(&mut self, vert: usize) -> Vec<Ent> {
        let mut orphans = Vec::new();
        if let Some(posi) = self.verts.kill(vert) {
            if let Some(list) = self.posi_verts.get_mut(posi) {
                remove_value(list, vert);
            }
            orphans.push((EntKind::Posi, posi));
        }
        self.vert_up[vert] = VertUp::Free;
        self.vert_tris[vert].clear();
        orphans
    }

    fn remove_edge(&mut self, edge: usize) -> Vec<Ent> {
        let Some([start, end]) = self.edges.kill(edge) else {
            return Vec::new();
        };
        self.clear_vert_slot_if(start, VertSlot::Outgoing, edge);
        self.clear_vert_slot_if(end, VertSlot::Incoming, edge);
        if let Some(w) = self.edge_wire[edge].take() {
            if let Some(list) = self.wires.get_mut(w) {
                remove_value(list, edge);
            }
        }
        vec![(EntKind::Vert, start), (EntKind::Vert, end)]
    }

    fn remove_wire(&mut self, wire: usize) -> Vec<Ent> {
        let Some(edges) = self.wires.kill(wire) else {
            return Vec::new();
        };
        for &e in &edges {
            if self.edge_wire[e] == Some(wire) {
                self.edge_wire[e] = None;
            }
        }
        if let Some(WireOwner::Face(f)) = self.wire_owner[wire] {
            if let Some(face) = self.faces.get_mut(f) {
                remove_value(&mut face.wires, wire);
            }
        }
        self.wire_owner[wire] = None;
        edges.into_iter().map(|e| (EntKind::Edge, e)).collect()
    }

    fn remove_tri(&mut self, tri: usize) -> Vec<Ent> {
        let Some(verts) = self.tris.kill(tri) else {
            return Vec::new();
        };
        for v in verts {
            if let Some(list) = self.vert_tris.get_mut(v) {
                remove_value(list, tri);
            }
        }
        if let Some(f) = self.tri_face[tri].take() {
            if let Some(face) = self.faces.get_mut(f) {
                remove_value(&mut face.tris, tri);
            }
        }
        verts.into_iter().map(|v| (EntKind::Vert, v)).collect()
    }

    fn remove_face(&mut self, face: usize) -> Vec<Ent> {
        let Some(down) = self.faces.kill(face) else {
            return Vec::new();
        };
        let mut orphans = Vec::with_capacity(down.wires.len() + down.tris.len());
        for w in down.wires {
            if self.wire_owner[w] == Some(WireOwner::Face(face)) {
                self.wire_owner[w] = None;
            }
            orphans.push((EntKind::Wire, w));
        }
        for t in down.tris {
            if self.tri_face[t] == Some(face) {
                self.tri_face[t] = None;
            }
            orphans.push((EntKind::Tri, t));
        }
        self.face_pgon[face] = None;
        orphans
    }

    fn remove_point(&mut self, point: usize) -> Vec<Ent> {
        let Some(vert) = self.points.kill(point) else {
            return Vec::new();
        };
        if self.vert_up.get(vert) == Some(&VertUp::Point(point)) {
            self.vert_up[vert] = VertUp::Free;
        }
        self.detach_obj_from_colls(EntKind::Point, point);
        vec![(EntKind::Vert, vert)]
    }

    fn remove_pline(&mut self, pline: usize) -> Vec<Ent> {
        let Some(wire) = self.plines.kill(pline) else {
            return Vec::new();
        };
        if self.wire_owner.get(wire) == Some(&Some(WireOwner::Pline(pline))) {
            self.wire_owner[wire] = None;
        }
        self.detach_obj_from_colls(EntKind::Pline, pline);
        vec![(EntKind::Wire, wire)]
    }

    fn remove_pgon(&mut self, pgon: usize) -> Vec<Ent> {
        let Some(face) = self.pgons.kill(pgon) else {
            return Vec::new();
        };
        if self.face_pgon.get(face) == Some(&Some(pgon)) {
            self.face_pgon[face] = None;
        }
        self.detach_obj_from_colls(EntKind::Pgon, pgon);
        vec![(EntKind::Face, face)]
    }

    fn remove_coll(&mut self, coll: usize) -> Vec<Ent> {
        let Some(down) = self.colls.kill(coll) else {
            return Vec::new();
        };
        let mut orphans = Vec::new();
        for kind in EntKind::OBJS {
            for &obj in down.objs(kind) {
                if let Some(table) = self.obj_colls_table_mut(kind) {
                    if let Some(list) = table.get_mut(obj) {
                        remove_value(list, coll);
                    }
                }
                orphans.push((kind, obj));
            }
        }
        for child in 0..self.coll_parent.len() {
            if self.coll_parent[child] == Some(coll) {
                self.coll_parent[child] = None;
                orphans.push((EntKind::Coll, child));
            }
        }
        self.coll_parent[coll] = None;
        orphans
    }

    fn detach_obj_from_colls(&mut self, kind: EntKind, obj: usize) {
        let owners = match self.obj_colls_table_mut(kind) {
            Some(table) => std::mem::take(&mut table[obj]),
            None => return,
        };
        for c in owners {
            if let Some(list) = self.colls.get_mut(c).and_then(|d| d.objs_mut(kind)) {
                remove_value(list, obj);
            }
        }
    }
}
