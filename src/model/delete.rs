//! Cascade deletes and vertex deletion.
//!
//! The remove primitive never cascades; these operations walk the orphans
//! it returns and remove every child that nothing else uses any more.
//! Already-deleted entities are skipped, so overlapping deletes are fine.

use super::Model;
use crate::attribs::Attribs;
use crate::kernel_error::KernelError;
use crate::topology::kind::{Ent, EntKind};
use crate::topology::store::{VertUp, WireOwner};

/// What a cascade does with positions left without vertices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DelPosis {
    /// Unused positions stay alive.
    #[default]
    Keep,
    /// Unused positions are deleted too.
    Prune,
}

/// What [`Model::del_coll`] does with the objects of the collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollContents {
    /// Objects survive, they just leave the collection.
    Keep,
    /// Objects are cascade-deleted.
    Delete(DelPosis),
}

/// Role of the wire a path vertex belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PathOwner {
    Pline(usize),
    Boundary { face: usize },
    Hole { face: usize },
    Loose,
}

impl<A: Attribs> Model<A> {
    /// Cascade-deletes objects of `kind` (points, polylines or polygons).
    ///
    /// Out-of-range indices are `NotFound`; deleted ones are skipped.
    pub fn del_objs(&mut self, kind: EntKind, idxs: &[usize], posis: DelPosis) -> Result<(), KernelError> {
        if !kind.is_obj() {
            return Err(KernelError::violation(format!(
                "del_objs deletes points, plines and pgons, not {kind}"
            )));
        }
        for &i in idxs {
            if i >= self.store.count(kind) {
                return Err(KernelError::not_found(kind, i));
            }
        }
        let mut removed = 0;
        for &i in idxs {
            if self.store.exists(kind, i) {
                self.cascade((kind, i), posis)?;
                removed += 1;
            }
        }
        log::debug!("deleted {removed} of {} {kind}s ({posis:?} posis)", idxs.len());
        self.debug_check();
        Ok(())
    }

    /// Deletes a collection. Its sub-collections move up to its parent (or
    /// become roots); its objects are kept or cascade-deleted per
    /// `contents`.
    pub fn del_coll(&mut self, coll: usize, contents: CollContents) -> Result<(), KernelError> {
        self.store.require(EntKind::Coll, coll)?;
        let parent = self.store.coll_parent(coll);
        let children = self.store.coll_children(coll);
        let objs: Vec<(EntKind, Vec<usize>)> = EntKind::OBJS
            .into_iter()
            .map(|k| (k, self.store.coll_objs(coll, k).unwrap_or_default()))
            .collect();
        self.store.remove(EntKind::Coll, coll, &mut self.attribs)?;
        for child in children {
            self.store.coll_set_parent(child, parent)?;
        }
        if let CollContents::Delete(posis) = contents {
            for (kind, idxs) in objs {
                self.del_objs(kind, &idxs, posis)?;
            }
        }
        self.debug_check();
        Ok(())
    }

    /// Deletes one vertex and repairs whatever it was part of:
    ///
    /// - the vertex of a point: the point goes;
    /// - a path too short to lose a vertex (two for an open wire, three
    ///   for a closed one): the polyline or polygon goes, or just the hole
    ///   for a hole wire;
    /// - the first or last vertex of an open wire: that end edge goes;
    /// - otherwise the two edges around the vertex are replaced by one
    ///   edge joining its neighbours.
    ///
    /// Faces are re-triangulated afterwards. Positions are kept.
    pub fn del_vert(&mut self, vert: usize) -> Result<(), KernelError> {
        let up = self
            .store
            .vert_up(vert)
            .ok_or_else(|| KernelError::not_found(EntKind::Vert, vert))?;
        match up {
            VertUp::Free => {
                if let Some(t) = self.store.vert_tris(vert).unwrap_or_default().first() {
                    return Err(KernelError::violation(format!(
                        "vert {vert} is only used by tri {t}; re-triangulate its face instead"
                    )));
                }
                self.store.remove(EntKind::Vert, vert, &mut self.attribs)?;
            }
            VertUp::Point(pt) => self.del_objs(EntKind::Point, &[pt], DelPosis::Keep)?,
            VertUp::Edges { incoming, outgoing } => {
                let wire = incoming
                    .or(outgoing)
                    .and_then(|e| self.store.edge_wire(e))
                    .ok_or_else(|| {
                        KernelError::violation(format!("edges of vert {vert} are not in a wire"))
                    })?;
                self.del_path_vert(vert, wire, incoming, outgoing)?;
            }
        }
        self.debug_check();
        Ok(())
    }

    /// Deletes hole `wire` from `pgon` and re-triangulates.
    pub fn del_pgon_hole(&mut self, pgon: usize, wire: usize) -> Result<(), KernelError> {
        let face = self
            .store
            .pgon_face(pgon)
            .ok_or_else(|| KernelError::not_found(EntKind::Pgon, pgon))?;
        self.del_face_hole(face, wire)?;
        self.debug_check();
        Ok(())
    }

    fn del_face_hole(&mut self, face: usize, wire: usize) -> Result<(), KernelError> {
        let holes = self
            .store
            .face_holes(face)
            .ok_or_else(|| KernelError::not_found(EntKind::Face, face))?;
        if !holes.contains(&wire) {
            return Err(KernelError::violation(format!(
                "wire {wire} is not a hole of face {face}"
            )));
        }
        self.store.unlink_face_wire(face, wire)?;
        // re-triangulate first so the hole's verts lose their tris
        self.triangulate_face(face)?;
        self.cascade((EntKind::Wire, wire), DelPosis::Keep)
    }

    fn del_path_vert(
        &mut self,
        vert: usize,
        wire: usize,
        incoming: Option<usize>,
        outgoing: Option<usize>,
    ) -> Result<(), KernelError> {
        let owner = self.path_owner(wire);
        let closed = self.store.wire_is_closed(wire).unwrap_or(false);
        let n = self.store.wire_verts(wire).map_or(0, |v| v.len());
        let min = if closed { 3 } else { 2 };

        if n <= min {
            log::debug!("vert {vert}: wire {wire} too short, removing {owner:?}");
            return match owner {
                PathOwner::Pline(pl) => self.del_objs(EntKind::Pline, &[pl], DelPosis::Keep),
                PathOwner::Boundary { face } => match self.store.face_pgon(face) {
                    Some(pg) => self.del_objs(EntKind::Pgon, &[pg], DelPosis::Keep),
                    None => self.cascade((EntKind::Face, face), DelPosis::Keep),
                },
                PathOwner::Hole { face } => self.del_face_hole(face, wire),
                PathOwner::Loose => self.cascade((EntKind::Wire, wire), DelPosis::Keep),
            };
        }

        match (incoming, outgoing) {
            (Some(e_in), Some(e_out)) => {
                let [prev, _] = self.edge(e_in)?;
                let [_, next] = self.edge(e_out)?;
                let edges = self.store.wire_edges(wire).unwrap_or_default();
                let i_in = edges.iter().position(|&e| e == e_in);
                let i_out = edges.iter().position(|&e| e == e_out);
                self.store.remove(EntKind::Edge, e_in, &mut self.attribs)?;
                self.store.remove(EntKind::Edge, e_out, &mut self.attribs)?;
                self.store.remove(EntKind::Vert, vert, &mut self.attribs)?;
                let bridge = self.store.add_edge(prev, next)?;
                // the wrap-around edge of a closed wire goes last
                let at = match (i_in, i_out) {
                    (Some(a), Some(b)) if a < b => Some(a),
                    _ => None,
                };
                self.store.link_wire_edge(wire, bridge, at)?;
            }
            (Some(end), None) | (None, Some(end)) => {
                self.store.remove(EntKind::Edge, end, &mut self.attribs)?;
                self.store.remove(EntKind::Vert, vert, &mut self.attribs)?;
            }
            (None, None) => {
                self.store.remove(EntKind::Vert, vert, &mut self.attribs)?;
            }
        }
        if let PathOwner::Boundary { face } | PathOwner::Hole { face } = owner {
            self.triangulate_face(face)?;
        }
        Ok(())
    }

    fn path_owner(&self, wire: usize) -> PathOwner {
        match self.store.wire_owner(wire) {
            Some(WireOwner::Pline(pl)) => PathOwner::Pline(pl),
            Some(WireOwner::Face(face)) if self.store.face_boundary(face) == Some(wire) => {
                PathOwner::Boundary { face }
            }
            Some(WireOwner::Face(face)) => PathOwner::Hole { face },
            None => PathOwner::Loose,
        }
    }

    fn edge(&self, e: usize) -> Result<[usize; 2], KernelError> {
        self.store
            .edge_verts(e)
            .ok_or_else(|| KernelError::not_found(EntKind::Edge, e))
    }

    /// Removes `root` and then every orphan nothing else uses.
    pub(crate) fn cascade(&mut self, root: Ent, posis: DelPosis) -> Result<(), KernelError> {
        let mut todo = vec![root];
        while let Some((kind, i)) = todo.pop() {
            let orphans = self.store.remove(kind, i, &mut self.attribs)?;
            todo.extend(orphans.into_iter().filter(|&o| self.is_unused(o, posis)));
        }
        Ok(())
    }

    /// `true` if a live entity has no remaining users and may be removed by
    /// a cascade.
    fn is_unused(&self, (kind, i): Ent, posis: DelPosis) -> bool {
        let s = &self.store;
        if !s.exists(kind, i) {
            return false;
        }
        match kind {
            EntKind::Posi => {
                posis == DelPosis::Prune && s.posi_verts(i).is_some_and(|v| v.is_empty())
            }
            EntKind::Vert => {
                s.vert_up(i) == Some(VertUp::Free) && s.vert_tris(i).is_some_and(|t| t.is_empty())
            }
            EntKind::Edge => s.edge_wire(i).is_none(),
            EntKind::Wire => s.wire_owner(i).is_none(),
            EntKind::Tri => s.tri_face(i).is_none(),
            EntKind::Face => s.face_pgon(i).is_none(),
            // objects and collections are only deleted on request
            EntKind::Point | EntKind::Pline | EntKind::Pgon | EntKind::Coll => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(m: &mut Model) -> Vec<usize> {
        [[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [2.0, 2.0, 0.0], [0.0, 2.0, 0.0]]
            .into_iter()
            .map(|xyz| m.add_posi_at(xyz))
            .collect()
    }

    fn live(m: &Model, kind: EntKind) -> usize {
        m.store().num_live(kind)
    }

    #[test]
    fn cascade_keeps_or_prunes_posis() {
        let mut m: Model = Model::new();
        let posis = square(&mut m);
        let pg = m.add_pgon(&posis, &[]).unwrap();
        let mut pruned = m.clone();

        m.del_objs(EntKind::Pgon, &[pg], DelPosis::Keep).unwrap();
        for k in [EntKind::Pgon, EntKind::Face, EntKind::Wire, EntKind::Edge, EntKind::Tri, EntKind::Vert] {
            assert_eq!(live(&m, k), 0, "{k}");
        }
        assert_eq!(m.store().get_ents(EntKind::Posi), posis);

        pruned.del_objs(EntKind::Pgon, &[pg], DelPosis::Prune).unwrap();
        assert_eq!(live(&pruned, EntKind::Posi), 0);
        assert!(pruned.check().is_empty());
    }

    #[test]
    fn shared_posis_survive_pruning() {
        let mut m: Model = Model::new();
        let posis = square(&mut m);
        let pg = m.add_pgon(&posis, &[]).unwrap();
        let pt = m.add_point(posis[0]).unwrap();
        m.del_objs(EntKind::Pgon, &[pg], DelPosis::Prune).unwrap();
        assert_eq!(m.store().get_ents(EntKind::Posi), vec![posis[0]]);
        assert!(m.store().exists(EntKind::Point, pt));
        // deleting twice is fine
        m.del_objs(EntKind::Pgon, &[pg], DelPosis::Prune).unwrap();
        assert!(m.del_objs(EntKind::Pgon, &[7], DelPosis::Keep).is_err());
        assert!(m.del_objs(EntKind::Face, &[0], DelPosis::Keep).is_err());
    }

    #[test]
    fn del_coll_reparents_children() {
        let mut m: Model = Model::new();
        let posis = square(&mut m);
        let pl = m.add_pline(&posis, false).unwrap();
        let s = m.store_mut();
        let root = s.add_coll();
        let mid = s.add_coll();
        let leaf = s.add_coll();
        s.coll_set_parent(mid, Some(root)).unwrap();
        s.coll_set_parent(leaf, Some(mid)).unwrap();
        s.coll_add_child(mid, EntKind::Pline, pl).unwrap();

        m.del_coll(mid, CollContents::Keep).unwrap();
        assert_eq!(m.store().coll_parent(leaf), Some(root));
        assert!(m.store().exists(EntKind::Pline, pl));
        assert!(m.store().obj_colls(EntKind::Pline, pl).unwrap().is_empty());

        m.store_mut().coll_add_child(leaf, EntKind::Pline, pl).unwrap();
        m.del_coll(leaf, CollContents::Delete(DelPosis::Keep)).unwrap();
        assert!(m.store().is_deleted(EntKind::Pline, pl));
        assert_eq!(live(&m, EntKind::Edge), 0);
        assert!(m.check().is_empty(), "{:?}", m.check());
    }

    #[test]
    fn del_interior_vert_splices_edge() {
        let mut m: Model = Model::new();
        let posis = square(&mut m);
        let pl = m.add_pline(&posis, false).unwrap();
        let wire = m.store().pline_wire(pl).unwrap();
        let verts = m.store().wire_verts(wire).unwrap();
        m.del_vert(verts[1]).unwrap();
        let s = m.store();
        assert_eq!(s.wire_verts(wire).unwrap(), vec![verts[0], verts[2], verts[3]]);
        assert_eq!(s.wire_edges(wire).unwrap().len(), 2);
        assert!(s.exists(EntKind::Posi, posis[1]));
        assert!(m.check().is_empty(), "{:?}", m.check());
    }

    #[test]
    fn del_end_vert_of_open_wire() {
        let mut m: Model = Model::new();
        let posis = square(&mut m);
        let pl = m.add_pline(&posis[..3], false).unwrap();
        let wire = m.store().pline_wire(pl).unwrap();
        let verts = m.store().wire_verts(wire).unwrap();
        m.del_vert(verts[0]).unwrap();
        assert_eq!(m.store().wire_verts(wire).unwrap(), verts[1..].to_vec());
        // two verts is the minimum: losing one more takes the pline
        m.del_vert(verts[2]).unwrap();
        assert!(m.store().is_deleted(EntKind::Pline, pl));
        assert_eq!(live(&m, EntKind::Edge), 0);
        assert_eq!(live(&m, EntKind::Vert), 0);
        assert!(m.check().is_empty(), "{:?}", m.check());
    }

    #[test]
    fn del_vert_of_short_pline_deletes_it() {
        let mut m: Model = Model::new();
        let posis = square(&mut m);
        let pl = m.add_pline(&posis[..2], false).unwrap();
        let wire = m.store().pline_wire(pl).unwrap();
        let v = m.store().wire_verts(wire).unwrap()[0];
        m.del_vert(v).unwrap();
        assert!(m.store().is_deleted(EntKind::Pline, pl));
        assert_eq!(live(&m, EntKind::Vert), 0);
    }

    #[test]
    fn del_first_vert_of_closed_boundary() {
        let mut m: Model = Model::new();
        let posis = square(&mut m);
        let pg = m.add_pgon(&posis, &[]).unwrap();
        let face = m.store().pgon_face(pg).unwrap();
        let wire = m.get_face_boundary(face).unwrap();
        let verts = m.store().wire_verts(wire).unwrap();
        m.del_vert(verts[0]).unwrap();
        let s = m.store();
        assert_eq!(s.wire_is_closed(wire), Some(true));
        assert_eq!(s.wire_verts(wire).unwrap(), verts[1..].to_vec());
        assert_eq!(s.face_tris(face).unwrap().len(), 1);
        assert!(m.check().is_empty(), "{:?}", m.check());

        // a triangle cannot lose a vertex: the pgon goes
        m.del_vert(verts[2]).unwrap();
        assert!(m.store().is_deleted(EntKind::Pgon, pg));
        assert_eq!(live(&m, EntKind::Tri), 0);
    }

    #[test]
    fn del_vert_of_triangular_hole_drops_hole() {
        let mut m: Model = Model::new();
        let posis = square(&mut m);
        let hole: Vec<usize> = [[0.5, 0.5, 0.0], [1.5, 0.5, 0.0], [1.0, 1.5, 0.0]]
            .into_iter()
            .map(|xyz| m.add_posi_at(xyz))
            .collect();
        let pg = m.add_pgon(&posis, &[hole]).unwrap();
        let face = m.store().pgon_face(pg).unwrap();
        let hw = m.get_face_holes(face).unwrap()[0];
        let hv = m.store().wire_verts(hw).unwrap()[1];
        assert_eq!(m.store().face_tris(face).unwrap().len(), 4 + 3 + 2 - 2);
        m.del_vert(hv).unwrap();
        assert!(m.get_face_holes(face).unwrap().is_empty());
        assert!(m.store().is_deleted(EntKind::Wire, hw));
        assert_eq!(m.store().face_tris(face).unwrap().len(), 2);
        assert_eq!(live(&m, EntKind::Vert), 4);
        assert!(m.check().is_empty(), "{:?}", m.check());
    }

    #[test]
    fn del_point_vert() {
        let mut m: Model = Model::new();
        let p = m.add_posi_at([0.0; 3]);
        let pt = m.add_point(p).unwrap();
        let v = m.store().point_vert(pt).unwrap();
        m.del_vert(v).unwrap();
        assert!(m.store().is_deleted(EntKind::Point, pt));
        assert!(m.store().is_deleted(EntKind::Vert, v));
        assert!(m.store().exists(EntKind::Posi, p));
    }

    #[test]
    fn del_pgon_hole_requires_a_hole() {
        let mut m: Model = Model::new();
        let posis = square(&mut m);
        let pg = m.add_pgon(&posis, &[]).unwrap();
        let face = m.store().pgon_face(pg).unwrap();
        let boundary = m.get_face_boundary(face).unwrap();
        assert!(matches!(
            m.del_pgon_hole(pg, boundary),
            Err(KernelError::StructuralViolation(_))
        ));
    }
}
