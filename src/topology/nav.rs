//! Read-only navigation over the entity store.
//!
//! Two single-step families ([`EntityStore::children_of`],
//! [`EntityStore::parent_of`]) and the general dispatcher
//! [`EntityStore::nav_any_to_any`], which descends or ascends level by level
//! until it reaches the requested kind.
//!
//! Results are de-duplicated and keep first-occurrence order, which is
//! deterministic for a fixed store state.

use crate::kernel_error::KernelError;
use crate::topology::kind::EntKind;
use crate::topology::store::{EntityStore, VertUp, WireOwner};
use itertools::Itertools;

impl EntityStore {
    /// Indices of the next kind down ([`EntKind::child_kind`]).
    ///
    /// Positions have nothing below them and collections hold several kinds,
    /// so both are `BadNavigation` (reported with `to == from`).
    pub fn children_of(&self, kind: EntKind, index: usize) -> Result<Vec<usize>, KernelError> {
        self.require(kind, index)?;
        let out = match kind {
            EntKind::Vert => self.verts.get(index).map(|&p| vec![p]),
            EntKind::Edge => self.edges.get(index).map(|e| e.to_vec()),
            EntKind::Wire => self.wires.get(index).cloned(),
            EntKind::Tri => self.tris.get(index).map(|t| t.to_vec()),
            EntKind::Face => self.faces.get(index).map(|f| f.wires.clone()),
            EntKind::Point => self.points.get(index).map(|&v| vec![v]),
            EntKind::Pline => self.plines.get(index).map(|&w| vec![w]),
            EntKind::Pgon => self.pgons.get(index).map(|&f| vec![f]),
            EntKind::Posi | EntKind::Coll => {
                return Err(KernelError::BadNavigation {
                    from: kind,
                    to: kind,
                    index,
                });
            }
        };
        Ok(out.unwrap_or_default())
    }

    /// Indices of the next kind up ([`EntKind::parent_kind`]).
    ///
    /// A vertex reports its edges (not a point or triangles) and a wire
    /// reports its face (not a polyline); see [`EntityStore::vert_point`],
    /// [`EntityStore::vert_tris`] and [`EntityStore::wire_pline`].
    pub fn parent_of(&self, kind: EntKind, index: usize) -> Result<Vec<usize>, KernelError> {
        self.require(kind, index)?;
        let out = match kind {
            EntKind::Posi => self.posi_verts[index].clone(),
            EntKind::Vert => self.vert_up[index].edges(),
            EntKind::Edge => self.edge_wire[index].into_iter().collect(),
            EntKind::Wire => self.wire_face(index).into_iter().collect(),
            EntKind::Tri => self.tri_face[index].into_iter().collect(),
            EntKind::Face => self.face_pgon[index].into_iter().collect(),
            EntKind::Point | EntKind::Pline | EntKind::Pgon => {
                self.obj_colls(kind, index).unwrap_or_default()
            }
            EntKind::Coll => self.coll_parent[index].into_iter().collect(),
        };
        Ok(out)
    }

    /// The point owning `vert`, if any.
    pub fn vert_point(&self, vert: usize) -> Option<usize> {
        match self.vert_up(vert)? {
            VertUp::Point(p) => Some(p),
            _ => None,
        }
    }

    /// The face owning `wire`, if any.
    pub fn wire_face(&self, wire: usize) -> Option<usize> {
        match self.wire_owner(wire)? {
            WireOwner::Face(f) => Some(f),
            WireOwner::Pline(_) => None,
        }
    }

    /// The polyline owning `wire`, if any.
    pub fn wire_pline(&self, wire: usize) -> Option<usize> {
        match self.wire_owner(wire)? {
            WireOwner::Pline(p) => Some(p),
            WireOwner::Face(_) => None,
        }
    }

    /// Navigates from `(from, index)` to every related entity of kind `to`.
    ///
    /// - same kind: `[index]`
    /// - `to` below `from`: descend (collections include their
    ///   descendants' objects)
    /// - `to` above `from`: ascend (objects include every ancestor of the
    ///   collections that own them)
    /// - different dimensional branches (e.g. point to face): empty
    /// - triangle to or from the edge/wire branch: `BadNavigation`
    pub fn nav_any_to_any(&self, from: EntKind, to: EntKind, index: usize) -> Result<Vec<usize>, KernelError> {
        self.require(from, index)?;
        if from == to {
            return Ok(vec![index]);
        }
        let found = if from.is_above(to) {
            self.nav_down(from, to, vec![index])
        } else if to.is_above(from) {
            self.nav_up(from, to, vec![index])
        } else if crosses_tri_branch(from, to) {
            return Err(KernelError::BadNavigation { from, to, index });
        } else {
            Vec::new()
        };
        Ok(found.into_iter().unique().collect())
    }

    /// Positions under `(kind, index)`; for a position, itself.
    pub fn nav_any_to_posi(&self, kind: EntKind, index: usize) -> Result<Vec<usize>, KernelError> {
        self.nav_any_to_any(kind, EntKind::Posi, index)
    }

    /// Vertices related to `(kind, index)`.
    pub fn nav_any_to_vert(&self, kind: EntKind, index: usize) -> Result<Vec<usize>, KernelError> {
        self.nav_any_to_any(kind, EntKind::Vert, index)
    }

    fn nav_down(&self, from: EntKind, to: EntKind, idxs: Vec<usize>) -> Vec<usize> {
        if from == to {
            return idxs;
        }
        match from {
            EntKind::Coll => {
                let colls: Vec<usize> = idxs
                    .iter()
                    .flat_map(|&c| self.coll_and_descendants(c))
                    .unique()
                    .collect();
                let mut out = Vec::new();
                for kind in EntKind::OBJS {
                    if kind != to && !kind.is_above(to) {
                        continue;
                    }
                    let objs: Vec<usize> = colls
                        .iter()
                        .filter_map(|&c| self.colls.get(c))
                        .flat_map(|d| d.objs(kind).iter().copied())
                        .unique()
                        .collect();
                    out.extend(self.nav_down(kind, to, objs));
                }
                out
            }
            EntKind::Pgon => {
                let faces = idxs.iter().filter_map(|&i| self.pgons.get(i).copied()).collect();
                self.nav_down(EntKind::Face, to, faces)
            }
            EntKind::Face if to == EntKind::Tri => idxs
                .iter()
                .filter_map(|&i| self.faces.get(i))
                .flat_map(|f| f.tris.iter().copied())
                .collect(),
            EntKind::Face => {
                let wires = idxs
                    .iter()
                    .filter_map(|&i| self.faces.get(i))
                    .flat_map(|f| f.wires.iter().copied())
                    .collect();
                self.nav_down(EntKind::Wire, to, wires)
            }
            EntKind::Pline => {
                let wires = idxs.iter().filter_map(|&i| self.plines.get(i).copied()).collect();
                self.nav_down(EntKind::Wire, to, wires)
            }
            EntKind::Point => {
                let verts = idxs.iter().filter_map(|&i| self.points.get(i).copied()).collect();
                self.nav_down(EntKind::Vert, to, verts)
            }
            EntKind::Wire => {
                let edges = idxs
                    .iter()
                    .filter_map(|&i| self.wires.get(i))
                    .flat_map(|w| w.iter().copied())
                    .collect();
                self.nav_down(EntKind::Edge, to, edges)
            }
            EntKind::Edge => {
                let verts = idxs
                    .iter()
                    .filter_map(|&i| self.edges.get(i))
                    .flat_map(|e| e.iter().copied())
                    .collect();
                self.nav_down(EntKind::Vert, to, verts)
            }
            EntKind::Tri => {
                let verts = idxs
                    .iter()
                    .filter_map(|&i| self.tris.get(i))
                    .flat_map(|t| t.iter().copied())
                    .collect();
                self.nav_down(EntKind::Vert, to, verts)
            }
            EntKind::Vert => idxs.iter().filter_map(|&i| self.verts.get(i).copied()).collect(),
            EntKind::Posi => Vec::new(),
        }
    }

    fn nav_up(&self, from: EntKind, to: EntKind, idxs: Vec<usize>) -> Vec<usize> {
        if from == to {
            return idxs;
        }
        // follow a branch only if it can still reach `to`
        let toward = |k: EntKind| k == to || to.is_above(k);
        match from {
            EntKind::Posi => {
                let verts = idxs
                    .iter()
                    .filter(|&&p| self.posis.is_live(p))
                    .flat_map(|&p| self.posi_verts[p].iter().copied())
                    .collect();
                self.nav_up(EntKind::Vert, to, verts)
            }
            EntKind::Vert => {
                let live: Vec<usize> = idxs.into_iter().filter(|&v| self.verts.is_live(v)).collect();
                let mut out = Vec::new();
                if toward(EntKind::Point) {
                    let points = live
                        .iter()
                        .filter_map(|&v| match self.vert_up[v] {
                            VertUp::Point(p) => Some(p),
                            _ => None,
                        })
                        .collect();
                    out.extend(self.nav_up(EntKind::Point, to, points));
                }
                if toward(EntKind::Edge) {
                    let edges = live.iter().flat_map(|&v| self.vert_up[v].edges()).collect();
                    out.extend(self.nav_up(EntKind::Edge, to, edges));
                }
                if to == EntKind::Tri {
                    out.extend(live.iter().flat_map(|&v| self.vert_tris[v].iter().copied()));
                }
                out
            }
            EntKind::Edge => {
                let wires = idxs
                    .iter()
                    .filter(|&&e| self.edges.is_live(e))
                    .filter_map(|&e| self.edge_wire[e])
                    .collect();
                self.nav_up(EntKind::Wire, to, wires)
            }
            EntKind::Wire => {
                let mut faces = Vec::new();
                let mut plines = Vec::new();
                for &w in &idxs {
                    match self.wire_owner(w) {
                        Some(WireOwner::Face(f)) => faces.push(f),
                        Some(WireOwner::Pline(p)) => plines.push(p),
                        None => {}
                    }
                }
                let mut out = Vec::new();
                if toward(EntKind::Face) {
                    out.extend(self.nav_up(EntKind::Face, to, faces));
                }
                if toward(EntKind::Pline) {
                    out.extend(self.nav_up(EntKind::Pline, to, plines));
                }
                out
            }
            EntKind::Tri => {
                let faces = idxs.iter().filter_map(|&t| self.tri_face(t)).collect();
                self.nav_up(EntKind::Face, to, faces)
            }
            EntKind::Face => {
                let pgons = idxs.iter().filter_map(|&f| self.face_pgon(f)).collect();
                self.nav_up(EntKind::Pgon, to, pgons)
            }
            EntKind::Point | EntKind::Pline | EntKind::Pgon => {
                let mut out = Vec::new();
                for &obj in &idxs {
                    for c in self.obj_colls(from, obj).unwrap_or_default() {
                        out.push(c);
                        out.extend(self.coll_ancestors(c));
                    }
                }
                out
            }
            EntKind::Coll => Vec::new(),
        }
    }
}

/// Triangles are a render cache hanging off faces; they have no route into
/// the edge/wire branch.
fn crosses_tri_branch(from: EntKind, to: EntKind) -> bool {
    use EntKind::*;
    match (from, to) {
        (Tri, Edge | Wire | Point | Pline) => true,
        (Edge | Wire, Tri) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Square pgon (4 verts) plus a 3-vert pline sharing posi 0, plus a point
    /// on posi 1. Returns (store, pgon, pline, point).
    fn fixture() -> (EntityStore, usize, usize, usize) {
        let mut s = EntityStore::new();
        let posis: Vec<usize> = (0..4).map(|_| s.add_posi()).collect();
        let pg_verts: Vec<usize> = posis.iter().map(|&p| s.add_vert(p).unwrap()).collect();
        let edges = s.add_edge_chain(&pg_verts, true).unwrap();
        let w = s.add_wire(&edges).unwrap();
        let f = s.add_face(&[w]).unwrap();
        let t0 = s.add_tri([pg_verts[0], pg_verts[1], pg_verts[2]]).unwrap();
        let t1 = s.add_tri([pg_verts[0], pg_verts[2], pg_verts[3]]).unwrap();
        s.replace_face_tris(f, &[t0, t1]).unwrap();
        let pgon = s.add_pgon_ent(f).unwrap();

        let pl_verts: Vec<usize> = [posis[0], posis[2], posis[3]]
            .iter()
            .map(|&p| s.add_vert(p).unwrap())
            .collect();
        let pl_edges = s.add_edge_chain(&pl_verts, false).unwrap();
        let pl_wire = s.add_wire(&pl_edges).unwrap();
        let pline = s.add_pline_ent(pl_wire).unwrap();

        let pv = s.add_vert(posis[1]).unwrap();
        let point = s.add_point_ent(pv).unwrap();
        (s, pgon, pline, point)
    }

    fn sorted(mut v: Vec<usize>) -> Vec<usize> {
        v.sort_unstable();
        v
    }

    #[test]
    fn down_to_posis() {
        let (s, pgon, pline, point) = fixture();
        assert_eq!(s.nav_any_to_posi(EntKind::Pgon, pgon).unwrap(), vec![0, 1, 2, 3]);
        assert_eq!(s.nav_any_to_posi(EntKind::Pline, pline).unwrap(), vec![0, 2, 3]);
        assert_eq!(s.nav_any_to_posi(EntKind::Point, point).unwrap(), vec![1]);
        assert_eq!(s.nav_any_to_any(EntKind::Pgon, EntKind::Tri, pgon).unwrap(), vec![0, 1]);
    }

    #[test]
    fn up_from_shared_posi_dedups() {
        let (s, pgon, pline, _) = fixture();
        assert_eq!(s.nav_any_to_any(EntKind::Posi, EntKind::Face, 0).unwrap(), vec![0]);
        assert_eq!(s.nav_any_to_any(EntKind::Posi, EntKind::Pgon, 0).unwrap(), vec![pgon]);
        assert_eq!(s.nav_any_to_any(EntKind::Posi, EntKind::Pline, 0).unwrap(), vec![pline]);
        assert_eq!(sorted(s.nav_any_to_any(EntKind::Posi, EntKind::Tri, 0).unwrap()), vec![0, 1]);
        // posi 0 is used by the pgon and the pline: two wires
        assert_eq!(sorted(s.nav_any_to_any(EntKind::Posi, EntKind::Wire, 0).unwrap()), vec![0, 1]);
        assert_eq!(s.nav_any_to_any(EntKind::Posi, EntKind::Point, 1).unwrap(), vec![0]);
    }

    #[test]
    fn cross_dimension_is_empty() {
        let (s, pgon, pline, point) = fixture();
        assert!(s.nav_any_to_any(EntKind::Point, EntKind::Face, point).unwrap().is_empty());
        assert!(s.nav_any_to_any(EntKind::Pline, EntKind::Tri, pline).unwrap().is_empty());
        assert!(s.nav_any_to_any(EntKind::Pgon, EntKind::Point, pgon).unwrap().is_empty());
    }

    #[test]
    fn tri_to_wire_is_bad_navigation() {
        let (s, ..) = fixture();
        assert_eq!(
            s.nav_any_to_any(EntKind::Tri, EntKind::Wire, 0),
            Err(KernelError::BadNavigation {
                from: EntKind::Tri,
                to: EntKind::Wire,
                index: 0
            })
        );
        assert!(matches!(
            s.children_of(EntKind::Posi, 0),
            Err(KernelError::BadNavigation { .. })
        ));
    }

    #[test]
    fn dead_start_is_not_found() {
        let (s, ..) = fixture();
        assert!(matches!(
            s.nav_any_to_any(EntKind::Pgon, EntKind::Posi, 9),
            Err(KernelError::NotFound { .. })
        ));
    }

    #[test]
    fn single_steps() {
        let (s, pgon, pline, _) = fixture();
        assert_eq!(s.children_of(EntKind::Pgon, pgon).unwrap(), vec![0]);
        assert_eq!(s.children_of(EntKind::Wire, 0).unwrap(), vec![0, 1, 2, 3]);
        assert_eq!(s.parent_of(EntKind::Edge, 0).unwrap(), vec![0]);
        assert_eq!(s.parent_of(EntKind::Vert, 0).unwrap(), vec![3, 0]);
        assert_eq!(s.wire_pline(1), Some(pline));
        assert_eq!(s.wire_face(1), None);
        assert_eq!(s.vert_point(7), Some(0));
    }

    #[test]
    fn colls_include_descendants_and_ancestors() {
        let (mut s, pgon, _, point) = fixture();
        let root = s.add_coll();
        let child = s.add_coll();
        s.coll_set_parent(child, Some(root)).unwrap();
        s.coll_add_obj(child, EntKind::Pgon, pgon).unwrap();
        s.coll_add_obj(root, EntKind::Point, point).unwrap();
        assert_eq!(s.nav_any_to_any(EntKind::Coll, EntKind::Pgon, root).unwrap(), vec![pgon]);
        assert_eq!(s.nav_any_to_posi(EntKind::Coll, root).unwrap(), vec![1, 0, 2, 3]);
        assert_eq!(s.nav_any_to_any(EntKind::Pgon, EntKind::Coll, pgon).unwrap(), vec![child, root]);
        assert_eq!(s.nav_any_to_any(EntKind::Posi, EntKind::Coll, 1).unwrap(), vec![root, child]);
    }
}
