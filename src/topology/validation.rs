//! Consistency checking for an [`EntityStore`].
//!
//! [`check_store`] walks every table once and returns one human-readable
//! line per violation. It never fails and never mutates; callers decide
//! whether an empty report is required.

use crate::debug_invariants::DebugInvariants;
use crate::kernel_error::KernelError;
use crate::topology::kind::EntKind;
use crate::topology::store::{EntityStore, VertUp, WireOwner};
use hashbrown::HashSet;
use itertools::Itertools;

/// Optional toggles for [`check_store_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckOptions {
    /// Every down-link is mirrored by an up-link and vice versa.
    pub check_mirrors: bool,
    /// Links point at live slots only; dead slots keep no links. Links
    /// past the end of a table are reported regardless.
    pub check_dangling: bool,
    /// Consecutive wire edges share a vertex and closedness agrees with the
    /// edge loop.
    pub check_wires: bool,
    /// Faces have a boundary and all their wires are closed.
    pub check_faces: bool,
    /// The collection parent links form a forest.
    pub check_colls: bool,
}

impl CheckOptions {
    /// Enable all checks.
    pub fn all() -> Self {
        Self {
            check_mirrors: true,
            check_dangling: true,
            check_wires: true,
            check_faces: true,
            check_colls: true,
        }
    }
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self::all()
    }
}

/// Runs every check. See [`check_store_with`].
pub fn check_store(store: &EntityStore) -> Vec<String> {
    check_store_with(store, CheckOptions::all())
}

/// Runs the checks selected by `options` and returns the violations found.
pub fn check_store_with(store: &EntityStore, options: CheckOptions) -> Vec<String> {
    let mut c = Checker {
        s: store,
        opts: options,
        out: Vec::new(),
    };
    if !c.table_lengths() {
        // per-kind walks index the up vectors by slot
        return c.out;
    }
    c.posis();
    c.verts();
    c.edges();
    c.wires();
    c.tris();
    c.faces();
    c.objs();
    c.colls();
    c.out
}

struct Checker<'a> {
    s: &'a EntityStore,
    opts: CheckOptions,
    out: Vec<String>,
}

impl Checker<'_> {
    fn report(&mut self, msg: String) {
        self.out.push(msg);
    }

    fn live(&self, kind: EntKind, i: usize) -> bool {
        self.s.exists(kind, i)
    }

    /// Reports `owner -> kind i` if `i` is not live. Slots that were never
    /// allocated are always reported; deleted ones only with
    /// `check_dangling`.
    fn dangling(&mut self, owner: EntKind, o: usize, kind: EntKind, i: usize) -> bool {
        if self.live(kind, i) {
            return false;
        }
        if i >= self.s.count(kind) {
            self.report(format!("{owner} {o} links to out-of-range {kind} {i}"));
        } else if self.opts.check_dangling {
            self.report(format!("{owner} {o} links to missing {kind} {i}"));
        }
        true
    }

    fn mirror(&mut self, ok: bool, msg: impl FnOnce() -> String) {
        if !ok && self.opts.check_mirrors {
            self.out.push(msg());
        }
    }

    fn table_lengths(&mut self) -> bool {
        let s = self.s;
        let pairs = [
            (EntKind::Posi, s.posi_verts.len()),
            (EntKind::Vert, s.vert_up.len()),
            (EntKind::Vert, s.vert_tris.len()),
            (EntKind::Edge, s.edge_wire.len()),
            (EntKind::Wire, s.wire_owner.len()),
            (EntKind::Tri, s.tri_face.len()),
            (EntKind::Face, s.face_pgon.len()),
            (EntKind::Point, s.point_colls.len()),
            (EntKind::Pline, s.pline_colls.len()),
            (EntKind::Pgon, s.pgon_colls.len()),
            (EntKind::Coll, s.coll_parent.len()),
        ];
        let before = self.out.len();
        for (kind, up) in pairs {
            let down = s.count(kind);
            if down != up {
                self.report(format!(
                    "{kind} table has {down} down slots but {up} up slots"
                ));
            }
        }
        self.out.len() == before
    }

    fn posis(&mut self) {
        let s = self.s;
        for p in 0..s.count(EntKind::Posi) {
            let verts = &s.posi_verts[p];
            if !self.live(EntKind::Posi, p) {
                if !verts.is_empty() && self.opts.check_dangling {
                    self.report(format!("deleted posi {p} still lists verts {verts:?}"));
                }
                continue;
            }
            for &v in verts {
                if self.dangling(EntKind::Posi, p, EntKind::Vert, v) {
                    continue;
                }
                self.mirror(s.vert_posi(v) == Some(p), || {
                    format!("posi {p} lists vert {v}, but vert {v} is on posi {:?}", s.vert_posi(v))
                });
            }
        }
    }

    fn verts(&mut self) {
        let s = self.s;
        for v in 0..s.count(EntKind::Vert) {
            let up = s.vert_up[v];
            let tris = &s.vert_tris[v];
            let Some(posi) = s.vert_posi(v) else {
                if (up != VertUp::Free || !tris.is_empty()) && self.opts.check_dangling {
                    self.report(format!("deleted vert {v} still has up-links"));
                }
                continue;
            };
            if !self.dangling(EntKind::Vert, v, EntKind::Posi, posi) {
                self.mirror(s.posi_verts[posi].contains(&v), || {
                    format!("vert {v} is on posi {posi}, but posi {posi} does not list it")
                });
            }
            match up {
                VertUp::Free => {}
                VertUp::Point(pt) => {
                    if !self.dangling(EntKind::Vert, v, EntKind::Point, pt) {
                        self.mirror(s.point_vert(pt) == Some(v), || {
                            format!("vert {v} claims point {pt}, which is on vert {:?}", s.point_vert(pt))
                        });
                    }
                }
                VertUp::Edges { incoming, outgoing } => {
                    if let Some(e) = incoming {
                        if !self.dangling(EntKind::Vert, v, EntKind::Edge, e) {
                            self.mirror(s.edge_verts(e).map(|[_, b]| b) == Some(v), || {
                                format!("vert {v} has incoming edge {e}, which does not end there")
                            });
                        }
                    }
                    if let Some(e) = outgoing {
                        if !self.dangling(EntKind::Vert, v, EntKind::Edge, e) {
                            self.mirror(s.edge_verts(e).map(|[a, _]| a) == Some(v), || {
                                format!("vert {v} has outgoing edge {e}, which does not start there")
                            });
                        }
                    }
                }
            }
            for &t in tris {
                if !self.dangling(EntKind::Vert, v, EntKind::Tri, t) {
                    self.mirror(s.tri_verts(t).is_some_and(|tv| tv.contains(&v)), || {
                        format!("vert {v} lists tri {t}, which does not use it")
                    });
                }
            }
        }
    }

    fn edges(&mut self) {
        let s = self.s;
        for e in 0..s.count(EntKind::Edge) {
            let Some([a, b]) = s.edge_verts(e) else {
                if s.edge_wire[e].is_some() && self.opts.check_dangling {
                    self.report(format!("deleted edge {e} still has a wire"));
                }
                continue;
            };
            if a == b {
                self.report(format!("edge {e} starts and ends at vert {a}"));
            }
            if !self.dangling(EntKind::Edge, e, EntKind::Vert, a) {
                self.mirror(s.vert_up[a].outgoing() == Some(e), || {
                    format!("edge {e} starts at vert {a}, but its outgoing slot is {:?}", s.vert_up[a].outgoing())
                });
            }
            if !self.dangling(EntKind::Edge, e, EntKind::Vert, b) {
                self.mirror(s.vert_up[b].incoming() == Some(e), || {
                    format!("edge {e} ends at vert {b}, but its incoming slot is {:?}", s.vert_up[b].incoming())
                });
            }
            if let Some(w) = s.edge_wire[e] {
                if !self.dangling(EntKind::Edge, e, EntKind::Wire, w) {
                    self.mirror(s.wires.get(w).is_some_and(|es| es.contains(&e)), || {
                        format!("edge {e} claims wire {w}, which does not list it")
                    });
                }
            }
        }
    }

    fn wires(&mut self) {
        let s = self.s;
        for w in 0..s.count(EntKind::Wire) {
            let Some(edges) = s.wires.get(w) else {
                if s.wire_owner[w].is_some() && self.opts.check_dangling {
                    self.report(format!("deleted wire {w} still has an owner"));
                }
                continue;
            };
            let mut all_live = true;
            for &e in edges {
                if self.dangling(EntKind::Wire, w, EntKind::Edge, e) {
                    all_live = false;
                    continue;
                }
                self.mirror(s.edge_wire[e] == Some(w), || {
                    format!("wire {w} lists edge {e}, which belongs to wire {:?}", s.edge_wire[e])
                });
            }
            if all_live && self.opts.check_wires {
                self.wire_shape(w, edges);
            }
            match s.wire_owner[w] {
                None => {}
                Some(WireOwner::Face(f)) => {
                    if !self.dangling(EntKind::Wire, w, EntKind::Face, f) {
                        self.mirror(s.faces.get(f).is_some_and(|fd| fd.wires.contains(&w)), || {
                            format!("wire {w} claims face {f}, which does not list it")
                        });
                    }
                }
                Some(WireOwner::Pline(pl)) => {
                    if !self.dangling(EntKind::Wire, w, EntKind::Pline, pl) {
                        self.mirror(s.pline_wire(pl) == Some(w), || {
                            format!("wire {w} claims pline {pl}, which is on wire {:?}", s.pline_wire(pl))
                        });
                    }
                }
            }
        }
    }

    fn wire_shape(&mut self, w: usize, edges: &[usize]) {
        let s = self.s;
        if edges.is_empty() {
            self.report(format!("wire {w} has no edges"));
            return;
        }
        let ends: Vec<[usize; 2]> = edges.iter().filter_map(|&e| s.edge_verts(e)).collect();
        for (i, pair) in ends.windows(2).enumerate() {
            if pair[0][1] != pair[1][0] {
                self.report(format!(
                    "wire {w}: edges {} and {} are not connected",
                    edges[i],
                    edges[i + 1]
                ));
            }
        }
        let first_start = ends[0][0];
        let last_end = ends[ends.len() - 1][1];
        let loops = first_start == last_end;
        let closing = s.vert_up.get(first_start).and_then(|u| u.incoming());
        let closed = closing.is_some();
        if loops != closed {
            self.report(format!(
                "wire {w} is {} but its edges {} back to the start",
                if closed { "closed" } else { "open" },
                if loops { "loop" } else { "do not loop" }
            ));
        } else if closed && closing != edges.last().copied() {
            self.report(format!(
                "wire {w} is closed by edge {closing:?}, which is not its last edge"
            ));
        }
    }

    fn tris(&mut self) {
        let s = self.s;
        for t in 0..s.count(EntKind::Tri) {
            let Some(verts) = s.tri_verts(t) else {
                if s.tri_face[t].is_some() && self.opts.check_dangling {
                    self.report(format!("deleted tri {t} still has a face"));
                }
                continue;
            };
            for v in verts {
                if !self.dangling(EntKind::Tri, t, EntKind::Vert, v) {
                    self.mirror(s.vert_tris[v].contains(&t), || {
                        format!("tri {t} uses vert {v}, which does not list it")
                    });
                }
            }
            if let Some(f) = s.tri_face[t] {
                if !self.dangling(EntKind::Tri, t, EntKind::Face, f) {
                    self.mirror(s.faces.get(f).is_some_and(|fd| fd.tris.contains(&t)), || {
                        format!("tri {t} claims face {f}, which does not list it")
                    });
                }
            }
        }
    }

    fn faces(&mut self) {
        let s = self.s;
        for f in 0..s.count(EntKind::Face) {
            let Some(down) = s.faces.get(f) else {
                if s.face_pgon[f].is_some() && self.opts.check_dangling {
                    self.report(format!("deleted face {f} still has a pgon"));
                }
                continue;
            };
            if down.wires.is_empty() && self.opts.check_faces {
                self.report(format!("face {f} has no boundary wire"));
            }
            if self.opts.check_faces {
                for w in down.wires.iter().duplicates() {
                    self.report(format!("face {f} lists wire {w} more than once"));
                }
            }
            for (i, &w) in down.wires.iter().enumerate() {
                if self.dangling(EntKind::Face, f, EntKind::Wire, w) {
                    continue;
                }
                self.mirror(s.wire_owner[w] == Some(WireOwner::Face(f)), || {
                    format!("face {f} lists wire {w}, which is owned by {:?}", s.wire_owner[w])
                });
                if self.opts.check_faces && s.wire_is_closed(w) != Some(true) {
                    let role = if i == 0 { "boundary" } else { "hole" };
                    self.report(format!("face {f}: {role} wire {w} is open"));
                }
            }
            for &t in &down.tris {
                if !self.dangling(EntKind::Face, f, EntKind::Tri, t) {
                    self.mirror(s.tri_face[t] == Some(f), || {
                        format!("face {f} lists tri {t}, which belongs to face {:?}", s.tri_face[t])
                    });
                }
            }
            if let Some(pg) = s.face_pgon[f] {
                if !self.dangling(EntKind::Face, f, EntKind::Pgon, pg) {
                    self.mirror(s.pgon_face(pg) == Some(f), || {
                        format!("face {f} claims pgon {pg}, which is on face {:?}", s.pgon_face(pg))
                    });
                }
            }
        }
    }

    fn objs(&mut self) {
        let s = self.s;
        for pt in 0..s.count(EntKind::Point) {
            if let Some(v) = s.point_vert(pt) {
                if !self.dangling(EntKind::Point, pt, EntKind::Vert, v) {
                    match s.vert_up[v] {
                        VertUp::Point(p) if p == pt => {}
                        VertUp::Edges { .. } => self.report(format!(
                            "vert {v} of point {pt} is also used by edges"
                        )),
                        other => self.mirror(false, || {
                            format!("point {pt} is on vert {v}, whose up-link is {other:?}")
                        }),
                    }
                }
            }
        }
        for pl in 0..s.count(EntKind::Pline) {
            if let Some(w) = s.pline_wire(pl) {
                if !self.dangling(EntKind::Pline, pl, EntKind::Wire, w) {
                    self.mirror(s.wire_owner[w] == Some(WireOwner::Pline(pl)), || {
                        format!("pline {pl} is on wire {w}, which is owned by {:?}", s.wire_owner[w])
                    });
                }
            }
        }
        for pg in 0..s.count(EntKind::Pgon) {
            if let Some(f) = s.pgon_face(pg) {
                if !self.dangling(EntKind::Pgon, pg, EntKind::Face, f) {
                    self.mirror(s.face_pgon[f] == Some(pg), || {
                        format!("pgon {pg} is on face {f}, which belongs to pgon {:?}", s.face_pgon[f])
                    });
                }
            }
        }
        for kind in EntKind::OBJS {
            let Some(table) = s.obj_colls_table(kind) else {
                continue;
            };
            for (obj, colls) in table.iter().enumerate() {
                if !self.live(kind, obj) {
                    if !colls.is_empty() && self.opts.check_dangling {
                        self.report(format!("deleted {kind} {obj} is still in colls {colls:?}"));
                    }
                    continue;
                }
                for &c in colls {
                    if !self.dangling(kind, obj, EntKind::Coll, c) {
                        self.mirror(s.colls.get(c).is_some_and(|cd| cd.objs(kind).contains(&obj)), || {
                            format!("{kind} {obj} claims coll {c}, which does not list it")
                        });
                    }
                }
            }
        }
    }

    fn colls(&mut self) {
        let s = self.s;
        for c in 0..s.count(EntKind::Coll) {
            let Some(down) = s.colls.get(c) else {
                if s.coll_parent[c].is_some() && self.opts.check_dangling {
                    self.report(format!("deleted coll {c} still has a parent"));
                }
                continue;
            };
            for kind in EntKind::OBJS {
                for &obj in down.objs(kind) {
                    if !self.dangling(EntKind::Coll, c, kind, obj) {
                        let mirrored = s
                            .obj_colls_table(kind)
                            .and_then(|t| t.get(obj))
                            .is_some_and(|cs| cs.contains(&c));
                        self.mirror(mirrored, || {
                            format!("coll {c} lists {kind} {obj}, which does not list it back")
                        });
                    }
                }
            }
            if let Some(p) = s.coll_parent[c] {
                self.dangling(EntKind::Coll, c, EntKind::Coll, p);
            }
            if self.opts.check_colls {
                let mut seen = HashSet::new();
                seen.insert(c);
                let mut cur = s.coll_parent[c];
                while let Some(p) = cur {
                    if !seen.insert(p) {
                        if p == c {
                            self.report(format!("coll {c} is its own ancestor"));
                        }
                        break;
                    }
                    cur = s.coll_parent.get(p).copied().flatten();
                }
            }
        }
    }
}

impl DebugInvariants for EntityStore {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "EntityStore invalid");
    }

    fn validate_invariants(&self) -> Result<(), KernelError> {
        match check_store(self).into_iter().next() {
            Some(first) => Err(KernelError::StructuralViolation(first)),
            None => Ok(()),
        }
    }
}
