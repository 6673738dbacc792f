//! Appending one store onto another.
//!
//! Every index of kind K coming from the other store is shifted by this
//! store's `count(K)` taken before the merge. Down and up tables of one kind
//! use the same offset, so the merged store is consistent whenever both
//! inputs are. Tombstones are appended as tombstones.

use crate::topology::arena::{Slot, Table};
use crate::topology::kind::EntKind;
use crate::topology::store::{CollDown, EntityStore, FaceDown, VertUp, WireOwner};

/// Per-kind index shift applied by [`EntityStore::merge`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Offsets([usize; 10]);

impl Offsets {
    /// Offsets equal to the current slot counts of `store`.
    pub fn of_store(store: &EntityStore) -> Self {
        let mut o = [0; 10];
        for kind in EntKind::ALL {
            o[kind as usize] = store.count(kind);
        }
        Offsets(o)
    }

    /// The shift for `kind`.
    #[inline]
    pub fn get(&self, kind: EntKind) -> usize {
        self.0[kind as usize]
    }

    /// Index `i` of the other store, as seen in the merged store.
    #[inline]
    pub fn shift(&self, kind: EntKind, i: usize) -> usize {
        i + self.get(kind)
    }

    fn shift_all(&self, kind: EntKind, v: &[usize]) -> Vec<usize> {
        v.iter().map(|&i| self.shift(kind, i)).collect()
    }

    fn shift_opt(&self, kind: EntKind, i: Option<usize>) -> Option<usize> {
        i.map(|i| self.shift(kind, i))
    }
}

fn append<T, U>(dst: &mut Table<U>, src: &Table<T>, f: impl Fn(&T) -> U) {
    for slot in src.slots() {
        dst.push_slot(Slot::from(slot.as_live().map(&f)));
    }
}

impl EntityStore {
    /// Appends every slot of `other` to this store and returns the offsets
    /// used, so callers can translate their own indices into `other`.
    pub fn merge(&mut self, other: &EntityStore) -> Offsets {
        let o = Offsets::of_store(self);
        use EntKind::*;

        append(&mut self.posis, &other.posis, |_| ());
        self.posi_verts
            .extend(other.posi_verts.iter().map(|vs| o.shift_all(Vert, vs)));

        append(&mut self.verts, &other.verts, |&p| o.shift(Posi, p));
        self.vert_up.extend(other.vert_up.iter().map(|up| match *up {
            VertUp::Free => VertUp::Free,
            VertUp::Point(p) => VertUp::Point(o.shift(Point, p)),
            VertUp::Edges { incoming, outgoing } => VertUp::Edges {
                incoming: o.shift_opt(Edge, incoming),
                outgoing: o.shift_opt(Edge, outgoing),
            },
        }));
        self.vert_tris
            .extend(other.vert_tris.iter().map(|ts| o.shift_all(Tri, ts)));

        append(&mut self.edges, &other.edges, |&[a, b]| {
            [o.shift(Vert, a), o.shift(Vert, b)]
        });
        self.edge_wire
            .extend(other.edge_wire.iter().map(|&w| o.shift_opt(Wire, w)));

        append(&mut self.wires, &other.wires, |es| o.shift_all(Edge, es));
        self.wire_owner
            .extend(other.wire_owner.iter().map(|owner| match *owner {
                Some(WireOwner::Face(f)) => Some(WireOwner::Face(o.shift(Face, f))),
                Some(WireOwner::Pline(p)) => Some(WireOwner::Pline(o.shift(Pline, p))),
                None => None,
            }));

        append(&mut self.tris, &other.tris, |vs| vs.map(|v| o.shift(Vert, v)));
        self.tri_face
            .extend(other.tri_face.iter().map(|&f| o.shift_opt(Face, f)));

        append(&mut self.faces, &other.faces, |fd| FaceDown {
            wires: o.shift_all(Wire, &fd.wires),
            tris: o.shift_all(Tri, &fd.tris),
        });
        self.face_pgon
            .extend(other.face_pgon.iter().map(|&p| o.shift_opt(Pgon, p)));

        append(&mut self.points, &other.points, |&v| o.shift(Vert, v));
        append(&mut self.plines, &other.plines, |&w| o.shift(Wire, w));
        append(&mut self.pgons, &other.pgons, |&f| o.shift(Face, f));
        for (dst, src) in [
            (&mut self.point_colls, &other.point_colls),
            (&mut self.pline_colls, &other.pline_colls),
            (&mut self.pgon_colls, &other.pgon_colls),
        ] {
            dst.extend(src.iter().map(|cs| o.shift_all(Coll, cs)));
        }

        append(&mut self.colls, &other.colls, |cd| CollDown {
            points: o.shift_all(Point, &cd.points),
            plines: o.shift_all(Pline, &cd.plines),
            pgons: o.shift_all(Pgon, &cd.pgons),
        });
        self.coll_parent
            .extend(other.coll_parent.iter().map(|&p| o.shift_opt(Coll, p)));

        log::debug!(
            "merged store: {} posis, {} faces appended",
            other.count(Posi),
            other.count(Face)
        );
        o
    }
}
