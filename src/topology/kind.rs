//! Entity kinds of the topology.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A kind-qualified entity index.
pub type Ent = (EntKind, usize);

/// The ten entity kinds of a model.
///
/// Indices are local to a kind: vertex 3 and edge 3 are unrelated.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntKind {
    /// Bare coordinate anchor.
    Posi,
    /// One use of a position inside a point or a path.
    Vert,
    /// Directed segment between two vertices.
    Edge,
    /// Ordered edge sequence, open or closed.
    Wire,
    /// Render/area triangle owned by a face.
    Tri,
    /// Polygon surface: boundary wire, hole wires and cached triangles.
    Face,
    /// 0-D object.
    Point,
    /// 1-D object.
    Pline,
    /// 2-D object.
    Pgon,
    /// Named hierarchical group of objects.
    Coll,
}

impl EntKind {
    /// All kinds, leaf first.
    pub const ALL: [EntKind; 10] = [
        EntKind::Posi,
        EntKind::Vert,
        EntKind::Edge,
        EntKind::Wire,
        EntKind::Tri,
        EntKind::Face,
        EntKind::Point,
        EntKind::Pline,
        EntKind::Pgon,
        EntKind::Coll,
    ];

    /// The object kinds a collection can hold.
    pub const OBJS: [EntKind; 3] = [EntKind::Point, EntKind::Pline, EntKind::Pgon];

    /// Short lowercase name, used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            EntKind::Posi => "posi",
            EntKind::Vert => "vert",
            EntKind::Edge => "edge",
            EntKind::Wire => "wire",
            EntKind::Tri => "tri",
            EntKind::Face => "face",
            EntKind::Point => "point",
            EntKind::Pline => "pline",
            EntKind::Pgon => "pgon",
            EntKind::Coll => "coll",
        }
    }

    /// `true` for Point, Polyline and Polygon.
    pub fn is_obj(self) -> bool {
        matches!(self, EntKind::Point | EntKind::Pline | EntKind::Pgon)
    }

    /// The single kind directly below this one, if there is one.
    pub fn child_kind(self) -> Option<EntKind> {
        match self {
            EntKind::Vert => Some(EntKind::Posi),
            EntKind::Edge | EntKind::Tri | EntKind::Point => Some(EntKind::Vert),
            EntKind::Wire => Some(EntKind::Edge),
            EntKind::Face | EntKind::Pline => Some(EntKind::Wire),
            EntKind::Pgon => Some(EntKind::Face),
            EntKind::Posi | EntKind::Coll => None,
        }
    }

    /// The primary kind directly above this one.
    ///
    /// Vertices may also be owned by points and triangles, and wires by
    /// polylines; see the dedicated navigators for those.
    pub fn parent_kind(self) -> EntKind {
        match self {
            EntKind::Posi => EntKind::Vert,
            EntKind::Vert => EntKind::Edge,
            EntKind::Edge => EntKind::Wire,
            EntKind::Wire | EntKind::Tri => EntKind::Face,
            EntKind::Face => EntKind::Pgon,
            EntKind::Point | EntKind::Pline | EntKind::Pgon | EntKind::Coll => EntKind::Coll,
        }
    }

    /// Kinds reachable from `self` by following down-links only.
    pub fn below(self) -> &'static [EntKind] {
        use EntKind::*;
        match self {
            Posi => &[],
            Vert => &[Posi],
            Edge => &[Vert, Posi],
            Wire => &[Edge, Vert, Posi],
            Tri => &[Vert, Posi],
            Face => &[Wire, Edge, Vert, Posi, Tri],
            Point => &[Vert, Posi],
            Pline => &[Wire, Edge, Vert, Posi],
            Pgon => &[Face, Wire, Edge, Vert, Posi, Tri],
            Coll => &[Point, Pline, Pgon, Face, Wire, Edge, Vert, Posi, Tri],
        }
    }

    /// `true` if `other` can be reached from `self` by down-links.
    pub fn is_above(self, other: EntKind) -> bool {
        self.below().contains(&other)
    }
}

impl fmt::Display for EntKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_and_above_are_mirrors() {
        for a in EntKind::ALL {
            for b in EntKind::ALL {
                if a.is_above(b) {
                    assert!(!b.is_above(a), "{a} and {b} both above each other");
                }
            }
        }
    }

    #[test]
    fn child_kind_is_reachable() {
        for k in EntKind::ALL {
            if let Some(c) = k.child_kind() {
                assert!(k.is_above(c));
            }
        }
        assert_eq!(EntKind::Coll.child_kind(), None);
    }

    #[test]
    fn parent_kind_is_above() {
        for k in EntKind::ALL {
            if k != EntKind::Coll {
                assert!(k.parent_kind().is_above(k), "{k}");
            }
        }
    }

    #[test]
    fn serde_roundtrip() {
        let s = serde_json::to_string(&EntKind::Pgon).unwrap();
        assert_eq!(s, "\"Pgon\"");
        let k: EntKind = serde_json::from_str(&s).unwrap();
        assert_eq!(k, EntKind::Pgon);
    }
}
