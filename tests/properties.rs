mod util;

use proptest::prelude::*;
use std::f64::consts::TAU;
use topo_kernel::prelude::*;
use util::posis;

#[derive(Clone, Debug)]
enum Op {
    Pgon { sides: usize, at: (i8, i8) },
    Pline { n: usize, closed: bool, at: (i8, i8) },
    Point { at: (i8, i8) },
    DelObj { kind: usize, pick: usize, prune: bool },
    DelVert { pick: usize },
    Reverse { pick: usize },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (3usize..7, any::<(i8, i8)>()).prop_map(|(sides, at)| Op::Pgon { sides, at }),
        2 => (2usize..6, any::<bool>(), any::<(i8, i8)>()).prop_map(|(n, closed, at)| Op::Pline {
            n: if closed { n.max(3) } else { n },
            closed,
            at
        }),
        1 => any::<(i8, i8)>().prop_map(|at| Op::Point { at }),
        2 => (0usize..3, any::<usize>(), any::<bool>())
            .prop_map(|(kind, pick, prune)| Op::DelObj { kind, pick, prune }),
        3 => any::<usize>().prop_map(|pick| Op::DelVert { pick }),
        1 => any::<usize>().prop_map(|pick| Op::Reverse { pick }),
    ]
}

/// Counter-clockwise regular polygon around a grid cell.
fn ring(n: usize, at: (i8, i8)) -> Vec<[f64; 3]> {
    let (cx, cy) = (f64::from(at.0) * 3.0, f64::from(at.1) * 3.0);
    (0..n)
        .map(|k| {
            let a = TAU * k as f64 / n as f64;
            [cx + a.cos(), cy + a.sin(), 0.0]
        })
        .collect()
}

fn pick(live: &[usize], i: usize) -> Option<usize> {
    (!live.is_empty()).then(|| live[i % live.len()])
}

fn apply(m: &mut Model, op: &Op) -> Result<(), KernelError> {
    match *op {
        Op::Pgon { sides, at } => {
            let ps = posis(m, &ring(sides, at));
            m.add_pgon(&ps, &[]).map(drop)
        }
        Op::Pline { n, closed, at } => {
            let ps = posis(m, &ring(n, at));
            m.add_pline(&ps, closed).map(drop)
        }
        Op::Point { at } => {
            let p = m.add_posi_at([f64::from(at.0), f64::from(at.1), 1.0]);
            m.add_point(p).map(drop)
        }
        Op::DelObj { kind, pick: i, prune } => {
            let kind = EntKind::OBJS[kind];
            let posis = if prune { DelPosis::Prune } else { DelPosis::Keep };
            match pick(&m.store().get_ents(kind), i) {
                Some(obj) => m.del_objs(kind, &[obj], posis),
                None => Ok(()),
            }
        }
        Op::DelVert { pick: i } => match pick(&m.store().get_ents(EntKind::Vert), i) {
            Some(v) => m.del_vert(v),
            None => Ok(()),
        },
        Op::Reverse { pick: i } => match pick(&m.store().get_ents(EntKind::Wire), i) {
            Some(w) => m.reverse_wire(w),
            None => Ok(()),
        },
    }
}

fn build(ops: &[Op]) -> Model {
    let mut m: Model = Model::new();
    for op in ops {
        apply(&mut m, op).unwrap();
    }
    m
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn edits_keep_store_consistent(ops in prop::collection::vec(op(), 1..40)) {
        let mut m: Model = Model::new();
        for op in &ops {
            prop_assert!(apply(&mut m, op).is_ok(), "{op:?} failed");
            let report = m.check();
            prop_assert!(report.is_empty(), "after {op:?}: {report:?}");
        }
        let s = m.store();
        for e in s.get_ents(EntKind::Edge) {
            let [a, b] = s.edge_verts(e).unwrap();
            prop_assert_eq!(s.vert_up(a).unwrap().outgoing(), Some(e));
            prop_assert_eq!(s.vert_up(b).unwrap().incoming(), Some(e));
        }
        // no holes here, so every face has boundary verts - 2 tris
        for f in s.get_ents(EntKind::Face) {
            let n = s.wire_verts(s.face_boundary(f).unwrap()).unwrap().len();
            prop_assert_eq!(s.face_tris(f).unwrap().len(), n - 2);
        }
    }

    #[test]
    fn second_remove_changes_nothing(
        ops in prop::collection::vec(op(), 1..20),
        kind in 0usize..10,
        i in any::<usize>(),
    ) {
        let m = build(&ops);
        let kind = EntKind::ALL[kind];
        let mut s = m.store().clone();
        let count = s.count(kind);
        prop_assume!(count > 0);
        let i = i % count;
        s.remove(kind, i, &mut NoAttribs).unwrap();
        let once = s.clone();
        prop_assert!(s.remove(kind, i, &mut NoAttribs).unwrap().is_empty());
        prop_assert_eq!(s, once);
    }

    #[test]
    fn data_roundtrip(ops in prop::collection::vec(op(), 1..20)) {
        let m = build(&ops);
        let json = serde_json::to_string(&m.store().get_data()).unwrap();
        let data: StoreData = serde_json::from_str(&json).unwrap();
        let back = EntityStore::from_data(data).unwrap();
        prop_assert_eq!(&back, m.store());
    }
}
