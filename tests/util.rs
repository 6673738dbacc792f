#![allow(dead_code)]
use topo_kernel::prelude::*;

pub const SQUARE: [[f64; 3]; 4] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [1.0, 1.0, 0.0],
    [0.0, 1.0, 0.0],
];

/// Adds one position per coordinate.
pub fn posis(m: &mut Model, xyz: &[[f64; 3]]) -> Vec<usize> {
    xyz.iter().map(|&p| m.add_posi_at(p)).collect()
}

/// Model holding the unit square polygon. Returns the model and the pgon.
pub fn square_model() -> (Model, Vec<usize>, usize) {
    let mut m: Model = Model::new();
    let ps = posis(&mut m, &SQUARE);
    let pg = m.add_pgon(&ps, &[]).unwrap();
    (m, ps, pg)
}

/// Assert vec is a permutation of another vec (order-agnostic).
pub fn assert_permutation<T: Ord + Copy + std::fmt::Debug>(got: &[T], want: &[T]) {
    let mut a = got.to_vec();
    a.sort_unstable();
    let mut b = want.to_vec();
    b.sort_unstable();
    assert_eq!(a, b, "not a permutation\n got={:?}\nwant={:?}", got, want);
}

/// Assert the model passes every consistency check.
pub fn assert_clean(m: &Model) {
    let report = m.check();
    assert!(report.is_empty(), "consistency violations:\n{}", report.join("\n"));
}
