#![cfg_attr(docsrs, feature(doc_cfg))]
//! # topo-kernel
//!
//! topo-kernel is an in-memory, mutable topological geometry kernel. A model
//! is built from ten entity kinds (positions, vertices, edges, wires,
//! triangles, faces, points, polylines, polygons and collections) linked by
//! mirrored down/up adjacency, and edited incrementally while that adjacency
//! stays consistent.
//!
//! ## Features
//! - Sparse tombstoned tables: indices are never reused, deleted slots stay
//!   addressable as "dead"
//! - Navigation between any two kinds, with collection hierarchies folded in
//! - Four primitive edit families (add, replace, link/unlink, remove) and
//!   composite operations on a [`Model`](model::Model): object builders,
//!   cascade deletes, vertex deletion, reversing, welding
//! - Face triangulation with holes (`earcutr`)
//! - An offline consistency checker, plus optional per-edit checking with
//!   the `strict-invariants` / `check-invariants` features
//! - Plain-data snapshots (`serde`) and store merging
//!
//! ## Usage
//! ```
//! use topo_kernel::prelude::*;
//!
//! let mut m: Model = Model::new();
//! let posis: Vec<usize> = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]]
//!     .into_iter()
//!     .map(|xyz| m.add_posi_at(xyz))
//!     .collect();
//! let pgon = m.add_pgon(&posis, &[]).unwrap();
//! assert_eq!(m.store().nav_any_to_posi(EntKind::Pgon, pgon).unwrap(), posis);
//! assert_eq!(m.store().num_live(EntKind::Tri), 2);
//! ```
//!
//! ## Logging
//! The crate logs through the `log` facade and installs no logger.

pub mod attribs;
pub mod debug_invariants;
pub mod geometry;
pub mod io;
pub mod kernel_error;
pub mod model;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::attribs::{AttribTable, Attribs, NoAttribs};
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::io::StoreData;
    pub use crate::kernel_error::KernelError;
    pub use crate::model::{CollContents, DelPosis, Model};
    pub use crate::topology::{
        CheckOptions, Ent, EntKind, EntityStore, Offsets, VertUp, WireOwner, check_store,
    };
}
