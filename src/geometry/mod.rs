//! Geometry helpers that read coordinates through the attribute store.
//!
//! The topology itself carries no coordinates; this module is where
//! positions meet geometry, currently for triangulating faces.

pub mod triangulate;

pub use triangulate::{newell_normal, triangulate, triangulate_face};
