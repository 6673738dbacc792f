//! Topology of a model: entity kinds, the entity store, and the read and
//! edit operations on it.
//!
//! This module provides:
//! - [`kind::EntKind`] and the tombstoned [`arena::Table`]
//! - [`store::EntityStore`] with mirrored down/up adjacency
//! - navigation ([`nav`]), collections ([`collections`]) and the primitive
//!   edits ([`edit`])
//! - consistency checking ([`validation`]) and store merging ([`merge`])

pub mod arena;
pub mod collections;
pub mod edit;
pub mod kind;
pub mod merge;
pub mod nav;
pub mod store;
pub mod validation;

pub use kind::{Ent, EntKind};
pub use merge::Offsets;
pub use store::{CollDown, EntityStore, FaceDown, VertUp, WireOwner};
pub use validation::{CheckOptions, check_store, check_store_with};
