//! Data exchange for the entity store.
//!
//! The kernel does not write files itself. [`data::StoreData`] is a serde
//! value that callers encode with whatever format they use (JSON, bincode).

pub mod data;

pub use data::StoreData;
