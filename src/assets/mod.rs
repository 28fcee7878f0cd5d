//! Asset Module
//!
//! Mesh sourcing and decoding:
//! - [`MeshSource`]: URL-or-path source description
//! - [`fetch`]: asynchronous fetch + decode pipeline with progress events
//! - [`ply`]: the PLY decoder

pub mod fetch;
pub mod ply;
pub mod source;

pub use fetch::{load_geometry_blocking, spawn_load, LoadEvent, LoadMessage};
pub use ply::parse_ply;
pub use source::MeshSource;
