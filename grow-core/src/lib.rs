//! Procedural 3-D plant growth.
//!
//! Main components:
//! - [`param`] — self-advancing oscillator parameters.
//! - [`bank`] — the named parameter tuples an organism grows from.
//! - [`cell`] — lattice points on a slice ring and their flocking update.
//! - [`slice`] — cross-sectional rings of cells.
//! - [`tip`] — shoots and roots that move, lay slices and bifurcate.
//! - [`organism`] — the growth loop and mesh emission.
//! - [`mesh`] — the sink trait mesh primitives are emitted into.
//! - [`config`] — run configuration and default presets.
//! - [`context`] — seeded random stream and run-wide settings.
//! - [`error`] — the crate error type.
//! - [`types`] — shared type aliases and IDs.

pub mod bank;
pub mod cell;
pub mod config;
pub mod context;
pub mod error;
pub mod mesh;
pub mod organism;
pub mod param;
pub mod slice;
pub mod tip;
pub mod types;

pub use config::GrowthConfig;
pub use error::{GrowthError, Result};
pub use mesh::{MeshBuffers, MeshSink};
pub use organism::Organism;
