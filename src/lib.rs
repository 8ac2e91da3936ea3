//! Entity-relationship graph normalization and force-directed layout.
//!
//! A payload goes through [`payload::normalize`] into a canonical [`payload::Graph`],
//! which a [`engine::LayoutEngine`] lays out tick by tick while the host forwards
//! drag and highlight input.

pub mod config;
pub mod engine;
pub mod error;
pub mod payload;
pub mod style;
mod util;

pub use config::{LayoutConfig, load_config};
pub use engine::{GraphSnapshot, LayoutEngine, LoadOutcome};
pub use error::GraphError;
pub use payload::{Graph, Normalized, normalize};
pub use style::{StyleTable, TypeTag};
