//! Deterministic fractal forests grown from block hashes.
//!
//! - [`seed`]: block hash to seed and stream key.
//! - [`rng`]: the MT19937 stream every run draws from.
//! - [`forest`]: planting and breadth-first growth of the trees.
//! - [`sketch`]: cached generation for frequent redraws.
//! - [`canvas`]: surfaces that execute the draw calls.

pub mod canvas;
pub mod config;
pub mod error;
pub mod forest;
pub mod help;
pub mod rng;
pub mod seed;
pub mod settings;
pub mod sketch;
pub mod terminal;
pub mod view;

pub use config::{Rgb, StyleConfig};
pub use error::{ForestError, Result};
pub use forest::{generate, generate_with, DrawCall, Forest, ForestParams, LineSegment};
pub use rng::RandomStream;
pub use seed::{Block, Seed};
