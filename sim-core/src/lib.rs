//! Procedural shape and motion for organic scene elements.
//!
//! Main components:
//! - [`grammar`]: parametric L-system parsing and rewriting.
//! - [`turtle`]: 3-D turtle turning symbol strings into posed primitives.
//! - [`presets`]: ready-made plant grammars and config-driven sources.
//! - [`flock`]: seeded flocking simulation with a seek / wait automaton.
//! - [`orientation`]: orthonormal heading / left / up frames.
//! - [`config`]: validated parameter records for both engines.
//! - [`error`]: the shared error type.
//! - [`leaf`]: named leaf outlines.
//! - [`types`]: shared type aliases and constants.

pub mod config;
pub mod error;
pub mod flock;
pub mod grammar;
pub mod leaf;
pub mod orientation;
pub mod presets;
pub mod turtle;
pub mod types;

pub use config::{FlockParams, PlantParams, SeparationMode};
pub use error::{Result, SimError};
