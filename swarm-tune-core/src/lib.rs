//! # SwarmTune Core
//!
//! Stateful particle swarm optimization primitives for SwarmTune.
//!
//! This crate is `no_std` compatible (an allocator is required) and provides:
//! - A typed, bounded parameter space mixing integer and continuous dimensions
//! - The ring-topology PSO step engine with per-item memory
//! - Bounded per-item sample history
//! - An injectable, seedable random source seam
//!
//! The engine is synchronous and seed-deterministic: two runs over the same
//! population, configuration, and random stream produce identical positions.
//!
//! ## Feature Flags
//!
//! - `std` (default): Enable standard library support
//! - `telemetry`: Enable tracing-based telemetry

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod history;
pub mod items;
pub mod optimizer;
pub mod rng;
pub mod space;
pub mod topology;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::items::{ItemId, ItemRoster};
    pub use crate::optimizer::{IdentityPost, PostProcess, PsoConfig, PsoOptimizer};
    pub use crate::rng::{CoreRng, ScriptedRng, SplitMix64, SwarmRng};
    pub use crate::space::{ParamKind, ParamRange, ParamSpace};
    pub use crate::topology::{ring_neighbors, Neighborhood};
}

/// Result type for SwarmTune core operations
pub type Result<T> = core::result::Result<T, Error>;

/// Error type for SwarmTune core operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A dimension descriptor has `min > max`
    InvalidRange {
        /// Offending dimension index
        dim: usize,
    },
    /// The parameter space cannot be replaced while swarm state exists
    SwarmActive,
    /// Ratings and positions are keyed by different item sets
    ShapeMismatch,
    /// The item set differs from the population that initialized the swarm
    PopulationChanged {
        /// First item present on only one side of the comparison
        item: u32,
    },
    /// An item's value vector does not match the parameter space length
    DimensionMismatch {
        /// Offending item id
        item: u32,
        /// Parameter space dimensionality
        expected: usize,
        /// Length of the supplied vector
        actual: usize,
    },
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::InvalidRange { dim } => {
                write!(f, "parameter range for dimension {} has min > max", dim)
            }
            Error::SwarmActive => {
                write!(
                    f,
                    "parameter space is locked while swarm state exists; reset first"
                )
            }
            Error::ShapeMismatch => {
                write!(f, "ratings and positions use different item sets")
            }
            Error::PopulationChanged { item } => {
                write!(
                    f,
                    "item set changed after swarm initialization (item {})",
                    item
                )
            }
            Error::DimensionMismatch {
                item,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "item {} has {} values, parameter space has {} dimensions",
                    item, actual, expected
                )
            }
        }
    }
}
