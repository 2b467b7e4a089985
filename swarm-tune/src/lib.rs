//! # SwarmTune
//!
//! **Seed-deterministic parameter tuning — a ring-topology particle swarm
//! engine with a portable `swarm-tune-core` base.**
//!
//! SwarmTune nudges a population of candidate parameter vectors ("items")
//! toward better-scoring regions of a bounded search space. Each item
//! remembers its own best sample and is pulled toward the best of its ring
//! neighbors; integer and continuous dimensions mix freely and every run is
//! reproducible from a single seed. The top-level `swarm-tune` crate is
//! `std`-only; `no_std` portability is exposed via `swarm-tune-core`.
//!
//! ## Quick Start
//!
//! ```rust
//! use swarm_tune::prelude::*;
//!
//! let space = ParamSpace::new(vec![
//!     ParamRange::real(-5.0, 5.0),
//!     ParamRange::real(-5.0, 5.0),
//! ])?;
//!
//! let mut tuner = Tuner::builder(space)
//!     .seed(42)
//!     .item("a", vec![4.0, -3.0])
//!     .item("b", vec![-2.0, 1.5])
//!     .item("c", vec![0.5, 4.5])
//!     .build(|values| -(values[0].powi(2) + values[1].powi(2)))?;
//!
//! tuner.run(25)?;
//! let best = tuner.best().expect("rounds were run");
//! assert!(best.score <= 0.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Crate Structure
//!
//! - [`swarm_tune_core`]: the PSO step engine (no_std compatible)
//! - [`swarm_tune_cluster`]: k-means companion for fitness pipelines

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

#[cfg(not(feature = "std"))]
compile_error!(
    "`swarm-tune` requires the `std` feature. Use `swarm-tune-core` for no_std targets."
);

// Re-export sub-crates
pub use swarm_tune_cluster as cluster;
pub use swarm_tune_core as core;

// Re-export commonly used items at the top level
pub use swarm_tune_cluster::{ClusterError, KMeans};
pub use swarm_tune_core::{
    items::{ItemId, ItemRoster},
    optimizer::{IdentityPost, PostProcess, PsoConfig, PsoOptimizer},
    rng::{CoreRng, ScriptedRng, SplitMix64, SwarmRng},
    space::{ParamKind, ParamRange, ParamSpace},
    topology::{ring_neighbors, Neighborhood},
    Error as CoreError,
};

pub mod driver;
pub mod objective;

pub use driver::{BestSoFar, Tuner, TuneError, TunerBuilder};

/// Prelude module for convenient imports
///
/// ```rust,ignore
/// use swarm_tune::prelude::*;
/// ```
pub mod prelude {
    pub use swarm_tune_core::prelude::*;

    pub use crate::driver::{BestSoFar, Tuner, TuneError, TunerBuilder};
    pub use crate::KMeans;
}
