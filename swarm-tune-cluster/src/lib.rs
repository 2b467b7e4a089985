//! # SwarmTune Cluster
//!
//! K-means clustering companion for SwarmTune fitness pipelines: group
//! sampled signals or candidate scores into classes before rating them.
//!
//! The calculator draws its randomness (centroid sampling and equidistance
//! tie-breaks) through the same [`SwarmRng`](swarm_tune_core::rng::SwarmRng)
//! seam as the optimizer, so clustering stays reproducible under a fixed
//! seed.

mod kmeans;

pub use kmeans::{ClusterError, KMeans, DEFAULT_MAX_STEPS};
