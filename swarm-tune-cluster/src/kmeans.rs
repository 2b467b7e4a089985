//! K-means clustering with centroid-range-normalized distances.

use std::collections::BTreeSet;

use thiserror::Error;

use swarm_tune_core::rng::SwarmRng;

/// Default iteration limit for [`KMeans::fit`]
pub const DEFAULT_MAX_STEPS: usize = 100;

/// Errors from the k-means calculator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ClusterError {
    /// Input vectors disagree on dimensionality
    #[error("input vector {index} has {actual} dimensions, expected {expected}")]
    MixedDimensions {
        /// Offending vector index
        index: usize,
        /// Dimensionality of the first vector
        expected: usize,
        /// Dimensionality found
        actual: usize,
    },
    /// An input vector has no dimensions
    #[error("input vector {index} is empty")]
    EmptyVector {
        /// Offending vector index
        index: usize,
    },
}

/// K-means calculator
///
/// `k = 0` means "one class per input". Centroids are initialized by random
/// sampling without replacement; assignment uses Euclidean distance with each
/// dimension normalized by the value range spanned by the centroids
/// themselves (1.0 when degenerate); exact distance ties are resolved by a
/// uniform random pick among the tied centroids. Iteration stops when no
/// centroid changes or the step limit is reached.
#[derive(Debug, Clone)]
pub struct KMeans {
    k: usize,
    max_steps: usize,
}

impl KMeans {
    /// Calculator producing up to `k` classes
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    /// Replace the iteration limit
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Cluster `vectors`, returning one class label per input
    pub fn fit<R: SwarmRng>(
        &self,
        vectors: &[Vec<f64>],
        rng: &mut R,
    ) -> Result<Vec<usize>, ClusterError> {
        let count = vectors.len();
        if count == 0 {
            return Ok(Vec::new());
        }

        let dims = vectors[0].len();
        for (index, vector) in vectors.iter().enumerate() {
            if vector.is_empty() {
                return Err(ClusterError::EmptyVector { index });
            }
            if vector.len() != dims {
                return Err(ClusterError::MixedDimensions {
                    index,
                    expected: dims,
                    actual: vector.len(),
                });
            }
        }

        let classes = if self.k == 0 {
            count
        } else {
            self.k.min(count)
        };

        let mut centroids = init_centroids(vectors, classes, rng);
        let mut labels = vec![0usize; count];

        let mut step = 0;
        loop {
            assign_classes(vectors, &centroids, &mut labels, rng);
            let changed = update_centroids(vectors, &labels, &mut centroids);
            step += 1;
            if changed == 0 || step >= self.max_steps {
                break;
            }
        }

        Ok(labels)
    }

    /// Cluster scalar inputs by wrapping each into a one-dimensional vector
    pub fn fit_scalars<R: SwarmRng>(
        &self,
        values: &[f64],
        rng: &mut R,
    ) -> Result<Vec<usize>, ClusterError> {
        let vectors: Vec<Vec<f64>> = values.iter().map(|&value| vec![value]).collect();
        self.fit(&vectors, rng)
    }
}

/// Uniform index in `0..count`
fn random_index<R: SwarmRng>(rng: &mut R, count: usize) -> usize {
    let raw = (rng.next_unit() * count as f64) as usize;
    raw.min(count - 1)
}

/// Sample `classes` distinct input points as the starting centroids
fn init_centroids<R: SwarmRng>(
    vectors: &[Vec<f64>],
    classes: usize,
    rng: &mut R,
) -> Vec<Vec<f64>> {
    let mut picked = BTreeSet::new();
    while picked.len() < classes {
        picked.insert(random_index(rng, vectors.len()));
    }
    picked.iter().map(|&index| vectors[index].clone()).collect()
}

/// Per-dimension value range spanned by the centroids, 1.0 when degenerate
fn centroid_spans(centroids: &[Vec<f64>]) -> Vec<f64> {
    let dims = centroids[0].len();
    let mut spans = Vec::with_capacity(dims);
    for dim in 0..dims {
        let mut lo = centroids[0][dim];
        let mut hi = centroids[0][dim];
        for centroid in &centroids[1..] {
            lo = lo.min(centroid[dim]);
            hi = hi.max(centroid[dim]);
        }
        spans.push(if lo == hi { 1.0 } else { (hi - lo).abs() });
    }
    spans
}

/// Assign every vector to its nearest centroid
///
/// Strictly smaller distance wins and keeps the earliest centroid; an exact
/// tie collects the tied centroids and picks one uniformly at random.
fn assign_classes<R: SwarmRng>(
    vectors: &[Vec<f64>],
    centroids: &[Vec<f64>],
    labels: &mut [usize],
    rng: &mut R,
) {
    let spans = centroid_spans(centroids);

    for (index, vector) in vectors.iter().enumerate() {
        let mut best = 0usize;
        let mut best_distance = f64::INFINITY;
        let mut ties: Vec<usize> = Vec::new();

        for (class, centroid) in centroids.iter().enumerate() {
            let mut sum = 0.0;
            for dim in 0..vector.len() {
                let delta = (vector[dim] - centroid[dim]).abs() / spans[dim];
                sum += delta * delta;
            }
            let distance = sum.sqrt();

            if distance < best_distance {
                best = class;
                best_distance = distance;
                ties.clear();
            } else if distance == best_distance {
                if ties.is_empty() {
                    ties.push(best);
                }
                ties.push(class);
            }
        }

        if !ties.is_empty() {
            best = ties[random_index(rng, ties.len())];
        }
        labels[index] = best;
    }
}

/// Recompute centroids as per-class means, returning how many changed
///
/// A class with no members collapses to the origin.
fn update_centroids(vectors: &[Vec<f64>], labels: &[usize], centroids: &mut [Vec<f64>]) -> usize {
    let dims = vectors[0].len();
    let classes = centroids.len();
    let mut sums = vec![vec![0.0f64; dims]; classes];
    let mut counts = vec![0usize; classes];

    for (vector, &class) in vectors.iter().zip(labels) {
        counts[class] += 1;
        for dim in 0..dims {
            sums[class][dim] += vector[dim];
        }
    }

    let mut changed = 0;
    for class in 0..classes {
        let mut class_changed = false;
        for dim in 0..dims {
            let next = if counts[class] > 0 {
                sums[class][dim] / counts[class] as f64
            } else {
                0.0
            };
            if centroids[class][dim] != next {
                centroids[class][dim] = next;
                class_changed = true;
            }
        }
        if class_changed {
            changed += 1;
        }
    }
    changed
}
