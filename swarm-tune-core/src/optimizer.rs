//! The PSO step engine.
//!
//! [`PsoOptimizer`] carries the swarm state between successive
//! [`step`](PsoOptimizer::step) calls: per-item velocity vectors, per-item
//! best-known samples (tracked directly or derived from a bounded history
//! log), and the step counter. Each step reads the current ratings and
//! positions, moves every item through its ring neighborhood, and mutates the
//! positions in place.
//!
//! Draws from the random source are consumed in a fixed order: velocity-init
//! draws first (item-major, dimension-minor), then per item and dimension the
//! cognitive draw, the social draw (only when the local best is another
//! item), and the boundary-overshoot draw (only when the projected position
//! escapes its bound). Replaying the same unit stream replays the run.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::history::SampleLog;
use crate::items::ItemId;
use crate::rng::SwarmRng;
use crate::space::{round_half_away, ParamKind, ParamRange, ParamSpace};
use crate::topology::ring_neighbors;
use crate::{Error, Result};

/// Default inertia blend factor
pub const DEFAULT_INERTIA: f64 = 0.5;
/// Default cognitive pull factor
pub const DEFAULT_COGNITIVE: f64 = 2.0;
/// Default social pull factor
pub const DEFAULT_SOCIAL: f64 = 2.0;

/// PSO tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PsoConfig {
    /// Inertia blend factor: how much of the previous velocity persists, 0..1
    pub inertia: f64,
    /// Cognitive pull toward an item's own best-known values
    pub cognitive: f64,
    /// Social pull toward the ring-neighborhood best
    pub social: f64,
    /// Samples of per-item history to keep; 0 tracks a single running best
    pub history_length: usize,
}

impl Default for PsoConfig {
    fn default() -> Self {
        Self {
            inertia: DEFAULT_INERTIA,
            cognitive: DEFAULT_COGNITIVE,
            social: DEFAULT_SOCIAL,
            history_length: 0,
        }
    }
}

/// Position post-processing hook applied at the end of every step
///
/// Extension point for derived optimizers; the default does nothing.
pub trait PostProcess: Send {
    /// Adjust the freshly updated positions in place
    fn apply(&mut self, space: &ParamSpace, positions: &mut BTreeMap<ItemId, Vec<f64>>);
}

/// The default no-op hook
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityPost;

impl PostProcess for IdentityPost {
    fn apply(&mut self, _space: &ParamSpace, _positions: &mut BTreeMap<ItemId, Vec<f64>>) {}
}

/// Per-item best-known sample
#[derive(Debug, Clone)]
struct BestSample {
    score: f64,
    values: Vec<f64>,
}

/// Mutable swarm state carried between steps
#[derive(Debug, Default)]
struct SwarmState {
    velocities: BTreeMap<ItemId, Vec<f64>>,
    best: BTreeMap<ItemId, BestSample>,
    history: BTreeMap<ItemId, SampleLog>,
    step_no: u64,
}

/// Score used for neighborhood comparison: the sample recorded this step in
/// history mode, the running best otherwise
fn current_score(state: &SwarmState, history_length: usize, id: ItemId) -> f64 {
    if history_length > 0 {
        let log = &state.history[&id];
        log.slot_for_step(state.step_no, history_length)
            .map(|slot| log.score_at(slot))
            .unwrap_or_default()
    } else {
        state.best[&id].score
    }
}

/// Values paired with [`current_score`] for the same item
fn current_values(state: &SwarmState, history_length: usize, id: ItemId) -> &[f64] {
    if history_length > 0 {
        let log = &state.history[&id];
        match log.slot_for_step(state.step_no, history_length) {
            Some(slot) => log.values_at(slot),
            None => &[],
        }
    } else {
        &state.best[&id].values
    }
}

/// Ring-topology particle swarm optimizer
///
/// The optimizer owns its swarm state and random source exclusively; callers
/// own the rating and position maps passed to each step. `&mut self` on
/// [`step`](PsoOptimizer::step) makes the whole step one atomic unit: best
/// info is fully updated before any velocity is computed.
pub struct PsoOptimizer<R: SwarmRng> {
    space: ParamSpace,
    config: PsoConfig,
    rng: R,
    post: Box<dyn PostProcess>,
    state: SwarmState,
}

impl<R: SwarmRng + core::fmt::Debug> core::fmt::Debug for PsoOptimizer<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PsoOptimizer")
            .field("space", &self.space)
            .field("config", &self.config)
            .field("rng", &self.rng)
            .field("step_no", &self.state.step_no)
            .finish_non_exhaustive()
    }
}

impl<R: SwarmRng> PsoOptimizer<R> {
    /// Create an optimizer over `space` with the given tunables and source of
    /// randomness
    ///
    /// Fails fast if any dimension of the space has `min > max`.
    pub fn new(space: ParamSpace, config: PsoConfig, rng: R) -> Result<Self> {
        space.validate()?;
        Ok(Self {
            space,
            config,
            rng,
            post: Box::new(IdentityPost),
            state: SwarmState::default(),
        })
    }

    /// Replace the post-process hook
    pub fn with_post_process(mut self, post: Box<dyn PostProcess>) -> Self {
        self.post = post;
        self
    }

    /// Parameter space in use
    pub fn space(&self) -> &ParamSpace {
        &self.space
    }

    /// Current tunables
    pub fn config(&self) -> &PsoConfig {
        &self.config
    }

    /// Number of completed steps
    pub fn step_no(&self) -> u64 {
        self.state.step_no
    }

    /// Replace the parameter space wholesale
    ///
    /// The space is immutable while swarm state exists: [`reset`](Self::reset)
    /// first. The replacement is validated eagerly.
    pub fn set_space(&mut self, space: ParamSpace) -> Result<()> {
        if !self.state.velocities.is_empty() {
            return Err(Error::SwarmActive);
        }
        space.validate()?;
        self.space = space;
        Ok(())
    }

    /// Set how many history samples to keep per item
    ///
    /// Logs already accumulated are not resized; existing entries are
    /// reinterpreted under the new length on the next write.
    pub fn set_history_length(&mut self, value: usize) {
        self.config.history_length = value;
    }

    /// Set the inertia blend factor, 0..1
    pub fn set_inertia(&mut self, value: f64) {
        self.config.inertia = value;
    }

    /// Best-known (score, values) currently stored for `id`
    pub fn best(&self, id: ItemId) -> Option<(f64, &[f64])> {
        self.state
            .best
            .get(&id)
            .map(|best| (best.score, best.values.as_slice()))
    }

    /// Current velocity vector of `id`
    pub fn velocity(&self, id: ItemId) -> Option<&[f64]> {
        self.state.velocities.get(&id).map(Vec::as_slice)
    }

    /// Clear all mutable swarm state and zero the step counter
    ///
    /// The parameter space and tunables are untouched; the next step
    /// reinitializes velocities from the positions it is given.
    pub fn reset(&mut self) {
        self.state = SwarmState::default();
    }

    /// Advance the swarm by one step
    ///
    /// `ratings` maps every item to its current fitness (higher is better);
    /// `positions` maps every item to its value vector and is mutated in
    /// place to the next position. The first call with a non-empty map
    /// defines the population; later calls must use the same item set. An
    /// empty item set is a no-op that still advances the step counter.
    pub fn step(
        &mut self,
        ratings: &BTreeMap<ItemId, f64>,
        positions: &mut BTreeMap<ItemId, Vec<f64>>,
    ) -> Result<()> {
        self.check_shape(ratings, positions)?;

        #[cfg(feature = "telemetry")]
        tracing::trace!(
            step = self.state.step_no,
            items = positions.len(),
            "advancing swarm"
        );

        if self.state.velocities.is_empty() {
            self.init_velocities(positions);
        }
        self.update_best_info(ratings, positions);
        self.update_velocities(positions);
        self.update_positions(positions);
        self.post.apply(&self.space, positions);
        self.state.step_no += 1;
        Ok(())
    }

    fn check_shape(
        &self,
        ratings: &BTreeMap<ItemId, f64>,
        positions: &BTreeMap<ItemId, Vec<f64>>,
    ) -> Result<()> {
        for id in ratings.keys() {
            if !positions.contains_key(id) {
                return Err(Error::ShapeMismatch);
            }
        }
        for id in positions.keys() {
            if !ratings.contains_key(id) {
                return Err(Error::ShapeMismatch);
            }
        }

        let expected = self.space.len();
        for (id, values) in positions {
            if values.len() != expected {
                return Err(Error::DimensionMismatch {
                    item: id.0,
                    expected,
                    actual: values.len(),
                });
            }
        }

        // once velocities exist the population is fixed
        if !self.state.velocities.is_empty() {
            for id in positions.keys() {
                if !self.state.velocities.contains_key(id) {
                    return Err(Error::PopulationChanged { item: id.0 });
                }
            }
            for id in self.state.velocities.keys() {
                if !positions.contains_key(id) {
                    return Err(Error::PopulationChanged { item: id.0 });
                }
            }
        }
        Ok(())
    }

    /// Derive one velocity per item from its initial position: each dimension
    /// is the current value scaled by a draw from `U(0.1, 1.0)`, rounded for
    /// integer dimensions and stored as a real number
    fn init_velocities(&mut self, positions: &BTreeMap<ItemId, Vec<f64>>) {
        let mut velocities = BTreeMap::new();
        for (&id, values) in positions {
            let mut velocity = Vec::with_capacity(values.len());
            for (dim, &value) in values.iter().enumerate() {
                let scaled = value * self.rng.uniform(0.1, 1.0);
                velocity.push(match self.space.range(dim).kind() {
                    ParamKind::Int => round_half_away(scaled),
                    ParamKind::Real => scaled,
                });
            }
            velocities.insert(id, velocity);
        }
        self.state.velocities = velocities;
    }

    fn update_best_info(
        &mut self,
        ratings: &BTreeMap<ItemId, f64>,
        positions: &BTreeMap<ItemId, Vec<f64>>,
    ) {
        if self.config.history_length > 0 {
            let history_length = self.config.history_length;
            for (&id, values) in positions {
                let rating = ratings[&id];
                let log = self.state.history.entry(id).or_default();
                log.record(self.state.step_no, history_length, rating, values);
            }

            // recompute every best from the full log
            for (&id, log) in self.state.history.iter() {
                if let Some(slot) = log.best_slot() {
                    self.state.best.insert(
                        id,
                        BestSample {
                            score: log.score_at(slot),
                            values: log.values_at(slot).to_vec(),
                        },
                    );
                }
            }
        } else {
            for (&id, &rating) in ratings {
                match self.state.best.get_mut(&id) {
                    None => {
                        self.state.best.insert(
                            id,
                            BestSample {
                                score: rating,
                                values: positions[&id].clone(),
                            },
                        );
                    }
                    Some(best) if rating > best.score => {
                        best.score = rating;
                        best.values.clear();
                        best.values.extend_from_slice(&positions[&id]);
                    }
                    // equal score keeps the existing best
                    Some(_) => {}
                }
            }
        }
    }

    fn update_velocities(&mut self, positions: &BTreeMap<ItemId, Vec<f64>>) {
        let count = self.state.velocities.len() as u32;
        if count == 0 {
            return;
        }
        let ids: Vec<ItemId> = self.state.velocities.keys().copied().collect();
        let mut velocities = core::mem::take(&mut self.state.velocities);
        let history_length = self.config.history_length;

        for (rank, (&id, velocity)) in velocities.iter_mut().enumerate() {
            let hood = ring_neighbors(ItemId(rank as u32), count);

            // local best: first strict maximum in neighborhood order
            let mut local_best = id;
            let mut local_best_score = current_score(&self.state, history_length, id);
            for &neighbor in &hood.as_slice()[1..] {
                let neighbor_id = ids[neighbor.index()];
                let score = current_score(&self.state, history_length, neighbor_id);
                if score > local_best_score {
                    local_best = neighbor_id;
                    local_best_score = score;
                }
            }

            let social = if local_best != id {
                Some(current_values(&self.state, history_length, local_best))
            } else {
                None
            };
            let personal = &self.state.best[&id].values;
            let current = &positions[&id];

            for dim in 0..current.len() {
                let pos = current[dim];
                let old_velocity = velocity[dim];

                let mut proposed = old_velocity
                    + self.config.cognitive * self.rng.next_unit() * (personal[dim] - pos);
                if let Some(social_values) = social {
                    proposed +=
                        self.config.social * self.rng.next_unit() * (social_values[dim] - pos);
                }

                let mut new_velocity = self.config.inertia * old_velocity
                    + (1.0 - self.config.inertia) * proposed;

                // boundary repair against the projected next position
                match self.space.range(dim) {
                    ParamRange::Int { min, max } => {
                        let projected = round_half_away(pos + new_velocity) as i64;
                        if projected < min {
                            new_velocity +=
                                (1.0 + self.rng.uniform(0.0, 0.5)) * (min - projected) as f64;
                        } else if projected > max {
                            new_velocity -=
                                (1.0 + self.rng.uniform(0.0, 0.5)) * (projected - max) as f64;
                        }
                    }
                    ParamRange::Real { min, max } => {
                        let projected = pos + new_velocity;
                        if projected < min {
                            new_velocity += (1.0 + self.rng.uniform(0.0, 0.5)) * (min - projected);
                        } else if projected > max {
                            new_velocity -= (1.0 + self.rng.uniform(0.0, 0.5)) * (projected - max);
                        }
                    }
                }

                velocity[dim] = new_velocity;
            }
        }

        self.state.velocities = velocities;
    }

    fn update_positions(&self, positions: &mut BTreeMap<ItemId, Vec<f64>>) {
        for (id, values) in positions.iter_mut() {
            let velocity = &self.state.velocities[id];
            for dim in 0..values.len() {
                let next = values[dim] + velocity[dim];
                values[dim] = match self.space.range(dim).kind() {
                    ParamKind::Int => round_half_away(next),
                    ParamKind::Real => next,
                };
            }
        }
    }
}
