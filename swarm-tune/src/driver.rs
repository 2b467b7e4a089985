//! Name-keyed tuning driver.
//!
//! [`Tuner`] owns a [`PsoOptimizer`], the item roster, and a caller-supplied
//! objective function, and advances the swarm one round at a time: it rates
//! every item's current position with the objective, feeds the ratings to the
//! engine, and tracks the best sample seen across the whole run. The engine
//! itself never invokes the objective.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::debug;

use swarm_tune_core::items::{ItemId, ItemRoster};
use swarm_tune_core::optimizer::{PsoConfig, PsoOptimizer};
use swarm_tune_core::rng::SplitMix64;
use swarm_tune_core::space::ParamSpace;

/// Objective function rating one position; higher is better
pub type Objective = Box<dyn FnMut(&[f64]) -> f64 + Send>;

/// Errors from the tuning driver
#[derive(Debug, Error)]
pub enum TuneError {
    /// The builder was given no items
    #[error("tuner needs at least one item")]
    NoItems,
    /// The same item name was added twice
    #[error("item {0:?} was added twice")]
    DuplicateItem(String),
    /// An item's initial position does not match the parameter space
    #[error("item {name:?} has {actual} values, parameter space has {expected} dimensions")]
    DimensionMismatch {
        /// Offending item name
        name: String,
        /// Parameter space dimensionality
        expected: usize,
        /// Length of the supplied vector
        actual: usize,
    },
    /// The engine rejected a configuration or step
    #[error("optimizer error: {0}")]
    Engine(#[from] swarm_tune_core::Error),
}

/// Best sample observed so far across a tuning run
#[derive(Debug, Clone, PartialEq)]
pub struct BestSoFar {
    /// Highest score seen
    pub score: f64,
    /// Position that produced the score
    pub values: Vec<f64>,
    /// Item that produced the score
    pub item: ItemId,
    /// Round (zero-based) in which the score was observed
    pub round: u64,
}

/// Builder for [`Tuner`]
#[derive(Debug)]
pub struct TunerBuilder {
    space: ParamSpace,
    config: PsoConfig,
    seed: u64,
    items: Vec<(String, Vec<f64>)>,
}

impl TunerBuilder {
    /// Start a builder over `space`
    pub fn new(space: ParamSpace) -> Self {
        Self {
            space,
            config: PsoConfig::default(),
            seed: 0,
            items: Vec::new(),
        }
    }

    /// Replace the whole engine configuration
    pub fn config(mut self, config: PsoConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the inertia blend factor
    pub fn inertia(mut self, inertia: f64) -> Self {
        self.config.inertia = inertia;
        self
    }

    /// Set the cognitive pull factor
    pub fn cognitive(mut self, cognitive: f64) -> Self {
        self.config.cognitive = cognitive;
        self
    }

    /// Set the social pull factor
    pub fn social(mut self, social: f64) -> Self {
        self.config.social = social;
        self
    }

    /// Keep a bounded history of samples per item
    pub fn history_length(mut self, history_length: usize) -> Self {
        self.config.history_length = history_length;
        self
    }

    /// Seed for the engine's random source
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Add a named item with its initial position
    pub fn item(mut self, name: impl Into<String>, initial: Vec<f64>) -> Self {
        self.items.push((name.into(), initial));
        self
    }

    /// Build the tuner around an objective function
    pub fn build(
        self,
        objective: impl FnMut(&[f64]) -> f64 + Send + 'static,
    ) -> Result<Tuner, TuneError> {
        if self.items.is_empty() {
            return Err(TuneError::NoItems);
        }

        let expected = self.space.len();
        let mut roster = ItemRoster::new();
        let mut positions = BTreeMap::new();
        for (name, initial) in self.items {
            if roster.id(&name).is_some() {
                return Err(TuneError::DuplicateItem(name));
            }
            if initial.len() != expected {
                return Err(TuneError::DimensionMismatch {
                    name,
                    expected,
                    actual: initial.len(),
                });
            }
            let id = roster.register(&name);
            positions.insert(id, initial);
        }

        let optimizer = PsoOptimizer::new(self.space, self.config, SplitMix64::new(self.seed))?;

        Ok(Tuner {
            roster,
            optimizer,
            objective: Box::new(objective),
            positions,
            best: None,
        })
    }
}

/// Name-keyed driver around the PSO engine
pub struct Tuner {
    roster: ItemRoster,
    optimizer: PsoOptimizer<SplitMix64>,
    objective: Objective,
    positions: BTreeMap<ItemId, Vec<f64>>,
    best: Option<BestSoFar>,
}

impl core::fmt::Debug for Tuner {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tuner")
            .field("roster", &self.roster)
            .field("optimizer", &self.optimizer)
            .field("best", &self.best)
            .finish_non_exhaustive()
    }
}

impl Tuner {
    /// Start building a tuner over `space`
    pub fn builder(space: ParamSpace) -> TunerBuilder {
        TunerBuilder::new(space)
    }

    /// Advance the swarm by one round, returning the best rating of the round
    pub fn round(&mut self) -> Result<f64, TuneError> {
        let round = self.optimizer.step_no();
        let mut ratings = BTreeMap::new();
        let mut round_best = f64::NEG_INFINITY;

        for (&id, values) in &self.positions {
            let score = (self.objective)(values);
            round_best = round_best.max(score);

            let improved = match &self.best {
                Some(best) => score > best.score,
                None => true,
            };
            if improved {
                self.best = Some(BestSoFar {
                    score,
                    values: values.clone(),
                    item: id,
                    round,
                });
            }
            ratings.insert(id, score);
        }

        self.optimizer.step(&ratings, &mut self.positions)?;
        debug!(round, best = round_best, "tuning round complete");
        Ok(round_best)
    }

    /// Run `rounds` rounds back to back
    pub fn run(&mut self, rounds: u64) -> Result<(), TuneError> {
        for _ in 0..rounds {
            self.round()?;
        }
        Ok(())
    }

    /// Best sample observed so far, if any round has run
    pub fn best(&self) -> Option<&BestSoFar> {
        self.best.as_ref()
    }

    /// Current position of a named item
    pub fn position(&self, name: &str) -> Option<&[f64]> {
        let id = self.roster.id(name)?;
        self.positions.get(&id).map(Vec::as_slice)
    }

    /// The id-to-name roster for this population
    pub fn roster(&self) -> &ItemRoster {
        &self.roster
    }

    /// Number of completed rounds
    pub fn rounds_completed(&self) -> u64 {
        self.optimizer.step_no()
    }

    /// Direct access to the underlying engine
    pub fn optimizer(&self) -> &PsoOptimizer<SplitMix64> {
        &self.optimizer
    }
}
