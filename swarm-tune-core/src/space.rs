//! Typed parameter space metadata.
//!
//! A [`ParamSpace`] describes, per dimension, whether values are integer or
//! continuous and the inclusive `[min, max]` bound the optimizer repairs
//! positions against. The space is supplied once before optimization starts
//! and stays immutable while swarm state exists.

use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Value kind of a single dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    /// Integer-valued; positions are rounded to whole numbers at apply time
    Int,
    /// Continuous-valued
    Real,
}

/// Inclusive bound descriptor for one dimension
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamRange {
    /// Integer dimension
    Int {
        /// Inclusive lower bound
        min: i64,
        /// Inclusive upper bound
        max: i64,
    },
    /// Continuous dimension
    Real {
        /// Inclusive lower bound
        min: f64,
        /// Inclusive upper bound
        max: f64,
    },
}

impl ParamRange {
    /// Integer dimension with inclusive bounds
    pub const fn int(min: i64, max: i64) -> Self {
        Self::Int { min, max }
    }

    /// Continuous dimension with inclusive bounds
    pub const fn real(min: f64, max: f64) -> Self {
        Self::Real { min, max }
    }

    /// Value kind of this dimension
    pub const fn kind(&self) -> ParamKind {
        match self {
            Self::Int { .. } => ParamKind::Int,
            Self::Real { .. } => ParamKind::Real,
        }
    }

    fn is_valid(&self) -> bool {
        match *self {
            Self::Int { min, max } => min <= max,
            Self::Real { min, max } => min <= max,
        }
    }
}

/// Ordered sequence of dimension descriptors
///
/// The length defines the dimensionality of every item position and velocity.
/// Zero-width bounds (`min == max`) are legal and simply produce no boundary
/// correction pressure in that dimension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParamSpace {
    dims: Vec<ParamRange>,
}

impl ParamSpace {
    /// Validate and build a space from dimension descriptors
    pub fn new(dims: Vec<ParamRange>) -> Result<Self> {
        let space = Self { dims };
        space.validate()?;
        Ok(space)
    }

    /// Check every dimension for `min <= max`
    ///
    /// `new` already validates; this exists for spaces that arrive through
    /// deserialization.
    pub fn validate(&self) -> Result<()> {
        for (dim, range) in self.dims.iter().enumerate() {
            if !range.is_valid() {
                return Err(Error::InvalidRange { dim });
            }
        }
        Ok(())
    }

    /// Number of dimensions
    pub fn len(&self) -> usize {
        self.dims.len()
    }

    /// Whether the space has no dimensions
    pub fn is_empty(&self) -> bool {
        self.dims.is_empty()
    }

    /// Descriptor for dimension `dim`
    ///
    /// An out-of-range index is a programming error and panics; the optimizer
    /// validates item shapes against the space before reading it.
    pub fn range(&self, dim: usize) -> ParamRange {
        self.dims[dim]
    }

    /// All descriptors in dimension order
    pub fn ranges(&self) -> &[ParamRange] {
        &self.dims
    }
}

/// Round to the nearest whole number, ties away from zero
///
/// `2.5` rounds to `3.0`, `-2.5` to `-3.0`, `2.49` to `2.0`. Written without
/// `f64::round` so `no_std + alloc` builds don't require libm.
pub fn round_half_away(value: f64) -> f64 {
    let truncated = value as i64 as f64;
    let fraction = value - truncated;
    if fraction >= 0.5 {
        truncated + 1.0
    } else if fraction <= -0.5 {
        truncated - 1.0
    } else {
        truncated
    }
}
