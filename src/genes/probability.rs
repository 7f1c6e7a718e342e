use crate::error::{GenePoolError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A chance in the closed interval [0, 1].
///
/// Every stochastic decision in the pool goes through this type. Values
/// are immutable; the combinators return new probabilities.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Probability(f64);

impl Probability {
    pub const NEVER: Probability = Probability(0.0);
    pub const EVEN: Probability = Probability(0.5);
    pub const ALWAYS: Probability = Probability(1.0);

    /// Checked constructor; rejects NaN and anything outside [0, 1].
    pub fn new(value: f64) -> Result<Self> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(GenePoolError::InvalidProbability(value))
        }
    }

    pub(crate) fn clamped(value: f64) -> Self {
        Self(value.clamp(0.0, 1.0))
    }

    /// Uniformly sampled probability from the thread-local generator.
    pub fn random() -> Self {
        Self::sample(&mut rand::thread_rng())
    }

    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.gen::<f64>())
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Chance that both events happen.
    pub fn and(self, other: Probability) -> Self {
        Self(self.0 * other.0)
    }

    /// Chance that at least one event happens.
    pub fn or(self, other: Probability) -> Self {
        // 1 - (1-p)(1-q) stays inside [0, 1] under rounding
        Self(1.0 - (1.0 - self.0) * (1.0 - other.0))
    }

    pub fn coin_toss(self) -> bool {
        self.coin_toss_with(&mut rand::thread_rng())
    }

    pub fn coin_toss_with<R: Rng + ?Sized>(self, rng: &mut R) -> bool {
        rng.gen::<f64>() < self.0
    }
}

impl Default for Probability {
    fn default() -> Self {
        Self::EVEN
    }
}

impl TryFrom<f64> for Probability {
    type Error = GenePoolError;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Probability> for f64 {
    fn from(probability: Probability) -> f64 {
        probability.0
    }
}

impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}", self.0)
    }
}
