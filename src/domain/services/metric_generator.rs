//! # Metric Generator
//!
//! Produces per-tick metric values as bounded random variation around a
//! baseline.
//!
//! Each [`MetricKind`] maps to a [`VariationShape`] which fixes the sign bias
//! and scale of the variation:
//!
//! | Kind | Shape | Scale | Default volatility |
//! |------|-------|-------|--------------------|
//! | pairs | symmetric | 0.1 | 0.01 |
//! | spread | symmetric | 1.0 | 0.03 |
//! | volume | non-negative | 0.3 | 0.02 |
//! | inventory | symmetric | 0.4 | 0.02 |
//! | pnl | symmetric | 1.0 | 0.08 |
//! | uptime | non-positive | 0.05 | 0.001 |
//! | latency | symmetric | 0.2 | 0.01 |
//! | execution speed | symmetric | 0.3 | 0.02 |
//! | success rate | non-positive | 0.1 | 0.002 |
//! | volume capacity | symmetric | 0.2 | 0.01 |
//! | trades | symmetric | 1.0 | 0.08 |
//! | generic | symmetric | 1.0 | 0.05 |
//!
//! Randomness is injected through [`RandomSource`] so generation is
//! deterministic under a seeded or scripted source.
//!
//! # Examples
//!
//! ```
//! use mm_monitor::domain::services::metric_generator::{MetricGenerator, MetricKind, SequenceRandom};
//!
//! let mut rng = SequenceRandom::new(vec![0.5]);
//! // u = 0.5 is the midpoint of a symmetric draw: no change.
//! let spread = MetricGenerator::generate(19.3, MetricKind::Spread, 0.03, &mut rng);
//! assert_eq!(spread, 19.3);
//! ```

use rand::SeedableRng;
use rand::distr::{Distribution, StandardUniform};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Source of uniform samples in `[0, 1)`.
pub trait RandomSource: Send + fmt::Debug {
    /// Returns the next sample in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Returns true with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_unit() < p
    }

    /// Returns an integer in `low..=high`.
    fn int_inclusive(&mut self, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        let span = f64::from(high - low + 1);
        let offset = (self.next_unit() * span).floor() as u32;
        low + offset.min(high - low)
    }
}

/// [`RandomSource`] backed by [`StdRng`].
#[derive(Debug)]
pub struct StdRandomSource {
    rng: StdRng,
}

impl StdRandomSource {
    /// Creates a source with a fixed seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Creates a source seeded from the thread-local generator.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }
}

impl RandomSource for StdRandomSource {
    fn next_unit(&mut self) -> f64 {
        StandardUniform.sample(&mut self.rng)
    }
}

/// [`RandomSource`] that replays a fixed sequence, cycling when exhausted.
///
/// Values are clamped into `[0, 1)`. An empty sequence always yields `0.5`.
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceRandom {
    /// Creates a source replaying `values`.
    #[must_use]
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0 }
    }

    /// Creates a source that always yields `value`.
    #[must_use]
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for SequenceRandom {
    fn next_unit(&mut self) -> f64 {
        let Some(value) = self.values.get(self.cursor % self.values.len().max(1)).copied() else {
            return 0.5;
        };
        self.cursor = self.cursor.wrapping_add(1);
        value.clamp(0.0, 1.0 - f64::EPSILON)
    }
}

/// Sign bias and scale of a variation draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VariationShape {
    /// Uniform in `[-volatility * scale, volatility * scale)`.
    Symmetric {
        /// Damping factor applied to the volatility.
        scale: f64,
    },
    /// Uniform in `[0, volatility * scale)`.
    NonNegative {
        /// Damping factor applied to the volatility.
        scale: f64,
    },
    /// Uniform in `(-volatility * scale, 0]`.
    NonPositive {
        /// Damping factor applied to the volatility.
        scale: f64,
    },
}

impl VariationShape {
    /// Maps a uniform sample `u` in `[0, 1)` to a relative variation.
    #[must_use]
    pub fn variation(self, volatility: f64, u: f64) -> f64 {
        let volatility = volatility.abs();
        match self {
            Self::Symmetric { scale } => (u - 0.5) * 2.0 * volatility * scale,
            Self::NonNegative { scale } => u * volatility * scale,
            Self::NonPositive { scale } => -u * volatility * scale,
        }
    }
}

/// Metric type tag selecting a variation shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricKind {
    /// Quoted pair count.
    Pairs,
    /// Average spread.
    Spread,
    /// Traded volume, never decreases.
    Volume,
    /// Inventory.
    Inventory,
    /// Profit and loss.
    Pnl,
    /// Uptime, never increases.
    Uptime,
    /// Latency.
    Latency,
    /// Execution speed.
    ExecutionSpeed,
    /// Success rate, never increases.
    SuccessRate,
    /// Volume capacity.
    VolumeCapacity,
    /// Trade-tape counts.
    Trades,
    /// Fallback for unknown tags.
    Generic,
}

impl MetricKind {
    /// Returns the variation shape for this kind.
    #[must_use]
    pub const fn shape(self) -> VariationShape {
        match self {
            Self::Pairs => VariationShape::Symmetric { scale: 0.1 },
            Self::Spread | Self::Pnl | Self::Trades | Self::Generic => {
                VariationShape::Symmetric { scale: 1.0 }
            }
            Self::Volume => VariationShape::NonNegative { scale: 0.3 },
            Self::Inventory => VariationShape::Symmetric { scale: 0.4 },
            Self::Uptime => VariationShape::NonPositive { scale: 0.05 },
            Self::Latency | Self::VolumeCapacity => VariationShape::Symmetric { scale: 0.2 },
            Self::ExecutionSpeed => VariationShape::Symmetric { scale: 0.3 },
            Self::SuccessRate => VariationShape::NonPositive { scale: 0.1 },
        }
    }

    /// Returns the per-tick volatility used by the rating engine.
    #[must_use]
    pub const fn default_volatility(self) -> f64 {
        match self {
            Self::Pairs | Self::Latency | Self::VolumeCapacity => 0.01,
            Self::Spread => 0.03,
            Self::Volume | Self::Inventory | Self::ExecutionSpeed => 0.02,
            Self::Pnl | Self::Trades => 0.08,
            Self::Uptime => 0.001,
            Self::SuccessRate => 0.002,
            Self::Generic => 0.05,
        }
    }

    /// Parses a tag, falling back to [`MetricKind::Generic`] for unknown tags.
    #[must_use]
    pub fn parse_or_default(tag: &str) -> Self {
        match tag {
            "pairs" => Self::Pairs,
            "spread" => Self::Spread,
            "volume" => Self::Volume,
            "inventory" => Self::Inventory,
            "pnl" => Self::Pnl,
            "uptime" => Self::Uptime,
            "latency" => Self::Latency,
            "executionSpeed" => Self::ExecutionSpeed,
            "successRate" => Self::SuccessRate,
            "volumeCapacity" => Self::VolumeCapacity,
            "trades" => Self::Trades,
            other => {
                tracing::debug!(tag = other, "unknown metric tag, using generic variation");
                Self::Generic
            }
        }
    }
}

/// Stateless metric generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricGenerator;

impl MetricGenerator {
    /// Returns `baseline * (1 + variation)` for one random draw.
    ///
    /// For a non-negative baseline, [`MetricKind::Volume`] never returns less
    /// than the baseline, and [`MetricKind::Uptime`] and
    /// [`MetricKind::SuccessRate`] never return more.
    #[must_use]
    pub fn generate(
        baseline: f64,
        kind: MetricKind,
        volatility: f64,
        rng: &mut dyn RandomSource,
    ) -> f64 {
        let variation = kind.shape().variation(volatility, rng.next_unit());
        baseline * (1.0 + variation)
    }

    /// Like [`generate`](Self::generate) with the kind's default volatility.
    #[must_use]
    pub fn generate_default(baseline: f64, kind: MetricKind, rng: &mut dyn RandomSource) -> f64 {
        Self::generate(baseline, kind, kind.default_volatility(), rng)
    }
}

/// Rounds to `decimals` places for display.
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
