//! Scorecard value type
//!
//! Four dimensions in [0, 1]. A scorecard is never mutated in place:
//! applying a delta produces a new, clamped value.

use serde::{Deserialize, Serialize};

/// Clamp into [0, 1]; NaN collapses to 0.
#[inline]
fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Cost/risk profile of a scenario
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawScorecard")]
pub struct Scorecard {
    complexity: f64,
    initial_effort: f64,
    perceived_risk: f64,
    time_to_value: f64,
}

#[derive(Deserialize)]
struct RawScorecard {
    complexity: f64,
    initial_effort: f64,
    perceived_risk: f64,
    time_to_value: f64,
}

impl From<RawScorecard> for Scorecard {
    fn from(raw: RawScorecard) -> Self {
        Scorecard::new(
            raw.complexity,
            raw.initial_effort,
            raw.perceived_risk,
            raw.time_to_value,
        )
    }
}

impl Scorecard {
    /// Create a scorecard, clamping every dimension into [0, 1]
    #[inline]
    #[must_use]
    pub fn new(complexity: f64, initial_effort: f64, perceived_risk: f64, time_to_value: f64) -> Self {
        Self {
            complexity: clamp_unit(complexity),
            initial_effort: clamp_unit(initial_effort),
            perceived_risk: clamp_unit(perceived_risk),
            time_to_value: clamp_unit(time_to_value),
        }
    }

    /// Complexity dimension
    #[inline]
    #[must_use]
    pub fn complexity(&self) -> f64 {
        self.complexity
    }

    /// Initial effort dimension
    #[inline]
    #[must_use]
    pub fn initial_effort(&self) -> f64 {
        self.initial_effort
    }

    /// Perceived risk dimension
    #[inline]
    #[must_use]
    pub fn perceived_risk(&self) -> f64 {
        self.perceived_risk
    }

    /// Time-to-value dimension
    #[inline]
    #[must_use]
    pub fn time_to_value(&self) -> f64 {
        self.time_to_value
    }

    /// Sum of all four dimensions; lower is cheaper
    #[inline]
    #[must_use]
    pub fn cost(&self) -> f64 {
        self.complexity + self.initial_effort + self.perceived_risk + self.time_to_value
    }

    /// Produce the child scorecard for a delta (additive, then clamped).
    ///
    /// Missing or NaN delta components leave the dimension unchanged.
    #[must_use]
    pub fn apply(&self, delta: &ScorecardDelta) -> Scorecard {
        let shift = |value: f64, d: Option<f64>| match d {
            Some(d) if !d.is_nan() => value + d,
            _ => value,
        };

        Scorecard::new(
            shift(self.complexity, delta.complexity),
            shift(self.initial_effort, delta.initial_effort),
            shift(self.perceived_risk, delta.perceived_risk),
            shift(self.time_to_value, delta.time_to_value),
        )
    }

    /// Raw bit patterns, for hashing and cache keys
    #[must_use]
    pub fn to_bits(&self) -> [u64; 4] {
        [
            self.complexity.to_bits(),
            self.initial_effort.to_bits(),
            self.perceived_risk.to_bits(),
            self.time_to_value.to_bits(),
        ]
    }
}

impl Default for Scorecard {
    fn default() -> Self {
        Self::new(0.5, 0.5, 0.5, 0.5)
    }
}

/// Partial scorecard: per-dimension shifts proposed by an action
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScorecardDelta {
    /// Shift applied to complexity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<f64>,
    /// Shift applied to initial effort
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_effort: Option<f64>,
    /// Shift applied to perceived risk
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perceived_risk: Option<f64>,
    /// Shift applied to time-to-value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_to_value: Option<f64>,
}

impl ScorecardDelta {
    /// Empty delta
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With complexity shift
    #[inline]
    #[must_use]
    pub fn with_complexity(mut self, d: f64) -> Self {
        self.complexity = Some(d);
        self
    }

    /// With initial effort shift
    #[inline]
    #[must_use]
    pub fn with_initial_effort(mut self, d: f64) -> Self {
        self.initial_effort = Some(d);
        self
    }

    /// With perceived risk shift
    #[inline]
    #[must_use]
    pub fn with_perceived_risk(mut self, d: f64) -> Self {
        self.perceived_risk = Some(d);
        self
    }

    /// With time-to-value shift
    #[inline]
    #[must_use]
    pub fn with_time_to_value(mut self, d: f64) -> Self {
        self.time_to_value = Some(d);
        self
    }

    /// Whether no dimension is touched
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components().iter().all(Option::is_none)
    }

    /// Components in dimension order
    #[inline]
    #[must_use]
    pub fn components(&self) -> [Option<f64>; 4] {
        [
            self.complexity,
            self.initial_effort,
            self.perceived_risk,
            self.time_to_value,
        ]
    }
}
