//! Estimator configuration.

use crate::domain::CrowdLevel;

/// Error returned for a speed that cannot be divided by.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid speed for {level} crowd: {value} (must be finite and positive)")]
pub struct InvalidSpeed {
    pub level: CrowdLevel,
    pub value: f64,
}

/// Average travel speed per crowd level, in metres per minute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedTable {
    low: f64,
    medium: f64,
    high: f64,
}

impl SpeedTable {
    /// Create a table, rejecting zero, negative or non-finite speeds.
    pub fn new(low: f64, medium: f64, high: f64) -> Result<Self, InvalidSpeed> {
        for (level, value) in [
            (CrowdLevel::Low, low),
            (CrowdLevel::Medium, medium),
            (CrowdLevel::High, high),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(InvalidSpeed { level, value });
            }
        }
        Ok(Self { low, medium, high })
    }

    /// Speed for a crowd level, in metres per minute.
    pub fn speed_for(&self, level: CrowdLevel) -> f64 {
        match level {
            CrowdLevel::Low => self.low,
            CrowdLevel::Medium => self.medium,
            CrowdLevel::High => self.high,
        }
    }

    /// Minutes to cover `distance_m` at the speed for `level`.
    pub fn minutes_for(&self, distance_m: f64, level: CrowdLevel) -> f64 {
        distance_m / self.speed_for(level)
    }
}

impl Default for SpeedTable {
    fn default() -> Self {
        Self {
            low: 60.0,
            medium: 50.0,
            high: 40.0,
        }
    }
}

/// How a route's vehicle is chosen from its fixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VehicleSelection {
    /// Only fixes between the route's first waypoint and the stop are
    /// candidates. A route with none contributes no estimate.
    #[default]
    AdmissibleOnly,

    /// The first fix is the default candidate and is kept unless an
    /// admissible fix is strictly closer to the first waypoint.
    FallbackToFirst,
}

/// Configuration parameters for arrival estimation.
#[derive(Debug, Clone)]
pub struct EstimatorConfig {
    /// Speed per crowd level.
    pub speeds: SpeedTable,

    /// Vehicle selection policy.
    pub selection: VehicleSelection,

    /// Maximum number of routes whose fixes are fetched concurrently.
    pub batch_size: usize,
}

impl EstimatorConfig {
    pub fn new(speeds: SpeedTable, selection: VehicleSelection, batch_size: usize) -> Self {
        Self {
            speeds,
            selection,
            batch_size,
        }
    }

    /// Batch size, never zero.
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.max(1)
    }
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            speeds: SpeedTable::default(),
            selection: VehicleSelection::default(),
            batch_size: 8,
        }
    }
}
