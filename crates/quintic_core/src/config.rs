use serde::{Deserialize, Serialize};

use crate::error::{IntegrationError, Result};
use crate::system::{DIMENSION, INITIAL_STATE};

/// Upper bound on the records a single run may emit.
pub const MAX_RECORDS: usize = 100_000_000;

/// Distance from `x` to the next representable value away from zero.
fn spacing(x: f64) -> f64 {
    let magnitude = x.abs();
    f64::from_bits(magnitude.to_bits() + 1) - magnitude
}

/// Interval, step and starting state of one integration run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntegrationConfig {
    pub initial_time: f64,
    pub final_time: f64,
    pub step_size: f64,
    pub initial_state: [f64; DIMENSION],
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            initial_time: 0.0,
            final_time: 5.0,
            step_size: 0.01,
            initial_state: INITIAL_STATE,
        }
    }
}

impl IntegrationConfig {
    pub fn with_step_size(self, step_size: f64) -> Self {
        Self { step_size, ..self }
    }

    pub fn with_interval(self, initial_time: f64, final_time: f64) -> Self {
        Self {
            initial_time,
            final_time,
            ..self
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.initial_time.is_finite() || !self.final_time.is_finite() {
            return Err(IntegrationError::InvalidConfig(format!(
                "interval bounds must be finite (got [{}, {}])",
                self.initial_time, self.final_time
            )));
        }
        if !self.step_size.is_finite() || self.step_size <= 0.0 {
            return Err(IntegrationError::InvalidConfig(format!(
                "step size must be positive and finite (got {})",
                self.step_size
            )));
        }
        if self.final_time < self.initial_time {
            return Err(IntegrationError::InvalidConfig(format!(
                "final time {} precedes initial time {}",
                self.final_time, self.initial_time
            )));
        }
        // Every time in the interval must move when the step is added,
        // otherwise the cursor stalls and the run never ends.
        let widest = spacing(self.initial_time).max(spacing(self.final_time));
        if self.step_size < widest {
            return Err(IntegrationError::InvalidConfig(format!(
                "step size {} is below the floating-point spacing {} of the interval [{}, {}]",
                self.step_size, widest, self.initial_time, self.final_time
            )));
        }
        let steps = (self.final_time - self.initial_time) / self.step_size;
        if steps >= MAX_RECORDS as f64 {
            return Err(IntegrationError::InvalidConfig(format!(
                "run would emit about {steps:.0} records, limit is {MAX_RECORDS}"
            )));
        }
        if self.initial_state.iter().any(|v| !v.is_finite()) {
            return Err(IntegrationError::InvalidConfig(
                "initial state must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of records a run emits, initial condition included.
    /// Floating-point accumulation of the time cursor can shift this by one
    /// for step sizes that are not exactly representable.
    pub fn expected_records(&self) -> usize {
        ((self.final_time - self.initial_time) / self.step_size + 1e-9).floor() as usize + 1
    }
}
