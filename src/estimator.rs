//! The power-law price estimator.
//!
//! `PowerLawEstimator` owns the observation set. Everything derived from it
//! (the fitted model, estimates, curve samples) is recomputed on each request
//! from the full set and never cached, so the model can never drift from the
//! data.
//!
//! The estimator does no locking. Callers that share one across threads must
//! serialize access themselves (e.g. `Mutex<PowerLawEstimator>`).

use tracing::debug;

use crate::domain::{EstimatorState, Field, FittedModel, Observation, validate_positive};
use crate::error::EstimateError;
use crate::fit::{fit_power_law, price_space_r_squared};
use crate::models::sample_curve;

#[derive(Debug, Clone, Default)]
pub struct PowerLawEstimator {
    observations: Vec<Observation>,
}

impl PowerLawEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an observation. Rejected input leaves the set untouched.
    pub fn add(&mut self, quantity: f64, price: f64) -> Result<(), EstimateError> {
        let observation = Observation::new(quantity, price)?;
        self.push(observation);
        Ok(())
    }

    /// Append an observation. [`Observation`] can only be built validated, so
    /// this cannot fail.
    pub fn push(&mut self, observation: Observation) {
        self.observations.push(observation);
        debug!(
            quantity = observation.quantity(),
            price = observation.price(),
            n = self.observations.len(),
            "observation added"
        );
    }

    /// Fit the power law to every observation currently held.
    pub fn fit(&self) -> Result<FittedModel, EstimateError> {
        fit_power_law(&self.observations)
    }

    /// Estimate the price at `quantity` from a fresh fit.
    ///
    /// Extrapolation outside the observed quantity range is allowed.
    pub fn estimate(&self, quantity: f64) -> Result<f64, EstimateError> {
        let quantity = validate_positive(Field::Quantity, quantity)?;
        let model = self.fit()?;
        representable(model.predict(quantity))
    }

    /// `n` evenly spaced points of the fitted curve between the smallest and
    /// largest observed quantity, both included.
    pub fn curve_samples(&self, n: usize) -> Result<Vec<(f64, f64)>, EstimateError> {
        let model = self.fit()?;
        // A successful fit implies at least two distinct quantities.
        let (q_min, q_max) = self
            .quantity_range()
            .ok_or(EstimateError::InsufficientData { have: self.len() })?;
        let samples = sample_curve(&model, q_min, q_max, n);
        for &(_, price) in &samples {
            representable(price)?;
        }
        Ok(samples)
    }

    /// Optional R² measured on raw prices rather than in log-space.
    pub fn price_space_r_squared(&self) -> Result<Option<f64>, EstimateError> {
        let model = self.fit()?;
        Ok(price_space_r_squared(&model, &self.observations))
    }

    /// Drop every observation.
    pub fn reset(&mut self) {
        if !self.observations.is_empty() {
            debug!(n = self.observations.len(), "observations cleared");
        }
        self.observations.clear();
    }

    /// Observations in insertion order.
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn state(&self) -> EstimatorState {
        EstimatorState::from_count(self.observations.len())
    }

    /// Smallest and largest observed quantity, or `None` when empty.
    pub fn quantity_range(&self) -> Option<(f64, f64)> {
        let mut iter = self.observations.iter().map(|o| o.quantity());
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), q| (lo.min(q), hi.max(q))))
    }
}

/// A model price must be a finite positive number like any observed price.
fn representable(price: f64) -> Result<f64, EstimateError> {
    if price.is_finite() && price > 0.0 {
        Ok(price)
    } else {
        Err(EstimateError::DegenerateFit)
    }
}

impl Extend<Observation> for PowerLawEstimator {
    fn extend<I: IntoIterator<Item = Observation>>(&mut self, iter: I) {
        for observation in iter {
            self.push(observation);
        }
    }
}

impl FromIterator<Observation> for PowerLawEstimator {
    fn from_iter<I: IntoIterator<Item = Observation>>(iter: I) -> Self {
        Self {
            observations: iter.into_iter().collect(),
        }
    }
}
