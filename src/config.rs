use std::path::Path;

use anyhow::{Result, ensure};
use serde::Deserialize;

use crate::error::Error;

/// Weights steering the solution ranking. Each weight is intended to lie in
/// [0, 1]; the solver does not clamp them.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PriorityWeights {
    /// Favor lower power consumption.
    pub efficiency: f64,
    /// Favor larger f-numbers (deeper depth of field).
    pub depth_of_field: f64,
    /// Favor smaller distance error.
    pub accuracy: f64,
}

impl PriorityWeights {
    const fn default_efficiency() -> f64 {
        0.7
    }

    const fn default_depth_of_field() -> f64 {
        0.5
    }

    const fn default_accuracy() -> f64 {
        0.3
    }
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            efficiency: Self::default_efficiency(),
            depth_of_field: Self::default_depth_of_field(),
            accuracy: Self::default_accuracy(),
        }
    }
}

/// Digital bodies pick an ISO per shot; analog bodies are committed to the
/// speed of the loaded film.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PhotographyMode {
    Digital,
    Analog,
}

impl Default for PhotographyMode {
    fn default() -> Self {
        Self::Digital
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Configuration {
    /// Flash guide number at ISO 100, full power, in meters.
    pub guide_number: f64,
    /// ISO values offered to the digital-mode picker.
    pub available_isos: Vec<u32>,
    /// F-numbers the photographer can actually set, conventionally ascending.
    pub available_apertures: Vec<f64>,
    /// Lower bound of the reference-table distance rows, in meters.
    pub min_distance: f64,
    /// Upper bound of the reference-table distance rows, in meters.
    pub max_distance: f64,
    /// Ranking weights for the solution search.
    pub priority_weights: PriorityWeights,
    /// When set, power levels above half power are never recommended.
    pub battery_saving_mode: bool,
    /// How the effective ISO is resolved.
    pub photography_mode: PhotographyMode,
    /// ISO used in analog mode.
    pub fixed_iso: u32,
}

impl Configuration {
    const fn default_guide_number() -> f64 {
        30.0
    }

    fn default_available_isos() -> Vec<u32> {
        vec![100, 160, 200, 400, 800, 1600]
    }

    fn default_available_apertures() -> Vec<f64> {
        vec![2.0, 2.8, 4.0, 5.6, 8.0, 11.0, 16.0]
    }

    const fn default_min_distance() -> f64 {
        0.6
    }

    const fn default_max_distance() -> f64 {
        5.0
    }

    const fn default_fixed_iso() -> u32 {
        400
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let s = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&s)?)
    }

    /// Validate runtime invariants that cannot be expressed via serde defaults alone.
    pub fn validated(self) -> Result<Self> {
        ensure!(
            self.guide_number.is_finite() && self.guide_number > 0.0,
            "guide-number must be positive"
        );
        ensure!(
            !self.available_apertures.is_empty(),
            "available-apertures must list at least one f-number"
        );
        ensure!(
            self.available_apertures
                .iter()
                .all(|f| f.is_finite() && *f > 0.0),
            "available-apertures must all be positive f-numbers"
        );
        ensure!(
            !self.available_isos.is_empty(),
            "available-isos must list at least one ISO"
        );
        ensure!(
            self.available_isos.iter().all(|iso| *iso > 0),
            "available-isos must all be positive"
        );
        ensure!(self.fixed_iso > 0, "fixed-iso must be positive");
        ensure!(
            self.min_distance.is_finite() && self.min_distance > 0.0,
            "min-distance must be positive"
        );
        ensure!(
            self.max_distance.is_finite() && self.max_distance > self.min_distance,
            "max-distance must exceed min-distance"
        );
        ensure!(
            self.priority_weights.efficiency.is_finite()
                && self.priority_weights.depth_of_field.is_finite()
                && self.priority_weights.accuracy.is_finite(),
            "priority-weights must be finite"
        );
        Ok(self)
    }

    /// Resolve the ISO the solver should use. Analog mode always shoots at the
    /// fixed film speed; digital mode takes the caller's selection, falling
    /// back to the first configured ISO.
    pub fn effective_iso(&self, selected: Option<u32>) -> u32 {
        match self.photography_mode {
            PhotographyMode::Analog => self.fixed_iso,
            PhotographyMode::Digital => selected
                .or_else(|| self.available_isos.first().copied())
                .unwrap_or(100),
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            guide_number: Self::default_guide_number(),
            available_isos: Self::default_available_isos(),
            available_apertures: Self::default_available_apertures(),
            min_distance: Self::default_min_distance(),
            max_distance: Self::default_max_distance(),
            priority_weights: PriorityWeights::default(),
            battery_saving_mode: false,
            photography_mode: PhotographyMode::default(),
            fixed_iso: Self::default_fixed_iso(),
        }
    }
}
