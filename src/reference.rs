//! Power reference table: for each configured aperture, which power levels
//! correctly reach each of a fixed set of distances. This is pure data for a
//! presentation layer to render; no colors or layout live here.

use crate::config::Configuration;
use crate::error::Error;
use crate::solver::{self, PowerLevel};

/// Fixed distance columns of the reference table, in meters. Columns outside
/// the configured [min-distance, max-distance] window are filtered out.
pub const REFERENCE_DISTANCES: [f64; 9] = [0.9, 1.3, 1.8, 2.5, 3.5, 5.0, 10.0, 20.0, 30.0];

/// Feasibility result for one (distance, aperture) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceCell {
    pub distance: f64,
    /// Power levels whose reach falls within the solver's tolerance band,
    /// in enumeration order. May be empty.
    pub powers: Vec<PowerLevel>,
}

/// One table row: a configured aperture and its cells across all visible
/// distances.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceRow {
    pub aperture: f64,
    pub cells: Vec<ReferenceCell>,
}

/// Build the table: one row per configured aperture (ascending), one cell per
/// distance within the configured window. Either axis may come out empty when
/// the configuration excludes everything.
pub fn build_grid(config: &Configuration, effective_iso: u32) -> Result<Vec<ReferenceRow>, Error> {
    let mut apertures = config.available_apertures.clone();
    apertures.sort_by(f64::total_cmp);

    let distances: Vec<f64> = REFERENCE_DISTANCES
        .iter()
        .copied()
        .filter(|d| *d >= config.min_distance && *d <= config.max_distance)
        .collect();

    let mut rows = Vec::with_capacity(apertures.len());
    for aperture in apertures {
        let mut cells = Vec::with_capacity(distances.len());
        for &distance in &distances {
            let powers = solver::get_viable_powers(
                distance,
                aperture,
                config.guide_number,
                effective_iso,
            )?;
            cells.push(ReferenceCell { distance, powers });
        }
        rows.push(ReferenceRow { aperture, cells });
    }
    Ok(rows)
}
