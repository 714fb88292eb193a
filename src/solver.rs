//! Flash-exposure solution search and ranking.
//!
//! Everything here follows the guide-number law: the effective reach of the
//! flash is `guide-number × sqrt(ISO / 100) × sqrt(power)`, and aperture and
//! distance trade off against each other as `reach = f-number × distance`.
//! The solver is pure; callers own the configuration and recompute on every
//! call.

use std::cmp::Ordering;
use std::fmt;

use tracing::debug;

use crate::config::{Configuration, PriorityWeights};
use crate::error::Error;

/// Scale (in f-stops) normalizing the depth-of-field term of the ranking
/// score. Empirically spans the plausible aperture range; fixed, not
/// user-configurable.
const DOF_SCORE_SCALE: f64 = 15.0;

/// Scale (in meters) normalizing the distance-accuracy term of the ranking
/// score. The term is clamped to [-1, 1] so outlier errors cannot dominate.
const ACCURACY_SCORE_SCALE_M: f64 = 2.0;

/// Symmetric relative tolerance for the reference-table feasibility test.
const DISTANCE_TOLERANCE: f64 = 0.15;

/// Ranked shortlists never exceed this many entries.
pub const MAX_SOLUTIONS: usize = 6;

/// Discrete flash power levels, full power first, each step halving output.
/// The set is closed; the solver always iterates it in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerLevel {
    Full,
    Half,
    Quarter,
    Eighth,
    Sixteenth,
    ThirtySecond,
    SixtyFourth,
    OneTwentyEighth,
}

impl PowerLevel {
    pub const ALL: [Self; 8] = [
        Self::Full,
        Self::Half,
        Self::Quarter,
        Self::Eighth,
        Self::Sixteenth,
        Self::ThirtySecond,
        Self::SixtyFourth,
        Self::OneTwentyEighth,
    ];

    /// Fraction of full output this level emits.
    pub const fn multiplier(self) -> f64 {
        match self {
            Self::Full => 1.0,
            Self::Half => 0.5,
            Self::Quarter => 0.25,
            Self::Eighth => 0.125,
            Self::Sixteenth => 0.0625,
            Self::ThirtySecond => 0.03125,
            Self::SixtyFourth => 0.015625,
            Self::OneTwentyEighth => 0.0078125,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Full => "1/1",
            Self::Half => "1/2",
            Self::Quarter => "1/4",
            Self::Eighth => "1/8",
            Self::Sixteenth => "1/16",
            Self::ThirtySecond => "1/32",
            Self::SixtyFourth => "1/64",
            Self::OneTwentyEighth => "1/128",
        }
    }
}

impl fmt::Display for PowerLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One viable (power, aperture) pairing for a target distance.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub power: PowerLevel,
    /// Quantized f-number, always drawn from the configured aperture set.
    pub aperture: f64,
    /// Exact f-number the guide-number law asks for, before quantization.
    pub required_aperture: f64,
    /// Distance correctly exposed at the quantized aperture.
    pub actual_distance: f64,
    /// `|actual_distance - target_distance|`, never negative.
    pub distance_error: f64,
    pub power_multiplier: f64,
    /// Monotonic proxy for depth of field: equal to the quantized f-number.
    pub depth_of_field: f64,
}

/// Effective flash reach at the given ISO and power level, in the same unit
/// as the guide number.
pub fn effective_guide_number(guide_number: f64, iso: u32, power: PowerLevel) -> f64 {
    guide_number * (f64::from(iso) / 100.0).sqrt() * power.multiplier().sqrt()
}

/// F-number needed to correctly expose a subject at `distance`.
pub fn required_aperture(distance: f64, guide_number: f64, iso: u32, power: PowerLevel) -> f64 {
    effective_guide_number(guide_number, iso, power) / distance
}

/// How far the flash correctly reaches at the given f-number.
pub fn achievable_distance(aperture: f64, guide_number: f64, iso: u32, power: PowerLevel) -> f64 {
    effective_guide_number(guide_number, iso, power) / aperture
}

/// Enumerate, score, and rank (power, aperture) pairings for a target
/// distance. At most [`MAX_SOLUTIONS`] entries come back, best first, one per
/// power level. An empty list is a normal result, not an error.
pub fn find_viable_solutions(
    target_distance: f64,
    config: &Configuration,
    effective_iso: u32,
) -> Result<Vec<Solution>, Error> {
    if !(target_distance.is_finite() && target_distance > 0.0) {
        return Err(Error::InvalidDistance(target_distance));
    }
    if !(config.guide_number.is_finite() && config.guide_number > 0.0) {
        return Err(Error::InvalidGuideNumber(config.guide_number));
    }
    if effective_iso == 0 {
        return Err(Error::InvalidIso(effective_iso));
    }
    if config.available_apertures.is_empty() {
        return Err(Error::NoApertures);
    }

    let mut solutions = Vec::with_capacity(PowerLevel::ALL.len());
    for power in PowerLevel::ALL {
        let power_multiplier = power.multiplier();
        if config.battery_saving_mode && power_multiplier > 0.5 {
            continue;
        }

        let required =
            required_aperture(target_distance, config.guide_number, effective_iso, power);
        let aperture = nearest_aperture(&config.available_apertures, required);
        // Re-derive reach from the quantized aperture, not the exact requirement.
        let actual = achievable_distance(aperture, config.guide_number, effective_iso, power);

        solutions.push(Solution {
            power,
            aperture,
            required_aperture: required,
            actual_distance: actual,
            distance_error: (actual - target_distance).abs(),
            power_multiplier,
            depth_of_field: aperture,
        });
    }

    let weights = config.priority_weights;
    solutions.sort_by(|a, b| compare_solutions(a, b, &weights));
    solutions.truncate(MAX_SOLUTIONS);
    debug!(
        target_distance,
        iso = effective_iso,
        count = solutions.len(),
        "ranked flash solutions"
    );
    Ok(solutions)
}

/// Which power levels correctly reach `distance` at a fixed f-number, within
/// a ±15% relative band. Pure range test over the whole enumeration: zero,
/// one, or many levels may qualify, returned in enumeration order with no
/// scoring or truncation.
pub fn get_viable_powers(
    distance: f64,
    aperture: f64,
    guide_number: f64,
    effective_iso: u32,
) -> Result<Vec<PowerLevel>, Error> {
    viable_powers_with_tolerance(
        distance,
        aperture,
        guide_number,
        effective_iso,
        DISTANCE_TOLERANCE,
    )
}

fn viable_powers_with_tolerance(
    distance: f64,
    aperture: f64,
    guide_number: f64,
    effective_iso: u32,
    tolerance: f64,
) -> Result<Vec<PowerLevel>, Error> {
    if !(distance.is_finite() && distance > 0.0) {
        return Err(Error::InvalidDistance(distance));
    }
    if !(aperture.is_finite() && aperture > 0.0) {
        return Err(Error::InvalidAperture(aperture));
    }
    if !(guide_number.is_finite() && guide_number > 0.0) {
        return Err(Error::InvalidGuideNumber(guide_number));
    }
    if effective_iso == 0 {
        return Err(Error::InvalidIso(effective_iso));
    }

    let mut viable = Vec::new();
    for power in PowerLevel::ALL {
        let reach = achievable_distance(aperture, guide_number, effective_iso, power);
        if reach >= distance * (1.0 - tolerance) && reach <= distance * (1.0 + tolerance) {
            viable.push(power);
        }
    }
    Ok(viable)
}

/// Nearest available f-stop to the exact requirement. Exact ties go to the
/// smaller f-number, so quantization stays deterministic regardless of the
/// order apertures were configured in.
fn nearest_aperture(available: &[f64], required: f64) -> f64 {
    let mut best = available[0];
    let mut best_delta = (best - required).abs();
    for &candidate in &available[1..] {
        let delta = (candidate - required).abs();
        if delta < best_delta || (delta == best_delta && candidate < best) {
            best = candidate;
            best_delta = delta;
        }
    }
    best
}

/// Weighted three-term preference comparison. The clamp on the accuracy term
/// means this is a heuristic, not a metric, and can be non-transitive for
/// extreme weight combinations; it is only ever used with a stable sort and
/// an explicit tie-break (deeper depth of field first).
fn compare_solutions(a: &Solution, b: &Solution, weights: &PriorityWeights) -> Ordering {
    let efficiency = (a.power_multiplier - b.power_multiplier) * weights.efficiency;
    let depth = ((b.depth_of_field - a.depth_of_field) / DOF_SCORE_SCALE) * weights.depth_of_field;
    let accuracy = ((a.distance_error - b.distance_error) / ACCURACY_SCORE_SCALE_M)
        .clamp(-1.0, 1.0)
        * weights.accuracy;

    let score = efficiency + depth + accuracy;
    if score < 0.0 {
        Ordering::Less
    } else if score > 0.0 {
        Ordering::Greater
    } else {
        b.aperture.total_cmp(&a.aperture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_levels_halve_in_enumeration_order() {
        for pair in PowerLevel::ALL.windows(2) {
            assert!((pair[1].multiplier() - pair[0].multiplier() / 2.0).abs() < 1e-12);
        }
        assert_eq!(PowerLevel::ALL[0].multiplier(), 1.0);
        assert_eq!(PowerLevel::ALL[7].multiplier(), 1.0 / 128.0);
    }

    #[test]
    fn nearest_aperture_prefers_smaller_f_number_on_exact_tie() {
        // 6.0 is equidistant from 4 and 8.
        assert_eq!(nearest_aperture(&[4.0, 8.0], 6.0), 4.0);
        assert_eq!(nearest_aperture(&[8.0, 4.0], 6.0), 4.0);
    }

    #[test]
    fn nearest_aperture_picks_minimum_absolute_difference() {
        let stops = [2.0, 2.8, 4.0, 5.6, 8.0];
        assert_eq!(nearest_aperture(&stops, 4.7), 4.0);
        assert_eq!(nearest_aperture(&stops, 4.9), 5.6);
        assert_eq!(nearest_aperture(&stops, 100.0), 8.0);
        assert_eq!(nearest_aperture(&stops, 0.1), 2.0);
    }

    #[test]
    fn zero_weights_fall_through_to_descending_aperture() {
        let weights = PriorityWeights {
            efficiency: 0.0,
            depth_of_field: 0.0,
            accuracy: 0.0,
        };
        let mk = |power: PowerLevel, aperture: f64| Solution {
            power,
            aperture,
            required_aperture: aperture,
            actual_distance: 2.0,
            distance_error: 0.0,
            power_multiplier: power.multiplier(),
            depth_of_field: aperture,
        };
        let a = mk(PowerLevel::Full, 4.0);
        let b = mk(PowerLevel::Half, 8.0);
        assert_eq!(compare_solutions(&a, &b, &weights), Ordering::Greater);
        assert_eq!(compare_solutions(&b, &a, &weights), Ordering::Less);
    }

    #[test]
    fn widening_the_tolerance_never_removes_a_power() {
        let narrow = viable_powers_with_tolerance(4.0, 5.6, 30.0, 400, 0.15).unwrap();
        let wide = viable_powers_with_tolerance(4.0, 5.6, 30.0, 400, 0.30).unwrap();
        let wider = viable_powers_with_tolerance(4.0, 5.6, 30.0, 400, 0.60).unwrap();
        assert!(narrow.iter().all(|p| wide.contains(p)));
        assert!(wide.iter().all(|p| wider.contains(p)));
    }

    #[test]
    fn viable_powers_preserve_enumeration_order() {
        // A band this wide admits several adjacent levels; they must come
        // back full power first.
        let powers = viable_powers_with_tolerance(5.0, 8.0, 30.0, 400, 0.60).unwrap();
        assert!(powers.len() > 1);
        let positions: Vec<usize> = powers
            .iter()
            .map(|p| PowerLevel::ALL.iter().position(|q| q == p).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}
