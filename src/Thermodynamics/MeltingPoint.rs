//! # Melting point as the crossing of two sampled Gibbs energy curves
//!
//! The solid and liquid curves are sampled independently. Three ways to find where they meet:
//! - `FirstMatch`: first temperature (in solid insertion order) present in both curves with
//!   |Gs - Gl| below the tolerance
//! - `ClosestMatch`: the shared temperature with the smallest |Gs - Gl| below the tolerance
//! - `Interpolated`: liquid curve interpolated at the solid samples, the first sign change of
//!   Gs - Gl is located by linear interpolation. Needs no shared keys.
//!
//! "Not found" is a normal outcome and is returned as `None`.
use crate::Thermodynamics::PhaseCurve::PhaseCurve;
use crate::Thermodynamics::gibbs_error::GibbsError;
use crate::Thermodynamics::sampled_curve::{SampledCurve, interpolate_sorted};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// default |Gs - Gl| tolerance, J/mol
pub const MELTING_TOLERANCE: f64 = 0.01;
const MAX_BISECTIONS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeltingPoint {
    /// K
    pub temperature: f64,
    /// Gibbs energy of the solid at the melting point, J/mol
    pub energy: f64,
}

impl fmt::Display for MeltingPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Melting Point: {} K", self.temperature)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CrossingStrategy {
    #[default]
    FirstMatch,
    ClosestMatch,
    Interpolated,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeltingPointFinder {
    pub tolerance: f64,
    pub strategy: CrossingStrategy,
}

impl Default for MeltingPointFinder {
    fn default() -> Self {
        Self {
            tolerance: MELTING_TOLERANCE,
            strategy: CrossingStrategy::FirstMatch,
        }
    }
}

/// first shared temperature where the two curves agree within `MELTING_TOLERANCE`
pub fn find_melting_point(solid: &SampledCurve, liquid: &SampledCurve) -> Option<MeltingPoint> {
    MeltingPointFinder::default().find(solid, liquid)
}

/// the phase with the lower Gibbs energy at t
pub fn stable_phase<'a>(
    solid: &'a PhaseCurve,
    liquid: &'a PhaseCurve,
    t: f64,
) -> Result<&'a PhaseCurve, GibbsError> {
    let g_solid = solid.gibbs_at(t).map_err(|e| e.in_phase(&solid.name))?;
    let g_liquid = liquid.gibbs_at(t).map_err(|e| e.in_phase(&liquid.name))?;
    Ok(if g_liquid < g_solid { liquid } else { solid })
}

impl MeltingPointFinder {
    pub fn new(strategy: CrossingStrategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn find(&self, solid: &SampledCurve, liquid: &SampledCurve) -> Option<MeltingPoint> {
        match self.strategy {
            CrossingStrategy::FirstMatch => self.first_match(solid, liquid),
            CrossingStrategy::ClosestMatch => self.closest_match(solid, liquid),
            CrossingStrategy::Interpolated => Self::interpolated(solid, liquid),
        }
    }
    /// shared keys under tolerance, in solid iteration order: (T, Gs, |Gs - Gl|)
    fn matches<'a>(
        &'a self,
        solid: &'a SampledCurve,
        liquid: &'a SampledCurve,
    ) -> impl Iterator<Item = (f64, f64, f64)> + 'a {
        solid.iter().filter_map(move |(t, g_solid)| {
            let g_liquid = liquid.get(t)?;
            let diff = (g_solid - g_liquid).abs();
            (diff < self.tolerance).then_some((t, g_solid, diff))
        })
    }

    fn first_match(&self, solid: &SampledCurve, liquid: &SampledCurve) -> Option<MeltingPoint> {
        self.matches(solid, liquid)
            .next()
            .map(|(temperature, energy, _)| MeltingPoint {
                temperature,
                energy,
            })
    }

    fn closest_match(&self, solid: &SampledCurve, liquid: &SampledCurve) -> Option<MeltingPoint> {
        self.matches(solid, liquid)
            .fold(None, |best: Option<(f64, f64, f64)>, candidate| match best {
                Some(b) if b.2 <= candidate.2 => Some(b),
                _ => Some(candidate),
            })
            .map(|(temperature, energy, _)| MeltingPoint {
                temperature,
                energy,
            })
    }

    fn interpolated(solid: &SampledCurve, liquid: &SampledCurve) -> Option<MeltingPoint> {
        let liquid_sorted = liquid.sorted_points();
        // (T, Gs, Gs - Gl) at every solid sample inside the liquid span
        let diffs: Vec<(f64, f64, f64)> = solid
            .sorted_points()
            .into_iter()
            .filter_map(|(t, g_solid)| {
                interpolate_sorted(&liquid_sorted, t)
                    .map(|g_liquid| (t, g_solid, g_solid - g_liquid))
            })
            .collect();

        for pair in diffs.windows(2) {
            let ((t0, g0, d0), (t1, g1, d1)) = (pair[0], pair[1]);
            if d0 == 0.0 || (t1 == t0 && d0 * d1 < 0.0) {
                return Some(MeltingPoint {
                    temperature: t0,
                    energy: g0,
                });
            }
            if d0 * d1 < 0.0 {
                let temperature = t0 + (t1 - t0) * d0 / (d0 - d1);
                let energy = g0 + (g1 - g0) * (temperature - t0) / (t1 - t0);
                return Some(MeltingPoint {
                    temperature,
                    energy,
                });
            }
        }
        match diffs.last() {
            Some(&(temperature, energy, d)) if d == 0.0 => Some(MeltingPoint {
                temperature,
                energy,
            }),
            _ => None,
        }
    }

    /// Bisection of Gs - Gl on the exact expressions in [guess - half_width, guess + half_width],
    /// clipped to the domain both phases cover. Without a sign change, or when the window runs
    /// into a gap between segments, the guess is returned.
    pub fn refine(
        &self,
        solid: &PhaseCurve,
        liquid: &PhaseCurve,
        guess: MeltingPoint,
        half_width: f64,
    ) -> Result<MeltingPoint, GibbsError> {
        match Self::bisect(solid, liquid, guess, half_width) {
            Err(e) if e.is_missing_segment() => {
                warn!("refinement of {} skipped: {}", guess, e);
                Ok(guess)
            }
            other => other,
        }
    }

    fn bisect(
        solid: &PhaseCurve,
        liquid: &PhaseCurve,
        guess: MeltingPoint,
        half_width: f64,
    ) -> Result<MeltingPoint, GibbsError> {
        let solid_span = solid
            .span()
            .ok_or_else(|| GibbsError::EmptyPhase(solid.name.clone()))?;
        let liquid_span = liquid
            .span()
            .ok_or_else(|| GibbsError::EmptyPhase(liquid.name.clone()))?;
        let mut lo = (guess.temperature - half_width)
            .max(solid_span.0)
            .max(liquid_span.0);
        let mut hi = (guess.temperature + half_width)
            .min(solid_span.1)
            .min(liquid_span.1);
        if lo >= hi {
            return Ok(guess);
        }
        let difference = |t: f64| -> Result<f64, GibbsError> {
            let g_solid = solid.gibbs_at(t).map_err(|e| e.in_phase(&solid.name))?;
            let g_liquid = liquid.gibbs_at(t).map_err(|e| e.in_phase(&liquid.name))?;
            Ok(g_solid - g_liquid)
        };
        let mut d_lo = difference(lo)?;
        let d_hi = difference(hi)?;
        if d_lo == 0.0 {
            hi = lo;
        } else if d_hi == 0.0 {
            lo = hi;
        } else if d_lo * d_hi > 0.0 {
            warn!(
                "no sign change of Gs - Gl between {} and {} K, keeping {}",
                lo, hi, guess
            );
            return Ok(guess);
        }
        for _ in 0..MAX_BISECTIONS {
            let mid = 0.5 * (lo + hi);
            if mid <= lo || mid >= hi {
                break;
            }
            let d_mid = difference(mid)?;
            if d_mid == 0.0 {
                lo = mid;
                hi = mid;
                break;
            }
            if d_mid * d_lo < 0.0 {
                hi = mid;
            } else {
                lo = mid;
                d_lo = d_mid;
            }
        }
        let temperature = 0.5 * (lo + hi);
        let energy = solid
            .gibbs_at(temperature)
            .map_err(|e| e.in_phase(&solid.name))?;
        info!(
            "melting point refined from {} K to {} K",
            guess.temperature, temperature
        );
        Ok(MeltingPoint {
            temperature,
            energy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Thermodynamics::energy_expression::FunctionExpression;
    use crate::Thermodynamics::temperature_range::TemperatureRange;
    use approx::assert_relative_eq;

    fn grid(n: usize) -> Vec<f64> {
        TemperatureRange::new(500.0, 1000.0, n).unwrap().to_vec()
    }
    /// A - B = 0.05*(750 - T): A above B at the start, below at the end, equal at 750 K
    fn synthetic_pair(temperatures: &[f64]) -> (SampledCurve, SampledCurve) {
        let a = SampledCurve::from_points(
            "A",
            temperatures.iter().map(|&t| (t, 100.0 - 0.05 * (t - 750.0))),
        );
        let b = SampledCurve::from_points("B", temperatures.iter().map(|&t| (t, 100.0)));
        (a, b)
    }

    #[test]
    fn test_first_match_on_shared_keys() {
        // step 0.1 K -> differences step by 0.005, several keys under 0.01
        let temperatures = grid(5001);
        let (a, b) = synthetic_pair(&temperatures);
        let found = find_melting_point(&a, &b).unwrap();
        assert!(a.contains(found.temperature) && b.contains(found.temperature));
        let diff = a.get(found.temperature).unwrap() - b.get(found.temperature).unwrap();
        assert!(diff.abs() < MELTING_TOLERANCE);
        assert_eq!(found.energy, a.get(found.temperature).unwrap());
        // first in iteration order is below 750 K
        assert!(found.temperature < 750.0);
        assert!((found.temperature - 750.0).abs() < 0.2);
    }

    #[test]
    fn test_closest_match() {
        let temperatures = grid(5001);
        let (a, b) = synthetic_pair(&temperatures);
        let finder = MeltingPointFinder::new(CrossingStrategy::ClosestMatch);
        let found = finder.find(&a, &b).unwrap();
        assert_relative_eq!(found.temperature, 750.0, epsilon = 1e-9);
        let first = MeltingPointFinder::default().find(&a, &b).unwrap();
        assert!(first.temperature < found.temperature);
    }

    #[test]
    fn test_no_false_positive() {
        let temperatures = grid(101);
        let a = SampledCurve::from_points("A", temperatures.iter().map(|&t| (t, t)));
        let b = SampledCurve::from_points("B", temperatures.iter().map(|&t| (t, t + 1.0)));
        for strategy in [
            CrossingStrategy::FirstMatch,
            CrossingStrategy::ClosestMatch,
            CrossingStrategy::Interpolated,
        ] {
            assert_eq!(MeltingPointFinder::new(strategy).find(&a, &b), None);
        }
    }

    #[test]
    fn test_disjoint_keys() {
        let a = SampledCurve::from_points("A", vec![(500.0, 10.0), (700.0, -10.0)]);
        let b = SampledCurve::from_points("B", vec![(550.0, 0.0), (650.0, 0.0)]);
        assert_eq!(find_melting_point(&a, &b), None);
        assert_eq!(
            MeltingPointFinder::new(CrossingStrategy::ClosestMatch).find(&a, &b),
            None
        );
        // disjoint domains: nothing to interpolate
        let c = SampledCurve::from_points("C", vec![(800.0, 0.0), (900.0, 0.0)]);
        assert_eq!(
            MeltingPointFinder::new(CrossingStrategy::Interpolated).find(&a, &c),
            None
        );
    }

    #[test]
    fn test_interpolated_on_independent_grids() {
        // coarse solid grid, offset liquid grid: no shared keys at all
        let solid_t = grid(26);
        let liquid_t: Vec<f64> = TemperatureRange::new(501.3, 999.7, 37).unwrap().to_vec();
        let solid = SampledCurve::from_points(
            "Solid Phase",
            solid_t.iter().map(|&t| (t, 100.0 - 0.05 * (t - 750.0))),
        );
        let liquid =
            SampledCurve::from_points("Liquid Phase", liquid_t.iter().map(|&t| (t, 100.0)));
        assert_eq!(find_melting_point(&solid, &liquid), None);
        let found = MeltingPointFinder::new(CrossingStrategy::Interpolated)
            .find(&solid, &liquid)
            .unwrap();
        assert_relative_eq!(found.temperature, 750.0, epsilon = 1e-9);
        assert_relative_eq!(found.energy, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_interpolated_exact_hit() {
        let a = SampledCurve::from_points("A", vec![(500.0, 1.0), (600.0, 0.0), (700.0, 5.0)]);
        let b = SampledCurve::from_points("B", vec![(500.0, 0.0), (600.0, 0.0), (700.0, 0.0)]);
        let found = MeltingPointFinder::new(CrossingStrategy::Interpolated)
            .find(&a, &b)
            .unwrap();
        assert_eq!(found.temperature, 600.0);
    }

    fn solid_g(t: f64) -> f64 {
        -0.05 * (t - 750.0)
    }
    fn liquid_g(_t: f64) -> f64 {
        0.0
    }

    #[test]
    fn test_refine_and_stable_phase() {
        let range = TemperatureRange::new(500.0, 1000.0, 6).unwrap();
        let solid = PhaseCurve::new("Solid Phase")
            .with_segment(range.clone(), FunctionExpression::new("solid", solid_g));
        let liquid = PhaseCurve::new("Liquid Phase")
            .with_segment(range, FunctionExpression::new("liquid", liquid_g));
        let guess = MeltingPoint {
            temperature: 760.0,
            energy: 0.0,
        };
        let finder = MeltingPointFinder::default();
        let refined = finder.refine(&solid, &liquid, guess, 50.0).unwrap();
        assert_relative_eq!(refined.temperature, 750.0, epsilon = 1e-8);
        // no sign change in a narrow window: guess kept
        let kept = finder.refine(&solid, &liquid, guess, 5.0).unwrap();
        assert_eq!(kept, guess);

        assert_eq!(stable_phase(&solid, &liquid, 600.0).unwrap().name, "Liquid Phase");
        assert_eq!(stable_phase(&solid, &liquid, 900.0).unwrap().name, "Solid Phase");
        assert!(stable_phase(&solid, &liquid, 1200.0).is_err());
    }

    #[test]
    fn test_refine_across_segment_gap_keeps_guess() {
        let solid = PhaseCurve::new("Solid Phase")
            .with_segment(
                TemperatureRange::new(500.0, 740.0, 5).unwrap(),
                FunctionExpression::new("solid", solid_g),
            )
            .with_segment(
                TemperatureRange::new(760.0, 1000.0, 5).unwrap(),
                FunctionExpression::new("solid", solid_g),
            );
        let liquid = PhaseCurve::new("Liquid Phase").with_segment(
            TemperatureRange::new(500.0, 1000.0, 6).unwrap(),
            FunctionExpression::new("liquid", liquid_g),
        );
        let guess = MeltingPoint {
            temperature: 750.0,
            energy: 0.0,
        };
        let kept = MeltingPointFinder::default()
            .refine(&solid, &liquid, guess, 5.0)
            .unwrap();
        assert_eq!(kept, guess);
    }

    #[test]
    fn test_display() {
        let point = MeltingPoint {
            temperature: 933.47,
            energy: -37848.05,
        };
        assert_eq!(point.to_string(), "Melting Point: 933.47 K");
    }
}
