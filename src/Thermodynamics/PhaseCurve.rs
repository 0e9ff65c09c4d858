//! # Piecewise Gibbs energy of one phase
//!
//! ## Aim
//! A phase's free energy in CALPHAD form is a set of expressions, each valid on its own
//! temperature sub-range. `PhaseCurve` keeps the ordered list of (range, expression)
//! segments and samples it into a `SampledCurve`.
//!
//! ## Main logic
//! - `evaluate()`: every segment in order, every sample point in order, `(T, G(T))` inserted
//!   into one curve keyed by temperature; duplicate keys at shared boundaries are overwritten
//!   by the later segment
//! - `segment_for()`: picks the segment for a single temperature, the later segment wins at a
//!   shared boundary, consistent with sampling
//! - `boundary_discontinuities()`: jumps of G at internal boundaries, a quick check of the
//!   model coefficients
use crate::Thermodynamics::energy_expression::{EnergyExpression, GibbsExpression};
use crate::Thermodynamics::gibbs_error::GibbsError;
use crate::Thermodynamics::sampled_curve::SampledCurve;
use crate::Thermodynamics::temperature_range::TemperatureRange;

/// boundaries closer than this are treated as shared, K
const BOUNDARY_EPS: f64 = 1e-9;

#[derive(Debug, Clone)]
pub struct Segment {
    pub range: TemperatureRange,
    pub expression: EnergyExpression,
}

impl Segment {
    pub fn new(range: TemperatureRange, expression: impl Into<EnergyExpression>) -> Self {
        Self {
            range,
            expression: expression.into(),
        }
    }
    /// (T, G) at every sample point of the range
    pub fn sample(&self) -> Result<Vec<(f64, f64)>, GibbsError> {
        self.range
            .points()
            .map(|t| Ok((t, self.expression.gibbs_energy(t)?)))
            .collect()
    }
}

/// G at both sides of an internal segment boundary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryJump {
    pub temperature: f64,
    /// value of the segment ending at the boundary
    pub lower: f64,
    /// value of the segment starting at the boundary
    pub upper: f64,
}

impl BoundaryJump {
    pub fn jump(&self) -> f64 {
        self.upper - self.lower
    }
}

#[derive(Debug, Clone)]
pub struct PhaseCurve {
    pub name: String,
    pub segments: Vec<Segment>,
}

impl PhaseCurve {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            segments: Vec::new(),
        }
    }

    pub fn with_segment(
        mut self,
        range: TemperatureRange,
        expression: impl Into<EnergyExpression>,
    ) -> Self {
        self.add_segment(range, expression);
        self
    }

    pub fn add_segment(
        &mut self,
        range: TemperatureRange,
        expression: impl Into<EnergyExpression>,
    ) {
        self.segments.push(Segment::new(range, expression));
    }

    fn check_not_empty(&self) -> Result<(), GibbsError> {
        if self.segments.is_empty() {
            return Err(GibbsError::EmptyPhase(self.name.clone()));
        }
        Ok(())
    }
    /// samples all segments into one curve labelled with the phase name
    pub fn evaluate(&self) -> Result<SampledCurve, GibbsError> {
        self.check_not_empty()?;
        let mut curve = SampledCurve::new(&self.name);
        for segment in &self.segments {
            curve.extend(segment.sample()?);
        }
        Ok(curve)
    }
    /// one curve per segment, only the first one carries the phase name
    pub fn evaluate_segments(&self) -> Result<Vec<SampledCurve>, GibbsError> {
        self.check_not_empty()?;
        self.segments
            .iter()
            .enumerate()
            .map(|(i, segment)| {
                let label = if i == 0 { self.name.as_str() } else { "" };
                Ok(SampledCurve::from_points(label, segment.sample()?))
            })
            .collect()
    }
    /// lowest start and highest end of all segments
    pub fn span(&self) -> Option<(f64, f64)> {
        self.segments.iter().fold(None, |acc, s| {
            let (start, end) = (s.range.start(), s.range.end());
            match acc {
                None => Some((start, end)),
                Some((lo, hi)) => Some((f64::min(lo, start), f64::max(hi, end))),
            }
        })
    }

    fn range_str(&self) -> String {
        self.segments
            .iter()
            .map(|s| format!("{} - {}", s.range.start(), s.range.end()))
            .collect::<Vec<_>>()
            .join(", ")
    }
    /// segment valid at t; the later one at a shared boundary
    pub fn segment_for(&self, t: f64) -> Result<&Segment, GibbsError> {
        self.segments
            .iter()
            .rev()
            .find(|s| s.range.contains(t))
            .ok_or_else(|| GibbsError::NoSegmentFound {
                temperature: t,
                range: self.range_str(),
            })
    }

    pub fn gibbs_at(&self, t: f64) -> Result<f64, GibbsError> {
        self.segment_for(t)?.expression.gibbs_energy(t)
    }

    pub fn entropy_at(&self, t: f64) -> Result<f64, GibbsError> {
        self.segment_for(t)?.expression.entropy(t)
    }

    pub fn enthalpy_at(&self, t: f64) -> Result<f64, GibbsError> {
        self.segment_for(t)?.expression.enthalpy(t)
    }

    pub fn heat_capacity_at(&self, t: f64) -> Result<f64, GibbsError> {
        self.segment_for(t)?.expression.heat_capacity(t)
    }
    /// G of both neighbours at every shared internal boundary
    pub fn boundary_discontinuities(&self) -> Result<Vec<BoundaryJump>, GibbsError> {
        let mut jumps = Vec::new();
        for pair in self.segments.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if (prev.range.end() - next.range.start()).abs() > BOUNDARY_EPS {
                continue;
            }
            let t = next.range.start();
            jumps.push(BoundaryJump {
                temperature: t,
                lower: prev.expression.gibbs_energy(prev.range.end())?,
                upper: next.expression.gibbs_energy(t)?,
            });
        }
        Ok(jumps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Thermodynamics::energy_expression::{FunctionExpression, SGTEpolynomial};
    use approx::assert_relative_eq;

    fn linear(t: f64) -> f64 {
        2.0 * t
    }
    fn shifted(t: f64) -> f64 {
        2.0 * t + 5.0
    }

    fn two_segments() -> PhaseCurve {
        PhaseCurve::new("Test Phase")
            .with_segment(
                TemperatureRange::new(100.0, 200.0, 11).unwrap(),
                FunctionExpression::new("2T", linear),
            )
            .with_segment(
                TemperatureRange::new(200.0, 300.0, 11).unwrap(),
                FunctionExpression::new("2T + 5", shifted),
            )
    }

    #[test]
    fn test_evaluate_overwrites_shared_boundary() {
        let curve = two_segments().evaluate().unwrap();
        assert_eq!(curve.label, "Test Phase");
        // 22 samples, one shared key
        assert_eq!(curve.len(), 21);
        assert_eq!(curve.get(200.0), Some(405.0));
        assert_eq!(curve.get(100.0), Some(200.0));
        assert_eq!(curve.get(300.0), Some(605.0));
        // boundary keeps the position of its first insertion
        assert_eq!(curve.temperatures()[10], 200.0);
    }

    #[test]
    fn test_evaluate_segments_labels() {
        let parts = two_segments().evaluate_segments().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].label, "Test Phase");
        assert_eq!(parts[1].label, "");
        assert_eq!(parts[0].get(200.0), Some(400.0));
        assert_eq!(parts[1].get(200.0), Some(405.0));
    }

    #[test]
    fn test_segment_selection() {
        let phase = two_segments();
        assert_eq!(phase.gibbs_at(150.0).unwrap(), 300.0);
        assert_eq!(phase.gibbs_at(200.0).unwrap(), 405.0);
        assert_eq!(phase.gibbs_at(250.0).unwrap(), 505.0);
        assert!(matches!(
            phase.gibbs_at(350.0),
            Err(GibbsError::NoSegmentFound { temperature, .. }) if temperature == 350.0
        ));
        assert_eq!(phase.span(), Some((100.0, 300.0)));
    }

    #[test]
    fn test_boundary_jumps() {
        let jumps = two_segments().boundary_discontinuities().unwrap();
        assert_eq!(jumps.len(), 1);
        assert_eq!(jumps[0].temperature, 200.0);
        assert_relative_eq!(jumps[0].jump(), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_gap_is_not_a_boundary() {
        let phase = PhaseCurve::new("gapped")
            .with_segment(
                TemperatureRange::new(100.0, 200.0, 5).unwrap(),
                FunctionExpression::new("2T", linear),
            )
            .with_segment(
                TemperatureRange::new(250.0, 300.0, 5).unwrap(),
                FunctionExpression::new("2T", linear),
            );
        assert!(phase.boundary_discontinuities().unwrap().is_empty());
        assert!(phase.gibbs_at(225.0).is_err());
        assert_eq!(phase.evaluate().unwrap().len(), 10);
    }

    #[test]
    fn test_empty_phase() {
        let phase = PhaseCurve::new("nothing");
        assert!(matches!(phase.evaluate(), Err(GibbsError::EmptyPhase(name)) if name == "nothing"));
        assert!(phase.evaluate_segments().is_err());
        assert_eq!(phase.span(), None);
    }

    #[test]
    fn test_domain_error_aborts_phase() {
        let phase = PhaseCurve::new("cold").with_segment(
            TemperatureRange::new(-10.0, 10.0, 5).unwrap(),
            SGTEpolynomial::new(0.0, 1.0, -1.0),
        );
        let err = phase.evaluate().unwrap_err();
        assert!(err.is_domain_error());
    }
}
