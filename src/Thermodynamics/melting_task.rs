use crate::Thermodynamics::MeltingPoint::{CrossingStrategy, MELTING_TOLERANCE, MeltingPointFinder};
use crate::Thermodynamics::PhaseCurve::PhaseCurve;
use crate::Thermodynamics::energy_expression::{EnergyExpression, SGTEpolynomial};
use crate::Thermodynamics::gibbs_error::GibbsError;
use crate::Thermodynamics::melting_analysis::MeltingAnalysis;
use crate::Thermodynamics::phase_library::{
    LIQUID_PHASE, REFERENCE_SAMPLES, SOLID_PHASE, aluminium_liquid_expressions,
    aluminium_solid_expressions, reference_ranges,
};
use crate::Thermodynamics::temperature_range::TemperatureRange;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// one temperature segment of a phase as written in a task file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(non_snake_case)]
pub struct SegmentInput {
    pub T_start: f64,
    pub T_end: f64,
    pub samples: usize,
    pub model: SGTEpolynomial,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseInput {
    pub name: String,
    pub segments: Vec<SegmentInput>,
}

/// Input of one melting point analysis.
/// ```json
/// { "substance": "Al", "strategy": "Interpolated",
///   "solid":  { "name": "Solid Phase",  "segments": [ { "T_start": 298.15, "T_end": 700.0,
///               "samples": 1000, "model": { "a": -7976.15, "b": 137.093038, "c": -24.3671976,
///               "terms": [ { "coeff": 74092.0, "power": -1 } ] } } ] },
///   "liquid": { ... } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeltingTask {
    pub substance: String,
    /// |Gs - Gl| tolerance of the coincidence strategies, J/mol
    #[serde(default)]
    pub tolerance: Option<f64>,
    #[serde(default)]
    pub strategy: Option<CrossingStrategy>,
    /// bisection on the exact expressions after the sampled search
    #[serde(default)]
    pub refine: bool,
    pub solid: PhaseInput,
    pub liquid: PhaseInput,
}

impl PhaseInput {
    fn from_expressions(name: &str, expressions: Vec<SGTEpolynomial>) -> Result<Self, GibbsError> {
        let segments = reference_ranges(REFERENCE_SAMPLES)?
            .into_iter()
            .zip(expressions)
            .map(|(range, model)| SegmentInput {
                T_start: range.start(),
                T_end: range.end(),
                samples: range.samples(),
                model,
            })
            .collect();
        Ok(Self {
            name: name.to_string(),
            segments,
        })
    }

    pub fn to_phase(&self) -> Result<PhaseCurve, GibbsError> {
        if self.segments.is_empty() {
            return Err(GibbsError::EmptyPhase(self.name.clone()));
        }
        let mut phase = PhaseCurve::new(&self.name);
        for segment in &self.segments {
            let range = TemperatureRange::new(segment.T_start, segment.T_end, segment.samples)
                .map_err(|e| e.in_phase(&self.name))?;
            phase.add_segment(range, EnergyExpression::from(segment.model.clone()));
        }
        Ok(phase)
    }
}

impl MeltingTask {
    /// takes serde Value and parses it into a task
    pub fn from_serde(value: Value) -> Result<Self, GibbsError> {
        Ok(serde_json::from_value(value)?)
    }
    /// the aluminium reference configuration
    pub fn aluminium_reference() -> Result<Self, GibbsError> {
        Ok(Self {
            substance: "Al".to_string(),
            tolerance: Some(MELTING_TOLERANCE),
            strategy: Some(CrossingStrategy::FirstMatch),
            refine: false,
            solid: PhaseInput::from_expressions(SOLID_PHASE, aluminium_solid_expressions())?,
            liquid: PhaseInput::from_expressions(LIQUID_PHASE, aluminium_liquid_expressions())?,
        })
    }

    pub fn to_analysis(&self) -> Result<MeltingAnalysis, GibbsError> {
        let solid = self.solid.to_phase()?;
        let liquid = self.liquid.to_phase()?;
        let mut analysis = MeltingAnalysis::new(&self.substance, solid, liquid);
        let mut finder = MeltingPointFinder::new(self.strategy.unwrap_or(analysis.finder.strategy));
        if let Some(tolerance) = self.tolerance {
            finder = finder.with_tolerance(tolerance);
        }
        analysis.finder = finder;
        analysis.refine = self.refine;
        Ok(analysis)
    }
}
