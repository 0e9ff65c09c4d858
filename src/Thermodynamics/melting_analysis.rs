//! # Melting analysis of one substance
//!
//! ## Aim
//! Runs the whole chain: one `PhaseCurve` per phase -> sampled curves -> crossing search ->
//! `MeltingReport` with the data products for rendering.
//!
//! ## Main logic
//! - both phases are evaluated independently, a failure of one is logged with the phase name
//!   and returned as an error
//! - boundary jumps of G larger than `CONTINUITY_WARNING` J/mol are logged as a likely error in
//!   the model coefficients
//! - the melting point search uses `CrossingStrategy::Interpolated` unless told otherwise;
//!   optionally the result is refined by bisection on the exact expressions
//! - enthalpy and entropy of fusion are taken from the exact expressions at the melting point;
//!   if a phase has no segment there (gap between segments) they are left empty with a warning
//!   and the melting point is still reported
//!
//! ## Usage
//! ```rust, ignore
//! let analysis = MeltingAnalysis::aluminium()?;
//! let report = analysis.run()?;
//! report.pretty_print();
//! report.render(&TableRenderer::default())?;
//! ```
use crate::Thermodynamics::MeltingPoint::{CrossingStrategy, MeltingPoint, MeltingPointFinder};
use crate::Thermodynamics::PhaseCurve::PhaseCurve;
use crate::Thermodynamics::gibbs_error::GibbsError;
use crate::Thermodynamics::phase_library::{REFERENCE_SAMPLES, aluminium_liquid, aluminium_solid};
use crate::Thermodynamics::phase_output::{CurveRenderer, CurveSeries, PlotData};
use crate::Thermodynamics::sampled_curve::SampledCurve;
use log::{error, info, warn};
use prettytable::{Table, row};

/// G jump at a segment boundary above which the model is suspicious, J/mol
pub const CONTINUITY_WARNING: f64 = 1.0;
/// half width of the bisection window around the sampled melting point, K
const REFINE_HALF_WIDTH: f64 = 5.0;

#[derive(Debug, Clone)]
pub struct MeltingAnalysis {
    pub substance: String,
    pub solid: PhaseCurve,
    pub liquid: PhaseCurve,
    pub finder: MeltingPointFinder,
    pub refine: bool,
}

#[derive(Debug, Clone)]
pub struct MeltingReport {
    pub substance: String,
    pub strategy: CrossingStrategy,
    pub solid: SampledCurve,
    pub liquid: SampledCurve,
    pub solid_segments: Vec<SampledCurve>,
    pub liquid_segments: Vec<SampledCurve>,
    pub melting_point: Option<MeltingPoint>,
    /// H_liquid - H_solid at the melting point, J/mol
    pub enthalpy_of_fusion: Option<f64>,
    /// S_liquid - S_solid at the melting point, J/(mol K)
    pub entropy_of_fusion: Option<f64>,
}

impl MeltingAnalysis {
    pub fn new(substance: &str, solid: PhaseCurve, liquid: PhaseCurve) -> Self {
        Self {
            substance: substance.to_string(),
            solid,
            liquid,
            finder: MeltingPointFinder::new(CrossingStrategy::Interpolated),
            refine: false,
        }
    }
    /// reference aluminium data, 3 segments x 1000 samples per phase
    pub fn aluminium() -> Result<Self, GibbsError> {
        Ok(Self::new(
            "Al",
            aluminium_solid(REFERENCE_SAMPLES)?,
            aluminium_liquid(REFERENCE_SAMPLES)?,
        ))
    }

    pub fn with_finder(mut self, finder: MeltingPointFinder) -> Self {
        self.finder = finder;
        self
    }

    pub fn with_refinement(mut self, refine: bool) -> Self {
        self.refine = refine;
        self
    }

    fn check_continuity(phase: &PhaseCurve) -> Result<(), GibbsError> {
        for jump in phase.boundary_discontinuities()? {
            if jump.jump().abs() > CONTINUITY_WARNING {
                warn!(
                    "{}: G jumps by {} J/mol at {} K, check the model coefficients",
                    phase.name,
                    jump.jump(),
                    jump.temperature
                );
            }
        }
        Ok(())
    }

    fn evaluate_phase(
        phase: &PhaseCurve,
    ) -> Result<(SampledCurve, Vec<SampledCurve>), GibbsError> {
        let evaluated = Self::check_continuity(phase)
            .and_then(|_| Ok((phase.evaluate()?, phase.evaluate_segments()?)));
        match evaluated {
            Ok(curves) => {
                info!("{}: {} samples evaluated", phase.name, curves.0.len());
                Ok(curves)
            }
            Err(e) => {
                error!("{}: evaluation failed: {}", phase.name, e);
                Err(e.in_phase(&phase.name))
            }
        }
    }
    /// ΔH and ΔS of fusion at t
    pub fn fusion_quantities(&self, t: f64) -> Result<(f64, f64), GibbsError> {
        let solid_h = self.solid.enthalpy_at(t).map_err(|e| e.in_phase(&self.solid.name))?;
        let liquid_h = self.liquid.enthalpy_at(t).map_err(|e| e.in_phase(&self.liquid.name))?;
        let solid_s = self.solid.entropy_at(t).map_err(|e| e.in_phase(&self.solid.name))?;
        let liquid_s = self.liquid.entropy_at(t).map_err(|e| e.in_phase(&self.liquid.name))?;
        Ok((liquid_h - solid_h, liquid_s - solid_s))
    }

    pub fn run(&self) -> Result<MeltingReport, GibbsError> {
        info!("melting analysis of {} started", self.substance);
        // each phase is evaluated even if the other one failed
        let solid = Self::evaluate_phase(&self.solid);
        let liquid = Self::evaluate_phase(&self.liquid);
        let (solid, solid_segments) = solid?;
        let (liquid, liquid_segments) = liquid?;

        let mut melting_point = self.finder.find(&solid, &liquid);
        if self.refine {
            if let Some(guess) = melting_point {
                melting_point =
                    Some(self.finder.refine(&self.solid, &self.liquid, guess, REFINE_HALF_WIDTH)?);
            }
        }
        let (enthalpy_of_fusion, entropy_of_fusion) = match melting_point {
            Some(point) => {
                info!(
                    "{} of {}, G = {} J/mol",
                    point, self.substance, point.energy
                );
                match self.fusion_quantities(point.temperature) {
                    Ok((dh, ds)) => (Some(dh), Some(ds)),
                    Err(e) => {
                        warn!(
                            "fusion quantities of {} at {} K not available: {}",
                            self.substance, point.temperature, e
                        );
                        (None, None)
                    }
                }
            }
            None => {
                info!(
                    "no melting point of {} found with {:?} strategy",
                    self.substance, self.finder.strategy
                );
                (None, None)
            }
        };
        Ok(MeltingReport {
            substance: self.substance.clone(),
            strategy: self.finder.strategy,
            solid,
            liquid,
            solid_segments,
            liquid_segments,
            melting_point,
            enthalpy_of_fusion,
            entropy_of_fusion,
        })
    }
}

impl MeltingReport {
    /// one series per phase segment plus the melting point annotation
    pub fn plot_data(&self) -> PlotData {
        let series = self
            .solid_segments
            .iter()
            .chain(self.liquid_segments.iter())
            .map(CurveSeries::from)
            .collect();
        PlotData::new(series, self.melting_point)
    }

    pub fn render(&self, renderer: &dyn CurveRenderer) -> Result<(), GibbsError> {
        renderer.render(&self.plot_data())
    }

    pub fn summary_table(&self) -> Table {
        let mut table = Table::new();
        table.add_row(row!["substance", self.substance]);
        table.add_row(row!["strategy", format!("{:?}", self.strategy)]);
        table.add_row(row![
            format!("{} samples", self.solid.label),
            self.solid.len()
        ]);
        table.add_row(row![
            format!("{} samples", self.liquid.label),
            self.liquid.len()
        ]);
        match self.melting_point {
            Some(point) => {
                table.add_row(row!["T melting, K", point.temperature]);
                table.add_row(row!["G melting, J/mol", point.energy]);
            }
            None => {
                table.add_row(row!["T melting, K", "not found"]);
            }
        }
        if let Some(dh) = self.enthalpy_of_fusion {
            table.add_row(row!["dH fusion, J/mol", dh]);
        }
        if let Some(ds) = self.entropy_of_fusion {
            table.add_row(row!["dS fusion, J/(mol K)", ds]);
        }
        table
    }

    pub fn pretty_print(&self) {
        println!("__________melting analysis of {}__________", self.substance);
        self.summary_table().printstd();
        println!("_____________________________________________________________");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Thermodynamics::energy_expression::{FunctionExpression, SGTEpolynomial};
    use crate::Thermodynamics::temperature_range::TemperatureRange;

    fn solid_g(t: f64) -> f64 {
        -20.0 * t
    }
    fn liquid_g(t: f64) -> f64 {
        6000.0 - 30.0 * t
    }

    fn linear_analysis(samples: usize) -> MeltingAnalysis {
        let range = TemperatureRange::new(300.0, 900.0, samples).unwrap();
        MeltingAnalysis::new(
            "linear",
            PhaseCurve::new("Solid Phase")
                .with_segment(range.clone(), FunctionExpression::new("-20T", solid_g)),
            PhaseCurve::new("Liquid Phase")
                .with_segment(range, FunctionExpression::new("6000 - 30T", liquid_g)),
        )
    }

    #[test]
    fn test_linear_model() {
        // crossing at 600 K, ΔS = 10, ΔH = 6000
        let report = linear_analysis(7).run().unwrap();
        let point = report.melting_point.unwrap();
        approx::assert_relative_eq!(point.temperature, 600.0, epsilon = 1e-9);
        approx::assert_relative_eq!(report.entropy_of_fusion.unwrap(), 10.0, epsilon = 1e-4);
        approx::assert_relative_eq!(report.enthalpy_of_fusion.unwrap(), 6000.0, epsilon = 1e-1);
        assert_eq!(report.solid.len(), 7);
        assert_eq!(report.strategy, CrossingStrategy::Interpolated);
        let plot = report.plot_data();
        assert_eq!(plot.series.len(), 2);
        assert_eq!(
            plot.annotation.unwrap().label,
            "Melting Point: 600 K".to_string()
        );
    }

    #[test]
    fn test_not_found_is_not_an_error() {
        // 8 samples: 300, 385.7.. no sample hits 600 K exactly
        let analysis = linear_analysis(8).with_finder(MeltingPointFinder::default());
        let report = analysis.run().unwrap();
        assert!(report.melting_point.is_none());
        assert!(report.enthalpy_of_fusion.is_none());
        assert!(report.plot_data().annotation.is_none());
        // bisection needs a sampled guess first
        let report = linear_analysis(8)
            .with_finder(MeltingPointFinder::default())
            .with_refinement(true)
            .run()
            .unwrap();
        assert!(report.melting_point.is_none());
    }

    #[test]
    fn test_refinement() {
        let report = linear_analysis(8).with_refinement(true).run().unwrap();
        approx::assert_relative_eq!(
            report.melting_point.unwrap().temperature,
            600.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_phase_failure_is_named() {
        let mut analysis = linear_analysis(7);
        analysis.liquid = PhaseCurve::new("Liquid Phase").with_segment(
            TemperatureRange::new(-300.0, 900.0, 7).unwrap(),
            SGTEpolynomial::new(0.0, 1.0, -1.0),
        );
        let err = analysis.run().unwrap_err();
        assert!(err.is_domain_error());
        assert!(err.to_string().contains("Liquid Phase"));
    }

    #[test]
    fn test_crossing_in_segment_gap_is_reported() {
        // solid known on [300, 500] and [700, 900] only, crossing at 600 K
        let solid = PhaseCurve::new("Solid Phase")
            .with_segment(
                TemperatureRange::new(300.0, 500.0, 5).unwrap(),
                FunctionExpression::new("-20T", solid_g),
            )
            .with_segment(
                TemperatureRange::new(700.0, 900.0, 5).unwrap(),
                FunctionExpression::new("-20T", solid_g),
            );
        let liquid = PhaseCurve::new("Liquid Phase").with_segment(
            TemperatureRange::new(300.0, 900.0, 13).unwrap(),
            FunctionExpression::new("6000 - 30T", liquid_g),
        );
        for refine in [false, true] {
            let report = MeltingAnalysis::new("gap", solid.clone(), liquid.clone())
                .with_refinement(refine)
                .run()
                .unwrap();
            let point = report.melting_point.unwrap();
            approx::assert_relative_eq!(point.temperature, 600.0, epsilon = 1e-9);
            approx::assert_relative_eq!(point.energy, -12000.0, epsilon = 1e-6);
            assert!(report.enthalpy_of_fusion.is_none());
            assert!(report.entropy_of_fusion.is_none());
            assert!(report.plot_data().annotation.is_some());
            // substance, strategy, 2 sample counts, T, G
            assert_eq!(report.summary_table().len(), 6);
        }
    }

    #[test]
    fn test_summary_table() {
        let report = linear_analysis(7).run().unwrap();
        // substance, strategy, 2 sample counts, T, G, dH, dS
        assert_eq!(report.summary_table().len(), 8);
        report.pretty_print();
    }
}
