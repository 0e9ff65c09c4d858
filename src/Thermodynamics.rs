/// melting point as the crossing of the solid and liquid Gibbs energy curves
/// # Examples
/// ```
/// use GibbsMelt::Thermodynamics::MeltingPoint::find_melting_point;
/// use GibbsMelt::Thermodynamics::phase_library::{aluminium_liquid, aluminium_solid};
///
/// let solid = aluminium_solid(1000).unwrap().evaluate().unwrap();
/// let liquid = aluminium_liquid(1000).unwrap().evaluate().unwrap();
/// let point = find_melting_point(&solid, &liquid).unwrap();
/// assert!(point.temperature > 900.0 && point.temperature < 950.0);
/// println!("{}", point);
/// ```
pub mod MeltingPoint;
/// piecewise Gibbs energy of one phase: ordered (temperature range, expression) segments
/// # Examples
/// ```
/// use GibbsMelt::Thermodynamics::PhaseCurve::PhaseCurve;
/// use GibbsMelt::Thermodynamics::energy_expression::SGTEpolynomial;
/// use GibbsMelt::Thermodynamics::temperature_range::TemperatureRange;
///
/// let phase = PhaseCurve::new("Liquid Phase").with_segment(
///     TemperatureRange::new(933.47, 1000.0, 100).unwrap(),
///     SGTEpolynomial::new(-795.996, 177.430178, -31.748192),
/// );
/// let curve = phase.evaluate().unwrap();
/// assert_eq!(curve.len(), 100);
/// let g = phase.gibbs_at(950.0).unwrap();
/// assert!(g < 0.0);
/// ```
pub mod PhaseCurve;
/// closed-form G(T) expressions: SGTE polynomials and plain functions
pub mod energy_expression;
pub mod gibbs_error;
/// solid + liquid evaluation, crossing search, fusion enthalpy and entropy
pub mod melting_analysis;
/// JSON input of a melting analysis
pub mod melting_task;
/// reference SGTE data of aluminium
pub mod phase_library;
/// plot data products and renderers
pub mod phase_output;
/// sampled G(T) keyed by temperature
pub mod sampled_curve;
pub mod temperature_range;
