//! Reference SGTE data: pure aluminium, fcc (solid) and liquid, 298.15 - 1000 K.
use crate::Thermodynamics::PhaseCurve::PhaseCurve;
use crate::Thermodynamics::energy_expression::SGTEpolynomial;
use crate::Thermodynamics::gibbs_error::GibbsError;
use crate::Thermodynamics::temperature_range::TemperatureRange;

pub const SOLID_PHASE: &str = "Solid Phase";
pub const LIQUID_PHASE: &str = "Liquid Phase";
/// tabulated melting temperature of aluminium, K
pub const AL_MELTING_TEMPERATURE: f64 = 933.47;
pub const REFERENCE_SAMPLES: usize = 1000;
/// segment boundaries of the reference data, K
pub const REFERENCE_BOUNDS: [f64; 4] = [298.15, 700.0, AL_MELTING_TEMPERATURE, 1000.0];

/// [298.15, 700], [700, 933.47], [933.47, 1000], each with `samples` points
pub fn reference_ranges(samples: usize) -> Result<Vec<TemperatureRange>, GibbsError> {
    REFERENCE_BOUNDS
        .windows(2)
        .map(|w| TemperatureRange::new(w[0], w[1], samples))
        .collect()
}

pub fn aluminium_solid_expressions() -> Vec<SGTEpolynomial> {
    vec![
        SGTEpolynomial::new(-7976.15, 137.093038, -24.3671976)
            .with_term(-1.884662e-3, 2)
            .with_term(-0.8776648e-6, 3)
            .with_term(74092.0, -1),
        SGTEpolynomial::new(-11276.24, 223.048446, -38.5844296)
            .with_term(18.531982e-3, 2)
            .with_term(-5.764227e-6, 3)
            .with_term(74092.0, -1),
        SGTEpolynomial::new(-11278.378, 188.684153, -31.748192).with_term(-1.231e28, -9),
    ]
}

pub fn aluminium_liquid_expressions() -> Vec<SGTEpolynomial> {
    vec![
        SGTEpolynomial::new(3028.879, 125.251171, -24.3671976)
            .with_term(-1.884662e-3, 2)
            .with_term(-0.877664e-6, 3)
            .with_term(74092.0, -1)
            .with_term(7.934e-20, 7),
        SGTEpolynomial::new(-271.21, 211.206579, -38.58442)
            .with_term(18.531982e-3, 2)
            .with_term(-5.764227e-6, 3)
            .with_term(74092.0, -1)
            .with_term(7.934e-20, 7),
        SGTEpolynomial::new(-795.996, 177.430178, -31.748192),
    ]
}

fn build_phase(
    name: &str,
    expressions: Vec<SGTEpolynomial>,
    samples: usize,
) -> Result<PhaseCurve, GibbsError> {
    let mut phase = PhaseCurve::new(name);
    for (range, expression) in reference_ranges(samples)?.into_iter().zip(expressions) {
        phase.add_segment(range, expression);
    }
    Ok(phase)
}

pub fn aluminium_solid(samples: usize) -> Result<PhaseCurve, GibbsError> {
    build_phase(SOLID_PHASE, aluminium_solid_expressions(), samples)
}

pub fn aluminium_liquid(samples: usize) -> Result<PhaseCurve, GibbsError> {
    build_phase(LIQUID_PHASE, aluminium_liquid_expressions(), samples)
}
