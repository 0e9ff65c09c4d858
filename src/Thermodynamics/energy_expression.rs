//! # Energy expressions
//!
//! Closed-form Gibbs free energy models G(T), J/mol, each valid on one temperature segment
//! of a phase. Two kinds are supported:
//! - `SGTEpolynomial`: the SGTE/CALPHAD form `a + b*T + c*T*ln(T) + Σ k_n*T^n`
//! - `FunctionExpression`: any plain `fn(f64) -> f64` with a name
//!
//! Both are dispatched through the `GibbsExpression` trait via `EnergyExpression`.
//! Besides G itself the models give entropy `S = -dG/dT`, enthalpy `H = G + T*S`
//! and heat capacity `Cp = -T*d²G/dT²`.
use crate::Thermodynamics::gibbs_error::GibbsError;
use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
use std::fmt;

#[enum_dispatch]
pub trait GibbsExpression {
    /// Gibbs free energy at t, J/mol
    fn gibbs_energy(&self, t: f64) -> Result<f64, GibbsError>;
    /// entropy -dG/dT at t, J/(mol K)
    fn entropy(&self, t: f64) -> Result<f64, GibbsError>;
    /// heat capacity -T d²G/dT² at t, J/(mol K)
    fn heat_capacity(&self, t: f64) -> Result<f64, GibbsError>;
    /// enthalpy G + T*S at t, J/mol
    fn enthalpy(&self, t: f64) -> Result<f64, GibbsError> {
        Ok(self.gibbs_energy(t)? + t * self.entropy(t)?)
    }
    fn describe(&self) -> String;
}

#[derive(Debug, Clone)]
#[enum_dispatch(GibbsExpression)]
pub enum EnergyExpression {
    SGTE(SGTEpolynomial),
    Function(FunctionExpression),
}

/// absolute temperature check shared by all expressions
fn check_temperature(t: f64, expression: &dyn Fn() -> String) -> Result<(), GibbsError> {
    let reason = if !t.is_finite() {
        "temperature must be finite"
    } else if t <= 0.0 {
        "ln(T) and negative powers of T require T > 0"
    } else {
        return Ok(());
    };
    Err(GibbsError::DomainError {
        temperature: t,
        expression: expression(),
        reason: reason.to_string(),
    })
}

fn check_value(t: f64, value: f64, expression: &dyn Fn() -> String) -> Result<f64, GibbsError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(GibbsError::DomainError {
            temperature: t,
            expression: expression(),
            reason: format!("expression evaluates to {}", value),
        })
    }
}

////////////////////////////////////SGTE////////////////////////////////////////////
/// one `coeff * T^power` term
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerTerm {
    pub coeff: f64,
    pub power: i32,
}

/// G(T) = a + b*T + c*T*ln(T) + Σ coeff*T^power
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SGTEpolynomial {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    #[serde(default)]
    pub terms: Vec<PowerTerm>,
}

impl SGTEpolynomial {
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        Self {
            a,
            b,
            c,
            terms: Vec::new(),
        }
    }
    /// adds `coeff * T^power`
    pub fn with_term(mut self, coeff: f64, power: i32) -> Self {
        self.terms.push(PowerTerm { coeff, power });
        self
    }

    fn dG_dT(&self, t: f64) -> f64 {
        let power_part: f64 = self
            .terms
            .iter()
            .filter(|term| term.power != 0)
            .map(|term| term.coeff * term.power as f64 * t.powi(term.power - 1))
            .sum();
        self.b + self.c * (t.ln() + 1.0) + power_part
    }

    fn d2G_dT2(&self, t: f64) -> f64 {
        let power_part: f64 = self
            .terms
            .iter()
            .filter(|term| term.power != 0 && term.power != 1)
            .map(|term| {
                let n = term.power as f64;
                term.coeff * n * (n - 1.0) * t.powi(term.power - 2)
            })
            .sum();
        self.c / t + power_part
    }
}

impl GibbsExpression for SGTEpolynomial {
    fn gibbs_energy(&self, t: f64) -> Result<f64, GibbsError> {
        let name = || self.describe();
        check_temperature(t, &name)?;
        let power_part: f64 = self
            .terms
            .iter()
            .map(|term| term.coeff * t.powi(term.power))
            .sum();
        let g = self.a + self.b * t + self.c * t * t.ln() + power_part;
        check_value(t, g, &name)
    }

    fn entropy(&self, t: f64) -> Result<f64, GibbsError> {
        let name = || self.describe();
        check_temperature(t, &name)?;
        check_value(t, -self.dG_dT(t), &name)
    }

    fn heat_capacity(&self, t: f64) -> Result<f64, GibbsError> {
        let name = || self.describe();
        check_temperature(t, &name)?;
        check_value(t, -t * self.d2G_dT2(t), &name)
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SGTEpolynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn signed(f: &mut fmt::Formatter<'_>, value: f64, tail: &str) -> fmt::Result {
            if value < 0.0 {
                write!(f, " - {}{}", -value, tail)
            } else {
                write!(f, " + {}{}", value, tail)
            }
        }
        write!(f, "G(T) = {}", self.a)?;
        signed(f, self.b, "*T")?;
        signed(f, self.c, "*T*ln(T)")?;
        for term in &self.terms {
            signed(f, term.coeff, &format!("*T^{}", term.power))?;
        }
        Ok(())
    }
}

////////////////////////////////FUNCTION POINTER///////////////////////////////////////
/// arbitrary model given as a plain function; derivatives by central differences
#[derive(Debug, Clone)]
pub struct FunctionExpression {
    pub name: String,
    pub function: fn(f64) -> f64,
}

impl FunctionExpression {
    pub fn new(name: &str, function: fn(f64) -> f64) -> Self {
        Self {
            name: name.to_string(),
            function,
        }
    }

    fn step(t: f64) -> f64 {
        1e-5 * t
    }
}

impl GibbsExpression for FunctionExpression {
    fn gibbs_energy(&self, t: f64) -> Result<f64, GibbsError> {
        let name = || self.describe();
        check_temperature(t, &name)?;
        check_value(t, (self.function)(t), &name)
    }

    fn entropy(&self, t: f64) -> Result<f64, GibbsError> {
        let h = Self::step(t);
        let dG_dT = (self.gibbs_energy(t + h)? - self.gibbs_energy(t - h)?) / (2.0 * h);
        Ok(-dG_dT)
    }

    fn heat_capacity(&self, t: f64) -> Result<f64, GibbsError> {
        let h = Self::step(t);
        let d2G = (self.gibbs_energy(t + h)? - 2.0 * self.gibbs_energy(t)?
            + self.gibbs_energy(t - h)?)
            / (h * h);
        Ok(-t * d2G)
    }

    fn describe(&self) -> String {
        format!("G(T) = {}", self.name)
    }
}
