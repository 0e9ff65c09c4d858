use thiserror::Error;

/// errors of piecewise Gibbs energy evaluation, task loading and output
#[derive(Debug, Error)]
pub enum GibbsError {
    /// expression evaluated outside of its mathematical domain (log of non-positive T, etc.)
    #[error("Temperature {temperature} K is outside the domain of {expression}: {reason}")]
    DomainError {
        temperature: f64,
        expression: String,
        reason: String,
    },
    #[error("Invalid temperature range: {start} - {end} K with {samples} samples")]
    InvalidTemperatureRange { start: f64, end: f64, samples: usize },
    #[error("No segment found for temperature {temperature} K. Valid range: {range}")]
    NoSegmentFound { temperature: f64, range: String },
    #[error("Phase '{0}' has no temperature segments")]
    EmptyPhase(String),
    /// evaluation of a named phase failed
    #[error("Phase '{phase}': {source}")]
    PhaseFailed {
        phase: String,
        #[source]
        source: Box<GibbsError>,
    },
    #[error("Nothing to plot: {0}")]
    NothingToPlot(String),
    #[error("Failed to deserialize melting task: {0}")]
    DeserializationError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GibbsError {
    /// wraps an error with the name of the phase it came from
    pub fn in_phase(self, phase: &str) -> Self {
        match self {
            GibbsError::PhaseFailed { .. } => self,
            other => GibbsError::PhaseFailed {
                phase: phase.to_string(),
                source: Box::new(other),
            },
        }
    }
    /// true for errors caused by evaluating an expression outside its domain
    pub fn is_domain_error(&self) -> bool {
        match self {
            GibbsError::DomainError { .. } => true,
            GibbsError::PhaseFailed { source, .. } => source.is_domain_error(),
            _ => false,
        }
    }
    /// true when a temperature fell outside every segment of a phase
    pub fn is_missing_segment(&self) -> bool {
        match self {
            GibbsError::NoSegmentFound { .. } => true,
            GibbsError::PhaseFailed { source, .. } => source.is_missing_segment(),
            _ => false,
        }
    }
}

impl From<serde_json::Error> for GibbsError {
    fn from(err: serde_json::Error) -> Self {
        GibbsError::DeserializationError(err.to_string())
    }
}
