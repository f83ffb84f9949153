use thiserror::Error;

/// Holds the errors reported by the constitutive models
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MaterialError {
    /// One or more raw material parameters are out of range
    #[error("invalid material property: {0}")]
    InvalidProperty(String),

    /// The effective-stress root-find did not converge
    #[error(
        "effective stress root-find did not converge after {iterations} iterations (last value = {effective_stress:?})"
    )]
    NonConvergence { iterations: usize, effective_stress: f64 },

    /// The effective-stress root could not be bracketed
    #[error("cannot bracket the effective stress root in [{lower:?}, {upper:?}]")]
    BracketFailure { lower: f64, upper: f64 },

    /// The effective-stress root-find returned a negative value
    #[error("effective stress must be non-negative (found {0:?})")]
    NonPositiveEffectiveStress(f64),

    /// A static error message (e.g., from the tensor stack)
    #[error("{0}")]
    Static(&'static str),
}

impl From<&'static str> for MaterialError {
    fn from(message: &'static str) -> Self {
        MaterialError::Static(message)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
