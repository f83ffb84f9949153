use crate::base::MaterialError;
use serde::{Deserialize, Serialize};

/// Holds the reference scales used to nondimensionalize material properties and state variables
///
/// The density scale is derived from the other three:
///
/// ```text
/// ρ₀ = p₀ (t₀ / L₀)²
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scales {
    /// Length scale L₀
    pub length: f64,

    /// Pressure (stress) scale p₀
    pub pressure: f64,

    /// Time scale t₀
    pub time: f64,

    /// Density scale ρ₀
    pub density: f64,
}

impl Scales {
    /// Allocates a new instance with the density scale derived from the other scales
    pub fn new(length: f64, pressure: f64, time: f64) -> Result<Self, MaterialError> {
        if length <= 0.0 || pressure <= 0.0 || time <= 0.0 {
            return Err(MaterialError::InvalidProperty(format!(
                "scales must be positive (length = {:?}, pressure = {:?}, time = {:?})",
                length, pressure, time
            )));
        }
        Ok(Scales {
            length,
            pressure,
            time,
            density: pressure * (time / length) * (time / length),
        })
    }

    /// Returns the unit scales (no scaling)
    pub fn unit() -> Self {
        Scales {
            length: 1.0,
            pressure: 1.0,
            time: 1.0,
            density: 1.0,
        }
    }

    /// Returns the strain-rate scale 1 / t₀
    pub fn strain_rate(&self) -> f64 {
        1.0 / self.time
    }

    /// Returns value / scale
    pub fn nondimensionalize(value: f64, scale: f64) -> f64 {
        value / scale
    }

    /// Returns value * scale
    pub fn dimensionalize(value: f64, scale: f64) -> f64 {
        value * scale
    }
}

impl Default for Scales {
    /// Returns the conventional scales: 1 km, 3e10 Pa, and 1 year
    fn default() -> Self {
        let (length, pressure, time) = (1.0e3, 3.0e10, 3.15576e7);
        Scales {
            length,
            pressure,
            time,
            density: pressure * (time / length) * (time / length),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
