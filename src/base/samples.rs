use super::{ParamDruckerPrager, ParamElastic, ParamPowerLaw};

/// Holds samples of material parameters
pub struct SampleParams {}

impl SampleParams {
    /// Returns sample parameters for a linear elastic rock (SI units)
    pub fn param_elastic() -> ParamElastic {
        ParamElastic {
            density: 2500.0, // kg/m³
            vs: 3000.0,      // m/s
            vp: 5196.0,      // m/s
        }
    }

    /// Returns sample parameters for a Drucker-Prager rock (SI units)
    pub fn param_drucker_prager() -> ParamDruckerPrager {
        ParamDruckerPrager {
            density: 2500.0,        // kg/m³
            vs: 3000.0,             // m/s
            vp: 5196.0,             // m/s
            friction_angle: 30.0,   // degrees
            cohesion: 3e5,          // Pa
            dilatation_angle: 20.0, // degrees
        }
    }

    /// Returns sample parameters for a power-law viscoelastic rock (SI units)
    pub fn param_power_law() -> ParamPowerLaw {
        ParamPowerLaw {
            density: 2500.0,             // kg/m³
            vs: 3000.0,                  // m/s
            vp: 5196.0,                  // m/s
            reference_strain_rate: 1e-6, // 1/s
            reference_stress: 1e6,       // Pa
            power_law_exponent: 3.0,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
