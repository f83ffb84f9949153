use super::{MaterialError, Scales, DEFAULT_ALPHA, DEFAULT_STABLE_STEP_FRACTION};
use serde::{Deserialize, Serialize};

/// Holds the raw parameters of the linear elastic model
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ParamElastic {
    /// Mass density ρ
    pub density: f64,

    /// Shear-wave speed
    pub vs: f64,

    /// Dilatational-wave speed
    pub vp: f64,
}

/// Holds the raw parameters of the Drucker-Prager elastoplastic model
///
/// The angles are given in degrees.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ParamDruckerPrager {
    /// Mass density ρ
    pub density: f64,

    /// Shear-wave speed
    pub vs: f64,

    /// Dilatational-wave speed
    pub vp: f64,

    /// Friction angle φ (degrees)
    pub friction_angle: f64,

    /// Cohesion c
    pub cohesion: f64,

    /// Dilatation angle ψ (degrees)
    pub dilatation_angle: f64,
}

/// Holds the raw parameters of the power-law viscoelastic model
///
/// The viscous strain rate is given by:
///
/// ```text
/// dεv/dt = ε̇_ref (σ_eff / σ_ref)ⁿ
/// ```
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ParamPowerLaw {
    /// Mass density ρ
    pub density: f64,

    /// Shear-wave speed
    pub vs: f64,

    /// Dilatational-wave speed
    pub vp: f64,

    /// Reference strain rate ε̇_ref
    pub reference_strain_rate: f64,

    /// Reference stress σ_ref
    pub reference_stress: f64,

    /// Power-law exponent n
    pub power_law_exponent: f64,
}

/// Holds parameters for the constitutive models
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(tag = "model")]
pub enum ParamMaterial {
    /// Linear isotropic elasticity
    Elastic(ParamElastic),

    /// Drucker-Prager elastoplasticity with non-associated flow
    DruckerPrager(ParamDruckerPrager),

    /// Power-law (Maxwell-type) viscoelasticity
    PowerLaw(ParamPowerLaw),
}

/// Holds the settings of the effective-stress root-find
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ParamEffectiveStress {
    /// Max number of Newton iterations
    pub max_iterations: usize,

    /// Max number of bracket expansions
    pub max_bracket_iterations: usize,

    /// Factor used to expand the bracket
    pub bracket_factor: f64,

    /// Relative tolerance on the Newton update
    pub tolerance: f64,
}

/// Holds the settings of the time integration of the viscous strain
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ParamTimeIntegration {
    /// Blend factor α of the generalized trapezoidal rule (0 = explicit, 1 = backward Euler)
    pub alpha: f64,

    /// Fraction of the Maxwell time used as the stable time step
    pub stable_step_fraction: f64,
}

/// Holds the configuration of a material point calculation
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct MaterialConfig {
    /// Holds the material parameters
    pub material: ParamMaterial,

    /// Holds the reference scales (None means the parameters are already nondimensional)
    #[serde(default)]
    pub scales: Option<Scales>,

    /// Holds the settings of the effective-stress root-find
    #[serde(default)]
    pub effective_stress: ParamEffectiveStress,

    /// Holds the settings of the time integration
    #[serde(default)]
    pub time_integration: ParamTimeIntegration,
}

impl Default for ParamEffectiveStress {
    fn default() -> Self {
        ParamEffectiveStress {
            max_iterations: 100,
            max_bracket_iterations: 50,
            bracket_factor: 1.6,
            tolerance: 1e-12,
        }
    }
}

impl Default for ParamTimeIntegration {
    fn default() -> Self {
        ParamTimeIntegration {
            alpha: DEFAULT_ALPHA,
            stable_step_fraction: DEFAULT_STABLE_STEP_FRACTION,
        }
    }
}

impl ParamEffectiveStress {
    /// Validates the settings
    pub fn validate(&self) -> Result<(), MaterialError> {
        if self.max_iterations < 1 || self.max_bracket_iterations < 1 {
            return Err(MaterialError::InvalidProperty(
                "the root-find requires at least one iteration".to_string(),
            ));
        }
        if !(self.bracket_factor > 1.0) {
            return Err(MaterialError::InvalidProperty(format!(
                "bracket_factor must be greater than 1 (found {:?})",
                self.bracket_factor
            )));
        }
        if !(self.tolerance > 0.0) {
            return Err(MaterialError::InvalidProperty(format!(
                "tolerance must be positive (found {:?})",
                self.tolerance
            )));
        }
        Ok(())
    }
}

impl ParamTimeIntegration {
    /// Validates the settings
    pub fn validate(&self) -> Result<(), MaterialError> {
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(MaterialError::InvalidProperty(format!(
                "alpha must be in [0, 1] (found {:?})",
                self.alpha
            )));
        }
        if !(self.stable_step_fraction > 0.0) {
            return Err(MaterialError::InvalidProperty(format!(
                "stable_step_fraction must be positive (found {:?})",
                self.stable_step_fraction
            )));
        }
        Ok(())
    }
}

impl MaterialConfig {
    /// Reads the configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, MaterialError> {
        let config: MaterialConfig = serde_json::from_str(json)
            .map_err(|e| MaterialError::InvalidProperty(format!("cannot parse JSON: {}", e)))?;
        config.effective_stress.validate()?;
        config.time_integration.validate()?;
        Ok(config)
    }

    /// Writes the configuration to a JSON string
    pub fn to_json(&self) -> Result<String, MaterialError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| MaterialError::InvalidProperty(format!("cannot write JSON: {}", e)))
    }

    /// Returns the scales or the unit scales if none are given
    pub fn scales_or_unit(&self) -> Scales {
        self.scales.unwrap_or_else(Scales::unit)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
