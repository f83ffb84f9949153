use crate::base::{MaterialError, ParamDruckerPrager, ParamElastic, ParamPowerLaw, Scales};
use serde::{Deserialize, Serialize};

/// Holds the properties of the linear elastic model
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElasticProperties {
    /// Mass density ρ
    pub density: f64,

    /// Shear modulus μ
    pub mu: f64,

    /// Lamé's first parameter λ
    pub lambda: f64,
}

/// Holds the properties of the Drucker-Prager elastoplastic model
///
/// The yield function and plastic potential are:
///
/// ```text
/// F = 3 αY σm + sqrt(J₂) − β
/// G = 3 αF σm + sqrt(J₂)
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DruckerPragerProperties {
    /// Mass density ρ
    pub density: f64,

    /// Shear modulus μ
    pub mu: f64,

    /// Lamé's first parameter λ
    pub lambda: f64,

    /// Friction coefficient of the yield function αY
    pub alpha_yield: f64,

    /// Cohesion term of the yield function β
    pub beta: f64,

    /// Dilatancy coefficient of the plastic potential αF
    pub alpha_flow: f64,
}

/// Holds the properties of the power-law viscoelastic model
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PowerLawProperties {
    /// Mass density ρ
    pub density: f64,

    /// Shear modulus μ
    pub mu: f64,

    /// Lamé's first parameter λ
    pub lambda: f64,

    /// Reference strain rate ε̇_ref
    pub reference_strain_rate: f64,

    /// Reference stress σ_ref
    pub reference_stress: f64,

    /// Power-law exponent n
    pub power_law_exponent: f64,
}

/// Computes (μ, λ) from density and wave speeds, collecting any invalid value
fn elastic_moduli(density: f64, vs: f64, vp: f64, errors: &mut Vec<String>) -> (f64, f64) {
    if !(density > 0.0) {
        errors.push(format!("density = {:?}", density));
    }
    if !(vs > 0.0) {
        errors.push(format!("vs = {:?}", vs));
    }
    if !(vp > 0.0) {
        errors.push(format!("vp = {:?}", vp));
    }
    let mu = density * vs * vs;
    let lambda = density * vp * vp - 2.0 * mu;
    if errors.is_empty() && !(lambda > 0.0) {
        errors.push(format!("lambda = {:?} (vp = {:?}, vs = {:?})", lambda, vp, vs));
    }
    (mu, lambda)
}

/// Converts the collected messages into an error
fn check(errors: Vec<String>) -> Result<(), MaterialError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(MaterialError::InvalidProperty(errors.join("; ")))
    }
}

/// Returns the Drucker-Prager coefficient 2 sin(θ) / (√3 (3 − sin(θ)))
///
/// This choice makes the cone circumscribe the Mohr-Coulomb pyramid.
pub fn drucker_prager_alpha(angle_radians: f64) -> f64 {
    let s = f64::sin(angle_radians);
    2.0 * s / (f64::sqrt(3.0) * (3.0 - s))
}

impl ElasticProperties {
    /// Computes the properties from the raw parameters
    pub fn from_param(param: &ParamElastic) -> Result<Self, MaterialError> {
        let mut errors = Vec::new();
        let (mu, lambda) = elastic_moduli(param.density, param.vs, param.vp, &mut errors);
        check(errors)?;
        Ok(ElasticProperties {
            density: param.density,
            mu,
            lambda,
        })
    }

    /// Returns the bulk modulus K = λ + 2μ/3
    pub fn bulk_modulus(&self) -> f64 {
        self.lambda + 2.0 * self.mu / 3.0
    }

    /// Returns a nondimensional copy
    pub fn nondimensionalize(&self, scales: &Scales) -> Self {
        ElasticProperties {
            density: Scales::nondimensionalize(self.density, scales.density),
            mu: Scales::nondimensionalize(self.mu, scales.pressure),
            lambda: Scales::nondimensionalize(self.lambda, scales.pressure),
        }
    }

    /// Returns a dimensional copy
    pub fn dimensionalize(&self, scales: &Scales) -> Self {
        ElasticProperties {
            density: Scales::dimensionalize(self.density, scales.density),
            mu: Scales::dimensionalize(self.mu, scales.pressure),
            lambda: Scales::dimensionalize(self.lambda, scales.pressure),
        }
    }
}

impl DruckerPragerProperties {
    /// Computes the properties from the raw parameters
    pub fn from_param(param: &ParamDruckerPrager) -> Result<Self, MaterialError> {
        let mut errors = Vec::new();
        let (mu, lambda) = elastic_moduli(param.density, param.vs, param.vp, &mut errors);
        if !(param.friction_angle >= 0.0) {
            errors.push(format!("friction_angle = {:?}", param.friction_angle));
        }
        if !(param.cohesion > 0.0) {
            errors.push(format!("cohesion = {:?}", param.cohesion));
        }
        if !(param.dilatation_angle >= 0.0) {
            errors.push(format!("dilatation_angle = {:?}", param.dilatation_angle));
        }
        if param.friction_angle < param.dilatation_angle {
            errors.push(format!(
                "friction_angle = {:?} must not be smaller than dilatation_angle = {:?}",
                param.friction_angle, param.dilatation_angle
            ));
        }
        check(errors)?;
        let phi = param.friction_angle.to_radians();
        let psi = param.dilatation_angle.to_radians();
        let (sin_phi, cos_phi) = (f64::sin(phi), f64::cos(phi));
        Ok(DruckerPragerProperties {
            density: param.density,
            mu,
            lambda,
            alpha_yield: drucker_prager_alpha(phi),
            beta: 6.0 * param.cohesion * cos_phi / (f64::sqrt(3.0) * (3.0 - sin_phi)),
            alpha_flow: drucker_prager_alpha(psi),
        })
    }

    /// Returns the bulk modulus K = λ + 2μ/3
    pub fn bulk_modulus(&self) -> f64 {
        self.lambda + 2.0 * self.mu / 3.0
    }

    /// Returns the elastic subset of the properties
    pub fn elastic(&self) -> ElasticProperties {
        ElasticProperties {
            density: self.density,
            mu: self.mu,
            lambda: self.lambda,
        }
    }

    /// Returns a nondimensional copy
    pub fn nondimensionalize(&self, scales: &Scales) -> Self {
        DruckerPragerProperties {
            density: Scales::nondimensionalize(self.density, scales.density),
            mu: Scales::nondimensionalize(self.mu, scales.pressure),
            lambda: Scales::nondimensionalize(self.lambda, scales.pressure),
            alpha_yield: self.alpha_yield,
            beta: Scales::nondimensionalize(self.beta, scales.pressure),
            alpha_flow: self.alpha_flow,
        }
    }

    /// Returns a dimensional copy
    pub fn dimensionalize(&self, scales: &Scales) -> Self {
        DruckerPragerProperties {
            density: Scales::dimensionalize(self.density, scales.density),
            mu: Scales::dimensionalize(self.mu, scales.pressure),
            lambda: Scales::dimensionalize(self.lambda, scales.pressure),
            alpha_yield: self.alpha_yield,
            beta: Scales::dimensionalize(self.beta, scales.pressure),
            alpha_flow: self.alpha_flow,
        }
    }
}

impl PowerLawProperties {
    /// Computes the properties from the raw parameters
    pub fn from_param(param: &ParamPowerLaw) -> Result<Self, MaterialError> {
        let mut errors = Vec::new();
        let (mu, lambda) = elastic_moduli(param.density, param.vs, param.vp, &mut errors);
        if !(param.reference_strain_rate > 0.0) {
            errors.push(format!("reference_strain_rate = {:?}", param.reference_strain_rate));
        }
        if !(param.reference_stress > 0.0) {
            errors.push(format!("reference_stress = {:?}", param.reference_stress));
        }
        if !(param.power_law_exponent >= 1.0) {
            errors.push(format!("power_law_exponent = {:?}", param.power_law_exponent));
        }
        check(errors)?;
        Ok(PowerLawProperties {
            density: param.density,
            mu,
            lambda,
            reference_strain_rate: param.reference_strain_rate,
            reference_stress: param.reference_stress,
            power_law_exponent: param.power_law_exponent,
        })
    }

    /// Returns the bulk modulus K = λ + 2μ/3
    pub fn bulk_modulus(&self) -> f64 {
        self.lambda + 2.0 * self.mu / 3.0
    }

    /// Returns the elastic subset of the properties
    pub fn elastic(&self) -> ElasticProperties {
        ElasticProperties {
            density: self.density,
            mu: self.mu,
            lambda: self.lambda,
        }
    }

    /// Returns a nondimensional copy
    pub fn nondimensionalize(&self, scales: &Scales) -> Self {
        PowerLawProperties {
            density: Scales::nondimensionalize(self.density, scales.density),
            mu: Scales::nondimensionalize(self.mu, scales.pressure),
            lambda: Scales::nondimensionalize(self.lambda, scales.pressure),
            reference_strain_rate: Scales::nondimensionalize(self.reference_strain_rate, scales.strain_rate()),
            reference_stress: Scales::nondimensionalize(self.reference_stress, scales.pressure),
            power_law_exponent: self.power_law_exponent,
        }
    }

    /// Returns a dimensional copy
    pub fn dimensionalize(&self, scales: &Scales) -> Self {
        PowerLawProperties {
            density: Scales::dimensionalize(self.density, scales.density),
            mu: Scales::dimensionalize(self.mu, scales.pressure),
            lambda: Scales::dimensionalize(self.lambda, scales.pressure),
            reference_strain_rate: Scales::dimensionalize(self.reference_strain_rate, scales.strain_rate()),
            reference_stress: Scales::dimensionalize(self.reference_stress, scales.pressure),
            power_law_exponent: self.power_law_exponent,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
