use crate::base::{Scales, Tensor6};
use serde::{Deserialize, Serialize};

/// Holds the history data of a material point
///
/// This data is associated with an integration point and is owned by the caller.
/// The models only overwrite it in [crate::material::StressStrainTrait::update_state].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalState {
    /// Holds the irreversible strain: plastic (Drucker-Prager) or viscous (power-law)
    pub inelastic_strain: Tensor6,

    /// Holds the stress at the end of the previous step (power-law)
    pub stress: Tensor6,

    /// Holds the apex return flag of the last plastic update (Drucker-Prager)
    pub apex_return: bool,
}

/// Holds the kinematic input of a material point for the current step
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PointInput {
    /// Holds the total strain ε at the end of the step
    pub total_strain: Tensor6,

    /// Holds the initial strain ε₀
    pub initial_strain: Tensor6,

    /// Holds the initial stress σ₀
    pub initial_stress: Tensor6,
}

impl LocalState {
    /// Allocates a new instance with zero history
    pub fn new() -> Self {
        LocalState {
            inelastic_strain: Tensor6::new(),
            stress: Tensor6::new(),
            apex_return: false,
        }
    }

    /// Returns a nondimensional copy (strains are already dimensionless)
    pub fn nondimensionalize(&self, scales: &Scales) -> Self {
        LocalState {
            stress: self.stress * (1.0 / scales.pressure),
            ..*self
        }
    }

    /// Returns a dimensional copy
    pub fn dimensionalize(&self, scales: &Scales) -> Self {
        LocalState {
            stress: self.stress * scales.pressure,
            ..*self
        }
    }
}

impl PointInput {
    /// Allocates a new instance with zero initial strain and stress
    pub fn new(total_strain: Tensor6) -> Self {
        PointInput {
            total_strain,
            initial_strain: Tensor6::new(),
            initial_stress: Tensor6::new(),
        }
    }

    /// Allocates a new instance with initial strain and stress
    pub fn with_initial(total_strain: Tensor6, initial_strain: Tensor6, initial_stress: Tensor6) -> Self {
        PointInput {
            total_strain,
            initial_strain,
            initial_stress,
        }
    }

    /// Returns a nondimensional copy
    pub fn nondimensionalize(&self, scales: &Scales) -> Self {
        PointInput {
            initial_stress: self.initial_stress * (1.0 / scales.pressure),
            ..*self
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
