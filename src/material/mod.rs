//! Implements the constitutive models evaluated at material (integration) points

mod drucker_prager;
mod effective_stress;
mod linear_elastic;
mod local_state;
mod material_points;
mod power_law;
mod properties;
mod stiffness;
mod stress_strain;
#[cfg(test)]
mod testing;
pub use crate::material::drucker_prager::*;
pub use crate::material::effective_stress::*;
pub use crate::material::linear_elastic::*;
pub use crate::material::local_state::*;
pub use crate::material::material_points::*;
pub use crate::material::power_law::*;
pub use crate::material::properties::*;
pub use crate::material::stiffness::*;
pub use crate::material::stress_strain::*;
