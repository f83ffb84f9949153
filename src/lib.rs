//! Pointwise constitutive integration for solid mechanics
//!
//! Given the strain at an integration point, the models in this crate return the stress,
//! the consistent tangent stiffness, and the updated history (plastic or viscous strain)
//! for linear elasticity, Drucker-Prager elastoplasticity, and power-law viscoelasticity.
//!
//! Symmetric tensors are stored in reduced notation with the components
//! `{xx, yy, zz, xy, yz, xz}` (see [base::Tensor6]).

/// Defines a type alias for the error type as a static string
pub type StrError = &'static str;

pub mod base;
pub mod material;
pub mod prelude;
