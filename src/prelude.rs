//! Makes available common structures needed to evaluate material points
//!
//! You may write `use matpoint::prelude::*` in your code and obtain
//! access to commonly used functionality.

pub use crate::base::{
    MaterialConfig, MaterialError, ParamDruckerPrager, ParamEffectiveStress, ParamElastic, ParamMaterial,
    ParamPowerLaw, ParamTimeIntegration, SampleParams, Scales, Tensor6,
};
pub use crate::material::{
    Behavior, DruckerPrager, DruckerPragerProperties, ElasticProperties, LinearElastic, LocalState, MaterialPoints,
    PointInput, PowerLaw, PowerLawProperties, StressStrain, StressStrainTrait,
};
