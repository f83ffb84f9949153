use super::{
    flatten_stiffness, new_stiffness, DruckerPrager, DruckerPragerProperties, ElasticProperties, LinearElastic,
    LocalState, PointInput, PowerLaw, PowerLawProperties,
};
use crate::base::{MaterialConfig, MaterialError, ParamMaterial, Tensor6};
use russell_lab::Matrix;
use serde::{Deserialize, Serialize};

/// Selects the behavior of an inelastic model
///
/// The host switches between the two, e.g., elastic during the computation of the
/// initial (prestressed) state, and inelastic afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Behavior {
    /// Linear elastic response; the inelastic strain is reset by update_state
    Elastic,

    /// Plastic or viscoelastic response
    Inelastic,
}

/// Specifies the essential functions for stress-strain models
///
/// The models do not hold any per-point data. The properties and the history
/// ([LocalState]) are owned by the caller and passed to each call; thus, a model may be
/// shared across threads.
pub trait StressStrainTrait: Sync {
    /// Holds the (derived) material properties consumed by the model
    type Properties: Copy + Send + Sync;

    /// Returns the current behavior
    fn behavior(&self) -> Behavior;

    /// Sets the behavior
    fn set_behavior(&mut self, behavior: Behavior);

    /// Indicates that the stiffness matrix is symmetric
    fn symmetric_stiffness(&self) -> bool;

    /// Returns the mass density
    fn density(&self, props: &Self::Properties) -> f64;

    /// Computes the stress tensor at the end of the step
    ///
    /// If `compute_state_vars` is false, the stress is computed from the history already
    /// stored in `state` (i.e., after [StressStrainTrait::update_state] has been called).
    fn stress(
        &self,
        props: &Self::Properties,
        state: &LocalState,
        input: &PointInput,
        compute_state_vars: bool,
    ) -> Result<Tensor6, MaterialError>;

    /// Computes the consistent tangent stiffness
    fn stiffness(
        &self,
        dd: &mut Matrix,
        props: &Self::Properties,
        state: &LocalState,
        input: &PointInput,
    ) -> Result<(), MaterialError>;

    /// Updates the history at the end of a converged step
    ///
    /// Returns true if the stiffness must be recomputed.
    fn update_state(
        &self,
        state: &mut LocalState,
        props: &Self::Properties,
        input: &PointInput,
    ) -> Result<bool, MaterialError>;

    /// Returns the stable time step for explicit time integration
    fn stable_time_step(&self, props: &Self::Properties, state: &LocalState) -> f64;
}

/// Holds a stress-strain model together with its properties, as selected by a configuration
pub enum StressStrain {
    /// Linear elastic model
    LinearElastic {
        model: LinearElastic,
        props: ElasticProperties,
    },

    /// Drucker-Prager elastoplastic model
    DruckerPrager {
        model: DruckerPrager,
        props: DruckerPragerProperties,
    },

    /// Power-law viscoelastic model
    PowerLaw {
        model: PowerLaw,
        props: PowerLawProperties,
    },
}

impl StressStrain {
    /// Allocates a new instance
    ///
    /// If the configuration provides reference scales, the properties are nondimensionalized;
    /// then, all strains, stresses, and times passed to this instance must be nondimensional.
    pub fn new(config: &MaterialConfig, dt: f64) -> Result<Self, MaterialError> {
        let scales = config.scales_or_unit();
        let model = match config.material {
            ParamMaterial::Elastic(param) => StressStrain::LinearElastic {
                model: LinearElastic::new(),
                props: ElasticProperties::from_param(&param)?.nondimensionalize(&scales),
            },
            ParamMaterial::DruckerPrager(param) => StressStrain::DruckerPrager {
                model: DruckerPrager::new(),
                props: DruckerPragerProperties::from_param(&param)?.nondimensionalize(&scales),
            },
            ParamMaterial::PowerLaw(param) => StressStrain::PowerLaw {
                model: PowerLaw::new(dt, config.time_integration, config.effective_stress)?,
                props: PowerLawProperties::from_param(&param)?.nondimensionalize(&scales),
            },
        };
        Ok(model)
    }

    /// Returns the current behavior
    pub fn behavior(&self) -> Behavior {
        match self {
            StressStrain::LinearElastic { model, .. } => model.behavior(),
            StressStrain::DruckerPrager { model, .. } => model.behavior(),
            StressStrain::PowerLaw { model, .. } => model.behavior(),
        }
    }

    /// Sets the behavior
    pub fn set_behavior(&mut self, behavior: Behavior) {
        match self {
            StressStrain::LinearElastic { model, .. } => model.set_behavior(behavior),
            StressStrain::DruckerPrager { model, .. } => model.set_behavior(behavior),
            StressStrain::PowerLaw { model, .. } => model.set_behavior(behavior),
        }
    }

    /// Sets the time step (used by rate-dependent models only)
    pub fn set_time_step(&mut self, dt: f64) -> Result<(), MaterialError> {
        match self {
            StressStrain::PowerLaw { model, .. } => model.set_time_step(dt),
            _ => Ok(()),
        }
    }

    /// Indicates that the stiffness matrix is symmetric
    pub fn symmetric_stiffness(&self) -> bool {
        match self {
            StressStrain::LinearElastic { model, .. } => model.symmetric_stiffness(),
            StressStrain::DruckerPrager { model, .. } => model.symmetric_stiffness(),
            StressStrain::PowerLaw { model, .. } => model.symmetric_stiffness(),
        }
    }

    /// Returns the mass density
    pub fn density(&self) -> f64 {
        match self {
            StressStrain::LinearElastic { model, props } => model.density(props),
            StressStrain::DruckerPrager { model, props } => model.density(props),
            StressStrain::PowerLaw { model, props } => model.density(props),
        }
    }

    /// Computes the stress tensor at the end of the step
    pub fn stress(
        &self,
        state: &LocalState,
        input: &PointInput,
        compute_state_vars: bool,
    ) -> Result<Tensor6, MaterialError> {
        match self {
            StressStrain::LinearElastic { model, props } => model.stress(props, state, input, compute_state_vars),
            StressStrain::DruckerPrager { model, props } => model.stress(props, state, input, compute_state_vars),
            StressStrain::PowerLaw { model, props } => model.stress(props, state, input, compute_state_vars),
        }
    }

    /// Computes the consistent tangent stiffness
    pub fn stiffness(&self, dd: &mut Matrix, state: &LocalState, input: &PointInput) -> Result<(), MaterialError> {
        match self {
            StressStrain::LinearElastic { model, props } => model.stiffness(dd, props, state, input),
            StressStrain::DruckerPrager { model, props } => model.stiffness(dd, props, state, input),
            StressStrain::PowerLaw { model, props } => model.stiffness(dd, props, state, input),
        }
    }

    /// Computes the consistent tangent in the flat layout (21 symmetric or 36 full entries)
    pub fn tangent(&self, state: &LocalState, input: &PointInput) -> Result<Vec<f64>, MaterialError> {
        let mut dd = new_stiffness();
        self.stiffness(&mut dd, state, input)?;
        Ok(flatten_stiffness(&dd, self.symmetric_stiffness()))
    }

    /// Updates the history at the end of a converged step
    pub fn update_state(&self, state: &mut LocalState, input: &PointInput) -> Result<bool, MaterialError> {
        match self {
            StressStrain::LinearElastic { model, props } => model.update_state(state, props, input),
            StressStrain::DruckerPrager { model, props } => model.update_state(state, props, input),
            StressStrain::PowerLaw { model, props } => model.update_state(state, props, input),
        }
    }

    /// Returns the stable time step for explicit time integration
    pub fn stable_time_step(&self, state: &LocalState) -> f64 {
        match self {
            StressStrain::LinearElastic { model, props } => model.stable_time_step(props, state),
            StressStrain::DruckerPrager { model, props } => model.stable_time_step(props, state),
            StressStrain::PowerLaw { model, props } => model.stable_time_step(props, state),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
