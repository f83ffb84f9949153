use super::{
    set_elastic_stiffness, young_poisson, Behavior, ElasticProperties, LocalState, PointInput, StressStrainTrait,
};
use crate::base::{MaterialError, Tensor6, LARGE_TIME_STEP};
use russell_lab::Matrix;
use russell_tensor::{t4_ddot_t2_update, LinElasticity};

/// Computes the elastic stress
///
/// ```text
/// e = ε − ε₀
/// σ = D : e + σ₀ = λ tr(e) I + 2μ e + σ₀
/// ```
pub fn elastic_stress(
    props: &ElasticProperties,
    strain: &Tensor6,
    initial_strain: &Tensor6,
    initial_stress: &Tensor6,
) -> Tensor6 {
    let (young, poisson) = young_poisson(props.mu, props.lambda);
    let elasticity = LinElasticity::new(young, poisson, false, false);
    let e = (*strain - *initial_strain).to_tensor2();
    let mut sigma = initial_stress.to_tensor2();
    t4_ddot_t2_update(&mut sigma, 1.0, elasticity.get_modulus(), &e, 1.0); // σ = D : e + σ₀
    Tensor6::from_tensor2(&sigma)
}

/// Implements a linear elastic model
pub struct LinearElastic {}

impl LinearElastic {
    /// Allocates a new instance
    pub fn new() -> Self {
        LinearElastic {}
    }
}

impl StressStrainTrait for LinearElastic {
    type Properties = ElasticProperties;

    /// Returns the behavior (always elastic)
    fn behavior(&self) -> Behavior {
        Behavior::Elastic
    }

    /// Ignores the request since the model is always elastic
    fn set_behavior(&mut self, _behavior: Behavior) {}

    /// Indicates that the stiffness matrix is symmetric and constant
    fn symmetric_stiffness(&self) -> bool {
        true
    }

    fn density(&self, props: &ElasticProperties) -> f64 {
        props.density
    }

    /// Computes the stress tensor at the end of the step
    fn stress(
        &self,
        props: &ElasticProperties,
        _state: &LocalState,
        input: &PointInput,
        _compute_state_vars: bool,
    ) -> Result<Tensor6, MaterialError> {
        Ok(elastic_stress(
            props,
            &input.total_strain,
            &input.initial_strain,
            &input.initial_stress,
        ))
    }

    /// Computes the consistent tangent stiffness
    fn stiffness(
        &self,
        dd: &mut Matrix,
        props: &ElasticProperties,
        _state: &LocalState,
        _input: &PointInput,
    ) -> Result<(), MaterialError> {
        set_elastic_stiffness(dd, props.mu, props.lambda);
        Ok(())
    }

    /// Does nothing since there is no history
    fn update_state(
        &self,
        _state: &mut LocalState,
        _props: &ElasticProperties,
        _input: &PointInput,
    ) -> Result<bool, MaterialError> {
        Ok(false)
    }

    fn stable_time_step(&self, _props: &ElasticProperties, _state: &LocalState) -> f64 {
        LARGE_TIME_STEP
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
