use super::{
    elastic_stress, set_elastic_stiffness, Behavior, DruckerPragerProperties, LocalState, PointInput,
    StressStrainTrait,
};
use crate::base::{mean_deviatoric_split, MaterialError, Tensor6, DIAG, LARGE_TIME_STEP, TENSOR_SIZE, WEIGHTS};
use russell_lab::Matrix;
use russell_tensor::SQRT_2;

/// Implements the Drucker-Prager elastoplastic model with non-associated flow
///
/// The yield function and plastic potential are:
///
/// ```text
/// F = 3 αY σm + sqrt(J₂) − β
/// G = 3 αF σm + sqrt(J₂)
/// ```
///
/// The return mapping is computed in closed form: with the elastic compliances
/// `ae = 1/(2μ)` and `am = 1/(3K)`, the plastic multiplier is
///
/// ```text
/// Δλ = 2 ae am F_trial / (6 αY αF ae + am)
/// ```
///
/// and the corrected state lies exactly on the yield surface. Trial states beyond the
/// apex (where the radial return would flip the deviator) are returned to the apex
/// `σ = β / (3 αY) I` with a vanishing tangent.
pub struct DruckerPrager {
    behavior: Behavior,
}

/// Holds the elastic-predictor values of one evaluation
struct Trial {
    /// Deviatoric compliance 1/(2μ)
    ae: f64,

    /// Volumetric compliance 1/(3K)
    am: f64,

    /// Mean elastic strain (total minus plastic minus initial)
    mean_strain: f64,

    /// Mean initial stress
    mean_initial_stress: f64,

    /// Deviatoric elastic strain plus ae times the initial deviatoric stress
    t: Tensor6,

    /// Norm of t
    d: f64,

    /// Yield function at the trial state
    yield_value: f64,
}

/// Holds the plastic correction of one evaluation
enum Correction {
    /// Radial return onto the cone
    Cone {
        /// Closed-form factor: Δλ = c1 F_trial
        c1: f64,

        /// Plastic multiplier Δλ
        lambda: f64,
    },

    /// Return onto the apex of the cone
    Apex {
        /// Mean stress at the apex β / (3 αY)
        mean_stress: f64,

        /// Mean plastic strain increment
        mean_plastic: f64,
    },
}

impl DruckerPrager {
    /// Allocates a new instance (in inelastic mode)
    pub fn new() -> Self {
        DruckerPrager {
            behavior: Behavior::Inelastic,
        }
    }

    /// Computes the elastic predictor from the previous plastic strain
    fn trial(props: &DruckerPragerProperties, state: &LocalState, input: &PointInput) -> Trial {
        let ae = 1.0 / (2.0 * props.mu);
        let am = 1.0 / (3.0 * props.bulk_modulus());
        let (mean_total, dev_total) = mean_deviatoric_split(&input.total_strain);
        let (mean_plastic, dev_plastic) = mean_deviatoric_split(&state.inelastic_strain);
        let (mean_initial, dev_initial) = mean_deviatoric_split(&input.initial_strain);
        let (mean_initial_stress, dev_initial_stress) = mean_deviatoric_split(&input.initial_stress);
        let mean_strain = mean_total - mean_plastic - mean_initial;
        let t = dev_total - dev_plastic - dev_initial + dev_initial_stress * ae;
        let d = t.norm();
        let mean_stress = mean_strain / am + mean_initial_stress;
        let yield_value = 3.0 * props.alpha_yield * mean_stress + d / (SQRT_2 * ae) - props.beta;
        Trial {
            ae,
            am,
            mean_strain,
            mean_initial_stress,
            t,
            d,
            yield_value,
        }
    }

    /// Returns the plastic correction if the trial state yields
    ///
    /// The cone return is valid while `Δλ < √2 d`; otherwise (including d = 0) the
    /// deviator vanishes and the mean stress is brought to the apex.
    fn correction(props: &DruckerPragerProperties, trial: &Trial) -> Option<Correction> {
        if trial.yield_value < 0.0 {
            return None;
        }
        let c1 = 2.0 * trial.ae * trial.am / (6.0 * props.alpha_yield * props.alpha_flow * trial.ae + trial.am);
        let lambda = c1 * trial.yield_value;
        if lambda < SQRT_2 * trial.d {
            return Some(Correction::Cone { c1, lambda });
        }
        if props.alpha_yield <= 0.0 {
            log::debug!("Drucker-Prager: no apex with αY = 0 (F = {:?}); elastic response", trial.yield_value);
            return None;
        }
        let mean_stress = props.beta / (3.0 * props.alpha_yield);
        let mean_trial = trial.mean_strain / trial.am + trial.mean_initial_stress;
        let mean_plastic = trial.am * (mean_trial - mean_stress);
        log::debug!(
            "Drucker-Prager: apex return (Δλ = {:?}, d = {:?}, Δεp_m = {:?})",
            lambda,
            trial.d,
            mean_plastic
        );
        Some(Correction::Apex {
            mean_stress,
            mean_plastic,
        })
    }

    /// Computes the stress on the yield surface
    fn corrected_stress(props: &DruckerPragerProperties, trial: &Trial, corr: &Correction) -> Tensor6 {
        match corr {
            Correction::Cone { lambda, .. } => {
                let r = lambda / (SQRT_2 * trial.d);
                let mean_stress =
                    (trial.mean_strain - lambda * props.alpha_flow) / trial.am + trial.mean_initial_stress;
                let mut sigma = Tensor6::new();
                for i in 0..TENSOR_SIZE {
                    sigma[i] = trial.t[i] / trial.ae * (1.0 - r) + DIAG[i] * mean_stress;
                }
                sigma
            }
            Correction::Apex { mean_stress, .. } => Tensor6::new_isotropic(*mean_stress),
        }
    }

    /// Computes the plastic strain increment
    ///
    /// ```text
    /// cone: Δεp = Δλ ∂G/∂σ = Δλ (αF I + t / (√2 d))
    /// apex: Δεp = t + Δεp_m I
    /// ```
    fn plastic_increment(props: &DruckerPragerProperties, trial: &Trial, corr: &Correction) -> Tensor6 {
        let mut increment = Tensor6::new();
        match corr {
            Correction::Cone { lambda, .. } => {
                for i in 0..TENSOR_SIZE {
                    increment[i] = lambda * trial.t[i] / (SQRT_2 * trial.d) + DIAG[i] * lambda * props.alpha_flow;
                }
            }
            Correction::Apex { mean_plastic, .. } => {
                for i in 0..TENSOR_SIZE {
                    increment[i] = trial.t[i] + DIAG[i] * mean_plastic;
                }
            }
        }
        increment
    }
}

impl StressStrainTrait for DruckerPrager {
    type Properties = DruckerPragerProperties;

    fn behavior(&self) -> Behavior {
        self.behavior
    }

    fn set_behavior(&mut self, behavior: Behavior) {
        self.behavior = behavior;
    }

    /// Indicates that the stiffness matrix is non-symmetric (non-associated flow)
    fn symmetric_stiffness(&self) -> bool {
        false
    }

    fn density(&self, props: &DruckerPragerProperties) -> f64 {
        props.density
    }

    /// Computes the stress tensor at the end of the step
    fn stress(
        &self,
        props: &DruckerPragerProperties,
        state: &LocalState,
        input: &PointInput,
        compute_state_vars: bool,
    ) -> Result<Tensor6, MaterialError> {
        let elastic = props.elastic();
        if self.behavior == Behavior::Elastic {
            return Ok(elastic_stress(
                &elastic,
                &input.total_strain,
                &input.initial_strain,
                &input.initial_stress,
            ));
        }
        let elastic_strain = input.total_strain - state.inelastic_strain;
        if !compute_state_vars {
            return Ok(elastic_stress(
                &elastic,
                &elastic_strain,
                &input.initial_strain,
                &input.initial_stress,
            ));
        }
        let trial = DruckerPrager::trial(props, state, input);
        match DruckerPrager::correction(props, &trial) {
            Some(corr) => Ok(DruckerPrager::corrected_stress(props, &trial, &corr)),
            None => Ok(elastic_stress(
                &elastic,
                &elastic_strain,
                &input.initial_strain,
                &input.initial_stress,
            )),
        }
    }

    /// Computes the consistent tangent stiffness
    ///
    /// With `r = Δλ / (√2 d)` and `P = I − ⅓ diag ⊗ diag`:
    ///
    /// ```text
    /// ∂d/∂εj  = (wj tj − diagj tr(t)/3) / d
    /// ∂Δλ/∂εj = c1 (αY diagj / am + ∂d/∂εj / (√2 ae))
    /// ∂r/∂εj  = (∂Δλ/∂εj − Δλ ∂d/∂εj / d) / (√2 d)
    /// Dij     = Pij (1 − r) / ae − ti ∂r/∂εj / ae + diagi (diagj / (3 am) − αF ∂Δλ/∂εj / am)
    /// ```
    fn stiffness(
        &self,
        dd: &mut Matrix,
        props: &DruckerPragerProperties,
        state: &LocalState,
        input: &PointInput,
    ) -> Result<(), MaterialError> {
        if self.behavior == Behavior::Elastic {
            set_elastic_stiffness(dd, props.mu, props.lambda);
            return Ok(());
        }
        let trial = DruckerPrager::trial(props, state, input);
        let (c1, lambda) = match DruckerPrager::correction(props, &trial) {
            Some(Correction::Cone { c1, lambda }) => (c1, lambda),
            Some(Correction::Apex { .. }) => {
                // the apex stress does not depend on the strain
                dd.fill(0.0);
                return Ok(());
            }
            None => {
                set_elastic_stiffness(dd, props.mu, props.lambda);
                return Ok(());
            }
        };
        let (ae, am, d, t) = (trial.ae, trial.am, trial.d, &trial.t);
        let r = lambda / (SQRT_2 * d);
        let tr_t = t.trace();
        let mut d_d = [0.0; TENSOR_SIZE];
        let mut d_lambda = [0.0; TENSOR_SIZE];
        let mut d_r = [0.0; TENSOR_SIZE];
        for j in 0..TENSOR_SIZE {
            d_d[j] = (WEIGHTS[j] * t[j] - DIAG[j] * tr_t / 3.0) / d;
            d_lambda[j] = c1 * (props.alpha_yield * DIAG[j] / am + d_d[j] / (SQRT_2 * ae));
            d_r[j] = (d_lambda[j] - lambda * d_d[j] / d) / (SQRT_2 * d);
        }
        for i in 0..TENSOR_SIZE {
            for j in 0..TENSOR_SIZE {
                let pp = if i == j { 1.0 } else { 0.0 } - DIAG[i] * DIAG[j] / 3.0;
                let d_dev = pp * (1.0 - r) / ae - t[i] * d_r[j] / ae;
                let d_mean = DIAG[j] / (3.0 * am) - props.alpha_flow * d_lambda[j] / am;
                dd.set(i, j, d_dev + DIAG[i] * d_mean);
            }
        }
        Ok(())
    }

    /// Updates the plastic strain at the end of a converged step
    ///
    /// In elastic mode, the plastic strain is reset to zero.
    fn update_state(
        &self,
        state: &mut LocalState,
        props: &DruckerPragerProperties,
        input: &PointInput,
    ) -> Result<bool, MaterialError> {
        if self.behavior == Behavior::Elastic {
            state.inelastic_strain = Tensor6::new();
            state.apex_return = false;
            return Ok(true);
        }
        let trial = DruckerPrager::trial(props, state, input);
        state.apex_return = false;
        if let Some(corr) = DruckerPrager::correction(props, &trial) {
            log::debug!("Drucker-Prager: yielding with F = {:?}", trial.yield_value);
            let increment = DruckerPrager::plastic_increment(props, &trial, &corr);
            state.inelastic_strain = state.inelastic_strain + increment;
            state.apex_return = matches!(corr, Correction::Apex { .. });
        }
        Ok(true)
    }

    /// Returns a large value (no intrinsic time scale)
    fn stable_time_step(&self, _props: &DruckerPragerProperties, _state: &LocalState) -> f64 {
        LARGE_TIME_STEP
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::DruckerPrager;
    use crate::base::{Tensor6, LARGE_TIME_STEP};
    use crate::material::testing::{check_stiffness, numerical_stiffness};
    use crate::material::{
        elastic_stress, flatten_stiffness, new_stiffness, Behavior, DruckerPragerProperties, LinearElastic,
        LocalState, PointInput, StressStrainTrait,
    };
    use russell_lab::approx_eq;

    // nondimensional properties: μ = λ = 1
    fn props(alpha_yield: f64, alpha_flow: f64) -> DruckerPragerProperties {
        DruckerPragerProperties {
            density: 1.0,
            mu: 1.0,
            lambda: 1.0,
            alpha_yield,
            beta: 1e-3,
            alpha_flow,
        }
    }

    fn yield_function(props: &DruckerPragerProperties, sigma: &Tensor6) -> f64 {
        3.0 * props.alpha_yield * sigma.mean() + sigma.effective() - props.beta
    }

    #[test]
    fn elastic_inside_yield_surface_matches_linear_elastic() {
        let props = props(0.2, 0.1);
        let model = DruckerPrager::new();
        let state = LocalState::new();
        let input = PointInput::new(Tensor6::from([-1e-4, 2e-5, 3e-5, 1e-5, 0.0, -2e-5]));
        let sig = model.stress(&props, &state, &input, true).unwrap();
        let sig_ela = LinearElastic::new()
            .stress(&props.elastic(), &state, &input, true)
            .unwrap();
        assert!(yield_function(&props, &sig) < 0.0);
        assert_eq!(sig, sig_ela);
    }

    #[test]
    fn zero_increment_returns_initial_stress() {
        let props = props(0.2, 0.1);
        let model = DruckerPrager::new();
        let state = LocalState::new();
        let eps0 = Tensor6::from([1e-4, -1e-4, 0.0, 2e-5, 0.0, 0.0]);
        let sig0 = Tensor6::from([-1e-3, -1e-3, -2e-3, 1e-4, 0.0, 0.0]);
        assert!(yield_function(&props, &sig0) < 0.0);
        let input = PointInput::with_initial(eps0, eps0, sig0);
        let sig = model.stress(&props, &state, &input, true).unwrap();
        for i in 0..6 {
            approx_eq(sig[i], sig0[i], 1e-18);
        }
    }

    #[test]
    fn return_mapping_lands_on_yield_surface() {
        let model = DruckerPrager::new();
        let state = LocalState::new();
        let input = PointInput::new(Tensor6::from([3e-3, -1e-3, 0.5e-3, 2e-3, -1e-3, 0.5e-3]));
        for (alpha_yield, alpha_flow) in [(0.2, 0.2), (0.2, 0.1), (0.0, 0.0)] {
            let props = props(alpha_yield, alpha_flow);
            let trial = elastic_stress(
                &props.elastic(),
                &input.total_strain,
                &Tensor6::new(),
                &Tensor6::new(),
            );
            assert!(yield_function(&props, &trial) > 0.0);
            let sig = model.stress(&props, &state, &input, true).unwrap();
            approx_eq(yield_function(&props, &sig), 0.0, 1e-15);
        }
    }

    #[test]
    fn return_mapping_keeps_the_deviatoric_direction() {
        let props = props(0.2, 0.1);
        let model = DruckerPrager::new();
        let state = LocalState::new();
        let input = PointInput::new(Tensor6::from([3e-3, -1e-3, 0.5e-3, 2e-3, -1e-3, 0.5e-3]));
        let trial = elastic_stress(&props.elastic(), &input.total_strain, &Tensor6::new(), &Tensor6::new());
        let sig = model.stress(&props, &state, &input, true).unwrap();
        let (s_trial, s) = (trial.deviator(), sig.deviator());
        let ratio = s[3] / s_trial[3];
        assert!(ratio > 0.0 && ratio < 1.0);
        for i in 0..6 {
            approx_eq(s[i], ratio * s_trial[i], 1e-15);
        }
    }

    #[test]
    fn update_state_accumulates_plastic_strain() {
        let props = props(0.2, 0.1);
        let model = DruckerPrager::new();
        let mut state = LocalState::new();
        let input = PointInput::new(Tensor6::from([3e-3, -1e-3, 0.5e-3, 2e-3, -1e-3, 0.5e-3]));
        let sig = model.stress(&props, &state, &input, true).unwrap();
        assert_eq!(model.update_state(&mut state, &props, &input).unwrap(), true);
        // volumetric plastic strain: 3 αF Δλ; deviatoric plastic strain is parallel to s
        let dev = state.inelastic_strain.deviator();
        let s = sig.deviator();
        let ratio = dev[3] / s[3];
        assert!(ratio > 0.0);
        for i in 0..6 {
            approx_eq(dev[i], ratio * s[i], 1e-15);
        }
        let lambda = state.inelastic_strain.mean() / props.alpha_flow;
        assert!(lambda > 0.0);

        // the stress from the updated state matches the corrected stress
        let sig_after = model.stress(&props, &state, &input, false).unwrap();
        for i in 0..6 {
            approx_eq(sig_after[i], sig[i], 1e-15);
        }

        // the updated state is on the yield surface: the same strain is now elastic
        let again = model.stress(&props, &state, &input, true).unwrap();
        for i in 0..6 {
            approx_eq(again[i], sig[i], 1e-15);
        }
        let before = state;
        model.update_state(&mut state, &props, &input).unwrap();
        for i in 0..6 {
            approx_eq(state.inelastic_strain[i], before.inelastic_strain[i], 1e-15);
        }
    }

    #[test]
    fn elastic_mode_works() {
        let props = props(0.2, 0.1);
        let mut model = DruckerPrager::new();
        model.set_behavior(Behavior::Elastic);
        assert_eq!(model.behavior(), Behavior::Elastic);
        let mut state = LocalState::new();
        state.inelastic_strain = Tensor6::new_isotropic(1e-4);
        let input = PointInput::new(Tensor6::from([3e-3, -1e-3, 0.5e-3, 2e-3, -1e-3, 0.5e-3]));
        let sig = model.stress(&props, &state, &input, true).unwrap();
        let correct = elastic_stress(&props.elastic(), &input.total_strain, &Tensor6::new(), &Tensor6::new());
        assert_eq!(sig, correct);
        let mut dd = new_stiffness();
        model.stiffness(&mut dd, &props, &state, &input).unwrap();
        assert_eq!(&flatten_stiffness(&dd, false)[0..6], &[3.0, 1.0, 1.0, 0.0, 0.0, 0.0]);
        assert_eq!(model.update_state(&mut state, &props, &input).unwrap(), true);
        assert_eq!(state.inelastic_strain, Tensor6::new());
    }

    #[test]
    fn elastic_stiffness_inside_yield_surface() {
        let props = props(0.2, 0.1);
        let model = DruckerPrager::new();
        let state = LocalState::new();
        let input = PointInput::new(Tensor6::from([-1e-4, 2e-5, 3e-5, 1e-5, 0.0, -2e-5]));
        let mut dd = new_stiffness();
        model.stiffness(&mut dd, &props, &state, &input).unwrap();
        assert!(!model.symmetric_stiffness());
        let flat = flatten_stiffness(&dd, false);
        assert_eq!(flat.len(), 36);
        assert_eq!(&flat[0..6], &[3.0, 1.0, 1.0, 0.0, 0.0, 0.0]);
        assert_eq!(&flat[30..36], &[0.0, 0.0, 0.0, 0.0, 0.0, 2.0]);
    }

    #[test]
    fn stiffness_matches_numerical_derivative() {
        let model = DruckerPrager::new();
        let mut state = LocalState::new();
        state.inelastic_strain = Tensor6::from([1e-4, -5e-5, 0.0, 2e-5, 0.0, -1e-5]);
        let input = PointInput::with_initial(
            Tensor6::from([3e-3, -1e-3, 0.5e-3, 2e-3, -1e-3, 0.5e-3]),
            Tensor6::from([1e-5, 0.0, 0.0, 0.0, 0.0, 0.0]),
            Tensor6::from([-1e-4, -1e-4, -2e-4, 0.0, 1e-5, 0.0]),
        );
        for (alpha_yield, alpha_flow) in [(0.2, 0.2), (0.2, 0.1), (0.3, 0.0)] {
            let mut props = props(alpha_yield, alpha_flow);
            props.beta = 4e-3;
            let mut dd = new_stiffness();
            model.stiffness(&mut dd, &props, &state, &input).unwrap();
            let num = numerical_stiffness(&model, &props, &state, &input, 1e-7);
            check_stiffness(&dd, &num, 1e-6);
        }
    }

    #[test]
    fn associated_stiffness_is_symmetric() {
        let props = props(0.2, 0.2);
        let model = DruckerPrager::new();
        let state = LocalState::new();
        let input = PointInput::new(Tensor6::from([3e-3, -1e-3, 0.5e-3, 2e-3, -1e-3, 0.5e-3]));
        let mut dd = new_stiffness();
        model.stiffness(&mut dd, &props, &state, &input).unwrap();
        // the shear columns carry the factor 2 of the independent components
        let w = [1.0, 1.0, 1.0, 2.0, 2.0, 2.0];
        for i in 0..6 {
            for j in 0..6 {
                approx_eq(dd.get(i, j) / w[j], dd.get(j, i) / w[i], 1e-12);
            }
        }
    }

    #[test]
    fn apex_return_works() {
        let model = DruckerPrager::new();
        // hydrostatic tension (d = 0) and a tiny shear (the cone return would flip the deviator)
        let strains = [
            Tensor6::from([1e-3, 1e-3, 1e-3, 0.0, 0.0, 0.0]),
            Tensor6::from([1e-3, 1e-3, 1e-3, 1e-6, 0.0, 0.0]),
        ];
        for (alpha_yield, alpha_flow) in [(0.2, 0.2), (0.2, 0.0)] {
            let props = props(alpha_yield, alpha_flow);
            let apex = props.beta / (3.0 * alpha_yield);
            for eps in &strains {
                let input = PointInput::new(*eps);
                let mut state = LocalState::new();
                let trial = elastic_stress(&props.elastic(), eps, &Tensor6::new(), &Tensor6::new());
                assert!(yield_function(&props, &trial) > 0.0);
                let sig = model.stress(&props, &state, &input, true).unwrap();
                approx_eq(yield_function(&props, &sig), 0.0, 1e-15);
                for i in 0..6 {
                    approx_eq(sig[i], if i < 3 { apex } else { 0.0 }, 1e-15);
                }

                // the tangent vanishes
                let mut dd = new_stiffness();
                model.stiffness(&mut dd, &props, &state, &input).unwrap();
                assert!(flatten_stiffness(&dd, false).iter().all(|v| *v == 0.0));
                let num = numerical_stiffness(&model, &props, &state, &input, 1e-8);
                check_stiffness(&dd, &num, 1e-9);

                // the plastic strain recovers the apex stress
                model.update_state(&mut state, &props, &input).unwrap();
                assert_eq!(state.apex_return, true);
                approx_eq(
                    state.inelastic_strain.mean(),
                    (trial.mean() - apex) / (3.0 * props.bulk_modulus()),
                    1e-15,
                );
                approx_eq(state.inelastic_strain[3], eps[3], 1e-15);
                let sig_after = model.stress(&props, &state, &input, false).unwrap();
                for i in 0..6 {
                    approx_eq(sig_after[i], sig[i], 1e-15);
                }
            }
        }
    }

    #[test]
    fn apex_return_flag_is_reset_by_cone_return() {
        let props = props(0.2, 0.1);
        let model = DruckerPrager::new();
        let mut state = LocalState::new();
        state.apex_return = true;
        let input = PointInput::new(Tensor6::from([3e-3, -1e-3, 0.5e-3, 2e-3, -1e-3, 0.5e-3]));
        model.update_state(&mut state, &props, &input).unwrap();
        assert_eq!(state.apex_return, false);
        assert!(state.inelastic_strain.norm() > 0.0);
    }

    #[test]
    fn other_functions_work() {
        let props = props(0.2, 0.1);
        let model = DruckerPrager::new();
        assert_eq!(model.behavior(), Behavior::Inelastic);
        assert_eq!(model.density(&props), 1.0);
        assert_eq!(model.stable_time_step(&props, &LocalState::new()), LARGE_TIME_STEP);
    }
}
