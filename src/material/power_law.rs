use super::{
    elastic_stress, set_elastic_stiffness, Behavior, EffectiveStress, EffectiveStressProblem, LocalState, PointInput,
    PowerLawProperties, StressStrainTrait,
};
use crate::base::{
    mean_deviatoric_split, scalar_product, MaterialError, ParamEffectiveStress, ParamTimeIntegration, Tensor6, DIAG,
    INFINITE_MAXWELL_TIME, TENSOR_SIZE, WEIGHTS,
};
use russell_lab::Matrix;

/// Implements the power-law viscoelastic model (Maxwell-type with nonlinear viscosity)
///
/// The deviatoric viscous strain rate follows
///
/// ```text
/// dεv/dt = γ(σ_eff) S,    γ(σ) = ε̇_ref (σ / σ_ref)ⁿ⁻¹ / σ_ref
/// ```
///
/// where S is the stress deviator and σ_eff = sqrt(½ S : S). The volumetric response is
/// elastic. The rate is integrated with the generalized trapezoidal rule
///
/// ```text
/// εv = εv_T + Δt γ(σ_τ) ((1 − α) S_T + α S)
/// ```
///
/// which reduces the update to a scalar equation for the effective stress at the end
/// of the step (see [EffectiveStressProblem]).
pub struct PowerLaw {
    behavior: Behavior,
    dt: f64,
    alpha: f64,
    stable_step_fraction: f64,
    solver: EffectiveStress,
}

/// Holds the results of one viscoelastic integration
struct ViscousStep {
    /// Scalar problem for the effective stress
    problem: EffectiveStressProblem,

    /// Effective stress at the end of the step
    eff_stress: f64,

    /// Stress at the end of the step
    stress: Tensor6,

    /// Deviatoric stress at the end of the step
    dev_stress: Tensor6,

    /// Deviatoric stress at the beginning of the step
    dev_stress_t: Tensor6,

    /// Deviatoric strain predictor plus ae times the initial deviatoric stress
    u: Tensor6,

    /// γ(σ_τ)
    gamma: f64,

    /// ae + α Δt γ
    a: f64,
}

/// Returns the Maxwell time of the power-law model for the given stress
///
/// ```text
/// τ = (σ_ref / σ_eff)ⁿ⁻¹ σ_ref / (2 μ ε̇_ref)
/// ```
///
/// A vanishing effective stress yields [INFINITE_MAXWELL_TIME].
pub fn maxwell_time(props: &PowerLawProperties, stress: &Tensor6) -> f64 {
    let eff_stress = stress.effective();
    if eff_stress == 0.0 {
        return INFINITE_MAXWELL_TIME;
    }
    f64::powf(props.reference_stress / eff_stress, props.power_law_exponent - 1.0) * props.reference_stress
        / (2.0 * props.mu * props.reference_strain_rate)
}

impl PowerLaw {
    /// Allocates a new instance (in inelastic mode)
    pub fn new(
        dt: f64,
        time_integration: ParamTimeIntegration,
        effective_stress: ParamEffectiveStress,
    ) -> Result<Self, MaterialError> {
        if !(dt > 0.0) {
            return Err(MaterialError::InvalidProperty(format!("dt must be positive (found {:?})", dt)));
        }
        time_integration.validate()?;
        Ok(PowerLaw {
            behavior: Behavior::Inelastic,
            dt,
            alpha: time_integration.alpha,
            stable_step_fraction: time_integration.stable_step_fraction,
            solver: EffectiveStress::new(effective_stress)?,
        })
    }

    /// Sets the time step
    pub fn set_time_step(&mut self, dt: f64) -> Result<(), MaterialError> {
        if !(dt > 0.0) {
            return Err(MaterialError::InvalidProperty(format!("dt must be positive (found {:?})", dt)));
        }
        self.dt = dt;
        Ok(())
    }

    /// Returns the time step
    pub fn time_step(&self) -> f64 {
        self.dt
    }

    /// Integrates the viscous strain over the time step
    ///
    /// Returns None if there is no deviatoric driving stress (b = c = d = 0).
    fn integrate(
        &self,
        props: &PowerLawProperties,
        state: &LocalState,
        input: &PointInput,
    ) -> Result<Option<ViscousStep>, MaterialError> {
        let ae = 1.0 / (2.0 * props.mu);
        let (mean_total, dev_total) = mean_deviatoric_split(&input.total_strain);
        let (mean_initial, dev_initial) = mean_deviatoric_split(&input.initial_strain);
        let (mean_initial_stress, dev_initial_stress) = mean_deviatoric_split(&input.initial_stress);
        let (_, dev_viscous) = mean_deviatoric_split(&state.inelastic_strain);
        let (_, dev_stress_t) = mean_deviatoric_split(&state.stress);

        // strain predictor and invariants
        let e = dev_total - dev_initial - dev_viscous;
        let eff_stress_t = f64::sqrt(0.5 * scalar_product(&dev_stress_t, &dev_stress_t));
        let time_fac = (1.0 - self.alpha) * self.dt;
        let b = 0.5 * scalar_product(&e, &e)
            + ae * scalar_product(&e, &dev_initial_stress)
            + 0.5 * ae * ae * scalar_product(&dev_initial_stress, &dev_initial_stress);
        let c = time_fac
            * (scalar_product(&e, &dev_stress_t) + ae * scalar_product(&dev_stress_t, &dev_initial_stress));
        let d = time_fac * eff_stress_t;
        if b == 0.0 && c == 0.0 && d == 0.0 {
            return Ok(None);
        }

        // effective stress
        let problem = EffectiveStressProblem {
            ae,
            b,
            c,
            d,
            alpha: self.alpha,
            dt: self.dt,
            eff_stress_t,
            power_law_exponent: props.power_law_exponent,
            reference_strain_rate: props.reference_strain_rate,
            reference_stress: props.reference_stress,
        };
        let solution = self.solver.solve(&problem)?;
        let eff_stress = solution.value;

        // stress tensor
        let gamma = problem.gamma(eff_stress);
        let a = ae + self.alpha * self.dt * gamma;
        let u = e + dev_initial_stress * ae;
        let mean_stress = props.bulk_modulus() * 3.0 * (mean_total - mean_initial) + mean_initial_stress;
        let mut dev_stress = Tensor6::new();
        let mut stress = Tensor6::new();
        for i in 0..TENSOR_SIZE {
            dev_stress[i] = (u[i] - time_fac * gamma * dev_stress_t[i]) / a;
            stress[i] = dev_stress[i] + DIAG[i] * mean_stress;
        }
        Ok(Some(ViscousStep {
            problem,
            eff_stress,
            stress,
            dev_stress,
            dev_stress_t,
            u,
            gamma,
            a,
        }))
    }
}

impl StressStrainTrait for PowerLaw {
    type Properties = PowerLawProperties;

    fn behavior(&self) -> Behavior {
        self.behavior
    }

    fn set_behavior(&mut self, behavior: Behavior) {
        self.behavior = behavior;
    }

    /// Indicates that the stiffness matrix is non-symmetric
    fn symmetric_stiffness(&self) -> bool {
        false
    }

    fn density(&self, props: &PowerLawProperties) -> f64 {
        props.density
    }

    /// Computes the stress tensor at the end of the step
    fn stress(
        &self,
        props: &PowerLawProperties,
        state: &LocalState,
        input: &PointInput,
        compute_state_vars: bool,
    ) -> Result<Tensor6, MaterialError> {
        let elastic = props.elastic();
        if self.behavior == Behavior::Elastic {
            let stress = elastic_stress(
                &elastic,
                &input.total_strain,
                &input.initial_strain,
                &input.initial_stress,
            );
            log::debug!("power-law: elastic Maxwell time = {:?}", maxwell_time(props, &stress));
            return Ok(stress);
        }
        if !compute_state_vars {
            return Ok(state.stress);
        }
        match self.integrate(props, state, input)? {
            Some(step) => Ok(step.stress),
            None => Ok(elastic_stress(
                &elastic,
                &(input.total_strain - state.inelastic_strain),
                &input.initial_strain,
                &input.initial_stress,
            )),
        }
    }

    /// Computes the consistent tangent stiffness
    ///
    /// The derivative of the effective stress follows from the implicit function theorem
    /// applied to y(σ; b, c) = 0:
    ///
    /// ```text
    /// ∂σ/∂εj = (∂b/∂εj − γ ∂c/∂εj) / (dy/dσ)
    /// Dij    = K diagi diagj + Pij / a − (γ'/a) (tf S_T,i + α Δt Si) ∂σ/∂εj
    /// ```
    ///
    /// where `tf = (1 − α) Δt`, `γ' = dγ/dσ`, and `P = I − ⅓ diag ⊗ diag`.
    fn stiffness(
        &self,
        dd: &mut Matrix,
        props: &PowerLawProperties,
        state: &LocalState,
        input: &PointInput,
    ) -> Result<(), MaterialError> {
        if self.behavior == Behavior::Elastic {
            set_elastic_stiffness(dd, props.mu, props.lambda);
            return Ok(());
        }
        let step = match self.integrate(props, state, input)? {
            Some(s) => s,
            None => {
                set_elastic_stiffness(dd, props.mu, props.lambda);
                return Ok(());
            }
        };
        let time_fac = (1.0 - self.alpha) * self.dt;
        let bulk = props.bulk_modulus();
        let (_, dy) = step.problem.residual_and_derivative(step.eff_stress);
        let d_gamma = step.problem.gamma_derivative(step.eff_stress);
        let (u, s, s_t) = (&step.u, &step.dev_stress, &step.dev_stress_t);
        let (tr_u, tr_s_t) = (u.trace(), s_t.trace());
        let mut d_eff = [0.0; TENSOR_SIZE];
        for j in 0..TENSOR_SIZE {
            let d_b = WEIGHTS[j] * u[j] - DIAG[j] * tr_u / 3.0;
            let d_c = time_fac * (WEIGHTS[j] * s_t[j] - DIAG[j] * tr_s_t / 3.0);
            d_eff[j] = (d_b - step.gamma * d_c) / dy;
        }
        for i in 0..TENSOR_SIZE {
            let coef = d_gamma / step.a * (time_fac * s_t[i] + self.alpha * self.dt * s[i]);
            for j in 0..TENSOR_SIZE {
                let pp = if i == j { 1.0 } else { 0.0 } - DIAG[i] * DIAG[j] / 3.0;
                dd.set(i, j, bulk * DIAG[i] * DIAG[j] + pp / step.a - coef * d_eff[j]);
            }
        }
        Ok(())
    }

    /// Updates the viscous strain and the stored stress at the end of a converged step
    ///
    /// In elastic mode, the viscous strain is reset to zero.
    fn update_state(
        &self,
        state: &mut LocalState,
        props: &PowerLawProperties,
        input: &PointInput,
    ) -> Result<bool, MaterialError> {
        if self.behavior == Behavior::Elastic {
            state.inelastic_strain = Tensor6::new();
            state.stress = elastic_stress(
                &props.elastic(),
                &input.total_strain,
                &input.initial_strain,
                &input.initial_stress,
            );
            return Ok(true);
        }
        match self.integrate(props, state, input)? {
            Some(step) => {
                let (alpha, dt) = (self.alpha, self.dt);
                let mut viscous = state.inelastic_strain;
                for i in 0..TENSOR_SIZE {
                    viscous[i] += dt * step.gamma * ((1.0 - alpha) * step.dev_stress_t[i] + alpha * step.dev_stress[i]);
                }
                state.inelastic_strain = viscous;
                state.stress = step.stress;
            }
            None => {
                state.stress = elastic_stress(
                    &props.elastic(),
                    &(input.total_strain - state.inelastic_strain),
                    &input.initial_strain,
                    &input.initial_stress,
                );
            }
        }
        Ok(true)
    }

    /// Returns a fraction of the Maxwell time computed from the stored stress
    fn stable_time_step(&self, props: &PowerLawProperties, state: &LocalState) -> f64 {
        self.stable_step_fraction * maxwell_time(props, &state.stress)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
