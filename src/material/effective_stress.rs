use crate::base::{MaterialError, ParamEffectiveStress};
use log::{debug, warn};
use russell_lab::RootFinder;

/// Holds the scalar problem for the effective stress of the power-law model
///
/// The effective stress σ at the end of the step is the root of
///
/// ```text
/// y(σ) = a² σ² − b + c γ − d² γ²
///
/// σ_τ = (1 − α) σ_T + α σ
/// γ   = γ(σ_τ) = ε̇_ref (σ_τ / σ_ref)ⁿ⁻¹ / σ_ref
/// a   = ae + α Δt γ
/// ```
///
/// where σ_T is the effective stress at the beginning of the step.
#[derive(Clone, Copy, Debug)]
pub struct EffectiveStressProblem {
    /// Deviatoric elastic compliance 1/(2μ)
    pub ae: f64,

    /// Quadratic strain invariant
    pub b: f64,

    /// Strain-stress coupling invariant
    pub c: f64,

    /// Previous-stress invariant (1 − α) Δt σ_T
    pub d: f64,

    /// Blend factor of the generalized trapezoidal rule
    pub alpha: f64,

    /// Time step Δt
    pub dt: f64,

    /// Effective stress at the beginning of the step σ_T
    pub eff_stress_t: f64,

    /// Power-law exponent n
    pub power_law_exponent: f64,

    /// Reference strain rate ε̇_ref
    pub reference_strain_rate: f64,

    /// Reference stress σ_ref
    pub reference_stress: f64,
}

/// Holds the results of the root-find
#[derive(Clone, Copy, Debug)]
pub struct EffectiveStressSolution {
    /// Effective stress at the end of the step
    pub value: f64,

    /// Number of Newton iterations
    pub iterations: usize,
}

/// Implements a safeguarded Newton method for the effective stress
///
/// The root is first bracketed by expanding an interval around the initial guess; then
/// Newton steps are taken within the bracket. If a step would leave the bracket, would
/// not decrease fast enough, or Newton runs out of iterations, the root is refined by
/// Brent's method on the narrowed bracket.
#[derive(Clone, Copy, Debug)]
pub struct EffectiveStress {
    params: ParamEffectiveStress,
}

/// Computes the power-law creep rate γ(σ) = ε̇_ref (σ / σ_ref)ⁿ⁻¹ / σ_ref
pub fn creep_rate(sigma: f64, n: f64, reference_strain_rate: f64, reference_stress: f64) -> f64 {
    reference_strain_rate * f64::powf(sigma / reference_stress, n - 1.0) / reference_stress
}

/// Computes the derivative of the creep rate dγ/dσ
pub fn creep_rate_derivative(sigma: f64, n: f64, reference_strain_rate: f64, reference_stress: f64) -> f64 {
    if n == 1.0 {
        return 0.0;
    }
    reference_strain_rate * (n - 1.0) * f64::powf(sigma / reference_stress, n - 2.0)
        / (reference_stress * reference_stress)
}

impl EffectiveStressProblem {
    /// Returns the stress at which the creep rate is evaluated σ_τ
    pub fn eff_stress_tau(&self, sigma: f64) -> f64 {
        (1.0 - self.alpha) * self.eff_stress_t + self.alpha * sigma
    }

    /// Returns γ(σ_τ)
    pub fn gamma(&self, sigma: f64) -> f64 {
        creep_rate(
            self.eff_stress_tau(sigma),
            self.power_law_exponent,
            self.reference_strain_rate,
            self.reference_stress,
        )
    }

    /// Returns dγ(σ_τ)/dσ = α γ'(σ_τ)
    pub fn gamma_derivative(&self, sigma: f64) -> f64 {
        self.alpha
            * creep_rate_derivative(
                self.eff_stress_tau(sigma),
                self.power_law_exponent,
                self.reference_strain_rate,
                self.reference_stress,
            )
    }

    /// Returns the residual y(σ)
    pub fn residual(&self, sigma: f64) -> f64 {
        let gamma = self.gamma(sigma);
        let a = self.ae + self.alpha * self.dt * gamma;
        a * a * sigma * sigma - self.b + self.c * gamma - self.d * self.d * gamma * gamma
    }

    /// Returns the residual y(σ) and its derivative dy/dσ
    pub fn residual_and_derivative(&self, sigma: f64) -> (f64, f64) {
        let gamma = self.gamma(sigma);
        let d_gamma = self.gamma_derivative(sigma);
        let a = self.ae + self.alpha * self.dt * gamma;
        let y = a * a * sigma * sigma - self.b + self.c * gamma - self.d * self.d * gamma * gamma;
        let dy = 2.0 * a * a * sigma
            + d_gamma * (2.0 * a * self.alpha * self.dt * sigma * sigma + self.c - 2.0 * self.d * self.d * gamma);
        (y, dy)
    }

    /// Returns the initial guess: the previous effective stress or the trial (elastic) one
    pub fn initial_guess(&self) -> f64 {
        if self.eff_stress_t > 0.0 {
            self.eff_stress_t
        } else if self.b > 0.0 {
            f64::sqrt(self.b) / self.ae
        } else {
            self.reference_stress
        }
    }
}

impl EffectiveStress {
    /// Allocates a new instance
    pub fn new(params: ParamEffectiveStress) -> Result<Self, MaterialError> {
        params.validate()?;
        Ok(EffectiveStress { params })
    }

    /// Returns the settings
    pub fn params(&self) -> &ParamEffectiveStress {
        &self.params
    }

    /// Finds the effective stress at the end of the step
    pub fn solve(&self, problem: &EffectiveStressProblem) -> Result<EffectiveStressSolution, MaterialError> {
        let guess = problem.initial_guess();
        let (x1, x2) = self.bracket(problem, guess).map_err(|err| {
            warn!("effective stress: {}", err);
            err
        })?;
        let solution = self.newton(problem, guess, x1, x2).map_err(|err| {
            warn!("effective stress: {}", err);
            err
        })?;
        if solution.value.is_nan() || solution.value <= 0.0 {
            warn!("effective stress: found non-positive value {:?}", solution.value);
            return Err(MaterialError::NonPositiveEffectiveStress(solution.value));
        }
        debug!(
            "effective stress: converged to {:?} in {} iterations",
            solution.value, solution.iterations
        );
        Ok(solution)
    }

    /// Expands the interval [x1, x2] around the guess until it brackets the root
    ///
    /// The lower bound never becomes negative.
    fn bracket(&self, problem: &EffectiveStressProblem, guess: f64) -> Result<(f64, f64), MaterialError> {
        let mut x1 = 0.5 * guess;
        let mut x2 = 1.5 * guess;
        let mut f1 = problem.residual(x1);
        let mut f2 = problem.residual(x2);
        let factor = self.params.bracket_factor;
        for _ in 0..self.params.max_bracket_iterations {
            if f1 * f2 <= 0.0 {
                return Ok((x1, x2));
            }
            if f64::abs(f1) < f64::abs(f2) {
                x1 = f64::max(x1 + factor * (x1 - x2), 0.0);
                f1 = problem.residual(x1);
            } else {
                x2 += factor * (x2 - x1);
                f2 = problem.residual(x2);
            }
        }
        Err(MaterialError::BracketFailure { lower: x1, upper: x2 })
    }

    /// Runs Newton's method within [x1, x2], handing over to Brent's method when it stalls
    fn newton(
        &self,
        problem: &EffectiveStressProblem,
        guess: f64,
        x1: f64,
        x2: f64,
    ) -> Result<EffectiveStressSolution, MaterialError> {
        let f1 = problem.residual(x1);
        if f1 == 0.0 {
            return Ok(EffectiveStressSolution { value: x1, iterations: 0 });
        }
        let f2 = problem.residual(x2);
        if f2 == 0.0 {
            return Ok(EffectiveStressSolution { value: x2, iterations: 0 });
        }

        // orient the bracket such that y(x_low) < 0
        let (mut x_low, mut y_low, mut x_high, mut y_high) = if f1 < 0.0 {
            (x1, f1, x2, f2)
        } else {
            (x2, f2, x1, f1)
        };

        let mut x = if guess > f64::min(x1, x2) && guess < f64::max(x1, x2) {
            guess
        } else {
            0.5 * (x1 + x2)
        };
        let mut dx_old = f64::abs(x2 - x1);
        let (mut y, mut dy) = problem.residual_and_derivative(x);

        for iteration in 1..=self.params.max_iterations {
            let out_of_range = ((x - x_high) * dy - y) * ((x - x_low) * dy - y) > 0.0;
            let too_slow = f64::abs(2.0 * y) > f64::abs(dx_old * dy);
            if out_of_range || too_slow || !dy.is_finite() {
                debug!("effective stress: Newton stalled at iteration {}", iteration);
                return self.brent(problem, (x_low, y_low), (x_high, y_high), iteration - 1);
            }
            let dx = y / dy;
            dx_old = dx;
            x -= dx;
            debug!("effective stress: iteration {}: x = {:?}, dx = {:?}", iteration, x, dx);
            if f64::abs(dx) <= self.params.tolerance * f64::abs(x) {
                return Ok(EffectiveStressSolution { value: x, iterations: iteration });
            }
            (y, dy) = problem.residual_and_derivative(x);
            if y == 0.0 {
                return Ok(EffectiveStressSolution { value: x, iterations: iteration });
            }
            if y < 0.0 {
                (x_low, y_low) = (x, y);
            } else {
                (x_high, y_high) = (x, y);
            }
        }
        self.brent(problem, (x_low, y_low), (x_high, y_high), self.params.max_iterations)
    }

    /// Refines the root with Brent's method on a bracket with y(x_low) < 0 < y(x_high)
    ///
    /// The residual is normalized by sqrt(|y_low y_high|) so that the bracket check of the
    /// solver does not depend on the scale of the problem.
    fn brent(
        &self,
        problem: &EffectiveStressProblem,
        (x_low, y_low): (f64, f64),
        (x_high, y_high): (f64, f64),
        newton_iterations: usize,
    ) -> Result<EffectiveStressSolution, MaterialError> {
        let scale = f64::sqrt(f64::abs(y_low)) * f64::sqrt(f64::abs(y_high));
        let mut solver = RootFinder::new();
        solver.brent_max_iterations = self.params.max_iterations;
        solver.brent_tolerance = 2.0 * self.params.tolerance * f64::max(f64::abs(x_low), f64::abs(x_high));
        let args = &mut 0;
        match solver.brent(x_low, x_high, args, |x, _| Ok(problem.residual(x) / scale)) {
            Ok((value, stats)) => Ok(EffectiveStressSolution {
                value,
                iterations: newton_iterations + stats.n_iterations,
            }),
            Err(message) => {
                debug!("effective stress: {}", message);
                Err(MaterialError::NonConvergence {
                    iterations: self.params.max_iterations,
                    effective_stress: 0.5 * (x_low + x_high),
                })
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
