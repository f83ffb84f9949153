use super::{flatten_stiffness, new_stiffness, LocalState, PointInput, StressStrainTrait};
use crate::base::{MaterialError, Tensor6};
use rayon::prelude::*;

/// Holds the properties and history of a set of material points sharing one model
///
/// The points are independent; thus, the parallel variants of the loops give the same
/// results as the serial ones.
pub struct MaterialPoints<M: StressStrainTrait> {
    /// Holds the stress-strain model
    pub model: M,

    /// Holds the properties of each point
    pub props: Vec<M::Properties>,

    /// Holds the history of each point
    pub states: Vec<LocalState>,
}

impl<M: StressStrainTrait> MaterialPoints<M> {
    /// Allocates a new instance
    ///
    /// # Panics
    ///
    /// A panic will occur if `props.len() != states.len()`.
    pub fn new(model: M, props: Vec<M::Properties>, states: Vec<LocalState>) -> Self {
        assert_eq!(props.len(), states.len());
        MaterialPoints { model, props, states }
    }

    /// Allocates a new instance with the same properties and zero history for all points
    pub fn new_uniform(model: M, props: M::Properties, npoint: usize) -> Self {
        MaterialPoints {
            model,
            props: vec![props; npoint],
            states: vec![LocalState::new(); npoint],
        }
    }

    /// Returns the number of points
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns true if there are no points
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Returns the mass densities
    pub fn densities(&self) -> Vec<f64> {
        self.props.iter().map(|p| self.model.density(p)).collect()
    }

    /// Computes the stresses
    ///
    /// # Panics
    ///
    /// A panic will occur if `inputs.len() != self.len()`.
    pub fn stresses(&self, inputs: &[PointInput], compute_state_vars: bool) -> Result<Vec<Tensor6>, MaterialError> {
        assert_eq!(inputs.len(), self.len());
        self.props
            .iter()
            .zip(self.states.iter())
            .zip(inputs.iter())
            .map(|((p, s), input)| self.model.stress(p, s, input, compute_state_vars))
            .collect()
    }

    /// Computes the stresses in parallel
    ///
    /// # Panics
    ///
    /// A panic will occur if `inputs.len() != self.len()`.
    pub fn stresses_parallel(
        &self,
        inputs: &[PointInput],
        compute_state_vars: bool,
    ) -> Result<Vec<Tensor6>, MaterialError> {
        assert_eq!(inputs.len(), self.len());
        self.props
            .par_iter()
            .zip(self.states.par_iter())
            .zip(inputs.par_iter())
            .map(|((p, s), input)| self.model.stress(p, s, input, compute_state_vars))
            .collect()
    }

    /// Computes the flattened tangents (21 symmetric or 36 full entries per point)
    ///
    /// # Panics
    ///
    /// A panic will occur if `inputs.len() != self.len()`.
    pub fn tangents(&self, inputs: &[PointInput]) -> Result<Vec<Vec<f64>>, MaterialError> {
        assert_eq!(inputs.len(), self.len());
        let symmetric = self.model.symmetric_stiffness();
        let mut dd = new_stiffness();
        let mut results = Vec::with_capacity(self.len());
        for ((p, s), input) in self.props.iter().zip(self.states.iter()).zip(inputs.iter()) {
            self.model.stiffness(&mut dd, p, s, input)?;
            results.push(flatten_stiffness(&dd, symmetric));
        }
        Ok(results)
    }

    /// Computes the flattened tangents in parallel
    ///
    /// # Panics
    ///
    /// A panic will occur if `inputs.len() != self.len()`.
    pub fn tangents_parallel(&self, inputs: &[PointInput]) -> Result<Vec<Vec<f64>>, MaterialError> {
        assert_eq!(inputs.len(), self.len());
        let symmetric = self.model.symmetric_stiffness();
        self.props
            .par_iter()
            .zip(self.states.par_iter())
            .zip(inputs.par_iter())
            .map(|((p, s), input)| {
                let mut dd = new_stiffness();
                self.model.stiffness(&mut dd, p, s, input)?;
                Ok(flatten_stiffness(&dd, symmetric))
            })
            .collect()
    }

    /// Updates the history of all points
    ///
    /// Returns true if any point requires a new stiffness. The new states are computed
    /// first and stored only if every point succeeds; thus, on error, no state is modified.
    ///
    /// # Panics
    ///
    /// A panic will occur if `inputs.len() != self.len()`.
    pub fn update_states(&mut self, inputs: &[PointInput]) -> Result<bool, MaterialError> {
        assert_eq!(inputs.len(), self.len());
        let updated = self
            .states
            .iter()
            .zip(self.props.iter())
            .zip(inputs.iter())
            .map(|((s, p), input)| self.updated_state(s, p, input))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.commit(updated))
    }

    /// Updates the history of all points in parallel
    ///
    /// As in [MaterialPoints::update_states], no state is modified on error.
    ///
    /// # Panics
    ///
    /// A panic will occur if `inputs.len() != self.len()`.
    pub fn update_states_parallel(&mut self, inputs: &[PointInput]) -> Result<bool, MaterialError> {
        assert_eq!(inputs.len(), self.len());
        let updated = self
            .states
            .par_iter()
            .zip(self.props.par_iter())
            .zip(inputs.par_iter())
            .map(|((s, p), input)| self.updated_state(s, p, input))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.commit(updated))
    }

    /// Returns the updated copy of one state and the new-stiffness flag
    fn updated_state(
        &self,
        state: &LocalState,
        props: &M::Properties,
        input: &PointInput,
    ) -> Result<(LocalState, bool), MaterialError> {
        let mut updated = *state;
        let need_new_jacobian = self.model.update_state(&mut updated, props, input)?;
        Ok((updated, need_new_jacobian))
    }

    /// Stores the updated states and returns true if any point requires a new stiffness
    fn commit(&mut self, updated: Vec<(LocalState, bool)>) -> bool {
        let mut need_new_jacobian = false;
        for (state, (new_state, flag)) in self.states.iter_mut().zip(updated) {
            *state = new_state;
            need_new_jacobian |= flag;
        }
        need_new_jacobian
    }

    /// Returns the minimum stable time step over all points
    pub fn stable_time_step(&self) -> f64 {
        self.props
            .iter()
            .zip(self.states.iter())
            .map(|(p, s)| self.model.stable_time_step(p, s))
            .fold(f64::INFINITY, f64::min)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
