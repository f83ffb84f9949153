use super::{new_stiffness, LocalState, PointInput, StressStrainTrait};
use crate::base::TENSOR_SIZE;
use russell_lab::Matrix;

/// Computes the stiffness by central differences of the stress with respect to each strain component
pub(crate) fn numerical_stiffness<M: StressStrainTrait>(
    model: &M,
    props: &M::Properties,
    state: &LocalState,
    input: &PointInput,
    h: f64,
) -> Matrix {
    let mut dd = new_stiffness();
    for j in 0..TENSOR_SIZE {
        let mut plus = *input;
        let mut minus = *input;
        plus.total_strain[j] += h;
        minus.total_strain[j] -= h;
        let sig_plus = model.stress(props, state, &plus, true).unwrap();
        let sig_minus = model.stress(props, state, &minus, true).unwrap();
        for i in 0..TENSOR_SIZE {
            dd.set(i, j, (sig_plus[i] - sig_minus[i]) / (2.0 * h));
        }
    }
    dd
}

/// Panics if the analytical and numerical stiffness matrices differ by more than tol
pub(crate) fn check_stiffness(analytical: &Matrix, numerical: &Matrix, tol: f64) {
    for i in 0..TENSOR_SIZE {
        for j in 0..TENSOR_SIZE {
            let (a, n) = (analytical.get(i, j), numerical.get(i, j));
            if f64::abs(a - n) > tol {
                panic!("stiffness ({},{}) = {:?} differs from numerical value {:?}", i, j, a, n);
            }
        }
    }
}
