use crate::base::{N_FULL_TANGENT, N_SYMMETRIC_TANGENT, TENSOR_SIZE};
use russell_lab::Matrix;
use russell_tensor::{LinElasticity, Tensor4, SQRT_2};

/// Holds the factors converting the reduced components into Mandel components
const MANDEL_FACTORS: [f64; TENSOR_SIZE] = [1.0, 1.0, 1.0, SQRT_2, SQRT_2, SQRT_2];

/// Allocates a 6×6 stiffness matrix filled with zeros
pub fn new_stiffness() -> Matrix {
    Matrix::new(TENSOR_SIZE, TENSOR_SIZE)
}

/// Returns the Young's modulus and Poisson's coefficient corresponding to the Lamé parameters
pub fn young_poisson(mu: f64, lambda: f64) -> (f64, f64) {
    let young = mu * (3.0 * lambda + 2.0 * mu) / (lambda + mu);
    let poisson = lambda / (2.0 * (lambda + mu));
    (young, poisson)
}

/// Copies the Mandel components of a 3D fourth-order tensor into a 6×6 stiffness matrix
///
/// The stiffness relates the reduced stress components to the reduced (tensor) strain
/// components; thus, `dd[i][j] = D̄[i][j] mⱼ / mᵢ` where `m = {1, 1, 1, √2, √2, √2}`.
pub fn copy_modulus(dd: &mut Matrix, modulus: &Tensor4) {
    let mat = modulus.matrix();
    for i in 0..TENSOR_SIZE {
        for j in 0..TENSOR_SIZE {
            dd.set(i, j, mat.get(i, j) * (MANDEL_FACTORS[j] / MANDEL_FACTORS[i]));
        }
    }
}

/// Sets the isotropic elastic stiffness
///
/// The entries are the partial derivatives of the stress components with respect to
/// the tensor strain components:
///
/// ```text
/// λ+2μ   λ     λ     0     0     0
///  λ    λ+2μ   λ     0     0     0
///  λ     λ    λ+2μ   0     0     0
///  0     0     0    2μ     0     0
///  0     0     0     0    2μ     0
///  0     0     0     0     0    2μ
/// ```
pub fn set_elastic_stiffness(dd: &mut Matrix, mu: f64, lambda: f64) {
    let (young, poisson) = young_poisson(mu, lambda);
    let elasticity = LinElasticity::new(young, poisson, false, false);
    copy_modulus(dd, elasticity.get_modulus());
}

/// Returns the stiffness entries in the layout expected by the host
///
/// If `symmetric`, the 21 entries of the upper triangle are returned row by row.
/// Otherwise, the 36 entries are returned in row-major order.
///
/// # Panics
///
/// A panic will occur if `dd` is not 6×6.
pub fn flatten_stiffness(dd: &Matrix, symmetric: bool) -> Vec<f64> {
    assert_eq!(dd.dims(), (TENSOR_SIZE, TENSOR_SIZE));
    if symmetric {
        let mut values = Vec::with_capacity(N_SYMMETRIC_TANGENT);
        for i in 0..TENSOR_SIZE {
            for j in i..TENSOR_SIZE {
                values.push(dd.get(i, j));
            }
        }
        values
    } else {
        let mut values = Vec::with_capacity(N_FULL_TANGENT);
        for i in 0..TENSOR_SIZE {
            for j in 0..TENSOR_SIZE {
                values.push(dd.get(i, j));
            }
        }
        values
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
