use russell_tensor::{t2_ddot_t2, Mandel, Tensor2, SQRT_2};
use serde::{Deserialize, Serialize};
use std::ops::{Add, Index, IndexMut, Mul, Neg, Sub};

/// Holds the number of components of a symmetric 3D tensor in reduced notation
pub const TENSOR_SIZE: usize = 6;

/// Holds the diagonal selector {1, 1, 1, 0, 0, 0}
pub const DIAG: [f64; TENSOR_SIZE] = [1.0, 1.0, 1.0, 0.0, 0.0, 0.0];

/// Holds the weights of the double-dot product in reduced notation
///
/// The off-diagonal components appear twice in the full 3×3 contraction.
pub const WEIGHTS: [f64; TENSOR_SIZE] = [1.0, 1.0, 1.0, 2.0, 2.0, 2.0];

/// Holds the factors converting the reduced components into Mandel components
const MANDEL_FACTORS: [f64; TENSOR_SIZE] = [1.0, 1.0, 1.0, SQRT_2, SQRT_2, SQRT_2];

/// Implements a symmetric 3×3 tensor in reduced (Voigt-like) notation
///
/// The components are ordered as `{xx, yy, zz, xy, yz, xz}`. The shear components
/// are the tensor components (not the engineering ones); hence, the double-dot
/// product carries a factor of 2 on the off-diagonal terms:
///
/// ```text
/// a : b = a₀b₀ + a₁b₁ + a₂b₂ + 2 (a₃b₃ + a₄b₄ + a₅b₅)
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Tensor6(pub [f64; TENSOR_SIZE]);

impl Tensor6 {
    /// Returns a new tensor with all components equal to zero
    pub fn new() -> Self {
        Tensor6([0.0; TENSOR_SIZE])
    }

    /// Returns a new isotropic tensor `v I`
    pub fn new_isotropic(v: f64) -> Self {
        Tensor6([v, v, v, 0.0, 0.0, 0.0])
    }

    /// Returns a new tensor from a flat slice of values
    ///
    /// # Panics
    ///
    /// A panic will occur if `values.len() != 6`.
    pub fn from_slice(values: &[f64]) -> Self {
        assert_eq!(values.len(), TENSOR_SIZE);
        let mut t = Tensor6::new();
        t.0.copy_from_slice(values);
        t
    }

    /// Returns an access to the underlying components
    pub fn as_array(&self) -> &[f64; TENSOR_SIZE] {
        &self.0
    }

    /// Returns the trace t₀ + t₁ + t₂
    pub fn trace(&self) -> f64 {
        self.0[0] + self.0[1] + self.0[2]
    }

    /// Returns the mean value (trace / 3)
    pub fn mean(&self) -> f64 {
        self.trace() / 3.0
    }

    /// Returns the deviator t − mean(t) I
    pub fn deviator(&self) -> Tensor6 {
        mean_deviatoric_split(self).1
    }

    /// Returns the double-dot product with another tensor
    pub fn dot(&self, other: &Tensor6) -> f64 {
        scalar_product(self, other)
    }

    /// Returns the norm sqrt(t : t)
    pub fn norm(&self) -> f64 {
        norm(self)
    }

    /// Returns the effective value sqrt(½ s : s) where s is the deviator
    ///
    /// For a stress tensor, this is the square root of the second invariant J₂.
    pub fn effective(&self) -> f64 {
        self.to_tensor2().deviator_norm() / SQRT_2
    }

    /// Converts this tensor into a [Tensor2] with symmetric Mandel representation
    pub fn to_tensor2(&self) -> Tensor2 {
        let mut tt = Tensor2::new(Mandel::Symmetric);
        let vec = tt.vector_mut();
        for m in 0..TENSOR_SIZE {
            vec[m] = self.0[m] * MANDEL_FACTORS[m];
        }
        tt
    }

    /// Returns a new tensor from the Mandel components of a 3D [Tensor2]
    ///
    /// # Panics
    ///
    /// A panic will occur if `tt` is a 2D tensor.
    pub fn from_tensor2(tt: &Tensor2) -> Self {
        let vec = tt.vector();
        assert!(vec.dim() >= TENSOR_SIZE);
        let mut t = Tensor6::new();
        for m in 0..TENSOR_SIZE {
            t.0[m] = vec[m] / MANDEL_FACTORS[m];
        }
        t
    }
}

impl From<[f64; TENSOR_SIZE]> for Tensor6 {
    /// Returns a new tensor from the components `{xx, yy, zz, xy, yz, xz}`
    fn from(components: [f64; TENSOR_SIZE]) -> Self {
        Tensor6(components)
    }
}

/// Computes the double-dot product of two symmetric tensors in reduced notation
///
/// ```text
/// a : b = a₀b₀ + a₁b₁ + a₂b₂ + 2 (a₃b₃ + a₄b₄ + a₅b₅)
/// ```
pub fn scalar_product(a: &Tensor6, b: &Tensor6) -> f64 {
    t2_ddot_t2(&a.to_tensor2(), &b.to_tensor2())
}

/// Splits a tensor into its mean value and deviator
///
/// ```text
/// mean = (t₀ + t₁ + t₂) / 3
/// dev  = t − mean {1, 1, 1, 0, 0, 0}
/// ```
pub fn mean_deviatoric_split(t: &Tensor6) -> (f64, Tensor6) {
    let tt = t.to_tensor2();
    let mut dev = Tensor2::new(Mandel::Symmetric);
    tt.deviator(&mut dev);
    (tt.invariant_sigma_m(), Tensor6::from_tensor2(&dev))
}

/// Computes the norm sqrt(t : t)
pub fn norm(t: &Tensor6) -> f64 {
    t.to_tensor2().norm()
}

impl Index<usize> for Tensor6 {
    type Output = f64;
    fn index(&self, i: usize) -> &f64 {
        &self.0[i]
    }
}

impl IndexMut<usize> for Tensor6 {
    fn index_mut(&mut self, i: usize) -> &mut f64 {
        &mut self.0[i]
    }
}

impl Add for Tensor6 {
    type Output = Tensor6;
    fn add(self, rhs: Tensor6) -> Tensor6 {
        let mut res = self;
        for i in 0..TENSOR_SIZE {
            res.0[i] += rhs.0[i];
        }
        res
    }
}

impl Sub for Tensor6 {
    type Output = Tensor6;
    fn sub(self, rhs: Tensor6) -> Tensor6 {
        let mut res = self;
        for i in 0..TENSOR_SIZE {
            res.0[i] -= rhs.0[i];
        }
        res
    }
}

impl Mul<f64> for Tensor6 {
    type Output = Tensor6;
    fn mul(self, alpha: f64) -> Tensor6 {
        let mut res = self;
        for i in 0..TENSOR_SIZE {
            res.0[i] *= alpha;
        }
        res
    }
}

impl Neg for Tensor6 {
    type Output = Tensor6;
    fn neg(self) -> Tensor6 {
        self * -1.0
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{mean_deviatoric_split, norm, scalar_product, Tensor6};
    use proptest::prelude::*;
    use russell_lab::approx_eq;
    use russell_tensor::{Mandel, Tensor2, SQRT_2};

    #[test]
    fn scalar_product_works() {
        let a = Tensor6::from([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let b = Tensor6::from([6.0, 5.0, 4.0, 3.0, 2.0, 1.0]);
        // 6 + 10 + 12 + 2 (12 + 10 + 6)
        approx_eq(scalar_product(&a, &b), 84.0, 1e-13);
        approx_eq(a.dot(&b), 84.0, 1e-13);
        approx_eq(norm(&a), f64::sqrt(14.0 + 2.0 * 77.0), 1e-15);
    }

    #[test]
    fn scalar_product_matches_full_contraction() {
        let a = Tensor6::from([1.5, -2.0, 0.5, 0.25, -0.75, 1.25]);
        let b = Tensor6::from([-0.5, 1.0, 2.0, -1.5, 0.5, 0.125]);
        let ma = [[a[0], a[3], a[5]], [a[3], a[1], a[4]], [a[5], a[4], a[2]]];
        let mb = [[b[0], b[3], b[5]], [b[3], b[1], b[4]], [b[5], b[4], b[2]]];
        let mut full = 0.0;
        for i in 0..3 {
            for j in 0..3 {
                full += ma[i][j] * mb[i][j];
            }
        }
        approx_eq(scalar_product(&a, &b), full, 1e-15);
    }

    #[test]
    fn mean_deviatoric_split_works() {
        let t = Tensor6::from([4.0, 5.0, 6.0, 1.0, 2.0, 3.0]);
        let (mean, dev) = mean_deviatoric_split(&t);
        assert_eq!(mean, 5.0);
        let correct = [-1.0, 0.0, 1.0, 1.0, 2.0, 3.0];
        for i in 0..6 {
            approx_eq(dev[i], correct[i], 1e-15);
        }
        assert_eq!(dev.trace(), 0.0);
        assert_eq!(t.deviator(), dev);
    }

    #[test]
    fn effective_works() {
        // uniaxial stress σ: J₂ = σ²/3
        let sig = Tensor6::from([3.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        approx_eq(sig.effective(), 3.0 / f64::sqrt(3.0), 1e-15);
        // pure shear τ: J₂ = τ²
        let tau = Tensor6::from([0.0, 0.0, 0.0, 2.0, 0.0, 0.0]);
        approx_eq(tau.effective(), 2.0, 1e-15);
        // isotropic: J₂ = 0
        assert_eq!(Tensor6::new_isotropic(7.0).effective(), 0.0);
    }

    #[test]
    fn operators_work() {
        let a = Tensor6::from([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let b = Tensor6::new_isotropic(1.0);
        assert_eq!((a + b).as_array(), &[2.0, 3.0, 4.0, 4.0, 5.0, 6.0]);
        assert_eq!((a - b).as_array(), &[0.0, 1.0, 2.0, 4.0, 5.0, 6.0]);
        assert_eq!((a * 2.0).as_array(), &[2.0, 4.0, 6.0, 8.0, 10.0, 12.0]);
        assert_eq!((-b).as_array(), &[-1.0, -1.0, -1.0, -0.0, -0.0, -0.0]);
        let mut c = Tensor6::from_slice(&[0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        c[4] = 3.0;
        assert_eq!(c[4], 3.0);
    }

    #[test]
    #[should_panic]
    fn from_slice_panics_on_wrong_size() {
        Tensor6::from_slice(&[1.0, 2.0, 3.0]);
    }

    #[test]
    fn from_array_works() {
        let t: Tensor6 = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0].into();
        assert_eq!(t, Tensor6([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]));
        assert_eq!(Tensor6::from([0.0; 6]), Tensor6::new());
    }

    #[test]
    fn tensor2_conversion_works() {
        let t = Tensor6::from([4.0, 5.0, 6.0, 1.0, 2.0, 3.0]);
        let tt = t.to_tensor2();
        assert_eq!(tt.mandel(), Mandel::Symmetric);
        approx_eq(tt.vector()[3], 1.0 * SQRT_2, 1e-15);
        approx_eq(tt.get(0, 1), 1.0, 1e-15);
        approx_eq(tt.get(1, 2), 2.0, 1e-15);
        approx_eq(tt.get(0, 2), 3.0, 1e-15);
        approx_eq(tt.invariant_sigma_m(), t.mean(), 1e-14);
        // σd = sqrt(3 J₂)
        approx_eq(tt.invariant_sigma_d(), f64::sqrt(3.0) * t.effective(), 1e-14);
        let back = Tensor6::from_tensor2(&tt);
        for i in 0..6 {
            approx_eq(back[i], t[i], 1e-14);
        }
        // a general 3D tensor contributes its symmetric part
        let general = Tensor2::from_matrix(
            &[[4.0, 1.0, 3.0], [1.0, 5.0, 2.0], [3.0, 2.0, 6.0]],
            Mandel::General,
        )
        .unwrap();
        let back = Tensor6::from_tensor2(&general);
        for i in 0..6 {
            approx_eq(back[i], t[i], 1e-14);
        }
    }

    #[test]
    #[should_panic]
    fn from_tensor2_panics_on_2d_tensor() {
        Tensor6::from_tensor2(&Tensor2::new(Mandel::Symmetric2D));
    }

    proptest! {
        #[test]
        fn scalar_product_is_positive_semidefinite(c in prop::array::uniform6(-1e6f64..1e6)) {
            let t = Tensor6::from(c);
            prop_assert!(scalar_product(&t, &t) >= 0.0);
        }

        #[test]
        fn split_recomposes(c in prop::array::uniform6(-1e3f64..1e3)) {
            let t = Tensor6::from(c);
            let (mean, dev) = mean_deviatoric_split(&t);
            let back = dev + Tensor6::new_isotropic(mean);
            for i in 0..6 {
                prop_assert!(f64::abs(back[i] - t[i]) <= 1e-12 * (1.0 + f64::abs(t[i])));
            }
            prop_assert!(f64::abs(dev.trace()) <= 1e-9);
        }
    }
}
