use num::Num;

/// Dense vector math over numeric slices.
/// All results are accumulated in `f64` whatever the element type.
pub trait VectorMath {
    /// dot product
    /// d(a, b) = Σ(a_i * b_i)
    fn dot(&self, other: &Self) -> f64;

    /// squared euclidean norm
    /// ||a||² = Σ(a_i^2)
    fn norm_sq(&self) -> f64;

    /// euclidean norm
    fn norm(&self) -> f64 {
        self.norm_sq().sqrt()
    }

    /// cosine similarity
    /// cos(θ) = Σ(a_i * b_i) / (||a|| * ||b||)
    /// A zero-magnitude side yields `0.0`.
    fn cosine_similarity(&self, other: &Self) -> f64 {
        cosine_from_parts(self.dot(other), self.norm(), other.norm())
    }
}

impl<N> VectorMath for [N]
where
    N: Num + Copy + Into<f64>,
{
    #[inline]
    fn dot(&self, other: &Self) -> f64 {
        debug_assert_eq!(
            self.len(),
            other.len(),
            "Vectors must be of the same length to compute dot product."
        );
        self.iter()
            .zip(other.iter())
            .map(|(&a, &b)| a.into() * b.into())
            .sum()
    }

    #[inline]
    fn norm_sq(&self) -> f64 {
        self.iter()
            .map(|&a| {
                let a: f64 = a.into();
                a * a
            })
            .sum()
    }
}

/// Cosine from a precomputed dot product and norms.
/// Returns `0.0` if either norm is zero (or not a positive finite number),
/// otherwise the quotient clamped to `[-1, 1]`.
#[inline]
pub fn cosine_from_parts(dot: f64, norm_a: f64, norm_b: f64) -> f64 {
    if !(norm_a > 0.0 && norm_b > 0.0) || !norm_a.is_finite() || !norm_b.is_finite() {
        return 0.0;
    }
    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}
