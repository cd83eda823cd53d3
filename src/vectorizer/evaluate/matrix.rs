use num::Num;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    error::{IndexError, Result},
    utils::math::vector::{cosine_from_parts, VectorMath},
    vectorizer::DocumentVector,
};

/// Dense N×N cosine similarity matrix, row-major.
///
/// Symmetric. The diagonal is `1.0` for documents with a non-zero vector
/// and `0.0` for zero vectors, which are also `0.0` against every other row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityMatrix {
    size: usize,
    values: Vec<f64>,
}

impl SimilarityMatrix {
    /// Compute every pairwise cosine similarity.
    /// Rows are filled in parallel; the call returns once all rows are done.
    pub fn from_vectors<N>(vectors: &[DocumentVector<N>]) -> Self
    where
        N: Num + Copy + Into<f64> + Send + Sync,
    {
        let size = vectors.len();
        let norms: Vec<f64> = vectors.par_iter().map(|v| v.norm()).collect();
        let mut values = vec![0.0_f64; size * size];
        if size == 0 {
            return Self { size, values };
        }

        values
            .par_chunks_mut(size)
            .enumerate()
            .for_each(|(i, row)| {
                for (k, cell) in row.iter_mut().enumerate() {
                    *cell = if i == k {
                        // zero-magnitude guard applies to the diagonal too
                        if norms[i] > 0.0 { 1.0 } else { 0.0 }
                    } else {
                        let dot = vectors[i].weights.dot(&vectors[k].weights);
                        cosine_from_parts(dot, norms[i], norms[k])
                    };
                }
            });

        Self { size, values }
    }

    /// Number of rows (= columns)
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Entry `(i, k)`
    #[inline]
    pub fn get(&self, i: usize, k: usize) -> Option<f64> {
        if i < self.size && k < self.size {
            self.values.get(i * self.size + k).copied()
        } else {
            None
        }
    }

    /// Row `i`
    #[inline]
    pub fn row(&self, i: usize) -> Option<&[f64]> {
        if i < self.size {
            self.values.get(i * self.size..(i + 1) * self.size)
        } else {
            None
        }
    }

    /// Storage length matches `size²` and every entry is a number in `[-1, 1]`.
    pub fn is_consistent(&self) -> bool {
        self.values.len() == self.size * self.size
            && self.values.iter().all(|v| (-1.0..=1.0).contains(v))
    }

    /// Check a matrix that did not come from `from_vectors` against the vectors it claims to describe.
    ///
    /// Holds `from_vectors` guarantees: one row per vector, symmetric,
    /// diagonal `1.0` for non-zero vectors, and all `0.0` in the row and column of a zero vector.
    ///
    /// # Returns
    /// * `Snapshot` naming the first cell that breaks an invariant
    pub fn validate<N>(&self, vectors: &[DocumentVector<N>]) -> Result<()>
    where
        N: Num + Copy + Into<f64>,
    {
        if self.size != vectors.len() {
            return Err(IndexError::Snapshot(format!(
                "matrix size {} != document count {}",
                self.size,
                vectors.len()
            )));
        }
        if !self.is_consistent() {
            return Err(IndexError::Snapshot(
                "matrix storage is malformed or holds values outside [-1, 1]".to_string(),
            ));
        }

        let non_zero: Vec<bool> = vectors.iter().map(|v| v.norm() > 0.0).collect();
        let n = self.size;
        for i in 0..n {
            let expected = if non_zero[i] { 1.0 } else { 0.0 };
            let diagonal = self.values[i * n + i];
            if diagonal != expected {
                return Err(IndexError::Snapshot(format!(
                    "diagonal ({i}, {i}) is {diagonal}, expected {expected}"
                )));
            }
            for k in (i + 1)..n {
                let upper = self.values[i * n + k];
                let lower = self.values[k * n + i];
                if upper != lower {
                    return Err(IndexError::Snapshot(format!(
                        "matrix is not symmetric at ({i}, {k}): {upper} vs {lower}"
                    )));
                }
                if !(non_zero[i] && non_zero[k]) && upper != 0.0 {
                    return Err(IndexError::Snapshot(format!(
                        "({i}, {k}) is {upper} but involves a zero vector"
                    )));
                }
            }
        }
        Ok(())
    }
}
