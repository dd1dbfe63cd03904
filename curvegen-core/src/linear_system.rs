use crate::matrix::RationalMatrix;
use nalgebra::{DMatrix, SVD};

/// Floating-point view of an exact matrix, used to cross-check the catalog.
#[derive(Debug, Clone)]
pub struct LinearSystem {
    pub matrix: DMatrix<f64>,
}

impl LinearSystem {
    pub fn from_rational(m: &RationalMatrix) -> Self {
        let n = m.size();
        let flat: Vec<f64> = m.rows().flatten().map(|v| v.to_f64()).collect();
        Self {
            matrix: DMatrix::from_row_slice(n, n, &flat),
        }
    }

    /// Singular values, largest first.
    pub fn singular_values(&self) -> Vec<f64> {
        if self.matrix.nrows() == 0 {
            return vec![];
        }
        let svd = SVD::new(self.matrix.clone(), false, false);
        let mut values: Vec<f64> = svd.singular_values.iter().copied().collect();
        values.sort_by(|a, b| b.total_cmp(a));
        values
    }

    /// Number of singular values at or above `tol`.
    pub fn rank(&self, tol: f64) -> usize {
        self.singular_values().iter().filter(|&&s| s >= tol).count()
    }

    /// Ratio of the largest to the smallest singular value; infinite when singular.
    pub fn condition_number(&self) -> f64 {
        let values = self.singular_values();
        match (values.first(), values.last()) {
            (Some(&max), Some(&min)) if min > 0.0 => max / min,
            _ => f64::INFINITY,
        }
    }
}
