use crate::catalog::SplineFamily;
use crate::error::{CodegenError, Result};
use crate::rational::Rational;

/// A curve in monomial form with exact coefficients.
///
/// `coefficients[i][c]` is component `c` of the `t^i` coefficient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactPolynomial {
    coefficients: Vec<Vec<Rational>>,
}

impl ExactPolynomial {
    /// `M · P`, applied to each component of the control points.
    pub fn from_control_points(family: SplineFamily, points: &[Vec<Rational>]) -> Result<Self> {
        let m = family.characteristic_matrix();
        if points.len() != m.size() {
            return Err(CodegenError::SizeMismatch {
                left: m.size(),
                right: points.len(),
            });
        }
        let dim = points.first().map(Vec::len).unwrap_or(0);
        let mut coefficients = vec![Vec::with_capacity(dim); m.size()];
        for c in 0..dim {
            let column = points
                .iter()
                .map(|p| {
                    p.get(c).copied().ok_or(CodegenError::SizeMismatch {
                        left: dim,
                        right: p.len(),
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            for (i, v) in m.multiply_column(&column)?.into_iter().enumerate() {
                coefficients[i].push(v);
            }
        }
        Ok(Self { coefficients })
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    pub fn dimension(&self) -> usize {
        self.coefficients.first().map(Vec::len).unwrap_or(0)
    }

    pub fn coefficients(&self) -> &[Vec<Rational>] {
        &self.coefficients
    }

    /// Horner evaluation at `t`.
    pub fn evaluate(&self, t: Rational) -> Result<Vec<Rational>> {
        let mut acc = vec![Rational::ZERO; self.dimension()];
        for coeff in self.coefficients.iter().rev() {
            for (a, c) in acc.iter_mut().zip(coeff) {
                *a = a.checked_mul(&t)?.checked_add(c)?;
            }
        }
        Ok(acc)
    }
}
