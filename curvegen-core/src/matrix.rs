use crate::error::{CodegenError, Result};
use crate::rational::Rational;
use std::fmt;

/// Square matrix of exact rationals, stored row-major.
///
/// Characteristic matrices map a control point column to the monomial
/// coefficient column: row `i` holds the weights of every control point in
/// the coefficient of `t^i`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RationalMatrix {
    size: usize,
    entries: Vec<Rational>,
}

impl RationalMatrix {
    pub fn from_integer_rows<const N: usize>(rows: [[i64; N]; N]) -> Self {
        let entries = rows
            .iter()
            .flat_map(|row| row.iter().map(|&v| Rational::integer(v)))
            .collect();
        Self { size: N, entries }
    }

    /// Build from nested rows; every row must be as long as there are rows.
    pub fn from_rows(rows: Vec<Vec<Rational>>) -> Result<Self> {
        let size = rows.len();
        let mut entries = Vec::with_capacity(size * size);
        for row in rows {
            if row.len() != size {
                return Err(CodegenError::SizeMismatch {
                    left: size,
                    right: row.len(),
                });
            }
            entries.extend(row);
        }
        Ok(Self { size, entries })
    }

    pub fn identity(size: usize) -> Self {
        let mut entries = vec![Rational::ZERO; size * size];
        for i in 0..size {
            entries[i * size + i] = Rational::ONE;
        }
        Self { size, entries }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> Result<Rational> {
        self.check_index(row)?;
        self.check_index(col)?;
        Ok(self.entries[row * self.size + col])
    }

    pub fn row(&self, row: usize) -> Result<&[Rational]> {
        self.check_index(row)?;
        Ok(&self.entries[row * self.size..(row + 1) * self.size])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Rational]> {
        self.entries.chunks(self.size.max(1))
    }

    pub fn scaled(&self, factor: Rational) -> Result<Self> {
        let entries = self
            .entries
            .iter()
            .map(|v| v.checked_mul(&factor))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            size: self.size,
            entries,
        })
    }

    /// Standard row-by-column product `self · other`.
    pub fn multiply(&self, other: &RationalMatrix) -> Result<Self> {
        self.check_same_size(other.size)?;
        let n = self.size;
        let mut entries = Vec::with_capacity(n * n);
        for r in 0..n {
            for c in 0..n {
                let mut acc = Rational::ZERO;
                for k in 0..n {
                    let term = self.entries[r * n + k].checked_mul(&other.entries[k * n + c])?;
                    acc = acc.checked_add(&term)?;
                }
                entries.push(acc);
            }
        }
        Ok(Self { size: n, entries })
    }

    /// `self · column`, used to turn control points into polynomial coefficients.
    pub fn multiply_column(&self, column: &[Rational]) -> Result<Vec<Rational>> {
        self.check_same_size(column.len())?;
        self.rows()
            .map(|row| {
                row.iter().zip(column).try_fold(Rational::ZERO, |acc, (m, v)| {
                    acc.checked_add(&m.checked_mul(v)?)
                })
            })
            .collect()
    }

    pub fn determinant(&self) -> Result<Rational> {
        let n = self.size;
        let mut a = self.entries.clone();
        let mut det = Rational::ONE;
        for col in 0..n {
            let Some(pivot) = (col..n).find(|&r| !a[r * n + col].is_zero()) else {
                return Ok(Rational::ZERO);
            };
            if pivot != col {
                swap_rows(&mut a, n, pivot, col);
                det = det.checked_neg()?;
            }
            let p = a[col * n + col];
            det = det.checked_mul(&p)?;
            for r in (col + 1)..n {
                let factor = a[r * n + col].checked_div(&p)?;
                if factor.is_zero() {
                    continue;
                }
                for c in col..n {
                    let delta = factor.checked_mul(&a[col * n + c])?;
                    a[r * n + c] = a[r * n + c].checked_sub(&delta)?;
                }
            }
        }
        Ok(det)
    }

    /// Exact Gauss-Jordan inverse. Any nonzero pivot is usable; a zero pivot
    /// is replaced by interchanging with a lower row.
    pub fn inverse(&self) -> Result<Self> {
        let n = self.size;
        let mut a = self.entries.clone();
        let mut inv = Self::identity(n).entries;
        for col in 0..n {
            let pivot = (col..n)
                .find(|&r| !a[r * n + col].is_zero())
                .ok_or(CodegenError::NotInvertible)?;
            if pivot != col {
                swap_rows(&mut a, n, pivot, col);
                swap_rows(&mut inv, n, pivot, col);
            }
            let p = a[col * n + col];
            for c in 0..n {
                a[col * n + c] = a[col * n + c].checked_div(&p)?;
                inv[col * n + c] = inv[col * n + c].checked_div(&p)?;
            }
            for r in 0..n {
                if r == col {
                    continue;
                }
                let factor = a[r * n + col];
                if factor.is_zero() {
                    continue;
                }
                for c in 0..n {
                    let da = factor.checked_mul(&a[col * n + c])?;
                    a[r * n + c] = a[r * n + c].checked_sub(&da)?;
                    let di = factor.checked_mul(&inv[col * n + c])?;
                    inv[r * n + c] = inv[r * n + c].checked_sub(&di)?;
                }
            }
        }
        Ok(Self {
            size: n,
            entries: inv,
        })
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity(self.size)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.size {
            Ok(())
        } else {
            Err(CodegenError::IndexOutOfRange {
                index,
                len: self.size,
            })
        }
    }

    fn check_same_size(&self, other: usize) -> Result<()> {
        if self.size == other {
            Ok(())
        } else {
            Err(CodegenError::SizeMismatch {
                left: self.size,
                right: other,
            })
        }
    }
}

fn swap_rows(entries: &mut [Rational], n: usize, a: usize, b: usize) {
    for c in 0..n {
        entries.swap(a * n + c, b * n + c);
    }
}

impl fmt::Display for RationalMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<String> = self.entries.iter().map(|v| v.to_string()).collect();
        let width = cells.iter().map(String::len).max().unwrap_or(1);
        for (i, row) in cells.chunks(self.size.max(1)).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let padded: Vec<String> = row.iter().map(|c| format!("{:>width$}", c)).collect();
            write!(f, "[ {} ]", padded.join("  "))?;
        }
        Ok(())
    }
}
