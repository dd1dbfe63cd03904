use crate::error::Result;
use crate::matrix::RationalMatrix;
use crate::rational::Rational;
use std::fmt;

/// How numeric literals are printed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NumberFormat {
    /// `2`, `(1/6)`; for inspection output.
    Exact,
    /// `2.0`, `(1.0/6.0)`; literals that type-check as `f32` in emitted Rust.
    Float,
}

impl NumberFormat {
    fn integer(self, n: i64) -> String {
        match self {
            NumberFormat::Exact => n.to_string(),
            NumberFormat::Float => format!("{}.0", n),
        }
    }

    fn rational(self, v: &Rational) -> String {
        if v.is_integer() {
            self.integer(v.numer())
        } else {
            format!("({}/{})", self.integer(v.numer()), self.integer(v.denom()))
        }
    }
}

/// A sum of `coefficient * variable` terms, kept in insertion order.
///
/// Terms are never reordered: the order is the column order of the matrix
/// row the combination came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinearCombination {
    terms: Vec<(Rational, String)>,
}

impl LinearCombination {
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Zero coefficients are dropped.
    pub fn add_term(&mut self, coeff: Rational, var: impl Into<String>) {
        if coeff.is_zero() {
            return;
        }
        self.terms.push((coeff, var.into()));
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> &[(Rational, String)] {
        &self.terms
    }

    /// When every one of two or more terms has the same magnitude, that
    /// magnitude becomes a global scale and the terms are left as ±1.
    fn factored(&self) -> Result<(Rational, Vec<(Rational, String)>)> {
        let Some((first, _)) = self.terms.first() else {
            return Ok((Rational::ONE, Vec::new()));
        };
        if self.terms.len() < 2 {
            return Ok((Rational::ONE, self.terms.clone()));
        }
        let magnitude = first.abs()?;
        for (c, _) in &self.terms {
            if c.abs()? != magnitude {
                return Ok((Rational::ONE, self.terms.clone()));
            }
        }
        let terms = self
            .terms
            .iter()
            .map(|(c, v)| Ok((c.checked_div(&magnitude)?, v.clone())))
            .collect::<Result<Vec<_>>>()?;
        Ok((magnitude, terms))
    }

    /// Format as a single arithmetic expression with as few
    /// multiplications as the coefficients allow.
    pub fn render(&self, format: NumberFormat) -> Result<String> {
        if self.terms.is_empty() {
            return Ok(format.integer(0));
        }
        let (scale, terms) = self.factored()?;
        let mut line = String::new();
        for (i, (value, var)) in terms.iter().enumerate() {
            line.push_str(&format_term(format, i, value, var)?);
        }
        if scale == Rational::ONE {
            return Ok(line);
        }
        if scale.numer() == 1 {
            Ok(format!("({})/{}", line, format.integer(scale.denom())))
        } else {
            Ok(format!("{}*({})", format.rational(&scale), line))
        }
    }
}

fn format_term(format: NumberFormat, i: usize, value: &Rational, var: &str) -> Result<String> {
    let leading = if i > 0 { "+" } else { "" };
    let term = if *value == Rational::ONE {
        format!("{}{}", leading, var)
    } else if *value == Rational::integer(-1) {
        format!("-{}", var)
    } else if value.is_negative() {
        format!("-{}*{}", format.rational(&value.checked_neg()?), var)
    } else {
        format!("{}{}*{}", leading, format.rational(value), var)
    };
    Ok(term)
}

impl fmt::Display for LinearCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.render(NumberFormat::Exact).map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}

/// One combination per matrix row, each row weighting `variables` in order.
pub fn coefficient_rows<S: AsRef<str>>(
    matrix: &RationalMatrix,
    variables: &[S],
) -> Result<Vec<LinearCombination>> {
    matrix
        .rows()
        .map(|row| {
            let mut sum = LinearCombination::new();
            for (coeff, var) in row.iter().zip(variables) {
                sum.add_term(*coeff, var.as_ref());
            }
            Ok(sum)
        })
        .collect()
}
