use crate::error::{CodegenError, Result};
use std::fmt;

const COMPONENTS: [&str; 4] = ["x", "y", "z", "w"];

/// Number of scalar components of a control point: 1 is a plain `f32`,
/// 2 to 4 are `glam` vectors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Dimension(u8);

impl Dimension {
    pub const ALL: [Dimension; 4] = [Dimension(1), Dimension(2), Dimension(3), Dimension(4)];

    pub fn new(d: u8) -> Result<Self> {
        match d {
            1..=4 => Ok(Self(d)),
            _ => Err(CodegenError::UnsupportedDimension(d)),
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn is_scalar(self) -> bool {
        self.0 == 1
    }

    /// Element type of a control point.
    pub fn data_type(self) -> &'static str {
        match self.0 {
            1 => "f32",
            2 => "Vec2",
            3 => "Vec3",
            _ => "Vec4",
        }
    }

    pub fn polynomial_type(self) -> String {
        match self.0 {
            1 => "Polynomial".to_string(),
            d => format!("Polynomial{}D", d),
        }
    }

    /// Prefix of the column matrix type holding points of this dimension.
    pub fn matrix_prefix(self) -> String {
        match self.0 {
            1 => String::new(),
            d => format!("Vector{}", d),
        }
    }

    pub fn components(self) -> &'static [&'static str] {
        &COMPONENTS[..self.0 as usize]
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}D", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_one_to_four() {
        for d in 1..=4 {
            assert_eq!(Dimension::new(d).unwrap().get(), d);
        }
        assert!(matches!(Dimension::new(0), Err(CodegenError::UnsupportedDimension(0))));
        assert!(matches!(Dimension::new(5), Err(CodegenError::UnsupportedDimension(5))));
    }

    #[test]
    fn test_type_names() {
        let d3 = Dimension::new(3).unwrap();
        assert_eq!(d3.data_type(), "Vec3");
        assert_eq!(d3.polynomial_type(), "Polynomial3D");
        assert_eq!(d3.matrix_prefix(), "Vector3");
        assert_eq!(d3.components(), ["x", "y", "z"]);
        let d1 = Dimension::new(1).unwrap();
        assert_eq!(d1.polynomial_type(), "Polynomial");
        assert_eq!(d1.matrix_prefix(), "");
        assert_eq!(d1.to_string(), "1D");
    }
}
