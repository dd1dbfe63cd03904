//! The closed set of spline families curvegen knows how to derive.
//!
//! Each family is described once, at first use, by a [`FamilyDescriptor`]
//! holding its characteristic matrix and control point metadata. The table
//! is immutable and shared by every generation call.

use crate::dimension::Dimension;
use crate::error::{CodegenError, Result};
use crate::matrix::RationalMatrix;
use crate::rational::Rational;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SplineFamily {
    BezierCubic,
    BezierQuadratic,
    HermiteCubic,
    UniformBSplineCubic,
    CatmullRomCubic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlPoint {
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone)]
pub struct FamilyDescriptor {
    pub family: SplineFamily,
    pub degree: u8,
    /// Type name stem, e.g. `UBS` in `UBSCubic3D`.
    pub class_name: &'static str,
    pub pretty_name: &'static str,
    pub control_points: Vec<ControlPoint>,
    pub characteristic_matrix: RationalMatrix,
}

impl FamilyDescriptor {
    pub fn control_point_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.control_points.iter().map(|p| p.name)
    }

    pub fn point_count(&self) -> usize {
        self.control_points.len()
    }
}

const fn cp(name: &'static str, description: &'static str) -> ControlPoint {
    ControlPoint { name, description }
}

/// Integer rows times `1/denom`.
fn fraction_rows<const N: usize>(denom: i64, rows: [[i64; N]; N]) -> RationalMatrix {
    let scale = Rational::new(1, denom).expect("catalog scale has a nonzero denominator");
    RationalMatrix::from_integer_rows(rows)
        .scaled(scale)
        .expect("catalog constants fit in i64")
}

static DESCRIPTORS: Lazy<Vec<FamilyDescriptor>> = Lazy::new(|| {
    vec![
        FamilyDescriptor {
            family: SplineFamily::BezierCubic,
            degree: 3,
            class_name: "Bezier",
            pretty_name: "Bézier",
            control_points: vec![
                cp("p0", "The starting point of the curve"),
                cp("p1", "The second control point of the curve, sometimes called the start tangent point"),
                cp("p2", "The third control point of the curve, sometimes called the end tangent point"),
                cp("p3", "The end point of the curve"),
            ],
            characteristic_matrix: RationalMatrix::from_integer_rows([
                [1, 0, 0, 0],
                [-3, 3, 0, 0],
                [3, -6, 3, 0],
                [-1, 3, -3, 1],
            ]),
        },
        FamilyDescriptor {
            family: SplineFamily::BezierQuadratic,
            degree: 2,
            class_name: "Bezier",
            pretty_name: "Bézier",
            control_points: vec![
                cp("p0", "The starting point of the curve"),
                cp("p1", "The middle control point of the curve, sometimes called a tangent point"),
                cp("p2", "The end point of the curve"),
            ],
            characteristic_matrix: RationalMatrix::from_integer_rows([
                [1, 0, 0],
                [-2, 2, 0],
                [1, -2, 1],
            ]),
        },
        FamilyDescriptor {
            family: SplineFamily::HermiteCubic,
            degree: 3,
            class_name: "Hermite",
            pretty_name: "Hermite",
            control_points: vec![
                cp("p0", "The starting point of the curve"),
                cp("v0", "The rate of change (velocity) at the start of the curve"),
                cp("p1", "The end point of the curve"),
                cp("v1", "The rate of change (velocity) at the end of the curve"),
            ],
            characteristic_matrix: RationalMatrix::from_integer_rows([
                [1, 0, 0, 0],
                [0, 1, 0, 0],
                [-3, -2, 3, -1],
                [2, 1, -2, 1],
            ]),
        },
        FamilyDescriptor {
            family: SplineFamily::UniformBSplineCubic,
            degree: 3,
            class_name: "UBS",
            pretty_name: "B-Spline",
            control_points: vec![
                cp("p0", "The first point of the B-spline hull"),
                cp("p1", "The second point of the B-spline hull"),
                cp("p2", "The third point of the B-spline hull"),
                cp("p3", "The fourth point of the B-spline hull"),
            ],
            characteristic_matrix: fraction_rows(
                6,
                [[1, 4, 1, 0], [-3, 0, 3, 0], [3, -6, 3, 0], [-1, 3, -3, 1]],
            ),
        },
        FamilyDescriptor {
            family: SplineFamily::CatmullRomCubic,
            degree: 3,
            class_name: "CatRom",
            pretty_name: "Catmull-Rom",
            control_points: vec![
                cp("p0", "The first control point of the catmull-rom curve. Note that this point is not included in the curve itself, and only helps to shape it"),
                cp("p1", "The second control point, and the start of the catmull-rom curve"),
                cp("p2", "The third control point, and the end of the catmull-rom curve"),
                cp("p3", "The last control point of the catmull-rom curve. Note that this point is not included in the curve itself, and only helps to shape it"),
            ],
            characteristic_matrix: fraction_rows(
                2,
                [[0, 2, 0, 0], [-1, 0, 1, 0], [2, -5, 4, -1], [-1, 3, -3, 1]],
            ),
        },
    ]
});

static BY_TYPE_NAME: Lazy<HashMap<String, (SplineFamily, Dimension)>> = Lazy::new(|| {
    SplineFamily::ALL
        .iter()
        .flat_map(|&family| Dimension::ALL.iter().map(move |&dim| (family, dim)))
        .map(|(family, dim)| (family.type_name(dim), (family, dim)))
        .collect()
});

impl SplineFamily {
    /// Every family, in generation order.
    pub const ALL: [SplineFamily; 5] = [
        SplineFamily::BezierCubic,
        SplineFamily::BezierQuadratic,
        SplineFamily::HermiteCubic,
        SplineFamily::UniformBSplineCubic,
        SplineFamily::CatmullRomCubic,
    ];

    pub fn descriptor(self) -> &'static FamilyDescriptor {
        &DESCRIPTORS[self as usize]
    }

    pub fn degree(self) -> u8 {
        self.descriptor().degree
    }

    pub fn characteristic_matrix(self) -> &'static RationalMatrix {
        &self.descriptor().characteristic_matrix
    }

    /// e.g. `BezierCubic3D`
    pub fn type_name(self, dim: Dimension) -> String {
        let d = self.descriptor();
        format!("{}{}{}D", d.class_name, degree_name(d.degree, true), dim.get())
    }

    /// e.g. `bezier_cubic_3d`
    pub fn module_name(self, dim: Dimension) -> String {
        let d = self.descriptor();
        format!(
            "{}_{}_{}d",
            d.class_name.to_lowercase(),
            degree_name(d.degree, true).to_lowercase(),
            dim.get()
        )
    }

    /// Resolve a generated type name such as `HermiteCubic2D`.
    pub fn from_type_name(name: &str) -> Option<(SplineFamily, Dimension)> {
        BY_TYPE_NAME.get(name).copied()
    }

    /// De Casteljau subdivision is emitted for both Bézier families.
    pub fn supports_split(self) -> bool {
        matches!(self, SplineFamily::BezierCubic | SplineFamily::BezierQuadratic)
    }

    pub fn supports_slerp(self, dim: Dimension) -> bool {
        self == SplineFamily::BezierCubic && matches!(dim.get(), 2 | 3)
    }

    pub fn supports_dimension_cast(self, dim: Dimension) -> bool {
        self.degree() == 3 && matches!(dim.get(), 2 | 3)
    }

    fn key(self) -> &'static str {
        match self {
            SplineFamily::BezierCubic => "bezier",
            SplineFamily::BezierQuadratic => "bezier-quad",
            SplineFamily::HermiteCubic => "hermite",
            SplineFamily::UniformBSplineCubic => "bspline",
            SplineFamily::CatmullRomCubic => "catrom",
        }
    }
}

impl fmt::Display for SplineFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SplineFamily {
    type Err = CodegenError;

    fn from_str(s: &str) -> Result<Self> {
        SplineFamily::ALL
            .into_iter()
            .find(|f| f.key() == s)
            .ok_or_else(|| CodegenError::UnknownFamily(s.to_string()))
    }
}

/// Human name of a polynomial degree; `short` picks `Quad` over `Quadratic`.
pub fn degree_name(degree: u8, short: bool) -> &'static str {
    match degree {
        1 => "Linear",
        2 if short => "Quad",
        2 => "Quadratic",
        3 => "Cubic",
        4 => "Quartic",
        5 => "Quintic",
        _ => "Polynomial",
    }
}
