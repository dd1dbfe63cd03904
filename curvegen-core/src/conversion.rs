use crate::catalog::SplineFamily;
use crate::error::{CodegenError, Result};
use crate::matrix::RationalMatrix;
use crate::rational::Rational;

/// Exact matrix taking `source` control points to the `target` control
/// points of the same polynomial: `inverse(M_target) · M_source`.
///
/// Row `o` is the linear combination of source points giving target point `o`.
pub fn conversion_matrix(source: SplineFamily, target: SplineFamily) -> Result<RationalMatrix> {
    let (sd, td) = (source.degree(), target.degree());
    if sd != td {
        return Err(CodegenError::IncompatibleDegree {
            source_degree: sd,
            target_degree: td,
        });
    }
    target
        .characteristic_matrix()
        .inverse()?
        .multiply(source.characteristic_matrix())
}

/// Families `source` gets a cast to: same degree, never itself, catalog order.
pub fn conversion_targets(source: SplineFamily) -> impl Iterator<Item = SplineFamily> {
    SplineFamily::ALL
        .into_iter()
        .filter(move |&f| f != source && f.degree() == source.degree())
}

/// Convert one scalar component of a control point set.
pub fn convert_points(
    source: SplineFamily,
    target: SplineFamily,
    points: &[Rational],
) -> Result<Vec<Rational>> {
    conversion_matrix(source, target)?.multiply_column(points)
}
