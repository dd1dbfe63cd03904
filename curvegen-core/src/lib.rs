// Exact arithmetic: rationals, square matrices, and a float cross-check
pub mod error;
pub mod rational;
pub mod matrix;
pub mod linear_system;

// Derivation subsystem: family catalog, conversions, formulas, subdivision
pub mod dimension;
pub mod catalog;
pub mod conversion;
pub mod polynomial;
pub mod symbolic;
pub mod subdivision;
pub mod check;

// Generation subsystem: settings and source emission
pub mod config;
pub mod codegen;

// Public derivation API
pub use crate::error::{CodegenError, Result};
pub use crate::rational::Rational;
pub use crate::matrix::RationalMatrix;
pub use crate::linear_system::LinearSystem;
pub use crate::dimension::Dimension;
pub use crate::catalog::{degree_name, ControlPoint, FamilyDescriptor, SplineFamily};
pub use crate::conversion::{conversion_matrix, conversion_targets, convert_points};
pub use crate::polynomial::ExactPolynomial;
pub use crate::symbolic::{coefficient_rows, LinearCombination, NumberFormat};
pub use crate::subdivision::{split_exact, LerpStep, SplitPlan};
pub use crate::check::{check_catalog, CheckOutcome};

// Public generation API
pub use crate::config::GenConfig;
pub use crate::codegen::{
	generate, generate_all, generation_plan, regenerate, write_artifacts, Artifact,
	ArtifactKind, CatalogCounts, Category,
};
