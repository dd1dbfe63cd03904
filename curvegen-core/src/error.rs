use std::path::PathBuf;

/// Every way a derivation or generation run can fail.
///
/// Derivation errors (`DivisionByZero` through `UnsupportedDimension`) come
/// from compiled-in catalog data, so retrying never helps: the run stops at
/// the first one.
#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    #[error("division by zero in rational arithmetic")]
    DivisionByZero,
    #[error("rational arithmetic overflowed i64")]
    ArithmeticOverflow,
    #[error("matrix is singular and has no inverse")]
    NotInvertible,
    #[error("cannot convert between degree {source_degree} and degree {target_degree} families")]
    IncompatibleDegree { source_degree: u8, target_degree: u8 },
    #[error("index {index} is outside the valid range 0..{len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("unsupported dimension {0}, expected 1 to 4")]
    UnsupportedDimension(u8),
    #[error("no column matrix of size {0} is generated")]
    UnsupportedMatrixSize(u8),
    #[error("matrix size mismatch: {left} vs {right}")]
    SizeMismatch { left: usize, right: usize },
    #[error("unknown spline family or type name: {0}")]
    UnknownFamily(String),
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {message}")]
    Config { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, CodegenError>;
