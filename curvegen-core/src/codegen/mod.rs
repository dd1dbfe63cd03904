//! Source emission for the spline and column matrix catalog.
//!
//! Every artifact is produced in memory first; nothing touches the disk until
//! the whole catalog has been derived, so a derivation error leaves the output
//! tree as it was.

pub mod matrix;
pub mod spline;
pub mod writer;

#[cfg(test)]
mod compile_check;

use crate::catalog::SplineFamily;
use crate::config::GenConfig;
use crate::dimension::Dimension;
use crate::error::{CodegenError, Result};
use rayon::prelude::*;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use writer::CodeWriter;

/// Row counts of the generated column matrix types.
pub const MATRIX_SIZES: [u8; 2] = [3, 4];

/// Output directory an artifact belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Splines,
    Numerics,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Splines, Category::Numerics];

    pub fn dir_name(self) -> &'static str {
        match self {
            Category::Splines => "splines",
            Category::Numerics => "numerics",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArtifactKind {
    Spline(SplineFamily, Dimension),
    /// Row count and element dimension.
    Matrix(u8, Dimension),
}

impl ArtifactKind {
    pub fn type_name(self) -> String {
        match self {
            ArtifactKind::Spline(family, dim) => family.type_name(dim),
            ArtifactKind::Matrix(count, dim) => matrix_type_name(count as usize, dim),
        }
    }

    pub fn module_name(self) -> String {
        match self {
            ArtifactKind::Spline(family, dim) => family.module_name(dim),
            ArtifactKind::Matrix(count, dim) => {
                let stem = format!("matrix{}x1", count);
                match dim.matrix_prefix().to_lowercase() {
                    p if p.is_empty() => stem,
                    p => format!("{}_{}", p, stem),
                }
            }
        }
    }

    pub fn category(self) -> Category {
        match self {
            ArtifactKind::Spline(..) => Category::Splines,
            ArtifactKind::Matrix(..) => Category::Numerics,
        }
    }
}

/// One generated source file, held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub lines: Vec<String>,
}

impl Artifact {
    pub fn type_name(&self) -> String {
        self.kind.type_name()
    }

    pub fn module_name(&self) -> String {
        self.kind.module_name()
    }

    pub fn category(&self) -> Category {
        self.kind.category()
    }

    /// `<category>/<module>.rs`, relative to the output root.
    ///
    /// Files are named after the snake_case module (`bezier_cubic_3d.rs`),
    /// not the type (`BezierCubic3D`), so the category `mod.rs` can declare
    /// them as ordinary Rust modules.
    pub fn relative_path(&self) -> PathBuf {
        Path::new(self.category().dir_name()).join(format!("{}.rs", self.module_name()))
    }

    pub fn contents(&self) -> String {
        let mut s = self.lines.join("\n");
        s.push('\n');
        s
    }
}

/// Files written by one [`regenerate`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogCounts {
    pub splines: usize,
    pub matrices: usize,
    /// Artifacts plus one `mod.rs` per category.
    pub files: usize,
}

/// `Matrix4x1`, `Vector3Matrix4x1`
pub fn matrix_type_name(count: usize, dim: Dimension) -> String {
    format!("{}Matrix{}x1", dim.matrix_prefix(), count)
}

pub(crate) fn file_header(w: &mut CodeWriter) {
    w.comment("Generated by curvegen from exact rational characteristic matrices.");
    w.comment("Do not edit by hand; rerun `curvegen regenerate` instead.");
    w.blank();
}

/// Every artifact of the catalog in emission order: for each dimension, the
/// spline families in catalog order followed by the column matrices.
pub fn generation_plan() -> Vec<ArtifactKind> {
    let mut plan = Vec::new();
    for dim in Dimension::ALL {
        for family in SplineFamily::ALL {
            plan.push(ArtifactKind::Spline(family, dim));
        }
        for count in MATRIX_SIZES {
            plan.push(ArtifactKind::Matrix(count, dim));
        }
    }
    plan
}

pub fn generate(kind: ArtifactKind, config: &GenConfig) -> Result<Artifact> {
    debug!(artifact = %kind.type_name(), "generating");
    match kind {
        ArtifactKind::Spline(family, dim) => spline::generate_spline_type(family, dim, config),
        ArtifactKind::Matrix(count, dim) => matrix::generate_matrix(count, dim, config),
    }
}

/// Derive the whole catalog. Stops at the first error; the result keeps
/// [`generation_plan`] order whether or not the work ran in parallel.
pub fn generate_all(config: &GenConfig) -> Result<Vec<Artifact>> {
    let plan = generation_plan();
    if config.parallel {
        plan.par_iter().map(|&kind| generate(kind, config)).collect()
    } else {
        plan.iter().map(|&kind| generate(kind, config)).collect()
    }
}

/// Module index re-exporting every type of one category.
pub fn module_index(artifacts: &[Artifact], category: Category) -> Vec<String> {
    let mut w = CodeWriter::new("");
    file_header(&mut w);
    let members: Vec<&Artifact> = artifacts.iter().filter(|a| a.category() == category).collect();
    for a in &members {
        w.line(format!("pub mod {};", a.module_name()));
    }
    w.blank();
    for a in &members {
        w.line(format!("pub use {}::{};", a.module_name(), a.type_name()));
    }
    w.into_lines()
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    let io_err = |source| CodegenError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, contents).map_err(io_err)?;
    debug!(path = %path.display(), "wrote");
    Ok(())
}

/// Write artifacts and their category indexes under `root`, overwriting
/// files of the same name.
pub fn write_artifacts(artifacts: &[Artifact], root: &Path) -> Result<CatalogCounts> {
    let mut counts = CatalogCounts::default();
    for artifact in artifacts {
        write_file(&root.join(artifact.relative_path()), &artifact.contents())?;
        match artifact.category() {
            Category::Splines => counts.splines += 1,
            Category::Numerics => counts.matrices += 1,
        }
        counts.files += 1;
    }
    for category in Category::ALL {
        if !artifacts.iter().any(|a| a.category() == category) {
            continue;
        }
        let mut index = module_index(artifacts, category).join("\n");
        index.push('\n');
        write_file(&root.join(category.dir_name()).join("mod.rs"), &index)?;
        counts.files += 1;
    }
    Ok(counts)
}

/// Derive the full catalog and write it under `config.output_root`.
pub fn regenerate(config: &GenConfig) -> Result<CatalogCounts> {
    info!(
        root = %config.output_root.display(),
        parallel = config.parallel,
        "regenerating catalog"
    );
    let artifacts = generate_all(config)?;
    let counts = write_artifacts(&artifacts, &config.output_root)?;
    info!(
        splines = counts.splines,
        matrices = counts.matrices,
        files = counts.files,
        "catalog written"
    );
    Ok(counts)
}
