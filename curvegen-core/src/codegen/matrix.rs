use super::writer::CodeWriter;
use super::{file_header, matrix_type_name, Artifact, ArtifactKind, MATRIX_SIZES};
use crate::config::GenConfig;
use crate::dimension::Dimension;
use crate::error::{CodegenError, Result};

/// Emit the `count`x1 column matrix whose elements are `dim`-dimensional.
pub fn generate_matrix(count: u8, dim: Dimension, config: &GenConfig) -> Result<Artifact> {
    if !MATRIX_SIZES.contains(&count) {
        return Err(CodegenError::UnsupportedMatrixSize(count));
    }
    let n = count as usize;
    let name = matrix_type_name(n, dim);
    let scalar_name = matrix_type_name(n, Dimension::ALL[0]);
    let elem = dim.data_type();
    let fields: Vec<String> = (0..n).map(|i| format!("m{i}")).collect();
    let i = config.indent.as_str();

    let mut w = CodeWriter::new(config.indent.clone());
    file_header(&mut w);
    w.line("use std::hash::{Hash, Hasher};");
    w.blank();
    if !dim.is_scalar() {
        w.line(format!("use glam::{elem};"));
        w.blank();
    }
    w.line(format!("use {}::IndexOutOfRange;", config.runtime_path));
    if !dim.is_scalar() {
        w.line(format!("use super::{scalar_name};"));
    }
    w.blank();

    w.doc(format!("A {n}x1 column matrix with {elem} values"));
    w.line("#[derive(Clone, Copy, Debug, Default, PartialEq)]");
    w.block(format!("pub struct {name}"), |w| {
        for f in &fields {
            w.line(format!("pub {f}: {elem},"));
        }
        Ok(())
    })?;
    w.blank();

    w.block(format!("impl {name}"), |w| {
        let params: Vec<String> = fields.iter().map(|f| format!("{f}: {elem}")).collect();
        w.block(format!("pub const fn new({}) -> Self", params.join(", ")), |w| {
            w.line(format!("Self {{ {} }}", fields.join(", ")));
            Ok(())
        })?;

        if !dim.is_scalar() {
            let comps = dim.components();
            w.blank();
            w.doc("Composes a vector matrix from one scalar matrix per component");
            let params: Vec<String> = comps.iter().map(|c| format!("{c}: {scalar_name}")).collect();
            w.block(format!("pub fn from_components({}) -> Self", params.join(", ")), |w| {
                w.indented("Self::new(", ")", |w| {
                    for f in &fields {
                        let parts: Vec<String> = comps.iter().map(|c| format!("{c}.{f}")).collect();
                        w.line(format!("{elem}::new({}),", parts.join(", ")));
                    }
                    Ok(())
                })
            })?;
        }

        let range = format!("IndexOutOfRange {{ index: row, len: {n} }}");
        w.blank();
        w.doc(format!("Get a row by index. Valid indices from 0 to {}", n - 1));
        w.block(format!("pub fn get(&self, row: usize) -> Result<{elem}, IndexOutOfRange>"), |w| {
            w.block("match row", |w| {
                for (k, f) in fields.iter().enumerate() {
                    w.line(format!("{k} => Ok(self.{f}),"));
                }
                w.line(format!("_ => Err({range}),"));
                Ok(())
            })
        })?;
        w.blank();
        w.doc(format!("Set a row by index. Valid indices from 0 to {}", n - 1));
        w.block(
            format!("pub fn set(&mut self, row: usize, value: {elem}) -> Result<(), IndexOutOfRange>"),
            |w| {
                w.block("match row", |w| {
                    for (k, f) in fields.iter().enumerate() {
                        w.line(format!("{k} => self.{f} = value,"));
                    }
                    w.line(format!("_ => return Err({range}),"));
                    Ok(())
                })?;
                w.line("Ok(())");
                Ok(())
            },
        )?;

        if !dim.is_scalar() {
            for c in dim.components() {
                let column: Vec<String> = fields.iter().map(|f| format!("self.{f}.{c}")).collect();
                w.blank();
                w.doc(format!("The {c} component of every row"));
                w.line(format!("pub fn {c}(&self) -> {scalar_name} {{"));
                w.line(format!("{i}{scalar_name}::new({})", column.join(", ")));
                w.line("}");
            }
        }

        w.blank();
        w.doc("Linearly interpolates between two matrices, based on a value `t`");
        w.doc("");
        w.doc("* `t` - The value to blend by");
        w.block("pub fn lerp(a: Self, b: Self, t: f32) -> Self", |w| {
            w.indented("Self::new(", ")", |w| {
                for f in &fields {
                    w.line(format!("a.{f} + (b.{f} - a.{f}) * t,"));
                }
                Ok(())
            })
        })
    })?;
    w.blank();

    w.block(format!("impl Hash for {name}"), |w| {
        w.block("fn hash<H: Hasher>(&self, state: &mut H)", |w| {
            w.comment("Adding 0.0 turns -0.0 into 0.0, matching `==`.");
            for f in &fields {
                if dim.is_scalar() {
                    w.line(format!("(self.{f} + 0.0).to_bits().hash(state);"));
                } else {
                    w.line(format!("(self.{f} + 0.0).to_array().map(f32::to_bits).hash(state);"));
                }
            }
            Ok(())
        })
    })?;

    Ok(Artifact {
        kind: ArtifactKind::Matrix(count, dim),
        lines: w.into_lines(),
    })
}
