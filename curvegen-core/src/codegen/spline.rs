use super::writer::CodeWriter;
use super::{file_header, matrix_type_name, Artifact, ArtifactKind};
use crate::catalog::{degree_name, FamilyDescriptor, SplineFamily};
use crate::config::GenConfig;
use crate::conversion::{conversion_matrix, conversion_targets};
use crate::dimension::Dimension;
use crate::error::Result;
use crate::subdivision::SplitPlan;
use crate::symbolic::{coefficient_rows, NumberFormat};

/// Names and types shared by every section of one spline artifact.
struct SplineContext<'a> {
    family: SplineFamily,
    desc: &'static FamilyDescriptor,
    dim: Dimension,
    type_name: String,
    data_type: &'static str,
    poly_type: String,
    matrix_type: String,
    points: Vec<&'static str>,
    config: &'a GenConfig,
}

impl SplineContext<'_> {
    fn count(&self) -> usize {
        self.points.len()
    }

    fn pretty_lower(&self) -> String {
        self.desc.pretty_name.to_lowercase()
    }

    fn degree_lower(&self) -> String {
        degree_name(self.desc.degree, false).to_lowercase()
    }

    fn join(&self, sep: &str, f: impl Fn(usize, &str) -> String) -> String {
        self.points
            .iter()
            .enumerate()
            .map(|(i, p)| f(i, *p))
            .collect::<Vec<_>>()
            .join(sep)
    }

    /// `let Matrix4x1 { m0: p0, m1: p1, .. } = <source>;`
    fn bind_points(&self, w: &mut CodeWriter, source: &str) {
        let fields = self.join(", ", |i, p| format!("m{}: {}", i, p));
        w.line(format!("let {} {{ {} }} = {};", self.matrix_type, fields, source));
    }

    fn dimension_cast_target(&self) -> Option<(String, &'static str)> {
        if !self.family.supports_dimension_cast(self.dim) {
            return None;
        }
        let (d, method) = match self.dim.get() {
            2 => (3, "extend(0.0)"),
            _ => (2, "truncate()"),
        };
        let target = Dimension::new(d).ok()?;
        Some((self.family.type_name(target), method))
    }
}

fn lerp_expr(a: &str, b: &str) -> String {
    format!("{a} + ({b} - {a}) * t")
}

pub fn generate_spline_type(
    family: SplineFamily,
    dim: Dimension,
    config: &GenConfig,
) -> Result<Artifact> {
    let desc = family.descriptor();
    let ctx = SplineContext {
        family,
        desc,
        dim,
        type_name: family.type_name(dim),
        data_type: dim.data_type(),
        poly_type: dim.polynomial_type(),
        matrix_type: matrix_type_name(desc.point_count(), dim),
        points: desc.control_point_names().collect(),
        config,
    };

    let mut w = CodeWriter::new(config.indent.clone());
    file_header(&mut w);
    emit_imports(&mut w, &ctx);
    emit_struct(&mut w, &ctx);
    w.blank();
    w.block(format!("impl {}", ctx.type_name), |w| {
        emit_constructors(w, &ctx);
        w.blank();
        emit_curve(w, &ctx)?;
        w.blank();
        emit_accessors(w, &ctx);
        w.blank();
        emit_lerp(w, &ctx)?;
        if family.supports_slerp(dim) {
            w.blank();
            emit_slerp(w, &ctx)?;
        }
        if family.supports_split() {
            w.blank();
            emit_split(w, &ctx)?;
        }
        Ok(())
    })?;
    w.blank();
    emit_equality(&mut w, &ctx)?;
    emit_dimension_cast(&mut w, &ctx)?;
    emit_family_casts(&mut w, &ctx)?;

    Ok(Artifact {
        kind: ArtifactKind::Spline(family, dim),
        lines: w.into_lines(),
    })
}

fn emit_imports(w: &mut CodeWriter, ctx: &SplineContext) {
    let rt = &ctx.config.runtime_path;
    w.line("use std::cell::Cell;");
    w.line("use std::fmt;");
    w.line("use std::hash::{Hash, Hasher};");
    w.blank();
    if !ctx.dim.is_scalar() {
        w.line(format!("use glam::{};", ctx.data_type));
        w.blank();
    }
    w.line(format!("use {}::numerics::{};", rt, ctx.matrix_type));
    let mut runtime = vec!["IndexOutOfRange".to_string(), ctx.poly_type.clone()];
    if ctx.family.supports_slerp(ctx.dim) {
        runtime.push("SlerpUnclamped".to_string());
    }
    runtime.sort();
    w.line(format!("use {}::{{{}}};", rt, runtime.join(", ")));

    let mut siblings: Vec<String> = conversion_targets(ctx.family)
        .map(|f| f.type_name(ctx.dim))
        .collect();
    if let Some((target, _)) = ctx.dimension_cast_target() {
        siblings.push(target);
    }
    match siblings.len() {
        0 => {}
        1 => w.line(format!("use super::{};", siblings[0])),
        _ => w.line(format!("use super::{{{}}};", siblings.join(", "))),
    }
    w.blank();
}

fn emit_struct(w: &mut CodeWriter, ctx: &SplineContext) {
    w.doc(format!(
        "An optimized uniform {} {} {} segment, with {} control points",
        ctx.dim,
        ctx.degree_lower(),
        ctx.pretty_lower(),
        ctx.count()
    ));
    w.line("#[derive(Clone, Debug)]");
    w.line(format!("pub struct {} {{", ctx.type_name));
    w.line(format!("{}point_matrix: {},", ctx.config.indent, ctx.matrix_type));
    w.line(format!("{}curve: Cell<{}>,", ctx.config.indent, ctx.poly_type));
    w.line(format!("{}valid_coefficients: Cell<bool>,", ctx.config.indent));
    w.line("}");
}

fn emit_constructors(w: &mut CodeWriter, ctx: &SplineContext) {
    let summary = format!(
        "Creates a uniform {} {} {} segment, from {} control points",
        ctx.dim,
        ctx.degree_lower(),
        ctx.pretty_lower(),
        ctx.count()
    );
    w.doc(&summary);
    w.doc("");
    for p in &ctx.desc.control_points {
        w.doc(format!("* `{}` - {}", p.name, p.description));
    }
    let params = ctx.join(", ", |_, p| format!("{}: {}", p, ctx.data_type));
    w.line(format!("pub fn new({}) -> Self {{", params));
    w.line(format!(
        "{}Self::from_point_matrix({}::new({}))",
        ctx.config.indent,
        ctx.matrix_type,
        ctx.points.join(", ")
    ));
    w.line("}");
    w.blank();

    w.doc(&summary);
    w.doc("");
    w.doc("* `point_matrix` - The matrix containing the control points of this spline");
    w.line(format!(
        "pub fn from_point_matrix(point_matrix: {}) -> Self {{",
        ctx.matrix_type
    ));
    let i = &ctx.config.indent;
    w.line(format!("{i}Self {{"));
    w.line(format!("{i}{i}point_matrix,"));
    w.line(format!("{i}{i}curve: Cell::new({}::default()),", ctx.poly_type));
    w.line(format!("{i}{i}valid_coefficients: Cell::new(false),"));
    w.line(format!("{i}}}"));
    w.line("}");
}

/// Lazily recomputed polynomial form; the cache is dropped by every setter.
fn emit_curve(w: &mut CodeWriter, ctx: &SplineContext) -> Result<()> {
    let rows = coefficient_rows(&ctx.desc.characteristic_matrix, &ctx.points)?;
    w.doc("The polynomial form of this segment, recomputed on the first read after a control point changes");
    w.block(format!("pub fn curve(&self) -> {}", ctx.poly_type), |w| {
        w.block("if self.valid_coefficients.get()", |w| {
            w.line("return self.curve.get();");
            Ok(())
        })?;
        ctx.bind_points(w, "self.point_matrix");
        let ctor = degree_name(ctx.desc.degree, false).to_lowercase();
        w.indented(format!("let curve = {}::{}(", ctx.poly_type, ctor), ");", |w| {
            for row in &rows {
                w.line(format!("{},", row.render(NumberFormat::Float)?));
            }
            Ok(())
        })?;
        w.line("self.curve.set(curve);");
        w.line("self.valid_coefficients.set(true);");
        w.line("curve");
        Ok(())
    })
}

fn emit_accessors(w: &mut CodeWriter, ctx: &SplineContext) {
    let i = &ctx.config.indent;
    w.line(format!("pub fn point_matrix(&self) -> {} {{", ctx.matrix_type));
    w.line(format!("{i}self.point_matrix"));
    w.line("}");
    w.blank();
    w.line(format!("pub fn set_point_matrix(&mut self, value: {}) {{", ctx.matrix_type));
    w.line(format!("{i}self.point_matrix = value;"));
    w.line(format!("{i}self.valid_coefficients.set(false);"));
    w.line("}");

    for (k, p) in ctx.desc.control_points.iter().enumerate() {
        w.blank();
        w.doc(p.description);
        w.line(format!("pub fn {}(&self) -> {} {{", p.name, ctx.data_type));
        w.line(format!("{i}self.point_matrix.m{k}"));
        w.line("}");
        w.blank();
        w.line(format!("pub fn set_{}(&mut self, value: {}) {{", p.name, ctx.data_type));
        w.line(format!("{i}self.point_matrix.m{k} = value;"));
        w.line(format!("{i}self.valid_coefficients.set(false);"));
        w.line("}");
    }

    let last = ctx.count() - 1;
    let out_of_range = format!("IndexOutOfRange {{ index: i, len: {} }}", ctx.count());
    w.blank();
    w.doc(format!("Get a control point by index. Valid indices from 0 to {last}"));
    w.line(format!(
        "pub fn get(&self, i: usize) -> Result<{}, IndexOutOfRange> {{",
        ctx.data_type
    ));
    w.line(format!("{i}match i {{"));
    for (k, p) in ctx.points.iter().enumerate() {
        w.line(format!("{i}{i}{k} => Ok(self.{p}()),"));
    }
    w.line(format!("{i}{i}_ => Err({out_of_range}),"));
    w.line(format!("{i}}}"));
    w.line("}");
    w.blank();
    w.doc(format!("Set a control point by index. Valid indices from 0 to {last}"));
    w.line(format!(
        "pub fn set(&mut self, i: usize, value: {}) -> Result<(), IndexOutOfRange> {{",
        ctx.data_type
    ));
    w.line(format!("{i}match i {{"));
    for (k, p) in ctx.points.iter().enumerate() {
        w.line(format!("{i}{i}{k} => self.set_{p}(value),"));
    }
    w.line(format!("{i}{i}_ => return Err({out_of_range}),"));
    w.line(format!("{i}}}"));
    w.line(format!("{i}Ok(())"));
    w.line("}");
}

fn emit_blend_docs(w: &mut CodeWriter, summary: String) {
    w.doc(summary);
    w.doc("");
    w.doc("* `a` - The first spline segment");
    w.doc("* `b` - The second spline segment");
    w.doc("* `t` - A value from 0 to 1 to blend between `a` and `b`");
}

fn emit_lerp(w: &mut CodeWriter, ctx: &SplineContext) -> Result<()> {
    emit_blend_docs(
        w,
        format!("Returns a linear blend between two {} curves", ctx.pretty_lower()),
    );
    w.block("pub fn lerp(a: &Self, b: &Self, t: f32) -> Self", |w| {
        w.indented("Self::new(", ")", |w| {
            for p in &ctx.points {
                let (pa, pb) = (format!("a.{p}()"), format!("b.{p}()"));
                w.line(format!("{},", lerp_expr(&pa, &pb)));
            }
            Ok(())
        })
    })
}

/// Endpoints blend linearly, the outgoing tangent directions blend spherically.
fn emit_slerp(w: &mut CodeWriter, ctx: &SplineContext) -> Result<()> {
    emit_blend_docs(
        w,
        format!(
            "Returns a linear blend between two {} curves, where the tangent directions are spherically interpolated",
            ctx.pretty_lower()
        ),
    );
    let (first, second) = (ctx.points[0], ctx.points[1]);
    let (last, before_last) = (ctx.points[ctx.count() - 1], ctx.points[ctx.count() - 2]);
    w.block("pub fn slerp(a: &Self, b: &Self, t: f32) -> Self", |w| {
        for p in [first, last] {
            let (pa, pb) = (format!("a.{p}()"), format!("b.{p}()"));
            w.line(format!("let {p} = {};", lerp_expr(&pa, &pb)));
        }
        w.indented("Self::new(", ")", |w| {
            w.line(format!("{first},"));
            w.line(format!(
                "{first} + (a.{second}() - a.{first}()).slerp_unclamped(b.{second}() - b.{first}(), t),"
            ));
            w.line(format!(
                "{last} + (a.{before_last}() - a.{last}()).slerp_unclamped(b.{before_last}() - b.{last}(), t),"
            ));
            w.line(format!("{last},"));
            Ok(())
        })
    })
}

fn emit_split(w: &mut CodeWriter, ctx: &SplineContext) -> Result<()> {
    let plan = SplitPlan::new(&ctx.points);
    w.doc("Splits this curve at the given t-value, into two curves that together form the exact same shape");
    w.doc("");
    w.doc("* `t` - The t-value to split at");
    w.block("pub fn split(&self, t: f32) -> (Self, Self)", |w| {
        ctx.bind_points(w, "self.point_matrix");
        for step in &plan.steps {
            w.line(format!("let {} = {};", step.name, lerp_expr(&step.from, &step.to)));
        }
        w.line(format!(
            "(Self::new({}), Self::new({}))",
            plan.left.join(", "),
            plan.right.join(", ")
        ));
        Ok(())
    })
}

fn emit_equality(w: &mut CodeWriter, ctx: &SplineContext) -> Result<()> {
    let name = &ctx.type_name;
    w.block(format!("impl PartialEq for {name}"), |w| {
        w.block("fn eq(&self, other: &Self) -> bool", |w| {
            w.line("self.point_matrix == other.point_matrix");
            Ok(())
        })
    })?;
    w.blank();
    w.block(format!("impl Hash for {name}"), |w| {
        w.block("fn hash<H: Hasher>(&self, state: &mut H)", |w| {
            w.line("self.point_matrix.hash(state);");
            Ok(())
        })
    })?;
    w.blank();
    w.block(format!("impl fmt::Display for {name}"), |w| {
        w.block("fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result", |w| {
            let holes = vec!["{}"; ctx.count()].join(", ");
            let args = ctx.join(", ", |_, p| format!("self.{p}()"));
            w.line(format!("write!(f, \"({holes})\", {args})"));
            Ok(())
        })
    })
}

fn emit_dimension_cast(w: &mut CodeWriter, ctx: &SplineContext) -> Result<()> {
    let Some((target, method)) = ctx.dimension_cast_target() else {
        return Ok(());
    };
    w.blank();
    if ctx.dim.get() == 2 {
        w.doc("Returns this spline segment in 3D, where z = 0");
    } else {
        w.doc("Returns this curve flattened to 2D, dropping the z component");
    }
    w.block(format!("impl From<{}> for {}", ctx.type_name, target), |w| {
        w.block(format!("fn from(curve: {}) -> Self", ctx.type_name), |w| {
            let args = ctx.join(", ", |_, p| format!("curve.{p}().{method}"));
            w.line(format!("Self::new({args})"));
            Ok(())
        })
    })
}

/// Exact casts to every other family of the same degree.
fn emit_family_casts(w: &mut CodeWriter, ctx: &SplineContext) -> Result<()> {
    for target in conversion_targets(ctx.family) {
        let c = conversion_matrix(ctx.family, target)?;
        let rows = coefficient_rows(&c, &ctx.points)?;
        let target_name = target.type_name(ctx.dim);
        w.blank();
        w.doc(format!(
            "Converts to the {} segment describing the exact same curve",
            target.descriptor().pretty_name
        ));
        w.block(format!("impl From<{}> for {}", ctx.type_name, target_name), |w| {
            w.block(format!("fn from(s: {}) -> Self", ctx.type_name), |w| {
                ctx.bind_points(w, "s.point_matrix()");
                w.indented("Self::new(", ")", |w| {
                    for row in &rows {
                        w.line(format!("{},", row.render(NumberFormat::Float)?));
                    }
                    Ok(())
                })
            })
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(family: SplineFamily, d: u8) -> String {
        let dim = Dimension::new(d).unwrap();
        generate_spline_type(family, dim, &GenConfig::default())
            .unwrap()
            .lines
            .join("\n")
    }

    #[test]
    fn test_bezier_cubic_curve_formulas() {
        let out = text(SplineFamily::BezierCubic, 3);
        assert!(out.contains("pub struct BezierCubic3D {"));
        assert!(out.contains("let Vector3Matrix4x1 { m0: p0, m1: p1, m2: p2, m3: p3 } = self.point_matrix;"));
        assert!(out.contains("let curve = Polynomial3D::cubic(\n"));
        assert!(out.contains("            p0,\n            3.0*(-p0+p1),\n            3.0*p0-6.0*p1+3.0*p2,\n            -p0+3.0*p1-3.0*p2+p3,\n        );"));
    }

    #[test]
    fn test_bspline_uses_fractional_literals() {
        let out = text(SplineFamily::UniformBSplineCubic, 1);
        assert!(out.contains("(1.0/6.0)*p0+(2.0/3.0)*p1+(1.0/6.0)*p2,"));
        assert!(out.contains("(-p0+p2)/2.0,"));
        assert!(out.contains("(1.0/2.0)*p0-p1+(1.0/2.0)*p2,"));
        assert!(out.contains("-(1.0/6.0)*p0+(1.0/2.0)*p1-(1.0/2.0)*p2+(1.0/6.0)*p3,"));
    }

    #[test]
    fn test_cache_invalidated_by_every_setter() {
        let out = text(SplineFamily::HermiteCubic, 2);
        for setter in ["set_point_matrix", "set_p0", "set_v0", "set_p1", "set_v1"] {
            let start = out.find(&format!("pub fn {setter}(")).unwrap();
            let body = &out[start..start + 200];
            assert!(body.contains("self.valid_coefficients.set(false);"), "{setter}");
        }
        assert!(out.contains("return self.curve.get();"));
        assert!(out.contains("self.valid_coefficients.set(true);"));
    }

    #[test]
    fn test_indexer_reports_out_of_range() {
        let out = text(SplineFamily::BezierQuadratic, 4);
        assert!(out.contains("pub fn get(&self, i: usize) -> Result<Vec4, IndexOutOfRange> {"));
        assert!(out.contains("_ => Err(IndexOutOfRange { index: i, len: 3 }),"));
        assert!(out.contains("_ => return Err(IndexOutOfRange { index: i, len: 3 }),"));
    }

    #[test]
    fn test_cross_family_casts_skip_self() {
        let out = text(SplineFamily::BezierCubic, 1);
        assert!(out.contains("impl From<BezierCubic1D> for HermiteCubic1D {"));
        assert!(out.contains("impl From<BezierCubic1D> for UBSCubic1D {"));
        assert!(out.contains("impl From<BezierCubic1D> for CatRomCubic1D {"));
        assert!(!out.contains("for BezierCubic1D {\n        fn from"));
        assert!(out.contains("use super::{HermiteCubic1D, UBSCubic1D, CatRomCubic1D};"));
        // Hermite velocities are three times the handle offsets.
        assert!(out.contains("3.0*(-p0+p1),"));
        assert!(out.contains("3.0*(-p2+p3),"));
    }

    #[test]
    fn test_quadratic_has_no_casts() {
        let out = text(SplineFamily::BezierQuadratic, 2);
        assert!(!out.contains("impl From<"));
        assert!(!out.contains("use super::"));
        assert!(out.contains("Polynomial2D::quadratic("));
    }

    #[test]
    fn test_dimension_casts() {
        let out2 = text(SplineFamily::CatmullRomCubic, 2);
        assert!(out2.contains("impl From<CatRomCubic2D> for CatRomCubic3D {"));
        assert!(out2.contains("curve.p0().extend(0.0)"));
        let out3 = text(SplineFamily::CatmullRomCubic, 3);
        assert!(out3.contains("impl From<CatRomCubic3D> for CatRomCubic2D {"));
        assert!(out3.contains("curve.p3().truncate()"));
        assert!(!text(SplineFamily::CatmullRomCubic, 4).contains("truncate"));
    }

    #[test]
    fn test_slerp_only_for_cubic_bezier_2d_3d() {
        let out = text(SplineFamily::BezierCubic, 2);
        assert!(out.contains("pub fn slerp(a: &Self, b: &Self, t: f32) -> Self {"));
        assert!(out.contains("p0 + (a.p1() - a.p0()).slerp_unclamped(b.p1() - b.p0(), t),"));
        assert!(out.contains("p3 + (a.p2() - a.p3()).slerp_unclamped(b.p2() - b.p3(), t),"));
        assert!(out.contains("use crate::{IndexOutOfRange, Polynomial2D, SlerpUnclamped};"));
        assert!(!text(SplineFamily::BezierCubic, 1).contains("slerp"));
        assert!(!text(SplineFamily::HermiteCubic, 3).contains("slerp"));
    }

    #[test]
    fn test_split_pyramid() {
        let out = text(SplineFamily::BezierCubic, 3);
        assert!(out.contains("let a = p0 + (p1 - p0) * t;"));
        assert!(out.contains("let d = a + (b - a) * t;"));
        assert!(out.contains("let p = d + (e - d) * t;"));
        assert!(out.contains("(Self::new(p0, a, d, p), Self::new(p, e, c, p3))"));
        let quad = text(SplineFamily::BezierQuadratic, 1);
        assert!(quad.contains("(Self::new(p0, a, p), Self::new(p, b, p2))"));
        assert!(!text(SplineFamily::UniformBSplineCubic, 3).contains("fn split"));
    }

    #[test]
    fn test_display_and_equality() {
        let out = text(SplineFamily::HermiteCubic, 1);
        assert!(out.contains("write!(f, \"({}, {}, {}, {})\", self.p0(), self.v0(), self.p1(), self.v1())"));
        assert!(out.contains("self.point_matrix == other.point_matrix"));
        assert!(out.contains("self.point_matrix.hash(state);"));
    }

    #[test]
    fn test_runtime_path_is_configurable() {
        let cfg = GenConfig {
            runtime_path: "mathfs".to_string(),
            ..GenConfig::default()
        };
        let dim = Dimension::new(3).unwrap();
        let out = generate_spline_type(SplineFamily::HermiteCubic, dim, &cfg)
            .unwrap()
            .lines
            .join("\n");
        assert!(out.contains("use mathfs::numerics::Vector3Matrix4x1;"));
        assert!(out.contains("use mathfs::{IndexOutOfRange, Polynomial3D};"));
    }
}
