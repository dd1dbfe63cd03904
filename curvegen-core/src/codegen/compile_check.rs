//! Builds the emitted catalog as a real crate against `glam` and runs its
//! behaviour tests. Ignored by default: it shells out to cargo and needs
//! `glam` from the registry.

use super::regenerate;
use crate::config::GenConfig;
use std::fs;
use std::process::Command;

const MANIFEST: &str = r##"[package]
name = "curvegen-scratch"
version = "0.0.0"
edition = "2021"
publish = false

[dependencies]
glam = "0.29"

[workspace]
"##;

/// Runtime support types the emitted code imports from `crate`, plus tests
/// exercising the generated types.
const LIB: &str = r##"pub mod numerics;
pub mod splines;

use glam::{Vec2, Vec3, Vec4};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexOutOfRange {
    pub index: usize,
    pub len: usize,
}

macro_rules! polynomial {
    ($name:ident, $t:ty) => {
        #[derive(Debug, Clone, Copy, Default, PartialEq)]
        pub struct $name {
            pub c: [$t; 4],
        }

        impl $name {
            pub fn quadratic(c0: $t, c1: $t, c2: $t) -> Self {
                Self { c: [c0, c1, c2, <$t>::default()] }
            }

            pub fn cubic(c0: $t, c1: $t, c2: $t, c3: $t) -> Self {
                Self { c: [c0, c1, c2, c3] }
            }

            pub fn eval(&self, t: f32) -> $t {
                self.c[0] + (self.c[1] + (self.c[2] + self.c[3] * t) * t) * t
            }
        }
    };
}

polynomial!(Polynomial, f32);
polynomial!(Polynomial2D, Vec2);
polynomial!(Polynomial3D, Vec3);
polynomial!(Polynomial4D, Vec4);

pub trait SlerpUnclamped {
    fn slerp_unclamped(self, to: Self, t: f32) -> Self;
}

macro_rules! slerp {
    ($t:ty) => {
        impl SlerpUnclamped for $t {
            fn slerp_unclamped(self, to: Self, t: f32) -> Self {
                let len = self.length() + (to.length() - self.length()) * t;
                let (a, b) = (self.normalize_or_zero(), to.normalize_or_zero());
                let angle = a.dot(b).clamp(-1.0, 1.0).acos();
                let dir = if angle.abs() < 1e-6 {
                    a + (b - a) * t
                } else {
                    (a * ((1.0 - t) * angle).sin() + b * (t * angle).sin()) / angle.sin()
                };
                dir * len
            }
        }
    };
}

slerp!(Vec2);
slerp!(Vec3);

#[cfg(test)]
mod tests {
    use crate::numerics::*;
    use crate::splines::*;
    use crate::IndexOutOfRange;
    use glam::{Vec2, Vec3};
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn close2(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    fn close3(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    fn hash_of<T: Hash>(v: &T) -> u64 {
        let mut h = DefaultHasher::new();
        v.hash(&mut h);
        h.finish()
    }

    fn arch() -> BezierCubic2D {
        BezierCubic2D::new(
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 2.0),
            Vec2::new(3.0, 2.0),
            Vec2::new(4.0, 0.0),
        )
    }

    #[test]
    fn bezier_hits_endpoints() {
        let c = arch();
        let p = c.curve();
        assert!(close2(p.eval(0.0), c.p0()));
        assert!(close2(p.eval(1.0), c.p3()));
        assert!(close2(p.eval(0.5), Vec2::new(2.0, 1.5)));
    }

    #[test]
    fn setters_refresh_cached_curve() {
        let mut c = arch();
        let _ = c.curve();
        c.set_p3(Vec2::new(8.0, 0.0));
        assert!(close2(c.curve().eval(1.0), Vec2::new(8.0, 0.0)));
        c.set(0, Vec2::new(1.0, 1.0)).unwrap();
        assert!(close2(c.curve().eval(0.0), Vec2::new(1.0, 1.0)));
        assert_eq!(c.get(4), Err(IndexOutOfRange { index: 4, len: 4 }));
        assert_eq!(c.set(7, Vec2::ZERO), Err(IndexOutOfRange { index: 7, len: 4 }));
    }

    #[test]
    fn conversions_round_trip() {
        let c = arch();
        let back = BezierCubic2D::from(HermiteCubic2D::from(c.clone()));
        for i in 0..4 {
            assert!(close2(back.get(i).unwrap(), c.get(i).unwrap()));
        }
        let bspline = UBSCubic2D::from(c.clone());
        let catrom = CatRomCubic2D::from(c.clone());
        for k in 0..=4 {
            let t = k as f32 / 4.0;
            assert!(close2(bspline.curve().eval(t), c.curve().eval(t)));
            assert!(close2(catrom.curve().eval(t), c.curve().eval(t)));
        }
    }

    #[test]
    fn catmull_rom_passes_inner_points() {
        let c = CatRomCubic2D::new(
            Vec2::new(-1.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(2.0, 1.0),
            Vec2::new(3.0, 0.0),
        );
        assert!(close2(c.curve().eval(0.0), c.p1()));
        assert!(close2(c.curve().eval(1.0), c.p2()));
        let lifted = CatRomCubic3D::from(c.clone());
        assert_eq!(lifted.p2(), Vec3::new(2.0, 1.0, 0.0));
        assert_eq!(CatRomCubic2D::from(lifted), c);
    }

    #[test]
    fn split_meets_at_junction() {
        let c = arch();
        let (l, r) = c.split(0.3);
        assert!(close2(l.p3(), r.p0()));
        assert!(close2(l.curve().eval(1.0), c.curve().eval(0.3)));
        assert!(close2(r.curve().eval(0.5), c.curve().eval(0.65)));
        let q = BezierQuad1D::new(0.0, 4.0, 2.0);
        let (a, b) = q.split(0.5);
        assert!((a.p2() - b.p0()).abs() < 1e-6);
        assert!((b.curve().eval(1.0) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn blends_keep_endpoints() {
        let a = BezierCubic3D::new(Vec3::ZERO, Vec3::X, Vec3::new(2.0, 1.0, 0.0), Vec3::new(3.0, 0.0, 0.0));
        let b = BezierCubic3D::new(Vec3::Y, Vec3::new(0.0, 2.0, 1.0), Vec3::new(1.0, 3.0, 0.0), Vec3::splat(2.0));
        for (s, expected) in [(0.0, &a), (1.0, &b)] {
            let slerped = BezierCubic3D::slerp(&a, &b, s);
            let lerped = BezierCubic3D::lerp(&a, &b, s);
            for i in 0..4 {
                assert!(close3(slerped.get(i).unwrap(), expected.get(i).unwrap()));
                assert!(close3(lerped.get(i).unwrap(), expected.get(i).unwrap()));
            }
        }
    }

    #[test]
    fn equal_values_hash_equal() {
        let a = BezierQuad1D::new(0.0, 1.0, 2.0);
        let b = BezierQuad1D::new(-0.0, 1.0, 2.0);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        let m = Vector3Matrix3x1::new(Vec3::new(-0.0, 1.0, 0.0), Vec3::ONE, Vec3::ZERO);
        let n = Vector3Matrix3x1::new(Vec3::new(0.0, 1.0, -0.0), Vec3::ONE, Vec3::ZERO);
        assert_eq!(m, n);
        assert_eq!(hash_of(&m), hash_of(&n));
    }

    #[test]
    fn vector_matrix_splits_into_components() {
        let m = Vector2Matrix4x1::new(
            Vec2::new(1.0, 2.0),
            Vec2::new(3.0, 4.0),
            Vec2::new(5.0, 6.0),
            Vec2::new(7.0, 8.0),
        );
        assert_eq!(m.y(), Matrix4x1::new(2.0, 4.0, 6.0, 8.0));
        assert_eq!(Vector2Matrix4x1::from_components(m.x(), m.y()), m);
        assert_eq!(format!("{}", BezierQuad1D::new(0.0, 1.5, 2.0)), "(0, 1.5, 2)");
    }
}
"##;

#[test]
#[ignore = "runs cargo on a scratch crate and fetches glam"]
fn test_emitted_catalog_builds_and_behaves() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("Cargo.toml"), MANIFEST).unwrap();
    let config = GenConfig {
        output_root: root.join("src"),
        ..GenConfig::default()
    };
    regenerate(&config).unwrap();
    fs::write(root.join("src/lib.rs"), LIB).unwrap();

    let cargo = std::env::var("CARGO").unwrap_or_else(|_| "cargo".to_string());
    let status = Command::new(cargo)
        .args(["test", "--quiet"])
        .current_dir(root)
        .env("CARGO_TARGET_DIR", root.join("target"))
        .status()
        .unwrap();
    assert!(status.success(), "emitted catalog failed to build or its tests failed");
}
