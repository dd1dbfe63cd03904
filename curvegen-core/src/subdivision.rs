use crate::error::{CodegenError, Result};
use crate::rational::Rational;
use std::collections::HashMap;

/// One `name = from + (to - from) * t` step of the de Casteljau pyramid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LerpStep {
    pub name: String,
    pub from: String,
    pub to: String,
}

/// De Casteljau subdivision laid out as named steps.
///
/// Row 0 is the control points, each later row lerps adjacent entries of the
/// row above, and the final single-entry row is the apex `p`. The left curve
/// takes the first entry of every row, the right curve the last entry of
/// every row from the apex back down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPlan {
    pub steps: Vec<LerpStep>,
    pub left: Vec<String>,
    pub right: Vec<String>,
}

const APEX: &str = "p";

impl SplitPlan {
    pub fn new<S: AsRef<str>>(points: &[S]) -> Self {
        let mut names = ('a'..='z')
            .map(String::from)
            .filter(|n| n != APEX && n != "t" && !points.iter().any(|p| p.as_ref() == n));
        let mut rows: Vec<Vec<String>> = vec![points.iter().map(|p| p.as_ref().to_string()).collect()];
        let mut steps = Vec::new();
        while rows.last().map_or(0, Vec::len) > 1 {
            let above = rows.last().cloned().unwrap_or_default();
            let mut row = Vec::with_capacity(above.len() - 1);
            for pair in above.windows(2) {
                let name = if above.len() == 2 {
                    APEX.to_string()
                } else {
                    names.next().unwrap_or_else(|| format!("q{}", steps.len()))
                };
                steps.push(LerpStep {
                    name: name.clone(),
                    from: pair[0].clone(),
                    to: pair[1].clone(),
                });
                row.push(name);
            }
            rows.push(row);
        }
        let left = rows.iter().filter_map(|r| r.first().cloned()).collect();
        let right = rows.iter().rev().filter_map(|r| r.last().cloned()).collect();
        Self { steps, left, right }
    }

    pub fn for_degree(degree: u8) -> Self {
        let names: Vec<String> = (0..=degree).map(|i| format!("p{}", i)).collect();
        Self::new(&names)
    }
}

type Point = Vec<Rational>;

fn lerp(a: &Point, b: &Point, t: Rational) -> Result<Point> {
    if a.len() != b.len() {
        return Err(CodegenError::SizeMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    a.iter()
        .zip(b)
        .map(|(x, y)| x.checked_add(&y.checked_sub(x)?.checked_mul(&t)?))
        .collect()
}

/// Split a Bézier control polygon at `t` into two polygons describing the
/// same curve. Exact for any `t`, including outside `[0, 1]`.
pub fn split_exact(points: &[Point], t: Rational) -> Result<(Vec<Point>, Vec<Point>)> {
    let names: Vec<String> = (0..points.len()).map(|i| format!("p{}", i)).collect();
    let plan = SplitPlan::new(&names);
    let mut values: HashMap<String, Point> =
        names.iter().cloned().zip(points.iter().cloned()).collect();
    for step in &plan.steps {
        let value = lerp(&values[&step.from], &values[&step.to], t)?;
        values.insert(step.name.clone(), value);
    }
    let collect = |names: &[String]| -> Result<Vec<Point>> {
        names
            .iter()
            .map(|n| {
                values.get(n).cloned().ok_or(CodegenError::IndexOutOfRange {
                    index: 0,
                    len: points.len(),
                })
            })
            .collect()
    };
    Ok((collect(&plan.left)?, collect(&plan.right)?))
}
