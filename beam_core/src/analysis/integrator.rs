//! Distributed-Load Integrator
//!
//! Definite and partial integrals of a [`LoadFunction`] over a sub-interval.
//!
//! - Constant and polynomial shapes integrate exactly; the `_exact` variants
//!   return the value as a [`BigRational`] computed entirely in rational
//!   arithmetic.
//! - Sinusoidal and exponential shapes use their closed-form antiderivatives.
//! - Expression and numeric shapes fall back to globally adaptive
//!   Gauss-Kronrod quadrature, bounded in both bisection depth and total
//!   function evaluations. Non-convergence is an error, never a best guess.
//!   The rule never samples segment endpoints, so loads like `sqrt(x)` whose
//!   slope is unbounded at an end integrate normally.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::trace;
use num::bigint::BigInt;
use num::rational::BigRational;
use num::Zero;
use serde::{Deserialize, Serialize};

use crate::errors::{BeamError, BeamResult};
use crate::exact;
use crate::loads::LoadFunction;

/// Limits for adaptive quadrature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quadrature {
    /// Absolute error target over the whole interval
    pub tolerance: f64,
    /// Maximum bisection depth of any one segment
    pub max_depth: u32,
    /// Maximum integrand evaluations per integral
    pub max_evaluations: usize,
}

impl Default for Quadrature {
    fn default() -> Self {
        Quadrature {
            tolerance: 1e-10,
            max_depth: 48,
            max_evaluations: 200_000,
        }
    }
}

/// ∫ w(x) dx over `[a, b]`
pub fn definite_integral(function: &LoadFunction, a: f64, b: f64, quadrature: &Quadrature) -> BeamResult<f64> {
    integrate(function, a, b, quadrature, Weight::Unit)
}

/// ∫ x·w(x) dx over `[a, b]`, used for moment arms about the origin
pub fn first_moment(function: &LoadFunction, a: f64, b: f64, quadrature: &Quadrature) -> BeamResult<f64> {
    integrate(function, a, b, quadrature, Weight::Position)
}

/// ∫ w(x) dx over `[start, query]` for a load spanning `[start, end]`.
///
/// `query` must lie inside the load's interval.
pub fn partial_integral(
    function: &LoadFunction,
    start: f64,
    end: f64,
    query: f64,
    quadrature: &Quadrature,
) -> BeamResult<f64> {
    if !(start <= query && query <= end) {
        return Err(BeamError::validation(
            "query",
            query.to_string(),
            format!("Partial integral query must lie in [{}, {}]", start, end),
        ));
    }
    definite_integral(function, start, query, quadrature)
}

/// Exact ∫ w(x) dx over `[a, b]`.
///
/// Rational for constant and polynomial shapes; other shapes are integrated
/// in floating point and lifted.
pub fn definite_integral_exact(
    function: &LoadFunction,
    a: f64,
    b: f64,
    quadrature: &Quadrature,
) -> BeamResult<BigRational> {
    match function {
        LoadFunction::Constant { value } => polynomial_exact(std::slice::from_ref(value), a, b, 0),
        LoadFunction::Polynomial { coefficients } => polynomial_exact(coefficients, a, b, 0),
        _ => lift_result(definite_integral(function, a, b, quadrature)?),
    }
}

/// Exact ∫ x·w(x) dx over `[a, b]`
pub fn first_moment_exact(
    function: &LoadFunction,
    a: f64,
    b: f64,
    quadrature: &Quadrature,
) -> BeamResult<BigRational> {
    match function {
        LoadFunction::Constant { value } => polynomial_exact(std::slice::from_ref(value), a, b, 1),
        LoadFunction::Polynomial { coefficients } => polynomial_exact(coefficients, a, b, 1),
        _ => lift_result(first_moment(function, a, b, quadrature)?),
    }
}

#[derive(Debug, Clone, Copy)]
enum Weight {
    Unit,
    Position,
}

fn integrate(function: &LoadFunction, a: f64, b: f64, quadrature: &Quadrature, weight: Weight) -> BeamResult<f64> {
    if !a.is_finite() || !b.is_finite() {
        return Err(BeamError::integration(format!("bounds [{}, {}] are not finite", a, b)));
    }
    if a == b {
        return Ok(0.0);
    }
    if a > b {
        return integrate(function, b, a, quadrature, weight).map(|v| -v);
    }

    let closed = match weight {
        Weight::Unit => function
            .antiderivative(b)
            .zip(function.antiderivative(a)),
        Weight::Position => function
            .first_moment_antiderivative(b)
            .zip(function.first_moment_antiderivative(a)),
    };

    let value = match closed {
        Some((upper, lower)) => upper - lower,
        None => match weight {
            Weight::Unit => adaptive_gauss_kronrod(|x| function.value_at(x), a, b, quadrature)?,
            Weight::Position => adaptive_gauss_kronrod(|x| x * function.value_at(x), a, b, quadrature)?,
        },
    };

    if !value.is_finite() {
        return Err(BeamError::integration(format!(
            "{} does not have a finite integral over [{}, {}]",
            function.describe(),
            a,
            b
        )));
    }
    Ok(value)
}

fn lift_result(value: f64) -> BeamResult<BigRational> {
    exact::from_f64(value).ok_or_else(|| BeamError::integration(format!("integral {} is not finite", value)))
}

/// Σ cᵢ (b^(i+1+shift) − a^(i+1+shift)) / (i+1+shift)
fn polynomial_exact(coefficients: &[f64], a: f64, b: f64, shift: usize) -> BeamResult<BigRational> {
    let lower = exact::from_f64(a).ok_or_else(|| BeamError::integration("lower bound is not finite"))?;
    let upper = exact::from_f64(b).ok_or_else(|| BeamError::integration("upper bound is not finite"))?;

    let mut total = BigRational::zero();
    for (i, c) in coefficients.iter().enumerate() {
        let coefficient = exact::from_f64(*c)
            .ok_or_else(|| BeamError::integration(format!("coefficient {} is not finite", c)))?;
        let power = i + 1 + shift;
        let span = num::pow(upper.clone(), power) - num::pow(lower.clone(), power);
        total += coefficient * span / BigRational::from_integer(BigInt::from(power));
    }
    Ok(total)
}

/// 15-point Kronrod abscissae on [-1, 1], outermost first. Odd indices are
/// the 7-point Gauss nodes.
const KRONROD_NODES: [f64; 8] = [
    0.991_455_371_120_812_6,
    0.949_107_912_342_758_5,
    0.864_864_423_359_769_1,
    0.741_531_185_599_394_4,
    0.586_087_235_467_691_1,
    0.405_845_151_377_397_2,
    0.207_784_955_007_898_5,
    0.0,
];

const KRONROD_WEIGHTS: [f64; 8] = [
    0.022_935_322_010_529_22,
    0.063_092_092_629_978_55,
    0.104_790_010_322_250_2,
    0.140_653_259_715_525_9,
    0.169_004_726_639_267_9,
    0.190_350_578_064_785_4,
    0.204_432_940_075_298_9,
    0.209_482_141_084_727_8,
];

/// Weights for `KRONROD_NODES[1]`, `[3]`, `[5]`, `[7]`
const GAUSS_WEIGHTS: [f64; 4] = [
    0.129_484_966_168_869_7,
    0.279_705_391_489_276_7,
    0.381_830_050_505_118_9,
    0.417_959_183_673_469_4,
];

/// Globally adaptive Gauss-Kronrod (G7/K15) quadrature.
///
/// The segment with the largest error estimate is bisected until the summed
/// estimate meets the tolerance, or the rounding floor set by ∫|f|.
/// A segment too narrow to split at float resolution is kept as is.
fn adaptive_gauss_kronrod<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, quadrature: &Quadrature) -> BeamResult<f64> {
    let mut rule = GaussKronrod {
        f: &f,
        evaluations: 0,
        max_evaluations: quadrature.max_evaluations,
    };

    let mut pending = BinaryHeap::new();
    let mut settled = Vec::new();
    pending.push(rule.segment(a, b, 0)?);

    loop {
        let (magnitude, error) = pending
            .iter()
            .chain(settled.iter())
            .fold((0.0, 0.0), |(m, e), s: &Segment| (m + s.magnitude, e + s.error));

        // Below this the estimate is rounding noise
        let floor = 64.0 * f64::EPSILON * magnitude;
        if error <= quadrature.tolerance.max(floor) {
            break;
        }

        let Some(worst) = pending.pop() else {
            break;
        };
        let mid = 0.5 * (worst.a + worst.b);
        if mid <= worst.a || mid >= worst.b {
            settled.push(worst);
            continue;
        }
        if worst.depth >= quadrature.max_depth {
            return Err(BeamError::integration(format!(
                "quadrature did not converge on [{}, {}] (error estimate {:e})",
                worst.a, worst.b, error
            )));
        }
        pending.push(rule.segment(worst.a, mid, worst.depth + 1)?);
        pending.push(rule.segment(mid, worst.b, worst.depth + 1)?);
    }

    // Sum left to right so the result does not depend on heap order
    let mut segments: Vec<Segment> = pending.into_vec();
    segments.extend(settled);
    segments.sort_by(|l, r| l.a.total_cmp(&r.a));
    let result: f64 = segments.iter().map(|s| s.value).sum();

    trace!(
        "adaptive quadrature over [{}, {}] used {} evaluations in {} segments",
        a,
        b,
        rule.evaluations,
        segments.len()
    );
    Ok(result)
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    a: f64,
    b: f64,
    value: f64,
    error: f64,
    /// K15 estimate of ∫|f|
    magnitude: f64,
    depth: u32,
}

impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Segment {}

impl PartialOrd for Segment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Largest error first; ties broken by position for a stable order
impl Ord for Segment {
    fn cmp(&self, other: &Self) -> Ordering {
        self.error
            .total_cmp(&other.error)
            .then_with(|| other.a.total_cmp(&self.a))
    }
}

struct GaussKronrod<'f, F> {
    f: &'f F,
    evaluations: usize,
    max_evaluations: usize,
}

impl<F: Fn(f64) -> f64> GaussKronrod<'_, F> {
    fn sample(&mut self, x: f64) -> BeamResult<f64> {
        self.evaluations += 1;
        if self.evaluations > self.max_evaluations {
            return Err(BeamError::integration(format!(
                "quadrature did not converge within {} evaluations",
                self.max_evaluations
            )));
        }
        let y = (self.f)(x);
        if !y.is_finite() {
            return Err(BeamError::integration(format!("function is not finite at x = {}", x)));
        }
        Ok(y)
    }

    /// K15 estimate over `[a, b]`, with |K15 − G7| as its error
    fn segment(&mut self, a: f64, b: f64, depth: u32) -> BeamResult<Segment> {
        let center = 0.5 * (a + b);
        let half = 0.5 * (b - a);

        let mid = self.sample(center)?;
        let mut kronrod = KRONROD_WEIGHTS[7] * mid;
        let mut gauss = GAUSS_WEIGHTS[3] * mid;
        let mut magnitude = KRONROD_WEIGHTS[7] * mid.abs();
        for (i, node) in KRONROD_NODES.iter().take(7).enumerate() {
            let offset = half * node;
            let (left, right) = (self.sample(center - offset)?, self.sample(center + offset)?);
            kronrod += KRONROD_WEIGHTS[i] * (left + right);
            magnitude += KRONROD_WEIGHTS[i] * (left.abs() + right.abs());
            if i % 2 == 1 {
                gauss += GAUSS_WEIGHTS[i / 2] * (left + right);
            }
        }

        Ok(Segment {
            a,
            b,
            value: kronrod * half,
            error: ((kronrod - gauss) * half).abs(),
            magnitude: magnitude * half,
            depth,
        })
    }
}
