//! Load intensity functions
//!
//! A distributed load's shape is one of a closed set of variants so the
//! integrator can pick its path explicitly:
//!
//! | Variant       | w(x)               | Integration          |
//! |---------------|--------------------|----------------------|
//! | `Constant`    | c                  | exact (rational)     |
//! | `Polynomial`  | Σ cᵢ xⁱ            | exact (rational)     |
//! | `Sinusoidal`  | A sin(kx + φ)      | closed form          |
//! | `Exponential` | A e^(rx)           | closed form          |
//! | `Expression`  | parsed text in x   | adaptive quadrature  |
//! | `Numeric`     | any `Fn(f64)->f64` | adaptive quadrature  |

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::expression::Expression;
use crate::errors::BeamResult;

/// Below this |k·x| the moment antiderivatives switch to their Taylor series.
const SERIES_THRESHOLD: f64 = 1e-2;

/// An opaque, user-supplied intensity function.
///
/// Numeric functions cannot be written to a study file; they exist for
/// programmatic callers whose load shape has no closed form.
#[derive(Clone)]
pub struct NumericFn {
    label: String,
    func: Arc<dyn Fn(f64) -> f64 + Send + Sync>,
}

impl NumericFn {
    /// Wrap a closure with a label used in reports
    pub fn new(label: impl Into<String>, func: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        NumericFn {
            label: label.into(),
            func: Arc::new(func),
        }
    }

    /// Evaluate the function
    pub fn call(&self, x: f64) -> f64 {
        (self.func)(x)
    }

    /// Report label
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Debug for NumericFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NumericFn")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl PartialEq for NumericFn {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

/// Shape of a distributed load, intensity in force per unit length
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoadFunction {
    /// w(x) = value
    Constant { value: f64 },

    /// w(x) = Σ coefficients[i]·xⁱ, ascending powers of the beam coordinate
    Polynomial { coefficients: Vec<f64> },

    /// w(x) = amplitude·sin(wavenumber·x + phase)
    Sinusoidal {
        amplitude: f64,
        wavenumber: f64,
        #[serde(default)]
        phase: f64,
    },

    /// w(x) = amplitude·e^(rate·x)
    Exponential { amplitude: f64, rate: f64 },

    /// Free-form intensity in `x`, e.g. `x*sin(x)`
    Expression(Expression),

    /// Opaque closure, integrated numerically
    #[serde(skip)]
    Numeric(NumericFn),
}

impl LoadFunction {
    /// Uniform intensity
    pub fn constant(value: f64) -> Self {
        LoadFunction::Constant { value }
    }

    /// Polynomial intensity from ascending coefficients
    pub fn polynomial(coefficients: impl Into<Vec<f64>>) -> Self {
        LoadFunction::Polynomial {
            coefficients: coefficients.into(),
        }
    }

    /// Linear intensity `slope·x + intercept`
    pub fn linear(intercept: f64, slope: f64) -> Self {
        LoadFunction::polynomial(vec![intercept, slope])
    }

    /// Parse a free-form intensity such as `3 + 2*exp(-x)*x`
    pub fn expression(source: impl Into<String>) -> BeamResult<Self> {
        Ok(LoadFunction::Expression(Expression::parse(source)?))
    }

    /// Wrap an arbitrary closure
    pub fn numeric(label: impl Into<String>, func: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        LoadFunction::Numeric(NumericFn::new(label, func))
    }

    /// True when integration happens in exact rational arithmetic
    pub fn is_exact(&self) -> bool {
        matches!(self, LoadFunction::Constant { .. } | LoadFunction::Polynomial { .. })
    }

    /// True when integration falls back to adaptive quadrature
    pub fn needs_quadrature(&self) -> bool {
        matches!(self, LoadFunction::Expression(_) | LoadFunction::Numeric(_))
    }

    /// True when the variant can be stored in a study file
    pub fn is_serializable(&self) -> bool {
        !matches!(self, LoadFunction::Numeric(_))
    }

    /// Evaluate w(x)
    pub fn value_at(&self, x: f64) -> f64 {
        match self {
            LoadFunction::Constant { value } => *value,
            LoadFunction::Polynomial { coefficients } => {
                // Horner
                coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
            }
            LoadFunction::Sinusoidal {
                amplitude,
                wavenumber,
                phase,
            } => amplitude * (wavenumber * x + phase).sin(),
            LoadFunction::Exponential { amplitude, rate } => amplitude * (rate * x).exp(),
            LoadFunction::Expression(expr) => expr.eval(x),
            LoadFunction::Numeric(func) => func.call(x),
        }
    }

    /// Antiderivative F with F' = w, for variants that have one in closed form.
    pub fn antiderivative(&self, x: f64) -> Option<f64> {
        match self {
            LoadFunction::Constant { value } => Some(value * x),
            LoadFunction::Polynomial { coefficients } => Some(
                coefficients
                    .iter()
                    .enumerate()
                    .map(|(i, c)| c * x.powi(i as i32 + 1) / (i as f64 + 1.0))
                    .sum(),
            ),
            LoadFunction::Sinusoidal {
                amplitude,
                wavenumber,
                phase,
            } => {
                // a·(cos p − cos(kx + p))/k, written without the cancellation
                let (a, k, p) = (*amplitude, *wavenumber, *phase);
                if k == 0.0 {
                    Some(a * p.sin() * x)
                } else {
                    let half = 0.5 * k * x;
                    Some(2.0 * a * (p + half).sin() * half.sin() / k)
                }
            }
            LoadFunction::Exponential { amplitude, rate } => {
                let (a, r) = (*amplitude, *rate);
                if r == 0.0 {
                    Some(a * x)
                } else {
                    Some(a * (r * x).exp_m1() / r)
                }
            }
            LoadFunction::Expression(_) | LoadFunction::Numeric(_) => None,
        }
    }

    /// Antiderivative G with G' = x·w, for variants that have one in closed form.
    pub fn first_moment_antiderivative(&self, x: f64) -> Option<f64> {
        match self {
            LoadFunction::Constant { value } => Some(value * x * x / 2.0),
            LoadFunction::Polynomial { coefficients } => Some(
                coefficients
                    .iter()
                    .enumerate()
                    .map(|(i, c)| c * x.powi(i as i32 + 2) / (i as f64 + 2.0))
                    .sum(),
            ),
            LoadFunction::Sinusoidal {
                amplitude,
                wavenumber,
                phase,
            } => {
                let (a, k, p) = (*amplitude, *wavenumber, *phase);
                if (k * x).abs() < SERIES_THRESHOLD {
                    // n-th derivative of sin at p cycles sin, cos, −sin, −cos
                    Some(a * moment_series(x, k, |n| match n % 4 {
                        0 => p.sin(),
                        1 => p.cos(),
                        2 => -p.sin(),
                        _ => -p.cos(),
                    }))
                } else {
                    let theta = k * x + p;
                    Some(a * (-x * theta.cos() / k + (theta.sin() - p.sin()) / (k * k)))
                }
            }
            LoadFunction::Exponential { amplitude, rate } => {
                let (a, r) = (*amplitude, *rate);
                if (r * x).abs() < SERIES_THRESHOLD {
                    Some(a * moment_series(x, r, |_| 1.0))
                } else {
                    Some(a * ((r * x).exp() * (x / r - 1.0 / (r * r)) + 1.0 / (r * r)))
                }
            }
            LoadFunction::Expression(_) | LoadFunction::Numeric(_) => None,
        }
    }

    /// Human-readable formula, e.g. `w(x) = 2 + 0.5x^2`
    pub fn describe(&self) -> String {
        match self {
            LoadFunction::Constant { value } => format!("w(x) = {}", value),
            LoadFunction::Polynomial { coefficients } => {
                let terms: Vec<String> = coefficients
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| **c != 0.0)
                    .map(|(i, c)| match i {
                        0 => format!("{}", c),
                        1 => format!("{}x", c),
                        _ => format!("{}x^{}", c, i),
                    })
                    .collect();
                if terms.is_empty() {
                    "w(x) = 0".to_string()
                } else {
                    format!("w(x) = {}", terms.join(" + "))
                }
            }
            LoadFunction::Sinusoidal {
                amplitude,
                wavenumber,
                phase,
            } => format!("w(x) = {}·sin({}x + {})", amplitude, wavenumber, phase),
            LoadFunction::Exponential { amplitude, rate } => {
                format!("w(x) = {}·exp({}x)", amplitude, rate)
            }
            LoadFunction::Expression(expr) => format!("w(x) = {}", expr),
            LoadFunction::Numeric(func) => format!("w(x) = {}", func.label()),
        }
    }
}

/// ∫₀ˣ s·g(k·s) ds as Σ dₙ kⁿ x^(n+2) / (n! (n+2)), where dₙ = g⁽ⁿ⁾(0).
///
/// Only called with |k·x| below [`SERIES_THRESHOLD`], where ten terms reach
/// full precision.
fn moment_series(x: f64, k: f64, derivative: impl Fn(usize) -> f64) -> f64 {
    let kx = k * x;
    let mut power = x * x; // kⁿ x^(n+2) / n!
    let mut total = 0.0;
    for n in 0..10 {
        total += derivative(n) * power / (n as f64 + 2.0);
        power *= kx / (n as f64 + 1.0);
    }
    total
}

impl fmt::Display for LoadFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}
