//! Ordinary least squares of `y` on `x`.
//!
//! Two interchangeable backends produce the same coefficients:
//! - `ClosedForm`: the textbook summation formulas
//! - `Matrix` (feature `ndarray`): normal equations (XᵀX)β = Xᵀy
//!
//! Both work on mean-centred data, so large offsets in `x` (epoch
//! timestamps, say) do not cancel away the spread.
//!
//! t = r / sqrt((1 - r²) / (n - 2)); NaN when n <= 2, ±inf for a perfect fit.

use crate::domain::error::TaframeError;
use crate::domain::indicator::Category;
use crate::domain::series::Series;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegressionBackend {
    ClosedForm,
    #[cfg(feature = "ndarray")]
    Matrix,
}

impl RegressionBackend {
    /// The matrix backend when compiled in, otherwise closed form.
    pub fn detect() -> Self {
        #[cfg(feature = "ndarray")]
        {
            RegressionBackend::Matrix
        }
        #[cfg(not(feature = "ndarray"))]
        {
            RegressionBackend::ClosedForm
        }
    }

    pub fn fit(self, x: &Series, y: &Series) -> Result<RegressionResult, TaframeError> {
        TaframeError::check_lengths("regression x/y", x.len(), y.len())?;
        let fit = match self {
            RegressionBackend::ClosedForm => closed_form(&x.values, &y.values),
            #[cfg(feature = "ndarray")]
            RegressionBackend::Matrix => matrix(&x.values, &y.values),
        };

        let n = x.len();
        let correlation = settle_correlation(fit.correlation);
        let t_statistic = t_statistic(correlation, n);
        let line = x
            .values
            .iter()
            .map(|xi| fit.intercept + fit.slope * xi)
            .collect();

        Ok(RegressionResult {
            intercept: fit.intercept,
            slope: fit.slope,
            correlation,
            t_statistic,
            line: x
                .derive("LR_LINE", line)
                .with_category(Category::Statistics),
            backend: self,
        })
    }
}

impl fmt::Display for RegressionBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegressionBackend::ClosedForm => f.write_str("closed-form"),
            #[cfg(feature = "ndarray")]
            RegressionBackend::Matrix => f.write_str("matrix"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegressionResult {
    pub intercept: f64,
    pub slope: f64,
    pub correlation: f64,
    pub t_statistic: f64,
    pub line: Series,
    pub backend: RegressionBackend,
}

struct Coefficients {
    intercept: f64,
    slope: f64,
    correlation: f64,
}

pub fn linear_regression(x: &Series, y: &Series) -> Result<RegressionResult, TaframeError> {
    RegressionBackend::detect().fit(x, y)
}

/// Correlations this close to ±1 are treated as a perfect fit.
const PERFECT_FIT_TOLERANCE: f64 = 1e-12;

/// Clamp `r` into [-1, 1], snapping rounding noise around ±1 to exactly ±1.
fn settle_correlation(r: f64) -> f64 {
    let r = r.clamp(-1.0, 1.0);
    if 1.0 - r * r <= PERFECT_FIT_TOLERANCE {
        r.signum()
    } else {
        r
    }
}

fn t_statistic(r: f64, n: usize) -> f64 {
    if n <= 2 {
        return f64::NAN;
    }
    if r.abs() == 1.0 {
        return r * f64::INFINITY;
    }
    r / ((1.0 - r * r) / (n - 2) as f64).sqrt()
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn closed_form(x: &[f64], y: &[f64]) -> Coefficients {
    let (x_mean, y_mean) = (mean(x), mean(y));
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (&xi, &yi) in x.iter().zip(y) {
        let (dx, dy) = (xi - x_mean, yi - y_mean);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    let slope = sxy / sxx;
    Coefficients {
        intercept: y_mean - slope * x_mean,
        slope,
        correlation: sxy / (sxx * syy).sqrt(),
    }
}

#[cfg(feature = "ndarray")]
fn matrix(x: &[f64], y: &[f64]) -> Coefficients {
    use ndarray::{Array1, Array2, array};

    let (x_mean, y_mean) = (mean(x), mean(y));
    let design = Array2::from_shape_fn((x.len(), 2), |(i, j)| {
        if j == 0 { 1.0 } else { x[i] - x_mean }
    });
    let target = Array1::from_iter(y.iter().map(|v| v - y_mean));
    let xtx = design.t().dot(&design);
    let xty = design.t().dot(&target);

    let det = xtx[[0, 0]] * xtx[[1, 1]] - xtx[[0, 1]] * xtx[[1, 0]];
    let offset = (xtx[[1, 1]] * xty[0] - xtx[[0, 1]] * xty[1]) / det;
    let slope = (xtx[[0, 0]] * xty[1] - xtx[[1, 0]] * xty[0]) / det;

    let residual = &target - &design.dot(&array![offset, slope]);
    let ss_res = residual.dot(&residual);
    let ss_tot = target.dot(&target);
    let r_squared = (1.0 - ss_res / ss_tot).clamp(0.0, 1.0);

    Coefficients {
        intercept: y_mean + offset - slope * x_mean,
        slope,
        correlation: slope.signum() * r_squared.sqrt(),
    }
}
