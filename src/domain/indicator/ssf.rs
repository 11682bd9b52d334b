//! Ehlers' Super Smoother Filter (SSF).
//!
//! 2 poles: x = pi*sqrt(2)/n, a0 = e^-x, a1 = -a0^2, b1 = 2*a0*cos(x),
//!          c1 = 1 - a1 - b1
//!          SSF[i] = c1*C[i] + b1*SSF[i-1] + a1*SSF[i-2]
//! 3 poles: x = pi/n, a0 = e^-x, b0 = 2*a0*cos(sqrt(3)*x), c0 = a0^2,
//!          c4 = c0^2, c3 = -c0*(1 + b0), c2 = c0 + b0, c1 = 1 - c2 - c3 - c4
//!          SSF[i] = c1*C[i] + c2*SSF[i-1] + c3*SSF[i-2] + c4*SSF[i-3]
//! The first `poles` values equal the input.

use crate::domain::error::TaframeError;
use crate::domain::filter::RecurrenceFilter;
use crate::domain::indicator::{Category, IndicatorOutput};
use crate::domain::params::Params;
use crate::domain::registry::ResolvedInputs;
use crate::domain::series::Series;
use std::f64::consts::PI;

pub const DEFAULT_LENGTH: usize = 10;
pub const DEFAULT_POLES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuperSmoother {
    length: usize,
    poles: usize,
}

impl SuperSmoother {
    /// Out-of-range arguments fall back to the defaults: `length` 0 → 10,
    /// `poles` other than 2 or 3 → 2.
    pub fn new(length: usize, poles: usize) -> Self {
        Self {
            length: if length > 0 { length } else { DEFAULT_LENGTH },
            poles: if poles == 3 { 3 } else { DEFAULT_POLES },
        }
    }

    pub fn from_params(params: &Params) -> Self {
        let poles = params.int("poles").unwrap_or(DEFAULT_POLES as i64);
        Self::new(
            params.length("length", DEFAULT_LENGTH),
            if poles == 3 { 3 } else { DEFAULT_POLES },
        )
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn poles(&self) -> usize {
        self.poles
    }

    pub fn name(&self) -> String {
        format!("SSF_{}_{}", self.length, self.poles)
    }

    pub fn filter(&self) -> Result<RecurrenceFilter, TaframeError> {
        let n = self.length as f64;
        if self.poles == 3 {
            let x = PI / n;
            let a0 = (-x).exp();
            let b0 = 2.0 * a0 * (3f64.sqrt() * x).cos();
            let c0 = a0 * a0;

            let c4 = c0 * c0;
            let c3 = -c0 * (1.0 + b0);
            let c2 = c0 + b0;
            let c1 = 1.0 - c2 - c3 - c4;
            RecurrenceFilter::new(c1, &[c2, c3, c4])
        } else {
            let x = PI * 2f64.sqrt() / n;
            let a0 = (-x).exp();
            let a1 = -a0 * a0;
            let b1 = 2.0 * a0 * x.cos();
            let c1 = 1.0 - a1 - b1;
            RecurrenceFilter::new(c1, &[b1, a1])
        }
    }

    pub fn apply(&self, close: &Series) -> Result<Series, TaframeError> {
        let values = self.filter()?.apply(&close.values);
        Ok(close
            .derive(self.name(), values)
            .with_category(Category::Overlap))
    }
}

pub fn ssf(
    close: &Series,
    length: usize,
    poles: usize,
    offset: i64,
) -> Result<Series, TaframeError> {
    Ok(SuperSmoother::new(length, poles).apply(close)?.shift(offset))
}

pub(crate) fn compute(
    inputs: &ResolvedInputs,
    params: &Params,
) -> Result<IndicatorOutput, TaframeError> {
    let close = inputs.get("close")?;
    let smoother = SuperSmoother::from_params(params);
    Ok(smoother.apply(close)?.shift(params.offset()).into())
}
