//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seed with first SMA, then EMA[i] = C[i]*k + EMA[i-1]*(1-k).
//! Warmup: first (n-1) values are NaN.

use crate::domain::error::TaframeError;
use crate::domain::indicator::{Category, IndicatorOutput};
use crate::domain::params::Params;
use crate::domain::registry::ResolvedInputs;
use crate::domain::series::Series;

pub const DEFAULT_LENGTH: usize = 10;

pub fn ema(close: &Series, length: usize) -> Series {
    let length = if length > 0 { length } else { DEFAULT_LENGTH };
    let k = 2.0 / (length as f64 + 1.0);
    let mut values = Vec::with_capacity(close.len());
    let mut ema = 0.0;
    let mut sum = 0.0;

    for (i, &c) in close.values.iter().enumerate() {
        if i < length - 1 {
            sum += c;
            values.push(f64::NAN);
        } else if i == length - 1 {
            sum += c;
            ema = sum / length as f64;
            values.push(ema);
        } else {
            ema = c * k + ema * (1.0 - k);
            values.push(ema);
        }
    }

    close
        .derive(format!("EMA_{length}"), values)
        .with_category(Category::Overlap)
}

pub(crate) fn compute(
    inputs: &ResolvedInputs,
    params: &Params,
) -> Result<IndicatorOutput, TaframeError> {
    let out = ema(inputs.get("close")?, params.length("length", DEFAULT_LENGTH));
    Ok(out.shift(params.offset()).into())
}
