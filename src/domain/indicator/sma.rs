//! Simple Moving Average indicator.
//!
//! SMA[i] = mean(C[i-n+1..=i]). The first (n-1) values are NaN.

use crate::domain::error::TaframeError;
use crate::domain::indicator::{Category, IndicatorOutput};
use crate::domain::params::Params;
use crate::domain::registry::ResolvedInputs;
use crate::domain::series::Series;

pub const DEFAULT_LENGTH: usize = 10;

pub fn sma(close: &Series, length: usize) -> Series {
    let length = if length > 0 { length } else { DEFAULT_LENGTH };
    let mut values = vec![f64::NAN; close.len()];
    let mut sum = 0.0;
    for (i, &c) in close.values.iter().enumerate() {
        sum += c;
        if i >= length {
            sum -= close.values[i - length];
        }
        if i + 1 >= length {
            values[i] = sum / length as f64;
        }
    }
    close
        .derive(format!("SMA_{length}"), values)
        .with_category(Category::Overlap)
}

pub(crate) fn compute(
    inputs: &ResolvedInputs,
    params: &Params,
) -> Result<IndicatorOutput, TaframeError> {
    let out = sma(inputs.get("close")?, params.length("length", DEFAULT_LENGTH));
    Ok(out.shift(params.offset()).into())
}
