//! Log and percent returns over `length` rows.
//!
//! LOGRET[i] = ln(C[i] / C[i-n]), PCTRET[i] = C[i] / C[i-n] - 1.
//! The first `n` values are NaN.

use crate::domain::error::TaframeError;
use crate::domain::indicator::{Category, IndicatorOutput};
use crate::domain::params::Params;
use crate::domain::registry::ResolvedInputs;
use crate::domain::series::Series;

pub const DEFAULT_LENGTH: usize = 1;

fn lagged(close: &Series, length: usize, name: &str, f: fn(f64, f64) -> f64) -> Series {
    let length = if length > 0 { length } else { DEFAULT_LENGTH };
    let values = (0..close.len())
        .map(|i| {
            if i < length {
                f64::NAN
            } else {
                f(close.values[i], close.values[i - length])
            }
        })
        .collect();
    close
        .derive(format!("{name}_{length}"), values)
        .with_category(Category::Performance)
}

pub fn log_return(close: &Series, length: usize) -> Series {
    lagged(close, length, "LOGRET", |now, then| (now / then).ln())
}

pub fn percent_return(close: &Series, length: usize) -> Series {
    lagged(close, length, "PCTRET", |now, then| now / then - 1.0)
}

pub(crate) fn compute_log(
    inputs: &ResolvedInputs,
    params: &Params,
) -> Result<IndicatorOutput, TaframeError> {
    let out = log_return(inputs.get("close")?, params.length("length", DEFAULT_LENGTH));
    Ok(out.shift(params.offset()).into())
}

pub(crate) fn compute_percent(
    inputs: &ResolvedInputs,
    params: &Params,
) -> Result<IndicatorOutput, TaframeError> {
    let out = percent_return(inputs.get("close")?, params.length("length", DEFAULT_LENGTH));
    Ok(out.shift(params.offset()).into())
}
