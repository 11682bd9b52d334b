//! Price averages: HL2, HLC3 (typical price), OHLC4.

use crate::domain::error::TaframeError;
use crate::domain::indicator::{Category, IndicatorOutput};
use crate::domain::params::Params;
use crate::domain::registry::ResolvedInputs;
use crate::domain::series::Series;

fn mean_of(name: &str, parts: &[&Series]) -> Result<Series, TaframeError> {
    let first = parts[0];
    for part in &parts[1..] {
        TaframeError::check_lengths(name, first.len(), part.len())?;
    }
    let k = parts.len() as f64;
    let values = (0..first.len())
        .map(|i| parts.iter().map(|p| p.values[i]).sum::<f64>() / k)
        .collect();
    Ok(first.derive(name, values).with_category(Category::Overlap))
}

pub fn hl2(high: &Series, low: &Series) -> Result<Series, TaframeError> {
    mean_of("HL2", &[high, low])
}

/// Typical price: (high + low + close) / 3.
pub fn hlc3(high: &Series, low: &Series, close: &Series) -> Result<Series, TaframeError> {
    mean_of("HLC3", &[high, low, close])
}

pub fn ohlc4(
    open: &Series,
    high: &Series,
    low: &Series,
    close: &Series,
) -> Result<Series, TaframeError> {
    mean_of("OHLC4", &[open, high, low, close])
}

pub(crate) fn compute_hl2(
    inputs: &ResolvedInputs,
    params: &Params,
) -> Result<IndicatorOutput, TaframeError> {
    let out = hl2(inputs.get("high")?, inputs.get("low")?)?;
    Ok(out.shift(params.offset()).into())
}

pub(crate) fn compute_hlc3(
    inputs: &ResolvedInputs,
    params: &Params,
) -> Result<IndicatorOutput, TaframeError> {
    let out = hlc3(inputs.get("high")?, inputs.get("low")?, inputs.get("close")?)?;
    Ok(out.shift(params.offset()).into())
}

pub(crate) fn compute_ohlc4(
    inputs: &ResolvedInputs,
    params: &Params,
) -> Result<IndicatorOutput, TaframeError> {
    let out = ohlc4(
        inputs.get("open")?,
        inputs.get("high")?,
        inputs.get("low")?,
        inputs.get("close")?,
    )?;
    Ok(out.shift(params.offset()).into())
}
