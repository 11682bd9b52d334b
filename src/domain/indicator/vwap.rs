//! Volume Weighted Average Price (VWAP), anchored to the calendar day.
//!
//! tp = (H + L + C) / 3
//! VWAP[i] = sum(tp * V) / sum(V) over rows of the same day up to i.
//! Zero accumulated volume yields NaN (or infinity) rather than an error.
//! Volume must share the price index, since day groups come from it.

use crate::domain::aggregate::{day_keys, grouped_cumulative_ratio};
use crate::domain::error::TaframeError;
use crate::domain::indicator::price::hlc3;
use crate::domain::indicator::{Category, IndicatorOutput};
use crate::domain::params::Params;
use crate::domain::registry::ResolvedInputs;
use crate::domain::series::Series;
use crate::domain::time_utils::is_datetime_ordered;
use tracing::warn;

pub fn vwap(
    high: &Series,
    low: &Series,
    close: &Series,
    volume: &Series,
) -> Result<Series, TaframeError> {
    let typical = hlc3(high, low, close)?;
    TaframeError::check_lengths("VWAP price/volume", typical.len(), volume.len())?;
    TaframeError::check_lengths("VWAP price/index", typical.len(), typical.index.len())?;
    if volume.index != typical.index {
        return Err(TaframeError::validation(format!(
            "VWAP volume '{}' is not aligned with the price index",
            volume.name
        )));
    }

    if !is_datetime_ordered(&typical.index) {
        warn!("VWAP price series is not datetime ordered; results may not be as expected");
    }

    let weighted: Vec<f64> = typical
        .values
        .iter()
        .zip(&volume.values)
        .map(|(tp, v)| tp * v)
        .collect();
    let keys = day_keys(&typical.index);
    let values = grouped_cumulative_ratio(&keys, &weighted, &volume.values)?;

    Ok(typical
        .derive("VWAP", values)
        .with_category(Category::Overlap))
}

pub(crate) fn compute(
    inputs: &ResolvedInputs,
    params: &Params,
) -> Result<IndicatorOutput, TaframeError> {
    let out = vwap(
        inputs.get("high")?,
        inputs.get("low")?,
        inputs.get("close")?,
        inputs.get("volume")?,
    )?;
    Ok(out.shift(params.offset()).into())
}
