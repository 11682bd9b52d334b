//! Volume Profile (VP).
//!
//! Splits the close/volume rows into `width` partitions, either contiguous in
//! time or by close-price range (`sort_close`), and reports per partition the
//! close low/mean/high with up/down/total volume.

use crate::domain::error::TaframeError;
use crate::domain::frame::Frame;
use crate::domain::indicator::{Category, IndicatorOutput};
use crate::domain::params::Params;
use crate::domain::partition::{PartitionBin, chronological_bins, value_bins};
use crate::domain::registry::ResolvedInputs;
use crate::domain::series::Series;

pub const DEFAULT_WIDTH: usize = 10;

pub const COLUMNS: [&str; 6] = [
    "low_close",
    "mean_close",
    "high_close",
    "pos_volume",
    "neg_volume",
    "total_volume",
];

pub fn volume_profile(
    close: &Series,
    volume: &Series,
    width: usize,
    sort_by_value: bool,
) -> Result<Frame, TaframeError> {
    TaframeError::check_lengths("VP close/volume", close.len(), volume.len())?;
    let width = if width > 0 { width } else { DEFAULT_WIDTH };

    let bins = if sort_by_value {
        value_bins(&close.values, &volume.values, width)
    } else {
        chronological_bins(&close.values, &volume.values, width)
    };

    let mut frame = Frame::new(format!("VP_{width}"), Category::Volume);
    let extract: [fn(&PartitionBin) -> f64; 6] = [
        |b| b.low,
        |b| b.mean,
        |b| b.high,
        |b| b.positive_volume,
        |b| b.negative_volume,
        PartitionBin::total_volume,
    ];
    for (name, field) in COLUMNS.iter().zip(extract) {
        frame.push_column(*name, bins.iter().map(field).collect())?;
    }
    Ok(frame)
}

pub(crate) fn compute(
    inputs: &ResolvedInputs,
    params: &Params,
) -> Result<IndicatorOutput, TaframeError> {
    let frame = volume_profile(
        inputs.get("close")?,
        inputs.get("volume")?,
        params.length("width", DEFAULT_WIDTH),
        params.flag("sort_close", false),
    )?;
    Ok(frame.into())
}
