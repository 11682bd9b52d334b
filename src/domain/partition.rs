//! Range partitioning of price/volume rows into bins.
//!
//! Two modes:
//! - chronological: `width` contiguous chunks whose sizes differ by at most
//!   one row, larger chunks first
//! - by value: `width` equal-width close-price ranges over [min, max],
//!   right-closed with the lowest edge included
//!
//! Row volume is signed by the close-to-close direction. The first row and
//! flat rows count as up moves.

use std::ops::Range;

/// Relative distance (in units of the value range) within which a close
/// counts as lying on a bin edge.
const EDGE_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq)]
pub struct PartitionBin {
    pub rows: usize,
    pub low: f64,
    pub mean: f64,
    pub high: f64,
    pub positive_volume: f64,
    pub negative_volume: f64,
}

impl PartitionBin {
    pub fn total_volume(&self) -> f64 {
        self.positive_volume + self.negative_volume
    }
}

#[derive(Debug, Default)]
struct BinAccumulator {
    rows: usize,
    priced: usize,
    sum: f64,
    low: Option<f64>,
    high: Option<f64>,
    positive: f64,
    negative: f64,
}

impl BinAccumulator {
    fn push(&mut self, close: f64, volume: f64, up: bool) {
        self.rows += 1;
        if !close.is_nan() {
            self.priced += 1;
            self.sum += close;
            self.low = Some(self.low.map_or(close, |l| l.min(close)));
            self.high = Some(self.high.map_or(close, |h| h.max(close)));
        }
        if up {
            self.positive += volume;
        } else {
            self.negative += volume;
        }
    }

    fn finish(self) -> PartitionBin {
        PartitionBin {
            rows: self.rows,
            low: self.low.unwrap_or(f64::NAN),
            mean: if self.priced > 0 {
                self.sum / self.priced as f64
            } else {
                f64::NAN
            },
            high: self.high.unwrap_or(f64::NAN),
            positive_volume: self.positive,
            negative_volume: self.negative,
        }
    }
}

/// `true` where the close did not fall from the previous row.
pub fn up_moves(close: &[f64]) -> Vec<bool> {
    let mut moves = Vec::with_capacity(close.len());
    for i in 0..close.len() {
        let up = i == 0 || !(close[i] - close[i - 1] < 0.0);
        moves.push(up);
    }
    moves
}

/// Row ranges for splitting `n` rows into `width` contiguous chunks.
pub fn chunk_bounds(n: usize, width: usize) -> Vec<Range<usize>> {
    if width == 0 {
        return Vec::new();
    }
    let base = n / width;
    let extra = n % width;
    let mut start = 0;
    (0..width)
        .map(|i| {
            let size = base + usize::from(i < extra);
            let range = start..start + size;
            start += size;
            range
        })
        .collect()
}

/// Bucket of `value` among `width` equal ranges over [min, max].
///
/// Interior edges sit at `min + (max - min) * i / width`. A value within
/// rounding distance of an edge belongs to the range below it.
pub fn value_bucket(value: f64, min: f64, max: f64, width: usize) -> usize {
    let span = max - min;
    if width <= 1 || span <= 0.0 || !span.is_finite() {
        return 0;
    }
    let tolerance = span * EDGE_TOLERANCE;
    let edge = |i: usize| min + span * i as f64 / width as f64;
    (1..width).take_while(|&i| edge(i) + tolerance < value).count()
}

pub fn chronological_bins(close: &[f64], volume: &[f64], width: usize) -> Vec<PartitionBin> {
    let up = up_moves(close);
    chunk_bounds(close.len(), width)
        .into_iter()
        .map(|range| {
            let mut acc = BinAccumulator::default();
            for i in range {
                acc.push(close[i], volume[i], up[i]);
            }
            acc.finish()
        })
        .collect()
}

pub fn value_bins(close: &[f64], volume: &[f64], width: usize) -> Vec<PartitionBin> {
    if width == 0 {
        return Vec::new();
    }
    let up = up_moves(close);
    let priced = close.iter().copied().filter(|c| !c.is_nan());
    let (min, max) = priced.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), c| {
        (lo.min(c), hi.max(c))
    });

    let mut accs: Vec<BinAccumulator> = (0..width).map(|_| BinAccumulator::default()).collect();
    for (i, &c) in close.iter().enumerate() {
        if c.is_nan() {
            continue;
        }
        accs[value_bucket(c, min, max, width)].push(c, volume[i], up[i]);
    }
    accs.into_iter().map(BinAccumulator::finish).collect()
}
