//! Indicator implementations and their result types.
//!
//! - `Category`: the fixed set of category tags carried by every result
//! - `IndicatorOutput`: a single [`Series`] or a multi-column [`Frame`]
//! - one submodule per indicator; each exposes a pure computation function
//!   plus the registry adapter used by the dispatcher

pub mod ema;
pub mod price;
pub mod returns;
pub mod sma;
pub mod ssf;
pub mod vp;
pub mod vwap;

use crate::domain::error::TaframeError;
use crate::domain::frame::Frame;
use crate::domain::series::Series;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Overlap,
    Performance,
    Statistics,
    Trend,
    Volatility,
    Volume,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Category::Overlap => "overlap",
            Category::Performance => "performance",
            Category::Statistics => "statistics",
            Category::Trend => "trend",
            Category::Volatility => "volatility",
            Category::Volume => "volume",
        };
        f.write_str(tag)
    }
}

impl FromStr for Category {
    type Err = TaframeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "overlap" => Ok(Category::Overlap),
            "performance" => Ok(Category::Performance),
            "statistics" => Ok(Category::Statistics),
            "trend" => Ok(Category::Trend),
            "volatility" => Ok(Category::Volatility),
            "volume" => Ok(Category::Volume),
            other => Err(TaframeError::validation(format!(
                "unknown indicator category '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorOutput {
    Series(Series),
    Frame(Frame),
}

impl IndicatorOutput {
    pub fn name(&self) -> &str {
        match self {
            IndicatorOutput::Series(s) => &s.name,
            IndicatorOutput::Frame(f) => &f.name,
        }
    }

    pub fn category(&self) -> Option<Category> {
        match self {
            IndicatorOutput::Series(s) => s.category,
            IndicatorOutput::Frame(f) => f.category,
        }
    }

    pub fn alias(&self) -> Option<&str> {
        match self {
            IndicatorOutput::Series(s) => s.alias.as_deref(),
            IndicatorOutput::Frame(f) => f.alias.as_deref(),
        }
    }

    pub fn elapsed(&self) -> Option<Duration> {
        match self {
            IndicatorOutput::Series(s) => s.elapsed,
            IndicatorOutput::Frame(f) => f.elapsed,
        }
    }

    pub fn set_alias(&mut self, alias: impl Into<String>) {
        let alias = Some(alias.into());
        match self {
            IndicatorOutput::Series(s) => s.alias = alias,
            IndicatorOutput::Frame(f) => f.alias = alias,
        }
    }

    pub fn set_elapsed(&mut self, elapsed: Duration) {
        match self {
            IndicatorOutput::Series(s) => s.elapsed = Some(elapsed),
            IndicatorOutput::Frame(f) => f.elapsed = Some(elapsed),
        }
    }

    pub fn fill_nan(&mut self, value: f64) {
        match self {
            IndicatorOutput::Series(s) => s.fill_nan(value),
            IndicatorOutput::Frame(f) => f.fill_nan(value),
        }
    }

    pub fn as_series(&self) -> Option<&Series> {
        match self {
            IndicatorOutput::Series(s) => Some(s),
            IndicatorOutput::Frame(_) => None,
        }
    }

    pub fn as_frame(&self) -> Option<&Frame> {
        match self {
            IndicatorOutput::Frame(f) => Some(f),
            IndicatorOutput::Series(_) => None,
        }
    }
}

impl From<Series> for IndicatorOutput {
    fn from(series: Series) -> Self {
        IndicatorOutput::Series(series)
    }
}

impl From<Frame> for IndicatorOutput {
    fn from(frame: Frame) -> Self {
        IndicatorOutput::Frame(frame)
    }
}

/// Synthetic daily series for indicator unit tests.
#[cfg(test)]
pub fn make_series(name: &str, values: &[f64]) -> Series {
    let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let index = (0..values.len())
        .map(|i| start + chrono::Duration::days(i as i64))
        .collect();
    Series::new(name, index, values.to_vec())
}
