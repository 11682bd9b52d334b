//! Indicator registry: name → definition lookup for the dispatcher.

use crate::domain::error::TaframeError;
use crate::domain::indicator::{Category, IndicatorOutput, ema, price, returns, sma, ssf, vp, vwap};
use crate::domain::params::Params;
use crate::domain::series::Series;
use std::collections::BTreeMap;

pub const LISTING_HEADER: &str = "taframe - Technical Analysis Indicators";

/// Registry adapter signature shared by every indicator.
pub type ComputeFn = fn(&ResolvedInputs, &Params) -> Result<IndicatorOutput, TaframeError>;

/// Inputs after column resolution, keyed by input role (`close`, `high`, ...).
#[derive(Debug, Default)]
pub struct ResolvedInputs {
    series: Vec<(&'static str, Series)>,
}

impl ResolvedInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, role: &'static str, series: Series) {
        self.series.push((role, series));
    }

    pub fn with(mut self, role: &'static str, series: Series) -> Self {
        self.push(role, series);
        self
    }

    pub fn get(&self, role: &str) -> Result<&Series, TaframeError> {
        self.series
            .iter()
            .find(|(r, _)| *r == role)
            .map(|(_, s)| s)
            .ok_or_else(|| TaframeError::Configuration {
                parameter: role.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct IndicatorDef {
    pub name: &'static str,
    pub category: Category,
    /// Input roles; each doubles as the default column name.
    pub inputs: &'static [&'static str],
    pub compute: ComputeFn,
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    defs: BTreeMap<String, IndicatorDef>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `def`, replacing any definition with the same name.
    pub fn register(&mut self, def: IndicatorDef) {
        self.defs.insert(def.name.to_lowercase(), def);
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        let defs = [
            IndicatorDef {
                name: "hl2",
                category: Category::Overlap,
                inputs: &["high", "low"],
                compute: price::compute_hl2,
            },
            IndicatorDef {
                name: "hlc3",
                category: Category::Overlap,
                inputs: &["high", "low", "close"],
                compute: price::compute_hlc3,
            },
            IndicatorDef {
                name: "ohlc4",
                category: Category::Overlap,
                inputs: &["open", "high", "low", "close"],
                compute: price::compute_ohlc4,
            },
            IndicatorDef {
                name: "sma",
                category: Category::Overlap,
                inputs: &["close"],
                compute: sma::compute,
            },
            IndicatorDef {
                name: "ema",
                category: Category::Overlap,
                inputs: &["close"],
                compute: ema::compute,
            },
            IndicatorDef {
                name: "ssf",
                category: Category::Overlap,
                inputs: &["close"],
                compute: ssf::compute,
            },
            IndicatorDef {
                name: "vwap",
                category: Category::Overlap,
                inputs: &["high", "low", "close", "volume"],
                compute: vwap::compute,
            },
            IndicatorDef {
                name: "log_return",
                category: Category::Performance,
                inputs: &["close"],
                compute: returns::compute_log,
            },
            IndicatorDef {
                name: "percent_return",
                category: Category::Performance,
                inputs: &["close"],
                compute: returns::compute_percent,
            },
            IndicatorDef {
                name: "vp",
                category: Category::Volume,
                inputs: &["close", "volume"],
                compute: vp::compute,
            },
        ];
        for def in defs {
            registry.register(def);
        }
        registry
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&IndicatorDef> {
        self.defs.get(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Sorted indicator names, minus any in `exclude` (case-insensitive).
    pub fn names<S: AsRef<str>>(&self, exclude: &[S]) -> Vec<&'static str> {
        self.select(exclude, None)
    }

    /// Like [`Registry::names`], restricted to one category when given.
    pub fn select<S: AsRef<str>>(
        &self,
        exclude: &[S],
        category: Option<Category>,
    ) -> Vec<&'static str> {
        let excluded: Vec<String> = exclude.iter().map(|e| e.as_ref().to_lowercase()).collect();
        self.defs
            .iter()
            .filter(|(key, _)| !excluded.contains(key))
            .filter(|(_, def)| category.is_none_or(|c| def.category == c))
            .map(|(_, def)| def.name)
            .collect()
    }

    pub fn summary<S: AsRef<str>>(&self, exclude: &[S]) -> String {
        listing(&self.names(exclude))
    }
}

/// Listing text: header, count and the comma-joined abbreviations.
pub fn listing(names: &[&str]) -> String {
    let mut s = format!("{LISTING_HEADER}\nTotal Indicators: {}\n", names.len());
    if !names.is_empty() {
        s.push_str("Abbreviations:\n    ");
        s.push_str(&names.join(", "));
        s.push('\n');
    }
    s
}
