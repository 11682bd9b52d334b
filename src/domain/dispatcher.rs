//! Generic invocation surface: run any registered indicator against a table.
//!
//! `invoke` looks the name up in the [`Registry`], resolves each declared
//! input role to a column (or an explicit series), runs the computation and
//! decorates the result with the per-call options (`fillna`, alias, timing,
//! append).

use crate::domain::error::TaframeError;
use crate::domain::indicator::IndicatorOutput;
use crate::domain::params::{ParamValue, Params};
use crate::domain::registry::{IndicatorDef, Registry, ResolvedInputs};
use crate::domain::resolver::{SeriesInput, resolve};
use crate::domain::table::Table;
use crate::domain::time_utils::format_elapsed;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Invocation {
    pub name: String,
    pub alias: Option<String>,
    pub timed: bool,
    pub append: bool,
    /// Explicit inputs keyed by lowercase role.
    pub inputs: HashMap<String, SeriesInput>,
    pub params: Params,
}

impl Invocation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn timed(mut self, timed: bool) -> Self {
        self.timed = timed;
        self
    }

    pub fn append(mut self, append: bool) -> Self {
        self.append = append;
        self
    }

    pub fn input(mut self, role: &str, input: impl Into<SeriesInput>) -> Self {
        self.inputs.insert(role.to_lowercase(), input.into());
        self
    }

    pub fn param(mut self, key: &str, value: ParamValue) -> Self {
        self.params.set(key, value);
        self
    }

    pub fn params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Registry,
    column_defaults: HashMap<String, String>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(Registry::with_defaults())
    }
}

impl Dispatcher {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            column_defaults: HashMap::new(),
        }
    }

    /// Default column for an input role when the invocation names none.
    /// Without an override the role name itself is the default.
    pub fn with_column_default(mut self, role: &str, column: impl Into<String>) -> Self {
        self.column_defaults
            .insert(role.to_lowercase(), column.into());
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn invoke(
        &self,
        table: &mut Table,
        invocation: &Invocation,
    ) -> Result<IndicatorOutput, TaframeError> {
        let def = self.registry.get(&invocation.name).ok_or_else(|| {
            warn!(indicator = %invocation.name, "unknown indicator");
            TaframeError::UnknownIndicator {
                name: invocation.name.clone(),
            }
        })?;

        let inputs = self
            .resolve_inputs(def, invocation, table)
            .map_err(|e| dispatch_error(def, e))?;

        let started = Instant::now();
        let mut output =
            (def.compute)(&inputs, &invocation.params).map_err(|e| dispatch_error(def, e))?;
        let elapsed = started.elapsed();
        debug!(
            indicator = def.name,
            elapsed = %format_elapsed(elapsed),
            "indicator computed"
        );

        if let Some(value) = invocation.params.float("fillna") {
            output.fill_nan(value);
        }
        if let Some(alias) = &invocation.alias {
            output.set_alias(alias.clone());
        }
        if invocation.timed {
            output.set_elapsed(elapsed);
        }
        if invocation.append {
            table
                .attach(&output)
                .map_err(|e| dispatch_error(def, e))?;
        }
        Ok(output)
    }

    fn resolve_inputs(
        &self,
        def: &IndicatorDef,
        invocation: &Invocation,
        table: &Table,
    ) -> Result<ResolvedInputs, TaframeError> {
        let mut resolved = ResolvedInputs::new();
        for &role in def.inputs {
            let default = self
                .column_defaults
                .get(role)
                .map_or(role, String::as_str);
            let series = resolve(invocation.inputs.get(role), Some(default), table)?;
            resolved.push(role, series);
        }
        Ok(resolved)
    }
}

fn dispatch_error(def: &IndicatorDef, source: TaframeError) -> TaframeError {
    warn!(indicator = def.name, error = %source, "indicator dispatch failed");
    TaframeError::Dispatch {
        indicator: def.name.to_string(),
        source: Box::new(source),
    }
}
