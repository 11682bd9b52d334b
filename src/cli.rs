//! CLI definition and dispatch.
//!
//! Each subcommand has an `execute_*` function that writes its result to the
//! given writer and returns a `TaframeError` on failure; [`run`] maps errors
//! to exit codes.

use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::{CsvAdapter, DEFAULT_INDEX_COLUMN};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{COLUMN_ROLES, validate_config};
use crate::domain::dispatcher::{Dispatcher, Invocation};
use crate::domain::error::TaframeError;
use crate::domain::indicator::{Category, IndicatorOutput};
use crate::domain::params::{ParamValue, Params};
use crate::domain::registry::{Registry, listing};
use crate::domain::regression::{RegressionResult, linear_regression};
use crate::domain::resolver::{SeriesInput, resolve};
use crate::domain::table::Table;
use crate::domain::time_utils::format_elapsed;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(
    name = "taframe",
    version,
    about = "Technical analysis indicators over CSV price tables"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute an indicator over a CSV table
    Run(RunArgs),
    /// List available indicators
    List {
        #[arg(long, value_delimiter = ',')]
        exclude: Vec<String>,
        /// Only indicators of this category (overlap, volume, ...)
        #[arg(long)]
        category: Option<Category>,
        /// One name per line
        #[arg(long)]
        raw: bool,
    },
    /// Linear regression of one column on another
    Regress(RegressArgs),
    /// Add or remove constant-valued columns
    Constants(ConstantsArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// CSV data file (overrides [data] path)
    #[arg(short, long)]
    pub data: Option<PathBuf>,
    /// INI configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    pub indicator: String,
    #[command(flatten)]
    pub source: SourceArgs,
    /// Indicator parameter as key=value
    #[arg(short = 'p', long = "param")]
    pub params: Vec<String>,
    /// Input column override as role=Column
    #[arg(long = "column")]
    pub columns: Vec<String>,
    #[arg(long)]
    pub alias: Option<String>,
    #[arg(long)]
    pub timed: bool,
    /// Append the result to the table and write the whole table
    #[arg(long)]
    pub append: bool,
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RegressArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    #[arg(long)]
    pub x: String,
    #[arg(long)]
    pub y: String,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ConstantsArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    #[arg(long, allow_negative_numbers = true)]
    pub lower: Option<i64>,
    #[arg(long, allow_negative_numbers = true)]
    pub upper: Option<i64>,
    #[arg(long, allow_negative_numbers = true)]
    pub every: Option<i64>,
    #[arg(long)]
    pub remove: bool,
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Values read from the INI configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub data_path: Option<PathBuf>,
    pub index_column: String,
    /// `(role, column)` remaps from `[columns]`.
    pub column_defaults: Vec<(String, String)>,
    pub output_path: Option<PathBuf>,
    pub timed: bool,
    pub fillna: Option<f64>,
    pub constants_lower: Option<i64>,
    pub constants_upper: Option<i64>,
    pub constants_every: Option<i64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_path: None,
            index_column: DEFAULT_INDEX_COLUMN.to_string(),
            column_defaults: Vec::new(),
            output_path: None,
            timed: false,
            fillna: None,
            constants_lower: None,
            constants_upper: None,
            constants_every: None,
        }
    }
}

pub fn run(cli: Cli) -> ExitCode {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = match &cli.command {
        Command::Run(args) => execute_run(args, &mut out).map(|_| ()),
        Command::List {
            exclude,
            category,
            raw,
        } => execute_list(exclude.as_slice(), *category, *raw, &mut out),
        Command::Regress(args) => execute_regress(args, &mut out).map(|_| ()),
        Command::Constants(args) => execute_constants(args, &mut out).map(|_| ()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            if matches!(cli.command, Command::Run(_)) {
                let none: [&str; 0] = [];
                eprint!("\n{}", Registry::with_defaults().summary(&none));
            }
            (&e).into()
        }
    }
}

pub fn build_settings(config: &dyn ConfigPort) -> Result<Settings, TaframeError> {
    validate_config(config)?;

    let column_defaults = COLUMN_ROLES
        .iter()
        .filter_map(|role| {
            config
                .get_text("columns", role)
                .map(|column| (role.to_string(), column))
        })
        .collect();
    let optional_int = |section: &str, key: &str| {
        config
            .has_key(section, key)
            .then(|| config.get_int(section, key, 0))
    };

    Ok(Settings {
        data_path: config.get_text("data", "path").map(PathBuf::from),
        index_column: config
            .get_text("data", "index_column")
            .unwrap_or_else(|| DEFAULT_INDEX_COLUMN.to_string()),
        column_defaults,
        output_path: config.get_text("output", "path").map(PathBuf::from),
        timed: config.get_bool("output", "timed", false),
        fillna: config
            .get_text("output", "fillna")
            .map(|_| config.get_double("output", "fillna", f64::NAN)),
        constants_lower: optional_int("constants", "lower"),
        constants_upper: optional_int("constants", "upper"),
        constants_every: optional_int("constants", "every"),
    })
}

pub fn load_settings(path: Option<&Path>) -> Result<Settings, TaframeError> {
    match path {
        None => Ok(Settings::default()),
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            let adapter = FileConfigAdapter::from_file(path)?;
            build_settings(&adapter)
        }
    }
}

fn load_table(source: &SourceArgs, settings: &Settings) -> Result<Table, TaframeError> {
    let path = source
        .data
        .clone()
        .or_else(|| settings.data_path.clone())
        .ok_or_else(|| TaframeError::ConfigInvalid {
            section: "data".into(),
            key: "path".into(),
            reason: "no data file given (use --data or [data] path)".into(),
        })?;
    eprintln!("Loading data from {}", path.display());
    let table = CsvAdapter::new(settings.index_column.clone()).load_table(&path)?;
    eprintln!("Loaded {} rows, {} columns", table.len(), table.columns().len());
    Ok(table)
}

pub fn build_invocation(args: &RunArgs, settings: &Settings) -> Result<Invocation, TaframeError> {
    let mut params = Params::parse_pairs(&args.params)?;
    if let (None, Some(value)) = (params.get("fillna"), settings.fillna) {
        params.set("fillna", ParamValue::Float(value));
    }

    let mut invocation = Invocation::new(&args.indicator)
        .params(params)
        .timed(args.timed || settings.timed)
        .append(args.append);
    if let Some(alias) = &args.alias {
        invocation = invocation.alias(alias.clone());
    }
    for pair in &args.columns {
        let (role, column) = pair.split_once('=').ok_or_else(|| {
            TaframeError::validation(format!("column override '{pair}' is not role=Column"))
        })?;
        invocation = invocation.input(role.trim(), column.trim());
    }
    Ok(invocation)
}

pub fn build_dispatcher(settings: &Settings) -> Dispatcher {
    settings
        .column_defaults
        .iter()
        .fold(Dispatcher::default(), |dispatcher, (role, column)| {
            dispatcher.with_column_default(role, column.clone())
        })
}

pub fn execute_run(args: &RunArgs, out: &mut dyn Write) -> Result<IndicatorOutput, TaframeError> {
    let settings = load_settings(args.source.config.as_deref())?;
    let mut table = load_table(&args.source, &settings)?;
    let invocation = build_invocation(args, &settings)?;

    let output = build_dispatcher(&settings).invoke(&mut table, &invocation)?;
    if let Some(elapsed) = output.elapsed() {
        eprintln!("{} computed in {}", output.name(), format_elapsed(elapsed));
    }

    let adapter = CsvAdapter::new(settings.index_column.clone());
    let target = args.output.clone().or(settings.output_path);
    match (invocation.append, target) {
        (true, Some(path)) => {
            adapter.store_table(&table, &path)?;
            eprintln!("Appended {} to {}", output.name(), path.display());
        }
        (true, None) => adapter.write_table(&table, out)?,
        (false, Some(path)) => {
            adapter.write_output(&output, File::create(&path)?)?;
            eprintln!("Wrote {} to {}", output.name(), path.display());
        }
        (false, None) => adapter.write_output(&output, out)?,
    }
    Ok(output)
}

pub fn execute_list<S: AsRef<str>>(
    exclude: &[S],
    category: Option<Category>,
    raw: bool,
    out: &mut dyn Write,
) -> Result<(), TaframeError> {
    let names = Registry::with_defaults().select(exclude, category);
    if raw {
        for name in names {
            writeln!(out, "{name}")?;
        }
    } else {
        write!(out, "{}", listing(&names))?;
    }
    Ok(())
}

pub fn execute_regress(
    args: &RegressArgs,
    out: &mut dyn Write,
) -> Result<RegressionResult, TaframeError> {
    let settings = load_settings(args.source.config.as_deref())?;
    let table = load_table(&args.source, &settings)?;
    let x = resolve(Some(&SeriesInput::from(args.x.as_str())), None, &table)?;
    let y = resolve(Some(&SeriesInput::from(args.y.as_str())), None, &table)?;

    let fit = linear_regression(&x, &y)?;
    writeln!(out, "backend: {}", fit.backend)?;
    writeln!(out, "intercept: {}", fit.intercept)?;
    writeln!(out, "slope: {}", fit.slope)?;
    writeln!(out, "r: {}", fit.correlation)?;
    writeln!(out, "t: {}", fit.t_statistic)?;
    Ok(fit)
}

pub fn execute_constants(
    args: &ConstantsArgs,
    out: &mut dyn Write,
) -> Result<Vec<String>, TaframeError> {
    let settings = load_settings(args.source.config.as_deref())?;
    let bound = |flag: Option<i64>, configured: Option<i64>, key: &str| {
        flag.or(configured)
            .ok_or_else(|| TaframeError::ConfigInvalid {
                section: "constants".into(),
                key: key.into(),
                reason: format!("no {key} bound (use --{key} or [constants] {key})"),
            })
    };
    let lower = bound(args.lower, settings.constants_lower, "lower")?;
    let upper = bound(args.upper, settings.constants_upper, "upper")?;
    let every = args.every.or(settings.constants_every).unwrap_or(1);

    let mut table = load_table(&args.source, &settings)?;
    let touched = table.constants(!args.remove, lower, upper, every);
    eprintln!(
        "{} {} constant columns",
        if args.remove { "Removed" } else { "Added" },
        touched.len()
    );

    let adapter = CsvAdapter::new(settings.index_column.clone());
    match args.output.clone().or(settings.output_path) {
        Some(path) => adapter.store_table(&table, &path)?,
        None => adapter.write_table(&table, out)?,
    }
    Ok(touched)
}
