//! Input column resolution against a [`Table`].
//!
//! An explicit series always wins. A column name is looked up verbatim first,
//! then case-insensitively: exact equality, then prefix, then substring.
//! Only a single candidate counts as a match; zero or several is
//! `ColumnNotFound`.

use crate::domain::error::TaframeError;
use crate::domain::series::Series;
use crate::domain::table::Table;

#[derive(Debug, Clone, PartialEq)]
pub enum SeriesInput {
    Column(String),
    Explicit(Series),
}

impl From<&str> for SeriesInput {
    fn from(name: &str) -> Self {
        SeriesInput::Column(name.to_string())
    }
}

impl From<String> for SeriesInput {
    fn from(name: String) -> Self {
        SeriesInput::Column(name)
    }
}

impl From<Series> for SeriesInput {
    fn from(series: Series) -> Self {
        SeriesInput::Explicit(series)
    }
}

pub fn resolve(
    explicit: Option<&SeriesInput>,
    default: Option<&str>,
    table: &Table,
) -> Result<Series, TaframeError> {
    let requested = match (explicit, default) {
        (Some(SeriesInput::Explicit(series)), _) => return Ok(series.clone()),
        (Some(SeriesInput::Column(name)), _) => name.as_str(),
        (None, Some(default)) => default,
        (None, None) => {
            return Err(TaframeError::Configuration {
                parameter: "input".into(),
            });
        }
    };

    if let Some(series) = table.series(requested) {
        return Ok(series);
    }

    let names = table.column_names();
    let matched: Option<String> = match fuzzy_match(requested, &names).as_slice() {
        [single] => Some(single.to_string()),
        _ => None,
    };
    matched
        .and_then(|name| table.series(&name))
        .ok_or_else(|| not_found(requested, names))
}

/// Case-insensitive candidates for `requested`, from the first tier that
/// yields any: exact matches, then columns starting with it, then columns
/// containing it.
pub fn fuzzy_match<'a>(requested: &str, names: &'a [String]) -> Vec<&'a str> {
    let wanted = requested.to_lowercase();
    let lowered: Vec<(String, &str)> = names
        .iter()
        .map(|n| (n.to_lowercase(), n.as_str()))
        .collect();
    let tier = |keep: &dyn Fn(&str) -> bool| -> Vec<&'a str> {
        lowered
            .iter()
            .filter(|(lower, _)| keep(lower.as_str()))
            .map(|(_, name)| *name)
            .collect()
    };

    let exact = tier(&|lower: &str| lower == wanted);
    if !exact.is_empty() {
        return exact;
    }
    let prefix = tier(&|lower: &str| lower.starts_with(&wanted));
    if !prefix.is_empty() {
        return prefix;
    }
    tier(&|lower: &str| lower.contains(&wanted))
}

fn not_found(requested: &str, available: Vec<String>) -> TaframeError {
    TaframeError::ColumnNotFound {
        requested: requested.to_string(),
        available,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn capitalized_table() -> Table {
        let start = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let index = vec![start, start + chrono::Duration::days(1)];
        Table::new(index)
            .with_column("Open", vec![1.0, 2.0])
            .unwrap()
            .with_column("High", vec![3.0, 4.0])
            .unwrap()
            .with_column("Low", vec![0.5, 1.5])
            .unwrap()
            .with_column("Close", vec![2.0, 3.0])
            .unwrap()
    }

    #[test]
    fn explicit_series_takes_precedence() {
        let table = capitalized_table();
        let explicit = Series::new("custom", table.index().to_vec(), vec![7.0, 8.0]);
        let input = SeriesInput::Explicit(explicit.clone());
        let got = resolve(Some(&input), Some("close"), &table).unwrap();
        assert_eq!(got, explicit);
    }

    #[test]
    fn missing_input_and_default_is_configuration_error() {
        let table = capitalized_table();
        let err = resolve(None, None, &table).unwrap_err();
        assert!(matches!(err, TaframeError::Configuration { .. }));
    }

    #[test]
    fn verbatim_name_is_used() {
        let table = capitalized_table();
        let input = SeriesInput::from("High");
        let got = resolve(Some(&input), None, &table).unwrap();
        assert_eq!(got.name, "High");
        assert_eq!(got.values, vec![3.0, 4.0]);
    }

    #[test]
    fn default_resolves_case_insensitively() {
        let table = capitalized_table();
        let got = resolve(None, Some("close"), &table).unwrap();
        assert_eq!(got.name, "Close");
    }

    #[test]
    fn prefix_match_resolves_unique_candidate() {
        let table = capitalized_table();
        let input = SeriesInput::from("op");
        assert_eq!(resolve(Some(&input), None, &table).unwrap().name, "Open");
    }

    #[test]
    fn absent_column_lists_available() {
        let table = capitalized_table();
        let input = SeriesInput::from("Volume");
        let err = resolve(Some(&input), Some("volume"), &table).unwrap_err();
        match err {
            TaframeError::ColumnNotFound {
                requested,
                available,
            } => {
                assert_eq!(requested, "Volume");
                assert_eq!(available, vec!["Open", "High", "Low", "Close"]);
            }
            other => panic!("expected ColumnNotFound, got {other:?}"),
        }
    }

    #[test]
    fn ambiguous_prefix_is_not_found() {
        let table = capitalized_table()
            .with_column("Close Adj", vec![2.0, 3.0])
            .unwrap()
            .with_column("Closing", vec![2.0, 3.0])
            .unwrap();
        let input = SeriesInput::from("clos");
        let err = resolve(Some(&input), None, &table).unwrap_err();
        assert!(matches!(err, TaframeError::ColumnNotFound { .. }));
    }

    #[test]
    fn substring_match_resolves_unique_candidate() {
        let table = capitalized_table()
            .with_column("Close Adj", vec![2.5, 3.5])
            .unwrap();
        let input = SeriesInput::from("adj");
        let got = resolve(Some(&input), None, &table).unwrap();
        assert_eq!(got.name, "Close Adj");
        assert_eq!(got.values, vec![2.5, 3.5]);
    }

    #[test]
    fn prefix_beats_substring() {
        let names = vec!["Adj Close".to_string(), "Close Adj".to_string()];
        assert_eq!(fuzzy_match("clo", &names), vec!["Close Adj"]);
        assert_eq!(fuzzy_match("ADJ", &names), vec!["Adj Close"]);
    }

    #[test]
    fn ambiguous_substring_is_not_found() {
        let names = vec!["Bid Size".to_string(), "Ask Size".to_string()];
        assert_eq!(fuzzy_match("size", &names).len(), 2);
        let table = capitalized_table()
            .with_column("Bid Size", vec![1.0, 1.0])
            .unwrap()
            .with_column("Ask Size", vec![1.0, 1.0])
            .unwrap();
        let err = resolve(Some(&SeriesInput::from("size")), None, &table).unwrap_err();
        assert!(matches!(err, TaframeError::ColumnNotFound { .. }));
    }

    #[test]
    fn exact_insensitive_beats_prefix() {
        let names = vec!["Close".to_string(), "Close Adj".to_string()];
        assert_eq!(fuzzy_match("close", &names), vec!["Close"]);
    }
}
