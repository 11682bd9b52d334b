//! Multi-column indicator results without a timestamp index.

use crate::domain::error::TaframeError;
use crate::domain::indicator::Category;
use crate::domain::table::Column;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub name: String,
    pub columns: Vec<Column>,
    pub category: Option<Category>,
    pub alias: Option<String>,
    pub elapsed: Option<Duration>,
}

impl Frame {
    pub fn new(name: impl Into<String>, category: Category) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            category: Some(category),
            alias: None,
            elapsed: None,
        }
    }

    /// Append a column; every column must have the same number of rows.
    pub fn push_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<(), TaframeError> {
        let name = name.into();
        if let Some(first) = self.columns.first() {
            TaframeError::check_lengths(
                &format!("{} column '{}'", self.name, name),
                first.values.len(),
                values.len(),
            )?;
        }
        self.columns.push(Column { name, values });
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn fill_nan(&mut self, value: f64) {
        for column in &mut self.columns {
            for v in column.values.iter_mut().filter(|v| v.is_nan()) {
                *v = value;
            }
        }
    }
}
