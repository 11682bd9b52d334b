//! Column-oriented table of `f64` series sharing one timestamp index.
//!
//! The table is owned by the caller. Indicators only read from it; the single
//! write path is [`Table::attach`], which the dispatcher uses for `append`.

use crate::domain::error::TaframeError;
use crate::domain::indicator::IndicatorOutput;
use crate::domain::series::Series;
use chrono::NaiveDateTime;

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    index: Vec<NaiveDateTime>,
    columns: Vec<Column>,
}

impl Table {
    pub fn new(index: Vec<NaiveDateTime>) -> Self {
        Self {
            index,
            columns: Vec::new(),
        }
    }

    /// Builder form of [`Table::insert_column`].
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<Self, TaframeError> {
        self.insert_column(name, values)?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn index(&self) -> &[NaiveDateTime] {
        &self.index
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn values(&self, name: &str) -> Option<&[f64]> {
        self.position(name)
            .map(|i| self.columns[i].values.as_slice())
    }

    /// Copy a column out as a [`Series`] carrying the table index.
    pub fn series(&self, name: &str) -> Option<Series> {
        self.position(name).map(|i| {
            let col = &self.columns[i];
            Series::new(col.name.clone(), self.index.clone(), col.values.clone())
        })
    }

    /// Insert a column, overwriting an existing column of the same name in
    /// place so column order is preserved.
    pub fn insert_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<(), TaframeError> {
        let name = name.into();
        if values.len() != self.index.len() {
            return Err(TaframeError::validation(format!(
                "column '{}' has {} rows, table has {}",
                name,
                values.len(),
                self.index.len()
            )));
        }
        match self.position(&name) {
            Some(i) => self.columns[i].values = values,
            None => self.columns.push(Column { name, values }),
        }
        Ok(())
    }

    pub fn remove_column(&mut self, name: &str) -> Option<Vec<f64>> {
        self.position(name).map(|i| self.columns.remove(i).values)
    }

    /// Write an indicator result back into the table.
    ///
    /// A series lands under its name; a frame is written column by column.
    /// Nothing is written unless every column fits. Returns the names written.
    pub fn attach(&mut self, output: &IndicatorOutput) -> Result<Vec<String>, TaframeError> {
        match output {
            IndicatorOutput::Series(series) => {
                self.insert_column(series.name.clone(), series.values.clone())?;
                Ok(vec![series.name.clone()])
            }
            IndicatorOutput::Frame(frame) => {
                if frame.rows() != self.len() {
                    return Err(TaframeError::validation(format!(
                        "cannot append '{}': {} rows against a table of {}",
                        frame.name,
                        frame.rows(),
                        self.len()
                    )));
                }
                let mut written = Vec::with_capacity(frame.columns.len());
                for column in &frame.columns {
                    self.insert_column(column.name.clone(), column.values.clone())?;
                    written.push(column.name.clone());
                }
                Ok(written)
            }
        }
    }

    /// Add (`apply`) or remove constant-valued columns named after every
    /// integer in `lower..=upper` divisible by `every`.
    pub fn constants(&mut self, apply: bool, lower: i64, upper: i64, every: i64) -> Vec<String> {
        let every = if every > 0 { every } else { 1 };
        let mut touched = Vec::new();
        for level in (lower..=upper).filter(|x| x % every == 0) {
            let name = level.to_string();
            if apply {
                let values = vec![level as f64; self.len()];
                self.columns.retain(|c| c.name != name);
                self.columns.push(Column {
                    name: name.clone(),
                    values,
                });
                touched.push(name);
            } else if self.remove_column(&name).is_some() {
                touched.push(name);
            }
        }
        touched
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }
}
