//! Table storage port trait.

use crate::domain::error::TaframeError;
use crate::domain::table::Table;
use std::path::Path;

pub trait DataPort {
    fn load_table(&self, path: &Path) -> Result<Table, TaframeError>;

    fn store_table(&self, table: &Table, path: &Path) -> Result<(), TaframeError>;
}
