pub use crate::config::*;
use crate::table::Table;

/// A builder for adding the rows of a source one at a time.
///
/// The readers use it so that the shape of every row is checked while
/// reading, before the pipeline starts.
///
/// ```
/// pub use area_profile::builder::Builder;
/// # use area_profile::SchemaError;
///
/// let mut builder = Builder::new(&["ValgstedId".to_string(), "Befolkning_Danmark".to_string()])?;
///
/// builder.add_row(&["101001".to_string(), "1.234,0".to_string()])?;
///
/// let table = builder.build();
/// assert_eq!(table.num_rows(), 1);
/// # Ok::<(), SchemaError>(())
/// ```
pub struct Builder {
    pub(crate) _table: Table,
}

impl Builder {
    pub fn new(header: &[String]) -> Result<Builder, SchemaError> {
        Ok(Builder {
            _table: Table::new(header)?,
        })
    }

    /// Adds a row of raw text fields, in header order.
    pub fn add_row(&mut self, fields: &[String]) -> Result<(), SchemaError> {
        self._table.push_row(fields)
    }

    /// Adds a row given as string slices.
    pub fn add_row_simple(&mut self, fields: &[&str]) -> Result<(), SchemaError> {
        let v: Vec<String> = fields.iter().map(|s| s.to_string()).collect();
        self.add_row(&v)
    }

    pub fn build(self) -> Table {
        self._table
    }
}
