use std::collections::HashMap;

use log::debug;

use crate::config::*;

/// The content of a single column. Columns start as text and the numeric
/// columns are converted in place by the normalizer.
#[derive(PartialEq, Debug, Clone)]
pub enum Column {
    Text(Vec<String>),
    Numeric(Vec<f64>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Text(v) => v.len(),
            Column::Numeric(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A borrowed view on one cell.
#[derive(PartialEq, Debug, Clone, Copy)]
pub enum Cell<'a> {
    Text(&'a str),
    Number(f64),
}

/// A column-oriented table of voting areas.
///
/// Invariant: all the columns have `num_rows` elements and the names are unique.
#[derive(PartialEq, Debug, Clone)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Column>,
    index: HashMap<String, usize>,
    num_rows: usize,
}

impl Table {
    /// An empty table with the given header.
    pub fn new(header: &[String]) -> Result<Table, SchemaError> {
        let mut index: HashMap<String, usize> = HashMap::new();
        for (idx, name) in header.iter().enumerate() {
            if index.insert(name.clone(), idx).is_some() {
                return Err(SchemaError::DuplicateColumn {
                    column: name.clone(),
                });
            }
        }
        Ok(Table {
            names: header.to_vec(),
            columns: header.iter().map(|_| Column::Text(Vec::new())).collect(),
            index,
            num_rows: 0,
        })
    }

    /// Builds a table of text columns out of a header and the data rows.
    pub fn from_rows(header: &[String], rows: &[Vec<String>]) -> Result<Table, SchemaError> {
        let mut table = Table::new(header)?;
        for row in rows.iter() {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Appends a row of text values. Only valid while all the columns are text.
    pub fn push_row(&mut self, row: &[String]) -> Result<(), SchemaError> {
        if row.len() != self.names.len() {
            return Err(SchemaError::RowLength {
                row: self.num_rows,
                expected: self.names.len(),
                found: row.len(),
            });
        }
        // Nothing is pushed unless every column still takes text.
        if let Some(idx) = self
            .columns
            .iter()
            .position(|c| matches!(c, Column::Numeric(_)))
        {
            return Err(SchemaError::NotText {
                column: self.names[idx].clone(),
            });
        }
        for (column, value) in self.columns.iter_mut().zip(row.iter()) {
            if let Column::Text(v) = column {
                v.push(value.clone());
            }
        }
        self.num_rows += 1;
        Ok(())
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.index.get(name).map(|idx| &self.columns[*idx])
    }

    /// The values of a column that has already been converted to numbers.
    pub fn numeric(&self, name: &str) -> Result<&[f64], SchemaError> {
        match self.column(name) {
            Some(Column::Numeric(v)) => Ok(v.as_slice()),
            Some(Column::Text(_)) => Err(SchemaError::NotNumeric {
                column: name.to_string(),
            }),
            None => Err(SchemaError::MissingColumn {
                column: name.to_string(),
            }),
        }
    }

    /// Inserts a column at the end of the table, or replaces the content of
    /// an existing column with the same name in place.
    pub fn set_column(&mut self, name: &str, column: Column) -> Result<(), SchemaError> {
        if column.len() != self.num_rows {
            return Err(SchemaError::ColumnLength {
                column: name.to_string(),
                expected: self.num_rows,
                found: column.len(),
            });
        }
        if let Some(idx) = self.index.get(name) {
            debug!("set_column: replacing column {:?}", name);
            self.columns[*idx] = column;
        } else {
            self.index.insert(name.to_string(), self.names.len());
            self.names.push(name.to_string());
            self.columns.push(column);
        }
        Ok(())
    }

    /// Hands out a column for in-place conversion. The replacement must keep
    /// the number of rows.
    pub(crate) fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        match self.index.get(name) {
            Some(idx) => self.columns.get_mut(*idx),
            None => None,
        }
    }

    /// A new table holding only the given columns, in the given order.
    pub fn project(&self, names: &[String]) -> Result<Table, SchemaError> {
        let mut res = Table::new(names)?;
        res.num_rows = self.num_rows;
        for (idx, name) in names.iter().enumerate() {
            let column = self
                .column(name)
                .ok_or_else(|| SchemaError::MissingColumn {
                    column: name.clone(),
                })?;
            res.columns[idx] = column.clone();
        }
        Ok(res)
    }

    /// The cells of one row, in column order.
    pub fn row(&self, row_idx: usize) -> Vec<Cell<'_>> {
        self.columns
            .iter()
            .map(|c| match c {
                Column::Text(v) => Cell::Text(v[row_idx].as_str()),
                Column::Numeric(v) => Cell::Number(v[row_idx]),
            })
            .collect()
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<Cell<'_>>> {
        (0..self.num_rows).map(move |idx| self.row(idx))
    }
}
