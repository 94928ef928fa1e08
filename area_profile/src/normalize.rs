use log::debug;

use crate::config::*;
use crate::table::{Column, Table};

/// The result of reading one raw cell.
#[derive(PartialEq, Debug, Clone, Copy)]
pub(crate) enum CellValue {
    Number(f64),
    /// The placeholder token or an empty cell.
    Missing,
    Invalid,
}

/// Reads a cell written with a comma as decimal separator.
///
/// When the value contains a comma, the periods are thousands separators:
/// `"1.234,5"` is 1234.5. Without a comma the value is read as is.
pub(crate) fn read_cell(raw: &str) -> CellValue {
    let s = raw.trim();
    if s.is_empty() || s == PLACEHOLDER_TOKEN {
        return CellValue::Missing;
    }
    let parsed = if s.contains(',') {
        s.replace('.', "").replace(',', ".").parse::<f64>()
    } else {
        s.parse::<f64>()
    };
    match parsed {
        Ok(x) => CellValue::Number(x),
        Err(_) => CellValue::Invalid,
    }
}

/// Converts a raw cell to a number under the given policy.
/// Returns None if the cell cannot be accepted.
pub fn parse_locale_number(raw: &str, policy: MissingValuePolicy) -> Option<f64> {
    apply_policy(read_cell(raw), policy)
}

fn apply_policy(value: CellValue, policy: MissingValuePolicy) -> Option<f64> {
    match (value, policy) {
        (CellValue::Number(x), _) => Some(x),
        (CellValue::Missing, MissingValuePolicy::TreatAsZero) => Some(0.0),
        (CellValue::Missing, MissingValuePolicy::PropagateAsUndefined) => Some(f64::NAN),
        (CellValue::Missing, MissingValuePolicy::Reject) => None,
        (CellValue::Invalid, _) => None,
    }
}

/// Converts the given columns from text to numbers, in place, one column at a time.
///
/// Returns the number of placeholder cells that were substituted.
/// Columns that are already numeric are left as they are.
pub fn normalize_columns(
    table: &mut Table,
    columns: &[String],
    policy: MissingValuePolicy,
) -> Result<usize, ProfileError> {
    let mut num_missing: usize = 0;
    for name in columns.iter() {
        let column = table
            .column_mut(name)
            .ok_or_else(|| SchemaError::MissingColumn {
                column: name.clone(),
            })?;
        let values: Vec<f64> = match column {
            Column::Numeric(_) => {
                debug!("normalize_columns: {:?} already numeric", name);
                continue;
            }
            Column::Text(cells) => {
                let mut values: Vec<f64> = Vec::with_capacity(cells.len());
                for (row, raw) in cells.iter().enumerate() {
                    let value = read_cell(raw);
                    if value == CellValue::Missing {
                        num_missing += 1;
                    }
                    let x = apply_policy(value, policy).ok_or_else(|| {
                        ProfileError::Parse {
                            column: name.clone(),
                            row,
                            value: raw.clone(),
                        }
                    })?;
                    values.push(x);
                }
                values
            }
        };
        *column = Column::Numeric(values);
    }
    Ok(num_missing)
}
