mod aggregate;
pub mod builder;
mod config;
mod derive;
mod municipalities;
mod normalize;
mod table;

use log::{debug, info, warn};

pub use crate::aggregate::{resolve_columns, ResolvedCategory, SchemaPlan};
pub use crate::config::*;
pub use crate::municipalities::MunicipalityTable;
pub use crate::normalize::parse_locale_number;
pub use crate::table::{Cell, Column, Table};

/// Computes the profile of every voting area of the table.
///
/// Arguments:
/// * `table` the raw table, all columns as text, as produced by a reader
/// * `layout` the categories, sums, shares and output projection
/// * `rules` the handling of missing values
///
/// The categories are resolved against the header before any value is read.
/// The returned table only holds `layout.output_columns`, in that order.
pub fn run_profile(
    table: Table,
    layout: &ProfileLayout,
    rules: &ProfileRules,
) -> Result<Table, ProfileError> {
    info!(
        "Processing {} voting areas, {} source columns, rules: {:?}",
        table.num_rows(),
        table.column_names().len(),
        rules
    );
    let mut table = table;

    let plan = SchemaPlan::resolve(layout, table.column_names())?;
    // The projection is checked early as well, so that a bad output list does
    // not surface after all the work is done.
    check_output_columns(layout, &table)?;

    let source_columns = plan.source_columns();
    debug!("run_profile: normalizing {} columns", source_columns.len());
    let num_missing =
        normalize::normalize_columns(&mut table, &source_columns, rules.missing_value_policy)?;
    if num_missing > 0 {
        match rules.missing_value_policy {
            MissingValuePolicy::TreatAsZero => warn!(
                "{} cell(s) without data were counted as zero; unreported and true zero values cannot be told apart",
                num_missing
            ),
            _ => info!("{} cell(s) without data", num_missing),
        }
    }

    aggregate::aggregate_categories(&mut table, &plan)?;
    for sum in layout.sums.iter() {
        debug!("run_profile: sum {:?} of {:?}", sum.name, sum.inputs);
        aggregate::sum_columns(&mut table, &sum.name, &sum.inputs)?;
    }
    for share in layout.shares.iter() {
        debug!(
            "run_profile: share {:?} = {:?} / {:?}",
            share.name, share.numerator, share.denominator
        );
        derive::derive_share(&mut table, share)?;
    }

    let res = table.project(&layout.output_columns)?;
    info!(
        "Profile done: {} rows, {} columns",
        res.num_rows(),
        res.column_names().len()
    );
    Ok(res)
}

// An output column is either an identifier, a source column or something the
// pipeline writes.
fn check_output_columns(layout: &ProfileLayout, table: &Table) -> Result<(), SchemaError> {
    for c in layout.output_columns.iter() {
        let produced = layout.categories.iter().any(|x| &x.name == c)
            || layout.sums.iter().any(|x| &x.name == c)
            || layout.shares.iter().any(|x| &x.name == c);
        if !produced && !table.contains(c) {
            return Err(SchemaError::MissingColumn { column: c.clone() });
        }
    }
    Ok(())
}
