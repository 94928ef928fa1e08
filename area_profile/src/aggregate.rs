use log::{debug, info};

use crate::config::*;
use crate::table::{Column, Table};

/// A category together with the source columns its rule selected.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ResolvedCategory {
    pub category: Category,
    pub columns: Vec<String>,
}

/// The layout checked against an actual source header.
///
/// Invariant: every category has at least one column and every identifier is
/// present in the header.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SchemaPlan {
    pub categories: Vec<ResolvedCategory>,
}

/// All the columns of the header selected by the rule, in header order.
pub fn resolve_columns(rule: &MatchRule, header: &[String]) -> Vec<String> {
    header
        .iter()
        .filter(|name| rule.matches(name))
        .cloned()
        .collect()
}

impl SchemaPlan {
    pub fn resolve(layout: &ProfileLayout, header: &[String]) -> Result<SchemaPlan, SchemaError> {
        for id in layout.identifiers.iter() {
            if !header.contains(id) {
                return Err(SchemaError::MissingColumn { column: id.clone() });
            }
        }
        let mut categories: Vec<ResolvedCategory> = Vec::new();
        for category in layout.categories.iter() {
            let columns = resolve_columns(&category.rule, header);
            if columns.is_empty() {
                return Err(SchemaError::UnresolvedCategory {
                    category: category.name.clone(),
                    rule: category.rule.clone(),
                });
            }
            info!(
                "Category {:?}: {} matching column(s)",
                category.name,
                columns.len()
            );
            debug!("resolve: {:?} -> {:?}", category.name, columns);
            categories.push(ResolvedCategory {
                category: category.clone(),
                columns,
            });
        }
        Ok(SchemaPlan { categories })
    }

    /// The distinct source columns used by the categories, in order of first use.
    pub fn source_columns(&self) -> Vec<String> {
        let mut res: Vec<String> = Vec::new();
        for rc in self.categories.iter() {
            for c in rc.columns.iter() {
                if !res.contains(c) {
                    res.push(c.clone());
                }
            }
        }
        res
    }
}

/// Sums numeric columns row-wise into a new column `output`.
pub fn sum_columns(table: &mut Table, output: &str, inputs: &[String]) -> Result<(), ProfileError> {
    let mut totals: Vec<f64> = vec![0.0; table.num_rows()];
    for name in inputs.iter() {
        let values = table.numeric(name)?;
        for (total, x) in totals.iter_mut().zip(values.iter()) {
            *total += *x;
        }
    }
    table.set_column(output, Column::Numeric(totals))?;
    Ok(())
}

/// Writes one column per category, in the order of the plan.
pub fn aggregate_categories(table: &mut Table, plan: &SchemaPlan) -> Result<(), ProfileError> {
    for rc in plan.categories.iter() {
        sum_columns(table, &rc.category.name, &rc.columns)?;
    }
    Ok(())
}
