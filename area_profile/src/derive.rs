use log::debug;

use crate::config::*;
use crate::table::{Column, Table};

/// Writes `numerator / denominator` into the column `spec.name`.
///
/// A zero denominator gives an infinite value (or NaN for 0/0). It is kept as
/// is: it marks areas without any registered household.
pub fn derive_share(table: &mut Table, spec: &ShareSpec) -> Result<(), ProfileError> {
    let numerator = table.numeric(&spec.numerator)?;
    let denominator = table.numeric(&spec.denominator)?;
    let shares: Vec<f64> = numerator
        .iter()
        .zip(denominator.iter())
        .map(|(n, d)| n / d)
        .collect();
    let num_non_finite = shares.iter().filter(|x| !x.is_finite()).count();
    if num_non_finite > 0 {
        debug!(
            "derive_share: {:?}: {} row(s) without a finite share",
            spec.name, num_non_finite
        );
    }
    table.set_column(&spec.name, Column::Numeric(shares))?;
    Ok(())
}
