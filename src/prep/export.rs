use std::io::Write;

use crate::prep::*;

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ExportSettings {
    /// Written in place of NaN. Infinite values are written as `inf` / `-inf`.
    pub na_representation: String,
}

fn format_cell(cell: &Cell, settings: &ExportSettings) -> String {
    match cell {
        Cell::Text(s) => s.to_string(),
        Cell::Number(x) if x.is_nan() => settings.na_representation.clone(),
        Cell::Number(x) => x.to_string(),
    }
}

/// Writes the table as comma-separated text: a header row, then one line per
/// voting area. There is no index column. Returns the writer once flushed.
pub fn write_csv<W: Write>(table: &Table, settings: &ExportSettings, writer: W) -> PrepResult<W> {
    let mut wtr = csv::WriterBuilder::new().delimiter(b',').from_writer(writer);
    wtr.write_record(table.column_names())
        .context(WritingCsvSnafu {})?;
    for row in table.rows() {
        let fields: Vec<String> = row.iter().map(|c| format_cell(c, settings)).collect();
        wtr.write_record(&fields).context(WritingCsvSnafu {})?;
    }
    wtr.into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
        .context(WritingCsvSnafu {})
}

/// Renders the table in memory, see `write_csv`.
pub fn render_csv(table: &Table, settings: &ExportSettings) -> PrepResult<String> {
    let bytes = write_csv(table, settings, Vec::new())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
