// Primitives for reading CSV files.

use area_profile::builder::Builder;

use crate::prep::*;

/// Reads a delimited file with a header row. All the cells are kept as text.
pub fn read_csv_table(path: &str, delimiter: u8) -> PrepResult<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;

    let header: Vec<String> = rdr
        .headers()
        .context(CsvLineParseSnafu { path, lineno: 1usize })?
        .iter()
        .map(|s| s.to_string())
        .collect();
    debug!("read_csv_table: header: {:?}", header);

    let mut builder = Builder::new(&header).context(HeaderSnafu { path })?;
    for (idx, line_r) in rdr.records().enumerate() {
        // The header is line 1.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { path, lineno })?;
        let fields: Vec<String> = line.iter().map(|s| s.to_string()).collect();
        builder
            .add_row(&fields)
            .context(RowSnafu { path, lineno })?;
    }
    let table = builder.build();
    info!(
        "Read {} voting areas and {} columns from {:?}",
        table.num_rows(),
        table.column_names().len(),
        path
    );
    Ok(table)
}
