use area_profile::builder::Builder;
use calamine::{open_workbook, DataType, Range, Reader, Xlsx};

use crate::prep::*;

/// Reads the first worksheet (or the named one) of an Excel file. The first
/// row is the header.
pub fn read_xlsx_table(path: &str, worksheet_name: Option<&str>) -> PrepResult<Table> {
    let wrange = get_range(path, worksheet_name)?;

    let mut iter = wrange.rows();
    let header_cells = iter.next().context(EmptyExcelSnafu { path })?;
    let header: Vec<String> = header_cells
        .iter()
        .map(|c| read_cell(c, 1))
        .collect::<PrepResult<Vec<String>>>()?;
    debug!("read_xlsx_table: header: {:?}", header);

    let mut builder = Builder::new(&header).context(HeaderSnafu { path })?;
    for (idx, row) in iter.enumerate() {
        let lineno = idx + 2;
        let fields: Vec<String> = row
            .iter()
            .map(|c| read_cell(c, lineno as u64))
            .collect::<PrepResult<Vec<String>>>()?;
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

fn get_range(path: &str, worksheet_name: Option<&str>) -> PrepResult<Range<DataType>> {
    debug!(
        "read_xlsx_table: path: {:?} worksheet: {:?}",
        path, worksheet_name
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let wrange = match worksheet_name {
        Some(name) => workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { path, name })?
            .context(OpeningExcelSnafu { path })?,
        None => workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })?,
    };
    Ok(wrange)
}

// Numbers stored as numbers in the workbook use a period as decimal
// separator, which the normalizer reads as is.
fn read_cell(cell: &DataType, lineno: u64) -> PrepResult<String> {
    match cell {
        DataType::String(s) => Ok(s.clone()),
        DataType::Float(f) => Ok(f.to_string()),
        DataType::Int(i) => Ok(i.to_string()),
        DataType::Empty => Ok(String::new()),
        _ => Err(PrepError::ExcelWrongCellType {
            lineno,
            content: format!("{:?}", cell),
        }),
    }
}
