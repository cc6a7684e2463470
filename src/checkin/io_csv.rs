// Primitives for reading CSV files.

use std::io::Read;

use crate::checkin::config_reader::ColumnNames;
use crate::checkin::{
    io_common::{locate_columns, order_from_cells, parsed_orders},
    *,
};

pub fn read_csv_orders(path: &str, names: &ColumnNames) -> CheckinResult<ParsedOrders> {
    let rdr = csv_builder().from_path(path).context(CsvOpenSnafu { path })?;
    read_records(rdr, names, path)
}

fn csv_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    // Exports sometimes drop the trailing empty cells.
    builder.has_headers(true).flexible(true);
    builder
}

fn read_records<R: Read>(
    mut rdr: csv::Reader<R>,
    names: &ColumnNames,
    path: &str,
) -> CheckinResult<ParsedOrders> {
    let header: Vec<String> = rdr
        .headers()
        .context(CsvLineParseSnafu { path, lineno: 1u64 })?
        .iter()
        .map(|s| s.to_string())
        .collect();
    debug!("read_csv_orders: header: {:?}", header);
    if header.iter().all(|h| h.trim().is_empty()) {
        return EmptyInputSnafu { path }.fail();
    }
    let cols = locate_columns(&header, names, path)?;

    let mut res: Vec<ParsedOrder> = Vec::new();
    for (idx, line_r) in rdr.into_records().enumerate() {
        // Header is line 1.
        let default_lineno = (idx + 2) as u64;
        let line = line_r.context(CsvLineParseSnafu {
            path,
            lineno: default_lineno,
        })?;
        let lineno = line
            .position()
            .map(|p| p.line())
            .unwrap_or(default_lineno);
        let cells: Vec<String> = line.iter().map(|s| s.to_string()).collect();
        if cells.iter().all(|c| c.trim().is_empty()) {
            debug!("read_csv_orders: lineno: {:?}: skipping blank row", lineno);
            continue;
        }
        let order = order_from_cells(&cells, &cols);
        debug!("read_csv_orders: lineno: {:?} order: {:?}", lineno, &order);
        res.push(ParsedOrder { lineno, order });
    }
    Ok(parsed_orders(res, &cols))
}
