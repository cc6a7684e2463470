use calamine::{open_workbook, DataType, Range, Reader, Xlsx};

use crate::checkin::config_reader::ColumnNames;
use crate::checkin::{
    io_common::{locate_columns, order_from_cells, parsed_orders},
    *,
};

pub fn read_excel_orders(
    path: &str,
    worksheet_name: Option<&str>,
    names: &ColumnNames,
) -> CheckinResult<ParsedOrders> {
    let wrange = get_range(path, worksheet_name)?;
    read_range(&wrange, names, path)
}

fn get_range(path: &str, worksheet_name: Option<&str>) -> CheckinResult<Range<DataType>> {
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let wrange = match worksheet_name {
        Some(name) => workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { path, name })?,
        None => workbook
            .worksheet_range_at(0)
            .context(EmptyInputSnafu { path })?,
    };
    wrange.context(OpeningExcelSnafu { path })
}

fn read_range(
    wrange: &Range<DataType>,
    names: &ColumnNames,
    path: &str,
) -> CheckinResult<ParsedOrders> {
    let mut iter = wrange.rows();
    let header_row = iter.next().context(EmptyInputSnafu { path })?;
    let header: Vec<String> = header_row
        .iter()
        .map(|c| read_cell(c, 1))
        .collect::<CheckinResult<Vec<String>>>()?;
    debug!("read_excel_orders: header: {:?}", header);
    let cols = locate_columns(&header, names, path)?;

    let mut res: Vec<ParsedOrder> = Vec::new();
    for (idx, row) in iter.enumerate() {
        let lineno = (idx + 2) as u64;
        let cells: Vec<String> = row
            .iter()
            .map(|c| read_cell(c, lineno))
            .collect::<CheckinResult<Vec<String>>>()?;
        if cells.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        let order = order_from_cells(&cells, &cols);
        debug!("read_excel_orders: lineno: {:?} order: {:?}", lineno, &order);
        res.push(ParsedOrder { lineno, order });
    }
    Ok(parsed_orders(res, &cols))
}

fn read_cell(cell: &DataType, lineno: u64) -> CheckinResult<String> {
    match cell {
        DataType::String(s) => Ok(s.clone()),
        DataType::Empty => Ok(String::new()),
        DataType::Int(i) => Ok(i.to_string()),
        DataType::Float(f) => Ok(format_float(*f)),
        DataType::Bool(b) => Ok(b.to_string()),
        DataType::DateTime(f) => Ok(format_float(*f)),
        _ => ExcelWrongCellTypeSnafu {
            lineno,
            content: format!("{:?}", cell),
        }
        .fail(),
    }
}

// Seat numbers typed in a spreadsheet come back as floats.
fn format_float(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}
