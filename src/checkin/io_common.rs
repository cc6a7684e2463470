use std::path::Path;

use crate::checkin::config_reader::ColumnNames;
use crate::checkin::*;

/// The formats an export can be read from.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum InputType {
    Csv,
    Xlsx,
}

impl InputType {
    pub fn parse(s: &str) -> CheckinResult<InputType> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(InputType::Csv),
            "xlsx" | "excel" => Ok(InputType::Xlsx),
            _ => UnknownInputTypeSnafu { input_type: s }.fail(),
        }
    }

    /// Guesses from the extension. Anything that is not a workbook is read as CSV.
    pub fn from_path(path: &str) -> InputType {
        match Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
        {
            Some(e) if e == "xlsx" || e == "xlsm" => InputType::Xlsx,
            _ => InputType::Csv,
        }
    }
}

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

/// Positions of the columns in a row, found from the header.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ColumnIndexes {
    pub first_name: usize,
    pub last_name: usize,
    pub ticket_id: usize,
    pub seat: usize,
    pub status: Option<usize>,
    pub notes: Option<usize>,
}

fn find_column(header: &[String], name: &str) -> Option<usize> {
    header
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}').trim() == name.trim())
}

pub fn locate_columns(
    header: &[String],
    names: &ColumnNames,
    path: &str,
) -> CheckinResult<ColumnIndexes> {
    let required = |name: &String| {
        find_column(header, name).context(MissingColumnSnafu {
            column: name.clone(),
            path,
        })
    };
    let indexes = ColumnIndexes {
        first_name: required(&names.first_name)?,
        last_name: required(&names.last_name)?,
        ticket_id: required(&names.ticket_id)?,
        seat: required(&names.seat)?,
        status: find_column(header, &names.status),
        notes: find_column(header, &names.notes),
    };
    debug!("locate_columns: {:?} -> {:?}", header, indexes);
    Ok(indexes)
}

/// Builds an order from the cells of a row. Missing cells read as empty.
pub fn order_from_cells(cells: &[String], cols: &ColumnIndexes) -> TicketOrder {
    let cell = |idx: usize| cells.get(idx).cloned().unwrap_or_default();
    TicketOrder {
        first_name: cell(cols.first_name),
        last_name: cell(cols.last_name),
        ticket_id: cell(cols.ticket_id),
        seat: cell(cols.seat),
        status: cols.status.map(cell),
        notes: cols.notes.map(cell),
        source_line: None,
    }
}

pub fn parsed_orders(orders: Vec<ParsedOrder>, cols: &ColumnIndexes) -> ParsedOrders {
    ParsedOrders {
        orders,
        has_status: cols.status.is_some(),
        has_notes: cols.notes.is_some(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn columns_in_any_order() {
        let h = header(&["Seat", "Notes", " Last Name", "\u{feff}First Name", "Ticket I.D."]);
        let cols = locate_columns(&h, &ColumnNames::default(), "x.csv").unwrap();
        assert_eq!(cols.first_name, 3);
        assert_eq!(cols.last_name, 2);
        assert_eq!(cols.ticket_id, 4);
        assert_eq!(cols.seat, 0);
        assert_eq!(cols.status, None);
        assert_eq!(cols.notes, Some(1));
    }

    #[test]
    fn missing_required_column() {
        let h = header(&["First Name", "Last Name", "Seat"]);
        match locate_columns(&h, &ColumnNames::default(), "x.csv") {
            Err(CheckinError::MissingColumn { column, .. }) => assert_eq!(column, "Ticket I.D."),
            x => panic!("unexpected {:?}", x),
        }
    }

    #[test]
    fn short_row() {
        let h = header(&["First Name", "Last Name", "Ticket I.D.", "Seat", "Status"]);
        let cols = locate_columns(&h, &ColumnNames::default(), "x.csv").unwrap();
        let o = order_from_cells(&header(&["Ann", "Lee", "7"]), &cols);
        assert_eq!(o.seat, "");
        assert_eq!(o.status, Some("".to_string()));
        assert_eq!(o.notes, None);
    }

    #[test]
    fn input_types() {
        assert_eq!(InputType::from_path("a/b/Orders.XLSX"), InputType::Xlsx);
        assert_eq!(InputType::from_path("orders.csv"), InputType::Csv);
        assert_eq!(InputType::from_path("orders"), InputType::Csv);
        assert_eq!(InputType::parse("Excel").unwrap(), InputType::Xlsx);
        assert!(InputType::parse("ods").is_err());
        assert_eq!(simplify_file_name("/tmp/x/orders.csv"), "orders.csv");
    }
}
