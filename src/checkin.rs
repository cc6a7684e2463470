use log::{debug, info};

use patron_report::*;
use snafu::{prelude::*, Snafu};

use std::fs;

use serde_json::Value as JSValue;

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_excel;
mod io_report;
mod pdf_layout;
mod pdf_render;

use crate::checkin::config_reader::*;
use crate::checkin::io_common::InputType;
use crate::checkin::io_report::*;

#[derive(Debug, Snafu)]
pub enum CheckinError {
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error parsing CSV file {path} near line {lineno}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: u64,
    },
    #[snafu(display("Missing column {column:?} in {path}"))]
    MissingColumn { column: String, path: String },
    #[snafu(display("The file {path} has no header row"))]
    EmptyInput { path: String },
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The workbook {path} has no worksheet {name:?}"))]
    MissingWorksheet { path: String, name: String },
    #[snafu(display("Cannot read the cell at line {lineno}: {content}"))]
    ExcelWrongCellType { lineno: u64, content: String },
    #[snafu(display("Unknown input type {input_type:?} (expected csv or xlsx)"))]
    UnknownInputType { input_type: String },
    #[snafu(display("No input file: use --input or set inputSource.filePath in the configuration"))]
    MissingInput {},
    #[snafu(display("Error reading {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing the configuration {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error serializing the summary"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("Error writing CSV data"))]
    CsvWrite { source: csv::Error },
    #[snafu(display("Error writing {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error computing the report"))]
    Report { source: ReportErrors },
    #[snafu(display("Error reading the reference {path}"))]
    ReadingReference {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("The report differs from the reference {path}"))]
    ReferenceMismatch { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type CheckinResult<T> = Result<T, CheckinError>;

/// The message shown to the user: the error followed by its causes.
pub fn describe_error(e: &CheckinError) -> String {
    let mut msg = e.to_string();
    let mut cur: Option<&dyn std::error::Error> = std::error::Error::source(e);
    while let Some(cause) = cur {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        cur = cause.source();
    }
    msg
}

/// A ticket order, as parsed by the readers.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedOrder {
    /// Line in the input file, starting at 1 with the header.
    pub lineno: u64,
    pub order: TicketOrder,
}

/// Everything a reader returns.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ParsedOrders {
    pub orders: Vec<ParsedOrder>,
    pub has_status: bool,
    pub has_notes: bool,
}

#[derive(Debug, Clone)]
pub struct CheckinOutcome {
    pub report: PatronReport,
    pub csv_text: String,
    pub pdf_size: usize,
}

// The orders handed to the report, tagged with their line in the export.
fn report_orders(parsed: Vec<ParsedOrder>) -> Vec<TicketOrder> {
    parsed
        .into_iter()
        .map(|po| TicketOrder {
            source_line: Some(po.lineno),
            ..po.order
        })
        .collect()
}

fn read_orders(settings: &Settings) -> CheckinResult<ParsedOrders> {
    info!(
        "Attempting to read orders file {:?} ({:?})",
        settings.input_path, settings.input_type
    );
    let parsed = match settings.input_type {
        InputType::Csv => io_csv::read_csv_orders(&settings.input_path, &settings.columns),
        InputType::Xlsx => io_excel::read_excel_orders(
            &settings.input_path,
            settings.excel_worksheet_name.as_deref(),
            &settings.columns,
        ),
    }?;
    info!(
        "Read {} orders from {:?} (status column: {}, notes column: {})",
        parsed.orders.len(),
        settings.input_path,
        parsed.has_status,
        parsed.has_notes
    );
    Ok(parsed)
}

/// Aggregates the orders, then writes the table, the CSV file, the PDF sheet
/// and the optional summary.
pub fn run_checkin(settings: &Settings) -> CheckinResult<CheckinOutcome> {
    info!("settings: {:?}", settings);
    let parsed = read_orders(settings)?;
    let has_notes = parsed.has_notes;

    let orders = report_orders(parsed.orders);
    let report = run_report(&orders, &settings.rules).context(ReportSnafu {})?;
    debug!("report: {:?}", report);

    println!("{}", format_report_table(&report, has_notes));

    let csv_text = report_csv_string(&report, has_notes)?;
    fs::write(&settings.csv_out, &csv_text).context(WritingOutputSnafu {
        path: settings.csv_out.clone(),
    })?;
    info!("Wrote the aggregated table to {:?}", settings.csv_out);

    let layout = pdf_layout::layout_sheet(&report, &settings.title, has_notes);
    let pdf = pdf_render::render_sheet(&layout, &settings.title)?;
    fs::write(&settings.pdf_out, &pdf).context(WritingOutputSnafu {
        path: settings.pdf_out.clone(),
    })?;
    info!(
        "Wrote the check-in sheet to {:?} ({} pages, {} bytes)",
        settings.pdf_out,
        layout.pages.len(),
        pdf.len()
    );

    if let Some(out) = settings.summary_out.as_deref() {
        let result_js: JSValue = build_summary_js(settings, &report);
        let pretty_js =
            serde_json::to_string_pretty(&result_js).context(SerializingJsonSnafu {})?;
        if out == "stdout" {
            println!("summary:{}", pretty_js);
        } else {
            fs::write(out, &pretty_js).context(WritingOutputSnafu {
                path: out.to_string(),
            })?;
            info!("Wrote the summary to {:?}", out);
        }
    }

    // The reference table, if provided for comparison
    if let Some(reference_p) = settings.reference.as_deref() {
        check_reference(&csv_text, reference_p)?;
    }

    Ok(CheckinOutcome {
        report,
        csv_text,
        pdf_size: pdf.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn settings_for(dir: &Path, input: &str) -> Settings {
        Settings {
            input_path: dir.join(input).display().to_string(),
            input_type: InputType::Csv,
            csv_out: dir.join("report.csv").display().to_string(),
            pdf_out: dir.join("sheet.pdf").display().to_string(),
            ..Settings::default()
        }
    }

    #[test]
    fn end_to_end_with_status() {
        let _ = env_logger::builder().is_test(true).try_init();
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("orders.csv"),
            "First Name,Last Name,Ticket I.D.,Seat,Status,Notes\n\
             Ann,Lee,1,A1,Paid,\n\
             Ann,Lee,2,A2,Paid,Aisle\n\
             Bob,Adams,3,B1,Refunded,\n\
             Bob,Adams,4,B2,Paid,\n\
             Cy &amp; Di,Young,5,C1,Paid,\n",
        )
        .unwrap();
        let settings = settings_for(dir.path(), "orders.csv");
        let outcome = run_checkin(&settings).unwrap();

        assert_eq!(
            outcome.csv_text,
            "First Name,Last Name,Tickets_Ordered,Seats,Notes\n\
             Bob,Adams,1,B2,\n\
             Ann,Lee,2,\"A1, A2\",Aisle\n\
             Cy & Di,Young,1,C1,\n"
        );
        let written = fs::read_to_string(&settings.csv_out).unwrap();
        assert_eq!(written, outcome.csv_text);
        let pdf = fs::read(&settings.pdf_out).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
        assert_eq!(pdf.len(), outcome.pdf_size);
    }

    #[test]
    fn orders_keep_their_line() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("orders.csv"),
            "First Name,Last Name,Ticket I.D.,Seat\n,,,\nAnn,Lee,1,A1\nBo,Ray,2,B1\n",
        )
        .unwrap();
        let settings = settings_for(dir.path(), "orders.csv");
        let parsed = read_orders(&settings).unwrap();
        let orders = report_orders(parsed.orders);
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].source_line, Some(3));
        assert_eq!(orders[0].first_name, "Ann");
        assert_eq!(orders[1].source_line, Some(4));
    }

    #[test]
    fn summary_and_reference() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("orders.csv"),
            "First Name,Last Name,Ticket I.D.,Seat\nAnn,Lee,1,A1\nAnn,Lee,2,A1\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("expected.csv"),
            "First Name,Last Name,Tickets_Ordered,Seats\r\nAnn,Lee,2,A1\r\n",
        )
        .unwrap();
        let summary_path = dir.path().join("summary.json").display().to_string();
        let settings = Settings {
            summary_out: Some(summary_path.clone()),
            reference: Some(dir.path().join("expected.csv").display().to_string()),
            ..settings_for(dir.path(), "orders.csv")
        };
        run_checkin(&settings).unwrap();

        let js: JSValue =
            serde_json::from_str(&fs::read_to_string(summary_path).unwrap()).unwrap();
        assert_eq!(js["input"]["file"], "orders.csv");
        assert_eq!(js["counts"]["patrons"], 1);
        assert_eq!(js["counts"]["tickets"], 2);
        assert_eq!(js["patrons"][0]["seats"][0], "A1");
    }

    #[test]
    fn reference_mismatch_fails() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("orders.csv"),
            "First Name,Last Name,Ticket I.D.,Seat\nAnn,Lee,1,A1\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("expected.csv"),
            "First Name,Last Name,Tickets_Ordered,Seats\nAnn,Lee,3,A1\n",
        )
        .unwrap();
        let settings = Settings {
            reference: Some(dir.path().join("expected.csv").display().to_string()),
            ..settings_for(dir.path(), "orders.csv")
        };
        let res = run_checkin(&settings);
        assert!(matches!(res, Err(CheckinError::ReferenceMismatch { .. })));
    }

    #[test]
    fn missing_column_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("orders.csv"),
            "First Name,Last Name,Seat\nAnn,Lee,A1\n",
        )
        .unwrap();
        let res = run_checkin(&settings_for(dir.path(), "orders.csv"));
        match res {
            Err(e @ CheckinError::MissingColumn { .. }) => {
                assert!(describe_error(&e).contains("Ticket I.D."));
            }
            x => panic!("unexpected result {:?}", x),
        }
    }

    #[test]
    fn describe_error_lists_the_causes() {
        let e = CheckinError::Report {
            source: ReportErrors::InvalidRules("empty status".to_string()),
        };
        assert_eq!(
            describe_error(&e),
            "Error computing the report: invalid report rules: empty status"
        );
    }
}
