// Outputs of the aggregated table: CSV, terminal table and JSON summary.

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::json;
use text_diff::print_diff;

use crate::checkin::config_reader::Settings;
use crate::checkin::io_common::simplify_file_name;
use crate::checkin::*;

pub const REPORT_HEADER: [&str; 4] = ["First Name", "Last Name", "Tickets_Ordered", "Seats"];
pub const NOTES_HEADER: &str = "Notes";

fn report_header(has_notes: bool) -> Vec<&'static str> {
    let mut header = REPORT_HEADER.to_vec();
    if has_notes {
        header.push(NOTES_HEADER);
    }
    header
}

fn report_row(r: &PatronRecord, has_notes: bool) -> Vec<String> {
    let mut row = vec![
        r.first_name.clone(),
        r.last_name.clone(),
        r.tickets_ordered.to_string(),
        r.seats_text(),
    ];
    if has_notes {
        row.push(r.notes_text());
    }
    row
}

pub fn write_report_csv<W: std::io::Write>(
    report: &PatronReport,
    has_notes: bool,
    w: W,
) -> CheckinResult<()> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(w);
    wtr.write_record(report_header(has_notes))
        .context(CsvWriteSnafu {})?;
    for r in report.records.iter() {
        wtr.write_record(report_row(r, has_notes))
            .context(CsvWriteSnafu {})?;
    }
    wtr.flush().context(WritingOutputSnafu { path: "csv" })?;
    Ok(())
}

pub fn report_csv_string(report: &PatronReport, has_notes: bool) -> CheckinResult<String> {
    let mut buf: Vec<u8> = Vec::new();
    write_report_csv(report, has_notes, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).to_string())
}

/// The aggregated table as aligned text, for the terminal.
pub fn format_report_table(report: &PatronReport, has_notes: bool) -> String {
    let header: Vec<String> = report_header(has_notes)
        .iter()
        .map(|s| s.to_string())
        .collect();
    let rows: Vec<Vec<String>> = report
        .records
        .iter()
        .map(|r| report_row(r, has_notes))
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows.iter() {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let format_line = |cells: &[String]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths.iter())
            .map(|(c, w)| format!("{:<width$}", c, width = *w))
            .collect();
        padded.join(" | ").trim_end().to_string()
    };

    let mut lines: Vec<String> = vec![format_line(&header)];
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    lines.push(rule.join("-+-"));
    for row in rows.iter() {
        lines.push(format_line(row));
    }
    lines.push(format!(
        "{} patrons, {} tickets",
        report.records.len(),
        report.total_tickets()
    ));
    lines.join("\n")
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub file: String,
    pub provider: String,
    pub title: String,
    #[serde(rename = "statusFilter")]
    pub status_filter: Option<String>,
}

pub fn build_summary_js(settings: &Settings, report: &PatronReport) -> JSValue {
    let c = OutputConfig {
        file: simplify_file_name(&settings.input_path),
        provider: format!("{:?}", settings.input_type).to_lowercase(),
        title: settings.title.clone(),
        status_filter: match &settings.rules.status_filter {
            StatusFilter::AllRows => None,
            StatusFilter::OnlyStatus(s) => Some(s.clone()),
        },
    };
    let patrons: Vec<JSValue> = report
        .records
        .iter()
        .map(|r| {
            json!({
                "firstName": r.first_name,
                "lastName": r.last_name,
                "ticketsOrdered": r.tickets_ordered,
                "seats": r.seats,
                "notes": r.notes,
                "ticketIds": r.ticket_ids,
            })
        })
        .collect();
    json!({
        "input": c,
        "counts": {
            "rowsRead": report.rows_read,
            "excludedStatus": report.rows_excluded_status,
            "excludedUnnamed": report.rows_excluded_unnamed,
            "patrons": report.records.len(),
            "tickets": report.total_tickets(),
        },
        "patrons": patrons,
    })
}

fn normalize_lines(s: &str) -> String {
    s.replace("\r\n", "\n").trim_end().to_string()
}

/// Compares the produced table with a reference CSV file.
pub fn check_reference(csv_text: &str, reference_path: &str) -> CheckinResult<()> {
    let reference = fs::read_to_string(reference_path).context(ReadingReferenceSnafu {
        path: reference_path,
    })?;
    let expected = normalize_lines(&reference);
    let computed = normalize_lines(csv_text);
    if expected != computed {
        warn!("Found differences with the reference table {:?}", reference_path);
        print_diff(expected.as_str(), computed.as_str(), "\n");
        return ReferenceMismatchSnafu {
            path: reference_path,
        }
        .fail();
    }
    info!("The report matches the reference {:?}", reference_path);
    Ok(())
}
