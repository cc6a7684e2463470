// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// One purchased ticket, as read from the box office export.
///
/// Readers produce one of these per row. The status and the notes are only
/// present when the export has the corresponding columns.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct TicketOrder {
    pub first_name: String,
    pub last_name: String,
    pub ticket_id: String,
    pub seat: String,
    /// None when the export has no status column.
    pub status: Option<String>,
    pub notes: Option<String>,
    /// Line of the row in the export, when known. Only used in the logs.
    pub source_line: Option<u64>,
}

impl TicketOrder {
    pub fn new(first_name: &str, last_name: &str, ticket_id: &str, seat: &str) -> TicketOrder {
        TicketOrder {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            ticket_id: ticket_id.to_string(),
            seat: seat.to_string(),
            status: None,
            notes: None,
            source_line: None,
        }
    }
}

// ******** Output data structures *********

/// All the tickets of one patron.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PatronRecord {
    pub first_name: String,
    pub last_name: String,
    pub tickets_ordered: u64,
    /// Unique seat labels, in order of first appearance.
    pub seats: Vec<String>,
    /// Unique non-empty notes, in order of first appearance.
    pub notes: Vec<String>,
    pub ticket_ids: Vec<String>,
}

impl PatronRecord {
    pub const LIST_SEPARATOR: &'static str = ", ";

    /// The name as printed on the check-in sheet.
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }

    pub fn seats_text(&self) -> String {
        self.seats.join(PatronRecord::LIST_SEPARATOR)
    }

    pub fn notes_text(&self) -> String {
        self.notes.join(PatronRecord::LIST_SEPARATOR)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct PatronReport {
    /// Sorted by last name, then first name.
    pub records: Vec<PatronRecord>,
    pub rows_read: u64,
    pub rows_excluded_status: u64,
    pub rows_excluded_unnamed: u64,
}

impl PatronReport {
    pub fn total_tickets(&self) -> u64 {
        self.records.iter().map(|r| r.tickets_ordered).sum()
    }
}

/// Errors that prevent the report from being computed.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ReportErrors {
    InvalidRules(String),
}

impl Error for ReportErrors {}

impl Display for ReportErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportErrors::InvalidRules(msg) => write!(f, "invalid report rules: {}", msg),
        }
    }
}

// ********* Configuration **********

/// Which rows are counted when the export carries a status column.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum StatusFilter {
    AllRows,
    /// Only rows with exactly this status (after trimming) are counted.
    OnlyStatus(String),
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ReportRules {
    pub status_filter: StatusFilter,
    /// Turns the `&amp;` found in some web exports back into `&`.
    pub decode_entities: bool,
    /// Drops the rows with an empty first or last name.
    pub skip_unnamed: bool,
}

impl ReportRules {
    pub const PAID_STATUS: &'static str = "Paid";

    /// Counts every row, whatever its status.
    pub const ALL_ROWS: ReportRules = ReportRules {
        status_filter: StatusFilter::AllRows,
        decode_entities: true,
        skip_unnamed: true,
    };

    /// The default rules, only counting the paid tickets.
    pub fn paid_only() -> ReportRules {
        ReportRules {
            status_filter: StatusFilter::OnlyStatus(ReportRules::PAID_STATUS.to_string()),
            ..ReportRules::ALL_ROWS
        }
    }
}

impl Default for ReportRules {
    fn default() -> Self {
        ReportRules::paid_only()
    }
}
