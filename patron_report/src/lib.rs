mod config;
use log::{debug, info};

use std::collections::{HashMap, HashSet};

pub mod builder;
pub mod manual;

pub use crate::config::*;

// **** Private structures ****

// The grouping key. Names are trimmed and decoded before they enter the key.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
struct PatronKey {
    first_name: String,
    last_name: String,
}

// Why a row did not make it into the report.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
enum Exclusion {
    Status,
    Unnamed,
}

// Accumulates the rows of one patron. The sets mirror the vectors and only
// exist to keep the deduplication linear.
#[derive(Debug, Clone, Default)]
struct PatronAccumulator {
    tickets_ordered: u64,
    seats: Vec<String>,
    seen_seats: HashSet<String>,
    notes: Vec<String>,
    seen_notes: HashSet<String>,
    ticket_ids: Vec<String>,
}

impl PatronAccumulator {
    fn add(&mut self, order: &TicketOrder) {
        self.tickets_ordered += 1;
        push_unique(&mut self.seats, &mut self.seen_seats, &order.seat);
        if let Some(notes) = order.notes.as_deref() {
            push_unique(&mut self.notes, &mut self.seen_notes, notes);
        }
        let ticket_id = order.ticket_id.trim();
        if !ticket_id.is_empty() {
            self.ticket_ids.push(ticket_id.to_string());
        }
    }

    fn into_record(self, key: PatronKey) -> PatronRecord {
        PatronRecord {
            first_name: key.first_name,
            last_name: key.last_name,
            tickets_ordered: self.tickets_ordered,
            seats: self.seats,
            notes: self.notes,
            ticket_ids: self.ticket_ids,
        }
    }
}

fn push_unique(values: &mut Vec<String>, seen: &mut HashSet<String>, value: &str) {
    let v = value.trim();
    if v.is_empty() || seen.contains(v) {
        return;
    }
    seen.insert(v.to_string());
    values.push(v.to_string());
}

/// Replaces the HTML entity `&amp;` by `&`.
///
/// Some ticketing platforms export names such as `Smith &amp; Jones`.
/// Only this entity is decoded: `&amp;lt;` becomes `&lt;`, not `<`.
pub fn decode_name(name: &str) -> String {
    name.replace("&amp;", "&")
}

/// Groups the ticket orders by patron.
///
/// Arguments:
/// * `orders` the tickets, in the order of the export. This order decides the order
/// of the seats and the notes within each patron record.
/// * `rules` which rows are counted and how names are cleaned up.
///
/// The records are sorted by last name, then first name. Running it twice on the
/// same orders gives the same report.
pub fn run_report(
    orders: &[TicketOrder],
    rules: &ReportRules,
) -> Result<PatronReport, ReportErrors> {
    info!("run_report: processing {:?} orders, rules: {:?}", orders.len(), rules);
    validate_rules(rules)?;

    let mut groups: HashMap<PatronKey, PatronAccumulator> = HashMap::new();
    let mut rows_excluded_status: u64 = 0;
    let mut rows_excluded_unnamed: u64 = 0;

    for (idx, order) in orders.iter().enumerate() {
        let key = match check_order(order, rules) {
            Ok(key) => key,
            Err(Exclusion::Status) => {
                debug!(
                    "run_report: {}: skipping status {:?}",
                    order_position(idx, order),
                    order.status
                );
                rows_excluded_status += 1;
                continue;
            }
            Err(Exclusion::Unnamed) => {
                debug!(
                    "run_report: {}: skipping unnamed order {:?}",
                    order_position(idx, order),
                    order
                );
                rows_excluded_unnamed += 1;
                continue;
            }
        };
        groups.entry(key).or_default().add(order);
    }

    let mut keyed: Vec<(PatronKey, PatronAccumulator)> = groups.into_iter().collect();
    keyed.sort_by(|(k1, _), (k2, _)| {
        (&k1.last_name, &k1.first_name).cmp(&(&k2.last_name, &k2.first_name))
    });
    let records: Vec<PatronRecord> = keyed
        .into_iter()
        .map(|(key, acc)| acc.into_record(key))
        .collect();

    info!(
        "run_report: {} patrons, {} orders excluded by status, {} unnamed orders",
        records.len(),
        rows_excluded_status,
        rows_excluded_unnamed
    );

    Ok(PatronReport {
        records,
        rows_read: orders.len() as u64,
        rows_excluded_status,
        rows_excluded_unnamed,
    })
}

// Where an order comes from, for the logs: its line in the export when the
// reader recorded it, its rank among the orders otherwise.
fn order_position(idx: usize, order: &TicketOrder) -> String {
    match order.source_line {
        Some(line) => format!("line {}", line),
        None => format!("order {}", idx + 1),
    }
}

fn validate_rules(rules: &ReportRules) -> Result<(), ReportErrors> {
    match &rules.status_filter {
        StatusFilter::OnlyStatus(s) if s.trim().is_empty() => Err(ReportErrors::InvalidRules(
            "the status filter needs a non-empty status".to_string(),
        )),
        _ => Ok(()),
    }
}

// Returns the grouping key of a counted order.
fn check_order(order: &TicketOrder, rules: &ReportRules) -> Result<PatronKey, Exclusion> {
    // Exports without a status column have no status to filter on.
    if let (StatusFilter::OnlyStatus(expected), Some(status)) =
        (&rules.status_filter, order.status.as_deref())
    {
        if status.trim() != expected.trim() {
            return Err(Exclusion::Status);
        }
    }

    let first_name = order.first_name.trim();
    let last_name = order.last_name.trim();
    let (first_name, last_name) = if rules.decode_entities {
        (decode_name(first_name), decode_name(last_name))
    } else {
        (first_name.to_string(), last_name.to_string())
    };

    if rules.skip_unnamed && (first_name.is_empty() || last_name.is_empty()) {
        return Err(Exclusion::Unnamed);
    }

    Ok(PatronKey {
        first_name,
        last_name,
    })
}
