pub use crate::config::*;

/// A builder for adding ticket orders one at a time.
///
/// ```
/// pub use patron_report::builder::Builder;
/// pub use patron_report::ReportRules;
/// # use patron_report::ReportErrors;
///
/// let mut builder = Builder::new(&ReportRules::paid_only())?;
///
/// builder.add_simple("Anna", "Smith", "A12")?;
/// builder.add_simple("Anna", "Smith", "A13")?;
///
/// let report = builder.build()?;
/// assert_eq!(report.records[0].tickets_ordered, 2);
///
/// # Ok::<(), ReportErrors>(())
/// ```
pub struct Builder {
    pub(crate) _rules: ReportRules,
    pub(crate) _orders: Vec<TicketOrder>,
}

impl Builder {
    pub fn new(rules: &ReportRules) -> Result<Builder, ReportErrors> {
        Ok(Builder {
            _rules: rules.clone(),
            _orders: Vec::new(),
        })
    }

    /// Adds a ticket without an id, a status or notes.
    pub fn add_simple(
        &mut self,
        first_name: &str,
        last_name: &str,
        seat: &str,
    ) -> Result<(), ReportErrors> {
        self.add_order(&TicketOrder::new(first_name, last_name, "", seat))
    }

    pub fn add_order(&mut self, order: &TicketOrder) -> Result<(), ReportErrors> {
        self._orders.push(order.clone());
        Ok(())
    }

    pub fn num_orders(&self) -> usize {
        self._orders.len()
    }

    /// Runs the aggregation on all the orders added so far.
    pub fn build(&self) -> Result<PatronReport, ReportErrors> {
        crate::run_report(&self._orders, &self._rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_twice() {
        let mut builder = Builder::new(&ReportRules::ALL_ROWS).unwrap();
        builder.add_simple("Ann", "Lee", "A1").unwrap();
        builder
            .add_order(&TicketOrder {
                status: Some("Paid".to_string()),
                notes: Some("Aisle".to_string()),
                ..TicketOrder::new("Bo", "Ray", "T7", "A2")
            })
            .unwrap();
        assert_eq!(builder.num_orders(), 2);
        let r1 = builder.build().unwrap();
        let r2 = builder.build().unwrap();
        assert_eq!(r1, r2);
        assert_eq!(r1.records[1].notes_text(), "Aisle");
    }
}
