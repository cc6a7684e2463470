use clap::Parser;

/// This program turns an export of ticket orders into a patron check-in sheet.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file describing the input, the rules and the outputs.
    /// Relative paths inside this file are read from the directory of the file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) The ticket orders, one row per ticket. Setting this option overrides the path
    /// that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (csv or xlsx) The type of the input. By default, it is guessed from the extension of the file.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default: first worksheet) When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (file path, default Aggregated_Ticket_Report.csv) Where to write the aggregated table.
    #[clap(long, value_parser)]
    pub csv_out: Option<String>,

    /// (file path, default Patron_Checkin_List.pdf) Where to write the check-in sheet.
    #[clap(long, value_parser)]
    pub pdf_out: Option<String>,

    /// (file path, 'stdout' or empty) If specified, a summary of the report will be written in JSON
    /// format to the given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference CSV file with the expected aggregated table. If provided, checkin
    /// will fail when the computed table differs from it.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (default Paid) Only the rows with this status are counted, when the input has a status column.
    #[clap(long, value_parser)]
    pub paid_status: Option<String>,

    /// If passed as an argument, every row is counted whatever its status.
    #[clap(long, takes_value = false)]
    pub all_statuses: bool,

    /// (default "Patron Check-in List") The title printed at the top of the check-in sheet.
    #[clap(long, value_parser)]
    pub title: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
