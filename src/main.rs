use clap::Parser;
use log::{debug, info, warn};

mod args;
mod checkin;

use crate::args::Args;
use crate::checkin::config_reader::resolve_settings;
use crate::checkin::{describe_error, run_checkin};

fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
    debug!("args: {:?}", args);

    let res = resolve_settings(&args).and_then(|settings| run_checkin(&settings));

    match res {
        Ok(outcome) => info!(
            "Done: {} patrons, {} tickets, {} bytes of CSV, {} bytes of PDF",
            outcome.report.records.len(),
            outcome.report.total_tickets(),
            outcome.csv_text.len(),
            outcome.pdf_size
        ),
        Err(e) => {
            warn!("run failed: {:?}", e);
            eprintln!("An error occurred: {}", describe_error(&e));
            std::process::exit(1);
        }
    }
}
