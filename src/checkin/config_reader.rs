use crate::args::Args;
use crate::checkin::io_common::InputType;
use crate::checkin::*;

use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_TITLE: &str = "Patron Check-in List";
pub const DEFAULT_CSV_OUT: &str = "Aggregated_Ticket_Report.csv";
pub const DEFAULT_PDF_OUT: &str = "Patron_Checkin_List.pdf";

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    pub title: Option<String>,
    #[serde(rename = "csvPath")]
    pub csv_path: Option<String>,
    #[serde(rename = "pdfPath")]
    pub pdf_path: Option<String>,
    #[serde(rename = "summaryPath")]
    pub summary_path: Option<String>,
}

/// The header names of the columns in the export.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    #[serde(rename = "ticketId")]
    pub ticket_id: String,
    pub seat: String,
    pub status: String,
    pub notes: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        ColumnNames {
            first_name: "First Name".to_string(),
            last_name: "Last Name".to_string(),
            ticket_id: "Ticket I.D.".to_string(),
            seat: "Seat".to_string(),
            status: "Status".to_string(),
            notes: "Notes".to_string(),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputSource {
    pub provider: Option<String>,
    #[serde(rename = "filePath")]
    pub file_path: Option<String>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
    pub columns: Option<ColumnNames>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(rename = "paidStatus")]
    pub paid_status: Option<String>,
    #[serde(rename = "onlyPaid")]
    pub only_paid: Option<bool>,
    #[serde(rename = "decodeEntities")]
    pub decode_entities: Option<bool>,
    #[serde(rename = "skipUnnamed")]
    pub skip_unnamed: Option<bool>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckinConfig {
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
    #[serde(rename = "inputSource", default)]
    pub input_source: InputSource,
    #[serde(default)]
    pub rules: RulesConfig,
}

/// The settings of one run, once the command line and the configuration file
/// have been merged.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Settings {
    pub input_path: String,
    pub input_type: InputType,
    pub excel_worksheet_name: Option<String>,
    pub columns: ColumnNames,
    pub rules: ReportRules,
    pub title: String,
    pub csv_out: String,
    pub pdf_out: String,
    pub summary_out: Option<String>,
    pub reference: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            input_path: String::new(),
            input_type: InputType::Csv,
            excel_worksheet_name: None,
            columns: ColumnNames::default(),
            rules: ReportRules::paid_only(),
            title: DEFAULT_TITLE.to_string(),
            csv_out: DEFAULT_CSV_OUT.to_string(),
            pdf_out: DEFAULT_PDF_OUT.to_string(),
            summary_out: None,
            reference: None,
        }
    }
}

pub fn read_config(path: &str) -> CheckinResult<CheckinConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    debug!("read_config: content: {:?}", contents);
    let config: CheckinConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    Ok(config)
}

fn rules_from_config(rc: &RulesConfig) -> ReportRules {
    let status_filter = if rc.only_paid.unwrap_or(true) {
        StatusFilter::OnlyStatus(
            rc.paid_status
                .clone()
                .unwrap_or_else(|| ReportRules::PAID_STATUS.to_string()),
        )
    } else {
        StatusFilter::AllRows
    };
    ReportRules {
        status_filter,
        decode_entities: rc.decode_entities.unwrap_or(true),
        skip_unnamed: rc.skip_unnamed.unwrap_or(true),
    }
}

// Paths in the configuration file are relative to the file itself.
fn resolve_path(root: Option<&Path>, p: &str) -> String {
    match root {
        Some(r) if Path::new(p).is_relative() => r.join(p).display().to_string(),
        _ => p.to_string(),
    }
}

/// Merges the command line with the configuration file, if any.
/// The command line wins.
pub fn resolve_settings(args: &Args) -> CheckinResult<Settings> {
    let config = match args.config.as_deref() {
        Some(p) => read_config(p)?,
        None => CheckinConfig::default(),
    };
    info!("config: {:?}", config);
    let root: Option<&Path> = args.config.as_deref().and_then(|p| Path::new(p).parent());
    merge_settings(args, &config, root)
}

fn merge_settings(
    args: &Args,
    config: &CheckinConfig,
    root: Option<&Path>,
) -> CheckinResult<Settings> {
    let input_path = match (&args.input, &config.input_source.file_path) {
        (Some(p), _) => p.clone(),
        (None, Some(p)) => resolve_path(root, p),
        (None, None) => return MissingInputSnafu {}.fail(),
    };

    let input_type = match args
        .input_type
        .as_deref()
        .or(config.input_source.provider.as_deref())
    {
        Some(s) => InputType::parse(s)?,
        None => InputType::from_path(&input_path),
    };

    let mut rules = rules_from_config(&config.rules);
    if args.all_statuses {
        rules.status_filter = StatusFilter::AllRows;
    } else if let Some(s) = args.paid_status.as_deref() {
        rules.status_filter = StatusFilter::OnlyStatus(s.to_string());
    }

    let os = &config.output_settings;
    let csv_out = match (&args.csv_out, &os.csv_path) {
        (Some(p), _) => p.clone(),
        (None, Some(p)) => resolve_path(root, p),
        (None, None) => DEFAULT_CSV_OUT.to_string(),
    };
    let pdf_out = match (&args.pdf_out, &os.pdf_path) {
        (Some(p), _) => p.clone(),
        (None, Some(p)) => resolve_path(root, p),
        (None, None) => DEFAULT_PDF_OUT.to_string(),
    };
    let summary_out = match (&args.out, &os.summary_path) {
        (Some(p), _) if p.is_empty() => None,
        (Some(p), _) => Some(p.clone()),
        (None, Some(p)) if p == "stdout" => Some(p.clone()),
        (None, Some(p)) => Some(resolve_path(root, p)),
        (None, None) => None,
    };

    Ok(Settings {
        input_path,
        input_type,
        excel_worksheet_name: args
            .excel_worksheet_name
            .clone()
            .or_else(|| config.input_source.excel_worksheet_name.clone()),
        columns: config.input_source.columns.clone().unwrap_or_default(),
        rules,
        title: args
            .title
            .clone()
            .or_else(|| os.title.clone())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        csv_out,
        pdf_out,
        summary_out,
        reference: args.reference.clone(),
    })
}
