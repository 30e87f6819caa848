use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;
use tracing::error;

use survey_insights::analytics::demographics::Dimension;
use survey_insights::commands::analytics::{
    analyze_survey, demographics, import_responses, report_from_source, segment_question,
    AnalyzeArgs, DemographicsArgs, ImportArgs, SegmentArgs, StoredReportArgs,
};
use survey_insights::config::{load_settings, InsightsSettings};
use survey_insights::logging::init_logging;
use survey_insights::report::tables::segment_table;
use survey_insights::report::types::ReportFormat;
use survey_insights::store::rest::RestSource;
use survey_insights::store::sqlite::SqliteStore;

#[derive(Parser, Debug)]
#[command(name = "survey-insights", version, about = "Survey response analytics and reports")]
struct Cli {
    /// Settings file (JSON). Created with defaults if missing.
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize every question of a survey export
    Analyze {
        #[arg(long)]
        survey: String,
        #[arg(long)]
        responses: String,
        #[arg(long, default_value = "markdown")]
        format: ReportFormat,
        #[arg(long)]
        out: Option<String>,
    },
    /// Respondent counts per demographic category
    Demographics {
        #[arg(long)]
        responses: String,
        #[arg(long)]
        dimension: Option<Dimension>,
    },
    /// One question's results split by a demographic dimension
    Segment {
        #[arg(long)]
        survey: String,
        #[arg(long)]
        responses: String,
        #[arg(long)]
        question: String,
        #[arg(long)]
        dimension: Dimension,
        /// Print the segment table instead of JSON
        #[arg(long)]
        table: bool,
    },
    /// Load survey and response exports into a local SQLite cache
    Import {
        #[arg(long)]
        db: String,
        #[arg(long)]
        survey: String,
        #[arg(long)]
        responses: String,
        #[arg(long)]
        survey_id: String,
        #[arg(long)]
        campaign_id: String,
    },
    /// Report on a stored campaign, from the SQLite cache or the hosted backend
    Report {
        /// SQLite cache to read from; the configured backend is used when omitted
        #[arg(long)]
        db: Option<String>,
        #[arg(long)]
        survey_id: String,
        #[arg(long)]
        campaign_id: String,
        #[arg(long, default_value = "markdown")]
        format: ReportFormat,
        #[arg(long)]
        out: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    let settings = match &cli.settings {
        Some(path) => match load_settings(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Unable to load settings from {}: {e}", path.display());
                process::exit(2);
            }
        },
        None => InsightsSettings::default(),
    };
    init_logging(&settings.log_level);

    if let Err(e) = run(cli.command, &settings) {
        error!("{e}");
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn run(command: Command, settings: &InsightsSettings) -> Result<(), String> {
    match command {
        Command::Analyze {
            survey,
            responses,
            format,
            out,
        } => {
            let to_stdout = out.is_none();
            let rendered = analyze_survey(
                settings,
                AnalyzeArgs {
                    survey_path: survey,
                    responses_path: responses,
                    format,
                    out_path: out,
                },
            )?;
            if to_stdout {
                println!("{rendered}");
            }
        }
        Command::Demographics {
            responses,
            dimension,
        } => {
            let out = demographics(
                settings,
                DemographicsArgs {
                    responses_path: responses,
                    dimension,
                },
            )?;
            println!("{}", to_json(&out)?);
        }
        Command::Segment {
            survey,
            responses,
            question,
            dimension,
            table,
        } => {
            let title = format!("{question} by {dimension}");
            let segments = segment_question(
                settings,
                SegmentArgs {
                    survey_path: survey,
                    responses_path: responses,
                    question,
                    dimension,
                },
            )?;
            if table {
                for row in segment_table(&title, &segments).grid() {
                    println!("{}", row.join("\t"));
                }
            } else {
                println!("{}", to_json(&segments)?);
            }
        }
        Command::Import {
            db,
            survey,
            responses,
            survey_id,
            campaign_id,
        } => {
            let out = import_responses(ImportArgs {
                db_path: db,
                survey_path: survey,
                responses_path: responses,
                survey_id,
                campaign_id,
            })?;
            println!("{}", to_json(&out)?);
        }
        Command::Report {
            db,
            survey_id,
            campaign_id,
            format,
            out,
        } => {
            let to_stdout = out.is_none();
            let args = StoredReportArgs {
                survey_id,
                campaign_id,
                format,
                out_path: out,
            };
            let rendered = match db {
                Some(db) => {
                    let store = SqliteStore::open(Path::new(&db)).map_err(|e| e.to_string())?;
                    report_from_source(&store, settings, args)?
                }
                None => {
                    let remote = RestSource::from_settings(settings).map_err(|e| e.to_string())?;
                    report_from_source(&remote, settings, args)?
                }
            };
            if to_stdout {
                println!("{rendered}");
            }
        }
    }
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("Serialization failed: {e}"))
}
