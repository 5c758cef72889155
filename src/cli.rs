//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::chart_report::ChartReport;
use crate::adapters::console_report::ConsoleReport;
use crate::adapters::console_report::tables::{render_bindings, render_columns};
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::error::AnalysisError;
use crate::domain::pipeline::{self, Analysis};
use crate::domain::settings::{Settings, build_settings};
use crate::domain::table::Table;
use crate::logging;
use crate::ports::data_port::TableSource;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(
    name = "sentitrade",
    about = "Trader performance versus market sentiment"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the full analysis (default)
    Analyze {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Load and resolve columns, print the bindings, write nothing
    Inspect {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        None => run_analyze(None),
        Some(Command::Analyze { config }) => run_analyze(config.as_deref()),
        Some(Command::Inspect { config }) => run_inspect(config.as_deref()),
    }
}

fn fail(err: &AnalysisError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

/// Read settings from `config` (or the default location) and validate them.
pub fn load_settings(config: Option<&Path>) -> Result<Settings, AnalysisError> {
    let adapter = FileConfigAdapter::discover(config)?;
    build_settings(&adapter)
}

/// Loader: read both inputs, printing each table's columns.
pub fn load_inputs(
    source: &dyn TableSource,
    settings: &Settings,
) -> Result<(Table, Table), AnalysisError> {
    let historical = source.load(&settings.historical_path, "historical")?;
    println!(
        "{}",
        render_columns("Columns in historical data", &historical.columns)
    );

    let sentiment = source.load(&settings.sentiment_path, "sentiment")?;
    println!(
        "{}",
        render_columns("Columns in Fear Greed Index", &sentiment.columns)
    );

    Ok((historical, sentiment))
}

/// Load, analyze and hand the result to every reporter in order.
pub fn run_pipeline(
    source: &dyn TableSource,
    reports: &[&dyn ReportPort],
    settings: &Settings,
) -> Result<Analysis, AnalysisError> {
    let (historical, sentiment) = load_inputs(source, settings)?;
    let analysis = pipeline::analyze(historical, sentiment, &settings.fields)?;

    for report in reports {
        report.write(&analysis)?;
    }

    Ok(analysis)
}

fn run_analyze(config: Option<&Path>) -> ExitCode {
    let settings = match load_settings(config) {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };
    logging::init(&settings.log_level);

    let source = CsvAdapter::with_delimiter(settings.delimiter);
    let console = ConsoleReport::new(settings.preview_rows);
    let charts = ChartReport::new(&settings.output_dir);

    let mut reports: Vec<&dyn ReportPort> = vec![&console];
    if settings.charts {
        reports.push(&charts);
    }

    match run_pipeline(&source, &reports, &settings) {
        Ok(analysis) => {
            if settings.charts {
                eprintln!("\nCharts written to: {}", charts.output_dir().display());
            }
            if !analysis.warnings.is_empty() {
                eprintln!("Completed with {} warning(s)", analysis.warnings.len());
            }
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

fn run_inspect(config: Option<&Path>) -> ExitCode {
    let settings = match load_settings(config) {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };
    logging::init(&settings.log_level);

    let source = CsvAdapter::with_delimiter(settings.delimiter);
    match run_pipeline(&source, &[], &settings) {
        Ok(analysis) => {
            println!("\n{}", render_bindings(&analysis.bindings));
            println!(
                "Joined rows: {} (historical rows: {})",
                analysis.joined.height(),
                analysis.historical.height()
            );
            println!("Summary groups: {}", analysis.summary.records.len());
            for warning in &analysis.warnings {
                println!("warning: {warning}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}
