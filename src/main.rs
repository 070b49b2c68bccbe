use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use comms_analysis::config::AppConfig;
use comms_analysis::context::ContextWindow;
use comms_analysis::db::Database;
use comms_analysis::engine::AnalysisEngine;
use comms_analysis::file_writer;
use comms_analysis::logging::{init_logging, OperationTimer};
use comms_analysis::metrics::MetricsCollector;
use comms_analysis::models::{Direction, Message, NewCase, OutputFormat};
use comms_analysis::repository::{self, JsonFileSource};
use comms_analysis::service::{AnalysisService, CancelToken};
use comms_analysis::validation::InputValidator;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Extra configuration file layered over the defaults
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Write a daily rolling JSON log next to this path
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a case for one pair of parties
    CreateCase {
        /// Display name of the case
        #[arg(short, long)]
        name: String,

        /// Label of the case owner (the `sent` side)
        #[arg(short, long, default_value = "me")]
        user: String,

        /// Label of the other party (the `received` side)
        #[arg(short = 'o', long)]
        contact: String,

        /// First day covered (YYYY-MM-DD)
        #[arg(short, long)]
        start_date: Option<String>,

        /// Last day covered (YYYY-MM-DD)
        #[arg(short, long)]
        end_date: Option<String>,
    },
    /// Load a JSON array of message and call records into a case
    Ingest {
        /// Target case
        #[arg(long)]
        case: i64,

        /// JSON file with input records
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Recompute all analyses and daily summaries of a case
    Analyze {
        /// Target case
        #[arg(long)]
        case: i64,

        /// Override the configured chunk size in days
        #[arg(long)]
        chunk_days: Option<u32>,
    },
    /// Show daily summaries, gaps and health, optionally exporting them
    Summary {
        /// Target case
        #[arg(long)]
        case: i64,

        /// Export format (csv or json)
        #[arg(short, long)]
        format: Option<String>,

        /// Export directory; nothing is written when omitted
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// Classify a single message without touching the database
    Classify {
        /// Message body
        text: String,

        /// Preceding messages used as context, oldest first
        #[arg(long = "before")]
        before: Vec<String>,

        /// Following messages used as context
        #[arg(long = "after")]
        after: Vec<String>,
    },
    /// Delete a case with all its messages and derived data
    DeleteCase {
        /// Target case
        #[arg(long)]
        case: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = AppConfig::load_from(cli.config.as_deref()).context("Failed to load configuration")?;

    // Initialize logging; the guard flushes the file log on exit
    let log_file = cli
        .log_file
        .clone()
        .or_else(|| config.logging.file_path.as_ref().map(PathBuf::from));
    let _log_guard = init_logging(
        Some(cli.log_level.as_deref().unwrap_or(&config.logging.level)),
        log_file.as_deref(),
        config.logging.format == "json",
    )?;

    if let Err(e) = MetricsCollector::init() {
        warn!("Metrics disabled: {}", e);
    }

    info!("Starting comms-analysis");

    match cli.command {
        Commands::CreateCase {
            name,
            user,
            contact,
            start_date,
            end_date,
        } => create_case(&config, &name, &user, &contact, start_date.as_deref(), end_date.as_deref())?,
        Commands::Ingest { case, input } => ingest(&config, case, &input).await?,
        Commands::Analyze { case, chunk_days } => {
            if let Some(days) = chunk_days {
                config.analysis.chunk_days = days;
                config.validate()?;
            }
            analyze(&config, case).await?;
        }
        Commands::Summary {
            case,
            format,
            output_dir,
        } => summary(&config, case, format.as_deref(), output_dir.as_deref())?,
        Commands::Classify { text, before, after } => classify(&config, &text, &before, &after)?,
        Commands::DeleteCase { case } => delete_case(&config, case)?,
    }

    Ok(())
}

fn open_database(config: &AppConfig) -> Result<Database> {
    Database::open(&config.database)
        .with_context(|| format!("Failed to open database at {}", config.database.url))
}

fn build_engine(config: &AppConfig) -> Result<AnalysisEngine> {
    AnalysisEngine::standard(config.analysis.filter_settings(), config.analysis.worker_threads)
        .context("Failed to compile pattern rules")
}

/// Create a case and print its id
fn create_case(
    config: &AppConfig,
    name: &str,
    user: &str,
    contact: &str,
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> Result<()> {
    InputValidator::validate_label("case name", name)?;
    InputValidator::validate_label("user label", user)?;
    InputValidator::validate_label("contact label", contact)?;

    let start_date = start_date.map(InputValidator::parse_date).transpose()?;
    let end_date = end_date.map(InputValidator::parse_date).transpose()?;
    InputValidator::validate_date_range(start_date, end_date)?;

    let db = open_database(config)?;
    let case = db.create_case(&NewCase {
        name: InputValidator::sanitize_text(name),
        user_label: InputValidator::sanitize_text(user),
        contact_label: InputValidator::sanitize_text(contact),
        start_date,
        end_date,
    })?;

    info!(case_id = case.id, "Created case");
    println!("{}", case.id);
    Ok(())
}

/// Load input records from a JSON file
async fn ingest(config: &AppConfig, case_id: i64, input: &Path) -> Result<()> {
    InputValidator::validate_file_path(input)?;
    let db = open_database(config)?;
    let source = JsonFileSource::new(input);

    let timer = OperationTimer::for_case("ingest", case_id);
    let report = repository::ingest(&db, case_id, &source)
        .await
        .with_context(|| format!("Failed to ingest {}", input.display()))?;
    timer.finish();

    println!(
        "Stored {} messages and {} calls ({} rejected)",
        report.messages, report.calls, report.rejected
    );
    Ok(())
}

/// Recompute a case; Ctrl-C cancels between chunks and keeps the old results
async fn analyze(config: &AppConfig, case_id: i64) -> Result<()> {
    let db = Arc::new(open_database(config)?);
    let service = Arc::new(AnalysisService::new(db, build_engine(config)?, &config.analysis));

    let cancel = CancelToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received; stopping after the current chunk");
            on_interrupt.cancel();
        }
    });

    let report = service.recompute_in_background(case_id, cancel).await?;
    println!(
        "Analyzed {} messages into {} daily summaries ({} chunks, {} ms)",
        report.analyses, report.summaries, report.chunks, report.duration_ms
    );
    Ok(())
}

/// Print the case report and optionally export it
fn summary(config: &AppConfig, case_id: i64, format: Option<&str>, output_dir: Option<&Path>) -> Result<()> {
    let db = Arc::new(open_database(config)?);
    let service = AnalysisService::new(Arc::clone(&db), build_engine(config)?, &config.analysis);
    let report = service.case_report(case_id)?;

    println!("{}", serde_json::to_string_pretty(&report)?);

    if let Some(dir) = output_dir {
        InputValidator::validate_file_path(dir)?;
        let format: OutputFormat = match format {
            Some(f) => f.parse()?,
            None => config.export_format()?,
        };
        let analyses = db.analyses_for_case(case_id)?;
        let files = file_writer::export_case(case_id, &analyses, &report.summaries, format, dir)?;
        MetricsCollector::default().record_export(analyses.len() + report.summaries.len(), format.extension());
        for file in files {
            info!("Wrote {}", file.display());
        }
    }

    Ok(())
}

/// Classify one message, with optional surrounding context
fn classify(config: &AppConfig, text: &str, before: &[String], after: &[String]) -> Result<()> {
    let engine = build_engine(config)?;

    // context alternates parties walking outward from the candidate
    let mut arena: Vec<Message> = Vec::with_capacity(before.len() + after.len() + 1);
    let mut id = 0;
    for (i, body) in before.iter().enumerate() {
        id += 1;
        let direction = if (before.len() - i) % 2 == 1 { Direction::Received } else { Direction::Sent };
        arena.push(Message::text(id, direction, body));
    }
    let center = arena.len();
    id += 1;
    arena.push(Message::text(id, Direction::Sent, text));
    for (i, body) in after.iter().enumerate() {
        id += 1;
        let direction = if i % 2 == 0 { Direction::Received } else { Direction::Sent };
        arena.push(Message::text(id, direction, body));
    }

    let window = ContextWindow::around(&arena, center, engine.context_radius())
        .context("Candidate outside the context window")?;
    let analysis = engine.classify(&window);
    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}

/// Delete a case
fn delete_case(config: &AppConfig, case_id: i64) -> Result<()> {
    let db = open_database(config)?;
    if db.delete_case(case_id)? {
        info!(case_id, "Deleted case");
        println!("Deleted case {case_id}");
    } else {
        warn!(case_id, "No such case");
        println!("Case {case_id} not found");
    }
    Ok(())
}
