//! Sentinel CLI - command-line interface for Quiz Sentinel
//!
//! Commands:
//! - analyze: Score a quiz session (or a bare event stream) and print the report
//! - validate: Check an event stream for ordering and symbol problems
//! - config: Print the effective detector configuration
//! - doctor: Diagnose configuration and input plumbing

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use quiz_sentinel::encoder::SessionReport;
use quiz_sentinel::schema::{
    parse_events, parse_session, validate_events, ParseMode, QuizSession, ValidationIssue,
};
use quiz_sentinel::{AnalysisError, DetectorConfig, SessionAnalyzer, PRODUCER_NAME, SENTINEL_VERSION};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Sentinel - heuristic bot detection for timed quizzes
#[derive(Parser)]
#[command(name = "sentinel")]
#[command(version = SENTINEL_VERSION)]
#[command(about = "Classify quiz interaction streams as human or automated", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a session and print the report
    Analyze {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "session")]
        input_format: InputFormat,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        output_format: OutputFormat,

        /// Detector configuration file (partial JSON allowed)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Correct answers (event-stream input only)
        #[arg(long)]
        score: Option<u32>,

        /// Questions in the quiz (event-stream input only)
        #[arg(long)]
        total_questions: Option<u32>,

        /// Quiz start in epoch ms (event-stream input; defaults to the first event)
        #[arg(long)]
        started_at_ms: Option<i64>,

        /// Submission time in epoch ms (defaults to the session's or now)
        #[arg(long)]
        submitted_at_ms: Option<i64>,

        /// Reject streams with backwards timestamps
        #[arg(long)]
        strict: bool,
    },

    /// Validate an event stream
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the effective detector configuration
    Config {
        /// Configuration file to merge over the defaults
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Diagnose configuration and input plumbing
    Doctor {
        /// Check a configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum InputFormat {
    /// QuizSession document with score, questions and events
    Session,
    /// JSON array of events
    Json,
    /// Newline-delimited JSON (one event per line)
    Ndjson,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Compact JSON report
    Json,
    /// Pretty-printed JSON report
    JsonPretty,
    /// Human-readable summary
    Text,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e)).unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = "quiz_sentinel=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn run(cli: Cli) -> Result<(), SentinelCliError> {
    match cli.command {
        Commands::Analyze {
            input,
            output,
            input_format,
            output_format,
            config,
            score,
            total_questions,
            started_at_ms,
            submitted_at_ms,
            strict,
        } => {
            let overrides = SessionOverrides {
                score,
                total_questions,
                started_at_ms,
                submitted_at_ms,
            };
            cmd_analyze(
                &input,
                &output,
                input_format,
                output_format,
                config.as_deref(),
                overrides,
                strict,
            )
        }

        Commands::Validate {
            input,
            input_format,
            json,
        } => cmd_validate(&input, input_format, json),

        Commands::Config { config } => cmd_config(config.as_deref()),

        Commands::Doctor { config, json } => cmd_doctor(config.as_deref(), json),
    }
}

/// Session fields supplied on the command line
struct SessionOverrides {
    score: Option<u32>,
    total_questions: Option<u32>,
    started_at_ms: Option<i64>,
    submitted_at_ms: Option<i64>,
}

fn cmd_analyze(
    input: &Path,
    output: &Path,
    input_format: InputFormat,
    output_format: OutputFormat,
    config: Option<&Path>,
    overrides: SessionOverrides,
    strict: bool,
) -> Result<(), SentinelCliError> {
    let analyzer = SessionAnalyzer::with_config(load_config(config)?)?.strict(strict);
    let input_data = read_input(input)?;

    let session = match input_format {
        InputFormat::Session => {
            let mut session = parse_session(&input_data)?;
            if overrides.submitted_at_ms.is_some() {
                session.submitted_at_ms = overrides.submitted_at_ms;
            }
            session
        }
        InputFormat::Json | InputFormat::Ndjson => {
            let mode = if strict {
                ParseMode::Strict
            } else {
                ParseMode::Lenient
            };
            let events = parse_events(&input_data, mode)?;
            let total_questions = overrides
                .total_questions
                .ok_or(SentinelCliError::MissingArgument("--total-questions"))?;
            if total_questions == 0 {
                return Err(SentinelCliError::MissingArgument("--total-questions (>= 1)"));
            }
            let started_at_ms = overrides
                .started_at_ms
                .or_else(|| events.first().map(|e| e.timestamp))
                .ok_or(SentinelCliError::MissingArgument("--started-at-ms"))?;

            QuizSession {
                session_id: String::new(),
                score: overrides.score.unwrap_or(0),
                total_questions,
                started_at_ms,
                submitted_at_ms: overrides.submitted_at_ms,
                events,
            }
        }
    };

    info!(events = session.events.len(), "analyzing session");
    let verdict = analyzer.analyze_session(&session)?;
    let report = analyzer
        .encoder()
        .encode(&session.session_id, Some(session.started_at_ms), &verdict);

    let output_data = format_output(&report, output_format)?;
    if output.to_string_lossy() == "-" {
        print!("{}", output_data);
    } else {
        fs::write(output, output_data)?;
    }

    Ok(())
}

fn cmd_validate(input: &Path, input_format: InputFormat, json: bool) -> Result<(), SentinelCliError> {
    let input_data = read_input(input)?;
    let events = match input_format {
        InputFormat::Session => parse_session(&input_data)?.events,
        InputFormat::Json | InputFormat::Ndjson => parse_events(&input_data, ParseMode::Strict)?,
    };

    let report = validate_events(&events);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total events:   {}", report.total_events);
        println!("Unknown kinds:  {}", report.unknown_events);
        println!("Span:           {:.1}s", report.span_ms() as f64 / 1000.0);

        if !report.issues.is_empty() {
            println!("\nIssues:");
            for issue in &report.issues {
                match issue {
                    ValidationIssue::NonMonotonic {
                        index,
                        previous,
                        timestamp,
                    } => println!("  - index {index}: timestamp {timestamp} before {previous}"),
                    ValidationIssue::UnknownKind { index } => {
                        println!("  - index {index}: unknown event type")
                    }
                    ValidationIssue::NegativeTimestamp { index, timestamp } => {
                        println!("  - index {index}: negative timestamp {timestamp}")
                    }
                }
            }
        }
    }

    let blocking = report
        .issues
        .iter()
        .filter(|i| !matches!(i, ValidationIssue::UnknownKind { .. }))
        .count();
    if blocking > 0 {
        Err(SentinelCliError::ValidationFailed(blocking))
    } else {
        Ok(())
    }
}

fn cmd_config(config: Option<&Path>) -> Result<(), SentinelCliError> {
    let config = load_config(config)?;
    println!("{}", config.to_json()?);
    Ok(())
}

fn cmd_doctor(config: Option<&Path>, json: bool) -> Result<(), SentinelCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "sentinel_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Sentinel version {}", SENTINEL_VERSION),
    });

    if let Some(config_path) = config {
        if config_path.exists() {
            let check = match fs::read_to_string(config_path) {
                Ok(content) => match DetectorConfig::from_json(&content) {
                    Ok(cfg) => DoctorCheck {
                        name: "config".to_string(),
                        status: CheckStatus::Ok,
                        message: format!("Configuration valid (cell width {} ms)", cfg.cell_width_ms),
                    },
                    Err(e) => DoctorCheck {
                        name: "config".to_string(),
                        status: CheckStatus::Error,
                        message: e.to_string(),
                    },
                },
                Err(e) => DoctorCheck {
                    name: "config".to_string(),
                    status: CheckStatus::Error,
                    message: format!("Cannot read config file: {}", e),
                },
            };
            checks.push(check);
        } else {
            checks.push(DoctorCheck {
                name: "config".to_string(),
                status: CheckStatus::Warning,
                message: "Config file does not exist; defaults will be used".to_string(),
            });
        }
    }

    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a TTY (pass --input <file>)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe (--input - ready)".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: SENTINEL_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Sentinel Doctor Report");
        println!("======================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");
        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(SentinelCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

// Helper functions

fn read_input(input: &Path) -> Result<String, SentinelCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn load_config(path: Option<&Path>) -> Result<DetectorConfig, SentinelCliError> {
    match path {
        Some(path) => Ok(DetectorConfig::from_json(&fs::read_to_string(path)?)?),
        None => Ok(DetectorConfig::default()),
    }
}

fn format_output(report: &SessionReport, format: OutputFormat) -> Result<String, SentinelCliError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(report)? + "\n"),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(report)? + "\n"),
        OutputFormat::Text => {
            let verdict = &report.verdict;
            let mut out = String::new();
            out.push_str(&format!(
                "{} (score {:.1}%)\n{}\n{}\n",
                verdict.label, verdict.weighted_score_pct, verdict.classification, verdict.details
            ));
            out.push_str(&format!(
                "Quiz: {}/{} in {:.0}s ({:.1}s per question)\n",
                report.quiz.score,
                report.quiz.total_questions,
                report.quiz.total_time_sec,
                report.quiz.avg_time_per_question_sec
            ));
            out.push_str(&format!(
                "Cells: {} total, {} valid, {:.1}% suspicious, {:.1}% caution\n",
                report.cell_stats.total_cells,
                report.cell_stats.valid_cells,
                report.cell_stats.suspicious_pct,
                report.cell_stats.caution_pct
            ));
            for cell in &report.cells {
                out.push_str(&format!(
                    "  #{:<3} {:>6.1}s-{:<6.1}s {:>4} events  {}  => {}\n",
                    cell.index, cell.start_sec, cell.end_sec, cell.event_count, cell.token, cell.verdict
                ));
            }
            Ok(out)
        }
    }
}

// Error types

#[derive(Debug)]
enum SentinelCliError {
    Io(io::Error),
    Analysis(AnalysisError),
    Json(serde_json::Error),
    MissingArgument(&'static str),
    ValidationFailed(usize),
    DoctorFailed,
}

impl From<io::Error> for SentinelCliError {
    fn from(e: io::Error) -> Self {
        SentinelCliError::Io(e)
    }
}

impl From<AnalysisError> for SentinelCliError {
    fn from(e: AnalysisError) -> Self {
        SentinelCliError::Analysis(e)
    }
}

impl From<serde_json::Error> for SentinelCliError {
    fn from(e: serde_json::Error) -> Self {
        SentinelCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<String>,
}

impl From<SentinelCliError> for CliError {
    fn from(e: SentinelCliError) -> Self {
        match e {
            SentinelCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            SentinelCliError::Analysis(AnalysisError::InvalidConfig(msg)) => CliError {
                code: "CONFIG_ERROR".to_string(),
                message: msg,
                hint: Some("Run 'sentinel config' to see the defaults".to_string()),
            },
            SentinelCliError::Analysis(e @ AnalysisError::NonMonotonicTimestamps { .. }) => {
                CliError {
                    code: "VALIDATION_ERROR".to_string(),
                    message: e.to_string(),
                    hint: Some("Run 'sentinel validate' for details, or drop --strict".to_string()),
                }
            }
            SentinelCliError::Analysis(e) => CliError {
                code: "PARSE_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Ensure input matches the chosen --input-format".to_string()),
            },
            SentinelCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            SentinelCliError::MissingArgument(arg) => CliError {
                code: "MISSING_ARGUMENT".to_string(),
                message: format!("{} is required for event-stream input", arg),
                hint: Some("Use --input-format session to read it from the document".to_string()),
            },
            SentinelCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} ordering or timestamp issues found", count),
                hint: Some("Fix the capture layer ordering and retry".to_string()),
            },
            SentinelCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
