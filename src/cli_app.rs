//! Top-level CLI definition and dispatch.

use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell as CompletionShell, generate};
use colored::{ColoredString, Colorize, control};
use serde_json::{Value, json};
use thiserror::Error;

use social_eng_detector::core::config::Config;
use social_eng_detector::core::errors::SedError;
use social_eng_detector::core::schema::{ArtifactType, RiskLevel, ScanRequest, ScanResult};
use social_eng_detector::logger::jsonl::{JsonlConfig, JsonlWriter, LogEntry};
use social_eng_detector::scanner::engine::AnalysisEngine;
use social_eng_detector::scanner::orchestrator::AnalysisOrchestrator;
use social_eng_detector::scanner::text::{SocialEngineeringScanner, TextRiskLevel, TextScanReport};

/// Social engineering detector: scores URLs and messages for phishing signals.
#[derive(Debug, Parser)]
#[command(
    name = "sedet",
    author,
    version,
    about = "Social Engineering Detector - heuristic risk scoring for URLs and text",
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Override config file path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Force JSON output mode.
    #[arg(long, global = true)]
    json: bool,
    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
    /// Increase verbosity.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,
    /// Quiet mode (verdict only).
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Score one artifact through the engine registered for its type.
    Analyze(AnalyzeArgs),
    /// Run the text strategies and show the raw four-level report.
    Text(TextArgs),
    /// View and check configuration state.
    Config(ConfigArgs),
    /// Show version and service metadata.
    Version(VersionArgs),
    /// Generate shell completions.
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, Args)]
struct AnalyzeArgs {
    /// Artifact type: url, text, image or audio.
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    artifact_type: String,
    /// Artifact content. Read from stdin when omitted.
    #[arg(value_name = "CONTENT", conflicts_with = "stdin")]
    content: Option<String>,
    /// Read content from stdin.
    #[arg(long)]
    stdin: bool,
}

#[derive(Debug, Clone, Args)]
struct TextArgs {
    /// Message text. Read from stdin when omitted.
    #[arg(value_name = "CONTENT", conflicts_with = "stdin")]
    content: Option<String>,
    /// Read content from stdin.
    #[arg(long)]
    stdin: bool,
}

#[derive(Debug, Clone, Args, Default)]
struct ConfigArgs {
    /// Config operation to run.
    #[command(subcommand)]
    command: Option<ConfigCommand>,
}

#[derive(Debug, Clone, Subcommand)]
enum ConfigCommand {
    /// Print resolved config file path.
    Path,
    /// Print effective merged configuration.
    Show,
    /// Validate configuration and exit.
    Validate,
}

#[derive(Debug, Clone, Args, Default)]
struct VersionArgs {
    /// Include service and build metadata.
    #[arg(long)]
    verbose: bool,
}

#[derive(Debug, Clone, Args)]
struct CompletionsArgs {
    /// Shell to generate completion script for.
    #[arg(value_enum)]
    shell: CompletionShell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Human,
    Json,
}

/// CLI error type with explicit exit-code mapping.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input at runtime.
    #[error("{0}")]
    User(String),
    /// Environment/runtime failure.
    #[error("{0}")]
    Runtime(String),
    /// Internal bug or invariant violation.
    #[error("{0}")]
    Internal(String),
    /// JSON serialization failed.
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
    /// Output write failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Process exit code contract for the CLI.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::User(_) => 1,
            Self::Runtime(_) | Self::Io(_) => 2,
            Self::Internal(_) | Self::Json(_) => 3,
        }
    }
}

impl From<SedError> for CliError {
    fn from(error: SedError) -> Self {
        match error {
            SedError::InvalidRequest { .. }
            | SedError::UnsupportedArtifact { .. }
            | SedError::UnknownArtifactType { .. }
            | SedError::InvalidConfig { .. }
            | SedError::MissingConfig { .. }
            | SedError::ConfigParse { .. }
            | SedError::InvalidPattern { .. } => Self::User(error.to_string()),
            SedError::Io { .. } => Self::Runtime(error.to_string()),
            SedError::Serialization { .. } => Self::Internal(error.to_string()),
        }
    }
}

/// Dispatch CLI commands.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.no_color {
        control::set_override(false);
    }

    match &cli.command {
        Command::Analyze(args) => run_analyze(cli, args),
        Command::Text(args) => run_text(cli, args),
        Command::Config(args) => run_config(cli, args),
        Command::Version(args) => emit_version(cli, args),
        Command::Completions(args) => {
            let mut command = Cli::command();
            let binary_name = command.get_name().to_string();
            generate(args.shell, &mut command, binary_name, &mut io::stdout());
            Ok(())
        }
    }
}

// ──────────────────────── analyze ────────────────────────

fn run_analyze(cli: &Cli, args: &AnalyzeArgs) -> Result<(), CliError> {
    let config = Config::load(cli.config.as_deref())?;
    let mut activity = ActivityLog::open(&config);

    let artifact_type = match args.artifact_type.parse::<ArtifactType>() {
        Ok(kind) => kind,
        Err(error) => {
            activity.record(&LogEntry::for_error(None, &error));
            return Err(error.into());
        }
    };
    let content = read_content(args.content.as_deref(), args.stdin)?;

    let started = Instant::now();
    let outcome = ScanRequest::new(artifact_type, content).and_then(|request| {
        let orchestrator = AnalysisOrchestrator::from_config(&config)?;
        if cli.verbose
            && let Some(engine) = orchestrator.engine_for(artifact_type)
        {
            eprintln!("[SED] routing {artifact_type} to {}", engine.name());
        }
        let chars = request.content().chars().count();
        orchestrator
            .analyze_artifact(&request)
            .map(|result| (result, chars))
    });

    match outcome {
        Ok((result, chars)) => {
            activity.record(
                &LogEntry::for_result(artifact_type, &result)
                    .with_content_chars(chars)
                    .with_duration(started.elapsed()),
            );
            emit_scan_result(cli, artifact_type, &result)
        }
        Err(error) => {
            activity.record(&LogEntry::for_error(Some(artifact_type), &error));
            Err(error.into())
        }
    }
}

fn emit_scan_result(
    cli: &Cli,
    artifact_type: ArtifactType,
    result: &ScanResult,
) -> Result<(), CliError> {
    match output_mode(cli) {
        OutputMode::Human => {
            println!(
                "{} {} (score {}/100)",
                artifact_type.as_str().bold(),
                paint_level(result.risk_level),
                result.risk_score
            );
            if !cli.quiet {
                print_findings(&result.findings);
            }
        }
        OutputMode::Json => {
            let payload = json!({
                "command": "analyze",
                "artifact_type": artifact_type,
                "risk_score": result.risk_score,
                "risk_level": result.risk_level,
                "findings": result.findings,
            });
            write_json_line(&payload)?;
        }
    }
    Ok(())
}

// ──────────────────────── text ────────────────────────

fn run_text(cli: &Cli, args: &TextArgs) -> Result<(), CliError> {
    let config = Config::load(cli.config.as_deref())?;
    let content = read_content(args.content.as_deref(), args.stdin)?;
    let scanner = SocialEngineeringScanner::from_config(&config.text)?;
    let report = scanner.scan_text(content.as_str());
    emit_text_report(cli, &report)
}

fn emit_text_report(cli: &Cli, report: &TextScanReport) -> Result<(), CliError> {
    match output_mode(cli) {
        OutputMode::Human => {
            println!(
                "{} {} (score {:.2})",
                "TEXT".bold(),
                paint_text_level(report.risk_level),
                report.risk_score
            );
            if !cli.quiet {
                print_findings(&report.findings);
            }
            if cli.verbose {
                for contribution in &report.contributions {
                    println!(
                        "  {:<16} {:.2}",
                        contribution.strategy, contribution.score
                    );
                }
            }
        }
        OutputMode::Json => {
            let mut payload = serde_json::to_value(report)?;
            if let Value::Object(map) = &mut payload {
                map.insert("command".to_string(), json!("text"));
            }
            write_json_line(&payload)?;
        }
    }
    Ok(())
}

// ──────────────────────── config ────────────────────────

fn run_config(cli: &Cli, args: &ConfigArgs) -> Result<(), CliError> {
    match &args.command {
        None | Some(ConfigCommand::Path) => {
            let path = cli.config.clone().unwrap_or_else(Config::default_path);
            let exists = path.exists();

            match output_mode(cli) {
                OutputMode::Human => {
                    println!("{}", path.display());
                    if !exists {
                        println!("  (file does not exist; defaults will be used)");
                    }
                }
                OutputMode::Json => {
                    let payload = json!({
                        "command": "config path",
                        "path": path.to_string_lossy(),
                        "exists": exists,
                    });
                    write_json_line(&payload)?;
                }
            }
            Ok(())
        }
        Some(ConfigCommand::Show) => {
            let config = Config::load(cli.config.as_deref())?;

            match output_mode(cli) {
                OutputMode::Human => {
                    let toml_str = toml::to_string_pretty(&config)
                        .map_err(|e| CliError::Internal(format!("serialize config: {e}")))?;
                    println!("{toml_str}");
                }
                OutputMode::Json => {
                    let value = serde_json::to_value(&config)?;
                    let payload = json!({
                        "command": "config show",
                        "config": value,
                    });
                    write_json_line(&payload)?;
                }
            }
            Ok(())
        }
        Some(ConfigCommand::Validate) => match Config::load(cli.config.as_deref()) {
            Ok(config) => {
                let hash = config.stable_hash()?;
                ActivityLog::open(&config).record(&LogEntry::for_config(&hash));

                match output_mode(cli) {
                    OutputMode::Human => {
                        println!("Configuration is valid.");
                        println!("  Source: {}", config.paths.config_file.display());
                        println!("  Hash: {hash}");
                    }
                    OutputMode::Json => {
                        let payload = json!({
                            "command": "config validate",
                            "valid": true,
                            "path": config.paths.config_file.to_string_lossy(),
                            "hash": hash,
                        });
                        write_json_line(&payload)?;
                    }
                }
                Ok(())
            }
            Err(e) => {
                match output_mode(cli) {
                    OutputMode::Human => {
                        eprintln!("Configuration is INVALID: {e}");
                    }
                    OutputMode::Json => {
                        let payload = json!({
                            "command": "config validate",
                            "valid": false,
                            "error_code": e.code(),
                            "error": e.to_string(),
                        });
                        write_json_line(&payload)?;
                    }
                }
                Err(CliError::User(format!("invalid config: {e}")))
            }
        },
    }
}

// ──────────────────────── version ────────────────────────

fn emit_version(cli: &Cli, args: &VersionArgs) -> Result<(), CliError> {
    let version = env!("CARGO_PKG_VERSION");
    let package = env!("CARGO_PKG_NAME");
    let target = option_env!("TARGET").unwrap_or("unknown");
    let profile = option_env!("PROFILE").unwrap_or("unknown");
    // Metadata is informational; a broken config file must not hide the version.
    let config = Config::load(cli.config.as_deref()).unwrap_or_default();
    let orchestrator = AnalysisOrchestrator::from_config(&config).unwrap_or_default();
    let service = config.service;
    let engines = orchestrator.supported_types();
    let engine_names: Vec<Value> = orchestrator
        .engines()
        .iter()
        .map(|engine| json!({ "name": engine.name(), "artifact_type": engine.artifact_type() }))
        .collect();

    match output_mode(cli) {
        OutputMode::Human => {
            println!("sedet {version}");
            if args.verbose || cli.verbose {
                println!("package: {package}");
                println!("service: {}", service.project_name);
                println!("api_version: {}", service.api_version);
                let names: Vec<&str> = engines.iter().map(|kind| kind.as_str()).collect();
                println!("artifact_types: {}", names.join(", "));
                for engine in orchestrator.engines() {
                    println!("engine: {} ({})", engine.name(), engine.artifact_type().as_str());
                }
                println!("target: {target}");
                println!("profile: {profile}");
            }
        }
        OutputMode::Json => {
            let payload = json!({
                "binary": "sedet",
                "version": version,
                "package": package,
                "service": {
                    "project_name": service.project_name,
                    "api_version": service.api_version,
                },
                "artifact_types": engines,
                "engines": engine_names,
                "build": {
                    "target": target,
                    "profile": profile,
                }
            });
            write_json_line(&payload)?;
        }
    }
    Ok(())
}

// ──────────────────────── helpers ────────────────────────

/// JSONL activity sink, present only when logging is enabled in config.
struct ActivityLog {
    writer: Option<JsonlWriter>,
}

impl ActivityLog {
    fn open(config: &Config) -> Self {
        let writer = config
            .logging
            .enabled
            .then(|| JsonlWriter::open(JsonlConfig::for_path(&config.logging.jsonl_log)));
        Self { writer }
    }

    fn record(&mut self, entry: &LogEntry) {
        if let Some(writer) = self.writer.as_mut() {
            writer.write_entry(entry);
            writer.flush();
        }
    }
}

fn read_content(inline: Option<&str>, force_stdin: bool) -> Result<String, CliError> {
    if let Some(content) = inline {
        return Ok(content.to_string());
    }
    let stdin = io::stdin();
    if !force_stdin && stdin.is_terminal() {
        return Err(CliError::User(
            "no content given; pass CONTENT or pipe it with --stdin".to_string(),
        ));
    }
    let mut buffer = String::new();
    stdin
        .lock()
        .read_to_string(&mut buffer)
        .map_err(|e| CliError::Runtime(format!("read stdin: {e}")))?;
    Ok(strip_line_ending(&buffer).to_string())
}

fn strip_line_ending(raw: &str) -> &str {
    raw.strip_suffix("\r\n")
        .or_else(|| raw.strip_suffix('\n'))
        .unwrap_or(raw)
}

fn print_findings(findings: &[String]) {
    if findings.is_empty() {
        println!("  no findings");
    }
    for finding in findings {
        println!("  - {finding}");
    }
}

fn paint_level(level: RiskLevel) -> ColoredString {
    match level {
        RiskLevel::Safe => level.as_str().green(),
        RiskLevel::Suspicious => level.as_str().yellow(),
        RiskLevel::Malicious => level.as_str().red().bold(),
    }
}

fn paint_text_level(level: TextRiskLevel) -> ColoredString {
    match level {
        TextRiskLevel::Low => level.as_str().green(),
        TextRiskLevel::Medium => level.as_str().yellow(),
        TextRiskLevel::High => level.as_str().red(),
        TextRiskLevel::Critical => level.as_str().red().bold(),
    }
}

fn write_json_line(payload: &Value) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, payload)?;
    writeln!(stdout)?;
    Ok(())
}

fn output_mode(cli: &Cli) -> OutputMode {
    let env_mode = std::env::var("SED_OUTPUT_FORMAT").ok();
    resolve_output_mode(cli.json, env_mode.as_deref(), io::stdout().is_terminal())
}

fn resolve_output_mode(json_flag: bool, env_mode: Option<&str>, stdout_is_tty: bool) -> OutputMode {
    if json_flag {
        return OutputMode::Json;
    }

    let fallback = if stdout_is_tty {
        OutputMode::Human
    } else {
        OutputMode::Json
    };

    match env_mode
        .map(str::trim)
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("json") => OutputMode::Json,
        Some("human") => OutputMode::Human,
        _ => fallback,
    }
}
