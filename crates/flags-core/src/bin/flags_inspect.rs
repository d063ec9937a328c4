//! Resolve a feature flags file the way the client would see it

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::info;

use flags_core::logging::{LoggingConfig, parse_log_level, setup_logging};
use flags_core::{FeatureFlags, FlagsError, FlagsInit, StaticCapabilities};

#[derive(Parser, Debug)]
#[command(name = "flags-inspect", version, about = "Show the effective feature flags for a configuration")]
struct Args {
    /// TOML file with `runInLiteMode` / `ssrcRewritingEnabled`
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Assume the runtime supports insertable streams
    #[arg(long)]
    insertable_streams: bool,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    /// Include file and line information in logs
    #[arg(long)]
    log_file_info: bool,

    /// Log span enter/exit events
    #[arg(long)]
    log_spans: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
struct Report {
    lite_mode: bool,
    ssrc_rewriting: bool,
    insertable_streams: bool,
}

/// Exit code for bad input (unreadable config contents, non-object flags)
const EXIT_INVALID_CONFIG: u8 = 2;

fn logging_config(args: &Args) -> Result<LoggingConfig> {
    let mut config = LoggingConfig::new(parse_log_level(&args.log_level)?);
    if args.log_json {
        config = config.with_json();
    }
    if args.log_file_info {
        config = config.with_file_info();
    }
    if args.log_spans {
        config = config.with_spans();
    }
    Ok(config)
}

fn build_report(args: &Args) -> Result<Report> {
    let init = match &args.config {
        Some(path) => FlagsInit::load(path)
            .with_context(|| format!("loading feature flags from {}", path.display()))?,
        None => FlagsInit::new(),
    };

    let flags = FeatureFlags::from_init(StaticCapabilities::new(args.insertable_streams), &init);
    info!("Resolved feature flags: {:?}", flags.snapshot());

    Ok(Report {
        lite_mode: flags.is_run_in_lite_mode_enabled(),
        ssrc_rewriting: flags.is_ssrc_rewriting_supported(),
        insertable_streams: args.insertable_streams,
    })
}

fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<FlagsError>() {
        Some(flags_err) if flags_err.is_caller_error() => EXIT_INVALID_CONFIG,
        _ => 1,
    }
}

fn run(args: &Args) -> Result<()> {
    setup_logging(logging_config(args)?)?;

    let report = build_report(args)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("lite_mode:      {}", report.lite_mode);
        println!("ssrc_rewriting: {}", report.ssrc_rewriting);
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::from(exit_code(&err))
        }
    }
}
