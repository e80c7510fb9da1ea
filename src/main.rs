//! Cardiorisk: 10-year cardiovascular risk from a patient record.
//!
//! Usage: `cardiorisk <patient.json|-> [--method framingham|score2|acc-aha|all] [--no-validate]`
//!
//! The report is printed to stdout as JSON. Logs go to stderr unless
//! `CARDIORISK_LOG_MODE=file`.

use std::io::Read;

use anyhow::{bail, Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cardiorisk::{Method, PatientInput, RiskService};

const USAGE: &str =
    "usage: cardiorisk <patient.json|-> [--method framingham|score2|acc-aha|all] [--no-validate]";

struct Args {
    input: String,
    method: Method,
    validate: bool,
}

fn parse_args() -> Result<Args> {
    let mut input = None;
    let mut method = Method::All;
    let mut validate = true;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--method" | "-m" => {
                let value = args.next().context("--method needs a value")?;
                method = value.parse()?;
            }
            "--no-validate" => validate = false,
            "--help" | "-h" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            _ if input.is_none() => input = Some(arg),
            other => bail!("unexpected argument {other:?}\n{USAGE}"),
        }
    }

    Ok(Args {
        input: input.context(USAGE)?,
        method,
        validate,
    })
}

fn read_input(source: &str) -> Result<PatientInput> {
    let input = if source == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        PatientInput::from_json(&buf)
    } else {
        PatientInput::from_path(source)
    };
    input.with_context(|| format!("reading patient record from {source}"))
}

fn main() -> Result<()> {
    // Initialize logging. stdout carries the report, so logs default to stderr.
    let log_mode = std::env::var("CARDIORISK_LOG_MODE").unwrap_or_else(|_| "stderr".to_string());

    let (writer, _guard) = if log_mode == "file" {
        let log_file = std::env::var("CARDIORISK_LOG_FILE")
            .unwrap_or_else(|_| "cardiorisk.log".to_string());

        if let Some(parent) = std::path::Path::new(&log_file).parent() {
            // Best-effort: don't fail startup just because the directory is missing.
            let _ = std::fs::create_dir_all(parent);
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stderr())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(writer))
        .init();

    let args = parse_args()?;
    let input = read_input(&args.input)?;

    let warnings = if args.validate {
        match input.validate() {
            Ok(warnings) => warnings,
            Err(errors) => bail!("invalid patient record:\n  {}", errors.join("\n  ")),
        }
    } else {
        Vec::new()
    };
    for warning in &warnings {
        tracing::warn!("{}", warning);
    }

    let service = RiskService::global();
    let report = service.assess_input(input, args.method)?;

    let notes: Vec<&str> = report
        .score2
        .as_ref()
        .and_then(|a| a.tier())
        .map(|tier| tier.description())
        .into_iter()
        .collect();

    let output = serde_json::json!({
        "report": report,
        "warnings": warnings,
        "notes": notes,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
