//! worktrust daemon: verify evidence submissions and audit their history.

mod config;

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;

use config::ServiceConfig;
use worktrust_geoip::IpApiResolver;
use worktrust_store::EvidenceStore;
use worktrust_store_lmdb::LmdbEnvironment;
use worktrust_types::{EvidenceBundle, SubmitterId, SystemClock};
use worktrust_utils::LogFormat;
use worktrust_verification::{EvidencePipeline, Orchestrator, VerificationError, VerificationMetrics};

#[derive(Parser)]
#[command(name = "worktrust-daemon", about = "Proof-of-work evidence verification")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "WORKTRUST_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory for the evidence store.
    #[arg(long, env = "WORKTRUST_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Base URL of the IP geolocation service.
    #[arg(long, env = "WORKTRUST_GEOIP_URL")]
    geoip_url: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "WORKTRUST_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "WORKTRUST_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Verify one evidence bundle and persist the result.
    Verify {
        /// Stable identity of the worker.
        #[arg(long)]
        submitter: String,

        /// Network address the submission arrived from.
        #[arg(long, default_value = "")]
        origin: String,

        /// Path to the evidence bundle JSON.
        #[arg(long)]
        evidence: PathBuf,
    },

    /// Verify a JSON-lines file of `{submitter, origin, evidence}` entries in order.
    Batch {
        #[arg(long)]
        input: PathBuf,
    },

    /// Print a submitter's persisted records, newest first.
    History {
        #[arg(long)]
        submitter: String,

        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Print the effective configuration as TOML.
    Config,
}

/// One line of a batch input file.
#[derive(Deserialize)]
struct BatchEntry {
    submitter: String,
    #[serde(default)]
    origin: String,
    evidence: EvidenceBundle,
}

fn load_config(cli: &Cli) -> anyhow::Result<ServiceConfig> {
    let mut config = match &cli.config {
        Some(path) => ServiceConfig::from_toml_file(path)?,
        None => ServiceConfig::default(),
    };

    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = data_dir.clone();
    }
    if let Some(url) = &cli.geoip_url {
        config.geoip_url = url.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    config.validate()?;
    Ok(config)
}

fn build_pipeline(config: &ServiceConfig) -> anyhow::Result<EvidencePipeline> {
    let env = LmdbEnvironment::open(&config.data_dir, config.map_size_bytes())
        .with_context(|| format!("failed to open evidence store at {}", config.data_dir.display()))?;
    let store: Arc<dyn EvidenceStore> = Arc::new(env.evidence_store());
    let resolver = Arc::new(IpApiResolver::with_endpoint(
        &config.geoip_url,
        config.geoip_timeout(),
    ));

    let orchestrator = Orchestrator::new(Arc::clone(&store), resolver, config.params.clone())
        .with_timeouts(config.geoip_timeout(), config.history_timeout())
        .with_metrics(Arc::new(VerificationMetrics::new()));

    Ok(EvidencePipeline::new(orchestrator, store, Arc::new(SystemClock)))
}

fn read_evidence(path: &Path) -> anyhow::Result<EvidenceBundle> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read evidence file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse evidence file {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    if let Command::Config = cli.command {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    worktrust_utils::init_logging(config.log_format, &config.log_level);
    tracing::debug!(data_dir = %config.data_dir.display(), geoip = %config.geoip_url, "configuration loaded");

    let pipeline = build_pipeline(&config)?;

    match cli.command {
        Command::Verify {
            submitter,
            origin,
            evidence,
        } => {
            let submitter = SubmitterId::new(submitter)?;
            let evidence = read_evidence(&evidence)?;
            let verdict = pipeline.submit(&submitter, &evidence, &origin).await?;
            println!("{}", serde_json::to_string_pretty(&verdict)?);
        }
        Command::Batch { input } => run_batch(&pipeline, &input).await?,
        Command::History { submitter, limit } => {
            let submitter = SubmitterId::new(submitter)?;
            let records = pipeline.history(&submitter, limit).await?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Command::Config => {}
    }

    Ok(())
}

/// Process a JSON-lines batch in file order.
///
/// Malformed lines and invalid evidence are reported and skipped; a failed
/// write aborts the batch.
async fn run_batch(pipeline: &EvidencePipeline, input: &Path) -> anyhow::Result<()> {
    let file = std::fs::File::open(input)
        .with_context(|| format!("failed to open batch input {}", input.display()))?;

    let (mut accepted, mut rejected, mut invalid) = (0u64, 0u64, 0u64);
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line_no = index + 1;
        let line = line.with_context(|| format!("failed to read line {line_no}"))?;
        if line.trim().is_empty() {
            continue;
        }

        let entry = match serde_json::from_str::<BatchEntry>(&line) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(line = line_no, error = %e, "skipping malformed batch entry");
                println!("{}", serde_json::json!({ "line": line_no, "error": e.to_string() }));
                invalid += 1;
                continue;
            }
        };
        let submitter = match SubmitterId::new(entry.submitter) {
            Ok(s) => s,
            Err(e) => {
                println!("{}", serde_json::json!({ "line": line_no, "error": e.to_string() }));
                invalid += 1;
                continue;
            }
        };

        match pipeline.submit(&submitter, &entry.evidence, &entry.origin).await {
            Ok(verdict) => {
                if verdict.passed {
                    accepted += 1;
                } else {
                    rejected += 1;
                }
                println!(
                    "{}",
                    serde_json::json!({ "line": line_no, "submitter": submitter, "verdict": verdict })
                );
            }
            Err(VerificationError::InvalidEvidence(e)) => {
                println!("{}", serde_json::json!({ "line": line_no, "error": e.to_string() }));
                invalid += 1;
            }
            Err(e) => return Err(e).with_context(|| format!("batch aborted at line {line_no}")),
        }
    }

    tracing::info!(accepted, rejected, invalid, "batch complete");
    if let Some(metrics) = pipeline.orchestrator().metrics() {
        tracing::debug!(metrics = %metrics.encode(), "verification metrics");
    }
    Ok(())
}
