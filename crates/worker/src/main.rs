//! dfextract worker - Main Entry Point
//! Lists the registered extraction tasks and runs one invocation per process

mod settings;
mod telemetry;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tabled::{Table, Tabled};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::Layered;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

use dfextract_core::application::{all_definitions, shutdown_channel, ExtractionPipeline};
use dfextract_core::domain::{TaskInvocation, TaskKind};
use dfextract_core::port::UuidProvider;
use dfextract_infra_system::{ProcessSupervisor, TracingProgressReporter};

use settings::SettingsArgs;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const LOG_FILE_PREFIX: &str = "dfextract-worker.log";

#[derive(Parser)]
#[command(name = "dfextract-worker")]
#[command(about = "Extracts IndexedDB and LevelDB records with dfindexeddb", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log format: pretty or json
    #[arg(long, env = "DFEXTRACT_LOG_FORMAT", default_value = "pretty", global = true)]
    log_format: String,

    /// Write logs to daily rolling files in this directory instead of stderr
    #[arg(long, env = "DFEXTRACT_LOG_DIR", global = true)]
    log_dir: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the registered tasks
    Tasks {
        /// Print the full definitions as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run one task invocation and print the encoded result
    Run {
        /// Task name (indexeddb, leveldb or the fully qualified name)
        #[arg(short, long)]
        task: String,

        /// Invocation JSON file (read from stdin when omitted)
        #[arg(short, long)]
        invocation: Option<String>,

        #[command(flatten)]
        settings: SettingsArgs,
    },
}

#[derive(Tabled)]
struct TaskRow {
    name: String,
    display_name: String,
    config: String,
}

type BoxedLayer = Box<dyn Layer<Layered<EnvFilter, Registry>> + Send + Sync>;

/// Install the global subscriber; the guard must live until exit
fn init_logging(log_format: &str, log_dir: Option<&str>) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("dfextract=info"))
        .context("Failed to create env filter")?;

    let (writer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(settings::expand(dir), LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (fmt::writer::BoxMakeWriter::new(writer), Some(guard))
        }
        // stdout carries the encoded result
        None => (fmt::writer::BoxMakeWriter::new(std::io::stderr), None),
    };
    let ansi = log_dir.is_none();

    let mut layers: Vec<BoxedLayer> = Vec::new();
    match log_format {
        "json" => layers.push(fmt::layer().json().with_writer(writer).boxed()),
        _ => layers.push(fmt::layer().pretty().with_ansi(ansi).with_writer(writer).boxed()),
    }

    #[cfg(feature = "telemetry")]
    if let Some(endpoint) = telemetry::otlp_endpoint() {
        layers.push(telemetry::layer(&endpoint)?);
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

fn print_tasks(json: bool) -> Result<()> {
    let definitions = all_definitions();

    if json {
        println!("{}", serde_json::to_string_pretty(&definitions)?);
        return Ok(());
    }

    let rows: Vec<TaskRow> = definitions
        .into_iter()
        .map(|def| TaskRow {
            name: def.name,
            display_name: def.display_name,
            config: def
                .task_config
                .iter()
                .map(|field| format!("{} ({})", field.name, field.items.join("|")))
                .collect::<Vec<_>>()
                .join("\n"),
        })
        .collect();

    println!("{}", "Registered tasks".cyan().bold());
    println!();
    println!("{}", Table::new(rows));
    Ok(())
}

fn read_invocation(source: Option<&str>) -> Result<TaskInvocation> {
    let raw = match source {
        Some(path) => {
            let path = PathBuf::from(settings::expand(path));
            std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read invocation {}", path.display()))?
        }
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read invocation from stdin")?;
            buf
        }
    };

    serde_json::from_str(&raw).context("Invalid invocation JSON")
}

async fn run_task(task: &str, invocation: Option<&str>, settings: SettingsArgs) -> Result<()> {
    let kind = TaskKind::from_task_name(task).context("Unknown task")?;
    let invocation = read_invocation(invocation)?;
    let config = settings.into_pipeline_config()?;

    let pipeline = ExtractionPipeline::new(
        Arc::new(ProcessSupervisor::from_config(&config)),
        Arc::new(TracingProgressReporter::new(kind.task_name())),
        Arc::new(UuidProvider),
        config,
    );

    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received. Cancelling task...");
            shutdown_tx.shutdown();
        }
    });

    let result = pipeline
        .run(kind, invocation, shutdown_rx)
        .await
        .with_context(|| format!("Task {} failed", kind.task_name()))?;

    println!("{}", result.encode()?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _guard = init_logging(&cli.log_format, cli.log_dir.as_deref())?;
    telemetry::log_status();

    let outcome = match cli.command {
        Commands::Tasks { json } => print_tasks(json),
        Commands::Run {
            task,
            invocation,
            settings,
        } => {
            info!("dfextract worker v{} starting...", VERSION);
            run_task(&task, invocation.as_deref(), settings).await
        }
    };

    if let Err(e) = &outcome {
        error!(error = ?e, "Worker failed");
    }
    telemetry::shutdown();

    outcome
}
