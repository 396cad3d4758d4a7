use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vitalwatch_cli::report::{self, format_readiness, format_snapshot_row, format_trends, history_header};
use vitalwatch_cli::session::{self, ScoreUpdate};
use vitalwatch_cli::Settings;
use vitalwatch_sdk::{catalog, MeasurementKind, ReadinessEvaluator};

#[derive(Parser, Debug)]
#[command(name = "vitalwatch")]
#[command(about = "Vital-sign monitoring and procedural readiness checklists")]
struct Args {
    /// Path to a TOML settings file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a simulated monitoring session and print alerts as they occur
    Simulate {
        /// Number of ticks to run
        #[arg(short, long, default_value = "12")]
        ticks: usize,

        /// Tick period in milliseconds (overrides the settings file)
        #[arg(short, long)]
        interval_ms: Option<u64>,

        /// Seed for a reproducible run
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Classify a single value, e.g. `classify spo2 88`
    Classify {
        /// Measurement kind (heart_rate, hr, sbp, dbp, spo2, temp, rr, etco2)
        kind: String,

        /// Measured value
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },

    /// Evaluate a built-in checklist after applying commands
    Checklist {
        #[arg(value_enum)]
        kind: ChecklistKind,

        /// Mark an item complete (repeatable)
        #[arg(long = "complete", value_name = "ID")]
        complete: Vec<String>,

        /// Set a sub-score, ID:NAME=VALUE (repeatable)
        #[arg(long = "score", value_name = "ID:NAME=VALUE")]
        scores: Vec<ScoreUpdate>,
    },

    /// Replay a simulation instantly and export the resulting state as JSON
    Export {
        /// Output file
        path: PathBuf,

        /// Number of ticks to replay
        #[arg(short, long, default_value = "12")]
        ticks: usize,

        /// Seed for a reproducible run
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ChecklistKind {
    Pre,
    Post,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let mut settings = Settings::load(args.config.as_deref())?;

    match args.command {
        Command::Simulate {
            ticks,
            interval_ms,
            seed,
        } => {
            if let Some(ms) = interval_ms {
                settings.simulation.interval_ms = ms;
                settings.validate()?;
            }
            run_simulate(&settings, ticks, seed)
        }
        Command::Classify { kind, value } => run_classify(&settings, &kind, value),
        Command::Checklist {
            kind,
            complete,
            scores,
        } => run_checklist(&settings, kind, &complete, &scores),
        Command::Export { path, ticks, seed } => run_export(&settings, &path, ticks, seed),
    }
}

/// Run the scheduler for `ticks` periods, printing alerts per tick
fn run_simulate(settings: &Settings, ticks: usize, seed: Option<u64>) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;

    let monitor = rt.block_on(session::run_live(settings, ticks, seed, |snapshot, alerts| {
        if alerts.is_empty() {
            println!("[{}] all values within critical limits", snapshot.timestamp_ms());
        }
        for alert in alerts {
            println!("[{}] ALERT {}", snapshot.timestamp_ms(), alert);
        }
    }))?;

    println!();
    println!("{}", history_header());
    for snapshot in monitor.recent(settings.history.display_window) {
        println!("{}", format_snapshot_row(&snapshot));
    }

    let trends = format_trends(&monitor.history());
    if !trends.is_empty() {
        println!("Trend: {}", trends);
    }
    Ok(())
}

fn run_classify(settings: &Settings, kind: &str, value: f64) -> Result<()> {
    let kind: MeasurementKind = kind.parse().map_err(|e| anyhow::anyhow!("{}", e))?;
    let tier = settings.classifier()?.try_classify(kind, value)?;
    println!(
        "{}: {:.*} {} -> {} [{}]",
        kind.label(),
        kind.display_precision(),
        value,
        kind.unit(),
        tier,
        tier.symbol()
    );
    Ok(())
}

fn run_checklist(
    settings: &Settings,
    kind: ChecklistKind,
    complete: &[String],
    scores: &[ScoreUpdate],
) -> Result<()> {
    let (mut checklist, evaluator, title) = match kind {
        ChecklistKind::Pre => (catalog::pre_anesthesia(), ReadinessEvaluator::simple(), "Pre-anesthesia"),
        ChecklistKind::Post => (
            catalog::post_anesthesia(),
            ReadinessEvaluator::scored(settings.discharge_threshold),
            "Post-anesthesia",
        ),
    };

    session::apply_commands(&mut checklist, complete, scores)?;

    let result = evaluator.evaluate(&checklist);
    println!("{} checklist", title);
    println!("{}", format_readiness(&result, &evaluator));
    Ok(())
}

fn run_export(settings: &Settings, path: &std::path::Path, ticks: usize, seed: Option<u64>) -> Result<()> {
    let monitor = session::replay(settings, ticks, seed)?;
    let report = report::build_report(
        settings,
        &monitor,
        &catalog::pre_anesthesia(),
        &catalog::post_anesthesia(),
    );
    report::export_to_file(&report, path).with_context(|| format!("export to {} failed", path.display()))?;
    println!("Exported {} snapshots to {}", monitor.history_len(), path.display());
    Ok(())
}
