//! Offline zone analysis: reads an observation snapshot (or generates a
//! synthetic one), runs the engine and writes the report as JSON.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use blightmap_core::synth::{scatter_field, FieldParams};
use blightmap_core::{AnalysisReport, EngineConfig, ObservationSet, TapResolution, ZoneEngine};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "zone_report", about = "Compute disease zones, links and tap groups for an observation snapshot")]
struct Args {
    /// Observation JSON array. Omit to analyse a synthetic field.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Seed for the synthetic field used when no input is given.
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Engine config JSON (radii, severity order). Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the report here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also resolve a tap on this observation id.
    #[arg(long)]
    tap: Option<String>,

    /// Pretty-print the JSON report.
    #[arg(long)]
    pretty: bool,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

// ── Output ────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportFile {
    #[serde(flatten)]
    report: AnalysisReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    tap: Option<TapResolution>,
}

// ── Loading ───────────────────────────────────────────────────────────────────

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn load_observations(input: Option<&Path>, seed: u64) -> Result<ObservationSet> {
    match input {
        Some(path) => {
            let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            ObservationSet::from_json(&raw).with_context(|| format!("loading {}", path.display()))
        }
        None => {
            tracing::info!(seed, "no input given, generating synthetic field");
            let field = scatter_field(&FieldParams { seed, ..FieldParams::default() });
            Ok(ObservationSet::new(field)?)
        }
    }
}

fn print_zone_table(report: &AnalysisReport) {
    eprintln!(
        "\n{:<12} {:>11} {:>11} {:<22} {:>5} {:>5}",
        "Seed", "Lat", "Lng", "Dominant", "Count", "Total"
    );
    eprintln!("{}", "-".repeat(72));
    for z in &report.zones {
        eprintln!(
            "{:<12} {:>11.6} {:>11.6} {:<22} {:>5} {:>5}",
            z.seed_id,
            z.center_lat,
            z.center_lng,
            z.dominant_disease.tag(),
            z.dominant_count,
            z.total_diseased_in_zone
        );
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();

    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&args.log_level))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).with_writer(std::io::stderr).init();

    let engine = ZoneEngine::new(load_config(args.config.as_deref())?).context("invalid engine config")?;
    let config = engine.config();
    tracing::debug!(
        proximity_m = config.proximity_radius_m,
        tap_m = config.tap_radius_m,
        link_cutoff_m = config.link_cutoff_m,
        "engine configured"
    );
    let observations = load_observations(args.input.as_deref(), args.seed)?;
    tracing::info!(
        observations = observations.len(),
        diseased = observations.diseased().count(),
        "snapshot loaded"
    );

    let report = engine.analyze(&observations);
    tracing::info!(zones = report.zones.len(), edges = report.edges.len(), "analysis complete");
    print_zone_table(&report);

    let tap = args
        .tap
        .as_deref()
        .map(|id| engine.resolve_tap(&observations, id))
        .transpose()
        .context("resolving tap")?;
    if let Some(TapResolution::Cluster(group)) = &tap {
        tracing::info!(members = group.observation_ids.len(), "tap landed on a cluster");
    }

    let file = ReportFile { report, tap };
    let json = if args.pretty {
        serde_json::to_string_pretty(&file)?
    } else {
        serde_json::to_string(&file)?
    };

    match &args.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(path = %path.display(), "report written");
        }
        None => println!("{json}"),
    }

    Ok(())
}
