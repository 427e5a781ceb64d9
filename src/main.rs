//! Microgrid sizer entry point: CLI parsing, scenario loading and exports.

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use microgrid_sizer::config::ScenarioConfig;
use microgrid_sizer::io::export::{
    export_cashflow_csv, export_dispatch_csv, export_json, export_monthly_csv,
};
use microgrid_sizer::io::load_csv::{export_load_csv, import_load_csv};
use microgrid_sizer::runner::RunCoordinator;

/// Sizes a hybrid solar, battery and diesel microgrid for a remote site.
///
/// If neither --scenario nor --preset is given, the baseline preset is used.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Load the scenario from a TOML file.
    #[arg(long, value_name = "PATH", conflicts_with = "preset")]
    scenario: Option<PathBuf>,

    /// Use a built-in preset (baseline, flat_load, mining_camp, telecoms).
    #[arg(long, value_name = "NAME")]
    preset: Option<String>,

    /// Replace the scenario's load with a 24-hour `Hour,Load_kW` CSV.
    #[arg(long, value_name = "PATH")]
    load_csv: Option<PathBuf>,

    /// Write the unscaled 24-hour load profile as CSV.
    #[arg(long, value_name = "PATH")]
    export_load: Option<PathBuf>,

    /// Write the seasonal dispatch table as CSV.
    #[arg(long, value_name = "PATH")]
    dispatch_out: Option<PathBuf>,

    /// Write the monthly energy table as CSV.
    #[arg(long, value_name = "PATH")]
    monthly_out: Option<PathBuf>,

    /// Write the cash-flow table as CSV.
    #[arg(long, value_name = "PATH")]
    cashflow_out: Option<PathBuf>,

    /// Write the full results as JSON.
    #[arg(long, value_name = "PATH")]
    json_out: Option<PathBuf>,

    /// Serve the results over HTTP after the run.
    #[cfg(feature = "api")]
    #[arg(long)]
    serve: bool,

    /// API server port.
    #[cfg(feature = "api")]
    #[arg(long, default_value_t = 3000)]
    port: u16,
}

/// Resolves the scenario from CLI args: TOML file, preset, or baseline.
fn load_scenario(args: &Args) -> Result<ScenarioConfig, String> {
    let mut cfg = match (&args.scenario, &args.preset) {
        (Some(path), _) => ScenarioConfig::from_toml_file(path).map_err(|e| e.to_string())?,
        (None, Some(name)) => ScenarioConfig::from_preset(name).map_err(|e| e.to_string())?,
        (None, None) => ScenarioConfig::baseline(),
    };

    if let Some(path) = &args.load_csv {
        let values = import_load_csv(path).map_err(|e| e.to_string())?;
        info!(path = %path.display(), "load profile imported");
        cfg.load.hourly_kw = Some(values.to_vec());
    }

    let errors = cfg.validate();
    if !errors.is_empty() {
        for e in &errors {
            error!("{e}");
        }
        return Err(format!("scenario has {} invalid field(s)", errors.len()));
    }
    Ok(cfg)
}

/// Writes one optional artifact, logging where it went.
fn write_artifact(
    path: Option<&Path>,
    what: &str,
    write: impl FnOnce(&Path) -> io::Result<()>,
) -> Result<(), String> {
    let Some(path) = path else {
        return Ok(());
    };
    write(path).map_err(|e| format!("failed to write {what} to {}: {e}", path.display()))?;
    info!(path = %path.display(), "{what} written");
    Ok(())
}

async fn run(args: Args) -> Result<(), String> {
    let cfg = load_scenario(&args)?;

    let coordinator = RunCoordinator::new();
    let results = coordinator.run(cfg).await.map_err(|e| e.to_string())?;

    println!("{results}");

    write_artifact(args.export_load.as_deref(), "load profile", |p| {
        export_load_csv(results.load.raw_kw(), p)
    })?;
    write_artifact(args.dispatch_out.as_deref(), "dispatch table", |p| {
        export_dispatch_csv(&results.seasons, p)
    })?;
    write_artifact(args.monthly_out.as_deref(), "monthly table", |p| {
        export_monthly_csv(&results.accounting.monthly, p)
    })?;
    write_artifact(args.cashflow_out.as_deref(), "cash-flow table", |p| {
        export_cashflow_csv(&results.financials.cash_flows, p)
    })?;
    write_artifact(args.json_out.as_deref(), "results", |p| export_json(&results, p))?;

    #[cfg(feature = "api")]
    if args.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        use microgrid_sizer::api::{AppState, serve};

        let addr = SocketAddr::from(([127, 0, 0, 1], args.port));
        let state = Arc::new(AppState::new(coordinator));
        serve(state, addr)
            .await
            .map_err(|e| format!("API server on {addr} failed: {e}"))?;
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .without_time()
        .compact()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
