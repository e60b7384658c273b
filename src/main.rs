//! CLI entry point for `sqlgrants`.

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use sqlgrants::classifier::params::{GrantParameters, MySqlGrantParameters};
use sqlgrants::generator::diff::diff_privileges;
use sqlgrants::generator::mysql::MySqlGrant;
use sqlgrants::generator::postgres::PgGrant;
use sqlgrants::output::formatter;
use sqlgrants::output::plan::{self, Action, PlannedStatement};
use sqlgrants::parser::show_grants::observed_privileges;
use sqlgrants::privileges::privilege::Engine;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "sqlgrants",
    about = "Plan the SQL that converges a PostgreSQL or MySQL grant onto its declared state"
)]
struct Cli {
    /// Grant spec (JSON with camelCase keys)
    spec: PathBuf,

    /// Target engine
    #[arg(long, value_enum)]
    engine: Engine,

    /// Reconciler action to plan
    #[arg(long, value_enum, default_value_t = Action::All)]
    action: Action,

    /// Current `SHOW GRANTS` output, one line per grant (`MySQL` updates)
    #[arg(long)]
    observed: Option<PathBuf>,

    /// Write `<spec>_plan.sql` here instead of printing the plan
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Print verbose diagnostics
    #[arg(long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        process::exit(2);
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let spec = read(&cli.spec)?;

    let planned = match cli.engine {
        Engine::Postgres => {
            if cli.observed.is_some() {
                tracing::warn!("--observed only applies to mysql grants; ignoring it");
            }
            let params: GrantParameters = serde_json::from_str(&spec)
                .map_err(|e| format!("Invalid grant spec {}: {e}", cli.spec.display()))?;
            let grant = PgGrant::new(&params).map_err(|e| e.to_string())?;
            tracing::info!(
                grant_type = %grant.grant_type(),
                database = grant.database().unwrap_or("-"),
                "classified grant"
            );
            plan::plan_postgres(&grant, cli.action)
        }
        Engine::MySql => {
            let params: MySqlGrantParameters = serde_json::from_str(&spec)
                .map_err(|e| format!("Invalid grant spec {}: {e}", cli.spec.display()))?;
            let grant = MySqlGrant::new(&params).map_err(|e| e.to_string())?;
            let observed = match &cli.observed {
                Some(path) => Some(observed_privileges(
                    read(path)?.lines(),
                    grant.database().as_target(),
                    grant.table().as_target(),
                )),
                None => None,
            };
            if let Some(observed) = &observed {
                let (to_grant, to_revoke) = diff_privileges(&grant.privileges(), observed);
                tracing::info!(?to_grant, ?to_revoke, "diffed against observed grants");
            }
            plan::plan_mysql(&grant, cli.action, observed.as_deref())
        }
    };

    emit(cli, &planned)
}

fn emit(cli: &Cli, planned: &[PlannedStatement]) -> Result<(), String> {
    match &cli.output_dir {
        Some(dir) => {
            let name = cli
                .spec
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("grant");
            let path = formatter::write_plan(dir, name, planned)?;
            if cli.verbose {
                eprintln!("Wrote {} statements to {}", planned.len(), path.display());
            }
        }
        None => {
            if planned.is_empty() {
                println!("-- nothing to do");
            } else {
                println!("{}", plan::format_plan(planned));
            }
        }
    }
    Ok(())
}

fn read(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("Error reading {}: {e}", path.display()))
}
