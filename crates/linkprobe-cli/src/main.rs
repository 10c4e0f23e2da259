//! Linkprobe CLI
//!
//! Loads a JSON world description, attaches the systems it declares and
//! steps it. Pose reporters print to stdout; logs go to stderr.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use linkprobe_core::config::WorldConfig;
use linkprobe_core::registry;
use linkprobe_core::runner::SimulationRunner;

/// Run a linkprobe world and print link poses.
#[derive(Parser, Debug)]
#[command(name = "linkprobe")]
#[command(about = "Step a multibody world and report link poses", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the world description (JSON)
    #[arg(value_name = "WORLD", required_unless_present = "list_systems")]
    world: Option<PathBuf>,

    /// Number of steps to run
    #[arg(short = 'n', long, default_value_t = 1000, value_name = "N")]
    steps: u64,

    /// Override the world's step size, in seconds
    #[arg(long, value_name = "SECONDS")]
    dt: Option<f64>,

    /// List registered systems and their aliases, then exit
    #[arg(long)]
    list_systems: bool,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let registry = registry::builtin();

    if args.list_systems {
        for name in registry.names() {
            let aliases: Vec<&str> = registry.aliases_of(name).collect();
            if aliases.is_empty() {
                println!("{name}");
            } else {
                println!("{name} ({})", aliases.join(", "));
            }
        }
        return Ok(());
    }

    let Some(path) = args.world.as_ref() else {
        bail!("no world file given");
    };

    let mut config = WorldConfig::load(path)
        .with_context(|| format!("failed to load world from {}", path.display()))?;
    if let Some(dt) = args.dt {
        config.physics.max_step_size = dt;
    }

    let mut runner = SimulationRunner::from_world_config(registry, &config)
        .with_context(|| format!("failed to build world '{}'", config.name))?;

    tracing::info!(
        world = %config.name,
        systems = runner.system_count(),
        steps = args.steps,
        dt = ?runner.dt(),
        "running"
    );

    let ran = runner.run(args.steps);
    tracing::info!(
        steps = ran,
        sim_time = ?runner.sim_time(),
        stopped = runner.is_stopped(),
        "done"
    );
    Ok(())
}

/// Logs go to stderr so stdout carries only reporter output. `RUST_LOG`
/// wins over `-v` when set.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_world_and_flags() {
        let args = Args::parse_from(["linkprobe", "arm.json", "--steps", "5", "--dt", "0.01", "-vv"]);
        assert_eq!(args.world, Some(PathBuf::from("arm.json")));
        assert_eq!(args.steps, 5);
        assert_eq!(args.dt, Some(0.01));
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn list_systems_needs_no_world() {
        let args = Args::parse_from(["linkprobe", "--list-systems"]);
        assert!(args.list_systems);
        assert!(args.world.is_none());
    }

    #[test]
    fn world_required_otherwise() {
        assert!(Args::try_parse_from(["linkprobe"]).is_err());
    }
}
