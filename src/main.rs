// SPDX-License-Identifier: MPL-2.0
use lecture_player::config;
use lecture_player::scenario::{self, Scenario};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const HELP: &str = "\
lecture-player: run a playback scenario against the simulated engine

USAGE:
  lecture-player [OPTIONS] <SCENARIO.toml>

OPTIONS:
  --config-dir <DIR>  Directory holding player.toml
  --out <DIR>         Save captured frames into DIR
  --final-toml        Print the final snapshot as TOML
  -h, --help          Print this help
";

struct Args {
    scenario: PathBuf,
    config_dir: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    final_toml: bool,
}

fn parse_args() -> Result<Option<Args>, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        return Ok(None);
    }
    let config_dir = args.opt_value_from_str("--config-dir")?;
    let out_dir = args.opt_value_from_str("--out")?;
    let final_toml = args.contains("--final-toml");
    let scenario = args.free_from_str()?;
    Ok(Some(Args {
        scenario,
        config_dir,
        out_dir,
        final_toml,
    }))
}

fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let args = match parse_args() {
        Ok(Some(args)) => args,
        Ok(None) => {
            print!("{HELP}");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("error: {err}\n\n{HELP}");
            return ExitCode::FAILURE;
        }
    };

    let (config, warning) = config::load_with_override(args.config_dir);
    if let Some(message) = warning {
        eprintln!("warning: {message}");
    }

    let scenario = match Scenario::load(&args.scenario) {
        Ok(scenario) => scenario,
        Err(err) => {
            eprintln!("error: {}: {err}", args.scenario.display());
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("error: failed to start runtime: {err}");
            return ExitCode::FAILURE;
        }
    };

    let report = match runtime.block_on(scenario::run(&scenario, config, args.out_dir.as_deref())) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    for snapshot in &report.snapshots {
        println!("{}", snapshot.summary());
    }
    for path in &report.saved {
        println!("saved {}", path.display());
    }
    println!(
        "{} load attempt(s), {} seek(s)",
        report.load_attempts.len(),
        report.seeks.len()
    );
    if args.final_toml {
        match toml::to_string_pretty(&report.final_snapshot) {
            Ok(text) => println!("{text}"),
            Err(err) => eprintln!("error: {err}"),
        }
    }

    if let Some(error) = report.fatal {
        eprintln!("playback failed: {error}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
