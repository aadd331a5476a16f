//! Recovery Kernel CLI
//!
//! Prints plan assessments, intent simulations and plan topologies as JSON.
//! Exits with 2 when policy denies an assessed plan.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use recovery_core::prelude::*;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit code when policy denies a plan
const EXIT_DENIED: u8 = 2;

/// Rendered command output
#[derive(Debug)]
struct Outcome {
    json: String,
    exit_code: u8,
}

fn build_cli() -> Command {
    let input = Arg::new("input")
        .long("input")
        .short('i')
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("JSON document to assess");

    Command::new("recovery-kernel")
        .version(recovery_core::VERSION)
        .about("Recovery decision reports for plans and intents")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Advisor config (TOML)"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON on stderr"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .global(true)
                .value_parser(value_parser!(u64))
                .help("Seed for reproducible report ids"),
        )
        .arg(
            Arg::new("at")
                .long("at")
                .global(true)
                .value_parser(value_parser!(DateTime<Utc>))
                .help("Pin the clock to an RFC 3339 instant"),
        )
        .subcommand(
            Command::new("plan")
                .about("Assess a recovery plan")
                .arg(input.clone())
                .arg(
                    Arg::new("budget")
                        .long("budget")
                        .value_parser(value_parser!(f64))
                        .help("Tempo budget in minutes"),
                ),
        )
        .subcommand(
            Command::new("intent")
                .about("Simulate a recovery intent")
                .arg(input.clone()),
        )
        .subcommand(
            Command::new("topology")
                .about("Print the topology of a recovery plan")
                .arg(input),
        )
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(matches: &ArgMatches) -> Result<AdvisorConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => AdvisorConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AdvisorConfig::default(),
    };
    if let Some(seed) = matches.get_one::<u64>("seed") {
        config = config.with_id_seed(*seed);
    }
    if let Some(at) = matches.get_one::<DateTime<Utc>>("at") {
        config = config.with_fixed_time(*at);
    }
    Ok(config)
}

fn read_input(args: &ArgMatches) -> Result<String> {
    let path = args
        .get_one::<PathBuf>("input")
        .context("missing --input")?;
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn render<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("serializing report")
}

fn run(matches: &ArgMatches) -> Result<Outcome> {
    let mut config = load_config(matches)?;

    match matches.subcommand() {
        Some(("plan", args)) => {
            if let Some(budget) = args.get_one::<f64>("budget") {
                config = config.with_tempo_budget(*budget);
                config.validate()?;
            }
            let plan = RecoveryPlan::from_json(&read_input(args)?)?;
            let assessment = RecoveryAdvisor::new(config).assess_plan(&plan);
            let exit_code = if assessment.decision.allowed { 0 } else { EXIT_DENIED };
            Ok(Outcome {
                json: render(&assessment)?,
                exit_code,
            })
        }
        Some(("intent", args)) => {
            let intent = RecoveryIntent::from_json(&read_input(args)?)?;
            let report = RecoveryAdvisor::new(config).assess_intent(&intent);
            Ok(Outcome {
                json: render(&report)?,
                exit_code: 0,
            })
        }
        Some(("topology", args)) => {
            let plan = RecoveryPlan::from_json(&read_input(args)?)?;
            let topology = RecoveryAdvisor::new(config).topology(&plan);
            Ok(Outcome {
                json: render(&topology)?,
                exit_code: 0,
            })
        }
        _ => anyhow::bail!("unknown command"),
    }
}

fn main() -> ExitCode {
    let matches = build_cli().get_matches();
    init_tracing(matches.get_flag("log-json"));

    match run(&matches) {
        Ok(outcome) => {
            println!("{}", outcome.json);
            ExitCode::from(outcome.exit_code)
        }
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "command failed");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
