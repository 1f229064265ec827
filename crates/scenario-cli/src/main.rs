//! `scenario` command-line front end
//!
//! - `explore` - run an exploration with the reference collaborators
//! - `catalog` - print an action catalog
//! - `check-config` - validate a settings file

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use scenario_engine::reference::{
    CachingSimulator, CatalogProposer, MonteCarloSimulator, RetryingProposer, ValidatingProposer,
};
use scenario_engine::{
    init_tracing, ActionCatalog, BeamSearchDriver, EngineSettings, ExplorationSnapshot,
    ExplorationStore, OutcomeSimulator,
};
use scenario_model::{BaselineAnalysis, Scorecard, WinningPath};
use std::path::PathBuf;
use std::sync::Arc;

const BASELINE_ID: &str = "cli-baseline";
const EXPERIMENT_ID: &str = "cli";

fn cli() -> Command {
    Command::new("scenario")
        .version(scenario_engine::VERSION)
        .about("Beam-search exploration of product scenarios")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("explore")
                .about("Search for a scenario that meets the goal")
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("Settings file (TOML)"),
                )
                .arg(
                    Arg::new("baseline")
                        .long("baseline")
                        .default_value("0.6,0.5,0.4,0.7")
                        .value_parser(parse_scorecard)
                        .help("Baseline scorecard: complexity,initial_effort,perceived_risk,time_to_value"),
                )
                .arg(
                    Arg::new("goal")
                        .long("goal")
                        .value_parser(value_parser!(f64))
                        .help("Target success rate in (0, 1]"),
                )
                .arg(
                    Arg::new("beam-width")
                        .long("beam-width")
                        .value_parser(value_parser!(usize))
                        .help("Candidates kept per depth"),
                )
                .arg(
                    Arg::new("max-depth")
                        .long("max-depth")
                        .value_parser(value_parser!(u32))
                        .help("Maximum number of chained actions"),
                )
                .arg(
                    Arg::new("max-llm-calls")
                        .long("max-llm-calls")
                        .value_parser(value_parser!(u32))
                        .help("Proposer call budget"),
                )
                .arg(
                    Arg::new("executions")
                        .long("executions")
                        .value_parser(value_parser!(u32))
                        .help("Simulated users per scenario"),
                )
                .arg(
                    Arg::new("sigma")
                        .long("sigma")
                        .value_parser(value_parser!(f64))
                        .help("Per-user noise scale"),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .value_parser(value_parser!(u64))
                        .help("Random seed for reproducibility"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the exploration snapshot as JSON"),
                ),
        )
        .subcommand(
            Command::new("catalog")
                .about("Print an action catalog")
                .arg(
                    Arg::new("file")
                        .long("file")
                        .value_parser(value_parser!(PathBuf))
                        .help("Catalog file (YAML); the built-in catalog when omitted"),
                ),
        )
        .subcommand(
            Command::new("check-config")
                .about("Validate a settings file")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Settings file (TOML)"),
                ),
        )
}

fn parse_scorecard(value: &str) -> Result<Scorecard, String> {
    let parts = value
        .split(',')
        .map(|p| p.trim().parse::<f64>().map_err(|e| format!("{p:?}: {e}")))
        .collect::<Result<Vec<_>, _>>()?;

    match parts.as_slice() {
        &[c, e, r, t] if parts.iter().all(|v| (0.0..=1.0).contains(v)) => {
            Ok(Scorecard::new(c, e, r, t))
        }
        [_, _, _, _] => Err("scorecard values must lie in [0, 1]".to_string()),
        _ => Err(format!("expected 4 comma-separated values, got {}", parts.len())),
    }
}

fn settings_from(args: &ArgMatches) -> Result<EngineSettings> {
    let mut settings = match args.get_one::<PathBuf>("config") {
        Some(path) => EngineSettings::load(path)?,
        None => EngineSettings::default(),
    };

    let exploration = &mut settings.exploration;
    if let Some(v) = args.get_one::<usize>("beam-width") {
        exploration.beam_width = *v;
    }
    if let Some(v) = args.get_one::<u32>("max-depth") {
        exploration.max_depth = *v;
    }
    if let Some(v) = args.get_one::<u32>("max-llm-calls") {
        exploration.max_llm_calls = *v;
    }
    if let Some(v) = args.get_one::<u32>("executions") {
        exploration.n_executions = *v;
    }
    if let Some(v) = args.get_one::<f64>("sigma") {
        exploration.sigma = *v;
    }
    if let Some(v) = args.get_one::<u64>("seed") {
        exploration.seed = Some(*v);
    }
    if let Some(v) = args.get_one::<f64>("goal") {
        settings.goal.value = *v;
    }

    settings.validate()?;
    Ok(settings)
}

fn load_catalog(path: Option<&PathBuf>) -> Result<ActionCatalog> {
    Ok(match path {
        Some(path) => ActionCatalog::load(path)?,
        None => ActionCatalog::builtin()?,
    })
}

async fn explore(args: &ArgMatches) -> Result<()> {
    let settings = settings_from(args)?;
    init_tracing(&settings.logging);

    let scorecard = *args
        .get_one::<Scorecard>("baseline")
        .context("baseline scorecard missing")?;
    let config = settings.exploration;
    let goal = settings.goal()?;
    let catalog = Arc::new(load_catalog(settings.proposer.catalog.as_ref())?);

    let simulator = Arc::new(CachingSimulator::new(
        MonteCarloSimulator::new(),
        settings.simulator.cache_capacity,
    ));
    let baseline_outcome = simulator
        .simulate(&scorecard, config.n_executions, config.sigma, config.seed)
        .await
        .context("simulating the baseline")?;

    let store = ExplorationStore::new();
    store.register_baseline(BaselineAnalysis::new(
        BASELINE_ID,
        scorecard,
        baseline_outcome.rates,
    ));
    let id = store.create_exploration(EXPERIMENT_ID, BASELINE_ID, goal, config)?;

    let proposer = ValidatingProposer::new(
        RetryingProposer::new(
            CatalogProposer::new(Arc::clone(&catalog), settings.proposer.max_proposals),
            settings.proposer.max_attempts,
        ),
        catalog,
    );
    let driver = BeamSearchDriver::new(Arc::new(proposer), simulator);

    let status = store.acquire_lease(id)?.run(&driver).await?;
    tracing::debug!(%status, "Exploration complete");

    let snapshot = store.snapshot(id)?;
    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print_report(&snapshot, store.winning_path(id).ok().as_ref());
    }
    Ok(())
}

fn print_report(snapshot: &ExplorationSnapshot, path: Option<&WinningPath>) {
    let exploration = &snapshot.exploration;
    let root_rate = snapshot
        .nodes
        .first()
        .and_then(scenario_model::ScenarioNode::success_rate)
        .unwrap_or_default();

    println!("Exploration {}", exploration.id);
    println!("  Status: {}", exploration.status());
    println!("  Depth: {}", exploration.current_depth);
    println!("  Nodes: {}", exploration.total_nodes);
    println!(
        "  LLM calls: {}/{}",
        exploration.total_llm_calls, exploration.config.max_llm_calls
    );
    println!("  Baseline success rate: {root_rate:.3}");
    if let Some(best) = exploration.best_success_rate {
        println!("  Best success rate: {best:.3}");
    }

    if let Some(path) = path {
        println!();
        println!("Winning path ({} steps, {:+.3}):", path.len(), path.total_improvement);
        for step in &path.path {
            println!(
                "  {}. [{}] {} -> {:.3} ({:+.3})",
                step.depth, step.category, step.action, step.success_rate, step.delta_success_rate
            );
            println!("     {}", step.rationale);
        }
    }
}

fn print_catalog(args: &ArgMatches) -> Result<()> {
    let catalog = load_catalog(args.get_one::<PathBuf>("file"))?;

    println!(
        "Action catalog v{} ({} actions)",
        catalog.version,
        catalog.action_count()
    );
    for category in &catalog.categories {
        println!();
        println!("{}: {}", category.name, category.description);
        for action in &category.actions {
            let impact = action.impact;
            let shifts: Vec<String> = [
                ("complexity", impact.complexity),
                ("initial_effort", impact.initial_effort),
                ("perceived_risk", impact.perceived_risk),
                ("time_to_value", impact.time_to_value),
            ]
            .into_iter()
            .filter_map(|(name, d)| d.map(|d| format!("{name} {d:+.2}")))
            .collect();
            println!("  - {} [{}]", action.description, shifts.join(", "));
        }
    }
    Ok(())
}

fn check_config(args: &ArgMatches) -> Result<()> {
    let path = args
        .get_one::<PathBuf>("file")
        .context("settings file missing")?;
    let settings = EngineSettings::load(path)?;
    println!("{}: OK", path.display());
    print!("{}", settings.to_toml()?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();

    match matches.subcommand() {
        Some(("explore", args)) => explore(args).await,
        Some(("catalog", args)) => print_catalog(args),
        Some(("check-config", args)) => check_config(args),
        _ => {
            cli().print_help()?;
            Ok(())
        }
    }
}
