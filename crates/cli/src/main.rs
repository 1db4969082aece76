mod session;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use wagerlab_core::{DiceRules, GameRules};
use wagerlab_sim::{run_comparison, run_dice, BatchConfig, EngineConfig, PoolTracking, StrategyKind};

use session::{Session, Terminal};

const DEFAULT_SEED: u64 = 0xC0FFEE;

#[derive(Parser, Debug)]
#[command(
    name = "wagerlab",
    version,
    about = "Monte-Carlo and interactive play for high-low card and dice wagers"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Simulate a card game with one or more strategies.
    Simulate(SimulateArgs),
    /// Simulate the two-truths-and-a-lie dice game.
    Dice(DiceArgs),
    /// Play a card game at the terminal.
    Play(PlayArgs),
}

#[derive(Args, Debug)]
struct GameArgs {
    /// Built-in game: high-low-plus, high-low-double or high-low-suited.
    #[arg(long, default_value = "high-low-plus")]
    game: String,
    /// JSON rules file; overrides --game.
    #[arg(long)]
    rules: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SimulateArgs {
    #[command(flatten)]
    game: GameArgs,
    #[arg(long, default_value_t = 1_000_000)]
    rounds: u64,
    /// Comma-separated: random, value, suit, ev.
    #[arg(long, value_delimiter = ',', default_value = "random,ev")]
    strategies: Vec<String>,
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
    #[arg(long, default_value_t = 1)]
    shards: usize,
    /// Chance of riding a won stage into the next one.
    #[arg(long, default_value_t = 0.5)]
    continue_probability: f64,
    /// Unseen-card model for strategies: round or deck.
    #[arg(long, default_value = "round")]
    pool: String,
    /// Report path; defaults to `<game>_simulation_results.json`.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct DiceArgs {
    #[arg(long, default_value_t = 1_000_000)]
    rounds: u64,
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
    #[arg(long, default_value_t = 1)]
    shards: usize,
    #[arg(long, default_value = "two_truths_dice_simulation_results.json")]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct PlayArgs {
    #[command(flatten)]
    game: GameArgs,
    /// Deck seed; defaults to the current time.
    #[arg(long)]
    seed: Option<u64>,
    /// Directory for the saved session document.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    match cli.command {
        Command::Simulate(args) => simulate(args),
        Command::Dice(args) => dice(args),
        Command::Play(args) => play(args),
    }
}

fn load_rules(args: &GameArgs) -> Result<GameRules> {
    let rules = match &args.rules {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("read rules {}", path.display()))?;
            let rules: GameRules = serde_json::from_str(&raw)
                .with_context(|| format!("parse rules {}", path.display()))?;
            info!("loaded rules {} from {}", rules.id, path.display());
            rules
        }
        None => GameRules::preset(&args.game).ok_or_else(|| {
            anyhow!(
                "unknown game {:?}; expected one of {}",
                args.game,
                GameRules::preset_ids().join(", ")
            )
        })?,
    };
    rules.validate().context("invalid rules")?;
    Ok(rules)
}

fn simulate(args: SimulateArgs) -> Result<()> {
    let rules = load_rules(&args.game)?;
    let Some(pool_tracking) = PoolTracking::from_keyword(&args.pool) else {
        bail!("unknown pool model {:?}; expected round or deck", args.pool);
    };
    let strategies = args
        .strategies
        .iter()
        .map(|name| StrategyKind::from_keyword(name))
        .collect::<Result<Vec<_>, _>>()?;
    if strategies.is_empty() {
        bail!("no strategies selected");
    }
    let config = BatchConfig {
        seed: args.seed,
        rounds: args.rounds,
        shards: args.shards.max(1),
        strategies,
        engine: EngineConfig {
            continue_probability: args.continue_probability,
            pool_tracking,
            seed: args.seed,
        },
    };
    let report = run_comparison(&rules, &config)?;
    println!("{}", report.to_text_report());
    let out = args
        .out
        .unwrap_or_else(|| PathBuf::from(format!("{}_simulation_results.json", rules.id)));
    report
        .write_json(&out)
        .with_context(|| format!("write report {}", out.display()))?;
    println!("Detailed results saved to '{}'", out.display());
    Ok(())
}

fn dice(args: DiceArgs) -> Result<()> {
    let report = run_dice(DiceRules::default(), args.seed, args.rounds, args.shards.max(1));
    println!("{}", report.to_text_report());
    report
        .write_json(&args.out)
        .with_context(|| format!("write report {}", args.out.display()))?;
    println!("Detailed results saved to '{}'", args.out.display());
    Ok(())
}

fn play(args: PlayArgs) -> Result<()> {
    let rules = load_rules(&args.game)?;
    let seed = args.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos() as u64)
            .unwrap_or(DEFAULT_SEED)
    });
    session::install_interrupt_handler().context("install interrupt handler")?;
    let mut session = Session::new(rules, seed);
    let mut stdout = std::io::stdout();
    session.run(&mut Terminal, &mut stdout)?;
    save_session(&session, &args.out_dir)
}

fn save_session(session: &Session, dir: &Path) -> Result<()> {
    match session
        .save(dir)
        .with_context(|| format!("save session into {}", dir.display()))?
    {
        Some(path) => println!("Game results saved to: {}", path.display()),
        None => println!("No rounds played. Nothing to save."),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_simulate_flags() {
        let cli = Cli::try_parse_from([
            "wagerlab",
            "simulate",
            "--game",
            "high-low-double",
            "--rounds",
            "500",
            "--strategies",
            "random,value,suit,ev",
            "--pool",
            "deck",
            "--shards",
            "4",
        ])
        .expect("valid flags");
        let Command::Simulate(args) = cli.command else {
            panic!("expected simulate");
        };
        assert_eq!(args.rounds, 500);
        assert_eq!(args.strategies.len(), 4);
        assert_eq!(args.shards, 4);
        assert_eq!(args.continue_probability, 0.5);
        assert_eq!(load_rules(&args.game).expect("preset").id, "high-low-double");
    }

    #[test]
    fn unknown_game_is_an_error() {
        let args = GameArgs {
            game: "baccarat".to_string(),
            rules: None,
        };
        assert!(load_rules(&args).is_err());
    }
}
