//! Monte-Carlo batches. A batch splits its rounds across shards; each shard owns
//! its deck, continuation coin and strategy RNG, all derived from the batch seed
//! and the shard index, so results depend only on `(seed, rounds, shards)`.
//! Shard statistics are merged in shard order.

use crate::{
    play_dice_round, BatchConfig, CardStats, DiceReport, DiceStats, DiceStrategy,
    DiceStrategyKind, DiceStrategyReport, EngineConfig, GameReport, RoundEngine, SimError,
    StrategyKind, StrategyReport,
};
use log::{debug, info};
use rayon::prelude::*;
use wagerlab_core::{mix_seed, CardSource, DiceRules, GameRules};

const DECK_STREAM: u64 = 0;
const COIN_STREAM: u64 = 1;
const POLICY_STREAM: u64 = 2;

/// Rounds assigned to each shard; earlier shards absorb the remainder.
pub fn shard_sizes(rounds: u64, shards: usize) -> Vec<u64> {
    let shards = shards.max(1);
    let base = rounds / shards as u64;
    let extra = (rounds % shards as u64) as usize;
    (0..shards)
        .map(|index| base + u64::from(index < extra))
        .collect()
}

fn shard_seed(seed: u64, shard: usize, stream: u64) -> u64 {
    mix_seed(mix_seed(seed, shard as u64), stream)
}

fn run_card_shard(
    rules: &GameRules,
    kind: StrategyKind,
    engine: EngineConfig,
    seed: u64,
    shard: usize,
    rounds: u64,
) -> Result<CardStats, SimError> {
    let mut source = CardSource::new(shard_seed(seed, shard, DECK_STREAM));
    let mut engine = RoundEngine::new(
        rules.clone(),
        EngineConfig {
            seed: shard_seed(seed, shard, COIN_STREAM),
            ..engine
        },
    )?;
    let mut strategy = kind.build(shard_seed(seed, shard, POLICY_STREAM));
    let mut stats = CardStats::default();
    for _ in 0..rounds {
        let outcome = engine.play(&mut source, strategy.as_mut())?;
        stats.record(&outcome);
    }
    debug!(
        "shard {shard} of {} finished {rounds} rounds, {} reshuffles",
        kind.report_key(),
        source.reshuffles()
    );
    Ok(stats)
}

/// Plays `config.rounds` rounds of `rules` with one strategy.
pub fn run_strategy(
    rules: &GameRules,
    kind: StrategyKind,
    config: &BatchConfig,
) -> Result<CardStats, SimError> {
    rules.validate()?;
    config.engine.validate()?;
    let sizes = shard_sizes(config.rounds, config.shards);
    let shards: Vec<CardStats> = sizes
        .par_iter()
        .enumerate()
        .map(|(shard, rounds)| {
            run_card_shard(rules, kind, config.engine, config.seed, shard, *rounds)
        })
        .collect::<Result<_, _>>()?;
    let mut merged = CardStats::default();
    for stats in &shards {
        merged.merge(stats);
    }
    Ok(merged)
}

/// Runs every configured strategy over the same seed and collects a report.
pub fn run_comparison(rules: &GameRules, config: &BatchConfig) -> Result<GameReport, SimError> {
    let mut report = GameReport::new(rules, &config.engine, config.seed, config.rounds);
    for kind in &config.strategies {
        info!(
            "simulating {} rounds of {} with {}",
            config.rounds,
            rules.id,
            kind.report_key()
        );
        let stats = run_strategy(rules, *kind, config)?;
        report.add_strategy(*kind, StrategyReport::new(*kind, rules, &stats));
    }
    Ok(report)
}

fn run_dice_shard(
    rules: DiceRules,
    kind: DiceStrategyKind,
    seed: u64,
    shard: usize,
    rounds: u64,
) -> DiceStats {
    let mut source = CardSource::new(shard_seed(seed, shard, DECK_STREAM));
    let mut strategy = DiceStrategy::new(kind, shard_seed(seed, shard, POLICY_STREAM));
    let mut stats = DiceStats::default();
    for _ in 0..rounds {
        stats.record(&play_dice_round(rules, &mut source, &mut strategy));
    }
    stats
}

pub fn run_dice_strategy(
    rules: DiceRules,
    kind: DiceStrategyKind,
    seed: u64,
    rounds: u64,
    shards: usize,
) -> DiceStats {
    let parts: Vec<DiceStats> = shard_sizes(rounds, shards)
        .par_iter()
        .enumerate()
        .map(|(shard, count)| run_dice_shard(rules, kind, seed, shard, *count))
        .collect();
    let mut merged = DiceStats::default();
    for stats in &parts {
        merged.merge(stats);
    }
    merged
}

/// Runs both dice strategies and collects a report.
pub fn run_dice(rules: DiceRules, seed: u64, rounds: u64, shards: usize) -> DiceReport {
    let mut report = DiceReport::new(rules, seed, rounds);
    for kind in DiceStrategyKind::ALL {
        info!("simulating {rounds} dice rounds with {}", kind.report_key());
        let stats = run_dice_strategy(rules, kind, seed, rounds, shards);
        report.add_strategy(kind, DiceStrategyReport::new(kind, rules, &stats));
    }
    report
}
