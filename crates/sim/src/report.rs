use crate::{
    CardStats, DiceStats, DiceStrategyKind, Derived, EngineConfig, PoolTracking, SimError,
    StrategyKind, Tally, Totals,
};
use serde::{Serialize, Serializer};
use std::fs;
use std::path::Path;
use wagerlab_core::{
    false_statement_frequencies, DiceRules, Direction, GameRules, Granularity, Rank, Statement,
};

pub const NO_DATA: &str = "no data";

/// Ordered map; keys keep insertion order in the JSON output.
#[derive(Debug, Clone, PartialEq)]
pub struct Breakdown<T>(pub Vec<(String, T)>);

impl<T> Default for Breakdown<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> Breakdown<T> {
    pub fn get(&self, key: &str) -> Option<&T> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn push(&mut self, key: impl Into<String>, value: T) {
        self.0.push((key.into(), value));
    }
}

impl<T: Serialize> Serialize for Breakdown<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(key, value)| (key, value)))
    }
}

/// Percentage points with two decimals, or "no data".
pub fn format_percent(points: Option<f64>) -> String {
    match points {
        Some(value) => format!("{value:.2}%"),
        None => NO_DATA.to_string(),
    }
}

/// Money with four decimals, or "no data".
pub fn format_money(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("${value:.4}"),
        None => NO_DATA.to_string(),
    }
}

fn rate_percent(rate: Option<f64>) -> String {
    format_percent(rate.map(|r| r * 100.0))
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SideReport {
    pub wins: u64,
    pub win_probability: Option<f64>,
    pub win_percentage: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TallyReport {
    pub total_plays: u64,
    pub wins: u64,
    pub losses: u64,
    pub win_rate: String,
    pub net_result: i64,
}

impl From<&Tally> for TallyReport {
    fn from(tally: &Tally) -> Self {
        Self {
            total_plays: tally.plays,
            wins: tally.wins,
            losses: tally.losses,
            win_rate: rate_percent(tally.win_rate()),
            net_result: tally.net,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FirstCardReport {
    pub payout_for_higher_lower: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimal_choice: Option<String>,
    #[serde(flatten)]
    pub tally: TallyReport,
}

/// Headline figures shared by the card and dice reports.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Headline {
    pub player: SideReport,
    pub house: SideReport,
    pub house_advantage_percentage: String,
    pub total_net_winnings: i64,
    pub total_wagered: u64,
    pub total_payout: u64,
    pub expected_value_per_game: String,
    pub roi_percentage: String,
    pub net_std_dev: String,
    pub house_edge_on_wagered: String,
}

impl Headline {
    pub fn new(totals: &Totals, entry_cost: u32) -> Self {
        let derived: Option<Derived> = totals.derive(entry_cost);
        Self {
            player: SideReport {
                wins: totals.wins,
                win_probability: derived.map(|d| d.player_win_rate),
                win_percentage: rate_percent(derived.map(|d| d.player_win_rate)),
            },
            house: SideReport {
                wins: totals.losses,
                win_probability: derived.map(|d| d.house_win_rate),
                win_percentage: rate_percent(derived.map(|d| d.house_win_rate)),
            },
            house_advantage_percentage: format_percent(derived.map(|d| d.house_advantage)),
            total_net_winnings: totals.net,
            total_wagered: totals.wagered,
            total_payout: totals.payout,
            expected_value_per_game: format_money(derived.map(|d| d.expected_value)),
            roi_percentage: format_percent(derived.and_then(|d| d.roi)),
            net_std_dev: format_money(derived.map(|d| d.net_std_dev)),
            house_edge_on_wagered: format_percent(derived.and_then(|d| d.house_edge_on_wagered)),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StrategyReport {
    pub strategy: String,
    pub total_simulations: u64,
    #[serde(flatten)]
    pub headline: Headline,
    pub breakdown_by_first_card: Breakdown<FirstCardReport>,
    pub breakdown_by_choice: Breakdown<TallyReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown_by_stages_played: Option<Breakdown<TallyReport>>,
}

impl StrategyReport {
    pub fn new(kind: StrategyKind, rules: &GameRules, stats: &CardStats) -> Self {
        let stage_one = rules.stages.first().map(|stage| stage.payouts);
        let mut by_first_card = Breakdown::default();
        for rank in Rank::ALL {
            let optimal_choice = if kind == StrategyKind::Random {
                None
            } else {
                stats.choice_at_rank[rank.index()].map(|guess| guess.label())
            };
            by_first_card.push(
                rank.label(),
                FirstCardReport {
                    payout_for_higher_lower: stage_one
                        .map(|table| table.payout(rank, Direction::Higher))
                        .unwrap_or(0),
                    optimal_choice,
                    tally: TallyReport::from(stats.first_card(rank)),
                },
            );
        }
        let mut by_choice = Breakdown::default();
        for direction in Direction::ALL {
            by_choice.push(direction.name(), TallyReport::from(stats.choice(direction)));
        }
        let by_stages = if rules.stage_count() > 1 {
            let mut breakdown = Breakdown::default();
            for depth in 0..rules.stage_count() {
                let tally = stats.by_stages_played.get(depth).copied().unwrap_or_default();
                breakdown.push(format!("{}", depth + 1), TallyReport::from(&tally));
            }
            Some(breakdown)
        } else {
            None
        };
        Self {
            strategy: kind.label(rules.granularity).to_string(),
            total_simulations: stats.totals.rounds,
            headline: Headline::new(&stats.totals, rules.entry_cost()),
            breakdown_by_first_card: by_first_card,
            breakdown_by_choice: by_choice,
            breakdown_by_stages_played: by_stages,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StageReport {
    pub stage: usize,
    pub cost: u32,
    pub payout_table_higher_lower: Breakdown<u32>,
    pub payout_tie: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GameReport {
    pub game: String,
    pub game_id: String,
    pub granularity: Granularity,
    pub cost_to_play: u32,
    pub stages: Vec<StageReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continue_probability: Option<f64>,
    pub pool_tracking: PoolTracking,
    pub seed: u64,
    pub total_simulations: u64,
    pub strategies: Breakdown<StrategyReport>,
}

impl GameReport {
    pub fn new(rules: &GameRules, engine: &EngineConfig, seed: u64, rounds: u64) -> Self {
        let stages = rules
            .stages
            .iter()
            .enumerate()
            .map(|(index, stage)| StageReport {
                stage: index + 1,
                cost: stage.cost,
                payout_table_higher_lower: Breakdown(
                    Rank::ALL
                        .iter()
                        .map(|rank| {
                            (
                                rank.label().to_string(),
                                stage.payouts.payout(*rank, Direction::Higher),
                            )
                        })
                        .collect(),
                ),
                payout_tie: stage.payouts.tie,
            })
            .collect();
        Self {
            game: rules.display_name.clone(),
            game_id: rules.id.clone(),
            granularity: rules.granularity,
            cost_to_play: rules.entry_cost(),
            stages,
            continue_probability: (rules.stage_count() > 1).then_some(engine.continue_probability),
            pool_tracking: engine.pool_tracking,
            seed,
            total_simulations: rounds,
            strategies: Breakdown::default(),
        }
    }

    pub fn add_strategy(&mut self, kind: StrategyKind, report: StrategyReport) {
        self.strategies.push(kind.report_key(), report);
    }

    pub fn to_text_report(&self) -> String {
        let rule = "=".repeat(70);
        let mut lines = vec![
            rule.clone(),
            format!("RESULTS SUMMARY: {}", self.game),
            rule.clone(),
            format!(
                "rounds per strategy: {}  cost to play: ${}",
                self.total_simulations, self.cost_to_play
            ),
        ];
        if let Some(p) = self.continue_probability {
            lines.push(format!("continuation probability: {p:.2}"));
        }
        for (_, report) in &self.strategies.0 {
            lines.push(String::new());
            lines.push(format!("{}:", report.strategy));
            push_headline(&mut lines, &report.headline);
        }
        lines.push(rule);
        lines.join("\n")
    }

    pub fn write_json(&self, path: &Path) -> Result<(), SimError> {
        write_json(path, self)
    }
}

fn push_headline(lines: &mut Vec<String>, headline: &Headline) {
    lines.push(format!(
        "  Player Win Rate: {}",
        headline.player.win_percentage
    ));
    lines.push(format!(
        "  House Advantage: {}",
        headline.house_advantage_percentage
    ));
    lines.push(format!(
        "  Expected Value: {}",
        headline.expected_value_per_game
    ));
    lines.push(format!("  ROI: {}", headline.roi_percentage));
    lines.push(format!(
        "  Total Net Winnings: ${}",
        headline.total_net_winnings
    ));
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatementReport {
    pub occurrences: u64,
    /// Share of all 216 rolls for which this is the false statement.
    pub exact_probability: f64,
    pub player_wins: u64,
    pub house_wins: u64,
    pub player_win_rate: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DiceStrategyReport {
    pub strategy: String,
    pub simulations: u64,
    #[serde(flatten)]
    pub headline: Headline,
    pub breakdown_by_false_statement: Breakdown<StatementReport>,
    pub breakdown_by_guess: Breakdown<TallyReport>,
}

impl DiceStrategyReport {
    pub fn new(kind: DiceStrategyKind, rules: DiceRules, stats: &DiceStats) -> Self {
        let frequencies = false_statement_frequencies();
        let mut by_statement = Breakdown::default();
        let mut by_guess = Breakdown::default();
        for statement in Statement::ALL {
            let tally = stats.false_statement(statement);
            by_statement.push(
                statement.label(),
                StatementReport {
                    occurrences: tally.plays,
                    exact_probability: frequencies[statement.index()] as f64 / 216.0,
                    player_wins: tally.wins,
                    house_wins: tally.losses,
                    player_win_rate: rate_percent(tally.win_rate()),
                },
            );
            by_guess.push(
                statement.label(),
                TallyReport::from(&stats.by_guess[statement.index()]),
            );
        }
        Self {
            strategy: kind.label().to_string(),
            simulations: stats.totals.rounds,
            headline: Headline::new(&stats.totals, rules.cost),
            breakdown_by_false_statement: by_statement,
            breakdown_by_guess: by_guess,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DiceReport {
    pub game: String,
    pub cost_to_play: u32,
    pub payout: u32,
    pub seed: u64,
    pub simulations: u64,
    pub strategies: Breakdown<DiceStrategyReport>,
}

impl DiceReport {
    pub fn new(rules: DiceRules, seed: u64, simulations: u64) -> Self {
        Self {
            game: "Two Truths and a Lie (Dice Edition)".to_string(),
            cost_to_play: rules.cost,
            payout: rules.payout,
            seed,
            simulations,
            strategies: Breakdown::default(),
        }
    }

    pub fn add_strategy(&mut self, kind: DiceStrategyKind, report: DiceStrategyReport) {
        self.strategies.push(kind.report_key(), report);
    }

    pub fn to_text_report(&self) -> String {
        let rule = "=".repeat(70);
        let mut lines = vec![
            rule.clone(),
            format!("RESULTS SUMMARY: {}", self.game),
            rule.clone(),
            format!("simulations per strategy: {}", self.simulations),
        ];
        for (_, report) in &self.strategies.0 {
            lines.push(String::new());
            lines.push(format!("{}:", report.strategy));
            push_headline(&mut lines, &report.headline);
            for (label, statement) in &report.breakdown_by_false_statement.0 {
                lines.push(format!(
                    "    false \"{label}\": {} rolls, player win rate {}",
                    statement.occurrences, statement.player_win_rate
                ));
            }
        }
        lines.push(rule);
        lines.join("\n")
    }

    pub fn write_json(&self, path: &Path) -> Result<(), SimError> {
        write_json(path, self)
    }
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), SimError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let body = serde_json::to_string_pretty(value)?;
    fs::write(path, body)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_rates_and_money() {
        assert_eq!(format_percent(Some(12.3456)), "12.35%");
        assert_eq!(format_percent(None), NO_DATA);
        assert_eq!(format_money(Some(-1.07)), "$-1.0700");
        assert_eq!(format_money(None), NO_DATA);
    }

    #[test]
    fn breakdown_defaults_without_default_values() {
        let reports: Breakdown<TallyReport> = Breakdown::default();
        assert!(reports.0.is_empty());
        let mut stages: Breakdown<StageReport> = Breakdown::default();
        stages.push(
            "1",
            StageReport {
                stage: 1,
                cost: 2,
                payout_table_higher_lower: Breakdown::default(),
                payout_tie: 8,
            },
        );
        assert_eq!(stages.get("1").map(|stage| stage.payout_tie), Some(8));
        assert!(stages.get("2").is_none());
    }

    #[test]
    fn breakdown_keeps_insertion_order() {
        let mut breakdown = Breakdown::default();
        breakdown.push("K", 1u32);
        breakdown.push("A", 2u32);
        breakdown.push("10", 3u32);
        let body = serde_json::to_string(&breakdown).expect("serialize");
        assert_eq!(body, r#"{"K":1,"A":2,"10":3}"#);
    }

    #[test]
    fn empty_batch_reports_no_data() {
        let rules = GameRules::high_low_plus();
        let report = StrategyReport::new(StrategyKind::Random, &rules, &CardStats::default());
        assert_eq!(report.total_simulations, 0);
        assert_eq!(report.headline.player.win_percentage, NO_DATA);
        assert_eq!(report.headline.player.win_probability, None);
        assert_eq!(report.headline.house_advantage_percentage, NO_DATA);
        assert_eq!(report.headline.expected_value_per_game, NO_DATA);
        assert_eq!(report.headline.roi_percentage, NO_DATA);
        let ace = report.breakdown_by_first_card.get("A").expect("ace entry");
        assert_eq!(ace.tally.win_rate, NO_DATA);
        assert_eq!(ace.payout_for_higher_lower, 1);
    }

    #[test]
    fn game_report_lists_stage_tables() {
        let rules = GameRules::high_low_double();
        let report = GameReport::new(&rules, &EngineConfig::default(), 7, 0);
        assert_eq!(report.stages.len(), 2);
        assert_eq!(report.stages[1].payout_tie, 12);
        assert_eq!(report.stages[0].payout_table_higher_lower.get("7"), Some(&4));
        assert_eq!(report.continue_probability, Some(0.5));
        let body = serde_json::to_value(&report).expect("serialize");
        assert_eq!(body["stages"][1]["payout_table_higher_lower"]["7"], 5);
    }
}
