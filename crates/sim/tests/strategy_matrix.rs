use wagerlab_core::{Card, Direction, GameRules, Guess, Pool, Rank, Suit};
use wagerlab_sim::{
    run_comparison, run_dice, run_strategy, BatchConfig, Decision, ExpectedValueStrategy,
    GameReport, Strategy, StrategyKind, StrategyReport, SuitAwareStrategy, ValueOnlyStrategy,
    NO_DATA,
};

fn decide(kind: StrategyKind, rules: &GameRules, reference: Card) -> Guess {
    let mut pool = Pool::full();
    pool.remove(reference);
    let decision = Decision {
        reference,
        pool: &pool,
        stage: &rules.stages[0],
        granularity: rules.granularity,
    };
    kind.build(11).choose(&decision)
}

macro_rules! ev_case {
    ($name:ident, $rank:expr, $expected:expr) => {
        #[test]
        fn $name() {
            let rules = GameRules::high_low_plus();
            let guess = decide(
                StrategyKind::ExpectedValue,
                &rules,
                Card::new(Suit::Hearts, $rank),
            );
            assert_eq!(guess, Guess::direction($expected));
        }
    };
}

ev_case!(ev_ace_calls_higher, Rank::Ace, Direction::Higher);
ev_case!(ev_two_calls_higher, Rank::Two, Direction::Higher);
ev_case!(ev_six_calls_higher, Rank::Six, Direction::Higher);
ev_case!(ev_seven_tie_breaks_higher, Rank::Seven, Direction::Higher);
ev_case!(ev_eight_calls_lower, Rank::Eight, Direction::Lower);
ev_case!(ev_king_calls_lower, Rank::King, Direction::Lower);

macro_rules! value_case {
    ($name:ident, $rank:expr, $expected:expr) => {
        #[test]
        fn $name() {
            let rules = GameRules::high_low_plus();
            let guess = decide(StrategyKind::ValueOnly, &rules, Card::new(Suit::Clubs, $rank));
            assert_eq!(guess, Guess::direction($expected));
        }
    };
}

value_case!(value_ace_calls_higher, Rank::Ace, Direction::Higher);
value_case!(value_five_calls_higher, Rank::Five, Direction::Higher);
value_case!(value_seven_calls_higher, Rank::Seven, Direction::Higher);
value_case!(value_nine_calls_lower, Rank::Nine, Direction::Lower);
value_case!(value_king_calls_lower, Rank::King, Direction::Lower);

#[test]
fn ev_is_deterministic_for_a_fixed_pool() {
    let rules = GameRules::high_low_plus();
    let reference = Card::new(Suit::Diamonds, Rank::Seven);
    let mut pool = Pool::full();
    pool.remove(reference);
    let decision = Decision {
        reference,
        pool: &pool,
        stage: &rules.stages[0],
        granularity: rules.granularity,
    };
    let mut strategy = ExpectedValueStrategy;
    let first = strategy.choose(&decision);
    for _ in 0..100 {
        assert_eq!(strategy.choose(&decision), first);
    }
    assert_eq!(first, Guess::direction(Direction::Higher));
}

#[test]
fn value_only_suited_picks_first_fullest_suit() {
    let rules = GameRules::high_low_suited();
    let reference = Card::new(Suit::Spades, Rank::Ace);
    let mut pool = Pool::full();
    pool.remove(reference);
    let decision = Decision {
        reference,
        pool: &pool,
        stage: &rules.stages[0],
        granularity: rules.granularity,
    };
    let guess = ValueOnlyStrategy.choose(&decision);
    assert_eq!(guess, Guess::suited(Direction::Higher, Suit::Spades));
}

#[test]
fn suited_ev_breaks_ties_by_suit_order_then_direction() {
    let rules = GameRules::high_low_suited();
    let reference = Card::new(Suit::Spades, Rank::Seven);
    let guess = decide(StrategyKind::ExpectedValue, &rules, reference);
    assert_eq!(guess.direction, Direction::Higher);
    assert_eq!(guess.suit, Some(Suit::Spades));
}

fn suit_cards(suit: Suit, ranks: &[Rank]) -> Vec<Card> {
    ranks.iter().map(|rank| Card::new(suit, *rank)).collect()
}

macro_rules! suit_aware_case {
    ($name:ident, $rules:expr, $reference:expr, $removed:expr, $expected:expr) => {
        #[test]
        fn $name() {
            let rules = $rules;
            let reference = $reference;
            let mut pool = Pool::full();
            pool.remove(reference);
            for card in $removed {
                assert!(pool.remove(card));
            }
            let decision = Decision {
                reference,
                pool: &pool,
                stage: &rules.stages[0],
                granularity: rules.granularity,
            };
            assert_eq!(SuitAwareStrategy.choose(&decision), $expected);
        }
    };
}

suit_aware_case!(
    suit_aware_lower_beats_empty_higher_in_first_suit,
    GameRules::high_low_suited(),
    Card::new(Suit::Spades, Rank::Seven),
    suit_cards(Suit::Spades, &Rank::ALL[7..]),
    Guess::suited(Direction::Lower, Suit::Spades)
);
suit_aware_case!(
    suit_aware_tied_suits_keep_the_first,
    GameRules::high_low_suited(),
    Card::new(Suit::Spades, Rank::Seven),
    [
        suit_cards(Suit::Spades, &Rank::ALL[..6]),
        suit_cards(Suit::Spades, &Rank::ALL[7..]),
        suit_cards(Suit::Hearts, &[Rank::Two]),
    ]
    .concat(),
    Guess::suited(Direction::Higher, Suit::Hearts)
);
suit_aware_case!(
    suit_aware_picks_the_only_full_suit,
    GameRules::high_low_suited(),
    Card::new(Suit::Clubs, Rank::Two),
    vec![
        Card::new(Suit::Spades, Rank::Three),
        Card::new(Suit::Hearts, Rank::Three),
        Card::new(Suit::Clubs, Rank::Three),
    ],
    Guess::suited(Direction::Higher, Suit::Diamonds)
);
suit_aware_case!(
    suit_aware_drops_suit_in_direction_game,
    GameRules::high_low_plus(),
    Card::new(Suit::Diamonds, Rank::King),
    Vec::<Card>::new(),
    Guess::direction(Direction::Lower)
);
suit_aware_case!(
    suit_aware_follows_best_suit_not_best_total,
    GameRules::high_low_plus(),
    Card::new(Suit::Hearts, Rank::Seven),
    [
        suit_cards(Suit::Hearts, &Rank::ALL[7..]),
        suit_cards(Suit::Clubs, &Rank::ALL[7..]),
        suit_cards(Suit::Diamonds, &Rank::ALL[7..]),
    ]
    .concat(),
    Guess::direction(Direction::Higher)
);

#[test]
fn value_only_follows_best_total_where_suit_aware_does_not() {
    let rules = GameRules::high_low_plus();
    let reference = Card::new(Suit::Hearts, Rank::Seven);
    let mut pool = Pool::full();
    pool.remove(reference);
    for suit in [Suit::Hearts, Suit::Clubs, Suit::Diamonds] {
        for card in suit_cards(suit, &Rank::ALL[7..]) {
            pool.remove(card);
        }
    }
    let decision = Decision {
        reference,
        pool: &pool,
        stage: &rules.stages[0],
        granularity: rules.granularity,
    };
    assert_eq!(
        ValueOnlyStrategy.choose(&decision),
        Guess::direction(Direction::Lower)
    );
}

#[test]
fn zero_rounds_report_no_data() {
    let rules = GameRules::high_low_plus();
    let config = BatchConfig {
        rounds: 0,
        ..BatchConfig::default()
    };
    let stats = run_strategy(&rules, StrategyKind::Random, &config).expect("empty batch");
    let report = StrategyReport::new(StrategyKind::Random, &rules, &stats);
    assert_eq!(report.headline.player.win_percentage, NO_DATA);
    assert_eq!(report.headline.house_advantage_percentage, NO_DATA);
    assert_eq!(report.headline.expected_value_per_game, NO_DATA);
    let dice = run_dice(Default::default(), 3, 0, 2);
    let random = dice.strategies.get("random_strategy").expect("random entry");
    assert_eq!(random.headline.player.win_percentage, NO_DATA);
}

#[test]
fn random_play_favours_the_house_over_a_million_rounds() {
    let rules = GameRules::high_low_plus();
    let config = BatchConfig {
        rounds: 1_000_000,
        shards: 8,
        seed: 2024,
        ..BatchConfig::default()
    };
    let stats = run_strategy(&rules, StrategyKind::Random, &config).expect("batch");
    let derived = stats.totals.derive(rules.entry_cost()).expect("rounds played");
    assert!(derived.house_advantage > 0.0);
    assert!(derived.expected_value < 0.0);
    // Analytic value for uniform calls is about -1.0709 per round.
    assert!((derived.expected_value + 1.0709).abs() < 0.03, "{}", derived.expected_value);
    assert!((derived.player_win_rate - 1.0 / 3.0).abs() < 0.01);
}

#[test]
fn expected_value_policy_beats_random() {
    let rules = GameRules::high_low_plus();
    let config = BatchConfig {
        rounds: 200_000,
        shards: 4,
        ..BatchConfig::default()
    };
    let random = run_strategy(&rules, StrategyKind::Random, &config).expect("random");
    let optimal = run_strategy(&rules, StrategyKind::ExpectedValue, &config).expect("optimal");
    let random_ev = random.totals.derive(2).expect("rounds").expected_value;
    let optimal_ev = optimal.totals.derive(2).expect("rounds").expected_value;
    assert!(optimal_ev > random_ev);
    // Analytic value for the EV policy is about -0.3348 per round.
    assert!((optimal_ev + 0.3348).abs() < 0.05, "{optimal_ev}");
}

#[test]
fn sharded_breakdowns_account_for_every_round() {
    let rules = GameRules::high_low_plus();
    let config = BatchConfig {
        rounds: 5_000,
        shards: 5,
        ..BatchConfig::default()
    };
    let stats = run_strategy(&rules, StrategyKind::ValueOnly, &config).expect("batch");
    assert_eq!(stats.totals.rounds, 5_000);
    let by_card: u64 = stats.by_first_card.iter().map(|tally| tally.plays).sum();
    let by_choice: u64 = stats.by_choice.iter().map(|tally| tally.plays).sum();
    assert_eq!(by_card, 5_000);
    assert_eq!(by_choice, 5_000);
    assert_eq!(
        stats.totals.wins + stats.totals.losses,
        stats.totals.rounds
    );
}

#[test]
fn double_game_reports_stage_depths() {
    let rules = GameRules::high_low_double();
    let config = BatchConfig {
        rounds: 4_000,
        shards: 2,
        strategies: vec![StrategyKind::ExpectedValue],
        ..BatchConfig::default()
    };
    let report: GameReport = run_comparison(&rules, &config).expect("comparison");
    let optimal = report.strategies.get("optimal_strategy").expect("optimal entry");
    let depths = optimal
        .breakdown_by_stages_played
        .as_ref()
        .expect("two-stage breakdown");
    let played: u64 = depths.0.iter().map(|(_, tally)| tally.total_plays).sum();
    assert_eq!(played, 4_000);
    assert!(depths.get("2").expect("second stage").total_plays > 0);
}

#[test]
fn dice_most_likely_beats_random() {
    let report = run_dice(Default::default(), 9, 60_000, 3);
    let random = report.strategies.get("random_strategy").expect("random");
    let likely = report.strategies.get("most_likely_strategy").expect("likely");
    assert!(likely.headline.total_net_winnings > random.headline.total_net_winnings);
    let pair = likely
        .breakdown_by_false_statement
        .get("At least 2 same")
        .expect("pair bucket");
    assert!((pair.exact_probability - 120.0 / 216.0).abs() < 1e-12);
}
