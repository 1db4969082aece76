use wagerlab_core::{
    classify, evaluate_statements, false_count, false_statement, false_statement_frequencies,
    ConfigError, DiceRoll, Direction, GameRules, Statement,
};

macro_rules! classify_case {
    ($name:ident, $reference:expr, $drawn:expr, $expected:expr) => {
        #[test]
        fn $name() {
            assert_eq!(classify($reference, $drawn), $expected);
        }
    };
}

classify_case!(classify_ace_then_king, 1, 13, Direction::Higher);
classify_case!(classify_king_then_ace, 13, 1, Direction::Lower);
classify_case!(classify_seven_pair, 7, 7, Direction::Tie);
classify_case!(classify_adjacent_up, 6, 7, Direction::Higher);
classify_case!(classify_adjacent_down, 8, 7, Direction::Lower);

macro_rules! payout_case {
    ($name:ident, $ordinal:expr, $expected:expr) => {
        #[test]
        fn $name() {
            let table = GameRules::high_low_plus().stages[0].payouts;
            assert_eq!(table.payout_for($ordinal, Direction::Higher), Ok($expected));
            assert_eq!(table.payout_for($ordinal, Direction::Lower), Ok($expected));
            assert_eq!(table.payout_for($ordinal, Direction::Tie), Ok(8));
        }
    };
}

payout_case!(payout_ace, 1, 1);
payout_case!(payout_two, 2, 2);
payout_case!(payout_three, 3, 2);
payout_case!(payout_four, 4, 3);
payout_case!(payout_five, 5, 3);
payout_case!(payout_six, 6, 3);
payout_case!(payout_seven, 7, 4);
payout_case!(payout_eight, 8, 3);
payout_case!(payout_nine, 9, 3);
payout_case!(payout_ten, 10, 3);
payout_case!(payout_jack, 11, 2);
payout_case!(payout_queen, 12, 2);
payout_case!(payout_king, 13, 1);

#[test]
fn payout_table_is_symmetric_around_seven() {
    let table = GameRules::high_low_plus().stages[0].payouts;
    for offset in 1..=6u8 {
        assert_eq!(
            table.payout_for(7 - offset, Direction::Higher),
            table.payout_for(7 + offset, Direction::Higher)
        );
    }
}

#[test]
fn continuation_schedule_pays_more_than_entry() {
    let rules = GameRules::high_low_double();
    let entry = rules.stages[0].payouts;
    let next = rules.stages[1].payouts;
    assert!(next.tie > entry.tie);
    for ordinal in 1..=13 {
        let a = entry.payout_for(ordinal, Direction::Higher).expect("in range");
        let b = next.payout_for(ordinal, Direction::Higher).expect("in range");
        assert!(b > a);
    }
}

#[test]
fn payout_lookup_outside_deck_fails() {
    let table = GameRules::high_low_double().stages[1].payouts;
    assert_eq!(
        table.payout_for(0, Direction::Lower),
        Err(ConfigError::RankOutOfRange(0))
    );
    assert_eq!(
        table.payout_for(200, Direction::Tie),
        Err(ConfigError::RankOutOfRange(200))
    );
}

#[test]
fn every_roll_has_a_false_statement() {
    let mut rolls = 0;
    for roll in DiceRoll::all() {
        rolls += 1;
        let truths = evaluate_statements(roll);
        assert!(truths.iter().any(|held| !held), "{roll:?}");
        // pair and all-different are complements
        assert_ne!(truths[0], truths[2], "{roll:?}");
        let lie = false_statement(roll);
        assert!(!truths[lie.index()]);
        assert!(truths[..lie.index()].iter().all(|held| *held));
    }
    assert_eq!(rolls, 216);
}

#[test]
fn low_sums_carry_two_false_statements() {
    let mut doubled = 0;
    for roll in DiceRoll::all() {
        let expected = if roll.sum() >= 11 { 1 } else { 2 };
        assert_eq!(false_count(roll), expected, "{roll:?}");
        if expected == 2 {
            doubled += 1;
        }
    }
    assert_eq!(doubled, 108);
}

#[test]
fn false_statement_distribution() {
    assert_eq!(false_statement_frequencies(), [120, 48, 48]);
}

macro_rules! lie_case {
    ($name:ident, $roll:expr, $expected:expr) => {
        #[test]
        fn $name() {
            let roll = DiceRoll::new($roll).expect("valid roll");
            assert_eq!(false_statement(roll), $expected);
        }
    };
}

lie_case!(lie_all_different_high, [4, 5, 6], Statement::AtLeastTwoSame);
lie_case!(lie_all_different_low, [1, 2, 3], Statement::AtLeastTwoSame);
lie_case!(lie_pair_low_sum, [2, 2, 3], Statement::SumAtLeastEleven);
lie_case!(lie_triple_ones, [1, 1, 1], Statement::SumAtLeastEleven);
lie_case!(lie_pair_high_sum, [6, 6, 1], Statement::AllDifferent);
lie_case!(lie_triple_fours, [4, 4, 4], Statement::AllDifferent);

#[test]
fn rejects_die_faces_outside_range() {
    assert_eq!(DiceRoll::new([0, 3, 3]), Err(ConfigError::DieOutOfRange(0)));
    assert_eq!(DiceRoll::new([1, 7, 3]), Err(ConfigError::DieOutOfRange(7)));
}
