// Integration tests for ladder construction

use paper_grid_bot::{GridLadder, TradingError};

#[test]
fn test_reference_scenario_levels() {
    let ladder = GridLadder::build(100.0, 2, 0.01, 100.0).unwrap();
    let levels = ladder.levels();

    assert_eq!(levels.len(), 2);
    assert!((levels[0].buy_price - 99.0).abs() < 1e-9);
    assert!((levels[1].buy_price - 98.0).abs() < 1e-9);
    assert_eq!(levels[0].amount, 50.0);
    assert_eq!(levels[1].amount, 50.0);
    assert!(levels.iter().all(|l| !l.triggered));
}

#[test]
fn test_levels_strictly_decreasing_and_amounts_sum() {
    let cases = [
        (100.0, 1, 0.01, 100.0),
        (0.5123, 10, 0.01, 250.0),
        (64000.0, 7, 0.02, 1000.0),
        (3.0, 33, 0.025, 99.99),
    ];

    for (reference, count, step, total) in cases {
        let ladder = GridLadder::build(reference, count, step, total).unwrap();
        let levels = ladder.levels();

        assert_eq!(levels.len(), count);
        for pair in levels.windows(2) {
            assert!(pair[0].buy_price > pair[1].buy_price);
        }
        assert!(levels.iter().all(|l| l.buy_price > 0.0 && l.buy_price < reference));

        let sum: f64 = levels.iter().map(|l| l.amount).sum();
        assert!((sum - total).abs() < 1e-9, "sum {} != {}", sum, total);
    }
}

#[test]
fn test_invalid_parameters_rejected() {
    let bad = [
        (100.0, 0, 0.01, 100.0),
        (0.0, 2, 0.01, 100.0),
        (-1.0, 2, 0.01, 100.0),
    ];

    for (reference, count, step, total) in bad {
        let result = GridLadder::build(reference, count, step, total);
        assert!(
            matches!(result, Err(TradingError::InvalidConfiguration(_))),
            "expected rejection for {:?}",
            (reference, count, step, total)
        );
    }
}

#[test]
fn test_deep_ladder_keeps_every_level() {
    // 100 rungs at 1% reach zero at the deepest level
    let ladder = GridLadder::build(100.0, 100, 0.01, 100.0).unwrap();
    let levels = ladder.levels();

    assert_eq!(levels.len(), 100);
    for pair in levels.windows(2) {
        assert!(pair[0].buy_price > pair[1].buy_price);
    }
    assert!(levels[99].buy_price.abs() < 1e-9);
    let sum: f64 = levels.iter().map(|l| l.amount).sum();
    assert!((sum - 100.0).abs() < 1e-9);

    // Steps past the reference price and empty balances are built as given
    let steep = GridLadder::build(100.0, 3, 0.5, 90.0).unwrap();
    assert_eq!(steep.levels().len(), 3);
    assert!(steep.levels()[2].buy_price < 0.0);

    let unfunded = GridLadder::build(100.0, 2, 0.01, 0.0).unwrap();
    assert!(unfunded.levels().iter().all(|l| l.amount == 0.0));
}

#[test]
fn test_triggered_flag_never_reverts() {
    let mut ladder = GridLadder::build(100.0, 3, 0.01, 90.0).unwrap();
    ladder.trigger(0).unwrap();

    // Prices far above and below do not clear the flag
    assert!(ladder.triggerable(1.0).iter().all(|&i| i != 0));
    assert!(ladder.triggerable(1000.0).is_empty());
    assert!(ladder.levels()[0].triggered);

    // Only a rebuild resets it
    let rebuilt = GridLadder::build(100.0, 3, 0.01, 90.0).unwrap();
    assert!(!rebuilt.levels()[0].triggered);
}
