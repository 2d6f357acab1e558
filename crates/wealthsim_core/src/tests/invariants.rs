//! Properties that hold for every projection
//!
//! These tests verify that:
//! - Percentile bands are ordered at every quarter
//! - Probabilities stay within [0, 1]
//! - A fixed seed reproduces bit-identical paths
//! - Path values are never negative and depleted paths stay at zero
//! - The spending resolver ignores input order
//! - Drawdowns stay within [0, 1] and start at zero

use crate::config::SimulationParameters;
use crate::model::{SimulationResult, SpendingEvent};
use crate::simulation::run_simulation;
use crate::spending::resolve_spending_schedule;

fn volatile_params() -> SimulationParameters {
    SimulationParameters {
        initial_value: 500_000.0,
        annual_return: 0.05,
        annual_volatility: 0.25,
        duration_years: 15,
        num_simulations: 400,
        inflation_rate: 0.03,
        start_year: Some(2025),
        percentage_spending: Some(0.01),
        spending_events: vec![
            SpendingEvent::OneTime {
                amount: 80_000.0,
                quarter: 12,
            },
            SpendingEvent::Recurring {
                amount: 5_000.0,
                start_quarter: 1,
                end_quarter: 60,
                frequency: 1,
            },
        ],
        seed: Some(7),
        ..Default::default()
    }
}

fn run(params: &SimulationParameters) -> SimulationResult {
    run_simulation(params).expect("valid parameters")
}

#[test]
fn test_percentile_bands_are_ordered() {
    let result = run(&volatile_params());

    assert_eq!(result.percentiles.len(), result.total_quarters + 1);
    for quarter in 0..=result.total_quarters {
        let bands = result.percentiles.at(quarter);
        assert!(
            bands.windows(2).all(|pair| pair[0] <= pair[1]),
            "quarter {quarter}: {bands:?}"
        );
    }
}

#[test]
fn test_quarter_zero_is_initial_value() {
    let result = run(&volatile_params());

    assert!(result.paths.rows().all(|row| row[0] == 500_000.0));
    assert_eq!(result.percentiles.at(0), [500_000.0; 5]);
    assert_eq!(result.inflation_line[0], 500_000.0);
}

#[test]
fn test_probabilities_within_unit_interval() {
    let result = run(&volatile_params());
    let p = result.probabilities;

    for value in [
        p.outperform_inflation,
        p.significant_loss,
        p.depletion,
        p.maintain_value,
    ] {
        assert!((0.0..=1.0).contains(&value), "{p:?}");
    }
    // Every depleted path also lost more than half its value
    assert!(p.depletion <= p.significant_loss);
}

#[test]
fn test_fixed_seed_is_reproducible() {
    let params = volatile_params();

    let first = run(&params);
    let second = run(&params);

    assert_eq!(first.seed, 7);
    assert_eq!(first.paths, second.paths);
    assert_eq!(first.percentiles, second.percentiles);
    assert_eq!(first.probabilities, second.probabilities);
}

#[test]
fn test_different_seeds_differ() {
    let first = run(&volatile_params());
    let second = run(&SimulationParameters {
        seed: Some(8),
        ..volatile_params()
    });

    assert_ne!(first.paths, second.paths);
}

#[test]
fn test_entropy_seed_is_reported_and_replayable() {
    let params = SimulationParameters {
        seed: None,
        num_simulations: 20,
        ..volatile_params()
    };
    let first = run(&params);

    let replay = run(&SimulationParameters {
        seed: Some(first.seed),
        ..params
    });
    assert_eq!(first.paths, replay.paths);
}

#[test]
fn test_paths_do_not_depend_on_ensemble_size() {
    let small = run(&SimulationParameters {
        num_simulations: 10,
        ..volatile_params()
    });
    let large = run(&volatile_params());

    for index in 0..10 {
        assert_eq!(small.paths.row(index), large.paths.row(index));
    }
}

#[test]
fn test_values_non_negative_and_depletion_absorbing() {
    let params = SimulationParameters {
        annual_volatility: 0.4,
        fixed_spending: Some(20_000.0),
        ..volatile_params()
    };
    let result = run(&params);

    assert!(result.probabilities.depletion > 0.0);
    for row in result.paths.rows() {
        assert!(row.iter().all(|v| *v >= 0.0));
        if let Some(first_zero) = row.iter().position(|v| *v == 0.0) {
            assert!(row[first_zero..].iter().all(|v| *v == 0.0));
        }
    }
}

#[test]
fn test_full_percentage_spending_depletes_immediately() {
    let params = SimulationParameters {
        percentage_spending: Some(1.0),
        spending_events: Vec::new(),
        ..volatile_params()
    };
    let result = run(&params);

    assert!(result.paths.rows().all(|row| row[1] == 0.0));
    assert_eq!(result.probabilities.depletion, 1.0);
}

#[test]
fn test_resolver_is_order_independent() {
    let events = vec![
        SpendingEvent::OneTime {
            amount: 1_000.0,
            quarter: 4,
        },
        SpendingEvent::Recurring {
            amount: 250.0,
            start_quarter: 2,
            end_quarter: 20,
            frequency: 2,
        },
        SpendingEvent::Percentage { rate: 0.01 },
        SpendingEvent::OneTime {
            amount: 3_000.0,
            quarter: 4,
        },
        SpendingEvent::Recurring {
            amount: 500.0,
            start_quarter: 0,
            end_quarter: 20,
            frequency: 5,
        },
        SpendingEvent::Percentage { rate: 0.005 },
    ];
    let baseline = resolve_spending_schedule(&events, 20).unwrap();

    let mut reversed = events.clone();
    reversed.reverse();
    assert_eq!(resolve_spending_schedule(&reversed, 20).unwrap(), baseline);

    for shift in 1..events.len() {
        let mut rotated = events.clone();
        rotated.rotate_left(shift);
        let schedule = resolve_spending_schedule(&rotated, 20).unwrap();
        assert_eq!(schedule.fixed, baseline.fixed, "rotation {shift}");
        assert!((schedule.percentage_rate - baseline.percentage_rate).abs() < 1e-15);
    }

    // Same-quarter amounts are summed, not overwritten
    assert_eq!(baseline.fixed_at(4), 1_000.0 + 250.0 + 3_000.0);
}

#[test]
fn test_resolver_is_idempotent() {
    let events = volatile_params().spending_events;
    let first = resolve_spending_schedule(&events, 60).unwrap();
    let second = resolve_spending_schedule(&events, 60).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_drawdowns_bounded() {
    let result = run(&SimulationParameters {
        fixed_spending: Some(15_000.0),
        ..volatile_params()
    });
    let drawdown = &result.drawdown;

    assert_eq!(drawdown.path_max_drawdowns.len(), result.num_paths());
    assert!(
        drawdown
            .path_max_drawdowns
            .iter()
            .all(|d| (0.0..=1.0).contains(d))
    );
    assert!(drawdown.average_max_drawdown <= drawdown.max_drawdown);
    assert!(drawdown.p95_max_drawdown <= drawdown.max_drawdown);

    for series in [&drawdown.median, &drawdown.p75, &drawdown.p95] {
        assert_eq!(series.len(), result.total_quarters + 1);
        assert_eq!(series[0], 0.0);
        assert!(series.iter().all(|d| (0.0..=1.0).contains(d)));
    }
    for quarter in 0..=result.total_quarters {
        assert!(drawdown.median[quarter] <= drawdown.p75[quarter]);
        assert!(drawdown.p75[quarter] <= drawdown.p95[quarter]);
    }
}

#[test]
fn test_terminal_statistics_consistent() {
    let result = run(&volatile_params());
    let stats = result.terminal_stats;

    assert_eq!(result.terminal_values.len(), result.num_paths());
    assert!(stats.min <= stats.median && stats.median <= stats.max);
    assert!(stats.min <= stats.mean && stats.mean <= stats.max);
    assert!(stats.std_dev >= 0.0);
    assert!(stats.var_95 <= stats.cvar_95 + 1e-12);
    assert_eq!(stats.median, result.percentiles.p50[result.total_quarters]);
}
