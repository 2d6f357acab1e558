//! Criterion benchmarks for wealthsim_core
//!
//! Run with: cargo bench -p wealthsim_core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use wealthsim_core::aggregate::percentile_bands;
use wealthsim_core::drawdown::analyze_drawdowns;
use wealthsim_core::model::SpendingEvent;
use wealthsim_core::paths::PathGenerator;
use wealthsim_core::regime::RegimeSchedule;
use wealthsim_core::spending::build_spending_schedule;
use wealthsim_core::{SimulationParameters, run_simulation};

fn create_params(num_simulations: usize) -> SimulationParameters {
    SimulationParameters {
        initial_value: 1_000_000.0,
        annual_return: 0.07,
        annual_volatility: 0.15,
        duration_years: 30,
        num_simulations,
        inflation_rate: 0.03,
        start_year: Some(2025),
        spending_events: vec![
            SpendingEvent::Recurring {
                amount: 10_000.0,
                start_quarter: 1,
                end_quarter: 120,
                frequency: 1,
            },
            SpendingEvent::OneTime {
                amount: 150_000.0,
                quarter: 40,
            },
        ],
        seed: Some(42),
        ..Default::default()
    }
}

fn create_generator(params: &SimulationParameters) -> PathGenerator {
    let start_year = params.resolved_start_year();
    let regimes = RegimeSchedule::from_parameters(params, start_year);
    let spending = build_spending_schedule(params).expect("valid spending");
    PathGenerator::new(
        params.initial_value,
        &regimes,
        params.drag(),
        &spending,
        params.seed.unwrap_or_default(),
    )
}

fn bench_run_simulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_simulation");

    for num_simulations in [1_000, 5_000, 10_000].iter() {
        let params = create_params(*num_simulations);
        group.bench_with_input(
            BenchmarkId::new("paths", num_simulations),
            num_simulations,
            |b, _| b.iter(|| run_simulation(black_box(&params))),
        );
    }

    group.finish();
}

fn bench_path_generation(c: &mut Criterion) {
    let params = create_params(5_000);
    let generator = create_generator(&params);

    c.bench_function("generate_5000x120", |b| {
        b.iter(|| generator.generate(black_box(5_000)))
    });
}

fn bench_reductions(c: &mut Criterion) {
    let params = create_params(5_000);
    let paths = create_generator(&params)
        .generate(5_000)
        .expect("valid ensemble");

    let mut group = c.benchmark_group("reductions");
    group.bench_function("percentile_bands", |b| {
        b.iter(|| percentile_bands(black_box(&paths)))
    });
    group.bench_function("drawdowns", |b| {
        b.iter(|| analyze_drawdowns(black_box(&paths)))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_run_simulation,
    bench_path_generation,
    bench_reductions
);
criterion_main!(benches);
