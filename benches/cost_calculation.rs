use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use llmcost_core::normalizer::normalize_all;
use llmcost_core::types::{ModelId, ModelRecord, RawCatalogEntry, RawPricing, TokenCounts};
use llmcost_pricing::cost_calculator::CostCalculator;
use llmcost_pricing::currency::{Currency, CurrencyConverter};
use serde_json::json;
use std::hint::black_box;

fn create_test_model() -> ModelRecord {
    ModelRecord {
        id: ModelId::new("anthropic/claude-3"),
        name: "Claude 3".to_string(),
        provider: "Anthropic".to_string(),
        input_price_per_million: 3.0,
        output_price_per_million: 15.0,
        context_window: 200_000,
    }
}

fn create_raw_catalog(size: usize) -> Vec<RawCatalogEntry> {
    (0..size)
        .map(|i| RawCatalogEntry {
            id: format!("provider-{}/model-{}", i % 25, i),
            name: Some(format!("Model {i}")),
            pricing: Some(RawPricing {
                prompt: Some(json!(format!("{:.8}", (i % 50) as f64 * 1e-7))),
                completion: Some(json!(format!("{:.8}", (i % 70) as f64 * 2e-7))),
            }),
            context_length: Some(json!(8192 * (1 + i % 16))),
        })
        .collect()
}

fn benchmark_cost_calculation(c: &mut Criterion) {
    let mut group = c.benchmark_group("cost_calculation");
    let model = create_test_model();

    group.bench_function("calculate_from_pricing", |b| {
        let tokens = TokenCounts::new(20_000, 100_000);
        b.iter(|| CostCalculator::calculate_from_pricing(black_box(&model), black_box(&tokens)));
    });

    group.bench_function("calculate_converted", |b| {
        let tokens = TokenCounts::new(20_000, 100_000);
        let calculator = CostCalculator::with_converter(&CurrencyConverter::fallback(Currency::Eur));
        b.iter(|| calculator.calculate(black_box(&model), black_box(&tokens)));
    });

    group.finish();
}

fn benchmark_catalog(c: &mut Criterion) {
    let mut group = c.benchmark_group("catalog");
    let tokens = TokenCounts::new(20_000, 100_000);

    for size in [100, 400, 1000] {
        let raw = create_raw_catalog(size);
        group.bench_with_input(BenchmarkId::new("normalize_all", size), &raw, |b, raw| {
            b.iter(|| normalize_all(black_box(raw)));
        });

        let models = normalize_all(&raw);
        group.bench_with_input(BenchmarkId::new("calculate_all", size), &models, |b, models| {
            let calculator = CostCalculator::new();
            b.iter(|| calculator.calculate_all(black_box(models), black_box(&tokens)));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_cost_calculation, benchmark_catalog);
criterion_main!(benches);
