use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use llmcost_core::types::{CostBreakdown, ModelId, ModelRecord};
use llmcost_core::view::{ModelFilter, Selection, SortField, SortSpec, ViewState};
use std::hint::black_box;

const PROVIDERS: &[&str] = &["OpenAI", "Anthropic", "Google", "Meta", "Mistral"];

fn create_rows(size: usize) -> Vec<CostBreakdown> {
    (0..size)
        .map(|i| {
            let provider = PROVIDERS[i % PROVIDERS.len()];
            let total = ((i * 7919) % 1000) as f64 / 100.0;
            CostBreakdown::new(
                ModelRecord {
                    id: ModelId::new(format!("{}/model-{i}", provider.to_lowercase())),
                    name: format!("{provider} Model {i}"),
                    provider: provider.to_string(),
                    input_price_per_million: total,
                    output_price_per_million: total * 3.0,
                    context_window: 4096 * (1 + (i % 32) as u64),
                },
                total / 4.0,
                total * 3.0 / 4.0,
            )
        })
        .collect()
}

fn benchmark_derive(c: &mut Criterion) {
    let mut group = c.benchmark_group("view_engine");

    for size in [100, 400, 1000] {
        let rows = create_rows(size);

        group.bench_with_input(BenchmarkId::new("top_paid", size), &rows, |b, rows| {
            let state = ViewState::new();
            b.iter(|| state.derive(black_box(rows)).chart.len());
        });

        group.bench_with_input(BenchmarkId::new("filtered_sorted", size), &rows, |b, rows| {
            let state = ViewState::new()
                .with_filter(ModelFilter::new().with_provider("openai").with_search("model 1"))
                .with_sort(SortSpec::descending(SortField::Name));
            b.iter(|| state.derive(black_box(rows)).table.len());
        });

        group.bench_with_input(BenchmarkId::new("selected", size), &rows, |b, rows| {
            let selection = Selection::from_ids(rows.iter().step_by(10).map(|r| r.id().clone()));
            let state = ViewState::new().with_selection(selection);
            b.iter(|| state.derive(black_box(rows)).chart.len());
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_derive);
criterion_main!(benches);
