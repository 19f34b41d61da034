//! Benchmarks for classification and history analysis
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use glucotrack::{classify, Analyzer, Reading, StatusLabel};

const FOODS: [&str; 4] = ["oatmeal", "pizza", "salad", "pasta"];
const ACTIVITIES: [&str; 3] = ["walking", "running", "resting"];

fn create_history(count: usize) -> Vec<Reading> {
    (0..count)
        .map(|i| {
            let value = 80.0 + ((i * 37) % 140) as f64;
            let day = i / 4;
            let timestamp = format!(
                "2024-{:02}-{:02} {:02}:00:00",
                1 + (day / 28) % 12,
                1 + day % 28,
                6 + (i % 4) * 4
            );
            let status = if value > 140.0 {
                StatusLabel::Abnormal
            } else {
                StatusLabel::Normal
            };

            Reading::new(value, timestamp)
                .fasting(i % 4 == 0)
                .food(FOODS[i % FOODS.len()])
                .activity(ACTIVITIES[i % ACTIVITIES.len()])
                .symptoms(if value > 180.0 { "thirsty, headache" } else { "" })
                .status(status)
        })
        .collect()
}

fn bench_classify(c: &mut Criterion) {
    c.bench_function("classify", |b| {
        b.iter(|| classify(black_box(132.0), black_box(false), Some("pizza"), None, 13))
    });
}

fn bench_analyzer(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyzer");
    let analyzer = Analyzer::default();

    for size in [100, 1000] {
        let readings = create_history(size);

        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("analyze_{}", size), |b| {
            b.iter(|| analyzer.analyze(black_box(&readings)))
        });

        group.bench_function(format!("identify_patterns_{}", size), |b| {
            b.iter(|| analyzer.identify_patterns(black_box(&readings)))
        });

        group.bench_function(format!("analyze_trends_{}", size), |b| {
            b.iter(|| analyzer.analyze_trends(black_box(&readings)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_classify, bench_analyzer);
criterion_main!(benches);
