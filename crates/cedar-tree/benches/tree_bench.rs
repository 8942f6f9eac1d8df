//! Criterion benchmarks for cedar-tree: induction, prediction, cross-validation.

use std::collections::BTreeMap;

use criterion::{Criterion, criterion_group, criterion_main};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use cedar_tree::{Dataset, Example, RunConfig, StoppingRules, accuracy, cross_validate, grow};

fn make_nominal(n_examples: usize, n_attributes: usize, n_values: usize, seed: u64) -> Dataset {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let attributes: Vec<String> = (0..n_attributes).map(|j| format!("a{j}")).collect();
    let examples: Vec<Example> = (0..n_examples)
        .map(|i| {
            let class = i % 3;
            let mut example = Example::new().with("class", format!("c{class}"));
            for (j, attribute) in attributes.iter().enumerate() {
                let value = if j < 2 && rng.gen_bool(0.8) {
                    class % n_values
                } else {
                    rng.gen_range(0..n_values)
                };
                example.set(attribute.as_str(), format!("v{value}"));
            }
            example
        })
        .collect();
    Dataset::new(attributes, "class", examples, BTreeMap::new()).unwrap()
}

fn bench_grow_unpruned(c: &mut Criterion) {
    let ds = make_nominal(1000, 12, 4, 42);
    let rules = StoppingRules::unpruned();

    c.bench_function("id3_grow_1000x12_unpruned", |b| {
        b.iter(|| grow(&ds, &rules, 0));
    });
}

fn bench_accuracy(c: &mut Criterion) {
    let ds = make_nominal(1000, 12, 4, 42);
    let tree = grow(&ds, &StoppingRules::unpruned(), 0);

    c.bench_function("id3_accuracy_1000x12", |b| {
        b.iter(|| accuracy(&tree, &ds));
    });
}

fn bench_cross_validate(c: &mut Criterion) {
    let ds = make_nominal(500, 8, 3, 42);
    let config = RunConfig::new();

    c.bench_function("id3_cv_10fold_500x8", |b| {
        b.iter(|| {
            let mut rng = ChaCha8Rng::seed_from_u64(42);
            cross_validate(&ds, 10, &config, &mut rng).unwrap()
        });
    });
}

criterion_group!(benches, bench_grow_unpruned, bench_accuracy, bench_cross_validate);
criterion_main!(benches);
