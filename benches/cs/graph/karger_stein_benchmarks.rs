use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hypercut::graph::{karger_stein, Hypergraph, MinCutTracker};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

fn random_hypergraph(n: usize, m: usize, rng: &mut ChaCha20Rng) -> Hypergraph {
    let triples: Vec<[usize; 3]> = (0..m)
        .map(|_| {
            [
                rng.gen_range(1..=n),
                rng.gen_range(1..=n),
                rng.gen_range(1..=n),
            ]
        })
        .collect();
    Hypergraph::from_triples(n, &triples, rng).unwrap()
}

fn bench_single_trial(c: &mut Criterion) {
    let mut group = c.benchmark_group("karger_stein_trial");
    let mut rng = ChaCha20Rng::seed_from_u64(42);

    for &n in &[10, 20, 40] {
        let graph = random_hypergraph(n, 3 * n, &mut rng);
        group.bench_with_input(BenchmarkId::from_parameter(n), &graph, |b, graph| {
            b.iter(|| {
                let mut tracker = MinCutTracker::new(graph.edge_count());
                karger_stein(black_box(graph.clone()), &mut rng, &mut tracker);
                tracker.best()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_trial);
criterion_main!(benches);
