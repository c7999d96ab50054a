//! Benchmark suite for Here-and-There minimization
//!
//! Inputs are generated deterministically: random concrete valuations of
//! growing width, and rule programs built from the same generator.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use htmin::label::Key;
use htmin::primes::PrimeSet;
use htmin::table::ImplicantTable;
use htmin::{Greedy, Minimizer, MinimizerConfig, Program, Signature};

/// Small linear congruential generator so runs are reproducible
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }
}

/// `count` distinct concrete valuations of `width` positions
fn valuations(width: usize, count: usize, seed: u64) -> Vec<Key> {
    let mut rng = Lcg(seed);
    let mut keys = std::collections::BTreeSet::new();
    let max = 3usize.pow(width as u32).min(count);
    while keys.len() < max {
        let raw = (0..width).fold(0u64, |acc, _| (acc << 3) | (1 << (rng.next() % 3)));
        keys.insert(Key::from_raw(raw));
    }
    keys.into_iter().collect()
}

fn rule_text(width: usize, count: usize, seed: u64) -> String {
    let atoms: Vec<String> = (0..width).map(|i| format!("p{}", i)).collect();
    let mut rng = Lcg(seed);
    let mut text = String::new();
    for _ in 0..count {
        let mut head = Vec::new();
        let mut body = Vec::new();
        for atom in &atoms {
            match rng.next() % 5 {
                0 => head.push(atom.clone()),
                1 => head.push(format!("not {}", atom)),
                2 => body.push(atom.clone()),
                3 => body.push(format!("not {}", atom)),
                _ => {}
            }
        }
        text.push_str(&head.join(" ; "));
        text.push_str(" :- ");
        text.push_str(&body.join(", "));
        text.push_str(".\n");
    }
    text
}

/// Benchmark: Parse rule programs
fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_program");

    for count in [10, 100, 1000] {
        let text = rule_text(6, count, 7);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("rules", count), &text, |b, data| {
            b.iter(|| {
                let program: Program = black_box(data).parse().unwrap();
                black_box(program);
            });
        });
    }

    group.finish();
}

/// Benchmark: Prime generation by width
fn bench_primes(c: &mut Criterion) {
    let mut group = c.benchmark_group("prime_set");

    for width in [3, 4, 5, 6] {
        let keys = valuations(width, 3usize.pow(width as u32) / 3, width as u64);
        group.throughput(Throughput::Elements(keys.len() as u64));
        group.bench_with_input(BenchmarkId::new("width", width), &keys, |b, keys| {
            b.iter(|| {
                let table = ImplicantTable::from_keys(black_box(keys)).unwrap();
                black_box(PrimeSet::build(table, 1));
            });
        });
    }

    group.finish();
}

/// Benchmark: Full pipeline (parse + minimize)
fn bench_full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_pipeline");
    group.sample_size(20);

    for count in [5, 10, 20] {
        let text = rule_text(4, count, 11);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(
            BenchmarkId::new("parse_and_minimize", count),
            &text,
            |b, data| {
                b.iter(|| {
                    let program: Program = black_box(data).parse().unwrap();
                    if program.is_empty() {
                        return;
                    }
                    black_box(Minimizer::new().run(&program).unwrap());
                });
            },
        );
    }

    group.finish();
}

/// Benchmark: Worker threads, greedy cover to keep the solver out of the measurement
fn bench_workers(c: &mut Criterion) {
    let mut group = c.benchmark_group("workers");
    group.sample_size(20);
    let keys = valuations(6, 240, 3);
    let signature = Signature::with_width(6);

    for workers in [1, 2, 4] {
        let mut config = MinimizerConfig::default();
        config.workers = workers;
        let minimizer = Minimizer::with_config(config).solver(Greedy);
        group.bench_with_input(BenchmarkId::new("minimize", workers), &keys, |b, keys| {
            b.iter(|| {
                black_box(minimizer.run_keys(black_box(keys), &signature).unwrap());
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_parse,
    bench_primes,
    bench_full_pipeline,
    bench_workers
);
criterion_main!(benches);
