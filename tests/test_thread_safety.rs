//! Tests for thread safety
//!
//! Every run owns its implicant table, so a single minimizer can be shared
//! between threads, and worker threads inside a run do not change results.

use htmin::label::encode;
use htmin::{Key, Minimizer, MinimizerConfig, Signature};
use std::sync::Arc;
use std::thread;

static INPUTS: [&[&str]; 4] = [
    &["020", "120", "001", "021"],
    &["0z", "oz", "1z"],
    &["z2", "01"],
    &["z2", "0o", "1o"],
];

fn sequential() -> Vec<Vec<Key>> {
    let minimizer = Minimizer::new();
    INPUTS
        .iter()
        .map(|&input| minimizer.run_labels(input).unwrap().best().unwrap().keys.clone())
        .collect()
}

#[test]
fn test_concurrent_execution() {
    let minimizer = Arc::new(Minimizer::new());
    let handles: Vec<_> = INPUTS
        .iter()
        .map(|&input| {
            let minimizer = Arc::clone(&minimizer);
            thread::spawn(move || {
                let report = minimizer.run_labels(input).expect("Minimization failed");
                report.best().expect("No solution").keys.clone()
            })
        })
        .collect();

    let results: Vec<Vec<Key>> = handles
        .into_iter()
        .map(|h| h.join().expect("Thread panicked"))
        .collect();
    assert_eq!(results, sequential());
}

#[test]
fn test_repeated_runs_on_many_threads() {
    let expected = sequential();
    let handles: Vec<_> = (0..8)
        .map(|_| {
            thread::spawn(|| {
                let minimizer = Minimizer::new();
                (0..10)
                    .map(|_| {
                        INPUTS
                            .iter()
                            .map(|&input| {
                                minimizer.run_labels(input).unwrap().best().unwrap().keys.clone()
                            })
                            .collect::<Vec<_>>()
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        for run in handle.join().expect("Thread panicked") {
            assert_eq!(run, expected);
        }
    }
}

#[test]
fn test_worker_count_does_not_change_result() {
    let input: Vec<Key> = [
        "000", "001", "002", "010", "012", "020", "021", "102", "110", "111", "120", "122", "201",
        "210", "212", "220", "0zx", "o12",
    ]
    .iter()
    .map(|l| encode(l).unwrap())
    .collect();
    let signature = Signature::with_width(3);

    let baseline = Minimizer::new().run_keys(&input, &signature).unwrap();
    for workers in [0, 2, 3, 8] {
        let mut config = MinimizerConfig::default();
        config.workers = workers;
        let report = Minimizer::with_config(config)
            .run_keys(&input, &signature)
            .unwrap();
        assert_eq!(report.primes, baseline.primes, "workers = {}", workers);
        assert_eq!(
            report.best().unwrap().keys,
            baseline.best().unwrap().keys,
            "workers = {}",
            workers
        );
    }
}
