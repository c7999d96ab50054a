//! Data-parallel map over scoped worker threads
//!
//! Results always come back in input order, so callers see the same output
//! whatever the number of workers.

use std::num::NonZeroUsize;
use std::thread;

/// Resolve a configured worker count, `0` meaning all available cores
pub fn resolve_workers(workers: usize) -> usize {
    if workers > 0 {
        return workers;
    }
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Apply `f` to every item, splitting the slice across up to `workers` threads
pub fn map<T, R, F>(items: &[T], workers: usize, f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync,
{
    let workers = resolve_workers(workers).min(items.len());
    if workers <= 1 {
        return items.iter().map(&f).collect();
    }

    let chunk = items.len().div_ceil(workers);
    let f = &f;
    thread::scope(|scope| {
        let handles: Vec<_> = items
            .chunks(chunk)
            .map(|part| scope.spawn(move || part.iter().map(f).collect::<Vec<R>>()))
            .collect();
        handles
            .into_iter()
            .flat_map(|handle| match handle.join() {
                Ok(results) => results,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    })
}
