//! Bounded task pool on scoped OS threads.
//!
//! At most `max_parallel` workers pull tasks from a shared queue. Results come
//! back in submission order regardless of which worker ran what.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::thread;

use crate::runtime::ExecError;

/// Run `f` over every task with at most `max_parallel` running at once.
///
/// The first error (in submission order) is returned; a panicking task is
/// reported as an engine error.
pub fn run_bounded<T, R, F>(tasks: Vec<T>, max_parallel: usize, f: F) -> Result<Vec<R>, ExecError>
where
    T: Send,
    R: Send,
    F: Fn(T) -> Result<R, ExecError> + Sync,
{
    let total = tasks.len();
    if total == 0 {
        return Ok(Vec::new());
    }
    let workers = max_parallel.max(1).min(total);

    let queue: Mutex<VecDeque<(usize, T)>> = Mutex::new(tasks.into_iter().enumerate().collect());
    let slots: Mutex<Vec<Option<Result<R, ExecError>>>> =
        Mutex::new((0..total).map(|_| None).collect());

    let panicked = thread::scope(|s| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                s.spawn(|| loop {
                    let next = queue
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .pop_front();
                    let Some((idx, task)) = next else { break };
                    let out = f(task);
                    slots.lock().unwrap_or_else(PoisonError::into_inner)[idx] = Some(out);
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join())
            .filter(Result::is_err)
            .count()
    });

    if panicked > 0 {
        return Err(ExecError::Engine(format!("{panicked} worker(s) panicked")));
    }

    slots
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner)
        .into_iter()
        .map(|slot| slot.unwrap_or_else(|| Err(ExecError::Engine("task never ran".into()))))
        .collect()
}
