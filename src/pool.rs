//! Fixed-size worker pool over a bounded task channel.
//!
//! Workers pull until the channel disconnects; dropping the sender after
//! enqueueing everything is the shutdown signal. A cancellation flag or
//! timeout can later hang off the same channel without restructuring.

use crossbeam::channel;
use std::thread;

/// Distribute `tasks` across `workers` threads, calling `run` once per
/// task. Returns only when the queue is empty and every in-flight task
/// has completed.
pub fn drain<T, F>(tasks: Vec<T>, workers: usize, run: F)
where
    T: Send,
    F: Fn(T) + Sync,
{
    let workers = workers.max(1);
    let (tx, rx) = channel::bounded::<T>(workers * 2);
    thread::scope(|scope| {
        for _ in 0..workers {
            let rx = rx.clone();
            let run = &run;
            scope.spawn(move || {
                while let Ok(task) = rx.recv() {
                    run(task);
                }
            });
        }
        drop(rx);
        for task in tasks {
            if tx.send(task).is_err() {
                break;
            }
        }
        drop(tx);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[test]
    fn test_two_files_two_workers_each_processed_once() {
        let seen = Mutex::new(Vec::new());
        drain(vec!["drivers/a.c", "drivers/b.c"], 2, |path| {
            seen.lock().unwrap().push(path);
        });
        // drain returned, so both tasks completed and the queue is empty
        let mut seen = seen.into_inner().unwrap();
        seen.sort();
        assert_eq!(seen, vec!["drivers/a.c", "drivers/b.c"]);
    }

    #[test]
    fn test_more_tasks_than_workers() {
        let count = AtomicUsize::new(0);
        drain((0..64).collect::<Vec<_>>(), 3, |_| {
            count.fetch_add(1, Ordering::Relaxed);
        });
        assert_eq!(count.load(Ordering::Relaxed), 64);
    }

    #[test]
    fn test_zero_workers_clamps_to_one() {
        let count = AtomicUsize::new(0);
        drain(vec![1, 2, 3], 0, |_| {
            count.fetch_add(1, Ordering::Relaxed);
        });
        assert_eq!(count.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn test_empty_queue_returns_immediately() {
        drain(Vec::<u32>::new(), 4, |_| panic!("no tasks to run"));
    }
}
