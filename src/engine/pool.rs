//! Worker pool — scoped threads draining a shared channel of file paths

use std::path::PathBuf;

use crossbeam_channel::Receiver;

/// Run `job` over every path arriving on `receiver`, on `workers` threads.
/// Returns once the channel is closed and drained; `job` failures are the
/// job's own business.
pub(crate) fn drain<F>(workers: usize, receiver: Receiver<PathBuf>, job: F)
where
    F: Fn(PathBuf) + Sync,
{
    std::thread::scope(|scope| {
        for _ in 0..workers.max(1) {
            let rx = receiver.clone();
            let job = &job;
            scope.spawn(move || {
                while let Ok(path) = rx.recv() {
                    job(path);
                }
            });
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn every_queued_path_is_processed_once() {
        let (tx, rx) = crossbeam_channel::unbounded();
        for i in 0..100 {
            tx.send(PathBuf::from(format!("file-{i}"))).unwrap();
        }
        drop(tx);

        let seen = AtomicUsize::new(0);
        drain(4, rx, |_| {
            seen.fetch_add(1, Ordering::Relaxed);
        });
        assert_eq!(seen.load(Ordering::Relaxed), 100);
    }

    #[test]
    fn zero_workers_still_drains() {
        let (tx, rx) = crossbeam_channel::unbounded();
        tx.send(PathBuf::from("one")).unwrap();
        drop(tx);

        let seen = AtomicUsize::new(0);
        drain(0, rx, |_| {
            seen.fetch_add(1, Ordering::Relaxed);
        });
        assert_eq!(seen.load(Ordering::Relaxed), 1);
    }
}
