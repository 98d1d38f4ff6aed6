//! Bounded worker pool for request handling (spec.md §4.9/§5 "bounded
//! parallelism"; SPEC_FULL.md §4.9 ambient).
//!
//! A fixed number of OS threads pull jobs off a `crossbeam_channel` MPMC
//! queue. Each job is a boxed closure carrying its own `Arc` snapshot of
//! whatever state it needs (token graph, document text) plus a
//! [`crate::dispatch::cancellation::CancellationToken`], so jobs never
//! share mutable state with each other or with the read loop.

use crossbeam_channel::{bounded, Sender};

pub const DEFAULT_PARALLELISM: usize = 5;

type Job = Box<dyn FnOnce() + Send + 'static>;

pub struct WorkerPool {
    sender: Sender<Job>,
    handles: Vec<std::thread::JoinHandle<()>>,
}

impl WorkerPool {
    pub fn new(parallelism: usize) -> Self {
        let parallelism = parallelism.max(1);
        // Bounded so a burst of requests applies backpressure to the read
        // loop rather than growing the queue without limit.
        let (sender, receiver) = bounded::<Job>(parallelism * 4);

        let handles = (0..parallelism)
            .map(|_| {
                let receiver = receiver.clone();
                std::thread::spawn(move || {
                    for job in receiver {
                        job();
                    }
                })
            })
            .collect();

        Self { sender, handles }
    }

    /// Queue a job for execution on the next free worker.
    pub fn submit(&self, job: Job) {
        // The channel is only ever closed from `shutdown`, which consumes
        // `self`; a live `&self` means the receivers are still running.
        let _ = self.sender.send(job);
    }

    /// Stop accepting new jobs and block until every queued job has run.
    pub fn shutdown(self) {
        drop(self.sender);
        for handle in self.handles {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn every_submitted_job_runs_exactly_once() {
        let pool = WorkerPool::new(2);
        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..20 {
            let counter = counter.clone();
            pool.submit(Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }));
        }
        pool.shutdown();
        assert_eq!(counter.load(Ordering::SeqCst), 20);
    }
}
