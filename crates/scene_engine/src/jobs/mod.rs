//! Worker pool for frame rendering jobs
//!
//! A fixed set of worker threads drains a job queue. The pool tracks how
//! many accepted jobs have not yet finished and exposes [`JobPool::wait_idle`],
//! the blocking join the frame pipeline is built around: dispatch fans out
//! one job per unit of work, `wait_idle` returns once all of them ran.
//! There is no cancellation; a dispatched job always runs to completion.

use std::sync::{Arc, Condvar, Mutex};
use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender};

type Job = Box<dyn FnOnce() + Send + 'static>;

const QUEUE_DEPTH: usize = 256;

/// Fixed-size worker pool with a blocking join
pub struct JobPool {
    sender: Option<Sender<Job>>,
    workers: Vec<Worker>,
    pending: Arc<Pending>,
}

struct Pending {
    count: Mutex<usize>,
    idle: Condvar,
}

impl JobPool {
    /// Spawn a pool with `size` worker threads
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "job pool needs at least one worker");

        let (sender, receiver) = bounded::<Job>(QUEUE_DEPTH);
        let pending = Arc::new(Pending {
            count: Mutex::new(0),
            idle: Condvar::new(),
        });

        let workers = (0..size)
            .map(|id| Worker::spawn(id, receiver.clone(), Arc::clone(&pending)))
            .collect();

        log::debug!("job pool started with {size} workers");
        Self {
            sender: Some(sender),
            workers,
            pending,
        }
    }

    /// Queue a job; blocks briefly if the queue is full
    pub fn execute(&self, job: impl FnOnce() + Send + 'static) {
        *self.pending.count.lock().unwrap() += 1;

        let sender = self
            .sender
            .as_ref()
            .expect("job pool sender lives until drop");
        if sender.send(Box::new(job)).is_err() {
            // all workers died; undo the reservation so wait_idle cannot hang
            self.pending.finish_one();
            log::error!("job queue is closed; dropping job");
        }
    }

    /// Block until every accepted job has finished
    pub fn wait_idle(&self) {
        let mut count = self.pending.count.lock().unwrap();
        while *count > 0 {
            count = self.pending.idle.wait(count).unwrap();
        }
    }

    /// Number of worker threads
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }
}

impl Drop for JobPool {
    fn drop(&mut self) {
        // closing the channel ends each worker's recv loop
        drop(self.sender.take());
        for worker in &mut self.workers {
            if let Some(thread) = worker.thread.take() {
                let _ = thread.join();
            }
        }
    }
}

impl Pending {
    fn finish_one(&self) {
        let mut count = self.count.lock().unwrap();
        *count -= 1;
        if *count == 0 {
            self.idle.notify_all();
        }
    }
}

struct Worker {
    thread: Option<thread::JoinHandle<()>>,
}

impl Worker {
    fn spawn(id: usize, receiver: Receiver<Job>, pending: Arc<Pending>) -> Self {
        let thread = thread::Builder::new()
            .name(format!("scene-worker-{id}"))
            .spawn(move || {
                while let Ok(job) = receiver.recv() {
                    // the guard releases the join fence even if the job
                    // panics, so a bad job cannot wedge wait_idle
                    let _guard = FinishGuard(&pending);
                    job();
                }
            })
            .expect("failed to spawn render worker thread");

        Self {
            thread: Some(thread),
        }
    }
}

struct FinishGuard<'a>(&'a Pending);

impl Drop for FinishGuard<'_> {
    fn drop(&mut self) {
        self.0.finish_one();
    }
}
