//! A serial work queue backed by one dedicated thread.
//!
//! Database writes go through it so they happen one at a time and off the
//! async runtime. Work submitted from the queue's own thread runs inline,
//! which is only an optimisation: [`SerialQueue::is_current`] may answer
//! `false` when unsure, never `true`.
use std::thread::{self, JoinHandle};

use rosa_lib::util::{
    context::ExecutionContext,
    stack::{current_stack_usage, register_current_thread},
};
use tokio::sync::{mpsc, oneshot};

/// Stack size of queue threads.
pub const QUEUE_STACK_SIZE: usize = 2 * 1024 * 1024;

type Job = Box<dyn FnOnce() + Send + 'static>;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    #[error("The queue thread has stopped")]
    Closed,
}

#[derive(Debug)]
pub struct SerialQueue {
    context: ExecutionContext,
    sender: Option<mpsc::UnboundedSender<Job>>,
    worker: Option<JoinHandle<()>>,
}

impl SerialQueue {
    pub fn new(label: &'static str) -> std::io::Result<Self> {
        let context = ExecutionContext::new(label);
        let (sender, mut receiver) = mpsc::unbounded_channel::<Job>();

        let worker_context = context.clone();
        let worker = thread::Builder::new()
            .name(label.to_string())
            .stack_size(QUEUE_STACK_SIZE)
            .spawn(move || {
                register_current_thread(QUEUE_STACK_SIZE);
                let _guard = worker_context.enter();

                while let Some(job) = receiver.blocking_recv() {
                    job();
                    log::trace!(
                        "{}: stack usage after job: {}",
                        worker_context.label(),
                        current_stack_usage()
                    );
                }

                log::debug!("{}: queue stopped", worker_context.label());
            })?;

        Ok(Self {
            context,
            sender: Some(sender),
            worker: Some(worker),
        })
    }

    pub fn label(&self) -> &'static str {
        self.context.label()
    }

    /// Whether the caller is running on this queue's thread.
    pub fn is_current(&self) -> bool {
        self.context.is_current()
    }

    fn submit(&self, job: Job) -> Result<(), QueueError> {
        self.sender
            .as_ref()
            .ok_or(QueueError::Closed)?
            .send(job)
            .map_err(|_| QueueError::Closed)
    }

    /// Runs `work` on the queue and blocks until it is done.
    ///
    /// Must not be called from an async task: it blocks the thread, and
    /// panics inside a runtime context.
    pub fn dispatch_sync<R, F>(&self, work: F) -> Result<R, QueueError>
    where
        R: Send + 'static,
        F: FnOnce() -> R + Send + 'static,
    {
        if self.is_current() {
            return Ok(work());
        }

        let (tx, rx) = oneshot::channel();
        self.submit(Box::new(move || {
            let _ = tx.send(work());
        }))?;

        rx.blocking_recv().map_err(|_| QueueError::Closed)
    }

    /// Runs `work` on the queue and waits for it without blocking the runtime.
    pub async fn dispatch_async<R, F>(&self, work: F) -> Result<R, QueueError>
    where
        R: Send + 'static,
        F: FnOnce() -> R + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        self.submit(Box::new(move || {
            let _ = tx.send(work());
        }))?;

        rx.await.map_err(|_| QueueError::Closed)
    }
}

impl Drop for SerialQueue {
    fn drop(&mut self) {
        // Closing the channel ends the worker loop once queued jobs are done.
        drop(self.sender.take());

        if let Some(worker) = self.worker.take() {
            if worker.thread().id() != thread::current().id() && worker.join().is_err() {
                log::error!("{}: queue thread panicked", self.context.label());
            }
        }
    }
}
