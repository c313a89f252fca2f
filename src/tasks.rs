//! Single-threaded task queue.
//!
//! Background work (asset loads on the worker runtime) never touches the
//! scene directly. It sends a one-shot task through a [`TaskSender`]; the
//! main loop drains the [`TaskQueue`] at a frame boundary and runs each task
//! to completion against the owned state.

use flume::{Receiver, Sender, TryRecvError};

type Task<S> = Box<dyn FnOnce(&mut S) + Send + 'static>;

/// Cloneable handle for enqueuing tasks from any thread.
pub struct TaskSender<S> {
    tx: Sender<Task<S>>,
}

impl<S> Clone for TaskSender<S> {
    fn clone(&self) -> Self {
        Self { tx: self.tx.clone() }
    }
}

impl<S> TaskSender<S> {
    /// Enqueues `task`. Returns `false` if the queue has been dropped, in
    /// which case the task is discarded.
    pub fn send(&self, task: impl FnOnce(&mut S) + Send + 'static) -> bool {
        self.tx.send(Box::new(task)).is_ok()
    }
}

pub struct TaskQueue<S> {
    tx: Sender<Task<S>>,
    rx: Receiver<Task<S>>,
}

impl<S> Default for TaskQueue<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> TaskQueue<S> {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = flume::unbounded();
        Self { tx, rx }
    }

    #[must_use]
    pub fn sender(&self) -> TaskSender<S> {
        TaskSender {
            tx: self.tx.clone(),
        }
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    /// Runs every task queued so far, in FIFO order. Tasks enqueued while
    /// draining run on the next call. Returns the number of tasks run.
    pub fn run_pending(&self, state: &mut S) -> usize {
        let budget = self.rx.len();
        let mut ran = 0;
        while ran < budget {
            match self.rx.try_recv() {
                Ok(task) => {
                    task(state);
                    ran += 1;
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        ran
    }
}
