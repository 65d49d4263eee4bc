use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionMode {
    /// Jobs run on the rayon thread pool
    #[default]
    Background,
    /// Jobs run to completion inside `try_launch`. Deterministic, used by tests and tools.
    Inline,
}

/// Runs at most one job at a time.
///
/// The slot is occupied from a successful `try_launch` until the job's output has been
/// taken out with `try_collect` (or `wait`), so a second job can never start before the
/// owner has seen the result of the first one.
pub struct JobSlot<T: Send + 'static> {
    mode: ExecutionMode,
    in_flight: Arc<AtomicBool>,
    sender: Sender<T>,
    receiver: Receiver<T>,
    launched: u64,
    completed: u64,
}

impl<T: Send + 'static> JobSlot<T> {
    pub fn new(mode: ExecutionMode) -> Self {
        // Capacity 1: there is never more than one finished job waiting
        let (sender, receiver) = crossbeam_channel::bounded(1);

        JobSlot {
            mode,
            in_flight: Arc::new(AtomicBool::new(false)),
            sender,
            receiver,
            launched: 0,
            completed: 0,
        }
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Starts `job` if the slot is free. Gives the job back if it isn't.
    pub fn try_launch<F>(&mut self, job: F) -> Result<(), F>
    where
        F: FnOnce() -> T + Send + 'static,
    {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(job);
        }

        self.launched += 1;
        let sender = self.sender.clone();

        match self.mode {
            ExecutionMode::Inline => {
                sender
                    .send(job())
                    .expect("Job slot receiver lives as long as the slot");
            }
            ExecutionMode::Background => {
                rayon::spawn(move || {
                    let output = job();
                    // Only fails if the slot was dropped while the job ran
                    let _ = sender.send(output);
                });
            }
        }

        Ok(())
    }

    /// Takes the output of the finished job and frees the slot. Never blocks.
    pub fn try_collect(&mut self) -> Option<T> {
        match self.receiver.try_recv() {
            Ok(output) => Some(self.release(output)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                unreachable!("Job slot holds its own sender")
            }
        }
    }

    /// Blocks until the running job finishes. Returns `None` if the slot is free.
    pub fn wait(&mut self) -> Option<T> {
        if !self.is_busy() {
            return None;
        }

        let output = self
            .receiver
            .recv()
            .expect("Job slot holds its own sender");
        Some(self.release(output))
    }

    fn release(&mut self, output: T) -> T {
        self.completed += 1;
        self.in_flight.store(false, Ordering::Release);
        output
    }

    pub fn jobs_launched(&self) -> u64 {
        self.launched
    }

    pub fn jobs_completed(&self) -> u64 {
        self.completed
    }
}
