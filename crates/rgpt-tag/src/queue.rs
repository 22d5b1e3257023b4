//! FIFO command queue replayed once the tag library is ready.

use crate::library::TagLibrary;
use std::collections::VecDeque;
use std::fmt;

/// A deferred unit of work.
pub enum Command {
    /// Runs against the loaded library
    Library(Box<dyn FnOnce(&mut dyn TagLibrary)>),
    /// Runs on its own; may call back into the service
    Callback(Box<dyn FnOnce()>),
}

impl Command {
    pub fn library(f: impl FnOnce(&mut dyn TagLibrary) + 'static) -> Self {
        Self::Library(Box::new(f))
    }

    pub fn callback(f: impl FnOnce() + 'static) -> Self {
        Self::Callback(Box::new(f))
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Library(_) => write!(f, "Command::Library"),
            Self::Callback(_) => write!(f, "Command::Callback"),
        }
    }
}

/// Commands waiting for the library, plus its readiness flag.
#[derive(Debug, Default)]
pub struct CommandQueue {
    pending: VecDeque<Command>,
    ready: bool,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command behind everything already queued.
    pub fn enqueue(&mut self, command: Command) {
        self.pending.push_back(command);
    }

    /// Put a command back at the head of the queue.
    pub fn requeue(&mut self, command: Command) {
        self.pending.push_front(command);
    }

    /// Pop the oldest command, but only once the library is ready.
    pub fn next_ready(&mut self) -> Option<Command> {
        if !self.ready {
            return None;
        }
        self.pending.pop_front()
    }

    /// Flip the readiness flag. Returns false if it was already set.
    pub fn mark_ready(&mut self) -> bool {
        !std::mem::replace(&mut self.ready, true)
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
