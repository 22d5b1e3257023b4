//! Page-wide tag library service
//!
//! Owns the injected [`TagLibrary`], the command queue in front of it, and
//! the one-time bootstrap that loads the library script.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized ──ensure_initialized()──▶ Loading ──library_loaded()──▶ Ready
//!                 (queue setup, inject       (commands     (queue drained FIFO,
//!                  script once)               queue up)     later commands run
//!                                                           immediately)
//! ```

use crate::library::TagLibrary;
use crate::options::TagOptions;
use crate::queue::{Command, CommandQueue};
use std::cell::{Cell, RefCell};
use tracing::{debug, error, info, warn};
use url::Url;

/// Injects the tag library script into the page.
pub trait ScriptLoader {
    fn inject(&mut self, src: &Url) -> Result<(), TagError>;
}

/// Bootstrap state of the tag library
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagState {
    /// Nothing requested yet
    Uninitialized,
    /// Script requested, commands are queued
    Loading,
    /// Library available, commands run immediately
    Ready,
}

/// Tag library errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TagError {
    #[error("Tag library is not ready")]
    NotReady,

    #[error("Tag library is already in use")]
    Busy,

    #[error("Failed to inject script {url}: {reason}")]
    ScriptInjection { url: String, reason: String },
}

/// Shared handle to the page's tag library.
///
/// One instance exists per page and is shared (`Rc`) by every placement.
pub struct TagService {
    library: RefCell<Box<dyn TagLibrary>>,
    loader: RefCell<Box<dyn ScriptLoader>>,
    options: TagOptions,
    queue: RefCell<CommandQueue>,
    state: Cell<TagState>,
    draining: Cell<bool>,
}

impl TagService {
    /// Create a service around a library that has not been loaded yet.
    pub fn new(
        library: impl TagLibrary + 'static,
        loader: impl ScriptLoader + 'static,
        options: TagOptions,
    ) -> Self {
        Self {
            library: RefCell::new(Box::new(library)),
            loader: RefCell::new(Box::new(loader)),
            options,
            queue: RefCell::new(CommandQueue::new()),
            state: Cell::new(TagState::Uninitialized),
            draining: Cell::new(false),
        }
    }

    pub fn state(&self) -> TagState {
        self.state.get()
    }

    pub fn is_ready(&self) -> bool {
        self.state.get() == TagState::Ready
    }

    pub fn options(&self) -> &TagOptions {
        &self.options
    }

    /// Commands still waiting for the library.
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Bootstrap the library once per page.
    ///
    /// Queues the service setup and injects the script. Returns false when
    /// the bootstrap had already happened.
    pub fn ensure_initialized(&self) -> bool {
        if self.state.get() != TagState::Uninitialized {
            return false;
        }
        self.state.set(TagState::Loading);

        let options = self.options.clone();
        self.push(Command::library(move |library| {
            if options.async_rendering {
                library.enable_async_rendering();
            }
            if options.collapse_empty_divs {
                library.collapse_empty_divs();
            }
            if options.disable_initial_load {
                library.disable_initial_load();
            }
            library.enable_services();
            if let Some(url) = &options.parent_page_url {
                library.set_page_url(url);
            }
        }));

        info!("Loading tag library from {}", self.options.script_url);
        if let Err(e) = self.loader.borrow_mut().inject(&self.options.script_url) {
            error!("Tag library bootstrap failed: {}", e);
        }
        true
    }

    /// Submit a command. Runs now if the library is ready, otherwise waits
    /// behind everything already queued.
    ///
    /// A library command pushed while the library is in use is deferred and
    /// replayed as soon as that call returns.
    pub fn push(&self, command: Command) {
        if self.is_ready() && !self.draining.get() {
            if let Err(command) = self.run(command) {
                debug!("Tag library in use, deferring {:?}", command);
                self.queue.borrow_mut().enqueue(command);
            }
        } else {
            self.queue.borrow_mut().enqueue(command);
        }
    }

    /// Signal that the library script has loaded and replay the queue.
    pub fn library_loaded(&self) {
        if !self.queue.borrow_mut().mark_ready() {
            return;
        }
        self.state.set(TagState::Ready);
        info!("Tag library ready, replaying {} queued commands", self.pending());
        self.drain();
    }

    /// Call into the library directly. Fails before the library is ready.
    pub fn with_library<R>(&self, f: impl FnOnce(&mut dyn TagLibrary) -> R) -> Result<R, TagError> {
        if !self.is_ready() {
            return Err(TagError::NotReady);
        }
        let mut library = self.library.try_borrow_mut().map_err(|_| TagError::Busy)?;
        let result = f(&mut **library);
        drop(library);

        if self.pending() > 0 {
            self.drain();
        }
        Ok(result)
    }

    /// Run queued commands oldest first. Stops when the library is in use;
    /// the command that hit it stays at the head of the queue.
    fn drain(&self) {
        if self.draining.replace(true) {
            return;
        }
        loop {
            let next = self.queue.borrow_mut().next_ready();
            let Some(command) = next else { break };
            if let Err(command) = self.run(command) {
                warn!("Tag library in use, {} commands left queued", self.pending() + 1);
                self.queue.borrow_mut().requeue(command);
                break;
            }
        }
        self.draining.set(false);
    }

    /// Hands the command back when the library is already borrowed.
    fn run(&self, command: Command) -> Result<(), Command> {
        match command {
            Command::Library(f) => match self.library.try_borrow_mut() {
                Ok(mut library) => {
                    f(&mut **library);
                    Ok(())
                }
                Err(_) => Err(Command::Library(f)),
            },
            Command::Callback(f) => {
                f();
                Ok(())
            }
        }
    }
}
