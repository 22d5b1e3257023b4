//! rgpt Tag Library Bridge
//!
//! Everything the placement logic needs from the ad tag library (Google
//! Publisher Tag), expressed as a trait plus the page-wide bootstrap that
//! loads it.
//!
//! The real library is asynchronous: calls made before its script arrives
//! are pushed onto a command queue and replayed in FIFO order once it is
//! ready. [`TagService`] models exactly that, with the library itself
//! injected as a [`TagLibrary`] implementation.

mod library;
mod options;
mod queue;
mod recording;
mod service;

pub use library::{SlotHandle, TagLibrary};
pub use options::{DEFAULT_SCRIPT_URL, TagOptions};
pub use queue::{Command, CommandQueue};
pub use recording::{RecordingLibrary, RecordingLoader, TagCall};
pub use service::{ScriptLoader, TagError, TagService, TagState};
