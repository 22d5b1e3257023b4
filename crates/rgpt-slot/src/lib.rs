//! rgpt Slot Runtime
//!
//! Drives one tag library slot per ad placement:
//! - controller: the slot state machine and its reconcile step
//! - placement: shared handle the tag library calls back into when ready
//! - page: owns the window, the tag service and all placements
//! - window / render: the browser surfaces the controller talks to

mod anchor;
mod controller;
mod page;
mod placement;
mod render;
mod window;

pub use anchor::AnchorId;
pub use controller::{Reconciled, SlotController, SlotState};
pub use page::{Page, PageError, PlacementId};
pub use placement::Placement;
pub use render::{HolderNode, RenderError, RenderTarget};
pub use window::{ListenerId, Sequenced, Subscription, Window, WindowEvent, WindowEventKind};
