//! Tag library surface.

use rgpt_core::{Dimension, SizeMapping};
use std::fmt;
use url::Url;

/// Opaque handle to a slot defined in the tag library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotHandle(u64);

impl SlotHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SlotHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Slot({})", self.0)
    }
}

/// Calls the placement logic makes into the ad tag library.
///
/// All calls are fire-and-forget; the library performs the network work
/// on its own schedule.
pub trait TagLibrary {
    /// Define a slot for `path` drawn into the element `element_id`.
    ///
    /// Returns `None` when the library refuses the definition, e.g. because
    /// the element id is already bound to another slot.
    fn define_slot(&mut self, path: &str, dimensions: &[Dimension], element_id: &str) -> Option<SlotHandle>;

    /// Attach the publisher ads service to a slot.
    fn add_service(&mut self, slot: SlotHandle);

    /// Attach a responsive size map to a slot.
    fn define_size_mapping(&mut self, slot: SlotHandle, mapping: &SizeMapping);

    fn set_targeting(&mut self, slot: SlotHandle, key: &str, value: &str);

    /// Render the slot bound to `element_id`.
    fn display(&mut self, element_id: &str);

    /// Fetch new creatives for the given slots.
    fn refresh(&mut self, slots: &[SlotHandle]);

    /// Remove creatives and forget the given slots.
    fn clear(&mut self, slots: &[SlotHandle]);

    // Service setup, issued once by the bootstrap.

    fn enable_async_rendering(&mut self);

    fn collapse_empty_divs(&mut self);

    fn disable_initial_load(&mut self);

    fn enable_services(&mut self);

    fn set_page_url(&mut self, url: &Url);
}
