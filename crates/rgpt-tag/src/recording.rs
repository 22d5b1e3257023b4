//! In-memory tag library and script loader.
//!
//! Both record every call they receive. Clones share state, so one copy can
//! be handed to the [`TagService`](crate::TagService) while another is kept
//! around for inspection.

use crate::library::{SlotHandle, TagLibrary};
use crate::service::{ScriptLoader, TagError};
use rgpt_core::{Dimension, SizeMapping};
use serde::Serialize;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use tracing::trace;
use url::Url;

/// One call received by [`RecordingLibrary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "call", rename_all = "camelCase")]
pub enum TagCall {
    DefineSlot {
        slot: u64,
        path: String,
        dimensions: Vec<Dimension>,
        element_id: String,
    },
    AddService { slot: u64 },
    DefineSizeMapping { slot: u64, mapping: SizeMapping },
    SetTargeting { slot: u64, key: String, value: String },
    Display { element_id: String },
    Refresh { slots: Vec<u64> },
    Clear { slots: Vec<u64> },
    EnableAsyncRendering,
    CollapseEmptyDivs,
    DisableInitialLoad,
    EnableServices,
    SetPageUrl { url: String },
}

#[derive(Debug, Default)]
struct Recorded {
    calls: Vec<TagCall>,
    /// Element id -> slot drawn into it
    live: BTreeMap<String, SlotHandle>,
    next_slot: u64,
}

/// Tag library that keeps slots in memory and records every call.
#[derive(Debug, Clone, Default)]
pub struct RecordingLibrary {
    inner: Rc<RefCell<Recorded>>,
}

impl RecordingLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// All calls so far, oldest first.
    pub fn calls(&self) -> Vec<TagCall> {
        self.inner.borrow().calls.clone()
    }

    /// Number of recorded calls matching `pred`.
    pub fn count(&self, pred: impl Fn(&TagCall) -> bool) -> usize {
        self.inner.borrow().calls.iter().filter(|call| pred(call)).count()
    }

    /// Forget recorded calls, keeping live slots.
    pub fn clear_calls(&self) {
        self.inner.borrow_mut().calls.clear();
    }

    /// Slots defined and not yet cleared.
    pub fn live_slots(&self) -> Vec<SlotHandle> {
        self.inner.borrow().live.values().copied().collect()
    }

    fn record(&self, call: TagCall) {
        trace!(?call, "tag library call");
        self.inner.borrow_mut().calls.push(call);
    }
}

fn ids(slots: &[SlotHandle]) -> Vec<u64> {
    slots.iter().map(SlotHandle::id).collect()
}

impl TagLibrary for RecordingLibrary {
    fn define_slot(&mut self, path: &str, dimensions: &[Dimension], element_id: &str) -> Option<SlotHandle> {
        let slot = {
            let mut inner = self.inner.borrow_mut();
            if inner.live.contains_key(element_id) {
                return None;
            }
            inner.next_slot += 1;
            let slot = SlotHandle::new(inner.next_slot);
            inner.live.insert(element_id.to_string(), slot);
            slot
        };
        self.record(TagCall::DefineSlot {
            slot: slot.id(),
            path: path.to_string(),
            dimensions: dimensions.to_vec(),
            element_id: element_id.to_string(),
        });
        Some(slot)
    }

    fn add_service(&mut self, slot: SlotHandle) {
        self.record(TagCall::AddService { slot: slot.id() });
    }

    fn define_size_mapping(&mut self, slot: SlotHandle, mapping: &SizeMapping) {
        self.record(TagCall::DefineSizeMapping {
            slot: slot.id(),
            mapping: mapping.clone(),
        });
    }

    fn set_targeting(&mut self, slot: SlotHandle, key: &str, value: &str) {
        self.record(TagCall::SetTargeting {
            slot: slot.id(),
            key: key.to_string(),
            value: value.to_string(),
        });
    }

    fn display(&mut self, element_id: &str) {
        self.record(TagCall::Display {
            element_id: element_id.to_string(),
        });
    }

    fn refresh(&mut self, slots: &[SlotHandle]) {
        self.record(TagCall::Refresh { slots: ids(slots) });
    }

    fn clear(&mut self, slots: &[SlotHandle]) {
        self.inner
            .borrow_mut()
            .live
            .retain(|_, live| !slots.contains(live));
        self.record(TagCall::Clear { slots: ids(slots) });
    }

    fn enable_async_rendering(&mut self) {
        self.record(TagCall::EnableAsyncRendering);
    }

    fn collapse_empty_divs(&mut self) {
        self.record(TagCall::CollapseEmptyDivs);
    }

    fn disable_initial_load(&mut self) {
        self.record(TagCall::DisableInitialLoad);
    }

    fn enable_services(&mut self) {
        self.record(TagCall::EnableServices);
    }

    fn set_page_url(&mut self, url: &Url) {
        self.record(TagCall::SetPageUrl {
            url: url.to_string(),
        });
    }
}

/// Script loader that records injected script URLs instead of fetching them.
#[derive(Debug, Clone, Default)]
pub struct RecordingLoader {
    injected: Rc<RefCell<Vec<Url>>>,
    fail: bool,
}

impl RecordingLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// A loader whose every injection fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn injected(&self) -> Vec<Url> {
        self.injected.borrow().clone()
    }
}

impl ScriptLoader for RecordingLoader {
    fn inject(&mut self, src: &Url) -> Result<(), TagError> {
        if self.fail {
            return Err(TagError::ScriptInjection {
                url: src.to_string(),
                reason: "no document head".to_string(),
            });
        }
        self.injected.borrow_mut().push(src.clone());
        Ok(())
    }
}
