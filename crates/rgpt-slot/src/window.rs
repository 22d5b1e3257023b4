//! Window events delivered to placements.
//!
//! Placements subscribe to the event kinds they care about and get a
//! channel receiver back; the page loop drains those receivers. Every
//! dispatched event carries a window-wide sequence number so events drained
//! from several receivers can be put back in dispatch order.

use crossbeam_channel::{Receiver, Sender, unbounded};
use std::cell::{Cell, RefCell};
use std::fmt;
use tracing::{debug, trace};

/// Kinds of window event a placement can listen for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowEventKind {
    Resize,
    /// Page-wide "refresh all ads" signal
    RefreshAds,
}

/// Events sent from the window to subscribed placements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    /// Inner width changed
    Resize { width: u32 },
    /// Refresh every refreshable slot
    RefreshAds,
}

impl WindowEvent {
    pub fn kind(&self) -> WindowEventKind {
        match self {
            Self::Resize { .. } => WindowEventKind::Resize,
            Self::RefreshAds => WindowEventKind::RefreshAds,
        }
    }
}

/// Event tagged with its position in the window's dispatch order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sequenced {
    pub seq: u64,
    pub event: WindowEvent,
}

/// Unique identifier for a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listener({})", self.0)
    }
}

/// Receiving end of a window listener.
#[derive(Debug)]
pub struct Subscription {
    id: ListenerId,
    kind: WindowEventKind,
    rx: Receiver<Sequenced>,
}

impl Subscription {
    /// Get the listener ID.
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Get the event kind this listener receives.
    pub fn kind(&self) -> WindowEventKind {
        self.kind
    }

    /// Take every event delivered so far (non-blocking).
    pub fn drain(&self) -> Vec<WindowEvent> {
        self.rx.try_iter().map(|delivered| delivered.event).collect()
    }

    /// Like [`drain`](Self::drain), keeping the dispatch sequence numbers.
    pub fn drain_sequenced(&self) -> Vec<Sequenced> {
        self.rx.try_iter().collect()
    }
}

struct Listener {
    id: ListenerId,
    kind: WindowEventKind,
    tx: Sender<Sequenced>,
}

/// The browser window as seen by placements.
pub struct Window {
    inner_width: Cell<u32>,
    listeners: RefCell<Vec<Listener>>,
    next_listener: Cell<u64>,
    next_event: Cell<u64>,
}

impl Window {
    /// Create a window with no listeners.
    pub fn new(inner_width: u32) -> Self {
        Self {
            inner_width: Cell::new(inner_width),
            listeners: RefCell::new(Vec::new()),
            next_listener: Cell::new(1),
            next_event: Cell::new(1),
        }
    }

    /// Get the current inner width in pixels.
    pub fn inner_width(&self) -> u32 {
        self.inner_width.get()
    }

    /// Register a listener for `kind`.
    pub fn subscribe(&self, kind: WindowEventKind) -> Subscription {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);

        let (tx, rx) = unbounded();
        self.listeners.borrow_mut().push(Listener { id, kind, tx });
        debug!("Added {:?} {}", kind, id);

        Subscription { id, kind, rx }
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|listener| listener.id != id);
        let removed = listeners.len() != before;
        if removed {
            debug!("Removed {}", id);
        }
        removed
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Number of registered listeners of one kind.
    pub fn listener_count_for(&self, kind: WindowEventKind) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|listener| listener.kind == kind)
            .count()
    }

    /// Change the inner width and notify resize listeners.
    pub fn resize(&self, width: u32) {
        self.inner_width.set(width);
        self.dispatch(WindowEvent::Resize { width });
    }

    /// Deliver an event to every listener of its kind.
    ///
    /// Listeners whose subscription was dropped are forgotten.
    pub fn dispatch(&self, event: WindowEvent) {
        let kind = event.kind();
        let seq = self.next_event.get();
        self.next_event.set(seq + 1);

        let delivered = Sequenced { seq, event };
        self.listeners.borrow_mut().retain(|listener| {
            if listener.kind != kind {
                return true;
            }
            let sent = listener.tx.send(delivered).is_ok();
            if !sent {
                trace!("Dropping closed {}", listener.id);
            }
            sent
        });
    }
}
