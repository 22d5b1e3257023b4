//! Render surface of a placement
//!
//! The placement renders a single holder element and swaps exactly one
//! anchor child in and out of it.

use std::cell::RefCell;
use std::rc::Rc;

/// The container a placement renders into.
pub trait RenderTarget {
    /// Laid-out width of the container, `None` when it is not in the document.
    fn width(&self) -> Option<u32>;

    /// Replace the holder content with `html`.
    fn set_content(&mut self, html: &str) -> Result<(), RenderError>;

    /// Remove all holder content.
    fn clear(&mut self);
}

/// Render errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("Holder element is not available")]
    HolderUnavailable,
}

#[derive(Debug)]
struct NodeState {
    class_name: Option<String>,
    width: u32,
    attached: bool,
    holder: bool,
    content: String,
}

/// In-memory holder element.
///
/// Clones share the same node, so a page can keep one copy to drive layout
/// while the placement owns another.
#[derive(Debug, Clone)]
pub struct HolderNode {
    inner: Rc<RefCell<NodeState>>,
}

impl HolderNode {
    /// An attached, empty holder of the given width.
    pub fn new(width: u32) -> Self {
        Self {
            inner: Rc::new(RefCell::new(NodeState {
                class_name: None,
                width,
                attached: true,
                holder: true,
                content: String::new(),
            })),
        }
    }

    pub fn with_class_name(self, class_name: impl Into<String>) -> Self {
        self.inner.borrow_mut().class_name = Some(class_name.into());
        self
    }

    pub fn class_name(&self) -> Option<String> {
        self.inner.borrow().class_name.clone()
    }

    pub fn set_width(&self, width: u32) {
        self.inner.borrow_mut().width = width;
    }

    /// Take the node out of the document.
    pub fn detach(&self) {
        self.inner.borrow_mut().attached = false;
    }

    pub fn attach(&self) {
        self.inner.borrow_mut().attached = true;
    }

    /// Make the holder element unavailable while keeping the node laid out.
    pub fn set_holder_available(&self, available: bool) {
        self.inner.borrow_mut().holder = available;
    }

    pub fn content(&self) -> String {
        self.inner.borrow().content.clone()
    }

    /// Serialized holder including its content.
    pub fn outer_html(&self) -> String {
        let node = self.inner.borrow();
        match &node.class_name {
            Some(class_name) => format!(r#"<div class="{}">{}</div>"#, class_name, node.content),
            None => format!("<div>{}</div>", node.content),
        }
    }
}

impl RenderTarget for HolderNode {
    fn width(&self) -> Option<u32> {
        let node = self.inner.borrow();
        node.attached.then_some(node.width)
    }

    fn set_content(&mut self, html: &str) -> Result<(), RenderError> {
        let mut node = self.inner.borrow_mut();
        if !node.holder {
            return Err(RenderError::HolderUnavailable);
        }
        node.content = html.to_string();
        Ok(())
    }

    fn clear(&mut self) {
        self.inner.borrow_mut().content.clear();
    }
}
