//! rgpt Core
//!
//! Data model and dimension resolution for a single ad placement.
//!
//! A placement is described by a [`PlacementConfig`]. Every time the page
//! changes (mount, new props, window resize) the resolver turns that
//! configuration plus the current layout into the ordered list of ad sizes
//! the slot may be requested with:
//!
//! ```text
//! dimensions / format ──▶ candidates ──▶ container filter ──▶ window gate
//!   (explicit or table)    (alias           (responsive        (min/max
//!                           fallback)        only)              window width)
//! ```
//!
//! Resolution is pure and never fails: malformed input degrades to an empty
//! list, which means "show nothing".

mod config;
mod format;
mod resolver;
mod targeting;

pub use config::{ConfigError, PlacementConfig, SizeMapping, SizeMappingEntry};
pub use format::{Dimension, Format, alias_table, fallback_for};
pub use resolver::{candidates, is_window_gated, resolve};
pub use targeting::Targeting;
