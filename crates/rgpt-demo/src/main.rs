//! rgpt demo
//!
//! Mounts the placements of a page description against an in-memory tag
//! library, simulates the library loading, a series of window resizes and
//! a refresh signal, then prints the resulting markup and every call the
//! tag library received.

mod config;

use anyhow::Result;
use config::PageSpec;
use rgpt_slot::{HolderNode, Page, Window};
use rgpt_tag::{RecordingLibrary, RecordingLoader, TagService};
use std::path::PathBuf;
use std::rc::Rc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

// Use mimalloc as the global allocator
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let spec = match std::env::args().nth(1) {
        Some(path) => PageSpec::load(&PathBuf::from(path))?,
        None => PageSpec::sample()?,
    };
    info!("Page with {} placements, window {}px", spec.placements.len(), spec.window_width);

    let library = RecordingLibrary::new();
    let loader = RecordingLoader::new();
    let tag = Rc::new(TagService::new(library.clone(), loader.clone(), spec.tag.clone()));
    let window = Rc::new(Window::new(spec.window_width));
    let mut page = Page::new(tag.clone(), window);

    let mut nodes = Vec::new();
    for placement in &spec.placements {
        let width = placement.container_width.min(spec.window_width);
        let mut node = HolderNode::new(width);
        if let Some(class_name) = &placement.class_name {
            node = node.with_class_name(class_name.clone());
        }
        page.mount(placement.config.clone(), node.clone())?;
        nodes.push((node, placement.container_width));
    }

    for url in loader.injected() {
        info!("Script injected: {}", url);
    }
    tag.library_loaded();

    for &width in &spec.resize {
        // containers never outgrow the window
        for (node, natural) in &nodes {
            node.set_width((*natural).min(width));
        }
        let handled = page.resize(width);
        info!("Window resized to {}px ({} events handled)", width, handled);
    }

    if spec.refresh {
        let handled = page.refresh_ads();
        info!("Refresh signal delivered to {} placements", handled);
    }

    for (node, _) in &nodes {
        println!("{}", node.outer_html());
    }
    println!("{}", serde_json::to_string_pretty(&library.calls())?);

    drop(page);
    info!("Page closed, {} slots left", library.live_slots().len());
    Ok(())
}
