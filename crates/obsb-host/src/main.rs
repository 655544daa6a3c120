//! obs-browser host
//!
//! Runs the browser-source integration against a headless engine:
//! sets up logging and configuration, loads a local page through the file
//! scheme, exercises the JavaScript bridge from the page side, and drives
//! the host loop that drains the task bridge and pumps the engine.

mod config;
mod engine;
mod host_loop;
mod state;

use anyhow::{Context, Result};
use config::HostConfig;
use engine::{HeadlessEngine, HeadlessView};
use host_loop::HostLoop;
use obsb_relay::{ControlLevel, Relay, ViewId};
use obsb_scheme::SchemeHandler;
use obsb_tasks::TaskBridge;
use state::SimulatedHost;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

// Use mimalloc as the global allocator
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> Result<()> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = HostConfig::load(config_path.as_deref()).context("Failed to load host config")?;

    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(config.level()?)
        .with_target(false)
        .compact()
        .init();

    info!("obs-browser host starting...");

    // This thread is the engine UI thread from here on
    let bridge = Arc::new(TaskBridge::new(HeadlessEngine::new(), config.bridge.clone()));
    info!("Executable: {}", bridge.executable_path().display());

    let host = Arc::new(SimulatedHost::new(config.canvas_width, config.canvas_height));
    let relay = Arc::new(Relay::new(bridge.clone(), host.clone()));
    let scheme = SchemeHandler::new(config.scheme.clone()).context("Invalid scheme root")?;

    let view = Arc::new(HeadlessView::new(ViewId::new(1), ControlLevel::ReadUser));
    let views = vec![view.clone()];

    if let Some(page) = &config.page {
        let url = scheme
            .url_for(page)
            .with_context(|| format!("Cannot express {} as a URL", page.display()))?;
        match view.load(&scheme, &url) {
            Ok(_) => info!("Page ready ({} bytes)", view.loaded_bytes()),
            Err(e) => warn!("Page load failed ({}): {}", e.status_code(), e),
        }
    }

    // Page script asks for host state
    view.call(&relay, "getCurrentScene", |json| info!("getCurrentScene -> {}", json))?;
    view.call(&relay, "getStatus", |json| info!("getStatus -> {}", json))?;
    view.call(&relay, "getControlLevel", |json| info!("getControlLevel -> {}", json))?;

    // Frontend events arrive on another thread
    let frontend = {
        let host = host.clone();
        let relay = relay.clone();
        let views = views.clone();
        thread::Builder::new()
            .name("frontend".to_string())
            .spawn(move || {
                relay.dispatch_event(&views, &host.switch_scene("Starting Soon"));
                relay.dispatch_event(&views, &host.set_streaming(true));
                relay.dispatch_event(&views, &host.set_recording(true));
                if let Some(event) = host.set_paused(true) {
                    relay.dispatch_event(&views, &event);
                }
            })
            .context("Failed to spawn frontend thread")?
    };
    frontend
        .join()
        .map_err(|_| anyhow::anyhow!("Frontend thread panicked"))?;

    view.call(&relay, "getStatus", |json| info!("getStatus -> {}", json))?;

    let host_loop = HostLoop::new(bridge.clone());
    let ran = host_loop.run(config.ticks, config.tick_interval());
    info!(
        "Ran {} task(s) over {} tick(s), {} engine unit(s)",
        ran,
        config.ticks,
        bridge.pump().units()
    );

    if view.pending_callbacks() > 0 {
        warn!("{} page callback(s) never answered", view.pending_callbacks());
    }
    for (name, detail) in view.events() {
        info!("Page saw {} {}", name, detail);
    }

    relay.dispatch_event(&views, &obsb_relay::HostEvent::Exit);
    view.close();
    let dropped = bridge.shutdown();

    info!("obs-browser host shutting down ({} task(s) dropped)", dropped);
    Ok(())
}
