//! readbar — reading-progress overlay for long-form pages.
//!
//! Replays a recorded page against the overlay controller:
//!
//! ```text
//! RUST_LOG=debug readbar page.json
//! ```
//!
//! `READBAR_CONFIG` overrides the config file location.

use anyhow::{bail, Context, Result};
use readbar_config::{config_path, load as load_config};
use readbar_controller::{
    replay::{spawn_replay, ReplayStep},
    Activation, Session,
};
use readbar_core::PageEvent;
use readbar_dom::{InMemoryDocument, PageFixture};
use std::{path::PathBuf, time::Duration};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Structured logging — RUST_LOG controls verbosity (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("readbar v{} starting", env!("CARGO_PKG_VERSION"));

    let Some(fixture_path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        bail!("usage: readbar <page.json>");
    };

    let config = load_config(config_path())?;

    let fixture = PageFixture::load(&fixture_path)
        .with_context(|| format!("loading page '{}'", fixture_path.display()))?;

    let mut session = Session::start(InMemoryDocument::from_fixture(&fixture), &config);

    let fill = match session.activation() {
        Activation::Active(overlay) => overlay.overlay().fill,
        Activation::Inactive(reason) => {
            tracing::info!(?reason, "nothing to track");
            return Ok(());
        }
    };

    let mut steps = spawn_replay(
        fixture.scroll.clone(),
        Duration::from_millis(config.replay.interval_ms),
    );

    while let Some(step) = steps.recv().await {
        match step {
            ReplayStep::ScrollTo(offset) => {
                session.document_mut().scroll_to(offset);
                session.dispatch(PageEvent::Scroll)?;
                let width = session.document().inline_style(fill, "width").unwrap_or("");
                tracing::info!(offset, width, "scroll");
            }
            ReplayStep::Unload => {
                session.dispatch(PageEvent::Unload)?;
                tracing::info!("page unloaded");
            }
        }
    }

    Ok(())
}
