use std::time::Instant;

use anyhow::Result;
use quickcap_core::config::QuickcapConfig;
use quickcap_core::sync::{self, Direction, StatusBanner, SyncStatus};

use crate::render::Render;
use crate::utils::tui::create_spinner;

pub async fn run(config: &QuickcapConfig, direction: Direction) -> Result<()> {
    let local = config.local_store();
    let remote = config.sync_remote()?;

    let mut banner = StatusBanner::new(Instant::now());
    banner.set(SyncStatus::Syncing, Instant::now());

    let spinner = create_spinner(format!("{} {}", banner.current(Instant::now()).render(), remote.name()));
    let result = sync::run(direction, &local, remote.as_ref()).await;
    spinner.finish_and_clear();

    let report = match result {
        Ok(report) => {
            banner.set(SyncStatus::Success, Instant::now());
            Some(report)
        }
        Err(e) => {
            tracing::warn!(%direction, "sync failed: {}", e);
            banner.set(SyncStatus::Error(e.to_string()), Instant::now());
            None
        }
    };

    println!("{}", banner.current(Instant::now()).render());
    if let Some(report) = report {
        println!("  {}", report.render());
    }

    Ok(())
}
