use anyhow::Result;
use chrono::Utc;
use quickcap_core::config::QuickcapConfig;
use quickcap_core::share;

use super::load;

pub async fn run(config: &QuickcapConfig, base_url: &str) -> Result<()> {
    let store = config.store()?;
    let snapshot = load(store.as_ref()).await?;

    println!("{}", share::encode_link(base_url, &snapshot, Utc::now())?);
    Ok(())
}
