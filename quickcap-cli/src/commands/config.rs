use anyhow::Result;
use owo_colors::OwoColorize;
use quickcap_core::config::{Backend, QuickcapConfig};

pub fn run() -> Result<()> {
    let config_path = QuickcapConfig::config_path()?;
    let config = QuickcapConfig::load()?;

    println!("{}", "Paths".bold());
    println!("  Config:     {}", config_path.display());
    println!("  Data file:  {}", config.data_path().display());

    println!();
    println!("{}", "Store".bold());
    let backend = match config.backend {
        Backend::Local => "local",
        Backend::Bin => "bin",
        Backend::Rest => "rest",
    };
    println!("  Backend:    {}", backend);
    println!("  Timezone:   {}", config.timezone);
    println!("  Bin:        {}", describe(Some(&config.bin.url), config.bin.bin_id.as_deref()));
    println!("  REST:       {}", describe(config.rest.url.as_ref(), None));

    println!();
    println!("{}", "Effective settings".bold());
    for line in config.to_toml()?.lines() {
        println!("  {}", line.dimmed());
    }

    Ok(())
}

fn describe(url: Option<&String>, id: Option<&str>) -> String {
    match (url, id.filter(|s| !s.is_empty())) {
        (Some(url), Some(id)) => format!("{}/b/{}", url.trim_end_matches('/'), id),
        (Some(url), None) => url.clone(),
        (None, _) => "not configured".dimmed().to_string(),
    }
}
