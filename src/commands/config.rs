use anyhow::Result;
use fairdesk_core::config::FairDeskConfig;
use owo_colors::OwoColorize;

pub fn run() -> Result<()> {
    let config_path = FairDeskConfig::config_path()?;
    let config = FairDeskConfig::load()?;

    println!("{}", "Paths".bold());
    println!("  Config:  {}", config_path.display());
    println!("  Data:    {}", config.data_path().display());
    println!();
    println!("{}", "Settings".bold());
    for line in config.to_display_toml()?.lines() {
        println!("  {}", line);
    }
    if config.api_key.is_none() {
        println!("  {}", "api_key not set (GEMINI_API_KEY also works)".dimmed());
    }

    Ok(())
}
