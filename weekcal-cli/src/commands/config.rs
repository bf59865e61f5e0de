use anyhow::Result;
use owo_colors::OwoColorize;
use weekcal_core::WeekcalConfig;

pub fn run(config: &WeekcalConfig) -> Result<()> {
    let config_path = WeekcalConfig::config_path()?;

    println!("{}", "Paths".bold());
    println!("  Config:  {}", config_path.display());
    println!("  Output:  {}", config.display_output_path().display());

    println!();
    println!("{}", "Import".bold());
    println!("  Exclude all-day events:  {}", config.exclude_all_day);
    println!("  Default color:           {}", config.default_color);
    println!("  EXDATE matching:         {:?}", config.exdate_matching);

    Ok(())
}
