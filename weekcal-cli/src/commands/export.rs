use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use owo_colors::OwoColorize;
use weekcal_core::export::export_events_to;
use weekcal_core::{Occurrence, WeekWindow};

pub fn run(occurrences_path: &Path, output: &Path, window: &WeekWindow<Local>) -> Result<()> {
    let content = std::fs::read_to_string(occurrences_path)
        .with_context(|| format!("Could not read {}", occurrences_path.display()))?;
    let occurrences: Vec<Occurrence> = serde_json::from_str(&content)
        .with_context(|| format!("Could not parse occurrences in {}", occurrences_path.display()))?;

    export_events_to(&occurrences, output, window)?;

    println!(
        "{} Exported {} events to {}",
        "✓".green(),
        occurrences.len(),
        output.display()
    );
    Ok(())
}
