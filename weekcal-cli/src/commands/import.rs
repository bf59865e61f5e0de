use std::path::Path;

use anyhow::Result;
use chrono::Local;
use owo_colors::OwoColorize;
use weekcal_core::import::import_events_in;
use weekcal_core::{WeekWindow, WeekcalConfig, Weekday};

use crate::render::Render;

pub fn run(path: &Path, json: bool, window: &WeekWindow<Local>, config: &WeekcalConfig) -> Result<()> {
    let occurrences = import_events_in(path, window, config.expand_options())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&occurrences)?);
        return Ok(());
    }

    println!("{}", window.render());

    if occurrences.is_empty() {
        println!("{}", "No events this week".dimmed());
        return Ok(());
    }

    // Group by weekday, Sunday first
    for weekday in Weekday::ALL {
        let day: Vec<_> = occurrences.iter().filter(|o| o.weekday == weekday).collect();
        if day.is_empty() {
            continue;
        }

        println!();
        let label = window.day(weekday).format("%a %b %-d").to_string();
        println!("{}", label.bold());
        for occ in day {
            println!("{}", occ.render());
        }
    }

    println!();
    println!("{}", format!("{} events", occurrences.len()).dimmed());
    Ok(())
}
