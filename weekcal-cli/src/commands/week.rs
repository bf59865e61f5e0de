use anyhow::Result;
use chrono::Local;
use owo_colors::OwoColorize;
use weekcal_core::{WeekWindow, Weekday};

use crate::render::Render;

pub fn run(window: &WeekWindow<Local>) -> Result<()> {
    println!("{}", window.render());

    for weekday in Weekday::ALL {
        println!(
            "  {} {}",
            weekday.code().dimmed(),
            window.day(weekday).format("%a %b %-d")
        );
    }

    Ok(())
}
