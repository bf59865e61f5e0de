//! Terminal rendering for weekcal-core types using owo_colors.

use chrono::{DateTime, Local};
use owo_colors::OwoColorize;
use weekcal_core::{Occurrence, WeekWindow};

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Occurrence {
    fn render(&self) -> String {
        let time = match (self.start_at(), self.end_at()) {
            (Ok(start), Ok(end)) => format!("{}-{}", start.format("%H:%M"), end.format("%H:%M")),
            _ => "??:??".to_string(),
        };

        let mut line = format!("  {} {}", time.dimmed(), self.title);
        if !self.description.is_empty() {
            line.push_str(&format!(" {}", self.description.dimmed()));
        }
        line
    }
}

impl Render for WeekWindow<Local> {
    fn render(&self) -> String {
        format!(
            "{} {} {}",
            format_instant(&self.start).bold(),
            "→".dimmed(),
            format_instant(&self.end).bold()
        )
    }
}

fn format_instant(dt: &DateTime<Local>) -> String {
    dt.format("%a %b %-d %H:%M %:z").to_string()
}
