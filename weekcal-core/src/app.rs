//! Entry points used by the schedule UI.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::config::WeekcalConfig;
use crate::error::WeekcalResult;
use crate::export;
use crate::import;
use crate::occurrence::Occurrence;

/// Result of an export, as reported back to the UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOutcome {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct Weekcal {
    config: WeekcalConfig,
}

impl Weekcal {
    pub fn load() -> WeekcalResult<Self> {
        Ok(Weekcal {
            config: WeekcalConfig::load()?,
        })
    }

    pub fn from_config(config: WeekcalConfig) -> Self {
        Weekcal { config }
    }

    /// This week's occurrences from `path`, or an empty list if the import fails.
    pub fn import_events(&self, path: &Path) -> Vec<Occurrence> {
        match self.try_import_events(path) {
            Ok(occurrences) => occurrences,
            Err(e) => {
                error!(path = %path.display(), "Import failed: {}", e);
                Vec::new()
            }
        }
    }

    pub fn try_import_events(&self, path: &Path) -> WeekcalResult<Vec<Occurrence>> {
        import::import_events(path, self.config.expand_options())
    }

    /// Export onto this week's days at the configured output path.
    pub fn export_events(&self, occurrences: &[Occurrence]) -> ExportOutcome {
        match export::export_events(occurrences, &self.config) {
            Ok(path) => ExportOutcome {
                success: true,
                message: format!("Calendar exported to {}", path.display()),
            },
            Err(e) => {
                error!("Export failed: {}", e);
                ExportOutcome {
                    success: false,
                    message: format!("Failed to export calendar: {}", e),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::occurrence::{Color, OccurrenceTime, Source, Weekday};

    fn make_test_occurrence() -> Occurrence {
        Occurrence {
            id: "review".to_string(),
            title: "Review".to_string(),
            description: String::new(),
            time: OccurrenceTime {
                start: "2024-01-10T15:00:00+00:00".to_string(),
                end: "2024-01-10T15:45:00+00:00".to_string(),
            },
            weekday: Weekday::Wednesday,
            color: Color::Blue,
            source: Source::Internal,
        }
    }

    #[test]
    fn test_import_events_missing_file_is_empty() {
        let weekcal = Weekcal::default();
        assert!(weekcal.import_events(Path::new("/nonexistent/calendar.ics")).is_empty());
        assert!(weekcal.try_import_events(Path::new("/nonexistent/calendar.ics")).is_err());
    }

    #[test]
    fn test_export_events_reports_success() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calendar.ics");
        let weekcal = Weekcal::from_config(WeekcalConfig {
            output_path: path.clone(),
            ..Default::default()
        });

        let outcome = weekcal.export_events(&[make_test_occurrence()]);

        assert!(outcome.success, "Outcome: {:?}", outcome);
        assert!(outcome.message.contains("calendar.ics"));
        assert!(path.exists());
    }

    #[test]
    fn test_export_events_reports_failure() {
        let weekcal = Weekcal::from_config(WeekcalConfig {
            output_path: "/nonexistent/dir/calendar.ics".into(),
            ..Default::default()
        });

        let outcome = weekcal.export_events(&[make_test_occurrence()]);

        assert!(!outcome.success);
        assert!(outcome.message.starts_with("Failed to export calendar"));
    }

    #[test]
    fn test_export_outcome_json_shape() {
        let outcome = ExportOutcome {
            success: true,
            message: "ok".to_string(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "message": "ok"}));
    }
}
