//! # Report Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     FRONTDESK_SNAPSHOT_DIR=/var/lib/frontdesk/snapshot                 │
//! │     FRONTDESK_RANGE_DAYS=7                                             │
//! │     FRONTDESK_UTC_OFFSET_MINUTES=420                                   │
//! │     FRONTDESK_PRETTY=false                                             │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/frontdesk/report.toml (Linux)                            │
//! │     ~/Library/Application Support/com.frontdesk.report/report.toml     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [snapshot]
//! dir = "./snapshot"
//!
//! [report]
//! range_days = 30
//! pretty = true
//!
//! [clock]
//! utc_offset_minutes = 420   # hotel local time, used for "today"
//! ```

use std::path::PathBuf;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Offset, Utc};
use frontdesk_core::DateRange;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ReportError, ReportResult};

/// Largest offset any real timezone uses (UTC+14:00).
const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

/// Longest default range: ten years.
pub const MAX_RANGE_DAYS: u32 = 3660;

// =============================================================================
// Sections
// =============================================================================

/// Where snapshot JSON files are read from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotSettings {
    #[serde(default = "default_snapshot_dir")]
    pub dir: PathBuf,
}

fn default_snapshot_dir() -> PathBuf {
    PathBuf::from("snapshot")
}

impl Default for SnapshotSettings {
    fn default() -> Self {
        SnapshotSettings {
            dir: default_snapshot_dir(),
        }
    }
}

/// Report shaping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Days covered when no explicit range is given, ending today.
    #[serde(default = "default_range_days")]
    pub range_days: u32,

    /// Pretty-print JSON output.
    #[serde(default = "default_true")]
    pub pretty: bool,
}

fn default_range_days() -> u32 {
    30
}

fn default_true() -> bool {
    true
}

impl Default for ReportSettings {
    fn default() -> Self {
        ReportSettings {
            range_days: default_range_days(),
            pretty: true,
        }
    }
}

/// Local time of the property. Stay dates and "today" are local days.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClockSettings {
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

// =============================================================================
// Main Configuration
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub snapshot: SnapshotSettings,

    #[serde(default)]
    pub report: ReportSettings,

    #[serde(default)]
    pub clock: ClockSettings,
}

impl ReportConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (report.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ReportResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading report config from file");
                let contents = std::fs::read_to_string(&path)
                    .map_err(|e| ReportError::ConfigLoadFailed(format!("{}: {e}", path.display())))?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load report config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ReportResult<()> {
        if self.report.range_days == 0 || self.report.range_days > MAX_RANGE_DAYS {
            return Err(ReportError::InvalidConfig(format!(
                "range_days must be between 1 and {MAX_RANGE_DAYS}, got {}",
                self.report.range_days
            )));
        }

        if self.clock.utc_offset_minutes.abs() > MAX_UTC_OFFSET_MINUTES {
            return Err(ReportError::InvalidConfig(format!(
                "utc_offset_minutes must be within ±{MAX_UTC_OFFSET_MINUTES}, got {}",
                self.clock.utc_offset_minutes
            )));
        }

        Ok(())
    }

    /// Applies overrides from `lookup` (the process environment in `load`).
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup("FRONTDESK_SNAPSHOT_DIR") {
            debug!(dir = %dir, "Overriding snapshot dir from environment");
            self.snapshot.dir = PathBuf::from(dir);
        }

        if let Some(days) = lookup("FRONTDESK_RANGE_DAYS") {
            match days.parse::<u32>() {
                Ok(d) => self.report.range_days = d,
                Err(_) => warn!(value = %days, "Ignoring invalid FRONTDESK_RANGE_DAYS"),
            }
        }

        if let Some(offset) = lookup("FRONTDESK_UTC_OFFSET_MINUTES") {
            match offset.parse::<i32>() {
                Ok(m) => self.clock.utc_offset_minutes = m,
                Err(_) => warn!(value = %offset, "Ignoring invalid FRONTDESK_UTC_OFFSET_MINUTES"),
            }
        }

        if let Some(pretty) = lookup("FRONTDESK_PRETTY") {
            match pretty.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.report.pretty = true,
                "0" | "false" | "no" => self.report.pretty = false,
                _ => warn!(value = %pretty, "Ignoring invalid FRONTDESK_PRETTY"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "frontdesk", "report")
            .map(|dirs| dirs.config_dir().join("report.toml"))
    }

    // =========================================================================
    // Clock Helpers
    // =========================================================================

    /// The property's offset from UTC.
    pub fn utc_offset(&self) -> FixedOffset {
        // validate() keeps this in range; fall back to UTC for hand-built configs
        FixedOffset::east_opt(self.clock.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }

    /// The property's calendar day at instant `now`.
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.utc_offset()).date_naive()
    }

    /// The default report range: `range_days` days ending on `today`, with
    /// instants read at the property offset.
    pub fn default_range(&self, today: NaiveDate) -> ReportResult<DateRange> {
        let span = i64::from(self.report.range_days.max(1)) - 1;
        let start = today.checked_sub_signed(Duration::days(span)).ok_or_else(|| {
            ReportError::InvalidConfig(format!(
                "range_days {} reaches before the earliest supported date",
                self.report.range_days
            ))
        })?;
        Ok(DateRange::new(start, today)?.with_offset(self.utc_offset()))
    }
}
