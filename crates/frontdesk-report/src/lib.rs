//! # frontdesk-report: Snapshot Orchestration for Frontdesk
//!
//! Fetches the three snapshot lists, waits for all of them, and hands them to
//! `frontdesk-core` for occupancy reports and booking action flags.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Report Orchestration                               │
//! │                                                                         │
//! │  ┌──────────────────┐     ┌──────────────────┐     ┌────────────────┐  │
//! │  │  SnapshotSource  │     │  ReportBuilder   │     │ frontdesk-core │  │
//! │  │                  │     │                  │     │                │  │
//! │  │  JsonDirSource   │────▶│  try_join! over  │────▶│  reconcile     │  │
//! │  │  MemorySource    │     │  3 fetches       │     │  evaluate_all  │  │
//! │  └──────────────────┘     └──────────────────┘     └────────────────┘  │
//! │           ▲                        ▲                                    │
//! │           │                        │                                    │
//! │  ┌────────┴────────────────────────┴──────────┐                        │
//! │  │   ReportConfig (defaults → TOML → env)     │                        │
//! │  └────────────────────────────────────────────┘                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`config`] - Snapshot dir, default range, property clock offset
//! - [`error`] - Report error types
//! - [`source`] - `SnapshotSource` trait and implementations
//! - [`report`] - Fan-out / fan-in reconciliation report
//! - [`desk`] - Per-booking eligibility flags
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use frontdesk_report::{JsonDirSource, ReportBuilder, ReportConfig};
//!
//! let config = ReportConfig::load_or_default(None);
//! let source = Arc::new(JsonDirSource::new(&config.snapshot.dir));
//! let range = config.default_range(config.today(chrono::Utc::now()))?;
//!
//! let report = ReportBuilder::new(source).build(&range).await?;
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod desk;
pub mod error;
pub mod report;
pub mod source;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ClockSettings, ReportConfig, ReportSettings, SnapshotSettings};
pub use desk::booking_flags;
pub use error::{ReportError, ReportResult};
pub use report::{fetch_snapshot, ReportBuilder, Snapshot};
pub use source::{JsonDirSource, MemorySource, SnapshotSource};
