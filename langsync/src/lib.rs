#![forbid(unsafe_code)]
//! Line-level synchronization of Android `strings.xml` locale files.
//!
//! A *source* file (usually `res/values/strings.xml`) defines which entries
//! exist, in which order, and with which comments. Each *target* locale file
//! (`res/values-fr/strings.xml`, ...) is rewritten to follow that layout
//! while keeping every translation it already has. Keys the target lacks are
//! copied from the source untranslated.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use langsync::{SyncConfig, SyncSession};
//!
//! let source = "app/src/main/res/values/strings.xml";
//! let session = SyncSession::discover(source, SyncConfig::default())?;
//! let report = session.run(&mut |event: langsync::SyncEvent| println!("{}", event))?;
//! println!("updated {} files", report.updated());
//! # Ok::<(), langsync::Error>(())
//! ```
//!
//! # Constraints
//!
//! - Every `<string>` entry must sit on a single line to be matched.
//! - Files containing a live `<string-array>` are rejected by
//!   [`validate_file`] and refused by [`SyncSession::run`]; arrays inside
//!   comments are fine.
//! - No target is replaced unless every target was merged successfully.

pub mod config;
pub mod discover;
pub mod error;
pub mod events;
pub mod index;
pub mod line;
pub mod merge;
pub mod session;
pub mod traits;
pub mod validate;

// Re-export most used types for easy consumption
pub use crate::{
    config::SyncConfig,
    discover::{discover_targets, discover_targets_with},
    error::{Error, Result},
    events::{ChannelListener, NoopListener, SyncEvent, SyncListener},
    index::{ExistingEntryIndex, build_index},
    line::{ClassifierState, LineKind, classify, entry_key},
    merge::{MergeStats, merge, merge_into_file},
    session::{SyncReport, SyncSession, TargetReport, collect_garbage},
    validate::{
        Eligibility, ensure_eligible, ensure_resource_file, is_resource_file, validate_file,
        validate_file_lossy,
    },
};
