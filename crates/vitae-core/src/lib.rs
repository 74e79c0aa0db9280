//! `vitae-core` — the profile statistics pipeline.
//!
//! Queries GitHub for a user's contribution statistics, renders them into a
//! text template, and writes the result back as a profile document.
//!
//! # Architecture
//!
//! ```text
//! Config          ← profile facts from a YAML file
//!     │
//!     ▼
//! range::chunk    ← splits [start, now) into calendar month/year ranges
//!     │
//!     ▼
//! stats::*        ← sequential per-range aggregation over GithubClient
//!     │              (contributions, line counts, repos); each aggregator
//!     │              reports its own api_calls
//!     ▼
//! StatsRecord     ← typed merge of config facts + aggregates
//!     │
//!     ▼
//! template::render ← {{key}} substitution with dot-filler alignment
//!     │
//!     ▼
//! publish::publish ← optimistic-concurrency document overwrite
//! ```
//!
//! Everything is fail-fast: a failed remote call aborts the run. Runs are
//! idempotent, so the recovery strategy is simply to rerun.

pub mod config;
pub mod error;
pub mod github;
pub mod publish;
pub mod range;
pub mod stats;
pub mod template;
pub mod throttle;

pub use error::{Result, VitaeError};
