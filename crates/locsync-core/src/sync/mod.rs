//! Push cycle orchestration
//!
//! - **push**: validate, diff, push, resolve conflicts, write back and
//!   record the new baseline
//! - **preview**: diff local state against the baseline without a remote

mod engine;
mod report;

pub use engine::{PushOptions, SyncEngine};
pub use report::{PushReport, PushStatus, StatusReport};
