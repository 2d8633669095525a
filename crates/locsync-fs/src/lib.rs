//! Filesystem primitives for locsync
//!
//! Provides normalized paths, atomic writes, content checksums and
//! format-agnostic configuration files.

pub mod checksum;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;

pub use checksum::compute_content_checksum;
pub use config::ConfigStore;
pub use constants::ProjectPath;
pub use error::{Error, Result};
pub use path::NormalizedPath;
