//! Resource file backends
//!
//! A backend discovers the languages of a project and reads their resource
//! files. Concrete file formats live behind [`ResourceBackend`]; the sync
//! engine only ever sees flat key/value entries.

mod json;
mod memory;

pub use json::JsonBackend;
pub use memory::MemoryBackend;

use locsync_fs::NormalizedPath;
use serde::{Deserialize, Serialize};

use crate::Result;

/// A language discovered in the project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageDescriptor {
    /// Language code as it appears in file names (`en`, `pt-BR`)
    pub code: String,
    /// Location of the resource file for this language
    pub path: NormalizedPath,
    /// Whether this is the project's default (source) language
    pub is_default: bool,
}

/// One entry of a resource file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceEntry {
    pub key: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl ResourceEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            comment: None,
        }
    }
}

/// Parsed content of one language's resource file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceFile {
    pub entries: Vec<ResourceEntry>,
}

/// Access to the project's resource files.
///
/// Extraction only uses the read methods. `write_value` is called by the
/// sync engine after a successful conflict resolution, to bring values
/// chosen from the remote (or edited by the user) into the local files.
pub trait ResourceBackend {
    /// Format identifier compared against the remote project format.
    fn format(&self) -> &str;

    /// List the languages present in the project.
    fn discover_languages(&self) -> Result<Vec<LanguageDescriptor>>;

    /// Read every entry of one language's resource file.
    fn read_resource_file(&self, language: &LanguageDescriptor) -> Result<ResourceFile>;

    /// Set a single value, creating the key (or the language file) if needed.
    fn write_value(&self, language: &str, key: &str, value: &str) -> Result<()>;
}
