//! [`TestProject`] builder for locsync test scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tempfile::TempDir;

/// Directory holding resource files in every test project
pub const RESOURCE_DIR: &str = "locales";

/// Baseline location relative to the project root
pub const BASELINE_FILE: &str = ".locsync/baseline.json";

/// A temporary locsync project with helpers for setup and assertion.
///
/// # Example
///
/// ```rust,no_run
/// use locsync_test_utils::TestProject;
///
/// let project = TestProject::new();
/// project.init(Some(("https://strings.example.com", "app")));
/// project.write_resource("en", &[("Greeting", "Hello")]);
/// project.assert_file_exists("locales/en.json");
/// ```
pub struct TestProject {
    temp_dir: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn resource_dir(&self) -> PathBuf {
        self.root().join(RESOURCE_DIR)
    }

    pub fn baseline_path(&self) -> PathBuf {
        self.root().join(BASELINE_FILE)
    }

    /// Write `.locsync/config.toml` with JSON resources under `locales/`,
    /// `en` as default language and an optional `(url, project)` remote.
    pub fn init(&self, remote: Option<(&str, &str)>) {
        let config_dir = self.root().join(".locsync");
        fs::create_dir_all(&config_dir).unwrap();

        let mut config = format!(
            "[resources]\npath = \"{RESOURCE_DIR}\"\nformat = \"json\"\ndefault_language = \"en\"\n"
        );
        if let Some((url, project)) = remote {
            config.push_str(&format!(
                "\n[remote]\nurl = \"{url}\"\nproject = \"{project}\"\ntimeout_secs = 5\n"
            ));
        }

        fs::write(config_dir.join("config.toml"), config).unwrap();
        fs::create_dir_all(self.resource_dir()).unwrap();
    }

    /// Write `locales/{language}.json` as a flat key/value object.
    pub fn write_resource(&self, language: &str, pairs: &[(&str, &str)]) {
        let object: Map<String, Value> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), Value::String((*value).to_string())))
            .collect();
        self.write_resource_json(language, &Value::Object(object));
    }

    /// Write `locales/{language}.json` with arbitrary JSON content.
    pub fn write_resource_json(&self, language: &str, content: &Value) {
        fs::create_dir_all(self.resource_dir()).unwrap();
        let text = serde_json::to_string_pretty(content).unwrap();
        fs::write(self.resource_dir().join(format!("{language}.json")), text).unwrap();
    }

    /// Parse `locales/{language}.json`.
    pub fn read_resource(&self, language: &str) -> Value {
        let path = self.resource_dir().join(format!("{language}.json"));
        let text = fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read resource: {}", path.display()));
        serde_json::from_str(&text).unwrap()
    }

    /// Overwrite the baseline file with raw content.
    pub fn write_baseline(&self, content: &str) {
        fs::create_dir_all(self.root().join(".locsync")).unwrap();
        fs::write(self.baseline_path(), content).unwrap();
    }

    /// Raw baseline bytes, or `None` when no baseline exists.
    pub fn baseline_bytes(&self) -> Option<Vec<u8>> {
        fs::read(self.baseline_path()).ok()
    }

    /// Parsed baseline document.
    ///
    /// # Panics
    /// Panics if no baseline exists or it is not valid JSON.
    pub fn read_baseline(&self) -> Value {
        let bytes = self.baseline_bytes().expect("baseline should exist");
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Assert that `path` (relative to the project root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the project root) does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }
}
