//! JSON resource directory backend
//!
//! One `<lang>.json` file per language. Values are either plain strings or
//! objects of the form `{ "value": "...", "comment": "..." }`.

use std::fs;
use std::sync::LazyLock;

use locsync_fs::{NormalizedPath, io};
use regex::Regex;
use serde_json::{Map, Value};

use super::{LanguageDescriptor, ResourceBackend, ResourceEntry, ResourceFile};
use crate::{Error, Result};

static LANGUAGE_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z]{2,3}([-_][A-Za-z0-9]{2,8})*$").expect("language code regex is valid")
});

/// Whether a file stem looks like a language code.
pub(crate) fn is_language_code(stem: &str) -> bool {
    LANGUAGE_CODE.is_match(stem)
}

/// Backend over a directory of `<lang>.json` files
#[derive(Debug, Clone)]
pub struct JsonBackend {
    dir: NormalizedPath,
    default_language: Option<String>,
}

impl JsonBackend {
    pub fn new(dir: NormalizedPath, default_language: Option<String>) -> Self {
        Self {
            dir,
            default_language,
        }
    }

    fn language_path(&self, language: &str) -> NormalizedPath {
        self.dir.join(format!("{language}.json"))
    }

    fn load_object(&self, path: &NormalizedPath) -> Result<Map<String, Value>> {
        let content = io::read_text(path)?;
        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(Error::resource(
                path.as_str(),
                "top-level value must be a JSON object",
            )),
            Err(e) => Err(Error::resource(path.as_str(), e.to_string())),
        }
    }
}

impl ResourceBackend for JsonBackend {
    fn format(&self) -> &str {
        "json"
    }

    fn discover_languages(&self) -> Result<Vec<LanguageDescriptor>> {
        if !self.dir.is_dir() {
            return Err(Error::configuration(format!(
                "resource directory {} does not exist",
                self.dir
            )));
        }

        let native = self.dir.to_native();
        let mut languages = Vec::new();
        for dir_entry in fs::read_dir(&native).map_err(|e| locsync_fs::Error::io(&native, e))? {
            let dir_entry = dir_entry.map_err(|e| locsync_fs::Error::io(&native, e))?;
            let path = NormalizedPath::new(dir_entry.path());
            if !path.is_file() || path.extension() != Some("json") {
                continue;
            }
            let Some(code) = path.file_stem().filter(|stem| is_language_code(stem)) else {
                tracing::debug!(path = %path, "skipping non-language JSON file");
                continue;
            };
            let code = code.to_string();
            let is_default = self.default_language.as_deref() == Some(code.as_str());
            languages.push(LanguageDescriptor {
                code,
                path,
                is_default,
            });
        }

        // Default language first, then by code, so extraction order is stable
        languages.sort_by(|a, b| b.is_default.cmp(&a.is_default).then_with(|| a.code.cmp(&b.code)));
        tracing::debug!(count = languages.len(), dir = %self.dir, "discovered languages");
        Ok(languages)
    }

    fn read_resource_file(&self, language: &LanguageDescriptor) -> Result<ResourceFile> {
        let object = self.load_object(&language.path)?;
        let mut entries = Vec::with_capacity(object.len());

        for (key, raw) in object {
            let entry = match raw {
                Value::String(value) => ResourceEntry::new(key, value),
                Value::Object(fields) => {
                    let value = match fields.get("value") {
                        Some(Value::String(value)) => value.clone(),
                        _ => {
                            return Err(Error::resource(
                                language.path.as_str(),
                                format!("entry '{key}' needs a string \"value\" field"),
                            ));
                        }
                    };
                    let comment = match fields.get("comment") {
                        Some(Value::String(comment)) => Some(comment.clone()),
                        _ => None,
                    };
                    ResourceEntry {
                        key,
                        value,
                        comment,
                    }
                }
                _ => {
                    return Err(Error::resource(
                        language.path.as_str(),
                        format!("value of '{key}' must be a string or an object"),
                    ));
                }
            };
            entries.push(entry);
        }

        Ok(ResourceFile { entries })
    }

    fn write_value(&self, language: &str, key: &str, value: &str) -> Result<()> {
        let path = self.language_path(language);
        let mut object = if path.exists() {
            self.load_object(&path)?
        } else {
            Map::new()
        };

        match object.get_mut(key) {
            Some(Value::Object(fields)) => {
                fields.insert("value".to_string(), Value::String(value.to_string()));
            }
            _ => {
                object.insert(key.to_string(), Value::String(value.to_string()));
            }
        }

        let mut content = serde_json::to_string_pretty(&Value::Object(object))?;
        content.push('\n');
        io::write_text(&path, &content)?;
        tracing::debug!(language, key, path = %path, "wrote resolved value");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("en", true)]
    #[case("pt-BR", true)]
    #[case("zh_Hant", true)]
    #[case("fil", true)]
    #[case("package", false)]
    #[case("e", false)]
    #[case("en-", false)]
    fn language_code_detection(#[case] stem: &str, #[case] expected: bool) {
        assert_eq!(is_language_code(stem), expected);
    }
}
