//! Tests for the JSON resource directory backend

use locsync_core::{Error, JsonBackend, ResourceBackend, SyncScope, extract_in_scope};
use locsync_fs::NormalizedPath;
use locsync_test_utils::TestProject;
use pretty_assertions::assert_eq;
use serde_json::json;

fn backend(project: &TestProject) -> JsonBackend {
    JsonBackend::new(NormalizedPath::new(project.resource_dir()), Some("en".into()))
}

#[test]
fn test_discovery_orders_default_first() {
    let project = TestProject::new();
    project.write_resource("de", &[("A", "a-de")]);
    project.write_resource("fr", &[("A", "a-fr")]);
    project.write_resource("en", &[("A", "a")]);

    let languages = backend(&project).discover_languages().unwrap();
    let codes: Vec<&str> = languages.iter().map(|l| l.code.as_str()).collect();

    assert_eq!(codes, vec!["en", "de", "fr"]);
    assert!(languages[0].is_default);
    assert!(!languages[1].is_default);
}

#[test]
fn test_discovery_skips_non_language_files() {
    let project = TestProject::new();
    project.write_resource("en", &[("A", "a")]);
    std::fs::write(project.resource_dir().join("package.json"), "{}").unwrap();
    std::fs::write(project.resource_dir().join("notes.txt"), "x").unwrap();

    let languages = backend(&project).discover_languages().unwrap();

    assert_eq!(languages.len(), 1);
    assert_eq!(languages[0].code, "en");
}

#[test]
fn test_missing_directory_is_a_configuration_error() {
    let project = TestProject::new();

    let result = backend(&project).discover_languages();

    assert!(matches!(result, Err(Error::Configuration { .. })));
}

#[test]
fn test_reads_plain_and_commented_values() {
    let project = TestProject::new();
    project.write_resource_json(
        "en",
        &json!({
            "Greeting": "Hello",
            "Farewell": { "value": "Bye", "comment": "Shown on logout" }
        }),
    );
    let backend = backend(&project);
    let language = backend.discover_languages().unwrap().remove(0);

    let file = backend.read_resource_file(&language).unwrap();

    let farewell = file.entries.iter().find(|e| e.key == "Farewell").unwrap();
    assert_eq!(farewell.value, "Bye");
    assert_eq!(farewell.comment.as_deref(), Some("Shown on logout"));
    let greeting = file.entries.iter().find(|e| e.key == "Greeting").unwrap();
    assert_eq!(greeting.comment, None);
}

#[test]
fn test_non_string_value_is_a_resource_error() {
    let project = TestProject::new();
    project.write_resource_json("en", &json!({ "Count": 3 }));
    let backend = backend(&project);
    let language = backend.discover_languages().unwrap().remove(0);

    let result = backend.read_resource_file(&language);

    assert!(matches!(result, Err(Error::Resource { .. })));
}

#[test]
fn test_write_value_keeps_object_shape() {
    let project = TestProject::new();
    project.write_resource_json(
        "en",
        &json!({
            "Greeting": "Hello",
            "Farewell": { "value": "Bye", "comment": "Shown on logout" }
        }),
    );
    let backend = backend(&project);

    backend.write_value("en", "Farewell", "Goodbye").unwrap();
    backend.write_value("en", "Greeting", "Hi").unwrap();

    assert_eq!(
        project.read_resource("en"),
        json!({
            "Greeting": "Hi",
            "Farewell": { "value": "Goodbye", "comment": "Shown on logout" }
        })
    );
}

#[test]
fn test_extract_in_scope_filters_languages() {
    let project = TestProject::new();
    project.write_resource("en", &[("A", "a"), ("B", "b")]);
    project.write_resource("fr", &[("A", "a-fr")]);

    let entries = extract_in_scope(&backend(&project), &SyncScope::languages(["fr"])).unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].language, "fr");
    assert_eq!(entries[0].value, "a-fr");
}
