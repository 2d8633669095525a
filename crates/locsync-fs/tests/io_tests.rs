use locsync_fs::{NormalizedPath, io};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_write_atomic_creates_file() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("baseline.json"));

    io::write_atomic(&path, b"{}").unwrap();

    let content = fs::read_to_string(path.to_native()).unwrap();
    assert_eq!(content, "{}");
}

#[test]
fn test_write_atomic_overwrites_existing() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("baseline.json");
    fs::write(&file_path, "original").unwrap();

    let path = NormalizedPath::new(&file_path);
    io::write_atomic(&path, b"updated").unwrap();

    let content = fs::read_to_string(&file_path).unwrap();
    assert_eq!(content, "updated");
}

#[test]
fn test_write_atomic_creates_parent_directories() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join(".locsync").join("baseline.json"));

    io::write_text(&path, "content").unwrap();

    assert_eq!(io::read_text(&path).unwrap(), "content");
}

#[test]
fn test_write_atomic_leaves_no_temp_files() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("target.json"));

    io::write_text(&path, "content").unwrap();

    let leftovers: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(
        leftovers.is_empty(),
        "No temp files should remain, found: {:?}",
        leftovers.iter().map(|e| e.file_name()).collect::<Vec<_>>()
    );
}

#[test]
fn test_failed_write_atomic_removes_temp_file() {
    let temp = TempDir::new().unwrap();
    // A non-empty directory at the target makes the final rename fail
    let target = temp.path().join("baseline.json");
    fs::create_dir_all(&target).unwrap();
    fs::write(target.join("keep"), "x").unwrap();

    let result = io::write_text(&NormalizedPath::new(&target), "content");

    assert!(result.is_err());
    let leftovers: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .map(|e| e.file_name())
        .collect();
    assert!(leftovers.is_empty(), "temp file left behind: {leftovers:?}");
    assert!(target.join("keep").exists());
}

#[test]
fn test_read_text_nonexistent_file() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("missing.txt"));
    assert!(io::read_text(&path).is_err());
}

#[test]
fn test_read_text_if_exists_distinguishes_missing() {
    let temp = TempDir::new().unwrap();
    let missing = NormalizedPath::new(temp.path().join("missing.txt"));
    assert!(io::read_text_if_exists(&missing).unwrap().is_none());

    let present = NormalizedPath::new(temp.path().join("present.txt"));
    fs::write(present.to_native(), "").unwrap();
    assert_eq!(io::read_text_if_exists(&present).unwrap(), Some(String::new()));
}

#[cfg(unix)]
#[test]
fn test_read_text_if_exists_propagates_other_errors() {
    let temp = TempDir::new().unwrap();
    // Reading a directory as a file is an error other than NotFound
    let path = NormalizedPath::new(temp.path());
    assert!(io::read_text_if_exists(&path).is_err());
}
