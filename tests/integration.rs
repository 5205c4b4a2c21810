use std::fs;
use std::path::Path;

use filekit::json::decode_file_into;
use filekit::utils::logging::setup_test_logging;
use filekit::{
    FilekitConfig, FsError, JsonError, JsonOptions, JsonShape, TempRegistry, count_lines,
    decode_file, decode_file_expecting, encode_file, format_path_size, format_size, prepare,
    rename, split_name,
};
use serde_json::json;

// Helper to write a fixture file inside a scratch directory
fn write_fixture(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_json_round_trip_through_configured_options() {
    setup_test_logging();
    let scratch = tempfile::tempdir().unwrap();
    let path = scratch.path().join("state/settings.json");
    let options = JsonOptions::from_config(&FilekitConfig::default());
    let value = json!({
        "name": "filekit",
        "homepage": "https://example.org/filekit",
        "authors": [{"name": "Zoë", "role": "maintainer"}],
        "empty": {}
    });

    encode_file(&path, &value, &options).unwrap();
    assert_eq!(decode_file(&path).unwrap(), value);

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("https://example.org/filekit"));
    assert!(text.contains("Zoë"));
    assert!(text.ends_with("}\n"));
}

#[test]
fn test_encode_never_succeeds_without_a_parent() {
    setup_test_logging();
    let scratch = tempfile::tempdir().unwrap();
    let blocker = write_fixture(scratch.path(), "blocker", "");

    let result = encode_file(
        &blocker.join("a/b/out.json"),
        &json!({"k": 1}),
        &JsonOptions::human(),
    );
    let err = result.unwrap_err();
    assert!(matches!(err, JsonError::Storage(_)));
    assert!(err.to_string().contains("Could not create directory"));
}

#[test]
fn test_decode_failures_are_values_not_panics() {
    setup_test_logging();
    let scratch = tempfile::tempdir().unwrap();
    let malformed = write_fixture(scratch.path(), "malformed.json", "{");
    let empty = write_fixture(scratch.path(), "empty.json", "");

    for path in [&malformed, &empty] {
        let err = decode_file(path).unwrap_err();
        assert_eq!(err.parse_error().unwrap().message(), "Syntax error");
    }

    let err = decode_file_into::<Vec<u32>>(&malformed).unwrap_err();
    assert!(err.parse_error().is_some());
}

#[test]
#[should_panic(expected = "must contain a JSON object, found string")]
fn test_decode_expecting_object_rejects_bare_string() {
    let scratch = tempfile::tempdir().unwrap();
    let path = write_fixture(scratch.path(), "bare.json", "\"hello\"");
    let _ = decode_file_expecting(&path, JsonShape::Object);
}

#[test]
fn test_size_and_name_helpers() {
    assert_eq!(format_size(1048576, 2), "1.00 MB");
    assert_eq!(format_size(1023, 2), "1023.00 bytes");

    let scratch = tempfile::tempdir().unwrap();
    let path = write_fixture(scratch.path(), "kilo.bin", &"x".repeat(1024));
    assert_eq!(format_path_size(&path, 1).unwrap(), "1.0 KB");

    assert_eq!(
        split_name("/path/to/file.txt"),
        ("file".to_string(), Some("txt".to_string()))
    );
    assert_eq!(split_name("/path/.hidden"), (".hidden".to_string(), None));
}

#[test]
fn test_count_lines() {
    let scratch = tempfile::tempdir().unwrap();
    let empty = write_fixture(scratch.path(), "empty.txt", "");
    let five = write_fixture(scratch.path(), "five.txt", "1\n2\n3\n4\n5\n");

    assert_eq!(count_lines(&empty).unwrap(), 0);
    assert_eq!(count_lines(&five).unwrap(), 5);
    assert!(matches!(
        count_lines(&scratch.path().join("missing.txt")),
        Err(FsError::NotFound(_))
    ));
}

#[test]
fn test_prepare_then_rename() {
    setup_test_logging();
    let scratch = tempfile::tempdir().unwrap();
    let source = write_fixture(scratch.path(), "upload.tmp", "content");
    let target = scratch.path().join("archive/2024/upload.txt");

    prepare(&target, 0o755).unwrap();
    rename(&source, &target, Some(0o644), 0o755).unwrap();

    assert!(!source.exists());
    assert_eq!(fs::read_to_string(&target).unwrap(), "content");
}

#[test]
fn test_temp_registry_cleanup_leaves_nothing_behind() {
    setup_test_logging();
    let scratch = tempfile::tempdir().unwrap();
    let registry = TempRegistry::new(scratch.path());

    let mut created = Vec::new();
    for i in 0..3 {
        created.push(registry.file("item-", Some(format!("{i}").as_bytes())).unwrap());
        let dir = registry.dir("tree-").unwrap();
        fs::create_dir_all(dir.join("deep/er")).unwrap();
        created.push(dir);
    }
    assert_eq!(registry.len(), 6);

    registry.cleanup().unwrap();
    assert!(created.iter().all(|p| !p.exists()));
    assert_eq!(fs::read_dir(scratch.path()).unwrap().count(), 0);

    registry.cleanup().unwrap();
}
