//! Read View Configuration Tests
//!
//! Tests for loading read view options from a JSON file.

use std::fs;
use std::sync::Arc;

use tempfile::TempDir;

use readview::engine::MemoryEngine;
use readview::index::TreeIndex;
use readview::read_view::{ConfigError, ReadView, ReadViewConfig};
use readview::space::SpaceDef;
use readview::tuple::{FieldDef, FieldType};
use readview::Catalog;

fn write_config(dir: &TempDir, json: &str) -> std::path::PathBuf {
    let path = dir.path().join("readview.json");
    fs::write(&path, json).unwrap();
    path
}

fn catalog() -> Catalog {
    let catalog = Catalog::new();
    catalog
        .register_engine(Arc::new(MemoryEngine::new("memtx")))
        .unwrap();
    for (id, name) in [(512, "users"), (513, "orders"), (514, "audit")] {
        let def = SpaceDef::new(name).with_fields(vec![FieldDef::new("id", FieldType::Unsigned)]);
        let space = catalog.create_space(id, def, "memtx").unwrap();
        space.set_index(Arc::new(TreeIndex::new(0, "pk", 0)));
    }
    let scratch = catalog
        .create_space(515, SpaceDef::new("scratch").temporary(), "memtx")
        .unwrap();
    scratch.set_index(Arc::new(TreeIndex::new(0, "pk", 0)));
    catalog
}

/// A loaded config drives space selection and format choice.
#[test]
fn test_load_and_open() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"{
            "needs_field_names": true,
            "needs_temporary_spaces": true,
            "exclude_spaces": ["audit"]
        }"#,
    );

    let config = ReadViewConfig::load(&path).unwrap();
    assert!(config.needs_field_names);
    assert!(config.spaces.is_none());

    let catalog = catalog();
    let rv = ReadView::open(&catalog, &config.into_options()).unwrap();
    let names: Vec<&str> = rv.spaces().iter().map(|s| s.name()).collect();
    assert_eq!(names, vec!["users", "orders", "scratch"]);
    assert!(rv.spaces().iter().all(|s| s.format().is_named()));
}

/// An allow-list keeps only the named spaces.
#[test]
fn test_space_allow_list() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, r#"{"spaces": ["orders", "scratch"]}"#);

    let catalog = catalog();
    let opts = ReadViewConfig::load(&path).unwrap().into_options();
    let rv = ReadView::open(&catalog, &opts).unwrap();

    // Temporary spaces stay out even when listed.
    let names: Vec<&str> = rv.spaces().iter().map(|s| s.name()).collect();
    assert_eq!(names, vec!["orders"]);
}

/// A missing file is reported with its path.
#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.json");

    let err = ReadViewConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert_eq!(err.code(), "RV_CONFIG_IO");
    assert!(err.to_string().contains("absent.json"));
}

/// Malformed JSON is rejected.
#[test]
fn test_malformed_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, r#"{"needs_field_names": "yes"}"#);

    let err = ReadViewConfig::load(&path).unwrap_err();
    assert_eq!(err.code(), "RV_CONFIG_PARSE");
}
