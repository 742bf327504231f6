use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

mod common;

#[cfg(not(feature = "storage-rocksdb"))]
#[test]
fn test_rocksdb_fallback_warning() {
    let catalog = common::catalog_file(&[("p-1", "4.0", 2)]).unwrap();
    let script = common::commands_file(&[common::create_order("o-1", "u-1", "p-1", "2")]).unwrap();

    let mut cmd = Command::new(cargo_bin!("orderflow"));
    cmd.arg(script.path())
        .arg("--catalog")
        .arg(catalog.path())
        .arg("--db-path")
        .arg("some_db");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Falling back to in-memory storage"))
        .stdout(predicate::str::contains("o-1,u-1,p-1,2,8,pending,"));
}

#[cfg(feature = "storage-rocksdb")]
#[test]
fn test_rocksdb_no_fallback_warning() {
    let catalog = common::catalog_file(&[("p-1", "4.0", 2)]).unwrap();
    let script = common::commands_file(&[common::create_order("o-1", "u-1", "p-1", "2")]).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test_db");

    let mut cmd = Command::new(cargo_bin!("orderflow"));
    cmd.arg(script.path())
        .arg("--catalog")
        .arg(catalog.path())
        .arg("--db-path")
        .arg(&db_path);

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("WARNING").not());
}
