use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

mod common;

#[test]
fn test_malformed_command_rows() {
    let catalog = common::catalog_file(&[("p-1", "2.5", 10)]).unwrap();

    let mut script = NamedTempFile::new().unwrap();
    writeln!(script, "{}", common::COMMAND_HEADER.join(",")).unwrap();
    // Valid order
    writeln!(script, "create_order,o-1,u-1,p-1,,2,,,,,,").unwrap();
    // Unknown command type
    writeln!(script, "ship_it,o-1,,,,,,,,,,").unwrap();
    // Quantity is not a number
    writeln!(script, "create_order,o-2,u-1,p-1,,lots,,,,,,").unwrap();
    // Missing the product cell
    writeln!(script, "create_order,o-3,u-1,,,1,,,,,,").unwrap();
    // Valid order again
    writeln!(script, "create_order,o-4,u-1,p-1,,4,,,,,,").unwrap();

    let mut cmd = Command::new(cargo_bin!("orderflow"));
    cmd.arg(script.path()).arg("--catalog").arg(catalog.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("failed to read command"))
        .stdout(predicate::str::contains("o-1,u-1,p-1,2,5,pending,"))
        .stdout(predicate::str::contains("o-4,u-1,p-1,4,10,pending,"))
        .stdout(predicate::str::contains("o-2").not())
        .stdout(predicate::str::contains("o-3").not());
}

#[test]
fn test_malformed_catalog_rows() {
    let mut catalog = NamedTempFile::new().unwrap();
    writeln!(catalog, "id,name,description,price,stock").unwrap();
    writeln!(catalog, "p-1,Mug,,cheap,5").unwrap();
    writeln!(catalog, "p-2,Pen,,1.0,5").unwrap();

    let script = common::commands_file(&[
        common::create_order("o-1", "u-1", "p-1", "1"),
        common::create_order("o-2", "u-1", "p-2", "1"),
    ])
    .unwrap();

    let mut cmd = Command::new(cargo_bin!("orderflow"));
    cmd.arg(script.path()).arg("--catalog").arg(catalog.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("failed to read product"))
        .stderr(predicate::str::contains("product p-1 not found"))
        .stdout(predicate::str::contains("o-2,u-1,p-2,1,1,pending,"));
}

#[test]
fn test_missing_input_file_fails() {
    let mut cmd = Command::new(cargo_bin!("orderflow"));
    cmd.arg("does/not/exist.csv");

    cmd.assert().failure();
}
