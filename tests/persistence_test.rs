#![cfg(feature = "storage-rocksdb")]

use assert_cmd::cargo_bin;
use std::io::Write;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn test_rocksdb_generation_stays_idempotent_across_runs() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("commissions_db");

    let mut csv = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv, "id,advisor,financing_amount,term_months,sign_date,status,template").unwrap();
    writeln!(csv, "1,7,100000,24,2026-03-02T09:00:00Z,active,301").unwrap();

    let run = |db: &std::path::Path| {
        let output = Command::new(cargo_bin!("commission-engine"))
            .arg("--contracts")
            .arg(csv.path())
            .arg("--month")
            .arg("3")
            .arg("--year")
            .arg("2026")
            .arg("--db-path")
            .arg(db)
            .output()
            .expect("Failed to execute command");
        assert!(output.status.success());
        String::from_utf8_lossy(&output.stdout).into_owned()
    };

    let first = run(&db_path);
    assert!(first.contains("2,1,7,1,2.00,1000.00,not_required,pending"));
    assert!(first.contains("3,1,7,2,2.00,1000.00,not_required,pending"));

    // Second run against the same database finds the stored family and
    // creates nothing new: same ids, same rows.
    let second = run(&db_path);
    assert_eq!(first, second);
    assert!(!second.contains("5,1,7"));
}
