//! Runs the `checkin` binary on small order exports.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const ORDERS: &str = "First Name,Last Name,Ticket I.D.,Seat,Status\n\
Ann,Lee,1001,A1,Paid\n\
Ann,Lee,1002,A2,Paid\n\
Bob,Adams,1003,B1,Refunded\n\
Bob,Adams,1004,B2,Paid\n\
Cy &amp; Di,Young,1005,C1,Paid\n\
Dee,Zane,1006,D1,Pending\n";

fn checkin_cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("checkin").unwrap();
    cmd.current_dir(dir);
    cmd.env("RUST_LOG", "error");
    cmd
}

fn write_orders(dir: &Path, content: &str) {
    fs::write(dir.join("orders.csv"), content).unwrap();
}

#[test]
fn writes_the_table_and_the_sheet() {
    let dir = TempDir::new().unwrap();
    write_orders(dir.path(), ORDERS);

    checkin_cmd(dir.path())
        .args(["-i", "orders.csv"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Lee")
                .and(predicate::str::contains("3 patrons, 4 tickets")),
        );

    let csv = fs::read_to_string(dir.path().join("Aggregated_Ticket_Report.csv")).unwrap();
    assert_eq!(
        csv,
        "First Name,Last Name,Tickets_Ordered,Seats\n\
         Bob,Adams,1,B2\n\
         Ann,Lee,2,\"A1, A2\"\n\
         Cy & Di,Young,1,C1\n"
    );
    let pdf = fs::read(dir.path().join("Patron_Checkin_List.pdf")).unwrap();
    assert!(pdf.starts_with(b"%PDF"));
}

#[test]
fn all_statuses_counts_every_row() {
    let dir = TempDir::new().unwrap();
    write_orders(dir.path(), ORDERS);

    checkin_cmd(dir.path())
        .args([
            "-i",
            "orders.csv",
            "--all-statuses",
            "--csv-out",
            "all.csv",
            "--pdf-out",
            "all.pdf",
        ])
        .assert()
        .success();

    let csv = fs::read_to_string(dir.path().join("all.csv")).unwrap();
    assert!(csv.contains("Bob,Adams,2,\"B1, B2\"\n"));
    assert!(csv.contains("Dee,Zane,1,D1\n"));
    assert!(dir.path().join("all.pdf").exists());
}

#[test]
fn missing_column_fails() {
    let dir = TempDir::new().unwrap();
    write_orders(dir.path(), "First Name,Last Name,Seat\nAnn,Lee,A1\n");

    checkin_cmd(dir.path())
        .args(["-i", "orders.csv"])
        .assert()
        .failure()
        .code(1)
        .stderr(
            predicate::str::contains("An error occurred")
                .and(predicate::str::contains("Ticket I.D.")),
        );
    assert!(!dir.path().join("Patron_Checkin_List.pdf").exists());
}

#[test]
fn missing_input_fails() {
    let dir = TempDir::new().unwrap();
    checkin_cmd(dir.path())
        .args(["-i", "nothing.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("An error occurred"));
}

#[test]
fn config_file_drives_the_run() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("show")).unwrap();
    fs::write(
        dir.path().join("show").join("export.csv"),
        "Given,Family,Order,Place,State,Notes\n\
         Ann,Lee,1,A1,Completed,Aisle\n\
         Ann,Lee,2,A2,Completed,Aisle\n\
         Bo,Ray,3,B7,Paid,\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("show").join("config.json"),
        r#"{
            "outputSettings": {
                "title": "Gala Night",
                "csvPath": "report.csv",
                "pdfPath": "door.pdf",
                "summaryPath": "summary.json"
            },
            "inputSource": {
                "provider": "csv",
                "filePath": "export.csv",
                "columns": {
                    "firstName": "Given",
                    "lastName": "Family",
                    "ticketId": "Order",
                    "seat": "Place",
                    "status": "State"
                }
            },
            "rules": { "paidStatus": "Completed" }
        }"#,
    )
    .unwrap();

    checkin_cmd(dir.path())
        .args(["-c", "show/config.json"])
        .assert()
        .success();

    let show = dir.path().join("show");
    let csv = fs::read_to_string(show.join("report.csv")).unwrap();
    assert_eq!(
        csv,
        "First Name,Last Name,Tickets_Ordered,Seats,Notes\nAnn,Lee,2,\"A1, A2\",Aisle\n"
    );
    assert!(show.join("door.pdf").exists());
    let js: Value = serde_json::from_str(&fs::read_to_string(show.join("summary.json")).unwrap())
        .unwrap();
    assert_eq!(js["input"]["title"], "Gala Night");
    assert_eq!(js["input"]["statusFilter"], "Completed");
    assert_eq!(js["counts"]["rowsRead"], 3);
    assert_eq!(js["counts"]["excludedStatus"], 1);
}

#[test]
fn reference_mismatch_fails() {
    let dir = TempDir::new().unwrap();
    write_orders(dir.path(), ORDERS);
    fs::write(
        dir.path().join("expected.csv"),
        "First Name,Last Name,Tickets_Ordered,Seats\nAnn,Lee,2,\"A1, A2\"\n",
    )
    .unwrap();

    checkin_cmd(dir.path())
        .args(["-i", "orders.csv", "-r", "expected.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("differs from the reference"));
}
