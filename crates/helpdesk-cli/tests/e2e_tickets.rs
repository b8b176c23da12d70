//! E2E CLI tests covering:
//! - Session persistence across invocations (`hd signin`, `hd whoami`, `hd signout`)
//! - Ticket lifecycle (`hd create`, `hd update`, `hd comment`, `hd delete`)
//! - Role scoping between the demo client and agent accounts
//! - Report commands (`hd dashboard`, `hd board`, `hd analytics`)
//!
//! Each test runs the `hd` binary as a subprocess against an isolated data dir.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Harness
// ---------------------------------------------------------------------------

fn hd_cmd(data_dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("hd"));
    cmd.env("HELPDESK_DATA_DIR", data_dir);
    cmd.env("HELPDESK_LOG", "error");
    cmd.env_remove("HELPDESK_FORMAT");
    cmd
}

fn json_output(data_dir: &Path, args: &[&str]) -> Value {
    let output = hd_cmd(data_dir)
        .args(args)
        .arg("--json")
        .output()
        .expect("hd should not crash");
    assert!(
        output.status.success(),
        "{args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("--json should produce valid JSON")
}

fn sign_in(data_dir: &Path, email: &str) {
    hd_cmd(data_dir)
        .args(["signin", email, "--password", "password"])
        .assert()
        .success();
}

fn create_ticket(data_dir: &Path, title: &str, department: &str) -> u64 {
    let created = json_output(
        data_dir,
        &["create", "--title", title, "--department", department],
    );
    created["ticket"]["id"].as_u64().expect("ticket id")
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[test]
fn session_survives_between_invocations() {
    let dir = TempDir::new().unwrap();
    sign_in(dir.path(), "agent@example.com");

    let me = json_output(dir.path(), &["whoami"]);
    assert_eq!(me["email"], "agent@example.com");
    assert_eq!(me["role"], "agent");

    hd_cmd(dir.path()).arg("signout").assert().success();
    let me = json_output(dir.path(), &["whoami"]);
    assert!(me.is_null());
}

#[test]
fn wrong_password_fails_with_error_code() {
    let dir = TempDir::new().unwrap();
    hd_cmd(dir.path())
        .args(["signin", "admin@example.com", "--password", "nope", "--json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E1003"));
}

#[test]
fn duplicate_signup_is_rejected() {
    let dir = TempDir::new().unwrap();
    hd_cmd(dir.path())
        .args(["signup", "-n", "Dup", "-e", "client@example.com", "-p", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn invalid_config_fails_with_error_code() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[storage]\nbackend = \"tape\"\n",
    )
    .unwrap();
    hd_cmd(dir.path())
        .args(["whoami", "--json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E1001"));
}

#[test]
fn duplicate_signup_reports_error_code() {
    let dir = TempDir::new().unwrap();
    hd_cmd(dir.path())
        .args(["signup", "-n", "Dup", "-e", "agent@example.com", "-p", "x", "--json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E1004"));
}

#[test]
fn corrupt_ticket_file_does_not_block_the_cli() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("store")).unwrap();
    std::fs::write(dir.path().join("store/tickets.json"), [0x5b, 0xff, 0xfe, 0x5d]).unwrap();
    sign_in(dir.path(), "agent@example.com");

    let listed = json_output(dir.path(), &["list"]);
    assert!(listed.as_array().unwrap().is_empty());
    assert_eq!(create_ticket(dir.path(), "Fresh", "IT Support"), 1);
}

#[test]
fn ticket_commands_require_a_session() {
    let dir = TempDir::new().unwrap();
    hd_cmd(dir.path())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("hd signin"));
}

// ---------------------------------------------------------------------------
// Tickets
// ---------------------------------------------------------------------------

#[test]
fn ticket_lifecycle_round_trip() {
    let dir = TempDir::new().unwrap();
    sign_in(dir.path(), "agent@example.com");

    let id = create_ticket(dir.path(), "VPN drops hourly", "IT Support");
    assert_eq!(id, 1);

    let updated = json_output(
        dir.path(),
        &["update", "1", "--status", "in-progress", "--priority", "high"],
    );
    assert_eq!(updated["status"], "in-progress");
    assert_eq!(updated["priority"], "high");
    assert_eq!(updated["title"], "VPN drops hourly");

    json_output(dir.path(), &["comment", "1", "Looking into it"]);
    json_output(dir.path(), &["comment", "1", "Router replaced"]);
    let shown = json_output(dir.path(), &["show", "1"]);
    let comments = shown["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["text"], "Looking into it");
    assert_eq!(comments[1]["author"], "Employee User");

    hd_cmd(dir.path()).args(["delete", "1"]).assert().success();
    hd_cmd(dir.path())
        .args(["show", "1", "--json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E2001"));
}

#[test]
fn client_only_sees_own_tickets() {
    let dir = TempDir::new().unwrap();
    sign_in(dir.path(), "admin@example.com");
    create_ticket(dir.path(), "Rotate certificates", "IT Support");

    sign_in(dir.path(), "client@example.com");
    create_ticket(dir.path(), "Payslip missing", "HR");

    let listed = json_output(dir.path(), &["list"]);
    let titles: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Payslip missing"]);

    hd_cmd(dir.path())
        .args(["delete", "1"])
        .assert()
        .failure();

    sign_in(dir.path(), "agent@example.com");
    let listed = json_output(dir.path(), &["list"]);
    assert_eq!(listed.as_array().unwrap().len(), 2);
}

#[test]
fn list_filters_by_status_and_search() {
    let dir = TempDir::new().unwrap();
    sign_in(dir.path(), "agent@example.com");
    create_ticket(dir.path(), "Printer jam", "Facilities");
    create_ticket(dir.path(), "Printer toner", "Facilities");
    create_ticket(dir.path(), "Budget review", "Finance");
    json_output(dir.path(), &["update", "2", "--status", "closed"]);

    let open_printers = json_output(
        dir.path(),
        &["list", "--status", "open", "--search", "PRINTER"],
    );
    let ids: Vec<u64> = open_printers
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, [1]);

    hd_cmd(dir.path())
        .args(["list", "--status", "archived"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid status"));
}

#[test]
fn suggest_fills_in_department() {
    let dir = TempDir::new().unwrap();
    sign_in(dir.path(), "client@example.com");
    let created = json_output(
        dir.path(),
        &["create", "--title", "Laptop fan noise", "-d", "loud", "--suggest"],
    );
    assert_eq!(created["ticket"]["department"], "IT Support");
    assert_eq!(created["suggestion"]["department"], "IT Support");
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[test]
fn reports_reflect_the_scoped_view() {
    let dir = TempDir::new().unwrap();
    sign_in(dir.path(), "admin@example.com");
    create_ticket(dir.path(), "A", "IT");
    create_ticket(dir.path(), "B", "IT");
    create_ticket(dir.path(), "C", "HR");
    json_output(dir.path(), &["update", "3", "--status", "resolved"]);

    let dashboard = json_output(dir.path(), &["dashboard"]);
    assert_eq!(dashboard["stats"]["open"], 2);
    assert_eq!(dashboard["stats"]["resolved"], 1);
    assert_eq!(dashboard["stats"]["total"], 3);
    assert_eq!(dashboard["recent"].as_array().unwrap().len(), 3);

    let analytics = json_output(dir.path(), &["analytics"]);
    assert_eq!(analytics["byDepartment"][0]["name"], "IT");
    assert_eq!(analytics["byDepartment"][0]["value"], 2);
    assert_eq!(analytics["byDepartment"][1]["name"], "HR");

    let board = json_output(dir.path(), &["board"]);
    let columns = board["columns"].as_array().unwrap();
    assert_eq!(columns.len(), 4);
    assert_eq!(columns[2]["label"], "Resolved");
    assert_eq!(columns[2]["tickets"][0]["id"], 3);
}
