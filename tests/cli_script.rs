mod common;

use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use subtrack_core::{cli::SCRIPT_ENV, utils::paths::HOME_ENV};

fn cli(base: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("subtrack_cli").unwrap();
    cmd.env(SCRIPT_ENV, "1")
        .env(HOME_ENV, base)
        .env("NO_COLOR", "1")
        .env("RUST_LOG", "off");
    cmd
}

#[test]
fn script_mode_adds_and_reports() {
    let base = common::temp_base();
    let input = "add Netflix 15 monthly Streaming\n\
                 add \"Cloud Drive\" 120 yearly Storage\n\
                 list\n\
                 total\n\
                 top 1\n\
                 exit\n";

    cli(&base)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Added `Netflix`"))
        .stdout(contains("Cloud Drive"))
        .stdout(contains("Monthly total: €25.00"));

    let store = std::fs::read_to_string(base.join("store.json")).unwrap();
    assert!(store.contains("subtracker_subscriptions"));
}

#[test]
fn exports_calendar_and_json_files() {
    let base = common::temp_base();
    let ics = base.join("out.ics");
    let json = base.join("out.json");
    let input = format!(
        "add Netflix 15 monthly Streaming --renews 2099-01-15\nexport-ics {}\nexport-json {}\nexit\n",
        ics.display(),
        json.display()
    );

    cli(&base).write_stdin(input).assert().success();

    let calendar = std::fs::read_to_string(&ics).unwrap();
    assert!(calendar.contains("DTSTART;VALUE=DATE:20990115\r\n"));
    assert!(calendar.contains("RRULE:FREQ=MONTHLY\r\n"));
    let exported = std::fs::read_to_string(&json).unwrap();
    assert!(exported.contains("\"nextRenewal\": \"2099-01-15\""));
}

#[test]
fn rejected_import_keeps_existing_records() {
    let base = common::temp_base();
    let bad = base.join("bad.json");
    std::fs::write(&bad, "{\"oops\": true}").unwrap();
    let input = format!(
        "add Gym 30 monthly Health\nimport-json {}\nlist\nexit\n",
        bad.display()
    );

    cli(&base)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Import rejected"))
        .stdout(contains("Gym"));
}

#[test]
fn unknown_commands_get_suggestions() {
    let base = common::temp_base();
    cli(&base)
        .write_stdin("lst\nexit\n")
        .assert()
        .success()
        .stdout(contains("Unknown command `lst`").and(contains("Suggestion: `list`?")));
}

#[test]
fn currency_setting_persists_between_runs() {
    let base = common::temp_base();
    cli(&base).write_stdin("currency CHF\nexit\n").assert().success();
    cli(&base)
        .write_stdin("add Gym 30 monthly Health\ntotal\nexit\n")
        .assert()
        .success()
        .stdout(contains("Monthly total: CHF30.00"));
}

#[test]
fn version_prints_package_version() {
    let base = common::temp_base();
    cli(&base)
        .write_stdin("version\n")
        .assert()
        .success()
        .stdout(contains(env!("CARGO_PKG_VERSION")));
}
