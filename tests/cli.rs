use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cashflow(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("cashflow").unwrap();
    cmd.env("CASHFLOW_CONFIG_DIR", config_dir.path())
        .env_remove("CASHFLOW_LOG");
    cmd
}

fn write_script(dir: &TempDir, body: &str) -> std::path::PathBuf {
    let path = dir.path().join("budget.cf");
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn run_script_reports_scenario() {
    let dir = TempDir::new().unwrap();
    let script = write_script(
        &dir,
        "# monthly plan\n\
         start 5000\n\
         add Income Rent 1500 --group expense\n\
         add Income Save 500 --group savings --apr 3 --balance 1000\n\
         show\n\
         warnings\n",
    );

    cashflow(&dir)
        .arg("run")
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("Planned Income:       $5,000"))
        .stdout(predicate::str::contains("Surplus:              $3,000"))
        .stdout(predicate::str::contains("Unallocated Surplus"))
        .stdout(predicate::str::contains("No over-allocations."));
}

#[test]
fn run_script_flags_overall_budget() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "start 1000\nadd Income Rent 1200 --group expense\n");

    cashflow(&dir)
        .arg("run")
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Warning: Over-allocation detected in: Overall budget",
        ));
}

#[test]
fn run_script_stops_at_first_error() {
    let dir = TempDir::new().unwrap();
    let script = write_script(
        &dir,
        "start 1000\nadd Income Rent 100\nadd Income Rent 100\nadd Income Gym 50\n",
    );

    cashflow(&dir)
        .arg("run")
        .arg(&script)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Error on line 3: Node already exists: Rent",
        ))
        .stdout(predicate::str::contains("Added Gym").not());
}

#[test]
fn run_script_continue_on_error() {
    let dir = TempDir::new().unwrap();
    let script = write_script(
        &dir,
        "start 1000\nadd Income Rent 100\nadd Income Rent 100\nadd Income Gym 50\nnodes\n",
    );

    cashflow(&dir)
        .arg("run")
        .arg(&script)
        .arg("--continue-on-error")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error on line 3"))
        .stdout(predicate::str::contains("Cashflow Nodes:\n  Gym\n  Income\n  Rent\n"));
}

#[test]
fn shell_reads_commands_from_stdin() {
    let dir = TempDir::new().unwrap();

    cashflow(&dir)
        .arg("shell")
        .write_stdin("start 3000\nadd Income Bills 300\nadd Bills Power 100 -g expense\ntree\nbogus\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Income ($3,000 planned, $300 allocated)"))
        .stdout(predicate::str::contains("└── Bills $300 [intermediate]"))
        .stderr(predicate::str::contains("Error: Validation error"));
}

#[test]
fn shell_is_the_default_command() {
    let dir = TempDir::new().unwrap();

    cashflow(&dir)
        .write_stdin("start 100\nnodes\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cashflow Nodes:\n  Income\n"));
}

#[test]
fn export_json_writes_payload() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("viz.json");
    let script = write_script(
        &dir,
        &format!(
            "start 2000\nadd Income Save 100 --group savings --balance 50\nexport json \"{}\" --months 12\n",
            out.display()
        ),
    );

    cashflow(&dir).arg("run").arg(&script).assert().success();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(value["schema_version"], "1.0.0");
    assert_eq!(value["visualization"]["projection"]["months"], 12);
    assert_eq!(value["visualization"]["projection"]["total"][12], 125_000);
}

#[test]
fn settings_change_symbol_and_projection() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.json"),
        r#"{"currency_symbol": "€", "default_projection_months": 6}"#,
    )
    .unwrap();

    cashflow(&dir)
        .write_stdin("start 100\nadd Income Save 10 -g savings\nshow\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Planned Income:       €100"))
        .stdout(predicate::str::contains("Savings Projection (6 months)"));
}

#[test]
fn invalid_settings_are_rejected() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.json"),
        r#"{"default_projection_months": 500}"#,
    )
    .unwrap();

    cashflow(&dir)
        .arg("config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("default_projection_months"));
}

#[test]
fn config_prints_paths() {
    let dir = TempDir::new().unwrap();

    cashflow(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Config directory:"))
        .stdout(predicate::str::contains("Default export format:     json"));
}

#[test]
fn config_save_writes_settings_file() {
    let dir = TempDir::new().unwrap();
    let config_dir = dir.path().join("nested");

    cashflow(&dir)
        .arg("--config-dir")
        .arg(&config_dir)
        .args(["config", "--save"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Settings written to"));

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(config_dir.join("config.json")).unwrap())
            .unwrap();
    assert_eq!(written["currency_symbol"], "$");
    assert_eq!(written["default_export_format"], "json");
}
