use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn vitae(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("vitae").unwrap();
    cmd.current_dir(dir.path())
        .env("VITAE_CONFIG", dir.path().join("vitae.yaml"))
        .env_remove("TOKEN");
    cmd
}

fn write_config(dir: &TempDir, login: &str) {
    let yaml = format!(
        r#"
profile:
  name: Jane Doe
  birth_date: 1990-04-12
  location: Berlin, Germany
employment:
  employer: ACME GmbH
  role: Systems Engineer
  since: 2018-09-01
development:
  os: Debian
  editor: Helix
  shell: zsh
  coding_since: 2010-06-01
authentication:
  login: "{login}"
  repository: janedoe
"#
    );
    std::fs::write(dir.path().join("vitae.yaml"), yaml).unwrap();
}

// ---------------------------------------------------------------------------
// vitae chunks
// ---------------------------------------------------------------------------

#[test]
fn chunks_starts_at_requested_month() {
    let dir = TempDir::new().unwrap();
    vitae(&dir)
        .args(["chunks", "--granularity", "month", "--from", "2024-02"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-02-01T00:00:00Z"));
}

#[test]
fn chunks_yearly_starts_january_first() {
    let dir = TempDir::new().unwrap();
    vitae(&dir)
        .args(["chunks", "--granularity", "year", "--from", "2023-07"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2023-01-01T00:00:00Z"));
}

#[test]
fn chunks_future_start_is_empty() {
    let dir = TempDir::new().unwrap();
    vitae(&dir)
        .args(["chunks", "--from", "3000-01", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
}

#[test]
fn chunks_falls_back_to_config_start() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, "janedoe");
    vitae(&dir)
        .args(["chunks", "--granularity", "year"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2010-01-01T00:00:00Z"));
}

#[test]
fn chunks_rejects_unknown_granularity() {
    let dir = TempDir::new().unwrap();
    vitae(&dir)
        .args(["chunks", "--granularity", "week", "--from", "2024-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown granularity"));
}

#[test]
fn chunks_rejects_bad_from() {
    let dir = TempDir::new().unwrap();
    vitae(&dir)
        .args(["chunks", "--from", "2024-13"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid month"));
}

// ---------------------------------------------------------------------------
// vitae config
// ---------------------------------------------------------------------------

#[test]
fn config_validate_ok() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, "janedoe");
    vitae(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config ok"));
}

#[test]
fn config_validate_fails_on_empty_login() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, "");
    vitae(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("login is empty"))
        .stderr(predicate::str::contains("configuration has errors"));
}

#[test]
fn config_validate_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    vitae(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn config_show_roundtrips_sections() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, "janedoe");
    vitae(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("employer: ACME GmbH"));
}

// ---------------------------------------------------------------------------
// vitae run
// ---------------------------------------------------------------------------

#[test]
fn run_without_token_fails_before_any_call() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, "janedoe");
    std::fs::write(dir.path().join("profile.tmpl"), "uptime: {{age}}\n").unwrap();
    vitae(&dir)
        .args(["run", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("TOKEN"));
}

#[test]
fn run_missing_template_fails() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, "janedoe");
    vitae(&dir)
        .args(["run", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("template"));
}

#[test]
fn help_names_the_pipeline() {
    let dir = TempDir::new().unwrap();
    vitae(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("aggregate"));
}
