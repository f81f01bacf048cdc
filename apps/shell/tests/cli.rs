use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::str::contains;
use tempfile::tempdir;

fn cmd() -> Command {
    cargo_bin_cmd!("verity")
}

#[test]
fn geolocation_list_keeps_order() {
    cmd()
        .args(["geolocation", "--zone_ids", "America/Denver,America/Phoenix"])
        .assert()
        .success()
        .stdout(contains("zoneIds=[America/Denver, America/Phoenix]"))
        .stdout(contains("Command line injection"));
}

#[test]
fn geolocation_uncertain_is_null_in_json() {
    cmd()
        .args(["geolocation", "--zone_ids", "UNCERTAIN", "--json"])
        .assert()
        .success()
        .stdout(contains("\"zoneIds\": null"));
}

#[test]
fn geolocation_unknown_option_is_named() {
    cmd()
        .args(["geolocation", "--zone_ids", "EMPTY", "--bogus"])
        .assert()
        .failure()
        .stderr(contains("--bogus"));
}

#[test]
fn geolocation_requires_zone_ids() {
    cmd().arg("geolocation").assert().failure().stderr(contains("--zone_ids"));
}

#[test]
fn geolocation_help_lists_grammar() {
    cmd()
        .args(["geolocation", "--help"])
        .assert()
        .success()
        .stdout(contains("UNCERTAIN|EMPTY|<Olson ID>+"));
}

#[test]
fn request_round_trips_through_inspect() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("request.bin");

    cmd()
        .args(["request", "com.example.web", "com.example.mail", "--out"])
        .arg(&file)
        .assert()
        .success()
        .stdout(contains("2 package(s)"));

    cmd()
        .arg("inspect")
        .arg(&file)
        .args(["--kind", "request"])
        .assert()
        .success()
        .stdout(contains("com.example.mail"))
        .stdout(contains("com.example.web"));
}

#[test]
fn package_state_round_trips_through_inspect() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("package.bin");

    cmd()
        .args(["package", "com.example.mail", "--user", "10"])
        .args(["--host", "example.com", "--host", "mail.example.com"])
        .args(["--verify", "example.com", "--select", "mail.example.com", "--out"])
        .arg(&file)
        .assert()
        .success()
        .stdout(contains("2 host(s), 2 approved"));

    cmd()
        .arg("inspect")
        .arg(&file)
        .args(["--kind", "package"])
        .assert()
        .success()
        .stdout(contains("\"packageName\": \"com.example.mail\""))
        .stdout(contains("\"mail.example.com\": 1"))
        .stdout(contains("\"example.com\": 2"));
}

#[test]
fn inspect_rejects_wrong_kind() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("suggestion.bin");

    cmd()
        .args(["geolocation", "--zone_ids", "EMPTY", "--out"])
        .arg(&file)
        .assert()
        .success();

    cmd()
        .arg("inspect")
        .arg(&file)
        .args(["--kind", "package"])
        .assert()
        .failure()
        .stderr(contains("Failed to inspect"));
}

#[test]
fn missing_config_file_fails() {
    cmd()
        .args(["--config", "/nonexistent/verity.toml", "geolocation", "--zone_ids", "EMPTY"])
        .assert()
        .failure()
        .stderr(contains("Configuration is malformed"));
}
