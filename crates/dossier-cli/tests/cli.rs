use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

/// Helper to build a `dossier` command isolated from user config and env
fn dossier(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("dossier").unwrap();
    cmd.current_dir(workdir)
        .env_remove("HIBP_API_KEY")
        .env_remove("DOSSIER_OUTPUT_DIR")
        .env_remove("RUST_LOG")
        .env("DOSSIER_DELAY_MS", "0")
        .arg("--config")
        .arg(workdir.join("absent.toml"))
        .arg("--output-dir")
        .arg(workdir.join("reports"));
    cmd
}

fn read_report(dir: &Path, base: &str) -> serde_json::Value {
    let path = dir.join("reports").join(format!("{base}.json"));
    let text = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&text).unwrap()
}

#[test]
fn test_missing_consent_fails() {
    let dir = TempDir::new().unwrap();
    dossier(dir.path())
        .args(["--domain", "example.org"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("consent required"));

    assert!(!dir.path().join("reports").exists());
}

#[test]
fn test_missing_identifier_fails() {
    let dir = TempDir::new().unwrap();
    dossier(dir.path())
        .args(["--consent", "--name", ""])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "at least one of --name, --email, --username, --phone, --domain",
        ));
}

#[test]
fn test_list_modules() {
    let dir = TempDir::new().unwrap();
    dossier(dir.path())
        .arg("--list-modules")
        .assert()
        .success()
        .stdout(predicate::eq(
            "haveibeenpwned\nusername_check\ndomain_info\nexternal_cli\nsherlock\n",
        ));
}

#[test]
fn test_unknown_module_is_reported() {
    let dir = TempDir::new().unwrap();
    dossier(dir.path())
        .args(["--consent", "--name", "Jane Doe", "--modules", "nope,haveibeenpwned"])
        .args(["--out", "case.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[*] Running modules: nope, haveibeenpwned"))
        .stdout(predicate::str::contains("case.json"))
        .stdout(predicate::str::contains("use this only with permission"));

    let report = read_report(dir.path(), "case");
    assert_eq!(report["modules"]["nope"]["error"], "module not registered");
    assert_eq!(
        report["modules"]["haveibeenpwned"]["note"],
        "No email provided; skipping HIBP."
    );
    assert_eq!(report["inputs"]["name"], "Jane Doe");
    assert!(!dir.path().join("reports").join("case.html").exists());
}

#[test]
fn test_api_key_never_written() {
    let dir = TempDir::new().unwrap();
    dossier(dir.path())
        .args(["--consent", "--email", "user@example.org", "--modules", "username_check"])
        .args(["--hibp-key", "very-secret-key", "--out", "keyed", "--html"])
        .assert()
        .success();

    for file in ["keyed.json", "keyed.html"] {
        let text = std::fs::read_to_string(dir.path().join("reports").join(file)).unwrap();
        assert!(!text.contains("very-secret-key"), "{file} leaked the key");
    }
}

#[cfg(unix)]
#[test]
fn test_external_command_output_is_parsed() {
    let dir = TempDir::new().unwrap();
    dossier(dir.path())
        .args(["--consent", "--domain", "example.org", "--modules", "external_cli"])
        .args(["--external-cmd", "echo contact@example.org {domain}"])
        .args(["--out", "ext"])
        .assert()
        .success();

    let report = read_report(dir.path(), "ext");
    let external = &report["modules"]["external_cli"];
    assert_eq!(external["executed"]["returncode"], 0);
    assert_eq!(external["parsed"]["emails"][0], "contact@example.org");
    assert_eq!(external["parsed"]["hosts"][0], "example.org");
}

#[test]
fn test_out_must_be_a_file_name() {
    let dir = TempDir::new().unwrap();
    dossier(dir.path())
        .args(["--consent", "--name", "Jane Doe", "--modules", "haveibeenpwned"])
        .args(["--out", "../escaped"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid report name"));

    assert!(!dir.path().join("escaped.json").exists());
}

#[cfg(unix)]
#[test]
fn test_unwritable_json_report_fails() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let reports = dir.path().join("reports");
    std::fs::create_dir(&reports).unwrap();
    std::fs::set_permissions(&reports, std::fs::Permissions::from_mode(0o500)).unwrap();
    // Permission bits do not bind root.
    let writable = tempfile::NamedTempFile::new_in(&reports).is_ok();

    let assert = dossier(dir.path())
        .args(["--consent", "--name", "Jane Doe", "--modules", "haveibeenpwned"])
        .args(["--out", "case"])
        .assert();
    std::fs::set_permissions(&reports, std::fs::Permissions::from_mode(0o700)).unwrap();

    if writable {
        assert.success();
    } else {
        assert
            .code(1)
            .stderr(predicate::str::contains("JSON report was not written"));
    }
}
