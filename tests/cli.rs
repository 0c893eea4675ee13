use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

fn cmd(bin: &str, dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin(bin).unwrap();
    cmd.current_dir(dir.path());
    cmd
}

#[test]
fn missing_url_prints_usage_and_exits_1() {
    let tmp = TempDir::new().unwrap();

    cmd("webpage2pdf", &tmp)
        .assert()
        .code(1)
        .stderr(contains("Usage"));

    assert!(!tmp.path().join("pdf").exists());
}

#[test]
fn numbered_variant_also_requires_url() {
    let tmp = TempDir::new().unwrap();

    cmd("webpage2pdf_numbered", &tmp)
        .assert()
        .code(1)
        .stderr(contains("<URL>"));

    assert!(!tmp.path().join("pdf").exists());
}

#[test]
fn help_succeeds_without_side_effects() {
    let tmp = TempDir::new().unwrap();

    cmd("webpage2pdf", &tmp)
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("URL of the webpage to render"));

    assert!(!tmp.path().join("pdf").exists());
}
