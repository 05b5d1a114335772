use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::{NamedTempFile, TempDir};

const SHA512_ABC: &str = "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f";

// Every command runs against an isolated config directory
fn hashkit(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("hashkit").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("HASHKIT_ENGINE__CHUNK_SIZE")
        .env_remove("HASHKIT_OUTPUT__DEFAULT_FORMAT");
    cmd
}

fn abc_file() -> NamedTempFile {
    let temp_file = NamedTempFile::new().unwrap();
    fs::write(temp_file.path(), b"abc").unwrap();
    temp_file
}

#[test]
fn test_version() {
    let home = TempDir::new().unwrap();
    hashkit(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_hash_single_algorithm() {
    let home = TempDir::new().unwrap();
    let file = abc_file();

    hashkit(&home)
        .arg("hash")
        .arg(file.path())
        .args(["--algorithm", "sha512"])
        .assert()
        .success()
        .stdout(format!("sha512: {SHA512_ABC}\n"));
}

#[test]
fn test_hash_full_bank_lists_every_algorithm() {
    let home = TempDir::new().unwrap();
    let file = abc_file();

    let assert = hashkit(&home).arg("hash").arg(file.path()).assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let ids: Vec<_> = stdout
        .lines()
        .map(|line| line.split(':').next().unwrap())
        .collect();
    assert_eq!(ids.len(), 18);
    assert_eq!(ids[0], "sha512");
    assert_eq!(ids[8], "md6");
    assert_eq!(ids[17], "whirlpoolT");
}

#[test]
fn test_hash_stdin() {
    let home = TempDir::new().unwrap();
    hashkit(&home)
        .args(["hash", "-", "-a", "sha512"])
        .write_stdin("abc")
        .assert()
        .success()
        .stdout(predicate::str::contains(SHA512_ABC));
}

#[test]
fn test_hash_json_format() {
    let home = TempDir::new().unwrap();
    let file = abc_file();

    let assert = hashkit(&home)
        .arg("hash")
        .arg(file.path())
        .args(["-a", "sha512", "-a", "lsh", "--format", "json"])
        .assert()
        .success();
    let json: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(json["size"], 3);
    assert_eq!(json["digests"]["sha512"], SHA512_ABC);
    assert!(json["digests"]["lsh"].is_string());
}

#[test]
fn test_hash_directory_csv() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("one.bin"), b"1").unwrap();
    fs::write(dir.path().join("two.bin"), b"2").unwrap();

    hashkit(&home)
        .arg("hash")
        .arg(dir.path())
        .args(["-a", "fnv1a", "-f", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("source,size,algorithm,digest"))
        .stdout(predicate::str::contains("one.bin,1,fnv1a,"))
        .stdout(predicate::str::contains("two.bin,1,fnv1a,"));
}

#[test]
fn test_hash_unknown_algorithm_fails() {
    let home = TempDir::new().unwrap();
    let file = abc_file();

    hashkit(&home)
        .arg("hash")
        .arg(file.path())
        .args(["-a", "md5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("md5"));
}

#[test]
fn test_hash_missing_path_fails() {
    let home = TempDir::new().unwrap();
    hashkit(&home)
        .args(["hash", "/nonexistent/hashkit/input"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Path not found"));
}

#[test]
fn test_check_reports_matching_algorithm() {
    let home = TempDir::new().unwrap();
    let file = abc_file();

    hashkit(&home)
        .arg("check")
        .arg(file.path())
        .args(["--target", SHA512_ABC])
        .assert()
        .success()
        .stdout("match: sha512 (code 1)\n");
}

#[test]
fn test_check_default_target_does_not_match() {
    let home = TempDir::new().unwrap();
    let file = abc_file();

    hashkit(&home)
        .arg("check")
        .arg(file.path())
        .assert()
        .code(1)
        .stdout("no match\n");
}

#[test]
fn test_check_rejects_bad_target() {
    let home = TempDir::new().unwrap();
    let file = abc_file();

    hashkit(&home)
        .arg("check")
        .arg(file.path())
        .args(["-t", "not-hex"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid target digest"));
}

#[test]
fn test_algorithms_lists_bank_in_order() {
    let home = TempDir::new().unwrap();
    let assert = hashkit(&home).arg("algorithms").assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();

    assert_eq!(stdout.lines().count(), 18);
    assert!(stdout.lines().next().unwrap().contains("sha512"));
    assert!(stdout.lines().all(|line| line.ends_with("512 bits")));
}

#[test]
fn test_completions() {
    let home = TempDir::new().unwrap();
    hashkit(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hashkit"));
}
