use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn bin() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("saltpeter"))
}

/// Hash "pw" under `key` with a fast iteration range, returning (salt, hash).
fn hash_credential(key: &str) -> (String, String) {
    let output = bin()
        .env("SALTPETER_PASSWORD", "pw")
        .env("SALTPETER_KEY", key)
        .arg("--min-iterations")
        .arg("100")
        .arg("--max-iterations")
        .arg("200")
        .arg("hash")
        .output()
        .unwrap();
    assert!(output.status.success());

    let credential: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    (
        credential["salt"].as_str().unwrap().to_string(),
        credential["hash"].as_str().unwrap().to_string(),
    )
}

#[test]
fn hash_prints_credential_json() {
    let (salt, hash) = hash_credential("test key");

    assert!(!salt.is_empty());
    assert!(hash.len() >= 128);
}

#[test]
fn hash_verify_roundtrip() {
    let (salt, hash) = hash_credential("test key");

    bin()
        .env("SALTPETER_PASSWORD", "pw")
        .env("SALTPETER_KEY", "test key")
        .arg("verify")
        .arg(&salt)
        .arg(&hash)
        .assert()
        .success()
        .stdout(predicate::str::contains("password verified"));
}

#[test]
fn verify_rejects_wrong_password() {
    let (salt, hash) = hash_credential("test key");

    bin()
        .env("SALTPETER_PASSWORD", "wrong_pw")
        .env("SALTPETER_KEY", "test key")
        .arg("verify")
        .arg(&salt)
        .arg(&hash)
        .assert()
        .failure()
        .stderr(predicate::str::contains("password mismatch"));
}

#[test]
fn verify_with_wrong_key_fails() {
    let (salt, hash) = hash_credential("test key");

    bin()
        .env("SALTPETER_PASSWORD", "pw")
        .env("SALTPETER_KEY", "another key")
        .arg("verify")
        .arg(&salt)
        .arg(&hash)
        .assert()
        .failure()
        .stderr(predicate::str::contains("decryption failed"));
}

#[test]
fn inspect_shows_iterations_in_the_configured_range() {
    let output = bin()
        .env("SALTPETER_PASSWORD", "pw")
        .env("SALTPETER_KEY", "test key")
        .arg("--min-iterations")
        .arg("500")
        .arg("--max-iterations")
        .arg("600")
        .arg("hash")
        .output()
        .unwrap();
    assert!(output.status.success());
    let credential: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let salt = credential["salt"].as_str().unwrap();

    let output = bin()
        .env("SALTPETER_KEY", "test key")
        .arg("inspect")
        .arg(salt)
        .output()
        .unwrap();
    assert!(output.status.success());

    let iterations: u32 = String::from_utf8_lossy(&output.stdout).trim().parse().unwrap();
    assert!((500..=600).contains(&iterations));
}

#[test]
fn inspect_rejects_garbage_salt() {
    bin()
        .env("SALTPETER_KEY", "test key")
        .arg("inspect")
        .arg("%%% not a salt %%%")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not valid base64"));
}

#[test]
fn missing_key_fails() {
    bin()
        .env("SALTPETER_PASSWORD", "pw")
        .env_remove("SALTPETER_KEY")
        .arg("hash")
        .assert()
        .failure()
        .stderr(predicate::str::contains("encryption key is required"));
}

#[test]
fn missing_password_fails() {
    bin()
        .env("SALTPETER_KEY", "test key")
        .env_remove("SALTPETER_PASSWORD")
        .write_stdin("")
        .arg("hash")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No password provided"));
}

#[test]
fn password_can_come_from_stdin() {
    bin()
        .env("SALTPETER_KEY", "test key")
        .env_remove("SALTPETER_PASSWORD")
        .write_stdin("pw\n")
        .arg("--min-iterations")
        .arg("100")
        .arg("--max-iterations")
        .arg("200")
        .arg("hash")
        .assert()
        .success()
        .stdout(predicate::str::contains("salt"));
}

#[test]
fn dotenv_file_supplies_the_key() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join(".env"), "SALTPETER_KEY=\"from dotenv\"\n").unwrap();

    let output = bin()
        .current_dir(dir.path())
        .env("SALTPETER_PASSWORD", "pw")
        .env_remove("SALTPETER_KEY")
        .arg("--min-iterations")
        .arg("100")
        .arg("--max-iterations")
        .arg("200")
        .arg("hash")
        .output()
        .unwrap();
    assert!(output.status.success());
    let credential: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    // same key passed explicitly opens the salt again
    bin()
        .env("SALTPETER_PASSWORD", "pw")
        .env_remove("SALTPETER_KEY")
        .arg("--key")
        .arg("from dotenv")
        .arg("verify")
        .arg(credential["salt"].as_str().unwrap())
        .arg(credential["hash"].as_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("password verified"));
}

#[test]
fn inverted_iteration_range_fails() {
    bin()
        .env("SALTPETER_PASSWORD", "pw")
        .env("SALTPETER_KEY", "test key")
        .arg("--min-iterations")
        .arg("100")
        .arg("--max-iterations")
        .arg("50")
        .arg("hash")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid min and max values"));
}

#[test]
fn unknown_digest_is_rejected() {
    bin()
        .env("SALTPETER_PASSWORD", "pw")
        .env("SALTPETER_KEY", "test key")
        .arg("--digest")
        .arg("sha1")
        .arg("hash")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized digest"));
}
