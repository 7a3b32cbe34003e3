//! Integration tests for the oppguard commands.

mod common;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_help_lists_commands() {
    let env = TestEnv::new();
    env.command_bare()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check-path"))
        .stdout(predicate::str::contains("check-content"))
        .stdout(predicate::str::contains("show-config"));
}

#[test]
fn test_check_path_allows_file_in_root() {
    let env = TestEnv::new();
    let config = env.write_root_config();
    let file = env.create_file("storage/emulated/0/Download/photo.jpg", b"jpg");

    env.command()
        .arg("--config")
        .arg(&config)
        .arg("check-path")
        .arg(&file)
        .arg("--show-root")
        .assert()
        .success()
        .stdout(predicate::str::contains("allowed"))
        .stdout(predicate::str::contains(
            env.user_root().canonicalize().unwrap().to_string_lossy().into_owned(),
        ));
}

#[test]
fn test_check_path_denies_file_outside_root() {
    let env = TestEnv::new();
    let config = env.write_root_config();
    let file = env.create_file("data/system/accounts.db", b"x");

    env.command()
        .arg("--config")
        .arg(&config)
        .arg("check-path")
        .arg(&file)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("denied: outside every trusted root"));
}

#[test]
fn test_check_path_denies_traversal() {
    let env = TestEnv::new();
    let config = env.write_root_config();
    env.create_file("data/system/accounts.db", b"x");
    let sneaky = env.user_root().join("../../../data/system/accounts.db");

    env.command()
        .arg("--config")
        .arg(&config)
        .arg("check-path")
        .arg(&sneaky)
        .assert()
        .code(1);
}

#[test]
fn test_check_path_file_uri() {
    let env = TestEnv::new();
    let config = env.write_root_config();
    let file = env.create_file("storage/emulated/0/Bluetooth/a.txt", b"a");
    let uri = format!("file://{}", file.display());

    env.command()
        .arg("--config")
        .arg(&config)
        .arg("check-path")
        .arg(uri)
        .assert()
        .success()
        .stdout(predicate::str::contains("allowed"));
}

#[test]
fn test_check_path_rejects_remote_scheme() {
    let env = TestEnv::new();
    let config = env.write_root_config();

    env.command()
        .arg("--config")
        .arg(&config)
        .arg("check-path")
        .arg("http://example.com/a.bin")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("denied: not a local file"))
        .stderr(predicate::str::contains("[log-error #7] http://example.com/a.bin"));
}

#[test]
fn test_check_path_rejects_forbidden_provider() {
    let env = TestEnv::new();
    let config = env.write_root_config();

    env.command()
        .arg("--config")
        .arg(&config)
        .arg("check-path")
        .arg("content://com.android.bluetooth.map.MmsFileProvider/part/1")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("forbidden content provider"));
}

#[test]
fn test_check_content_reports_both_gates() {
    let env = TestEnv::new();

    env.command()
        .arg("check-content")
        .arg("content://com.android.bluetooth.opp/btopp/3")
        .assert()
        .success()
        .stdout(predicate::str::contains("forbidden: no"))
        .stdout(predicate::str::contains("share-uri: yes"));
}

#[test]
fn test_check_content_lookalike_authority_is_not_share_uri() {
    let env = TestEnv::new();

    env.command()
        .arg("check-content")
        .arg("content://com.android.bluetooth.opp.evil/btopp/3")
        .assert()
        .success()
        .stdout(predicate::str::contains("share-uri: no"))
        .stderr(predicate::str::contains("[security #11]"));
}

#[test]
fn test_check_content_forbidden_exits_one() {
    let env = TestEnv::new();

    env.command()
        .arg("check-content")
        .arg("content://com.android.bluetooth.map.MmsFileProvider/part/1")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("forbidden: yes"))
        .stdout(predicate::str::contains("share-uri: no"));
}

#[test]
fn test_check_content_custom_denylist() {
    let env = TestEnv::new();
    let config = env.write_config("forbidden_content_hosts:\n  - evil.provider\n");

    env.command()
        .arg("--config")
        .arg(&config)
        .arg("check-content")
        .arg("content://EVIL.provider/x")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("forbidden: yes"));
}

#[test]
fn test_validate_accepts_good_file() {
    let env = TestEnv::new();
    let config = env.write_config(
        "trusted_roots: [/storage/emulated/0]\nemulated_storage: true\nlegacy_aliases:\n  - legacy_root: /sdcard\n    target: /storage/emulated/0\nclose_timeout_ms: 500\n",
    );

    env.command()
        .arg("validate")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn test_validate_rejects_zero_timeout() {
    let env = TestEnv::new();
    let config = env.write_config("close_timeout_ms: 0\n");

    env.command()
        .arg("validate")
        .arg(&config)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("close_timeout_ms"));
}

#[test]
fn test_show_config_defaults_as_yaml() {
    let env = TestEnv::new();

    env.command()
        .arg("show-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("/storage/emulated/0"))
        .stdout(predicate::str::contains("com.android.bluetooth.map.MmsFileProvider"))
        .stdout(predicate::str::contains("close_timeout_ms: 2000"));
}

#[test]
fn test_show_config_json_reflects_file() {
    let env = TestEnv::new();
    let config = env.write_config("close_timeout_ms: 750\n");

    env.command()
        .arg("--config")
        .arg(&config)
        .arg("show-config")
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"close_timeout_ms\": 750"));
}

#[test]
fn test_show_config_applies_external_storage() {
    let env = TestEnv::new();

    env.command_bare()
        .env("EXTERNAL_STORAGE", "/sdcard")
        .arg("show-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("legacy_root: /sdcard"));
}
