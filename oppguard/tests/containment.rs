//! Integration tests for storage-root containment and content gates.
//!
//! These build a fake device storage tree in a temporary directory and run
//! the validator against real files, directories and symlinks.

mod common;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use common::StorageFixture;
use oppguard::config::{Config, ConfigBuilder};
use oppguard::{
    ContainmentValidator, ContentGate, ContentPolicy, CountingReporter, DiagnosticSite,
    LegacyAlias, StoragePolicy,
};

fn validator(policy: StoragePolicy) -> (ContainmentValidator, Arc<CountingReporter>) {
    let reporter = Arc::new(CountingReporter::new());
    (ContainmentValidator::new(policy, reporter.clone()), reporter)
}

#[test]
fn test_received_file_inside_user_root() {
    let fx = StorageFixture::new();
    let file = fx.file("storage/emulated/0/Download/received.bin", b"data");
    let (validator, reporter) = validator(StoragePolicy::new([fx.user_root()]));

    assert!(validator.is_path_contained(&file));
    assert!(validator.is_path_contained(&fx.user_root()));
    assert_eq!(reporter.total(), 0);
}

#[test]
fn test_other_user_and_prefix_sibling_rejected() {
    let fx = StorageFixture::new();
    let other = fx.file("storage/emulated/01/secret.bin", b"x");
    let (validator, _) = validator(StoragePolicy::new([fx.user_root()]));

    assert!(!validator.is_path_contained(&other));
    assert!(!validator.is_path_contained(&fx.base().join("storage/emulated")));
}

#[test]
fn test_traversal_through_dot_dot_rejected() {
    let fx = StorageFixture::new();
    fx.file("data/system/accounts.db", b"x");
    let (validator, _) = validator(StoragePolicy::new([fx.user_root()]));

    let sneaky = fx
        .user_root()
        .join("Download/../../../../data/system/accounts.db");
    assert!(!validator.is_path_contained(&sneaky));
}

#[cfg(unix)]
#[test]
fn test_symlink_planted_in_root_does_not_escape() {
    use std::os::unix::fs::symlink;

    let fx = StorageFixture::new();
    let private = fx.mkdir("data/data/com.android.bluetooth");
    let planted = fx.user_root().join("Download/innocent");
    std::fs::create_dir_all(planted.parent().unwrap()).unwrap();
    symlink(&private, &planted).unwrap();
    let (validator, _) = validator(StoragePolicy::new([fx.user_root()]));

    assert!(!validator.is_path_contained(&planted.join("databases/btopp.db")));
}

#[test]
fn test_sdcard_alias_under_emulated_storage() {
    let fx = StorageFixture::new();
    let sdcard = fx.base().join("sdcard");
    let policy = StoragePolicy::new([fx.user_root()])
        .with_alias(LegacyAlias::new(&sdcard, fx.user_root()));
    let (validator, _) = validator(policy);

    assert!(validator.is_path_contained(&sdcard.join("Download/file.bin")));
}

#[cfg(unix)]
#[test]
fn test_symlink_inside_physical_sdcard_does_not_escape() {
    use std::os::unix::fs::symlink;

    let fx = StorageFixture::new();
    let sdcard = fx.mkdir("sdcard");
    let private = fx.mkdir("data/misc/bluetooth");
    fx.file("data/misc/bluetooth/keys.db", b"x");
    symlink(&private, sdcard.join("bt")).unwrap();
    let policy = StoragePolicy::new([fx.user_root()])
        .with_alias(LegacyAlias::new(&sdcard, fx.user_root()));
    let (validator, _) = validator(policy);

    assert!(!validator.is_path_contained(&sdcard.join("bt/keys.db")));
    assert!(validator.is_path_contained(&sdcard.join("Bluetooth/photo.jpg")));
}

#[cfg(unix)]
#[test]
fn test_sdcard_symlink_resolves_without_alias() {
    use std::os::unix::fs::symlink;

    let fx = StorageFixture::new();
    let sdcard = fx.base().join("sdcard");
    symlink(fx.user_root(), &sdcard).unwrap();
    let (validator, _) = validator(StoragePolicy::new([fx.user_root()]));

    assert!(validator.is_path_contained(&sdcard.join("Download/file.bin")));
}

#[cfg(unix)]
#[test]
fn test_device_layout_literal_paths() {
    // Neither /sdcard nor /storage exists on the test host, so both sides
    // resolve through `/` and the alias rewrite decides the outcome.
    if Path::new("/sdcard").exists() || Path::new("/storage").exists() {
        return;
    }
    let policy = StoragePolicy::new(["/storage/emulated/0"])
        .with_alias(LegacyAlias::new("/sdcard", "/storage/emulated/0"));
    let (validator, _) = validator(policy);

    assert!(validator.is_contained("/sdcard/Download/file.bin"));
    assert!(validator.is_contained("file:///sdcard/Download/file.bin"));
    assert!(!validator.is_contained("/sdcardx/Download/file.bin"));
    assert!(!validator.is_contained("/data/misc/bluetooth/a.bin"));
}

#[test]
fn test_non_file_references_rejected_and_counted() {
    let fx = StorageFixture::new();
    let (validator, reporter) = validator(StoragePolicy::new([fx.user_root()]));

    for reference in [
        "content://com.android.bluetooth.opp/btopp/1",
        "http://example.com/file.bin",
        "file://remote-host/storage/emulated/0/a.bin",
    ] {
        assert!(!validator.is_contained(reference), "{reference}");
    }
    assert_eq!(reporter.count(DiagnosticSite::NotLocalFile), 3);
}

#[test]
fn test_validator_from_built_config() {
    let fx = StorageFixture::new();
    let config = ConfigBuilder::new()
        .skip_files()
        .skip_env()
        .with_config(Config {
            trusted_roots: Some(vec![fx.user_root()]),
            emulated_storage: Some(true),
            legacy_aliases: Some(vec![LegacyAlias::new(fx.base().join("sdcard"), fx.user_root())]),
            ..Default::default()
        })
        .build()
        .unwrap();
    let (validator, _) = validator(StoragePolicy::from(&config));

    assert!(validator.is_path_contained(&fx.base().join("sdcard/Bluetooth/a.jpg")));
    assert!(!validator.is_path_contained(&fx.base().join("elsewhere/a.jpg")));
}

#[test]
fn test_gates_combine_for_outbound_reference() {
    let fx = StorageFixture::new();
    let (validator, _) = validator(StoragePolicy::new([fx.user_root()]));
    let gate = ContentGate::new(ContentPolicy::default(), Arc::new(CountingReporter::new()));

    let mms = "content://com.android.bluetooth.map.MmsFileProvider/part/3";
    assert!(gate.is_forbidden_content(mms));
    assert!(!validator.is_contained(mms));

    let local: PathBuf = fx.file("storage/emulated/0/DCIM/a.jpg", b"jpg");
    let local = local.to_string_lossy().into_owned();
    assert!(!gate.is_forbidden_content(&local));
    assert!(validator.is_contained(&local));
}
