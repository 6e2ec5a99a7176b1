//! Seal / unseal / verify flows as the binary drives them.

use noctivault_cli::commands::local::{seal_store, unseal_store, verify_store, KeyArgs};
use noctivault_core::Error;
use serial_test::serial;
use std::path::Path;
use tempfile::TempDir;

const STORE: &str = "platform: google\ngcp_project_id: p\nsecret-mocks:\n  - name: x\n    value: \"v\"\n    version: 1\n";

fn write_plain(dir: &Path) {
    std::fs::write(dir.join("noctivault.local-store.yaml"), STORE).unwrap();
}

fn write_key(dir: &Path, name: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, [9u8; 32]).unwrap();
    path
}

fn with_key_file(path: &Path) -> KeyArgs {
    KeyArgs {
        key_file: Some(path.to_path_buf()),
        ..KeyArgs::default()
    }
}

fn with_passphrase(passphrase: &str) -> KeyArgs {
    KeyArgs {
        passphrase: Some(passphrase.to_string()),
        ..KeyArgs::default()
    }
}

#[test]
fn seal_then_unseal_round_trips() {
    let tmp = TempDir::new().unwrap();
    write_plain(tmp.path());
    let key = write_key(tmp.path(), "k.key");

    let out = seal_store(tmp.path(), &with_key_file(&key), None, false, false).unwrap();
    assert_eq!(
        out,
        tmp.path().join("noctivault.local-store.yaml.enc")
    );

    let plaintext = unseal_store(&out, &with_key_file(&key)).unwrap();
    assert_eq!(plaintext, STORE.as_bytes());
}

#[test]
fn seal_accepts_the_store_file_directly() {
    let tmp = TempDir::new().unwrap();
    write_plain(tmp.path());
    let key = write_key(tmp.path(), "k.key");

    let plain = tmp.path().join("noctivault.local-store.yaml");
    seal_store(&plain, &with_key_file(&key), None, false, false).unwrap();
    assert!(tmp.path().join("noctivault.local-store.yaml.enc").is_file());
}

#[test]
fn seal_refuses_unknown_file_names() {
    let tmp = TempDir::new().unwrap();
    let odd = tmp.path().join("secrets.yaml");
    std::fs::write(&odd, STORE).unwrap();
    let key = write_key(tmp.path(), "k.key");

    let err = seal_store(&odd, &with_key_file(&key), None, false, false).unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
}

#[test]
fn seal_refuses_existing_output_without_force() {
    let tmp = TempDir::new().unwrap();
    write_plain(tmp.path());
    let key = write_key(tmp.path(), "k.key");

    seal_store(tmp.path(), &with_key_file(&key), None, false, false).unwrap();
    let err = seal_store(tmp.path(), &with_key_file(&key), None, false, false).unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));

    // --force overwrites
    seal_store(tmp.path(), &with_key_file(&key), None, false, true).unwrap();
}

#[test]
fn seal_rm_plain_removes_the_source() {
    let tmp = TempDir::new().unwrap();
    write_plain(tmp.path());
    let key = write_key(tmp.path(), "k.key");

    seal_store(tmp.path(), &with_key_file(&key), None, true, false).unwrap();
    assert!(!tmp.path().join("noctivault.local-store.yaml").exists());
}

#[test]
fn seal_requires_explicit_key_material() {
    let tmp = TempDir::new().unwrap();
    write_plain(tmp.path());
    let err = seal_store(tmp.path(), &KeyArgs::default(), None, false, false).unwrap_err();
    assert!(matches!(err, Error::MissingKeyMaterial { .. }));
}

#[test]
fn passphrase_seal_round_trips() {
    let tmp = TempDir::new().unwrap();
    write_plain(tmp.path());

    let out = seal_store(tmp.path(), &with_passphrase("pw"), None, false, false).unwrap();
    let plaintext = unseal_store(&out, &with_passphrase("pw")).unwrap();
    assert_eq!(plaintext, STORE.as_bytes());
}

#[test]
#[serial]
fn unseal_falls_back_to_the_sibling_key() {
    let tmp = TempDir::new().unwrap();
    write_plain(tmp.path());
    std::env::remove_var("NOCTIVAULT_LOCAL_KEY_FILE");
    // the sibling chain looks for local.key next to the envelope
    let key = write_key(tmp.path(), "local.key");

    let out = seal_store(tmp.path(), &with_key_file(&key), None, false, false).unwrap();
    let plaintext = unseal_store(&out, &KeyArgs::default()).unwrap();
    assert_eq!(plaintext, STORE.as_bytes());
}

#[test]
fn verify_reports_without_plaintext() {
    let tmp = TempDir::new().unwrap();
    write_plain(tmp.path());
    let key = write_key(tmp.path(), "k.key");
    let out = seal_store(tmp.path(), &with_key_file(&key), None, false, false).unwrap();

    assert!(verify_store(&out, &with_key_file(&key)).unwrap());

    // wrong key: FAIL, not an error
    let wrong = tmp.path().join("wrong.key");
    std::fs::write(&wrong, [1u8; 32]).unwrap();
    assert!(!verify_store(&out, &with_key_file(&wrong)).unwrap());

    // tampered ciphertext: FAIL
    let mut data = std::fs::read(&out).unwrap();
    let last = data.len() - 1;
    data[last] ^= 0xFF;
    let tampered = tmp.path().join("tampered.enc");
    std::fs::write(&tampered, data).unwrap();
    assert!(!verify_store(&tampered, &with_key_file(&key)).unwrap());

    // unreadable envelope stays an error
    let missing = tmp.path().join("missing.enc");
    assert!(matches!(
        verify_store(&missing, &with_key_file(&key)).unwrap_err(),
        Error::FileSystem { .. }
    ));
}
