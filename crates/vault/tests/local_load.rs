//! End-to-end loads against a plaintext local store.

use noctivault::{Error, Noctivault, NoctivaultSettings, TypedValue};
use std::path::Path;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

const STORE: &str = r#"
platform: google
gcp_project_id: p
secret-mocks:
  - name: db-password
    value: "a"
    version: 1
  - name: db-password
    value: "b"
    version: 2
  - name: db-port
    value: "5432"
    version: 1
"#;

async fn load(dir: &Path) -> noctivault::Result<Noctivault> {
    let mut vault = Noctivault::new(NoctivaultSettings::local());
    vault.load(dir).await?;
    Ok(vault)
}

#[tokio::test]
async fn latest_version_wins() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "noctivault.local-store.yaml", STORE);
    write(
        tmp.path(),
        "noctivault.yaml",
        r#"
platform: google
project_id: p
secret-refs:
  - cast: password
    ref: db-password
    version: latest
"#,
    );

    let vault = load(tmp.path()).await.unwrap();
    assert_eq!(
        vault.secrets().unwrap().value_at("password").unwrap().get(),
        "b"
    );
}

#[tokio::test]
async fn pinned_version_and_int_cast() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "noctivault.local-store.yaml", STORE);
    write(
        tmp.path(),
        "noctivault.yaml",
        r#"
platform: google
project_id: p
secret-refs:
  - key: database
    children:
      - cast: port
        ref: db-port
        version: 1
        type: int
      - cast: password
        ref: db-password
        version: 1
"#,
    );

    let vault = load(tmp.path()).await.unwrap();
    assert_eq!(vault.get("database.port").unwrap(), TypedValue::Int(5432));
    assert_eq!(
        vault.get("database.password").unwrap(),
        TypedValue::Str("a".to_string())
    );
}

#[tokio::test]
async fn masking_holds_everywhere_and_reveal_is_explicit() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "noctivault.local-store.yaml", STORE);
    write(
        tmp.path(),
        "noctivault.yaml",
        r#"
platform: google
project_id: p
secret-refs:
  - cast: password
    ref: db-password
"#,
    );

    let vault = load(tmp.path()).await.unwrap();
    let secrets = vault.secrets().unwrap();
    let leaf = secrets.value_at("password").unwrap();

    assert_eq!(leaf.to_string(), "***");
    assert_eq!(format!("{leaf:?}"), "***");
    assert!(!secrets.to_string().contains('b'));
    assert_eq!(leaf.get(), "b");

    let masked = secrets.to_value(false).unwrap();
    assert_eq!(masked["password"], "***");
    let revealed = secrets.to_value(true).unwrap();
    assert_eq!(revealed["password"], "b");
}

#[tokio::test]
async fn display_hash_is_sha3_of_raw_independent_of_type() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "noctivault.local-store.yaml",
        r#"
platform: google
gcp_project_id: p
secret-mocks:
  - name: s
    value: "s3cr3t"
    version: 1
"#,
    );
    write(
        tmp.path(),
        "noctivault.yaml",
        r#"
platform: google
project_id: p
secret-refs:
  - cast: as_str
    ref: s
"#,
    );

    let vault = load(tmp.path()).await.unwrap();
    // sha3-256("s3cr3t")
    assert_eq!(
        vault.display_hash("as_str").unwrap(),
        "db0e5f20592727926bafcd6e4359fe8d9c556096503543876ab0fed84a8da4b8"
    );
}

#[tokio::test]
async fn duplicate_paths_fail_the_load() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "noctivault.local-store.yaml", STORE);
    write(
        tmp.path(),
        "noctivault.yaml",
        r#"
platform: google
project_id: p
secret-refs:
  - key: database
    children:
      - cast: password
        ref: db-password
        version: 1
  - key: database
    children:
      - cast: password
        ref: db-password
        version: 2
"#,
    );

    let mut vault = Noctivault::new(NoctivaultSettings::local());
    let err = vault.load(tmp.path()).await.unwrap_err();
    assert!(matches!(err, Error::DuplicatePath { .. }));
    // nothing is observable after a failed load
    assert!(vault.secrets().is_err());
}

#[tokio::test]
async fn missing_mock_fails_the_load() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "noctivault.local-store.yaml", STORE);
    write(
        tmp.path(),
        "noctivault.yaml",
        r#"
platform: google
project_id: p
secret-refs:
  - cast: nope
    ref: does-not-exist
"#,
    );

    let mut vault = Noctivault::new(NoctivaultSettings::local());
    let err = vault.load(tmp.path()).await.unwrap_err();
    assert!(matches!(err, Error::MissingLocalMock { .. }));
}

#[tokio::test]
async fn unknown_lookup_path_is_not_found() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "noctivault.local-store.yaml", STORE);
    write(
        tmp.path(),
        "noctivault.yaml",
        "platform: google\nproject_id: p\nsecret-refs:\n  - cast: password\n    ref: db-password\n",
    );

    let vault = load(tmp.path()).await.unwrap();
    assert!(matches!(
        vault.get("no.such.path").unwrap_err(),
        Error::PathNotFound { .. }
    ));
}

#[tokio::test]
async fn combined_document_fails_before_any_resolution() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "noctivault.local-store.yaml",
        r#"
platform: google
gcp_project_id: p
secret-mocks:
  - name: x
    value: "v"
    version: 1
secret-refs:
  - cast: x
    ref: x
"#,
    );
    write(
        tmp.path(),
        "noctivault.yaml",
        "platform: google\nproject_id: p\nsecret-refs:\n  - cast: x\n    ref: x\n",
    );

    let mut vault = Noctivault::new(NoctivaultSettings::local());
    let err = vault.load(tmp.path()).await.unwrap_err();
    assert!(matches!(err, Error::CombinedConfigNotAllowed));
}
