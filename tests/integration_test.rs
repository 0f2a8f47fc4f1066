//! Integration tests for azure-storage-quickstart
//!
//! These tests cover everything that runs before the first Azure call.

use azure_storage_quickstart::azure::write_local_file;
use azure_storage_quickstart::config::{self, Cli};
use azure_storage_quickstart::errors::Error;
use azure_storage_quickstart::{naming, prompt, RunNames};
use clap::Parser;
use std::io::Cursor;

#[test]
fn test_run_names_share_suffix() {
    let names = RunNames::generate().expect("Failed to generate names");
    assert_eq!(names.suffix.len(), config::SUFFIX_WIDTH);
    assert_eq!(names.account, format!("acct{}", names.suffix));
    assert_eq!(names.container, format!("cont{}", names.suffix));
}

#[test]
fn test_run_names_reject_bad_suffix() {
    let err = RunNames::from_suffix("ABC").unwrap_err();
    assert!(
        matches!(err, Error::InvalidName { kind: "storage account", .. }),
        "unexpected {err:?}"
    );
}

#[test]
fn test_suffix_is_zero_padded() {
    // 1000 draws of 2 digits hit a value below 10 with near certainty.
    let padded = (0..1000)
        .map(|_| naming::random_num_string(2).unwrap())
        .any(|s| s.starts_with('0'));
    assert!(padded, "expected at least one zero padded suffix");
}

#[test]
fn test_retain_group_unless_yes() {
    for input in ["n\n", "no\n", "", "\n\n\n", "later\n"] {
        let mut reader = Cursor::new(input.as_bytes());
        let mut out = Vec::new();
        let delete = prompt::confirm(&mut reader, &mut out, "Delete Quickstart-RG", 3)
            .expect("Failed to read answer");
        assert!(!delete, "input {input:?} must keep the resource group");
    }
}

#[test]
fn test_missing_required_flags() {
    if ["AZURE_SUBSCRIPTION_ID", "AZURE_CLIENT_ID", "AZURE_TENANT_ID"]
        .iter()
        .any(|v| std::env::var_os(v).is_some())
    {
        return;
    }
    let err = Cli::try_parse_from(["quickstart", "--subid", "sub"]).unwrap_err();
    assert_eq!(
        err.kind(),
        clap::error::ErrorKind::MissingRequiredArgument
    );
    // clap exits with a failure status for usage errors
    assert_ne!(err.exit_code(), 0);
}

#[tokio::test]
async fn test_local_file_matches_names() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let names = RunNames::from_suffix("314159").unwrap();
    let file = write_local_file(dir.path(), &names.suffix)
        .await
        .expect("Failed to write file");
    assert_eq!(file.blob_name(), "file-314159");
    assert!(file.path.exists());
}
