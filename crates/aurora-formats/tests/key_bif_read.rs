//! Round-trip tests for the KEY+BIF indexed-archive scheme

use aurora_formats::{BifFile, FormatError, KeyFile, ResourceType};
use aurora_test_fixtures::{FixtureResource, build_bif, build_key, pack_key_id};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

#[test]
fn key_maps_names_to_archive_locations() {
    let dir = TempDir::new().unwrap();
    let key_path = dir.path().join("chitin.key");
    fs::write(
        &key_path,
        build_key(
            &[("data\\templates.bif", 100), ("data\\models.bif", 200)],
            &[
                ("c_bandit01", ResourceType::Utc.code(), pack_key_id(0, 0)),
                ("c_bandit02", ResourceType::Utc.code(), pack_key_id(0, 1)),
                ("plc_chair", ResourceType::Mdl.code(), pack_key_id(1, 0)),
            ],
        ),
    )
    .unwrap();

    let key = KeyFile::open(&key_path).unwrap();
    assert_eq!(key.len(), 3);

    // Backslashes are normalized on read.
    assert_eq!(key.archive_filename(0), Some("data/templates.bif"));
    assert_eq!(key.archive_filename(1), Some("data/models.bif"));
    assert_eq!(key.archive_filename(2), None);

    let loc = key.find("c_bandit02", ResourceType::Utc).unwrap();
    assert_eq!(loc.archive_idx, 0);
    assert_eq!(loc.resource_idx, 1);

    let loc = key.find("PLC_Chair", ResourceType::Mdl).unwrap();
    assert_eq!(loc.archive_idx, 1);
    assert_eq!(loc.resource_idx, 0);

    assert!(key.find("c_bandit01", ResourceType::Mdl).is_none());
}

#[test]
fn bif_extracts_payloads_by_index() {
    let dir = TempDir::new().unwrap();
    let bif_path = dir.path().join("templates.bif");
    let resources = vec![
        FixtureResource::new("unused", ResourceType::Utc.code(), b"first payload"),
        FixtureResource::new("unused", ResourceType::Utc.code(), b"second payload"),
    ];
    fs::write(&bif_path, build_bif(&resources)).unwrap();

    let bif = BifFile::open(&bif_path).unwrap();
    assert_eq!(bif.resource_count(), 2);
    assert_eq!(bif.resource_data(0).unwrap(), b"first payload");
    assert_eq!(bif.resource_data(1).unwrap(), b"second payload");
}

#[test]
fn bif_index_out_of_range() {
    let dir = TempDir::new().unwrap();
    let bif_path = dir.path().join("templates.bif");
    let resources = vec![FixtureResource::new(
        "unused",
        ResourceType::Utc.code(),
        b"payload",
    )];
    fs::write(&bif_path, build_bif(&resources)).unwrap();

    let bif = BifFile::open(&bif_path).unwrap();
    let err = bif.resource_data(1).unwrap_err();
    assert!(matches!(
        err,
        FormatError::IndexOutOfRange { index: 1, count: 1 }
    ));
}

#[test]
fn truncated_bif_table_fails_at_open() {
    let dir = TempDir::new().unwrap();
    let bif_path = dir.path().join("bad.bif");

    // Header claims 100 resources but the file ends after the header.
    let mut data = Vec::new();
    data.extend_from_slice(b"BIFFV1  ");
    data.extend_from_slice(&100u32.to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());
    data.extend_from_slice(&20u32.to_le_bytes());
    fs::write(&bif_path, data).unwrap();

    let err = BifFile::open(&bif_path).unwrap_err();
    assert!(matches!(err, FormatError::MalformedTable { container: "BIF", .. }));
}
