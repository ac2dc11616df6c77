//! Round-trip tests for ERF/MOD and RIM bundles

use aurora_formats::{BundleFile, BundleVariant, FormatError, ResourceType};
use aurora_test_fixtures::{FixtureResource, build_erf, build_rim};
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use std::fs;
use tempfile::TempDir;

fn fixtures() -> Vec<FixtureResource> {
    vec![
        FixtureResource::new("c_bandit01", ResourceType::Utc.code(), b"creature bytes"),
        FixtureResource::new("m01aa", ResourceType::Are.code(), b"area bytes"),
        FixtureResource::new("m01aa", ResourceType::Git.code(), &[0u8, 1, 2, 254, 255]),
    ]
}

#[test]
fn erf_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test.erf");
    fs::write(&path, build_erf(b"ERF V1.0", &fixtures())).unwrap();

    let bundle = BundleFile::open(&path).unwrap();
    assert_eq!(bundle.variant(), BundleVariant::Erf);
    assert_eq!(bundle.len(), 3);

    for res in fixtures() {
        let ty = ResourceType::from_code(res.type_code).unwrap();
        let data = bundle.resource_data(&res.name, ty).unwrap().unwrap();
        assert_eq!(data, res.data);
    }
}

#[test]
fn mod_signature_is_accepted() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test.mod");
    fs::write(&path, build_erf(b"MOD V1.0", &fixtures())).unwrap();

    let bundle = BundleFile::open(&path).unwrap();
    assert_eq!(bundle.variant(), BundleVariant::Mod);
    assert_eq!(
        bundle
            .resource_data("c_bandit01", ResourceType::Utc)
            .unwrap()
            .unwrap(),
        b"creature bytes"
    );
}

#[test]
fn rim_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test.rim");
    fs::write(&path, build_rim(&fixtures())).unwrap();

    let bundle = BundleFile::open(&path).unwrap();
    assert_eq!(bundle.variant(), BundleVariant::Rim);

    for res in fixtures() {
        let ty = ResourceType::from_code(res.type_code).unwrap();
        let data = bundle.resource_data(&res.name, ty).unwrap().unwrap();
        assert_eq!(data, res.data);
    }
}

#[test]
fn entry_enumeration_is_exact() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test.rim");
    fs::write(&path, build_rim(&fixtures())).unwrap();

    let bundle = BundleFile::open(&path).unwrap();
    let ids: HashSet<(String, ResourceType)> = bundle
        .entries()
        .map(|(name, ty, _)| (name.to_string(), ty))
        .collect();

    let expected: HashSet<(String, ResourceType)> = fixtures()
        .iter()
        .map(|r| {
            (
                r.name.clone(),
                ResourceType::from_code(r.type_code).unwrap(),
            )
        })
        .collect();
    assert_eq!(ids, expected);
}

#[test]
fn lookup_is_case_insensitive() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test.erf");
    fs::write(&path, build_erf(b"ERF V1.0", &fixtures())).unwrap();

    let bundle = BundleFile::open(&path).unwrap();
    assert!(bundle.find("C_Bandit01", ResourceType::Utc).is_some());
}

#[test]
fn unknown_resource_is_none_not_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test.erf");
    fs::write(&path, build_erf(b"ERF V1.0", &fixtures())).unwrap();

    let bundle = BundleFile::open(&path).unwrap();
    assert!(
        bundle
            .resource_data("nosuch", ResourceType::Utc)
            .unwrap()
            .is_none()
    );
}

#[test]
fn bad_signature_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test.erf");
    fs::write(&path, b"GFF V3.2 and then some trailing bytes").unwrap();

    let err = BundleFile::open(&path).unwrap_err();
    assert!(matches!(err, FormatError::SignatureMismatch { .. }));
}

#[test]
fn truncated_bundle_fails_with_format_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test.rim");
    let mut data = build_rim(&fixtures());
    data.truncate(30); // cuts into the first table record
    fs::write(&path, data).unwrap();

    let err = BundleFile::open(&path).unwrap_err();
    assert!(matches!(err, FormatError::EndOfStream { .. }));
}
