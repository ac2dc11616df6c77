//! Game directory indexing and precedence

use aurora_formats::ResourceType;
use aurora_resource::{GameVersion, ResourceError, ResourceId, ResourceLayout};
use aurora_test_fixtures::{
    FixtureResource, build_bif, build_key, build_rim, build_tlk, pack_key_id,
};
use bytes::Bytes;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn id(name: &str) -> ResourceId {
    ResourceId::new(name, ResourceType::Utc)
}

/// Minimal game root: KEY+BIF holding c_bandit01, an override folder
/// shadowing it, two module bundles, and a talk table.
fn build_game_root(root: &Path) {
    fs::create_dir(root.join("data")).unwrap();
    fs::write(
        root.join("data/templates.bif"),
        build_bif(&[FixtureResource::new(
            "c_bandit01",
            ResourceType::Utc.code(),
            b"from bif",
        )]),
    )
    .unwrap();
    fs::write(
        root.join("chitin.key"),
        build_key(
            &[("data\\templates.bif", 0)],
            &[("c_bandit01", ResourceType::Utc.code(), pack_key_id(0, 0))],
        ),
    )
    .unwrap();

    fs::create_dir(root.join("override")).unwrap();
    fs::write(root.join("override/c_bandit01.utc"), b"from override").unwrap();

    fs::create_dir(root.join("modules")).unwrap();
    fs::write(
        root.join("modules/danm13.rim"),
        build_rim(&[
            FixtureResource::new("m01aa", ResourceType::Are.code(), b"area from module"),
            FixtureResource::new("c_bandit01", ResourceType::Utc.code(), b"from module"),
        ]),
    )
    .unwrap();
    fs::write(
        root.join("modules/danm13_s.rim"),
        build_rim(&[FixtureResource::new(
            "c_bandit01",
            ResourceType::Utc.code(),
            b"from module _s",
        )]),
    )
    .unwrap();

    fs::write(root.join("dialog.tlk"), build_tlk(0, &[("Hello.", "")])).unwrap();
}

#[test]
fn override_folder_shadows_key_archives() {
    let dir = TempDir::new().unwrap();
    build_game_root(dir.path());

    let layout = ResourceLayout::index(GameVersion::Kotor, dir.path()).unwrap();
    let data = layout.resources().get(&id("c_bandit01")).unwrap().unwrap();
    assert_eq!(&data[..], b"from override");
}

#[test]
fn memory_overrides_shadow_everything_file_backed() {
    let dir = TempDir::new().unwrap();
    build_game_root(dir.path());

    let layout = ResourceLayout::index(GameVersion::Kotor, dir.path()).unwrap();
    layout
        .overrides()
        .add(id("c_bandit01"), Bytes::from_static(b"injected"));

    let data = layout.resources().get(&id("c_bandit01")).unwrap().unwrap();
    assert_eq!(&data[..], b"injected");
}

#[test]
fn loaded_module_wins_over_global_providers() {
    let dir = TempDir::new().unwrap();
    build_game_root(dir.path());

    let layout = ResourceLayout::index(GameVersion::Kotor, dir.path()).unwrap();
    layout.load_module("danm13").unwrap();

    // The _s bundle outranks the main module bundle.
    let data = layout.resources().get(&id("c_bandit01")).unwrap().unwrap();
    assert_eq!(&data[..], b"from module _s");

    let area = ResourceId::new("m01aa", ResourceType::Are);
    let data = layout.resources().get(&area).unwrap().unwrap();
    assert_eq!(&data[..], b"area from module");
}

#[test]
fn switching_modules_drops_the_previous_one() {
    let dir = TempDir::new().unwrap();
    build_game_root(dir.path());
    fs::write(
        dir.path().join("modules/tar_m02aa.rim"),
        build_rim(&[FixtureResource::new(
            "m02aa",
            ResourceType::Are.code(),
            b"second area",
        )]),
    )
    .unwrap();

    let layout = ResourceLayout::index(GameVersion::Kotor, dir.path()).unwrap();
    layout.load_module("danm13").unwrap();
    layout.load_module("tar_m02aa").unwrap();

    let old_area = ResourceId::new("m01aa", ResourceType::Are);
    assert!(layout.resources().get(&old_area).unwrap().is_none());

    // Back to the override folder once the module bundle is gone.
    let data = layout.resources().get(&id("c_bandit01")).unwrap().unwrap();
    assert_eq!(&data[..], b"from override");
}

#[test]
fn module_names_exclude_resource_halves() {
    let dir = TempDir::new().unwrap();
    build_game_root(dir.path());
    fs::write(dir.path().join("modules/tar_m02aa.rim"), build_rim(&[])).unwrap();

    let layout = ResourceLayout::index(GameVersion::Kotor, dir.path()).unwrap();
    assert_eq!(layout.module_names(), ["danm13", "tar_m02aa"]);
}

#[test]
fn file_lookup_tolerates_mixed_case_installs() {
    let dir = TempDir::new().unwrap();
    build_game_root(dir.path());
    fs::rename(dir.path().join("chitin.key"), dir.path().join("CHITIN.KEY")).unwrap();

    let layout = ResourceLayout::index(GameVersion::Kotor, dir.path()).unwrap();
    layout.load_module("danm13").unwrap();
    assert!(layout.resources().get(&id("c_bandit01")).unwrap().is_some());
}

#[test]
fn missing_key_file_fails_fast() {
    let dir = TempDir::new().unwrap();
    build_game_root(dir.path());
    fs::remove_file(dir.path().join("chitin.key")).unwrap();

    let err = ResourceLayout::index(GameVersion::Kotor, dir.path()).unwrap_err();
    assert!(matches!(err, ResourceError::MissingGameFile(_)));
}

#[test]
fn strings_reads_the_talk_table() {
    let dir = TempDir::new().unwrap();
    build_game_root(dir.path());

    let layout = ResourceLayout::index(GameVersion::Kotor, dir.path()).unwrap();
    let strings = layout.strings().unwrap();
    assert_eq!(strings.get(0), "Hello.");
    assert_eq!(strings.get(-1), "");
    assert_eq!(strings.get(999), "");
}

#[test]
fn second_game_strips_developer_notes() {
    let dir = TempDir::new().unwrap();
    build_game_root(dir.path());
    fs::write(
        dir.path().join("dialog.tlk"),
        build_tlk(0, &[("{angry}You again.", "")]),
    )
    .unwrap();

    let layout = ResourceLayout::index(GameVersion::TheSithLords, dir.path()).unwrap();
    let strings = layout.strings().unwrap();
    assert_eq!(strings.get(0), "You again.");
}
