//! Talk table reader tests

use aurora_formats::{BinaryCursor, TalkTable};
use aurora_test_fixtures::build_tlk;
use pretty_assertions::assert_eq;

#[test]
fn reads_strings_and_sound_resrefs() {
    let data = build_tlk(
        0,
        &[
            ("Bad spot for an ambush.", "n_bandit_amb"),
            ("", ""),
            ("You cannot do that yet.", ""),
        ],
    );
    let table = TalkTable::read(&mut BinaryCursor::from_vec(data)).unwrap();

    assert_eq!(table.language_id(), 0);
    assert_eq!(table.string_count(), 3);

    let first = table.string(0).unwrap();
    assert_eq!(first.text, "Bad spot for an ambush.");
    assert_eq!(first.sound_resref, "n_bandit_amb");

    let second = table.string(1).unwrap();
    assert_eq!(second.text, "");
    assert_eq!(second.sound_resref, "");

    assert_eq!(table.string(2).unwrap().text, "You cannot do that yet.");
}

#[test]
fn out_of_range_refs_are_none() {
    let data = build_tlk(0, &[("only", "")]);
    let table = TalkTable::read(&mut BinaryCursor::from_vec(data)).unwrap();

    assert!(table.string(-1).is_none());
    assert!(table.string(1).is_none());
}
