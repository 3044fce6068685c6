use cell_diff::{
    build_chunks, create_direct_string_diff_model, create_patch_string_diff_model, raw_to_pos, Chunk,
    DiffConfig, DiffEntry, DiffModel, RangeValues, RawRange, StringDiffModel,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn model(base: &str, remote: &str, additions: &[RawRange], deletions: &[RawRange]) -> StringDiffModel {
    StringDiffModel::new(
        Some(base.to_string()),
        Some(remote.to_string()),
        additions,
        deletions,
    )
    .unwrap()
}

#[test]
fn test_addition_only_chunk() {
    let model = create_direct_string_diff_model(None, Some(&json!("hello\nworld"))).unwrap();

    assert_eq!(model.additions().len(), 1);
    assert!(model.deletions().is_empty());

    let chunks = model.get_chunks();
    assert_eq!(chunks, vec![Chunk::new(0, 2, 0, 0)]);
    assert_eq!(chunks[0].orig_from, chunks[0].orig_to);
    assert!(chunks[0].in_edit(0));
    assert!(chunks[0].in_edit(1));
}

#[test]
fn test_deletion_only_chunk() {
    let model = create_direct_string_diff_model(Some(&json!("hello\nworld")), None).unwrap();

    assert!(model.additions().is_empty());
    assert_eq!(model.deletions().len(), 1);
    assert_eq!(model.get_chunks(), vec![Chunk::new(0, 0, 0, 2)]);
}

#[test]
fn test_unchanged_model_has_no_chunks() {
    let model = create_direct_string_diff_model(Some(&json!("a\nb\n")), Some(&json!("a\nb\n"))).unwrap();

    assert!(model.unchanged());
    assert!(model.get_chunks().is_empty());
}

#[test]
fn test_adjacent_addition_and_deletion_merge() {
    // "X\n" is inserted at base line 2 and "c\n" deleted from base line 2
    let model = model(
        "a\nb\nc\nd\n",
        "a\nb\nX\nd\n",
        &[RawRange::new(4, 6)],
        &[RawRange::new(4, 6)],
    );

    assert_eq!(model.get_chunks(), vec![Chunk::new(2, 3, 2, 3)]);
}

#[test]
fn test_separated_replacements_give_two_chunks() {
    let model = model(
        "a\nb\nc\nd\n",
        "a\nB\nc\nD\n",
        &[RawRange::new(2, 4), RawRange::new(6, 8)],
        &[RawRange::new(2, 4), RawRange::new(6, 8)],
    );

    assert_eq!(
        model.get_chunks(),
        vec![Chunk::new(1, 2, 1, 2), Chunk::new(3, 4, 3, 4)]
    );
}

#[test]
fn test_deletion_before_addition_keeps_gap() {
    // "b\n" is removed, then "X\n" appended after the unchanged "c\n"
    let model = model(
        "a\nb\nc\n",
        "a\nc\nX\n",
        &[RawRange::new(4, 6)],
        &[RawRange::new(2, 4)],
    );

    assert_eq!(
        model.get_chunks(),
        vec![Chunk::new(1, 1, 1, 2), Chunk::new(2, 3, 3, 3)]
    );
}

#[test]
fn test_edits_inside_a_line_mark_it_on_both_sides() {
    let diff = vec![DiffEntry::patch(
        0,
        vec![
            DiffEntry::add_range(1, RangeValues::Text("X".into())),
            DiffEntry::remove_range(1, 1),
        ],
    )];
    let model = create_patch_string_diff_model(&json!("abc\n"), &diff, &DiffConfig::default()).unwrap();

    assert_eq!(model.remote(), Some("aXc\n"));
    assert_eq!(model.get_chunks(), vec![Chunk::new(0, 1, 0, 1)]);
}

#[test]
fn test_insertion_splitting_a_line() {
    // "X\nY" lands inside "ab", which now spans two lines
    let model = model("ab\n", "aX\nYb\n", &[RawRange::new(1, 4)], &[]);

    assert_eq!(model.get_chunks(), vec![Chunk::new(0, 2, 0, 1)]);
}

#[test]
fn test_chunks_are_recomputed_identically() {
    let model = model(
        "a\nb\nc\nd\n",
        "a\nB\nc\nD\n",
        &[RawRange::new(2, 4), RawRange::new(6, 8)],
        &[RawRange::new(2, 4), RawRange::new(6, 8)],
    );

    assert_eq!(model.get_chunks(), model.get_chunks());
}

#[test]
fn test_build_chunks_without_ranges() {
    assert!(build_chunks(&[], &[]).is_empty());
}

#[test]
fn test_build_chunks_from_translated_ranges() {
    let additions = raw_to_pos(&[RawRange::new(0, 2)], "X\na\n").unwrap();

    assert_eq!(build_chunks(&additions, &[]), vec![Chunk::new(0, 1, 0, 0)]);
}

#[test]
fn test_chunk_membership() {
    let chunk = Chunk::new(2, 4, 2, 2);

    assert!(!chunk.in_edit(1));
    assert!(chunk.in_edit(2));
    assert!(chunk.in_edit(3));
    assert!(!chunk.in_edit(4));
    assert!(!chunk.in_orig(2));
    assert_eq!(chunk.edit_range(), 2..4);
    assert!(chunk.orig_range().is_empty());
}
