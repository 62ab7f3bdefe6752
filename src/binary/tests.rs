//! Stream-level tests for the BILL format.
//!
//! The format has no reference decoder, so these tests check exact bytes
//! for small streams and byte-for-byte stability of decode + re-encode for
//! larger ones.

use super::format::*;
use super::reader::{read_all, BillReader};
use super::varint::read_varint;
use super::writer::LioLi;
use crate::{Error, Tree};

fn tree(name: &str) -> Tree {
    Tree::new(name).unwrap()
}

/// Helper building a complete stream from trees
fn write_stream(trees: &[Tree], add_root_node: bool) -> Vec<u8> {
    let mut stream = LioLi::new();
    if !add_root_node {
        stream.set_no_root_node();
    }
    stream.insert_header();
    for t in trees {
        stream.append(t).expect("Failed to encode tree");
    }
    stream.insert_terminator();
    stream.take_bytes()
}

fn sample_flow(i: usize) -> Tree {
    let src = tree("addr")
        .with_child(tree("ip").with_text(&format!("10.0.0.{i}")))
        .with_text(":")
        .with_child(tree("port").with_value(1000 + i));
    let dst = tree("addr")
        .with_child(tree("ip").with_text("192.168.1.1"))
        .with_text(":")
        .with_child(tree("port").with_value(443));

    tree("$")
        .with_text("flow ")
        .with_child(tree("src").with_child(src))
        .with_text(" -> ")
        .with_child(tree("dst").with_child(dst))
        .with_text(" ")
        .with_child(tree("bytes").with_value(i * 1500))
}

// ============================================================================
// Exact Byte Layout Tests
// ============================================================================

#[test]
fn test_empty_stream() {
    let data = write_stream(&[], true);
    assert_eq!(&data[..6], &HEADER);
    assert_eq!(data.len(), 6 + 10);
    assert_eq!(read_varint(&data[6..]).unwrap(), Some((TERMINATOR, 10)));
}

#[test]
fn test_single_leaf_stream_layout() {
    let data = write_stream(&[tree("$").with_text("hi")], true);

    let mut expected = HEADER.to_vec();
    expected.extend_from_slice(&[0x02, b'h', b'i']); // raw
    expected.extend_from_slice(&[0x04, 0x41, 0x00, b'$', 0x02]); // nodes
    expected.extend_from_slice(&[0xFF; 9]);
    expected.push(0x01);
    assert_eq!(data, expected);
}

#[test]
fn test_stream_length_accounting() {
    let data = write_stream(&[tree("leaf")], true);
    // header + (varint 0, no raw) + (varint 7, name "leaf" + span) + terminator
    assert_eq!(data.len(), 6 + 1 + 1 + 7 + 10);
}

#[test]
fn test_dictionary_is_shared_across_trees() {
    let mut stream = LioLi::new();
    stream.insert_header();
    stream.append(&tree("name").with_text("a")).unwrap();
    let first = stream.take_bytes();
    stream.append(&tree("name").with_text("b")).unwrap();
    let second = stream.take_bytes();

    assert_eq!(&first[6..], &[0x01, b'a', 0x07, 0x44, 0x00, b'n', b'a', b'm', b'e', 0x01]);
    assert_eq!(second, vec![0x01, b'b', 0x02, 0x00, 0x01]);
}

#[test]
fn test_header_resets_dictionary() {
    let mut stream = LioLi::new();
    stream.insert_header();
    stream.append(&tree("x")).unwrap();
    stream.take_bytes();

    stream.insert_header();
    stream.append(&tree("x")).unwrap();
    let bytes = stream.take_bytes();
    assert_eq!(&bytes[6..], &[0x00, 0x04, 0x41, 0x00, b'x', 0x00]);
}

// ============================================================================
// Round-Trip Tests
// ============================================================================

#[test]
fn test_roundtrip_trees() {
    let trees: Vec<Tree> = (0..5).map(sample_flow).collect();
    let data = write_stream(&trees, true);

    let decoded = read_all(&data).unwrap();
    assert_eq!(decoded.len(), trees.len());
    for (original, decoded) in trees.iter().zip(&decoded) {
        assert_eq!(original, decoded);
        assert_eq!(original.raw(), decoded.raw());
        assert!(decoded.is_valid());
    }
}

#[test]
fn test_reencode_is_byte_identical() {
    let trees: Vec<Tree> = (0..20).map(sample_flow).collect();
    let data = write_stream(&trees, true);
    let decoded = read_all(&data).unwrap();
    assert_eq!(write_stream(&decoded, true), data);
}

#[test]
fn test_roundtrip_without_root_node() {
    let trees: Vec<Tree> = (0..3).map(sample_flow).collect();
    let data = write_stream(&trees, false);
    let with_root = write_stream(&trees, true);
    assert!(data.len() < with_root.len());

    let reader = BillReader::new(&data).unwrap().with_root_name("$").unwrap();
    let decoded: Vec<Tree> = reader.collect::<crate::Result<_>>().unwrap();
    assert_eq!(decoded, trees);
    assert_eq!(write_stream(&decoded, false), data);
}

#[test]
fn test_roundtrip_with_all_span_widths() {
    let t = tree("$")
        .with_child(tree("short").with_text("abc"))
        .with_text(&"-".repeat(20))
        .with_child(tree("medium").with_text(&"m".repeat(200)))
        .with_text(&"-".repeat(1000))
        .with_child(tree("long").with_text(&"l".repeat(5000)));
    let data = write_stream(&[t.clone()], true);
    let decoded = read_all(&data).unwrap();
    assert_eq!(decoded[0], t);
}

#[test]
fn test_roundtrip_with_dictionary_overflow() {
    let mut t = tree("$");
    for i in 0..100 {
        t.push_tree(tree(&format!("n{i}")).with_value(i));
    }
    for i in 0..100 {
        t.push_tree(tree(&format!("n{i}")).with_value(i));
    }
    let data = write_stream(&[t.clone()], true);
    let decoded = read_all(&data).unwrap();
    assert_eq!(decoded[0], t);
    assert_eq!(write_stream(&decoded, true), data);
}

#[test]
fn test_roundtrip_non_utf8_raw() {
    let mut t = tree("$");
    t.push_bytes(&[0xff, 0x00, 0xfe]);
    let data = write_stream(&[t.clone()], true);
    let decoded = read_all(&data).unwrap();
    assert_eq!(decoded[0].raw(), &[0xff, 0x00, 0xfe]);
}

// ============================================================================
// Malformed Input Tests
// ============================================================================

#[test]
fn test_bad_magic() {
    let mut data = write_stream(&[tree("$")], true);
    data[0] = b'X';
    assert!(matches!(BillReader::new(&data), Err(Error::InvalidMagic)));
}

#[test]
fn test_truncated_stream() {
    let data = write_stream(&[sample_flow(1)], true);
    let cut = &data[..data.len() - 15];
    let result = read_all(cut);
    assert!(matches!(result, Err(Error::Truncated { .. })));
}

#[test]
fn test_missing_terminator_stops_cleanly() {
    let mut data = write_stream(&[tree("$").with_text("a")], true);
    data.truncate(data.len() - 10);
    let mut reader = BillReader::new(&data).unwrap();
    assert!(reader.next_tree().unwrap().is_some());
    assert!(reader.next_tree().unwrap().is_none());
    assert!(!reader.is_finished());
}

#[test]
fn test_unknown_dictionary_index() {
    let mut data = HEADER.to_vec();
    data.extend_from_slice(&[0x00, 0x02, 0x05, 0x00]);
    assert!(matches!(read_all(&data), Err(Error::Malformed { .. })));
}

#[test]
fn test_span_outside_raw_is_rejected() {
    let mut data = HEADER.to_vec();
    // raw "ab", node "$" claiming 5 bytes
    data.extend_from_slice(&[0x02, b'a', b'b', 0x04, 0x41, 0x00, b'$', 0x05]);
    assert!(matches!(read_all(&data), Err(Error::Malformed { .. })));
}

#[test]
fn test_invalid_name_is_rejected() {
    let mut data = HEADER.to_vec();
    data.extend_from_slice(&[0x00, 0x04, 0x41, 0x00, b'A', 0x00]);
    assert!(matches!(read_all(&data), Err(Error::InvalidNodeName(_))));
}

#[test]
fn test_iterator_stops_after_error() {
    let mut data = write_stream(&[tree("$")], true);
    data.truncate(data.len() - 10);
    data.extend_from_slice(&[0x05, b'x']);
    let results: Vec<_> = BillReader::new(&data).unwrap().collect();
    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    assert!(results[1].is_err());
}

#[test]
fn test_deeply_nested_frame_is_rejected() {
    // Innermost leaf refers to "$" by index; every level above it is a
    // children header, index 0 and an empty span
    let mut block = vec![0x00, 0x00];
    for _ in 0..8000 {
        let len = block.len();
        let mut wrapped = vec![CHILDREN_FLAG | (len as u8 & LOW7), (len >> 7) as u8, 0x00, 0x00];
        wrapped.extend(block);
        block = wrapped;
    }
    let len = block.len() + 4;
    let mut root = vec![CHILDREN_FLAG | (len as u8 & LOW7), (len >> 7) as u8, 0x41, 0x00, b'$', 0x00];
    root.extend(block);
    assert!(root.len() - 2 <= MAX_CHILDREN_LEN);

    let mut data = HEADER.to_vec();
    data.push(0x00);
    super::varint::write_varint(root.len() as u64, &mut data);
    data.extend(root);

    match read_all(&data) {
        Err(Error::Malformed { reason, .. }) => assert_eq!(reason, "nesting too deep"),
        other => panic!("expected a nesting error, got {:?}", other.map(|t| t.len())),
    }
}

fn nested(depth: usize) -> Tree {
    let mut t = tree("leaf").with_text("x");
    for _ in 0..depth {
        t = tree("n").with_child(t);
    }
    tree("$").with_child(t)
}

#[test]
fn test_nesting_limit_roundtrip() {
    // Root at depth 0, "leaf" at depth MAX_DEPTH
    let deepest = nested(MAX_DEPTH - 1);
    let data = write_stream(&[deepest.clone()], true);
    assert_eq!(read_all(&data).unwrap(), vec![deepest]);
}

#[test]
fn test_too_deep_tree_is_not_written() {
    let mut stream = LioLi::new();
    stream.insert_header();
    let before = stream.len();

    let result = stream.append(&nested(MAX_DEPTH));
    assert!(matches!(result, Err(Error::NestingTooDeep(MAX_DEPTH))));
    assert_eq!(stream.len(), before);
    assert!(stream.dictionary().is_empty());
}

#[test]
fn test_nameless_root_is_not_written() {
    let mut stream = LioLi::new();
    stream.insert_header();
    let before = stream.len();

    let nameless = Tree::default().with_text("x");
    assert!(matches!(
        stream.append(&nameless),
        Err(Error::InvalidNodeName(name)) if name.is_empty()
    ));
    assert_eq!(stream.len(), before);
    assert!(stream.dictionary().is_empty());

    stream.append(&tree("$").with_text("y")).unwrap();
    stream.insert_terminator();
    let trees = read_all(&stream.take_bytes()).unwrap();
    assert_eq!(trees.len(), 1);
    assert_eq!(trees[0].raw(), b"y");
}

#[test]
fn test_nameless_root_without_root_node() {
    let nameless = Tree::default().with_child(tree("a").with_text("x"));
    let data = write_stream(&[nameless], false);

    let reader = BillReader::new(&data).unwrap().with_root_name("$").unwrap();
    let decoded: Vec<Tree> = reader.collect::<crate::Result<_>>().unwrap();
    assert_eq!(decoded[0].lookup("$.a"), Some(&b"x"[..]));
}

#[test]
fn test_children_header_limit() {
    let mut out = vec![0, 0];
    patch_children_header(&mut out, 0, MAX_CHILDREN_LEN).unwrap();
    assert_eq!(out, vec![0xFF, 0xFF]);
    assert!(matches!(
        patch_children_header(&mut out, 0, MAX_CHILDREN_LEN + 1),
        Err(Error::ChildrenBlockTooLarge(len)) if len == MAX_CHILDREN_LEN + 1
    ));
}

#[test]
fn test_oversized_children_block_is_rejected() {
    // Each child costs 6 bytes: header, name, span and its own leaf
    let mut wide = tree("$");
    for _ in 0..6_000 {
        wide.push_tree(tree("c").with_child(tree("d").with_text("x")));
    }

    let mut stream = LioLi::new();
    stream.insert_header();
    let before = stream.len();

    assert!(matches!(
        stream.append(&wide),
        Err(Error::ChildrenBlockTooLarge(_))
    ));
    assert_eq!(stream.len(), before);
    assert!(stream.dictionary().is_empty());
}
