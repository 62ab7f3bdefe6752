//! BILL stream writer.

use super::format::*;
use super::varint::write_varint;
use crate::dictionary::{DictResult, Dictionary};
use crate::tree::{Node, Tree};
use crate::{Error, Result};

/// Stream container serializing many trees into one BILL byte stream.
///
/// All trees of a stream share one name dictionary, so a name repeated
/// anywhere later in the stream costs a single byte.
///
/// ```
/// use lioli::{LioLi, Tree};
///
/// let mut stream = LioLi::new();
/// stream.insert_header();
/// stream.append(&Tree::new("$")?.with_child(Tree::new("ip")?.with_text("10.0.0.1")))?;
/// stream.insert_terminator();
///
/// let bytes = stream.take_bytes();
/// assert_eq!(&bytes[..4], b"BILL");
/// assert!(stream.is_empty());
/// # Ok::<(), lioli::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct LioLi {
    dict: Dictionary,
    buffer: Vec<u8>,
    add_root_node: bool,
}

impl LioLi {
    /// Create an empty stream that writes root nodes.
    pub fn new() -> Self {
        Self {
            dict: Dictionary::new(DICTIONARY_SIZE),
            buffer: Vec::new(),
            add_root_node: true,
        }
    }

    /// Leave out the name and span of every tree's root node.
    pub fn set_no_root_node(&mut self) {
        self.add_root_node = false;
    }

    /// Whether root nodes are written.
    pub fn adds_root_node(&self) -> bool {
        self.add_root_node
    }

    /// Start a new stream: writes the header and forgets all known names.
    pub fn insert_header(&mut self) {
        self.dict.reset();
        self.buffer.extend_from_slice(&HEADER);
    }

    /// End the stream.
    pub fn insert_terminator(&mut self) {
        write_varint(TERMINATOR, &mut self.buffer);
    }

    /// Forget all names learned so far.
    pub fn reset_dictionary(&mut self) {
        self.dict.reset();
    }

    /// Append one framed tree.
    ///
    /// A tree that cannot be encoded is rejected as a whole: neither the
    /// buffer nor the dictionary is changed.
    pub fn append(&mut self, tree: &Tree) -> Result<()> {
        let checkpoint = self.dict.len();
        let encoded = match encode_tree(tree, &mut self.dict, self.add_root_node) {
            Ok(encoded) => encoded,
            Err(e) => {
                self.dict.truncate(checkpoint);
                return Err(e);
            }
        };

        if checkpoint < self.dict.capacity() as usize && self.dict.is_full() {
            log::debug!("BILL dictionary full after {} names", self.dict.len());
        }

        write_varint(tree.raw().len() as u64, &mut self.buffer);
        self.buffer.extend_from_slice(tree.raw());
        write_varint(encoded.len() as u64, &mut self.buffer);
        self.buffer.extend_from_slice(&encoded);
        Ok(())
    }

    /// Number of bytes waiting to be taken.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if nothing is waiting to be taken.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Move the pending bytes out, leaving the buffer empty.
    pub fn take_bytes(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.buffer)
    }

    /// The shared name dictionary.
    pub fn dictionary(&self) -> &Dictionary {
        &self.dict
    }
}

impl Default for LioLi {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode the node tree of `tree` (without raw bytes or framing).
pub fn encode_tree(tree: &Tree, dict: &mut Dictionary, add_root_node: bool) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let root = tree.root();
    if add_root_node {
        // Only a default-constructed root can be nameless
        if root.name().is_empty() {
            return Err(Error::InvalidNodeName(String::new()));
        }
        encode_node(root, root.start(), 0, dict, &mut out)?;
    } else {
        encode_children(root, 0, dict, &mut out)?;
    }
    Ok(out)
}

fn encode_node(
    node: &Node,
    cursor: usize,
    depth: usize,
    dict: &mut Dictionary,
    out: &mut Vec<u8>,
) -> Result<()> {
    if depth > MAX_DEPTH {
        return Err(Error::NestingTooDeep(MAX_DEPTH));
    }
    let header_at = out.len();
    if !node.children().is_empty() {
        out.extend_from_slice(&[0, 0]);
    }

    encode_name(node.name(), dict, out)?;
    encode_span(node.start() - cursor, node.len(), out)?;
    encode_children(node, depth, dict, out)?;

    if !node.children().is_empty() {
        let length = out.len() - header_at - 2;
        patch_children_header(out, header_at, length)?;
    }
    Ok(())
}

fn encode_children(node: &Node, depth: usize, dict: &mut Dictionary, out: &mut Vec<u8>) -> Result<()> {
    let mut cursor = node.start();
    for child in node.children() {
        encode_node(child, cursor, depth + 1, dict, out)?;
        cursor = child.end();
    }
    Ok(())
}

fn encode_name(name: &str, dict: &mut Dictionary, out: &mut Vec<u8>) -> Result<()> {
    match dict.find(name) {
        DictResult::Index(index) => {
            debug_assert!(index <= LOW6 as u16);
            out.push(NAME_TAG_INDEX | index as u8);
            Ok(())
        }
        DictResult::NotFound => {
            // Register now so the next occurrence is a single byte
            let added = dict.add(name);
            debug_assert!(matches!(added, DictResult::Index(_)));
            encode_full_name(name, out)
        }
        _ => encode_full_name(name, out),
    }
}
