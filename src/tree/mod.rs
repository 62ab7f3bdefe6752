//! Annotated text trees.
//!
//! A [`Tree`] owns a single raw byte buffer and a tree of [`Node`]s naming
//! substrings of it. Appending one tree to another copies (or moves) the
//! child's raw bytes to the end of the parent's buffer and re-bases the
//! child's nodes, so the result is again one self-contained buffer.
//!
//! ```
//! use lioli::Tree;
//!
//! let mut addr = Tree::new("addr")?;
//! addr.push_tree(Tree::new("ip")?.with_text("10.0.0.1"))
//!     .push_str(":")
//!     .push_tree(Tree::new("port")?.with_value(443));
//!
//! let mut root = Tree::new("$")?;
//! root.push_tree(addr);
//! assert_eq!(root.lookup("$.addr.port"), Some(&b"443"[..]));
//! # Ok::<(), lioli::Error>(())
//! ```

mod lookup;
mod node;
mod render;

pub use node::Node;
pub use render::escape;

use std::fmt;

use regex::Regex;
use serde_json::{json, Value};

use crate::path::is_valid_node_name;
use crate::{Error, Result};

/// How [`Tree::merge`] combines two trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeMode {
    /// Concatenate the raw buffers and chain the top-level children
    #[default]
    Concatenate,
    /// Merge equally named nodes into each other (not supported)
    Nodes,
}

/// A raw buffer plus the node tree annotating it.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    root: Node,
    raw: Vec<u8>,
}

impl Tree {
    /// Create an empty tree whose root is called `name`.
    pub fn new(name: &str) -> Result<Self> {
        if !is_valid_node_name(name) {
            return Err(Error::InvalidNodeName(name.to_string()));
        }
        Ok(Self {
            root: Node::new(name.to_string()),
            raw: Vec::new(),
        })
    }

    pub(crate) fn from_parts(root: Node, raw: Vec<u8>) -> Self {
        Self { root, raw }
    }

    /// Root node.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Root node name (empty for a default tree).
    pub fn root_name(&self) -> &str {
        &self.root.name
    }

    /// Rename the root node.
    pub fn set_root_name(&mut self, name: &str) -> Result<()> {
        if !is_valid_node_name(name) {
            return Err(Error::InvalidNodeName(name.to_string()));
        }
        self.root.name = name.to_string();
        Ok(())
    }

    /// The raw buffer all nodes point into.
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// Append text to the raw buffer, extending the root.
    pub fn push_str(&mut self, text: &str) -> &mut Self {
        self.push_bytes(text.as_bytes())
    }

    /// Append raw bytes, extending the root.
    pub fn push_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        debug_assert!(self.is_valid());

        self.raw.extend_from_slice(bytes);
        self.root.set_end(self.raw.len());

        debug_assert!(self.is_valid());
        self
    }

    /// Append the textual form of `value`.
    pub fn push_value<T: fmt::Display>(&mut self, value: T) -> &mut Self {
        self.push_str(&value.to_string())
    }

    /// Append `tree` as the new last child of the root, moving its buffer.
    pub fn push_tree(&mut self, mut tree: Tree) -> &mut Self {
        debug_assert!(self.is_valid());
        debug_assert!(tree.is_valid());

        if self.raw.is_empty() {
            std::mem::swap(&mut self.raw, &mut tree.raw);
        } else {
            self.raw.append(&mut tree.raw);
        }
        self.root.add_as_child(tree.root);

        debug_assert!(self.is_valid());
        self
    }

    /// Append a copy of `tree` as the new last child of the root.
    pub fn push_tree_ref(&mut self, tree: &Tree) -> &mut Self {
        debug_assert!(tree.is_valid());

        self.raw.extend_from_slice(&tree.raw);
        self.root.add_as_child(tree.root.clone());

        debug_assert!(self.is_valid());
        self
    }

    /// Builder form of [`push_str`](Self::push_str).
    pub fn with_text(mut self, text: &str) -> Self {
        self.push_str(text);
        self
    }

    /// Builder form of [`push_value`](Self::push_value).
    pub fn with_value<T: fmt::Display>(mut self, value: T) -> Self {
        self.push_value(value);
        self
    }

    /// Builder form of [`push_tree`](Self::push_tree).
    pub fn with_child(mut self, tree: Tree) -> Self {
        self.push_tree(tree);
        self
    }

    /// Merge `tree` into this one.
    ///
    /// The raw buffers are concatenated and the top-level children of
    /// `tree` follow ours. Root names must be equal unless one is empty.
    pub fn merge(&mut self, tree: Tree, mode: MergeMode) -> Result<()> {
        if mode == MergeMode::Nodes {
            return Err(Error::NodeMergeUnsupported);
        }

        let (ours, theirs) = (&self.root.name, &tree.root.name);
        if !ours.is_empty() && !theirs.is_empty() && ours != theirs {
            return Err(Error::NameConflict {
                ours: ours.clone(),
                theirs: theirs.clone(),
            });
        }

        let Tree { root, mut raw } = tree;
        self.root.append(root);
        self.raw.append(&mut raw);

        debug_assert!(self.is_valid());
        Ok(())
    }

    /// Check the node invariants against the current raw buffer.
    pub fn is_valid(&self) -> bool {
        self.root.start == 0 && self.root.end == self.raw.len() && self.root.is_valid(0, self.raw.len())
    }

    /// Cheap hash for deduplication: the raw buffer length, not a content hash.
    pub fn hash(&self) -> u32 {
        self.raw.len() as u32
    }

    /// Indented dump, one `-`-prefixed line per node.
    pub fn as_string(&self) -> String {
        let mut output = String::new();
        render::dump_string(&self.root, &self.raw, 0, &mut output);
        output
    }

    /// Forth-like dump terminated by `;`.
    pub fn as_lorth(&self) -> String {
        let mut output = String::new();
        render::dump_lorth(&self.root, &self.raw, 0, &mut output);
        output.pop();
        output.push_str(";\n");
        output
    }

    /// Python literal dump.
    pub fn as_python(&self) -> String {
        let mut output = String::new();
        render::dump_python(&self.root, &self.raw, 1, false, &mut output);
        // Drop the trailing ",\n"
        output.truncate(output.len().saturating_sub(2));
        output
    }

    /// JSON view: `{"name", "text", "children"}` per node.
    pub fn to_json(&self) -> Value {
        fn node_json(node: &Node, raw: &[u8]) -> Value {
            json!({
                "name": node.name,
                "text": String::from_utf8_lossy(node.text(raw)),
                "children": node.children.iter().map(|c| node_json(c, raw)).collect::<Vec<_>>(),
            })
        }
        node_json(&self.root, &self.raw)
    }

    /// Text of the first node addressed by `key`, e.g. `$.addr.ip`.
    pub fn lookup(&self, key: &str) -> Option<&[u8]> {
        self.lookup_nth(key, 0)
    }

    /// Text of the `n`-th (0-based, pre-order) node addressed by `key`.
    pub fn lookup_nth(&self, key: &str, n: usize) -> Option<&[u8]> {
        let mut skip = n;
        lookup::lookup(&self.root, key, &mut skip).map(|node| node.text(&self.raw))
    }

    /// Call `visit` with the text of every node whose dotted path fully
    /// matches `pattern`, until `visit` returns `false`.
    pub fn regex_lookup<F>(&self, pattern: &str, mut visit: F) -> Result<()>
    where
        F: FnMut(&[u8]) -> bool,
    {
        let regex = Regex::new(&format!("^(?:{pattern})$"))?;
        lookup::regex_lookup(&self.root, &regex, "", &mut |node: &Node| {
            visit(node.text(&self.raw))
        });
        Ok(())
    }
}

impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        self.as_string() == other.as_string()
    }
}

impl Eq for Tree {}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}
