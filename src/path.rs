//! Dot-path addressing for building trees.
//!
//! A path such as `$.principal.ip` names a chain of nested nodes starting at
//! the root `$`. Values written through a [`Path`] end up in the deepest node
//! once the path is turned into a tree:
//!
//! ```
//! use lioli::Path;
//!
//! let mut path = Path::new("$.principal.ip")?;
//! path.append_str("10.0.0.1");
//!
//! let tree = path.to_tree()?;
//! assert_eq!(tree.lookup("$.principal.ip"), Some(&b"10.0.0.1"[..]));
//! # Ok::<(), lioli::Error>(())
//! ```
//!
//! Paths not starting with `$` are relative. They can only be attached to
//! another path, which prefixes them with its own name.

use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::tree::{MergeMode, Tree};
use crate::{Error, Result};

static NODE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\$|#?[a-z_][a-z_0-9]*)$").expect("node name regex"));

static PATH_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\$(?:\.#?[a-z_][a-z_0-9]*)+$").expect("path name regex"));

static RELATIVE_PATH_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#?[a-z_][a-z_0-9]*(?:\.#?[a-z_][a-z_0-9]*)*$").expect("relative path regex")
});

/// Root node name.
pub const ROOT: &str = "$";

/// Check a single node name: `$` or `#?[a-z_][a-z_0-9]*`.
pub fn is_valid_node_name(name: &str) -> bool {
    NODE_NAME.is_match(name)
}

/// Check an absolute path: `$` followed by at least one `.segment`.
pub fn is_valid_path_name(name: &str) -> bool {
    PATH_NAME.is_match(name)
}

/// Check a relative path: one or more dot-separated segments, no `$`.
pub fn is_valid_relative_path_name(name: &str) -> bool {
    RELATIVE_PATH_NAME.is_match(name)
}

/// Check if a path string is absolute (rooted at `$`).
pub fn is_absolute(path: &str) -> bool {
    path.starts_with(ROOT)
}

type Entries = BTreeMap<String, Tree>;

/// Builder collecting values under dotted path names.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    name: String,
    absolute: Entries,
    relative: Entries,
}

impl Path {
    /// Create a path; `$` alone addresses the root itself.
    pub fn new(path: &str) -> Result<Self> {
        let valid = if is_absolute(path) {
            path == ROOT || is_valid_path_name(path)
        } else {
            is_valid_relative_path_name(path)
        };
        if !valid {
            return Err(Error::InvalidPathName(path.to_string()));
        }

        let mut this = Self {
            name: path.to_string(),
            absolute: Entries::new(),
            relative: Entries::new(),
        };
        this.entries_mut().insert(path.to_string(), Tree::default());
        Ok(this)
    }

    /// Path name this builder writes to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check if this path is rooted at `$`.
    pub fn is_absolute(&self) -> bool {
        is_absolute(&self.name)
    }

    /// Check if this path is relative.
    pub fn is_relative(&self) -> bool {
        !self.is_absolute()
    }

    fn entries_mut(&mut self) -> &mut Entries {
        if is_absolute(&self.name) {
            &mut self.absolute
        } else {
            &mut self.relative
        }
    }

    fn me(&mut self) -> &mut Tree {
        let name = self.name.clone();
        self.entries_mut().entry(name).or_default()
    }

    /// Append text at this path.
    pub fn append_str(&mut self, text: &str) -> &mut Self {
        self.me().push_str(text);
        self
    }

    /// Append the textual form of `value` at this path.
    pub fn append_value<T: fmt::Display>(&mut self, value: T) -> &mut Self {
        self.me().push_value(value);
        self
    }

    /// Append `tree` as a child at this path.
    pub fn append_tree(&mut self, tree: Tree) -> &mut Self {
        self.me().push_tree(tree);
        self
    }

    /// Attach everything collected by `path`.
    ///
    /// Relative entries of `path` are re-rooted below this path's name;
    /// absolute entries are kept as they are. Entries that already exist
    /// are merged.
    pub fn append_path(&mut self, path: Path) -> Result<&mut Self> {
        let Path {
            absolute, relative, ..
        } = path;

        for (key, tree) in relative {
            let key = format!("{}.{}", self.name, key);
            insert_or_merge(self.entries_mut(), key, tree)?;
        }
        for (key, tree) in absolute {
            insert_or_merge(&mut self.absolute, key, tree)?;
        }
        Ok(self)
    }

    /// Build one `$`-rooted tree from all absolute entries.
    ///
    /// Shared prefixes become shared nodes; siblings are ordered by name.
    /// The result can be merged into any other `$`-rooted tree.
    pub fn to_tree(&self) -> Result<Tree> {
        if let Some(key) = self.relative.keys().next() {
            return Err(Error::RelativePath(key.clone()));
        }

        let mut root = Builder::default();
        for (key, value) in &self.absolute {
            let mut node = &mut root;
            if let Some(rest) = key.strip_prefix("$.") {
                for segment in rest.split('.') {
                    node = node.children.entry(segment.to_string()).or_default();
                }
            }
            node.content.merge(value.clone(), MergeMode::Concatenate)?;
        }
        root.build(ROOT)
    }
}

fn insert_or_merge(entries: &mut Entries, key: String, tree: Tree) -> Result<()> {
    match entries.get_mut(&key) {
        Some(existing) => existing.merge(tree, MergeMode::Concatenate),
        None => {
            entries.insert(key, tree);
            Ok(())
        }
    }
}

#[derive(Default)]
struct Builder {
    content: Tree,
    children: BTreeMap<String, Builder>,
}

impl Builder {
    fn build(self, name: &str) -> Result<Tree> {
        let mut tree = Tree::new(name)?;
        tree.merge(self.content, MergeMode::Concatenate)?;
        for (child_name, child) in self.children {
            tree.push_tree(child.build(&child_name)?);
        }
        Ok(tree)
    }
}
