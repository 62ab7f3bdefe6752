//! LioLi - annotated text trees with a compact binary stream format.
//!
//! A [`Tree`] is a flat byte buffer plus a tree of named, non-overlapping
//! spans over it. Trees render to an indented text dump, to a postfix
//! "lorth" program or to Python literals, and encode into BILL, a binary
//! stream format that shares a name dictionary between all trees of a
//! stream.
//!
//! # Features
//!
//! - **Trees**: append text, numbers and whole subtrees; the result stays
//!   one contiguous buffer
//! - **Paths**: build trees from dotted paths like `$.src.ip`
//! - **BILL streams**: write with [`LioLi`], read back with [`BillReader`]
//! - **Output boundary**: [`Serializer`]s and [`Logger`]s looked up by name
//!   in a [`LogRegistry`]
//!
//! # Quick Start
//!
//! ```
//! use lioli::{read_all, LioLi, Path};
//!
//! let mut record = Path::new("$")?;
//! record.append_path(Path::new("$.src.ip")?.append_str("10.0.0.1").clone())?;
//! record.append_path(Path::new("$.src.port")?.append_value(443).clone())?;
//! let tree = record.to_tree()?;
//!
//! let mut stream = LioLi::new();
//! stream.insert_header();
//! stream.append(&tree)?;
//! stream.insert_terminator();
//!
//! let trees = read_all(&stream.take_bytes())?;
//! assert_eq!(trees, vec![tree]);
//! # Ok::<(), lioli::Error>(())
//! ```
//!
//! # Node Names
//!
//! Node names are `$` (the root) or `#?[a-z_][a-z_0-9]*`. A leading `#`
//! marks a node whose children form an array rather than a record.

mod error;

pub mod binary;
pub mod config;
pub mod dictionary;
pub mod gzip;
pub mod output;
pub mod path;
pub mod record;
pub mod tree;

// Re-export core types
pub use error::{Error, Result};
pub use tree::{MergeMode, Node, Tree};
pub use path::{is_valid_node_name, is_valid_path_name, Path};
pub use dictionary::{DictResult, Dictionary};

// Re-export stream types
pub use binary::{read_all, BillReader, LioLi};

pub use record::parse_records;

// Re-export configuration
pub use config::{BillConfig, OutputConfig};

// Re-export the output boundary
pub use output::{
    BillSerializer, LogRegistry, Logger, LorthSerializer, NullLogger, NullSerializer, Serializer,
    SerializerContext,
};
