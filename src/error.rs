//! Error types for lioli.

use thiserror::Error;

/// Error type for lioli operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Node name does not match `$` or `#?[a-z_][a-z_0-9]*`
    #[error("invalid node name: {0:?}")]
    InvalidNodeName(String),

    /// Path does not match the path grammar
    #[error("invalid path name: {0:?}")]
    InvalidPathName(String),

    /// A relative path was used where an absolute one is required
    #[error("relative path cannot be turned into a tree: {0:?}")]
    RelativePath(String),

    /// Two trees with distinct, non-empty root names were merged
    #[error("cannot merge root {theirs:?} into root {ours:?}")]
    NameConflict { ours: String, theirs: String },

    /// Node-wise merging was requested
    #[error("node merge is not supported")]
    NodeMergeUnsupported,

    /// Span does not fit the 4-byte encoding (14-bit skip, 16-bit length)
    #[error("span too large to encode: skip {skip}, length {length}")]
    SpanOverflow { skip: usize, length: usize },

    /// Node name longer than 14 bits
    #[error("node name too long to encode: {0} bytes")]
    NameTooLong(usize),

    /// Children block longer than 15 bits
    #[error("children block too large to encode: {0} bytes")]
    ChildrenBlockTooLarge(usize),

    /// Tree nested deeper than a stream may carry
    #[error("tree nesting deeper than {0} levels")]
    NestingTooDeep(usize),

    /// Invalid stream magic bytes
    #[error("invalid magic bytes: expected BILL header")]
    InvalidMagic,

    /// Unsupported stream version
    #[error("unsupported format version: {0}")]
    UnsupportedVersion(u16),

    /// Input ended in the middle of an item
    #[error("unexpected end of data at offset {offset}")]
    Truncated { offset: usize },

    /// Input is structurally invalid
    #[error("malformed data at offset {offset}: {reason}")]
    Malformed { offset: usize, reason: String },

    /// Varint does not fit in 64 bits
    #[error("varint overflows 64 bits")]
    VarintOverflow,

    /// Serializer context used after `close`
    #[error("serializer context is closed")]
    ContextClosed,

    /// Line of a record file that cannot be parsed
    #[error("invalid record at line {line}: {reason}")]
    InvalidRecord { line: usize, reason: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regex compilation error
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for lioli operations.
pub type Result<T> = std::result::Result<T, Error>;
