//! Boundary between tree producers and output sinks.
//!
//! Producers hand finished trees to a [`Logger`]. Loggers that write bytes
//! turn trees into bytes through a [`SerializerContext`], one context per
//! output stream, created by a [`Serializer`]. Handles are looked up by
//! name in a [`LogRegistry`]; unknown names resolve to null objects so a
//! misconfigured pipeline keeps running and drops its trees.

mod bill;
mod lorth;
mod null;
mod registry;

pub use bill::BillSerializer;
pub use lorth::LorthSerializer;
pub use null::{NullLogger, NullSerializer};
pub use registry::LogRegistry;

use crate::{Result, Tree};

/// Names of the serializers every [`LogRegistry::with_builtins`] registry knows.
pub const BUILTIN_SERIALIZERS: [&str; 3] = ["bill", "lorth", "null"];

/// Factory of per-stream serializer contexts.
pub trait Serializer: Send + Sync {
    /// Registered name.
    fn name(&self) -> &str;

    /// Whether the produced bytes are binary rather than text.
    fn is_binary(&self) -> bool;

    /// Start a new output stream.
    fn create_context(&self) -> Box<dyn SerializerContext>;
}

/// State of one output stream.
pub trait SerializerContext: Send {
    /// Serialize a tree, returning the bytes to append to the stream.
    ///
    /// The first call may also return stream framing (a header). A tree
    /// that cannot be serialized is dropped with an error and the stream
    /// stays usable.
    fn serialize(&mut self, tree: &Tree) -> Result<Vec<u8>>;

    /// Finish the stream, returning any trailing bytes.
    fn close(&mut self) -> Result<Vec<u8>>;

    /// Whether `close` has been called.
    fn is_closed(&self) -> bool;
}

/// Consumer of finished trees.
pub trait Logger: Send + Sync {
    /// Registered name.
    fn name(&self) -> &str;

    /// Accept a tree. Implementations must not block the caller.
    fn log(&self, tree: Tree);
}
