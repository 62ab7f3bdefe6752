//! Null objects returned for unknown names.

use super::{Logger, Serializer, SerializerContext};
use crate::{Error, Result, Tree};

/// Serializer producing no bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSerializer;

impl Serializer for NullSerializer {
    fn name(&self) -> &str {
        "null"
    }

    fn is_binary(&self) -> bool {
        false
    }

    fn create_context(&self) -> Box<dyn SerializerContext> {
        Box::new(NullContext { closed: false })
    }
}

struct NullContext {
    closed: bool,
}

impl SerializerContext for NullContext {
    fn serialize(&mut self, _tree: &Tree) -> Result<Vec<u8>> {
        if self.closed {
            return Err(Error::ContextClosed);
        }
        Ok(Vec::new())
    }

    fn close(&mut self) -> Result<Vec<u8>> {
        self.closed = true;
        Ok(Vec::new())
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

/// Logger dropping every tree.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn name(&self) -> &str {
        "null"
    }

    fn log(&self, _tree: Tree) {}
}
