//! Lorth text serializer.

use super::{Serializer, SerializerContext};
use crate::{Error, Result, Tree};

/// Serializer writing one lorth program per tree.
#[derive(Debug, Default, Clone, Copy)]
pub struct LorthSerializer;

impl Serializer for LorthSerializer {
    fn name(&self) -> &str {
        "lorth"
    }

    fn is_binary(&self) -> bool {
        false
    }

    fn create_context(&self) -> Box<dyn SerializerContext> {
        Box::new(LorthContext { closed: false })
    }
}

struct LorthContext {
    closed: bool,
}

impl SerializerContext for LorthContext {
    fn serialize(&mut self, tree: &Tree) -> Result<Vec<u8>> {
        if self.closed {
            return Err(Error::ContextClosed);
        }
        Ok(tree.as_lorth().into_bytes())
    }

    fn close(&mut self) -> Result<Vec<u8>> {
        self.closed = true;
        Ok(Vec::new())
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}
