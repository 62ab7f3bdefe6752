//! BILL binary serializer.

use super::{Serializer, SerializerContext};
use crate::binary::LioLi;
use crate::config::BillConfig;
use crate::{Error, Result, Tree};

/// Serializer writing trees as one BILL stream per context.
#[derive(Debug, Clone, Default)]
pub struct BillSerializer {
    config: BillConfig,
}

impl BillSerializer {
    pub fn new(config: BillConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BillConfig {
        &self.config
    }
}

impl Serializer for BillSerializer {
    fn name(&self) -> &str {
        "bill"
    }

    fn is_binary(&self) -> bool {
        true
    }

    fn create_context(&self) -> Box<dyn SerializerContext> {
        let mut stream = LioLi::new();
        if self.config.no_root_node {
            stream.set_no_root_node();
        }
        Box::new(BillContext {
            stream,
            started: false,
            closed: false,
        })
    }
}

struct BillContext {
    stream: LioLi,
    started: bool,
    closed: bool,
}

impl SerializerContext for BillContext {
    fn serialize(&mut self, tree: &Tree) -> Result<Vec<u8>> {
        if self.closed {
            return Err(Error::ContextClosed);
        }
        if !self.started {
            self.stream.insert_header();
            self.started = true;
        }
        // A rejected tree leaves the stream as it was; pending bytes such as
        // the header go out with the next call
        if let Err(e) = self.stream.append(tree) {
            log::warn!("dropping tree {:?}: {}", tree.root_name(), e);
            return Err(e);
        }
        Ok(self.stream.take_bytes())
    }

    fn close(&mut self) -> Result<Vec<u8>> {
        if self.closed {
            return Ok(Vec::new());
        }
        self.closed = true;
        // An empty stream stays empty
        if self.started {
            self.stream.insert_terminator();
        }
        Ok(self.stream.take_bytes())
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}
