//! BILL stream reader.

use super::format::*;
use super::varint::read_varint;
use crate::dictionary::{DictResult, Dictionary};
use crate::path::is_valid_node_name;
use crate::tree::{Node, Tree};
use crate::{Error, Result};

/// Reader turning a BILL byte stream back into trees.
///
/// The reader rebuilds the name dictionary exactly as the writer grew it,
/// so dictionary references resolve to the same names.
pub struct BillReader<'a> {
    data: &'a [u8],
    pos: usize,
    dict: Dictionary,
    root_name: Option<String>,
    finished: bool,
}

impl<'a> BillReader<'a> {
    /// Open a stream, validating its header.
    pub fn new(data: &'a [u8]) -> Result<Self> {
        validate_header(data)?;
        Ok(Self {
            data,
            pos: HEADER.len(),
            dict: Dictionary::new(DICTIONARY_SIZE),
            root_name: None,
            finished: false,
        })
    }

    /// Read a stream written without root nodes, naming every root `name`.
    pub fn with_root_name(mut self, name: &str) -> Result<Self> {
        if !is_valid_node_name(name) {
            return Err(Error::InvalidNodeName(name.to_string()));
        }
        self.root_name = Some(name.to_string());
        Ok(self)
    }

    /// Whether the terminator has been read.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Offset of the next unread byte.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Read the next tree; `None` at the terminator or at the end of data.
    pub fn next_tree(&mut self) -> Result<Option<Tree>> {
        if self.finished || self.pos == self.data.len() {
            return Ok(None);
        }

        let raw_len = self.read_length()?;
        if raw_len == TERMINATOR {
            self.finished = true;
            if self.pos != self.data.len() {
                log::warn!(
                    "ignoring {} bytes after BILL terminator",
                    self.data.len() - self.pos
                );
            }
            return Ok(None);
        }
        let raw = self.take(raw_len)?.to_vec();

        let block_len = self.read_length()?;
        let block_offset = self.pos;
        let block = self.take(block_len)?;

        let mut decoder = NodeDecoder {
            block,
            pos: 0,
            offset: block_offset,
            dict: &mut self.dict,
        };

        let root = match &self.root_name {
            Some(name) => {
                let mut root = Node::with_span(name.clone(), 0, raw.len());
                decoder.decode_children(&mut root, 0, block.len())?;
                root
            }
            None => {
                let root = decoder.decode_node(0, 0)?;
                if decoder.pos != block.len() {
                    return Err(decoder.malformed("trailing bytes after root node"));
                }
                root
            }
        };

        let tree = Tree::from_parts(root, raw);
        if !tree.is_valid() {
            return Err(Error::Malformed {
                offset: block_offset,
                reason: "node spans do not fit the raw buffer".to_string(),
            });
        }
        Ok(Some(tree))
    }

    fn read_length(&mut self) -> Result<u64> {
        match read_varint(&self.data[self.pos..])? {
            Some((value, used)) => {
                self.pos += used;
                Ok(value)
            }
            None => Err(Error::Truncated {
                offset: self.data.len(),
            }),
        }
    }

    fn take(&mut self, len: u64) -> Result<&'a [u8]> {
        let remaining = (self.data.len() - self.pos) as u64;
        if len > remaining {
            return Err(Error::Truncated {
                offset: self.data.len(),
            });
        }
        let data = self.data;
        let start = self.pos;
        self.pos += len as usize;
        Ok(&data[start..self.pos])
    }
}

impl Iterator for BillReader<'_> {
    type Item = Result<Tree>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_tree() {
            Ok(Some(tree)) => Some(Ok(tree)),
            Ok(None) => None,
            Err(e) => {
                // Stop after the first error, the position is lost
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

/// Decode every tree of a stream written with root nodes.
pub fn read_all(data: &[u8]) -> Result<Vec<Tree>> {
    BillReader::new(data)?.collect()
}

struct NodeDecoder<'b, 'd> {
    block: &'b [u8],
    pos: usize,
    offset: usize,
    dict: &'d mut Dictionary,
}

impl NodeDecoder<'_, '_> {
    fn byte(&self, at: usize) -> Result<u8> {
        self.block.get(at).copied().ok_or(Error::Truncated {
            offset: self.offset + at,
        })
    }

    fn malformed(&self, reason: &str) -> Error {
        Error::Malformed {
            offset: self.offset + self.pos,
            reason: reason.to_string(),
        }
    }

    fn decode_node(&mut self, cursor: usize, depth: usize) -> Result<Node> {
        if depth > MAX_DEPTH {
            return Err(self.malformed("nesting too deep"));
        }
        let first = self.byte(self.pos)?;
        let block_end = if first & CHILDREN_FLAG != 0 {
            let len = (first & LOW7) as usize | (self.byte(self.pos + 1)? as usize) << 7;
            self.pos += 2;
            if self.pos + len > self.block.len() {
                return Err(Error::Truncated {
                    offset: self.offset + self.block.len(),
                });
            }
            Some(self.pos + len)
        } else {
            None
        };

        let name = self.decode_name()?;
        let (skip, length, used) = decode_span(&self.block[self.pos..]).ok_or(Error::Truncated {
            offset: self.offset + self.block.len(),
        })?;
        self.pos += used;

        let start = cursor + skip;
        let mut node = Node::with_span(name, start, start + length);

        if let Some(block_end) = block_end {
            self.decode_children(&mut node, depth, block_end)?;
            if node.children.is_empty() {
                return Err(self.malformed("children header without children"));
            }
        }
        Ok(node)
    }

    fn decode_children(&mut self, parent: &mut Node, depth: usize, block_end: usize) -> Result<()> {
        let mut cursor = parent.start;
        while self.pos < block_end {
            let child = self.decode_node(cursor, depth + 1)?;
            cursor = child.end;
            parent.children.push(child);
        }
        if self.pos != block_end {
            return Err(self.malformed("child overruns its parent's block"));
        }
        Ok(())
    }

    fn decode_name(&mut self) -> Result<String> {
        let first = self.byte(self.pos)?;
        let name = match first & NAME_TAG_MASK {
            NAME_TAG_INDEX => {
                let index = (first & LOW6) as u16;
                let name = self
                    .dict
                    .name(index)
                    .ok_or_else(|| self.malformed("unknown dictionary index"))?
                    .to_string();
                self.pos += 1;
                name
            }
            NAME_TAG_FULL => {
                let len = (first & LOW6) as usize | (self.byte(self.pos + 1)? as usize) << 6;
                let start = self.pos + 2;
                let bytes = self.block.get(start..start + len).ok_or(Error::Truncated {
                    offset: self.offset + self.block.len(),
                })?;
                let name = std::str::from_utf8(bytes)
                    .map_err(|_| self.malformed("node name is not UTF-8"))?
                    .to_string();
                self.pos = start + len;
                if self.dict.find(&name) == DictResult::NotFound {
                    self.dict.add(&name);
                }
                name
            }
            _ => return Err(self.malformed("expected a node name")),
        };

        if !is_valid_node_name(&name) {
            return Err(Error::InvalidNodeName(name));
        }
        Ok(name)
    }
}
