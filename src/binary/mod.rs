//! BILL binary stream format.
//!
//! A stream is a fixed header, any number of framed trees and a
//! terminator. Node names are compressed with a dictionary shared by the
//! whole stream.
//!
//! # Stream Structure
//!
//! ```text
//! +---------------------------+
//! | "BILL" 0x00 0x01          |  6 bytes
//! +---------------------------+
//! | varint(len(raw)) raw      |  tree 1
//! | varint(len(nodes)) nodes  |
//! +---------------------------+
//! |          ...              |
//! +---------------------------+
//! | varint(0xFFFF_FFFF_FFFF_FFFF) |  terminator
//! +---------------------------+
//! ```

mod format;
mod reader;
mod varint;
pub mod writer;

#[cfg(test)]
mod tests;

pub use format::*;
pub use reader::{read_all, BillReader};
pub use varint::{read_varint, write_varint, MAX_VARINT_LEN};
pub use writer::{encode_tree, LioLi};
