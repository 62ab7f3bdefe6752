//! Line-oriented record files.
//!
//! Each non-empty line holds an absolute path and the text to append at it,
//! separated by the first space. A blank line ends a record; lines starting
//! with `#` are comments.
//!
//! ```text
//! # one flow
//! $.src.ip 10.0.0.1
//! $.src.port 5353
//! $.dst.ip 10.0.0.2
//!
//! $.src.ip 10.0.0.3
//! ```

use crate::path::{is_absolute, Path, ROOT};
use crate::{Error, Result, Tree};

/// Parse every record of `input` into a tree.
pub fn parse_records(input: &str) -> Result<Vec<Tree>> {
    let mut trees = Vec::new();
    let mut record = RecordBuilder::new()?;

    for (index, line) in input.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            if let Some(tree) = record.finish()? {
                trees.push(tree);
            }
            continue;
        }
        if line.starts_with('#') {
            continue;
        }
        record.add_line(index + 1, line)?;
    }

    if let Some(tree) = record.finish()? {
        trees.push(tree);
    }
    Ok(trees)
}

struct RecordBuilder {
    path: Path,
    entries: usize,
}

impl RecordBuilder {
    fn new() -> Result<Self> {
        Ok(Self {
            path: Path::new(ROOT)?,
            entries: 0,
        })
    }

    fn add_line(&mut self, line_no: usize, line: &str) -> Result<()> {
        let (name, value) = line.split_once(' ').unwrap_or((line, ""));
        if !is_absolute(name) {
            return Err(Error::InvalidRecord {
                line: line_no,
                reason: format!("path {:?} does not start with $", name),
            });
        }
        let mut entry = Path::new(name).map_err(|e| Error::InvalidRecord {
            line: line_no,
            reason: e.to_string(),
        })?;
        entry.append_str(value);
        self.path.append_path(entry)?;
        self.entries += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<Option<Tree>> {
        if self.entries == 0 {
            return Ok(None);
        }
        let tree = self.path.to_tree()?;
        *self = Self::new()?;
        Ok(Some(tree))
    }
}
