//! Interval nodes over a shared raw buffer.

/// A named interval `[start, end)` of a tree's raw buffer.
///
/// Children nest inside their parent, never overlap and are kept in
/// left-to-right order of their intervals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    pub(crate) name: String,
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) children: Vec<Node>,
}

impl Node {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            start: 0,
            end: 0,
            children: Vec::new(),
        }
    }

    /// Build a node from decoded parts.
    pub(crate) fn with_span(name: String, start: usize, end: usize) -> Self {
        Self {
            name,
            start,
            end,
            children: Vec::new(),
        }
    }

    /// Node name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Start offset into the raw buffer.
    pub fn start(&self) -> usize {
        self.start
    }

    /// End offset (exclusive) into the raw buffer.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of raw bytes covered.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the node covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Children in textual order.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Text captured by this node.
    pub fn text<'a>(&self, raw: &'a [u8]) -> &'a [u8] {
        &raw[self.start..self.end]
    }

    pub(crate) fn set_end(&mut self, end: usize) {
        self.end = end;
    }

    /// Shift this node and all descendants by `delta` bytes.
    pub(crate) fn adjust(&mut self, delta: usize) {
        self.start += delta;
        self.end += delta;
        for child in &mut self.children {
            child.adjust(delta);
        }
    }

    /// Append `node` as the last child, placing it right after our current end.
    pub(crate) fn add_as_child(&mut self, mut node: Node) {
        node.adjust(self.end);
        self.end = node.end;
        self.children.push(node);
    }

    /// Append the contents of `node` after our current end.
    ///
    /// The children of `node` become our children, the name is taken over
    /// if we have none. Callers must rule out conflicting names first.
    pub(crate) fn append(&mut self, mut node: Node) {
        debug_assert!(node.name.is_empty() || self.name.is_empty() || node.name == self.name);
        if self.name.is_empty() {
            self.name = std::mem::take(&mut node.name);
        }
        node.adjust(self.end);
        self.end = node.end;
        self.children.append(&mut node.children);
    }

    /// Check that this node lies within `[lo, hi)` and that its children
    /// are ordered and non-overlapping.
    pub(crate) fn is_valid(&self, lo: usize, hi: usize) -> bool {
        if self.start < lo || self.end > hi || self.start > self.end {
            return false;
        }
        let mut cursor = self.start;
        for child in &self.children {
            if !child.is_valid(cursor, self.end) {
                return false;
            }
            cursor = child.end;
        }
        true
    }
}
