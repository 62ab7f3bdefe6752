//! Text renderings of a node tree.
//!
//! All renderings escape raw bytes the same way: backslash, double quote,
//! newline, tab and carriage return get C-style escapes, printable ASCII is
//! kept and everything else becomes `\xNN`.

use std::fmt::Write;

use super::node::Node;

/// Escape raw bytes for display inside a double-quoted literal.
pub fn escape(raw: &[u8]) -> String {
    let mut output = String::with_capacity(raw.len());
    for &byte in raw {
        match byte {
            b'\\' => output.push_str("\\\\"),
            b'"' => output.push_str("\\\""),
            b'\n' => output.push_str("\\n"),
            b'\t' => output.push_str("\\t"),
            b'\r' => output.push_str("\\r"),
            b' '..=b'~' => output.push(byte as char),
            _ => {
                let _ = write!(output, "\\x{:02x}", byte);
            }
        }
    }
    output
}

/// Indented dump: `'-' * depth + name + ": " + text`, one line per node.
pub(crate) fn dump_string(node: &Node, raw: &[u8], level: usize, output: &mut String) {
    output.extend(std::iter::repeat('-').take(level));
    output.push_str(&node.name);
    output.push_str(": ");
    output.push_str(&escape(node.text(raw)));
    output.push('\n');

    for child in &node.children {
        dump_string(child, raw, level + 1, output);
    }
}

/// Forth-like dump. Leaves become `name "text" .`, inner nodes become
/// `name {` ... `}` with the text between children pushed as literals.
pub(crate) fn dump_lorth(node: &Node, raw: &[u8], level: usize, output: &mut String) {
    let spacer = " ".repeat(level);

    output.push_str(&spacer);
    output.push_str(&node.name);
    output.push(' ');

    if node.children.is_empty() {
        output.push('"');
        output.push_str(&escape(node.text(raw)));
        output.push_str("\" .\n");
        return;
    }

    output.push_str("{\n");
    let mut cursor = node.start;
    for child in &node.children {
        if cursor != child.start {
            push_lorth_literal(&spacer, &raw[cursor..child.start], output);
        }
        dump_lorth(child, raw, level + 1, output);
        cursor = child.end;
    }
    if cursor != node.end {
        push_lorth_literal(&spacer, &raw[cursor..node.end], output);
    }
    output.push_str(&spacer);
    output.push_str("}\n");
}

fn push_lorth_literal(spacer: &str, text: &[u8], output: &mut String) {
    output.push_str(spacer);
    output.push_str(" \"");
    output.push_str(&escape(text));
    output.push_str("\" .\n");
}

/// Python literal dump.
///
/// Each node is a tuple of its own (non-child) text and its children. Names
/// starting with `#` hold arrays, so their children form a tuple without
/// keys; all other nodes hold a dict keyed by child name.
pub(crate) fn dump_python(
    node: &Node,
    raw: &[u8],
    level: usize,
    array_item: bool,
    output: &mut String,
) {
    let is_array = node.name.starts_with('#');
    let spacer = " ".repeat(level * 2);

    let mut own_text = Vec::new();
    let mut child_output = String::new();
    let mut cursor = node.start;
    for child in &node.children {
        own_text.extend_from_slice(&raw[cursor..child.start]);
        dump_python(child, raw, level + 1, is_array, &mut child_output);
        cursor = child.end;
    }
    own_text.extend_from_slice(&raw[cursor..node.end]);

    output.push_str(&spacer);
    if !array_item {
        let _ = write!(output, "\"{}\" : ", node.name);
    }
    let _ = write!(output, "(\"{}\",", escape(&own_text));

    match (is_array, child_output.is_empty()) {
        // Python needs the trailing comma to see a one-element tuple
        (true, true) => output.push_str("(),),\n"),
        (true, false) => {
            output.push_str("(\n");
            output.push_str(&child_output);
            let _ = write!(output, "{spacer} ),\n{spacer}),\n");
        }
        (false, true) => output.push_str("{}),\n"),
        (false, false) => {
            output.push_str("{\n");
            output.push_str(&child_output);
            let _ = write!(output, "{spacer} }}\n{spacer}),\n");
        }
    }
}
