//! Lookups by dotted node-name chains.

use regex::Regex;

use super::node::Node;

/// Find the node addressed by `key` (e.g. `$.a.b`), skipping the first
/// `skip` matches in pre-order.
pub(crate) fn lookup<'a>(node: &'a Node, key: &str, skip: &mut usize) -> Option<&'a Node> {
    let (head, rest) = match key.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (key, None),
    };

    if node.name != head {
        return None;
    }

    match rest {
        None | Some("") => {
            if *skip > 0 {
                *skip -= 1;
                None
            } else {
                Some(node)
            }
        }
        Some(rest) => node
            .children
            .iter()
            .find_map(|child| lookup(child, rest, skip)),
    }
}

/// Visit every node whose full dotted path matches `regex`.
///
/// Returns `false` as soon as `visit` does, which stops the walk.
pub(crate) fn regex_lookup<F>(node: &Node, regex: &Regex, prefix: &str, visit: &mut F) -> bool
where
    F: FnMut(&Node) -> bool,
{
    let path = format!("{prefix}{}", node.name);

    if regex.is_match(&path) && !visit(node) {
        return false;
    }

    let prefix = path + ".";
    node.children
        .iter()
        .all(|child| regex_lookup(child, regex, &prefix, visit))
}
