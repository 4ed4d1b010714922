use std::fmt::Write as _;

use super::node::Node;

const INDENT: &str = "  ";

/// Pretty-prints a [`Node`] back to text. Map keys come out in sorted order
/// because `Node::Map` is a `BTreeMap`; this function does no additional
/// sorting of its own.
pub fn print(node: &Node) -> String {
    let mut out = String::new();
    write_node(&mut out, node, 0);
    out
}

fn write_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

fn write_node(out: &mut String, node: &Node, depth: usize) {
    match node {
        Node::Null => out.push_str("null"),
        Node::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Node::Int(v) => {
            let _ = write!(out, "{v}");
        }
        Node::Double(v) => {
            let _ = write!(out, "{v}");
        }
        Node::String(s) => write_string(out, s),
        Node::Array(items) => write_array(out, items, depth),
        Node::Map(entries) => write_map(out, entries, depth),
    }
}

fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
}

fn write_array(out: &mut String, items: &[Node], depth: usize) {
    if items.is_empty() {
        out.push_str("[]");
        return;
    }
    out.push_str("[\n");
    for (i, item) in items.iter().enumerate() {
        write_indent(out, depth + 1);
        write_node(out, item, depth + 1);
        if i + 1 != items.len() {
            out.push(',');
        }
        out.push('\n');
    }
    write_indent(out, depth);
    out.push(']');
}

fn write_map(out: &mut String, entries: &std::collections::BTreeMap<String, Node>, depth: usize) {
    if entries.is_empty() {
        out.push_str("{}");
        return;
    }
    out.push_str("{\n");
    let len = entries.len();
    for (i, (key, value)) in entries.iter().enumerate() {
        write_indent(out, depth + 1);
        write_string(out, key);
        out.push_str(": ");
        write_node(out, value, depth + 1);
        if i + 1 != len {
            out.push(',');
        }
        out.push('\n');
    }
    write_indent(out, depth);
    out.push('}');
}
