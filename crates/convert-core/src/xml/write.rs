//! Indented serialization of a [`Document`]

use super::document::{Document, Element, Node, NodeId};
use quick_xml::escape::{escape, partial_escape};

/// Serialize `doc` with `indent` spaces per nesting level
///
/// Whitespace-only text is treated as layout and regenerated. An element
/// holding real text or CDATA is written on one line exactly as stored so
/// its content is not altered.
pub fn to_string_pretty(doc: &Document, indent: usize) -> String {
    let mut out = String::new();

    for id in doc.prolog() {
        write_node(&mut out, doc, *id, 0, indent);
        out.push('\n');
    }

    write_node(&mut out, doc, doc.root(), 0, indent);
    out.push('\n');

    for id in doc.epilog() {
        write_node(&mut out, doc, *id, 0, indent);
        out.push('\n');
    }

    out
}

fn write_node(out: &mut String, doc: &Document, id: NodeId, depth: usize, indent: usize) {
    out.push_str(&" ".repeat(depth * indent));

    match doc.node(id) {
        Node::Element(element) => write_element(out, doc, element, depth, indent),
        other => write_inline(out, doc, other),
    }
}

fn write_element(out: &mut String, doc: &Document, element: &Element, depth: usize, indent: usize) {
    write_open_tag(out, element);

    let children: Vec<NodeId> = element
        .children
        .iter()
        .copied()
        .filter(|child| !doc.node(*child).is_layout())
        .collect();

    if children.is_empty() {
        out.push_str("/>");
        return;
    }
    out.push('>');

    let has_content = children
        .iter()
        .any(|child| matches!(doc.node(*child), Node::Text(_) | Node::CData(_)));

    if has_content {
        for child in &element.children {
            write_inline(out, doc, doc.node(*child));
        }
    } else {
        for child in children {
            out.push('\n');
            write_node(out, doc, child, depth + 1, indent);
        }
        out.push('\n');
        out.push_str(&" ".repeat(depth * indent));
    }

    out.push_str("</");
    out.push_str(&element.name);
    out.push('>');
}

fn write_open_tag(out: &mut String, element: &Element) {
    out.push('<');
    out.push_str(&element.name);
    for attr in &element.attributes {
        out.push(' ');
        out.push_str(&attr.name);
        out.push_str("=\"");
        out.push_str(&escape(attr.value.as_str()));
        out.push('"');
    }
}

/// Write a node without touching any whitespace inside it
fn write_inline(out: &mut String, doc: &Document, node: &Node) {
    match node {
        Node::Element(element) => {
            write_open_tag(out, element);
            if element.children.is_empty() {
                out.push_str("/>");
            } else {
                out.push('>');
                for child in &element.children {
                    write_inline(out, doc, doc.node(*child));
                }
                out.push_str("</");
                out.push_str(&element.name);
                out.push('>');
            }
        }
        Node::Text(text) => out.push_str(&partial_escape(text.as_str())),
        Node::CData(data) => {
            out.push_str("<![CDATA[");
            out.push_str(data);
            out.push_str("]]>");
        }
        Node::Comment(comment) => {
            out.push_str("<!--");
            out.push_str(comment);
            out.push_str("-->");
        }
        Node::ProcessingInstruction(content) | Node::Declaration(content) => {
            out.push_str("<?");
            out.push_str(content);
            out.push_str("?>");
        }
        Node::DocType(content) => {
            out.push_str("<!DOCTYPE ");
            out.push_str(content.trim_start());
            out.push('>');
        }
    }
}
