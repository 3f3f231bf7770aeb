//! Build a [`Document`] from quick-xml events

use super::document::{Attribute, Document, Element, Node, NodeId};
use super::XmlError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Parse a complete document
///
/// Fails on anything that is not well-formed: mismatched or unclosed tags,
/// duplicate attributes, stray text outside the root, or more than one root.
pub fn parse(input: &str) -> Result<Document, XmlError> {
    let mut reader = Reader::from_str(input);
    let mut nodes: Vec<Node> = Vec::new();
    let mut prolog = Vec::new();
    let mut epilog = Vec::new();
    let mut root: Option<NodeId> = None;
    let mut open: Vec<NodeId> = Vec::new();

    loop {
        let position = reader.buffer_position() as u64;
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(err) => {
                return Err(XmlError::Syntax {
                    message: err.to_string(),
                    position,
                })
            }
        };

        let node = match event {
            Event::Start(start) => {
                let id = push(&mut nodes, Node::Element(element(&start, position)?));
                place(&mut nodes, &open, &mut root, &mut prolog, &mut epilog, id, true)?;
                open.push(id);
                continue;
            }
            Event::Empty(start) => Node::Element(element(&start, position)?),
            Event::End(_) => {
                if open.pop().is_none() {
                    return Err(XmlError::Syntax {
                        message: "closing tag without a matching opening tag".to_string(),
                        position,
                    });
                }
                continue;
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|err| XmlError::Syntax {
                    message: err.to_string(),
                    position,
                })?;
                if open.is_empty() {
                    if text.trim().is_empty() {
                        continue;
                    }
                    return Err(XmlError::StrayText);
                }
                Node::Text(text.into_owned())
            }
            Event::CData(data) => {
                if open.is_empty() {
                    return Err(XmlError::StrayText);
                }
                Node::CData(decode(&data, position)?)
            }
            Event::Comment(comment) => Node::Comment(decode(&comment, position)?),
            Event::Decl(decl) => Node::Declaration(decode(&decl, position)?),
            Event::PI(pi) => Node::ProcessingInstruction(decode(&pi, position)?),
            Event::DocType(doctype) => Node::DocType(decode(&doctype, position)?),
            Event::Eof => break,
        };

        let is_element = matches!(node, Node::Element(_));
        let id = push(&mut nodes, node);
        place(&mut nodes, &open, &mut root, &mut prolog, &mut epilog, id, is_element)?;
    }

    if let Some(unclosed) = open.last() {
        let name = match &nodes[unclosed.0] {
            Node::Element(element) => element.name.clone(),
            _ => String::new(),
        };
        return Err(XmlError::Unclosed(name));
    }

    let root = root.ok_or(XmlError::NoRoot)?;
    Ok(Document {
        nodes,
        prolog,
        root,
        epilog,
    })
}

fn push(nodes: &mut Vec<Node>, node: Node) -> NodeId {
    nodes.push(node);
    NodeId(nodes.len() - 1)
}

/// Hang a freshly pushed node under the innermost open element, or at the
/// top level around the root.
fn place(
    nodes: &mut [Node],
    open: &[NodeId],
    root: &mut Option<NodeId>,
    prolog: &mut Vec<NodeId>,
    epilog: &mut Vec<NodeId>,
    id: NodeId,
    is_element: bool,
) -> Result<(), XmlError> {
    if let Some(parent) = open.last() {
        if let Node::Element(parent) = &mut nodes[parent.0] {
            parent.children.push(id);
        }
        return Ok(());
    }

    match (is_element, root.is_some()) {
        (true, true) => Err(XmlError::MultipleRoots),
        (true, false) => {
            *root = Some(id);
            Ok(())
        }
        (false, false) => {
            prolog.push(id);
            Ok(())
        }
        (false, true) => {
            epilog.push(id);
            Ok(())
        }
    }
}

fn element(start: &BytesStart<'_>, position: u64) -> Result<Element, XmlError> {
    let mut element = Element::new(decode(start.name().as_ref(), position)?);

    for attr in start.attributes() {
        let attr = attr.map_err(|err| XmlError::Syntax {
            message: err.to_string(),
            position,
        })?;
        let value = attr.unescape_value().map_err(|err| XmlError::Syntax {
            message: err.to_string(),
            position,
        })?;
        element.attributes.push(Attribute {
            name: decode(attr.key.as_ref(), position)?,
            value: value.into_owned(),
        });
    }

    Ok(element)
}

fn decode(bytes: &[u8], position: u64) -> Result<String, XmlError> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|err| XmlError::Syntax {
            message: err.to_string(),
            position,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_prolog_and_attributes() {
        let doc = parse(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <!-- managed by the cartridge -->\n\
             <server xmlns=\"urn:jboss:domain:1.0\" name=\"a &amp; b\"><extensions/></server>\n",
        )
        .unwrap();

        assert_eq!(doc.prolog().len(), 2);
        assert!(matches!(doc.node(doc.prolog()[0]), Node::Declaration(d) if d.contains("version")));
        assert!(matches!(doc.node(doc.prolog()[1]), Node::Comment(c) if c.contains("managed")));
        assert_eq!(doc.name(doc.root()), Some("server"));
        assert_eq!(doc.attribute(doc.root(), "xmlns"), Some("urn:jboss:domain:1.0"));
        assert_eq!(doc.attribute(doc.root(), "name"), Some("a & b"));
        assert!(doc.first_child_named(doc.root(), "extensions").is_some());
    }

    #[test]
    fn test_parse_rejects_mismatched_tags() {
        assert!(parse("<server><extensions></server>").is_err());
    }

    #[test]
    fn test_parse_rejects_unclosed_root() {
        assert!(parse("<server><extensions/>").is_err());
    }

    #[test]
    fn test_parse_rejects_multiple_roots() {
        assert!(matches!(
            parse("<server/><server/>"),
            Err(XmlError::MultipleRoots)
        ));
    }

    #[test]
    fn test_parse_rejects_empty_input() {
        assert!(matches!(parse("   \n"), Err(XmlError::NoRoot)));
    }

    #[test]
    fn test_parse_rejects_text_outside_root() {
        assert!(parse("<server/>trailing").is_err());
    }

    #[test]
    fn test_parse_unescapes_text() {
        let doc = parse("<server><name>Tom &lt;3 Jerry</name></server>").unwrap();
        let name = doc.first_child_named(doc.root(), "name").unwrap();
        let text = doc.element(name).unwrap().children[0];
        assert_eq!(doc.node(text), &Node::Text("Tom <3 Jerry".to_string()));
    }
}
