//! XML form of XMLB trees.
//!
//! Elements map to XML elements and attributes to XML attributes, in order.
//! Attribute values are written as their stored text and re-typed on read
//! with the same inference the binary decoder uses, so an XML round trip
//! reproduces the binary file exactly.

use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use raven_xmlb::{Node, Value, MAX_DEPTH};

use crate::{Error, Layout, Result};

/// Convert a tree to an XML string.
pub fn to_string(node: &Node, layout: Layout) -> Result<String> {
    let mut output = Vec::new();
    to_writer(node, &mut output, layout)?;
    String::from_utf8(output).map_err(|e| Error::Xml(e.to_string()))
}

/// Write a tree as XML to a writer.
pub fn to_writer<W: Write>(node: &Node, writer: W, layout: Layout) -> Result<()> {
    let mut xml_writer = match layout {
        Layout::Pretty => Writer::new_with_indent(writer, b' ', 2),
        Layout::Compact => Writer::new(writer),
    };

    xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    write_element(&mut xml_writer, node)
}

/// Write a single element and its children.
fn write_element<W: Write>(writer: &mut Writer<W>, node: &Node) -> Result<()> {
    check_name(&node.name)?;

    let mut elem = BytesStart::new(node.name.as_str());
    for (key, value) in &node.attributes {
        check_name(key)?;
        let text = value.to_string();
        elem.push_attribute((key.as_str(), text.as_str()));
    }

    if node.children.is_empty() {
        writer.write_event(Event::Empty(elem))?;
        return Ok(());
    }

    writer.write_event(Event::Start(elem))?;

    for child in &node.children {
        write_element(writer, child)?;
    }

    writer.write_event(Event::End(BytesEnd::new(node.name.as_str())))?;

    Ok(())
}

/// XMLB accepts any string as a name; XML only accepts `Name` productions.
fn check_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => is_name_start(first) && chars.all(|c| is_name_start(c) || is_name_char(c)),
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(Error::InvalidName {
            name: name.to_string(),
        })
    }
}

fn is_name_start(c: char) -> bool {
    matches!(c,
        ':' | 'A'..='Z' | '_' | 'a'..='z'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}')
}

fn is_name_char(c: char) -> bool {
    matches!(c,
        '-' | '.' | '0'..='9' | '\u{B7}'
        | '\u{300}'..='\u{36F}'
        | '\u{203F}'..='\u{2040}')
}

/// Parse a tree from XML bytes.
pub fn from_slice(bytes: &[u8]) -> Result<Node> {
    from_str(std::str::from_utf8(bytes)?)
}

/// Parse a tree from XML text.
///
/// The document must contain exactly one root element. Declarations,
/// comments and processing instructions are skipped; non-whitespace text
/// content is rejected since XMLB has nowhere to store it.
pub fn from_str(xml: &str) -> Result<Node> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Node> = Vec::new();
    let mut roots: Vec<Node> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if stack.len() >= MAX_DEPTH {
                    return Err(Error::TooDeep { max: MAX_DEPTH });
                }
                stack.push(element_from_start(&e)?);
            }
            Ok(Event::Empty(e)) => {
                // Self-closing element
                if stack.len() >= MAX_DEPTH {
                    return Err(Error::TooDeep { max: MAX_DEPTH });
                }
                let node = element_from_start(&e)?;
                attach(&mut stack, &mut roots, node);
            }
            Ok(Event::End(_)) => {
                if let Some(node) = stack.pop() {
                    attach(&mut stack, &mut roots, node);
                }
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape().map_err(|e| Error::Xml(e.to_string()))?;
                reject_text(&stack, &text)?;
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(&e);
                reject_text(&stack, &text)?;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {} // Declarations, comments, doctypes, processing instructions
            Err(e) => return Err(Error::Xml(format!("XML parse error: {}", e))),
        }
    }

    if let Some(open) = stack.pop() {
        return Err(Error::UnclosedElement { name: open.name });
    }
    if roots.len() != 1 {
        return Err(Error::RootCount(roots.len()));
    }

    Ok(roots.remove(0))
}

/// Build an element with its attributes from a start or empty tag.
fn element_from_start(e: &BytesStart<'_>) -> Result<Node> {
    let name = e.name();
    let tag = std::str::from_utf8(name.as_ref())?;
    let mut node = Node::new(tag);

    // Repeated attribute names are legal in XMLB, so allow them here too.
    let mut attributes = e.attributes();
    attributes.with_checks(false);

    for attr in attributes {
        let attr = attr.map_err(|e| Error::Xml(e.to_string()))?;
        let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| Error::Xml(e.to_string()))?;
        node.attributes.push((key, Value::infer(&value)));
    }

    Ok(node)
}

/// Append a finished element to its parent, or to the document roots.
fn attach(stack: &mut [Node], roots: &mut Vec<Node>, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}

fn reject_text(stack: &[Node], text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Ok(());
    }
    Err(Error::TextContent {
        element: stack
            .last()
            .map_or_else(|| "document".to_string(), |node| node.name.clone()),
        text: text.to_string(),
    })
}
