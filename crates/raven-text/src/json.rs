//! JSON form of XMLB trees.
//!
//! A tree is written as an object with one key, the root element's name,
//! whose value is the element body: every attribute as a key with a native
//! JSON scalar, followed by every child as a key holding that child's body.
//!
//! ```json
//! {
//!     "roster": {
//!         "version": 2,
//!         "stats": {
//!             "name": "ironman"
//!         },
//!         "stats": {
//!             "name": "storm"
//!         }
//!     }
//! }
//! ```
//!
//! Repeated sibling tags produce repeated keys. Both directions here keep
//! every key in order, but other JSON tools usually keep only the last
//! duplicate, so XML is the safer format for hand-editing such trees.

use std::fmt;
use std::io::Write;

use raven_xmlb::{Node, Value};
use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::ser::PrettyFormatter;

use crate::{Error, Layout, Result};

/// Deepest tree the JSON form carries.
///
/// serde_json's reader stops at 127 nested objects, and the document object
/// wrapping the root takes one of them.
pub const MAX_DEPTH: usize = 126;

/// Convert a tree to a JSON string.
pub fn to_string(node: &Node, layout: Layout) -> Result<String> {
    let mut output = Vec::new();
    to_writer(node, &mut output, layout)?;
    Ok(String::from_utf8(output).map_err(|e| e.utf8_error())?)
}

/// Write a tree as JSON to a writer.
///
/// Trees deeper than [`MAX_DEPTH`] are rejected before anything is written,
/// since [`from_str`] could not read them back.
pub fn to_writer<W: Write>(node: &Node, writer: W, layout: Layout) -> Result<()> {
    if node.depth() > MAX_DEPTH {
        return Err(Error::TooDeep { max: MAX_DEPTH });
    }

    match layout {
        Layout::Pretty => {
            let formatter = PrettyFormatter::with_indent(b"    ");
            let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
            Document(node).serialize(&mut serializer)?;
        }
        Layout::Compact => {
            let mut serializer = serde_json::Serializer::new(writer);
            Document(node).serialize(&mut serializer)?;
        }
    }
    Ok(())
}

/// Parse a tree from JSON text.
pub fn from_str(text: &str) -> Result<Node> {
    let entry: Entry = serde_json::from_str(text)?;
    into_root(entry)
}

/// Parse a tree from JSON bytes.
pub fn from_slice(bytes: &[u8]) -> Result<Node> {
    let entry: Entry = serde_json::from_slice(bytes)?;
    into_root(entry)
}

fn into_root(entry: Entry) -> Result<Node> {
    let Entry::Element(mut entries) = entry else {
        return Err(Error::NotAnObject);
    };
    if entries.len() != 1 {
        return Err(Error::RootCount(entries.len()));
    }

    match entries.pop() {
        Some((name, Entry::Element(body))) => Ok(into_node(name, body)),
        Some((name, Entry::Scalar(_))) => Err(Error::ScalarRoot { name }),
        None => Err(Error::RootCount(0)),
    }
}

fn into_node(name: String, body: Vec<(String, Entry)>) -> Node {
    let mut node = Node::new(name);
    for (key, entry) in body {
        match entry {
            Entry::Scalar(value) => node.attributes.push((key, value)),
            Entry::Element(body) => node.children.push(into_node(key, body)),
        }
    }
    node
}

/// The top-level `{"root": {...}}` object.
struct Document<'a>(&'a Node);

impl Serialize for Document<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.0.name, &Body(self.0))?;
        map.end()
    }
}

/// An element body: attributes, then children, as one ordered object.
struct Body<'a>(&'a Node);

impl Serialize for Body<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let node = self.0;
        let mut map = serializer.serialize_map(Some(node.attributes.len() + node.children.len()))?;
        for (key, value) in &node.attributes {
            map.serialize_entry(key, &Scalar(value))?;
        }
        for child in &node.children {
            map.serialize_entry(&child.name, &Body(child))?;
        }
        map.end()
    }
}

struct Scalar<'a>(&'a Value);

impl Serialize for Scalar<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.0 {
            Value::Int(int) => serializer.serialize_i64(*int),
            Value::Float(float) if float.is_finite() => serializer.serialize_f64(*float),
            // JSON has no spelling for NaN or infinity; keep the stored text.
            Value::Float(_) => serializer.collect_str(self.0),
            Value::Bool(flag) => serializer.serialize_bool(*flag),
            Value::Str(text) => serializer.serialize_str(text),
        }
    }
}

/// A parsed JSON value: either an attribute scalar or an element body.
///
/// Objects are collected as ordered pair lists so repeated keys survive.
enum Entry {
    Scalar(Value),
    Element(Vec<(String, Entry)>),
}

impl<'de> Deserialize<'de> for Entry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(EntryVisitor)
    }
}

struct EntryVisitor;

impl<'de> Visitor<'de> for EntryVisitor {
    type Value = Entry;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a string, number, boolean or object")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Entry, E> {
        Ok(Entry::Scalar(Value::Bool(v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Entry, E> {
        Ok(Entry::Scalar(Value::Int(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Entry, E> {
        // Above i64::MAX: keep the digits rather than lose precision.
        Ok(Entry::Scalar(match i64::try_from(v) {
            Ok(int) => Value::Int(int),
            Err(_) => Value::Str(v.to_string()),
        }))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Entry, E> {
        Ok(Entry::Scalar(Value::Float(v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Entry, E> {
        Ok(Entry::Scalar(Value::Str(v.to_string())))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Entry, E> {
        Ok(Entry::Scalar(Value::Str(v)))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Entry, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<String, Entry>()? {
            entries.push((key, value));
        }
        Ok(Entry::Element(entries))
    }
}
