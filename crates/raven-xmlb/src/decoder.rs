//! XMLB decoder.

use log::{debug, trace};
use raven_common::{codepage, BinaryReader};
use rustc_hash::FxHashSet;

use crate::{AttributeRecord, ElementRecord, Error, Node, Result, Value, XmlbHeader, MAX_DEPTH};

/// Decoder for a single XMLB document.
///
/// Structure is recovered by following the link offsets stored in each
/// element record. Every offset is bounds-checked, each element may be
/// reached only once, and nesting is capped at [`MAX_DEPTH`], so malformed
/// input produces an error rather than a panic or an endless walk.
#[derive(Debug)]
pub struct XmlbDecoder<'a> {
    reader: BinaryReader<'a>,
    visited: FxHashSet<u32>,
}

impl<'a> XmlbDecoder<'a> {
    /// Validate the header and prepare to decode.
    pub fn new(data: &'a [u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data);
        let header: XmlbHeader = reader.read_struct()?;

        let magic = header.magic.get();
        if magic != XmlbHeader::MAGIC {
            return Err(Error::InvalidMagic { actual: magic });
        }

        let version = header.version.get();
        if version != XmlbHeader::VERSION {
            return Err(Error::UnsupportedVersion(version));
        }

        Ok(Self {
            reader,
            visited: FxHashSet::default(),
        })
    }

    /// Decode the tree rooted at the record that follows the header.
    ///
    /// The tree is walked with an explicit stack of open elements, so
    /// nesting depth costs heap rather than call stack.
    pub fn decode(mut self) -> Result<Node> {
        let (root, first_child, next_sibling) = self.read_element(XmlbHeader::SIZE as u32)?;

        if let Some(next_sibling) = next_sibling {
            return Err(Error::MultipleRoots { next_sibling });
        }

        let mut stack: Vec<OpenElement> = Vec::new();
        let mut current = OpenElement {
            node: root,
            next_child: first_child,
        };

        loop {
            let next_child = current.next_child;
            match next_child {
                Some(offset) => {
                    if stack.len() + 1 >= MAX_DEPTH {
                        return Err(Error::TooDeep { max: MAX_DEPTH });
                    }
                    let (child, first_child, next_sibling) = self.read_element(offset)?;
                    current.next_child = next_sibling;
                    stack.push(current);
                    current = OpenElement {
                        node: child,
                        next_child: first_child,
                    };
                }
                None => match stack.pop() {
                    Some(mut parent) => {
                        parent.node.children.push(current.node);
                        current = parent;
                    }
                    None => break,
                },
            }
        }

        debug!(
            "decoded {} elements from {} bytes",
            self.visited.len(),
            self.reader.len()
        );

        Ok(current.node)
    }

    /// Read the element record at `offset` with its attributes.
    ///
    /// Returns the childless node plus its first-child and next-sibling links.
    fn read_element(&mut self, offset: u32) -> Result<(Node, Option<u32>, Option<u32>)> {
        if (offset as usize) < XmlbHeader::SIZE {
            return Err(Error::ElementInHeader { offset });
        }
        if !self.visited.insert(offset) {
            return Err(Error::CyclicOffset { offset });
        }

        self.reader.seek(offset as usize)?;
        let record: ElementRecord = self.reader.read_struct()?;

        let attribute_count = record.attribute_count.get();
        if attribute_count as usize > self.reader.remaining() / AttributeRecord::SIZE {
            return Err(Error::TruncatedAttributes {
                element: offset,
                count: attribute_count,
            });
        }

        let mut attributes = Vec::with_capacity(attribute_count as usize);
        for _ in 0..attribute_count {
            let attribute: AttributeRecord = self.reader.read_struct()?;
            let name = self.string(attribute.name_offset.get())?;
            let value = self.string(attribute.value_offset.get())?;
            attributes.push((name, Value::infer(&value)));
        }

        let name = self.string(record.name_offset.get())?;
        trace!("element {:?} at offset {}", name, offset);

        let node = Node {
            name,
            attributes,
            children: Vec::new(),
        };

        let first_child = link(offset, record.first_child_offset.get())?;
        let next_sibling = link(offset, record.next_sibling_offset.get())?;
        Ok((node, first_child, next_sibling))
    }

    /// Read and decode the NUL-terminated string at `offset`.
    fn string(&self, offset: u32) -> Result<String> {
        let bytes = self.reader.cstring_at(offset as usize)?;
        Ok(codepage::decode(bytes).into_owned())
    }
}

/// An element whose children are still being read.
struct OpenElement {
    node: Node,
    /// Offset of the next child to read, if any.
    next_child: Option<u32>,
}

/// Interpret a link field of the element at `element`.
fn link(element: u32, value: i32) -> Result<Option<u32>> {
    match value {
        ElementRecord::NONE => Ok(None),
        value if value < 0 => Err(Error::InvalidLink { element, value }),
        value => Ok(Some(value as u32)),
    }
}

#[cfg(test)]
mod tests {
    use zerocopy::IntoBytes;

    use super::*;
    use crate::{decode, encode};

    fn header() -> Vec<u8> {
        XmlbHeader::new().as_bytes().to_vec()
    }

    fn push_element(bytes: &mut Vec<u8>, name: u32, next: i32, child: i32, attributes: u32) {
        bytes.extend_from_slice(ElementRecord::new(name, next, child, attributes).as_bytes());
    }

    fn sample_tree() -> Node {
        Node::new("characters")
            .attr("version", 2)
            .child(
                Node::new("stats")
                    .attr("name", "ironman")
                    .attr("level", 3)
                    .attr("isteam", true)
                    .attr("scale", 1.25)
                    .child(Node::new("talent").attr("name", "flight").attr("level", 1))
                    .child(Node::new("talent").attr("name", "repulsor").attr("level", 2)),
            )
            .child(Node::new("stats").attr("name", "storm").attr("skin", "0102"))
            .child(Node::new("empty"))
    }

    #[test]
    fn test_tree_round_trip() {
        let tree = sample_tree();
        let decoded = decode(&encode(&tree).unwrap()).unwrap();
        assert_eq!(decoded, tree);
    }

    #[test]
    fn test_binary_round_trip_is_byte_identical() {
        let bytes = encode(&sample_tree()).unwrap();
        let reencoded = encode(&decode(&bytes).unwrap()).unwrap();
        assert_eq!(reencoded, bytes);
    }

    #[test]
    fn test_values_survive_as_text() {
        // Non-canonical numbers and capitalised booleans come back untouched.
        let tree = Node::new("stats")
            .attr("skin", "007")
            .attr("bonus", "+5")
            .attr("ratio", "1.50")
            .attr("flag", "True")
            .attr("blank", "");
        let decoded = decode(&encode(&tree).unwrap()).unwrap();

        assert_eq!(decoded, tree);
        assert_eq!(decoded.attribute("skin"), Some(&Value::Str("007".to_string())));
        assert_eq!(decoded.attribute("flag"), Some(&Value::Str("True".to_string())));
    }

    #[test]
    fn test_stats_scenario() {
        let tree = Node::new("stats")
            .attr("name", "ironman")
            .attr("level", 3)
            .attr("isteam", true);
        let decoded = decode(&encode(&tree).unwrap()).unwrap();

        assert_eq!(decoded.name, "stats");
        assert_eq!(
            decoded.attributes,
            vec![
                ("name".to_string(), Value::Str("ironman".to_string())),
                ("level".to_string(), Value::Int(3)),
                ("isteam".to_string(), Value::Bool(true)),
            ]
        );
        assert!(decoded.children.is_empty());
    }

    #[test]
    fn test_windows_1252_strings() {
        let tree = Node::new("menu").attr("title", "Héros – Équipe");
        let bytes = encode(&tree).unwrap();

        assert!(bytes.windows(2).any(|w| w == [0xC9, b'q']));
        assert_eq!(decode(&bytes).unwrap(), tree);
    }

    #[test]
    fn test_hand_built_file() {
        // root(a="1") { x, y }
        let mut bytes = header();
        let strings = 8 + 16 + 8 + 16 + 16;
        push_element(&mut bytes, strings, -1, 32, 1);
        bytes.extend_from_slice(AttributeRecord::new(strings + 5, strings + 7).as_bytes());
        push_element(&mut bytes, strings + 9, 48, -1, 0);
        push_element(&mut bytes, strings + 11, -1, -1, 0);
        bytes.extend_from_slice(b"root\0a\01\0x\0y\0");

        let node = decode(&bytes).unwrap();
        assert_eq!(node, Node::new("root").attr("a", 1).child(Node::new("x")).child(Node::new("y")));
    }

    #[test]
    fn test_invalid_magic() {
        let mut bytes = header();
        bytes[0] = 0xFF;
        assert!(matches!(decode(&bytes), Err(Error::InvalidMagic { .. })));
    }

    #[test]
    fn test_unsupported_version() {
        let mut bytes = header();
        bytes[4] = 2;
        assert!(matches!(decode(&bytes), Err(Error::UnsupportedVersion(2))));
    }

    #[test]
    fn test_truncated_input() {
        assert!(matches!(
            decode(&[0xB1, 0x11]),
            Err(Error::Common(raven_common::Error::UnexpectedEof { .. }))
        ));
        assert!(matches!(
            decode(&header()),
            Err(Error::Common(raven_common::Error::UnexpectedEof { .. }))
        ));
    }

    #[test]
    fn test_string_offset_out_of_bounds() {
        let mut bytes = header();
        push_element(&mut bytes, 500, -1, -1, 0);
        assert!(matches!(
            decode(&bytes),
            Err(Error::Common(raven_common::Error::OffsetOutOfBounds { offset: 500, .. }))
        ));
    }

    #[test]
    fn test_unterminated_string() {
        let mut bytes = header();
        push_element(&mut bytes, 24, -1, -1, 0);
        bytes.extend_from_slice(b"root");
        assert!(matches!(
            decode(&bytes),
            Err(Error::Common(raven_common::Error::MissingNullTerminator { offset: 24 }))
        ));
    }

    #[test]
    fn test_child_offset_out_of_bounds() {
        let mut bytes = header();
        push_element(&mut bytes, 24, -1, 4096, 0);
        bytes.extend_from_slice(b"root\0");
        assert!(matches!(
            decode(&bytes),
            Err(Error::Common(raven_common::Error::OffsetOutOfBounds { offset: 4096, .. }))
        ));
    }

    #[test]
    fn test_child_offset_in_header() {
        let mut bytes = header();
        push_element(&mut bytes, 24, -1, 4, 0);
        bytes.extend_from_slice(b"root\0");
        assert!(matches!(decode(&bytes), Err(Error::ElementInHeader { offset: 4 })));
    }

    #[test]
    fn test_invalid_link() {
        let mut bytes = header();
        push_element(&mut bytes, 24, -1, -7, 0);
        bytes.extend_from_slice(b"root\0");
        assert!(matches!(
            decode(&bytes),
            Err(Error::InvalidLink { element: 8, value: -7 })
        ));
    }

    #[test]
    fn test_sibling_cycle() {
        // root { child -> child -> ... }
        let mut bytes = header();
        push_element(&mut bytes, 40, -1, 24, 0);
        push_element(&mut bytes, 40, 24, -1, 0);
        bytes.extend_from_slice(b"node\0");
        assert!(matches!(decode(&bytes), Err(Error::CyclicOffset { offset: 24 })));
    }

    #[test]
    fn test_child_links_back_to_root() {
        let mut bytes = header();
        push_element(&mut bytes, 40, -1, 24, 0);
        push_element(&mut bytes, 40, -1, 8, 0);
        bytes.extend_from_slice(b"node\0");
        assert!(matches!(decode(&bytes), Err(Error::CyclicOffset { offset: 8 })));
    }

    #[test]
    fn test_multiple_roots() {
        let mut bytes = header();
        push_element(&mut bytes, 40, 24, -1, 0);
        push_element(&mut bytes, 40, -1, -1, 0);
        bytes.extend_from_slice(b"node\0");
        assert!(matches!(decode(&bytes), Err(Error::MultipleRoots { next_sibling: 24 })));
    }

    #[test]
    fn test_attribute_count_past_end() {
        let mut bytes = header();
        push_element(&mut bytes, 24, -1, -1, u32::MAX);
        bytes.extend_from_slice(b"root\0");
        assert!(matches!(
            decode(&bytes),
            Err(Error::TruncatedAttributes { element: 8, count: u32::MAX })
        ));
    }

    /// A file whose elements nest `levels` deep, each the only child of the last.
    fn chain(levels: u32) -> Vec<u8> {
        let strings = 8 + 16 * levels;
        let mut bytes = header();
        for i in 0..levels {
            let child = if i + 1 < levels { (8 + 16 * (i + 1)) as i32 } else { -1 };
            push_element(&mut bytes, strings, -1, child, 0);
        }
        bytes.extend_from_slice(b"n\0");
        bytes
    }

    #[test]
    fn test_nesting_at_limit() {
        let node = decode(&chain(MAX_DEPTH as u32)).unwrap();
        assert_eq!(node.depth(), MAX_DEPTH);
        assert_eq!(node.element_count(), MAX_DEPTH);
    }

    #[test]
    fn test_nesting_too_deep() {
        assert!(matches!(
            decode(&chain(MAX_DEPTH as u32 + 1)),
            Err(Error::TooDeep { max: MAX_DEPTH })
        ));
        assert!(matches!(decode(&chain(4 * MAX_DEPTH as u32)), Err(Error::TooDeep { .. })));
    }
}
