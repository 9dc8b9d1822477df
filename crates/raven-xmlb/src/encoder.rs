//! XMLB encoder.
//!
//! Element records refer to records that come later in the file: a parent
//! stores its first child's offset and every element stores its next
//! sibling's offset, and those positions depend on the size of everything in
//! between. Encoding therefore runs in two passes:
//!
//! 1. **Layout**: walk the tree in write order (an element, its attributes,
//!    its children's subtrees, then its next sibling) with a running byte
//!    cursor, recording each element's link offsets and interning every string.
//! 2. **Emission**: place the string table after the last record, then write
//!    the header, records and string bytes in that same order.

use std::io::Write;

use log::{debug, trace};
use zerocopy::IntoBytes;

use crate::string_table::{StringId, StringTable};
use crate::{AttributeRecord, ElementRecord, Error, Node, Result, XmlbHeader, MAX_DEPTH};

/// Encoder for a single XMLB document.
///
/// # Example
///
/// ```
/// use raven_xmlb::{Node, XmlbEncoder};
///
/// let root = Node::new("characters")
///     .child(Node::new("stats").attr("name", "storm").attr("level", 5))
///     .child(Node::new("stats").attr("name", "wolverine").attr("level", 5));
///
/// let bytes = XmlbEncoder::new(&root).encode().unwrap();
/// assert_eq!(&bytes[..4], &[0xB1, 0x11, 0x00, 0x00]);
/// ```
#[derive(Debug)]
pub struct XmlbEncoder<'a> {
    root: &'a Node,
}

impl<'a> XmlbEncoder<'a> {
    /// Create a new encoder for the given root node.
    pub fn new(root: &'a Node) -> Self {
        Self { root }
    }

    /// Encode to an in-memory buffer.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        self.write_to(&mut output)?;
        Ok(output)
    }

    /// Encode to a writer.
    ///
    /// Nothing is written unless layout and string encoding both succeed.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        let mut layout = Layout::new();
        layout.plan(self.root, true, 0)?;

        let elements = layout.elements;
        let string_count = layout.strings.len();
        let strings = layout.strings.finalize(layout.cursor)?;

        debug!(
            "encoding {} elements, {} unique strings, {} bytes",
            elements.len(),
            string_count,
            layout.cursor as usize + strings.bytes().len()
        );

        writer.write_all(XmlbHeader::new().as_bytes())?;

        for element in &elements {
            let record = ElementRecord::new(
                strings.offset(element.name),
                element.next_sibling_offset,
                element.first_child_offset,
                element.attributes.len() as u32,
            );
            writer.write_all(record.as_bytes())?;

            for &(name, value) in &element.attributes {
                let attribute = AttributeRecord::new(strings.offset(name), strings.offset(value));
                writer.write_all(attribute.as_bytes())?;
            }
        }

        writer.write_all(strings.bytes())?;

        Ok(())
    }
}

/// An element whose links are known but whose strings are not yet placed.
#[derive(Debug)]
struct PlannedElement {
    name: StringId,
    next_sibling_offset: i32,
    first_child_offset: i32,
    attributes: Vec<(StringId, StringId)>,
}

/// State of the layout pass.
#[derive(Debug)]
struct Layout {
    elements: Vec<PlannedElement>,
    strings: StringTable,
    cursor: u32,
}

impl Layout {
    fn new() -> Self {
        Self {
            elements: Vec::new(),
            strings: StringTable::new(),
            cursor: XmlbHeader::SIZE as u32,
        }
    }

    /// Lay out `node` and its subtree at the cursor.
    ///
    /// `is_last` is true when the node has no following sibling.
    fn plan(&mut self, node: &Node, is_last: bool, depth: usize) -> Result<()> {
        if depth >= MAX_DEPTH {
            return Err(Error::TooDeep { max: MAX_DEPTH });
        }

        let index = self.elements.len();
        let offset = self.cursor;

        let name = self.strings.intern(&node.name);
        let attributes = node
            .attributes
            .iter()
            .map(|(key, value)| {
                let key = self.strings.intern(key);
                let value = self.strings.intern(&value.to_string());
                (key, value)
            })
            .collect();

        self.elements.push(PlannedElement {
            name,
            next_sibling_offset: ElementRecord::NONE,
            first_child_offset: ElementRecord::NONE,
            attributes,
        });

        let record_size = node
            .attributes
            .len()
            .checked_mul(AttributeRecord::SIZE)
            .and_then(|size| size.checked_add(ElementRecord::SIZE))
            .ok_or(Error::TooLarge)?;
        self.advance(record_size)?;

        trace!("element {:?} at offset {}", node.name, offset);

        if !node.children.is_empty() {
            self.elements[index].first_child_offset = self.link()?;
        }

        let last = node.children.len().saturating_sub(1);
        for (i, child) in node.children.iter().enumerate() {
            self.plan(child, i == last, depth + 1)?;
        }

        if !is_last {
            self.elements[index].next_sibling_offset = self.link()?;
        }

        Ok(())
    }

    fn advance(&mut self, size: usize) -> Result<()> {
        self.cursor = u32::try_from(size)
            .ok()
            .and_then(|size| self.cursor.checked_add(size))
            .ok_or(Error::TooLarge)?;
        Ok(())
    }

    /// The cursor as a link value.
    fn link(&self) -> Result<i32> {
        i32::try_from(self.cursor).map_err(|_| Error::TooLarge)
    }
}
