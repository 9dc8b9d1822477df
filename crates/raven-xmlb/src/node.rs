//! In-memory XMLB tree.

use crate::Value;

/// An element of the tree.
///
/// Attribute and child order is significant and is preserved through every
/// conversion. Neither attribute names nor child names need to be unique.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Tag name of the element.
    pub name: String,
    /// Attributes as name-value pairs, in file order.
    pub attributes: Vec<(String, Value)>,
    /// Child elements, in file order.
    pub children: Vec<Node>,
}

impl Node {
    /// Create a new element with no attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add an attribute to this node.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Add a child node.
    pub fn child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Add multiple children.
    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    /// Value of the first attribute with the given name.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Number of elements in this subtree, including this one.
    pub fn element_count(&self) -> usize {
        1 + self.children.iter().map(Node::element_count).sum::<usize>()
    }

    /// Number of levels in this subtree; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Node::depth).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_preserves_order() {
        let node = Node::new("stats")
            .attr("name", "ironman")
            .attr("level", 3)
            .attr("name", "duplicate")
            .child(Node::new("talent"))
            .child(Node::new("talent").attr("set", 2));

        let names: Vec<_> = node.attributes.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, ["name", "level", "name"]);
        assert_eq!(node.attribute("name"), Some(&Value::Str("ironman".to_string())));
        assert_eq!(node.children.len(), 2);
        assert_eq!(node.children[1].attribute("set"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_counts() {
        let leaf = Node::new("leaf");
        assert_eq!(leaf.element_count(), 1);
        assert_eq!(leaf.depth(), 1);

        let tree = Node::new("a")
            .child(Node::new("b").child(Node::new("c")))
            .children([Node::new("d"), Node::new("e")]);
        assert_eq!(tree.element_count(), 5);
        assert_eq!(tree.depth(), 3);
    }
}
