//! DOM tree implementation for pathscope.
//!
//! This crate provides an arena-based DOM tree structure following the
//! [DOM Living Standard](https://dom.spec.whatwg.org/), extended with the
//! pieces a host page exposes to a developer-tools panel:
//!
//! - **Mutation observers** ([`mutation`]) - queued change records
//! - **Inline style** ([`style`]) - the `style` attribute as declarations
//! - **Geometry** ([`geometry`]) - per-element bounding rectangles
//! - **Layout** ([`layout`]) - a naive block-flow pass that fills geometry
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships,
//! providing O(1) access and traversal without borrow checker issues. Nodes are
//! never freed; a removed node simply has no parent.

pub mod geometry;
pub mod layout;
pub mod mutation;
pub mod style;

use std::collections::HashMap;

pub use geometry::DomRect;
pub use mutation::{MutationKind, MutationObserverInit, MutationRecord, ObserverId};
pub use style::InlineStyle;

use mutation::ObserverRegistry;

/// Map of attribute names to values for an element.
pub type AttributesMap = HashMap<String, String>;

/// A type-safe index into the DOM tree.
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
/// "Each node has an associated node document..."
///
/// Two `NodeId`s are equal exactly when they name the same node, so a
/// `NodeId` doubles as the node's identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root document node is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Node is an abstract interface that is used by all nodes in a tree."
#[derive(Debug, Clone)]
pub struct Node {
    /// "Each node has an associated node type"
    pub node_type: NodeType,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-parent)
    /// "An object that participates in a tree has a parent, which is either
    /// null or an object."
    pub parent: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-child)
    /// "A node has an associated list of children"
    pub children: Vec<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-next-sibling)
    pub next_sibling: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-previous-sibling)
    pub prev_sibling: Option<NodeId>,
}

impl Node {
    const fn detached(node_type: NodeType) -> Self {
        Self {
            node_type,
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
        }
    }
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Each node has an associated node type"
#[derive(Debug, Clone)]
pub enum NodeType {
    /// [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
    Document,
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    /// "Element nodes are simply known as elements."
    Element(ElementData),
    /// [§ 4.10 Interface Text](https://dom.spec.whatwg.org/#interface-text)
    Text(String),
    /// [§ 4.7 Interface Comment](https://dom.spec.whatwg.org/#interface-comment)
    Comment(String),
}

/// Element-specific data.
///
/// NOTE: We only store the local name and attributes. Namespaces and custom
/// element state are not modelled.
#[derive(Debug, Clone, Default)]
pub struct ElementData {
    /// "An element's local name"
    pub tag_name: String,
    /// "An element has an associated attribute list"
    pub attrs: AttributesMap,
}

impl ElementData {
    /// Create element data with the given local name and no attributes.
    #[must_use]
    pub fn new(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_ascii_lowercase(),
            attrs: AttributesMap::new(),
        }
    }

    /// Returns the element's id attribute value if present.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attrs.get("id").map(String::as_str)
    }

    /// [§ 4.9 hasAttribute](https://dom.spec.whatwg.org/#dom-element-hasattribute)
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    /// Parse the `style` attribute into its declarations.
    #[must_use]
    pub fn inline_style(&self) -> InlineStyle {
        self.attrs
            .get("style")
            .map(|s| InlineStyle::parse(s))
            .unwrap_or_default()
    }
}

/// Arena-based DOM tree with O(1) node access and traversal.
///
/// [§ 4 Nodes](https://dom.spec.whatwg.org/#nodes)
///
/// "The DOM represents a document as a tree."
///
/// Besides the nodes themselves the tree owns the state that hangs off them
/// in a browser: registered mutation observers and the last known bounding
/// rectangle of each element.
#[derive(Debug, Clone)]
pub struct DomTree {
    /// All nodes in the tree, indexed by `NodeId`.
    /// The Document node is always at index 0 (`NodeId::ROOT`).
    nodes: Vec<Node>,

    /// Registered mutation observers and their pending records.
    observers: ObserverRegistry,

    /// Bounding rectangles written by layout or by a host renderer.
    geometry: HashMap<NodeId, DomRect>,
}

impl DomTree {
    /// Create a new DOM tree with just the Document node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::detached(NodeType::Document)],
            observers: ObserverRegistry::default(),
            geometry: HashMap::new(),
        }
    }

    /// Get the root document node ID.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get the number of nodes ever allocated, attached or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty (should always have at least the Document).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet attached to the tree.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::detached(node_type));
        id
    }

    /// [§ 4.5 createElement](https://dom.spec.whatwg.org/#dom-document-createelement)
    ///
    /// "If this is an HTML document, then set localName to localName in ASCII
    /// lowercase."
    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.alloc(NodeType::Element(ElementData::new(tag_name)))
    }

    /// [§ 4.5 createTextNode](https://dom.spec.whatwg.org/#dom-document-createtextnode)
    pub fn create_text(&mut self, data: &str) -> NodeId {
        self.alloc(NodeType::Text(data.to_string()))
    }

    /// [§ 4.2.2 Append](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// "To append a node to a parent, pre-insert node into parent before null."
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.insert_before(parent, child, None);
    }

    /// [§ 4.2.3 Insert](https://dom.spec.whatwg.org/#concept-node-insert)
    ///
    /// Inserts `child` into `parent` before `reference`, or as the last child
    /// when `reference` is `None` or not a child of `parent`. A child that is
    /// already in the tree is removed from its old parent first.
    ///
    /// Inserting a node into itself or into one of its own descendants is
    /// refused, as [ensure pre-insertion validity](https://dom.spec.whatwg.org/#concept-node-ensure-pre-insertion-validity)
    /// does with a `HierarchyRequestError`.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        if parent == child || self.is_descendant_of(parent, child) {
            tracing::warn!(
                parent = parent.0,
                child = child.0,
                "refusing to insert a node into its own subtree"
            );
            return;
        }

        if let Some(old_parent) = self.parent(child) {
            self.remove_child(old_parent, child);
        }

        let index = reference
            .and_then(|r| self.nodes[parent.0].children.iter().position(|&c| c == r))
            .unwrap_or(self.nodes[parent.0].children.len());

        self.nodes[parent.0].children.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
        self.relink_siblings(parent);

        self.queue_mutation(MutationRecord::child_list(parent, vec![child], Vec::new()));
    }

    /// [§ 4.2.3 Remove](https://dom.spec.whatwg.org/#concept-node-remove)
    ///
    /// Removes `child` from `parent`. Does nothing if `child` is not a child
    /// of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        let Some(index) = self.nodes[parent.0].children.iter().position(|&c| c == child) else {
            return;
        };

        let _ = self.nodes[parent.0].children.remove(index);
        let node = &mut self.nodes[child.0];
        node.parent = None;
        node.prev_sibling = None;
        node.next_sibling = None;
        self.relink_siblings(parent);

        self.queue_mutation(MutationRecord::child_list(parent, Vec::new(), vec![child]));
    }

    /// Moves every child of `from` to the end of `to`, preserving order.
    ///
    /// Used by the tree builder when it has to wrap content in implied
    /// elements. Queues one removal record on `from` and one addition record
    /// on `to`.
    pub fn move_children(&mut self, from: NodeId, to: NodeId) {
        let moved = std::mem::take(&mut self.nodes[from.0].children);
        if moved.is_empty() {
            return;
        }

        for &child in &moved {
            self.nodes[child.0].parent = Some(to);
        }
        self.nodes[to.0].children.extend(moved.iter().copied());
        self.relink_siblings(to);

        self.queue_mutation(MutationRecord::child_list(from, Vec::new(), moved.clone()));
        self.queue_mutation(MutationRecord::child_list(to, moved, Vec::new()));
    }

    /// Recompute sibling links for all children of `parent`.
    fn relink_siblings(&mut self, parent: NodeId) {
        let children = self.nodes[parent.0].children.clone();
        for (i, &child) in children.iter().enumerate() {
            let node = &mut self.nodes[child.0];
            node.prev_sibling = i.checked_sub(1).map(|p| children[p]);
            node.next_sibling = children.get(i + 1).copied();
        }
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Get the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling)
    }

    /// Get the previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling)
    }

    /// [§ 4.2.6 Descendant](https://dom.spec.whatwg.org/#concept-tree-descendant)
    ///
    /// Check if `descendant` is a descendant of `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(descendant).any(|id| id == ancestor)
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Iterate over all descendants of a node in tree order, excluding the
    /// node itself.
    ///
    /// [§ 4.2 Tree order](https://dom.spec.whatwg.org/#concept-tree-order)
    /// "Tree order is preorder, depth-first traversal of a tree."
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> DescendantIterator<'_> {
        DescendantIterator {
            tree: self,
            stack: self.children(id).iter().rev().copied().collect(),
        }
    }

    /// Iterate over every node attached to the document, in tree order,
    /// starting with the document itself.
    pub fn iter_all(&self) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::once(NodeId::ROOT).chain(self.descendants(NodeId::ROOT))
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    fn as_element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.nodes.get_mut(id.0).and_then(|n| match &mut n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get text content if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// [§ 4.9 getAttribute](https://dom.spec.whatwg.org/#dom-element-getattribute)
    #[must_use]
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.as_element(id)
            .and_then(|e| e.attrs.get(name))
            .map(String::as_str)
    }

    /// [§ 4.9 setAttribute](https://dom.spec.whatwg.org/#dom-element-setattribute)
    ///
    /// Sets `name` to `value` on an element and queues an attributes record.
    /// Does nothing on non-element nodes.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        let Some(element) = self.as_element_mut(id) else {
            return;
        };
        let old_value = element.attrs.insert(name.clone(), value.to_string());
        self.queue_mutation(MutationRecord::attributes(id, name, old_value));
    }

    /// [§ 4.9 removeAttribute](https://dom.spec.whatwg.org/#dom-element-removeattribute)
    ///
    /// Removing an attribute that is not present queues nothing.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) {
        let name = name.to_ascii_lowercase();
        let Some(element) = self.as_element_mut(id) else {
            return;
        };
        if let Some(old_value) = element.attrs.remove(&name) {
            self.queue_mutation(MutationRecord::attributes(id, name, Some(old_value)));
        }
    }

    /// [CSSOM § 6.7 getPropertyValue](https://drafts.csswg.org/cssom/#dom-cssstyledeclaration-getpropertyvalue)
    ///
    /// Returns the value of an inline style property, or an empty string when
    /// the property is not set (matching `element.style.foo` in a browser).
    #[must_use]
    pub fn style_property(&self, id: NodeId, property: &str) -> String {
        self.as_element(id)
            .map(|e| e.inline_style().get(property).unwrap_or_default().to_string())
            .unwrap_or_default()
    }

    /// [CSSOM § 6.7 setProperty](https://drafts.csswg.org/cssom/#dom-cssstyledeclaration-setproperty)
    ///
    /// "If value is the empty string, invoke removeProperty() with property as
    /// argument and return."
    pub fn set_style_property(&mut self, id: NodeId, property: &str, value: &str) {
        let Some(element) = self.as_element(id) else {
            return;
        };
        let mut style = element.inline_style();
        if value.is_empty() {
            let _ = style.remove(property);
        } else {
            style.set(property, value);
        }
        self.write_style(id, &style);
    }

    /// [CSSOM § 6.7 removeProperty](https://drafts.csswg.org/cssom/#dom-cssstyledeclaration-removeproperty)
    pub fn remove_style_property(&mut self, id: NodeId, property: &str) {
        let Some(element) = self.as_element(id) else {
            return;
        };
        let mut style = element.inline_style();
        if style.remove(property).is_some() {
            self.write_style(id, &style);
        }
    }

    fn write_style(&mut self, id: NodeId, style: &InlineStyle) {
        if style.is_empty() {
            self.remove_attribute(id, "style");
        } else {
            self.set_attribute(id, "style", &style.to_string());
        }
    }

    /// [CSSOM View § 6 getBoundingClientRect](https://drafts.csswg.org/cssom-view/#dom-element-getboundingclientrect)
    ///
    /// Elements that have never been laid out report an all-zero rectangle,
    /// as a `display: none` element does in a browser.
    #[must_use]
    pub fn bounding_client_rect(&self, id: NodeId) -> DomRect {
        self.geometry.get(&id).copied().unwrap_or_default()
    }

    /// Record the bounding rectangle of an element, as computed by layout or
    /// by a host that draws the document itself.
    pub fn set_bounding_rect(&mut self, id: NodeId, rect: DomRect) {
        let _ = self.geometry.insert(id, rect);
    }

    /// Forget all recorded geometry.
    pub fn clear_geometry(&mut self) {
        self.geometry.clear();
    }

    /// [§ 3.1.1 The document element](https://html.spec.whatwg.org/multipage/dom.html#the-html-element-2)
    ///
    /// "The document element of a document is the element whose parent is that
    /// document, if it exists; otherwise null."
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(NodeId::ROOT)
            .iter()
            .find(|&&id| self.as_element(id).is_some())
            .copied()
    }

    /// [§ 3.1.3 The body element](https://html.spec.whatwg.org/multipage/dom.html#the-body-element-2)
    ///
    /// "The body element of a document is the first of the html element's children
    /// that is either a body element or a frameset element, or null if there is
    /// no such element."
    #[must_use]
    pub fn body(&self) -> Option<NodeId> {
        let html = self.document_element()?;

        self.children(html)
            .iter()
            .find(|&&id| {
                self.as_element(id)
                    .is_some_and(|e| e.tag_name == "body" || e.tag_name == "frameset")
            })
            .copied()
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Pre-order iterator over the descendants of a node.
pub struct DescendantIterator<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for DescendantIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
