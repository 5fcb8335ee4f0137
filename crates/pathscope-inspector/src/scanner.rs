//! Reconstructing the component hierarchy from marked elements.
//!
//! A *marked* element carries the marker attribute. The tree parent of a
//! marked element is its nearest marked DOM ancestor; unmarked elements in
//! between are skipped. The result is a forest spanning exactly the marked
//! elements, with children in document order.

use std::collections::HashMap;
use std::rc::Rc;

use pathscope_dom::{DomTree, NodeId};
use serde::Serialize;

/// Attribute scanned for when no other is configured.
pub const DEFAULT_MARKER_ATTRIBUTE: &str = "data-source-path";

/// One marked element and its position in the reconstructed hierarchy.
///
/// Nodes are shared (`Rc`) so that a panel can hold on to a selected node
/// while comparing it by identity against the nodes of later scans.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentNode {
    /// The DOM element. The tree owns it; this is only a handle.
    #[serde(skip)]
    element: NodeId,
    source_path: String,
    tag_name: String,
    depth: usize,
    children: Vec<Rc<ComponentNode>>,
}

impl ComponentNode {
    /// The element this node describes.
    #[must_use]
    pub const fn element(&self) -> NodeId {
        self.element
    }

    /// Value of the marker attribute.
    #[must_use]
    pub fn source_path(&self) -> &str {
        &self.source_path
    }

    /// Lower-cased tag name of the element.
    #[must_use]
    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    /// Number of marked ancestors; roots are at depth 0.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Direct children in document order.
    #[must_use]
    pub fn children(&self) -> &[Rc<Self>] {
        &self.children
    }

    fn same_shape(&self, other: &Self) -> bool {
        self.source_path == other.source_path
            && self.tag_name == other.tag_name
            && self.depth == other.depth
            && self.children.len() == other.children.len()
            && self
                .children
                .iter()
                .zip(&other.children)
                .all(|(a, b)| a.same_shape(b))
    }
}

/// The result of one scan: root nodes in document order.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct ComponentForest {
    roots: Vec<Rc<ComponentNode>>,
}

impl ComponentForest {
    /// Root nodes, i.e. marked elements with no marked ancestor.
    #[must_use]
    pub fn roots(&self) -> &[Rc<ComponentNode>] {
        &self.roots
    }

    /// True when the scan found no marked elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of nodes in the forest.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// All nodes in pre-order, which is also document order.
    pub fn iter(&self) -> impl Iterator<Item = &Rc<ComponentNode>> {
        let mut stack: Vec<&Rc<ComponentNode>> = self.roots.iter().rev().collect();
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    /// First node in document order with the given source path.
    #[must_use]
    pub fn find_by_path(&self, source_path: &str) -> Option<&Rc<ComponentNode>> {
        self.iter().find(|n| n.source_path == source_path)
    }

    /// The node describing `element`, if it is marked.
    #[must_use]
    pub fn find_by_element(&self, element: NodeId) -> Option<&Rc<ComponentNode>> {
        self.iter().find(|n| n.element == element)
    }

    /// Structural equality: same shape, tag names, paths and depths.
    /// Node identity and element handles are ignored.
    #[must_use]
    pub fn same_shape(&self, other: &Self) -> bool {
        self.roots.len() == other.roots.len()
            && self
                .roots
                .iter()
                .zip(&other.roots)
                .all(|(a, b)| a.same_shape(b))
    }
}

/// A marked element collected during the first pass of a scan.
struct Marked<'a> {
    element: NodeId,
    source_path: &'a str,
    tag_name: &'a str,
}

/// Builds [`ComponentForest`]s from a document.
#[derive(Debug, Clone)]
pub struct Scanner {
    marker_attribute: String,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER_ATTRIBUTE)
    }
}

impl Scanner {
    /// Create a scanner for the given marker attribute. Attribute names are
    /// case-insensitive in HTML, so the name is lower-cased.
    #[must_use]
    pub fn new(marker_attribute: &str) -> Self {
        Self {
            marker_attribute: marker_attribute.trim().to_ascii_lowercase(),
        }
    }

    /// The attribute this scanner looks for.
    #[must_use]
    pub fn marker_attribute(&self) -> &str {
        &self.marker_attribute
    }

    /// Scan the descendants of `root` (not `root` itself).
    ///
    /// Pure read of the DOM. Runs in O(n·d) for n marked elements at an
    /// average distance d from their nearest marked ancestor.
    #[must_use]
    pub fn scan(&self, dom: &DomTree, root: NodeId) -> ComponentForest {
        // Pass 1: every marked element, in document order.
        let marked: Vec<Marked<'_>> = dom
            .descendants(root)
            .filter_map(|id| {
                let element = dom.as_element(id)?;
                let source_path = element.attrs.get(&self.marker_attribute)?;
                Some(Marked {
                    element: id,
                    source_path,
                    tag_name: &element.tag_name,
                })
            })
            .collect();

        let index_of: HashMap<NodeId, usize> = marked
            .iter()
            .enumerate()
            .map(|(i, m)| (m.element, i))
            .collect();

        // Pass 2: nearest marked ancestor. An ancestor always precedes its
        // descendants in document order, so its depth is already final.
        let mut depths = vec![0usize; marked.len()];
        let mut child_lists: Vec<Vec<usize>> = vec![Vec::new(); marked.len()];
        let mut roots = Vec::new();

        for (i, m) in marked.iter().enumerate() {
            let parent = dom
                .ancestors(m.element)
                .find_map(|ancestor| index_of.get(&ancestor).copied());
            match parent {
                Some(p) => {
                    depths[i] = depths[p] + 1;
                    child_lists[p].push(i);
                }
                None => roots.push(i),
            }
        }

        // Pass 3: freeze bottom-up. Children come later in document order
        // than their parent, so walking backwards finishes them first.
        let mut frozen: Vec<Option<Rc<ComponentNode>>> = vec![None; marked.len()];
        for (i, m) in marked.iter().enumerate().rev() {
            let children = child_lists[i]
                .iter()
                .filter_map(|&c| frozen[c].take())
                .collect();
            frozen[i] = Some(Rc::new(ComponentNode {
                element: m.element,
                source_path: m.source_path.to_string(),
                tag_name: m.tag_name.to_ascii_lowercase(),
                depth: depths[i],
                children,
            }));
        }

        let forest = ComponentForest {
            roots: roots.iter().filter_map(|&r| frozen[r].take()).collect(),
        };

        tracing::debug!(
            marker = %self.marker_attribute,
            marked = marked.len(),
            roots = forest.roots.len(),
            "scanned document"
        );
        forest
    }
}
