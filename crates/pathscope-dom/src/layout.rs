//! Naive block-flow layout.
//!
//! [CSS 2 § 9.4.1 Block formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#block-formatting)
//!
//! "In a block formatting context, boxes are laid out one after the other,
//! vertically, beginning at the top of a containing block."
//!
//! Every element is treated as a block box with a fixed padding and no
//! margins; every non-blank text run occupies one line. This is only good
//! enough to give headless documents plausible, nested geometry.

use crate::{DomRect, DomTree, NodeId, NodeType};

/// Elements that generate no box.
///
/// [§ 15.3.1 Hidden elements](https://html.spec.whatwg.org/multipage/rendering.html#hidden-elements)
const NON_RENDERED: &[&str] = &[
    "head", "link", "meta", "noscript", "script", "style", "template", "title",
];

/// Parameters of the block-flow pass.
#[derive(Debug, Clone, Copy)]
pub struct BlockLayout {
    /// Width of the initial containing block.
    pub viewport_width: f32,
    /// Padding applied on every side of every element box.
    pub padding: f32,
    /// Height of one line of text.
    pub line_height: f32,
}

impl Default for BlockLayout {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            padding: 8.0,
            line_height: 18.0,
        }
    }
}

impl BlockLayout {
    /// Lay out the whole document, replacing any previously recorded geometry.
    pub fn run(&self, tree: &mut DomTree) {
        tree.clear_geometry();
        if let Some(html) = tree.document_element() {
            let _ = self.layout_node(tree, html, 0.0, 0.0, self.viewport_width);
        }
    }

    /// Lay out `id` with its border-box top-left corner at (`x`, `y`).
    /// Returns the height it occupies in its parent's flow.
    fn layout_node(&self, tree: &mut DomTree, id: NodeId, x: f32, y: f32, width: f32) -> f32 {
        let tag = match tree.get(id).map(|n| &n.node_type) {
            Some(NodeType::Element(data)) => data.tag_name.clone(),
            Some(NodeType::Text(text)) if !text.trim().is_empty() => return self.line_height,
            _ => return 0.0,
        };
        if NON_RENDERED.contains(&tag.as_str()) {
            return 0.0;
        }

        let content_x = x + self.padding;
        let content_width = (width - 2.0 * self.padding).max(0.0);
        let mut cursor = y + self.padding;

        for child in tree.children(id).to_vec() {
            cursor += self.layout_node(tree, child, content_x, cursor, content_width);
        }

        let rect = DomRect::new(x, y, width.max(0.0), cursor + self.padding - y);
        tree.set_bounding_rect(id, rect);
        rect.height
    }
}
