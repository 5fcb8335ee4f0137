//! The selection highlight written onto the host page.
//!
//! The highlight lives in the inspected element's own inline style, not in
//! the panel. Any other script writing `outline` on the same elements races
//! with it; nothing here tries to detect that.

use pathscope_dom::{DomTree, NodeId};

use crate::config::HighlightStyle;

const OUTLINE: &str = "outline";
const OUTLINE_OFFSET: &str = "outline-offset";

/// Clear the outline of every element in the document whose inline
/// `outline` is non-empty. Returns how many elements were cleared.
///
/// The matching `outline-offset` is cleared along with it. Outlines set in
/// stylesheets are not inline style and are left alone.
pub fn clear_highlights(dom: &mut DomTree) -> usize {
    let outlined: Vec<NodeId> = dom
        .iter_all()
        .filter(|&id| !dom.style_property(id, OUTLINE).is_empty())
        .collect();

    for &id in &outlined {
        dom.remove_style_property(id, OUTLINE);
        dom.remove_style_property(id, OUTLINE_OFFSET);
    }

    if !outlined.is_empty() {
        tracing::trace!(count = outlined.len(), "cleared highlights");
    }
    outlined.len()
}

/// Outline `element` with `style`.
pub fn apply_highlight(dom: &mut DomTree, element: NodeId, style: &HighlightStyle) {
    dom.set_style_property(element, OUTLINE, &style.outline());
    dom.set_style_property(element, OUTLINE_OFFSET, &style.outline_offset());
}

/// Whether `element` currently carries an inline outline.
#[must_use]
pub fn is_highlighted(dom: &DomTree, element: NodeId) -> bool {
    !dom.style_property(element, OUTLINE).is_empty()
}
