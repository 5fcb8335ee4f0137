//! Host-independent rendering of the panel.
//!
//! [`PanelView`] is what a host draws: the tree as flat, indented rows and
//! the detail view of the selection. Its `Display` impl is the plain-text
//! rendering used by terminals and tests.

use std::fmt;
use std::rc::Rc;

use pathscope_dom::{DomRect, DomTree};

use crate::panel::Panel;
use crate::scanner::ComponentNode;

/// One line of the rendered tree.
#[derive(Debug, Clone)]
pub struct TreeRow {
    /// The node this row shows; hosts pass it back to [`Panel::select`].
    pub node: Rc<ComponentNode>,
    /// Indentation in columns: depth times the configured indent width.
    pub indent: usize,
    /// Whether this row is the panel's selected node.
    pub selected: bool,
}

impl TreeRow {
    /// `<tag>` label.
    #[must_use]
    pub fn tag_label(&self) -> String {
        format!("<{}>", self.node.tag_name())
    }
}

/// Details of the selected node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    /// Tag name of the element.
    pub tag_name: String,
    /// Source path of the node.
    pub source_path: String,
    /// Left edge in whole pixels.
    pub x: i64,
    /// Top edge in whole pixels.
    pub y: i64,
    /// Width in whole pixels.
    pub width: i64,
    /// Height in whole pixels.
    pub height: i64,
    /// Number of direct children in the component tree.
    pub child_count: usize,
}

/// Everything the panel shows.
#[derive(Debug, Clone)]
pub struct PanelView {
    /// Total number of nodes in the tree.
    pub node_count: usize,
    /// Tree rows in display order.
    pub rows: Vec<TreeRow>,
    /// Present only while a node is selected.
    pub detail: Option<DetailView>,
}

pub(crate) fn render_panel(panel: &Panel, dom: &DomTree) -> PanelView {
    let indent_width = panel.config().indent_width;
    let mut rows = Vec::new();
    for root in panel.tree().roots() {
        push_rows(panel, root, indent_width, &mut rows);
    }

    PanelView {
        node_count: rows.len(),
        rows,
        detail: panel.selected().map(|node| render_detail(node, dom)),
    }
}

/// Pre-order walk: a node's row, then its children's rows in document order.
fn push_rows(
    panel: &Panel,
    node: &Rc<ComponentNode>,
    indent_width: usize,
    rows: &mut Vec<TreeRow>,
) {
    rows.push(TreeRow {
        node: Rc::clone(node),
        indent: node.depth() * indent_width,
        selected: panel.is_selected(node),
    });
    for child in node.children() {
        push_rows(panel, child, indent_width, rows);
    }
}

fn render_detail(node: &ComponentNode, dom: &DomTree) -> DetailView {
    let rect = dom.bounding_client_rect(node.element());
    let (x, y, width, height) = whole_pixels(rect);
    DetailView {
        tag_name: node.tag_name().to_string(),
        source_path: node.source_path().to_string(),
        x,
        y,
        width,
        height,
        child_count: node.children().len(),
    }
}

/// Round each coordinate to the nearest whole pixel, halves away from zero.
#[allow(clippy::cast_possible_truncation)]
fn whole_pixels(rect: DomRect) -> (i64, i64, i64, i64) {
    let round = |v: f32| v.round() as i64;
    (round(rect.x), round(rect.y), round(rect.width), round(rect.height))
}

impl fmt::Display for PanelView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Components ({})", self.node_count)?;
        for row in &self.rows {
            write!(
                f,
                "{:indent$}{} {}",
                "",
                row.tag_label(),
                row.node.source_path(),
                indent = row.indent
            )?;
            if row.selected {
                f.write_str("  [selected]")?;
            }
            writeln!(f)?;
        }
        if let Some(detail) = &self.detail {
            write!(f, "\n{detail}")?;
        }
        Ok(())
    }
}

impl fmt::Display for DetailView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Selected <{}>", self.tag_name)?;
        writeln!(f, "  path:     {}", self.source_path)?;
        writeln!(f, "  position: {}, {}", self.x, self.y)?;
        writeln!(f, "  size:     {} x {}", self.width, self.height)?;
        writeln!(f, "  children: {}", self.child_count)
    }
}
