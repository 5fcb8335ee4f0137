//! Inspector panel state.
//!
//! The panel holds the forest from the most recent scan and the selected
//! node. Hosts drive it from their event loop:
//!
//! ```text
//! attach        → Panel::connect          (scan + register observer)
//! DOM changed   → Panel::process_mutations (one rescan per delivered batch)
//! refresh click → Panel::refresh
//! node click    → Panel::select
//! repaint       → Panel::render
//! detach        → Panel::disconnect
//! ```
//!
//! Every call runs to completion before the host handles its next event, so
//! two rescans never overlap.

use std::rc::Rc;

use pathscope_dom::{DomTree, MutationObserverInit, NodeId, ObserverId};

use crate::config::InspectorConfig;
use crate::highlight;
use crate::render::{self, PanelView};
use crate::scanner::{ComponentForest, ComponentNode, Scanner};

/// State of one inspector panel.
#[derive(Debug)]
pub struct Panel {
    config: InspectorConfig,
    scanner: Scanner,
    component_tree: ComponentForest,
    // TODO: keep the selection across rescans by matching on element handle
    // once hosts can tell a re-render from a real removal.
    /// Compared by identity. A rescan replaces every node, so after one this
    /// never matches a node of the current tree.
    selected_node: Option<Rc<ComponentNode>>,
    observer: Option<ObserverId>,
    scan_count: u64,
}

impl Panel {
    /// Create a detached panel with an empty tree.
    #[must_use]
    pub fn new(config: InspectorConfig) -> Self {
        let scanner = Scanner::new(&config.marker_attribute);
        Self {
            config,
            scanner,
            component_tree: ComponentForest::default(),
            selected_node: None,
            observer: None,
            scan_count: 0,
        }
    }

    /// The configuration the panel was created with.
    #[must_use]
    pub const fn config(&self) -> &InspectorConfig {
        &self.config
    }

    /// Attach the panel to a document: scan immediately, then observe the
    /// body for added/removed nodes and marker attribute changes.
    ///
    /// The panel always inspects the document body, wherever the host
    /// mounts it. Without a body the whole document is observed so that a
    /// body added later is noticed. Connecting twice re-registers.
    pub fn connect(&mut self, dom: &mut DomTree) {
        if let Some(observer) = self.observer.take() {
            dom.disconnect(observer);
        }

        self.rescan(dom, "connected");

        let target = dom.body().unwrap_or(NodeId::ROOT);
        let options = MutationObserverInit::subtree_child_list()
            .with_attribute_filter([self.scanner.marker_attribute()]);
        self.observer = Some(dom.observe(target, options));
    }

    /// Detach from the document. Undelivered mutations are dropped.
    pub fn disconnect(&mut self, dom: &mut DomTree) {
        if let Some(observer) = self.observer.take() {
            dom.disconnect(observer);
            tracing::debug!("panel disconnected");
        }
    }

    /// Whether [`Panel::connect`] has registered an observer.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.observer.is_some()
    }

    /// Deliver pending mutation records. If there were any, rescan once and
    /// return `true`.
    ///
    /// Hosts call this once per turn of their event loop; however many
    /// mutations happened since the last call, they cause a single rescan.
    pub fn process_mutations(&mut self, dom: &mut DomTree) -> bool {
        let Some(observer) = self.observer else {
            return false;
        };
        let records = dom.take_records(observer);
        if records.is_empty() {
            return false;
        }
        tracing::trace!(records = records.len(), "delivering mutations");
        self.rescan(dom, "mutations");
        true
    }

    /// Manual refresh: an unconditional rescan.
    pub fn refresh(&mut self, dom: &DomTree) {
        self.rescan(dom, "refresh");
    }

    /// For hosts without mutation observers: tell the panel that the
    /// document changed. Rescans unconditionally.
    pub fn notify_changed(&mut self, dom: &DomTree) {
        self.rescan(dom, "external change");
    }

    fn rescan(&mut self, dom: &DomTree, reason: &'static str) {
        self.component_tree = match dom.body() {
            Some(body) => self.scanner.scan(dom, body),
            None => ComponentForest::default(),
        };
        self.scan_count += 1;
        tracing::debug!(reason, nodes = self.component_tree.len(), "rescanned");
    }

    /// Select `node` and move the highlight to its element.
    ///
    /// Every inline outline in the document is cleared first, including ones
    /// this panel did not set.
    pub fn select(&mut self, dom: &mut DomTree, node: &Rc<ComponentNode>) {
        let cleared = highlight::clear_highlights(dom);
        highlight::apply_highlight(dom, node.element(), &self.config.highlight);
        self.selected_node = Some(Rc::clone(node));
        tracing::debug!(path = node.source_path(), cleared, "selected node");
    }

    /// Select the first node of the current tree with `source_path`.
    /// Returns `false`, changing nothing, when there is none.
    pub fn select_path(&mut self, dom: &mut DomTree, source_path: &str) -> bool {
        let Some(node) = self.component_tree.find_by_path(source_path).cloned() else {
            return false;
        };
        self.select(dom, &node);
        true
    }

    /// The forest from the latest scan.
    #[must_use]
    pub const fn tree(&self) -> &ComponentForest {
        &self.component_tree
    }

    /// The selected node, which may belong to an earlier scan.
    #[must_use]
    pub const fn selected(&self) -> Option<&Rc<ComponentNode>> {
        self.selected_node.as_ref()
    }

    /// Whether `node` is the selected node. Identity, not equality: an
    /// equivalent node from a later scan is not selected.
    #[must_use]
    pub fn is_selected(&self, node: &Rc<ComponentNode>) -> bool {
        self.selected_node
            .as_ref()
            .is_some_and(|selected| Rc::ptr_eq(selected, node))
    }

    /// How many scans have run since the panel was created.
    #[must_use]
    pub const fn scan_count(&self) -> u64 {
        self.scan_count
    }

    /// Build the view for the current state, reading geometry live from
    /// `dom`.
    #[must_use]
    pub fn render(&self, dom: &DomTree) -> PanelView {
        render::render_panel(self, dom)
    }
}
