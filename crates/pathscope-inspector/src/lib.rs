//! Developer-tools inspector for source-path annotated documents.
//!
//! Applications annotate the elements they render with a marker attribute
//! (by default `data-source-path`) naming the source file responsible for
//! them. This crate rebuilds the containment hierarchy of those elements and
//! keeps the state of an inspector panel over it:
//!
//! - **Scanner** ([`scanner`]) - marked elements → forest of [`ComponentNode`]s
//! - **Panel** ([`panel`]) - current forest, selection, rescans on mutation
//! - **Highlight** ([`highlight`]) - the outline written onto the host page
//! - **Rendering** ([`render`]) - a host-independent view of the panel
//! - **Configuration** ([`config`])
//!
//! Hosts own the [`DomTree`](pathscope_dom::DomTree) and drive the panel from
//! their event loop.

pub mod config;
pub mod highlight;
pub mod panel;
pub mod render;
pub mod scanner;

pub use config::{ConfigError, HighlightStyle, InspectorConfig};
pub use panel::Panel;
pub use render::{DetailView, PanelView, TreeRow};
pub use scanner::{ComponentForest, ComponentNode, DEFAULT_MARKER_ATTRIBUTE, Scanner};
