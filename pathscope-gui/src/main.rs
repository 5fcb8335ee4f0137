//! pathscope GUI - the inspector panel next to a live page preview
//!
//! Run with: cargo run --bin pathscope-gui [FILE]
//!
//! The left side draws the document body as nested boxes; the right side is
//! the inspector. Clicking a row selects the component and outlines its
//! element in the preview. The toolbar buttons add and remove marked
//! elements, which reaches the panel through its mutation observer.

mod preview;
mod theme;

use std::path::PathBuf;
use std::rc::Rc;

use anyhow::Result;
use clap::Parser;
use eframe::egui;
use pathscope_dom::NodeId;
use pathscope_html::{LoadedDocument, load_document, parse_html_string};
use pathscope_inspector::{ComponentNode, DetailView, InspectorConfig, Panel, PanelView};
use tracing_subscriber::EnvFilter;

use theme::{Palette, Theme};

/// Shown when no document is given on the command line.
const DEMO_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>pathscope demo</title></head>
<body>
  <header data-source-path="src/layout/Header.tsx">
    <h1>Storefront</h1>
    <nav data-source-path="src/layout/Nav.tsx">Home · Catalog · Cart</nav>
  </header>
  <main data-source-path="src/pages/Catalog.tsx">
    <div class="grid">
      <article data-source-path="src/components/ProductCard.tsx">
        <h2>Kettle</h2>
        <button data-source-path="src/components/AddToCart.tsx">Add to cart</button>
      </article>
      <article data-source-path="src/components/ProductCard.tsx">
        <h2>Teapot</h2>
        <button data-source-path="src/components/AddToCart.tsx">Add to cart</button>
      </article>
    </div>
  </main>
  <footer>Plain footer, not a component</footer>
</body>
</html>
"#;

/// Tree indentation in points per text column.
const INDENT_POINTS_PER_COLUMN: f32 = 6.0;

/// pathscope GUI - inspect source-path annotated pages interactively
#[derive(Parser, Debug)]
#[command(name = "pathscope-gui")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the HTML file to open (a demo page when omitted)
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Parse HTML string directly instead of a file
    #[arg(long, value_name = "HTML", conflicts_with = "path")]
    html: Option<String>,

    /// Marker attribute to scan for (overrides the config file)
    #[arg(long, value_name = "ATTR")]
    marker: Option<String>,

    /// TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// More logging on stderr (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => InspectorConfig::load(path)?,
        None => InspectorConfig::default(),
    };
    if let Some(marker) = &cli.marker {
        config.marker_attribute.clone_from(marker);
        config.validate()?;
    }

    let doc = if let Some(html) = &cli.html {
        parse_html_string(html)
    } else if let Some(path) = &cli.path {
        load_document(path)?
    } else {
        let mut doc = parse_html_string(DEMO_PAGE);
        doc.source_path = "demo".to_string();
        doc
    };
    tracing::info!(source = %doc.source_path, nodes = doc.dom.len(), "document loaded");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 760.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "pathscope",
        options,
        Box::new(move |cc| Ok(Box::new(InspectorApp::new(&cc.egui_ctx, doc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("GUI error: {e}"))
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Application state
struct InspectorApp {
    /// The inspected document. The app is its only writer.
    doc: LoadedDocument,

    panel: Panel,

    /// Elements added from the toolbar, most recent last.
    added: Vec<NodeId>,
    next_added: usize,

    status_message: String,
    theme: Theme,
    palette: Palette,
}

impl InspectorApp {
    fn new(ctx: &egui::Context, mut doc: LoadedDocument, config: InspectorConfig) -> Self {
        let theme = Theme::Dark;
        theme.apply(ctx);

        let mut panel = Panel::new(config);
        panel.connect(&mut doc.dom);
        let status_message = format!("{} components in {}", panel.tree().len(), doc.source_path);

        Self {
            doc,
            panel,
            added: Vec::new(),
            next_added: 1,
            status_message,
            theme,
            palette: theme.palette(),
        }
    }

    fn set_theme(&mut self, ctx: &egui::Context, theme: Theme) {
        self.theme = theme;
        self.palette = theme.palette();
        theme.apply(ctx);
    }

    fn refresh(&mut self) {
        self.panel.refresh(&self.doc.dom);
        self.status_message = format!("Refreshed: {} components", self.panel.tree().len());
    }

    fn select(&mut self, node: &Rc<ComponentNode>) {
        self.panel.select(&mut self.doc.dom, node);
        self.status_message = format!("Selected {}", node.source_path());
    }

    /// Append a marked element to the body.
    fn add_component(&mut self) {
        let dom = &mut self.doc.dom;
        let Some(body) = dom.body() else {
            self.status_message = "The document has no body".to_string();
            return;
        };
        let n = self.next_added;
        self.next_added += 1;

        let section = dom.create_element("section");
        let marker = self.panel.config().marker_attribute.clone();
        dom.set_attribute(section, &marker, &format!("demo/Added{n}.tsx"));
        let text = dom.create_text(&format!("Added component {n}"));
        dom.append_child(section, text);
        dom.append_child(body, section);

        self.added.push(section);
        tracing::debug!(n, "added component");
    }

    /// Remove the most recently added element.
    fn remove_component(&mut self) {
        let Some(element) = self.added.pop() else {
            return;
        };
        if let Some(parent) = self.doc.dom.parent(element) {
            self.doc.dom.remove_child(parent, element);
            tracing::debug!(?element, "removed component");
        }
    }

    fn show_toolbar(&mut self, ctx: &egui::Context) {
        let _ = egui::TopBottomPanel::top("toolbar")
            .frame(
                egui::Frame::none()
                    .fill(self.palette.surface)
                    .inner_margin(egui::Margin::symmetric(12.0, 8.0)),
            )
            .show(ctx, |ui| {
                let _ = ui.horizontal(|ui| {
                    if ui.button("↻ Refresh").on_hover_text("Rescan the document").clicked() {
                        self.refresh();
                    }
                    let _ = ui.separator();
                    if ui.button("Add component").clicked() {
                        self.add_component();
                    }
                    if ui
                        .add_enabled(!self.added.is_empty(), egui::Button::new("Remove component"))
                        .clicked()
                    {
                        self.remove_component();
                    }

                    let _ =
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui
                                .button(self.theme.icon())
                                .on_hover_text("Toggle theme")
                                .clicked()
                            {
                                let theme = self.theme.toggle();
                                self.set_theme(ctx, theme);
                            }
                            let _ = ui.label(
                                egui::RichText::new(&self.doc.source_path)
                                    .monospace()
                                    .color(self.palette.text_muted),
                            );
                        });
                });
            });
    }

    fn show_status_bar(&self, ctx: &egui::Context) {
        let _ = egui::TopBottomPanel::bottom("status_bar")
            .frame(
                egui::Frame::none()
                    .fill(self.palette.surface)
                    .inner_margin(egui::Margin::symmetric(12.0, 4.0)),
            )
            .show(ctx, |ui| {
                let _ = ui.horizontal(|ui| {
                    let _ = ui.label(
                        egui::RichText::new(&self.status_message)
                            .size(12.0)
                            .color(self.palette.text_muted),
                    );
                    let _ =
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            let _ = ui.label(
                                egui::RichText::new(format!(
                                    "{} DOM nodes \u{2022} {} scans",
                                    self.doc.dom.len(),
                                    self.panel.scan_count()
                                ))
                                .size(12.0)
                                .color(self.palette.text_muted),
                            );
                        });
                });
            });
    }

    /// The inspector side panel. Returns the node whose row was clicked.
    fn show_inspector(
        &self,
        ctx: &egui::Context,
        view: &PanelView,
    ) -> Option<Rc<ComponentNode>> {
        let palette = self.palette;
        let mut clicked = None;

        let _ = egui::SidePanel::right("inspector")
            .min_width(260.0)
            .default_width(360.0)
            .frame(
                egui::Frame::none()
                    .fill(palette.surface)
                    .inner_margin(egui::Margin::same(12.0)),
            )
            .show(ctx, |ui| {
                let _ = ui.label(
                    egui::RichText::new(format!("Components ({})", view.node_count))
                        .size(16.0)
                        .strong(),
                );
                let _ = ui.separator();

                let tree_height = if view.detail.is_some() {
                    ui.available_height() * 0.6
                } else {
                    ui.available_height()
                };
                let _ = egui::ScrollArea::vertical()
                    .max_height(tree_height)
                    .auto_shrink([false, true])
                    .show(ui, |ui| {
                        if view.rows.is_empty() {
                            let _ = ui.label(
                                egui::RichText::new("No marked elements")
                                    .color(palette.text_muted),
                            );
                        }
                        for row in &view.rows {
                            let _ = ui.horizontal(|ui| {
                                #[allow(clippy::cast_precision_loss)]
                                ui.add_space(row.indent as f32 * INDENT_POINTS_PER_COLUMN);
                                let label = egui::RichText::new(format!(
                                    "{} {}",
                                    row.tag_label(),
                                    row.node.source_path()
                                ))
                                .monospace();
                                if ui.selectable_label(row.selected, label).clicked() {
                                    clicked = Some(Rc::clone(&row.node));
                                }
                            });
                        }
                    });

                if let Some(detail) = &view.detail {
                    let _ = ui.separator();
                    show_detail(ui, detail, palette);
                }
            });

        clicked
    }

    fn show_preview(&mut self, ctx: &egui::Context) {
        let palette = self.palette;
        let dom = &self.doc.dom;

        let geometry = egui::CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(palette.canvas)
                    .inner_margin(egui::Margin::same(12.0)),
            )
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .auto_shrink(false)
                    .show(ui, |ui| {
                        let origin = ui.cursor().min;
                        let rects = dom
                            .body()
                            .map(|body| preview::show(ui, dom, body, palette))
                            .unwrap_or_default();
                        preview::to_dom_rects(&rects, origin)
                    })
                    .inner
            })
            .inner;

        self.doc.dom.clear_geometry();
        for (id, rect) in geometry {
            self.doc.dom.set_bounding_rect(id, rect);
        }
    }
}

fn show_detail(ui: &mut egui::Ui, detail: &DetailView, palette: Palette) {
    let _ = ui.label(egui::RichText::new(format!("Selected <{}>", detail.tag_name)).strong());
    ui.add_space(4.0);
    let _ = egui::Grid::new("detail")
        .num_columns(2)
        .spacing([12.0, 4.0])
        .show(ui, |ui| {
            for (key, value) in [
                ("path", detail.source_path.clone()),
                ("position", format!("{}, {}", detail.x, detail.y)),
                ("size", format!("{} x {}", detail.width, detail.height)),
                ("children", detail.child_count.to_string()),
            ] {
                let _ = ui.label(egui::RichText::new(key).color(palette.text_muted));
                let _ = ui.label(egui::RichText::new(value).monospace());
                ui.end_row();
            }
        });
}

impl eframe::App for InspectorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // One rescan per frame at most, however many mutations happened.
        if self.panel.process_mutations(&mut self.doc.dom) {
            self.status_message =
                format!("Document changed: {} components", self.panel.tree().len());
        }

        self.show_toolbar(ctx);
        self.show_status_bar(ctx);

        let view = self.panel.render(&self.doc.dom);
        if let Some(node) = self.show_inspector(ctx, &view) {
            self.select(&node);
        }

        self.show_preview(ctx);
    }
}
