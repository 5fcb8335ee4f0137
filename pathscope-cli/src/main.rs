//! pathscope CLI
//!
//! A headless host for the inspector panel: load a document, lay it out,
//! attach a panel and print what it shows.

mod output;

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use pathscope_dom::layout::BlockLayout;
use pathscope_html::{LoadedDocument, format_tree, load_document, parse_html_string};
use pathscope_inspector::{InspectorConfig, Panel};
use tracing_subscriber::EnvFilter;

/// pathscope - print the source-path component tree of an HTML document
#[derive(Parser, Debug)]
#[command(name = "pathscope")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Component tree of a file
    pathscope ./index.html

    # Select a component and show where it is
    pathscope ./index.html --select src/components/Card.tsx

    # Inline HTML with a custom marker attribute
    pathscope --marker data-component --html '<div data-component="App"></div>'

    # Machine-readable tree
    pathscope ./index.html --json
"#)]
struct Cli {
    /// Path to the HTML file to inspect
    #[arg(value_name = "FILE", required_unless_present = "html")]
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

    /// Select the first component with this source path
    #[arg(long, value_name = "PATH")]
    select: Option<String>,

    /// Print the component tree as JSON
    #[arg(long)]
    json: bool,

    /// Also print the parsed DOM tree
    #[arg(long)]
    dom: bool,

    /// Viewport width used for layout
    #[arg(long, default_value = "1280")]
    width: u32,

    /// More logging on stderr (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli)?;
    let mut doc = load_doc(&cli)?;

    #[allow(clippy::cast_precision_loss)]
    let layout = BlockLayout {
        viewport_width: cli.width as f32,
        ..BlockLayout::default()
    };
    layout.run(&mut doc.dom);

    if cli.dom {
        println!("=== DOM Tree ===");
        print!("{}", format_tree(&doc.dom, doc.dom.root()));
        println!();
    }

    let mut panel = Panel::new(config);
    panel.connect(&mut doc.dom);

    if let Some(path) = &cli.select
        && !panel.select_path(&mut doc.dom, path)
    {
        bail!("no component with source path '{path}' in {}", doc.source_path);
    }

    if cli.json {
        let json = serde_json::to_string_pretty(panel.tree())
            .context("failed to serialize the component tree")?;
        println!("{json}");
        return Ok(());
    }

    let view = panel.render(&doc.dom);
    if std::io::stdout().is_terminal() {
        print!("{}", output::colored(&view));
    } else {
        print!("{view}");
    }

    if let Some(selected) = panel.selected() {
        let style = doc
            .dom
            .get_attribute(selected.element(), "style")
            .unwrap_or_default();
        println!("  style:    {style}");
    }

    Ok(())
}

/// Log to stderr so that stdout only carries the tree.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> Result<InspectorConfig> {
    let mut config = match &cli.config {
        Some(path) => InspectorConfig::load(path)?,
        None => InspectorConfig::default(),
    };
    if let Some(marker) = &cli.marker {
        config.marker_attribute.clone_from(marker);
        config.validate()?;
    }
    tracing::debug!(?config, "configuration");
    Ok(config)
}

/// Load document from CLI arguments
fn load_doc(cli: &Cli) -> Result<LoadedDocument> {
    if let Some(html) = &cli.html {
        Ok(parse_html_string(html))
    } else if let Some(path) = &cli.path {
        Ok(load_document(path)?)
    } else {
        bail!("a file path or --html is required")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_requires_input() {
        assert!(Cli::try_parse_from(["pathscope"]).is_err());
        assert!(Cli::try_parse_from(["pathscope", "page.html"]).is_ok());
        assert!(Cli::try_parse_from(["pathscope", "--html", "<p></p>"]).is_ok());
        assert!(Cli::try_parse_from(["pathscope", "page.html", "--html", "<p></p>"]).is_err());
    }

    #[test]
    fn test_marker_flag_overrides_default() {
        let cli = Cli::try_parse_from(["pathscope", "--html", "", "--marker", "data-component"])
            .expect("valid arguments");

        let config = load_config(&cli).expect("valid config");

        assert_eq!(config.marker_attribute, "data-component");
    }

    #[test]
    fn test_invalid_marker_flag_is_rejected() {
        let cli = Cli::try_parse_from(["pathscope", "--html", "", "--marker", "a b"])
            .expect("valid arguments");

        assert!(load_config(&cli).is_err());
    }

    #[test]
    fn test_verbosity_counts() {
        let cli = Cli::try_parse_from(["pathscope", "page.html", "-vv"]).expect("valid arguments");
        assert_eq!(cli.verbose, 2);
    }
}
