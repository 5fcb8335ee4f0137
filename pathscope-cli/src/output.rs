//! Terminal rendering of the panel view.

use std::fmt::Write;

use owo_colors::OwoColorize;
use pathscope_inspector::PanelView;

/// The same text as `PanelView`'s `Display`, with ANSI colors.
pub fn colored(view: &PanelView) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {}",
        "Components".bold(),
        format!("({})", view.node_count).dimmed()
    );

    for row in &view.rows {
        let _ = write!(
            out,
            "{:indent$}{} {}",
            "",
            row.tag_label().cyan(),
            row.node.source_path(),
            indent = row.indent
        );
        if row.selected {
            let _ = write!(out, "  {}", "[selected]".yellow().bold());
        }
        out.push('\n');
    }

    if let Some(detail) = &view.detail {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{} {}",
            "Selected".bold(),
            format!("<{}>", detail.tag_name).cyan()
        );
        let _ = writeln!(out, "  {}     {}", "path:".dimmed(), detail.source_path);
        let _ = writeln!(out, "  {} {}, {}", "position:".dimmed(), detail.x, detail.y);
        let _ = writeln!(
            out,
            "  {}     {} x {}",
            "size:".dimmed(),
            detail.width,
            detail.height
        );
        let _ = writeln!(out, "  {} {}", "children:".dimmed(), detail.child_count);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathscope_html::parse_html_string;
    use pathscope_inspector::{InspectorConfig, Panel};

    fn strip_ansi(text: &str) -> String {
        let mut out = String::new();
        let mut chars = text.chars();
        while let Some(c) = chars.next() {
            if c == '\u{1b}' {
                for c in chars.by_ref() {
                    if c == 'm' {
                        break;
                    }
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    #[test]
    fn test_colored_matches_plain_text() {
        let mut dom = parse_html_string(
            r#"<div data-source-path="App.tsx"><p data-source-path="Card.tsx"></p></div>"#,
        )
        .dom;
        let mut panel = Panel::new(InspectorConfig::default());
        panel.connect(&mut dom);
        assert!(panel.select_path(&mut dom, "Card.tsx"));

        let view = panel.render(&dom);
        let colored = colored(&view);

        assert!(colored.contains('\u{1b}'));
        assert_eq!(strip_ansi(&colored), view.to_string());
    }
}
