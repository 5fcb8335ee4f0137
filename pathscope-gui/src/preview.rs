//! Page preview: the document body drawn as nested boxes.
//!
//! Each rendered element becomes a framed box holding its text and child
//! boxes. An inline `outline` (which is how the inspector highlights its
//! selection) is drawn as the box's stroke. The rectangle every box ends up
//! with is handed back so that the host can store it as element geometry.

use egui::{Color32, Margin, Pos2, Rect, RichText, Stroke};
use pathscope_dom::{DomRect, DomTree, NodeId};

use crate::theme::Palette;

/// Elements that generate no box.
const HIDDEN: &[&str] = &[
    "head", "link", "meta", "noscript", "script", "style", "template", "title",
];

/// Draw the descendants of `root` and return the screen rectangle of every
/// element box drawn.
pub fn show(
    ui: &mut egui::Ui,
    dom: &DomTree,
    root: NodeId,
    palette: Palette,
) -> Vec<(NodeId, Rect)> {
    let mut rects = Vec::new();
    for &child in dom.children(root) {
        show_node(ui, dom, child, palette, &mut rects);
    }
    rects
}

fn show_node(
    ui: &mut egui::Ui,
    dom: &DomTree,
    id: NodeId,
    palette: Palette,
    rects: &mut Vec<(NodeId, Rect)>,
) {
    if let Some(text) = dom.as_text(id) {
        let text = text.trim();
        if !text.is_empty() {
            let _ = ui.label(RichText::new(text).color(palette.text));
        }
        return;
    }
    let Some(element) = dom.as_element(id) else {
        return;
    };
    if HIDDEN.contains(&element.tag_name.as_str()) {
        return;
    }

    let stroke = outline_stroke(&dom.style_property(id, "outline"), palette.accent)
        .unwrap_or_else(|| Stroke::new(1.0, palette.border));

    let response = egui::Frame::none()
        .stroke(stroke)
        .inner_margin(Margin::same(6.0))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            let _ = ui.label(
                RichText::new(format!("<{}>", element.tag_name))
                    .small()
                    .monospace()
                    .color(palette.text_muted),
            );
            for &child in dom.children(id) {
                show_node(ui, dom, child, palette, rects);
            }
        })
        .response;
    rects.push((id, response.rect));
}

/// Convert screen rectangles into document geometry relative to `origin`.
pub fn to_dom_rects(rects: &[(NodeId, Rect)], origin: Pos2) -> Vec<(NodeId, DomRect)> {
    rects
        .iter()
        .map(|&(id, rect)| {
            let min = rect.min - origin;
            (id, DomRect::new(min.x, min.y, rect.width(), rect.height()))
        })
        .collect()
}

/// Read an `outline` shorthand such as `2px solid #3b82f6` into a stroke.
///
/// Only pixel widths are understood. A color that is not a `#rrggbb` or
/// `#rgb` hex value is drawn in `fallback`. Returns `None` for an empty or
/// `none` outline.
pub fn outline_stroke(value: &str, fallback: Color32) -> Option<Stroke> {
    if value.trim().is_empty() {
        return None;
    }
    let mut width = None;
    let mut color = None;
    for part in value.split_whitespace() {
        if part == "none" {
            return None;
        }
        if let Some(px) = part.strip_suffix("px") {
            width = px.parse::<f32>().ok();
        } else if let Some(hex) = part.strip_prefix('#') {
            color = parse_hex_color(hex);
        }
    }
    Some(Stroke::new(width.unwrap_or(1.0), color.unwrap_or(fallback)))
}

fn parse_hex_color(hex: &str) -> Option<Color32> {
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some(Color32::from_rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        3 => {
            let short = |i: usize| channel(&hex[i..=i]).map(|v| v * 17);
            Some(Color32::from_rgb(short(0)?, short(1)?, short(2)?))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_stroke_reads_width_and_color() {
        let stroke = outline_stroke("2px solid #3b82f6", Color32::RED).expect("stroke");
        assert!((stroke.width - 2.0).abs() < f32::EPSILON);
        assert_eq!(stroke.color, Color32::from_rgb(0x3b, 0x82, 0xf6));
    }

    #[test]
    fn test_outline_stroke_short_hex_and_fallback() {
        let short = outline_stroke("1px dotted #f00", Color32::BLUE).expect("stroke");
        assert_eq!(short.color, Color32::from_rgb(255, 0, 0));

        let named = outline_stroke("3px solid magenta", Color32::BLUE).expect("stroke");
        assert_eq!(named.color, Color32::BLUE);
        assert!((named.width - 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_outline_stroke_absent() {
        assert!(outline_stroke("", Color32::BLUE).is_none());
        assert!(outline_stroke("none", Color32::BLUE).is_none());
    }

    #[test]
    fn test_to_dom_rects_is_relative_to_origin() {
        let rects = [(
            NodeId(3),
            Rect::from_min_size(Pos2::new(110.0, 60.0), egui::vec2(200.0, 40.0)),
        )];

        let dom_rects = to_dom_rects(&rects, Pos2::new(100.0, 50.0));

        assert_eq!(dom_rects, vec![(NodeId(3), DomRect::new(10.0, 10.0, 200.0, 40.0))]);
    }
}
