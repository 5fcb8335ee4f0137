//! Tests for the panel: scanning on attach, selection and highlighting,
//! rescans driven by mutations, and rendering.

use pathscope_dom::{DomRect, DomTree, NodeId};
use pathscope_html::parse_html_string;
use pathscope_inspector::highlight::is_highlighted;
use pathscope_inspector::{HighlightStyle, InspectorConfig, Panel};

const NESTED: &str = r#"
<div data-source-path="A">
    <span data-source-path="B">
        <i><b data-source-path="C">text</b></i>
    </span>
</div>
"#;

fn attached(html: &str) -> (DomTree, Panel) {
    let mut dom = parse_html_string(html).dom;
    let mut panel = Panel::new(InspectorConfig::default());
    panel.connect(&mut dom);
    (dom, panel)
}

fn element_by_path(dom: &DomTree, path: &str) -> NodeId {
    dom.iter_all()
        .find(|&id| dom.get_attribute(id, "data-source-path") == Some(path))
        .expect("marked element exists")
}

// ========== attaching ==========

#[test]
fn test_connect_scans_immediately() {
    let (_dom, panel) = attached(NESTED);

    assert!(panel.is_connected());
    assert_eq!(panel.scan_count(), 1);
    assert_eq!(panel.tree().len(), 3);
    assert!(panel.selected().is_none());
}

#[test]
fn test_new_panel_is_detached_and_empty() {
    let panel = Panel::new(InspectorConfig::default());

    assert!(!panel.is_connected());
    assert!(panel.tree().is_empty());
    assert_eq!(panel.scan_count(), 0);
}

#[test]
fn test_connecting_twice_keeps_one_observer() {
    let (mut dom, mut panel) = attached(NESTED);
    panel.connect(&mut dom);
    assert_eq!(panel.scan_count(), 2);

    let body = dom.body().expect("body");
    let added = dom.create_element("p");
    dom.set_attribute(added, "data-source-path", "D");
    dom.append_child(body, added);

    assert!(panel.process_mutations(&mut dom));
    assert_eq!(panel.scan_count(), 3);
    assert!(!panel.process_mutations(&mut dom));
}

// ========== selection ==========

#[test]
fn test_select_highlights_the_element() {
    let (mut dom, mut panel) = attached(NESTED);
    let b = panel.tree().find_by_path("B").cloned().expect("B");

    panel.select(&mut dom, &b);

    let element = b.element();
    assert_eq!(dom.style_property(element, "outline"), "2px solid #3b82f6");
    assert_eq!(dom.style_property(element, "outline-offset"), "2px");
    assert_eq!(
        dom.get_attribute(element, "style"),
        Some("outline: 2px solid #3b82f6; outline-offset: 2px;")
    );
    assert!(panel.is_selected(&b));
}

#[test]
fn test_selecting_moves_the_highlight() {
    let (mut dom, mut panel) = attached(NESTED);
    let a = panel.tree().find_by_path("A").cloned().expect("A");
    let c = panel.tree().find_by_path("C").cloned().expect("C");

    panel.select(&mut dom, &a);
    panel.select(&mut dom, &c);

    assert!(!is_highlighted(&dom, a.element()));
    assert!(is_highlighted(&dom, c.element()));
    assert_eq!(dom.get_attribute(a.element(), "style"), None);
    assert!(!panel.is_selected(&a));
    assert!(panel.is_selected(&c));
}

#[test]
fn test_select_clears_foreign_outlines_but_keeps_other_styles() {
    let (mut dom, mut panel) = attached(
        r#"
        <p id="page" style="color: red; outline: 1px dotted green">page</p>
        <div data-source-path="A"></div>
        "#,
    );
    let page = dom
        .iter_all()
        .find(|&id| dom.as_element(id).and_then(|e| e.id()) == Some("page"))
        .expect("page element");
    let a = panel.tree().roots()[0].clone();

    panel.select(&mut dom, &a);

    assert!(!is_highlighted(&dom, page));
    assert_eq!(dom.style_property(page, "color"), "red");
    assert!(is_highlighted(&dom, a.element()));
}

#[test]
fn test_exactly_one_element_is_highlighted_after_select() {
    let (mut dom, mut panel) = attached(NESTED);
    for path in ["A", "B", "C", "B"] {
        assert!(panel.select_path(&mut dom, path));
        let highlighted = dom.iter_all().filter(|&id| is_highlighted(&dom, id)).count();
        assert_eq!(highlighted, 1);
    }
}

#[test]
fn test_custom_highlight_style() {
    let mut dom = parse_html_string(NESTED).dom;
    let config = InspectorConfig {
        highlight: HighlightStyle {
            width_px: 3,
            color: "magenta".to_string(),
        },
        ..InspectorConfig::default()
    };
    let mut panel = Panel::new(config);
    panel.connect(&mut dom);

    assert!(panel.select_path(&mut dom, "A"));

    let a = element_by_path(&dom, "A");
    assert_eq!(dom.style_property(a, "outline"), "3px solid magenta");
    assert_eq!(dom.style_property(a, "outline-offset"), "3px");
}

#[test]
fn test_select_preserves_other_inline_declarations() {
    let (mut dom, mut panel) = attached(
        r#"<div data-source-path="A" style="background-image: url(data:image/png;base64,AAAA); color: red"></div>
           <p data-source-path="B"></p>"#,
    );
    let a = element_by_path(&dom, "A");

    assert!(panel.select_path(&mut dom, "A"));
    assert_eq!(
        dom.style_property(a, "background-image"),
        "url(data:image/png;base64,AAAA)"
    );
    assert_eq!(dom.style_property(a, "color"), "red");
    assert_eq!(dom.style_property(a, "outline"), "2px solid #3b82f6");

    assert!(panel.select_path(&mut dom, "B"));
    assert!(!is_highlighted(&dom, a));
    assert_eq!(
        dom.get_attribute(a, "style"),
        Some("background-image: url(data:image/png;base64,AAAA); color: red;")
    );
}

#[test]
fn test_select_unknown_path_changes_nothing() {
    let (mut dom, mut panel) = attached(NESTED);
    assert!(panel.select_path(&mut dom, "A"));

    assert!(!panel.select_path(&mut dom, "nope"));

    let a = element_by_path(&dom, "A");
    assert!(is_highlighted(&dom, a));
    assert_eq!(panel.selected().map(|n| n.source_path()), Some("A"));
}

#[test]
fn test_selection_does_not_survive_a_rescan() {
    let (mut dom, mut panel) = attached(NESTED);
    assert!(panel.select_path(&mut dom, "B"));

    panel.refresh(&dom);

    let b = panel.tree().find_by_path("B").cloned().expect("B after rescan");
    assert!(!panel.is_selected(&b));
    assert!(panel.render(&dom).rows.iter().all(|row| !row.selected));
    // The stale node is still reported, and its highlight stays on the page.
    assert_eq!(panel.selected().map(|n| n.source_path()), Some("B"));
    assert!(is_highlighted(&dom, b.element()));
}

// ========== rescans ==========

#[test]
fn test_batched_mutations_cause_one_rescan() {
    let (mut dom, mut panel) = attached(NESTED);
    let body = dom.body().expect("body");

    for i in 0..5 {
        let child = dom.create_element("section");
        dom.set_attribute(child, "data-source-path", &format!("S{i}"));
        dom.append_child(body, child);
    }

    assert!(panel.process_mutations(&mut dom));
    assert_eq!(panel.scan_count(), 2);
    assert_eq!(panel.tree().len(), 8);
    assert!(!panel.process_mutations(&mut dom));
    assert_eq!(panel.scan_count(), 2);
}

#[test]
fn test_removal_deep_in_the_body_rescans() {
    let (mut dom, mut panel) = attached(NESTED);
    let c = element_by_path(&dom, "C");
    let parent = dom.parent(c).expect("C has a parent");

    dom.remove_child(parent, c);

    assert!(panel.process_mutations(&mut dom));
    assert!(panel.tree().find_by_path("C").is_none());
    assert_eq!(panel.tree().len(), 2);
}

#[test]
fn test_highlighting_does_not_trigger_a_rescan() {
    let (mut dom, mut panel) = attached(NESTED);

    assert!(panel.select_path(&mut dom, "A"));
    assert!(panel.select_path(&mut dom, "C"));

    assert!(!panel.process_mutations(&mut dom));
    assert_eq!(panel.scan_count(), 1);
}

#[test]
fn test_marker_attribute_changes_rescan_but_others_do_not() {
    let (mut dom, mut panel) = attached(r#"<div id="plain"></div><p data-source-path="P"></p>"#);
    let plain = dom
        .iter_all()
        .find(|&id| dom.get_attribute(id, "id") == Some("plain"))
        .expect("plain div");

    dom.set_attribute(plain, "class", "card");
    assert!(!panel.process_mutations(&mut dom));

    dom.set_attribute(plain, "data-source-path", "Plain");
    assert!(panel.process_mutations(&mut dom));
    assert!(panel.tree().find_by_path("Plain").is_some());

    let p = element_by_path(&dom, "P");
    dom.remove_attribute(p, "data-source-path");
    assert!(panel.process_mutations(&mut dom));
    assert_eq!(panel.tree().len(), 1);
}

#[test]
fn test_changes_outside_the_body_are_ignored() {
    let (mut dom, mut panel) = attached(
        r#"<head><title>page</title></head><body><div data-source-path="A"></div></body>"#,
    );
    let head = dom
        .iter_all()
        .find(|&id| dom.as_element(id).is_some_and(|e| e.tag_name == "head"))
        .expect("head element");

    let meta = dom.create_element("meta");
    dom.set_attribute(meta, "data-source-path", "Meta");
    dom.append_child(head, meta);

    assert!(!panel.process_mutations(&mut dom));
    assert_eq!(panel.scan_count(), 1);
}

#[test]
fn test_disconnect_stops_mutation_delivery() {
    let (mut dom, mut panel) = attached(NESTED);
    panel.disconnect(&mut dom);
    assert!(!panel.is_connected());

    let body = dom.body().expect("body");
    let added = dom.create_element("p");
    dom.set_attribute(added, "data-source-path", "D");
    dom.append_child(body, added);

    assert!(!panel.process_mutations(&mut dom));
    assert_eq!(panel.tree().len(), 3);
}

#[test]
fn test_refresh_and_notify_always_rescan() {
    let (mut dom, mut panel) = attached(NESTED);
    panel.disconnect(&mut dom);

    let body = dom.body().expect("body");
    let added = dom.create_element("p");
    dom.set_attribute(added, "data-source-path", "D");
    dom.append_child(body, added);

    panel.notify_changed(&dom);
    assert_eq!(panel.tree().len(), 4);
    panel.refresh(&dom);
    assert_eq!(panel.tree().len(), 4);
    assert_eq!(panel.scan_count(), 3);
}

#[test]
fn test_document_without_body_scans_empty() {
    let mut dom = DomTree::new();
    let html = dom.create_element("html");
    dom.append_child(NodeId::ROOT, html);
    let mut panel = Panel::new(InspectorConfig::default());

    panel.connect(&mut dom);
    assert!(panel.tree().is_empty());

    let body = dom.create_element("body");
    let marked = dom.create_element("div");
    dom.set_attribute(marked, "data-source-path", "Late");
    dom.append_child(body, marked);
    dom.append_child(html, body);

    assert!(panel.process_mutations(&mut dom));
    assert_eq!(panel.tree().len(), 1);
}

// ========== rendering ==========

#[test]
fn test_render_tree_rows() {
    let (dom, panel) = attached(NESTED);

    let view = panel.render(&dom);

    assert_eq!(view.node_count, 3);
    let indents: Vec<usize> = view.rows.iter().map(|r| r.indent).collect();
    assert_eq!(indents, vec![0, 2, 4]);
    assert_eq!(view.rows[1].tag_label(), "<span>");
    assert!(view.detail.is_none());
    assert_eq!(
        view.to_string(),
        "Components (3)\n<div> A\n  <span> B\n    <b> C\n"
    );
}

#[test]
fn test_render_empty_panel() {
    let (dom, panel) = attached("<p>nothing marked</p>");

    let view = panel.render(&dom);

    assert_eq!(view.node_count, 0);
    assert!(view.rows.is_empty());
    assert!(view.detail.is_none());
    assert_eq!(view.to_string(), "Components (0)\n");
}

#[test]
fn test_render_marks_selection_and_shows_details() {
    let (mut dom, mut panel) = attached(NESTED);
    let b = element_by_path(&dom, "B");
    dom.set_bounding_rect(b, DomRect::new(10.4, 20.5, 99.6, 30.49));
    assert!(panel.select_path(&mut dom, "B"));

    let view = panel.render(&dom);

    assert!(view.rows[1].selected);
    assert!(!view.rows[0].selected);
    let detail = view.detail.as_ref().expect("detail for selection");
    assert_eq!(detail.tag_name, "span");
    assert_eq!(detail.source_path, "B");
    assert_eq!((detail.x, detail.y), (10, 21));
    assert_eq!((detail.width, detail.height), (100, 30));
    assert_eq!(detail.child_count, 1);
    assert_eq!(
        view.to_string(),
        "Components (3)\n\
         <div> A\n  \
         <span> B  [selected]\n    \
         <b> C\n\
         \n\
         Selected <span>\n  \
         path:     B\n  \
         position: 10, 21\n  \
         size:     100 x 30\n  \
         children: 1\n"
    );
}

#[test]
fn test_detail_reads_geometry_live() {
    let (mut dom, mut panel) = attached(NESTED);
    assert!(panel.select_path(&mut dom, "C"));
    assert_eq!(panel.render(&dom).detail.map(|d| (d.width, d.height)), Some((0, 0)));

    let c = element_by_path(&dom, "C");
    dom.set_bounding_rect(c, DomRect::new(0.0, 0.0, 48.0, 18.0));

    assert_eq!(panel.render(&dom).detail.map(|d| (d.width, d.height)), Some((48, 18)));
}

#[test]
fn test_indent_width_comes_from_config() {
    let mut dom = parse_html_string(NESTED).dom;
    let config = InspectorConfig {
        indent_width: 4,
        ..InspectorConfig::default()
    };
    let mut panel = Panel::new(config);
    panel.connect(&mut dom);

    let indents: Vec<usize> = panel.render(&dom).rows.iter().map(|r| r.indent).collect();
    assert_eq!(indents, vec![0, 4, 8]);
}
