//! Tests for DOM tree structure, attributes, inline style and geometry.

use pathscope_dom::{DomRect, DomTree, NodeId};

/// Build `<html><body>` and return the body.
fn document_with_body(tree: &mut DomTree) -> NodeId {
    let html = tree.create_element("html");
    tree.append_child(NodeId::ROOT, html);
    let body = tree.create_element("body");
    tree.append_child(html, body);
    body
}

/// Append a fresh element under `parent`.
fn child(tree: &mut DomTree, parent: NodeId, tag: &str) -> NodeId {
    let id = tree.create_element(tag);
    tree.append_child(parent, id);
    id
}

// ========== structure ==========

#[test]
fn test_remove_middle_child_relinks_siblings() {
    let mut tree = DomTree::new();
    let parent = child(&mut tree, NodeId::ROOT, "div");
    let a = child(&mut tree, parent, "a");
    let b = child(&mut tree, parent, "b");
    let c = child(&mut tree, parent, "c");

    tree.remove_child(parent, b);

    assert_eq!(tree.children(parent), &[a, c]);
    assert_eq!(tree.next_sibling(a), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(a));
    assert_eq!(tree.parent(b), None);
    assert_eq!(tree.next_sibling(b), None);
}

#[test]
fn test_remove_non_child_is_ignored() {
    let mut tree = DomTree::new();
    let parent = child(&mut tree, NodeId::ROOT, "div");
    let other = child(&mut tree, NodeId::ROOT, "p");
    let a = child(&mut tree, other, "a");

    tree.remove_child(parent, a);

    assert_eq!(tree.parent(a), Some(other));
}

#[test]
fn test_insert_before_reference_and_at_end() {
    let mut tree = DomTree::new();
    let parent = child(&mut tree, NodeId::ROOT, "div");
    let a = child(&mut tree, parent, "a");
    let c = child(&mut tree, parent, "c");

    let b = tree.create_element("b");
    tree.insert_before(parent, b, Some(c));
    let d = tree.create_element("d");
    tree.insert_before(parent, d, None);

    assert_eq!(tree.children(parent), &[a, b, c, d]);
    assert_eq!(tree.prev_sibling(b), Some(a));
    assert_eq!(tree.next_sibling(b), Some(c));
    assert_eq!(tree.prev_sibling(d), Some(c));
}

#[test]
fn test_append_moves_attached_node() {
    let mut tree = DomTree::new();
    let first = child(&mut tree, NodeId::ROOT, "div");
    let second = child(&mut tree, NodeId::ROOT, "div");
    let moved = child(&mut tree, first, "span");

    tree.append_child(second, moved);

    assert!(tree.children(first).is_empty());
    assert_eq!(tree.children(second), &[moved]);
    assert_eq!(tree.parent(moved), Some(second));
}

#[test]
fn test_insert_into_own_subtree_is_ignored() {
    let mut tree = DomTree::new();
    let body = document_with_body(&mut tree);
    let div = child(&mut tree, body, "div");
    let span = child(&mut tree, div, "span");

    tree.insert_before(span, div, None);
    tree.append_child(div, div);

    assert_eq!(tree.parent(div), Some(body));
    assert_eq!(tree.children(div), &[span]);
    assert!(tree.children(span).is_empty());
    let order: Vec<NodeId> = tree.descendants(body).collect();
    assert_eq!(order, vec![div, span]);
}

#[test]
fn test_move_children_appends_after_existing() {
    let mut tree = DomTree::new();
    let from = child(&mut tree, NodeId::ROOT, "div");
    let to = child(&mut tree, NodeId::ROOT, "section");
    let existing = child(&mut tree, to, "x");
    let y = child(&mut tree, from, "y");
    let z = child(&mut tree, from, "z");

    tree.move_children(from, to);

    assert!(tree.children(from).is_empty());
    assert_eq!(tree.children(to), &[existing, y, z]);
    assert_eq!(tree.parent(z), Some(to));
    assert_eq!(tree.prev_sibling(y), Some(existing));
}

#[test]
fn test_descendants_are_in_tree_order() {
    let mut tree = DomTree::new();
    let body = document_with_body(&mut tree);
    let a = child(&mut tree, body, "a");
    let a1 = child(&mut tree, a, "a1");
    let a2 = child(&mut tree, a, "a2");
    let b = child(&mut tree, body, "b");
    let b1 = child(&mut tree, b, "b1");

    let order: Vec<NodeId> = tree.descendants(body).collect();

    assert_eq!(order, vec![a, a1, a2, b, b1]);
    assert!(tree.is_descendant_of(b1, body));
    assert!(!tree.is_descendant_of(body, b1));
}

#[test]
fn test_body_lookup() {
    let mut tree = DomTree::new();
    assert_eq!(tree.body(), None);

    let body = document_with_body(&mut tree);

    assert_eq!(tree.body(), Some(body));
    assert_eq!(tree.as_element(body).map(|e| e.tag_name.as_str()), Some("body"));
}

#[test]
fn test_create_element_lowercases_tag() {
    let mut tree = DomTree::new();
    let id = tree.create_element("SECTION");
    assert_eq!(tree.as_element(id).map(|e| e.tag_name.as_str()), Some("section"));
}

// ========== attributes and style ==========

#[test]
fn test_set_and_remove_attribute() {
    let mut tree = DomTree::new();
    let div = child(&mut tree, NodeId::ROOT, "div");

    tree.set_attribute(div, "Data-Source-Path", "src/App.tsx");
    assert_eq!(tree.get_attribute(div, "data-source-path"), Some("src/App.tsx"));

    tree.remove_attribute(div, "data-source-path");
    assert_eq!(tree.get_attribute(div, "data-source-path"), None);
}

#[test]
fn test_attributes_on_text_nodes_are_ignored() {
    let mut tree = DomTree::new();
    let text = tree.create_text("hi");
    tree.set_attribute(text, "id", "x");
    assert_eq!(tree.get_attribute(text, "id"), None);
    assert_eq!(tree.as_text(text), Some("hi"));
}

#[test]
fn test_style_property_round_trip_through_attribute() {
    let mut tree = DomTree::new();
    let div = child(&mut tree, NodeId::ROOT, "div");
    tree.set_attribute(div, "style", "color: red");

    tree.set_style_property(div, "outline", "2px solid blue");

    assert_eq!(tree.style_property(div, "outline"), "2px solid blue");
    assert_eq!(
        tree.get_attribute(div, "style"),
        Some("color: red; outline: 2px solid blue;")
    );
}

#[test]
fn test_setting_empty_style_value_removes_property() {
    let mut tree = DomTree::new();
    let div = child(&mut tree, NodeId::ROOT, "div");
    tree.set_style_property(div, "outline", "1px solid red");

    tree.set_style_property(div, "outline", "");

    assert_eq!(tree.style_property(div, "outline"), "");
    assert_eq!(tree.get_attribute(div, "style"), None);
}

#[test]
fn test_missing_style_property_is_empty_string() {
    let mut tree = DomTree::new();
    let div = child(&mut tree, NodeId::ROOT, "div");
    assert_eq!(tree.style_property(div, "outline"), "");
}

// ========== geometry ==========

#[test]
fn test_bounding_rect_defaults_to_zero() {
    let mut tree = DomTree::new();
    let div = child(&mut tree, NodeId::ROOT, "div");

    assert_eq!(tree.bounding_client_rect(div), DomRect::default());

    let rect = DomRect::new(1.5, 2.0, 30.0, 40.0);
    tree.set_bounding_rect(div, rect);
    assert_eq!(tree.bounding_client_rect(div), rect);

    tree.clear_geometry();
    assert_eq!(tree.bounding_client_rect(div), DomRect::default());
}
