//! Edge case tests for nysm-dom
//!
//! Selector resolution, detachment and re-parenting.

use nysm_dom::*;

// ============================================================================
// RESOLUTION
// ============================================================================

#[test]
fn test_invalid_selector_message() {
    let doc = Document::new();
    let err = doc.resolve(&Target::from(".missing")).unwrap_err();
    assert_eq!(err.to_string(), "An invalid selector was passed: \".missing\".");
}

#[test]
fn test_unparseable_selector_is_invalid() {
    let doc = Document::new();
    assert!(matches!(
        doc.resolve(&Target::from("div > p")),
        Err(DomError::InvalidSelector(_))
    ));
}

#[test]
fn test_detached_node_handle_passes_through() {
    let mut doc = Document::new();
    let orphan = doc.create_element("div");

    assert_eq!(doc.resolve(&Target::Node(orphan)), Ok(orphan));
    assert_eq!(doc.layout_rect(orphan), None);
}

#[test]
fn test_selector_skips_disconnected_elements() {
    let mut doc = Document::new();
    let orphan = doc.create_element("div");
    doc.set_id(orphan, "ghost").unwrap();

    assert_eq!(doc.query_selector("#ghost"), None);
    doc.append_child(doc.body(), orphan).unwrap();
    assert_eq!(doc.query_selector("#ghost"), Some(orphan));
}

// ============================================================================
// TREE MUTATION
// ============================================================================

#[test]
fn test_reparent_moves_subtree() {
    let mut doc = Document::new();
    let a = doc.create_element("section");
    let b = doc.create_element("section");
    let leaf = doc.create_element("p");
    doc.append_child(doc.body(), a).unwrap();
    doc.append_child(doc.body(), b).unwrap();
    doc.append_child(a, leaf).unwrap();

    doc.append_child(b, leaf).unwrap();
    doc.remove(a).unwrap();

    assert!(doc.is_connected(leaf));
    doc.remove(b).unwrap();
    assert!(!doc.is_connected(leaf));
}

#[test]
fn test_append_into_itself_is_rejected() {
    let mut doc = Document::new();
    let el = doc.create_element("div");
    doc.append_child(doc.body(), el).unwrap();
    doc.set_layout_rect(el, DOMRect::from_xywh(0.0, 0.0, 10.0, 10.0)).unwrap();

    let err = doc.append_child(el, el).unwrap_err();
    assert_eq!(err, DomError::HierarchyRequest { parent: el, child: el });

    // Tree is untouched and still walkable
    assert!(doc.is_connected(el));
    assert_eq!(doc.layout_rect(el), Some(DOMRect::from_xywh(0.0, 0.0, 10.0, 10.0)));
}

#[test]
fn test_append_ancestor_into_descendant_is_rejected() {
    let mut doc = Document::new();
    let outer = doc.create_element("section");
    let inner = doc.create_element("div");
    let leaf = doc.create_element("p");
    doc.append_child(doc.body(), outer).unwrap();
    doc.append_child(outer, inner).unwrap();
    doc.append_child(inner, leaf).unwrap();

    assert!(matches!(
        doc.append_child(leaf, outer),
        Err(DomError::HierarchyRequest { .. })
    ));
    assert!(matches!(
        doc.append_child(doc.body(), doc.document_element()),
        Err(DomError::HierarchyRequest { .. })
    ));
    assert!(doc.is_connected(leaf));
    assert_eq!(doc.computed_style(leaf), Some(ComputedStyle::default()));

    // Moving a descendant up is still fine
    doc.append_child(doc.body(), leaf).unwrap();
    assert!(doc.is_connected(leaf));
}

#[test]
fn test_style_survives_until_detach() {
    let mut doc = Document::new();
    let el = doc.create_element("div");
    doc.append_child(doc.body(), el).unwrap();
    let style = ComputedStyle::default().with_visibility(Visibility::Hidden);
    doc.set_style(el, style).unwrap();

    let window = Window::new(doc, 320.0, 480.0);
    assert_eq!(window.computed_style(el), Some(style));
    assert_eq!(window.inner_width(), 320.0);
    assert_eq!(window.inner_height(), 480.0);
}
