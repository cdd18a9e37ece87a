use super::*;

fn sample() -> DomTree {
    DomTree::from_nodes(&[Node::element("html").with_children([
        Node::element("head").with_child(Node::element("title").with_child(Node::text("t"))),
        Node::element("body").with_children([
            Node::element("form").with_children([
                Node::element("input").with_attr("id", "code"),
                Node::text("  "),
                Node::element("button").with_attr("id", "go"),
            ]),
            Node::comment("ad slot"),
            Node::element("iframe").with_attr("id", "frame"),
        ]),
    ])])
}

#[test]
fn materializes_nodes_in_document_order() {
    let tree = sample();
    let names: Vec<_> = tree
        .descendants(tree.document())
        .filter_map(|id| tree.element_name(id))
        .collect();
    assert_eq!(
        names,
        ["html", "head", "title", "body", "form", "input", "button", "iframe"]
    );
}

#[test]
fn previous_element_sibling_skips_text_and_comments() {
    let tree = sample();
    let iframe = tree.element_by_id("frame").unwrap();
    let form = tree.previous_element_sibling(iframe).unwrap();
    assert!(tree.has_tag(form, "form"));
    assert_eq!(tree.previous_element_sibling(form), None);

    let button = tree.element_by_id("go").unwrap();
    let input = tree.previous_element_sibling(button).unwrap();
    assert_eq!(tree.attr(input, "id"), Some("code"));
}

#[test]
fn body_and_parent_element() {
    let tree = sample();
    let body = tree.body().unwrap();
    let iframe = tree.element_by_id("frame").unwrap();
    assert_eq!(tree.parent_element(iframe), Some(body));

    let html = tree.parent_element(body).unwrap();
    assert!(tree.has_tag(html, "html"));
    // The document node is not an element.
    assert_eq!(tree.parent_element(html), None);
    assert_eq!(tree.parent(html), Some(Id::DOCUMENT));
}

#[test]
fn attributes_are_case_insensitive_and_replaceable() {
    let mut tree = sample();
    let input = tree.element_by_id("code").unwrap();
    assert_eq!(tree.attr(input, "ID"), Some("code"));

    tree.set_attr(input, "Type", Some("text".to_string())).unwrap();
    assert_eq!(tree.attr(input, "type"), Some("text"));
    tree.set_attr(input, "type", Some("hidden".to_string())).unwrap();
    assert_eq!(tree.attr(input, "type"), Some("hidden"));

    tree.set_attr(input, "disabled", None).unwrap();
    assert!(tree.has_attr(input, "disabled"));
    assert_eq!(tree.attr(input, "disabled"), None);
    assert!(tree.remove_attr(input, "disabled").unwrap());
    assert!(!tree.remove_attr(input, "disabled").unwrap());
}

#[test]
fn style_properties_overwrite_in_place() {
    let mut tree = sample();
    let button = tree.element_by_id("go").unwrap();
    tree.set_style_property(button, "opacity", "0.5").unwrap();
    tree.set_style_property(button, "Opacity", "1").unwrap();
    assert_eq!(tree.style_property(button, "opacity"), Some("1"));
    assert_eq!(tree.style_property(button, "cursor"), None);
}

#[test]
fn element_only_operations_reject_text_nodes() {
    let mut tree = DomTree::new();
    let text = tree.create_text("x");
    assert_eq!(
        tree.set_attr(text, "id", None),
        Err(TreeError::WrongNodeKind(text))
    );
    let el = tree.create_element("div");
    assert_eq!(
        tree.append_child(text, el),
        Err(TreeError::InvalidParent(text))
    );
}

#[test]
fn append_child_rejects_cycles_and_double_parents() {
    let mut tree = DomTree::new();
    let outer = tree.create_element("div");
    let inner = tree.create_element("span");
    tree.append_child(tree.document(), outer).unwrap();
    tree.append_child(outer, inner).unwrap();

    assert_eq!(
        tree.append_child(tree.document(), inner),
        Err(TreeError::AlreadyAttached(inner))
    );

    let loose = tree.create_element("p");
    let bold = tree.create_element("b");
    tree.append_child(loose, bold).unwrap();
    assert_eq!(
        tree.append_child(loose, loose),
        Err(TreeError::CycleDetected {
            parent: loose,
            child: loose
        })
    );
}

#[test]
fn insert_before_places_child_ahead_of_sibling() {
    let mut tree = sample();
    let body = tree.body().unwrap();
    let iframe = tree.element_by_id("frame").unwrap();
    let note = tree.create_element("p");
    tree.insert_before(body, note, iframe).unwrap();
    assert_eq!(tree.previous_element_sibling(iframe), Some(note));

    let stray = tree.create_element("p");
    let input = tree.element_by_id("code").unwrap();
    assert_eq!(
        tree.insert_before(body, stray, input),
        Err(TreeError::InvalidSibling {
            parent: body,
            before: input
        })
    );
}

#[test]
fn remove_retires_the_whole_subtree() {
    let mut tree = sample();
    let form = tree.elements_by_tag("form")[0];
    let input = tree.element_by_id("code").unwrap();
    tree.remove(form).unwrap();

    assert!(!tree.contains(form));
    assert!(!tree.contains(input));
    assert!(!tree.is_connected(input));
    assert_eq!(tree.element_by_id("code"), None);
    assert_eq!(tree.remove(form), Err(TreeError::UnknownNode(form)));
}

#[test]
fn detached_nodes_are_live_but_not_connected() {
    let mut tree = DomTree::new();
    let el = tree.create_element("div");
    assert!(tree.contains(el));
    assert!(!tree.is_connected(el));
    tree.append_child(tree.document(), el).unwrap();
    assert!(tree.is_connected(el));
}

#[test]
fn detach_keeps_the_subtree_for_reattaching() {
    let mut tree = sample();
    let form = tree.elements_by_tag("form")[0];
    let input = tree.element_by_id("code").unwrap();
    let body = tree.body().unwrap();

    tree.detach(form).unwrap();
    assert!(tree.contains(input));
    assert!(!tree.is_connected(input));
    assert_eq!(tree.parent(form), None);
    assert!(!tree.children(body).contains(&form));
    tree.detach(form).unwrap();

    tree.append_child(body, form).unwrap();
    assert!(tree.is_connected(input));
    assert_eq!(tree.element_by_id("code"), Some(input));
    assert_eq!(tree.detach(tree.document()), Err(TreeError::InvalidParent(Id::DOCUMENT)));
}

#[test]
fn text_content_round_trips_through_setter() {
    let mut tree = sample();
    let body = tree.body().unwrap();
    assert_eq!(tree.text_content(body), "  ");

    let title = tree.elements_by_tag("title")[0];
    assert_eq!(tree.text_content(title), "t");
    tree.set_text_content(title, "Checkout").unwrap();
    assert_eq!(tree.text_content(title), "Checkout");
    tree.set_text_content(title, "").unwrap();
    assert!(tree.children(title).is_empty());
}

#[test]
fn rewriting_text_content_reuses_the_text_node() {
    let mut tree = sample();
    let title = tree.elements_by_tag("title")[0];
    let text = tree.children(title)[0];
    let allocated = tree.allocated();

    for n in 0..100 {
        tree.set_text_content(title, &format!("page {n}")).unwrap();
    }
    assert_eq!(tree.children(title), &[text]);
    assert_eq!(tree.text_content(title), "page 99");
    assert_eq!(tree.allocated(), allocated);
}

#[test]
fn deep_nesting_walks_without_recursion() {
    let mut tree = DomTree::new();
    let mut parent = tree.document();
    for _ in 0..10_000 {
        let div = tree.create_element("div");
        tree.append_child(parent, div).unwrap();
        parent = div;
    }
    assert_eq!(tree.descendants(tree.document()).count(), 10_000);
    assert!(tree.is_connected(parent));
}
