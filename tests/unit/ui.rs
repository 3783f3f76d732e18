use super::*;

#[test]
fn layers_lists_types_in_order_with_labels() {
    let order = Order::new(vec!["eyes".into(), "bg".into()]);
    let mut labels = BTreeMap::new();
    labels.insert(TraitType::new("bg"), "red".to_string());

    let update = layers(&order, &labels);
    assert_eq!(update.selector, LAYERS);

    let eyes = update.html.find("data-layer=\"eyes\"").unwrap();
    let bg = update.html.find("data-layer=\"bg\"").unwrap();
    assert!(eyes < bg);
    assert!(update.html.contains("<bold>red</bold>"));
    assert!(update.html.contains("<bold>None</bold>"));
}

#[test]
fn saved_orders_show_arrows() {
    let update = saved_orders(&["bg,eyes".to_string()]);
    assert_eq!(update.selector, SAVED_ORDERS);
    assert!(update.html.contains("<span>bg &gt; eyes</span>"));
    assert!(update.html.contains("loadOrder('bg,eyes')"));
    assert!(update.html.contains("deleteLocalOrder('bg,eyes')"));
}

#[test]
fn saved_orders_empty_list_clears_section() {
    assert_eq!(saved_orders(&[]).html, "");
}

#[test]
fn selectors_target_one_layer() {
    let ty = TraitType::new("eyes");
    assert_eq!(
        label_selector(&ty),
        ".layers > .layer[data-layer='eyes'] > span > bold"
    );
    assert_eq!(
        view_control_selector(&ty),
        ".layer-controls > section[data-layer='eyes']"
    );
    assert_eq!(
        layer_controls_selector(&TraitType::new("it's")),
        ".layer[data-layer='it\\'s'] > .layer-controls"
    );
}

#[test]
fn markup_is_escaped() {
    assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    let update = label(&"bg".into(), "<red>");
    assert_eq!(update.html, "&lt;red&gt;");
}

#[test]
fn display_patches_both_wrappers() {
    let [docked, floating] = display("<svg/>");
    assert_eq!(docked.selector, DISPLAY);
    assert_eq!(floating.selector, DISPLAY_FLOATING);
    assert_eq!(docked.html, floating.html);
}

#[test]
fn reset_controls_keeps_only_move_buttons() {
    let update = reset_controls(&"bg".into());
    assert!(update.html.contains("updateLayerPosition('up', 'bg')"));
    assert!(!update.html.contains("randomizeLayer"));
}

#[test]
fn updates_serialize_with_type_tag() {
    let json = serde_json::to_value(UiUpdate::new(".layers", "x")).unwrap();
    assert_eq!(json["type"], "ui-update");
    assert_eq!(json["selector"], ".layers");
    assert_eq!(json["html"], "x");
}

#[test]
fn handler_arguments_survive_apostrophes() {
    let order = Order::new(vec!["bob's".into()]);
    let update = layers(&order, &BTreeMap::new());
    assert!(update.html.contains("replaceLayer('bob\\&#39;s')"));
    assert!(update.html.contains("updateLayerPosition('up', 'bob\\&#39;s')"));
    assert!(update.html.contains("data-layer=\"bob&#39;s\""));

    let update = saved_orders(&["bob's,eyes".to_string()]);
    assert!(update.html.contains("loadOrder('bob\\&#39;s,eyes')"));

    let update = view_control(&"eyes".into(), &TraitId::new("a\\b"));
    assert!(update.html.contains("viewFrame('a\\\\b')"));
}
