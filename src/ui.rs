//! Targeted `ui-update` patches sent to the panel.
//!
//! After startup the panel is only ever patched; no builder here produces a full page.

use std::collections::BTreeMap;

use crate::foundation::core::{NONE_LABEL, TraitId, TraitType};
use crate::host::UiUpdate;
use crate::store::{ORDER_SEPARATOR, Order};

pub const BODY: &str = "body";
pub const LAYERS: &str = ".layers";
pub const DISPLAY: &str = ".display-wrapper";
pub const DISPLAY_FLOATING: &str = ".display-wrapper-floating";
pub const SAVED_ORDERS: &str = ".saved-orders";

pub fn label_selector(ty: &TraitType) -> String {
    format!(".layers > .layer[data-layer='{}'] > span > bold", quote_str(ty.as_str()))
}

pub fn view_control_selector(ty: &TraitType) -> String {
    format!(".layer-controls > section[data-layer='{}']", quote_str(ty.as_str()))
}

pub fn layer_controls_selector(ty: &TraitType) -> String {
    format!(".layer[data-layer='{}'] > .layer-controls", quote_str(ty.as_str()))
}

/// Shown instead of the panel when the document has no trait frames.
pub fn empty_state() -> UiUpdate {
    UiUpdate::new(
        BODY,
        "<p class=\"missing-traits\">This design file doesn't have any frames with traits. \
         Remember to follow the <span>trait#&lt;trait type&gt;#&lt;trait name&gt;</span> naming \
         convention for each trait to be recognized by this plugin.</p>",
    )
}

/// One row per ordered type, with its label and controls.
pub fn layers(order: &Order, labels: &BTreeMap<TraitType, String>) -> UiUpdate {
    let mut html = String::new();
    for ty in order {
        let layer = escape(ty.as_str());
        let arg = js_arg(ty.as_str());
        let label = labels.get(ty).map(String::as_str).unwrap_or(NONE_LABEL);
        html.push_str(&format!(
            "<div data-layer=\"{layer}\" class=\"layer\">\
             <span>{layer} <bold>{label}</bold></span>\
             <div class=\"layer-controls\">\
             <section data-layer=\"{layer}\"></section>\
             {moves}\
             <button onclick=\"replaceLayer('{arg}')\">new</button>\
             <button onclick=\"randomizeLayer('{arg}')\">random</button>\
             <button onclick=\"deleteLayer('{arg}')\">delete</button>\
             </div></div>",
            label = escape(label),
            moves = move_buttons(ty),
        ));
    }
    UiUpdate::new(LAYERS, html)
}

/// The composite goes to both the docked and the floating display.
pub fn display(markup: &str) -> [UiUpdate; 2] {
    [
        UiUpdate::new(DISPLAY, markup),
        UiUpdate::new(DISPLAY_FLOATING, markup),
    ]
}

pub fn label(ty: &TraitType, label: &str) -> UiUpdate {
    UiUpdate::new(label_selector(ty), escape(label))
}

/// "View" affordance pointing at the frame selected for `ty`.
pub fn view_control(ty: &TraitType, id: &TraitId) -> UiUpdate {
    UiUpdate::new(
        view_control_selector(ty),
        format!(
            "<button class=\"view\" data-layer=\"{}\" onclick=\"viewFrame('{}')\">VIEW</button>",
            escape(ty.as_str()),
            js_arg(id.as_str()),
        ),
    )
}

/// Controls of a layer after the canvas is cleared: only the move buttons remain.
pub fn reset_controls(ty: &TraitType) -> UiUpdate {
    UiUpdate::new(
        layer_controls_selector(ty),
        move_buttons(ty),
    )
}

/// Saved orders rendered as `a > b > c` with load and delete affordances.
pub fn saved_orders(orders: &[String]) -> UiUpdate {
    let mut html = String::new();
    for saved in orders {
        let shown = saved
            .split(ORDER_SEPARATOR)
            .map(escape)
            .collect::<Vec<_>>()
            .join(" &gt; ");
        let arg = js_arg(saved);
        html.push_str(&format!(
            "<div class=\"saved-order\"><span>{shown}</span>\
             <div class=\"saved-order-controls\">\
             <button onclick=\"loadOrder('{arg}')\">load</button>\
             <button onclick=\"deleteLocalOrder('{arg}')\">delete</button>\
             </div></div>"
        ));
    }
    UiUpdate::new(SAVED_ORDERS, html)
}

fn move_buttons(ty: &TraitType) -> String {
    let layer = js_arg(ty.as_str());
    format!(
        "<button class=\"up\" onclick=\"updateLayerPosition('up', '{layer}')\"><span>&gt;</span></button>\
         <button class=\"down\" onclick=\"updateLayerPosition('down', '{layer}')\"><span>&gt;</span></button>"
    )
}

/// Escape text for use in markup and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Quote text for a single-quoted JS string literal inside an HTML attribute.
fn js_arg(text: &str) -> String {
    escape(&quote_str(text))
}

/// Backslash-escape text for a single-quoted CSS or JS string.
fn quote_str(text: &str) -> String {
    text.replace('\\', "\\\\").replace('\'', "\\'")
}

#[cfg(test)]
#[path = "../tests/unit/ui.rs"]
mod tests;
