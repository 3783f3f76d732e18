//! Turning the current selection into one stacked image.
//!
//! The composite markup is built by *prepending* each selected trait's SVG while walking the
//! order, so the first ordered type ends up last in the markup. The panel lays fragments out so
//! that this reproduces the intended stacking; keep the prepend.

use std::collections::BTreeMap;

use crate::foundation::core::{NONE_LABEL, TraitId, TraitTag, TraitType};
use crate::foundation::error::{WorkbenchError, WorkbenchResult};
use crate::host::Document;
use crate::store::{Order, Selection};

/// Attributes injected into the root `<svg` tag of every fragment.
pub const RENDER_HINTS: &str = r#"shape-rendering="crispEdges" preserveAspectRatio="xMidYMid meet""#;

/// One selected trait after export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComposedLayer {
    pub ty: TraitType,
    pub id: TraitId,
    /// Decorated SVG markup.
    pub fragment: String,
}

/// Output of [`render`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Composite {
    /// Concatenated fragments, last ordered type first.
    pub markup: String,
    /// Exported layers in order sequence (first ordered type first).
    pub layers: Vec<ComposedLayer>,
    /// Display label per ordered type; unselected types show [`NONE_LABEL`].
    pub labels: BTreeMap<TraitType, String>,
}

impl Composite {
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// Inject [`RENDER_HINTS`] into the first `<svg` tag. Markup without one is returned unchanged.
pub fn decorate_svg(svg: &str) -> String {
    const ROOT: &str = "<svg";
    match svg.find(ROOT) {
        Some(at) => {
            let split = at + ROOT.len();
            let mut out = String::with_capacity(svg.len() + RENDER_HINTS.len() + 1);
            out.push_str(&svg[..split]);
            out.push(' ');
            out.push_str(RENDER_HINTS);
            out.push_str(&svg[split..]);
            out
        }
        None => svg.to_string(),
    }
}

/// Export every selected trait and stack the results.
///
/// Any export failure aborts the whole render; a partial composite is never returned.
#[tracing::instrument(skip_all, fields(layers = order.len(), selected = selection.len()))]
pub async fn render<D: Document>(
    doc: &D,
    order: &Order,
    selection: &Selection,
) -> WorkbenchResult<Composite> {
    let mut out = Composite::default();

    for ty in order {
        let Some(id) = selection.get(ty) else {
            out.labels.insert(ty.clone(), NONE_LABEL.to_string());
            continue;
        };

        let bytes = doc.export_svg(id).await?;
        let svg = String::from_utf8(bytes)
            .map_err(|e| WorkbenchError::export(format!("frame '{id}' exported invalid utf-8: {e}")))?;
        let fragment = decorate_svg(&svg);

        out.markup.insert_str(0, &fragment);
        out.labels.insert(ty.clone(), label_for(doc, id));
        out.layers.push(ComposedLayer {
            ty: ty.clone(),
            id: id.clone(),
            fragment,
        });
    }

    tracing::debug!(bytes = out.markup.len(), "composite rendered");
    Ok(out)
}

fn label_for<D: Document>(doc: &D, id: &TraitId) -> String {
    doc.node(id)
        .and_then(|node| TraitTag::parse(&node.name))
        .map(|tag| tag.name.0)
        .unwrap_or_else(|| NONE_LABEL.to_string())
}

/// Paint the composite's layers onto a `width` x `height` canvas.
///
/// Layers are painted in order sequence, so later ordered types cover earlier ones. Each layer is
/// scaled uniformly to fit and centered.
pub fn rasterize(composite: &Composite, width: u32, height: u32) -> WorkbenchResult<image::RgbaImage> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| WorkbenchError::validation("preview size must be non-zero"))?;
    let opts = usvg::Options::default();

    for layer in &composite.layers {
        let tree = usvg::Tree::from_data(layer.fragment.as_bytes(), &opts).map_err(|e| {
            WorkbenchError::validation(format!("layer '{}' is not valid svg: {e}", layer.ty))
        })?;
        resvg::render(&tree, fit_transform(tree.size(), width, height), &mut pixmap.as_mut());
    }

    let mut img = image::RgbaImage::new(width, height);
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = image::Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    Ok(img)
}

fn fit_transform(size: usvg::Size, width: u32, height: u32) -> resvg::tiny_skia::Transform {
    let (w, h) = (width as f32, height as f32);
    let scale = (w / size.width()).min(h / size.height());
    let tx = (w - size.width() * scale) / 2.0;
    let ty = (h - size.height() * scale) / 2.0;
    resvg::tiny_skia::Transform::from_row(scale, 0.0, 0.0, scale, tx, ty)
}

#[cfg(test)]
#[path = "../tests/unit/compose.rs"]
mod tests;
