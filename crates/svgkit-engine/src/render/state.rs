//! Resolving a shape's paint parameters.

use crate::canvas::{PaintSource, RenderState};
use crate::context::RenderContext;
use crate::document::Document;
use crate::node::{NodeKind, SvgNode};
use crate::values::{Color, LengthAxis, Paint};

use super::inherit::InheritedStyle;

/// Build the [`RenderState`] for `node`, with `style` already holding the
/// node's own values layered over what it inherited.
pub fn resolve_render_state(
    doc: &Document,
    ctx: &RenderContext,
    node: &SvgNode,
    style: &InheritedStyle<'_>,
) -> RenderState {
    let presentation = node.presentation();
    let opacity = style.opacity.unwrap_or(1.0).clamp(0.0, 1.0);

    let fill = match style.fill {
        None => PaintSource::Color(Color::BLACK),
        Some(paint) => resolve_paint(doc, style, paint),
    };
    let stroke = style
        .stroke
        .map(|paint| resolve_paint(doc, style, paint))
        .unwrap_or(PaintSource::None);

    let stroke_width = style
        .stroke_width
        .map(|w| w.resolve(ctx, LengthAxis::Diagonal))
        .unwrap_or(1.0);

    RenderState {
        fill,
        stroke,
        opacity,
        fill_opacity: style.fill_opacity.unwrap_or(1.0).clamp(0.0, 1.0) * opacity,
        stroke_opacity: style.stroke_opacity.unwrap_or(1.0).clamp(0.0, 1.0) * opacity,
        stroke_width,
        fill_rule: presentation.fill_rule,
        line_cap: presentation.line_cap,
        line_join: presentation.line_join,
        miter_limit: presentation.miter_limit,
        dash_offset: presentation.dash_offset,
        dash_array: presentation.dash_array.clone(),
    }
}

/// Resolve one paint. References only count when they land on a gradient.
pub fn resolve_paint(doc: &Document, style: &InheritedStyle<'_>, paint: &Paint) -> PaintSource {
    match paint {
        Paint::None => PaintSource::None,
        Paint::Color(color) => PaintSource::Color(style.resolve_color(*color)),
        Paint::Reference(id) => match doc.lookup(id).map(|target| doc.get(target).kind()) {
            Some(NodeKind::LinearGradient(_) | NodeKind::RadialGradient(_)) => {
                PaintSource::Gradient(id.clone())
            }
            _ => PaintSource::None,
        },
    }
}

/// Text color: the fill when it resolves to a plain color, else black.
pub fn text_color(style: &InheritedStyle<'_>) -> Color {
    match style.fill {
        Some(Paint::Color(color)) => style.resolve_color(*color),
        _ => Color::BLACK,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Inheritable;
    use crate::values::{Length, SvgColor};

    fn doc() -> Document {
        Document::make(
            r#"<svg><defs><linearGradient id="g"/><rect id="r"/></defs></svg>"#,
        )
        .unwrap()
    }

    fn rect_node(doc: &Document) -> &SvgNode {
        doc.node(doc.lookup("r").unwrap()).unwrap()
    }

    #[test]
    fn test_unspecified_fill_is_black() {
        let doc = doc();
        let state = resolve_render_state(
            &doc,
            &RenderContext::default(),
            rect_node(&doc),
            &InheritedStyle::default(),
        );
        assert_eq!(state.fill, PaintSource::Color(Color::BLACK));
        assert_eq!(state.stroke, PaintSource::None);
        assert_eq!(state.stroke_width, 1.0);
    }

    #[test]
    fn test_opacity_folds_into_paint_opacity() {
        let doc = doc();
        let values = Inheritable {
            opacity: Some(0.5),
            fill_opacity: Some(0.5),
            stroke_opacity: Some(2.0),
            stroke_width: Some(Length::px(3.0)),
            ..Default::default()
        };
        let state = resolve_render_state(
            &doc,
            &RenderContext::default(),
            rect_node(&doc),
            &InheritedStyle::of(&values),
        );
        assert_eq!(state.fill_opacity, 0.25);
        assert_eq!(state.stroke_opacity, 0.5);
        assert_eq!(state.stroke_width, 3.0);
    }

    #[test]
    fn test_references() {
        let doc = doc();
        let style = InheritedStyle::default();
        assert_eq!(
            resolve_paint(&doc, &style, &Paint::Reference("g".into())),
            PaintSource::Gradient("g".into())
        );
        assert_eq!(
            resolve_paint(&doc, &style, &Paint::Reference("r".into())),
            PaintSource::None
        );
        assert_eq!(
            resolve_paint(&doc, &style, &Paint::Reference("missing".into())),
            PaintSource::None
        );
    }

    #[test]
    fn test_text_color() {
        let values = Inheritable {
            fill: Some(Paint::Color(SvgColor::Current)),
            color: Some(SvgColor::Value(Color::rgb(0, 128, 0))),
            ..Default::default()
        };
        assert_eq!(text_color(&InheritedStyle::of(&values)), Color::rgb(0, 128, 0));
        let gradient = Inheritable {
            fill: Some(Paint::Reference("g".into())),
            ..Default::default()
        };
        assert_eq!(text_color(&InheritedStyle::of(&gradient)), Color::BLACK);
    }
}
