//! Loading documents and turning them into printable reports.

use std::path::Path;

use serde::Serialize;
use svgkit_common::{OptionExt, SvgKitError};
use svgkit_engine::{Document, DrawCall, RecordingCanvas, RenderOptions, SvgBox};
use tracing::{debug, info};

/// Error type for dump operations.
#[derive(Debug, thiserror::Error)]
pub enum DumpError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Svg(#[from] SvgKitError),

    #[error("Invalid viewport '{0}', expected WIDTHxHEIGHT")]
    Viewport(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Output format for render reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// One call per line.
    #[default]
    Text,
    /// Pretty-printed JSON array.
    Json,
}

/// Parse `WIDTHxHEIGHT` into a viewport at the origin.
pub fn parse_viewport(s: &str) -> Result<SvgBox, DumpError> {
    let invalid = || DumpError::Viewport(s.to_string());
    let (w, h) = s.split_once(['x', 'X']).ok_or_else(invalid)?;
    let width: f32 = w.trim().parse().map_err(|_| invalid())?;
    let height: f32 = h.trim().parse().map_err(|_| invalid())?;
    if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
        return Err(invalid());
    }
    Ok(SvgBox::new(0.0, 0.0, width, height))
}

/// Build options from an optional JSON file plus command line overrides.
pub fn load_options(
    path: Option<&Path>,
    dpi: Option<f32>,
    strict: bool,
) -> Result<RenderOptions, DumpError> {
    let mut options = match path {
        Some(path) => {
            debug!(path = %path.display(), "loading render options");
            RenderOptions::from_json(&std::fs::read_to_string(path)?)?
        }
        None => RenderOptions::default(),
    };
    if let Some(dpi) = dpi {
        options = options.with_dpi(dpi);
    }
    if strict {
        options = options.with_strict(true);
    }
    options.validate()?;
    Ok(options)
}

pub fn load_document(path: &Path, options: RenderOptions) -> Result<Document, DumpError> {
    let bytes = std::fs::read(path)?;
    let doc = Document::from_bytes(&bytes, options)?;
    info!(path = %path.display(), nodes = doc.len(), "loaded document");
    Ok(doc)
}

/// Render `doc` onto a recording canvas and return the calls.
pub fn render_calls(doc: &Document, viewport: Option<SvgBox>, text: bool) -> Vec<DrawCall> {
    let mut canvas = if text {
        RecordingCanvas::new()
    } else {
        RecordingCanvas::without_text()
    };
    match viewport {
        Some(viewport) => doc.render_in(&mut canvas, viewport),
        None => doc.render(&mut canvas),
    }
    canvas.take_calls()
}

pub fn format_calls(calls: &[DrawCall], format: OutputFormat) -> Result<String, DumpError> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(calls)?,
        OutputFormat::Text => {
            let mut out = String::new();
            let mut depth = 0usize;
            for call in calls {
                if matches!(call, DrawCall::Restore) {
                    depth = depth.saturating_sub(1);
                }
                out.push_str(&"  ".repeat(depth));
                out.push_str(&call.to_string());
                out.push('\n');
                if matches!(call, DrawCall::Save) {
                    depth += 1;
                }
            }
            out
        }
    })
}

/// Document level facts.
#[derive(Debug, Serialize)]
pub struct DocumentSummary {
    pub nodes: usize,
    pub root_children: usize,
    pub dpi: f32,
    pub view_box: Option<SvgBox>,
    pub viewport: SvgBox,
}

pub fn summarize(doc: &Document) -> DocumentSummary {
    DocumentSummary {
        nodes: doc.len(),
        root_children: doc.children(doc.root()).len(),
        dpi: doc.dpi,
        view_box: doc.svg_root().view_box,
        viewport: doc.intrinsic_viewport(),
    }
}

/// One element, looked up by id.
#[derive(Debug, Serialize)]
pub struct NodeSummary {
    pub id: String,
    pub tag: &'static str,
    pub children: Vec<&'static str>,
}

pub fn describe_node(doc: &Document, id: &str) -> Result<NodeSummary, DumpError> {
    let node_id = doc.require(id)?;
    let node = doc.node(node_id).ok_or_not_found(id)?;
    let children = doc
        .children(node_id)
        .iter()
        .filter_map(|&child| doc.node(child))
        .map(|child| child.tag_name())
        .collect();
    Ok(NodeSummary {
        id: id.to_string(),
        tag: node.tag_name(),
        children,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[test]
    fn test_parse_viewport() {
        assert_eq!(
            parse_viewport("200x100").unwrap(),
            SvgBox::new(0.0, 0.0, 200.0, 100.0)
        );
        assert_eq!(parse_viewport("12.5X4").unwrap().width, 12.5);
        assert!(matches!(parse_viewport("200"), Err(DumpError::Viewport(_))));
        assert!(matches!(parse_viewport("0x10"), Err(DumpError::Viewport(_))));
        assert!(matches!(parse_viewport("ax10"), Err(DumpError::Viewport(_))));
    }

    #[test]
    fn test_load_options() {
        let file = write_temp(br#"{"dpi": 72.0, "max_reference_depth": 4}"#);
        let options = load_options(Some(file.path()), None, true).unwrap();
        assert_eq!(options.dpi, 72.0);
        assert_eq!(options.max_reference_depth, 4);
        assert!(options.strict);

        let options = load_options(Some(file.path()), Some(300.0), false).unwrap();
        assert_eq!(options.dpi, 300.0);

        assert!(matches!(
            load_options(None, Some(-1.0), false),
            Err(DumpError::Svg(SvgKitError::Config { .. }))
        ));
        let bad = write_temp(b"{not json");
        assert!(load_options(Some(bad.path()), None, false).is_err());
    }

    #[test]
    fn test_render_file() {
        let file = write_temp(
            br#"<svg viewBox="0 0 10 10"><rect width="5" height="5"/><text>hi</text></svg>"#,
        );
        let doc = load_document(file.path(), RenderOptions::default()).unwrap();
        let calls = render_calls(&doc, None, true);
        assert!(calls.iter().any(|c| c.name() == "draw_rect"));
        assert!(calls.iter().any(|c| c.name() == "draw_paragraph"));

        let quiet = render_calls(&doc, Some(SvgBox::new(0.0, 0.0, 20.0, 20.0)), false);
        assert!(!quiet.iter().any(|c| c.name() == "draw_paragraph"));

        let text = format_calls(&calls, OutputFormat::Text).unwrap();
        assert!(text.lines().next().unwrap().starts_with("save"));
        assert!(text.contains("\n  "));
        let json = format_calls(&calls, OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), calls.len());
    }

    #[test]
    fn test_load_errors() {
        let missing = Path::new("/nonexistent/file.svg");
        assert!(matches!(
            load_document(missing, RenderOptions::default()),
            Err(DumpError::Io(_))
        ));

        let broken = write_temp(b"<svg><g></svg>");
        let strict = RenderOptions::default().with_strict(true);
        assert!(matches!(
            load_document(broken.path(), strict),
            Err(DumpError::Svg(SvgKitError::Markup { .. }))
        ));
        assert!(load_document(broken.path(), RenderOptions::default()).is_ok());
    }

    #[test]
    fn test_summaries() {
        let doc = Document::make(
            r#"<svg width="40" height="30"><g id="layer"><rect/><circle/></g></svg>"#,
        )
        .unwrap();
        let summary = summarize(&doc);
        assert_eq!(summary.nodes, 4);
        assert_eq!(summary.root_children, 1);
        assert_eq!(summary.viewport, SvgBox::new(0.0, 0.0, 40.0, 30.0));

        let node = describe_node(&doc, "layer").unwrap();
        assert_eq!(node.tag, "g");
        assert_eq!(node.children, vec!["rect", "circle"]);
        assert!(matches!(
            describe_node(&doc, "nope"),
            Err(DumpError::Svg(SvgKitError::UnresolvedReference(_)))
        ));
    }
}
