//! Preview pane: renders the buffer and publishes the result

use std::path::PathBuf;

use crate::core::error::RenderError;
use crate::core::render::render;

/// Page shown in place of the preview when the buffer does not parse
pub fn error_html(err: &RenderError) -> String {
    let location = err
        .position
        .map(|pos| format!(" (at byte {pos})"))
        .unwrap_or_default();
    format!(
        "<b>Invalid XML</b><pre>{}{}</pre>",
        quick_xml::escape::escape(&err.message),
        location
    )
}

/// Latest preview, optionally mirrored to a file
#[derive(Debug, Default)]
pub struct PreviewPanel {
    html: String,
    output: Option<PathBuf>,
}

impl PreviewPanel {
    pub fn new(output: Option<PathBuf>) -> Self {
        Self {
            html: String::new(),
            output,
        }
    }

    /// Re-render from scratch. Parse failures become the displayed page.
    pub fn refresh(&mut self, text: &str) -> &str {
        self.html = match render(text) {
            Ok(doc) => doc.to_html(),
            Err(err) => {
                tracing::warn!("Preview failed: {}", err);
                error_html(&err)
            }
        };
        tracing::debug!("Preview refreshed ({} bytes)", self.html.len());

        if let Some(ref path) = self.output {
            if let Err(e) = std::fs::write(path, &self.html) {
                tracing::error!("Failed to write preview to {}: {}", path.display(), e);
            }
        }
        &self.html
    }

    /// Show the empty state
    pub fn clear(&mut self) {
        self.html.clear();
    }

    pub fn html(&self) -> &str {
        &self.html
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_recovers_after_error() {
        let mut panel = PreviewPanel::default();
        let html = panel.refresh("<blog><title>Hi</blog>").to_string();
        assert!(html.starts_with("<b>Invalid XML</b><pre>"));

        let html = panel.refresh("<blog><title>Hi</title><html><p>x</p></html></blog>");
        assert!(html.contains("<h1>Hi</h1>"));
        assert!(html.ends_with("<hr><p>x</p>"));
    }

    #[test]
    fn test_refresh_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preview.html");
        let mut panel = PreviewPanel::new(Some(path.clone()));
        panel.refresh("<blog><title>T</title></blog>");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), panel.html());
    }

    #[test]
    fn test_error_html_escapes_message() {
        let html = error_html(&RenderError::at("expected `</a>`", 3));
        assert_eq!(html, "<b>Invalid XML</b><pre>expected `&lt;/a&gt;` (at byte 3)</pre>");
    }
}
