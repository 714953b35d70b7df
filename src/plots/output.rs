use super::{render_html, HtmlReport};
use crate::utils::Result;
use canvas::{generate_image, Figure};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Html,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("svg") => Ok(OutputFormat::Svg),
            Some("html") | Some("htm") => Ok(OutputFormat::Html),
            _ => Err(format!(
                "Unsupported output {}: use a .svg or .html extension",
                path.display()
            )),
        }
    }
}

/// Writes the figure as SVG or as an HTML page, depending on the extension of `path`
pub fn write_figure(
    figure: &Figure,
    path: &Path,
    title: &str,
    inputs: &[(String, String)],
    order: Option<&[String]>,
) -> Result<()> {
    match OutputFormat::from_path(path)? {
        OutputFormat::Svg => generate_image(figure, path)?,
        OutputFormat::Html => {
            let html = render_html(&HtmlReport {
                title,
                figure,
                inputs,
                order,
            })?;
            std::fs::write(path, html)
                .map_err(|e| format!("Failed to write report {}: {}", path.display(), e))?;
        }
    }
    log::info!("Figure written to {}", path.display());
    Ok(())
}
