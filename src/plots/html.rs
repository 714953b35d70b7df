use crate::utils::Result;
use canvas::{escape_text, generate_string, Figure};
use chrono::Local;
use std::fmt::Write as FmtWrite;

/// Contents of a standalone HTML page around a figure
#[derive(Debug, Clone)]
pub struct HtmlReport<'a> {
    pub title: &'a str,
    pub figure: &'a Figure,
    pub inputs: &'a [(String, String)],
    pub order: Option<&'a [String]>,
}

fn fmt_err(e: std::fmt::Error) -> String {
    format!("Failed to render HTML: {}", e)
}

/// The figure's SVG without the XML declaration, ready to inline
fn inline_svg(figure: &Figure) -> String {
    let svg = generate_string(figure);
    match svg.strip_prefix("<?xml") {
        Some(rest) => rest
            .split_once('\n')
            .map(|(_, body)| body.to_string())
            .unwrap_or_default(),
        None => svg,
    }
}

pub fn render_html(report: &HtmlReport) -> Result<String> {
    let mut html = String::with_capacity(64 * 1024);
    let title = escape_text(report.title);
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");

    writeln!(html, "<!DOCTYPE html>").map_err(fmt_err)?;
    writeln!(html, "<html lang=\"en\">").map_err(fmt_err)?;
    writeln!(html, "<head>").map_err(fmt_err)?;
    writeln!(html, "<meta charset=\"utf-8\"/>").map_err(fmt_err)?;
    writeln!(
        html,
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\"/>"
    )
    .map_err(fmt_err)?;
    writeln!(html, "<title>{}</title>", title).map_err(fmt_err)?;
    writeln!(html, "<style>").map_err(fmt_err)?;
    writeln!(
        html,
        "body{{font-family:Arial,Helvetica,sans-serif;margin:20px;color:#222;background:#fff;}}"
    )
    .map_err(fmt_err)?;
    writeln!(html, "h1{{margin:0 0 8px 0;font-size:24px;}}").map_err(fmt_err)?;
    writeln!(html, "h2{{margin:24px 0 8px 0;font-size:18px;}}").map_err(fmt_err)?;
    writeln!(html, ".meta{{color:#555;font-size:13px;margin-bottom:16px;}}").map_err(fmt_err)?;
    writeln!(html, ".plot{{overflow:auto;max-width:100%;}}").map_err(fmt_err)?;
    writeln!(html, "svg{{border:1px solid #e5e5e5;}}").map_err(fmt_err)?;
    writeln!(
        html,
        ".inputs{{border-collapse:collapse;margin:12px 0;font-size:13px;}}"
    )
    .map_err(fmt_err)?;
    writeln!(
        html,
        ".inputs th,.inputs td{{border:1px solid #ddd;padding:4px 8px;text-align:left;}}"
    )
    .map_err(fmt_err)?;
    writeln!(html, ".order{{font-family:monospace;font-size:12px;}}").map_err(fmt_err)?;
    writeln!(html, "</style>").map_err(fmt_err)?;
    writeln!(html, "</head>").map_err(fmt_err)?;
    writeln!(html, "<body>").map_err(fmt_err)?;

    writeln!(html, "<h1>{}</h1>", title).map_err(fmt_err)?;
    writeln!(
        html,
        "<div class=\"meta\">Generated by cvmplot {} on {}</div>",
        env!("CARGO_PKG_VERSION"),
        timestamp
    )
    .map_err(fmt_err)?;
    writeln!(html, "<div class=\"plot\">").map_err(fmt_err)?;
    html.push_str(&inline_svg(report.figure));
    writeln!(html, "</div>").map_err(fmt_err)?;

    if !report.inputs.is_empty() {
        writeln!(html, "<h2>Inputs</h2>").map_err(fmt_err)?;
        writeln!(html, "<table class=\"inputs\">").map_err(fmt_err)?;
        for (key, value) in report.inputs {
            writeln!(
                html,
                "<tr><th>{}</th><td>{}</td></tr>",
                escape_text(key),
                escape_text(value)
            )
            .map_err(fmt_err)?;
        }
        writeln!(html, "</table>").map_err(fmt_err)?;
    }

    if let Some(order) = report.order {
        writeln!(html, "<h2>Leaf order</h2>").map_err(fmt_err)?;
        writeln!(html, "<details><summary>{} leaves, bottom to top</summary>", order.len())
            .map_err(fmt_err)?;
        writeln!(html, "<ol class=\"order\">").map_err(fmt_err)?;
        for label in order {
            writeln!(html, "<li>{}</li>", escape_text(label)).map_err(fmt_err)?;
        }
        writeln!(html, "</ol>").map_err(fmt_err)?;
        writeln!(html, "</details>").map_err(fmt_err)?;
    }

    writeln!(html, "</body>").map_err(fmt_err)?;
    writeln!(html, "</html>").map_err(fmt_err)?;
    Ok(html)
}
