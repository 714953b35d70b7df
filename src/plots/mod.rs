mod circular;
mod colors;
mod features;
mod genes;
mod heatmap;
mod html;
mod output;
mod phylotree;
mod rectree;
mod tnseq;
mod typing_figure;

pub use circular::{circular_tree, CircularParams, ClassTrack, PointStyle};
pub use colors::{Colormap, Rgb};
pub use features::{feature_shape, head_length, Arrow, FeatureStyle, HEAD_LENGTH_FRACTION};
pub use genes::{gene_tracks, GeneParams, LabelTrack};
pub use heatmap::{heatmap, heatmap_panel, ColormapSpec, HeatmapParams};
pub use html::{render_html, HtmlReport};
pub use output::{write_figure, OutputFormat};
pub use phylotree::{phylotree, PhylotreeParams};
pub use rectree::{rectree, RectreeParams};
pub use tnseq::{tnseq_plot, HPos, SublabelPos, TnseqParams, VPos};
pub use typing_figure::{typing_figure, TypingFigureParams};

use crate::typing::LinkColor;

/// Pixels per inch used to convert figure sizes
pub const PX_PER_INCH: f64 = 72.0;

/// Approximate width of a glyph relative to the font size
const CHAR_WIDTH: f64 = 0.6;

fn text_width(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * font_size * CHAR_WIDTH
}

fn max_text_width<'a>(texts: impl IntoIterator<Item = &'a String>, font_size: f64) -> f64 {
    texts
        .into_iter()
        .map(|t| text_width(t, font_size))
        .fold(0.0, f64::max)
}

/// Parses a user colour and returns its hex form
fn hex_color(color: &str) -> crate::utils::Result<String> {
    Ok(color.parse::<Rgb>()?.to_hex())
}

/// Default dendrogram link colours: links above the threshold take the first
/// colour of the cycle, clusters walk through the remaining nine.
pub fn default_link_color(color: &LinkColor) -> String {
    let tab10 = Colormap::by_name("tab10")
        .map(|cmap| cmap.resample(10))
        .unwrap_or_default();
    let index = match color {
        LinkColor::Above => 0,
        LinkColor::Cluster(k) => 1 + (k.saturating_sub(1)) % 9,
    };
    tab10
        .get(index)
        .map(|c| c.to_hex())
        .unwrap_or_else(|| Rgb::BLACK.to_hex())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_colors_cycle_after_nine_clusters() {
        assert_eq!(default_link_color(&LinkColor::Above), "#1f77b4");
        assert_eq!(default_link_color(&LinkColor::Cluster(1)), "#ff7f0e");
        assert_eq!(
            default_link_color(&LinkColor::Cluster(10)),
            default_link_color(&LinkColor::Cluster(1))
        );
    }

    #[test]
    fn text_width_scales_with_font() {
        assert_eq!(text_width("abcd", 10.0), 24.0);
        let labels = vec!["a".to_string(), "abc".to_string()];
        assert_eq!(max_text_width(&labels, 10.0), 18.0);
    }
}
