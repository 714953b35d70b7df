use super::{hex_color, max_text_width, PX_PER_INCH};
use crate::tree::Tree;
use crate::utils::Result;
use canvas::{
    format_tick, nice_ticks, Axis, Baseline, Figure, Panel, Shape, Side, Spines, Stroke, TextLabel,
};

const MARGIN: f64 = 20.0;
const GUIDE_COLOR: &str = "#808080";
const ALIGN_LABEL_AT: f64 = 1.16;
const ALIGN_GUIDE_TO: f64 = 1.15;

#[derive(Debug, Clone)]
pub struct PhylotreeParams {
    pub show_labels: bool,
    pub align_labels: bool,
    pub label_size: f64,
    pub color: String,
    pub line_width: f64,
    pub width: f64,
    pub height: Option<f64>,
}

impl Default for PhylotreeParams {
    fn default() -> Self {
        Self {
            show_labels: true,
            align_labels: false,
            label_size: 8.0,
            color: "k".to_string(),
            line_width: 1.0,
            width: 8.0,
            height: None,
        }
    }
}

/// Rectangular phylogram with the root on the left. Returns the figure and the tip labels
/// from the bottom row to the top.
pub fn phylotree(tree: &Tree, params: &PhylotreeParams) -> Result<(Figure, Vec<String>)> {
    if params.align_labels && !params.show_labels {
        return Err("Labels can only be aligned when they are shown".to_string());
    }
    let color = hex_color(&params.color)?;
    let depths = tree.depths();
    let rows = tree.tip_rows();
    let max_depth = depths.iter().copied().fold(0.0, f64::max);
    let xmax = if max_depth > 0.0 { max_depth } else { 1.0 };
    let num_tips = tree.tips().len();
    let y_of = |node: usize| rows[node] * 10.0 - 5.0;

    let labelled = (0..tree.nodes.len())
        .filter_map(|node| tree.nodes[node].name.as_ref().map(|name| (node, name)))
        .collect::<Vec<_>>();
    let label_px = if params.show_labels {
        max_text_width(labelled.iter().map(|(_, name)| *name), params.label_size)
            + params.label_size
    } else {
        0.0
    };
    let width = params.width * PX_PER_INCH;
    let height = params
        .height
        .map(|h| h * PX_PER_INCH)
        .unwrap_or(num_tips as f64 * params.label_size * 1.6 + 3.0 * MARGIN);
    let panel_size = (
        (width - 2.0 * MARGIN - label_px).max(50.0),
        (height - 3.0 * MARGIN).max(20.0),
    );
    let mut panel = Panel::new(
        (MARGIN, 2.0 * MARGIN),
        panel_size,
        (-0.05 * xmax, 1.25 * xmax),
        (0.0, num_tips as f64 * 10.0),
    );
    panel.spines = Spines {
        top: true,
        ..Spines::none()
    };

    let stroke = Stroke::solid(color, params.line_width);
    for node in tree.preorder() {
        let x = depths[node];
        let y = y_of(node);
        let parent_x = tree.nodes[node].parent.map_or(0.0, |p| depths[p]);
        panel.push(Shape::Line {
            from: (parent_x, y),
            to: (x, y),
            stroke: stroke.clone(),
        });
        let children = &tree.nodes[node].children;
        if let (Some(&first), Some(&last)) = (children.first(), children.last()) {
            panel.push(Shape::Line {
                from: (x, y_of(first)),
                to: (x, y_of(last)),
                stroke: stroke.clone(),
            });
        }
    }

    if params.show_labels {
        for &(node, name) in &labelled {
            let y = y_of(node);
            let x = if params.align_labels {
                panel.push(Shape::Line {
                    from: (depths[node], y),
                    to: (ALIGN_GUIDE_TO * xmax, y),
                    stroke: Stroke::dashed(GUIDE_COLOR, 0.5),
                });
                ALIGN_LABEL_AT * xmax
            } else {
                depths[node]
            };
            panel.push(Shape::Text(
                TextLabel::new((x, y), format!(" {}", name), params.label_size)
                    .baseline(Baseline::Middle),
            ));
        }
    }

    let ticks = nice_ticks(0.0, 1.25 * xmax, 8)
        .into_iter()
        .map(|t| (t, format_tick(t)))
        .collect();
    panel.add_axis(Axis::new(Side::Top, ticks));

    let mut tips = tree.tips();
    tips.sort_by(|a, b| rows[*a].total_cmp(&rows[*b]));
    let order = tips
        .into_iter()
        .filter_map(|tip| tree.nodes[tip].name.clone())
        .collect();

    let mut figure = Figure::new(
        width.max(2.0 * MARGIN + panel_size.0 + label_px),
        height.max(3.0 * MARGIN + panel_size.1),
    );
    figure.add_panel(panel);
    Ok((figure, order))
}
