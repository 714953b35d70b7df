use super::heatmap::{colorbar_space, column_label_space, heatmap_colorbar};
use super::rectree::draw_links;
use super::{heatmap_panel, max_text_width, HeatmapParams, PX_PER_INCH};
use crate::typing::{Dendrogram, DistanceMatrix};
use crate::utils::Result;
use canvas::{format_tick, nice_ticks, Axis, Figure, Panel, Side, Spines};

const MARGIN: f64 = 20.0;
const PANEL_GAP: f64 = 6.0;

#[derive(Debug, Clone)]
pub struct TypingFigureParams {
    pub width: f64,
    pub height: Option<f64>,
    pub dendrogram_fraction: f64,
    pub line_width: f64,
    pub heatmap: HeatmapParams,
}

impl Default for TypingFigureParams {
    fn default() -> Self {
        Self {
            width: 14.0,
            height: None,
            dendrogram_fraction: 0.25,
            line_width: 1.0,
            heatmap: HeatmapParams::default(),
        }
    }
}

/// Dendrogram on the left, pairwise distances on the right, rows and columns in leaf order
pub fn typing_figure(
    dendro: &Dendrogram,
    matrix: &DistanceMatrix,
    params: &TypingFigureParams,
) -> Result<(Figure, Vec<String>)> {
    if !(0.0..1.0).contains(&params.dendrogram_fraction) {
        return Err(format!(
            "Invalid dendrogram fraction {}: must be in [0, 1)",
            params.dendrogram_fraction
        ));
    }
    let ordered = matrix.reorder(&dendro.leaves)?;
    if ordered.labels != dendro.labels {
        return Err("Dendrogram leaves do not match the distance matrix labels".to_string());
    }
    let labeled = ordered.to_labeled();
    let heatmap_params = HeatmapParams {
        order: None,
        ..params.heatmap.clone()
    };
    let font_size = heatmap_params.font_size;
    let num_leaves = dendro.num_leaves();

    let width = params.width * PX_PER_INCH;
    let panel_height = params
        .height
        .map(|h| h * PX_PER_INCH - 3.0 * MARGIN)
        .unwrap_or(num_leaves as f64 * font_size * 1.4)
        .max(50.0);
    let right = if heatmap_params.yticklabels {
        max_text_width(&labeled.row_labels, font_size) + 14.0
    } else {
        MARGIN
    };
    let label_space = column_label_space(&labeled, &heatmap_params);
    let bottom = label_space + colorbar_space(&heatmap_params) + MARGIN;
    let available = (width - 2.0 * MARGIN - PANEL_GAP - right).max(100.0);
    let dendro_width = available * params.dendrogram_fraction;
    let heat_width = available - dendro_width;
    let top = 2.0 * MARGIN;

    let max_height = dendro.max_height();
    let scale_max = if max_height > 0.0 {
        max_height * 1.05
    } else {
        1.0
    };
    let mut tree_panel = Panel::new(
        (MARGIN, top),
        (dendro_width, panel_height),
        (scale_max, 0.0),
        (0.0, 10.0 * num_leaves as f64),
    );
    tree_panel.spines = Spines {
        top: true,
        ..Spines::none()
    };
    draw_links(&mut tree_panel, dendro, params.line_width);
    let ticks = nice_ticks(0.0, scale_max, 5)
        .into_iter()
        .map(|t| (t, format_tick(t)))
        .collect();
    tree_panel.add_axis(Axis::new(Side::Top, ticks));

    let heat_x = MARGIN + dendro_width + PANEL_GAP;
    let heat_panel = heatmap_panel(
        &labeled,
        &heatmap_params,
        (heat_x, top),
        (heat_width, panel_height),
    )?;

    let mut figure = Figure::new(
        heat_x + heat_width + right + MARGIN,
        top + panel_height + bottom,
    );
    figure.add_panel(tree_panel);
    figure.add_panel(heat_panel);
    if heatmap_params.cbar {
        let y = top + panel_height + label_space + 10.0;
        figure
            .colorbars
            .push(heatmap_colorbar(&heatmap_params, (heat_x, y), heat_width)?);
    }
    Ok((figure, dendro.labels.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typing::{dendrogram, linkage, Linkage};
    use canvas::Shape;

    fn matrix() -> DistanceMatrix {
        let labels = ["x", "y", "z"].map(String::from).to_vec();
        let values = vec![
            0.0, 9.0, 1.0, //
            9.0, 0.0, 8.0, //
            1.0, 8.0, 0.0,
        ];
        DistanceMatrix::new(labels, values).unwrap()
    }

    #[test]
    fn heatmap_rows_follow_the_leaves() {
        let matrix = matrix();
        let merges = linkage(&matrix, Linkage::Average).unwrap();
        let dendro = dendrogram(&merges, &matrix.labels, None).unwrap();
        let (figure, order) = typing_figure(&dendro, &matrix, &TypingFigureParams::default()).unwrap();
        assert_eq!(order, dendro.labels);
        assert_eq!(figure.panels.len(), 2);

        let (tree, heat) = (&figure.panels[0], &figure.panels[1]);
        assert_eq!(tree.ylim, heat.ylim);
        assert_eq!(tree.origin.1, heat.origin.1);
        assert_eq!(tree.size.1, heat.size.1);
        assert!(tree.xlim.0 > tree.xlim.1);

        let rows = heat
            .axes
            .iter()
            .find(|a| a.side == Side::Right)
            .unwrap()
            .ticks
            .iter()
            .map(|(_, l)| l.clone())
            .collect::<Vec<_>>();
        assert_eq!(rows, order);
        let cells = heat
            .shapes
            .iter()
            .filter(|s| matches!(s, Shape::Rect { .. }))
            .count();
        assert_eq!(cells, 9);
    }

    #[test]
    fn colour_bar_sits_under_the_heatmap() {
        let matrix = matrix();
        let merges = linkage(&matrix, Linkage::Single).unwrap();
        let dendro = dendrogram(&merges, &matrix.labels, None).unwrap();
        let params = TypingFigureParams {
            heatmap: HeatmapParams {
                cbar: true,
                vmax: 10.0,
                ..HeatmapParams::default()
            },
            ..TypingFigureParams::default()
        };
        let (figure, _) = typing_figure(&dendro, &matrix, &params).unwrap();
        assert_eq!(figure.colorbars.len(), 1);
        assert_eq!(figure.colorbars[0].origin.0, figure.panels[1].origin.0);
    }
}
