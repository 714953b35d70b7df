use super::{default_link_color, max_text_width, PX_PER_INCH};
use crate::typing::Dendrogram;
use crate::utils::Result;
use canvas::{format_tick, nice_ticks, Axis, Figure, Panel, Shape, Side, Spines, Stroke};

const MARGIN: f64 = 20.0;
const MIN_PANEL_SIZE: f64 = 50.0;

#[derive(Debug, Clone)]
pub struct RectreeParams {
    pub width: f64,
    pub height: f64,
    pub scale_max: f64,
    pub no_labels: bool,
    pub label_size: f64,
    pub line_width: f64,
}

impl Default for RectreeParams {
    fn default() -> Self {
        Self {
            width: 15.0,
            height: 15.0,
            scale_max: 10.0,
            no_labels: false,
            label_size: 10.0,
            line_width: 1.0,
        }
    }
}

/// Distance scale ticks: every integer for short scales, round steps otherwise
pub(super) fn scale_ticks(scale_max: f64) -> Vec<(f64, String)> {
    let ticks = if scale_max <= 20.0 {
        (0..=scale_max.floor() as i64).map(|t| t as f64).collect()
    } else {
        nice_ticks(0.0, scale_max, 10)
    };
    ticks.into_iter().map(|t| (t, format_tick(t))).collect()
}

/// Draws the dendrogram links into a panel whose x axis is height and y axis is leaf position
pub(super) fn draw_links(panel: &mut Panel, dendro: &Dendrogram, line_width: f64) {
    for ((icoord, dcoord), color) in dendro
        .icoord
        .iter()
        .zip(&dendro.dcoord)
        .zip(&dendro.colors)
    {
        let points = dcoord
            .iter()
            .zip(icoord)
            .map(|(&d, &i)| (d, i))
            .collect::<Vec<_>>();
        panel.push(Shape::Polyline {
            points,
            stroke: Stroke::solid(default_link_color(color), line_width),
        });
    }
}

/// Rectangular dendrogram with the root on the left and leaves on the right
pub fn rectree(dendro: &Dendrogram, params: &RectreeParams) -> Result<(Figure, Vec<String>)> {
    if params.scale_max <= 0.0 {
        return Err(format!(
            "Invalid scale maximum {}: must be positive",
            params.scale_max
        ));
    }
    let num_leaves = dendro.num_leaves();
    let width = params.width * PX_PER_INCH;
    let height = params.height * PX_PER_INCH;
    let label_space = if params.no_labels {
        0.0
    } else {
        max_text_width(&dendro.labels, params.label_size) + 10.0
    };
    let panel_size = (
        (width - 2.0 * MARGIN - label_space).max(MIN_PANEL_SIZE),
        (height - 3.0 * MARGIN).max(MIN_PANEL_SIZE),
    );

    let mut panel = Panel::new(
        (MARGIN, 2.0 * MARGIN),
        panel_size,
        (params.scale_max, 0.0),
        (0.0, 10.0 * num_leaves as f64),
    );
    panel.clip = true;
    panel.spines = Spines {
        top: true,
        ..Spines::none()
    };
    draw_links(&mut panel, dendro, params.line_width);
    panel.add_axis(Axis::new(Side::Top, scale_ticks(params.scale_max)));
    if !params.no_labels {
        let ticks = dendro
            .labels
            .iter()
            .enumerate()
            .map(|(k, label)| (Dendrogram::leaf_x(k), label.clone()))
            .collect();
        panel.add_axis(
            Axis::new(Side::Right, ticks)
                .tick_font_size(params.label_size)
                .tick_marks(false),
        );
    }
    if dendro.max_height() > params.scale_max {
        log::warn!(
            "Tree height {} exceeds the scale maximum {}, the root is cut off",
            dendro.max_height(),
            params.scale_max
        );
    }

    let panel_right = MARGIN + panel_size.0 + label_space + MARGIN;
    let mut figure = Figure::new(width.max(panel_right), height.max(3.0 * MARGIN + panel_size.1));
    figure.add_panel(panel);
    Ok((figure, dendro.labels.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typing::{dendrogram, linkage, DistanceMatrix, Linkage};

    fn small_dendrogram() -> Dendrogram {
        let labels = ["a", "b", "c", "d"].map(String::from).to_vec();
        let values = vec![
            0.0, 2.0, 6.0, 10.0, //
            2.0, 0.0, 5.0, 9.0, //
            6.0, 5.0, 0.0, 4.0, //
            10.0, 9.0, 4.0, 0.0,
        ];
        let matrix = DistanceMatrix::new(labels.clone(), values).unwrap();
        let merges = linkage(&matrix, Linkage::Single).unwrap();
        dendrogram(&merges, &labels, None).unwrap()
    }

    #[test]
    fn one_polyline_per_merge_and_reversed_scale() {
        let dendro = small_dendrogram();
        let (figure, order) = rectree(&dendro, &RectreeParams::default()).unwrap();
        let panel = &figure.panels[0];
        assert_eq!(panel.xlim, (10.0, 0.0));
        assert_eq!(panel.ylim, (0.0, 40.0));
        let lines = panel
            .shapes
            .iter()
            .filter(|s| matches!(s, Shape::Polyline { .. }))
            .count();
        assert_eq!(lines, 3);
        assert_eq!(order, dendro.labels);
        assert_eq!(panel.axes.len(), 2);
        assert_eq!(panel.axes[1].ticks[0], (5.0, order[0].clone()));
    }

    #[test]
    fn no_labels_drops_the_label_axis() {
        let dendro = small_dendrogram();
        let params = RectreeParams {
            no_labels: true,
            ..RectreeParams::default()
        };
        let (figure, _) = rectree(&dendro, &params).unwrap();
        assert_eq!(figure.panels[0].axes.len(), 1);
        assert_eq!(figure.panels[0].axes[0].side, Side::Top);
    }

    #[test]
    fn scale_ticks_switch_to_round_steps() {
        assert_eq!(scale_ticks(3.0).len(), 4);
        assert_eq!(scale_ticks(20.0).len(), 21);
        let wide = scale_ticks(1000.0);
        assert!(wide.len() <= 10);
        assert_eq!(wide[0].1, "0");
    }

    #[test]
    fn non_positive_scale_is_rejected() {
        let params = RectreeParams {
            scale_max: 0.0,
            ..RectreeParams::default()
        };
        assert!(rectree(&small_dendrogram(), &params).is_err());
    }
}
