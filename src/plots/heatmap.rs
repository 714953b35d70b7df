use super::{max_text_width, Colormap, Rgb, PX_PER_INCH};
use crate::typing::LabeledMatrix;
use crate::utils::Result;
use canvas::{format_tick, nice_ticks, Axis, ColorBar, Figure, Panel, Shape, Side, Stroke};
use std::str::FromStr;

const MARGIN: f64 = 20.0;
const OUT_OF_RANGE_COLOR: &str = "#c8c8c8";
const CELL_EDGE_COLOR: &str = "#ffffff";
const COLORBAR_HEIGHT: f64 = 12.0;
const COLORBAR_STOPS: usize = 64;
const CMAP_RESOLUTION: usize = 256;

/// A named colour map or an explicit list of colours
#[derive(Debug, Clone, PartialEq)]
pub enum ColormapSpec {
    Named(String),
    List(Vec<String>),
}

impl FromStr for ColormapSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self> {
        if s.contains(',') {
            let colors = s
                .split(',')
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect::<Vec<_>>();
            Colormap::from_list(&colors)?;
            Ok(ColormapSpec::List(colors))
        } else {
            Colormap::by_name(s)?;
            Ok(ColormapSpec::Named(s.to_string()))
        }
    }
}

impl ColormapSpec {
    fn build(&self) -> Result<Colormap> {
        match self {
            ColormapSpec::Named(name) => Colormap::by_name(name),
            ColormapSpec::List(colors) => Colormap::from_list(colors),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HeatmapParams {
    pub width: f64,
    pub height: f64,
    pub order: Option<Vec<String>>,
    pub cmap: Option<ColormapSpec>,
    pub vmin: f64,
    pub vmax: f64,
    pub center: Option<f64>,
    pub yticklabels: bool,
    pub cbar: bool,
    pub font_size: f64,
    pub xtick_rotation: f64,
}

impl Default for HeatmapParams {
    fn default() -> Self {
        Self {
            width: 8.0,
            height: 8.0,
            order: None,
            cmap: None,
            vmin: 0.0,
            vmax: 100.0,
            center: None,
            yticklabels: true,
            cbar: false,
            font_size: 10.0,
            xtick_rotation: 90.0,
        }
    }
}

/// Value to colour mapping with dedicated colours below `vmin` and above `vmax`
struct ColorScale {
    cmap: Colormap,
    vmin: f64,
    vmax: f64,
}

impl ColorScale {
    fn new(params: &HeatmapParams) -> Result<Self> {
        if params.vmin.is_nan() || params.vmax.is_nan() || params.vmax <= params.vmin {
            return Err(format!(
                "Invalid colour range: vmin {} must be below vmax {}",
                params.vmin, params.vmax
            ));
        }
        let default_name = if params.center.is_some() {
            "icefire"
        } else {
            "rocket"
        };
        let base = match &params.cmap {
            Some(spec) => spec.build()?,
            None => Colormap::by_name(default_name)?,
        };
        let cmap = match params.center {
            Some(center) => {
                let vrange = (params.vmax - center).max(center - params.vmin);
                let (lo, hi) = (center - vrange, center + vrange);
                base.sub_range(
                    (params.vmin - lo) / (hi - lo),
                    (params.vmax - lo) / (hi - lo),
                    CMAP_RESOLUTION,
                )
            }
            None => base.sub_range(0.0, 1.0, CMAP_RESOLUTION),
        };
        Ok(Self {
            cmap,
            vmin: params.vmin,
            vmax: params.vmax,
        })
    }

    fn color(&self, value: f64) -> Option<String> {
        if value.is_nan() {
            return None;
        }
        if value < self.vmin || value > self.vmax {
            return Some(OUT_OF_RANGE_COLOR.to_string());
        }
        let t = (value - self.vmin) / (self.vmax - self.vmin);
        Some(self.cmap.sample(t).to_hex())
    }
}

/// Every how many labels a tick is drawn so that labels of `font_px` do not overlap.
/// `None` when not even one label fits.
fn tick_every(num_labels: usize, axis_px: f64, font_px: f64) -> Option<usize> {
    let max_ticks = (axis_px / font_px).floor();
    if max_ticks < 1.0 {
        return None;
    }
    Some(num_labels / max_ticks as usize + 1)
}

fn thinned_ticks(
    labels: &[String],
    axis_px: f64,
    font_px: f64,
    position: impl Fn(usize) -> f64,
) -> Vec<(f64, String)> {
    match tick_every(labels.len(), axis_px, font_px) {
        Some(every) => labels
            .iter()
            .enumerate()
            .step_by(every)
            .map(|(i, label)| (position(i), label.clone()))
            .collect(),
        None => Vec::new(),
    }
}

/// Space needed under the panel for the column labels
pub(super) fn column_label_space(matrix: &LabeledMatrix, params: &HeatmapParams) -> f64 {
    let longest = max_text_width(&matrix.col_labels, params.font_size);
    longest * params.xtick_rotation.to_radians().sin().abs() + 2.0 * params.font_size
}

/// Cells of `matrix` with row 0 at the bottom. Cell `(i, j)` covers `x ∈ [j, j+1]`,
/// `y ∈ [10i, 10i+10]`.
pub fn heatmap_panel(
    matrix: &LabeledMatrix,
    params: &HeatmapParams,
    origin: (f64, f64),
    size: (f64, f64),
) -> Result<Panel> {
    let scale = ColorScale::new(params)?;
    let (rows, cols) = matrix.shape();
    let mut panel = Panel::new(
        origin,
        size,
        (0.0, cols as f64),
        (0.0, 10.0 * rows as f64),
    );
    for i in 0..rows {
        for j in 0..cols {
            if let Some(fill) = scale.color(matrix.get(i, j)) {
                panel.push(Shape::Rect {
                    origin: (j as f64, 10.0 * i as f64),
                    size: (1.0, 10.0),
                    fill,
                    edge: Some(Stroke::solid(CELL_EDGE_COLOR, 0.5)),
                    opacity: 1.0,
                    corner: 0.0,
                });
            }
        }
    }

    let mut x_axis = Axis::new(
        Side::Bottom,
        thinned_ticks(&matrix.col_labels, size.0, params.font_size, |j| {
            j as f64 + 0.5
        }),
    )
    .tick_font_size(params.font_size);
    x_axis.tick_rotation = params.xtick_rotation;
    panel.add_axis(x_axis);
    if params.yticklabels {
        panel.add_axis(
            Axis::new(
                Side::Right,
                thinned_ticks(&matrix.row_labels, size.1, params.font_size, |i| {
                    10.0 * i as f64 + 5.0
                }),
            )
            .tick_font_size(params.font_size),
        );
    }
    Ok(panel)
}

/// Colour bar matching the heatmap colours between `vmin` and `vmax`
pub(super) fn heatmap_colorbar(
    params: &HeatmapParams,
    origin: (f64, f64),
    width: f64,
) -> Result<ColorBar> {
    let scale = ColorScale::new(params)?;
    Ok(ColorBar {
        origin,
        size: (width, COLORBAR_HEIGHT),
        stops: scale
            .cmap
            .resample(COLORBAR_STOPS)
            .into_iter()
            .map(Rgb::to_hex)
            .collect(),
        range: (params.vmin, params.vmax),
        ticks: nice_ticks(params.vmin, params.vmax, 6),
        font_size: params.font_size,
    })
}

pub(super) fn colorbar_space(params: &HeatmapParams) -> f64 {
    if params.cbar {
        COLORBAR_HEIGHT + 2.5 * params.font_size + 10.0
    } else {
        0.0
    }
}

/// Matrix heatmap with optional row reordering and colour bar
pub fn heatmap(matrix: &LabeledMatrix, params: &HeatmapParams) -> Result<Figure> {
    let reordered;
    let matrix = match &params.order {
        Some(order) => {
            let (m, unknown) = matrix.reindex_rows(order);
            if !unknown.is_empty() {
                log::warn!(
                    "{} labels of the order are not in the matrix and are left blank: {}",
                    unknown.len(),
                    unknown.join(", ")
                );
            }
            reordered = m;
            &reordered
        }
        None => matrix,
    };
    let (rows, cols) = matrix.shape();
    if rows == 0 || cols == 0 {
        return Err("Cannot draw a heatmap of an empty matrix".to_string());
    }

    let width = params.width * PX_PER_INCH;
    let height = params.height * PX_PER_INCH;
    let right = if params.yticklabels {
        max_text_width(&matrix.row_labels, params.font_size) + 14.0
    } else {
        MARGIN
    };
    let label_space = column_label_space(matrix, params);
    let bottom = label_space + colorbar_space(params) + MARGIN;
    let size = (
        (width - MARGIN - right).max(50.0),
        (height - MARGIN - bottom).max(50.0),
    );

    let mut figure = Figure::new(MARGIN + size.0 + right, MARGIN + size.1 + bottom);
    figure.add_panel(heatmap_panel(matrix, params, (MARGIN, MARGIN), size)?);
    if params.cbar {
        let y = MARGIN + size.1 + label_space + 10.0;
        figure
            .colorbars
            .push(heatmap_colorbar(params, (MARGIN, y), size.0)?);
    }
    log::debug!(
        "Heatmap of {}x{} cells, colour range {}-{}",
        rows,
        cols,
        format_tick(params.vmin),
        format_tick(params.vmax)
    );
    Ok(figure)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> LabeledMatrix {
        LabeledMatrix {
            row_labels: ["a", "b", "c"].map(String::from).to_vec(),
            col_labels: ["a", "b", "c"].map(String::from).to_vec(),
            values: vec![
                0.0, 12.0, 150.0, //
                12.0, 0.0, f64::NAN, //
                150.0, f64::NAN, -1.0,
            ],
        }
    }

    fn fills(panel: &Panel) -> Vec<String> {
        panel
            .shapes
            .iter()
            .filter_map(|s| match s {
                Shape::Rect { fill, .. } => Some(fill.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn nan_cells_are_blank_and_out_of_range_is_grey() {
        let figure = heatmap(&matrix(), &HeatmapParams::default()).unwrap();
        let fills = fills(&figure.panels[0]);
        assert_eq!(fills.len(), 7);
        assert_eq!(fills.iter().filter(|f| *f == OUT_OF_RANGE_COLOR).count(), 3);
    }

    #[test]
    fn default_map_is_rocket() {
        let scale = ColorScale::new(&HeatmapParams::default()).unwrap();
        let rocket = Colormap::by_name("rocket").unwrap();
        assert_eq!(scale.color(0.0), Some(rocket.sample(0.0).to_hex()));
        assert_eq!(scale.color(100.0), Some(rocket.sample(1.0).to_hex()));
    }

    #[test]
    fn centred_map_uses_the_matching_sub_range() {
        let params = HeatmapParams {
            center: Some(25.0),
            ..HeatmapParams::default()
        };
        let scale = ColorScale::new(&params).unwrap();
        let icefire = Colormap::by_name("icefire").unwrap();
        // vrange = 75, the map spans [-50, 100] so vmin sits at one third
        assert_eq!(scale.color(100.0), Some(icefire.sample(1.0).to_hex()));
        assert_eq!(scale.color(0.0), Some(icefire.sample(1.0 / 3.0).to_hex()));
    }

    #[test]
    fn invalid_range_is_rejected() {
        let params = HeatmapParams {
            vmin: 5.0,
            vmax: 5.0,
            ..HeatmapParams::default()
        };
        assert!(heatmap(&matrix(), &params).is_err());
    }

    #[test]
    fn tick_thinning_follows_label_density() {
        assert_eq!(tick_every(10, 200.0, 10.0), Some(1));
        assert_eq!(tick_every(20, 200.0, 10.0), Some(2));
        assert_eq!(tick_every(100, 200.0, 10.0), Some(6));
        assert_eq!(tick_every(5, 5.0, 10.0), None);
        let labels = (0..100).map(|i| format!("s{}", i)).collect::<Vec<_>>();
        let ticks = thinned_ticks(&labels, 200.0, 10.0, |i| i as f64);
        assert_eq!(ticks.len(), 17);
        assert_eq!(ticks[1], (6.0, "s6".to_string()));
    }

    #[test]
    fn order_reindexes_rows() {
        let params = HeatmapParams {
            order: Some(["c", "zz", "a"].map(String::from).to_vec()),
            ..HeatmapParams::default()
        };
        let figure = heatmap(&matrix(), &params).unwrap();
        let panel = &figure.panels[0];
        assert_eq!(panel.ylim, (0.0, 30.0));
        let y_axis = panel.axes.iter().find(|a| a.side == Side::Right).unwrap();
        let labels = y_axis.ticks.iter().map(|(_, l)| l.as_str()).collect::<Vec<_>>();
        assert_eq!(labels, vec!["c", "zz", "a"]);
        // The unknown row is entirely blank
        assert_eq!(fills(panel).len(), 2 + 3);
    }

    #[test]
    fn hidden_row_labels_and_colour_bar() {
        let params = HeatmapParams {
            yticklabels: false,
            cbar: true,
            ..HeatmapParams::default()
        };
        let figure = heatmap(&matrix(), &params).unwrap();
        assert!(figure.panels[0].axes.iter().all(|a| a.side != Side::Right));
        assert_eq!(figure.colorbars.len(), 1);
        let bar = &figure.colorbars[0];
        assert_eq!(bar.range, (0.0, 100.0));
        assert_eq!(bar.stops.len(), COLORBAR_STOPS);
        assert!(bar.origin.1 > figure.panels[0].origin.1 + figure.panels[0].size.1);
    }

    #[test]
    fn colour_map_specs_parse() {
        assert_eq!(
            "viridis".parse::<ColormapSpec>(),
            Ok(ColormapSpec::Named("viridis".to_string()))
        );
        assert_eq!(
            "white, red".parse::<ColormapSpec>(),
            Ok(ColormapSpec::List(vec!["white".to_string(), "red".to_string()]))
        );
        assert!("nosuchmap".parse::<ColormapSpec>().is_err());
        assert!("white,nosuchcolour".parse::<ColormapSpec>().is_err());
    }
}
