use super::{hex_color, max_text_width, Colormap, Rgb, PX_PER_INCH};
use crate::typing::{Dendrogram, LinkColor};
use crate::utils::Result;
use canvas::{
    Anchor, Baseline, Figure, Legend, LegendEntry, Marker, Panel, Shape, Stroke, TextLabel,
};
use itertools::Itertools;
use std::collections::HashMap;

const MARGIN: f64 = 20.0;
const LABEL_RADIUS: f64 = 1.05;
const RING_WIDTH: f64 = 0.1;
const RING_SPACE: f64 = 0.05;
const RING_PALETTES: [&str; 4] = ["tab10", "Set2", "Set1", "Paired"];
const MISSING_CLASS_COLOR: &str = "#d3d3d3";
const DEFAULT_POINT_COLOR: &str = "#008000";

/// Colour and legend category of a leaf point
#[derive(Debug, Clone, PartialEq)]
pub struct PointStyle {
    pub color: String,
    pub category: String,
}

/// One ring of sample classes drawn around the tree
#[derive(Debug, Clone, PartialEq)]
pub struct ClassTrack {
    pub name: String,
    pub classes: HashMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct CircularParams {
    pub width: f64,
    pub height: f64,
    pub fontsize: f64,
    pub open_angle: f64,
    pub start_angle: f64,
    pub add_labels: bool,
    pub label_colors: Option<HashMap<String, String>>,
    pub add_points: bool,
    pub point_size: f64,
    /// Point styles per leaf label, in table order; the legend lists categories in this order
    pub point_colors: Option<Vec<(String, PointStyle)>>,
    pub point_legend_title: String,
    pub branch_color: bool,
    pub palette: String,
    pub sample_classes: Vec<ClassTrack>,
    pub line_width: f64,
}

impl Default for CircularParams {
    fn default() -> Self {
        Self {
            width: 10.0,
            height: 10.0,
            fontsize: 8.0,
            open_angle: 0.0,
            start_angle: 0.0,
            add_labels: true,
            label_colors: None,
            add_points: false,
            point_size: 15.0,
            point_colors: None,
            point_legend_title: "Category".to_string(),
            branch_color: false,
            palette: "gist_rainbow".to_string(),
            sample_classes: Vec::new(),
            line_width: 1.0,
        }
    }
}

fn polar(radius: f64, angle: f64) -> (f64, f64) {
    let rad = angle.to_radians();
    (radius * rad.cos(), radius * rad.sin())
}

/// Maps dendrogram coordinates to polar ones
struct Projection {
    xmax: f64,
    hmax: f64,
    sweep: f64,
    start: f64,
}

impl Projection {
    fn angle(&self, x: f64) -> f64 {
        self.sweep * x / self.xmax + self.start
    }

    fn radius(&self, height: f64) -> f64 {
        1.0 - height / self.hmax
    }
}

fn check_coverage<T>(what: &str, labels: &[String], map: &HashMap<String, T>) -> Result<()> {
    let missing = labels
        .iter()
        .filter(|l| !map.contains_key(*l))
        .collect::<Vec<_>>();
    if missing.is_empty() {
        return Ok(());
    }
    Err(format!(
        "{} colours are missing for {} leaves: {}",
        what,
        missing.len(),
        missing.iter().take(10).join(", ")
    ))
}

fn branch_colors(dendro: &Dendrogram, params: &CircularParams) -> Result<Vec<String>> {
    let black = Rgb::BLACK.to_hex();
    if !params.branch_color {
        return Ok(vec![black; dendro.colors.len()]);
    }
    let clusters = dendro
        .colors
        .iter()
        .filter(|c| **c != LinkColor::Above)
        .copied()
        .sorted()
        .dedup()
        .collect::<Vec<_>>();
    let palette = Colormap::by_name(&params.palette)?.resample(clusters.len());
    let lookup = clusters
        .iter()
        .zip(&palette)
        .map(|(c, rgb)| (*c, rgb.to_hex()))
        .collect::<HashMap<_, _>>();
    Ok(dendro
        .colors
        .iter()
        .map(|c| lookup.get(c).cloned().unwrap_or_else(|| black.clone()))
        .collect())
}

fn leaf_label(label: &str, radius: f64, angle: f64, size: f64, color: String) -> TextLabel {
    let angle = angle.rem_euclid(360.0);
    // Text on the left half is turned around so it never reads upside down
    let (rotation, anchor) = if angle > 90.0 && angle < 270.0 {
        (angle - 180.0, Anchor::End)
    } else {
        (angle, Anchor::Start)
    };
    TextLabel::new(polar(radius, angle), label, size)
        .anchor(anchor)
        .baseline(Baseline::Middle)
        .rotation(rotation)
        .color(color)
}

fn class_rings(
    panel: &mut Panel,
    dendro: &Dendrogram,
    projection: &Projection,
    params: &CircularParams,
) -> Result<Vec<Legend>> {
    let num_rings = params.sample_classes.len();
    let outermost = LABEL_RADIUS
        + RING_WIDTH * num_rings as f64
        + RING_SPACE * num_rings.saturating_sub(1) as f64;
    let mut legends = Vec::with_capacity(num_rings);
    for (j, track) in params.sample_classes.iter().enumerate() {
        let outer = outermost - j as f64 * (RING_WIDTH + RING_SPACE);
        let inner = outer - RING_WIDTH;
        let classes = track.classes.values().sorted().dedup().collect::<Vec<_>>();
        let palette_name = RING_PALETTES[j % RING_PALETTES.len()];
        let palette = Colormap::by_name(palette_name)?.resample(classes.len());
        let colors = classes
            .iter()
            .zip(&palette)
            .map(|(class, rgb)| (class.as_str(), rgb.to_hex()))
            .collect::<HashMap<_, _>>();

        let mut missing = 0;
        for (k, label) in dendro.labels.iter().enumerate() {
            let fill = match track.classes.get(label) {
                Some(class) => colors[class.as_str()].clone(),
                None => {
                    missing += 1;
                    MISSING_CLASS_COLOR.to_string()
                }
            };
            let left = 10.0 * k as f64;
            panel.push(Shape::Sector {
                center: (0.0, 0.0),
                inner,
                outer,
                start: projection.angle(left),
                end: projection.angle(left + 10.0),
                fill,
            });
        }
        if missing > 0 {
            log::warn!(
                "{} leaves have no class in ring {}, drawn in grey",
                missing,
                track.name
            );
        }
        legends.push(Legend {
            pos: (0.0, 0.0),
            title: Some(track.name.clone()),
            entries: classes
                .iter()
                .map(|class| LegendEntry {
                    label: class.to_string(),
                    color: colors[class.as_str()].clone(),
                    marker: Marker::Line,
                })
                .collect(),
            font_size: params.fontsize + 2.0,
        });
    }
    Ok(legends)
}

fn legend_width(legend: &Legend) -> f64 {
    let entries = max_text_width(legend.entries.iter().map(|e| &e.label), legend.font_size);
    // Entry labels are indented past the marker
    (entries + 2.0 * legend.font_size).max(max_text_width(legend.title.iter(), legend.font_size))
}

fn point_legend(params: &CircularParams) -> Option<Legend> {
    let styles = params.point_colors.as_ref()?;
    let entries = styles
        .iter()
        .map(|(_, style)| style)
        .unique_by(|style| style.category.clone())
        .map(|style| LegendEntry {
            label: style.category.clone(),
            color: hex_color(&style.color).unwrap_or_else(|_| Rgb::BLACK.to_hex()),
            marker: Marker::Circle,
        })
        .collect();
    Some(Legend {
        pos: (0.0, 0.0),
        title: Some(params.point_legend_title.clone()),
        entries,
        font_size: params.fontsize + 2.0,
    })
}

/// Radial dendrogram: leaves on the unit circle, the root at the centre
pub fn circular_tree(dendro: &Dendrogram, params: &CircularParams) -> Result<Figure> {
    if !(0.0..360.0).contains(&params.open_angle) {
        return Err(format!(
            "Invalid open angle {}: must be in [0, 360)",
            params.open_angle
        ));
    }
    if let Some(colors) = &params.label_colors {
        check_coverage("Label", &dendro.labels, colors)?;
    }
    let point_styles = params.point_colors.as_ref().map(|styles| {
        styles
            .iter()
            .map(|(label, style)| (label.clone(), style))
            .collect::<HashMap<_, _>>()
    });
    if let Some(styles) = &point_styles {
        check_coverage("Point", &dendro.labels, styles)?;
    }

    let hmax = dendro.max_height();
    let projection = Projection {
        xmax: dendro.max_x(),
        hmax: if hmax > 0.0 { hmax } else { 1.0 },
        sweep: 360.0 - params.open_angle,
        start: params.start_angle,
    };

    let num_rings = params.sample_classes.len();
    let ring_offset = if num_rings > 0 {
        RING_WIDTH * num_rings as f64 + RING_SPACE * (num_rings - 1) as f64 + 0.05
    } else {
        0.0
    };
    let label_radius = LABEL_RADIUS + ring_offset;
    let limit = label_radius;

    let width = params.width * PX_PER_INCH;
    let height = params.height * PX_PER_INCH;
    let label_px = if params.add_labels {
        max_text_width(&dendro.labels, params.fontsize) + 8.0
    } else {
        0.0
    };
    let mut panel = Panel::new((0.0, 0.0), (1.0, 1.0), (-limit, limit), (-limit, limit));

    let mut legends = Vec::new();
    if params.add_points {
        legends.extend(point_legend(params));
    }
    legends.extend(class_rings(&mut panel, dendro, &projection, params)?);
    let legend_space = if legends.is_empty() {
        0.0
    } else {
        legends.iter().map(legend_width).fold(0.0, f64::max) + 40.0
    };

    let side = ((width - legend_space).min(height) - 2.0 * MARGIN - 2.0 * label_px).max(100.0);
    panel.origin = (MARGIN + label_px, MARGIN + label_px);
    panel.size = (side, side);

    let colors = branch_colors(dendro, params)?;
    for ((icoord, dcoord), color) in dendro.icoord.iter().zip(&dendro.dcoord).zip(colors) {
        let stroke = Stroke::solid(color, params.line_width);
        let left = projection.angle(icoord[0]);
        let right = projection.angle(icoord[3]);
        let parent = projection.radius(dcoord[1]);
        panel.push(Shape::Line {
            from: polar(projection.radius(dcoord[0]), left),
            to: polar(parent, left),
            stroke: stroke.clone(),
        });
        panel.push(Shape::Line {
            from: polar(projection.radius(dcoord[3]), right),
            to: polar(parent, right),
            stroke: stroke.clone(),
        });
        panel.push(Shape::Arc {
            center: (0.0, 0.0),
            radius: parent,
            start: left,
            end: right,
            stroke,
        });
    }

    let point_radius = params.point_size.max(0.0).sqrt() / 2.0;
    for (k, label) in dendro.labels.iter().enumerate() {
        let angle = projection.angle(Dendrogram::leaf_x(k));
        if params.add_points {
            let fill = match point_styles.as_ref().and_then(|m| m.get(label)) {
                Some(style) => hex_color(&style.color)?,
                None => DEFAULT_POINT_COLOR.to_string(),
            };
            panel.push(Shape::Marker {
                center: polar(1.0, angle),
                radius: point_radius,
                fill,
            });
        }
        if params.add_labels {
            let color = match params.label_colors.as_ref().and_then(|m| m.get(label)) {
                Some(color) => hex_color(color)?,
                None => Rgb::BLACK.to_hex(),
            };
            panel.push(Shape::Text(leaf_label(
                label,
                label_radius,
                angle,
                params.fontsize,
                color,
            )));
        }
    }

    let panel_right = panel.origin.0 + side + label_px;
    let mut legend_y = MARGIN;
    for legend in legends.iter_mut() {
        legend.pos = (panel_right + 20.0, legend_y);
        legend_y += legend.height() + 10.0;
    }

    let mut figure = Figure::new(
        width.max(panel_right + legend_space + MARGIN),
        height.max(side + 2.0 * (MARGIN + label_px)).max(legend_y + MARGIN),
    );
    figure.add_panel(panel);
    figure.legends = legends;
    Ok(figure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typing::{dendrogram, linkage, DistanceMatrix, Linkage};

    fn labels() -> Vec<String> {
        ["s1", "s2", "s3", "s4", "s5"].map(String::from).to_vec()
    }

    fn tree() -> Dendrogram {
        let values = vec![
            0.0, 1.0, 4.0, 8.0, 9.0, //
            1.0, 0.0, 4.0, 8.0, 9.0, //
            4.0, 4.0, 0.0, 8.0, 9.0, //
            8.0, 8.0, 8.0, 0.0, 2.0, //
            9.0, 9.0, 9.0, 2.0, 0.0,
        ];
        let matrix = DistanceMatrix::new(labels(), values).unwrap();
        let merges = linkage(&matrix, Linkage::Average).unwrap();
        dendrogram(&merges, &labels(), None).unwrap()
    }

    fn shapes<'a>(figure: &'a Figure, pred: impl Fn(&Shape) -> bool + 'a) -> Vec<&'a Shape> {
        figure.panels[0].shapes.iter().filter(|s| pred(s)).collect()
    }

    #[test]
    fn two_radial_lines_and_an_arc_per_merge() {
        let dendro = tree();
        let figure = circular_tree(&dendro, &CircularParams::default()).unwrap();
        assert_eq!(shapes(&figure, |s| matches!(s, Shape::Arc { .. })).len(), 4);
        assert_eq!(shapes(&figure, |s| matches!(s, Shape::Line { .. })).len(), 8);
        assert_eq!(shapes(&figure, |s| matches!(s, Shape::Text(_))).len(), 5);
        assert!(figure.legends.is_empty());
    }

    #[test]
    fn root_arc_sits_at_the_centre() {
        let dendro = tree();
        let figure = circular_tree(&dendro, &CircularParams::default()).unwrap();
        let min_radius = shapes(&figure, |s| matches!(s, Shape::Arc { .. }))
            .into_iter()
            .filter_map(|s| match s {
                Shape::Arc { radius, .. } => Some(*radius),
                _ => None,
            })
            .fold(f64::INFINITY, f64::min);
        assert!(min_radius.abs() < 1e-12);
    }

    #[test]
    fn left_half_labels_are_flipped() {
        let right = leaf_label("a", 1.05, 30.0, 8.0, "#000000".to_string());
        assert_eq!(right.rotation, 30.0);
        assert_eq!(right.anchor, Anchor::Start);
        let left = leaf_label("a", 1.05, 200.0, 8.0, "#000000".to_string());
        assert_eq!(left.rotation, 20.0);
        assert_eq!(left.anchor, Anchor::End);
        let wrapped = leaf_label("a", 1.05, 370.0, 8.0, "#000000".to_string());
        assert!((wrapped.rotation - 10.0).abs() < 1e-9);
    }

    #[test]
    fn open_angle_limits_the_sweep() {
        let projection = Projection {
            xmax: 45.0,
            hmax: 1.0,
            sweep: 360.0 - 90.0,
            start: 45.0,
        };
        assert_eq!(projection.angle(45.0), 315.0);
        assert_eq!(projection.angle(0.0), 45.0);
        assert_eq!(projection.radius(0.5), 0.5);
    }

    #[test]
    fn label_colours_must_cover_every_leaf() {
        let mut colors = HashMap::new();
        colors.insert("s1".to_string(), "red".to_string());
        let params = CircularParams {
            label_colors: Some(colors),
            ..CircularParams::default()
        };
        let err = circular_tree(&tree(), &params).unwrap_err();
        assert!(err.starts_with("Label colours are missing for 4 leaves"));
    }

    #[test]
    fn points_get_a_category_legend() {
        let styles = labels()
            .into_iter()
            .enumerate()
            .map(|(i, l)| {
                let category = if i < 3 { "ST1" } else { "ST2" };
                let color = if i < 3 { "red" } else { "blue" };
                (
                    l,
                    PointStyle {
                        color: color.to_string(),
                        category: category.to_string(),
                    },
                )
            })
            .collect();
        let params = CircularParams {
            add_points: true,
            point_colors: Some(styles),
            ..CircularParams::default()
        };
        let figure = circular_tree(&tree(), &params).unwrap();
        assert_eq!(shapes(&figure, |s| matches!(s, Shape::Marker { .. })).len(), 5);
        assert_eq!(figure.legends.len(), 1);
        let entries = &figure.legends[0].entries;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].color, "#ff0000");
    }

    #[test]
    fn point_legend_follows_table_order() {
        let styles = labels()
            .into_iter()
            .enumerate()
            .rev()
            .map(|(i, l)| {
                let category = if i % 2 == 0 { "even" } else { "odd" };
                (
                    l,
                    PointStyle {
                        color: "k".to_string(),
                        category: category.to_string(),
                    },
                )
            })
            .collect::<Vec<_>>();
        let first = styles[0].1.category.clone();
        let params = CircularParams {
            add_points: true,
            point_colors: Some(styles),
            ..CircularParams::default()
        };
        let figure = circular_tree(&tree(), &params).unwrap();
        let labels = figure.legends[0]
            .entries
            .iter()
            .map(|e| e.label.clone())
            .collect::<Vec<_>>();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0], first);
    }

    #[test]
    fn class_rings_draw_one_sector_per_leaf_and_push_labels_out() {
        let classes = labels()
            .into_iter()
            .enumerate()
            .filter(|(i, _)| *i != 4)
            .map(|(i, l)| (l, format!("clade{}", i % 2)))
            .collect();
        let params = CircularParams {
            sample_classes: vec![
                ClassTrack {
                    name: "Clade".to_string(),
                    classes,
                },
                ClassTrack {
                    name: "Host".to_string(),
                    classes: labels().into_iter().map(|l| (l, "cow".to_string())).collect(),
                },
            ],
            ..CircularParams::default()
        };
        let figure = circular_tree(&tree(), &params).unwrap();
        let sectors = shapes(&figure, |s| matches!(s, Shape::Sector { .. }));
        assert_eq!(sectors.len(), 10);
        if let Shape::Sector { inner, outer, .. } = sectors[0] {
            assert!((outer - 1.30).abs() < 1e-9);
            assert!((inner - 1.20).abs() < 1e-9);
        }
        assert_eq!(figure.legends.len(), 2);
        assert_eq!(figure.legends[0].title.as_deref(), Some("Clade"));
        assert!((figure.panels[0].xlim.1 - 1.35).abs() < 1e-9);
    }

    #[test]
    fn branch_colours_use_the_palette() {
        let params = CircularParams {
            branch_color: true,
            ..CircularParams::default()
        };
        let dendro = tree();
        let colors = branch_colors(&dendro, &params).unwrap();
        assert_eq!(colors.len(), dendro.colors.len());
        for (color, link) in colors.iter().zip(&dendro.colors) {
            if *link == LinkColor::Above {
                assert_eq!(color, "#000000");
            }
        }
        let params = CircularParams {
            palette: "nope".to_string(),
            ..params
        };
        assert!(circular_tree(&dendro, &params).is_err());
    }

    #[test]
    fn open_angle_is_validated() {
        let params = CircularParams {
            open_angle: 360.0,
            ..CircularParams::default()
        };
        assert!(circular_tree(&tree(), &params).is_err());
    }
}
