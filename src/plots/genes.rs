use super::{features::Arrow, head_length, hex_color, max_text_width, PX_PER_INCH};
use crate::genome::{GeneFeature, Strand};
use crate::utils::Result;
use canvas::{
    format_tick, nice_ticks, Axis, Figure, Panel, Shape, Side, Spines, Stroke, TextLabel,
};
use std::{collections::HashMap, str::FromStr};

const MARGIN: f64 = 20.0;
const TRACK_LINE_COLOR: &str = "#757575";
const DEFAULT_GENE_COLOR: &str = "#ec9631";

/// Which tracks carry gene labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelTrack {
    All,
    Top,
    Bottom,
}

impl FromStr for LabelTrack {
    type Err = String;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "all" => Ok(LabelTrack::All),
            "top" => Ok(LabelTrack::Top),
            "bottom" => Ok(LabelTrack::Bottom),
            _ => Err(format!(
                "Invalid label track: {}. Expected all, top or bottom",
                s
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeneParams {
    pub add_labels: bool,
    pub max_track_size: f64,
    pub trackname_size: f64,
    pub label_track: LabelTrack,
    pub label_rot: f64,
    pub label_size: f64,
    pub ylim: (f64, f64),
    pub width: f64,
    pub track_height: f64,
}

impl Default for GeneParams {
    fn default() -> Self {
        Self {
            add_labels: false,
            max_track_size: 5000.0,
            trackname_size: 18.0,
            label_track: LabelTrack::All,
            label_rot: 45.0,
            label_size: 12.0,
            ylim: (-3.0, 3.0),
            width: 12.0,
            track_height: 0.6,
        }
    }
}

fn gene_arrow(gene: &GeneFeature, y: f64, params: &GeneParams) -> Result<Arrow> {
    if gene.start >= gene.end {
        return Err(format!(
            "Gene {} has start {} not below its end {}",
            gene.label, gene.start, gene.end
        ));
    }
    let length = (gene.end - gene.start) as f64;
    let tail_x = match gene.strand {
        Strand::Forward => gene.start as f64,
        Strand::Reverse => gene.end as f64,
    };
    let head_width = params.ylim.1 - params.ylim.0;
    Ok(Arrow {
        tail: (tail_x, y),
        dx: length * gene.strand.sign(),
        shaft_width: head_width / 2.0,
        head_width,
        head_length: head_length(params.max_track_size, length),
    })
}

/// One horizontal track of gene arrows per entry of `order`, the first at the bottom
pub fn gene_tracks(
    tracks: &[(String, Vec<GeneFeature>)],
    order: &[String],
    params: &GeneParams,
) -> Result<Figure> {
    if order.is_empty() {
        return Err("No tracks to draw".to_string());
    }
    let by_name = tracks
        .iter()
        .map(|(name, genes)| (name.as_str(), genes))
        .collect::<HashMap<_, _>>();
    let default_fill = hex_color(DEFAULT_GENE_COLOR)?;
    let num_tracks = order.len();
    let top = num_tracks - 1;

    let width = params.width * PX_PER_INCH;
    let names_px = max_text_width(order, params.trackname_size) + 10.0;
    let labels_px = if params.add_labels {
        params.label_size * 6.0
    } else {
        0.0
    };
    let panel_size = (
        (width - 2.0 * MARGIN - names_px).max(50.0),
        num_tracks as f64 * params.track_height * PX_PER_INCH,
    );
    let mut panel = Panel::new(
        (MARGIN, MARGIN + labels_px),
        panel_size,
        (0.0, params.max_track_size),
        (0.0, 10.0 * num_tracks as f64),
    );
    panel.spines = Spines {
        bottom: true,
        ..Spines::none()
    };

    for k in 0..num_tracks {
        let y = 5.0 + 10.0 * k as f64;
        panel.push(Shape::Line {
            from: (0.0, y),
            to: (params.max_track_size, y),
            stroke: Stroke::solid(TRACK_LINE_COLOR, 1.0),
        });
    }

    for (k, name) in order.iter().enumerate() {
        let genes = by_name
            .get(name.as_str())
            .ok_or_else(|| format!("Track {} has no genes", name))?;
        let y = 5.0 + 10.0 * k as f64;
        let labelled = params.add_labels
            && match params.label_track {
                LabelTrack::All => true,
                LabelTrack::Top => k == top,
                LabelTrack::Bottom => k == 0,
            };
        for gene in genes.iter() {
            let arrow = gene_arrow(gene, y, params)?;
            let fill = match &gene.color {
                Some(color) => hex_color(color)?,
                None => default_fill.clone(),
            };
            panel.push(Shape::Polygon {
                points: arrow.polygon(),
                fill,
                opacity: 1.0,
                edge: None,
            });
            if labelled {
                let middle = arrow.tail.0 + arrow.dx / 2.0;
                panel.push(Shape::Text(
                    TextLabel::new((middle, y + 4.0), gene.label.clone(), params.label_size)
                        .rotation(params.label_rot),
                ));
            }
        }
    }

    let ticks = nice_ticks(0.0, params.max_track_size, 8)
        .into_iter()
        .map(|t| (t, format_tick(t)))
        .collect();
    panel.add_axis(Axis::new(Side::Bottom, ticks));
    let names = order
        .iter()
        .enumerate()
        .map(|(k, name)| (5.0 + 10.0 * k as f64, name.clone()))
        .collect();
    panel.add_axis(
        Axis::new(Side::Right, names)
            .tick_font_size(params.trackname_size)
            .tick_marks(false),
    );

    let mut figure = Figure::new(
        2.0 * MARGIN + panel_size.0 + names_px,
        panel.origin.1 + panel_size.1 + 2.0 * MARGIN,
    );
    figure.add_panel(panel);
    Ok(figure)
}
