use super::{features::feature_shape, hex_color, text_width, FeatureStyle, PX_PER_INCH};
use crate::genome::{Cds, Insertion};
use crate::utils::{GenomicRegion, Result};
use canvas::{
    format_tick, nice_ticks, Anchor, Axis, Baseline, Figure, Panel, Shape, Side, Spines, Stroke,
    TextLabel,
};
use std::{fmt, str::FromStr};

const MARGIN: f64 = 16.0;
const BAR_AXIS_MARGIN: f64 = 56.0;
const TRACK_LINE_COLOR: &str = "#808080";

/// Vertical placement of CDS labels relative to the track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VPos {
    Top,
    Center,
    Bottom,
}

/// Horizontal placement of CDS labels relative to the feature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HPos {
    Left,
    Center,
    Right,
}

/// Corner of the track that carries the range sublabel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SublabelPos {
    pub vpos: VPos,
    pub hpos: HPos,
}

impl FromStr for VPos {
    type Err = String;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "top" => Ok(VPos::Top),
            "center" => Ok(VPos::Center),
            "bottom" => Ok(VPos::Bottom),
            _ => Err(format!(
                "Invalid vertical position: {}. Expected top, center or bottom",
                s
            )),
        }
    }
}

impl FromStr for HPos {
    type Err = String;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "left" => Ok(HPos::Left),
            "center" => Ok(HPos::Center),
            "right" => Ok(HPos::Right),
            _ => Err(format!(
                "Invalid horizontal position: {}. Expected left, center or right",
                s
            )),
        }
    }
}

impl FromStr for SublabelPos {
    type Err = String;

    fn from_str(s: &str) -> Result<Self> {
        let (vpos, hpos) = s.split_once('-').ok_or_else(|| {
            format!(
                "Invalid sublabel position: {}. Expected e.g. bottom-right or top-left",
                s
            )
        })?;
        let vpos = vpos.parse::<VPos>()?;
        if vpos == VPos::Center {
            return Err(format!("Invalid sublabel position: {}. Use top or bottom", s));
        }
        Ok(SublabelPos {
            vpos,
            hpos: hpos.parse()?,
        })
    }
}

impl fmt::Display for SublabelPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let vpos = match self.vpos {
            VPos::Top => "top",
            VPos::Center => "center",
            VPos::Bottom => "bottom",
        };
        let hpos = match self.hpos {
            HPos::Left => "left",
            HPos::Center => "center",
            HPos::Right => "right",
        };
        write!(f, "{}-{}", vpos, hpos)
    }
}

#[derive(Debug, Clone)]
pub struct TnseqParams {
    pub fig_width: f64,
    pub track_start: u64,
    pub track_length: Option<u64>,
    pub track_height: f64,
    pub track_label: Option<String>,
    pub track_labelsize: f64,
    pub track_sublabelpos: SublabelPos,
    pub track_sublabelsize: f64,
    pub cds_plotstyle: FeatureStyle,
    pub cds_color: String,
    pub cds_label: bool,
    pub cds_labelsize: f64,
    pub cds_labvpos: VPos,
    pub cds_labhpos: HPos,
    pub cds_labrotation: f64,
    pub cds_arrowshaftratio: f64,
    pub bax_bottompos: f64,
    pub bax_height: f64,
    pub bax_ylabel: Option<String>,
    pub bax_ylabelsize: f64,
    pub bax_xticklabelsize: f64,
    pub bax_yticklabelsize: f64,
    pub bar_width: f64,
    pub bar_color: String,
    pub bar_alpha: f64,
}

impl Default for TnseqParams {
    fn default() -> Self {
        Self {
            fig_width: 10.0,
            track_start: 1,
            track_length: None,
            track_height: 0.6,
            track_label: None,
            track_labelsize: 12.0,
            track_sublabelpos: SublabelPos {
                vpos: VPos::Bottom,
                hpos: HPos::Right,
            },
            track_sublabelsize: 6.0,
            cds_plotstyle: FeatureStyle::BigArrow,
            cds_color: "lightblue".to_string(),
            cds_label: false,
            cds_labelsize: 6.0,
            cds_labvpos: VPos::Bottom,
            cds_labhpos: HPos::Center,
            cds_labrotation: 0.0,
            cds_arrowshaftratio: 0.5,
            bax_bottompos: 1.5,
            bax_height: 4.0,
            bax_ylabel: None,
            bax_ylabelsize: 10.0,
            bax_xticklabelsize: 8.0,
            bax_yticklabelsize: 8.0,
            bar_width: 1.0,
            bar_color: "grey".to_string(),
            bar_alpha: 0.7,
        }
    }
}

/// Formats a position with thousands separators
fn with_separators(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn integer_ticks(lo: f64, hi: f64, max_ticks: usize) -> Vec<(f64, String)> {
    nice_ticks(lo, hi, max_ticks)
        .into_iter()
        .map(|t| (t, format_tick(t)))
        .collect()
}

fn cds_label(cds: &Cds, params: &TnseqParams) -> TextLabel {
    let (x, anchor) = match params.cds_labhpos {
        HPos::Left => (cds.start as f64, Anchor::Start),
        HPos::Center => ((cds.start + cds.end) as f64 / 2.0, Anchor::Middle),
        HPos::Right => (cds.end as f64, Anchor::End),
    };
    let (y, baseline) = match params.cds_labvpos {
        VPos::Top => (1.0, Baseline::Alphabetic),
        VPos::Center => (0.0, Baseline::Middle),
        VPos::Bottom => (-1.0, Baseline::Hanging),
    };
    TextLabel::new((x, y), cds.name.clone(), params.cds_labelsize)
        .anchor(anchor)
        .baseline(baseline)
        .rotation(params.cds_labrotation)
}

fn track_panel(
    region: &GenomicRegion,
    cds: &[Cds],
    origin: (f64, f64),
    size: (f64, f64),
    params: &TnseqParams,
) -> Result<Panel> {
    let xlim = (region.start as f64, region.end as f64);
    let mut panel = Panel::new(origin, size, xlim, (-1.0, 1.0));
    let (sx, sy) = panel.scale();

    panel.push(Shape::Line {
        from: (xlim.0, 0.0),
        to: (xlim.1, 0.0),
        stroke: Stroke::solid(TRACK_LINE_COLOR, 1.0),
    });

    let default_fill = hex_color(&params.cds_color)?;
    let track_span = region.len() as f64;
    let visible = cds
        .iter()
        .filter(|c| region.contains_interval(c.start, c.end))
        .collect::<Vec<_>>();
    log::debug!(
        "{} of {} CDS fall inside {}-{}",
        visible.len(),
        cds.len(),
        region.start,
        region.end
    );
    for feature in &visible {
        let fill = match &feature.color {
            Some(color) => hex_color(color)?,
            None => default_fill.clone(),
        };
        panel.push(feature_shape(
            feature.start as f64,
            feature.end as f64,
            feature.strand,
            params.cds_plotstyle,
            track_span,
            params.cds_arrowshaftratio,
            &fill,
        ));
    }
    if params.cds_label {
        for feature in &visible {
            panel.push(Shape::Text(cds_label(feature, params)));
        }
    }

    if let Some(label) = &params.track_label {
        panel.push(Shape::Text(
            TextLabel::new((xlim.0 - 8.0 / sx, 0.0), label.clone(), params.track_labelsize)
                .anchor(Anchor::End)
                .baseline(Baseline::Middle),
        ));
    }

    let sublabel = format!(
        "{} - {} bp",
        with_separators(region.start),
        with_separators(region.end)
    );
    let pos = params.track_sublabelpos;
    let (x, anchor) = match pos.hpos {
        HPos::Left => (xlim.0, Anchor::Start),
        HPos::Center => ((xlim.0 + xlim.1) / 2.0, Anchor::Middle),
        HPos::Right => (xlim.1, Anchor::End),
    };
    // Two pixels of clearance from the track edge
    let (y, baseline) = match pos.vpos {
        VPos::Top => (1.0 - 2.0 / sy, Baseline::Alphabetic),
        _ => (-1.0 + 2.0 / sy, Baseline::Hanging),
    };
    panel.push(Shape::Text(
        TextLabel::new((x, y), sublabel, params.track_sublabelsize)
            .anchor(anchor)
            .baseline(baseline),
    ));
    Ok(panel)
}

fn bar_panel(
    region: &GenomicRegion,
    insertions: &[Insertion],
    origin: (f64, f64),
    size: (f64, f64),
    params: &TnseqParams,
) -> Result<Panel> {
    let visible = insertions
        .iter()
        .filter(|i| region.intersect_position(i.pos))
        .collect::<Vec<_>>();
    let max_count = visible.iter().map(|i| i.count).fold(0.0, f64::max);
    let ymax = if max_count > 0.0 { max_count * 1.05 } else { 1.0 };
    let xlim = (region.start as f64, region.end as f64);
    let mut panel = Panel::new(origin, size, xlim, (0.0, ymax));
    panel.spines = Spines {
        left: true,
        bottom: true,
        ..Spines::none()
    };

    let stroke = Stroke::solid(hex_color(&params.bar_color)?, params.bar_width)
        .with_opacity(params.bar_alpha);
    for insertion in &visible {
        let x = insertion.pos as f64;
        panel.push(Shape::Line {
            from: (x, 0.0),
            to: (x, insertion.count),
            stroke: stroke.clone(),
        });
    }

    panel.add_axis(
        Axis::new(Side::Bottom, integer_ticks(xlim.0, xlim.1, 8))
            .tick_font_size(params.bax_xticklabelsize),
    );
    panel.add_axis(
        Axis::new(Side::Left, integer_ticks(0.0, max_count.max(1.0), 6))
            .tick_font_size(params.bax_yticklabelsize)
            .label(params.bax_ylabel.clone(), params.bax_ylabelsize),
    );
    Ok(panel)
}

/// Insertion counts drawn as bars above a CDS track covering the same window
pub fn tnseq_plot(
    insertions: &[Insertion],
    cds: Option<&[Cds]>,
    params: &TnseqParams,
) -> Result<Figure> {
    let track_length = params
        .track_length
        .ok_or_else(|| "The CDS track length is not set".to_string())?;
    let cds = cds.ok_or_else(|| "No CDS list was passed to the Tn-seq plot".to_string())?;
    let region = GenomicRegion::from_start_length(
        params.track_label.as_deref().unwrap_or("track"),
        params.track_start,
        track_length,
    )?;

    let width = params.fig_width * PX_PER_INCH;
    let track_height = params.track_height * PX_PER_INCH;
    let label_width = params
        .track_label
        .as_ref()
        .map(|l| text_width(l, params.track_labelsize) + MARGIN)
        .unwrap_or(0.0);
    let left = (label_width + MARGIN).max(BAR_AXIS_MARGIN);
    let panel_width = width - left - MARGIN;
    if panel_width <= 0.0 {
        return Err(format!(
            "Figure width of {} inches leaves no room for the tracks",
            params.fig_width
        ));
    }

    let bar_height = params.bax_height * track_height;
    let bar_top = MARGIN;
    let track_top = bar_top + bar_height + (params.bax_bottompos - 1.0) * track_height;
    let height = track_top + track_height + 2.0 * MARGIN;

    let mut figure = Figure::new(width, height);
    figure.add_panel(bar_panel(
        &region,
        insertions,
        (left, bar_top),
        (panel_width, bar_height),
        params,
    )?);
    figure.add_panel(track_panel(
        &region,
        cds,
        (left, track_top),
        (panel_width, track_height),
        params,
    )?);
    Ok(figure)
}
