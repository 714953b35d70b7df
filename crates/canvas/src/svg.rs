use crate::figure::{
    Anchor, Axis, Baseline, ColorBar, Figure, FontConfig, Legend, Marker, Panel, Shape, Side,
    Stroke, TextLabel,
};
use crate::ticks::format_tick;
use std::{fs, path::Path};

const TICK_LEN: f64 = 3.5;
const TICK_PAD: f64 = 2.0;
const SPINE_WIDTH: f64 = 0.8;

pub fn generate_string(figure: &Figure) -> String {
    let mut generator = Generator::new();
    generator.generate(figure);
    generator.buffer
}

pub fn generate_image(figure: &Figure, path: &Path) -> Result<(), String> {
    let svg_content = generate_string(figure);
    render_from_string(&svg_content, path)
}

fn render_from_string(svg_content: &str, path: &Path) -> Result<(), String> {
    fs::write(path, svg_content)
        .map_err(|e| format!("Failed to write image {}: {}", path.display(), e))
}

pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    format_tick(rounded)
}

fn point_list(panel: &Panel, points: &[(f64, f64)]) -> String {
    points
        .iter()
        .map(|&p| {
            let (x, y) = panel.to_px(p);
            format!("{},{}", num(x), num(y))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn stroke_attrs(stroke: &Stroke) -> String {
    let mut attrs = format!(
        r#"stroke="{}" stroke-width="{}""#,
        stroke.color,
        num(stroke.width)
    );
    if let Some(dash) = &stroke.dash {
        attrs.push_str(&format!(r#" stroke-dasharray="{}""#, dash));
    }
    if stroke.opacity < 1.0 {
        attrs.push_str(&format!(r#" stroke-opacity="{}""#, num(stroke.opacity)));
    }
    attrs
}

fn polar(center: (f64, f64), radius: f64, angle: f64) -> (f64, f64) {
    let rad = angle.to_radians();
    (center.0 + radius * rad.cos(), center.1 + radius * rad.sin())
}

struct Generator {
    buffer: String,
}

impl Generator {
    fn new() -> Self {
        Self {
            buffer: String::with_capacity(10_000),
        }
    }

    fn generate(&mut self, figure: &Figure) {
        self.start_svg(figure.width, figure.height);
        self.add_background();

        if let Some(title) = &figure.title {
            let line = format!(
                r#"<text x="{}" y="{}" text-anchor="middle" font-family="{}" font-weight="bold" font-size="14px">{}</text>"#,
                num(figure.width / 2.0),
                18,
                figure.font.family,
                escape_text(title)
            );
            self.add_line(&line);
        }

        for (index, panel) in figure.panels.iter().enumerate() {
            self.plot_panel(index, panel, &figure.font);
        }
        for legend in &figure.legends {
            self.plot_legend(legend, &figure.font);
        }
        for colorbar in &figure.colorbars {
            self.plot_colorbar(colorbar, &figure.font);
        }
        self.end_svg();
    }

    fn add_line(&mut self, line: &str) {
        self.buffer.reserve(line.len() + 1);
        self.buffer.push_str(line);
        self.buffer.push('\n');
    }

    fn plot_panel(&mut self, index: usize, panel: &Panel, font: &FontConfig) {
        if panel.clip {
            let line = format!(
                r#"<defs><clipPath id="clip{}"><rect x="{}" y="{}" width="{}" height="{}" /></clipPath></defs>"#,
                index,
                num(panel.origin.0),
                num(panel.origin.1),
                num(panel.size.0),
                num(panel.size.1)
            );
            self.add_line(&line);
            self.add_line(&format!(r#"<g clip-path="url(#clip{})">"#, index));
        } else {
            self.add_line("<g>");
        }

        for shape in &panel.shapes {
            self.plot_shape(panel, shape, font);
        }
        self.add_line("</g>");

        self.plot_spines(panel);
        for axis in &panel.axes {
            self.plot_axis(panel, axis, font);
        }
    }

    fn plot_shape(&mut self, panel: &Panel, shape: &Shape, font: &FontConfig) {
        match shape {
            Shape::Line { from, to, stroke } => {
                let (x1, y1) = panel.to_px(*from);
                let (x2, y2) = panel.to_px(*to);
                let line = format!(
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" {} />"#,
                    num(x1),
                    num(y1),
                    num(x2),
                    num(y2),
                    stroke_attrs(stroke)
                );
                self.add_line(&line);
            }
            Shape::Polyline { points, stroke } => {
                let line = format!(
                    r#"<polyline points="{}" fill="none" {} />"#,
                    point_list(panel, points),
                    stroke_attrs(stroke)
                );
                self.add_line(&line);
            }
            Shape::Polygon {
                points,
                fill,
                opacity,
                edge,
            } => {
                let mut line = format!(
                    r#"<polygon points="{}" fill="{}""#,
                    point_list(panel, points),
                    fill
                );
                if *opacity < 1.0 {
                    line.push_str(&format!(r#" fill-opacity="{}""#, num(*opacity)));
                }
                if let Some(edge) = edge {
                    line.push(' ');
                    line.push_str(&stroke_attrs(edge));
                }
                line.push_str(" />");
                self.add_line(&line);
            }
            Shape::Rect {
                origin,
                size,
                fill,
                edge,
                opacity,
                corner,
            } => {
                self.add_rect(panel, *origin, *size, fill, edge.as_ref(), *opacity, *corner);
            }
            Shape::Marker {
                center,
                radius,
                fill,
            } => {
                let (cx, cy) = panel.to_px(*center);
                let line = format!(
                    r#"<circle cx="{}" cy="{}" r="{}" fill="{}" />"#,
                    num(cx),
                    num(cy),
                    num(*radius),
                    fill
                );
                self.add_line(&line);
            }
            Shape::Arc {
                center,
                radius,
                start,
                end,
                stroke,
            } => self.add_arc(panel, *center, *radius, *start, *end, stroke),
            Shape::Sector {
                center,
                inner,
                outer,
                start,
                end,
                fill,
            } => self.add_sector(panel, *center, (*inner, *outer), (*start, *end), fill),
            Shape::Text(label) => {
                let pos = panel.to_px(label.pos);
                self.add_text(pos, label, font);
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn add_rect(
        &mut self,
        panel: &Panel,
        origin: (f64, f64),
        size: (f64, f64),
        fill: &str,
        edge: Option<&Stroke>,
        opacity: f64,
        corner: f64,
    ) {
        let (x1, y1) = panel.to_px(origin);
        let (x2, y2) = panel.to_px((origin.0 + size.0, origin.1 + size.1));
        let (x, y) = (x1.min(x2), y1.min(y2));
        let (w, h) = ((x2 - x1).abs(), (y2 - y1).abs());

        let pos = format!("x=\"{}\" y=\"{}\"", num(x), num(y));
        let dim = format!("width=\"{}\" height=\"{}\"", num(w), num(h));
        let mut style = format!("fill=\"{}\"", fill);
        if let Some(edge) = edge {
            style.push(' ');
            style.push_str(&stroke_attrs(edge));
        }
        if opacity < 1.0 {
            style.push_str(&format!(" opacity=\"{}\"", num(opacity)));
        }
        if corner > 0.0 {
            let r = corner.min(w / 2.0).min(h / 2.0);
            style.push_str(&format!(" rx=\"{}\" ry=\"{}\"", num(r), num(r)));
        }
        let rect = format!("<rect {} {} {} />", pos, dim, style);
        self.add_line(&rect);
    }

    fn arc_flags(panel: &Panel, start: f64, end: f64) -> (u8, u8) {
        let large = u8::from((end - start).abs() > 180.0);
        let sweep = if (end > start) == panel.preserves_orientation() {
            0
        } else {
            1
        };
        (large, sweep)
    }

    fn arc_segment(panel: &Panel, center: (f64, f64), radius: f64, start: f64, end: f64) -> String {
        let (sx, sy) = panel.scale();
        let (rx, ry) = ((radius * sx).abs(), (radius * sy).abs());
        let (x, y) = panel.to_px(polar(center, radius, end));
        let (large, sweep) = Self::arc_flags(panel, start, end);
        format!(
            "A {} {} 0 {} {} {} {}",
            num(rx),
            num(ry),
            large,
            sweep,
            num(x),
            num(y)
        )
    }

    fn add_arc(
        &mut self,
        panel: &Panel,
        center: (f64, f64),
        radius: f64,
        start: f64,
        end: f64,
        stroke: &Stroke,
    ) {
        let (x0, y0) = panel.to_px(polar(center, radius, start));
        let mut data = format!("M {} {} ", num(x0), num(y0));
        if (end - start).abs() >= 360.0 {
            let middle = (start + end) / 2.0;
            data.push_str(&Self::arc_segment(panel, center, radius, start, middle));
            data.push(' ');
            data.push_str(&Self::arc_segment(panel, center, radius, middle, end));
        } else {
            data.push_str(&Self::arc_segment(panel, center, radius, start, end));
        }
        let line = format!(
            r#"<path d="{}" fill="none" {} />"#,
            data,
            stroke_attrs(stroke)
        );
        self.add_line(&line);
    }

    fn add_sector(
        &mut self,
        panel: &Panel,
        center: (f64, f64),
        radii: (f64, f64),
        angles: (f64, f64),
        fill: &str,
    ) {
        let (inner, outer) = radii;
        let (start, mut end) = angles;
        if (end - start).abs() >= 360.0 {
            end = start + 359.99 * (end - start).signum();
        }
        let (x0, y0) = panel.to_px(polar(center, outer, start));
        let (x1, y1) = panel.to_px(polar(center, inner, end));
        let data = format!(
            "M {} {} {} L {} {} {} Z",
            num(x0),
            num(y0),
            Self::arc_segment(panel, center, outer, start, end),
            num(x1),
            num(y1),
            Self::arc_segment(panel, center, inner, end, start)
        );
        let line = format!(r#"<path d="{}" fill="{}" stroke="none" />"#, data, fill);
        self.add_line(&line);
    }

    fn add_text(&mut self, pos: (f64, f64), label: &TextLabel, font: &FontConfig) {
        let (x, y) = pos;
        let anchor = match label.anchor {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        };
        let baseline = match label.baseline {
            Baseline::Alphabetic => "auto",
            Baseline::Middle => "central",
            Baseline::Hanging => "hanging",
        };
        let transform = if label.rotation != 0.0 {
            format!(
                r#" transform="rotate({} {} {})""#,
                num(-label.rotation),
                num(x),
                num(y)
            )
        } else {
            String::new()
        };
        let line = format!(
            r#"<text x="{}" y="{}" text-anchor="{}" dominant-baseline="{}" font-family="{}" font-weight="{}" font-size="{}px" fill="{}"{}>{}</text>"#,
            num(x),
            num(y),
            anchor,
            baseline,
            font.family,
            font.weight,
            num(label.size),
            label.color,
            transform,
            escape_text(&label.text)
        );
        self.add_line(&line);
    }

    fn plot_spines(&mut self, panel: &Panel) {
        let (left, top) = panel.origin;
        let (right, bottom) = (left + panel.size.0, top + panel.size.1);
        let spines = [
            (panel.spines.top, (left, top), (right, top)),
            (panel.spines.bottom, (left, bottom), (right, bottom)),
            (panel.spines.left, (left, top), (left, bottom)),
            (panel.spines.right, (right, top), (right, bottom)),
        ];
        for (visible, (x1, y1), (x2, y2)) in spines {
            if !visible {
                continue;
            }
            let line = format!(
                r##"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="#000000" stroke-width="{}" stroke-linecap="square" />"##,
                num(x1),
                num(y1),
                num(x2),
                num(y2),
                SPINE_WIDTH
            );
            self.add_line(&line);
        }
    }

    fn tick_in_range(value: f64, lim: (f64, f64)) -> bool {
        let (lo, hi) = if lim.0 <= lim.1 { lim } else { (lim.1, lim.0) };
        let eps = (hi - lo).abs() * 1e-9;
        value >= lo - eps && value <= hi + eps
    }

    fn plot_axis(&mut self, panel: &Panel, axis: &Axis, font: &FontConfig) {
        let (left, top) = panel.origin;
        let (right, bottom) = (left + panel.size.0, top + panel.size.1);
        let mark_len = if axis.tick_marks { TICK_LEN } else { 0.0 };
        let horizontal = matches!(axis.side, Side::Top | Side::Bottom);
        let mut widest_label: f64 = 0.0;

        for (value, text) in &axis.ticks {
            let lim = if horizontal { panel.xlim } else { panel.ylim };
            if !Self::tick_in_range(*value, lim) {
                continue;
            }
            let (mark, label_pos, anchor, baseline) = match axis.side {
                Side::Bottom => {
                    let x = panel.to_px((*value, panel.ylim.0)).0;
                    (
                        ((x, bottom), (x, bottom + mark_len)),
                        (x, bottom + mark_len + TICK_PAD),
                        Anchor::Middle,
                        Baseline::Hanging,
                    )
                }
                Side::Top => {
                    let x = panel.to_px((*value, panel.ylim.0)).0;
                    (
                        ((x, top - mark_len), (x, top)),
                        (x, top - mark_len - TICK_PAD),
                        Anchor::Middle,
                        Baseline::Alphabetic,
                    )
                }
                Side::Left => {
                    let y = panel.to_px((panel.xlim.0, *value)).1;
                    (
                        ((left - mark_len, y), (left, y)),
                        (left - mark_len - TICK_PAD, y),
                        Anchor::End,
                        Baseline::Middle,
                    )
                }
                Side::Right => {
                    let y = panel.to_px((panel.xlim.0, *value)).1;
                    (
                        ((right, y), (right + mark_len, y)),
                        (right + mark_len + TICK_PAD, y),
                        Anchor::Start,
                        Baseline::Middle,
                    )
                }
            };

            if axis.tick_marks {
                let ((x1, y1), (x2, y2)) = mark;
                let line = format!(
                    r##"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="#000000" stroke-width="{}" />"##,
                    num(x1),
                    num(y1),
                    num(x2),
                    num(y2),
                    SPINE_WIDTH
                );
                self.add_line(&line);
            }
            if text.is_empty() {
                continue;
            }
            let (anchor, rotation) = if axis.tick_rotation != 0.0 && horizontal {
                (Anchor::End, axis.tick_rotation)
            } else {
                (anchor, 0.0)
            };
            let label = TextLabel::new((0.0, 0.0), text.clone(), axis.tick_font_size)
                .anchor(anchor)
                .baseline(baseline)
                .rotation(rotation);
            self.add_text(label_pos, &label, font);
            widest_label = widest_label.max(text.chars().count() as f64 * axis.tick_font_size * 0.6);
        }

        if let Some(text) = &axis.label {
            let offset = mark_len + TICK_PAD + 4.0;
            let (pos, rotation, baseline) = match axis.side {
                Side::Bottom => (
                    ((left + right) / 2.0, bottom + offset + axis.tick_font_size * 1.2),
                    0.0,
                    Baseline::Hanging,
                ),
                Side::Top => (
                    ((left + right) / 2.0, top - offset - axis.tick_font_size * 1.2),
                    0.0,
                    Baseline::Alphabetic,
                ),
                Side::Left => (
                    (left - offset - widest_label, (top + bottom) / 2.0),
                    90.0,
                    Baseline::Alphabetic,
                ),
                Side::Right => (
                    (right + offset + widest_label, (top + bottom) / 2.0),
                    -90.0,
                    Baseline::Alphabetic,
                ),
            };
            let label = TextLabel::new((0.0, 0.0), text.clone(), axis.label_font_size)
                .anchor(Anchor::Middle)
                .baseline(baseline)
                .rotation(rotation);
            self.add_text(pos, &label, font);
        }
    }

    fn plot_legend(&mut self, legend: &Legend, font: &FontConfig) {
        let (x, mut y) = legend.pos;
        let row = legend.row_height();
        let box_size = legend.font_size * 0.8;

        if let Some(title) = &legend.title {
            let line = format!(
                r#"<text x="{}" y="{}" dominant-baseline="central" font-family="{}" font-weight="bold" font-size="{}px">{}</text>"#,
                num(x),
                num(y + row / 2.0),
                font.family,
                num(legend.font_size + 1.0),
                escape_text(title)
            );
            self.add_line(&line);
            y += row;
        }

        for entry in &legend.entries {
            let cy = y + row / 2.0;
            let marker = match entry.marker {
                Marker::Square => format!(
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}" />"#,
                    num(x),
                    num(cy - box_size / 2.0),
                    num(box_size),
                    num(box_size),
                    entry.color
                ),
                Marker::Circle => format!(
                    r#"<circle cx="{}" cy="{}" r="{}" fill="{}" />"#,
                    num(x + box_size / 2.0),
                    num(cy),
                    num(box_size / 2.0),
                    entry.color
                ),
                Marker::Line => format!(
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="4" />"#,
                    num(x),
                    num(cy),
                    num(x + box_size * 1.5),
                    num(cy),
                    entry.color
                ),
            };
            self.add_line(&marker);

            let text_x = x + box_size * 1.5 + 4.0;
            let label = TextLabel::new((0.0, 0.0), entry.label.clone(), legend.font_size)
                .baseline(Baseline::Middle);
            self.add_text((text_x, cy), &label, font);
            y += row;
        }
    }

    fn plot_colorbar(&mut self, colorbar: &ColorBar, font: &FontConfig) {
        if colorbar.stops.is_empty() {
            return;
        }
        let (x, y) = colorbar.origin;
        let (w, h) = colorbar.size;
        let step = w / colorbar.stops.len() as f64;
        for (index, color) in colorbar.stops.iter().enumerate() {
            // Overlap neighbours by a hair to avoid hairline gaps in viewers
            let line = format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}" />"#,
                num(x + index as f64 * step),
                num(y),
                num(step + 0.3),
                num(h),
                color
            );
            self.add_line(&line);
        }
        let outline = format!(
            r##"<rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="#000000" stroke-width="{}" />"##,
            num(x),
            num(y),
            num(w),
            num(h),
            SPINE_WIDTH
        );
        self.add_line(&outline);

        let (lo, hi) = colorbar.range;
        if hi <= lo {
            return;
        }
        for value in &colorbar.ticks {
            if *value < lo || *value > hi {
                continue;
            }
            let tx = x + (value - lo) / (hi - lo) * w;
            let line = format!(
                r##"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="#000000" stroke-width="{}" />"##,
                num(tx),
                num(y + h),
                num(tx),
                num(y + h + TICK_LEN),
                SPINE_WIDTH
            );
            self.add_line(&line);
            let label = TextLabel::new((0.0, 0.0), format_tick(*value), colorbar.font_size)
                .anchor(Anchor::Middle)
                .baseline(Baseline::Hanging);
            self.add_text((tx, y + h + TICK_LEN + TICK_PAD), &label, font);
        }
    }

    fn start_svg(&mut self, width: f64, height: f64) {
        self.add_line(r#"<?xml version="1.0"?>"#);
        let line = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            num(width),
            num(height),
            num(width),
            num(height)
        );
        self.add_line(&line);
    }

    fn end_svg(&mut self) {
        self.add_line("</svg>");
    }

    fn add_background(&mut self) {
        self.add_line(r#"<rect width="100%" height="100%" fill="white"/>"#);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::{Legend, LegendEntry, Spines};

    fn unit_panel() -> Panel {
        Panel::new((0.0, 0.0), (100.0, 100.0), (-1.0, 1.0), (-1.0, 1.0))
    }

    #[test]
    fn escape_text_replaces_markup() {
        assert_eq!(escape_text("a<b & 'c'"), "a&lt;b &amp; &apos;c&apos;");
        assert_eq!(escape_text("plain"), "plain");
    }

    #[test]
    fn empty_figure_is_valid_document() {
        let figure = Figure::new(200.0, 100.0);
        let svg = generate_string(&figure);
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains(r#"width="200" height="100""#));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn counter_clockwise_arc_uses_negative_sweep_on_regular_panel() {
        let panel = unit_panel();
        assert_eq!(Generator::arc_flags(&panel, 0.0, 90.0), (0, 0));
        assert_eq!(Generator::arc_flags(&panel, 90.0, 0.0), (0, 1));
        assert_eq!(Generator::arc_flags(&panel, 0.0, 270.0), (1, 0));
    }

    #[test]
    fn inverted_axis_flips_sweep() {
        let panel = Panel::new((0.0, 0.0), (100.0, 100.0), (1.0, -1.0), (-1.0, 1.0));
        assert_eq!(Generator::arc_flags(&panel, 0.0, 90.0), (0, 1));
    }

    #[test]
    fn full_circle_arc_is_split() {
        let mut figure = Figure::new(100.0, 100.0);
        let mut panel = unit_panel();
        panel.push(Shape::Arc {
            center: (0.0, 0.0),
            radius: 1.0,
            start: 0.0,
            end: 360.0,
            stroke: Stroke::solid("#000000", 1.0),
        });
        figure.add_panel(panel);
        let svg = generate_string(&figure);
        let path = svg.lines().find(|l| l.starts_with("<path")).unwrap();
        assert_eq!(path.matches(" A ").count(), 2);
    }

    #[test]
    fn rect_with_inverted_axis_has_positive_size() {
        let mut figure = Figure::new(100.0, 100.0);
        let mut panel = Panel::new((0.0, 0.0), (100.0, 100.0), (10.0, 0.0), (0.0, 10.0));
        panel.push(Shape::Rect {
            origin: (0.0, 0.0),
            size: (5.0, 5.0),
            fill: "#ff0000".to_string(),
            edge: None,
            opacity: 1.0,
            corner: 0.0,
        });
        figure.add_panel(panel);
        let svg = generate_string(&figure);
        assert!(svg.contains(r##"<rect x="50" y="50" width="50" height="50" fill="#ff0000" />"##));
    }

    #[test]
    fn clipped_panels_get_distinct_clip_paths() {
        let mut figure = Figure::new(100.0, 100.0);
        for _ in 0..2 {
            let mut panel = unit_panel();
            panel.clip = true;
            figure.add_panel(panel);
        }
        let svg = generate_string(&figure);
        assert!(svg.contains(r#"id="clip0""#));
        assert!(svg.contains(r#"id="clip1""#));
    }

    #[test]
    fn ticks_outside_limits_are_skipped() {
        let mut figure = Figure::new(100.0, 100.0);
        let mut panel = Panel::new((10.0, 10.0), (80.0, 80.0), (0.0, 10.0), (0.0, 1.0));
        panel.spines = Spines::none();
        panel.add_axis(Axis::new(
            Side::Bottom,
            vec![(5.0, "five".to_string()), (20.0, "twenty".to_string())],
        ));
        figure.add_panel(panel);
        let svg = generate_string(&figure);
        assert!(svg.contains(">five</text>"));
        assert!(!svg.contains("twenty"));
    }

    #[test]
    fn legend_renders_title_and_entries() {
        let mut figure = Figure::new(100.0, 100.0);
        figure.legends.push(Legend {
            pos: (0.0, 0.0),
            title: Some("Type".to_string()),
            entries: vec![LegendEntry {
                label: "ST<1>".to_string(),
                color: "#123456".to_string(),
                marker: Marker::Circle,
            }],
            font_size: 10.0,
        });
        let svg = generate_string(&figure);
        assert!(svg.contains(">Type</text>"));
        assert!(svg.contains("ST&lt;1&gt;"));
        assert!(svg.contains(r##"fill="#123456""##));
    }
}
