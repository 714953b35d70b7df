pub type Color = String;

#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64, // In pixels, independent of the panel scale
    pub dash: Option<String>,
    pub opacity: f64,
}

impl Stroke {
    pub fn solid(color: impl Into<Color>, width: f64) -> Self {
        Self {
            color: color.into(),
            width,
            dash: None,
            opacity: 1.0,
        }
    }

    pub fn dashed(color: impl Into<Color>, width: f64) -> Self {
        Self {
            dash: Some("4,2".to_string()),
            ..Self::solid(color, width)
        }
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Baseline {
    Alphabetic,
    Middle,
    Hanging,
}

/// A text label anchored at a data-space position
#[derive(Debug, Clone)]
pub struct TextLabel {
    pub pos: (f64, f64),
    pub text: String,
    pub size: f64,
    pub color: Color,
    pub anchor: Anchor,
    pub baseline: Baseline,
    pub rotation: f64, // Degrees, counter-clockwise
}

impl TextLabel {
    pub fn new(pos: (f64, f64), text: impl Into<String>, size: f64) -> Self {
        Self {
            pos,
            text: text.into(),
            size,
            color: "#000000".to_string(),
            anchor: Anchor::Start,
            baseline: Baseline::Alphabetic,
            rotation: 0.0,
        }
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn baseline(mut self, baseline: Baseline) -> Self {
        self.baseline = baseline;
        self
    }

    pub fn rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn color(mut self, color: impl Into<Color>) -> Self {
        self.color = color.into();
        self
    }
}

/// Everything a panel can draw. Coordinates are in data space unless noted.
#[derive(Debug, Clone)]
pub enum Shape {
    Line {
        from: (f64, f64),
        to: (f64, f64),
        stroke: Stroke,
    },
    Polyline {
        points: Vec<(f64, f64)>,
        stroke: Stroke,
    },
    Polygon {
        points: Vec<(f64, f64)>,
        fill: Color,
        opacity: f64,
        edge: Option<Stroke>,
    },
    Rect {
        origin: (f64, f64),
        size: (f64, f64),
        fill: Color,
        edge: Option<Stroke>,
        opacity: f64,
        corner: f64, // Corner radius in pixels
    },
    Marker {
        center: (f64, f64),
        radius: f64, // Pixels
        fill: Color,
    },
    Arc {
        center: (f64, f64),
        radius: f64,
        start: f64, // Degrees, counter-clockwise from +x
        end: f64,
        stroke: Stroke,
    },
    Sector {
        center: (f64, f64),
        inner: f64,
        outer: f64,
        start: f64,
        end: f64,
        fill: Color,
    },
    Text(TextLabel),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

#[derive(Debug, Clone)]
pub struct Axis {
    pub side: Side,
    pub ticks: Vec<(f64, String)>,
    pub label: Option<String>,
    pub tick_font_size: f64,
    pub label_font_size: f64,
    pub tick_rotation: f64,
    pub tick_marks: bool,
}

impl Axis {
    pub fn new(side: Side, ticks: Vec<(f64, String)>) -> Self {
        Self {
            side,
            ticks,
            label: None,
            tick_font_size: 8.0,
            label_font_size: 10.0,
            tick_rotation: 0.0,
            tick_marks: true,
        }
    }

    pub fn label(mut self, label: Option<String>, size: f64) -> Self {
        self.label = label;
        self.label_font_size = size;
        self
    }

    pub fn tick_font_size(mut self, size: f64) -> Self {
        self.tick_font_size = size;
        self
    }

    pub fn tick_marks(mut self, show: bool) -> Self {
        self.tick_marks = show;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spines {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl Spines {
    pub fn none() -> Self {
        Self {
            top: false,
            bottom: false,
            left: false,
            right: false,
        }
    }

    pub fn all() -> Self {
        Self {
            top: true,
            bottom: true,
            left: true,
            right: true,
        }
    }
}

/// A rectangular region of the figure with its own data coordinate system
#[derive(Debug, Clone)]
pub struct Panel {
    pub origin: (f64, f64), // Top-left corner in figure pixels
    pub size: (f64, f64),
    pub xlim: (f64, f64),
    pub ylim: (f64, f64),
    pub shapes: Vec<Shape>,
    pub axes: Vec<Axis>,
    pub spines: Spines,
    pub clip: bool,
}

impl Panel {
    pub fn new(origin: (f64, f64), size: (f64, f64), xlim: (f64, f64), ylim: (f64, f64)) -> Self {
        Self {
            origin,
            size,
            xlim,
            ylim,
            shapes: Vec::new(),
            axes: Vec::new(),
            spines: Spines::none(),
            clip: false,
        }
    }

    pub fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    pub fn add_axis(&mut self, axis: Axis) {
        self.axes.push(axis);
    }

    /// Pixels per data unit along x and y. Negative when the axis points against the screen.
    pub fn scale(&self) -> (f64, f64) {
        let sx = self.size.0 / (self.xlim.1 - self.xlim.0);
        let sy = -self.size.1 / (self.ylim.1 - self.ylim.0);
        (sx, sy)
    }

    pub fn to_px(&self, point: (f64, f64)) -> (f64, f64) {
        let (sx, sy) = self.scale();
        let x = self.origin.0 + (point.0 - self.xlim.0) * sx;
        let y = self.origin.1 + self.size.1 + (point.1 - self.ylim.0) * sy;
        (x, y)
    }

    /// True when counter-clockwise in data space stays counter-clockwise on screen
    pub fn preserves_orientation(&self) -> bool {
        let (sx, sy) = self.scale();
        sx * sy < 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Marker {
    Square,
    Circle,
    Line,
}

#[derive(Debug, Clone)]
pub struct LegendEntry {
    pub label: String,
    pub color: Color,
    pub marker: Marker,
}

#[derive(Debug, Clone)]
pub struct Legend {
    pub pos: (f64, f64), // Top-left corner in figure pixels
    pub title: Option<String>,
    pub entries: Vec<LegendEntry>,
    pub font_size: f64,
}

impl Legend {
    pub fn row_height(&self) -> f64 {
        self.font_size * 1.6
    }

    pub fn height(&self) -> f64 {
        let rows = self.entries.len() + usize::from(self.title.is_some());
        rows as f64 * self.row_height()
    }
}

/// Horizontal colour bar with evenly spaced colour stops
#[derive(Debug, Clone)]
pub struct ColorBar {
    pub origin: (f64, f64),
    pub size: (f64, f64),
    pub stops: Vec<Color>,
    pub range: (f64, f64),
    pub ticks: Vec<f64>,
    pub font_size: f64,
}

#[derive(Debug, Clone)]
pub struct FontConfig {
    pub family: String,
    pub weight: String,
    pub size: String,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: "Arial, Helvetica, sans-serif".to_string(),
            weight: "normal".to_string(),
            size: "10px".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Figure {
    pub width: f64,
    pub height: f64,
    pub title: Option<String>,
    pub panels: Vec<Panel>,
    pub legends: Vec<Legend>,
    pub colorbars: Vec<ColorBar>,
    pub font: FontConfig,
}

impl Figure {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            title: None,
            panels: Vec::new(),
            legends: Vec::new(),
            colorbars: Vec::new(),
            font: FontConfig::default(),
        }
    }

    pub fn add_panel(&mut self, panel: Panel) -> usize {
        self.panels.push(panel);
        self.panels.len() - 1
    }

    pub fn set_font_family(&mut self, font_family: &str) {
        self.font.family = font_family.to_owned();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_px_maps_limits_to_panel_corners() {
        let panel = Panel::new((10.0, 20.0), (100.0, 50.0), (0.0, 10.0), (0.0, 5.0));
        assert_eq!(panel.to_px((0.0, 0.0)), (10.0, 70.0));
        assert_eq!(panel.to_px((10.0, 5.0)), (110.0, 20.0));
        assert_eq!(panel.to_px((5.0, 2.5)), (60.0, 45.0));
    }

    #[test]
    fn inverted_xlim_flips_horizontally() {
        let panel = Panel::new((0.0, 0.0), (100.0, 100.0), (10.0, 0.0), (0.0, 1.0));
        assert_eq!(panel.to_px((10.0, 0.0)).0, 0.0);
        assert_eq!(panel.to_px((0.0, 0.0)).0, 100.0);
        assert!(!panel.preserves_orientation());
    }

    #[test]
    fn regular_panel_preserves_orientation() {
        let panel = Panel::new((0.0, 0.0), (100.0, 100.0), (-1.0, 1.0), (-1.0, 1.0));
        assert!(panel.preserves_orientation());
    }

    #[test]
    fn legend_height_counts_title_row() {
        let mut legend = Legend {
            pos: (0.0, 0.0),
            title: Some("Category".to_string()),
            entries: Vec::new(),
            font_size: 10.0,
        };
        legend.entries.push(LegendEntry {
            label: "a".to_string(),
            color: "#000000".to_string(),
            marker: Marker::Circle,
        });
        assert_eq!(legend.height(), 32.0);
    }
}
