mod figure;
mod svg;
mod ticks;

pub use figure::{
    Anchor, Axis, Baseline, Color, ColorBar, Figure, FontConfig, Legend, LegendEntry, Marker,
    Panel, Shape, Side, Spines, Stroke, TextLabel,
};
pub use svg::{escape_text, generate_image, generate_string};
pub use ticks::{format_tick, nice_ticks};
