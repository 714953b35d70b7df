use crate::genome::Strand;
use crate::utils::Result;
use canvas::{Color, Shape};
use std::{fmt, str::FromStr};

/// Fraction of the track span used as the maximum arrow head length
pub const HEAD_LENGTH_FRACTION: f64 = 0.015;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureStyle {
    BigArrow,
    Arrow,
    BigBox,
    Box,
    BigRBox,
    RBox,
}

impl FromStr for FeatureStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "bigarrow" => Ok(FeatureStyle::BigArrow),
            "arrow" => Ok(FeatureStyle::Arrow),
            "bigbox" => Ok(FeatureStyle::BigBox),
            "box" => Ok(FeatureStyle::Box),
            "bigrbox" => Ok(FeatureStyle::BigRBox),
            "rbox" => Ok(FeatureStyle::RBox),
            _ => Err(format!(
                "Invalid feature style: {}. Expected bigarrow, arrow, bigbox, box, bigrbox or rbox",
                s
            )),
        }
    }
}

impl fmt::Display for FeatureStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FeatureStyle::BigArrow => "bigarrow",
            FeatureStyle::Arrow => "arrow",
            FeatureStyle::BigBox => "bigbox",
            FeatureStyle::Box => "box",
            FeatureStyle::BigRBox => "bigrbox",
            FeatureStyle::RBox => "rbox",
        };
        write!(f, "{}", name)
    }
}

impl FeatureStyle {
    pub fn is_big(self) -> bool {
        matches!(
            self,
            FeatureStyle::BigArrow | FeatureStyle::BigBox | FeatureStyle::BigRBox
        )
    }

    pub fn is_arrow(self) -> bool {
        matches!(self, FeatureStyle::BigArrow | FeatureStyle::Arrow)
    }

    /// Centre and height of the glyph in a track spanning `[-1, 1]`. Big glyphs fill the
    /// track, the others sit on the half of their strand.
    pub fn placement(self, strand: Strand) -> (f64, f64) {
        if self.is_big() {
            (0.0, 2.0)
        } else {
            (0.5 * strand.sign(), 1.0)
        }
    }
}

/// A straight arrow whose length includes the head
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrow {
    pub tail: (f64, f64),
    pub dx: f64, // Signed length along x
    pub shaft_width: f64,
    pub head_width: f64,
    pub head_length: f64,
}

impl Arrow {
    /// Outline starting at the lower tail corner, through the tip, back to the upper tail corner
    pub fn polygon(&self) -> Vec<(f64, f64)> {
        let (x, y) = self.tail;
        let direction = if self.dx < 0.0 { -1.0 } else { 1.0 };
        let length = self.dx.abs();
        let head_length = self.head_length.clamp(0.0, length);
        let neck = x + direction * (length - head_length);
        let tip = x + self.dx;
        let shaft = self.shaft_width / 2.0;
        let head = self.head_width / 2.0;
        vec![
            (x, y - shaft),
            (neck, y - shaft),
            (neck, y - head),
            (tip, y),
            (neck, y + head),
            (neck, y + shaft),
            (x, y + shaft),
        ]
    }
}

pub fn head_length(track_span: f64, feature_length: f64) -> f64 {
    (track_span * HEAD_LENGTH_FRACTION).min(feature_length)
}

/// Glyph for a feature spanning `start..end` on a track of `track_span` bases
pub fn feature_shape(
    start: f64,
    end: f64,
    strand: Strand,
    style: FeatureStyle,
    track_span: f64,
    shaft_ratio: f64,
    fill: &str,
) -> Shape {
    let (center, height) = style.placement(strand);
    let length = end - start;
    if style.is_arrow() {
        let tail_x = match strand {
            Strand::Forward => start,
            Strand::Reverse => end,
        };
        let arrow = Arrow {
            tail: (tail_x, center),
            dx: length * strand.sign(),
            shaft_width: height * shaft_ratio,
            head_width: height,
            head_length: head_length(track_span, length),
        };
        return Shape::Polygon {
            points: arrow.polygon(),
            fill: Color::from(fill),
            opacity: 1.0,
            edge: None,
        };
    }
    let rounded = matches!(style, FeatureStyle::RBox | FeatureStyle::BigRBox);
    Shape::Rect {
        origin: (start, center - height / 2.0),
        size: (length, height),
        fill: Color::from(fill),
        edge: None,
        opacity: 1.0,
        corner: if rounded { 3.0 } else { 0.0 },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_names_round_trip() {
        for name in ["bigarrow", "arrow", "bigbox", "box", "bigrbox", "rbox"] {
            assert_eq!(name.parse::<FeatureStyle>().unwrap().to_string(), name);
        }
        assert!("triangle".parse::<FeatureStyle>().is_err());
    }

    #[test]
    fn forward_arrow_outline() {
        let arrow = Arrow {
            tail: (10.0, 0.0),
            dx: 100.0,
            shaft_width: 1.0,
            head_width: 2.0,
            head_length: 20.0,
        };
        let points = arrow.polygon();
        assert_eq!(points.len(), 7);
        assert_eq!(points[0], (10.0, -0.5));
        assert_eq!(points[2], (90.0, -1.0));
        assert_eq!(points[3], (110.0, 0.0));
        assert_eq!(points[6], (10.0, 0.5));
    }

    #[test]
    fn reverse_arrow_points_left() {
        let arrow = Arrow {
            tail: (200.0, 5.0),
            dx: -50.0,
            shaft_width: 3.0,
            head_width: 6.0,
            head_length: 10.0,
        };
        let points = arrow.polygon();
        assert_eq!(points[3], (150.0, 5.0));
        assert_eq!(points[1], (160.0, 3.5));
    }

    #[test]
    fn head_length_is_capped_by_feature() {
        assert_eq!(head_length(10_000.0, 500.0), 150.0);
        assert_eq!(head_length(10_000.0, 40.0), 40.0);
    }

    #[test]
    fn small_glyphs_sit_on_their_strand() {
        assert_eq!(FeatureStyle::Box.placement(Strand::Reverse), (-0.5, 1.0));
        assert_eq!(FeatureStyle::BigBox.placement(Strand::Reverse), (0.0, 2.0));
        match feature_shape(100.0, 200.0, Strand::Forward, FeatureStyle::RBox, 1000.0, 0.5, "red") {
            Shape::Rect { origin, size, corner, .. } => {
                assert_eq!(origin, (100.0, 0.0));
                assert_eq!(size, (100.0, 1.0));
                assert!(corner > 0.0);
            }
            other => panic!("unexpected shape {:?}", other),
        }
    }

    #[test]
    fn big_arrow_uses_shaft_ratio() {
        let shape = feature_shape(0.0, 100.0, Strand::Reverse, FeatureStyle::BigArrow, 1000.0, 0.5, "blue");
        let Shape::Polygon { points, .. } = shape else {
            panic!("expected polygon")
        };
        assert_eq!(points[0], (100.0, -0.5));
        assert_eq!(points[3], (0.0, 0.0));
        assert_eq!(points[2], (15.0, -1.0));
    }
}
