use crate::utils::Result;
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let channel = |i: usize, width: usize| {
            let text = digits
                .get(i * width..(i + 1) * width)
                .ok_or_else(|| format!("Invalid hex colour: {}", hex))?;
            let value = u8::from_str_radix(text, 16).map_err(|_| format!("Invalid hex colour: {}", hex))?;
            Ok::<u8, String>(if width == 1 { value * 17 } else { value })
        };
        match digits.len() {
            3 => Ok(Rgb::new(channel(0, 1)?, channel(1, 1)?, channel(2, 1)?)),
            6 => Ok(Rgb::new(channel(0, 2)?, channel(1, 2)?, channel(2, 2)?)),
            8 => Ok(Rgb {
                a: channel(3, 2)?,
                ..Rgb::new(channel(0, 2)?, channel(1, 2)?, channel(2, 2)?)
            }),
            _ => Err(format!("Invalid hex colour: {}", hex)),
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn opacity(self) -> f64 {
        self.a as f64 / 255.0
    }

    fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round().clamp(0.0, 255.0) as u8;
        Rgb {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    fn from_unit(r: f64, g: f64, b: f64) -> Rgb {
        let c = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgb::new(c(r), c(g), c(b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

const TAB10: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

const NAMED: &[(&str, &str)] = &[
    ("aqua", "#00ffff"),
    ("aquamarine", "#7fffd4"),
    ("beige", "#f5f5dc"),
    ("black", "#000000"),
    ("blue", "#0000ff"),
    ("blueviolet", "#8a2be2"),
    ("brown", "#a52a2a"),
    ("cadetblue", "#5f9ea0"),
    ("chartreuse", "#7fff00"),
    ("chocolate", "#d2691e"),
    ("coral", "#ff7f50"),
    ("cornflowerblue", "#6495ed"),
    ("crimson", "#dc143c"),
    ("cyan", "#00ffff"),
    ("darkblue", "#00008b"),
    ("darkcyan", "#008b8b"),
    ("darkgoldenrod", "#b8860b"),
    ("darkgray", "#a9a9a9"),
    ("darkgreen", "#006400"),
    ("darkgrey", "#a9a9a9"),
    ("darkkhaki", "#bdb76b"),
    ("darkmagenta", "#8b008b"),
    ("darkorange", "#ff8c00"),
    ("darkred", "#8b0000"),
    ("darksalmon", "#e9967a"),
    ("darkseagreen", "#8fbc8f"),
    ("darkslateblue", "#483d8b"),
    ("darkslategray", "#2f4f4f"),
    ("darkturquoise", "#00ced1"),
    ("darkviolet", "#9400d3"),
    ("deeppink", "#ff1493"),
    ("deepskyblue", "#00bfff"),
    ("dimgray", "#696969"),
    ("dodgerblue", "#1e90ff"),
    ("firebrick", "#b22222"),
    ("forestgreen", "#228b22"),
    ("fuchsia", "#ff00ff"),
    ("gainsboro", "#dcdcdc"),
    ("gold", "#ffd700"),
    ("goldenrod", "#daa520"),
    ("gray", "#808080"),
    ("green", "#008000"),
    ("greenyellow", "#adff2f"),
    ("grey", "#808080"),
    ("hotpink", "#ff69b4"),
    ("indianred", "#cd5c5c"),
    ("indigo", "#4b0082"),
    ("ivory", "#fffff0"),
    ("khaki", "#f0e68c"),
    ("lavender", "#e6e6fa"),
    ("lawngreen", "#7cfc00"),
    ("lightblue", "#add8e6"),
    ("lightcoral", "#f08080"),
    ("lightcyan", "#e0ffff"),
    ("lightgray", "#d3d3d3"),
    ("lightgreen", "#90ee90"),
    ("lightgrey", "#d3d3d3"),
    ("lightpink", "#ffb6c1"),
    ("lightsalmon", "#ffa07a"),
    ("lightseagreen", "#20b2aa"),
    ("lightskyblue", "#87cefa"),
    ("lightslategray", "#778899"),
    ("lightsteelblue", "#b0c4de"),
    ("lightyellow", "#ffffe0"),
    ("lime", "#00ff00"),
    ("limegreen", "#32cd32"),
    ("magenta", "#ff00ff"),
    ("maroon", "#800000"),
    ("mediumaquamarine", "#66cdaa"),
    ("mediumblue", "#0000cd"),
    ("mediumorchid", "#ba55d3"),
    ("mediumpurple", "#9370db"),
    ("mediumseagreen", "#3cb371"),
    ("mediumslateblue", "#7b68ee"),
    ("mediumvioletred", "#c71585"),
    ("midnightblue", "#191970"),
    ("navy", "#000080"),
    ("olive", "#808000"),
    ("olivedrab", "#6b8e23"),
    ("orange", "#ffa500"),
    ("orangered", "#ff4500"),
    ("orchid", "#da70d6"),
    ("palegreen", "#98fb98"),
    ("paleturquoise", "#afeeee"),
    ("palevioletred", "#db7093"),
    ("peru", "#cd853f"),
    ("pink", "#ffc0cb"),
    ("plum", "#dda0dd"),
    ("powderblue", "#b0e0e6"),
    ("purple", "#800080"),
    ("rebeccapurple", "#663399"),
    ("red", "#ff0000"),
    ("rosybrown", "#bc8f8f"),
    ("royalblue", "#4169e1"),
    ("saddlebrown", "#8b4513"),
    ("salmon", "#fa8072"),
    ("sandybrown", "#f4a460"),
    ("seagreen", "#2e8b57"),
    ("sienna", "#a0522d"),
    ("silver", "#c0c0c0"),
    ("skyblue", "#87ceeb"),
    ("slateblue", "#6a5acd"),
    ("slategray", "#708090"),
    ("springgreen", "#00ff7f"),
    ("steelblue", "#4682b4"),
    ("tan", "#d2b48c"),
    ("teal", "#008080"),
    ("thistle", "#d8bfd8"),
    ("tomato", "#ff6347"),
    ("turquoise", "#40e0d0"),
    ("violet", "#ee82ee"),
    ("wheat", "#f5deb3"),
    ("white", "#ffffff"),
    ("whitesmoke", "#f5f5f5"),
    ("yellow", "#ffff00"),
    ("yellowgreen", "#9acd32"),
];

/// Accepts hex codes, CSS names, single-letter shorthands, `Cn` cycle colours, `tab:` names
/// and grey levels written as a number in `[0, 1]`
impl FromStr for Rgb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        if name.starts_with('#') {
            return Rgb::from_hex(&name);
        }
        let letter = match name.as_str() {
            "b" => Some("#0000ff"),
            "g" => Some("#008000"),
            "r" => Some("#ff0000"),
            "c" => Some("#00bfbf"),
            "m" => Some("#bf00bf"),
            "y" => Some("#bfbf00"),
            "k" => Some("#000000"),
            "w" => Some("#ffffff"),
            _ => None,
        };
        if let Some(hex) = letter {
            return Rgb::from_hex(hex);
        }
        if let Some(index) = name.strip_prefix('c').and_then(|n| n.parse::<usize>().ok()) {
            return Rgb::from_hex(TAB10[index % TAB10.len()]);
        }
        if let Some(tab) = name.strip_prefix("tab:") {
            const TAB_NAMES: [&str; 10] = [
                "blue", "orange", "green", "red", "purple", "brown", "pink", "gray", "olive", "cyan",
            ];
            if let Some(i) = TAB_NAMES.iter().position(|n| *n == tab || (tab == "grey" && *n == "gray")) {
                return Rgb::from_hex(TAB10[i]);
            }
        }
        if let Ok(level) = name.parse::<f64>() {
            if (0.0..=1.0).contains(&level) {
                return Ok(Rgb::from_unit(level, level, level));
            }
        }
        NAMED
            .binary_search_by(|(key, _)| key.cmp(&name.as_str()))
            .map(|i| NAMED[i].1)
            .map_err(|_| format!("Unknown colour: {}", s))
            .and_then(Rgb::from_hex)
    }
}

/// Maps values in `[0, 1]` to colours
#[derive(Debug, Clone, PartialEq)]
pub enum Colormap {
    Linear(Vec<(f64, Rgb)>),
    Listed(Vec<Rgb>),
}

fn hex_stops(hex: &[&str]) -> Vec<(f64, Rgb)> {
    let last = (hex.len() - 1) as f64;
    hex.iter()
        .enumerate()
        .filter_map(|(i, h)| Rgb::from_hex(h).ok().map(|c| (i as f64 / last, c)))
        .collect()
}

fn hex_list(hex: &[&str]) -> Vec<Rgb> {
    hex.iter().filter_map(|h| Rgb::from_hex(h).ok()).collect()
}

impl Colormap {
    pub const NAMES: [&'static str; 16] = [
        "viridis", "magma", "rocket", "icefire", "coolwarm", "RdBu_r", "Reds", "Blues", "Greys",
        "YlOrRd", "gist_rainbow", "rainbow", "tab10", "Set1", "Set2", "Paired",
    ];

    /// Looks up a named map; a `_r` suffix reverses it
    pub fn by_name(name: &str) -> Result<Self> {
        let cmap = match name {
            "viridis" => Colormap::Linear(hex_stops(&[
                "#440154", "#472c7a", "#3b518b", "#2c718e", "#21908d", "#27ad81", "#5cc863",
                "#aadc32", "#fde725",
            ])),
            "magma" => Colormap::Linear(hex_stops(&[
                "#000004", "#1c1044", "#4f127b", "#812581", "#b5367a", "#e55964", "#fb8761",
                "#fec287", "#fcfdbf",
            ])),
            "rocket" => Colormap::Linear(hex_stops(&[
                "#03051a", "#35193e", "#701f57", "#ad1759", "#e13342", "#f37651", "#f6b48f",
                "#faebdd",
            ])),
            "icefire" => Colormap::Linear(hex_stops(&[
                "#bde7db", "#6fb5d6", "#3b7ec8", "#3c4a9b", "#262636", "#1f1e1e", "#4c1f2c",
                "#8f2939", "#d24736", "#f28a4d", "#ffd9a8",
            ])),
            "coolwarm" => Colormap::Linear(hex_stops(&[
                "#3b4cc0", "#6788ee", "#9abbff", "#c9d7f0", "#edd1c2", "#f7a889", "#e26952",
                "#b40426",
            ])),
            "RdBu_r" => Colormap::Linear(hex_stops(&[
                "#053061", "#2166ac", "#4393c3", "#92c5de", "#d1e5f0", "#f7f7f7", "#fddbc7",
                "#f4a582", "#d6604d", "#b2182b", "#67001f",
            ])),
            "Reds" => Colormap::Linear(hex_stops(&[
                "#fff5f0", "#fee0d2", "#fcbba1", "#fc9272", "#fb6a4a", "#ef3b2c", "#cb181d",
                "#a50f15", "#67000d",
            ])),
            "Blues" => Colormap::Linear(hex_stops(&[
                "#f7fbff", "#deebf7", "#c6dbef", "#9ecae1", "#6baed6", "#4292c6", "#2171b5",
                "#08519c", "#08306b",
            ])),
            "Greys" => Colormap::Linear(hex_stops(&[
                "#ffffff", "#f0f0f0", "#d9d9d9", "#bdbdbd", "#969696", "#737373", "#525252",
                "#252525", "#000000",
            ])),
            "YlOrRd" => Colormap::Linear(hex_stops(&[
                "#ffffcc", "#ffeda0", "#fed976", "#feb24c", "#fd8d3c", "#fc4e2a", "#e31a1c",
                "#bd0026", "#800026",
            ])),
            "gist_rainbow" => Colormap::Linear(vec![
                (0.0, Rgb::from_unit(1.0, 0.0, 0.16)),
                (0.03, Rgb::from_unit(1.0, 0.0, 0.0)),
                (0.215, Rgb::from_unit(1.0, 1.0, 0.0)),
                (0.4, Rgb::from_unit(0.0, 1.0, 0.0)),
                (0.586, Rgb::from_unit(0.0, 1.0, 1.0)),
                (0.77, Rgb::from_unit(0.0, 0.0, 1.0)),
                (0.954, Rgb::from_unit(1.0, 0.0, 1.0)),
                (1.0, Rgb::from_unit(1.0, 0.0, 0.75)),
            ]),
            "rainbow" => Colormap::Linear(
                (0..=32)
                    .map(|i| {
                        let x = i as f64 / 32.0;
                        let color = Rgb::from_unit(
                            (2.0 * x - 0.5).abs(),
                            (std::f64::consts::PI * x).sin(),
                            (std::f64::consts::PI * x / 2.0).cos(),
                        );
                        (x, color)
                    })
                    .collect(),
            ),
            "tab10" => Colormap::Listed(hex_list(&TAB10)),
            "Set1" => Colormap::Listed(hex_list(&[
                "#e41a1c", "#377eb8", "#4daf4a", "#984ea3", "#ff7f00", "#ffff33", "#a65628",
                "#f781bf", "#999999",
            ])),
            "Set2" => Colormap::Listed(hex_list(&[
                "#66c2a5", "#fc8d62", "#8da0cb", "#e78ac3", "#a6d854", "#ffd92f", "#e5c494",
                "#b3b3b3",
            ])),
            "Paired" => Colormap::Listed(hex_list(&[
                "#a6cee3", "#1f78b4", "#b2df8a", "#33a02c", "#fb9a99", "#e31a1c", "#fdbf6f",
                "#ff7f00", "#cab2d6", "#6a3d9a", "#ffff99", "#b15928",
            ])),
            _ => {
                return match name.strip_suffix("_r") {
                    Some(base) if base != name => Ok(Colormap::by_name(base)?.reversed()),
                    _ => Err(format!(
                        "Unknown colour map: {}. Available: {}",
                        name,
                        Colormap::NAMES.join(", ")
                    )),
                }
            }
        };
        Ok(cmap)
    }

    /// A listed map from colour strings
    pub fn from_list<S: AsRef<str>>(colors: &[S]) -> Result<Self> {
        if colors.is_empty() {
            return Err("A colour list needs at least one colour".to_string());
        }
        let parsed = colors
            .iter()
            .map(|c| c.as_ref().parse::<Rgb>())
            .collect::<Result<Vec<_>>>()?;
        Ok(Colormap::Listed(parsed))
    }

    pub fn reversed(self) -> Self {
        match self {
            Colormap::Linear(stops) => {
                Colormap::Linear(stops.into_iter().rev().map(|(t, c)| (1.0 - t, c)).collect())
            }
            Colormap::Listed(mut colors) => {
                colors.reverse();
                Colormap::Listed(colors)
            }
        }
    }

    /// Colour at `t`, clamped to `[0, 1]`. Listed maps pick bin `floor(t * n)`.
    pub fn sample(&self, t: f64) -> Rgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Colormap::Listed(colors) => {
                let index = ((t * colors.len() as f64) as usize).min(colors.len() - 1);
                colors[index]
            }
            Colormap::Linear(stops) => {
                let upper = stops.iter().position(|(x, _)| *x >= t).unwrap_or(stops.len() - 1);
                if upper == 0 {
                    return stops[0].1;
                }
                let (x0, c0) = stops[upper - 1];
                let (x1, c1) = stops[upper];
                let span = x1 - x0;
                c0.lerp(c1, if span > 0.0 { (t - x0) / span } else { 0.0 })
            }
        }
    }

    /// `n` colours evenly spaced over the map
    pub fn resample(&self, n: usize) -> Vec<Rgb> {
        match n {
            0 => Vec::new(),
            1 => vec![self.sample(0.0)],
            _ => (0..n)
                .map(|i| self.sample(i as f64 / (n - 1) as f64))
                .collect(),
        }
    }

    /// The part of the map between `lo` and `hi`, as a listed map of `n` colours
    pub fn sub_range(&self, lo: f64, hi: f64, n: usize) -> Colormap {
        let steps = n.max(2);
        Colormap::Listed(
            (0..steps)
                .map(|i| self.sample(lo + (hi - lo) * i as f64 / (steps - 1) as f64))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_forms() {
        assert_eq!("#f00".parse::<Rgb>(), Ok(Rgb::new(255, 0, 0)));
        assert_eq!("#00ff7f".parse::<Rgb>(), Ok(Rgb::new(0, 255, 127)));
        let with_alpha = "#0000ff80".parse::<Rgb>().unwrap();
        assert_eq!(with_alpha.a, 128);
        assert!((with_alpha.opacity() - 128.0 / 255.0).abs() < 1e-12);
        assert!("#12345".parse::<Rgb>().is_err());
        assert!("#gggggg".parse::<Rgb>().is_err());
    }

    #[test]
    fn parses_names_and_shorthands() {
        assert_eq!("lightblue".parse::<Rgb>().unwrap().to_hex(), "#add8e6");
        assert_eq!("Grey".parse::<Rgb>().unwrap().to_hex(), "#808080");
        assert_eq!("k".parse::<Rgb>().unwrap(), Rgb::BLACK);
        assert_eq!("g".parse::<Rgb>().unwrap().to_hex(), "#008000");
        assert_eq!("C1".parse::<Rgb>().unwrap().to_hex(), "#ff7f0e");
        assert_eq!("C11".parse::<Rgb>().unwrap().to_hex(), "#ff7f0e");
        assert_eq!("tab:green".parse::<Rgb>().unwrap().to_hex(), "#2ca02c");
        assert_eq!("0.5".parse::<Rgb>().unwrap().to_hex(), "#808080");
        assert!("notacolour".parse::<Rgb>().is_err());
    }

    #[test]
    fn named_table_is_sorted_for_lookup() {
        assert!(NAMED.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn every_named_map_resolves() {
        for name in Colormap::NAMES {
            let cmap = Colormap::by_name(name).unwrap();
            assert_eq!(cmap.resample(5).len(), 5, "{name}");
        }
        assert!(Colormap::by_name("jet").is_err());
    }

    #[test]
    fn linear_maps_interpolate_endpoints() {
        let greys = Colormap::by_name("Greys").unwrap();
        assert_eq!(greys.sample(0.0), Rgb::WHITE);
        assert_eq!(greys.sample(1.0), Rgb::BLACK);
        assert_eq!(greys.sample(7.0), Rgb::BLACK);
        let reversed = Colormap::by_name("Greys_r").unwrap();
        assert_eq!(reversed.sample(0.0), Rgb::BLACK);
    }

    #[test]
    fn listed_maps_pick_bins() {
        let cmap = Colormap::from_list(&["red", "blue"]).unwrap();
        assert_eq!(cmap.sample(0.49), Rgb::new(255, 0, 0));
        assert_eq!(cmap.sample(0.5), Rgb::new(0, 0, 255));
        assert_eq!(cmap.sample(1.0), Rgb::new(0, 0, 255));
        let tab10 = Colormap::by_name("tab10").unwrap();
        assert_eq!(tab10.resample(3)[2].to_hex(), "#17becf");
        assert!(Colormap::from_list::<&str>(&[]).is_err());
    }

    #[test]
    fn sub_range_covers_requested_interval() {
        let greys = Colormap::by_name("Greys").unwrap();
        let half = greys.sub_range(0.5, 1.0, 3);
        assert_eq!(half.sample(0.0), greys.sample(0.5));
        assert_eq!(half.sample(1.0), Rgb::BLACK);
    }
}
