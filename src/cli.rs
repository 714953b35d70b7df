use crate::{
    plots::{ColormapSpec, Colormap, FeatureStyle, HPos, LabelTrack, SublabelPos, VPos},
    preflight_fields,
    typing::Linkage,
    utils::{GenomicRegion, InputSource, Result},
};
use chrono::Datelike;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use log::{Level, LevelFilter};
use owo_colors::{
    colors::{Blue, Green, Magenta, Red, Yellow},
    OwoColorize, Stream, Style,
};
use std::{
    io::Write,
    path::{Path, PathBuf},
};

#[cfg(has_git_describe)]
pub const FULL_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "-", env!("VERGEN_GIT_DESCRIBE"));

#[cfg(not(has_git_describe))]
pub const FULL_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name="cvmplot",
          version=FULL_VERSION,
          about="Plots for Tn-seq insertion profiles, cgMLST/wgMLST typing and gene neighbourhoods",
          long_about = None,
          disable_help_subcommand = true,
          after_help = format!("Copyright (C) 2022-{}     cvmplot contributors
This program comes with ABSOLUTELY NO WARRANTY.", chrono::Utc::now().year()),
          help_template = "{name} {version}\n{about-section}\n{usage-heading}\n    {usage}\n\n{all-args}{after-help}",
          )]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
    /// Enable or disable color output in logging
    #[arg(long, value_enum, default_value_t = Color::Auto, global = true, help_heading = "Advanced")]
    color: Color,

    /// Specify multiple times to increase verbosity level (e.g., -vv for more verbosity)
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        global = true
    )]
    pub verbosity: u8,
}

#[derive(Subcommand)]
pub enum Command {
    #[clap(about = "Transposon insertion profile over a CDS track")]
    Tnseq(TnseqArgs),
    #[clap(about = "Extract CDS from a GenBank file")]
    Gb2cds(Gb2cdsArgs),
    #[clap(about = "Pairwise allele differences of cgMLST/wgMLST profiles")]
    Distance(DistanceArgs),
    #[clap(about = "Rectangular dendrogram of typing profiles")]
    Rectree(RectreeArgs),
    #[clap(about = "Circular dendrogram of typing profiles")]
    Circular(CircularArgs),
    #[clap(about = "Heatmap of a labelled matrix")]
    Heatmap(HeatmapArgs),
    #[clap(about = "Phylogram of a Newick tree")]
    Phylotree(PhylotreeArgs),
    #[clap(about = "Gene neighbourhood tracks")]
    Genes(GenesArgs),
    #[clap(about = "Dendrogram and distance heatmap of typing profiles")]
    Typing(TypingArgs),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Tnseq(_) => "tnseq",
            Command::Gb2cds(_) => "gb2cds",
            Command::Distance(_) => "distance",
            Command::Rectree(_) => "rectree",
            Command::Circular(_) => "circular",
            Command::Heatmap(_) => "heatmap",
            Command::Phylotree(_) => "phylotree",
            Command::Genes(_) => "genes",
            Command::Typing(_) => "typing",
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(arg_required_else_help(true))]
pub struct TnseqArgs {
    /// Insertion counts: 'position count', 'contig position count' or wiggle
    #[arg(short = 'i', long = "insertions", value_name = "INSERTIONS", required = true)]
    pub insertions_src: InputSource,

    /// GenBank file or CDS table ('start end strand name [color]')
    #[arg(short = 'c', long = "cds", value_name = "CDS", required = true)]
    pub cds_src: InputSource,

    /// Output image path (.svg or .html)
    #[arg(
        short = 'o',
        long = "image",
        value_name = "IMAGE",
        value_parser = check_image_path,
        required = true
    )]
    pub output_path: PathBuf,

    /// GenBank record (or CDS table record column) to use
    #[arg(long = "record", value_name = "RECORD")]
    pub record: Option<String>,

    /// Only keep insertions on this contig
    #[arg(long = "contig", value_name = "CONTIG")]
    pub contig: Option<String>,

    /// Window to plot as contig:start-end
    #[arg(
        short = 'r',
        long = "region",
        value_name = "REGION",
        value_parser = GenomicRegion::from_string,
        conflicts_with_all = ["start", "length"]
    )]
    pub region: Option<GenomicRegion>,

    /// First position of the window
    #[arg(long = "start", value_name = "START", default_value = "1")]
    pub start: u64,

    /// Window length [up to the last CDS or insertion]
    #[arg(long = "length", value_name = "LENGTH")]
    pub length: Option<u64>,

    /// Figure width in inches
    #[arg(long = "fig-width", value_name = "INCHES", default_value = "10", value_parser = positive_float, help_heading = "Track")]
    pub fig_width: f64,

    /// Track height in inches
    #[arg(long = "track-height", value_name = "INCHES", default_value = "0.6", value_parser = positive_float, help_heading = "Track")]
    pub track_height: f64,

    /// Label left of the track
    #[arg(long = "track-label", value_name = "LABEL", help_heading = "Track")]
    pub track_label: Option<String>,

    /// Track label font size
    #[arg(long = "track-label-size", value_name = "SIZE", default_value = "12", value_parser = positive_float, help_heading = "Track")]
    pub track_label_size: f64,

    /// Corner of the range sublabel (top|bottom)-(left|center|right)
    #[arg(long = "sublabel-pos", value_name = "POS", default_value = "bottom-right", help_heading = "Track")]
    pub sublabel_pos: SublabelPos,

    /// Range sublabel font size
    #[arg(long = "sublabel-size", value_name = "SIZE", default_value = "6", value_parser = positive_float, help_heading = "Track")]
    pub sublabel_size: f64,

    /// CDS glyph: bigarrow, arrow, bigbox, box, bigrbox or rbox
    #[arg(long = "cds-style", value_name = "STYLE", default_value = "bigarrow", help_heading = "CDS")]
    pub cds_style: FeatureStyle,

    /// CDS fill colour when the table has none
    #[arg(long = "cds-color", value_name = "COLOR", default_value = "lightblue", value_parser = check_color, help_heading = "CDS")]
    pub cds_color: String,

    /// Label CDS with their names
    #[arg(long = "cds-labels", help_heading = "CDS")]
    pub cds_labels: bool,

    /// CDS label font size
    #[arg(long = "cds-label-size", value_name = "SIZE", default_value = "6", value_parser = positive_float, help_heading = "CDS")]
    pub cds_label_size: f64,

    /// CDS label vertical position: top, center or bottom
    #[arg(long = "cds-label-vpos", value_name = "POS", default_value = "bottom", help_heading = "CDS")]
    pub cds_label_vpos: VPos,

    /// CDS label horizontal position: left, center or right
    #[arg(long = "cds-label-hpos", value_name = "POS", default_value = "center", help_heading = "CDS")]
    pub cds_label_hpos: HPos,

    /// CDS label rotation in degrees
    #[arg(long = "cds-label-rotation", value_name = "DEGREES", default_value = "0", help_heading = "CDS")]
    pub cds_label_rotation: f64,

    /// Arrow shaft width relative to the head
    #[arg(long = "arrow-shaft-ratio", value_name = "RATIO", default_value = "0.5", value_parser = ensure_unit_float, help_heading = "CDS")]
    pub arrow_shaft_ratio: f64,

    /// Bottom of the bar panel in track heights
    #[arg(long = "bar-bottom", value_name = "TRACKS", default_value = "1.5", value_parser = positive_float, help_heading = "Bars")]
    pub bar_bottom: f64,

    /// Height of the bar panel in track heights
    #[arg(long = "bar-panel-height", value_name = "TRACKS", default_value = "4", value_parser = positive_float, help_heading = "Bars")]
    pub bar_panel_height: f64,

    /// Y axis label of the bar panel
    #[arg(long = "ylabel", value_name = "LABEL", help_heading = "Bars")]
    pub ylabel: Option<String>,

    /// Y axis label font size
    #[arg(long = "ylabel-size", value_name = "SIZE", default_value = "10", value_parser = positive_float, help_heading = "Bars")]
    pub ylabel_size: f64,

    /// X tick label font size
    #[arg(long = "xtick-size", value_name = "SIZE", default_value = "8", value_parser = positive_float, help_heading = "Bars")]
    pub xtick_size: f64,

    /// Y tick label font size
    #[arg(long = "ytick-size", value_name = "SIZE", default_value = "8", value_parser = positive_float, help_heading = "Bars")]
    pub ytick_size: f64,

    /// Bar line width in pixels
    #[arg(long = "bar-width", value_name = "WIDTH", default_value = "1", value_parser = positive_float, help_heading = "Bars")]
    pub bar_width: f64,

    /// Bar colour
    #[arg(long = "bar-color", value_name = "COLOR", default_value = "grey", value_parser = check_color, help_heading = "Bars")]
    pub bar_color: String,

    /// Bar opacity
    #[arg(long = "bar-alpha", value_name = "ALPHA", default_value = "0.7", value_parser = ensure_unit_float, help_heading = "Bars")]
    pub bar_alpha: f64,
}

impl TnseqArgs {
    pub fn preflight(&self) -> Result<()> {
        preflight_fields!(self, insertions_src, cds_src)
    }
}

#[derive(Parser, Debug, Clone)]
#[command(arg_required_else_help(true))]
pub struct Gb2cdsArgs {
    /// GenBank file
    #[arg(short = 'g', long = "genbank", value_name = "GENBANK", required = true)]
    pub genbank_src: InputSource,

    /// Write output to a file [standard output]
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        value_parser = check_prefix_path
    )]
    pub output: Option<PathBuf>,

    /// Only export this record
    #[arg(long = "record", value_name = "RECORD")]
    pub record: Option<String>,
}

impl Gb2cdsArgs {
    pub fn preflight(&self) -> Result<()> {
        preflight_fields!(self, genbank_src)
    }
}

/// How a typing input file is interpreted
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum InputType {
    /// Allele profiles, one row per sample
    Profiles,
    /// Square distance matrix
    Distances,
}

/// Typing input shared by the dendrogram commands
#[derive(Args, Debug, Clone)]
pub struct TypingInputArgs {
    /// Allele profiles or distance matrix
    #[arg(short = 'i', long = "input", value_name = "INPUT", required = true)]
    pub input_src: InputSource,

    /// Type of the input table
    #[arg(long = "input-type", value_enum, default_value_t = InputType::Profiles)]
    pub input_type: InputType,

    /// Extra tokens marking a missing allele (comma-separated)
    #[arg(long = "missing", value_name = "TOKENS", value_delimiter = ',', help_heading = "Typing")]
    pub missing: Vec<String>,

    /// Linkage method: single, complete, average, weighted or ward
    #[arg(long = "linkage", value_name = "METHOD", default_value = "single", help_heading = "Typing")]
    pub linkage: Linkage,

    /// Height below which links are coloured by cluster [0.7 x tree height]
    #[arg(long = "color-threshold", value_name = "HEIGHT", value_parser = non_negative_float, help_heading = "Typing")]
    pub color_threshold: Option<f64>,

    /// Number of threads for the distance computation
    #[arg(
        short = 't',
        long = "threads",
        value_name = "THREADS",
        default_value = "1",
        value_parser = threads_in_range,
        help_heading = "Typing"
    )]
    pub threads: usize,
}

#[derive(Parser, Debug, Clone)]
#[command(arg_required_else_help(true))]
pub struct DistanceArgs {
    /// Allele profiles, one row per sample
    #[arg(short = 'i', long = "input", value_name = "PROFILES", required = true)]
    pub profiles_src: InputSource,

    /// Write output to a file [standard output]
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        value_parser = check_prefix_path
    )]
    pub output: Option<PathBuf>,

    /// Extra tokens marking a missing allele (comma-separated)
    #[arg(long = "missing", value_name = "TOKENS", value_delimiter = ',')]
    pub missing: Vec<String>,

    /// Number of threads
    #[arg(
        short = 't',
        long = "threads",
        value_name = "THREADS",
        default_value = "1",
        value_parser = threads_in_range
    )]
    pub threads: usize,
}

impl DistanceArgs {
    pub fn preflight(&self) -> Result<()> {
        preflight_fields!(self, profiles_src)
    }
}

#[derive(Parser, Debug, Clone)]
#[command(arg_required_else_help(true))]
pub struct RectreeArgs {
    #[command(flatten)]
    pub input: TypingInputArgs,

    /// Output image path (.svg or .html)
    #[arg(
        short = 'o',
        long = "image",
        value_name = "IMAGE",
        value_parser = check_image_path,
        required = true
    )]
    pub output_path: PathBuf,

    /// Write the leaf order (bottom to top) to this file
    #[arg(long = "order-out", value_name = "FILE", value_parser = check_prefix_path)]
    pub order_out: Option<PathBuf>,

    /// Largest distance shown on the scale
    #[arg(long = "scale-max", value_name = "DISTANCE", default_value = "10", value_parser = positive_float, help_heading = "Plotting")]
    pub scale_max: f64,

    /// Hide leaf labels
    #[arg(long = "no-labels", help_heading = "Plotting")]
    pub no_labels: bool,

    /// Leaf label font size
    #[arg(long = "label-size", value_name = "SIZE", default_value = "10", value_parser = positive_float, help_heading = "Plotting")]
    pub label_size: f64,

    /// Figure width in inches
    #[arg(long = "width", value_name = "INCHES", default_value = "15", value_parser = positive_float, help_heading = "Plotting")]
    pub width: f64,

    /// Figure height in inches
    #[arg(long = "height", value_name = "INCHES", default_value = "15", value_parser = positive_float, help_heading = "Plotting")]
    pub height: f64,
}

impl RectreeArgs {
    pub fn preflight(&self) -> Result<()> {
        preflight_fields!(self.input, input_src)
    }
}

#[derive(Parser, Debug, Clone)]
#[command(arg_required_else_help(true))]
pub struct CircularArgs {
    #[command(flatten)]
    pub input: TypingInputArgs,

    /// Output image path (.svg or .html)
    #[arg(
        short = 'o',
        long = "image",
        value_name = "IMAGE",
        value_parser = check_image_path,
        required = true
    )]
    pub output_path: PathBuf,

    /// Write the leaf order to this file
    #[arg(long = "order-out", value_name = "FILE", value_parser = check_prefix_path)]
    pub order_out: Option<PathBuf>,

    /// Gap of the circle in degrees
    #[arg(long = "open-angle", value_name = "DEGREES", default_value = "0", value_parser = open_angle_in_range, help_heading = "Plotting")]
    pub open_angle: f64,

    /// Rotation of the first leaf in degrees
    #[arg(long = "start-angle", value_name = "DEGREES", default_value = "0", help_heading = "Plotting")]
    pub start_angle: f64,

    /// Leaf label font size
    #[arg(long = "fontsize", value_name = "SIZE", default_value = "8", value_parser = positive_float, help_heading = "Plotting")]
    pub fontsize: f64,

    /// Hide leaf labels
    #[arg(long = "no-labels", help_heading = "Plotting")]
    pub no_labels: bool,

    /// Label colours: 'label color' rows
    #[arg(long = "label-colors", value_name = "FILE", help_heading = "Plotting")]
    pub label_colors_src: Option<InputSource>,

    /// Draw a point at every leaf
    #[arg(long = "points", help_heading = "Plotting")]
    pub add_points: bool,

    /// Point colours and legend categories: 'label color category' rows
    #[arg(long = "point-colors", value_name = "FILE", requires = "add_points", help_heading = "Plotting")]
    pub point_colors_src: Option<InputSource>,

    /// Point size (area in square points)
    #[arg(long = "point-size", value_name = "SIZE", default_value = "15", value_parser = positive_float, help_heading = "Plotting")]
    pub point_size: f64,

    /// Title of the point legend
    #[arg(long = "point-legend-title", value_name = "TITLE", default_value = "Category", help_heading = "Plotting")]
    pub point_legend_title: String,

    /// Colour branches by cluster
    #[arg(long = "branch-colors", help_heading = "Plotting")]
    pub branch_color: bool,

    /// Colour map for branch clusters
    #[arg(long = "palette", value_name = "CMAP", default_value = "gist_rainbow", value_parser = check_colormap_name, help_heading = "Plotting")]
    pub palette: String,

    /// Sample classes drawn as rings: a 'sample class...' table with a header naming each ring
    #[arg(long = "classes", value_name = "FILE", help_heading = "Plotting")]
    pub classes_src: Option<InputSource>,

    /// Figure size in inches
    #[arg(long = "size", value_name = "INCHES", default_value = "10", value_parser = positive_float, help_heading = "Plotting")]
    pub size: f64,
}

impl CircularArgs {
    pub fn preflight(&self) -> Result<()> {
        preflight_fields!(self.input, input_src)?;
        preflight_fields!(self, label_colors_src, point_colors_src, classes_src)
    }
}

#[derive(Parser, Debug, Clone)]
#[command(arg_required_else_help(true))]
pub struct HeatmapArgs {
    /// Labelled matrix: a header of column labels, then 'label value...' rows
    #[arg(short = 'i', long = "input", value_name = "MATRIX", required = true)]
    pub matrix_src: InputSource,

    /// Output image path (.svg or .html)
    #[arg(
        short = 'o',
        long = "image",
        value_name = "IMAGE",
        value_parser = check_image_path,
        required = true
    )]
    pub output_path: PathBuf,

    /// Row order, one label per line (e.g. from --order-out), bottom row first
    #[arg(long = "order", value_name = "FILE")]
    pub order_src: Option<InputSource>,

    /// Colour map name or comma-separated colours [rocket, icefire when centred]
    #[arg(long = "cmap", value_name = "CMAP", help_heading = "Plotting")]
    pub cmap: Option<ColormapSpec>,

    /// Lowest value of the colour range
    #[arg(long = "vmin", value_name = "VALUE", default_value = "0", allow_negative_numbers = true, help_heading = "Plotting")]
    pub vmin: f64,

    /// Highest value of the colour range
    #[arg(long = "vmax", value_name = "VALUE", default_value = "100", allow_negative_numbers = true, help_heading = "Plotting")]
    pub vmax: f64,

    /// Value at the centre of a diverging colour map
    #[arg(long = "center", value_name = "VALUE", allow_negative_numbers = true, help_heading = "Plotting")]
    pub center: Option<f64>,

    /// Draw a colour bar
    #[arg(long = "cbar", help_heading = "Plotting")]
    pub cbar: bool,

    /// Hide row labels
    #[arg(long = "no-yticklabels", help_heading = "Plotting")]
    pub no_yticklabels: bool,

    /// Tick label font size
    #[arg(long = "font-size", value_name = "SIZE", default_value = "10", value_parser = positive_float, help_heading = "Plotting")]
    pub font_size: f64,

    /// Figure width in inches
    #[arg(long = "width", value_name = "INCHES", default_value = "8", value_parser = positive_float, help_heading = "Plotting")]
    pub width: f64,

    /// Figure height in inches
    #[arg(long = "height", value_name = "INCHES", default_value = "8", value_parser = positive_float, help_heading = "Plotting")]
    pub height: f64,
}

impl HeatmapArgs {
    pub fn preflight(&self) -> Result<()> {
        preflight_fields!(self, matrix_src, order_src)
    }
}

#[derive(Parser, Debug, Clone)]
#[command(arg_required_else_help(true))]
pub struct PhylotreeArgs {
    /// Newick tree
    #[arg(short = 'i', long = "tree", value_name = "NEWICK", required = true)]
    pub tree_src: InputSource,

    /// Output image path (.svg or .html)
    #[arg(
        short = 'o',
        long = "image",
        value_name = "IMAGE",
        value_parser = check_image_path,
        required = true
    )]
    pub output_path: PathBuf,

    /// Write the tip order (bottom to top) to this file
    #[arg(long = "order-out", value_name = "FILE", value_parser = check_prefix_path)]
    pub order_out: Option<PathBuf>,

    /// Hide node labels
    #[arg(long = "hide-labels", help_heading = "Plotting")]
    pub hide_labels: bool,

    /// Align labels to the right of the tree
    #[arg(long = "align-labels", conflicts_with = "hide_labels", help_heading = "Plotting")]
    pub align_labels: bool,

    /// Label font size
    #[arg(long = "label-size", value_name = "SIZE", default_value = "8", value_parser = positive_float, help_heading = "Plotting")]
    pub label_size: f64,

    /// Branch colour
    #[arg(long = "color", value_name = "COLOR", default_value = "k", value_parser = check_color, help_heading = "Plotting")]
    pub color: String,

    /// Branch line width
    #[arg(long = "line-width", value_name = "WIDTH", default_value = "1", value_parser = positive_float, help_heading = "Plotting")]
    pub line_width: f64,

    /// Figure width in inches
    #[arg(long = "width", value_name = "INCHES", default_value = "8", value_parser = positive_float, help_heading = "Plotting")]
    pub width: f64,

    /// Figure height in inches [from the number of tips]
    #[arg(long = "height", value_name = "INCHES", value_parser = positive_float, help_heading = "Plotting")]
    pub height: Option<f64>,
}

impl PhylotreeArgs {
    pub fn preflight(&self) -> Result<()> {
        preflight_fields!(self, tree_src)
    }
}

#[derive(Parser, Debug, Clone)]
#[command(arg_required_else_help(true))]
pub struct GenesArgs {
    /// Gene table: 'track start end strand label [color]'
    #[arg(short = 'i', long = "genes", value_name = "GENES", required = true)]
    pub genes_src: InputSource,

    /// Output image path (.svg or .html)
    #[arg(
        short = 'o',
        long = "image",
        value_name = "IMAGE",
        value_parser = check_image_path,
        required = true
    )]
    pub output_path: PathBuf,

    /// Track order, one name per line, bottom track first [table order]
    #[arg(long = "order", value_name = "FILE")]
    pub order_src: Option<InputSource>,

    /// Label genes
    #[arg(long = "labels", help_heading = "Plotting")]
    pub labels: bool,

    /// Tracks that carry gene labels
    #[arg(long = "label-track", value_name = "TRACKS", default_value = "all", help_heading = "Plotting")]
    pub label_track: LabelTrack,

    /// Gene label rotation in degrees
    #[arg(long = "label-rotation", value_name = "DEGREES", default_value = "45", help_heading = "Plotting")]
    pub label_rotation: f64,

    /// Gene label font size
    #[arg(long = "label-size", value_name = "SIZE", default_value = "12", value_parser = positive_float, help_heading = "Plotting")]
    pub label_size: f64,

    /// Track name font size
    #[arg(long = "trackname-size", value_name = "SIZE", default_value = "18", value_parser = positive_float, help_heading = "Plotting")]
    pub trackname_size: f64,

    /// Length of the x axis in bases
    #[arg(long = "max-track-size", value_name = "BASES", default_value = "5000", value_parser = positive_float, help_heading = "Plotting")]
    pub max_track_size: f64,

    /// Figure width in inches
    #[arg(long = "width", value_name = "INCHES", default_value = "12", value_parser = positive_float, help_heading = "Plotting")]
    pub width: f64,

    /// Height of each track in inches
    #[arg(long = "track-height", value_name = "INCHES", default_value = "0.6", value_parser = positive_float, help_heading = "Plotting")]
    pub track_height: f64,
}

impl GenesArgs {
    pub fn preflight(&self) -> Result<()> {
        preflight_fields!(self, genes_src, order_src)
    }
}

#[derive(Parser, Debug, Clone)]
#[command(arg_required_else_help(true))]
pub struct TypingArgs {
    #[command(flatten)]
    pub input: TypingInputArgs,

    /// Output image path (.svg or .html)
    #[arg(
        short = 'o',
        long = "image",
        value_name = "IMAGE",
        value_parser = check_image_path,
        required = true
    )]
    pub output_path: PathBuf,

    /// Write the distance matrix to this file
    #[arg(long = "distances-out", value_name = "FILE", value_parser = check_prefix_path)]
    pub distances_out: Option<PathBuf>,

    /// Write the leaf order (bottom to top) to this file
    #[arg(long = "order-out", value_name = "FILE", value_parser = check_prefix_path)]
    pub order_out: Option<PathBuf>,

    /// Colour map name or comma-separated colours
    #[arg(long = "cmap", value_name = "CMAP", help_heading = "Plotting")]
    pub cmap: Option<ColormapSpec>,

    /// Highest distance of the colour range [largest distance]
    #[arg(long = "vmax", value_name = "VALUE", value_parser = positive_float, help_heading = "Plotting")]
    pub vmax: Option<f64>,

    /// Draw a colour bar
    #[arg(long = "cbar", help_heading = "Plotting")]
    pub cbar: bool,

    /// Tick label font size
    #[arg(long = "font-size", value_name = "SIZE", default_value = "8", value_parser = positive_float, help_heading = "Plotting")]
    pub font_size: f64,

    /// Figure width in inches
    #[arg(long = "width", value_name = "INCHES", default_value = "14", value_parser = positive_float, help_heading = "Plotting")]
    pub width: f64,
}

impl TypingArgs {
    pub fn preflight(&self) -> Result<()> {
        preflight_fields!(self.input, input_src)
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Color {
    Always,
    Auto,
    Never,
}

impl Color {
    fn apply(self) {
        match self {
            Color::Always => owo_colors::set_override(true),
            Color::Auto => {}
            Color::Never => owo_colors::set_override(false),
        }
    }
}

pub fn init_verbose(args: &Cli) {
    args.color.apply();

    let filter_level: LevelFilter = match args.verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::from_default_env()
        .format(format_log)
        .filter_level(filter_level)
        .init();
}

#[inline(always)]
fn level_style(level: Level) -> (&'static str, Style) {
    match level {
        Level::Error => ("ERROR", Style::new().fg::<Red>().bold()),
        Level::Warn => ("WARN", Style::new().fg::<Yellow>()),
        Level::Info => ("INFO", Style::new().fg::<Green>()),
        Level::Debug => ("DEBUG", Style::new().fg::<Blue>()),
        Level::Trace => ("TRACE", Style::new().fg::<Magenta>()),
    }
}

fn format_log(buf: &mut env_logger::fmt::Formatter, record: &log::Record) -> std::io::Result<()> {
    let (label, style) = level_style(record.level());
    let ts = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    let painted_label = label.if_supports_color(Stream::Stderr, |t| style.style(t));
    writeln!(buf, "{ts} [{}] - {}", painted_label, record.args())
}

fn check_prefix_path(s: &str) -> Result<PathBuf> {
    let path = Path::new(s);
    if let Some(parent_dir) = path.parent() {
        if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
            return Err(format!("Path does not exist: {}", parent_dir.display()));
        }
    }
    Ok(PathBuf::from(s))
}

fn check_image_path(s: &str) -> Result<PathBuf> {
    let prefix_check = check_prefix_path(s)?;
    let path = Path::new(s);
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("svg") | Some("html") => Ok(prefix_check),
        _ => Err("Image must have an extension of .svg or .html".to_string()),
    }
}

fn threads_in_range(s: &str) -> Result<usize> {
    let thread: usize = s
        .parse()
        .map_err(|_| format!("`{}` is not a valid thread number", s))?;
    if thread >= 1 {
        Ok(thread)
    } else {
        Err("Number of threads must be at least 1".into())
    }
}

fn ensure_unit_float(s: &str) -> Result<f64> {
    let value = s
        .parse::<f64>()
        .map_err(|e| format!("Could not parse float: {}", e))?;
    if !(0.0..=1.0).contains(&value) {
        Err(format!(
            "The value must be between 0.0 and 1.0, got: {}",
            value
        ))
    } else {
        Ok(value)
    }
}

fn positive_float(s: &str) -> Result<f64> {
    let value = s
        .parse::<f64>()
        .map_err(|e| format!("Could not parse float: {}", e))?;
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(format!("The value must be positive, got: {}", value))
    }
}

fn non_negative_float(s: &str) -> Result<f64> {
    let value = s
        .parse::<f64>()
        .map_err(|e| format!("Could not parse float: {}", e))?;
    if value >= 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(format!("The value must not be negative, got: {}", value))
    }
}

fn open_angle_in_range(s: &str) -> Result<f64> {
    let value = s
        .parse::<f64>()
        .map_err(|e| format!("Could not parse float: {}", e))?;
    if (0.0..360.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("The open angle must be in [0, 360), got: {}", value))
    }
}

fn check_color(s: &str) -> Result<String> {
    s.parse::<crate::plots::Rgb>()?;
    Ok(s.to_string())
}

fn check_colormap_name(s: &str) -> Result<String> {
    Colormap::by_name(s)?;
    Ok(s.to_string())
}
