use super::read_order;
use crate::cli::HeatmapArgs;
use crate::plots::{heatmap as draw_heatmap, write_figure, HeatmapParams};
use crate::typing::read_labeled_matrix;
use crate::utils::{open_text_reader, Result};

pub fn heatmap(args: HeatmapArgs) -> Result<()> {
    let reader = open_text_reader(&args.matrix_src)?;
    let matrix = read_labeled_matrix(reader)
        .map_err(|e| args.matrix_src.format_error("Failed to read matrix", e))?;
    let (rows, cols) = matrix.shape();
    log::info!("Loaded a {}x{} matrix from {}", rows, cols, args.matrix_src);
    let order = args.order_src.as_ref().map(read_order).transpose()?;

    let params = HeatmapParams {
        width: args.width,
        height: args.height,
        order,
        cmap: args.cmap.clone(),
        vmin: args.vmin,
        vmax: args.vmax,
        center: args.center,
        yticklabels: !args.no_yticklabels,
        cbar: args.cbar,
        font_size: args.font_size,
        ..HeatmapParams::default()
    };
    let figure = draw_heatmap(&matrix, &params)?;

    let mut inputs = vec![("Matrix".to_string(), args.matrix_src.to_string())];
    if let Some(src) = &args.order_src {
        inputs.push(("Row order".to_string(), src.to_string()));
    }
    write_figure(&figure, &args.output_path, "Heatmap", &inputs, None)
}
