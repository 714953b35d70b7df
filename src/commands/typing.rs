use super::{cluster, load_distances, typing_inputs, write_order};
use crate::cli::TypingArgs;
use crate::plots::{typing_figure, write_figure, HeatmapParams, TypingFigureParams};
use crate::utils::{create_output_writer, Result};
use std::io::Write;

pub fn typing(args: TypingArgs) -> Result<()> {
    let matrix = load_distances(&args.input)?;
    if let Some(path) = &args.distances_out {
        let mut writer = create_output_writer(Some(path.as_path()))?;
        matrix.write_tsv(&mut writer)?;
        writer
            .flush()
            .map_err(|e| format!("Failed to write distance matrix: {}", e))?;
        log::info!("Distance matrix written to {}", path.display());
    }
    let dendro = cluster(&args.input, &matrix)?;

    let largest = matrix.values.iter().copied().fold(0.0, f64::max);
    let vmax = args.vmax.unwrap_or(if largest > 0.0 { largest } else { 1.0 });
    let params = TypingFigureParams {
        width: args.width,
        heatmap: HeatmapParams {
            cmap: args.cmap.clone(),
            vmin: 0.0,
            vmax,
            cbar: args.cbar,
            font_size: args.font_size,
            ..HeatmapParams::default()
        },
        ..TypingFigureParams::default()
    };
    let (figure, order) = typing_figure(&dendro, &matrix, &params)?;
    write_order(args.order_out.as_deref(), &order)?;
    write_figure(
        &figure,
        &args.output_path,
        "Typing overview",
        &typing_inputs(&args.input),
        Some(&order),
    )
}
