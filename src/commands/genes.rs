use super::read_order;
use crate::cli::GenesArgs;
use crate::genome::read_gene_table;
use crate::plots::{gene_tracks, write_figure, GeneParams};
use crate::utils::{open_text_reader, Result};

pub fn genes(args: GenesArgs) -> Result<()> {
    let reader = open_text_reader(&args.genes_src)?;
    let tracks = read_gene_table(reader)
        .map_err(|e| args.genes_src.format_error("Failed to read gene table", e))?;
    log::info!(
        "Loaded {} genes on {} tracks",
        tracks.iter().map(|(_, genes)| genes.len()).sum::<usize>(),
        tracks.len()
    );
    let order = match &args.order_src {
        Some(src) => read_order(src)?,
        None => tracks.iter().map(|(name, _)| name.clone()).collect(),
    };

    let params = GeneParams {
        add_labels: args.labels,
        max_track_size: args.max_track_size,
        trackname_size: args.trackname_size,
        label_track: args.label_track,
        label_rot: args.label_rotation,
        label_size: args.label_size,
        width: args.width,
        track_height: args.track_height,
        ..GeneParams::default()
    };
    let figure = gene_tracks(&tracks, &order, &params)?;
    let inputs = vec![("Genes".to_string(), args.genes_src.to_string())];
    write_figure(&figure, &args.output_path, "Gene tracks", &inputs, None)
}
