use super::{cluster, load_distances, typing_inputs, write_order};
use crate::cli::RectreeArgs;
use crate::plots::{rectree as draw_rectree, write_figure, RectreeParams};
use crate::utils::Result;

pub fn rectree(args: RectreeArgs) -> Result<()> {
    let matrix = load_distances(&args.input)?;
    let dendro = cluster(&args.input, &matrix)?;
    let params = RectreeParams {
        width: args.width,
        height: args.height,
        scale_max: args.scale_max,
        no_labels: args.no_labels,
        label_size: args.label_size,
        ..RectreeParams::default()
    };
    let (figure, order) = draw_rectree(&dendro, &params)?;
    write_order(args.order_out.as_deref(), &order)?;
    write_figure(
        &figure,
        &args.output_path,
        "Dendrogram",
        &typing_inputs(&args.input),
        Some(&order),
    )
}
