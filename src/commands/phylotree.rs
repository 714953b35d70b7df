use super::write_order;
use crate::cli::PhylotreeArgs;
use crate::plots::{phylotree as draw_phylotree, write_figure, PhylotreeParams};
use crate::tree::read_newick;
use crate::utils::Result;

pub fn phylotree(args: PhylotreeArgs) -> Result<()> {
    let tree = read_newick(&args.tree_src)?;
    log::info!("Loaded a tree of {} nodes from {}", tree.nodes.len(), args.tree_src);
    let params = PhylotreeParams {
        show_labels: !args.hide_labels,
        align_labels: args.align_labels,
        label_size: args.label_size,
        color: args.color.clone(),
        line_width: args.line_width,
        width: args.width,
        height: args.height,
    };
    let (figure, order) = draw_phylotree(&tree, &params)?;
    write_order(args.order_out.as_deref(), &order)?;
    let inputs = vec![("Tree".to_string(), args.tree_src.to_string())];
    write_figure(&figure, &args.output_path, "Phylogram", &inputs, Some(&order))
}
