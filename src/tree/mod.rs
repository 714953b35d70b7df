mod layout;
mod newick;

pub use newick::{parse_newick, read_newick, Node, Tree};
