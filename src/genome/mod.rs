mod cds;
mod gene_table;
mod genbank;
mod insertions;

pub use cds::{load_cds, read_cds_table, Cds, Strand};
pub use gene_table::{read_gene_table, GeneFeature, GeneTracks};
pub use genbank::{gb2cds, is_genbank, parse_genbank, parse_location, GenbankRecord, LocationSpan};
pub use insertions::{read_insertions, Insertion};
