mod dendrogram;
mod distance;
mod linkage;
mod profile;

pub use dendrogram::{dendrogram, Dendrogram, LinkColor};
pub use distance::{
    allele_differences, read_distance_matrix, read_labeled_matrix, DistanceMatrix, LabeledMatrix,
};
pub use linkage::{linkage, Linkage, Merge};
pub use profile::{read_profiles, AlleleProfiles};
