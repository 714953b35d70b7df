pub mod circular;
pub mod distance;
pub mod gb2cds;
pub mod genes;
pub mod heatmap;
pub mod phylotree;
pub mod rectree;
pub mod tnseq;
pub mod typing;

use crate::cli::{InputType, TypingInputArgs};
use crate::typing::{
    allele_differences, dendrogram, linkage, read_distance_matrix, read_profiles, Dendrogram,
    DistanceMatrix,
};
use crate::utils::{open_text_reader, read_lines, write_lines, InputSource, Result};
use std::path::Path;

/// Distance matrix from allele profiles, or read as is
fn load_distances(input: &TypingInputArgs) -> Result<DistanceMatrix> {
    let reader = open_text_reader(&input.input_src)?;
    match input.input_type {
        InputType::Profiles => {
            let profiles = read_profiles(reader, &input.missing)
                .map_err(|e| input.input_src.format_error("Failed to read allele profiles", e))?;
            log::info!(
                "Loaded {} samples typed at {} loci from {}",
                profiles.num_samples(),
                profiles.num_loci(),
                input.input_src
            );
            allele_differences(&profiles, input.threads)
        }
        InputType::Distances => {
            let matrix = read_distance_matrix(reader)
                .map_err(|e| input.input_src.format_error("Failed to read distance matrix", e))?;
            log::info!("Loaded distances between {} samples from {}", matrix.len(), input.input_src);
            Ok(matrix)
        }
    }
}

fn cluster(input: &TypingInputArgs, matrix: &DistanceMatrix) -> Result<Dendrogram> {
    if matrix.len() < 2 {
        return Err(format!(
            "At least two samples are needed to build a tree, found {}",
            matrix.len()
        ));
    }
    let merges = linkage(matrix, input.linkage)?;
    let dendro = dendrogram(&merges, &matrix.labels, input.color_threshold)?;
    log::debug!(
        "{} linkage of {} samples: height {}, {} clusters",
        input.linkage,
        dendro.num_leaves(),
        dendro.max_height(),
        dendro.num_clusters()
    );
    Ok(dendro)
}

fn typing_inputs(input: &TypingInputArgs) -> Vec<(String, String)> {
    let kind = match input.input_type {
        InputType::Profiles => "Allele profiles",
        InputType::Distances => "Distance matrix",
    };
    vec![
        (kind.to_string(), input.input_src.to_string()),
        ("Linkage".to_string(), input.linkage.to_string()),
    ]
}

fn write_order(path: Option<&Path>, order: &[String]) -> Result<()> {
    if let Some(path) = path {
        write_lines(Some(path), order)?;
        log::info!("Leaf order written to {}", path.display());
    }
    Ok(())
}

/// One label per non-blank line
fn read_order(src: &InputSource) -> Result<Vec<String>> {
    let reader = open_text_reader(src)?;
    let mut order = Vec::new();
    for line in read_lines(reader) {
        let (_, line) = line.map_err(|e| src.format_error("Failed to read order", e))?;
        order.push(line.trim().to_string());
    }
    if order.is_empty() {
        return Err(format!("Order file {} has no labels", src));
    }
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typing::Linkage;
    use std::str::FromStr;
    use tempfile::tempdir;

    fn input_args(path: &Path, input_type: InputType) -> TypingInputArgs {
        TypingInputArgs {
            input_src: InputSource::from_str(path.to_str().unwrap()).unwrap(),
            input_type,
            missing: vec!["XX".to_string()],
            linkage: Linkage::Single,
            color_threshold: None,
            threads: 2,
        }
    }

    #[test]
    fn profiles_and_distances_give_the_same_tree() {
        let dir = tempdir().unwrap();
        let profiles = dir.path().join("profiles.tsv");
        std::fs::write(
            &profiles,
            "FILE\tl1\tl2\tl3\ns1\t1\t1\t1\ns2\t1\t2\tXX\ns3\t2\t2\t2\n",
        )
        .unwrap();
        let from_profiles = load_distances(&input_args(&profiles, InputType::Profiles)).unwrap();
        assert_eq!(from_profiles.get(0, 1), 1.0);
        assert_eq!(from_profiles.get(0, 2), 3.0);

        let distances = dir.path().join("distances.tsv");
        let mut file = std::fs::File::create(&distances).unwrap();
        from_profiles.write_tsv(&mut file).unwrap();
        drop(file);
        let from_matrix = load_distances(&input_args(&distances, InputType::Distances)).unwrap();
        assert_eq!(from_matrix, from_profiles);

        let args = input_args(&profiles, InputType::Profiles);
        let dendro = cluster(&args, &from_matrix).unwrap();
        assert_eq!(dendro.num_leaves(), 3);
    }

    #[test]
    fn single_sample_cannot_be_clustered() {
        let dir = tempdir().unwrap();
        let profiles = dir.path().join("one.tsv");
        std::fs::write(&profiles, "FILE\tl1\ns1\t1\n").unwrap();
        let args = input_args(&profiles, InputType::Profiles);
        let matrix = load_distances(&args).unwrap();
        assert!(cluster(&args, &matrix).unwrap_err().starts_with("At least two samples"));
    }

    #[test]
    fn order_file_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("order.txt");
        let order = vec!["b".to_string(), "a".to_string()];
        write_order(Some(&path), &order).unwrap();
        let src = InputSource::from_str(path.to_str().unwrap()).unwrap();
        assert_eq!(read_order(&src).unwrap(), order);
    }
}
