use crate::utils::{split_fields, Result, TableLines};
use std::{
    collections::{HashMap, HashSet},
    io::BufRead,
};

/// Allele calls that chewBBACA-style callers emit instead of an allele number
const MISSING_TOKENS: [&str; 15] = [
    "", "-", "NA", "N/A", "NAN", "LNF", "PLNF", "PLOT3", "PLOT5", "LOTSC", "NIPH", "NIPHEM", "ALM",
    "ASM", "EXC",
];

/// Sample-by-locus allele calls. Each locus column interns its allele strings so that equal
/// alleles share an id; `None` marks a missing call.
#[derive(Debug, Clone, PartialEq)]
pub struct AlleleProfiles {
    pub samples: Vec<String>,
    pub loci: Vec<String>,
    pub calls: Vec<Vec<Option<u32>>>,
}

impl AlleleProfiles {
    pub fn num_samples(&self) -> usize {
        self.samples.len()
    }

    pub fn num_loci(&self) -> usize {
        self.loci.len()
    }

    /// Number of present calls for each sample
    pub fn called_loci(&self) -> Vec<usize> {
        self.calls
            .iter()
            .map(|row| row.iter().filter(|c| c.is_some()).count())
            .collect()
    }
}

struct MissingSet {
    extra: HashSet<String>,
}

impl MissingSet {
    fn new(extra: &[String]) -> Self {
        Self {
            extra: extra.iter().map(|t| t.trim().to_ascii_uppercase()).collect(),
        }
    }

    fn is_missing(&self, call: &str) -> bool {
        let upper = call.to_ascii_uppercase();
        MISSING_TOKENS.contains(&upper.as_str()) || self.extra.contains(&upper)
    }
}

/// Reads an allele profile table: a header row whose first cell names the sample column,
/// then one row per sample
pub fn read_profiles<R: BufRead>(reader: R, extra_missing: &[String]) -> Result<AlleleProfiles> {
    let missing = MissingSet::new(extra_missing);
    let mut lines = TableLines::new(reader).keep_comments();

    let (_, header) = lines
        .next()
        .ok_or_else(|| "Allele profile table is empty".to_string())??;
    let header_fields = split_fields(&header);
    if header_fields.len() < 2 {
        return Err("Allele profile header must name a sample column and at least one locus".to_string());
    }
    let loci: Vec<String> = header_fields[1..].iter().map(|s| s.to_string()).collect();

    let mut interners: Vec<HashMap<String, u32>> = vec![HashMap::new(); loci.len()];
    let mut samples = Vec::new();
    let mut calls = Vec::new();
    let mut seen = HashSet::new();

    for line in lines {
        let (line_number, line) = line?;
        if line.starts_with('#') {
            continue;
        }
        let fields = split_fields(&line);
        if fields.len() != loci.len() + 1 {
            return Err(format!(
                "Line {}: expected {} fields (sample + {} loci), found {}",
                line_number,
                loci.len() + 1,
                loci.len(),
                fields.len()
            ));
        }
        let sample = fields[0].to_string();
        if !seen.insert(sample.clone()) {
            return Err(format!("Line {}: duplicate sample name {}", line_number, sample));
        }

        let row = fields[1..]
            .iter()
            .zip(interners.iter_mut())
            .map(|(call, interner)| {
                let allele = call.strip_prefix("INF-").unwrap_or(call);
                if missing.is_missing(allele) {
                    return None;
                }
                let next_id = interner.len() as u32;
                Some(*interner.entry(allele.to_string()).or_insert(next_id))
            })
            .collect();
        samples.push(sample);
        calls.push(row);
    }

    if samples.is_empty() {
        return Err("Allele profile table has no samples".to_string());
    }
    log::debug!("Read {} samples x {} loci", samples.len(), loci.len());
    Ok(AlleleProfiles {
        samples,
        loci,
        calls,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "FILE\tL1\tL2\tL3\n\
                         S1\t1\t2\tLNF\n\
                         S2\tINF-1\t3\t4\n\
                         S3\t-\t2\t4\n";

    #[test]
    fn interns_alleles_per_locus() {
        let profiles = read_profiles(TABLE.as_bytes(), &[]).unwrap();
        assert_eq!(profiles.samples, vec!["S1", "S2", "S3"]);
        assert_eq!(profiles.loci, vec!["L1", "L2", "L3"]);
        assert_eq!(profiles.calls[0][0], profiles.calls[1][0]);
        assert_eq!(profiles.calls[0][1], profiles.calls[2][1]);
        assert_ne!(profiles.calls[0][1], profiles.calls[1][1]);
        assert_eq!(profiles.calls[0][2], None);
        assert_eq!(profiles.calls[2][0], None);
        assert_eq!(profiles.called_loci(), vec![2, 3, 2]);
    }

    #[test]
    fn missing_tokens_are_case_insensitive_and_extensible() {
        let table = "id\tA\tB\nx\tniph\t0\ny\t5\t0\n";
        let profiles = read_profiles(table.as_bytes(), &["0".to_string()]).unwrap();
        assert_eq!(profiles.calls[0], vec![None, None]);
        assert_eq!(profiles.calls[1][1], None);
        assert!(profiles.calls[1][0].is_some());
    }

    #[test]
    fn header_may_start_with_hash() {
        let table = "#Sample\tA\nx\t1\n";
        let profiles = read_profiles(table.as_bytes(), &[]).unwrap();
        assert_eq!(profiles.samples, vec!["x"]);
    }

    #[test]
    fn ragged_and_duplicate_rows_are_errors() {
        let ragged = "id\tA\tB\nx\t1\n";
        assert!(read_profiles(ragged.as_bytes(), &[])
            .unwrap_err()
            .starts_with("Line 2: expected 3 fields"));
        let dup = "id\tA\nx\t1\nx\t2\n";
        assert!(read_profiles(dup.as_bytes(), &[])
            .unwrap_err()
            .contains("duplicate sample name x"));
        assert!(read_profiles("".as_bytes(), &[]).is_err());
        assert!(read_profiles("id\tA\n".as_bytes(), &[]).is_err());
    }
}
