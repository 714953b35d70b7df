use super::Strand;
use crate::utils::{split_fields, Result, TableLines};
use std::io::BufRead;

/// A gene drawn on a neighbourhood track, positions relative to the track start
#[derive(Debug, Clone, PartialEq)]
pub struct GeneFeature {
    pub start: u64,
    pub end: u64,
    pub strand: Strand,
    pub label: String,
    pub color: Option<String>,
}

/// Genes grouped by track, tracks in order of first appearance
pub type GeneTracks = Vec<(String, Vec<GeneFeature>)>;

/// Reads `track start end strand label [color]` rows. A first row whose start column is not
/// a number is taken as a header.
pub fn read_gene_table<R: BufRead>(reader: R) -> Result<GeneTracks> {
    let mut tracks: GeneTracks = Vec::new();
    let mut first = true;
    for line in TableLines::new(reader) {
        let (line_number, line) = line?;
        let fields = split_fields(&line);
        let is_first = std::mem::replace(&mut first, false);
        if is_first && fields.get(1).is_some_and(|f| f.parse::<u64>().is_err()) {
            continue;
        }
        if fields.len() < 5 {
            return Err(format!(
                "Line {}: expected track, start, end, strand and label columns, found {}",
                line_number,
                fields.len()
            ));
        }
        let position = |i: usize, what: &str| {
            fields[i].parse::<u64>().map_err(|_| {
                format!("Line {}: invalid {} '{}'", line_number, what, fields[i])
            })
        };
        let start = position(1, "start")?;
        let end = position(2, "end")?;
        if start >= end {
            return Err(format!(
                "Line {}: gene start {} must be below its end {}",
                line_number, start, end
            ));
        }
        let strand = fields[3]
            .parse::<Strand>()
            .map_err(|e| format!("Line {}: {}", line_number, e))?;
        let gene = GeneFeature {
            start,
            end,
            strand,
            label: fields[4].to_string(),
            color: fields.get(5).filter(|c| !c.is_empty()).map(|c| c.to_string()),
        };

        let track = fields[0];
        match tracks.iter_mut().find(|(name, _)| name == track) {
            Some((_, genes)) => genes.push(gene),
            None => tracks.push((track.to_string(), vec![gene])),
        }
    }
    if tracks.is_empty() {
        return Err("Gene table has no rows".to_string());
    }
    Ok(tracks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_rows_by_track_in_file_order() {
        let table = "track\tstart\tend\tstrand\tlabel\tcolor\n\
                     isolate2\t1\t900\t+\tblaKPC\t#ff0000\n\
                     isolate1\t100\t400\t-\ttnpA\t\n\
                     isolate2\t1000\t1800\t-1\tISKpn6\n";
        let tracks = read_gene_table(table.as_bytes()).unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].0, "isolate2");
        assert_eq!(tracks[0].1.len(), 2);
        assert_eq!(tracks[0].1[0].color.as_deref(), Some("#ff0000"));
        assert_eq!(tracks[0].1[1].strand, Strand::Reverse);
        assert_eq!(tracks[1].1[0].color, None);
    }

    #[test]
    fn rejects_reversed_intervals_and_short_rows() {
        assert!(read_gene_table("t 10 5 + g\n".as_bytes()).is_err());
        assert!(read_gene_table("t 1 5 +\n".as_bytes()).is_err());
        assert!(read_gene_table("t 1 5 x g\n".as_bytes()).is_err());
        assert!(read_gene_table("".as_bytes()).is_err());
    }
}
