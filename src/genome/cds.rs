use super::genbank::{gb2cds, GenbankRecord};
use crate::utils::{open_text_reader, split_fields, InputSource, Result, TableLines};
use std::{fmt, io::BufRead, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strand {
    Forward,
    Reverse,
}

impl Strand {
    pub fn flip(self) -> Self {
        match self {
            Strand::Forward => Strand::Reverse,
            Strand::Reverse => Strand::Forward,
        }
    }

    pub fn sign(self) -> f64 {
        match self {
            Strand::Forward => 1.0,
            Strand::Reverse => -1.0,
        }
    }
}

impl FromStr for Strand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "1" | "+1" | "+" => Ok(Strand::Forward),
            "-1" | "-" => Ok(Strand::Reverse),
            other => Err(format!("Invalid strand '{}': expected 1, +, -1 or -", other)),
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strand::Forward => write!(f, "1"),
            Strand::Reverse => write!(f, "-1"),
        }
    }
}

/// A coding sequence, 1-based with an inclusive end
#[derive(Debug, Clone, PartialEq)]
pub struct Cds {
    pub start: u64,
    pub end: u64,
    pub strand: Strand,
    pub name: String,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Copy)]
struct Columns {
    record: Option<usize>,
    start: usize,
    end: usize,
    strand: usize,
    name: Option<usize>,
    color: Option<usize>,
}

impl Columns {
    const POSITIONAL: Columns = Columns {
        record: None,
        start: 0,
        end: 1,
        strand: 2,
        name: Some(3),
        color: Some(4),
    };

    fn from_header(fields: &[&str]) -> Result<Self> {
        let find = |names: &[&str]| {
            fields
                .iter()
                .position(|f| names.contains(&f.trim_start_matches('#').to_ascii_lowercase().as_str()))
        };
        let require = |names: &[&str]| {
            find(names).ok_or_else(|| format!("CDS table header is missing a '{}' column", names[0]))
        };
        Ok(Columns {
            record: find(&["record", "contig", "seqid", "chrom"]),
            start: require(&["start"])?,
            end: require(&["end", "stop"])?,
            strand: require(&["strand"])?,
            name: find(&["name", "gene", "label"]),
            color: find(&["color", "colour"]),
        })
    }
}

/// Reads a CDS table (`start end strand name [color]`, or any column order when a header
/// names them). With a `record` column, rows of other records are dropped when `record` is given.
pub fn read_cds_table<R: BufRead>(reader: R, record: Option<&str>) -> Result<Vec<Cds>> {
    let mut columns = None;
    let mut cds = Vec::new();

    for line in TableLines::new(reader).keep_comments() {
        let (line_number, line) = line?;
        let fields = split_fields(&line);
        if line.starts_with('#') && columns.is_some() {
            continue;
        }
        let layout = match columns {
            Some(layout) => layout,
            None => {
                let first = fields.first().map(|f| f.trim_start_matches('#')).unwrap_or("");
                if first.parse::<u64>().is_err() {
                    match Columns::from_header(&fields) {
                        Ok(layout) => columns = Some(layout),
                        Err(_) if line.starts_with('#') => {}
                        Err(e) => return Err(e),
                    }
                    continue;
                }
                columns = Some(Columns::POSITIONAL);
                Columns::POSITIONAL
            }
        };

        let field = |i: usize| fields.get(i).copied().filter(|f| !f.is_empty());
        let required = |i: usize, what: &str| {
            field(i).ok_or_else(|| format!("Line {}: missing {} column", line_number, what))
        };

        if let (Some(wanted), Some(col)) = (record, layout.record) {
            if field(col) != Some(wanted) {
                continue;
            }
        }

        let parse_pos = |text: &str, what: &str| {
            text.parse::<u64>()
                .map_err(|_| format!("Line {}: invalid {} position '{}'", line_number, what, text))
        };
        let start = parse_pos(required(layout.start, "start")?, "start")?;
        let end = parse_pos(required(layout.end, "end")?, "end")?;
        if start == 0 || start > end {
            return Err(format!(
                "Line {}: invalid CDS interval {}-{} (1-based, start <= end)",
                line_number, start, end
            ));
        }
        let strand = required(layout.strand, "strand")?
            .parse::<Strand>()
            .map_err(|e| format!("Line {}: {}", line_number, e))?;
        let name = layout
            .name
            .and_then(field)
            .unwrap_or("unknown")
            .to_string();
        let color = layout.color.and_then(field).map(str::to_string);

        cds.push(Cds {
            start,
            end,
            strand,
            name,
            color,
        });
    }
    Ok(cds)
}

fn looks_like_genbank(src: &InputSource) -> Result<bool> {
    let reader = open_text_reader(src)?;
    match TableLines::new(reader).keep_comments().next() {
        Some(line) => Ok(line?.1.starts_with("LOCUS")),
        None => Ok(false),
    }
}

/// Loads CDS from either a GenBank file or a CDS table, detected from the first line.
/// For GenBank input the named record is used, otherwise the first one.
pub fn load_cds(src: &InputSource, record: Option<&str>) -> Result<Vec<Cds>> {
    if looks_like_genbank(src)? {
        let records = gb2cds(src)?;
        let chosen = select_record(records, record)?;
        log::info!("Using {} CDS from GenBank record {}", chosen.cds.len(), chosen.id);
        return Ok(chosen.cds);
    }
    let reader = open_text_reader(src)?;
    let cds = read_cds_table(reader, record).map_err(|e| src.format_error("Failed to read CDS table", e))?;
    log::info!("Loaded {} CDS from {}", cds.len(), src);
    Ok(cds)
}

fn select_record(mut records: Vec<GenbankRecord>, wanted: Option<&str>) -> Result<GenbankRecord> {
    let available = || {
        records
            .iter()
            .map(|r| r.id.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    match wanted {
        Some(id) => {
            let index = records
                .iter()
                .position(|r| r.id == id || r.id.split('.').next() == Some(id))
                .ok_or_else(|| format!("Record {} not found, available: {}", id, available()))?;
            Ok(records.swap_remove(index))
        }
        None => {
            if records.len() > 1 {
                log::warn!("No record selected, using the first of: {}", available());
            }
            records
                .into_iter()
                .next()
                .ok_or_else(|| "No GenBank records found".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strand_parsing() {
        assert_eq!("1".parse::<Strand>(), Ok(Strand::Forward));
        assert_eq!("+".parse::<Strand>(), Ok(Strand::Forward));
        assert_eq!("-1".parse::<Strand>(), Ok(Strand::Reverse));
        assert_eq!("-".parse::<Strand>(), Ok(Strand::Reverse));
        assert!("0".parse::<Strand>().is_err());
        assert_eq!(Strand::Reverse.to_string(), "-1");
    }

    #[test]
    fn positional_table_without_header() {
        let table = "10\t50\t1\tgene1\n60\t100\t-1\tgene2\t#ff0000\n";
        let cds = read_cds_table(table.as_bytes(), None).unwrap();
        assert_eq!(cds.len(), 2);
        assert_eq!(cds[0].name, "gene1");
        assert_eq!(cds[0].color, None);
        assert_eq!(cds[1].strand, Strand::Reverse);
        assert_eq!(cds[1].color.as_deref(), Some("#ff0000"));
    }

    #[test]
    fn header_driven_table_with_record_filter() {
        let table = "record\tstart\tend\tstrand\tname\nA\t1\t90\t1\tx\nB\t5\t20\t-1\ty\nA\t100\t200\t-\tz\n";
        let cds = read_cds_table(table.as_bytes(), Some("A")).unwrap();
        assert_eq!(
            cds.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            vec!["x", "z"]
        );
        let all = read_cds_table(table.as_bytes(), None).unwrap();
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn reordered_header_columns() {
        let table = "#name strand start end\nabc + 3 9\n";
        let cds = read_cds_table(table.as_bytes(), None).unwrap();
        assert_eq!((cds[0].start, cds[0].end, cds[0].name.as_str()), (3, 9, "abc"));
    }

    #[test]
    fn leading_comment_before_positional_rows() {
        let table = "# exported CDS\n1\t9\t+\ta\n";
        assert_eq!(read_cds_table(table.as_bytes(), None).unwrap().len(), 1);
    }

    #[test]
    fn invalid_rows_are_reported() {
        let err = read_cds_table("50\t10\t1\tg\n".as_bytes(), None).unwrap_err();
        assert!(err.starts_with("Line 1: invalid CDS interval"));
        let err = read_cds_table("1\t10\tx\tg\n".as_bytes(), None).unwrap_err();
        assert!(err.contains("Invalid strand"));
        let err = read_cds_table("start\tend\tname\n".as_bytes(), None).unwrap_err();
        assert!(err.contains("'strand'"));
    }

    #[test]
    fn load_cds_detects_format() {
        let dir = tempfile::tempdir().unwrap();
        let gb = dir.path().join("seq.gb");
        std::fs::write(
            &gb,
            "LOCUS       R1 100 bp DNA\nFEATURES             Location/Qualifiers\n     CDS             5..40\n                     /gene=\"a\"\n//\nLOCUS       R2 100 bp DNA\nFEATURES             Location/Qualifiers\n     CDS             complement(1..30)\n//\n",
        )
        .unwrap();
        let src = InputSource::from_str(gb.to_str().unwrap()).unwrap();
        assert_eq!(load_cds(&src, None).unwrap()[0].name, "a");
        let second = load_cds(&src, Some("R2")).unwrap();
        assert_eq!(second[0].strand, Strand::Reverse);
        assert!(load_cds(&src, Some("R3")).unwrap_err().contains("available: R1, R2"));

        let table = dir.path().join("cds.tsv");
        std::fs::write(&table, "1\t30\t+\tb\n").unwrap();
        let src = InputSource::from_str(table.to_str().unwrap()).unwrap();
        assert_eq!(load_cds(&src, None).unwrap()[0].name, "b");
    }
}
