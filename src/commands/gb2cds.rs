use crate::cli::Gb2cdsArgs;
use crate::genome::{self, GenbankRecord};
use crate::utils::{create_output_writer, Result};
use std::io::Write;

fn write_cds_table<W: Write>(writer: &mut W, records: &[GenbankRecord]) -> Result<()> {
    let write_err = |e: std::io::Error| format!("Failed to write CDS table: {}", e);
    writeln!(writer, "record\tstart\tend\tstrand\tname").map_err(write_err)?;
    for record in records {
        for cds in &record.cds {
            writeln!(
                writer,
                "{}\t{}\t{}\t{}\t{}",
                record.id, cds.start, cds.end, cds.strand, cds.name
            )
            .map_err(write_err)?;
        }
    }
    writer.flush().map_err(write_err)
}

pub fn gb2cds(args: Gb2cdsArgs) -> Result<()> {
    let mut records = genome::gb2cds(&args.genbank_src)?;
    if let Some(wanted) = &args.record {
        records.retain(|r| &r.id == wanted);
        if records.is_empty() {
            return Err(format!("Record {} not found in {}", wanted, args.genbank_src));
        }
    }
    log::info!(
        "Exporting {} CDS from {} record(s)",
        records.iter().map(|r| r.cds.len()).sum::<usize>(),
        records.len()
    );
    let mut writer = create_output_writer(args.output.as_deref())?;
    write_cds_table(&mut writer, &records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::{read_cds_table, Cds, Strand};

    #[test]
    fn table_reads_back_per_record() {
        let records = vec![
            GenbankRecord {
                id: "NC_1.1".to_string(),
                length: 100,
                cds: vec![Cds {
                    start: 3,
                    end: 50,
                    strand: Strand::Reverse,
                    name: "dnaA".to_string(),
                    color: None,
                }],
            },
            GenbankRecord {
                id: "pX".to_string(),
                length: 10,
                cds: vec![Cds {
                    start: 1,
                    end: 9,
                    strand: Strand::Forward,
                    name: "unknown".to_string(),
                    color: None,
                }],
            },
        ];
        let mut out = Vec::new();
        write_cds_table(&mut out, &records).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("record\tstart\tend\tstrand\tname\nNC_1.1\t3\t50\t-1\tdnaA\n"));

        let cds = read_cds_table(text.as_bytes(), Some("NC_1.1")).unwrap();
        assert_eq!(cds, records[0].cds);
    }
}
