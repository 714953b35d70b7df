use crate::utils::{InputSource, Result};
use rust_htslib::bgzf;
use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::Path,
};

/// Plain, gzip and bgzip text all go through the BGZF reader
pub type TextReader = BufReader<bgzf::Reader>;
const BUFFER_CAPACITY: usize = 128 * 1024;

pub fn open_text_reader(src: &InputSource) -> Result<TextReader> {
    src.preflight_checks()?;
    let inner = bgzf::Reader::from_path(src.path())
        .map_err(|e| src.format_error("Failed to open", e))?;
    Ok(BufReader::with_capacity(BUFFER_CAPACITY, inner))
}

/// Writer for text outputs; `None` or `-` means standard output
pub fn create_output_writer(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(p) if p != Path::new("-") => {
            let file = File::create(p)
                .map_err(|e| format!("Failed to create {}: {}", p.display(), e))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        _ => Ok(Box::new(BufWriter::new(io::stdout()))),
    }
}

/// Writes one line per item and flushes
pub fn write_lines<I, S>(path: Option<&Path>, lines: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut writer = create_output_writer(path)?;
    for line in lines {
        writeln!(writer, "{}", line.as_ref()).map_err(|e| format!("Failed to write output: {}", e))?;
    }
    writer
        .flush()
        .map_err(|e| format!("Failed to write output: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, Read};
    use std::str::FromStr;
    use tempfile::tempdir;

    #[test]
    fn reads_plain_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plain.tsv");
        std::fs::write(&path, "a\tb\n1\t2\n").unwrap();
        let src = InputSource::from_str(path.to_str().unwrap()).unwrap();
        let lines: Vec<String> = open_text_reader(&src)
            .unwrap()
            .lines()
            .map(|l| l.unwrap())
            .collect();
        assert_eq!(lines, vec!["a\tb", "1\t2"]);
    }

    #[test]
    fn output_writer_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        {
            let mut writer = create_output_writer(Some(&path)).unwrap();
            writeln!(writer, "hello").unwrap();
        }
        let mut content = String::new();
        File::open(&path)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "hello\n");
    }

    #[test]
    fn write_lines_one_per_item() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("order.txt");
        write_lines(Some(&path), ["S3", "S1", "S2"]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "S3\nS1\nS2\n");
    }

    #[test]
    fn output_writer_reports_missing_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.txt");
        let err = create_output_writer(Some(&path)).err().unwrap();
        assert!(err.starts_with("Failed to create"));
    }
}
