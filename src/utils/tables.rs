use super::Result;
use std::io::BufRead;

pub fn is_comment_or_blank(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Tab-separated when the line has a tab, whitespace-separated otherwise.
/// Empty tab-separated fields are kept since they often encode missing values.
pub fn split_fields(line: &str) -> Vec<&str> {
    if line.contains('\t') {
        line.split('\t').map(|f| f.trim()).collect()
    } else {
        line.split_whitespace().collect()
    }
}

/// Iterates over the non-blank lines of a table together with their 1-based line numbers
pub struct TableLines<R: BufRead> {
    reader: R,
    line_number: usize,
    skip_comments: bool,
}

impl<R: BufRead> TableLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            skip_comments: true,
        }
    }

    /// Keep `#` lines, for formats whose header row starts with `#`
    pub fn keep_comments(mut self) -> Self {
        self.skip_comments = false;
        self
    }
}

impl<R: BufRead> Iterator for TableLines<R> {
    type Item = Result<(usize, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let mut line = String::new();
            self.line_number += 1;
            match self.reader.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(format!("Error reading line {}: {}", self.line_number, e))),
            }
            let line = line.trim_end_matches(['\n', '\r']);
            if line.trim().is_empty() || (self.skip_comments && line.trim_start().starts_with('#')) {
                continue;
            }
            return Some(Ok((self.line_number, line.to_string())));
        }
    }
}

pub fn read_lines<R: BufRead>(reader: R) -> TableLines<R> {
    TableLines::new(reader)
}
