use super::cds::{Cds, Strand};
use crate::utils::{open_text_reader, InputSource, Result};
use std::io::BufRead;

const FEATURE_KEY_COLUMN: usize = 5;
const QUALIFIER_COLUMN: usize = 21;

#[derive(Debug, Clone, PartialEq)]
pub struct GenbankRecord {
    pub id: String,
    pub length: u64,
    pub cds: Vec<Cds>,
}

/// One contiguous stretch of a feature location, 1-based and end-inclusive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationSpan {
    pub start: u64,
    pub end: u64,
    pub strand: Strand,
}

#[derive(Default)]
struct RecordBuilder {
    locus: String,
    accession: Option<String>,
    version: Option<String>,
    length: u64,
    cds: Vec<Cds>,
}

impl RecordBuilder {
    fn build(self) -> GenbankRecord {
        let id = self.version.or(self.accession).unwrap_or(self.locus);
        GenbankRecord {
            id,
            length: self.length,
            cds: self.cds,
        }
    }
}

#[derive(Default)]
struct FeatureBuilder {
    key: String,
    location: String,
    qualifiers: Vec<(String, String)>,
    open_quote: bool,
    line_number: usize,
}

impl FeatureBuilder {
    fn push_qualifier_line(&mut self, text: &str) {
        if self.open_quote {
            if let Some((_, value)) = self.qualifiers.last_mut() {
                value.push(' ');
                value.push_str(text);
                if text.ends_with('"') {
                    self.open_quote = false;
                }
            }
            return;
        }
        if let Some(body) = text.strip_prefix('/') {
            let (name, value) = body.split_once('=').unwrap_or((body, ""));
            self.open_quote = value.starts_with('"') && (value.len() == 1 || !value.ends_with('"'));
            self.qualifiers.push((name.to_string(), value.to_string()));
        } else if self.qualifiers.is_empty() {
            self.location.push_str(text);
        }
    }

    fn qualifier(&self, name: &str) -> Option<String> {
        self.qualifiers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.trim_matches('"').to_string())
    }

    fn into_cds(self) -> Result<Option<Cds>> {
        if self.key != "CDS" {
            return Ok(None);
        }
        let spans = parse_location(&self.location)
            .map_err(|e| format!("Line {}: {}", self.line_number, e))?;
        if spans.is_empty() {
            log::debug!(
                "Skipping CDS at line {} with remote location {}",
                self.line_number,
                self.location
            );
            return Ok(None);
        }
        let start = spans.iter().map(|s| s.start).min().unwrap_or(1);
        let end = spans.iter().map(|s| s.end).max().unwrap_or(start);
        let strand = if spans.iter().all(|s| s.strand == Strand::Reverse) {
            Strand::Reverse
        } else {
            Strand::Forward
        };
        let name = self.qualifier("gene").unwrap_or_else(|| "unknown".to_string());
        Ok(Some(Cds {
            start,
            end,
            strand,
            name,
            color: None,
        }))
    }
}

/// Reads every record of a GenBank flat file, keeping the CDS features
pub fn parse_genbank<R: BufRead>(reader: R) -> Result<Vec<GenbankRecord>> {
    let mut records = Vec::new();
    let mut record: Option<RecordBuilder> = None;
    let mut feature: Option<FeatureBuilder> = None;
    let mut in_features = false;

    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line.map_err(|e| format!("Error reading line {}: {}", line_number, e))?;
        let line = line.trim_end();

        if line.starts_with("LOCUS") {
            if record.is_some() {
                return Err(format!(
                    "Line {}: LOCUS found before the end (//) of the previous record",
                    line_number
                ));
            }
            record = Some(parse_locus_line(line, line_number)?);
            continue;
        }
        let Some(current) = record.as_mut() else {
            if line.trim().is_empty() {
                continue;
            }
            return Err(format!("Line {}: expected a LOCUS line", line_number));
        };

        if line == "//" {
            finish_feature(feature.take(), current)?;
            in_features = false;
            if let Some(done) = record.take() {
                records.push(done.build());
            }
            continue;
        }

        if !line.starts_with(' ') && !line.is_empty() {
            finish_feature(feature.take(), current)?;
            in_features = line.starts_with("FEATURES");
            let mut words = line.split_whitespace();
            match words.next() {
                Some("ACCESSION") => current.accession = words.next().map(str::to_string),
                Some("VERSION") => {
                    current.version = words
                        .next()
                        .filter(|v| v.contains('.'))
                        .map(str::to_string)
                }
                _ => {}
            }
            continue;
        }

        if !in_features {
            continue;
        }

        let key_field = line.get(FEATURE_KEY_COLUMN..QUALIFIER_COLUMN.min(line.len())).unwrap_or("");
        if line.len() > FEATURE_KEY_COLUMN && !key_field.trim().is_empty() && !line.starts_with(&" ".repeat(QUALIFIER_COLUMN)) {
            finish_feature(feature.take(), current)?;
            let mut words = line.split_whitespace();
            let key = words.next().unwrap_or_default().to_string();
            let location: String = words.collect();
            feature = Some(FeatureBuilder {
                key,
                location,
                line_number,
                ..Default::default()
            });
        } else if let Some(open) = feature.as_mut() {
            open.push_qualifier_line(line.trim());
        }
    }

    if record.is_some() {
        return Err("Unexpected end of file: missing record terminator (//)".to_string());
    }
    Ok(records)
}

fn finish_feature(feature: Option<FeatureBuilder>, record: &mut RecordBuilder) -> Result<()> {
    if let Some(feature) = feature {
        if let Some(cds) = feature.into_cds()? {
            record.cds.push(cds);
        }
    }
    Ok(())
}

fn parse_locus_line(line: &str, line_number: usize) -> Result<RecordBuilder> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let locus = words
        .get(1)
        .ok_or_else(|| format!("Line {}: LOCUS line without a name", line_number))?;
    let length = words
        .iter()
        .position(|w| *w == "bp" || *w == "aa")
        .and_then(|i| i.checked_sub(1))
        .and_then(|i| words[i].parse::<u64>().ok())
        .unwrap_or(0);
    Ok(RecordBuilder {
        locus: locus.to_string(),
        length,
        ..Default::default()
    })
}

/// Parses a feature location such as `complement(join(<1..20,30..>45))`.
/// Parts that reference other records (`ACC.1:1..10`) are dropped.
pub fn parse_location(location: &str) -> Result<Vec<LocationSpan>> {
    let compact: String = location.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Err("Empty feature location".to_string());
    }
    parse_location_expr(&compact)
        .map_err(|e| format!("Invalid feature location '{}': {}", location, e))
}

fn parse_location_expr(expr: &str) -> Result<Vec<LocationSpan>> {
    for operator in ["complement", "join", "order"] {
        if let Some(rest) = expr.strip_prefix(operator) {
            let inner = rest
                .strip_prefix('(')
                .and_then(|r| r.strip_suffix(')'))
                .ok_or_else(|| format!("unbalanced parentheses after {}", operator))?;
            if operator == "complement" {
                let mut spans = parse_location_expr(inner)?;
                spans.reverse();
                for span in spans.iter_mut() {
                    span.strand = span.strand.flip();
                }
                return Ok(spans);
            }
            let mut spans = Vec::new();
            for part in split_top_level(inner)? {
                spans.extend(parse_location_expr(part)?);
            }
            return Ok(spans);
        }
    }

    if expr.contains(':') {
        return Ok(Vec::new());
    }
    let (start, end) = match expr.split_once("..") {
        Some((start, end)) => (parse_position(start)?, parse_position(end)?),
        None => match expr.split_once('^') {
            Some((start, end)) => (parse_position(start)?, parse_position(end)?),
            None => {
                let position = parse_position(expr)?;
                (position, position)
            }
        },
    };
    if start > end {
        return Err(format!("start {} is after end {}", start, end));
    }
    Ok(vec![LocationSpan {
        start,
        end,
        strand: Strand::Forward,
    }])
}

fn parse_position(text: &str) -> Result<u64> {
    let digits = text.trim_start_matches('<').trim_start_matches('>');
    digits
        .parse::<u64>()
        .map_err(|_| format!("bad position '{}'", text))
}

fn split_top_level(list: &str) -> Result<Vec<&str>> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut last = 0;
    for (i, c) in list.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&list[last..i]);
                last = i + 1;
            }
            _ => {}
        }
        if depth < 0 {
            return Err("unbalanced parentheses".to_string());
        }
    }
    if depth != 0 {
        return Err("unbalanced parentheses".to_string());
    }
    parts.push(&list[last..]);
    Ok(parts)
}

/// True when the file holds at least one readable GenBank record
pub fn is_genbank(src: &InputSource) -> bool {
    match open_text_reader(src).and_then(parse_genbank) {
        Ok(records) if !records.is_empty() => true,
        Ok(_) => {
            log::debug!("{} holds no GenBank records", src);
            false
        }
        Err(e) => {
            log::debug!("{} is not a GenBank file: {}", src, e);
            false
        }
    }
}

/// CDS features of every record, in file order
pub fn gb2cds(src: &InputSource) -> Result<Vec<GenbankRecord>> {
    let reader = open_text_reader(src)?;
    let records = parse_genbank(reader).map_err(|e| src.format_error("Failed to parse GenBank", e))?;
    if records.is_empty() {
        return Err(format!("No GenBank records found in {}", src));
    }
    log::debug!(
        "Parsed {} record(s) with {} CDS from {}",
        records.len(),
        records.iter().map(|r| r.cds.len()).sum::<usize>(),
        src
    );
    Ok(records)
}
