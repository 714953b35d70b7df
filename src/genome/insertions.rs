use crate::utils::{split_fields, Result, TableLines};
use std::io::BufRead;

/// Transposon insertion site and the number of reads supporting it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Insertion {
    pub pos: u64,
    pub count: f64,
}

enum WigStep {
    Variable,
    Fixed { next: u64, step: u64 },
}

fn wig_setting<'a>(fields: &[&'a str], key: &str) -> Option<&'a str> {
    fields
        .iter()
        .find_map(|f| f.strip_prefix(key).and_then(|rest| rest.strip_prefix('=')))
}

/// Reads insertion counts from `position count` or `contig position count` rows, or from a wiggle
/// file. When `contig` is given, rows on other contigs are skipped.
pub fn read_insertions<R: BufRead>(reader: R, contig: Option<&str>) -> Result<Vec<Insertion>> {
    let mut insertions = Vec::new();
    let mut wig: Option<WigStep> = None;
    let mut wig_contig: Option<String> = None;
    let mut seen_data = false;

    for line in TableLines::new(reader) {
        let (line_number, line) = line?;
        let fields = split_fields(&line);
        let first = fields.first().copied().unwrap_or("");

        if first == "track" || first == "browser" {
            continue;
        }
        if first == "variableStep" || first == "fixedStep" {
            wig_contig = wig_setting(&fields, "chrom").map(str::to_string);
            wig = if first == "variableStep" {
                Some(WigStep::Variable)
            } else {
                let number = |key: &str, default: Option<u64>| -> Result<u64> {
                    match wig_setting(&fields, key) {
                        Some(value) => value.parse().map_err(|_| {
                            format!("Line {}: invalid {}={}", line_number, key, value)
                        }),
                        None => default
                            .ok_or_else(|| format!("Line {}: fixedStep without {}", line_number, key)),
                    }
                };
                Some(WigStep::Fixed {
                    next: number("start", None)?,
                    step: number("step", Some(1))?,
                })
            };
            continue;
        }

        let wanted = |name: Option<&str>| match (contig, name) {
            (Some(c), Some(n)) => c == n,
            _ => true,
        };
        let parse_count = |text: &str| {
            text.parse::<f64>()
                .ok()
                .filter(|c| c.is_finite())
                .ok_or_else(|| format!("Line {}: invalid count '{}'", line_number, text))
        };
        let parse_pos = |text: &str| {
            text.parse::<u64>()
                .map_err(|_| format!("Line {}: invalid position '{}'", line_number, text))
        };

        match wig.as_mut() {
            Some(WigStep::Fixed { next, step }) => {
                let count = parse_count(first)?;
                let pos = *next;
                *next += *step;
                if wanted(wig_contig.as_deref()) {
                    insertions.push(Insertion { pos, count });
                }
            }
            Some(WigStep::Variable) => {
                if fields.len() < 2 {
                    return Err(format!("Line {}: expected 'position count'", line_number));
                }
                let insertion = Insertion {
                    pos: parse_pos(fields[0])?,
                    count: parse_count(fields[1])?,
                };
                if wanted(wig_contig.as_deref()) {
                    insertions.push(insertion);
                }
            }
            None => {
                let (name, pos, count) = match fields[..] {
                    [pos, count] => (None, pos, count),
                    [name, pos, count, ..] => (Some(name), pos, count),
                    _ => {
                        return Err(format!(
                            "Line {}: expected 'position count' or 'contig position count', found {} field(s)",
                            line_number,
                            fields.len()
                        ))
                    }
                };
                if !seen_data && pos.parse::<u64>().is_err() {
                    log::debug!("Skipping insertion table header: {}", line);
                    seen_data = true;
                    continue;
                }
                seen_data = true;
                if wanted(name) {
                    insertions.push(Insertion {
                        pos: parse_pos(pos)?,
                        count: parse_count(count)?,
                    });
                }
            }
        }
    }
    Ok(insertions)
}
