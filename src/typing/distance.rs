use super::profile::AlleleProfiles;
use crate::utils::{split_fields, Result, TableLines};
use rayon::{
    iter::{IntoParallelIterator, ParallelIterator},
    ThreadPoolBuilder,
};
use std::io::{BufRead, Write};

/// A rectangular table of values with row and column labels
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledMatrix {
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    pub values: Vec<f64>, // Row-major
}

impl LabeledMatrix {
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.col_labels.len() + col]
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.row_labels.len(), self.col_labels.len())
    }

    /// Rows in the given label order. Labels absent from the matrix become rows of NaN.
    pub fn reindex_rows(&self, order: &[String]) -> (Self, Vec<String>) {
        let ncols = self.col_labels.len();
        let mut values = Vec::with_capacity(order.len() * ncols);
        let mut unknown = Vec::new();
        for label in order {
            match self.row_labels.iter().position(|l| l == label) {
                Some(row) => values.extend_from_slice(&self.values[row * ncols..(row + 1) * ncols]),
                None => {
                    unknown.push(label.clone());
                    values.extend(std::iter::repeat(f64::NAN).take(ncols));
                }
            }
        }
        let reindexed = LabeledMatrix {
            row_labels: order.to_vec(),
            col_labels: self.col_labels.clone(),
            values,
        };
        (reindexed, unknown)
    }
}

/// Reads a labelled table: a header of column labels (with or without a corner cell) followed
/// by `label value...` rows. `NA`, `NaN` and empty cells read as NaN.
pub fn read_labeled_matrix<R: BufRead>(reader: R) -> Result<LabeledMatrix> {
    let mut rows: Vec<(usize, String)> = Vec::new();
    for line in TableLines::new(reader).keep_comments() {
        rows.push(line?);
    }
    let (header, body) = rows
        .split_first()
        .ok_or_else(|| "Matrix table is empty".to_string())?;
    let header_fields = split_fields(&header.1);
    let width = body
        .first()
        .map(|(_, line)| split_fields(line).len())
        .ok_or_else(|| "Matrix table has no data rows".to_string())?;

    let col_labels: Vec<String> = if header_fields.len() + 1 == width {
        header_fields.iter().map(|s| s.to_string()).collect()
    } else if header_fields.len() == width {
        header_fields[1..].iter().map(|s| s.to_string()).collect()
    } else {
        return Err(format!(
            "Matrix header has {} fields but the first row has {}",
            header_fields.len(),
            width
        ));
    };

    let mut row_labels = Vec::with_capacity(body.len());
    let mut values = Vec::with_capacity(body.len() * col_labels.len());
    for (line_number, line) in body {
        let fields = split_fields(line);
        if fields.len() != col_labels.len() + 1 {
            return Err(format!(
                "Line {}: expected {} fields, found {}",
                line_number,
                col_labels.len() + 1,
                fields.len()
            ));
        }
        row_labels.push(fields[0].to_string());
        for cell in &fields[1..] {
            values.push(parse_cell(cell).map_err(|e| format!("Line {}: {}", line_number, e))?);
        }
    }
    Ok(LabeledMatrix {
        row_labels,
        col_labels,
        values,
    })
}

fn parse_cell(cell: &str) -> Result<f64> {
    match cell.to_ascii_uppercase().as_str() {
        "" | "NA" | "NAN" | "N/A" | "-" => Ok(f64::NAN),
        _ => cell
            .parse::<f64>()
            .map_err(|_| format!("invalid numeric value '{}'", cell)),
    }
}

/// Square, symmetric matrix of pairwise distances between labelled samples
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    pub labels: Vec<String>,
    pub values: Vec<f64>, // Row-major n x n
}

impl DistanceMatrix {
    pub fn new(labels: Vec<String>, values: Vec<f64>) -> Result<Self> {
        let n = labels.len();
        if values.len() != n * n {
            return Err(format!(
                "Distance matrix for {} labels needs {} values, found {}",
                n,
                n * n,
                values.len()
            ));
        }
        Ok(Self { labels, values })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.len() + j]
    }

    /// Upper triangle without the diagonal, row by row
    pub fn condensed(&self) -> Vec<f64> {
        let n = self.len();
        let mut condensed = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for i in 0..n {
            for j in i + 1..n {
                condensed.push(self.get(i, j));
            }
        }
        condensed
    }

    /// Permutes rows and columns together; `order[k]` is the index placed at position `k`
    pub fn reorder(&self, order: &[usize]) -> Result<Self> {
        let n = self.len();
        let mut seen = vec![false; n];
        for &index in order {
            if index >= n || std::mem::replace(&mut seen[index], true) {
                return Err(format!("Invalid reordering of a {}x{} distance matrix", n, n));
            }
        }
        if order.len() != n {
            return Err(format!("Reordering lists {} of {} samples", order.len(), n));
        }
        let labels = order.iter().map(|&i| self.labels[i].clone()).collect();
        let values = order
            .iter()
            .flat_map(|&i| order.iter().map(move |&j| (i, j)))
            .map(|(i, j)| self.get(i, j))
            .collect();
        Ok(Self { labels, values })
    }

    pub fn to_labeled(&self) -> LabeledMatrix {
        LabeledMatrix {
            row_labels: self.labels.clone(),
            col_labels: self.labels.clone(),
            values: self.values.clone(),
        }
    }

    pub fn write_tsv<W: Write>(&self, writer: &mut W) -> Result<()> {
        let write_err = |e: std::io::Error| format!("Failed to write distance matrix: {}", e);
        writeln!(writer, "\t{}", self.labels.join("\t")).map_err(write_err)?;
        for (i, label) in self.labels.iter().enumerate() {
            let row: Vec<String> = (0..self.len()).map(|j| self.get(i, j).to_string()).collect();
            writeln!(writer, "{}\t{}", label, row.join("\t")).map_err(write_err)?;
        }
        Ok(())
    }
}

impl TryFrom<LabeledMatrix> for DistanceMatrix {
    type Error = String;

    fn try_from(matrix: LabeledMatrix) -> Result<Self> {
        if matrix.row_labels != matrix.col_labels {
            return Err("Distance matrix row labels must match the column labels in the same order".to_string());
        }
        let n = matrix.row_labels.len();
        for i in 0..n {
            for j in i + 1..n {
                let (a, b) = (matrix.get(i, j), matrix.get(j, i));
                if a.is_nan() || b.is_nan() || (a - b).abs() > 1e-9 * a.abs().max(1.0) {
                    return Err(format!(
                        "Distance matrix is not symmetric at {} / {}: {} vs {}",
                        matrix.row_labels[i], matrix.row_labels[j], a, b
                    ));
                }
            }
        }
        DistanceMatrix::new(matrix.row_labels, matrix.values)
    }
}

pub fn read_distance_matrix<R: BufRead>(reader: R) -> Result<DistanceMatrix> {
    DistanceMatrix::try_from(read_labeled_matrix(reader)?)
}

fn count_differences(a: &[Option<u32>], b: &[Option<u32>]) -> usize {
    a.iter()
        .zip(b)
        .filter(|(x, y)| matches!((x, y), (Some(x), Some(y)) if x != y))
        .count()
}

/// Pairwise number of loci at which two samples carry different alleles.
/// Loci missing in either sample do not count.
pub fn allele_differences(profiles: &AlleleProfiles, threads: usize) -> Result<DistanceMatrix> {
    let n = profiles.num_samples();
    log::debug!(
        "Computing allele differences for {} samples on {} thread(s)",
        n,
        threads
    );
    let pool = ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("cvmplot-{}", i))
        .build()
        .map_err(|e| format!("Failed to initialize thread pool: {}", e))?;

    let rows: Vec<Vec<f64>> = pool.install(|| {
        (0..n)
            .into_par_iter()
            .map(|i| {
                (0..n)
                    .map(|j| count_differences(&profiles.calls[i], &profiles.calls[j]) as f64)
                    .collect()
            })
            .collect()
    });
    DistanceMatrix::new(profiles.samples.clone(), rows.concat())
}
