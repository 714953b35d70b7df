use super::distance::DistanceMatrix;
use crate::utils::Result;
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Linkage {
    Single,
    Complete,
    Average,
    Weighted,
    Ward,
}

impl FromStr for Linkage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "single" => Ok(Linkage::Single),
            "complete" => Ok(Linkage::Complete),
            "average" | "upgma" => Ok(Linkage::Average),
            "weighted" | "wpgma" => Ok(Linkage::Weighted),
            "ward" => Ok(Linkage::Ward),
            _ => Err(format!(
                "Invalid linkage method: {}. Expected single, complete, average, weighted or ward",
                s
            )),
        }
    }
}

impl fmt::Display for Linkage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Linkage::Single => "single",
            Linkage::Complete => "complete",
            Linkage::Average => "average",
            Linkage::Weighted => "weighted",
            Linkage::Ward => "ward",
        };
        write!(f, "{}", name)
    }
}

impl Linkage {
    /// Lance-Williams update: distance from cluster `i` to the union of `x` and `y`
    fn update(self, d_xi: f64, d_yi: f64, d_xy: f64, size_x: f64, size_y: f64, size_i: f64) -> f64 {
        match self {
            Linkage::Single => d_xi.min(d_yi),
            Linkage::Complete => d_xi.max(d_yi),
            Linkage::Average => (size_x * d_xi + size_y * d_yi) / (size_x + size_y),
            Linkage::Weighted => 0.5 * (d_xi + d_yi),
            Linkage::Ward => {
                let total = size_x + size_y + size_i;
                (((size_i + size_x) * d_xi * d_xi + (size_i + size_y) * d_yi * d_yi
                    - size_i * d_xy * d_xy)
                    / total)
                    .max(0.0)
                    .sqrt()
            }
        }
    }
}

/// One agglomeration step. Leaves are clusters `0..n`; the k-th merge creates cluster `n + k`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Merge {
    pub left: usize,
    pub right: usize,
    pub distance: f64,
    pub size: usize,
}

struct UnionFind {
    parent: Vec<usize>,
    size: Vec<usize>,
    next_label: usize,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..2 * n - 1).collect(),
            size: (0..2 * n - 1).map(|i| usize::from(i < n)).collect(),
            next_label: n,
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        while self.parent[x] != root {
            let next = self.parent[x];
            self.parent[x] = root;
            x = next;
        }
        root
    }

    fn merge(&mut self, x: usize, y: usize) -> usize {
        let label = self.next_label;
        self.parent[x] = label;
        self.parent[y] = label;
        self.size[label] = self.size[x] + self.size[y];
        self.next_label += 1;
        self.size[label]
    }
}

/// Hierarchical clustering with the nearest-neighbour chain algorithm. Merges come back
/// sorted by distance (ties keep discovery order) and relabelled so that `left < right`.
pub fn linkage(matrix: &DistanceMatrix, method: Linkage) -> Result<Vec<Merge>> {
    let n = matrix.len();
    if n < 2 {
        return Err(format!(
            "At least 2 samples are needed for clustering, found {}",
            n
        ));
    }
    if let Some(bad) = matrix.condensed().into_iter().find(|d| !d.is_finite() || *d < 0.0) {
        return Err(format!(
            "Distances must be finite and non-negative, found {}",
            bad
        ));
    }

    let mut dist = matrix.values.clone();
    let mut size = vec![1usize; n];
    let mut chain: Vec<usize> = Vec::with_capacity(n);
    let mut raw: Vec<(usize, usize, f64)> = Vec::with_capacity(n - 1);

    for _ in 0..n - 1 {
        if chain.is_empty() {
            let first = size.iter().position(|&s| s > 0).unwrap_or(0);
            chain.push(first);
        }

        let (x, y, current_min) = loop {
            let x = chain[chain.len() - 1];
            let (mut y, mut current_min) = match chain.len() {
                1 => (x, f64::INFINITY),
                len => (chain[len - 2], dist[x * n + chain[len - 2]]),
            };
            for i in 0..n {
                if size[i] == 0 || i == x {
                    continue;
                }
                if dist[x * n + i] < current_min {
                    current_min = dist[x * n + i];
                    y = i;
                }
            }
            if chain.len() > 1 && y == chain[chain.len() - 2] {
                break (x, y, current_min);
            }
            chain.push(y);
        };
        chain.truncate(chain.len() - 2);

        let (x, y) = if x < y { (x, y) } else { (y, x) };
        raw.push((x, y, current_min));

        let (size_x, size_y) = (size[x] as f64, size[y] as f64);
        size[x] = 0;
        size[y] += size_x as usize;
        for i in 0..n {
            if size[i] == 0 || i == y {
                continue;
            }
            let updated = method.update(
                dist[x * n + i],
                dist[y * n + i],
                current_min,
                size_x,
                size_y,
                size[i] as f64,
            );
            dist[y * n + i] = updated;
            dist[i * n + y] = updated;
        }
    }

    raw.sort_by(|a, b| a.2.total_cmp(&b.2));

    let mut clusters = UnionFind::new(n);
    let merges = raw
        .into_iter()
        .map(|(x, y, distance)| {
            let (rx, ry) = (clusters.find(x), clusters.find(y));
            let (left, right) = if rx < ry { (rx, ry) } else { (ry, rx) };
            let size = clusters.merge(rx, ry);
            Merge {
                left,
                right,
                distance,
                size,
            }
        })
        .collect();
    Ok(merges)
}
