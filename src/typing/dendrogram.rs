use super::linkage::Merge;
use crate::utils::Result;
use std::fmt;

/// Colour class of a dendrogram link: inside a flat cluster, or above the colour threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LinkColor {
    Above,
    Cluster(usize),
}

impl fmt::Display for LinkColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkColor::Above => write!(f, "C0"),
            LinkColor::Cluster(k) => write!(f, "C{}", k),
        }
    }
}

/// Link coordinates of a dendrogram. Leaf `k` of the traversal sits at `x = 5 + 10k`, heights
/// are merge distances. Links are listed in post-order.
#[derive(Debug, Clone, PartialEq)]
pub struct Dendrogram {
    pub icoord: Vec<[f64; 4]>,
    pub dcoord: Vec<[f64; 4]>,
    pub colors: Vec<LinkColor>,
    pub leaves: Vec<usize>,
    pub labels: Vec<String>,
}

impl Dendrogram {
    pub fn num_leaves(&self) -> usize {
        self.leaves.len()
    }

    pub fn leaf_x(k: usize) -> f64 {
        5.0 + 10.0 * k as f64
    }

    pub fn max_height(&self) -> f64 {
        self.dcoord
            .iter()
            .flat_map(|d| d.iter().copied())
            .fold(0.0, f64::max)
    }

    pub fn max_x(&self) -> f64 {
        self.icoord
            .iter()
            .flat_map(|d| d.iter().copied())
            .fold(0.0, f64::max)
    }

    /// Number of distinct flat clusters below the colour threshold
    pub fn num_clusters(&self) -> usize {
        self.colors
            .iter()
            .filter_map(|c| match c {
                LinkColor::Cluster(k) => Some(*k),
                LinkColor::Above => None,
            })
            .max()
            .unwrap_or(0)
    }
}

struct Walker<'a> {
    merges: &'a [Merge],
    n: usize,
    threshold: f64,
    clusters: usize,
    tree: Dendrogram,
}

enum Step {
    Enter(usize, Option<usize>),
    Join(usize, Option<usize>),
}

impl Walker<'_> {
    /// Left-first depth-first walk from `root`, with an explicit stack so that chained merges
    /// over many samples do not exhaust the call stack
    fn walk(&mut self, root: usize) {
        let mut steps = vec![Step::Enter(root, None)];
        // (x, height) of every finished subtree, left siblings below right ones
        let mut done: Vec<(f64, f64)> = Vec::new();
        while let Some(step) = steps.pop() {
            match step {
                Step::Enter(node, _) if node < self.n => {
                    let x = Dendrogram::leaf_x(self.tree.leaves.len());
                    self.tree.leaves.push(node);
                    done.push((x, 0.0));
                }
                Step::Enter(node, cluster) => {
                    let merge = self.merges[node - self.n];
                    let cluster = match cluster {
                        Some(k) => Some(k),
                        None if merge.distance < self.threshold => {
                            self.clusters += 1;
                            Some(self.clusters)
                        }
                        None => None,
                    };
                    steps.push(Step::Join(node, cluster));
                    steps.push(Step::Enter(merge.right, cluster));
                    steps.push(Step::Enter(merge.left, cluster));
                }
                Step::Join(node, cluster) => {
                    let height = self.merges[node - self.n].distance;
                    // Both children finish before their join step is popped
                    let (xr, hr) = done.pop().unwrap_or_default();
                    let (xl, hl) = done.pop().unwrap_or_default();
                    self.tree.icoord.push([xl, xl, xr, xr]);
                    self.tree.dcoord.push([hl, height, height, hr]);
                    self.tree
                        .colors
                        .push(cluster.map_or(LinkColor::Above, LinkColor::Cluster));
                    done.push(((xl + xr) / 2.0, height));
                }
            }
        }
    }
}

/// Lays out the merge tree. Links below `color_threshold` (default 0.7 times the largest merge
/// distance) are coloured by flat cluster, numbered left to right from 1.
pub fn dendrogram(merges: &[Merge], labels: &[String], color_threshold: Option<f64>) -> Result<Dendrogram> {
    let n = merges.len() + 1;
    if labels.len() != n {
        return Err(format!(
            "Dendrogram of {} leaves got {} labels",
            n,
            labels.len()
        ));
    }
    if merges.is_empty() {
        return Err("Dendrogram needs at least one merge".to_string());
    }
    let max_distance = merges.iter().map(|m| m.distance).fold(0.0, f64::max);
    let threshold = color_threshold.unwrap_or(0.7 * max_distance);

    let mut walker = Walker {
        merges,
        n,
        threshold,
        clusters: 0,
        tree: Dendrogram {
            icoord: Vec::with_capacity(n - 1),
            dcoord: Vec::with_capacity(n - 1),
            colors: Vec::with_capacity(n - 1),
            leaves: Vec::with_capacity(n),
            labels: Vec::with_capacity(n),
        },
    };
    walker.walk(2 * n - 2);
    let mut tree = walker.tree;
    tree.labels = tree.leaves.iter().map(|&leaf| labels[leaf].clone()).collect();
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merges() -> Vec<Merge> {
        // ((0,1),(2,3)) at heights 2, 4, 5
        vec![
            Merge { left: 0, right: 1, distance: 2.0, size: 2 },
            Merge { left: 2, right: 3, distance: 4.0, size: 2 },
            Merge { left: 4, right: 5, distance: 5.0, size: 4 },
        ]
    }

    fn labels() -> Vec<String> {
        ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn coordinates_follow_traversal() {
        let tree = dendrogram(&merges(), &labels(), None).unwrap();
        assert_eq!(tree.leaves, vec![0, 1, 2, 3]);
        assert_eq!(tree.labels, vec!["a", "b", "c", "d"]);
        assert_eq!(
            tree.icoord,
            vec![
                [5.0, 5.0, 15.0, 15.0],
                [25.0, 25.0, 35.0, 35.0],
                [10.0, 10.0, 30.0, 30.0]
            ]
        );
        assert_eq!(
            tree.dcoord,
            vec![[0.0, 2.0, 2.0, 0.0], [0.0, 4.0, 4.0, 0.0], [2.0, 5.0, 5.0, 4.0]]
        );
        assert_eq!(tree.max_height(), 5.0);
        assert_eq!(tree.max_x(), 35.0);
    }

    #[test]
    fn default_threshold_colours_clusters_left_to_right() {
        // Threshold 3.5: only the first link is below it
        let tree = dendrogram(&merges(), &labels(), None).unwrap();
        assert_eq!(
            tree.colors,
            vec![LinkColor::Cluster(1), LinkColor::Above, LinkColor::Above]
        );
        let tree = dendrogram(&merges(), &labels(), Some(4.5)).unwrap();
        assert_eq!(
            tree.colors,
            vec![LinkColor::Cluster(1), LinkColor::Cluster(2), LinkColor::Above]
        );
        assert_eq!(tree.num_clusters(), 2);
        assert_eq!(tree.colors[1].to_string(), "C2");
    }

    #[test]
    fn long_chain_of_merges() {
        // Each sample joins the cluster of all previous ones
        let n = 50_000;
        let mut chain = vec![Merge { left: 0, right: 1, distance: 1.0, size: 2 }];
        for k in 2..n {
            chain.push(Merge { left: n + k - 2, right: k, distance: k as f64, size: k + 1 });
        }
        let labels: Vec<String> = (0..n).map(|k| format!("s{}", k)).collect();
        let tree = dendrogram(&chain, &labels, Some(0.0)).unwrap();
        assert_eq!(tree.leaves, (0..n).collect::<Vec<_>>());
        assert_eq!(tree.icoord.len(), n - 1);
        assert_eq!(tree.dcoord[n - 2], [(n - 2) as f64, (n - 1) as f64, (n - 1) as f64, 0.0]);
        assert_eq!(tree.max_x(), Dendrogram::leaf_x(n - 1));
    }

    #[test]
    fn zero_threshold_is_all_above() {
        let tree = dendrogram(&merges(), &labels(), Some(0.0)).unwrap();
        assert!(tree.colors.iter().all(|c| *c == LinkColor::Above));
        assert_eq!(tree.num_clusters(), 0);
    }

    #[test]
    fn left_child_is_drawn_first() {
        // Leaf 3 joins the (0,1) cluster, then 2 joins last
        let merges = vec![
            Merge { left: 0, right: 1, distance: 1.0, size: 2 },
            Merge { left: 3, right: 4, distance: 2.0, size: 3 },
            Merge { left: 2, right: 5, distance: 3.0, size: 4 },
        ];
        let tree = dendrogram(&merges, &labels(), None).unwrap();
        assert_eq!(tree.leaves, vec![2, 3, 0, 1]);
        assert_eq!(tree.labels, vec!["c", "d", "a", "b"]);
    }

    #[test]
    fn label_count_must_match() {
        assert!(dendrogram(&merges(), &labels()[..3], None).is_err());
    }
}
