use super::newick::Tree;

impl Tree {
    pub fn is_tip(&self, node: usize) -> bool {
        self.nodes[node].children.is_empty()
    }

    /// Tips in file order
    pub fn tips(&self) -> Vec<usize> {
        self.preorder()
            .into_iter()
            .filter(|&node| self.is_tip(node))
            .collect()
    }

    pub fn preorder(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(node) = stack.pop() {
            order.push(node);
            stack.extend(self.nodes[node].children.iter().rev());
        }
        order
    }

    fn depths_with(&self, length_of: impl Fn(usize) -> f64) -> Vec<f64> {
        let mut depths = vec![0.0; self.nodes.len()];
        depths[self.root] = self.nodes[self.root].branch_length.unwrap_or(0.0);
        for node in self.preorder() {
            for &child in &self.nodes[node].children {
                depths[child] = depths[node] + length_of(child);
            }
        }
        depths
    }

    /// Distance of every node from the root. Trees without branch lengths use unit lengths.
    pub fn depths(&self) -> Vec<f64> {
        let depths = self.depths_with(|node| self.nodes[node].branch_length.unwrap_or(0.0));
        if depths.iter().copied().fold(0.0, f64::max) > 0.0 {
            depths
        } else {
            self.depths_with(|_| 1.0)
        }
    }

    /// Vertical position of every node: first tip 1, last tip n, internal nodes halfway
    /// between their first and last child
    pub fn tip_rows(&self) -> Vec<f64> {
        let mut rows = vec![0.0; self.nodes.len()];
        for (row, tip) in self.tips().into_iter().enumerate() {
            rows[tip] = (row + 1) as f64;
        }
        for node in self.preorder().into_iter().rev() {
            let children = &self.nodes[node].children;
            if let (Some(&first), Some(&last)) = (children.first(), children.last()) {
                rows[node] = (rows[first] + rows[last]) / 2.0;
            }
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use crate::tree::parse_newick;

    #[test]
    fn depths_accumulate_branch_lengths() {
        let tree = parse_newick("((A:1,B:2):3,C:0.5);").unwrap();
        let depths = tree.depths();
        let by_name = |name: &str| {
            let i = tree
                .nodes
                .iter()
                .position(|n| n.name.as_deref() == Some(name))
                .unwrap();
            depths[i]
        };
        assert_eq!(by_name("A"), 4.0);
        assert_eq!(by_name("B"), 5.0);
        assert_eq!(by_name("C"), 0.5);
        assert_eq!(depths[tree.root], 0.0);
    }

    #[test]
    fn missing_lengths_fall_back_to_unit() {
        let tree = parse_newick("((A,B),C);").unwrap();
        let depths = tree.depths();
        assert_eq!(depths, vec![0.0, 1.0, 2.0, 2.0, 1.0]);
    }

    #[test]
    fn rows_put_first_tip_at_one() {
        let tree = parse_newick("((A,B),(C,(D,E)));").unwrap();
        let rows = tree.tip_rows();
        let tips = tree.tips();
        let tip_rows: Vec<f64> = tips.iter().map(|&t| rows[t]).collect();
        assert_eq!(tip_rows, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        // (D,E) sits at 4.5, (C,(D,E)) between 3 and 4.5
        assert_eq!(rows[tree.nodes[tree.root].children[1]], 3.75);
        assert_eq!(rows[tree.root], (1.5 + 3.75) / 2.0);
    }
}
