use crate::utils::{open_text_reader, InputSource, Result};
use std::io::Read;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    pub name: Option<String>,
    pub branch_length: Option<f64>,
    pub support: Option<f64>,
    pub children: Vec<usize>,
    pub parent: Option<usize>,
}

/// A rooted tree stored as an arena of nodes
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    pub nodes: Vec<Node>,
    pub root: usize,
}

struct Parser<'a> {
    text: &'a [u8],
    pos: usize,
    nodes: Vec<Node>,
}

impl Parser<'_> {
    fn error(&self, message: &str) -> String {
        format!("Invalid Newick at offset {}: {}", self.pos, message)
    }

    fn skip_blank(&mut self) -> Result<()> {
        loop {
            match self.text.get(self.pos) {
                Some(c) if c.is_ascii_whitespace() => self.pos += 1,
                Some(b'[') => {
                    let close = self.text[self.pos..]
                        .iter()
                        .position(|&c| c == b']')
                        .ok_or_else(|| self.error("unterminated [comment]"))?;
                    self.pos += close + 1;
                }
                _ => return Ok(()),
            }
        }
    }

    fn peek(&mut self) -> Result<Option<u8>> {
        self.skip_blank()?;
        Ok(self.text.get(self.pos).copied())
    }

    fn open_node(&mut self, parent: Option<usize>) -> usize {
        self.nodes.push(Node {
            parent,
            ..Default::default()
        });
        self.nodes.len() - 1
    }

    /// Reads the whole tree with an explicit stack of nodes whose child lists are open, so
    /// nesting depth is bounded by memory rather than by the call stack
    fn tree(&mut self) -> Result<usize> {
        let root = self.open_node(None);
        let mut open: Vec<usize> = Vec::new();
        let mut current = root;
        loop {
            if self.peek()? == Some(b'(') {
                self.pos += 1;
                open.push(current);
                current = self.open_node(Some(current));
                continue;
            }
            self.finish_node(current)?;
            loop {
                let Some(&parent) = open.last() else {
                    return Ok(root);
                };
                self.nodes[parent].children.push(current);
                match self.peek()? {
                    Some(b',') => {
                        self.pos += 1;
                        current = self.open_node(Some(parent));
                        break;
                    }
                    Some(b')') => {
                        self.pos += 1;
                        open.pop();
                        current = parent;
                        self.finish_node(current)?;
                    }
                    _ => return Err(self.error("expected ',' or ')'")),
                }
            }
        }
    }

    /// Label and branch length after a tip name or a closing parenthesis
    fn finish_node(&mut self, index: usize) -> Result<()> {
        let label = self.label()?;
        let is_internal = !self.nodes[index].children.is_empty();
        if let Some(label) = label {
            match label.parse::<f64>() {
                Ok(support) if is_internal => self.nodes[index].support = Some(support),
                _ => self.nodes[index].name = Some(label),
            }
        }

        if self.peek()? == Some(b':') {
            self.pos += 1;
            self.skip_blank()?;
            let start = self.pos;
            while let Some(c) = self.text.get(self.pos) {
                if matches!(c, b',' | b')' | b';' | b'[') || c.is_ascii_whitespace() {
                    break;
                }
                self.pos += 1;
            }
            let raw = String::from_utf8_lossy(&self.text[start..self.pos]);
            let length = raw
                .parse::<f64>()
                .map_err(|_| self.error(&format!("bad branch length '{}'", raw)))?;
            self.nodes[index].branch_length = Some(length);
        }
        Ok(())
    }

    fn label(&mut self) -> Result<Option<String>> {
        match self.peek()? {
            Some(b'\'') => {
                self.pos += 1;
                let mut label = Vec::new();
                loop {
                    match self.text.get(self.pos) {
                        Some(b'\'') if self.text.get(self.pos + 1) == Some(&b'\'') => {
                            label.push(b'\'');
                            self.pos += 2;
                        }
                        Some(b'\'') => {
                            self.pos += 1;
                            break;
                        }
                        Some(&c) => {
                            label.push(c);
                            self.pos += 1;
                        }
                        None => return Err(self.error("unterminated quoted label")),
                    }
                }
                Ok(Some(String::from_utf8_lossy(&label).into_owned()))
            }
            _ => {
                let start = self.pos;
                while let Some(c) = self.text.get(self.pos) {
                    if matches!(c, b'(' | b')' | b',' | b':' | b';' | b'[' | b']')
                        || c.is_ascii_whitespace()
                    {
                        break;
                    }
                    self.pos += 1;
                }
                Ok((self.pos > start)
                    .then(|| String::from_utf8_lossy(&self.text[start..self.pos]).into_owned()))
            }
        }
    }
}

/// Parses one Newick tree. Numeric labels on internal nodes are read as support values.
pub fn parse_newick(text: &str) -> Result<Tree> {
    let mut parser = Parser {
        text: text.as_bytes(),
        pos: 0,
        nodes: Vec::new(),
    };
    if parser.peek()?.is_none() {
        return Err("Newick input is empty".to_string());
    }
    let root = parser.tree()?;
    if parser.peek()? != Some(b';') {
        return Err(parser.error("expected ';' at the end of the tree"));
    }
    parser.pos += 1;
    if parser.peek()?.is_some() {
        log::warn!("Ignoring text after the first Newick tree");
    }
    Ok(Tree {
        nodes: parser.nodes,
        root,
    })
}

pub fn read_newick(src: &InputSource) -> Result<Tree> {
    let mut text = String::new();
    open_text_reader(src)?
        .read_to_string(&mut text)
        .map_err(|e| src.format_error("Failed to read", e))?;
    parse_newick(&text).map_err(|e| src.format_error("Failed to parse", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_lengths_and_support() {
        let tree = parse_newick("((A:0.1,B:0.2)95:0.3,'C d':0.4)root;").unwrap();
        assert_eq!(tree.nodes.len(), 5);
        let root = &tree.nodes[tree.root];
        assert_eq!(root.name.as_deref(), Some("root"));
        assert_eq!(root.children.len(), 2);
        let inner = &tree.nodes[root.children[0]];
        assert_eq!(inner.support, Some(95.0));
        assert_eq!(inner.name, None);
        assert_eq!(inner.branch_length, Some(0.3));
        let quoted = &tree.nodes[root.children[1]];
        assert_eq!(quoted.name.as_deref(), Some("C d"));
        assert_eq!(quoted.parent, Some(tree.root));
    }

    #[test]
    fn comments_whitespace_and_escaped_quotes() {
        let tree = parse_newick(" ( A [&rate=1] : 1 ,\n 'it''s' : 2 ) ; ").unwrap();
        let names: Vec<_> = tree.nodes.iter().filter_map(|n| n.name.clone()).collect();
        assert_eq!(names, vec!["A", "it's"]);
        assert_eq!(tree.nodes[2].branch_length, Some(2.0));
    }

    #[test]
    fn numeric_tip_names_stay_names() {
        let tree = parse_newick("(1,2);").unwrap();
        assert_eq!(tree.nodes[1].name.as_deref(), Some("1"));
        assert_eq!(tree.nodes[1].support, None);
    }

    #[test]
    fn deep_caterpillar_parses() {
        let depth = 50_000;
        let mut text = String::new();
        for k in 0..depth {
            text.push_str(&format!("(t{},", k));
        }
        text.push_str("last");
        text.push_str(&")".repeat(depth));
        text.push(';');
        let tree = parse_newick(&text).unwrap();
        assert_eq!(tree.nodes.len(), 2 * depth + 1);
        assert_eq!(tree.tips().len(), depth + 1);
        let deepest = tree.nodes.iter().position(|n| n.name.as_deref() == Some("last")).unwrap();
        assert_eq!(tree.depths()[deepest], depth as f64);
    }

    #[test]
    fn malformed_trees_are_errors() {
        assert!(parse_newick("(A,B)").unwrap_err().contains("expected ';'"));
        assert!(parse_newick("(A,B;").is_err());
        assert!(parse_newick("(A:x,B);").unwrap_err().contains("bad branch length"));
        assert!(parse_newick("('A,B);").is_err());
        assert!(parse_newick("   ").is_err());
    }
}
