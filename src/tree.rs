// Copyright (c) 2018 Fabian Schuiki

//! Parse trees produced by the parsers.

use std::fmt;
use symbol::EPSILON;

/// A parse tree.
///
/// Inner nodes are labelled with the name of the nonterminal they were
/// derived from. Leaves hold an input token, or `ε` where a rule matched the
/// empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tree {
    label: String,
    children: Option<Vec<Tree>>,
    epsilon: bool,
}

impl Tree {
    /// Create a leaf.
    pub fn leaf<S: Into<String>>(label: S) -> Tree {
        Tree {
            label: label.into(),
            children: None,
            epsilon: false,
        }
    }

    /// Create a leaf for the empty string.
    ///
    /// It prints as `ε` but covers no token, unlike a leaf for a token that
    /// happens to be spelled `ε`.
    pub fn epsilon() -> Tree {
        Tree {
            label: EPSILON.to_string(),
            children: None,
            epsilon: true,
        }
    }

    /// Create an inner node.
    pub fn node<S: Into<String>>(label: S, children: Vec<Tree>) -> Tree {
        Tree {
            label: label.into(),
            children: Some(children),
            epsilon: false,
        }
    }

    /// The label of this node.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The children of this node, or `None` for a leaf.
    pub fn children(&self) -> Option<&[Tree]> {
        self.children.as_ref().map(|c| c.as_slice())
    }

    /// Whether this is a leaf.
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Whether this leaf stands for the empty string.
    pub fn is_epsilon(&self) -> bool {
        self.epsilon
    }

    /// The tokens covered by this tree, left to right.
    ///
    /// Leaves standing for the empty string are skipped, so for a complete
    /// parse this yields the input again.
    pub fn tokens(&self) -> Vec<&str> {
        let mut into = Vec::new();
        self.collect_tokens(&mut into);
        into
    }

    fn collect_tokens<'a>(&'a self, into: &mut Vec<&'a str>) {
        match self.children {
            Some(ref children) => for child in children {
                child.collect_tokens(into);
            },
            None if self.epsilon => (),
            None => into.push(&self.label),
        }
    }

    fn write_indented(&self, f: &mut fmt::Formatter, depth: usize) -> fmt::Result {
        for _ in 0..depth {
            write!(f, "  ")?;
        }
        match self.children {
            Some(ref children) => {
                write!(f, "<{}>\n", self.label)?;
                for child in children {
                    child.write_indented(f, depth + 1)?;
                }
                Ok(())
            }
            None => write!(f, "{}\n", self.label),
        }
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Tree {
        Tree::node(
            "S",
            vec![
                Tree::node("L", vec![Tree::epsilon()]),
                Tree::node("D", vec![Tree::leaf("d")]),
            ],
        )
    }

    #[test]
    fn accessors() {
        let tree = sample();
        assert_eq!(tree.label(), "S");
        assert!(!tree.is_leaf());
        assert_eq!(tree.children().map(|c| c.len()), Some(2));
        assert!(Tree::leaf("x").children().is_none());
    }

    #[test]
    fn tokens_skip_epsilon() {
        assert_eq!(sample().tokens(), vec!["d"]);
    }

    #[test]
    fn token_spelled_epsilon() {
        let tree = Tree::node("S", vec![Tree::leaf(EPSILON), Tree::epsilon()]);
        assert_eq!(tree.tokens(), vec![EPSILON]);
        assert!(!Tree::leaf(EPSILON).is_epsilon());
        assert!(Tree::epsilon().is_epsilon());
        assert!(Tree::leaf(EPSILON) != Tree::epsilon());
    }

    #[test]
    fn printing() {
        assert_eq!(
            format!("{}", sample()),
            "<S>\n  <L>\n    ε\n  <D>\n    d\n"
        );
    }
}
