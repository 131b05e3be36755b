// Copyright (c) 2018 Fabian Schuiki

//! Unger's parsing method.
//!
//! For every rule that may produce a span of the input, all ways of
//! partitioning the span among the items of the rule are tried. Terminals
//! must match their part literally, and nonterminals are parsed recursively
//! on theirs. This works on any grammar without prior normalization beyond
//! splitting choices.

use std::collections::{HashMap, HashSet};

use grammar::{Grammar, Rule};
use symbol::{NonTerminal, Symbol};
use tree::Tree;

/// An Unger parser for a grammar.
#[derive(Debug, Clone)]
pub struct Unger {
    grammar: Grammar,
    epsilon: bool,
}

/// A span of tokens `start..end`.
type Span = (usize, usize);

impl Unger {
    /// Create a parser that assigns at least one token to every item.
    ///
    /// This is sufficient for grammars without epsilon rules.
    pub fn new(grammar: &Grammar) -> Unger {
        Unger {
            grammar: grammar.split_choices(),
            epsilon: false,
        }
    }

    /// Create a parser that also tries empty spans for every item.
    ///
    /// Required for grammars where nonterminals may derive the empty string.
    pub fn with_epsilon(grammar: &Grammar) -> Unger {
        Unger {
            grammar: grammar.split_choices(),
            epsilon: true,
        }
    }

    /// The grammar this parser uses, with choices split into rules.
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Parse a token sequence, returning every parse tree.
    ///
    /// An empty result means the input was rejected.
    pub fn parse<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<Tree> {
        let mut ctx = Context::new(&self.grammar, tokens, self.epsilon);
        let mut trees = Vec::new();
        for index in ctx.start_rules() {
            trees.extend(ctx.fit_to(index, (0, tokens.len())));
        }
        debug!(
            "unger{}: {} trees for {} tokens",
            if self.epsilon { " (epsilon)" } else { "" },
            trees.len(),
            tokens.len()
        );
        trees
    }
}

/// The state of a single parse.
struct Context<'a> {
    grammar: &'a Grammar,
    rules: Vec<&'a Rule>,
    by_lhs: HashMap<&'a NonTerminal, Vec<usize>>,
    tokens: Vec<&'a str>,
    epsilon: bool,
    /// The rules currently being fit to a span.
    active: HashSet<(usize, Span)>,
}

impl<'a> Context<'a> {
    fn new<S: AsRef<str>>(grammar: &'a Grammar, tokens: &'a [S], epsilon: bool) -> Context<'a> {
        let rules: Vec<&Rule> = grammar.rules().collect();
        let mut by_lhs = HashMap::new();
        for (index, &rule) in rules.iter().enumerate() {
            by_lhs.entry(rule.lhs()).or_insert_with(Vec::new).push(index);
        }
        Context {
            grammar: grammar,
            rules: rules,
            by_lhs: by_lhs,
            tokens: tokens.iter().map(|t| t.as_ref()).collect(),
            epsilon: epsilon,
            active: HashSet::new(),
        }
    }

    fn start_rules(&self) -> Vec<usize> {
        self.grammar
            .start_symbol()
            .and_then(|start| self.by_lhs.get(start))
            .cloned()
            .unwrap_or_default()
    }

    /// Find all ways in which a rule produces a span.
    ///
    /// Fitting a rule to a span while the same rule is already being fit to
    /// that span can only repeat the enclosing derivation, so it yields
    /// nothing.
    fn fit_to(&mut self, index: usize, span: Span) -> Vec<Tree> {
        if !self.active.insert((index, span)) {
            trace!("cycle on rule {} at {:?}", index, span);
            return Vec::new();
        }
        let rule = self.rules[index];
        let matchers = rule.rhs().items();
        let mut trees = Vec::new();
        for partition in self.partition(matchers.len(), span) {
            if !self.matches(matchers, &partition) {
                continue;
            }
            for children in self.combine_children(matchers, &partition) {
                trees.push(Tree::node(rule.lhs().name(), children));
            }
        }
        self.active.remove(&(index, span));
        trees
    }

    /// Enumerate the ways to split a span into `count` consecutive parts.
    fn partition(&self, count: usize, span: Span) -> Vec<Vec<Span>> {
        let (start, end) = span;
        match count {
            0 => Vec::new(),
            1 => vec![vec![span]],
            _ => {
                let mut into = Vec::new();
                for len in self.partition_range(end - start, count) {
                    for mut rest in self.partition(count - 1, (start + len, end)) {
                        rest.insert(0, (start, start + len));
                        into.push(rest);
                    }
                }
                into
            }
        }
    }

    /// The lengths the first of `count` parts of `len` tokens may have.
    fn partition_range(&self, len: usize, count: usize) -> ::std::ops::Range<usize> {
        if self.epsilon {
            0..len + 1
        } else if len >= count {
            1..len - count + 2
        } else {
            0..0
        }
    }

    /// Check the terminals and empty strings of a partition.
    fn matches(&self, matchers: &[Symbol], partition: &[Span]) -> bool {
        matchers
            .iter()
            .zip(partition)
            .all(|(matcher, &(start, end))| match *matcher {
                Symbol::Terminal(ref t) => end == start + 1 && self.tokens[start] == t.name(),
                Symbol::Empty => start == end,
                Symbol::NonTerminal(ref nt) => self.by_lhs.contains_key(nt),
                Symbol::Sequence(_) | Symbol::Choice(_) => false,
            })
    }

    /// Find all combinations of child trees for a partition.
    fn combine_children(&mut self, matchers: &[Symbol], partition: &[Span]) -> Vec<Vec<Tree>> {
        let mut combinations = vec![Vec::new()];
        for (matcher, &span) in matchers.iter().zip(partition) {
            let options = match *matcher {
                Symbol::Terminal(ref t) => vec![Tree::leaf(t.name())],
                Symbol::Empty => vec![Tree::epsilon()],
                Symbol::NonTerminal(ref nt) => {
                    let indices = self.by_lhs.get(nt).cloned().unwrap_or_default();
                    let mut trees = Vec::new();
                    for index in indices {
                        trees.extend(self.fit_to(index, span));
                    }
                    trees
                }
                Symbol::Sequence(_) | Symbol::Choice(_) => Vec::new(),
            };
            if options.is_empty() {
                return Vec::new();
            }
            let mut next = Vec::with_capacity(combinations.len() * options.len());
            for prefix in &combinations {
                for option in &options {
                    let mut children = prefix.clone();
                    children.push(option.clone());
                    next.push(children);
                }
            }
            combinations = next;
        }
        combinations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grammar(source: &str) -> Grammar {
        Grammar::parse(source).unwrap()
    }

    fn chars(input: &str) -> Vec<String> {
        input.chars().map(|c| c.to_string()).collect()
    }

    const EXPR: &str = "
        Expr   -> Expr + Term | Term
        Term   -> Term × Factor | Factor
        Factor -> ( Expr ) | i
    ";

    #[test]
    fn arithmetic() {
        let parser = Unger::new(&grammar(EXPR));
        let trees = parser.parse(&chars("(i+i)×i"));
        assert_eq!(trees.len(), 1);
        assert_eq!(trees[0].label(), "Expr");
        assert_eq!(trees[0].tokens(), vec!["(", "i", "+", "i", ")", "×", "i"]);
        assert!(parser.parse(&chars("(i+i")).is_empty());
        assert!(parser.parse(&chars("")).is_empty());
    }

    #[test]
    fn ambiguity() {
        let parser = Unger::new(&grammar("E -> E + E | i"));
        assert_eq!(parser.parse(&chars("i+i+i")).len(), 2);
        assert_eq!(parser.parse(&chars("i")).len(), 1);
    }

    #[test]
    fn epsilon_rules() {
        let parser = Unger::with_epsilon(&grammar("S -> L S D | ε\nL -> ε\nD -> d"));
        let trees = parser.parse(&["d"]);
        assert_eq!(trees.len(), 1);
        assert_eq!(
            format!("{}", trees[0]),
            "<S>\n  <L>\n    ε\n  <S>\n    ε\n  <D>\n    d\n"
        );
        assert_eq!(parser.parse(&["d", "d"]).len(), 1);
        assert_eq!(parser.parse::<&str>(&[]).len(), 1);
        assert!(parser.parse(&["d", "x"]).is_empty());
    }

    #[test]
    fn epsilon_needs_empty_spans() {
        let g = grammar("S -> A b\nA -> a | ε");
        assert!(Unger::new(&g).parse(&["b"]).is_empty());
        assert_eq!(Unger::with_epsilon(&g).parse(&["b"]).len(), 1);
        assert_eq!(Unger::with_epsilon(&g).parse(&["a", "b"]).len(), 1);
    }

    #[test]
    fn empty_only_matches_empty_spans() {
        let parser = Unger::new(&grammar("S -> a S | ε"));
        assert_eq!(parser.parse::<&str>(&[]).len(), 1);
        assert!(parser.parse(&["a"]).is_empty());
    }

    #[test]
    fn unit_cycles_terminate() {
        let parser = Unger::new(&grammar("S -> A | a\nA -> S"));
        let trees = parser.parse(&["a"]);
        assert_eq!(trees.len(), 2);
        assert_eq!(
            trees[0],
            Tree::node(
                "S",
                vec![Tree::node("A", vec![Tree::node("S", vec![Tree::leaf("a")])])],
            )
        );
        assert_eq!(trees[1], Tree::node("S", vec![Tree::leaf("a")]));
    }

    #[test]
    fn nested_nullables_terminate() {
        let parser = Unger::with_epsilon(&grammar("S -> L a M\nL -> L M | ε\nM -> M M | ε"));
        assert!(!parser.parse(&["a"]).is_empty());
        assert!(parser.parse(&["b"]).is_empty());
    }

    #[test]
    fn quoted_epsilon_is_a_token() {
        let parser = Unger::with_epsilon(&grammar("S -> 'ε' A\nA -> a | ε"));
        let trees = parser.parse(&["ε"]);
        assert_eq!(trees.len(), 1);
        assert_eq!(trees[0].tokens(), vec!["ε"]);
        assert_eq!(parser.parse(&["ε", "a"])[0].tokens(), vec!["ε", "a"]);
    }

    #[test]
    fn undefined_nonterminals() {
        let parser = Unger::new(&grammar("S -> A b"));
        assert!(parser.parse(&["a", "b"]).is_empty());
        assert!(Unger::new(&Grammar::empty()).parse(&["a"]).is_empty());
    }
}
