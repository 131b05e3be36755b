// Copyright (c) 2018 Fabian Schuiki

//! The Cocke-Younger-Kasami parser.
//!
//! The parser converts its grammar to Chomsky normal form once and then fills
//! a table `R(i,l)` holding the nonterminals that derive the `l` tokens
//! starting at position `i`, with positions counted from 1. Rows are filled
//! by increasing length, since every cell only depends on shorter spans.

use std::collections::HashMap;
use std::fmt;
use bit_set::BitSet;
use indexmap::{IndexMap, IndexSet};

use Pretty;
use grammar::Grammar;
use symbol::{NonTerminal, Symbol};
use tree::Tree;

/// A CYK parser for a grammar.
#[derive(Debug, Clone)]
pub struct Cyk {
    grammar: Grammar,
    symbols: IndexSet<NonTerminal>,
    start: Option<usize>,
    /// Rules `A -> B C` as `(A, B, C)`.
    binary: Vec<(usize, usize, usize)>,
    /// The nonterminals producing each terminal.
    terminals: IndexMap<String, BitSet>,
    nullable: bool,
}

/// The recognition table of a CYK parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    len: usize,
    /// `rows[l-1][i-1]` holds `R(i,l)`.
    rows: Vec<Vec<BitSet>>,
}

impl Cyk {
    /// Create a parser for a grammar.
    ///
    /// The grammar is converted to Chomsky normal form.
    pub fn new(grammar: &Grammar) -> Cyk {
        let grammar = grammar.to_cnf();
        let symbols: IndexSet<NonTerminal> = grammar.nonterminals().into_iter().cloned().collect();
        let index = |nt: &NonTerminal| symbols.get_full(nt).map(|(index, _)| index);
        let start = grammar.start_symbol().and_then(|s| index(s));

        let mut binary = Vec::new();
        let mut terminals: IndexMap<String, BitSet> = IndexMap::new();
        let mut nullable = false;
        for rule in grammar.rules() {
            let lhs = match index(rule.lhs()) {
                Some(lhs) => lhs,
                None => continue,
            };
            match *rule.rhs() {
                Symbol::Terminal(ref t) => {
                    terminals
                        .entry(t.name().to_string())
                        .or_insert_with(BitSet::new)
                        .insert(lhs);
                }
                Symbol::Sequence(ref seq) => {
                    let pair: Vec<usize> = seq.items()
                        .iter()
                        .filter_map(|item| item.as_nonterminal().and_then(|nt| index(nt)))
                        .collect();
                    if pair.len() == 2 && seq.items().len() == 2 {
                        binary.push((lhs, pair[0], pair[1]));
                    }
                }
                Symbol::Empty => nullable |= Some(lhs) == start,
                Symbol::NonTerminal(_) | Symbol::Choice(_) => (),
            }
        }
        debug!(
            "cyk: {} nonterminals, {} binary rules, {} terminals",
            symbols.len(),
            binary.len(),
            terminals.len()
        );

        Cyk {
            grammar: grammar,
            symbols: symbols,
            start: start,
            binary: binary,
            terminals: terminals,
            nullable: nullable,
        }
    }

    /// The grammar in Chomsky normal form that this parser uses.
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Fill the recognition table for a token sequence.
    pub fn table<S: AsRef<str>>(&self, tokens: &[S]) -> Table {
        let n = tokens.len();
        let mut rows: Vec<Vec<BitSet>> = Vec::with_capacity(n);
        if n > 0 {
            rows.push(
                tokens
                    .iter()
                    .map(|t| {
                        self.terminals
                            .get(t.as_ref())
                            .cloned()
                            .unwrap_or_else(BitSet::new)
                    })
                    .collect(),
            );
        }
        for l in 2..n + 1 {
            let mut row = Vec::with_capacity(n - l + 1);
            for i in 1..n - l + 2 {
                let mut cell = BitSet::new();
                for k in 1..l {
                    let left = &rows[k - 1][i - 1];
                    let right = &rows[l - k - 1][i + k - 1];
                    for &(a, b, c) in &self.binary {
                        if left.contains(b) && right.contains(c) {
                            cell.insert(a);
                        }
                    }
                }
                row.push(cell);
            }
            rows.push(row);
        }
        Table { len: n, rows: rows }
    }

    /// Check whether the grammar derives a token sequence.
    pub fn recognize<S: AsRef<str>>(&self, tokens: &[S]) -> bool {
        let start = match self.start {
            Some(start) => start,
            None => return false,
        };
        if tokens.is_empty() {
            return self.nullable;
        }
        self.table(tokens)
            .lookup(1, tokens.len())
            .map(|cell| cell.contains(start))
            .unwrap_or(false)
    }

    /// Parse a token sequence, returning every parse tree.
    ///
    /// The trees follow the rules of the normalized grammar. An empty result
    /// means the input was rejected.
    pub fn parse<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<Tree> {
        let start = match self.start {
            Some(start) => start,
            None => return Vec::new(),
        };
        let trees = if tokens.is_empty() {
            match self.symbols.get_index(start) {
                Some(nt) if self.nullable => vec![Tree::node(nt.name(), vec![Tree::epsilon()])],
                _ => Vec::new(),
            }
        } else {
            let table = self.table(tokens);
            let mut ctx = Derivations {
                cyk: self,
                table: &table,
                tokens: tokens.iter().map(|t| t.as_ref()).collect(),
                memo: HashMap::new(),
            };
            ctx.derive(start, 1, tokens.len())
        };
        debug!("cyk: {} trees for {} tokens", trees.len(), tokens.len());
        trees
    }

    /// Check whether a nonterminal is in a table cell `R(i,l)`.
    pub fn contains(&self, table: &Table, nonterminal: &NonTerminal, i: usize, l: usize) -> bool {
        match (self.symbols.get_full(nonterminal), table.lookup(i, l)) {
            (Some((index, _)), Some(cell)) => cell.contains(index),
            _ => false,
        }
    }

    /// Resolve a table cell to the nonterminals it contains.
    pub fn symbols(&self, cell: &BitSet) -> Vec<&NonTerminal> {
        cell.iter()
            .filter_map(|index| self.symbols.get_index(index))
            .collect()
    }
}

impl Table {
    /// The number of tokens the table was filled for.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the table was filled for an empty token sequence.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The cell `R(i,l)`, or `None` if the span lies outside the input.
    pub fn lookup(&self, i: usize, l: usize) -> Option<&BitSet> {
        if i == 0 || l == 0 || i + l - 1 > self.len {
            return None;
        }
        self.rows.get(l - 1).and_then(|row| row.get(i - 1))
    }

    /// Get a pretty printer for this table.
    pub fn pretty<'a>(&'a self, cyk: &'a Cyk) -> Pretty<&'a Cyk, &'a Table> {
        Pretty::new(cyk, self)
    }
}

impl<'a> fmt::Display for Pretty<&'a Cyk, &'a Table> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (l, row) in self.item.rows.iter().enumerate() {
            write!(f, "--- length {} ---\n", l + 1)?;
            for (i, cell) in row.iter().enumerate() {
                write!(f, "R({},{}) = {{", i + 1, l + 1)?;
                for (n, nt) in self.ctx.symbols(cell).into_iter().enumerate() {
                    if n > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", nt)?;
                }
                write!(f, "}}\n")?;
            }
        }
        Ok(())
    }
}

/// Tree reconstruction from a filled table.
///
/// Derivations are memoized per `(symbol, i, l)`, which keeps the work
/// polynomial apart from the trees themselves.
struct Derivations<'a> {
    cyk: &'a Cyk,
    table: &'a Table,
    tokens: Vec<&'a str>,
    memo: HashMap<(usize, usize, usize), Vec<Tree>>,
}

impl<'a> Derivations<'a> {
    fn derive(&mut self, symbol: usize, i: usize, l: usize) -> Vec<Tree> {
        if let Some(trees) = self.memo.get(&(symbol, i, l)) {
            return trees.clone();
        }
        let cyk = self.cyk;
        let derivable = self.table
            .lookup(i, l)
            .map(|cell| cell.contains(symbol))
            .unwrap_or(false);
        let mut trees = Vec::new();
        if let (true, Some(nt)) = (derivable, cyk.symbols.get_index(symbol)) {
            if l == 1 {
                trees.push(Tree::node(nt.name(), vec![Tree::leaf(self.tokens[i - 1])]));
            } else {
                for &(a, b, c) in &cyk.binary {
                    if a != symbol {
                        continue;
                    }
                    for k in 1..l {
                        let lefts = self.derive(b, i, k);
                        if lefts.is_empty() {
                            continue;
                        }
                        let rights = self.derive(c, i + k, l - k);
                        for left in &lefts {
                            for right in &rights {
                                trees.push(Tree::node(nt.name(), vec![left.clone(), right.clone()]));
                            }
                        }
                    }
                }
            }
        }
        trace!("derivations of {} at ({},{}): {}", symbol, i, l, trees.len());
        self.memo.insert((symbol, i, l), trees.clone());
        trees
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cyk(source: &str) -> Cyk {
        Cyk::new(&Grammar::parse(source).unwrap())
    }

    fn chars(input: &str) -> Vec<String> {
        input.chars().map(|c| c.to_string()).collect()
    }

    #[test]
    fn number() {
        let parser = cyk(
            "
            Number   -> Integer | Real
            Integer  -> Digit | Integer Digit
            Real     -> Integer Fraction Scale
            Fraction -> . Integer
            Scale    -> e Sign Integer | Empty
            Digit    -> 0 | 1 | 2 | 3 | 4 | 5 | 6 | 7 | 8 | 9
            Sign     -> + | -
            Empty    -> ε
        ",
        );
        let input = chars("32.5e+1");
        let trees = parser.parse(&input);
        assert_eq!(trees.len(), 1);
        assert_eq!(trees[0].label(), "Number");
        assert_eq!(trees[0].tokens(), vec!["3", "2", ".", "5", "e", "+", "1"]);
        assert!(parser.recognize(&input));
        assert!(parser.recognize(&chars("32.5")));
        assert!(parser.recognize(&chars("7")));
        assert!(!parser.recognize(&chars("32.")));
        assert!(!parser.recognize(&chars("")));
        assert!(parser.parse(&chars("e+1")).is_empty());
    }

    #[test]
    fn table_cells() {
        let parser = cyk("S -> A B\nA -> a\nB -> b");
        let table = parser.table(&["a", "b"]);
        assert_eq!(table.len(), 2);
        let nt = NonTerminal::new;
        assert!(parser.contains(&table, &nt("A"), 1, 1));
        assert!(parser.contains(&table, &nt("B"), 2, 1));
        assert!(parser.contains(&table, &nt("S"), 1, 2));
        assert!(!parser.contains(&table, &nt("S"), 1, 1));
        assert!(table.lookup(2, 2).is_none());
        assert!(table.lookup(0, 1).is_none());
        assert_eq!(
            format!("{}", table.pretty(&parser)),
            "--- length 1 ---\nR(1,1) = {A}\nR(2,1) = {B}\n--- length 2 ---\nR(1,2) = {S}\n"
        );
    }

    #[test]
    fn tree_shape() {
        let parser = cyk("S -> A B\nA -> a\nB -> b");
        let trees = parser.parse(&["a", "b"]);
        assert_eq!(trees.len(), 1);
        assert_eq!(format!("{}", trees[0]), "<S>\n  <A>\n    a\n  <B>\n    b\n");
    }

    #[test]
    fn ambiguity() {
        let parser = cyk("S -> S S | a");
        assert_eq!(parser.parse(&["a", "a", "a"]).len(), 2);
        assert_eq!(parser.parse(&["a", "a", "a", "a"]).len(), 5);
    }

    #[test]
    fn empty_input() {
        let parser = cyk("S -> a S | ε");
        assert!(parser.recognize::<&str>(&[]));
        let trees = parser.parse::<&str>(&[]);
        assert_eq!(trees, vec![Tree::node("S", vec![Tree::epsilon()])]);
        assert_eq!(parser.parse(&["a", "a"]).len(), 1);
        assert!(parser.table::<&str>(&[]).is_empty());

        let parser = cyk("S -> a S | a");
        assert!(parser.parse::<&str>(&[]).is_empty());
    }

    #[test]
    fn empty_language() {
        let parser = cyk("S -> S a");
        assert!(parser.grammar().is_empty());
        assert!(!parser.recognize(&["a"]));
        assert!(parser.parse(&["a"]).is_empty());
    }

    #[test]
    fn unknown_tokens() {
        let parser = cyk("S -> a");
        assert!(parser.parse(&["b"]).is_empty());
        assert_eq!(parser.parse(&["a"]).len(), 1);
    }
}
