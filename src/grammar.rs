// Copyright (c) 2018 Fabian Schuiki

//! Data structures representing a grammar.

use std::fmt;
use std::collections::HashSet;
use indexmap::{IndexMap, IndexSet};

use parser::{self, ParseError};
use symbol::{NonTerminal, Symbol, Terminal};

/// A grammar.
///
/// An ordered set of rules. The left-hand side of the first rule is the
/// start symbol. Two grammars are equal if they contain the same rules,
/// regardless of their order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    rules: IndexSet<Rule>,
}

/// A single rule within a grammar.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rule {
    lhs: NonTerminal,
    rhs: Symbol,
}

/// An iterator over the rules of a grammar.
pub type RulesIter<'a> = ::indexmap::set::Iter<'a, Rule>;

impl Grammar {
    /// Create a grammar from a list of rules.
    ///
    /// Duplicate rules are dropped, keeping the first occurrence.
    pub fn new<I: IntoIterator<Item = Rule>>(rules: I) -> Grammar {
        Grammar {
            rules: rules.into_iter().collect(),
        }
    }

    /// Create a grammar without any rules.
    pub fn empty() -> Grammar {
        Grammar {
            rules: IndexSet::new(),
        }
    }

    /// Parse a grammar from its textual notation.
    ///
    /// See the `parser` module for the notation.
    pub fn parse(source: &str) -> Result<Grammar, ParseError> {
        parser::parse_grammar(source)
    }

    /// Create a grammar whose start symbol is `start`.
    ///
    /// The rules of the start symbol are moved to the front. If there are no
    /// such rules the grammar derives nothing, and the empty grammar is
    /// returned.
    pub(crate) fn rooted<I>(start: Option<&NonTerminal>, rules: I) -> Grammar
    where
        I: IntoIterator<Item = Rule>,
    {
        let rules: IndexSet<Rule> = rules.into_iter().collect();
        let start = match start {
            Some(start) => start,
            None => return Grammar { rules: rules },
        };
        let (mut head, tail): (Vec<Rule>, Vec<Rule>) =
            rules.into_iter().partition(|rule| rule.lhs() == start);
        if head.is_empty() {
            debug!("no rules left for start symbol {}", start);
            return Grammar::empty();
        }
        head.extend(tail);
        Grammar::new(head)
    }

    /// The rules in this grammar.
    pub fn rules(&self) -> RulesIter {
        self.rules.iter()
    }

    /// The number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the grammar has no rules at all.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The start symbol, i.e. the left-hand side of the first rule.
    pub fn start_symbol(&self) -> Option<&NonTerminal> {
        self.rules.iter().next().map(Rule::lhs)
    }

    /// The rules for a specific nonterminal, in declaration order.
    pub fn rules_for(&self, nonterminal: &NonTerminal) -> Vec<&Rule> {
        self.rules.iter().filter(|r| r.is_for(nonterminal)).collect()
    }

    /// The rules for the start symbol.
    pub fn start_rules(&self) -> Vec<&Rule> {
        match self.start_symbol() {
            Some(start) => self.rules_for(start),
            None => Vec::new(),
        }
    }

    /// All nonterminals mentioned in the grammar, in order of appearance.
    pub fn nonterminals(&self) -> Vec<&NonTerminal> {
        let mut seen = IndexSet::new();
        for rule in &self.rules {
            seen.insert(&rule.lhs);
            seen.extend(rule.rhs.nonterminals());
        }
        seen.into_iter().collect()
    }

    /// All terminals mentioned in the grammar, in order of appearance.
    pub fn terminals(&self) -> Vec<&Terminal> {
        let mut seen = IndexSet::new();
        for rule in &self.rules {
            seen.extend(rule.rhs.atoms().into_iter().filter_map(Symbol::as_terminal));
        }
        seen.into_iter().collect()
    }

    /// Replace every choice by one rule per alternative.
    ///
    /// Rules whose right-hand side is not a choice are kept as they are. A
    /// choice nested inside a sequence is lifted into a rule of its own,
    /// named after the left-hand side with primes appended.
    pub fn split_choices(&self) -> Grammar {
        let mut names = Names::from_grammar(self);
        let mut rules = Vec::new();
        for rule in &self.rules {
            split_rule(&rule.lhs, &rule.rhs, &mut names, &mut rules);
        }
        Grammar::new(rules)
    }

    /// Merge all rules with the same left-hand side into one choice.
    ///
    /// This is the inverse of `split_choices`. A nonterminal with a single
    /// rule keeps its bare right-hand side.
    pub fn join_choices(&self) -> Grammar {
        let mut alternatives: IndexMap<&NonTerminal, Vec<Symbol>> = IndexMap::new();
        for rule in &self.rules {
            alternatives
                .entry(&rule.lhs)
                .or_insert_with(Vec::new)
                .push(rule.rhs.clone());
        }
        Grammar::new(
            alternatives
                .into_iter()
                .map(|(lhs, alts)| Rule::new(lhs.clone(), Symbol::choice(alts))),
        )
    }

    /// Check whether the grammar is in Chomsky normal form.
    ///
    /// Every right-hand side must be a single terminal or a pair of
    /// nonterminals. The start symbol may additionally produce the empty
    /// string.
    pub fn is_cnf(&self) -> bool {
        let start = self.start_symbol();
        self.rules
            .iter()
            .all(|rule| is_cnf_rhs(&rule.rhs, Some(&rule.lhs) == start))
    }
}

/// Check a right-hand side against the CNF shapes.
///
/// The alternatives of a choice are checked one by one.
fn is_cnf_rhs(rhs: &Symbol, is_start: bool) -> bool {
    match *rhs {
        Symbol::Terminal(_) => true,
        Symbol::Empty => is_start,
        Symbol::Sequence(ref seq) => {
            seq.items().len() == 2 && seq.items().iter().all(|s| s.as_nonterminal().is_some())
        }
        Symbol::Choice(ref choice) => choice
            .alternatives()
            .iter()
            .all(|alt| is_cnf_rhs(alt, is_start)),
        Symbol::NonTerminal(_) => false,
    }
}

fn split_rule(lhs: &NonTerminal, rhs: &Symbol, names: &mut Names, into: &mut Vec<Rule>) {
    match *rhs {
        Symbol::Choice(ref choice) => for alt in choice.alternatives() {
            split_rule(lhs, alt, names, into);
        },
        Symbol::Sequence(ref seq) => {
            let mut lifted = Vec::new();
            let mut items = Vec::with_capacity(seq.items().len());
            for item in seq.items() {
                match *item {
                    Symbol::Choice(_) => {
                        let sub = names.primed(lhs);
                        items.push(Symbol::NonTerminal(sub.clone()));
                        lifted.push((sub, item));
                    }
                    _ => items.push(item.clone()),
                }
            }
            into.push(Rule::new(lhs.clone(), Symbol::sequence(items)));
            for (sub, choice) in lifted {
                split_rule(&sub, choice, names, into);
            }
        }
        _ => into.push(Rule::new(lhs.clone(), rhs.clone())),
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let width = self.rules
            .iter()
            .map(|r| r.lhs.name().chars().count())
            .max()
            .unwrap_or(0);
        for (index, rule) in self.rules.iter().enumerate() {
            if index > 0 {
                write!(f, "\n")?;
            }
            write!(f, "{:width$} -> {}", rule.lhs.name(), rule.rhs, width = width)?;
        }
        Ok(())
    }
}

impl Rule {
    /// Create a new rule.
    pub fn new(lhs: NonTerminal, rhs: Symbol) -> Rule {
        Rule { lhs: lhs, rhs: rhs }
    }

    /// The nonterminal this rule produces.
    pub fn lhs(&self) -> &NonTerminal {
        &self.lhs
    }

    /// The expression this rule expands to.
    pub fn rhs(&self) -> &Symbol {
        &self.rhs
    }

    /// Whether this rule produces `nonterminal`.
    pub fn is_for(&self, nonterminal: &NonTerminal) -> bool {
        self.lhs == *nonterminal
    }

    /// Whether the right-hand side is exactly the empty string.
    pub fn is_epsilon(&self) -> bool {
        self.rhs == Symbol::Empty
    }

    /// Whether the right-hand side is a single nonterminal.
    pub fn is_unit(&self) -> bool {
        self.rhs.as_nonterminal().is_some()
    }

    /// Whether the right-hand side is a sequence.
    pub fn is_sequence(&self) -> bool {
        match self.rhs {
            Symbol::Sequence(_) => true,
            _ => false,
        }
    }

    /// Whether this rule produces its own left-hand side, as in `A -> A`.
    pub fn is_self_loop(&self) -> bool {
        self.rhs.as_nonterminal() == Some(&self.lhs)
    }

    /// Whether `atom` occurs anywhere in the right-hand side.
    pub fn mentions(&self, atom: &Symbol) -> bool {
        self.rhs.mentions(atom)
    }

    /// The nonterminals in the right-hand side.
    pub fn nonterminals(&self) -> Vec<&NonTerminal> {
        self.rhs.nonterminals()
    }

    /// Whether the right-hand side is a terminal matching `token`.
    pub fn matches(&self, token: &str) -> bool {
        self.rhs.as_terminal().map(|t| t.name() == token).unwrap_or(false)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} -> {}", self.lhs, self.rhs)
    }
}

/// A registry of the names in use in a grammar.
///
/// Transformations that introduce new nonterminals draw their names from
/// here, which guarantees that they never collide with a symbol of the
/// grammar or with each other.
#[derive(Debug, Clone)]
pub(crate) struct Names {
    taken: HashSet<String>,
}

impl Names {
    /// Reserve the names of all symbols in a grammar.
    pub fn from_grammar(grammar: &Grammar) -> Names {
        let mut taken = HashSet::new();
        for rule in grammar.rules() {
            taken.insert(rule.lhs.name().to_string());
            for atom in rule.rhs.atoms() {
                match *atom {
                    Symbol::Terminal(ref t) => taken.insert(t.name().to_string()),
                    Symbol::NonTerminal(ref nt) => taken.insert(nt.name().to_string()),
                    _ => false,
                };
            }
        }
        Names { taken: taken }
    }

    /// Pick a fresh name by appending primes to `base`.
    pub fn primed(&mut self, base: &NonTerminal) -> NonTerminal {
        let mut name = format!("{}'", base.name());
        while self.taken.contains(&name) {
            name.push('\'');
        }
        self.taken.insert(name.clone());
        NonTerminal::new(name)
    }

    /// Pick a fresh name `<prefix><n>`, advancing `counter` past taken names.
    pub fn numbered(&mut self, prefix: &str, counter: &mut usize) -> NonTerminal {
        loop {
            *counter += 1;
            let name = format!("{}{}", prefix, counter);
            if self.taken.insert(name.clone()) {
                return NonTerminal::new(name);
            }
        }
    }
}
