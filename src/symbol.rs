// Copyright (c) 2018 Fabian Schuiki

//! The algebraic expressions that make up the right-hand side of a rule.
//!
//! A right-hand side is a tree of sequences and choices over three kinds of
//! atoms: terminals, nonterminals, and the empty string. The variant set is
//! closed, so everything that walks an expression simply matches on
//! `Symbol`.

use std::fmt;

/// The name used to print the empty string.
pub const EPSILON: &str = "ε";

/// A terminal, matching exactly one input token equal to its name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Terminal(String);

/// A nonterminal. Two nonterminals with the same name are the same symbol.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NonTerminal(String);

/// A grammar expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// A terminal.
    Terminal(Terminal),
    /// A nonterminal.
    NonTerminal(NonTerminal),
    /// The empty string.
    Empty,
    /// A concatenation of at least two expressions.
    Sequence(Sequence),
    /// An alternation over at least one expression.
    Choice(Choice),
}

/// The items of a `Symbol::Sequence`.
///
/// Can only be created through `Symbol::sequence`, which guarantees that
/// there are at least two items and that none of them is a sequence itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sequence(Vec<Symbol>);

/// The alternatives of a `Symbol::Choice`.
///
/// Can only be created through `Symbol::choice`, which guarantees that there
/// is at least one alternative.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Choice(Vec<Symbol>);

impl Terminal {
    /// Create a new terminal.
    pub fn new<S: Into<String>>(name: S) -> Terminal {
        Terminal(name.into())
    }

    /// The name of this terminal, which is also the token it matches.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl NonTerminal {
    /// Create a new nonterminal.
    pub fn new<S: Into<String>>(name: S) -> NonTerminal {
        NonTerminal(name.into())
    }

    /// The name of this nonterminal.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Symbol {
    /// Create a terminal symbol.
    pub fn terminal<S: Into<String>>(name: S) -> Symbol {
        Symbol::Terminal(Terminal::new(name))
    }

    /// Create a nonterminal symbol.
    pub fn nonterminal<S: Into<String>>(name: S) -> Symbol {
        Symbol::NonTerminal(NonTerminal::new(name))
    }

    /// Create a sequence of symbols.
    ///
    /// Nested sequences are flattened into this one and empty strings are
    /// dropped. If nothing remains the result is `Symbol::Empty`, and a single
    /// remaining item is returned as is, so the result is only a
    /// `Symbol::Sequence` if there are at least two items.
    pub fn sequence<I: IntoIterator<Item = Symbol>>(items: I) -> Symbol {
        let mut flat = Vec::new();
        for item in items {
            match item {
                Symbol::Sequence(Sequence(inner)) => flat.extend(inner),
                Symbol::Empty => (),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => Symbol::Empty,
            1 => flat.remove(0),
            _ => Symbol::Sequence(Sequence(flat)),
        }
    }

    /// Create a choice between symbols.
    ///
    /// A single alternative is returned as is.
    ///
    /// Panics if there are no alternatives, since there is no expression
    /// that matches nothing at all.
    pub fn choice<I: IntoIterator<Item = Symbol>>(items: I) -> Symbol {
        let mut items: Vec<Symbol> = items.into_iter().collect();
        match items.len() {
            0 => panic!("choice must have at least one alternative"),
            1 => items.remove(0),
            _ => Symbol::Choice(Choice(items)),
        }
    }

    /// Whether this is a terminal, a nonterminal, or the empty string.
    pub fn is_atom(&self) -> bool {
        match *self {
            Symbol::Terminal(_) | Symbol::NonTerminal(_) | Symbol::Empty => true,
            Symbol::Sequence(_) | Symbol::Choice(_) => false,
        }
    }

    /// The nonterminal, if this symbol is one.
    pub fn as_nonterminal(&self) -> Option<&NonTerminal> {
        match *self {
            Symbol::NonTerminal(ref nt) => Some(nt),
            _ => None,
        }
    }

    /// The terminal, if this symbol is one.
    pub fn as_terminal(&self) -> Option<&Terminal> {
        match *self {
            Symbol::Terminal(ref t) => Some(t),
            _ => None,
        }
    }

    /// The direct items of this symbol.
    ///
    /// For a sequence these are its items, for every other symbol it is the
    /// symbol itself. A choice is treated as a single item.
    pub fn items(&self) -> &[Symbol] {
        match *self {
            Symbol::Sequence(Sequence(ref items)) => items,
            _ => ::std::slice::from_ref(self),
        }
    }

    /// The atomic entries of this symbol, depth-first and left to right.
    pub fn atoms(&self) -> Vec<&Symbol> {
        let mut into = Vec::new();
        self.collect_atoms(&mut into);
        into
    }

    fn collect_atoms<'a>(&'a self, into: &mut Vec<&'a Symbol>) {
        match *self {
            Symbol::Terminal(_) | Symbol::NonTerminal(_) | Symbol::Empty => into.push(self),
            Symbol::Sequence(Sequence(ref items)) | Symbol::Choice(Choice(ref items)) => {
                for item in items {
                    item.collect_atoms(into);
                }
            }
        }
    }

    /// Check whether an atom occurs anywhere in this symbol.
    pub fn mentions(&self, atom: &Symbol) -> bool {
        self.atoms().into_iter().any(|a| a == atom)
    }

    /// The nonterminals occurring in this symbol, in order of appearance.
    pub fn nonterminals(&self) -> Vec<&NonTerminal> {
        self.atoms()
            .into_iter()
            .filter_map(Symbol::as_nonterminal)
            .collect()
    }

    /// Replace every occurrence of an atom with another symbol.
    pub fn replace(&self, needle: &Symbol, replacement: &Symbol) -> Symbol {
        match *self {
            Symbol::Sequence(Sequence(ref items)) => {
                Symbol::sequence(items.iter().map(|i| i.replace(needle, replacement)))
            }
            Symbol::Choice(Choice(ref items)) => {
                Symbol::choice(items.iter().map(|i| i.replace(needle, replacement)))
            }
            ref atom if atom == needle => replacement.clone(),
            ref other => other.clone(),
        }
    }
}

impl Choice {
    /// The alternatives.
    pub fn alternatives(&self) -> &[Symbol] {
        &self.0
    }
}

impl Sequence {
    /// The items in order.
    pub fn items(&self) -> &[Symbol] {
        &self.0
    }
}

impl From<Terminal> for Symbol {
    fn from(t: Terminal) -> Symbol {
        Symbol::Terminal(t)
    }
}

impl From<NonTerminal> for Symbol {
    fn from(nt: NonTerminal) -> Symbol {
        Symbol::NonTerminal(nt)
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for NonTerminal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Symbol::Terminal(ref t) => write!(f, "{}", t),
            Symbol::NonTerminal(ref nt) => write!(f, "{}", nt),
            Symbol::Empty => write!(f, "{}", EPSILON),
            Symbol::Sequence(Sequence(ref items)) => {
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            Symbol::Choice(Choice(ref items)) => {
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
        }
    }
}
