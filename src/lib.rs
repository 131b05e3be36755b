// Copyright (c) 2018 Fabian Schuiki

//! A toolkit for context-free grammars.
//!
//! Grammars can be read from a simple textual notation, converted to Chomsky
//! normal form, and used to parse token sequences with either the CYK or
//! Unger's method.
//!
//! ```
//! use chomsky::{Cyk, Grammar, Unger};
//!
//! let grammar = Grammar::parse("S -> a S b | ε").unwrap();
//! let cyk = Cyk::new(&grammar);
//! assert!(cyk.recognize(&["a", "a", "b", "b"]));
//! assert!(!cyk.recognize(&["a", "b", "b"]));
//! assert_eq!(Unger::with_epsilon(&grammar).parse(&["a", "b"]).len(), 1);
//! ```

#![deny(missing_docs)]

extern crate bit_set;
extern crate indexmap;
#[macro_use]
extern crate log;

pub mod symbol;
pub mod closure;
pub mod grammar;
pub mod cnf;
pub mod tree;
pub mod cyk;
pub mod unger;
pub mod lexer;
pub mod parser;

pub use symbol::{NonTerminal, Symbol, Terminal};
pub use grammar::{Grammar, Rule};
pub use tree::Tree;
pub use cyk::Cyk;
pub use unger::Unger;
pub use parser::ParseError;

/// A pretty printer.
pub struct Pretty<C, T> {
    ctx: C,
    item: T,
}

impl<C, T> Pretty<C, T> {
    pub(crate) fn new(ctx: C, item: T) -> Pretty<C, T> {
        Pretty { ctx, item }
    }
}
