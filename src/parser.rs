// Copyright (c) 2018 Fabian Schuiki

//! A parser for grammar notation.
//!
//! A grammar is written one rule per line:
//!
//! ```text
//! Expr   -> Expr + Term | Term
//! Term   -> Term × Factor | Factor
//! Factor -> ( Expr ) | i
//! ```
//!
//! Alternatives are separated by `|` and the items of an alternative by
//! whitespace. Items starting with an uppercase ASCII letter are
//! nonterminals, `ε` is the empty string, and everything else is a terminal.
//! Quote an item as in `'|'` to force a terminal. Comments use `//` and
//! `/* */`.

use std::error::Error;
use std::fmt;

use grammar::{Grammar, Rule};
use lexer::{Lexer, Token};
use symbol::{NonTerminal, Symbol};

/// An error encountered while reading grammar notation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    offset: usize,
    message: String,
}

impl ParseError {
    /// Create a new error at a byte offset into the source.
    pub fn new<S: Into<String>>(offset: usize, message: S) -> ParseError {
        ParseError {
            offset: offset,
            message: message.into(),
        }
    }

    /// The byte offset into the source where the error occurred.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The 1-based line and column of the error within `source`.
    pub fn position(&self, source: &str) -> (usize, usize) {
        let offset = self.offset.min(source.len());
        let before = source.get(..offset).unwrap_or(source);
        let line = before.matches('\n').count() + 1;
        let column = match before.rfind('\n') {
            Some(nl) => before[nl + 1..].chars().count() + 1,
            None => before.chars().count() + 1,
        };
        (line, column)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} at offset {}", self.message, self.offset)
    }
}

impl Error for ParseError {}

type Spanned = (usize, usize, Token);

/// Parse a grammar from its textual notation.
pub fn parse_grammar(source: &str) -> Result<Grammar, ParseError> {
    let mut rules = Vec::new();
    let mut line = Vec::new();
    for tkn in Lexer::new(source.char_indices()) {
        match tkn? {
            (sp, _, Token::Newline) => {
                rules.extend(parse_rule(&line, sp)?);
                line.clear();
            }
            tkn => line.push(tkn),
        }
    }
    rules.extend(parse_rule(&line, source.len())?);
    let grammar = Grammar::new(rules);
    debug!(
        "parsed grammar with {} rules over {} nonterminals",
        grammar.len(),
        grammar.nonterminals().len()
    );
    Ok(grammar)
}

/// Parse the tokens of one line into a rule.
///
/// `eol` is the offset of the end of the line, used to report errors about
/// missing tokens. Blank lines yield no rule.
fn parse_rule(line: &[Spanned], eol: usize) -> Result<Option<Rule>, ParseError> {
    let mut tokens = line.iter();
    let lhs = match tokens.next() {
        None => return Ok(None),
        Some(&(sp, _, Token::Ident(ref name))) => {
            if !is_nonterminal(name) {
                return Err(ParseError::new(
                    sp,
                    format!("left-hand side `{}` is not a nonterminal", name),
                ));
            }
            NonTerminal::new(name.as_str())
        }
        Some(&(sp, _, Token::Arrow)) => {
            return Err(ParseError::new(sp, "missing left-hand side"));
        }
        Some(&(sp, _, _)) => {
            return Err(ParseError::new(
                sp,
                "left-hand side must be a nonterminal",
            ));
        }
    };
    match tokens.next() {
        Some(&(_, _, Token::Arrow)) => (),
        Some(&(sp, _, _)) => {
            return Err(ParseError::new(sp, "expected `->` after left-hand side"));
        }
        None => return Err(ParseError::new(eol, "expected `->` after left-hand side")),
    }

    let mut alternatives = Vec::new();
    let mut items = Vec::new();
    for &(sp, _, ref tkn) in tokens {
        match *tkn {
            Token::Pipe => {
                if items.is_empty() {
                    return Err(ParseError::new(sp, "empty alternative"));
                }
                alternatives.push(Symbol::sequence(items.drain(..)));
            }
            Token::Ident(ref name) if is_nonterminal(name) => {
                items.push(Symbol::nonterminal(name.as_str()))
            }
            Token::Ident(ref name) | Token::Quoted(ref name) => {
                items.push(Symbol::terminal(name.as_str()))
            }
            Token::Epsilon => items.push(Symbol::Empty),
            Token::Arrow => return Err(ParseError::new(sp, "unexpected `->`")),
            Token::Newline => unreachable!("lines are split at newlines"),
        }
    }
    if items.is_empty() {
        return Err(ParseError::new(eol, "empty alternative"));
    }
    alternatives.push(Symbol::sequence(items));
    Ok(Some(Rule::new(lhs, Symbol::choice(alternatives))))
}

/// Check whether an unquoted item names a nonterminal.
fn is_nonterminal(name: &str) -> bool {
    name.chars()
        .next()
        .map(|c| c.is_ascii_uppercase())
        .unwrap_or(false)
}
