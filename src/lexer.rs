// Copyright (c) 2018 Fabian Schuiki

//! A lexer for grammar notation.

use std::iter::Peekable;

use parser::ParseError;

/// The tokens that may appear in grammar notation.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Token {
    Ident(String),
    Quoted(String),
    Arrow,
    Pipe,
    Epsilon,
    Newline,
}

/// A lexer for grammar notation.
///
/// Yields each token together with its start and end byte offset.
pub struct Lexer<T: Iterator<Item = (usize, char)>> {
    input: Peekable<T>,
    /// A character read past the end of an identifier.
    pending: Option<(usize, char)>,
}

impl<T: Iterator<Item = (usize, char)>> Lexer<T> {
    /// Create a new lexer.
    pub fn new(input: T) -> Lexer<T> {
        Lexer {
            input: input.peekable(),
            pending: None,
        }
    }
}

/// Return the next relevant input character, skipping comments.
///
/// Newlines are relevant since they terminate rules. `pending` is consumed
/// before the input.
fn next_relevant<I: Iterator<Item = (usize, char)>>(
    input: &mut Peekable<I>,
    mut pending: Option<(usize, char)>,
) -> Result<Option<(usize, char)>, ParseError> {
    'outer: while let Some((p, c)) = pending.take().or_else(|| input.next()) {
        if c == '/' {
            match input.peek() {
                Some(&(_, '/')) => {
                    while let Some(&(_, c)) = input.peek() {
                        if c == '\n' {
                            continue 'outer;
                        }
                        input.next();
                    }
                    return Ok(None); // end of input reached
                }
                Some(&(_, '*')) => {
                    input.next();
                    while let Some((_, c)) = input.next() {
                        if c != '*' {
                            continue;
                        }
                        if let Some(&(_, c)) = input.peek() {
                            if c == '/' {
                                input.next();
                                continue 'outer;
                            }
                        }
                    }
                    return Err(ParseError::new(p, "unterminated comment"));
                }
                _ => (),
            }
        }
        if c == '\n' || !c.is_whitespace() {
            return Ok(Some((p, c)));
        }
    }
    Ok(None)
}

impl<T: Iterator<Item = (usize, char)>> Iterator for Lexer<T> {
    type Item = Result<(usize, usize, Token), ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        // Fetch the first character and see what we can do with it.
        let (sp, sc) = match next_relevant(&mut self.input, self.pending.take()) {
            Ok(Some(x)) => x,
            Ok(None) => return None,
            Err(e) => return Some(Err(e)),
        };
        let mut sl = sp + sc.len_utf8();
        let tkn = match sc {
            '\n' => Token::Newline,
            '|' => Token::Pipe,
            '\'' => {
                let mut buffer = String::new();
                let mut escaped = false;
                let mut closed = false;
                while let Some((ep, ec)) = self.input.next() {
                    sl = ep + ec.len_utf8();
                    if escaped {
                        buffer.push(ec);
                        escaped = false;
                    } else if ec == '\\' {
                        escaped = true;
                    } else if ec == '\'' {
                        closed = true;
                        break;
                    } else {
                        buffer.push(ec);
                    }
                }
                if !closed {
                    return Some(Err(ParseError::new(sp, "unterminated quote")));
                }
                Token::Quoted(buffer)
            }
            _ => {
                let mut buffer = String::new();
                buffer.push(sc);
                while let Some(&(ep, ec)) = self.input.peek() {
                    if ec.is_whitespace() || ec == '|' {
                        break;
                    }
                    self.input.next();
                    // A comment may follow an identifier without a space.
                    if ec == '/' {
                        match self.input.peek() {
                            Some(&(_, '/')) | Some(&(_, '*')) => {
                                self.pending = Some((ep, ec));
                                break;
                            }
                            _ => (),
                        }
                    }
                    buffer.push(ec);
                    sl = ep + ec.len_utf8();
                }
                match buffer.as_str() {
                    "->" | "→" => Token::Arrow,
                    "ε" => Token::Epsilon,
                    _ => Token::Ident(buffer),
                }
            }
        };
        Some(Ok((sp, sl, tkn)))
    }
}
