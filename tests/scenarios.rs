// Copyright (c) 2018 Fabian Schuiki

//! End-to-end checks of the transformations and both parsers.

extern crate chomsky;

use chomsky::{Cyk, Grammar, NonTerminal, Symbol, Unger};

const NUMBER: &str = "
    Number   -> Integer | Real
    Integer  -> Digit | Integer Digit
    Real     -> Integer Fraction Scale
    Fraction -> . Integer
    Scale    -> e Sign Integer | Empty
    Digit    -> 0 | 1 | 2 | 3 | 4 | 5 | 6 | 7 | 8 | 9
    Sign     -> + | -
    Empty    -> ε
";

const EXPR: &str = "
    Expr   -> Expr + Term | Term
    Term   -> Term × Factor | Factor
    Factor -> ( Expr ) | i
";

const NULLABLE: &str = "S -> L S D | ε\nL -> ε\nD -> d";

const MIXED: &str = "
    S -> A B | B
    A -> a A | ε
    B -> b | A c
";

fn grammar(source: &str) -> Grammar {
    Grammar::parse(source).unwrap()
}

fn chars(input: &str) -> Vec<String> {
    input.chars().map(|c| c.to_string()).collect()
}

/// All token sequences over `alphabet` with at most `max` tokens.
fn sentences(alphabet: &[&str], max: usize) -> Vec<Vec<String>> {
    let mut all = vec![vec![]];
    let mut last: Vec<Vec<String>> = vec![vec![]];
    for _ in 0..max {
        let mut next = Vec::new();
        for prefix in &last {
            for token in alphabet {
                let mut sentence = prefix.clone();
                sentence.push(token.to_string());
                next.push(sentence);
            }
        }
        all.extend(next.iter().cloned());
        last = next;
    }
    all
}

#[test]
fn arithmetic_cnf() {
    let g = grammar(NUMBER);
    let cnf = g.to_cnf();
    assert!(cnf.is_cnf());
    assert!(cnf.rules().all(|r| !r.is_epsilon() && !r.is_unit()));

    let cyk = Cyk::new(&g);
    assert_eq!(cyk.grammar(), &cnf);
    let input = chars("32.5e+1");
    assert!(cyk.recognize(&input));
    let trees = cyk.parse(&input);
    assert_eq!(trees.len(), 1);
    assert_eq!(trees[0].label(), "Number");
    assert_eq!(trees[0].tokens().concat(), "32.5e+1");
}

#[test]
fn ambiguous_arithmetic() {
    let trees = Unger::new(&grammar(EXPR)).parse(&chars("(i+i)×i"));
    assert!(!trees.is_empty());
    for tree in &trees {
        assert_eq!(tree.label(), "Expr");
        assert_eq!(tree.tokens().concat(), "(i+i)×i");
    }
}

#[test]
fn epsilon_grammar_termination() {
    let unger = Unger::with_epsilon(&grammar(NULLABLE));
    assert_eq!(unger.parse(&["d"]).len(), 1);
    assert_eq!(unger.parse(&["d", "d"]).len(), 1);
    assert_eq!(unger.parse(&["d", "d", "d"]).len(), 1);
}

#[test]
fn cleaning() {
    let g = grammar(
        "
        S -> A B | D E
        A -> a
        B -> b C
        C -> c
        D -> d F
        E -> e
        F -> f D
    ",
    );
    assert_eq!(
        g.split_choices().clean(),
        grammar("S -> A B\nA -> a\nB -> b C\nC -> c")
    );
}

#[test]
fn clean_is_idempotent() {
    for source in &[NUMBER, EXPR, NULLABLE, MIXED, "S -> S a\nA -> a", "S -> A\nB -> b"] {
        let once = grammar(source).split_choices().clean();
        assert_eq!(once.clean(), once, "cleaning twice changed\n{}", source);
    }
}

#[test]
fn epsilon_removal() {
    let g = grammar("S -> a M b M\nM -> m M | ε");
    let removed = g.remove_epsilon_rules().clean();
    assert!(removed.rules().all(|r| !r.is_epsilon()));

    // Each optional position shows up with and without `M`.
    let expected = grammar(
        "
        S  -> a M' b M' | a b M' | a M' b | a b
        M' -> m M' | m
    ",
    );
    assert_eq!(removed, expected.split_choices());

    let nullable_start = grammar("S -> a S | ε").remove_epsilon_rules().clean();
    let epsilons: Vec<_> = nullable_start.rules().filter(|r| r.is_epsilon()).collect();
    assert_eq!(epsilons.len(), 1);
    assert_eq!(epsilons[0].lhs(), &NonTerminal::new("S"));
}

#[test]
fn unit_removal() {
    let g = grammar("S -> A | s\nA -> B | a\nB -> A | S | b B");
    let removed = g.remove_unit_rules();
    assert!(removed.rules().all(|r| !r.is_unit()));
    let original = Unger::with_epsilon(&g);
    let inlined = Unger::with_epsilon(&removed);
    for sentence in sentences(&["a", "b", "s"], 4) {
        assert_eq!(
            original.parse(&sentence).is_empty(),
            inlined.parse(&sentence).is_empty(),
            "disagreement on {:?}",
            sentence
        );
    }
}

#[test]
fn language_preservation() {
    let cases: &[(&str, &[&str], usize)] = &[
        ("S -> a S b | ε", &["a", "b"], 6),
        (NULLABLE, &["d", "x"], 4),
        (MIXED, &["a", "b", "c"], 4),
        (EXPR, &["i", "+", "×", "(", ")"], 3),
        ("S -> S S | a | ε", &["a", "b"], 4),
    ];
    for &(source, alphabet, max) in cases {
        let g = grammar(source);
        let cyk = Cyk::new(&g);
        let unger = Unger::with_epsilon(&g.split_choices());
        for sentence in sentences(alphabet, max) {
            assert_eq!(
                cyk.parse(&sentence).is_empty(),
                unger.parse(&sentence).is_empty(),
                "disagreement on {:?} for\n{}",
                sentence,
                source
            );
        }
    }
}

#[test]
fn round_trip() {
    for source in &[NUMBER, EXPR, NULLABLE, MIXED] {
        let g = grammar(source);
        assert_eq!(g.split_choices().join_choices(), g);
    }
}

#[test]
fn nonterminal_names_are_not_reused() {
    // Names that binarization would pick are already taken by the grammar.
    let g = grammar("S -> a N1 T1 b\nN1 -> n\nT1 -> t");
    let cnf = g.to_cnf();
    assert!(cnf.is_cnf());
    let n1 = Symbol::nonterminal("N1");
    let t1 = Symbol::nonterminal("T1");
    let n1_rules: Vec<_> = cnf.rules_for(&NonTerminal::new("N1"));
    let t1_rules: Vec<_> = cnf.rules_for(&NonTerminal::new("T1"));
    assert_eq!(n1_rules.len(), 1);
    assert_eq!(n1_rules[0].rhs(), &Symbol::terminal("n"));
    assert_eq!(t1_rules.len(), 1);
    assert_eq!(t1_rules[0].rhs(), &Symbol::terminal("t"));
    assert!(cnf.rules().any(|r| r.mentions(&n1)));
    assert!(cnf.rules().any(|r| r.mentions(&t1)));

    let cyk = Cyk::new(&g);
    assert!(cyk.recognize(&["a", "n", "t", "b"]));
    assert!(!cyk.recognize(&["a", "t", "n", "b"]));
}

#[test]
fn empty_language() {
    let g = grammar("S -> A\nA -> A a");
    assert!(g.to_cnf().is_empty());
    assert!(!Cyk::new(&g).recognize(&["a"]));
    assert!(Unger::with_epsilon(&g).parse(&["a"]).is_empty());
}
