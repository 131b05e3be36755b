// Copyright (c) 2018 Fabian Schuiki

//! Conversion of grammars to Chomsky normal form.
//!
//! The conversion is a pipeline of independent stages, each of which maps a
//! grammar to a new grammar:
//!
//! 1. `split_choices` gives every alternative a rule of its own.
//! 2. `remove_epsilon_rules` makes optional nullable symbols explicit.
//! 3. `remove_unit_rules` inlines rules of the form `A -> B`.
//! 4. `clean` drops non-productive rules and unreachable nonterminals.
//! 5. `binarize` breaks long sequences into pairs of nonterminals.
//!
//! All stages keep the start symbol's rules at the front of the grammar.

use std::collections::HashSet;
use indexmap::{IndexMap, IndexSet};

use closure::closure;
use grammar::{Grammar, Names, Rule};
use symbol::{NonTerminal, Symbol};

impl Grammar {
    /// Convert the grammar to Chomsky normal form.
    ///
    /// The result derives the same language. Every rule produces either a
    /// single terminal or a pair of nonterminals, except that the start
    /// symbol keeps an epsilon rule if it could derive the empty string.
    pub fn to_cnf(&self) -> Grammar {
        let cnf = self.split_choices()
            .remove_epsilon_rules()
            .remove_unit_rules()
            .clean()
            .binarize();
        debug!("to_cnf: {} rules -> {} rules", self.len(), cnf.len());
        cnf
    }

    /// Remove epsilon rules by making nullable nonterminals optional.
    ///
    /// Every occurrence of a nullable nonterminal `X` is replaced by `X'`, a
    /// new nonterminal deriving the non-empty strings of `X`, and each rule
    /// is duplicated for every combination of nullable positions left out.
    /// Primed nonterminals that derive nothing are dropped along with the
    /// rules that mention them.
    ///
    /// The `X -> ε` rules themselves are kept. Apart from the start symbol
    /// nothing refers to `X` anymore afterwards, so `clean` removes them.
    pub fn remove_epsilon_rules(&self) -> Grammar {
        let split = self.split_choices();
        let nullable = nullable_nonterminals(&split);
        let mut names = Names::from_grammar(&split);
        let mut primes = IndexMap::new();
        let mut rules = Vec::new();
        for rule in split.rules() {
            expand_optional(rule, &nullable, &mut names, &mut primes, &mut rules);
        }

        // The primed symbols derive whatever their original derives, minus
        // the empty string.
        let mut primed_rules = Vec::new();
        for (plain, primed) in &primes {
            for rule in rules.iter().filter(|r| r.is_for(plain) && !r.is_epsilon()) {
                primed_rules.push(Rule::new(primed.clone(), rule.rhs().clone()));
            }
        }
        rules.extend(primed_rules);

        // Drop primed symbols that cannot derive anything non-empty.
        let orphans = orphaned_primes(&rules, primes.values());
        rules.retain(|rule| {
            !orphans
                .iter()
                .any(|o| rule.is_for(o) || rule.mentions(&Symbol::NonTerminal(o.clone())))
        });

        let result = Grammar::rooted(split.start_symbol(), rules);
        debug!(
            "remove_epsilon_rules: {} nullable, {} primed, {} orphaned, {} -> {} rules",
            nullable.len(),
            primes.len(),
            orphans.len(),
            self.len(),
            result.len()
        );
        result
    }

    /// Remove unit rules `A -> B`.
    ///
    /// Each unit rule is replaced by `A -> γ` for every non-unit rule
    /// `C -> γ` where `C` can be reached from `B` through unit rules alone.
    /// Self-loops `A -> A` are dropped, and cycles of unit rules resolve
    /// since the reachable set is finite.
    pub fn remove_unit_rules(&self) -> Grammar {
        let split = self.split_choices();
        let mut rules = Vec::new();
        for rule in split.rules() {
            if rule.is_self_loop() {
                continue;
            }
            let target = match rule.rhs().as_nonterminal() {
                Some(target) => target,
                None => {
                    rules.push(rule.clone());
                    continue;
                }
            };
            for source in unit_reachable(&split, target) {
                for inlined in split.rules_for(source) {
                    if !inlined.is_unit() {
                        rules.push(Rule::new(rule.lhs().clone(), inlined.rhs().clone()));
                    }
                }
            }
        }
        let result = Grammar::rooted(split.start_symbol(), rules);
        debug!("remove_unit_rules: {} -> {} rules", self.len(), result.len());
        result
    }

    /// Remove non-productive rules and unreachable nonterminals.
    ///
    /// Expects a grammar without choices, as produced by `split_choices`. A
    /// rule with a choice is only kept if every alternative is productive.
    pub fn clean(&self) -> Grammar {
        self.remove_non_productive_rules()
            .remove_unreachable_nonterminals()
    }

    /// Remove rules that cannot derive a string of terminals.
    ///
    /// A rule is productive if every atom on its right-hand side is a
    /// terminal, the empty string, or a nonterminal with a productive rule.
    pub fn remove_non_productive_rules(&self) -> Grammar {
        let productive: IndexSet<&Rule> = closure(IndexSet::new(), |known, _| {
            let heads: HashSet<&NonTerminal> = known.iter().map(|r| r.lhs()).collect();
            self.rules()
                .filter(|rule| {
                    rule.rhs().atoms().into_iter().all(|atom| match atom.as_nonterminal() {
                        Some(nt) => heads.contains(nt),
                        None => true,
                    })
                })
                .collect::<Vec<_>>()
        });
        let result = Grammar::rooted(
            self.start_symbol(),
            self.rules().filter(|r| productive.contains(r)).cloned(),
        );
        debug!(
            "remove_non_productive_rules: {} -> {} rules",
            self.len(),
            result.len()
        );
        result
    }

    /// Remove the rules of nonterminals not reachable from the start symbol.
    pub fn remove_unreachable_nonterminals(&self) -> Grammar {
        let start = match self.start_symbol() {
            Some(start) => start,
            None => return Grammar::empty(),
        };
        let mut seed = IndexSet::new();
        seed.insert(start);
        let reachable = closure(seed, |_, new| {
            new.iter()
                .flat_map(|nt| self.rules_for(nt))
                .flat_map(|rule| rule.nonterminals())
                .collect::<Vec<_>>()
        });
        let result = Grammar::new(
            self.rules()
                .filter(|r| reachable.contains(r.lhs()))
                .cloned(),
        );
        debug!(
            "remove_unreachable_nonterminals: {} reachable, {} -> {} rules",
            reachable.len(),
            self.len(),
            result.len()
        );
        result
    }

    /// Break sequences down into pairs of nonterminals.
    ///
    /// Terminals inside a sequence are replaced by fresh nonterminals `Tk`
    /// with a rule `Tk -> t`. Sequences longer than two are folded from the
    /// left through fresh nonterminals `Nk`, so `A -> X Y Z` becomes
    /// `N1 -> X Y` and `A -> N1 Z`. Fresh names skip any index already in
    /// use by the grammar.
    pub fn binarize(&self) -> Grammar {
        let mut ctx = Binarizer::new(self);
        for rule in self.rules() {
            ctx.binarize_rule(rule);
        }
        debug!(
            "binarize: {} terminals and {} folds introduced, {} -> {} rules",
            ctx.terminals,
            ctx.folds,
            self.len(),
            ctx.rules.len()
        );
        Grammar::rooted(self.start_symbol(), ctx.rules)
    }
}

/// Find the nonterminals that can derive the empty string.
fn nullable_nonterminals(grammar: &Grammar) -> IndexSet<NonTerminal> {
    let seed = grammar
        .rules()
        .filter(|r| r.is_epsilon())
        .map(|r| r.lhs().clone())
        .collect();
    closure(seed, |known, _| {
        grammar
            .rules()
            .filter(|rule| {
                rule.rhs().atoms().into_iter().all(|atom| match *atom {
                    Symbol::Empty => true,
                    Symbol::NonTerminal(ref nt) => known.contains(nt),
                    _ => false,
                })
            })
            .map(|rule| rule.lhs().clone())
            .collect::<Vec<_>>()
    })
}

/// Rewrite a rule such that each nullable item may be left out.
///
/// Emits one rule per subset of nullable positions removed, with the
/// remaining nullable items replaced by their primed counterpart.
fn expand_optional(
    rule: &Rule,
    nullable: &IndexSet<NonTerminal>,
    names: &mut Names,
    primes: &mut IndexMap<NonTerminal, NonTerminal>,
    into: &mut Vec<Rule>,
) {
    let items = rule.rhs().items();
    let optional: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|&(_, item)| match item.as_nonterminal() {
            Some(nt) => nullable.contains(nt),
            None => false,
        })
        .map(|(index, _)| index)
        .collect();
    if optional.is_empty() {
        into.push(rule.clone());
        return;
    }

    let mut replaced = Vec::with_capacity(items.len());
    for item in items {
        match item.as_nonterminal() {
            Some(nt) if nullable.contains(nt) => {
                let primed = primes
                    .entry(nt.clone())
                    .or_insert_with(|| names.primed(nt))
                    .clone();
                replaced.push(Symbol::NonTerminal(primed));
            }
            _ => replaced.push(item.clone()),
        }
    }

    for mask in 0..(1usize << optional.len()) {
        let kept = replaced.iter().enumerate().filter(|&(index, _)| {
            match optional.iter().position(|&o| o == index) {
                Some(bit) => mask & (1 << bit) == 0,
                None => true,
            }
        });
        into.push(Rule::new(
            rule.lhs().clone(),
            Symbol::sequence(kept.map(|(_, item)| item.clone())),
        ));
    }
}

/// Find the primed nonterminals without a rule that avoids other orphans.
fn orphaned_primes<'a, I>(rules: &[Rule], primes: I) -> IndexSet<NonTerminal>
where
    I: IntoIterator<Item = &'a NonTerminal>,
{
    let primes: Vec<&NonTerminal> = primes.into_iter().collect();
    let seed = primes
        .iter()
        .filter(|&&p| !rules.iter().any(|r| r.is_for(p)))
        .map(|&p| p.clone())
        .collect();
    closure(seed, |known, _| {
        primes
            .iter()
            .filter(|&&p| {
                rules.iter().filter(|r| r.is_for(p)).all(|r| {
                    known
                        .iter()
                        .any(|o| r.mentions(&Symbol::NonTerminal(o.clone())))
                })
            })
            .map(|&p| p.clone())
            .collect::<Vec<_>>()
    })
}

/// Find the nonterminals reachable from `target` through unit rules only.
fn unit_reachable<'a>(grammar: &'a Grammar, target: &'a NonTerminal) -> IndexSet<&'a NonTerminal> {
    let mut seed = IndexSet::new();
    seed.insert(target);
    closure(seed, |_, new| {
        new.iter()
            .flat_map(|nt| grammar.rules_for(nt))
            .filter_map(|rule| rule.rhs().as_nonterminal())
            .collect::<Vec<_>>()
    })
}

/// Context for binarizing a grammar.
struct Binarizer {
    names: Names,
    terminals: usize,
    folds: usize,
    rules: Vec<Rule>,
}

impl Binarizer {
    fn new(grammar: &Grammar) -> Binarizer {
        Binarizer {
            names: Names::from_grammar(grammar),
            terminals: 0,
            folds: 0,
            rules: Vec::new(),
        }
    }

    fn binarize_rule(&mut self, rule: &Rule) {
        let items = match *rule.rhs() {
            Symbol::Sequence(ref seq) => seq.items(),
            _ => {
                self.rules.push(rule.clone());
                return;
            }
        };
        let items: Vec<Symbol> = items.iter().map(|item| self.lift_terminal(item)).collect();
        let (last, init) = match items.split_last() {
            Some(split) => split,
            None => return,
        };
        let mut acc = init[0].clone();
        for item in &init[1..] {
            let fold = self.names.numbered("N", &mut self.folds);
            self.rules.push(Rule::new(
                fold.clone(),
                Symbol::sequence(vec![acc, item.clone()]),
            ));
            acc = Symbol::NonTerminal(fold);
        }
        self.rules.push(Rule::new(
            rule.lhs().clone(),
            Symbol::sequence(vec![acc, last.clone()]),
        ));
    }

    /// Replace a terminal by a fresh nonterminal deriving it.
    fn lift_terminal(&mut self, item: &Symbol) -> Symbol {
        match *item {
            Symbol::Terminal(_) => {
                let name = self.names.numbered("T", &mut self.terminals);
                self.rules.push(Rule::new(name.clone(), item.clone()));
                Symbol::NonTerminal(name)
            }
            _ => item.clone(),
        }
    }
}
