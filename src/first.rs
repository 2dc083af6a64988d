// Copyright (c) 2018 Fabian Schuiki

//! First set computation.
//!
//! This module implements computation of the first sets for a grammar. The
//! first set of a nonterminal holds all terminals that can begin a string
//! derived from it, plus an epsilon flag if it can derive the empty string.
//! Since productions may start with other nonterminals, and nonterminals may
//! be (mutually) recursive, the sets are grown iteratively to a fixed point
//! rather than computed by recursion.

use std::fmt;
use std::iter::repeat;
use std::mem::swap;

use bit_set::BitSet;

use grammar::{Grammar, NonterminalId, Symbol, TerminalId};
use Pretty;

/// All first sets of a grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstSets(Vec<FirstSet>);

/// The first set of a nonterminal or of a sequence of symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstSet {
    /// The first terminals, by ID.
    pub(crate) symbols: BitSet,
    /// Whether the empty string is derivable.
    pub(crate) has_epsilon: bool,
}

impl FirstSets {
    /// Compute the first sets of a grammar.
    pub fn compute(grammar: &Grammar) -> FirstSets {
        compute(grammar)
    }

    /// Get the first set of a nonterminal.
    pub fn nonterminal(&self, id: NonterminalId) -> &FirstSet {
        &self.0[id.as_usize()]
    }

    /// Compute the first set of a sequence of symbols.
    ///
    /// Accumulates the first sets of the sequence's symbols from the left,
    /// continuing past a symbol only while that symbol is nullable. The
    /// result has the epsilon flag set iff every symbol in the sequence is
    /// nullable; in particular the empty sequence yields `{ε}`.
    pub fn of_sequence(&self, symbols: &[Symbol]) -> FirstSet {
        let mut set = FirstSet {
            symbols: BitSet::new(),
            has_epsilon: false,
        };
        let mut tight = false;
        for symbol in symbols {
            match *symbol {
                Symbol::Terminal(id) => {
                    set.symbols.insert(id.as_usize());
                    tight = true;
                }
                Symbol::Nonterminal(id) => {
                    let fs = self.nonterminal(id);
                    set.symbols.union_with(&fs.symbols);
                    tight = !fs.has_epsilon;
                }
            }
            if tight {
                break;
            }
        }
        set.has_epsilon = !tight;
        set
    }

    /// Get a pretty printer for these sets.
    pub fn pretty<'a>(&'a self, grammar: &'a Grammar) -> Pretty<&'a Grammar, &'a Self> {
        Pretty::new(grammar, self)
    }
}

impl FirstSet {
    /// Whether a terminal is in the set.
    pub fn contains(&self, id: TerminalId) -> bool {
        self.symbols.contains(id.as_usize())
    }

    /// Whether the empty string is derivable.
    pub fn has_epsilon(&self) -> bool {
        self.has_epsilon
    }

    /// Iterate over the terminals in the set, in ID order.
    pub fn terminals<'a>(&'a self) -> Box<Iterator<Item = TerminalId> + 'a> {
        Box::new(self.symbols.iter().map(TerminalId::from_usize))
    }
}

/// The meat of this module. Computes the first set for each nonterminal.
///
/// Keeps a set of nonterminals whose first set may still change. Whenever a
/// set grows, every nonterminal whose productions mention the grown one is
/// scheduled for another round. The loop terminates because the sets only
/// ever grow and are bounded by the terminal count.
fn compute(grammar: &Grammar) -> FirstSets {
    let num_term = grammar.terminal_id_bound();
    let num_nonterm = grammar.nonterminal_id_bound();

    // Determine the set of nonterminals to be updated.
    let mut update = BitSet::with_capacity(num_nonterm);
    let mut next_update = BitSet::with_capacity(num_nonterm);
    for rule in grammar.rules() {
        update.insert(rule.name().as_usize());
    }

    // Create the initial empty first sets. These will be populated in the
    // main loop.
    let mut fs = FirstSets(
        repeat(FirstSet {
            symbols: BitSet::with_capacity(num_term),
            has_epsilon: false,
        }).take(num_nonterm)
            .collect(),
    );

    // Create a list to keep track of dependencies between the nonterminals.
    let mut deps: Vec<BitSet> = repeat(BitSet::with_capacity(num_nonterm))
        .take(num_nonterm)
        .collect();

    // This is the main update loop which processes nonterminals in sets.
    let mut passes = 0;
    while !update.is_empty() {
        passes += 1;
        for current in update.iter() {
            let mut new_fs = fs.0[current].clone();

            // Update the first set and dependencies.
            for &rule_id in grammar.rules_for_nonterminal(NonterminalId::from_usize(current)) {
                let mut tight = false;
                for symbol in grammar.rule(rule_id).symbols() {
                    match *symbol {
                        Symbol::Terminal(id) => {
                            new_fs.symbols.insert(id.as_usize());
                            tight = true;
                        }
                        Symbol::Nonterminal(id) => {
                            deps[id.as_usize()].insert(current);
                            new_fs.symbols.union_with(&fs.0[id.as_usize()].symbols);
                            tight = !fs.0[id.as_usize()].has_epsilon;
                        }
                    }
                    if tight {
                        break;
                    }
                }
                new_fs.has_epsilon |= !tight;
            }

            // If the first set has changed, trigger an update of everything
            // that depends on us.
            if new_fs != fs.0[current] {
                next_update.union_with(&deps[current]);
                fs.0[current] = new_fs;
            }
        }

        // If we've cleared the update set, swap in the next update set.
        swap(&mut update, &mut next_update);
        next_update.clear();
    }
    debug!("first sets stable after {} passes", passes);

    fs
}

impl<'a> fmt::Display for Pretty<&'a Grammar, &'a FirstSets> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for i in 0..self.item.0.len() {
            if i > 0 {
                write!(f, "\n")?;
            }
            let id = NonterminalId::from_usize(i);
            write!(f, "FIRST({}) = {{", id.pretty(self.ctx))?;
            for t in self.item.0[i].terminals() {
                write!(f, " {}", t.pretty(self.ctx))?;
            }
            if self.item.0[i].has_epsilon {
                write!(f, " ε")?;
            }
            write!(f, " }}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grammar::Grammar;
    use parser::parse_grammar;

    fn first_names(grammar: &Grammar, fs: &FirstSets, name: &str) -> (Vec<String>, bool) {
        let set = fs.nonterminal(grammar.nonterminal_id(name).unwrap());
        let names = set.terminals()
            .map(|t| grammar.terminal_name(t).to_string())
            .collect();
        (names, set.has_epsilon())
    }

    #[test]
    fn simple() {
        let g = parse_grammar("S -> a A\nA -> b A | ε\n").unwrap();
        let fs = FirstSets::compute(&g);
        assert_eq!(first_names(&g, &fs, "S"), (vec!["a".to_string()], false));
        assert_eq!(first_names(&g, &fs, "A"), (vec!["b".to_string()], true));
    }

    #[test]
    fn left_recursion_terminates() {
        let g = parse_grammar("A -> A b | c\n").unwrap();
        let fs = FirstSets::compute(&g);
        assert_eq!(first_names(&g, &fs, "A"), (vec!["c".to_string()], false));
    }

    #[test]
    fn nullable_chain() {
        // S is nullable only through both A and B.
        let g = parse_grammar("S -> A B\nA -> a | ε\nB -> b | ε\n").unwrap();
        let fs = FirstSets::compute(&g);
        let (names, eps) = first_names(&g, &fs, "S");
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
        assert!(eps);
    }

    #[test]
    fn expression_grammar() {
        let g = parse_grammar(
            "E -> T E'\nE' -> + T E' | ε\nT -> F T'\nT' -> * F T' | ε\nF -> ( E ) | id\n",
        ).unwrap();
        let fs = FirstSets::compute(&g);
        for name in &["E", "T", "F"] {
            let (names, eps) = first_names(&g, &fs, name);
            assert_eq!(names, vec!["(".to_string(), "id".to_string()]);
            assert!(!eps);
        }
        assert_eq!(first_names(&g, &fs, "E'"), (vec!["+".to_string()], true));
        assert_eq!(first_names(&g, &fs, "T'"), (vec!["*".to_string()], true));
    }

    #[test]
    fn sequence_first() {
        let g = parse_grammar("S -> A B c\nA -> a | ε\nB -> b | ε\n").unwrap();
        let fs = FirstSets::compute(&g);
        let s = g.nonterminal_id("S").unwrap();
        let rule = g.rule(*g.rules_for_nonterminal(s).next().unwrap());
        let seq = fs.of_sequence(rule.symbols());
        // A and B are nullable but the trailing c is not.
        assert!(seq.contains(g.terminal_id("a").unwrap()));
        assert!(seq.contains(g.terminal_id("b").unwrap()));
        assert!(seq.contains(g.terminal_id("c").unwrap()));
        assert!(!seq.has_epsilon());
        // The empty sequence yields epsilon alone.
        let empty = fs.of_sequence(&[]);
        assert!(empty.has_epsilon());
        assert_eq!(empty.terminals().count(), 0);
    }
}
