// Copyright (c) 2018 Fabian Schuiki

//! Follow set computation.
//!
//! The follow set of a nonterminal holds every terminal that can appear
//! immediately after it in some derivation from the start symbol, plus the
//! end of input marker `$` where the nonterminal can end such a derivation.
//! Follow sets depend on each other across productions, so they are grown
//! by repeated passes over all rules until a full pass changes nothing.

use std::fmt;
use std::iter::repeat;

use bit_set::BitSet;

use first::FirstSets;
use grammar::{Grammar, NonterminalId, Symbol, TerminalId, END};
use Pretty;

/// All follow sets of a grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowSets(Vec<FollowSet>);

/// The follow set of a nonterminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowSet {
    /// The following terminals, by ID. May contain `END`.
    symbols: BitSet,
}

impl FollowSets {
    /// Compute the follow sets of a grammar.
    ///
    /// Seeds the start symbol's follow set with `$`, then applies the two
    /// propagation rules until stable: for every occurrence `B -> α A β`,
    /// the follow set of `A` receives the first set of `β`; and if `β` is
    /// fully nullable (or empty), it also receives the follow set of `B`.
    pub fn compute(grammar: &Grammar, first: &FirstSets) -> FollowSets {
        let num_term = grammar.terminal_id_bound();
        let num_nonterm = grammar.nonterminal_id_bound();
        let mut sets: Vec<BitSet> = repeat(BitSet::with_capacity(num_term))
            .take(num_nonterm)
            .collect();

        if let Some(start) = grammar.start_symbol() {
            sets[start.as_usize()].insert(END.as_usize());
        }

        let mut passes = 0;
        loop {
            passes += 1;
            let mut changed = false;
            for rule in grammar.rules() {
                let lhs = rule.name().as_usize();
                let symbols = rule.symbols();
                for i in 0..symbols.len() {
                    let id = match symbols[i] {
                        Symbol::Nonterminal(id) => id.as_usize(),
                        Symbol::Terminal(_) => continue,
                    };
                    let tail = first.of_sequence(&symbols[i + 1..]);
                    let before = sets[id].len();
                    sets[id].union_with(&tail.symbols);
                    if tail.has_epsilon() {
                        let lhs_follow = sets[lhs].clone();
                        sets[id].union_with(&lhs_follow);
                    }
                    if sets[id].len() != before {
                        changed = true;
                    }
                }
            }
            if !changed {
                break;
            }
        }
        debug!("follow sets stable after {} passes", passes);

        FollowSets(sets.into_iter().map(|s| FollowSet { symbols: s }).collect())
    }

    /// Get the follow set of a nonterminal.
    pub fn nonterminal(&self, id: NonterminalId) -> &FollowSet {
        &self.0[id.as_usize()]
    }

    /// Get a pretty printer for these sets.
    pub fn pretty<'a>(&'a self, grammar: &'a Grammar) -> Pretty<&'a Grammar, &'a Self> {
        Pretty::new(grammar, self)
    }
}

impl FollowSet {
    /// Whether a terminal (or `END`) is in the set.
    pub fn contains(&self, id: TerminalId) -> bool {
        self.symbols.contains(id.as_usize())
    }

    /// Iterate over the terminals in the set, in ID order.
    ///
    /// `END` has the lowest ID, so where present it comes first.
    pub fn terminals<'a>(&'a self) -> Box<Iterator<Item = TerminalId> + 'a> {
        Box::new(self.symbols.iter().map(TerminalId::from_usize))
    }
}

impl<'a> fmt::Display for Pretty<&'a Grammar, &'a FollowSets> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for i in 0..self.item.0.len() {
            if i > 0 {
                write!(f, "\n")?;
            }
            let id = NonterminalId::from_usize(i);
            write!(f, "FOLLOW({}) = {{", id.pretty(self.ctx))?;
            for t in self.item.0[i].terminals() {
                write!(f, " {}", t.pretty(self.ctx))?;
            }
            write!(f, " }}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grammar::{Grammar, END};
    use parser::parse_grammar;

    fn follow_names(grammar: &Grammar, fs: &FollowSets, name: &str) -> Vec<String> {
        fs.nonterminal(grammar.nonterminal_id(name).unwrap())
            .terminals()
            .map(|t| grammar.terminal_name(t).to_string())
            .collect()
    }

    fn analyze(text: &str) -> (Grammar, FollowSets) {
        let g = parse_grammar(text).unwrap();
        let first = ::first::FirstSets::compute(&g);
        let follow = FollowSets::compute(&g, &first);
        (g, follow)
    }

    #[test]
    fn simple() {
        let (g, follow) = analyze("S -> a A\nA -> b A | ε\n");
        assert_eq!(follow_names(&g, &follow, "S"), vec!["$"]);
        assert_eq!(follow_names(&g, &follow, "A"), vec!["$"]);
    }

    #[test]
    fn end_marker_in_start_follow() {
        let (g, follow) = analyze("S -> a\n");
        let s = g.nonterminal_id("S").unwrap();
        assert!(follow.nonterminal(s).contains(END));
    }

    #[test]
    fn expression_grammar() {
        let (g, follow) = analyze(
            "E -> T E'\nE' -> + T E' | ε\nT -> F T'\nT' -> * F T' | ε\nF -> ( E ) | id\n",
        );
        // Terminal IDs are assigned in rule order: + * ( ) id, END first.
        assert_eq!(follow_names(&g, &follow, "E"), vec!["$", ")"]);
        assert_eq!(follow_names(&g, &follow, "E'"), vec!["$", ")"]);
        assert_eq!(follow_names(&g, &follow, "T"), vec!["$", "+", ")"]);
        assert_eq!(follow_names(&g, &follow, "T'"), vec!["$", "+", ")"]);
        assert_eq!(follow_names(&g, &follow, "F"), vec!["$", "+", "*", ")"]);
    }

    #[test]
    fn nullable_tail_propagates_lhs_follow() {
        // B is followed by the nullable C, so FOLLOW(B) picks up FOLLOW(A)
        // as well as FIRST(C).
        let (g, follow) = analyze("A -> a B C\nB -> b\nC -> c | ε\n");
        let mut names = follow_names(&g, &follow, "B");
        names.sort();
        assert_eq!(names, vec!["$", "c"]);
    }
}
