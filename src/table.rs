// Copyright (c) 2018 Fabian Schuiki

//! Predictive parsing table construction.
//!
//! The parsing table maps a (nonterminal, lookahead terminal) pair to the
//! production to expand. A production is entered under every terminal that
//! can begin it; a fully nullable production is additionally entered under
//! every terminal in its nonterminal's follow set. If two different
//! productions land in the same cell the grammar is not LL(1); every such
//! collision is recorded as a conflict and the first entry is kept, so that
//! all conflicts of a grammar can be reported together.

use std::fmt;

use first::FirstSets;
use follow::FollowSets;
use grammar::{Grammar, NonterminalId, RuleId, TerminalId};
use Pretty;

/// A predictive parsing table.
///
/// Built once per grammar and reusable across any number of parses. Cells
/// are stored densely, indexed by nonterminal and terminal ID, which also
/// makes construction deterministic: building the table twice from the same
/// grammar yields identical cells and identical conflicts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTable {
    cells: Vec<Option<RuleId>>,
    term_bound: usize,
    conflicts: Vec<Conflict>,
}

/// A collision between two productions in one table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict {
    /// The nonterminal of the contested cell.
    pub nonterminal: NonterminalId,
    /// The lookahead terminal of the contested cell.
    pub lookahead: TerminalId,
    /// The rule that occupies the cell.
    pub kept: RuleId,
    /// The rule that was rejected.
    pub rejected: RuleId,
}

impl ParseTable {
    /// Build the predictive parsing table for a grammar.
    pub fn build(grammar: &Grammar, first: &FirstSets, follow: &FollowSets) -> ParseTable {
        let term_bound = grammar.terminal_id_bound();
        let mut table = ParseTable {
            cells: vec![None; grammar.nonterminal_id_bound() * term_bound],
            term_bound: term_bound,
            conflicts: Vec::new(),
        };

        for nt in 0..grammar.nonterminal_id_bound() {
            let nt = NonterminalId::from_usize(nt);
            for &rule_id in grammar.rules_for_nonterminal(nt) {
                let fs = first.of_sequence(grammar.rule(rule_id).symbols());
                for t in fs.terminals() {
                    table.insert(nt, t, rule_id);
                }
                // A nullable production is chosen on every terminal that may
                // follow the nonterminal, including `$`.
                if fs.has_epsilon() {
                    for t in follow.nonterminal(nt).terminals() {
                        table.insert(nt, t, rule_id);
                    }
                }
            }
        }

        debug!(
            "built parse table with {} cells, {} conflicts",
            table.cells.iter().filter(|c| c.is_some()).count(),
            table.conflicts.len()
        );
        table
    }

    /// Write a rule into a cell, recording a conflict if a different rule
    /// already occupies it. The first writer wins.
    fn insert(&mut self, nt: NonterminalId, t: TerminalId, rule: RuleId) {
        let index = nt.as_usize() * self.term_bound + t.as_usize();
        match self.cells[index] {
            Some(kept) if kept != rule => {
                self.conflicts.push(Conflict {
                    nonterminal: nt,
                    lookahead: t,
                    kept: kept,
                    rejected: rule,
                });
            }
            Some(_) => (),
            None => self.cells[index] = Some(rule),
        }
    }

    /// Get the rule to expand for a nonterminal under a lookahead terminal.
    pub fn get(&self, nt: NonterminalId, t: TerminalId) -> Option<RuleId> {
        self.cells[nt.as_usize() * self.term_bound + t.as_usize()]
    }

    /// The conflicts recorded during construction.
    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    /// Whether the grammar is LL(1), i.e. no conflicts were recorded.
    pub fn is_ll1(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Get a pretty printer for this table.
    pub fn pretty<'a>(&'a self, grammar: &'a Grammar) -> Pretty<&'a Grammar, &'a Self> {
        Pretty::new(grammar, self)
    }
}

impl Conflict {
    /// Get a pretty printer for this conflict.
    pub fn pretty<'a>(&'a self, grammar: &'a Grammar) -> Pretty<&'a Grammar, &'a Self> {
        Pretty::new(grammar, self)
    }
}

impl<'a> fmt::Display for Pretty<&'a Grammar, &'a ParseTable> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for nt in 0..self.ctx.nonterminal_id_bound() {
            let nt = NonterminalId::from_usize(nt);
            for t in 0..self.ctx.terminal_id_bound() {
                let t = TerminalId::from_usize(t);
                if let Some(rule) = self.item.get(nt, t) {
                    if !first {
                        write!(f, "\n")?;
                    }
                    first = false;
                    write!(
                        f,
                        "[{}, {}] {}",
                        nt.pretty(self.ctx),
                        t.pretty(self.ctx),
                        self.ctx.rule(rule).pretty(self.ctx)
                    )?;
                }
            }
        }
        Ok(())
    }
}

impl<'a> fmt::Display for Pretty<&'a Grammar, &'a Conflict> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "conflict in cell [{}, {}] between `{}` and `{}`",
            self.item.nonterminal.pretty(self.ctx),
            self.item.lookahead.pretty(self.ctx),
            self.ctx.rule(self.item.kept).pretty(self.ctx),
            self.ctx.rule(self.item.rejected).pretty(self.ctx)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grammar::{Grammar, RuleId, END};
    use parser::parse_grammar;

    fn analyze(text: &str) -> (Grammar, ParseTable) {
        let g = parse_grammar(text).unwrap();
        let first = ::first::FirstSets::compute(&g);
        let follow = ::follow::FollowSets::compute(&g, &first);
        let table = ParseTable::build(&g, &first, &follow);
        (g, table)
    }

    #[test]
    fn simple() {
        let (g, table) = analyze("S -> a A\nA -> b A | ε\n");
        assert!(table.is_ll1());
        let s = g.nonterminal_id("S").unwrap();
        let a = g.nonterminal_id("A").unwrap();
        let ta = g.terminal_id("a").unwrap();
        let tb = g.terminal_id("b").unwrap();
        assert_eq!(table.get(s, ta), Some(RuleId::from_usize(0)));
        assert_eq!(table.get(a, tb), Some(RuleId::from_usize(1)));
        assert_eq!(table.get(a, END), Some(RuleId::from_usize(2)));
        assert_eq!(table.get(s, tb), None);
        assert_eq!(table.get(s, END), None);
        assert_eq!(table.get(a, ta), None);
    }

    #[test]
    fn left_recursive_conflict() {
        let (g, table) = analyze("E -> E + T | T\nT -> x\n");
        assert!(!table.is_ll1());
        assert!(!table.conflicts().is_empty());
        // Both productions of E start with x, so the cell [E, x] is
        // contested and the first writer is kept.
        let e = g.nonterminal_id("E").unwrap();
        let x = g.terminal_id("x").unwrap();
        let c = table.conflicts()[0];
        assert_eq!(c.nonterminal, e);
        assert_eq!(c.lookahead, x);
        assert_eq!(table.get(e, x), Some(c.kept));
        assert_eq!(c.kept, RuleId::from_usize(0));
        assert_eq!(c.rejected, RuleId::from_usize(1));
    }

    #[test]
    fn same_rule_twice_is_no_conflict() {
        // FIRST(A -> B) = {a, ε} and FOLLOW(A) = {a}, so the cell [A, a]
        // receives the same rule once via FIRST and once via FOLLOW. That is
        // not a conflict; the only genuine conflict here is [B, a].
        let (g, table) = analyze("S -> A a\nA -> B\nB -> a | ε\n");
        let b = g.nonterminal_id("B").unwrap();
        assert_eq!(table.conflicts().len(), 1);
        assert_eq!(table.conflicts()[0].nonterminal, b);
    }

    #[test]
    fn determinism() {
        let text = "E -> E + T | T\nT -> x\n";
        let (_, table1) = analyze(text);
        let (_, table2) = analyze(text);
        assert_eq!(table1, table2);
    }

    #[test]
    fn expression_grammar_is_ll1() {
        let (_, table) = analyze(
            "E -> T E'\nE' -> + T E' | ε\nT -> F T'\nT' -> * F T' | ε\nF -> ( E ) | id\n",
        );
        assert!(table.is_ll1());
    }
}
