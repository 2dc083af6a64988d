// Copyright (c) 2018 Fabian Schuiki

//! The table-driven predictive parsing machine.
//!
//! The machine owns nothing but borrows a grammar and its parsing table; a
//! single machine can run any number of independent parses, each with its
//! own stack, input cursor, and derivation. A parse performs a leftmost
//! derivation: the stack starts out as `[$, start]`, nonterminals on top are
//! expanded through the table, terminals on top must match the lookahead.

use std::error::Error;
use std::fmt;

use grammar::{Grammar, NonterminalId, RuleId, Symbol, TerminalId, END};
use table::ParseTable;
use Pretty;

/// A predictive parser for a grammar and its parsing table.
///
/// The table must be conflict-free; a parse driven by a conflicted table
/// follows the first-writer cells and silently ignores the alternatives, so
/// callers are expected to check `ParseTable::is_ll1` beforehand.
pub struct Machine<'a> {
    grammar: &'a Grammar,
    table: &'a ParseTable,
}

/// The leftmost derivation produced by a successful parse.
///
/// One `(nonterminal, rule)` entry per expansion, in the order the
/// expansions were applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Derivation {
    steps: Vec<(NonterminalId, RuleId)>,
}

/// An error emitted when a parse fails.
///
/// Each variant names the symbols involved and the input position (an index
/// into the input sequence; the position one past the last symbol denotes
/// the `$` end marker) at which the parse stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A nonterminal on top of the stack has no table entry for the current
    /// lookahead.
    UnexpectedToken {
        /// The nonterminal that could not be expanded.
        nonterminal: String,
        /// The offending lookahead symbol.
        found: String,
        /// The input position of the lookahead.
        position: usize,
    },
    /// The terminal on top of the stack differs from the current lookahead.
    TerminalMismatch {
        /// The terminal the parser expected.
        expected: String,
        /// The symbol actually found.
        found: String,
        /// The input position of the lookahead.
        position: usize,
    },
    /// The stack emptied before the input (including the end marker) was
    /// fully consumed.
    IncompleteParse {
        /// The input position at which parsing stopped.
        position: usize,
    },
}

impl<'a> Machine<'a> {
    /// Create a new machine for a grammar and its parsing table.
    pub fn new(grammar: &'a Grammar, table: &'a ParseTable) -> Machine<'a> {
        Machine {
            grammar: grammar,
            table: table,
        }
    }

    /// Parse a sequence of input terminals starting from a nonterminal.
    ///
    /// The input carries no end marker; the machine appends `$` itself.
    /// Returns the derivation applied, or the first error encountered.
    pub fn parse(
        &self,
        start: NonterminalId,
        input: &[TerminalId],
    ) -> Result<Derivation, ParseError> {
        let mut stack = vec![Symbol::Terminal(END), Symbol::Nonterminal(start)];
        let mut cursor = 0;
        let mut steps = Vec::new();

        while let Some(top) = stack.pop() {
            let lookahead = if cursor < input.len() {
                input[cursor]
            } else {
                END
            };
            match top {
                Symbol::Nonterminal(nt) => match self.table.get(nt, lookahead) {
                    Some(rule_id) => {
                        trace!("expand {}", self.grammar.rule(rule_id).pretty(self.grammar));
                        steps.push((nt, rule_id));
                        // Push the production reversed so its leftmost symbol
                        // ends up on top. The ε production pushes nothing.
                        for &symbol in self.grammar.rule(rule_id).symbols().iter().rev() {
                            stack.push(symbol);
                        }
                    }
                    None => {
                        return Err(ParseError::UnexpectedToken {
                            nonterminal: self.grammar.nonterminal_name(nt).to_string(),
                            found: self.grammar.terminal_name(lookahead).to_string(),
                            position: cursor,
                        })
                    }
                },
                Symbol::Terminal(t) => {
                    if t == lookahead {
                        cursor += 1;
                    } else {
                        return Err(ParseError::TerminalMismatch {
                            expected: self.grammar.terminal_name(t).to_string(),
                            found: self.grammar.terminal_name(lookahead).to_string(),
                            position: cursor,
                        });
                    }
                }
            }
        }

        // The `$` sentinel sits at the bottom of the stack, so by now the
        // cursor should have moved exactly one past the input.
        if cursor == input.len() + 1 {
            Ok(Derivation { steps: steps })
        } else {
            Err(ParseError::IncompleteParse { position: cursor })
        }
    }
}

impl Derivation {
    /// The expansion steps of this derivation, in application order.
    pub fn steps(&self) -> &[(NonterminalId, RuleId)] {
        &self.steps
    }

    /// Get a pretty printer for this derivation.
    pub fn pretty<'a>(&'a self, grammar: &'a Grammar) -> Pretty<&'a Grammar, &'a Self> {
        Pretty::new(grammar, self)
    }
}

impl<'a> fmt::Display for Pretty<&'a Grammar, &'a Derivation> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (index, &(_, rule)) in self.item.steps.iter().enumerate() {
            if index > 0 {
                write!(f, "\n")?;
            }
            write!(f, "{}", self.ctx.rule(rule).pretty(self.ctx))?;
        }
        Ok(())
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ParseError::UnexpectedToken {
                ref nonterminal,
                ref found,
                position,
            } => write!(
                f,
                "no rule to expand `{}` on `{}` at position {}",
                nonterminal, found, position
            ),
            ParseError::TerminalMismatch {
                ref expected,
                ref found,
                position,
            } => write!(
                f,
                "expected `{}` but found `{}` at position {}",
                expected, found, position
            ),
            ParseError::IncompleteParse { position } => {
                write!(f, "input not fully consumed at position {}", position)
            }
        }
    }
}

impl Error for ParseError {
    fn description(&self) -> &str {
        "parse error"
    }
}
