// Copyright (c) 2018 Fabian Schuiki

//! A parser for grammar descriptions.
//!
//! Grammar descriptions are line based. Every non-blank line declares the
//! alternatives of one nonterminal:
//!
//! ```text
//! LHS -> SYM SYM ... | SYM ... | ε
//! ```
//!
//! Symbols within an alternative are separated by whitespace; a bare `ε`
//! denotes the empty alternative. Names that appear on the left of some `->`
//! are nonterminals, every other name is a terminal. The first LHS in the
//! description is the start symbol. Declaring the same LHS again replaces
//! its earlier alternatives.

use std::error::Error;
use std::fmt;

use indexmap::IndexMap;

use grammar::{Grammar, Rule, Symbol};

/// The name of the empty alternative in grammar descriptions.
const EPSILON: &'static str = "ε";

/// The reserved end of input marker.
const END_MARKER: &'static str = "$";

/// The abstract syntax tree of a grammar description.
pub mod ast {
    /// The root node of a grammar description.
    #[derive(Debug, PartialEq, Eq)]
    pub struct Desc {
        /// The rule declarations, in description order.
        pub rules: Vec<RuleDecl>,
    }

    /// A rule declaration.
    #[derive(Debug, PartialEq, Eq)]
    pub struct RuleDecl {
        /// The name of the rule.
        pub name: String,
        /// The different variants of the rule. An empty variant is the ε
        /// alternative.
        pub variants: Vec<Vec<String>>,
    }
}

/// An error emitted for a malformed grammar description.
///
/// Every variant carries the 1-based line number of the offending rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// A non-blank line contains no `->` separator.
    MissingArrow(usize),
    /// The left-hand side of a rule is empty or not a single symbol.
    InvalidLhs(usize),
    /// The reserved end of input marker `$` appears as a grammar symbol.
    ReservedEndMarker(usize),
    /// `ε` appears alongside other symbols in one alternative.
    MixedEpsilon(usize),
    /// An alternative contains no symbols at all.
    EmptyAlternative(usize),
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            GrammarError::MissingArrow(line) => {
                write!(f, "line {}: rule has no `->` separator", line)
            }
            GrammarError::InvalidLhs(line) => {
                write!(f, "line {}: left-hand side must be a single nonterminal", line)
            }
            GrammarError::ReservedEndMarker(line) => write!(
                f,
                "line {}: `$` is reserved as the end of input marker",
                line
            ),
            GrammarError::MixedEpsilon(line) => write!(
                f,
                "line {}: `ε` cannot be mixed with other symbols in an alternative",
                line
            ),
            GrammarError::EmptyAlternative(line) => {
                write!(f, "line {}: empty alternative (use `ε` for the empty string)", line)
            }
        }
    }
}

impl Error for GrammarError {
    fn description(&self) -> &str {
        "malformed grammar description"
    }
}

/// Parse a grammar description into its abstract syntax tree.
pub fn parse_desc(text: &str) -> Result<ast::Desc, GrammarError> {
    let mut rules = Vec::new();
    for (offset, line) in text.lines().enumerate() {
        let lineno = offset + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut parts = line.splitn(2, "->");
        let lhs = parts.next().unwrap().trim();
        let rhs = match parts.next() {
            Some(rhs) => rhs,
            None => return Err(GrammarError::MissingArrow(lineno)),
        };
        if lhs.is_empty() || lhs.split_whitespace().count() != 1 || lhs == EPSILON {
            return Err(GrammarError::InvalidLhs(lineno));
        }
        if lhs == END_MARKER {
            return Err(GrammarError::ReservedEndMarker(lineno));
        }
        let mut variants = Vec::new();
        for alt in rhs.split('|') {
            let symbols: Vec<String> = alt.split_whitespace().map(String::from).collect();
            if symbols.is_empty() {
                return Err(GrammarError::EmptyAlternative(lineno));
            }
            if symbols.iter().any(|s| s == END_MARKER) {
                return Err(GrammarError::ReservedEndMarker(lineno));
            }
            if symbols.iter().any(|s| s == EPSILON) {
                if symbols.len() != 1 {
                    return Err(GrammarError::MixedEpsilon(lineno));
                }
                // The empty alternative carries no symbols.
                variants.push(vec![]);
            } else {
                variants.push(symbols);
            }
        }
        rules.push(ast::RuleDecl {
            name: lhs.to_string(),
            variants: variants,
        });
    }
    Ok(ast::Desc { rules: rules })
}

/// Convert the grammar description into an actual grammar.
///
/// Names declared as some rule's LHS become nonterminals, all remaining
/// names become terminals. A later declaration of an already-seen LHS
/// replaces its alternatives but keeps its original position, so the start
/// symbol stays the first LHS of the description.
pub fn make_grammar(desc: &ast::Desc) -> Grammar {
    // Collapse the declarations into one ordered mapping. Insertion order
    // determines the start symbol; re-insertion replaces the alternatives
    // in place.
    let mut decls: IndexMap<&str, &[Vec<String>]> = IndexMap::new();
    for d in &desc.rules {
        decls.insert(&d.name, &d.variants);
    }

    let mut grammar = Grammar::new();
    for name in decls.keys() {
        grammar.add_nonterminal(*name);
    }
    for (name, variants) in &decls {
        let id = grammar.nonterminal_id(name).unwrap();
        for v in variants.iter() {
            let seq = v.iter()
                .map(|s| match grammar.nonterminal_id(s) {
                    Some(nt) => Symbol::Nonterminal(nt),
                    None => Symbol::Terminal(grammar.add_terminal(s.clone())),
                })
                .collect();
            grammar.add_rule(Rule::new(id, seq));
        }
    }
    debug!(
        "loaded grammar with {} nonterminals, {} terminals, {} rules",
        grammar.nonterminal_id_bound(),
        grammar.terminal_id_bound() - 1,
        grammar.rules().len()
    );
    grammar
}

/// Parse a grammar description into a grammar.
pub fn parse_grammar(text: &str) -> Result<Grammar, GrammarError> {
    parse_desc(text).map(|desc| make_grammar(&desc))
}
