// Copyright (c) 2018 Fabian Schuiki

//! End-to-end tests of the full analysis and parsing pipeline.

extern crate prospect;

use prospect::first::FirstSets;
use prospect::follow::FollowSets;
use prospect::grammar::{Grammar, TerminalId, END};
use prospect::machine::{Machine, ParseError};
use prospect::parser::parse_grammar;
use prospect::table::ParseTable;

fn analyze(text: &str) -> (Grammar, ParseTable) {
    let grammar = parse_grammar(text).unwrap();
    let first = FirstSets::compute(&grammar);
    let follow = FollowSets::compute(&grammar, &first);
    let table = ParseTable::build(&grammar, &first, &follow);
    (grammar, table)
}

fn tokenize(grammar: &Grammar, input: &str) -> Vec<TerminalId> {
    input
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| grammar.terminal_id(&c.to_string()).unwrap())
        .collect()
}

#[test]
fn worked_example() {
    let (grammar, table) = analyze("S -> a A\nA -> b A | ε\n");
    assert!(table.is_ll1());

    let s = grammar.nonterminal_id("S").unwrap();
    let a = grammar.nonterminal_id("A").unwrap();
    let ta = grammar.terminal_id("a").unwrap();
    let tb = grammar.terminal_id("b").unwrap();

    // FIRST(S) = {a}, FIRST(A) = {b, ε}.
    let first = FirstSets::compute(&grammar);
    assert!(first.nonterminal(s).contains(ta));
    assert!(!first.nonterminal(s).has_epsilon());
    assert!(first.nonterminal(a).contains(tb));
    assert!(first.nonterminal(a).has_epsilon());

    // FOLLOW(S) = FOLLOW(A) = {$}.
    let follow = FollowSets::compute(&grammar, &first);
    for &nt in &[s, a] {
        assert!(follow.nonterminal(nt).contains(END));
        assert_eq!(follow.nonterminal(nt).terminals().count(), 1);
    }

    // Table: [S, a], [A, b], [A, $] and nothing else.
    assert!(table.get(s, ta).is_some());
    assert!(table.get(a, tb).is_some());
    assert!(table.get(a, END).is_some());
    assert!(table.get(s, tb).is_none());
    assert!(table.get(s, END).is_none());
    assert!(table.get(a, ta).is_none());

    // "abb" is in the language and derives through 4 expansions.
    let machine = Machine::new(&grammar, &table);
    let derivation = machine.parse(s, &tokenize(&grammar, "abb")).unwrap();
    assert_eq!(derivation.steps().len(), 4);
    assert_eq!(
        format!("{}", derivation.pretty(&grammar)),
        "S -> a A\nA -> b A\nA -> b A\nA -> ε"
    );

    // "aba" is not; the stray a has no table entry under A.
    match machine.parse(s, &tokenize(&grammar, "aba")) {
        Err(ParseError::UnexpectedToken { position, .. }) => assert_eq!(position, 2),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn left_recursion_is_reported() {
    let (grammar, table) = analyze("E -> E + T | T\nT -> x\n");
    assert!(!table.is_ll1());
    let e = grammar.nonterminal_id("E").unwrap();
    assert!(
        table
            .conflicts()
            .iter()
            .any(|c| c.nonterminal == e && c.kept != c.rejected)
    );
}

#[test]
fn empty_input_parses_nullable_start() {
    let (grammar, table) = analyze("S -> a S | ε\n");
    assert!(table.is_ll1());
    let machine = Machine::new(&grammar, &table);
    let start = grammar.start_symbol().unwrap();
    let derivation = machine.parse(start, &[]).unwrap();
    // A single ε expansion; in particular no IncompleteParse.
    assert_eq!(derivation.steps().len(), 1);
    assert_eq!(format!("{}", derivation.pretty(&grammar)), "S -> ε");
}

#[test]
fn expression_grammar_round_trip() {
    let text = "E -> T E'\nE' -> + T E' | ε\nT -> F T'\nT' -> * F T' | ε\nF -> ( E ) | i\n";
    let (grammar, table) = analyze(text);
    assert!(table.is_ll1());

    let machine = Machine::new(&grammar, &table);
    let start = grammar.start_symbol().unwrap();
    for input in &["i", "i + i", "i * i", "( i + i ) * i", "i + i * i"] {
        assert!(
            machine.parse(start, &tokenize(&grammar, input)).is_ok(),
            "failed to parse {}",
            input
        );
    }
    for input in &["", "+", "i +", "( i", "i i"] {
        assert!(
            machine.parse(start, &tokenize(&grammar, input)).is_err(),
            "wrongly parsed {}",
            input
        );
    }
}

#[test]
fn rebuilding_is_deterministic() {
    let text = "E -> E + T | T\nT -> T * F | F\nF -> x\n";
    let (_, table1) = analyze(text);
    let (_, table2) = analyze(text);
    assert_eq!(table1, table2);
    assert_eq!(table1.conflicts(), table2.conflicts());
}
