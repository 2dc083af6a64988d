// Copyright (c) 2018 Fabian Schuiki
#[macro_use]
extern crate clap;
extern crate memmap;
extern crate prospect;
extern crate stderrlog;

use std::fs::File;
use std::process;

use clap::{App, Arg};
use memmap::Mmap;

use prospect::first::FirstSets;
use prospect::follow::FollowSets;
use prospect::grammar::{Grammar, TerminalId};
use prospect::machine::Machine;
use prospect::parser::parse_grammar;
use prospect::table::ParseTable;

fn main() {
    let matches = App::new(crate_name!())
        .version(crate_version!())
        .author(crate_authors!())
        .about("Analyzes a grammar, builds its LL(1) parsing table, and parses input against it.")
        .arg(
            Arg::with_name("verbosity")
                .short("v")
                .multiple(true)
                .help("Increase message verbosity"),
        )
        .arg(
            Arg::with_name("sets")
                .long("sets")
                .help("Print the FIRST and FOLLOW sets"),
        )
        .arg(
            Arg::with_name("table")
                .long("table")
                .help("Print the parsing table cells"),
        )
        .arg(
            Arg::with_name("GRAMMAR")
                .required(true)
                .help("The grammar description to analyze"),
        )
        .arg(
            Arg::with_name("INPUT")
                .help("A string of symbols to parse; each non-whitespace character is one terminal"),
        )
        .get_matches();

    stderrlog::new()
        .verbosity(matches.occurrences_of("verbosity") as usize)
        .init()
        .unwrap();

    // Load and parse the grammar description.
    let path = matches.value_of("GRAMMAR").unwrap();
    let text = match read_file(path) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("error: cannot read {}: {}", path, err);
            process::exit(1);
        }
    };
    let grammar = match parse_grammar(&text) {
        Ok(grammar) => grammar,
        Err(err) => {
            eprintln!("error: {}: {}", path, err);
            process::exit(1);
        }
    };
    let start = match grammar.start_symbol() {
        Some(start) => start,
        None => {
            eprintln!("error: {}: grammar declares no rules", path);
            process::exit(1);
        }
    };

    // Analyze the grammar and build the parsing table.
    let first = FirstSets::compute(&grammar);
    let follow = FollowSets::compute(&grammar, &first);
    if matches.is_present("sets") {
        println!("{}", first.pretty(&grammar));
        println!("{}", follow.pretty(&grammar));
    }
    let table = ParseTable::build(&grammar, &first, &follow);
    if matches.is_present("table") {
        println!("{}", table.pretty(&grammar));
    }

    // Any conflict makes the table unusable; report them all and bail out.
    if !table.is_ll1() {
        for conflict in table.conflicts() {
            eprintln!("error: {}", conflict.pretty(&grammar));
        }
        eprintln!("error: grammar is not LL(1)");
        process::exit(1);
    }

    // Parse the input, if any was given.
    if let Some(input) = matches.value_of("INPUT") {
        let symbols = match tokenize(&grammar, input) {
            Ok(symbols) => symbols,
            Err(c) => {
                eprintln!("error: `{}` is not a terminal of the grammar", c);
                process::exit(1);
            }
        };
        let machine = Machine::new(&grammar, &table);
        match machine.parse(start, &symbols) {
            Ok(derivation) => println!("{}", derivation.pretty(&grammar)),
            Err(err) => {
                eprintln!("error: {}", err);
                process::exit(1);
            }
        }
    }
}

/// Read a file into memory.
fn read_file(path: &str) -> std::io::Result<String> {
    let file = File::open(path)?;
    if file.metadata()?.len() == 0 {
        return Ok(String::new());
    }
    let mmap = unsafe { Mmap::map(&file)? };
    Ok(String::from_utf8_lossy(&mmap).into_owned())
}

/// Split an input string into terminals, one per non-whitespace character.
fn tokenize(grammar: &Grammar, input: &str) -> Result<Vec<TerminalId>, char> {
    input
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| grammar.terminal_id(&c.to_string()).ok_or(c))
        .collect()
}
