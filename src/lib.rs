// Copyright (c) 2018 Fabian Schuiki

//! A grammar analyzer and LL(1) predictive parser.
//!
//! This crate reads a context-free grammar, computes its FIRST and FOLLOW
//! sets, builds the LL(1) predictive-parsing table (flagging every conflict
//! if the grammar is not LL(1)), and drives a stack-based parse of a token
//! sequence off that table, yielding the leftmost derivation as a trace of
//! expansion steps.

#![deny(missing_docs)]

extern crate bit_set;
extern crate indexmap;
#[macro_use]
extern crate log;

pub mod grammar;
pub mod parser;
pub mod first;
pub mod follow;
pub mod table;
pub mod machine;

/// A pretty printer.
pub struct Pretty<C, T> {
    ctx: C,
    item: T,
}

impl<C, T> Pretty<C, T> {
    pub(crate) fn new(ctx: C, item: T) -> Pretty<C, T> {
        Pretty { ctx, item }
    }
}
