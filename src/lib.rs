//! A small interactive shell with aliases and job control.
//!
//! This crate provides the pieces of `gash`, a line-oriented command
//! interpreter: a whitespace tokenizer with alias and home-directory
//! expansion, a fixed set of built-in commands executed in-process, and a
//! launcher that runs external programs as tracked jobs with foreground
//! waiting, backgrounding, and stop/continue semantics.
//!
//! The main entry point is [`Interpreter`], which owns the [`ShellState`]
//! (environment, alias table, job table) and drives the read-eval loop.
//! The public modules [`alias`], [`env`] and [`jobs`] expose the state
//! containers for embedding or testing.

pub mod alias;
mod builtin;
pub mod command;
mod config;
pub mod env;
mod external;
mod interpreter;
pub mod jobs;
mod lexer;
mod prompt;
mod signal;

pub use interpreter::{Interpreter, ShellState};
