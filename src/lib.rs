//! Interpreter core for MAL: the reader, value model, environment,
//! evaluator, and primitive bindings. `main.rs` wires these into a REPL
//! and a script runner.

pub mod builtins;
pub mod env;
pub mod error;
pub mod eval;
pub mod reader;
pub mod value;
