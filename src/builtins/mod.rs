//! The initial environment's bindings (§4.5): arithmetic, comparisons,
//! sequence operations, printing, reader/file I/O glue, and atoms. `eval`
//! is registered last since it must close over the finished root
//! environment.
//!
//! `not` and `load-file` are not primitives — the reference source defines
//! them as MAL closures evaluated against the root env right after setup,
//! and this crate keeps that as a deliberate, documented step rather than
//! hiding it behind a Rust function (§4.5, §6).

use std::rc::Rc;

use crate::env::Environment;
use crate::eval::eval;
use crate::reader;

pub mod arithmetic;
pub mod atoms;
pub mod comparison;
pub mod eval_primitive;
pub mod io;
pub mod print;
pub mod sequence;

/// Registers every primitive, then evaluates the two MAL-source
/// pre-injections against the same root environment.
pub fn register_all(env: &Rc<Environment>) {
    arithmetic::register(env);
    comparison::register(env);
    sequence::register(env);
    print::register(env);
    io::register(env);
    atoms::register(env);
    eval_primitive::register(env);

    for source in PRE_INJECTED {
        let form = reader::read(source).expect("pre-injected source is well-formed");
        eval(form, env.clone()).expect("pre-injected definitions never fail to evaluate");
    }
}

const PRE_INJECTED: &[&str] = &[
    "(def! not (fn* (a) (if a false true)))",
    r#"(def! load-file (fn* (f) (eval (read-string (str "(do " (slurp f) "\nnil)")))))"#,
];
