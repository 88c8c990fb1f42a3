use std::path::PathBuf;
use std::rc::Rc;

use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};

use malrs::builtins::register_all;
use malrs::env::Environment;
use malrs::eval::eval;
use malrs::reader;
use malrs::value::{to_readable_string, Value};

/// A tree-walking interpreter for MAL, a small Lisp dialect.
#[derive(Parser, Debug)]
#[command(name = "malrs")]
#[command(version)]
#[command(about = "An interpreter for MAL, a small Lisp dialect")]
struct CliArgs {
    /// Script file to run. With no script, starts the interactive REPL.
    script: Option<PathBuf>,

    /// Arguments passed through to the script, bound to `*ARGV*`.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    argv: Vec<String>,
}

const HISTORY_FILE: &str = ".mal_history";

fn main() {
    let args = CliArgs::parse();

    let env = Environment::new();
    register_all(&env);

    let argv = Value::List(args.argv.iter().cloned().map(Value::String).collect());
    env.set("*ARGV*", argv);

    if let Some(script_path) = args.script {
        run_script(&script_path, &env);
        return;
    }

    run_repl(&env);
}

/// `(load-file "<path>")`, matching the one-arg CLI contract in §6. A
/// missing/unreadable script path is a fatal host failure (exit non-zero);
/// a parse or eval error inside the script is printed and swallowed, same
/// as the REPL, and the process still exits 0 (§6).
fn run_script(path: &PathBuf, env: &Rc<Environment>) {
    if let Err(e) = std::fs::metadata(path) {
        eprintln!("cannot read script file {}: {}", path.display(), e);
        std::process::exit(1);
    }

    let form = format!("(load-file {:?})", path.display().to_string());
    let expr = match reader::read(&form) {
        Ok(expr) => expr,
        Err(e) => {
            eprintln!("{}", e);
            return;
        }
    };
    if let Err(e) = eval(expr, env.clone()) {
        eprintln!("{}", e);
    }
}

fn run_repl(env: &Rc<Environment>) {
    let config = Config::builder().auto_add_history(true).build();
    let mut rl: Editor<(), DefaultHistory> = match Editor::with_config(config) {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("could not start the line editor: {}", e);
            return;
        }
    };
    let _ = rl.load_history(HISTORY_FILE);

    loop {
        match rl.readline("user> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                match reader::read(&line) {
                    Ok(expr) => match eval(expr, env.clone()) {
                        Ok(result) => println!("{}", to_readable_string(&result)),
                        Err(e) => println!("{}", e),
                    },
                    Err(e) => println!("{}", e),
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}", e);
                break;
            }
        }
    }

    let _ = rl.save_history(HISTORY_FILE);
}
