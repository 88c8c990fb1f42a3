//! `eval`: bound at top level only, after the root environment exists,
//! since it must always evaluate its argument against the root scope
//! regardless of where it's called from — this is what makes `load-file`
//! possible (§4.5).

use std::rc::Rc;

use crate::env::Environment;
use crate::error::MalError;
use crate::eval::eval;
use crate::value::Value;

/// Binds `eval` in `root`, closing over `root` itself.
pub fn register(root: &Rc<Environment>) {
    let captured = root.clone();
    // Builtins are plain `fn` pointers, so the captured root environment is
    // threaded through a thread-local rather than a closure environment.
    ROOT_ENV.with(|cell| *cell.borrow_mut() = Some(captured));
    root.set("eval", Value::builtin("eval", eval_primitive));
}

thread_local! {
    static ROOT_ENV: std::cell::RefCell<Option<Rc<Environment>>> = const { std::cell::RefCell::new(None) };
}

fn eval_primitive(args: &[Value]) -> Result<Value, MalError> {
    if args.len() != 1 {
        return Err(MalError::arity("eval", "1", args.len()));
    }
    let root = ROOT_ENV.with(|cell| cell.borrow().clone()).expect("eval registered without a root env");
    eval(args[0].clone(), root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn eval_runs_its_argument_against_the_root_environment() {
        let root = Environment::new();
        crate::builtins::register_all(&root);
        root.set("x", Value::Number(41));
        let form = Value::List(vec![
            Value::Symbol("+".to_string()),
            Value::Symbol("x".to_string()),
            Value::Number(1),
        ]);
        let result = eval_primitive(&[form]).unwrap();
        assert!(matches!(result, Value::Number(42)));
    }
}
