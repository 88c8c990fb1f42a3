//! The trampolined evaluator: `eval(expr, env)` loops over a mutable
//! `(expr, env)` pair instead of recursing for tail positions, so that
//! self-recursive MAL functions don't grow the host stack.

use std::collections::HashMap;
use std::rc::Rc;

use crate::env::Environment;
use crate::error::MalError;
use crate::value::{Callable, Value};

pub fn eval(mut expr: Value, mut env: Rc<Environment>) -> Result<Value, MalError> {
    loop {
        match expr {
            Value::Symbol(ref name) => return env.get(name),

            Value::Vector(items) => {
                let evaluated = items
                    .into_iter()
                    .map(|item| eval(item, env.clone()))
                    .collect::<Result<Vec<_>, _>>()?;
                return Ok(Value::Vector(evaluated));
            }

            Value::HashMap(map) => {
                let mut out = HashMap::with_capacity(map.len());
                for (key, value) in map {
                    out.insert(key, eval(value, env.clone())?);
                }
                return Ok(Value::HashMap(out));
            }

            Value::List(ref items) if items.is_empty() => return Ok(Value::List(vec![])),

            Value::List(items) => {
                if let Value::Symbol(head) = &items[0] {
                    match head.as_str() {
                        "def!" => return eval_def(&items, env),
                        "let*" => {
                            let (body, new_env) = eval_let(&items, env)?;
                            expr = body;
                            env = new_env;
                            continue;
                        }
                        "do" => {
                            let last = eval_do_effects(&items, env.clone())?;
                            expr = last;
                            continue;
                        }
                        "if" => {
                            expr = eval_if(&items, env.clone())?;
                            continue;
                        }
                        "fn*" => return eval_fn_star(&items, env),
                        _ => {}
                    }
                }

                let callee = eval(items[0].clone(), env.clone())?;
                let args = items[1..]
                    .iter()
                    .map(|arg| eval(arg.clone(), env.clone()))
                    .collect::<Result<Vec<_>, _>>()?;

                match callee {
                    Value::Callable(Callable::Builtin { func, .. }) => return func(&args),
                    Value::Callable(Callable::Closure(closure)) => {
                        env = Environment::make_bound(
                            closure.env.clone(),
                            &closure.params,
                            closure.variadic.as_deref(),
                            &args,
                        )?;
                        expr = closure.body.clone();
                        continue;
                    }
                    other => return Err(MalError::NotCallable(other.type_name().to_string())),
                }
            }

            // Self-evaluating: Nil, Bool, Number, String, Keyword, Callable, Atom.
            other => return Ok(other),
        }
    }
}

fn eval_def(items: &[Value], env: Rc<Environment>) -> Result<Value, MalError> {
    if items.len() != 3 {
        return Err(MalError::arity("def!", "2", items.len() - 1));
    }
    let name = symbol_name(&items[1]);
    let value = eval(items[2].clone(), env.clone())?;
    env.set(&name, value.clone());
    Ok(value)
}

/// Coerces a non-Symbol key to a symbol name from its printed form, per
/// §4.4's `def!` note ("S must be a Symbol (otherwise coerce its printed
/// form to a symbol name").
fn symbol_name(value: &Value) -> String {
    match value {
        Value::Symbol(s) => s.clone(),
        other => format!("{}", other),
    }
}

fn eval_let(items: &[Value], env: Rc<Environment>) -> Result<(Value, Rc<Environment>), MalError> {
    if items.len() != 3 {
        return Err(MalError::arity("let*", "2", items.len() - 1));
    }
    let bindings = items[1]
        .as_sequence()
        .ok_or_else(|| MalError::BadBindings(format!("{}", items[1])))?;
    if bindings.len() % 2 != 0 {
        return Err(MalError::BadBindings(format!("{}", items[1])));
    }

    let child = Environment::make(env);
    for pair in bindings.chunks(2) {
        let name = match &pair[0] {
            Value::Symbol(s) => s.clone(),
            other => return Err(MalError::BadBindings(format!("{}", other))),
        };
        let value = eval(pair[1].clone(), child.clone())?;
        child.set(&name, value);
    }
    Ok((items[2].clone(), child))
}

fn eval_do_effects(items: &[Value], env: Rc<Environment>) -> Result<Value, MalError> {
    let body = &items[1..];
    if body.is_empty() {
        return Err(MalError::EmptyDo);
    }
    for form in &body[..body.len() - 1] {
        eval(form.clone(), env.clone())?;
    }
    Ok(body[body.len() - 1].clone())
}

fn eval_if(items: &[Value], env: Rc<Environment>) -> Result<Value, MalError> {
    if items.len() != 3 && items.len() != 4 {
        return Err(MalError::arity("if", "2-3", items.len() - 1));
    }
    let cond = eval(items[1].clone(), env)?;
    if cond.is_truthy() {
        Ok(items[2].clone())
    } else if items.len() == 4 {
        Ok(items[3].clone())
    } else {
        Ok(Value::Nil)
    }
}

fn eval_fn_star(items: &[Value], env: Rc<Environment>) -> Result<Value, MalError> {
    if items.len() != 3 {
        return Err(MalError::arity("fn*", "2", items.len() - 1));
    }
    let params_seq = items[1]
        .as_sequence()
        .ok_or_else(|| MalError::BadParams(format!("{}", items[1])))?;

    let mut params = Vec::new();
    let mut variadic = None;
    let mut i = 0;
    while i < params_seq.len() {
        let name = match &params_seq[i] {
            Value::Symbol(s) => s,
            other => return Err(MalError::BadParams(format!("{}", other))),
        };
        if name == "&" {
            let rest = params_seq
                .get(i + 1)
                .ok_or_else(|| MalError::BadParams("& with no rest parameter".to_string()))?;
            match rest {
                Value::Symbol(s) => variadic = Some(s.clone()),
                other => return Err(MalError::BadParams(format!("{}", other))),
            }
            break;
        }
        params.push(name.clone());
        i += 1;
    }

    Ok(Value::closure(params, variadic, items[2].clone(), env))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: Vec<Value>) -> Value {
        Value::List(items)
    }
    fn sym(s: &str) -> Value {
        Value::Symbol(s.to_string())
    }
    fn num(n: i64) -> Value {
        Value::Number(n)
    }

    fn root_env() -> Rc<Environment> {
        let env = Environment::new();
        crate::builtins::register_all(&env);
        env
    }

    #[test]
    fn self_evaluating_values() {
        let env = root_env();
        assert!(matches!(eval(num(5), env.clone()).unwrap(), Value::Number(5)));
        assert!(matches!(eval(Value::Nil, env.clone()).unwrap(), Value::Nil));
        assert!(matches!(
            eval(Value::Bool(true), env).unwrap(),
            Value::Bool(true)
        ));
    }

    #[test]
    fn symbol_lookup() {
        let env = root_env();
        env.set("x", num(42));
        assert!(matches!(eval(sym("x"), env).unwrap(), Value::Number(42)));
    }

    #[test]
    fn empty_list_evaluates_to_itself() {
        let env = root_env();
        match eval(list(vec![]), env).unwrap() {
            Value::List(items) => assert!(items.is_empty()),
            other => panic!("expected empty list, got {:?}", other),
        }
    }

    #[test]
    fn def_binds_and_returns_value() {
        let env = root_env();
        let result = eval(list(vec![sym("def!"), sym("x"), num(10)]), env.clone()).unwrap();
        assert!(matches!(result, Value::Number(10)));
        assert!(matches!(env.get("x").unwrap(), Value::Number(10)));
    }

    #[test]
    fn let_star_scopes_bindings_to_its_body() {
        let env = root_env();
        // (let* (a 10 b (+ a 5)) (* a b)) => 150
        let expr = list(vec![
            sym("let*"),
            Value::Vector(vec![sym("a"), num(10), sym("b"), list(vec![sym("+"), sym("a"), num(5)])]),
            list(vec![sym("*"), sym("a"), sym("b")]),
        ]);
        let result = eval(expr, env.clone()).unwrap();
        assert!(matches!(result, Value::Number(150)));
        assert!(env.get("a").is_err());
    }

    #[test]
    fn if_truthy_and_falsy_branches() {
        let env = root_env();
        let truthy = list(vec![sym("if"), Value::Bool(true), num(1), num(2)]);
        assert!(matches!(eval(truthy, env.clone()).unwrap(), Value::Number(1)));

        let falsy = list(vec![sym("if"), Value::Bool(false), num(1), num(2)]);
        assert!(matches!(eval(falsy, env.clone()).unwrap(), Value::Number(2)));

        let no_else = list(vec![sym("if"), Value::Bool(false), num(1)]);
        assert!(matches!(eval(no_else, env.clone()).unwrap(), Value::Nil));

        let nil_is_falsy = list(vec![sym("if"), Value::Nil, num(1), num(2)]);
        assert!(matches!(eval(nil_is_falsy, env.clone()).unwrap(), Value::Number(2)));

        let zero_is_truthy = list(vec![sym("if"), num(0), num(1), num(2)]);
        assert!(matches!(eval(zero_is_truthy, env).unwrap(), Value::Number(1)));
    }

    #[test]
    fn do_evaluates_all_but_last_for_effect() {
        let env = root_env();
        let expr = list(vec![sym("do"), num(1), num(2), num(3)]);
        assert!(matches!(eval(expr, env).unwrap(), Value::Number(3)));
    }

    #[test]
    fn empty_do_is_an_error() {
        let env = root_env();
        assert!(matches!(
            eval(list(vec![sym("do")]), env),
            Err(MalError::EmptyDo)
        ));
    }

    #[test]
    fn fn_star_and_apply_with_closure_capture() {
        let env = root_env();
        // ((fn* (a b) (+ a b)) 1 2) => 3
        let closure = list(vec![
            sym("fn*"),
            Value::Vector(vec![sym("a"), sym("b")]),
            list(vec![sym("+"), sym("a"), sym("b")]),
        ]);
        let call = list(vec![closure, num(1), num(2)]);
        assert!(matches!(eval(call, env).unwrap(), Value::Number(3)));
    }

    #[test]
    fn variadic_closure_collects_rest_args() {
        let env = root_env();
        // ((fn* (a & rest) rest) 1 2 3) => (2 3)
        let closure = list(vec![
            sym("fn*"),
            Value::Vector(vec![sym("a"), sym("&"), sym("rest")]),
            sym("rest"),
        ]);
        let call = list(vec![closure, num(1), num(2), num(3)]);
        match eval(call, env).unwrap() {
            Value::List(items) => assert_eq!(items.len(), 2),
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn deep_tail_recursion_does_not_overflow_the_host_stack() {
        let env = root_env();
        // (def! count-down (fn* (n) (if (<= n 0) :done (count-down (- n 1)))))
        eval(
            list(vec![
                sym("def!"),
                sym("count-down"),
                list(vec![
                    sym("fn*"),
                    Value::Vector(vec![sym("n")]),
                    list(vec![
                        sym("if"),
                        list(vec![sym("<="), sym("n"), num(0)]),
                        Value::Keyword("done".to_string()),
                        list(vec![sym("count-down"), list(vec![sym("-"), sym("n"), num(1)])]),
                    ]),
                ]),
            ]),
            env.clone(),
        )
        .unwrap();

        let result = eval(list(vec![sym("count-down"), num(100_000)]), env).unwrap();
        assert!(matches!(result, Value::Keyword(ref k) if k == "done"));
    }

    #[test]
    fn non_callable_head_is_an_error() {
        let env = root_env();
        assert!(matches!(
            eval(list(vec![num(1), num(2)]), env),
            Err(MalError::NotCallable(_))
        ));
    }
}
