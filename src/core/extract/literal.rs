//! Evaluation of object-literal expressions into plain JSON maps.
//!
//! Only primitive literal values survive: strings, numbers, booleans and `null`.
//! Spread entries, computed keys, shorthand/method properties and every
//! non-literal value (identifiers, calls, templates, nested objects/arrays)
//! are skipped without error.

use serde_json::{Map, Number, Value};
use swc_ecma_ast::{Expr, Lit, ObjectLit, Prop, PropName, PropOrSpread};

/// Evaluate an object literal into a key → literal map.
///
/// Later duplicate keys overwrite earlier ones.
pub fn evaluate_object(object: &ObjectLit) -> Map<String, Value> {
    let mut evaluated = Map::new();

    for prop in &object.props {
        let PropOrSpread::Prop(prop) = prop else {
            continue;
        };
        let Prop::KeyValue(kv) = &**prop else {
            continue;
        };
        let Some(key) = prop_name_to_string(&kv.key) else {
            continue;
        };
        if let Some(value) = literal_value(&kv.value) {
            evaluated.insert(key, value);
        }
    }

    evaluated
}

/// Static text of a property key; `None` for computed keys.
pub fn prop_name_to_string(name: &PropName) -> Option<String> {
    match name {
        PropName::Ident(ident) => Some(ident.sym.to_string()),
        PropName::Str(s) => s.value.as_str().map(|s| s.to_string()),
        PropName::Num(n) => Some(format_number(n.value)),
        _ => None,
    }
}

/// Convert a primitive literal expression into a JSON value.
pub fn literal_value(expr: &Expr) -> Option<Value> {
    match unwrap_expr(expr) {
        Expr::Lit(Lit::Str(s)) => s.value.as_str().map(|s| Value::String(s.to_string())),
        Expr::Lit(Lit::Num(n)) => Some(number_value(n.value)),
        Expr::Lit(Lit::Bool(b)) => Some(Value::Bool(b.value)),
        Expr::Lit(Lit::Null(_)) => Some(Value::Null),
        _ => None,
    }
}

/// Peel parentheses and TypeScript-only wrappers (`as`, `satisfies`, `!`).
pub fn unwrap_expr(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(paren) => unwrap_expr(&paren.expr),
        Expr::TsAs(ts) => unwrap_expr(&ts.expr),
        Expr::TsConstAssertion(ts) => unwrap_expr(&ts.expr),
        Expr::TsSatisfies(ts) => unwrap_expr(&ts.expr),
        Expr::TsNonNull(ts) => unwrap_expr(&ts.expr),
        _ => expr,
    }
}

fn number_value(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Value::Number(Number::from(value as i64))
    } else {
        Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        (value as i64).to_string()
    } else {
        value.to_string()
    }
}
