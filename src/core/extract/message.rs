//! Normalization of calls and catalog entries into message records.

use serde_json::{Map, Value};
use swc_ecma_ast::{CallExpr, Expr, ExprOrSpread, Lit, ObjectLit};

use crate::core::{
    collect::{BindingSet, collect_format_calls, collect_message_definitions},
    error::ExtractError,
    extract::literal::{evaluate_object, unwrap_expr},
    parsers::template::ParsedTemplate,
};

/// One extracted message: `{ id, default?, ...otherLiteralFields }`.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: String,
    pub default: Option<Value>,
    /// Remaining literal fields (`description`, ...).
    pub fields: Map<String, Value>,
}

impl Message {
    /// Build a record from evaluated fields. Requires a string `id`.
    pub fn from_fields(mut fields: Map<String, Value>) -> Option<Self> {
        let Value::String(id) = fields.remove("id")? else {
            return None;
        };
        let default = fields.remove("default");
        Some(Self {
            id,
            default,
            fields,
        })
    }

    /// Value stored in the dictionary: the default text, or `""`.
    pub fn default_value(&self) -> Value {
        match &self.default {
            None | Some(Value::Null) => Value::String(String::new()),
            Some(value) => value.clone(),
        }
    }
}

/// The supported argument shapes of a formatting call.
#[derive(Debug, Clone, Copy)]
pub enum CallShape<'a> {
    /// `$_({ id: 'app.title', default: 'Welcome' })`
    Descriptor(&'a ObjectLit),
    /// `$_('app.title', { default: 'Welcome' })`
    IdWithOptions(&'a str, &'a ObjectLit),
    /// `$_('app.title')`
    Id(&'a str),
}

impl<'a> CallShape<'a> {
    /// Classify call arguments; `None` when no id can be read statically.
    pub fn classify(args: &'a [ExprOrSpread]) -> Option<Self> {
        match plain_arg(args.first()?)? {
            Expr::Object(descriptor) => Some(CallShape::Descriptor(descriptor)),
            Expr::Lit(Lit::Str(s)) => {
                let id = s.value.as_str()?;
                match args.get(1).and_then(plain_arg) {
                    Some(Expr::Object(options)) => Some(CallShape::IdWithOptions(id, options)),
                    _ => Some(CallShape::Id(id)),
                }
            }
            _ => None,
        }
    }

    pub fn into_message(self) -> Option<Message> {
        match self {
            CallShape::Descriptor(descriptor) => Message::from_fields(evaluate_object(descriptor)),
            CallShape::IdWithOptions(id, options) => {
                let mut fields = evaluate_object(options);
                fields.insert("id".to_string(), Value::String(id.to_string()));
                Message::from_fields(fields)
            }
            CallShape::Id(id) => Some(Message {
                id: id.to_string(),
                default: None,
                fields: Map::new(),
            }),
        }
    }
}

fn plain_arg(arg: &ExprOrSpread) -> Option<&Expr> {
    arg.spread.is_none().then(|| unwrap_expr(&arg.expr))
}

/// Message record of a formatting call, if it has a static id.
pub fn message_from_call(call: &CallExpr) -> Option<Message> {
    CallShape::classify(&call.args)?.into_message()
}

/// Message record of a catalog entry value; only object literals qualify.
pub fn message_from_definition(entry: &Expr) -> Option<Message> {
    match unwrap_expr(entry) {
        Expr::Object(object) => Message::from_fields(evaluate_object(object)),
        _ => None,
    }
}

/// All message records of a template: catalog definitions first, then calls.
pub fn collect_messages(
    template: &ParsedTemplate,
    bindings: &BindingSet,
) -> Result<Vec<Message>, ExtractError> {
    let definitions = collect_message_definitions(template, bindings)?;
    let calls = collect_format_calls(template, bindings);

    Ok(definitions
        .iter()
        .filter_map(|entry| message_from_definition(entry))
        .chain(calls.iter().filter_map(message_from_call))
        .collect())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::core::parsers::template::parse_expression_for_test;

    fn message_of(code: &str) -> Option<Message> {
        match *parse_expression_for_test(code) {
            Expr::Call(call) => message_from_call(&call),
            other => panic!("expected call, got {other:?}"),
        }
    }

    fn message(id: &str, default: Option<Value>) -> Message {
        Message {
            id: id.to_string(),
            default,
            fields: Map::new(),
        }
    }

    #[test]
    fn test_bare_id() {
        assert_eq!(message_of("$_('app.title')"), Some(message("app.title", None)));
    }

    #[test]
    fn test_id_with_options() {
        assert_eq!(
            message_of("$_('app.title', { default: 'Welcome', values: { n: 1 } })"),
            Some(message("app.title", Some(json!("Welcome"))))
        );
    }

    #[test]
    fn test_id_argument_overrides_options_id() {
        assert_eq!(
            message_of("$_('real', { id: 'ignored', default: 'D' })"),
            Some(message("real", Some(json!("D"))))
        );
    }

    #[test]
    fn test_descriptor_keeps_extra_fields() {
        let msg = message_of("$_({ id: 'a', default: 'A', description: 'Shown in header' })")
            .unwrap();
        assert_eq!(msg.id, "a");
        assert_eq!(msg.default, Some(json!("A")));
        assert_eq!(
            Value::Object(msg.fields),
            json!({ "description": "Shown in header" })
        );
    }

    #[test]
    fn test_id_with_non_object_second_argument() {
        assert_eq!(message_of("$_('a', options)"), Some(message("a", None)));
    }

    #[test]
    fn test_dropped_shapes() {
        assert_eq!(message_of("$_(42)"), None);
        assert_eq!(message_of("$_(key)"), None);
        assert_eq!(message_of("$_(`tpl`)"), None);
        assert_eq!(message_of("$_(...args)"), None);
        assert_eq!(message_of("$_()"), None);
        assert_eq!(message_of("$_({ default: 'no id' })"), None);
        assert_eq!(message_of("$_({ id: 5 })"), None);
    }

    #[test]
    fn test_default_value() {
        assert_eq!(message("a", None).default_value(), json!(""));
        assert_eq!(message("a", Some(Value::Null)).default_value(), json!(""));
        assert_eq!(message("a", Some(json!(3))).default_value(), json!(3));
    }

    #[test]
    fn test_definition_entry() {
        let expr = parse_expression_for_test("{ id: 'app.greeting', default: 'Hi' }");
        assert_eq!(
            message_from_definition(&expr),
            Some(message("app.greeting", Some(json!("Hi"))))
        );
        let expr = parse_expression_for_test("'not an object'");
        assert_eq!(message_from_definition(&expr), None);
    }
}
