//! Collection of formatting calls and message-definition catalogs.
//!
//! - Formatting calls (`$_('id')`, `$t({ id })`) are searched in the instance
//!   script and the markup. The module script runs outside any component
//!   instance, so store subscriptions there are never collected.
//! - Definition catalogs (`defineMessages({ ... })`) are searched in both
//!   script sections and never in the markup.
//!
//! A matched call is recorded whole and its arguments are not searched again.

use swc_common::{SourceMap, Spanned};
use swc_ecma_ast::{CallExpr, Callee, Expr, ObjectLit, Prop, PropOrSpread};

use crate::core::{
    collect::bindings::BindingSet,
    error::ExtractError,
    extract::literal::unwrap_expr,
    parsers::template::ParsedTemplate,
    walk::{TemplateVisitor, VisitControl, walk_exprs, walk_module},
};

/// Simple-name callee of a call, if it has one.
pub fn callee_name(call: &CallExpr) -> Option<&str> {
    let Callee::Expr(callee) = &call.callee else {
        return None;
    };
    match unwrap_expr(callee) {
        Expr::Ident(ident) => Some(&*ident.sym),
        _ => None,
    }
}

struct FormatCallCollector<'a> {
    bindings: &'a BindingSet,
    calls: Vec<CallExpr>,
}

impl TemplateVisitor for FormatCallCollector<'_> {
    fn enter_call(&mut self, call: &CallExpr) -> VisitControl {
        match callee_name(call) {
            Some(name) if self.bindings.is_format_call(name) => {
                self.calls.push(call.clone());
                VisitControl::SkipChildren
            }
            _ => VisitControl::Continue,
        }
    }
}

/// Formatting calls in the instance script and markup, in source order.
pub fn collect_format_calls(template: &ParsedTemplate, bindings: &BindingSet) -> Vec<CallExpr> {
    if bindings.format_calls.is_empty() {
        return Vec::new();
    }

    let mut collector = FormatCallCollector {
        bindings,
        calls: Vec::new(),
    };
    if let Some(instance) = &template.instance {
        walk_module(instance, &mut collector);
    }
    walk_exprs(template.markup.iter().map(|expr| &**expr), &mut collector);

    collector.calls
}

struct CatalogCollector<'a> {
    bindings: &'a BindingSet,
    catalogs: Vec<ObjectLit>,
}

impl TemplateVisitor for CatalogCollector<'_> {
    fn enter_call(&mut self, call: &CallExpr) -> VisitControl {
        let is_define = callee_name(call).is_some_and(|name| self.bindings.is_define_messages(name));
        if !is_define {
            return VisitControl::Continue;
        }

        // A non-object argument makes this an ordinary call.
        match call.args.first() {
            Some(arg) if arg.spread.is_none() => match unwrap_expr(&arg.expr) {
                Expr::Object(catalog) => {
                    self.catalogs.push(catalog.clone());
                    VisitControl::SkipChildren
                }
                _ => VisitControl::Continue,
            },
            _ => VisitControl::Continue,
        }
    }
}

/// Object literals passed to the definition-block function in either script.
pub fn collect_catalogs(template: &ParsedTemplate, bindings: &BindingSet) -> Vec<ObjectLit> {
    if bindings.define_messages.is_none() {
        return Vec::new();
    }

    let mut collector = CatalogCollector {
        bindings,
        catalogs: Vec::new(),
    };
    for module in template.scripts() {
        walk_module(module, &mut collector);
    }

    collector.catalogs
}

/// Every entry value of every catalog, in source order.
///
/// Entries must be plain `key: value` properties; anything else (spread,
/// shorthand, method, accessor) is a fatal structural error.
pub fn collect_message_definitions(
    template: &ParsedTemplate,
    bindings: &BindingSet,
) -> Result<Vec<Box<Expr>>, ExtractError> {
    let mut definitions = Vec::new();

    for catalog in collect_catalogs(template, bindings) {
        for entry in catalog.props {
            let invalid_kind = match &entry {
                PropOrSpread::Spread(_) => Some("SpreadElement"),
                PropOrSpread::Prop(prop) => match &**prop {
                    Prop::KeyValue(_) => None,
                    Prop::Shorthand(_) => Some("ShorthandProperty"),
                    Prop::Method(_) => Some("MethodProperty"),
                    Prop::Getter(_) => Some("GetterProperty"),
                    Prop::Setter(_) => Some("SetterProperty"),
                    _ => Some("Property"),
                },
            };

            if let Some(kind) = invalid_kind {
                return Err(invalid_entry(&template.source_map, kind, &entry));
            }
            if let PropOrSpread::Prop(prop) = entry
                && let Prop::KeyValue(kv) = *prop
            {
                definitions.push(kv.value);
            }
        }
    }

    Ok(definitions)
}

fn invalid_entry(source_map: &SourceMap, kind: &'static str, entry: &PropOrSpread) -> ExtractError {
    let loc = source_map.lookup_char_pos(entry.span().lo);
    ExtractError::InvalidCatalogEntry {
        kind,
        line: loc.line,
        col: loc.col.0,
    }
}
