//! Binding resolution for the translation library's API.
//!
//! A file only takes part in extraction through the names it imports from the
//! translation library. `import { _ as tr, defineMessages as dm } from 'svelte-i18n'`
//! yields the formatting name `tr` and the definition-block name `dm`.
//!
//! ## Store sigil
//!
//! Formatting functions are stores. Components call them through the `$`
//! auto-subscription prefix, so the import alias `_` is called as `$_`. Call
//! sites are matched with [`store_subscription_target`], which maps `$_` back
//! to `_`; un-prefixed calls are not formatting calls. The definition-block
//! function is a plain function and is matched by its exact local name.

use std::collections::HashSet;

use swc_ecma_ast::{ImportDecl, ImportSpecifier, ModuleDecl, ModuleExportName, ModuleItem};

use crate::core::parsers::template::ParsedTemplate;

/// Default translation library module.
pub const LIBRARY_NAME: &str = "svelte-i18n";

/// Default imported name of the definition-block function.
pub const DEFINE_MESSAGES_NAME: &str = "defineMessages";

/// Default imported names of the formatting functions.
pub const FORMAT_FUNCTION_NAMES: &[&str] = &["format", "_", "t"];

/// The library surface extraction looks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryApi {
    /// Module specifier imports must come from.
    pub module: String,
    /// Imported name of the definition-block function.
    pub define_messages: String,
    /// Imported names of the formatting functions.
    pub format_functions: HashSet<String>,
}

impl Default for LibraryApi {
    fn default() -> Self {
        Self {
            module: LIBRARY_NAME.to_string(),
            define_messages: DEFINE_MESSAGES_NAME.to_string(),
            format_functions: FORMAT_FUNCTION_NAMES
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }
}

/// Local names aliasing the library API within one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingSet {
    /// Local name of the definition-block function, first import wins.
    pub define_messages: Option<String>,
    /// Local names of the formatting functions.
    pub format_calls: HashSet<String>,
}

impl BindingSet {
    /// True when the file imports nothing extraction cares about.
    pub fn is_empty(&self) -> bool {
        self.define_messages.is_none() && self.format_calls.is_empty()
    }

    /// Whether a callee name is a `$`-subscribed formatting store.
    pub fn is_format_call(&self, callee: &str) -> bool {
        store_subscription_target(callee).is_some_and(|name| self.format_calls.contains(name))
    }

    /// Whether a callee name is the definition-block function.
    pub fn is_define_messages(&self, callee: &str) -> bool {
        self.define_messages.as_deref() == Some(callee)
    }
}

/// The store name a `$`-prefixed reference subscribes to.
///
/// ```
/// use svelte_intl_extract::core::collect::store_subscription_target;
///
/// assert_eq!(store_subscription_target("$_"), Some("_"));
/// assert_eq!(store_subscription_target("$format"), Some("format"));
/// assert_eq!(store_subscription_target("_"), None);
/// assert_eq!(store_subscription_target("$"), None);
/// ```
pub fn store_subscription_target(name: &str) -> Option<&str> {
    name.strip_prefix('$').filter(|store| !store.is_empty())
}

/// Resolve the library bindings imported by either script section.
pub fn resolve_bindings(template: &ParsedTemplate, api: &LibraryApi) -> BindingSet {
    let mut bindings = BindingSet::default();

    let imports = template
        .scripts()
        .flat_map(|module| module.body.iter())
        .filter_map(|item| match item {
            ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => Some(import),
            _ => None,
        });

    for import in imports {
        if import.type_only || import.src.value.as_str() != Some(api.module.as_str()) {
            continue;
        }
        collect_specifiers(import, api, &mut bindings);
    }

    bindings
}

fn collect_specifiers(import: &ImportDecl, api: &LibraryApi, bindings: &mut BindingSet) {
    for specifier in &import.specifiers {
        let ImportSpecifier::Named(named) = specifier else {
            continue;
        };
        if named.is_type_only {
            continue;
        }

        let local_name = named.local.sym.to_string();
        let imported_name = named
            .imported
            .as_ref()
            .map(|i| match i {
                ModuleExportName::Ident(ident) => ident.sym.to_string(),
                ModuleExportName::Str(s) => s.value.to_string_lossy().to_string(),
            })
            .unwrap_or_else(|| local_name.clone());

        if imported_name == api.define_messages {
            bindings.define_messages.get_or_insert(local_name);
        } else if api.format_functions.contains(&imported_name) {
            bindings.format_calls.insert(local_name);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use swc_common::SourceMap;

    use super::*;
    use crate::core::parsers::template::parse_template;

    fn bindings_of(code: &str) -> BindingSet {
        let template = parse_template(
            code.to_string(),
            "Test.svelte",
            Arc::new(SourceMap::default()),
        )
        .unwrap();
        resolve_bindings(&template, &LibraryApi::default())
    }

    fn names(names: &[&str]) -> HashSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_plain_imports() {
        let bindings = bindings_of(
            r#"<script>import { _, t, format, defineMessages } from 'svelte-i18n';</script>"#,
        );
        assert_eq!(bindings.define_messages.as_deref(), Some("defineMessages"));
        assert_eq!(bindings.format_calls, names(&["_", "t", "format"]));
    }

    #[test]
    fn test_aliased_imports() {
        let bindings = bindings_of(
            r#"<script>import { _ as tr, defineMessages as dm, locale } from 'svelte-i18n';</script>"#,
        );
        assert_eq!(bindings.define_messages.as_deref(), Some("dm"));
        assert_eq!(bindings.format_calls, names(&["tr"]));
    }

    #[test]
    fn test_module_script_imports_count() {
        let bindings = bindings_of(
            r#"<script context="module">import { defineMessages } from "svelte-i18n";</script>
<script>import { _ } from "svelte-i18n";</script>"#,
        );
        assert_eq!(bindings.define_messages.as_deref(), Some("defineMessages"));
        assert_eq!(bindings.format_calls, names(&["_"]));
    }

    #[test]
    fn test_first_define_messages_wins() {
        let bindings = bindings_of(
            r#"<script>
import { defineMessages as first } from 'svelte-i18n';
import { defineMessages as second } from 'svelte-i18n';
</script>"#,
        );
        assert_eq!(bindings.define_messages.as_deref(), Some("first"));
    }

    #[test]
    fn test_other_library_ignored() {
        let bindings = bindings_of(r#"<script>import { _ } from 'other-i18n';</script>"#);
        assert!(bindings.is_empty());
    }

    #[test]
    fn test_default_and_namespace_imports_ignored() {
        let bindings = bindings_of(
            r#"<script>import i18n from 'svelte-i18n'; import * as all from 'svelte-i18n';</script>"#,
        );
        assert!(bindings.is_empty());
    }

    #[test]
    fn test_no_scripts() {
        assert!(bindings_of("<p>{$_('x')}</p>").is_empty());
    }

    #[test]
    fn test_is_format_call_requires_sigil() {
        let bindings = BindingSet {
            define_messages: None,
            format_calls: names(&["_"]),
        };
        assert!(bindings.is_format_call("$_"));
        assert!(!bindings.is_format_call("_"));
        assert!(!bindings.is_format_call("$t"));
    }

    #[test]
    fn test_custom_api() {
        let template = parse_template(
            r#"<script>import { msg, tr } from '@acme/intl';</script>"#.to_string(),
            "Test.svelte",
            Arc::new(SourceMap::default()),
        )
        .unwrap();
        let api = LibraryApi {
            module: "@acme/intl".to_string(),
            define_messages: "msg".to_string(),
            format_functions: names(&["tr"]),
        };
        let bindings = resolve_bindings(&template, &api);
        assert_eq!(bindings.define_messages.as_deref(), Some("msg"));
        assert_eq!(bindings.format_calls, names(&["tr"]));
    }
}
