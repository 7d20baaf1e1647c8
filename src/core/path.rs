//! Dotted-path addressing into nested JSON dictionaries.
//!
//! Message ids such as `app.header.title` or `steps[0].label` double as
//! addresses into the output dictionary. Paths are tokenized once into typed
//! [`PathSegment`]s so the container shape for every step is decided up front:
//! integer-shaped segments address list slots, everything else addresses map keys.
//!
//! Ids are not required to be paths. A flat key that itself contains dots
//! (`"errors.404"` stored verbatim) is found by [`resolve`] before any nesting
//! is attempted.

use serde_json::{Map, Value};

/// Largest integer segment that addresses a list slot.
///
/// Integer segments above it are map keys.
pub const MAX_LIST_INDEX: usize = 65_535;

/// A single step of a parsed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Map key: `title` in `app.title`.
    Key(String),
    /// List index: `0` in `steps.0` or `steps[0]`, at most [`MAX_LIST_INDEX`].
    Index(usize),
}

impl PathSegment {
    fn classify(raw: &str) -> Self {
        // Only canonical integers become indices; "01" stays a map key.
        match raw.parse::<usize>() {
            Ok(index) if index <= MAX_LIST_INDEX && index.to_string() == raw => {
                PathSegment::Index(index)
            }
            _ => PathSegment::Key(raw.to_string()),
        }
    }

    /// Text of the segment as it would appear in a dotted path.
    pub fn as_key(&self) -> String {
        match self {
            PathSegment::Key(key) => key.clone(),
            PathSegment::Index(index) => index.to_string(),
        }
    }
}

/// Tokenize a path, normalizing bracket indices (`a[0]` → `a.0`).
///
/// # Examples
///
/// ```
/// use svelte_intl_extract::core::path::{PathSegment, parse_path};
///
/// assert_eq!(
///     parse_path("steps[1].label"),
///     vec![
///         PathSegment::Key("steps".to_string()),
///         PathSegment::Index(1),
///         PathSegment::Key("label".to_string()),
///     ]
/// );
/// ```
pub fn parse_path(path: &str) -> Vec<PathSegment> {
    normalize_brackets(path)
        .split('.')
        .map(PathSegment::classify)
        .collect()
}

/// Rewrite `[word]` groups into `.word`.
fn normalize_brackets(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len());
    let mut rest = path;

    while let Some(open) = rest.find('[') {
        let after_open = &rest[open + 1..];
        match after_open.find(']') {
            Some(close)
                if close > 0
                    && after_open[..close]
                        .chars()
                        .all(|c| c.is_alphanumeric() || c == '_') =>
            {
                normalized.push_str(&rest[..open]);
                normalized.push('.');
                normalized.push_str(&after_open[..close]);
                rest = &after_open[close + 1..];
            }
            _ => {
                normalized.push_str(&rest[..=open]);
                rest = after_open;
            }
        }
    }

    normalized.push_str(rest);
    normalized
}

/// Look up a direct child of a container by segment.
fn child<'a>(container: &'a Value, segment: &PathSegment) -> Option<&'a Value> {
    match (container, segment) {
        (Value::Object(map), segment) => map.get(&segment.as_key()),
        (Value::Array(list), PathSegment::Index(index)) => list_slot(list, *index),
        _ => None,
    }
}

/// Look up a direct key of a container by its raw text.
fn direct_key<'a>(container: &'a Value, key: &str) -> Option<&'a Value> {
    match container {
        Value::Object(map) => map.get(key),
        Value::Array(list) => key.parse::<usize>().ok().and_then(|i| list_slot(list, i)),
        _ => None,
    }
}

/// A list element; `null` elements are padding holes and read as absent.
fn list_slot(list: &[Value], index: usize) -> Option<&Value> {
    list.get(index).filter(|value| !value.is_null())
}

/// Read the value addressed by `path`.
///
/// The whole path is tried as a direct key first. While walking, whenever the
/// remaining suffix is itself a direct key of the current container it is taken
/// and the walk stops, so flat dotted keys nested below path-like structures
/// are found too. Walking through a non-container yields `None`.
///
/// A map entry holding `null` is present. A `null` list element is a hole left
/// by padding and is absent.
pub fn resolve<'a>(container: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    if let Some(value) = container.get(path) {
        return Some(value);
    }

    let segments = parse_path(path);
    let (first, rest) = segments.split_first()?;

    let mut current = container.get(&first.as_key())?;
    for (i, segment) in rest.iter().enumerate() {
        let suffix = rest[i..]
            .iter()
            .map(PathSegment::as_key)
            .collect::<Vec<_>>()
            .join(".");
        if let Some(value) = direct_key(current, &suffix) {
            return Some(value);
        }
        current = child(current, segment)?;
    }

    Some(current)
}

/// Outcome of an [`assign`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOutcome {
    /// The value was written.
    Written,
    /// The addressed slot already held a value and was left untouched.
    Occupied,
    /// A scalar sits where a container is needed; nothing was written.
    Blocked,
}

/// Write `value` at `path`, creating intermediate containers as needed.
///
/// An intermediate container is a list when the following segment is an index
/// and a map otherwise. Existing entries, `null` included, are never replaced.
/// Lists are padded with `null` holes, and only holes may be filled later.
pub fn assign(container: &mut Map<String, Value>, path: &str, value: Value) -> AssignOutcome {
    let segments = parse_path(path);
    let Some((first, rest)) = segments.split_first() else {
        return AssignOutcome::Blocked;
    };
    assign_in_map(container, first, rest, value)
}

fn assign_in_map(
    map: &mut Map<String, Value>,
    segment: &PathSegment,
    rest: &[PathSegment],
    value: Value,
) -> AssignOutcome {
    let key = segment.as_key();
    match rest.first() {
        None if map.contains_key(&key) => AssignOutcome::Occupied,
        None => {
            map.insert(key, value);
            AssignOutcome::Written
        }
        Some(next) => {
            let slot = map.entry(key).or_insert_with(|| empty_container(next));
            assign_into(slot, rest, value)
        }
    }
}

fn assign_in_list(
    list: &mut Vec<Value>,
    index: usize,
    rest: &[PathSegment],
    value: Value,
) -> AssignOutcome {
    if list.len() <= index {
        list.resize(index + 1, Value::Null);
    }
    let slot = &mut list[index];

    match rest.first() {
        None if slot.is_null() => {
            *slot = value;
            AssignOutcome::Written
        }
        None => AssignOutcome::Occupied,
        Some(next) => {
            if slot.is_null() {
                *slot = empty_container(next);
            }
            assign_into(slot, rest, value)
        }
    }
}

/// Descend into `current` along `segments` (never empty).
fn assign_into(current: &mut Value, segments: &[PathSegment], value: Value) -> AssignOutcome {
    let Some((segment, rest)) = segments.split_first() else {
        return AssignOutcome::Occupied;
    };

    match (current, segment) {
        (Value::Object(map), segment) => assign_in_map(map, segment, rest, value),
        (Value::Array(list), PathSegment::Index(index)) => {
            assign_in_list(list, *index, rest, value)
        }
        _ => AssignOutcome::Blocked,
    }
}

fn empty_container(next: &PathSegment) -> Value {
    match next {
        PathSegment::Index(_) => Value::Array(Vec::new()),
        PathSegment::Key(_) => Value::Object(Map::new()),
    }
}
