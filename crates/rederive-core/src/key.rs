//! Cache keys and the default argument serialization rules

use serde_json::Value;
use std::fmt;

/// Key under which a selector stores one computation.
///
/// `NoArgs` is a dedicated sentinel rather than a reserved string, so a
/// zero-argument invocation can never collide with any text key, including
/// the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Invocation with an empty argument tuple
    NoArgs,
    /// Serialized argument tuple
    Text(String),
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::NoArgs => f.write_str("<no args>"),
            CacheKey::Text(text) => f.write_str(text),
        }
    }
}

impl From<String> for CacheKey {
    fn from(text: String) -> Self {
        CacheKey::Text(text)
    }
}

impl From<&str> for CacheKey {
    fn from(text: &str) -> Self {
        CacheKey::Text(text.to_string())
    }
}

/// Stringification for the JSON values that print unambiguously.
///
/// Strings are excluded: a string argument could collide with the
/// stringification of a number or boolean, so strings always route through
/// JSON encoding instead.
fn primitive_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some("null".to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn encode_args(args: &[Value]) -> String {
    serde_json::to_string(args).expect("JSON values always re-encode")
}

fn encode_value(value: &Value) -> String {
    serde_json::to_string(value).expect("JSON values always re-encode")
}

/// Default cache key for a selector argument tuple.
///
/// An empty tuple maps to the [`CacheKey::NoArgs`] sentinel; a single
/// primitive other than a string stringifies directly; everything else is
/// the JSON encoding of the whole tuple.
pub fn default_cache_key(args: &[Value]) -> CacheKey {
    match args {
        [] => CacheKey::NoArgs,
        [single] => match primitive_text(single) {
            Some(text) => CacheKey::Text(text),
            None => CacheKey::Text(encode_args(args)),
        },
        _ => CacheKey::Text(encode_args(args)),
    }
}

/// Dependency key for an (observer id, argument) pair.
///
/// `"id"` when the argument is absent, `"id:arg"` when the argument is a
/// bare primitive, `"id:JSON(arg)"` otherwise.
pub fn observer_key(id: u64, arg: Option<&Value>) -> String {
    match arg {
        None => id.to_string(),
        Some(value) => match primitive_text(value) {
            Some(text) => format!("{id}:{text}"),
            None => format!("{id}:{}", encode_value(value)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_no_args_sentinel() {
        assert_eq!(default_cache_key(&[]), CacheKey::NoArgs);
        // The sentinel never collides with a text key, even the empty string.
        assert_ne!(default_cache_key(&[]), default_cache_key(&[json!("")]));
    }

    #[test]
    fn test_single_primitive_stringifies() {
        assert_eq!(default_cache_key(&[json!(42)]), CacheKey::from("42"));
        assert_eq!(default_cache_key(&[json!(1.5)]), CacheKey::from("1.5"));
        assert_eq!(default_cache_key(&[json!(true)]), CacheKey::from("true"));
        assert_eq!(default_cache_key(&[json!(null)]), CacheKey::from("null"));
    }

    #[test]
    fn test_string_argument_routes_through_json() {
        // A string equal to a stringified number must not share its key.
        assert_ne!(default_cache_key(&[json!("42")]), default_cache_key(&[json!(42)]));
        assert_eq!(default_cache_key(&[json!("42")]), CacheKey::from(r#"["42"]"#));
    }

    #[test]
    fn test_tuple_encodes_as_json() {
        assert_eq!(
            default_cache_key(&[json!(1), json!("a")]),
            CacheKey::from(r#"[1,"a"]"#)
        );
        assert_eq!(
            default_cache_key(&[json!({"id": 7})]),
            CacheKey::from(r#"[{"id":7}]"#)
        );
    }

    #[test]
    fn test_observer_key_without_argument() {
        assert_eq!(observer_key(3, None), "3");
    }

    #[test]
    fn test_observer_key_with_primitive_argument() {
        assert_eq!(observer_key(3, Some(&json!(5))), "3:5");
        assert_eq!(observer_key(3, Some(&json!(false))), "3:false");
    }

    #[test]
    fn test_observer_key_with_string_argument() {
        assert_eq!(observer_key(3, Some(&json!("5"))), r#"3:"5""#);
        // The quoted form keeps string and numeric arguments apart.
        assert_ne!(
            observer_key(3, Some(&json!("5"))),
            observer_key(3, Some(&json!(5)))
        );
    }

    #[test]
    fn test_cache_key_display() {
        assert_eq!(CacheKey::from("abc").to_string(), "abc");
        assert_eq!(CacheKey::NoArgs.to_string(), "<no args>");
    }
}
