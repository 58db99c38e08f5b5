//! Argument tuples accepted by selectors

use serde::Serialize;
use serde_json::Value;

/// Argument tuple of a selector invocation.
///
/// Implemented for tuples of up to four serializable values; the rendered
/// values feed the default cache-key rules. Argument serializability is
/// part of the calling contract, so a value that cannot render to JSON
/// panics at the invocation site.
pub trait SelectorArgs: Clone + Send + Sync + 'static {
    /// JSON rendering of each argument, in order.
    fn to_values(&self) -> Vec<Value>;
}

pub(crate) fn arg_value<T: Serialize>(arg: &T) -> Value {
    serde_json::to_value(arg).expect("selector and observer arguments must serialize to JSON")
}

impl SelectorArgs for () {
    fn to_values(&self) -> Vec<Value> {
        Vec::new()
    }
}

impl<T1> SelectorArgs for (T1,)
where
    T1: Serialize + Clone + Send + Sync + 'static,
{
    fn to_values(&self) -> Vec<Value> {
        vec![arg_value(&self.0)]
    }
}

impl<T1, T2> SelectorArgs for (T1, T2)
where
    T1: Serialize + Clone + Send + Sync + 'static,
    T2: Serialize + Clone + Send + Sync + 'static,
{
    fn to_values(&self) -> Vec<Value> {
        vec![arg_value(&self.0), arg_value(&self.1)]
    }
}

impl<T1, T2, T3> SelectorArgs for (T1, T2, T3)
where
    T1: Serialize + Clone + Send + Sync + 'static,
    T2: Serialize + Clone + Send + Sync + 'static,
    T3: Serialize + Clone + Send + Sync + 'static,
{
    fn to_values(&self) -> Vec<Value> {
        vec![arg_value(&self.0), arg_value(&self.1), arg_value(&self.2)]
    }
}

impl<T1, T2, T3, T4> SelectorArgs for (T1, T2, T3, T4)
where
    T1: Serialize + Clone + Send + Sync + 'static,
    T2: Serialize + Clone + Send + Sync + 'static,
    T3: Serialize + Clone + Send + Sync + 'static,
    T4: Serialize + Clone + Send + Sync + 'static,
{
    fn to_values(&self) -> Vec<Value> {
        vec![
            arg_value(&self.0),
            arg_value(&self.1),
            arg_value(&self.2),
            arg_value(&self.3),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_tuple_has_no_values() {
        assert!(().to_values().is_empty());
    }

    #[test]
    fn test_tuples_render_in_order() {
        assert_eq!((5i64,).to_values(), vec![json!(5)]);
        assert_eq!(
            ("a".to_string(), 2i64, true).to_values(),
            vec![json!("a"), json!(2), json!(true)]
        );
    }
}
