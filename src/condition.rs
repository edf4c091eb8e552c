//! Truthiness test shared by the breakpoint manager and the debug session.

use serde_json::Value;

/// Execution context captured at a step boundary.
pub type ContextMap = serde_json::Map<String, Value>;

/// Returns whether a context value counts as "true" for breakpoint conditions.
///
/// `null`, `false`, numeric zero and the empty string are falsy. Every other
/// value is truthy, including empty arrays and objects.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_none_or(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Evaluates an optional breakpoint condition against a context.
///
/// No condition (or an empty one) always holds. Otherwise the condition names
/// a context key, and holds only when that key is present and truthy.
pub(crate) fn condition_holds(condition: Option<&str>, ctx: Option<&ContextMap>) -> bool {
    match condition {
        None | Some("") => true,
        Some(key) => ctx.and_then(|c| c.get(key)).is_some_and(is_truthy),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_falsy_values() {
        for v in [json!(null), json!(false), json!(0), json!(0.0), json!(-0.0), json!("")] {
            assert!(!is_truthy(&v), "{v} should be falsy");
        }
    }

    #[test]
    fn test_truthy_values() {
        for v in [
            json!(true),
            json!(1),
            json!(-7),
            json!(u64::MAX),
            json!(0.5),
            json!("no"),
            json!([]),
            json!({}),
            json!([0]),
        ] {
            assert!(is_truthy(&v), "{v} should be truthy");
        }
    }

    #[test]
    fn test_condition_holds() {
        let ctx: ContextMap = json!({"debug_mode": true, "retries": 0})
            .as_object()
            .cloned()
            .unwrap();

        assert!(condition_holds(None, None));
        assert!(condition_holds(Some(""), Some(&ctx)));
        assert!(condition_holds(Some("debug_mode"), Some(&ctx)));
        assert!(!condition_holds(Some("retries"), Some(&ctx)));
        assert!(!condition_holds(Some("missing"), Some(&ctx)));
        assert!(!condition_holds(Some("debug_mode"), None));
    }
}
