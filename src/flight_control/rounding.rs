use serde_json::Value;

/// Decimal places kept in outbound snapshots.
pub const SNAPSHOT_PRECISION: i32 = 2;

/// Rounds every float in `value` to `digits` decimals, descending into
/// objects and arrays. Integers, strings and booleans are left alone.
pub fn round_recursive(value: Value, digits: i32) -> Value {
    match value {
        Value::Number(n) if n.is_f64() => n
            .as_f64()
            .map(|f| round_to(f, digits))
            .and_then(serde_json::Number::from_f64)
            .map_or(Value::Null, Value::Number),
        Value::Array(items) => {
            Value::Array(items.into_iter().map(|v| round_recursive(v, digits)).collect())
        }
        Value::Object(map) => {
            Value::Object(map.into_iter().map(|(k, v)| (k, round_recursive(v, digits))).collect())
        }
        other => other,
    }
}

pub fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}
