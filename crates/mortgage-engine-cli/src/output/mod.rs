pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// The `result` of a computation envelope, or the value itself for bare outputs
/// such as quotes.
fn result_body(value: &Value) -> &Value {
    value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value)
}

fn scalar(value: &Value, null: &str) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => null.to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// Flatten nested objects into dotted `field` / `value` pairs. Arrays are
/// indexed (`scenarios.0.title`) unless `keep_arrays` is set, in which case
/// they stay whole under their own key.
fn flatten(prefix: &str, value: &Value, keep_arrays: bool, out: &mut Vec<(String, Value)>) {
    let key_for = |k: &str| {
        if prefix.is_empty() {
            k.to_string()
        } else {
            format!("{prefix}.{k}")
        }
    };
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                flatten(&key_for(k), v, keep_arrays, out);
            }
        }
        Value::Array(arr) if !keep_arrays => {
            for (i, v) in arr.iter().enumerate() {
                flatten(&key_for(&i.to_string()), v, keep_arrays, out);
            }
        }
        other => out.push((prefix.to_string(), other.clone())),
    }
}
