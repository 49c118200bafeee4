use serde_json::Value;

use super::{result_body, scalar};

/// Headline answer for each command, in priority order.
const HEADLINE_POINTERS: [&str; 11] = [
    "/total_payment",
    "/lowest_payment",
    "/monthly_payment",
    "/programs",
    "/lines",
    "/optimized/estimate/total",
    "/estimate/total",
    "/recommendation/best",
    "/percent",
    "/score",
    "/rate",
];

/// Print just the key answer. Falls back to the first field of the result.
pub fn print_minimal(value: &Value) {
    let result = result_body(value);

    for pointer in HEADLINE_POINTERS {
        match result.pointer(pointer) {
            Some(Value::Null) | None => continue,
            Some(Value::Array(items)) => {
                for item in items {
                    println!("{}", scalar(item, "null"));
                }
                return;
            }
            Some(found) => {
                println!("{}", scalar(found, "null"));
                return;
            }
        }
    }

    if let Some((key, val)) = result.as_object().and_then(|m| m.iter().next()) {
        println!("{key}: {}", scalar(val, "null"));
        return;
    }

    println!("{}", scalar(result, "null"));
}
