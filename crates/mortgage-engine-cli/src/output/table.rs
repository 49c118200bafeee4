use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{flatten, result_body, scalar};

/// Render the result as a field/value table. Lists of records (scenarios,
/// deltas) get their own table; lists of strings (red flags, letter lines)
/// print as bullets.
pub fn print_table(value: &Value) {
    let result = result_body(value);
    match result {
        Value::Object(map) => print_record(map),
        Value::Array(arr) => print_rows(arr),
        other => println!("{}", scalar(other, "null")),
    }

    if let Some(envelope) = value.as_object().filter(|m| m.contains_key("result")) {
        print_envelope(envelope);
    }
}

fn print_record(map: &Map<String, Value>) {
    let mut fields = Vec::new();
    let mut lists = Vec::new();
    for (key, val) in map {
        match val {
            Value::Array(arr) if !arr.is_empty() => lists.push((key, arr)),
            other => flatten(key, other, true, &mut fields),
        }
    }

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in &fields {
        builder.push_record([key.as_str(), &display(val)]);
    }
    println!("{}", Table::from(builder));

    for (key, arr) in lists {
        println!("\n{key}:");
        print_rows(arr);
    }
}

fn print_rows(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            println!("  - {}", display(item));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(&headers);
    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(display).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }
    println!("{}", Table::from(builder));
}

fn print_envelope(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {w}");
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {meth}");
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::Array(arr) => arr.iter().map(display).collect::<Vec<_>>().join(", "),
        other => scalar(other, "-"),
    }
}
