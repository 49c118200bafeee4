use serde_json::Value;
use std::io;

use super::{flatten, result_body, scalar};

/// Write the result to stdout as CSV. A list result (or a result whose only
/// list is a set of records, as in scenario comparison) becomes one row per
/// record; anything else becomes dotted `field,value` rows.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = result_body(value);
    match result {
        Value::Array(arr) => write_rows(&mut wtr, arr),
        Value::Object(map) => match map.get("scenarios") {
            Some(Value::Array(scenarios)) => write_rows(&mut wtr, scenarios),
            _ => write_fields(&mut wtr, result),
        },
        other => {
            let _ = wtr.write_record([scalar(other, "")]);
        }
    }

    let _ = wtr.flush();
}

fn write_fields(wtr: &mut csv::Writer<io::StdoutLock<'_>>, value: &Value) {
    let mut rows = Vec::new();
    flatten("", value, false, &mut rows);
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in rows {
        let _ = wtr.write_record([key, scalar(&val, "")]);
    }
}

fn write_rows(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    let Some(first) = arr.first() else {
        return;
    };

    let mut header_rows = Vec::new();
    flatten("", first, false, &mut header_rows);
    let headers: Vec<String> = header_rows.into_iter().map(|(k, _)| k).collect();
    let _ = wtr.write_record(&headers);

    for item in arr {
        let mut cells = Vec::new();
        flatten("", item, false, &mut cells);
        let row: Vec<String> = headers
            .iter()
            .map(|h| {
                cells
                    .iter()
                    .find(|(k, _)| k == h)
                    .map(|(_, v)| scalar(v, ""))
                    .unwrap_or_default()
            })
            .collect();
        let _ = wtr.write_record(&row);
    }
}
