use serde_json::Value;
use std::io;

use super::render_value;

/// Write output as CSV to stdout. Envelope objects emit a two-column
/// field/value listing of the result; arrays of objects emit one row per
/// element under a shared header.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => {
            let section = match map.get("result") {
                Some(Value::Object(result)) => result,
                _ => map,
            };
            if let Some(Value::Array(rows)) = section.get("clients") {
                write_rows(&mut wtr, rows);
            } else {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in section {
                    let _ = wtr.write_record([key.as_str(), &render_value(val)]);
                }
            }
        }
        Value::Array(arr) => write_rows(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record([&render_value(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_rows(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            let _ = wtr.write_record([&render_value(item)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);
    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(render_value).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}
