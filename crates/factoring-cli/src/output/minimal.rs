use serde_json::Value;

use super::render_value;

/// Key answer fields, in priority order per command output shape.
const PRIORITY_KEYS: [&str; 6] = [
    "decision",
    "outcome",
    "net_payout",
    "utilization_pct",
    "valid",
    "critical_count",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in &PRIORITY_KEYS {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", render_value(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, render_value(val));
            return;
        }
    }

    println!("{}", render_value(result_obj));
}
