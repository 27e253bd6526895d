use serde_json::Value;

/// Fields printed by `--output minimal`, in priority order.
const KEY_FIELDS: [&str; 5] = [
    "monthly_payment_amount",
    "installment",
    "average_monthly_payment",
    "strategy",
    "total_value_to_pay",
];

/// Print just the headline figure of a result.
///
/// Batch results report their summary; schedules report the installment.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let target = result_obj
        .as_object()
        .and_then(|m| m.get("summary"))
        .unwrap_or(result_obj);

    if let Value::Object(map) = target {
        for key in KEY_FIELDS {
            if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
                println!("{}", format_minimal(val));
                return;
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(target));
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
