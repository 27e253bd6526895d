use serde_json::{json, Value};

use loan_sim_core::rates::RateTable;

pub fn run_rates() -> Result<Value, Box<dyn std::error::Error>> {
    let rows: Vec<Value> = RateTable::STANDARD
        .entries()
        .iter()
        .map(|(bracket, rate)| {
            json!({
                "age_bracket": bracket.label(),
                "annual_interest_rate": rate.to_string(),
            })
        })
        .collect();
    Ok(Value::Array(rows))
}
